// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Wordlist Source
 * Streaming line-oriented candidate input
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::errors::{EngineError, EngineResult};
use crate::source::CandidateSource;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Streams candidates from a line-oriented wordlist file
///
/// Lines are trimmed; blank lines and stray `{` / `}` framing artifacts
/// (seen in JSON arrays dumped one element per line) are skipped and
/// counted. The file is never held in memory whole: the total is taken
/// from a first streaming pass and candidates come from a second one.
#[derive(Debug)]
pub struct WordlistSource {
    lines: Lines<BufReader<File>>,
    path: PathBuf,
    total: u64,
    skipped: u64,
}

impl WordlistSource {
    pub fn open(path: &Path) -> EngineResult<Self> {
        let total = count_candidates(path)?;
        debug!("wordlist {} holds {} candidates", path.display(), total);

        let file = File::open(path).map_err(|e| EngineError::Wordlist {
            path: path.display().to_string(),
            source: e,
        })?;

        Ok(Self {
            lines: BufReader::new(file).lines(),
            path: path.to_path_buf(),
            total,
            skipped: 0,
        })
    }
}

impl CandidateSource for WordlistSource {
    fn next_candidate(&mut self) -> EngineResult<Option<String>> {
        for line in self.lines.by_ref() {
            let line = line.map_err(|e| EngineError::Wordlist {
                path: self.path.display().to_string(),
                source: e,
            })?;

            let candidate = line.trim();
            if should_skip(candidate) {
                self.skipped += 1;
                continue;
            }

            return Ok(Some(candidate.to_string()));
        }

        Ok(None)
    }

    fn total(&self) -> Option<u64> {
        Some(self.total)
    }

    fn skipped_lines(&self) -> u64 {
        self.skipped
    }
}

/// Lines that never become candidates
///
/// The `{` / `}` check is a defensive no-op for malformed
/// JSON-array-as-newline-delimited inputs, not a format requirement.
fn should_skip(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed == "{" || trimmed == "}"
}

/// Count usable lines in one streaming pass
fn count_candidates(path: &Path) -> EngineResult<u64> {
    let file = File::open(path).map_err(|e| EngineError::Wordlist {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut total = 0u64;
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| EngineError::Wordlist {
            path: path.display().to_string(),
            source: e,
        })?;
        if !should_skip(line.trim()) {
            total += 1;
        }
    }
    Ok(total)
}
