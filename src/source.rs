// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Candidate Source
 * Polymorphic lazy candidate sequence
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::config::SourceSpec;
use crate::errors::EngineResult;
use crate::keyspace::KeyspaceEnumerator;
use crate::wordlist::WordlistSource;

/// A lazy, finite, ordered sequence of candidate secrets
///
/// The order is deterministic and reproducible from the run configuration
/// alone: two runs with the same configuration dispatch the same
/// candidates in the same order.
pub trait CandidateSource: Send {
    /// Yield the next candidate, or `Ok(None)` on exhaustion
    fn next_candidate(&mut self) -> EngineResult<Option<String>>;

    /// Total number of candidates this source will yield, if it fits in
    /// u64 range; `None` means the total is unknown and progress
    /// percentages cannot be computed
    fn total(&self) -> Option<u64>;

    /// Lines discarded so far (blank lines and framing artifacts);
    /// only meaningful for wordlist sources
    fn skipped_lines(&self) -> u64 {
        0
    }
}

/// Construct the candidate source selected by the configuration
pub fn build_source(spec: &SourceSpec) -> EngineResult<Box<dyn CandidateSource>> {
    match spec {
        SourceSpec::Keyspace {
            charset,
            min_len,
            max_len,
            resume,
        } => Ok(Box::new(KeyspaceEnumerator::new(
            charset.clone(),
            *min_len,
            *max_len,
            resume.clone(),
        ))),
        SourceSpec::Wordlist { path } => Ok(Box::new(WordlistSource::open(path)?)),
    }
}
