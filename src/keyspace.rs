// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Keyspace Enumeration
 * Mixed-radix candidate generation with resume support
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::charset::Charset;
use crate::errors::{EngineError, EngineResult};
use crate::source::CandidateSource;

/// Lazy enumerator over every string of length `min_len..=max_len` drawn
/// from a charset
///
/// For each length L (ascending) the charset is treated as the digits of
/// a base-N numeral system and the index runs 0..N^L, most-significant
/// symbol first. The ordering is total, deterministic and gap-free, which
/// is what makes resume well-defined. The position is kept as an odometer
/// of digit indices rather than an integer, so enumeration never hits
/// integer range limits even when the total count does.
pub struct KeyspaceEnumerator {
    charset: Charset,
    max_len: u32,
    /// Current candidate as charset indices, most significant first.
    /// Empty once the space is exhausted.
    digits: Vec<usize>,
    exhausted: bool,
    resume: Option<String>,
    resume_matched: bool,
    total: Option<u64>,
}

impl KeyspaceEnumerator {
    pub fn new(charset: Charset, min_len: u32, max_len: u32, resume: Option<String>) -> Self {
        let total = total_candidates(charset.len(), min_len, max_len);
        Self {
            charset,
            max_len,
            digits: vec![0; min_len as usize],
            exhausted: min_len > max_len,
            resume,
            resume_matched: false,
            total,
        }
    }

    /// Render the current odometer position and step it forward
    fn step(&mut self) -> Option<String> {
        if self.exhausted {
            return None;
        }

        let candidate: String = self
            .digits
            .iter()
            .map(|&idx| self.charset.symbol(idx))
            .collect();

        // Odometer increment, least significant digit last
        let base = self.charset.len();
        let mut pos = self.digits.len();
        loop {
            if pos == 0 {
                // Carried out of the most significant digit: next length
                if self.digits.len() as u32 >= self.max_len {
                    self.exhausted = true;
                } else {
                    let next_len = self.digits.len() + 1;
                    self.digits.clear();
                    self.digits.resize(next_len, 0);
                }
                break;
            }
            pos -= 1;
            self.digits[pos] += 1;
            if self.digits[pos] < base {
                break;
            }
            self.digits[pos] = 0;
        }

        Some(candidate)
    }
}

impl CandidateSource for KeyspaceEnumerator {
    fn next_candidate(&mut self) -> EngineResult<Option<String>> {
        loop {
            let Some(candidate) = self.step() else {
                if let Some(cursor) = &self.resume {
                    if !self.resume_matched {
                        return Err(EngineError::ResumeNotFound {
                            cursor: cursor.clone(),
                        });
                    }
                }
                return Ok(None);
            };

            // Fast-forward: discard everything up to and including the
            // resume cursor, then yield the suffix
            if let Some(cursor) = &self.resume {
                if !self.resume_matched {
                    if candidate == *cursor {
                        self.resume_matched = true;
                    }
                    continue;
                }
            }

            return Ok(Some(candidate));
        }
    }

    fn total(&self) -> Option<u64> {
        self.total
    }
}

/// Total candidate count Σ(L=min..max) N^L with checked arithmetic
///
/// Returns `None` when the count exceeds u64 range - reported upstream as
/// an unknown total rather than a silently wrapped number.
pub fn total_candidates(charset_len: usize, min_len: u32, max_len: u32) -> Option<u64> {
    let base = u64::try_from(charset_len).ok()?;
    let mut total: u64 = 0;
    for len in min_len..=max_len {
        let term = base.checked_pow(len)?;
        total = total.checked_add(term)?;
    }
    Some(total)
}
