// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Engine Error Types
 * Production-ready error handling with thiserror
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::io;
use thiserror::Error;

/// Main engine error type
///
/// Per-attempt network failures are not represented here - they are
/// classified as `Outcome::TransportError` at the executor boundary and
/// never abort a run. Everything in this enum is either rejected before
/// any network activity (`Configuration`, `Wordlist`) or aborts the whole
/// run (`Pool`).
#[derive(Error, Debug)]
pub enum EngineError {
    /// Bad invocation input, rejected before any network activity
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Resume cursor never appeared in the candidate sequence
    #[error("Resume cursor \"{cursor}\" never appeared in the candidate sequence")]
    ResumeNotFound { cursor: String },

    /// Wordlist I/O failure
    #[error("Wordlist error for {path}: {source}")]
    Wordlist {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Unexpected response shape from the target
    #[error("Protocol error from {url}: {reason}")]
    Protocol { url: String, reason: String },

    /// Connection pool construction failure
    #[error("Connection pool error: {0}")]
    Pool(String),
}

impl EngineError {
    /// Check whether this error should abort the whole run
    ///
    /// `ResumeNotFound` is deliberately non-fatal: the run completes with
    /// zero attempts and an explicit warning rather than a silent no-op.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EngineError::Configuration(_) | EngineError::Wordlist { .. } | EngineError::Pool(_)
        )
    }

    /// Exit code a CLI should use for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            EngineError::Configuration(_) | EngineError::Wordlist { .. } => 2,
            _ => 1,
        }
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
