// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Run Configuration
 * Immutable per-run settings with up-front validation
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::charset::Charset;
use crate::errors::{EngineError, EngineResult};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Candidate source selection, fixed at configuration time
#[derive(Debug, Clone)]
pub enum SourceSpec {
    /// Enumerate every string over `charset` with lengths in
    /// `min_len..=max_len`, optionally fast-forwarding past `resume`
    Keyspace {
        charset: Charset,
        min_len: u32,
        max_len: u32,
        resume: Option<String>,
    },
    /// Stream candidates from a line-oriented wordlist file
    Wordlist { path: PathBuf },
}

/// Immutable run configuration, constructed once from invocation
/// parameters and validated before any network activity
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Username under attack
    pub target: String,
    pub source: SourceSpec,
    /// Base URL of the target application; `/api` is appended for the
    /// login endpoint
    pub base_url: String,
    /// Optional cap on dispatched attempts
    pub limit: Option<u64>,
    /// Maximum number of attempts in flight
    pub concurrency: usize,
    /// Period of the time-driven progress reporter
    pub progress_interval: Duration,
    /// Emit one event per completed attempt instead of periodic snapshots
    pub verbose: bool,
    /// Per-request timeout for the attempt executor
    pub request_timeout: Duration,
}

impl RunConfig {
    /// Validate the configuration
    ///
    /// Every rejection here happens before a single request is sent.
    pub fn validate(&self) -> EngineResult<()> {
        if self.target.trim().is_empty() {
            return Err(EngineError::Configuration(
                "target username is required".to_string(),
            ));
        }

        if self.concurrency == 0 {
            return Err(EngineError::Configuration(
                "concurrency must be at least 1".to_string(),
            ));
        }

        Url::parse(&self.base_url)
            .map_err(|e| EngineError::Configuration(format!("invalid base URL: {}", e)))?;

        match &self.source {
            SourceSpec::Keyspace {
                charset,
                min_len,
                max_len,
                ..
            } => {
                if charset.is_empty() {
                    return Err(EngineError::Configuration(
                        "charset must contain at least one symbol".to_string(),
                    ));
                }
                if *min_len < 1 || *max_len < *min_len {
                    return Err(EngineError::Configuration(format!(
                        "invalid length range: min={}, max={}",
                        min_len, max_len
                    )));
                }
            }
            SourceSpec::Wordlist { path } => {
                if !path.exists() {
                    return Err(EngineError::Configuration(format!(
                        "wordlist not found: {}",
                        path.display()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Login endpoint URL, trailing slashes on the base normalized away
    pub fn api_url(&self) -> String {
        format!("{}/api", self.base_url.trim_end_matches('/'))
    }

    /// Short mode label for the start event
    pub fn mode(&self) -> &'static str {
        match self.source {
            SourceSpec::Keyspace { .. } => "keyspace",
            SourceSpec::Wordlist { .. } => "wordlist",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyspace_config() -> RunConfig {
        RunConfig {
            target: "admin".to_string(),
            source: SourceSpec::Keyspace {
                charset: Charset::from_selector("digits").unwrap(),
                min_len: 1,
                max_len: 4,
                resume: None,
            },
            base_url: "http://localhost:3000".to_string(),
            limit: None,
            concurrency: 32,
            progress_interval: Duration::from_secs(1),
            verbose: false,
            request_timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(keyspace_config().validate().is_ok());
    }

    #[test]
    fn rejects_empty_target() {
        let mut config = keyspace_config();
        config.target = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(EngineError::Configuration(_))
        ));
    }

    #[test]
    fn rejects_zero_concurrency() {
        let mut config = keyspace_config();
        config.concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_length_range() {
        let mut config = keyspace_config();
        if let SourceSpec::Keyspace {
            ref mut min_len,
            ref mut max_len,
            ..
        } = config.source
        {
            *min_len = 4;
            *max_len = 2;
        }
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("length range"));
    }

    #[test]
    fn rejects_zero_min_length() {
        let mut config = keyspace_config();
        if let SourceSpec::Keyspace {
            ref mut min_len, ..
        } = config.source
        {
            *min_len = 0;
        }
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_missing_wordlist() {
        let mut config = keyspace_config();
        config.source = SourceSpec::Wordlist {
            path: PathBuf::from("/nonexistent/rockyou.txt"),
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("wordlist not found"));
    }

    #[test]
    fn rejects_invalid_base_url() {
        let mut config = keyspace_config();
        config.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn api_url_normalizes_trailing_slash() {
        let mut config = keyspace_config();
        config.base_url = "http://localhost:3000/".to_string();
        assert_eq!(config.api_url(), "http://localhost:3000/api");
    }
}
