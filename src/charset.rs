// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Charset Presets
 * Named symbol sets for keyspace enumeration
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::errors::{EngineError, EngineResult};
use std::collections::HashSet;

/// Built-in charset presets, selectable by name on the CLI
const PRESETS: &[(&str, &str)] = &[
    ("digits", "0123456789"),
    ("lower", "abcdefghijklmnopqrstuvwxyz"),
    ("upper", "ABCDEFGHIJKLMNOPQRSTUVWXYZ"),
    (
        "alpha",
        "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ",
    ),
    (
        "alnum",
        "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789",
    ),
    (
        "strong",
        "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()-_=+[]{}|;:,.<>?/",
    ),
];

/// An ordered alphabet of unique symbols
///
/// Symbol order is significant: it defines the digit order of the
/// mixed-radix keyspace enumeration, so the same charset always produces
/// the same candidate sequence.
#[derive(Debug, Clone)]
pub struct Charset {
    symbols: Vec<char>,
    label: String,
}

impl Charset {
    /// Resolve a selector into a charset
    ///
    /// The selector is either a preset name (`digits`, `lower`, `upper`,
    /// `alpha`, `alnum`, `strong`) or a literal alphabet string. Literal
    /// alphabets must be non-empty and free of duplicate symbols.
    pub fn from_selector(selector: &str) -> EngineResult<Self> {
        if let Some((name, symbols)) = PRESETS.iter().find(|(name, _)| *name == selector) {
            return Ok(Self {
                symbols: symbols.chars().collect(),
                label: (*name).to_string(),
            });
        }

        let symbols: Vec<char> = selector.chars().collect();
        if symbols.is_empty() {
            return Err(EngineError::Configuration(
                "charset must contain at least one symbol".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(symbols.len());
        for &c in &symbols {
            if !seen.insert(c) {
                return Err(EngineError::Configuration(format!(
                    "charset contains duplicate symbol '{}'",
                    c
                )));
            }
        }

        Ok(Self {
            symbols,
            label: "custom".to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol at digit position `idx`, panics if out of range
    pub fn symbol(&self, idx: usize) -> char {
        self.symbols[idx]
    }

    /// Preset name, or "custom" for literal alphabets
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Short preview for the start event (long charsets are truncated)
    pub fn preview(&self) -> String {
        if self.symbols.len() > 40 {
            let head: String = self.symbols.iter().take(40).collect();
            format!("{}…", head)
        } else {
            self.symbols.iter().collect()
        }
    }
}
