// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Tiirikka Credential Engine Library
 * Exposes engine modules for testing
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

pub mod admission;
pub mod charset;
pub mod client;
pub mod config;
pub mod engine;
pub mod errors;
pub mod events;
pub mod keyspace;
pub mod source;
pub mod wordlist;

pub use config::{RunConfig, SourceSpec};
pub use engine::{run, RunOutcome, RunReport};
pub use errors::{EngineError, EngineResult};
