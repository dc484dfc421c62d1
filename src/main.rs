// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Tiirikka - Credential Brute-Force Engine
 * Standalone CLI for authorized password-guessing exercises
 *
 * Drives bounded-concurrency login attempts against a lab target and
 * reports progress and outcome as JSON events on stdout.
 *
 * (c) 2026 Bountyy Oy
 */

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, Level};

use tiirikka::charset::Charset;
use tiirikka::config::{RunConfig, SourceSpec};
use tiirikka::engine;
use tiirikka::errors::EngineError;
use tiirikka::events::EventSink;

/// Tiirikka - credential brute-force engine for authorized pentests
#[derive(Parser)]
#[command(name = "tiirikka")]
#[command(author = "Bountyy Oy <info@bountyy.fi>")]
#[command(version = "1.2.0")]
#[command(about = "Bounded-concurrency credential guessing against lab targets", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit one event per attempt instead of periodic progress snapshots
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug diagnostics on stderr
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate a combinatorial keyspace (charset + length range)
    Keyspace {
        /// Target username
        #[arg(short, long, required = true)]
        target: String,

        /// Charset preset (digits, lower, upper, alpha, alnum, strong)
        /// or a literal alphabet string
        #[arg(short, long, default_value = "digits")]
        charset: String,

        /// Minimum candidate length
        #[arg(long, default_value = "1")]
        min_length: u32,

        /// Maximum candidate length
        #[arg(long, default_value = "4")]
        max_length: u32,

        /// Base URL of the target application
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,

        /// Cap on dispatched attempts
        #[arg(short, long)]
        limit: Option<u64>,

        /// Maximum concurrent attempts in flight
        #[arg(long, default_value = "5000")]
        concurrency: usize,

        /// Progress snapshot period in seconds
        #[arg(long, default_value = "1")]
        progress_interval: u64,

        /// Request timeout in seconds
        #[arg(long, default_value = "30")]
        timeout: u64,

        /// Resume after this previously-emitted candidate
        #[arg(short, long)]
        resume: Option<String>,
    },

    /// Stream candidates from a line-oriented wordlist
    Wordlist {
        /// Target username
        #[arg(short, long, required = true)]
        target: String,

        /// Path to the wordlist file
        #[arg(short, long, required = true)]
        wordlist: PathBuf,

        /// Base URL of the target application
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,

        /// Cap on dispatched attempts
        #[arg(short, long)]
        limit: Option<u64>,

        /// Maximum concurrent attempts in flight
        #[arg(long, default_value = "500")]
        concurrency: usize,

        /// Progress snapshot period in seconds
        #[arg(long, default_value = "1")]
        progress_interval: u64,

        /// Request timeout in seconds
        #[arg(long, default_value = "30")]
        timeout: u64,
    },
}

fn build_config(cli: &Cli) -> Result<RunConfig, EngineError> {
    let config = match &cli.command {
        Commands::Keyspace {
            target,
            charset,
            min_length,
            max_length,
            url,
            limit,
            concurrency,
            progress_interval,
            timeout,
            resume,
        } => RunConfig {
            target: target.clone(),
            source: SourceSpec::Keyspace {
                charset: Charset::from_selector(charset)?,
                min_len: *min_length,
                max_len: *max_length,
                resume: resume.clone(),
            },
            base_url: url.clone(),
            limit: *limit,
            concurrency: *concurrency,
            progress_interval: Duration::from_secs(*progress_interval),
            verbose: cli.verbose,
            request_timeout: Duration::from_secs(*timeout),
        },
        Commands::Wordlist {
            target,
            wordlist,
            url,
            limit,
            concurrency,
            progress_interval,
            timeout,
        } => RunConfig {
            target: target.clone(),
            source: SourceSpec::Wordlist {
                path: wordlist.clone(),
            },
            base_url: url.clone(),
            limit: *limit,
            concurrency: *concurrency,
            progress_interval: Duration::from_secs(*progress_interval),
            verbose: cli.verbose,
            request_timeout: Duration::from_secs(*timeout),
        },
    };

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout is reserved for the event stream
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Configuration errors terminate before any network activity
    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(e.exit_code());
        }
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .thread_name("tiirikka-worker")
        .enable_all()
        .build()?;

    match runtime.block_on(engine::run(config)) {
        Ok(_report) => Ok(()),
        Err(e) => {
            EventSink::new().emit("fatal", json!({ "error": e.to_string() }));
            error!("{}", e);
            std::process::exit(e.exit_code());
        }
    }
}
