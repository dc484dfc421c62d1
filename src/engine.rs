// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Run Orchestrator
 * Dispatch loop, run state and termination protocol
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::admission::AdmissionController;
use crate::client::{LoginClient, Outcome, UserRecord};
use crate::config::{RunConfig, SourceSpec};
use crate::errors::{EngineError, EngineResult};
use crate::events::{print_success_banner, round2, spawn_progress_reporter, EventSink};
use crate::events::ProgressSnapshot;
use crate::source::build_source;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Terminal states of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The correct credential was found
    Succeeded,
    /// The candidate source ran dry without a hit
    Exhausted,
    /// The configured attempt cap was reached
    LimitReached,
    /// The operator interrupted the run
    Aborted,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Succeeded => "found",
            RunOutcome::Exhausted => "not_found",
            RunOutcome::LimitReached => "limit_reached",
            RunOutcome::Aborted => "aborted",
        }
    }
}

/// The winning attempt
#[derive(Debug, Clone)]
pub struct FoundCredential {
    pub candidate: String,
    pub user: UserRecord,
    /// Completion-order attempt number; ties between concurrent successes
    /// are broken by completion order, which is non-deterministic
    pub attempt: u64,
}

/// Final accounting for a completed run
#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub attempts: u64,
    pub dispatched: u64,
    pub transport_errors: u64,
    pub skipped_lines: u64,
    pub found: Option<FoundCredential>,
    /// Set when a resume cursor never matched: the run completed with
    /// zero attempts and an explicit warning
    pub resume_not_found: Option<String>,
    pub elapsed: Duration,
}

/// Cross-attempt mutable state, owned by the orchestrator
///
/// Mutated only from completion handlers; the telemetry reporter reads
/// snapshots and never writes.
struct RunState {
    dispatched: AtomicU64,
    completed: AtomicU64,
    transport_errors: AtomicU64,
    found: AtomicBool,
    winner: Mutex<Option<FoundCredential>>,
    last_candidate: Mutex<Option<String>>,
    started: Instant,
}

impl RunState {
    fn new() -> Self {
        Self {
            dispatched: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            transport_errors: AtomicU64::new(0),
            found: AtomicBool::new(false),
            winner: Mutex::new(None),
            last_candidate: Mutex::new(None),
            started: Instant::now(),
        }
    }

    fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            attempts: self.completed.load(Ordering::Relaxed),
            dispatched: self.dispatched.load(Ordering::Relaxed),
            last_candidate: self.last_candidate.lock().clone(),
            elapsed: self.started.elapsed(),
        }
    }
}

/// Record one attempt completion
///
/// This is the only place counters and the found flag change. Only the
/// first success captures the winning candidate; later completions are
/// recorded for counters but never overwrite it.
fn record_completion(
    state: &RunState,
    sink: &EventSink,
    verbose: bool,
    target: &str,
    candidate: String,
    outcome: Outcome,
) {
    let attempt = state.completed.fetch_add(1, Ordering::SeqCst) + 1;
    *state.last_candidate.lock() = Some(candidate.clone());

    match outcome {
        Outcome::Success(user) => {
            if verbose {
                sink.emit(
                    "hit",
                    json!({
                        "attempt": attempt,
                        "target": target,
                        "candidate": candidate,
                        "status": 200,
                    }),
                );
            }
            if !state.found.swap(true, Ordering::SeqCst) {
                let elapsed = state.started.elapsed();
                *state.winner.lock() = Some(FoundCredential {
                    candidate: candidate.clone(),
                    user: user.clone(),
                    attempt,
                });
                print_success_banner(target, &candidate, attempt, elapsed, &user);
                sink.emit(
                    "success",
                    json!({
                        "target": target,
                        "candidate": candidate,
                        "attempt": attempt,
                        "elapsed_sec": round2(elapsed.as_secs_f64()),
                        "user": user,
                    }),
                );
            }
        }
        Outcome::Failure(status) => {
            if verbose {
                sink.emit(
                    "miss",
                    json!({
                        "attempt": attempt,
                        "target": target,
                        "candidate": candidate,
                        "status": status,
                    }),
                );
            }
        }
        Outcome::TransportError(error) => {
            state.transport_errors.fetch_add(1, Ordering::SeqCst);
            sink.emit(
                "request_error",
                json!({
                    "attempt": attempt,
                    "candidate": candidate,
                    "error": error,
                }),
            );
        }
    }
}

/// Resolves when the operator requests an abort
async fn abort_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available: aborting is simply never triggered
        std::future::pending::<()>().await;
    }
}

fn start_fields(config: &RunConfig, total: Option<u64>) -> serde_json::Value {
    let mut fields = json!({
        "target": config.target,
        "mode": config.mode(),
        "api_url": config.api_url(),
        "limit": config.limit.map_or(json!("unlimited"), |l| json!(l)),
        "concurrency": config.concurrency,
        "verbose": config.verbose,
        "total_candidates": total.map_or(json!("unknown"), |t| json!(t)),
    });
    let extra = match &config.source {
        SourceSpec::Keyspace {
            charset,
            min_len,
            max_len,
            resume,
        } => json!({
            "charset": format!("{} ({} chars)", charset.label(), charset.len()),
            "charset_preview": charset.preview(),
            "min_length": min_len,
            "max_length": max_len,
            "resume": resume.as_deref().unwrap_or("none"),
        }),
        SourceSpec::Wordlist { path } => json!({
            "wordlist": path.display().to_string(),
        }),
    };
    if let (Some(fields), serde_json::Value::Object(extra)) = (fields.as_object_mut(), extra) {
        fields.extend(extra);
    }
    fields
}

/// Drive a full run to one of its terminal states
///
/// Candidates are dispatched in enumeration order but may complete out of
/// order. Setting the found flag is the only cancellation signal:
/// outstanding attempts are never forcibly aborted, their results are
/// discarded by the found-flag check. Before returning, every admission
/// permit is reacquired, which proves no attempt is still in flight; the
/// connection pool is dropped only after that.
pub async fn run(config: RunConfig) -> EngineResult<RunReport> {
    config.validate()?;

    let mut source = build_source(&config.source)?;
    let total = source.total();
    let client = Arc::new(LoginClient::new(
        &config.base_url,
        config.concurrency,
        config.request_timeout,
    )?);
    let admission = AdmissionController::new(config.concurrency);
    let state = Arc::new(RunState::new());
    let sink = EventSink::new();

    sink.emit("start", start_fields(&config, total));
    info!(
        "run started: target={} mode={} concurrency={}",
        config.target,
        config.mode(),
        config.concurrency
    );

    // Periodic snapshots are the default; verbose mode reports from the
    // completion handlers instead
    let reporter = (!config.verbose).then(|| {
        let state = state.clone();
        spawn_progress_reporter(
            sink.clone(),
            config.progress_interval,
            total,
            config.concurrency,
            move || state.snapshot(),
        )
    });

    let mut abort = Box::pin(abort_signal());
    let mut resume_not_found: Option<String> = None;

    let loop_outcome = loop {
        if state.found.load(Ordering::SeqCst) {
            break RunOutcome::Succeeded;
        }

        let candidate = match source.next_candidate() {
            Ok(Some(candidate)) => candidate,
            Ok(None) => break RunOutcome::Exhausted,
            Err(EngineError::ResumeNotFound { cursor }) => {
                resume_not_found = Some(cursor);
                break RunOutcome::Exhausted;
            }
            Err(e) => {
                // Fatal source failure mid-run: still account for every
                // in-flight attempt before propagating
                admission.drain().await;
                if let Some(handle) = &reporter {
                    handle.abort();
                }
                return Err(e);
            }
        };

        if let Some(limit) = config.limit {
            if state.dispatched.load(Ordering::SeqCst) >= limit {
                sink.emit(
                    "limit_reached",
                    json!({
                        "limit": limit,
                        "attempts": state.dispatched.load(Ordering::SeqCst),
                    }),
                );
                break RunOutcome::LimitReached;
            }
        }

        let permit = tokio::select! {
            biased;
            _ = &mut abort => break RunOutcome::Aborted,
            permit = admission.admit() => permit,
        };

        // A success may have landed while waiting for admission
        if state.found.load(Ordering::SeqCst) {
            drop(permit);
            break RunOutcome::Succeeded;
        }

        state.dispatched.fetch_add(1, Ordering::SeqCst);
        let client = client.clone();
        let state = state.clone();
        let sink = sink.clone();
        let target = config.target.clone();
        let verbose = config.verbose;
        tokio::spawn(async move {
            let outcome = client.attempt(&target, &candidate).await;
            record_completion(&state, &sink, verbose, &target, candidate, outcome);
            drop(permit);
        });
    };

    // Completion proof: reacquiring the full capacity is only possible
    // once every dispatched attempt has released its permit
    admission.drain().await;
    if let Some(handle) = reporter {
        handle.abort();
    }

    // A success that landed during the drain still wins the run
    let outcome = if state.found.load(Ordering::SeqCst) {
        RunOutcome::Succeeded
    } else {
        loop_outcome
    };

    let attempts = state.completed.load(Ordering::SeqCst);
    let dispatched = state.dispatched.load(Ordering::SeqCst);
    let transport_errors = state.transport_errors.load(Ordering::SeqCst);
    let skipped_lines = source.skipped_lines();
    let elapsed = state.started.elapsed();
    let elapsed_sec = elapsed.as_secs_f64();
    let rate = if elapsed_sec > 0.0 {
        (attempts as f64 / elapsed_sec).round() as u64
    } else {
        0
    };
    let winner = state.winner.lock().clone();

    if let Some(cursor) = &resume_not_found {
        warn!(
            "resume cursor \"{}\" never appeared in the sequence; no attempts were made",
            cursor
        );
    }

    match outcome {
        RunOutcome::Exhausted => {
            sink.emit(
                "exhausted",
                json!({
                    "target": config.target,
                    "total_attempts": attempts,
                    "total_candidates": total,
                    "skipped_lines": skipped_lines,
                    "resume_not_found": resume_not_found,
                    "elapsed_sec": round2(elapsed_sec),
                }),
            );
        }
        RunOutcome::Aborted => {
            warn!("run aborted by operator after {} attempts", attempts);
        }
        // limit_reached was emitted when the loop broke; the success
        // event came from the winning completion handler
        RunOutcome::LimitReached | RunOutcome::Succeeded => {}
    }

    sink.emit(
        "end",
        json!({
            "result": outcome.as_str(),
            "target": config.target,
            "candidate": winner.as_ref().map(|w| w.candidate.clone()),
            "total_attempts": attempts,
            "total_candidates": total,
            "elapsed_sec": round2(elapsed_sec),
            "rate_per_sec": rate,
        }),
    );

    Ok(RunReport {
        outcome,
        attempts,
        dispatched,
        transport_errors,
        skipped_lines,
        found: winner,
        resume_not_found,
        elapsed,
    })
}
