// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Telemetry Reporter
 * Structured event stream and time-driven progress snapshots
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::client::UserRecord;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Writes one JSON object per line to stdout
///
/// stdout belongs to the machine-readable event stream; human diagnostics
/// go to stderr via `tracing`. Every object carries at least `timestamp`
/// and `event`.
#[derive(Debug, Clone, Default)]
pub struct EventSink;

impl EventSink {
    pub fn new() -> Self {
        Self
    }

    /// Emit one event line; `fields` must be a JSON object
    pub fn emit(&self, event: &str, fields: Value) {
        let mut object = serde_json::Map::new();
        object.insert(
            "timestamp".to_string(),
            json!(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        object.insert("event".to_string(), json!(event));
        if let Value::Object(map) = fields {
            object.extend(map);
        }
        println!("{}", Value::Object(object));
    }
}

/// Counter snapshot read by the periodic reporter
///
/// The reporter only ever reads these copies; it never touches the
/// orchestrator's live state.
#[derive(Debug, Clone)]
pub struct ProgressSnapshot {
    pub attempts: u64,
    pub dispatched: u64,
    pub last_candidate: Option<String>,
    pub elapsed: Duration,
}

/// Spawn the time-driven progress emitter
///
/// Fires at a fixed period independent of attempt completions, which
/// keeps the hot dispatch path free of any logging cost. The caller
/// aborts the handle once the run has drained.
pub fn spawn_progress_reporter<F>(
    sink: EventSink,
    period: Duration,
    total: Option<u64>,
    concurrency: usize,
    snapshot: F,
) -> JoinHandle<()>
where
    F: Fn() -> ProgressSnapshot + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick completes immediately; skip it so the first
        // snapshot lands one full period into the run
        interval.tick().await;

        loop {
            interval.tick().await;
            let snap = snapshot();
            let elapsed_sec = snap.elapsed.as_secs_f64();
            let rate = if elapsed_sec > 0.0 {
                snap.attempts as f64 / elapsed_sec
            } else {
                0.0
            };
            let progress = total
                .filter(|&t| t > 0)
                .map(|t| format!("{:.2}%", snap.attempts as f64 * 100.0 / t as f64));

            sink.emit(
                "progress",
                json!({
                    "attempts": snap.attempts,
                    "dispatched": snap.dispatched,
                    "total_candidates": total,
                    "progress": progress,
                    "concurrency": concurrency,
                    "elapsed_sec": round2(elapsed_sec),
                    "rate_per_sec": rate.round() as u64,
                    "last_candidate": snap.last_candidate,
                }),
            );
        }
    })
}

/// Human-readable summary on stderr when the credential is found
///
/// The JSON `success` event on stdout is the authoritative record; this
/// is for the operator watching the terminal.
pub fn print_success_banner(
    target: &str,
    password: &str,
    attempts: u64,
    elapsed: Duration,
    user: &UserRecord,
) {
    debug!("printing success banner for target {}", target);
    let user_line = serde_json::to_string(user).unwrap_or_else(|_| "n/a".to_string());
    eprintln!();
    eprintln!("==============================================================");
    eprintln!("               CREDENTIAL FOUND");
    eprintln!("==============================================================");
    eprintln!("  target   : {}", target);
    eprintln!("  password : {}", password);
    eprintln!("  attempts : {}", attempts);
    eprintln!("  elapsed  : {:.2}s", elapsed.as_secs_f64());
    eprintln!("  user     : {}", user_line);
    eprintln!("==============================================================");
    eprintln!();
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[test]
    fn round2_truncates_to_two_decimals() {
        assert_eq!(round2(1.2345), 1.23);
        assert_eq!(round2(0.005), 0.01);
    }

    #[tokio::test(start_paused = true)]
    async fn reporter_reads_snapshots_at_each_period() {
        let reads = Arc::new(AtomicU64::new(0));
        let reads_in_task = reads.clone();
        let handle = spawn_progress_reporter(
            EventSink::new(),
            Duration::from_secs(1),
            Some(100),
            5,
            move || {
                reads_in_task.fetch_add(1, Ordering::SeqCst);
                ProgressSnapshot {
                    attempts: 10,
                    dispatched: 12,
                    last_candidate: Some("0042".to_string()),
                    elapsed: Duration::from_secs(2),
                }
            },
        );

        tokio::time::sleep(Duration::from_millis(3500)).await;
        handle.abort();
        assert!(reads.load(Ordering::SeqCst) >= 3);
    }
}
