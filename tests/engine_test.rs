// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Run Orchestrator Tests
 * End-to-end runs against a stub target
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use tiirikka::charset::Charset;
use tiirikka::config::{RunConfig, SourceSpec};
use tiirikka::engine::{run, RunOutcome};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn keyspace_config(base_url: &str, charset: &str, min_len: u32, max_len: u32) -> RunConfig {
    RunConfig {
        target: "admin".to_string(),
        source: SourceSpec::Keyspace {
            charset: Charset::from_selector(charset).unwrap(),
            min_len,
            max_len,
            resume: None,
        },
        base_url: base_url.to_string(),
        limit: None,
        concurrency: 8,
        progress_interval: Duration::from_secs(60),
        verbose: false,
        request_timeout: Duration::from_secs(5),
    }
}

async fn mount_reject_all(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "success": false,
            "error": "invalid credentials",
        })))
        .with_priority(10)
        .mount(server)
        .await;
}

async fn mount_success_for(server: &MockServer, username: &str, password: &str) {
    Mock::given(method("POST"))
        .and(path("/api"))
        .and(body_json(serde_json::json!({
            "username": username,
            "password": password,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "user": { "id": 1, "username": username, "display_name": "Administrator" },
        })))
        .with_priority(1)
        .mount(server)
        .await;
}

/// Passwords the stub server saw, in arrival order
async fn received_passwords(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| {
            let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
            body["password"].as_str().unwrap().to_string()
        })
        .collect()
}

#[tokio::test]
async fn finds_the_planted_password_and_stops() {
    // Scenario: only password "7" logs in over digits of length 1
    let server = MockServer::start().await;
    mount_success_for(&server, "admin", "7").await;
    mount_reject_all(&server).await;

    let report = run(keyspace_config(&server.uri(), "digits", 1, 1))
        .await
        .unwrap();

    assert_eq!(report.outcome, RunOutcome::Succeeded);
    let found = report.found.unwrap();
    assert_eq!(found.candidate, "7");
    assert_eq!(found.user.username.as_deref(), Some("admin"));
    // run() only returns after the drain, so every dispatched attempt
    // has completed and been counted
    assert_eq!(report.attempts, report.dispatched);
    assert!(report.dispatched <= 10);
}

#[tokio::test]
async fn exhausts_the_keyspace_without_a_hit() {
    let server = MockServer::start().await;
    mount_reject_all(&server).await;

    let report = run(keyspace_config(&server.uri(), "digits", 1, 1))
        .await
        .unwrap();

    assert_eq!(report.outcome, RunOutcome::Exhausted);
    assert!(report.found.is_none());
    assert_eq!(report.attempts, 10);
    assert_eq!(report.transport_errors, 0);
}

#[tokio::test]
async fn stops_at_the_attempt_cap() {
    let server = MockServer::start().await;
    mount_reject_all(&server).await;

    let mut config = keyspace_config(&server.uri(), "digits", 1, 2);
    config.limit = Some(3);
    let report = run(config).await.unwrap();

    assert_eq!(report.outcome, RunOutcome::LimitReached);
    assert_eq!(report.dispatched, 3);
    assert_eq!(report.attempts, 3);
}

#[tokio::test]
async fn wordlist_skips_blank_and_framing_lines() {
    // Scenario: ["", "abc", "{", "def", "}"] attempts only abc and def
    let server = MockServer::start().await;
    mount_reject_all(&server).await;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"\nabc\n{\ndef\n}\n").unwrap();
    file.flush().unwrap();

    let mut config = keyspace_config(&server.uri(), "digits", 1, 1);
    config.source = SourceSpec::Wordlist {
        path: file.path().to_path_buf(),
    };
    config.concurrency = 1;
    let report = run(config).await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Exhausted);
    assert_eq!(report.skipped_lines, 3);
    assert_eq!(report.attempts, 2);
    assert_eq!(received_passwords(&server).await, vec!["abc", "def"]);
}

#[tokio::test]
async fn dispatch_order_is_identical_across_runs() {
    // With a concurrency bound of 1 arrival order equals dispatch order,
    // so two identical configurations must produce identical sequences
    let mut orders = Vec::new();
    for _ in 0..2 {
        let server = MockServer::start().await;
        mount_reject_all(&server).await;
        let mut config = keyspace_config(&server.uri(), "ab", 1, 2);
        config.concurrency = 1;
        run(config).await.unwrap();
        orders.push(received_passwords(&server).await);
    }

    assert_eq!(orders[0], vec!["a", "b", "aa", "ab", "ba", "bb"]);
    assert_eq!(orders[0], orders[1]);
}

#[tokio::test]
async fn missing_resume_cursor_completes_with_zero_attempts() {
    let server = MockServer::start().await;
    mount_reject_all(&server).await;

    let mut config = keyspace_config(&server.uri(), "digits", 1, 1);
    if let SourceSpec::Keyspace { ref mut resume, .. } = config.source {
        *resume = Some("zz".to_string());
    }
    let report = run(config).await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Exhausted);
    assert_eq!(report.resume_not_found.as_deref(), Some("zz"));
    assert_eq!(report.dispatched, 0);
    assert!(received_passwords(&server).await.is_empty());
}

#[tokio::test]
async fn resume_dispatches_only_the_suffix() {
    let server = MockServer::start().await;
    mount_reject_all(&server).await;

    let mut config = keyspace_config(&server.uri(), "ab", 1, 2);
    config.concurrency = 1;
    if let SourceSpec::Keyspace { ref mut resume, .. } = config.source {
        *resume = Some("aa".to_string());
    }
    let report = run(config).await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Exhausted);
    assert_eq!(received_passwords(&server).await, vec!["ab", "ba", "bb"]);
}

#[tokio::test]
async fn transport_errors_do_not_abort_the_run() {
    // Nothing listens on port 1: every attempt fails at the transport
    // layer and the run still exhausts cleanly
    let mut config = keyspace_config("http://127.0.0.1:1", "digits", 1, 1);
    config.concurrency = 2;
    let report = run(config).await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Exhausted);
    assert_eq!(report.attempts, 10);
    assert_eq!(report.transport_errors, 10);
    assert!(report.found.is_none());
}

#[tokio::test]
async fn invalid_configuration_fails_before_any_request() {
    let server = MockServer::start().await;
    mount_reject_all(&server).await;

    let mut config = keyspace_config(&server.uri(), "digits", 3, 1);
    config.concurrency = 4;
    let err = run(config).await.unwrap_err();

    assert!(err.is_fatal());
    assert!(received_passwords(&server).await.is_empty());
}

#[tokio::test]
async fn verbose_mode_still_finds_the_credential() {
    let server = MockServer::start().await;
    mount_success_for(&server, "admin", "3").await;
    mount_reject_all(&server).await;

    let mut config = keyspace_config(&server.uri(), "digits", 1, 1);
    config.verbose = true;
    let report = run(config).await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Succeeded);
    assert_eq!(report.found.unwrap().candidate, "3");
}
