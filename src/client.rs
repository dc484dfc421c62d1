// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Attempt Executor
 * One authentication attempt over a pooled connection
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::errors::{EngineError, EngineResult};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// How long idle pooled connections are kept alive
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
const TCP_KEEPALIVE: Duration = Duration::from_secs(60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Identity record returned by the target on a successful login
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    user: Option<UserRecord>,
}

/// Classified result of one authentication attempt
#[derive(Debug)]
pub enum Outcome {
    /// HTTP 200 with a well-formed identity payload
    Success(UserRecord),
    /// Definitive rejection (or a malformed success body) with the status
    Failure(u16),
    /// Connection reset, timeout, DNS failure - reported, never fatal
    TransportError(String),
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Issues authentication attempts over a reused, size-bounded connection
/// pool
pub struct LoginClient {
    client: Client,
    api_url: String,
}

impl LoginClient {
    /// Build a client whose pool is sized to the concurrency bound
    ///
    /// Connect and total-request timeouts are independent so a single
    /// stalled peer cannot occupy a slot indefinitely.
    pub fn new(base_url: &str, concurrency: usize, request_timeout: Duration) -> EngineResult<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(concurrency)
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .tcp_keepalive(TCP_KEEPALIVE)
            .tcp_nodelay(true)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(request_timeout)
            .build()
            .map_err(|e| EngineError::Pool(e.to_string()))?;

        Ok(Self {
            client,
            api_url: format!("{}/api", base_url.trim_end_matches('/')),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Perform one authentication attempt and classify the outcome
    ///
    /// Network failures are swallowed into `Outcome::TransportError` here;
    /// they never propagate to the orchestrator.
    pub async fn attempt(&self, username: &str, password: &str) -> Outcome {
        let body = LoginRequest { username, password };

        let response = match self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Outcome::TransportError(classify_transport(&e)),
        };

        let status = response.status();
        if status == StatusCode::OK {
            match response.json::<LoginResponse>().await {
                Ok(LoginResponse { user: Some(user) }) => Outcome::Success(user),
                Ok(LoginResponse { user: None }) => {
                    // Malformed success payload: treated as a failure, not
                    // a fatal condition
                    debug!("200 response without a user object from {}", self.api_url);
                    Outcome::Failure(status.as_u16())
                }
                Err(e) => {
                    debug!("unparseable success body from {}: {}", self.api_url, e);
                    Outcome::Failure(status.as_u16())
                }
            }
        } else {
            // Drain the rejection body chunk by chunk so the pooled
            // connection can be reused without buffering the whole body
            let mut response = response;
            while let Ok(Some(_)) = response.chunk().await {}
            Outcome::Failure(status.as_u16())
        }
    }
}

/// Short transport failure description for the event stream
fn classify_transport(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("timeout: {}", err)
    } else if err.is_connect() {
        format!("connect: {}", err)
    } else {
        err.to_string()
    }
}
