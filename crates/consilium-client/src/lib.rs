//! Blocking HTTP collaborator for the unified process search API.
//!
//! All transport resilience lives here: a jittered rate-limit delay before
//! each request, retry with exponential backoff for transient failures
//! (connection errors, bad gateways, malformed JSON), and normalization of
//! `204 No Content` to an empty list. The search engines see only the
//! [`PageFetcher`] seam: a blocking call that returns a decoded JSON value
//! or a fatal error once the attempt budget is spent.

use std::thread;
use std::time::Duration;

use consilium_core::ClientConfig;
use rand::Rng;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

/// One page fetch against the remote API.
///
/// The engines treat this as an opaque blocking function; rate limiting
/// and retries happen behind it. Engine tests substitute an in-memory
/// implementation.
pub trait PageFetcher {
    fn fetch_page(&self, path: &str) -> Result<Value, ClientError>;
}

/// HTTP client for the court's public search API.
pub struct ApiClient {
    http: reqwest::blocking::Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GET a path under the API root and decode the JSON body.
    ///
    /// Sleeps a uniformly-random duration in the configured wait window
    /// before every attempt. Failed attempts are retried with exponential
    /// backoff until the attempt budget is spent; the last error then
    /// propagates as fatal.
    pub fn get(&self, path: &str) -> Result<Value, ClientError> {
        let url = format!("{}{}{}", self.config.base_url, self.config.api_route, path);
        let mut backoff = self.config.retry_base_delay;

        for attempt in 1..=self.config.max_attempts {
            self.rate_limit_wait();
            match self.try_get(&url) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt == self.config.max_attempts {
                        return Err(err);
                    }
                    warn!(
                        attempt,
                        max_attempts = self.config.max_attempts,
                        wait_secs = backoff.as_secs_f64(),
                        error = %err,
                        "request failed, retrying"
                    );
                    thread::sleep(backoff);
                    backoff *= 2;
                }
            }
        }

        unreachable!("attempt budget is at least one")
    }

    fn try_get(&self, url: &str) -> Result<Value, ClientError> {
        debug!(url = %url, "GET");
        let response = self.http.get(url).send()?;
        let status = response.status();

        // The API reports "no content" rather than an empty result list.
        if status.as_u16() == 204 {
            return Ok(Value::Array(Vec::new()));
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text()?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Rate limiting: sleep a random duration inside the wait window.
    fn rate_limit_wait(&self) {
        let min = self.config.min_wait.as_secs_f64();
        let max = self.config.max_wait.as_secs_f64();
        if max <= 0.0 {
            return;
        }
        let wait = rand::thread_rng().gen_range(min..=max);
        thread::sleep(Duration::from_secs_f64(wait));
    }
}

impl PageFetcher for ApiClient {
    fn fetch_page(&self, path: &str) -> Result<Value, ClientError> {
        self.get(path)
    }
}
