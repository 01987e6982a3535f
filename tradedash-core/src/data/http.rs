//! HTTP snapshot source.
//!
//! Fetches a CSV object (e.g. an object-store URL) with a blocking client.
//! Connect errors, timeouts, 429 and 5xx responses are retried with
//! exponential backoff; any other failure is returned immediately.

use super::source::{SnapshotSource, SourceError};
use std::time::Duration;

/// Connection options for [`HttpSource`].
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub timeout: Duration,
    pub max_retries: u32,
    pub base_delay: Duration,
    /// Sent as `Authorization: Bearer <token>` when present.
    pub bearer_token: Option<String>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            bearer_token: None,
        }
    }
}

/// Snapshot fetched over HTTP(S).
pub struct HttpSource {
    client: reqwest::blocking::Client,
    url: String,
    options: HttpOptions,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, options: HttpOptions) -> Result<Self, SourceError> {
        let url = url.into();
        let client = reqwest::blocking::Client::builder()
            .timeout(options.timeout)
            .user_agent(concat!("tradedash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::unavailable(&url, format!("http client: {e}")))?;

        Ok(Self {
            client,
            url,
            options,
        })
    }

    fn fetch_with_retry(&self) -> Result<Vec<u8>, SourceError> {
        let mut last_error = None;

        for attempt in 0..=self.options.max_retries {
            if attempt > 0 {
                let delay = backoff_delay(self.options.base_delay, attempt);
                tracing::warn!(url = %self.url, attempt, ?delay, "retrying snapshot fetch");
                std::thread::sleep(delay);
            }

            let mut request = self.client.get(&self.url);
            if let Some(token) = &self.options.bearer_token {
                request = request.bearer_auth(token);
            }

            match request.send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
                    {
                        last_error = Some(SourceError::unavailable(&self.url, format!("HTTP {status}")));
                        continue;
                    }

                    if !status.is_success() {
                        return Err(SourceError::unavailable(&self.url, format!("HTTP {status}")));
                    }

                    match resp.bytes() {
                        Ok(body) => return Ok(body.to_vec()),
                        Err(e) if e.is_timeout() => {
                            last_error = Some(SourceError::unavailable(&self.url, e));
                            continue;
                        }
                        Err(e) => return Err(SourceError::unavailable(&self.url, e)),
                    }
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(SourceError::unavailable(&self.url, e));
                        continue;
                    }
                    return Err(SourceError::unavailable(&self.url, e));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| SourceError::unavailable(&self.url, "max retries exceeded")))
    }
}

/// `base * 2^(attempt - 1)` for retry `attempt >= 1`, saturating instead of overflowing.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}

impl SnapshotSource for HttpSource {
    fn name(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> Result<Vec<u8>, SourceError> {
        tracing::info!(url = %self.url, "fetching snapshot");
        self.fetch_with_retry()
    }
}
