//! HTTP fetching.
//!
//! [`Fetch`] is the seam between the pipeline and the network. Each call is
//! a single GET with no retry; any transport failure, timeout, or non-2xx
//! status comes back as a [`FetchError`] carrying the URL.

use crate::config::PipelineConfig;
use crate::error::{ConfigError, FetchError};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Retrieve the markup behind a URL.
///
/// The pipeline awaits every fetch in place on the calling task and never
/// spawns one, so the returned future carries no `Send` bound. Test
/// fetchers rely on that to record requests in a `RefCell`.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`Fetch`] over a shared `reqwest` client with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Build a client with the given per-request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if `reqwest` cannot build the client, e.g.
    /// when the TLS backend fails to initialize.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ConfigError::Invalid(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client, timeout })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        Self::new(config.request_timeout(), &config.user_agent)
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::new(url, format!("request timed out after {:?}", self.timeout))
            } else {
                FetchError::new(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Non-success status");
            return Err(FetchError::new(
                url,
                format!(
                    "HTTP {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::new(url, format!("failed to read body: {e}")))?;
        debug!(
            %url,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}
