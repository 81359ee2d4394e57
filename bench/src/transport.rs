use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{header, Url};

use crate::error::BenchmarkError;

/// Result of one completed request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub status: u16,
    pub latency: Duration,
}

/// The single capability the dispatch engine needs from the HTTP layer:
/// issue one GET against the configured target and report its outcome.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self) -> Result<Outcome, BenchmarkError>;
}

#[derive(Debug)]
pub struct HttpTransport {
    url: Url,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(
        url: &str,
        timeout: Duration,
        workers: u32,
        disable_keepalive: bool,
        insecure: bool,
    ) -> Result<Self, BenchmarkError> {
        let url = Url::parse(url).map_err(|_| BenchmarkError::InvalidUrl(url.to_owned()))?;
        let idle_per_host = if disable_keepalive { 0 } else { workers as usize };
        let mut builder = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure)
            .timeout(timeout)
            .pool_max_idle_per_host(idle_per_host);
        if disable_keepalive {
            // Ask the server to close the connection as well.
            let mut headers = header::HeaderMap::new();
            headers.insert(header::CONNECTION, header::HeaderValue::from_static("close"));
            builder = builder.default_headers(headers);
        }
        let client = builder.build().map_err(BenchmarkError::CannotBuildClient)?;

        Ok(Self { url, client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self) -> Result<Outcome, BenchmarkError> {
        let started = Instant::now();
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| BenchmarkError::RequestFailed(e.to_string()))?;
        let latency = started.elapsed();
        let status = response.status().as_u16();

        // Drain and discard the body so the connection can return to the pool.
        response
            .bytes()
            .await
            .map_err(|e| BenchmarkError::RequestFailed(e.to_string()))?;

        Ok(Outcome { status, latency })
    }
}
