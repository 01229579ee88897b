//! The seam between the race engine and the network.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode, header};
use std::time::{Duration, Instant};

use komik_core::Error;

use super::error::FailureReason;
use super::mirror::Mirror;
use super::request::{ApiRequest, Method};

/// A successful (2xx) answer from one mirror.
#[derive(Debug, Clone)]
pub struct MirrorResponse {
    pub status: StatusCode,
    pub bytes: Bytes,
}

impl MirrorResponse {
    pub fn ok(bytes: impl Into<Bytes>) -> Self {
        Self { status: StatusCode::OK, bytes: bytes.into() }
    }
}

/// Performs one request against one mirror.
///
/// Implementations return `Err` for anything that is not a 2xx response.
/// Dropping the returned future must abort the request.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, mirror: &Mirror, request: &ApiRequest) -> Result<MirrorResponse, FailureReason>;
}

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// User agent string (default: desktop Chrome)
    pub user_agent: String,

    /// Per-request timeout; the race deadline normally fires first (default: 10s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: komik_core::config::DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_millis(10_000),
            max_redirects: 5,
        }
    }
}

/// reqwest-backed transport.
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Create a new transport with the given configuration.
    pub fn new(config: HttpConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpClient(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, mirror: &Mirror, request: &ApiRequest) -> Result<MirrorResponse, FailureReason> {
        let start = Instant::now();
        let url = mirror.url_for(&request.path);

        let mut builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        };
        builder = builder.header(header::ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FailureReason::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;

        tracing::debug!(
            "{} answered {} in {}ms ({} bytes)",
            mirror.name,
            request.path,
            start.elapsed().as_millis(),
            bytes.len()
        );

        Ok(MirrorResponse { status, bytes })
    }
}
