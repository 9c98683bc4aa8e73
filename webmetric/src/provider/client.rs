//! HTTP transport used by the web metric provider.

use super::TransportError;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// A GET request ready to be sent.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    /// Target URL.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
}

/// Status code and raw body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// The full response body.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true if the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends GET requests.
///
/// Implementations are expected to enforce their own timeout and report it as
/// a [`TransportError`].
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends the request and reads the full body.
    async fn send(&self, request: ProbeRequest) -> Result<RawResponse, TransportError>;
}

/// [`HttpClient`] backed by `reqwest`.
///
/// The timeout covers the whole exchange, body included.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestClient {
    /// Creates a client bound to `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    /// The configured timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn transport_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else {
            TransportError::Http(err)
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: ProbeRequest) -> Result<RawResponse, TransportError> {
        debug!(url = %request.url, "Sending web metric request");

        let response = self
            .client
            .get(request.url)
            .headers(request.headers)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(self.timeout)
            } else {
                TransportError::Body(e.to_string())
            }
        })?;

        debug!(status, bytes = body.len(), "Received web metric response");

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}
