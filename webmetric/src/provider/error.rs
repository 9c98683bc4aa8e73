//! Error types for providers.

use crate::extract::{CompileError, ExtractError};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while building a provider.
///
/// These are fatal to provider setup, never to an individual measurement.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The metric's JSONPath expression does not compile.
    #[error(transparent)]
    JsonPath(#[from] CompileError),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Errors reported by an [`HttpClient`](super::HttpClient).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request did not complete within the timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The request failed.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be read.
    #[error("Received no bytes in response: {0}")]
    Body(String),

    /// Failure reported by a non-reqwest client.
    #[error("{0}")]
    Other(String),
}

/// Everything that can go wrong while taking one measurement.
///
/// Each of these turns the measurement into [`Phase::Error`](crate::models::Phase::Error);
/// the variant only survives in the measurement message.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The target URL could not be parsed.
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        /// The URL as configured.
        url: String,
        /// The parser error.
        #[source]
        source: url::ParseError,
    },

    /// A header name or value is not valid HTTP.
    #[error("invalid header '{key}': {reason}")]
    InvalidHeader {
        /// The header name as configured.
        key: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The request could not be sent or timed out.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response status is outside the 2xx range.
    #[error("received non-2xx response code: {0}")]
    UnexpectedStatus(u16),

    /// The response status is 2xx but not 200.
    #[error("received non-200 response code: {0}")]
    NonOkStatus(u16),

    /// The body could not be parsed or the path did not match.
    #[error(transparent)]
    Extract(#[from] ExtractError),
}
