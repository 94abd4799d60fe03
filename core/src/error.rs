//! Error types for the Linker API client.
//!
//! # Design
//! Read operations surface an HTTP error status as the raw `Status` variant.
//! Write operations translate it into an `ApiException` that keeps the raw
//! `HttpStatusError` as its source. Transport and mapper failures pass
//! through untouched.

use thiserror::Error;

/// A non-2xx response, as received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("HTTP {status} {reason}")]
pub struct HttpStatusError {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

/// Domain error for a rejected write (create/update/tracking number).
///
/// `message` is the reason phrase of the response and `code` its status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiException {
    pub code: u16,
    pub message: String,
    #[source]
    pub source: HttpStatusError,
}

impl From<HttpStatusError> for ApiException {
    fn from(source: HttpStatusError) -> Self {
        Self {
            code: source.status,
            message: source.reason.clone(),
            source,
        }
    }
}

/// A network-level failure reported by a `Transport` (DNS, connect, timeout).
#[derive(Debug, Error)]
#[error("transport failure: {message}")]
pub struct TransportError {
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }
}

/// Errors returned by `LinkerClient` and `HttpApiClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Error status on a read operation, not translated.
    #[error(transparent)]
    Status(HttpStatusError),

    /// Error status on a write operation.
    #[error("API error {}: {}", .0.code, .0.message)]
    Api(#[from] ApiException),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status(e) => Some(e.status),
            ApiError::Api(e) => Some(e.code),
            _ => None,
        }
    }
}

/// Errors raised while loading `ClientConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("API key must not be empty")]
    EmptyApiKey,

    #[error("endpoint must not be empty")]
    EmptyEndpoint,
}
