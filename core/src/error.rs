//! Error types for the users API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `HttpError` with the raw
//! status code and body for debugging.
//!
//! `Transport` carries whatever the injected connection failed with. A replay
//! harness raises its assertion failures through it, so callers that need the
//! concrete error use `transport_source`.

use std::error::Error;
use std::fmt;

/// Errors returned by `UsersClient` and by `Connection` implementations.
#[derive(Debug)]
pub enum ApiError {
    /// The server returned 404.
    NotFound,

    /// The server returned a non-2xx status other than 404.
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),

    /// The base URL could not be turned into an endpoint.
    InvalidUrl(String),

    /// The connection failed before a response was available.
    Transport(Box<dyn Error + Send + Sync + 'static>),
}

impl ApiError {
    pub fn transport(source: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        ApiError::Transport(source.into())
    }

    /// Borrow the transport failure as `E` if that is what it holds.
    pub fn transport_source<E: Error + 'static>(&self) -> Option<&E> {
        match self {
            ApiError::Transport(source) => source.downcast_ref::<E>(),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound => write!(f, "resource not found"),
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
            ApiError::InvalidUrl(msg) => write!(f, "invalid url: {msg}"),
            ApiError::Transport(source) => write!(f, "transport failed: {source}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiError::Transport(source) => Some(source.as_ref()),
            _ => None,
        }
    }
}
