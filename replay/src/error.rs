use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use users_client::ApiError;

/// Request field compared during replay, in comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchField {
    Protocol,
    Verb,
    Host,
    Port,
    Path,
    Query,
    Headers,
    Body,
}

impl fmt::Display for MismatchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MismatchField::Protocol => "protocol",
            MismatchField::Verb => "verb",
            MismatchField::Host => "host",
            MismatchField::Port => "port",
            MismatchField::Path => "path",
            MismatchField::Query => "query",
            MismatchField::Headers => "headers",
            MismatchField::Body => "body",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("transcript mismatch on {field}: expected {expected:?}, got {actual:?}")]
    Mismatch {
        field: MismatchField,
        expected: String,
        actual: String,
    },
    #[error("transcript not exhausted: next line is {next_line:?}")]
    Exhausted { next_line: String },
    #[error("malformed url {0:?}: more than one '?'")]
    MalformedUrl(String),
    #[error("body is not valid json ({side}): {reason}")]
    InvalidJsonBody { side: &'static str, reason: String },
    #[error("transcript {path} line {line}: {reason}")]
    Transcript {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("transcript {path} ended in the middle of an exchange")]
    UnexpectedEof { path: PathBuf },
    #[error("transcript {path} has unsupported header {found:?}")]
    UnsupportedVersion { path: PathBuf, found: String },
    #[error("real network access denied for {method} {url}")]
    NetworkDenied { method: String, url: String },
    #[error("get_response called without a preceding request")]
    ResponseBeforeRequest,
    #[error("record mode needs credentials")]
    MissingCredentials,
    #[error("invalid test name {0:?}")]
    InvalidTestName(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("client error: {0}")]
    Client(#[from] ApiError),
}

impl ReplayError {
    pub fn mismatch(
        field: MismatchField,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        ReplayError::Mismatch {
            field,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Field that failed to match, if this is a mismatch.
    pub fn mismatch_field(&self) -> Option<MismatchField> {
        match self {
            ReplayError::Mismatch { field, .. } => Some(*field),
            _ => None,
        }
    }
}

impl From<ReplayError> for ApiError {
    fn from(err: ReplayError) -> Self {
        match err {
            ReplayError::Client(inner) => inner,
            other => ApiError::transport(other),
        }
    }
}

/// Pull a harness failure back out of a client error.
pub fn replay_error(err: &ApiError) -> Option<&ReplayError> {
    err.transport_source::<ReplayError>()
}
