//! Error types for the Service Layer client

use crate::model::http::TransportError;
use std::fmt;

/// Coarse classification of client failures
///
/// This is what the client remembers about its last failed call, since the
/// full [`AppError`] is handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The login call was rejected or never reached the backend
    AuthenticationFailure,
    /// A business request failed at the transport level
    RequestFailure,
    /// A one-shot action was invoked without a target path
    MissingUrl,
    /// Anything else (bad header, serialization, I/O)
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::AuthenticationFailure => "authentication failure",
            ErrorKind::RequestFailure => "request failure",
            ErrorKind::MissingUrl => "missing url",
            ErrorKind::Other => "other",
        };
        write!(f, "{name}")
    }
}

/// Main error type of the library
#[derive(Debug)]
pub enum AppError {
    /// Login was rejected or the login call failed
    AuthenticationFailure(String),
    /// The transport failed to execute a business request
    RequestFailure(TransportError),
    /// An action was requested without a URL
    MissingUrl,
    /// Caller supplied an invalid value (header name, header value...)
    InvalidInput(String),
    /// Failure building the underlying HTTP client
    Http(reqwest::Error),
    /// JSON (de)serialization failure
    Json(serde_json::Error),
    /// I/O failure
    Io(std::io::Error),
}

impl AppError {
    /// Returns the taxonomy bucket of this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::AuthenticationFailure(_) => ErrorKind::AuthenticationFailure,
            AppError::RequestFailure(_) => ErrorKind::RequestFailure,
            AppError::MissingUrl => ErrorKind::MissingUrl,
            AppError::InvalidInput(_) | AppError::Http(_) | AppError::Json(_) | AppError::Io(_) => {
                ErrorKind::Other
            }
        }
    }

    /// HTTP status carried by the error, when the backend answered at all
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::RequestFailure(e) => e.status,
            AppError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::AuthenticationFailure(msg) => write!(f, "authentication failure: {msg}"),
            AppError::RequestFailure(e) => write!(f, "request failure: {e}"),
            AppError::MissingUrl => write!(f, "url request not given"),
            AppError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            AppError::Http(e) => write!(f, "http error: {e}"),
            AppError::Json(e) => write!(f, "json error: {e}"),
            AppError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::RequestFailure(e) => Some(e),
            AppError::Http(e) => Some(e),
            AppError::Json(e) => Some(e),
            AppError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Http(e)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Json(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e)
    }
}

impl From<TransportError> for AppError {
    fn from(e: TransportError) -> Self {
        AppError::RequestFailure(e)
    }
}
