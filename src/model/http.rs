//! HTTP transport boundary
//!
//! The session client never talks to `reqwest` directly: every login, logout and
//! business call goes through a [`Transport`]. [`ReqwestTransport`] is the
//! production implementation; tests plug in their own.

use crate::application::config::ClientConfig;
use crate::constants::USER_AGENT;
use crate::error::AppError;
use crate::model::requests::RequestBody;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// A fully resolved request, ready to be sent
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Headers computed for this call
    pub headers: HeaderMap,
    /// Query string parameters
    pub params: Vec<(String, String)>,
    /// Optional payload
    pub body: Option<RequestBody>,
}

/// Raw outcome of a successful (2xx) call
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body as text, possibly empty
    pub body: String,
}

/// Failure reported by a transport
///
/// Non-2xx answers are failures too; in that case `status` and `body` carry what
/// the backend returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportError {
    /// HTTP status, when the backend answered
    pub status: Option<u16>,
    /// Response body, when the backend answered
    pub body: Option<String>,
    /// Human readable description
    pub message: String,
}

impl TransportError {
    /// Error for a call that never produced an HTTP answer
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: None,
            body: None,
            message: message.into(),
        }
    }

    /// Error for a call the backend answered with a non-success status
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            body: Some(body.into()),
            message: format!("request failed with status {status}"),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            Some(body) if !body.is_empty() => write!(f, "{}: {}", self.message, body),
            _ => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        Self {
            status: e.status().map(|s| s.as_u16()),
            body: None,
            message: e.to_string(),
        }
    }
}

/// Generic HTTP executor used by the session client
#[async_trait]
pub trait Transport: Send + Sync {
    /// Executes one request and returns the raw outcome
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// [`Transport`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Builds the transport from the client configuration
    ///
    /// Certificate verification stays on unless `accept_invalid_certs` is set.
    ///
    /// # Arguments
    /// * `config` - Client configuration (TLS policy and timeout are read from it)
    ///
    /// # Returns
    /// * `Ok(ReqwestTransport)` - Ready to use transport
    /// * `Err(AppError)` - If the underlying client cannot be built
    pub fn new(config: &ClientConfig) -> Result<Self, AppError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);

        if config.accept_invalid_certs {
            warn!("TLS certificate verification is disabled for {}", config.base_url);
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        Ok(Self {
            http: builder.build()?,
        })
    }

    /// Wraps an already configured `reqwest` client
    pub fn from_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .http
            .request(request.method.clone(), &request.url)
            .headers(request.headers);

        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }

        builder = match request.body {
            Some(RequestBody::Json(value)) => {
                let bytes = serde_json::to_vec(&value)
                    .map_err(|e| TransportError::network(format!("invalid json body: {e}")))?;
                builder.body(bytes)
            }
            Some(RequestBody::Text(text)) => builder.body(text),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(TransportError::from_status(status.as_u16(), body));
        }

        Ok(TransportResponse {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}
