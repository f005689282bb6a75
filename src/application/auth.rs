//! Session state and authentication headers
//!
//! This module holds the pieces of the authentication state machine that do not
//! need the network:
//! - The [`SessionState`] triple (id, start, expiry) and its expiry rule
//! - The observable [`AuthState`]
//! - Computation of the per-request authentication headers for both modes

use crate::application::config::{AuthenticationMode, Credentials};
use crate::constants::{MILLIS_PER_MINUTE, ROUTE_ID, SESSION_COOKIE_NAME};
use crate::error::AppError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Duration, Utc};
use pretty_simple_display::{DebugPretty, DisplaySimple};
use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

/// Observable authentication state of a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthState {
    /// No session
    Unauthenticated,
    /// A session exists and is outside the expiry guard
    Authenticated,
    /// A session exists but is inside the expiry guard (or past its expiry)
    Expired,
}

/// Current Service Layer session
///
/// Invariant: when `session_id` is `None`, `expires_at` is `None` too. The
/// constructors below are the only way the client builds one.
#[derive(DebugPretty, DisplaySimple, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Identifier returned by `Login`
    pub session_id: Option<String>,
    /// When the login call was issued
    pub started_at: Option<DateTime<Utc>>,
    /// When the backend will drop the session
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionState {
    /// An empty session
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the session established by a successful login
    ///
    /// # Arguments
    /// * `session_id` - Identifier returned by the backend
    /// * `started_at` - Timestamp taken right before the login call
    /// * `timeout_minutes` - `SessionTimeout` reported by the backend
    ///
    /// # Returns
    /// * `None` if the expiry does not fit in a timestamp
    pub fn established(
        session_id: impl Into<String>,
        started_at: DateTime<Utc>,
        timeout_minutes: i64,
    ) -> Option<Self> {
        let expires_at = timeout_minutes
            .checked_mul(MILLIS_PER_MINUTE)
            .and_then(Duration::try_milliseconds)
            .and_then(|timeout| started_at.checked_add_signed(timeout))?;
        Some(Self {
            session_id: Some(session_id.into()),
            started_at: Some(started_at),
            expires_at: Some(expires_at),
        })
    }

    /// Whether a session identifier is present
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session_id.is_some()
    }

    /// Checks if the session is expired or will expire within the guard
    ///
    /// # Arguments
    /// * `guard_ms` - Safety margin in milliseconds
    ///
    /// # Returns
    /// * `true` if there is no expiry, or `expires_at - guard <= now`
    #[must_use]
    pub fn is_expired(&self, guard_ms: i64) -> bool {
        self.is_expired_at(Utc::now(), guard_ms)
    }

    /// Same as [`is_expired`](Self::is_expired) against an explicit clock reading
    ///
    /// A guard too large to subtract from the expiry counts as expired.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>, guard_ms: i64) -> bool {
        match (&self.session_id, self.expires_at) {
            (Some(_), Some(expires_at)) => Duration::try_milliseconds(guard_ms)
                .and_then(|guard| expires_at.checked_sub_signed(guard))
                .is_none_or(|renew_at| renew_at <= now),
            _ => true,
        }
    }

    /// Observable state against the given guard
    #[must_use]
    pub fn auth_state(&self, guard_ms: i64) -> AuthState {
        if !self.is_active() {
            AuthState::Unauthenticated
        } else if self.is_expired(guard_ms) {
            AuthState::Expired
        } else {
            AuthState::Authenticated
        }
    }

    /// Clears id, start and expiry
    pub fn clear(&mut self) {
        *self = Self::empty();
    }
}

/// Value of the `Cookie` header for a session id
pub fn session_cookie(session_id: &str) -> String {
    format!("{SESSION_COOKIE_NAME}={session_id}; {ROUTE_ID}")
}

/// Value of the `Prefer` header for a page size
pub fn page_size_preference(max_page_size: u32) -> String {
    format!("odata.maxpagesize={max_page_size}")
}

/// Value of the `Authorization` header in basic mode
pub fn basic_authorization(credentials: &Credentials) -> String {
    let raw = format!("{}:{}", credentials.username, credentials.password);
    format!("Basic {}", STANDARD.encode(raw))
}

/// Computes the authentication headers of one request
///
/// Always recomputed from the current session, so they are never stale.
///
/// # Arguments
/// * `mode` - Authentication scheme
/// * `session` - Current session (ignored in basic mode)
/// * `credentials` - Credentials (used in basic mode)
/// * `max_page_size` - Page size preference sent in session mode
///
/// # Returns
/// * `Ok(HeaderMap)` - Headers to lay over the defaults
/// * `Err(AppError)` - If a value contains characters not allowed in a header
pub fn auth_headers(
    mode: AuthenticationMode,
    session: &SessionState,
    credentials: &Credentials,
    max_page_size: u32,
) -> Result<HeaderMap, AppError> {
    let mut headers = HeaderMap::new();
    match mode {
        AuthenticationMode::SessionCookie => {
            if let Some(session_id) = &session.session_id {
                headers.insert(COOKIE, header_value(&session_cookie(session_id))?);
            }
            headers.insert(
                HeaderName::from_static("prefer"),
                header_value(&page_size_preference(max_page_size))?,
            );
        }
        AuthenticationMode::Basic => {
            headers.insert(AUTHORIZATION, header_value(&basic_authorization(credentials))?);
        }
    }
    Ok(headers)
}

/// Parses a header value, mapping failures to `InvalidInput`
pub(crate) fn header_value(value: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::InvalidInput(format!("invalid header value '{value}': {e}")))
}

/// Parses a header name, mapping failures to `InvalidInput`
pub(crate) fn header_name(name: &str) -> Result<HeaderName, AppError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| AppError::InvalidInput(format!("invalid header name '{name}': {e}")))
}
