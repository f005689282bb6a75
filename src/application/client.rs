//! Session managed client for the SAP Business One Service Layer
//!
//! This module provides the [`SessionClient`], which handles:
//! - Login, logout and proactive re-authentication before the session expires
//! - Header computation (session cookie or basic authorization) on every call
//! - A record of the last request/response for callers that inspect state
//!   after the fact
//!
//! # Example
//! ```ignore
//! use b1_client::prelude::*;
//!
//! let mut client = SessionClient::connect(ClientConfig::new()).await?;
//! client.get("BusinessPartners", &[("$select", "CardCode,CardName")]).await?;
//! let partners = client.get_response();
//! client.disconnect().await?;
//! ```

use crate::application::actions::NamedAction;
use crate::application::auth::{AuthState, SessionState, auth_headers, header_name, header_value};
use crate::application::config::{AuthenticationMode, ClientConfig, ClientSettings, Credentials};
use crate::constants::{LOGIN_PATH, LOGOUT_PATH};
use crate::error::{AppError, ErrorKind};
use crate::model::http::{ReqwestTransport, Transport, TransportRequest};
use crate::model::requests::{RequestBody, RequestRecord, RequestSpec};
use crate::model::responses::{
    LoginResponse, ResponseRecord, lookup_path, parse_body, unwrap_collection,
};
use chrono::Utc;
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Client for the Service Layer with automatic session management
///
/// Every mutating call takes `&mut self`, so one client carries at most one
/// outstanding request. The `last_*` accessors mirror the outcome of the most
/// recent call; the value returned by each call is the authoritative one.
pub struct SessionClient<T: Transport = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
    session: SessionState,
    header_overrides: HeaderMap,
    last_response: Option<Value>,
    last_record: Option<ResponseRecord>,
    last_request: Option<RequestRecord>,
    last_failure: Option<ErrorKind>,
    request_log: Vec<String>,
}

impl SessionClient<ReqwestTransport> {
    /// Creates a client with an empty session
    ///
    /// No network call is made; the first request logs in.
    ///
    /// # Arguments
    /// * `config` - Base URL, credentials and behaviour flags
    ///
    /// # Returns
    /// * `Ok(SessionClient)` - Client ready to use
    /// * `Err(AppError)` - If the HTTP client cannot be built
    pub fn new(config: ClientConfig) -> Result<Self, AppError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Creates a client configured from the environment
    pub fn from_env() -> Result<Self, AppError> {
        Self::new(ClientConfig::new())
    }

    /// Resumes a previously captured session without logging in
    ///
    /// Everything the settings do not carry (guard, page size, TLS policy,
    /// flags) is read from the environment, as in [`ClientConfig::new`].
    ///
    /// # Arguments
    /// * `settings` - Base URL, credentials, session and authentication mode
    pub fn from_settings(settings: ClientSettings) -> Result<Self, AppError> {
        Self::from_settings_with_config(settings, ClientConfig::new())
    }

    /// Resumes a session on top of an explicit configuration
    ///
    /// Base URL, credentials and authentication mode come from `settings`; the
    /// rest of `config` is kept.
    pub fn from_settings_with_config(
        settings: ClientSettings,
        config: ClientConfig,
    ) -> Result<Self, AppError> {
        let config = config.with_settings(&settings);
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::resume_with_transport(config, settings.session, transport))
    }

    /// Creates a client and logs in
    ///
    /// In strict mode a failed login is returned as an error; otherwise it is
    /// logged and the client is returned without a session.
    pub async fn connect(config: ClientConfig) -> Result<Self, AppError> {
        let transport = ReqwestTransport::new(&config)?;
        Self::connect_with_transport(config, transport).await
    }

    /// One-shot call: connect, dispatch `spec`, optionally log out
    ///
    /// # Arguments
    /// * `config` - Client configuration
    /// * `spec` - The call to make; its URL must not be empty
    /// * `do_logout` - Whether to close the session afterwards
    ///
    /// # Returns
    /// * `Ok(SessionClient)` - The client, for inspecting the response
    /// * `Err(AppError::MissingUrl)` - If `spec.url` is empty (nothing is sent)
    pub async fn action(
        config: ClientConfig,
        spec: RequestSpec,
        do_logout: bool,
    ) -> Result<Self, AppError> {
        if spec.url.trim().is_empty() {
            error!("Url request not given");
            return Err(AppError::MissingUrl);
        }
        let transport = ReqwestTransport::new(&config)?;
        Self::action_with_transport(config, transport, spec, do_logout).await
    }

    /// Runs a [`NamedAction`] through [`action`](Self::action)
    pub async fn run(
        config: ClientConfig,
        action: NamedAction,
        do_logout: bool,
    ) -> Result<Self, AppError> {
        debug!("Running action {}", action);
        Self::action(config, action.spec(), do_logout).await
    }
}

impl Default for SessionClient<ReqwestTransport> {
    fn default() -> Self {
        let config = ClientConfig::default();
        let transport = ReqwestTransport::new(&config).unwrap_or_else(|e| {
            error!("Cannot build the configured HTTP client, using defaults: {}", e);
            ReqwestTransport::from_client(reqwest::Client::new())
        });
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> SessionClient<T> {
    /// Creates a client over a custom transport
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            session: SessionState::empty(),
            header_overrides: HeaderMap::new(),
            last_response: None,
            last_record: None,
            last_request: None,
            last_failure: None,
            request_log: Vec::new(),
        }
    }

    /// Resumes a session over a custom transport with default behaviour flags
    pub fn from_settings_with_transport(settings: ClientSettings, transport: T) -> Self {
        let config = ClientConfig::with_base_url(settings.base_url, settings.credentials)
            .authentication_mode(settings.authentication_mode);
        Self::resume_with_transport(config, settings.session, transport)
    }

    /// Resumes `session` over a custom transport, keeping `config` as is
    pub fn resume_with_transport(config: ClientConfig, session: SessionState, transport: T) -> Self {
        let mut client = Self::with_transport(config, transport);
        client.session = session;
        client
    }

    /// Creates a client over a custom transport and logs in
    pub async fn connect_with_transport(config: ClientConfig, transport: T) -> Result<Self, AppError> {
        let mut client = Self::with_transport(config, transport);
        if let Err(e) = client.login().await {
            if client.config.strict {
                return Err(e);
            }
            warn!("Connected without a session: {}", e);
        }
        Ok(client)
    }

    /// One-shot call over a custom transport, see [`SessionClient::action`]
    pub async fn action_with_transport(
        config: ClientConfig,
        transport: T,
        spec: RequestSpec,
        do_logout: bool,
    ) -> Result<Self, AppError> {
        if spec.url.trim().is_empty() {
            error!("Url request not given");
            return Err(AppError::MissingUrl);
        }

        let mut client = Self::connect_with_transport(config, transport).await?;
        if let Err(e) = client.request(spec).await {
            if client.config.strict {
                return Err(e);
            }
        }
        if do_logout {
            if let Err(e) = client.logout().await {
                warn!("Logout after action failed: {}", e);
            }
        }
        Ok(client)
    }

    // ---------------------------------------------------------------------
    // configuration
    // ---------------------------------------------------------------------

    /// Current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Replaces the base URL
    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.config.base_url = base_url.into();
    }

    /// Replaces the credentials used by the next login
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.config.credentials = credentials;
    }

    /// Switches between session cookie and basic authentication
    pub fn set_authentication_mode(&mut self, mode: AuthenticationMode) {
        self.config.authentication_mode = mode;
    }

    /// Enables or disables debug capture
    pub fn set_debug(&mut self, debug: bool) {
        self.config.debug = debug;
    }

    /// Enables or disables strict mode
    pub fn set_strict(&mut self, strict: bool) {
        self.config.strict = strict;
    }

    /// Merges headers into the per-request overrides
    ///
    /// Overrides win over the configured defaults and lose against the
    /// authentication headers, which are computed on every call.
    ///
    /// # Returns
    /// * `Err(AppError::InvalidInput)` - If a name or value is not a valid header;
    ///   nothing is merged in that case
    pub fn set_headers<K, V>(&mut self, headers: impl IntoIterator<Item = (K, V)>) -> Result<(), AppError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut parsed = HeaderMap::new();
        for (name, value) in headers {
            parsed.insert(header_name(name.as_ref())?, header_value(value.as_ref())?);
        }
        for (name, value) in parsed.iter() {
            self.header_overrides.insert(name.clone(), value.clone());
        }
        Ok(())
    }

    /// Drops every per-request override
    pub fn clear_headers(&mut self) {
        self.header_overrides.clear();
    }

    /// Headers the next business request would carry
    pub fn headers(&self) -> Result<HeaderMap, AppError> {
        let mut headers = self.base_headers()?;
        merge_headers(&mut headers, &self.header_overrides);
        let auth = auth_headers(
            self.config.authentication_mode,
            &self.session,
            &self.config.credentials,
            self.config.max_page_size,
        )?;
        merge_headers(&mut headers, &auth);
        Ok(headers)
    }

    /// Resolves a path against the base URL; absolute URLs are kept
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    // ---------------------------------------------------------------------
    // session
    // ---------------------------------------------------------------------

    /// Current session
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Captures what is needed to resume this session in another client
    pub fn settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.config.base_url.clone(),
            credentials: self.config.credentials.clone(),
            session: self.session.clone(),
            authentication_mode: self.config.authentication_mode,
        }
    }

    /// Whether the session is missing or inside the expiry guard
    pub fn is_expired(&self) -> bool {
        self.session.is_expired(self.config.expiry_guard_ms)
    }

    /// Observable authentication state
    pub fn auth_state(&self) -> AuthState {
        self.session.auth_state(self.config.expiry_guard_ms)
    }

    /// Opens a new session
    ///
    /// The start timestamp is taken before the call so the computed expiry never
    /// lands after the real one. On failure the session is left empty.
    ///
    /// # Returns
    /// * `Ok(())` - Session established
    /// * `Err(AppError::AuthenticationFailure)` - Login rejected or unreachable
    pub async fn login(&mut self) -> Result<(), AppError> {
        info!("Authentication in progress...");
        let started_at = Utc::now();

        let outcome = match self.login_request() {
            Ok(request) => match self.transport.execute(request).await {
                Ok(response) => serde_json::from_str::<LoginResponse>(&response.body).map_err(|e| {
                    AppError::AuthenticationFailure(format!("invalid login response: {e}"))
                }),
                Err(e) => Err(AppError::AuthenticationFailure(e.to_string())),
            },
            Err(e) => Err(AppError::AuthenticationFailure(format!(
                "cannot build login request: {e}"
            ))),
        };

        let outcome = outcome.and_then(|login| {
            SessionState::established(login.session_id, started_at, login.session_timeout)
                .map(|session| (session, login.session_timeout))
                .ok_or_else(|| {
                    AppError::AuthenticationFailure(format!(
                        "session timeout out of range: {}",
                        login.session_timeout
                    ))
                })
        });

        match outcome {
            Ok((session, timeout)) => {
                self.session = session;
                self.last_failure = None;
                info!("Login successful, session valid for {} minutes", timeout);
                Ok(())
            }
            Err(e) => {
                self.session.clear();
                self.last_failure = Some(e.kind());
                error!("Login failed: {}", e);
                Err(e)
            }
        }
    }

    /// Closes the session
    ///
    /// The local session is cleared whatever the outcome of the call.
    pub async fn logout(&mut self) -> Result<(), AppError> {
        let outcome = self.request(RequestSpec::new(Method::POST, LOGOUT_PATH)).await;
        self.session.clear();
        match outcome {
            Ok(_) => {
                info!("Logout successful");
                Ok(())
            }
            Err(e) => {
                warn!("Logout call failed, local session cleared anyway: {}", e);
                Err(e)
            }
        }
    }

    /// Alias for [`logout`](Self::logout)
    pub async fn disconnect(&mut self) -> Result<(), AppError> {
        self.logout().await
    }

    // ---------------------------------------------------------------------
    // dispatch
    // ---------------------------------------------------------------------

    /// Dispatches one call
    ///
    /// The path is always appended to the request log. In session mode an
    /// expired session triggers exactly one login first (never for the logout
    /// path). A failed implicit login is logged and the call still goes out,
    /// unless strict mode is on.
    ///
    /// # Returns
    /// * `Ok(Value)` - Parsed body (`Null` for empty bodies)
    /// * `Err(AppError)` - Transport failure, or authentication failure in strict mode
    pub async fn request(&mut self, spec: RequestSpec) -> Result<Value, AppError> {
        self.request_log.push(spec.url.clone());

        let is_logout = self.is_logout_path(&spec.url);
        if is_logout && !self.session.is_active() {
            debug!("No active session, nothing to log out");
            return Ok(Value::Null);
        }

        if self.config.authentication_mode == AuthenticationMode::SessionCookie
            && !is_logout
            && self.is_expired()
        {
            debug!("Session expired, logging in before {} {}", spec.method, spec.url);
            if let Err(e) = self.login().await {
                if self.config.strict {
                    return Err(e);
                }
                warn!("Continuing without a valid session: {}", e);
            }
        }

        let url = self.resolve_url(&spec.url);
        let headers = match self.headers() {
            Ok(headers) => headers,
            Err(e) => {
                self.last_failure = Some(e.kind());
                return Err(e);
            }
        };

        self.last_request = Some(RequestRecord::new(
            &spec.method,
            &url,
            &headers,
            &spec.params,
            spec.data.as_ref(),
        ));

        let method = spec.method.clone();
        let request = TransportRequest {
            method: spec.method,
            url: url.clone(),
            headers,
            params: spec.params,
            body: spec.data,
        };

        debug!("Request start: {} {}", method, url);
        let started = Instant::now();
        let outcome = self.transport.execute(request).await;
        let elapsed = started.elapsed().as_millis();

        match outcome {
            Ok(response) => {
                debug!("Request end: {} {} ({} ms)", method, url, elapsed);
                let body = parse_body(&response.body);
                if self.config.debug {
                    self.last_record = Some(ResponseRecord::success(&response));
                }
                self.last_response = Some(body.clone());
                self.last_failure = None;
                Ok(body)
            }
            Err(e) => {
                warn!("Request failed: {} {} ({} ms): {}", method, url, elapsed, e);
                if self.config.debug {
                    self.last_record = Some(ResponseRecord::failure(&e));
                    self.last_response = Some(serde_json::to_value(&e)?);
                }
                self.last_failure = Some(ErrorKind::RequestFailure);
                Err(AppError::RequestFailure(e))
            }
        }
    }

    /// Makes a GET request
    pub async fn get(&mut self, url: &str, params: &[(&str, &str)]) -> Result<Value, AppError> {
        let spec = RequestSpec::new(Method::GET, url).with_params(params.iter().copied());
        self.request(spec).await
    }

    /// Makes a POST request
    pub async fn post(&mut self, url: &str, data: impl Into<RequestBody>) -> Result<Value, AppError> {
        self.request(RequestSpec::new(Method::POST, url).with_data(data))
            .await
    }

    /// Makes a PUT request
    pub async fn put(&mut self, url: &str, data: impl Into<RequestBody>) -> Result<Value, AppError> {
        self.request(RequestSpec::new(Method::PUT, url).with_data(data))
            .await
    }

    /// Makes a PATCH request
    pub async fn patch(&mut self, url: &str, data: impl Into<RequestBody>) -> Result<Value, AppError> {
        self.request(RequestSpec::new(Method::PATCH, url).with_data(data))
            .await
    }

    /// Makes a DELETE request
    pub async fn delete(&mut self, url: &str) -> Result<Value, AppError> {
        self.request(RequestSpec::new(Method::DELETE, url)).await
    }

    // ---------------------------------------------------------------------
    // inspection
    // ---------------------------------------------------------------------

    /// Last stored body, with the collection envelope unwrapped
    pub fn get_response(&self) -> Option<&Value> {
        self.last_response.as_ref().map(unwrap_collection)
    }

    /// Value at a dot separated path of [`get_response`](Self::get_response)
    ///
    /// Returns `None` instead of failing when a segment does not resolve.
    pub fn response(&self, key_path: &str) -> Option<&Value> {
        self.get_response()
            .and_then(|body| lookup_path(body, key_path))
    }

    /// Whether a non-null body is stored
    pub fn is_defined_response(&self) -> bool {
        matches!(&self.last_response, Some(body) if !body.is_null())
    }

    /// Raw last stored body, envelope included
    pub fn last_response(&self) -> Option<&Value> {
        self.last_response.as_ref()
    }

    /// Full metadata of the last call, recorded in debug mode only
    pub fn last_record(&self) -> Option<&ResponseRecord> {
        self.last_record.as_ref()
    }

    /// Last request handed to the transport
    pub fn last_request(&self) -> Option<&RequestRecord> {
        self.last_request.as_ref()
    }

    /// Whether the last call failed
    pub fn last_call_failed(&self) -> bool {
        self.last_failure.is_some()
    }

    /// Kind of the last failure, if the last call failed
    pub fn last_failure(&self) -> Option<ErrorKind> {
        self.last_failure
    }

    /// Every path dispatched so far, in order
    pub fn request_log(&self) -> &[String] {
        &self.request_log
    }

    fn is_logout_path(&self, path: &str) -> bool {
        path.trim_matches('/') == LOGOUT_PATH
            || self.resolve_url(path) == self.resolve_url(LOGOUT_PATH)
    }

    fn login_request(&self) -> Result<TransportRequest, AppError> {
        Ok(TransportRequest {
            method: Method::POST,
            url: self.resolve_url(LOGIN_PATH),
            headers: self.base_headers()?,
            params: Vec::new(),
            body: Some(RequestBody::Json(serde_json::to_value(&self.config.credentials)?)),
        })
    }

    fn base_headers(&self) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("x-requested-with"),
            HeaderValue::from_static("XMLHttpRequest"),
        );
        for (name, value) in &self.config.default_headers {
            headers.insert(header_name(name)?, header_value(value)?);
        }
        Ok(headers)
    }
}

fn merge_headers(target: &mut HeaderMap, layer: &HeaderMap) {
    for (name, value) in layer.iter() {
        target.insert(name.clone(), value.clone());
    }
}
