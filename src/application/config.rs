use crate::application::auth::SessionState;
use crate::constants::{DEFAULT_BASE_URL, DEFAULT_EXPIRY_GUARD_MS, DEFAULT_MAX_PAGE_SIZE};
use crate::utils::config::{get_env_flag, get_env_or_default, get_env_or_none, parse_header_list};
use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, error};

/// Credentials accepted by the `Login` endpoint
#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Company database to open
    #[serde(rename = "CompanyDB")]
    pub company_db: String,
    /// Service Layer user
    #[serde(rename = "UserName")]
    pub username: String,
    /// Password of the user
    #[serde(rename = "Password")]
    pub password: String,
}

impl Credentials {
    /// Creates a new set of credentials
    pub fn new(
        company_db: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            company_db: company_db.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("company_db", &self.company_db)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// How requests are authenticated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthenticationMode {
    /// `Login` once, then send the `B1SESSION` cookie
    #[default]
    SessionCookie,
    /// Send `Authorization: Basic` on every call
    Basic,
}

impl FromStr for AuthenticationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "session" | "session-cookie" | "cookie" => Ok(AuthenticationMode::SessionCookie),
            "basic" => Ok(AuthenticationMode::Basic),
            other => Err(format!("unknown authentication mode: {other}")),
        }
    }
}

/// Main configuration of the Service Layer client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the Service Layer, e.g. `https://host:50000/b1s/v1`
    pub base_url: String,
    /// Login credentials
    pub credentials: Credentials,
    /// Authentication scheme
    pub authentication_mode: AuthenticationMode,
    /// Value of the `Prefer: odata.maxpagesize` header
    pub max_page_size: u32,
    /// Margin in milliseconds before the reported expiry at which the session is renewed
    pub expiry_guard_ms: i64,
    /// Headers sent with every request
    pub default_headers: HashMap<String, String>,
    /// Skip TLS certificate verification (self-signed Service Layer installs)
    pub accept_invalid_certs: bool,
    /// Transport level timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Keep full response metadata and failures for inspection
    pub debug: bool,
    /// Abort requests whose implicit login failed
    pub strict: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfig {
    /// Creates a configuration from the environment (and a `.env` file, if any)
    ///
    /// # Returns
    ///
    /// A new `ClientConfig` instance. Missing credentials are logged, not fatal:
    /// login will simply fail later.
    pub fn new() -> Self {
        match dotenv() {
            Ok(_) => debug!("Successfully loaded .env file"),
            Err(e) => debug!("Failed to load .env file: {e}"),
        }

        let company_db = get_env_or_default("B1_COMPANY_DB", String::new());
        let username = get_env_or_default("B1_USERNAME", String::new());
        let password = get_env_or_default("B1_PASSWORD", String::new());

        if company_db.is_empty() {
            error!("B1_COMPANY_DB not found in environment variables or .env file");
        }
        if username.is_empty() {
            error!("B1_USERNAME not found in environment variables or .env file");
        }
        if password.is_empty() {
            error!("B1_PASSWORD not found in environment variables or .env file");
        }

        ClientConfig {
            base_url: get_env_or_default("B1_BASE_URL", String::from(DEFAULT_BASE_URL)),
            credentials: Credentials {
                company_db,
                username,
                password,
            },
            authentication_mode: get_env_or_default("B1_AUTH_MODE", AuthenticationMode::default()),
            max_page_size: get_env_or_default("B1_MAX_PAGE_SIZE", DEFAULT_MAX_PAGE_SIZE),
            expiry_guard_ms: get_env_or_default("B1_EXPIRY_GUARD_MS", DEFAULT_EXPIRY_GUARD_MS),
            default_headers: get_env_or_none::<String>("B1_DEFAULT_HEADERS")
                .map(|raw| parse_header_list(&raw))
                .unwrap_or_default(),
            accept_invalid_certs: get_env_flag("B1_ACCEPT_INVALID_CERTS", false),
            timeout_secs: get_env_or_none("B1_REST_TIMEOUT"),
            debug: get_env_flag("B1_DEBUG", false),
            strict: get_env_flag("B1_STRICT", false),
        }
    }

    /// Creates a configuration without reading the environment
    pub fn with_base_url(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            authentication_mode: AuthenticationMode::default(),
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            expiry_guard_ms: DEFAULT_EXPIRY_GUARD_MS,
            default_headers: HashMap::new(),
            accept_invalid_certs: false,
            timeout_secs: None,
            debug: false,
            strict: false,
        }
    }

    /// Takes base URL, credentials and authentication mode from captured settings
    #[must_use]
    pub fn with_settings(mut self, settings: &ClientSettings) -> Self {
        self.base_url = settings.base_url.clone();
        self.credentials = settings.credentials.clone();
        self.authentication_mode = settings.authentication_mode;
        self
    }

    /// Sets the authentication scheme
    #[must_use]
    pub fn authentication_mode(mut self, mode: AuthenticationMode) -> Self {
        self.authentication_mode = mode;
        self
    }

    /// Sets the page size preference
    #[must_use]
    pub fn max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    /// Sets the expiry guard in milliseconds
    #[must_use]
    pub fn expiry_guard_ms(mut self, expiry_guard_ms: i64) -> Self {
        self.expiry_guard_ms = expiry_guard_ms;
        self
    }

    /// Adds a header sent with every request
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Opts out of TLS certificate verification
    #[must_use]
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Sets the transport timeout
    #[must_use]
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Enables debug capture of responses and failures
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Enables strict mode
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Everything needed to resume a previously established session
///
/// Obtained from [`SessionClient::settings`](crate::application::client::SessionClient::settings)
/// and fed back to
/// [`SessionClient::from_settings`](crate::application::client::SessionClient::from_settings).
/// The session is trusted as-is; it is only checked for expiry on next use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Base URL of the Service Layer
    pub base_url: String,
    /// Login credentials, used if the session has to be renewed
    pub credentials: Credentials,
    /// Session to resume
    pub session: SessionState,
    /// Authentication scheme
    pub authentication_mode: AuthenticationMode,
}
