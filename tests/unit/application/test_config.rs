use b1_client::application::config::{AuthenticationMode, ClientConfig, Credentials};
use b1_client::constants::{DEFAULT_EXPIRY_GUARD_MS, DEFAULT_MAX_PAGE_SIZE};
use std::env;

#[test]
fn with_base_url_uses_safe_defaults() {
    let config = ClientConfig::with_base_url(
        "https://sl.example.com/b1s/v1",
        Credentials::new("DB", "user", "pw"),
    );

    assert_eq!(config.authentication_mode, AuthenticationMode::SessionCookie);
    assert_eq!(config.max_page_size, DEFAULT_MAX_PAGE_SIZE);
    assert_eq!(config.expiry_guard_ms, DEFAULT_EXPIRY_GUARD_MS);
    assert!(!config.accept_invalid_certs);
    assert!(!config.debug);
    assert!(!config.strict);
    assert!(config.timeout_secs.is_none());
    assert!(config.default_headers.is_empty());
}

#[test]
fn builder_methods_set_fields() {
    let config = ClientConfig::with_base_url("https://h", Credentials::default())
        .authentication_mode(AuthenticationMode::Basic)
        .max_page_size(20)
        .expiry_guard_ms(1_000)
        .default_header("X-App", "crm")
        .accept_invalid_certs(true)
        .timeout_secs(15)
        .debug(true)
        .strict(true);

    assert_eq!(config.authentication_mode, AuthenticationMode::Basic);
    assert_eq!(config.max_page_size, 20);
    assert_eq!(config.expiry_guard_ms, 1_000);
    assert_eq!(config.default_headers.get("X-App").map(String::as_str), Some("crm"));
    assert!(config.accept_invalid_certs);
    assert_eq!(config.timeout_secs, Some(15));
    assert!(config.debug);
    assert!(config.strict);
}

#[test]
fn authentication_mode_parses_aliases() {
    assert_eq!("session".parse(), Ok(AuthenticationMode::SessionCookie));
    assert_eq!("Session-Cookie".parse(), Ok(AuthenticationMode::SessionCookie));
    assert_eq!(" basic ".parse(), Ok(AuthenticationMode::Basic));
    assert!("oauth".parse::<AuthenticationMode>().is_err());
}

#[test]
fn credentials_serialize_with_backend_field_names() {
    let credentials = Credentials::new("SBODEMO", "manager", "secret");

    let json = serde_json::to_value(&credentials).unwrap();

    assert_eq!(
        json,
        serde_json::json!({"CompanyDB": "SBODEMO", "UserName": "manager", "Password": "secret"})
    );
}

#[test]
fn credentials_debug_hides_password() {
    let credentials = Credentials::new("SBODEMO", "manager", "secret");

    let printed = format!("{credentials:?}");

    assert!(printed.contains("manager"));
    assert!(!printed.contains("secret"));
}

#[test]
fn new_reads_environment() {
    unsafe {
        env::set_var("B1_BASE_URL", "https://env.example.com/b1s/v1");
        env::set_var("B1_COMPANY_DB", "ENVDB");
        env::set_var("B1_USERNAME", "envuser");
        env::set_var("B1_PASSWORD", "envpw");
        env::set_var("B1_AUTH_MODE", "basic");
        env::set_var("B1_MAX_PAGE_SIZE", "250");
        env::set_var("B1_DEFAULT_HEADERS", "X-App: crm; X-Env: test");
        env::set_var("B1_STRICT", "yes");
    }

    let config = ClientConfig::new();

    unsafe {
        for var in [
            "B1_BASE_URL",
            "B1_COMPANY_DB",
            "B1_USERNAME",
            "B1_PASSWORD",
            "B1_AUTH_MODE",
            "B1_MAX_PAGE_SIZE",
            "B1_DEFAULT_HEADERS",
            "B1_STRICT",
        ] {
            env::remove_var(var);
        }
    }

    assert_eq!(config.base_url, "https://env.example.com/b1s/v1");
    assert_eq!(config.credentials, Credentials::new("ENVDB", "envuser", "envpw"));
    assert_eq!(config.authentication_mode, AuthenticationMode::Basic);
    assert_eq!(config.max_page_size, 250);
    assert_eq!(config.default_headers.len(), 2);
    assert_eq!(config.default_headers.get("X-Env").map(String::as_str), Some("test"));
    assert!(config.strict);
    assert!(!config.accept_invalid_certs);
}
