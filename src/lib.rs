//! # b1-client
//!
//! A client for the SAP Business One Service Layer REST API.
//!
//! The [`SessionClient`](application::client::SessionClient) owns a single
//! Service Layer session: it logs in on demand, renews the session shortly
//! before the backend drops it, computes the session cookie (or basic
//! authorization) for every call, and keeps the last response around for
//! inspection.
//!
//! ## Usage
//!
//! ```ignore
//! use b1_client::prelude::*;
//! use serde_json::json;
//!
//! let mut client = SessionClient::from_env()?;
//! client.post("Quotations", json!({"CardCode": "C000082"})).await?;
//! let doc_entry = client.response("DocEntry").cloned();
//! client.logout().await?;
//! ```
//!
//! ## Configuration
//!
//! [`ClientConfig::new`](application::config::ClientConfig::new) reads a `.env`
//! file and the `B1_*` environment variables (`B1_BASE_URL`, `B1_COMPANY_DB`,
//! `B1_USERNAME`, `B1_PASSWORD`, `B1_AUTH_MODE`, ...). TLS certificate
//! verification is on unless `B1_ACCEPT_INVALID_CERTS` is set.

/// Session handling, configuration and the client itself
pub mod application;
/// Constants shared across the crate
pub mod constants;
/// Error types
pub mod error;
/// Transport, request and response models
pub mod model;
/// Commonly used re-exports
pub mod prelude;
/// Environment and logging helpers
pub mod utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
pub fn version() -> &'static str {
    VERSION
}
