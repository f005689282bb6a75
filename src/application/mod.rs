/// Named shortcuts for common calls
pub mod actions;
/// Session state and authentication headers
pub mod auth;
/// Session managed client
pub mod client;
/// Application configuration module
pub mod config;
