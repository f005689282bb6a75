/// Transport trait and the reqwest-backed implementation
pub mod http;
/// Request models for API calls
pub mod requests;
/// Response models from API calls
pub mod responses;
