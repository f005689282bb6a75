//! Request models
use pretty_simple_display::{DebugPretty, DisplaySimple};
use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Request payload
///
/// Most Service Layer entities take JSON; attachments and batch calls need the raw
/// text form so the caller controls the exact bytes and `Content-Type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestBody {
    /// JSON document
    Json(Value),
    /// Raw text sent as-is
    Text(String),
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        RequestBody::Json(value)
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Text(text.to_string())
    }
}

/// Description of one call to dispatch through the session client
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// HTTP method
    pub method: Method,
    /// Endpoint path relative to the base URL (or an absolute URL)
    pub url: String,
    /// Query string parameters
    pub params: Vec<(String, String)>,
    /// Optional payload
    pub data: Option<RequestBody>,
}

impl RequestSpec {
    /// Creates a spec without parameters nor payload
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: Vec::new(),
            data: None,
        }
    }

    /// Appends query parameters
    #[must_use]
    pub fn with_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets the payload
    #[must_use]
    pub fn with_data(mut self, data: impl Into<RequestBody>) -> Self {
        self.data = Some(data.into());
        self
    }
}

/// Snapshot of the last request handed to the transport, for diagnostics only
#[derive(DebugPretty, DisplaySimple, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    /// HTTP method
    pub method: String,
    /// Absolute URL
    pub url: String,
    /// Headers sent, keyed by lowercase name
    pub headers: BTreeMap<String, String>,
    /// Query parameters sent
    pub params: Vec<(String, String)>,
    /// Payload sent
    pub body: Option<RequestBody>,
}

impl RequestRecord {
    /// Builds a record from the pieces of a resolved request
    pub fn new(
        method: &Method,
        url: &str,
        headers: &HeaderMap,
        params: &[(String, String)],
        body: Option<&RequestBody>,
    ) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            headers: header_map_to_btree(headers),
            params: params.to_vec(),
            body: body.cloned(),
        }
    }
}

/// Flattens a header map into printable pairs, skipping non UTF-8 values
pub fn header_map_to_btree(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}
