//! Response models and helpers for reading Service Layer payloads
use crate::model::http::{TransportError, TransportResponse};
use crate::model::requests::header_map_to_btree;
use pretty_simple_display::{DebugPretty, DisplaySimple};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Body returned by `POST Login`
#[derive(DebugPretty, DisplaySimple, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Session identifier to echo back in the `B1SESSION` cookie
    #[serde(rename = "SessionId")]
    pub session_id: String,
    /// Service Layer version
    #[serde(rename = "Version", default)]
    pub version: Option<String>,
    /// Idle timeout of the session, in minutes
    #[serde(rename = "SessionTimeout")]
    pub session_timeout: i64,
}

/// Last raw transport outcome
#[derive(DebugPretty, DisplaySimple, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// HTTP status, when the backend answered
    pub status: Option<u16>,
    /// Response headers, keyed by lowercase name
    pub headers: BTreeMap<String, String>,
    /// Parsed body
    pub body: Value,
    /// Whether the call failed
    pub failed: bool,
}

impl ResponseRecord {
    /// Record of a successful call
    pub fn success(response: &TransportResponse) -> Self {
        Self {
            status: Some(response.status),
            headers: header_map_to_btree(&response.headers),
            body: parse_body(&response.body),
            failed: false,
        }
    }

    /// Record of a failed call
    pub fn failure(error: &TransportError) -> Self {
        Self {
            status: error.status,
            headers: BTreeMap::new(),
            body: error.body.as_deref().map(parse_body).unwrap_or(Value::Null),
            failed: true,
        }
    }
}

/// Parses a response body.
///
/// Empty bodies (`204 No Content` on PATCH/DELETE) become `Null`; anything that is
/// not JSON is kept as a string.
pub fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

/// Unwraps the collection envelope `{ "odata.metadata": ..., "value": [...] }`.
///
/// Only an object with exactly two keys, one of them `value` holding an array,
/// is unwrapped. Single records come back unchanged.
pub fn unwrap_collection(body: &Value) -> &Value {
    match body {
        Value::Object(map) if map.len() == 2 => match map.get("value") {
            Some(inner @ Value::Array(_)) => inner,
            _ => body,
        },
        _ => body,
    }
}

/// Looks up a dot separated path such as `DocumentLines.0.ItemCode`.
///
/// Object segments are matched by key and array segments by index. Returns
/// `None` as soon as a segment does not resolve.
pub fn lookup_path<'a>(value: &'a Value, key_path: &str) -> Option<&'a Value> {
    if key_path.is_empty() {
        return Some(value);
    }
    key_path
        .split('.')
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}
