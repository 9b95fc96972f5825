//! Wire payloads.
//!
//! Request bodies borrow from the caller so building one never copies or
//! rewrites caller-supplied values. Responses keep the decoded body as the
//! backend sent it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Host environment record returned by the system info endpoint.
///
/// Holds the decoded body exactly as the backend sent it. The accessors
/// read the well-known fields and return `None` when one is missing or not
/// a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemInfo(Value);

impl SystemInfo {
    /// Platform identifier (e.g., "linux", "darwin", "win32").
    pub fn platform(&self) -> Option<&str> {
        str_field(&self.0, "platform")
    }

    /// Version string of the backend runtime, sent as `runtime_version` or
    /// `python_version`.
    pub fn runtime_version(&self) -> Option<&str> {
        str_field(&self.0, "runtime_version").or_else(|| str_field(&self.0, "python_version"))
    }

    /// Working directory of the backend process.
    pub fn current_working_directory(&self) -> Option<&str> {
        str_field(&self.0, "current_working_directory")
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_json(self) -> Value {
        self.0
    }
}

impl From<Value> for SystemInfo {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Body of an open-external request.
#[derive(Debug, Clone, Serialize)]
pub struct OpenExternal<'a> {
    /// URL or filesystem path to hand to the host's default application.
    pub target: &'a str,
}

/// Body of a read-text request.
#[derive(Debug, Clone, Serialize)]
pub struct ReadText<'a> {
    pub path: &'a str,
}

/// Body of a write-text request.
#[derive(Debug, Clone, Serialize)]
pub struct WriteText<'a> {
    pub path: &'a str,
    pub content: &'a str,
}

/// Body of a store-save request.
///
/// The document id travels as `filename` on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct SaveDocument<'a, T: ?Sized> {
    pub collection: &'a str,
    #[serde(rename = "filename")]
    pub id: &'a str,
    pub data: &'a T,
}

/// Response of the read-text endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(default)]
    pub path: Option<String>,
    pub content: String,
}

/// Generic acknowledgement (`{"status": ..., "path": ...}` and friends).
///
/// Holds the decoded body unchanged; nothing about its shape is assumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ack(Value);

impl Ack {
    /// The `status` field, whatever its type.
    pub fn status(&self) -> Option<&Value> {
        self.0.get("status")
    }

    /// Path written, when the operation touched the filesystem.
    pub fn path(&self) -> Option<&str> {
        str_field(&self.0, "path")
    }

    /// Target opened, for open-external.
    pub fn target(&self) -> Option<&str> {
        str_field(&self.0, "target")
    }

    /// Any field of the acknowledgement.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_json(self) -> Value {
        self.0
    }
}

impl From<Value> for Ack {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// Result of looking for an error detail in a failed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDetail {
    /// The backend explained itself.
    Detail(String),
    /// No usable explanation; fall back to the status phrase.
    NoDetail,
}

impl ErrorDetail {
    /// Decode the conventional `detail` field from a raw response body.
    ///
    /// String details are used verbatim. Other non-null values (e.g., a list
    /// of validation problems) are rendered as compact JSON. Empty strings,
    /// `null`, a missing field and unparsable bodies are all `NoDetail`.
    pub fn from_body(body: &[u8]) -> Self {
        let Ok(Value::Object(mut fields)) = serde_json::from_slice(body) else {
            return Self::NoDetail;
        };
        match fields.remove("detail") {
            Some(Value::String(s)) if !s.is_empty() => Self::Detail(s),
            Some(Value::String(_) | Value::Null) | None => Self::NoDetail,
            Some(other) => Self::Detail(other.to_string()),
        }
    }

    /// The detail text, or `fallback` when there is none.
    pub fn or(self, fallback: &str) -> String {
        match self {
            Self::Detail(s) => s,
            Self::NoDetail => fallback.to_string(),
        }
    }
}
