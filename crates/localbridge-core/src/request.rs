//! Request descriptors and the backend route table.

use crate::DocumentAddress;
use serde::Serialize;
use std::fmt;

/// Backend endpoint paths.
pub mod routes {
    use crate::DocumentAddress;

    pub const SYSTEM_INFO: &str = "/sys/info";
    pub const OPEN_EXTERNAL: &str = "/sys/open-external";
    pub const LIFECYCLE: &str = "/sys/lifecycle";
    pub const READ_TEXT: &str = "/io/read_text";
    pub const WRITE_TEXT: &str = "/io/write_text";
    pub const STORE_SAVE: &str = "/store/save";

    /// Path of a stored document: `/store/{collection}/{id}`.
    ///
    /// Collection and id are inserted as given, without escaping.
    pub fn store_document(address: &DocumentAddress) -> String {
        format!("/store/{address}")
    }
}

/// The fixed set of methods the backend understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One backend call: method, target path, optional JSON body.
///
/// Built fresh per call and immutable afterwards. The body is encoded at
/// construction time, so a value that cannot be represented as JSON is
/// rejected before anything touches the network.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    body: Option<serde_json::Value>,
}

impl RequestDescriptor {
    /// A bodiless GET.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    /// A POST carrying `body` as JSON.
    pub fn post<B: Serialize + ?Sized>(
        path: impl Into<String>,
        body: &B,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            method: Method::Post,
            path: path.into(),
            body: Some(serde_json::to_value(body)?),
        })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// GET for the document at `address`.
    pub fn store_get(address: &DocumentAddress) -> Self {
        Self::get(routes::store_document(address))
    }
}
