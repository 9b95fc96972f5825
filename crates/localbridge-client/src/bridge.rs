//! Request translation.
//!
//! Every backend call goes through [`Bridge::request`]: one descriptor in,
//! one transport call out, and either the decoded body or a [`BridgeError`]
//! back. The system, raw I/O and managed store APIs are thin views over it.

use crate::{BridgeConfig, BridgeError};
use localbridge_core::{
    Ack, DocumentAddress, ErrorDetail, Method, OpenExternal, ReadText, RequestDescriptor,
    SaveDocument, SystemInfo, TextContent, WriteText, routes,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Fallback phrase for status codes without a canonical reason.
const UNKNOWN_STATUS: &str = "Unknown Status";

/// Stateless handle for talking to the backend.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Bridge {
    http: reqwest::Client,
    config: BridgeConfig,
}

impl Bridge {
    pub fn new(config: BridgeConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Use a pre-configured HTTP client (proxies, custom pools, tests).
    pub fn with_client(http: reqwest::Client, config: BridgeConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// System domain: host info and opening things externally.
    pub fn sys(&self) -> SystemApi<'_> {
        SystemApi { bridge: self }
    }

    /// Raw I/O domain: plain text files by absolute path.
    pub fn io(&self) -> IoApi<'_> {
        IoApi { bridge: self }
    }

    /// Managed store domain: JSON documents addressed by collection and id.
    pub fn store(&self) -> StoreApi<'_> {
        StoreApi { bridge: self }
    }

    /// Issue one backend call and decode the JSON response.
    ///
    /// - No response at all: [`BridgeError::unreachable`].
    /// - Non-2xx response: backend error with the status code, the message
    ///   taken from the body's `detail` field when present, else the
    ///   status phrase.
    /// - 2xx response whose body does not decode as `T`: [`BridgeError::decode`].
    pub async fn request<T: DeserializeOwned>(
        &self,
        req: &RequestDescriptor,
    ) -> Result<T, BridgeError> {
        let url = self.config.endpoint(req.path()).map_err(|e| {
            BridgeError::input(format!("invalid request path {}: {e}", req.path()))
        })?;

        tracing::debug!("{} {}", req.method(), url);

        let mut builder = self.http.request(http_method(req.method()), url);
        if let Some(body) = req.body() {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("{} {} failed: {}", req.method(), req.path(), e);
                return Err(BridgeError::unreachable());
            }
        };

        let status = response.status();
        if !status.is_success() {
            // An unreadable error body is the same as one without a detail.
            let body = response.bytes().await.unwrap_or_default();
            let phrase = status.canonical_reason().unwrap_or(UNKNOWN_STATUS);
            let message = ErrorDetail::from_body(&body).or(phrase);
            tracing::debug!("{} {} -> {}: {}", req.method(), req.path(), status, message);
            return Err(BridgeError::backend(status.as_u16(), message));
        }

        let body = response.bytes().await.map_err(|e| {
            tracing::warn!("Reading response of {} {} failed: {}", req.method(), req.path(), e);
            BridgeError::unreachable()
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            tracing::debug!("Undecodable response from {}: {}", req.path(), e);
            BridgeError::decode()
        })
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
    }
}

fn require(field: &str, value: &str) -> Result<(), BridgeError> {
    if value.is_empty() {
        return Err(BridgeError::input(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// System domain.
#[derive(Debug, Clone, Copy)]
pub struct SystemApi<'a> {
    bridge: &'a Bridge,
}

impl SystemApi<'_> {
    /// Platform id, runtime version and working directory of the backend.
    pub async fn info(&self) -> Result<SystemInfo, BridgeError> {
        self.bridge
            .request(&RequestDescriptor::get(routes::SYSTEM_INFO))
            .await
    }

    /// Ask the backend host to open a URL or path with its default application.
    pub async fn open_external(&self, target: &str) -> Result<Ack, BridgeError> {
        require("target", target)?;
        let req = RequestDescriptor::post(routes::OPEN_EXTERNAL, &OpenExternal { target })?;
        self.bridge.request(&req).await
    }
}

/// Raw I/O domain.
#[derive(Debug, Clone, Copy)]
pub struct IoApi<'a> {
    bridge: &'a Bridge,
}

impl IoApi<'_> {
    /// Text content of the file at `path`.
    pub async fn read_text(&self, path: &str) -> Result<String, BridgeError> {
        require("path", path)?;
        let req = RequestDescriptor::post(routes::READ_TEXT, &ReadText { path })?;
        let response: TextContent = self.bridge.request(&req).await?;
        Ok(response.content)
    }

    /// Write `content` (possibly empty) to `path`, replacing what was there.
    pub async fn write_text(&self, path: &str, content: &str) -> Result<Ack, BridgeError> {
        require("path", path)?;
        let req = RequestDescriptor::post(routes::WRITE_TEXT, &WriteText { path, content })?;
        self.bridge.request(&req).await
    }
}

/// Managed store domain.
#[derive(Debug, Clone, Copy)]
pub struct StoreApi<'a> {
    bridge: &'a Bridge,
}

impl StoreApi<'_> {
    /// Save `data` as document `id` of `collection`.
    ///
    /// `data` is encoded before anything is sent; encoding failures surface
    /// as input errors.
    pub async fn save_document<T: Serialize + ?Sized>(
        &self,
        collection: &str,
        id: &str,
        data: &T,
    ) -> Result<Ack, BridgeError> {
        DocumentAddress::new(collection, id).validate()?;
        let body = SaveDocument {
            collection,
            id,
            data,
        };
        let req = RequestDescriptor::post(routes::STORE_SAVE, &body)?;
        self.bridge.request(&req).await
    }

    /// Fetch document `id` of `collection` as untyped JSON.
    pub async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<serde_json::Value, BridgeError> {
        self.get_document_as(collection, id).await
    }

    /// Fetch document `id` of `collection`, decoded as `T`.
    pub async fn get_document_as<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<T, BridgeError> {
        let address = DocumentAddress::new(collection, id);
        address.validate()?;
        self.bridge
            .request(&RequestDescriptor::store_get(&address))
            .await
    }
}
