//! The single error shape every bridge operation fails with.

use std::fmt;

/// Message used whenever no response was obtained.
pub const UNREACHABLE: &str = "backend unreachable";

/// Message used when a success response could not be decoded.
pub const UNREADABLE: &str = "backend returned an unreadable response";

/// Which stage of a call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No response was obtained (backend down, connection refused).
    Transport,
    /// The backend answered with a failure status.
    Backend,
    /// The backend answered with success but the body was not valid JSON
    /// of the expected shape.
    Decode,
    /// Caller-supplied input was rejected before any network call.
    Input,
}

/// A failed bridge call.
///
/// Only [`ErrorKind::Backend`] carries a status code. The message is always
/// human-readable; when the backend supplied a detail it is used verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeError {
    kind: ErrorKind,
    status: Option<u16>,
    message: String,
}

impl BridgeError {
    pub fn unreachable() -> Self {
        Self {
            kind: ErrorKind::Transport,
            status: None,
            message: UNREACHABLE.to_string(),
        }
    }

    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Backend,
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn decode() -> Self {
        Self {
            kind: ErrorKind::Decode,
            status: None,
            message: UNREADABLE.to_string(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Input,
            status: None,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status of a backend-reported failure.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// The human-readable message, without any decoration.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "[API Error {status}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<serde_json::Error> for BridgeError {
    fn from(e: serde_json::Error) -> Self {
        Self::input(format!("cannot encode request body: {e}"))
    }
}

impl From<localbridge_core::AddressError> for BridgeError {
    fn from(e: localbridge_core::AddressError) -> Self {
        Self::input(e.to_string())
    }
}
