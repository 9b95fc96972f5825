//! Core types for the local platform bridge.
//!
//! This crate is transport-free. It describes what goes over the wire and
//! how the lifecycle connection moves between states; the client crate
//! does the actual I/O.

mod address;
mod message;
mod request;

pub use address::{AddressError, DocumentAddress};
pub use message::{
    Ack, ErrorDetail, OpenExternal, ReadText, SaveDocument, SystemInfo, TextContent, WriteText,
};
pub use request::{Method, RequestDescriptor, routes};

use std::fmt;

/// Backend availability as seen through the lifecycle connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// No handshake has completed yet.
    Unconnected,
    /// The lifecycle connection is open; the backend is reachable.
    Connected,
    /// The connection closed or never opened. Terminal.
    Disconnected,
}

/// Raw events from the underlying lifecycle connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Handshake completed.
    Opened,
    /// Closed by either side, or failed.
    Closed,
}

impl ConnectionState {
    /// Next state after `event`, or `None` if the event changes nothing.
    ///
    /// `Disconnected` absorbs every event; there is no reconnection.
    pub fn on_event(self, event: LifecycleEvent) -> Option<Self> {
        match (self, event) {
            (Self::Unconnected, LifecycleEvent::Opened) => Some(Self::Connected),
            (Self::Unconnected | Self::Connected, LifecycleEvent::Closed) => {
                Some(Self::Disconnected)
            }
            (Self::Connected, LifecycleEvent::Opened) | (Self::Disconnected, _) => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Disconnected
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unconnected => "unconnected",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        })
    }
}

/// A state change, as delivered to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ConnectionState,
    pub to: ConnectionState,
}
