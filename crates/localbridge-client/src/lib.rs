//! Client side of the local platform bridge.
//!
//! Two pieces, independent of each other:
//! - [`Bridge`] turns domain calls (system info, raw text I/O, managed
//!   store) into backend HTTP calls and every failure into a [`BridgeError`].
//! - [`Lifecycle`] holds the lifecycle WebSocket and reports whether the
//!   backend is reachable. It never gates bridge calls.
//!
//! [`Platform`] bundles both into the one context an application creates at
//! startup.

mod bridge;
mod config;
mod error;
mod lifecycle;

pub use bridge::{Bridge, IoApi, StoreApi, SystemApi};
pub use config::{BridgeConfig, ConfigError, DEFAULT_BASE_URL};
pub use error::{BridgeError, ErrorKind, UNREACHABLE, UNREADABLE};
pub use lifecycle::{Lifecycle, LifecycleObserver, Subscription};
pub use localbridge_core::{
    Ack, ConnectionState, DocumentAddress, RequestDescriptor, SystemInfo, Transition,
};

/// Process-wide bridge context.
///
/// Created once by the application entry point and handed to whatever
/// needs to talk to the backend.
#[derive(Debug)]
pub struct Platform {
    bridge: Bridge,
    lifecycle: Lifecycle,
}

impl Platform {
    /// Build the request bridge and start the lifecycle monitor.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: BridgeConfig) -> Self {
        tracing::debug!("Starting bridge for {}", config.base_url());
        let lifecycle = Lifecycle::init(config.lifecycle_url());
        Self {
            bridge: Bridge::new(config),
            lifecycle,
        }
    }

    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
}
