//! Lifecycle connection monitor.
//!
//! Holds one WebSocket to the backend's lifecycle endpoint for as long as
//! the application runs. The socket carries no application messages; only
//! its opening and closing matter. The backend treats the socket closing
//! as the UI going away.
//!
//! State moves `Unconnected -> Connected -> Disconnected`, or straight from
//! `Unconnected` to `Disconnected` when the handshake fails. There is no
//! reconnection.

use futures_util::{SinkExt, StreamExt};
use localbridge_core::{ConnectionState, LifecycleEvent, Transition};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{Notify, broadcast, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

// At most two transitions ever happen.
const EVENT_CAPACITY: usize = 4;

/// Receives connectivity changes.
///
/// Implemented for any `FnMut(ConnectionState)` closure.
pub trait LifecycleObserver: Send + 'static {
    /// The backend became reachable.
    fn on_connected(&mut self) {}
    /// The backend is (or remains) unreachable.
    fn on_disconnected(&mut self) {}
}

impl<F> LifecycleObserver for F
where
    F: FnMut(ConnectionState) + Send + 'static,
{
    fn on_connected(&mut self) {
        self(ConnectionState::Connected);
    }

    fn on_disconnected(&mut self) {
        self(ConnectionState::Disconnected);
    }
}

#[derive(Debug)]
struct Shared {
    state: watch::Sender<ConnectionState>,
    events: broadcast::Sender<Transition>,
}

impl Shared {
    /// Apply a connection event. State update and broadcast happen under the
    /// same lock that [`Lifecycle::subscribe`] takes.
    fn apply(&self, event: LifecycleEvent) {
        let mut transition = None;
        self.state.send_if_modified(|state| {
            let Some(next) = state.on_event(event) else {
                return false;
            };
            let t = Transition {
                from: *state,
                to: next,
            };
            *state = next;
            // No subscribers is fine.
            let _ = self.events.send(t);
            transition = Some(t);
            true
        });

        match transition.map(|t| t.to) {
            Some(ConnectionState::Connected) => tracing::info!("Connected to backend"),
            Some(ConnectionState::Disconnected) => {
                tracing::warn!("Disconnected from backend; application might be shutting down");
            }
            _ => {}
        }
    }
}

/// Handle to the running lifecycle monitor.
///
/// Exactly one should exist per application, owned by its entry point.
/// Dropping the handle stops the connection task without notifying anyone.
#[derive(Debug)]
pub struct Lifecycle {
    shared: Arc<Shared>,
    close: Arc<Notify>,
    task: JoinHandle<()>,
}

impl Lifecycle {
    /// Start monitoring the lifecycle endpoint at `url` (`ws://` or `wss://`).
    ///
    /// Must be called from within a tokio runtime. The returned monitor
    /// starts `Unconnected`; the handshake runs on a spawned task.
    pub fn init(url: impl Into<String>) -> Self {
        let (state, _) = watch::channel(ConnectionState::Unconnected);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let shared = Arc::new(Shared { state, events });
        let close = Arc::new(Notify::new());

        let task = tokio::spawn(run(url.into(), shared.clone(), close.clone()));

        Self {
            shared,
            close,
            task,
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.shared.state.borrow()
    }

    /// Current state plus every transition after it.
    pub fn subscribe(&self) -> Subscription {
        // Holding the state guard keeps `apply` out until the receiver exists.
        let state = self.shared.state.borrow();
        let events = self.shared.events.subscribe();
        Subscription {
            done: state.is_terminal(),
            initial: *state,
            events,
        }
    }

    /// Feed connectivity changes to `observer` from a dedicated task.
    ///
    /// If the monitor has already left `Unconnected`, the observer is first
    /// told about the current state.
    pub fn observe<O: LifecycleObserver>(&self, mut observer: O) -> JoinHandle<()> {
        let mut subscription = self.subscribe();
        tokio::spawn(async move {
            notify(&mut observer, subscription.initial());
            while let Some(transition) = subscription.next().await {
                notify(&mut observer, transition.to);
            }
        })
    }

    /// Resolves once the backend is unreachable.
    pub async fn wait_for_disconnect(&self) {
        let mut rx = self.shared.state.subscribe();
        // The sender lives in `self`, so this only errs if it is gone already.
        let _ = rx.wait_for(|state| state.is_terminal()).await;
    }

    /// Close the lifecycle socket and wait for `Disconnected`.
    ///
    /// The backend takes this as the application shutting down. No-op once
    /// disconnected.
    pub async fn close(&self) {
        if self.state().is_terminal() {
            return;
        }
        self.close.notify_one();
        self.wait_for_disconnect().await;
    }
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn notify<O: LifecycleObserver>(observer: &mut O, state: ConnectionState) {
    match state {
        ConnectionState::Unconnected => {}
        ConnectionState::Connected => observer.on_connected(),
        ConnectionState::Disconnected => observer.on_disconnected(),
    }
}

/// A stream of transitions, starting after [`Subscription::initial`].
#[derive(Debug)]
pub struct Subscription {
    initial: ConnectionState,
    events: broadcast::Receiver<Transition>,
    done: bool,
}

impl Subscription {
    /// State at the moment of subscribing.
    pub fn initial(&self) -> ConnectionState {
        self.initial
    }

    /// Next transition, or `None` once `Disconnected` has been reported.
    pub async fn next(&mut self) -> Option<Transition> {
        if self.done {
            return None;
        }
        loop {
            match self.events.recv().await {
                Ok(transition) => {
                    self.done = transition.to.is_terminal();
                    return Some(transition);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Lifecycle subscriber skipped {} transitions", skipped);
                }
                Err(RecvError::Closed) => {
                    self.done = true;
                    return None;
                }
            }
        }
    }
}

async fn run(url: String, shared: Arc<Shared>, close: Arc<Notify>) {
    tracing::debug!("Opening lifecycle connection to {}", url);

    let ws = tokio::select! {
        result = tokio_tungstenite::connect_async(url.as_str()) => match result {
            Ok((ws, _response)) => ws,
            Err(e) => {
                tracing::warn!("Lifecycle connection to {} failed: {}", url, e);
                shared.apply(LifecycleEvent::Closed);
                return;
            }
        },
        () = close.notified() => {
            tracing::debug!("Lifecycle closed before handshake");
            shared.apply(LifecycleEvent::Closed);
            return;
        }
    };

    shared.apply(LifecycleEvent::Opened);
    let (mut sink, mut stream) = ws.split();

    loop {
        tokio::select! {
            msg = stream.next() => match msg {
                Some(Ok(Message::Close(frame))) => {
                    tracing::debug!("Backend closed lifecycle connection: {:?}", frame);
                    break;
                }
                // No application messages; pings are answered by tungstenite.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!("Lifecycle connection error: {}", e);
                    break;
                }
                None => break,
            },
            () = close.notified() => {
                if let Err(e) = sink.send(Message::Close(None)).await {
                    tracing::debug!("Sending lifecycle close frame failed: {}", e);
                }
                break;
            }
        }
    }

    // Flushes the reply to a backend close frame, or finishes our own close.
    if let Err(e) = sink.close().await {
        tracing::debug!("Closing lifecycle connection failed: {}", e);
    }

    shared.apply(LifecycleEvent::Closed);
}
