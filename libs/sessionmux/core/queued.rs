//! Buffered in-process connection
//!
//! [`QueuedConnection`] implements the session-facing half of a connection
//! manager without any transport. Outbound calls become [`Outbound`] frames
//! on a crossbeam channel that a transport drains at its own pace; inbound
//! traffic is pushed in through the `dispatch_*` methods and routed to the
//! sink registered for the frame's namespace.
//!
//! ```text
//! Session ──emit/send/disconnect──> QueuedConnection ──Outbound──> transport
//!                                          │
//! Sink <──on_event/on_message── namespace table <──dispatch_*── transport
//! ```

use crate::connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState, Metrics};
use crate::traits::*;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Frame waiting to be written by the transport
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Emit {
        namespace: String,
        event: String,
        args: Vec<Value>,
    },
    Send {
        namespace: String,
        payload: Payload,
    },
    /// A namespace left the connection
    Disconnect { namespace: String },
    /// The last namespace left; the link may be closed
    Close,
    /// Restart the link
    Reconnect,
}

/// Shared connection that buffers outbound frames and routes inbound ones
pub struct QueuedConnection {
    origin: String,
    state: AtomicConnectionState,
    metrics: AtomicMetrics,
    sessions: RwLock<HashMap<String, Arc<dyn EventSink>>>,
    outbound_tx: Sender<Outbound>,
    outbound_rx: Receiver<Outbound>,
}

impl QueuedConnection {
    /// Create a disconnected connection for `origin`
    ///
    /// `capacity` bounds the outbound queue; `None` leaves it unbounded.
    pub fn new(origin: impl Into<String>, capacity: Option<usize>) -> Self {
        let (outbound_tx, outbound_rx) = match capacity {
            Some(capacity) => bounded(capacity),
            None => unbounded(),
        };

        Self {
            origin: origin.into(),
            state: AtomicConnectionState::new(ConnectionState::Disconnected),
            metrics: AtomicMetrics::new(),
            sessions: RwLock::new(HashMap::new()),
            outbound_tx,
            outbound_rx,
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Receiver for the transport to drain
    pub fn outbound(&self) -> Receiver<Outbound> {
        self.outbound_rx.clone()
    }

    /// Try to take one outbound frame (non-blocking)
    pub fn try_recv_outbound(&self) -> Option<Outbound> {
        self.outbound_rx.try_recv().ok()
    }

    /// Take every frame queued so far
    pub fn drain_outbound(&self) -> Vec<Outbound> {
        self.outbound_rx.try_iter().collect()
    }

    #[inline]
    pub fn connection_state(&self) -> ConnectionState {
        self.state.get()
    }

    pub fn metrics(&self) -> Metrics {
        Metrics {
            frames_queued: self.metrics.frames_queued(),
            events_dispatched: self.metrics.events_dispatched(),
            reconnect_count: self.metrics.reconnect_count(),
            connection_state: self.state.get(),
        }
    }

    /// Namespaces with a registered session
    pub fn namespaces(&self) -> Vec<String> {
        self.sessions.read().keys().cloned().collect()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Record that the transport is connecting
    pub fn mark_connecting(&self) {
        self.state.set(ConnectionState::Connecting);
    }

    /// Record that the transport is up and tell every session
    pub fn mark_connected(&self) {
        self.state.set(ConnectionState::Connected);
        info!("Connected to {}", self.origin);
        for sink in self.sinks() {
            sink.on_connect();
        }
    }

    /// Record that the transport went down and tell every session
    pub fn mark_disconnected(&self) {
        self.state.set(ConnectionState::Disconnected);
        info!("Disconnected from {}", self.origin);
        for sink in self.sinks() {
            sink.on_disconnect();
        }
    }

    /// Route an inbound event to the sink of `namespace`
    ///
    /// Returns `false` if no session is registered there.
    pub fn dispatch_event(&self, namespace: &str, event: &str, args: &[Value]) -> bool {
        self.with_sink(namespace, |sink| sink.on_event(event, args))
    }

    /// Route an inbound message to the sink of `namespace`
    pub fn dispatch_message(&self, namespace: &str, payload: Payload) -> bool {
        self.with_sink(namespace, |sink| sink.on_message(payload))
    }

    /// Route an error report to the sink of `namespace`
    pub fn dispatch_error(&self, namespace: &str, message: &str) -> bool {
        self.with_sink(namespace, |sink| sink.on_error(message))
    }

    fn sinks(&self) -> Vec<Arc<dyn EventSink>> {
        self.sessions.read().values().map(Arc::clone).collect()
    }

    fn with_sink(&self, namespace: &str, f: impl FnOnce(&dyn EventSink)) -> bool {
        // Sinks may call back into the connection, so never hold the lock while invoking one
        let sink = self.sessions.read().get(namespace).map(Arc::clone);
        match sink {
            Some(sink) => {
                f(sink.as_ref());
                self.metrics.increment_dispatched();
                true
            }
            None => {
                warn!("No session registered for namespace '{}' on {}", namespace, self.origin);
                false
            }
        }
    }

    fn enqueue(&self, frame: Outbound) -> Result<()> {
        self.outbound_tx.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => {
                SessionError::ChannelSend(format!("outbound queue for {} is full", self.origin))
            }
            TrySendError::Disconnected(_) => {
                SessionError::ChannelSend(format!("outbound queue for {} is closed", self.origin))
            }
        })?;
        self.metrics.increment_queued();
        Ok(())
    }
}

impl ConnectionHandle for QueuedConnection {
    fn register_session(&self, namespace: &str, sink: Arc<dyn EventSink>) -> Result<()> {
        let mut sessions = self.sessions.write();
        if sessions.contains_key(namespace) {
            warn!("Namespace '{}' on {} is already in use", namespace, self.origin);
            return Err(SessionError::NamespaceInUse {
                origin: self.origin.clone(),
                namespace: namespace.to_string(),
            });
        }
        sessions.insert(namespace.to_string(), sink);
        debug!("Registered namespace '{}' on {}", namespace, self.origin);
        Ok(())
    }

    fn session_ready(&self, namespace: &str) {
        if !self.state.is_connected() {
            return;
        }
        let sink = self.sessions.read().get(namespace).map(Arc::clone);
        if let Some(sink) = sink {
            sink.on_connect();
        }
    }

    fn emit(&self, namespace: &str, event: &str, args: Vec<Value>) -> Result<()> {
        self.enqueue(Outbound::Emit {
            namespace: namespace.to_string(),
            event: event.to_string(),
            args,
        })
    }

    fn send(&self, namespace: &str, payload: Payload) -> Result<()> {
        self.enqueue(Outbound::Send {
            namespace: namespace.to_string(),
            payload,
        })
    }

    fn disconnect(&self, namespace: &str) -> Result<()> {
        let now_empty = {
            let mut sessions = self.sessions.write();
            sessions.remove(namespace);
            sessions.is_empty()
        };

        self.enqueue(Outbound::Disconnect {
            namespace: namespace.to_string(),
        })?;

        if now_empty {
            debug!("Last session left {}", self.origin);
            self.enqueue(Outbound::Close)?;
        }
        Ok(())
    }

    fn reconnect(&self) {
        if !self
            .state
            .transition(ConnectionState::Connected, ConnectionState::Reconnecting)
        {
            debug!("Ignoring reconnect for {}: not connected", self.origin);
            return;
        }

        self.metrics.increment_reconnects();
        if let Err(e) = self.enqueue(Outbound::Reconnect) {
            warn!("Failed to queue reconnect for {}: {}", self.origin, e);
        }
    }

    #[inline]
    fn is_connected(&self) -> bool {
        self.state.is_connected()
    }
}

/// [`ConnectionFactory`] producing [`QueuedConnection`]s
///
/// Keeps a typed handle to every connection it created so the transport
/// side can find them by origin.
#[derive(Default)]
pub struct QueuedFactory {
    capacity: Option<usize>,
    created: RwLock<HashMap<String, Arc<QueuedConnection>>>,
}

impl QueuedFactory {
    /// Factory with unbounded outbound queues
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory whose connections hold at most `capacity` outbound frames
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            created: RwLock::new(HashMap::new()),
        }
    }

    /// Factory configured from a [`SessionConfig`](crate::config::SessionConfig)
    pub fn from_config(config: &crate::config::SessionConfig) -> Self {
        Self {
            capacity: config.outbound_capacity,
            created: RwLock::new(HashMap::new()),
        }
    }

    /// Typed handle to the connection created for `origin`
    pub fn get(&self, origin: &str) -> Option<Arc<QueuedConnection>> {
        self.created.read().get(origin).map(Arc::clone)
    }

    /// Number of connections created
    pub fn created_count(&self) -> usize {
        self.created.read().len()
    }
}

impl ConnectionFactory for QueuedFactory {
    fn create(&self, origin: &str) -> Result<Arc<dyn ConnectionHandle>> {
        let connection = Arc::new(QueuedConnection::new(origin, self.capacity));
        self.created
            .write()
            .insert(origin.to_string(), Arc::clone(&connection));
        Ok(connection)
    }
}
