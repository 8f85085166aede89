//! Connection contract
//!
//! This is the narrow surface sessions use against the connection manager.
//! A single handle is shared by every session bound to the same origin; the
//! handle tells them apart by namespace.
//!
//! ```text
//! Session("/a", sink A) ─┐
//!                        ├─> ConnectionHandle(origin) ──> transport (not ours)
//! Session("/b", sink B) ─┘          │
//!                                   └─ namespace table: "a" → A, "b" → B
//! ```

use crate::error::Result;
use crate::payload::Payload;
use crate::sink::EventSink;
use serde_json::Value;
use std::sync::Arc;

/// One shared link to an origin
///
/// Every method must return without waiting on network I/O. Outbound calls
/// made while the link is down are accepted and buffered by the
/// implementation, never dropped silently.
pub trait ConnectionHandle: Send + Sync + 'static {
    /// Reserve `namespace` for a session that is completing its binding
    ///
    /// Inbound frames for `namespace` must be routed to `sink` from then on.
    /// Fails with [`SessionError::NamespaceInUse`] if another session holds
    /// the namespace. Must not call into `sink`: the binding is not yet
    /// visible to the session when this runs.
    ///
    /// [`SessionError::NamespaceInUse`]: crate::error::SessionError::NamespaceInUse
    fn register_session(&self, namespace: &str, sink: Arc<dyn EventSink>) -> Result<()>;

    /// The session on `namespace` has finished binding
    ///
    /// Called once after a successful [`register_session`](Self::register_session),
    /// outside every session lock. Sinks may be notified from here.
    fn session_ready(&self, namespace: &str);

    /// Queue a named event for `namespace`
    fn emit(&self, namespace: &str, event: &str, args: Vec<Value>) -> Result<()>;

    /// Queue an un-typed message for `namespace`
    fn send(&self, namespace: &str, payload: Payload) -> Result<()>;

    /// End the participation of `namespace`
    ///
    /// Whether the shared link closes as a result is the implementation's
    /// decision.
    fn disconnect(&self, namespace: &str) -> Result<()>;

    /// Restart the link if it currently believes it is connected, otherwise do nothing
    fn reconnect(&self);

    /// Current link status
    fn is_connected(&self) -> bool;
}

/// Creates connections for the registry
///
/// The registry guarantees `create` runs at most once per origin at a time
/// and caches whatever it returns, so implementations need not deduplicate.
/// Returning an error leaves nothing cached.
pub trait ConnectionFactory: Send + Sync + 'static {
    fn create(&self, origin: &str) -> Result<Arc<dyn ConnectionHandle>>;
}

impl<F> ConnectionFactory for F
where
    F: Fn(&str) -> Result<Arc<dyn ConnectionHandle>> + Send + Sync + 'static,
{
    fn create(&self, origin: &str) -> Result<Arc<dyn ConnectionHandle>> {
        self(origin)
    }
}
