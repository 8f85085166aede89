//! Event sinks
//!
//! An [`EventSink`] is the callback half of a session's identity. The
//! connection manager looks it up by namespace and invokes it for every
//! inbound frame addressed to that namespace.

use crate::payload::Payload;
use serde_json::Value;

/// Receiver of inbound events for one session
///
/// Sinks are shared as `Arc<dyn EventSink>` between the session and the
/// connection it is bound to, so every method takes `&self`. Use interior
/// mutability for any state a sink keeps.
///
/// # Example
///
/// ```ignore
/// struct ChatSink {
///     messages: Mutex<Vec<String>>,
/// }
///
/// impl EventSink for ChatSink {
///     fn on_message(&self, payload: Payload) {
///         if let Some(text) = payload.as_text() {
///             self.messages.lock().push(text.to_string());
///         }
///     }
///
///     fn on_event(&self, event: &str, args: &[Value]) {
///         println!("{} {:?}", event, args);
///     }
/// }
/// ```
pub trait EventSink: Send + Sync + 'static {
    /// The namespace this sink is registered on became reachable
    fn on_connect(&self) {}

    /// The namespace this sink is registered on became unreachable
    fn on_disconnect(&self) {}

    /// An un-typed message arrived
    fn on_message(&self, payload: Payload);

    /// A named event arrived
    fn on_event(&self, event: &str, args: &[Value]);

    /// The connection manager reported an error for this namespace
    fn on_error(&self, _message: &str) {}
}

/// A sink that ignores everything
///
/// Useful when a session only ever sends.
pub struct NoOpSink;

impl EventSink for NoOpSink {
    fn on_message(&self, _payload: Payload) {}

    fn on_event(&self, _event: &str, _args: &[Value]) {}
}
