//! Application-facing session handle

use crate::address::Address;
use crate::binder::{BindOutcome, BindState, Binder, Binding};
use crate::builder::{states, SessionBuilder};
use crate::manager::ConnectionRegistry;
use crate::traits::*;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Application handle for one logical channel to a server
///
/// A session is identified by an address and an [`EventSink`]. Once both are
/// known it is bound to the shared connection of the address's origin, and
/// every operation is forwarded to that connection together with the
/// session's namespace.
///
/// Operations on a session that has not finished binding fail with
/// [`SessionError::NotBound`] and never touch the registry.
///
/// # Example
/// ```ignore
/// let registry = Arc::new(ConnectionRegistry::new(QueuedFactory::new()));
///
/// // Address now, callback later
/// let session = Session::builder(Arc::clone(&registry))
///     .address("http://host/chat")
///     .build()?;
/// session.bind_callback(Arc::new(ChatSink::default()))?;
///
/// session.emit("join", [json!({"room": "lobby"})])?;
/// session.send("hello")?;
/// ```
pub struct Session {
    binder: Binder,
    default_address: Option<Address>,
}

impl Session {
    /// Create a session with no address and no callback
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self::from_parts(registry, None)
    }

    /// Start building a session
    pub fn builder(
        registry: Arc<ConnectionRegistry>,
    ) -> SessionBuilder<states::NoAddress, states::NoSink> {
        SessionBuilder::new(registry)
    }

    pub(crate) fn from_parts(
        registry: Arc<ConnectionRegistry>,
        default_address: Option<Address>,
    ) -> Self {
        Self {
            binder: Binder::new(registry),
            default_address,
        }
    }

    /// Supply either half of the identity, or both
    ///
    /// Halves may arrive in any order; the call that completes the identity
    /// acquires the connection and returns [`BindOutcome::Completed`].
    /// Supplying a half that is already set fails with
    /// [`SessionError::AlreadyBound`]; a partially bound session is rejected
    /// for good, a bound one stays bound. Any other error leaves the session
    /// as it was.
    pub fn bind(
        &self,
        address: Option<Address>,
        callback: Option<Arc<dyn EventSink>>,
    ) -> Result<BindOutcome> {
        self.binder.bind(address, callback)
    }

    /// Supply the address
    pub fn bind_address(&self, address: &str) -> Result<BindOutcome> {
        let address = Address::parse(address)?;
        self.binder.bind(Some(address), None)
    }

    /// Supply the callback
    pub fn bind_callback(&self, callback: Arc<dyn EventSink>) -> Result<BindOutcome> {
        self.binder.bind(None, Some(callback))
    }

    /// Bind a fresh session in one step
    ///
    /// Fails unless this call completes the binding.
    pub fn connect(&self, address: &str, callback: Arc<dyn EventSink>) -> Result<()> {
        let address = Address::parse(address)?;
        self.binder.bind_complete(Some(address), Some(callback), None)
    }

    /// Complete the binding with a callback
    ///
    /// Uses the address stored earlier, or the default address the session
    /// was built with. Fails with [`SessionError::MissingIdentity`] when
    /// neither exists.
    pub fn connect_callback(&self, callback: Arc<dyn EventSink>) -> Result<()> {
        self.binder
            .bind_complete(None, Some(callback), self.default_address.as_ref())
    }

    pub(crate) fn bind_complete(
        &self,
        address: Option<Address>,
        callback: Option<Arc<dyn EventSink>>,
    ) -> Result<()> {
        self.binder.bind_complete(address, callback, None)
    }

    fn bound(&self) -> Result<&Arc<Binding>> {
        self.binder.binding().ok_or(SessionError::NotBound)
    }

    /// Emit a named event
    ///
    /// Accepted even while the link is down; buffering is the connection's job.
    pub fn emit<I>(&self, event: &str, args: I) -> Result<()>
    where
        I: IntoIterator<Item = Value>,
    {
        let binding = self.bound()?;
        debug!("emit '{}' on namespace '{}'", event, binding.namespace);
        binding
            .connection
            .emit(&binding.namespace, event, args.into_iter().collect())
    }

    /// Send an un-typed message, text or JSON
    pub fn send(&self, payload: impl Into<Payload>) -> Result<()> {
        let binding = self.bound()?;
        binding.connection.send(&binding.namespace, payload.into())
    }

    /// Leave the shared connection
    pub fn disconnect(&self) -> Result<()> {
        let binding = self.bound()?;
        binding.connection.disconnect(&binding.namespace)
    }

    /// Ask the connection to restart
    ///
    /// Only acted upon if the connection believes it is connected.
    pub fn reconnect(&self) -> Result<()> {
        self.bound()?.connection.reconnect();
        Ok(())
    }

    pub fn is_connected(&self) -> Result<bool> {
        Ok(self.bound()?.connection.is_connected())
    }

    /// Namespace of a bound session
    pub fn namespace(&self) -> Option<&str> {
        self.binder.binding().map(|b| b.namespace.as_str())
    }

    /// Origin of a bound session
    pub fn origin(&self) -> Option<&str> {
        self.binder.binding().map(|b| b.origin.as_str())
    }

    /// Callback, once supplied
    pub fn callback(&self) -> Option<Arc<dyn EventSink>> {
        self.binder.sink()
    }

    /// Address, once supplied
    pub fn address(&self) -> Option<Address> {
        self.binder.address()
    }

    /// Shared connection of a bound session
    pub fn connection(&self) -> Option<Arc<dyn ConnectionHandle>> {
        self.binder.binding().map(|b| Arc::clone(&b.connection))
    }

    pub fn state(&self) -> BindState {
        self.binder.state()
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.binder.binding().is_some()
    }
}
