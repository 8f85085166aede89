pub mod states;

use crate::address::Address;
use crate::config::SessionConfig;
use crate::manager::ConnectionRegistry;
use crate::session::Session;
use crate::traits::*;
use states::*;
use std::sync::Arc;

/// Type-state builder for [`Session`]
///
/// Each construction form of a session maps to one builder state:
///
/// | address | callback | `build()` returns                               |
/// |---------|----------|-------------------------------------------------|
/// | no      | no       | unbound session                                 |
/// | yes     | no       | session waiting for its callback                |
/// | no      | yes      | bound session on the default address, or error  |
/// | yes     | yes      | bound session, or error                         |
///
/// A session that fails to build is never handed out.
pub struct SessionBuilder<A, S>
where
    A: AddressState,
    S: SinkState,
{
    _state: TypeState<A, S>,
    registry: Arc<ConnectionRegistry>,
    address: Option<String>,
    sink: Option<Arc<dyn EventSink>>,
    default_address: Option<String>,
}

impl SessionBuilder<NoAddress, NoSink> {
    /// Create a new builder instance
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            _state: TypeState::new(),
            registry,
            address: None,
            sink: None,
            default_address: None,
        }
    }
}

// Address setting
impl<S> SessionBuilder<NoAddress, S>
where
    S: SinkState,
{
    pub fn address(self, address: impl Into<String>) -> SessionBuilder<HasAddress, S> {
        SessionBuilder {
            _state: TypeState::new(),
            registry: self.registry,
            address: Some(address.into()),
            sink: self.sink,
            default_address: self.default_address,
        }
    }
}

// Callback setting
impl<A> SessionBuilder<A, NoSink>
where
    A: AddressState,
{
    pub fn callback<E>(self, sink: E) -> SessionBuilder<A, HasSink>
    where
        E: EventSink,
    {
        self.shared_callback(Arc::new(sink))
    }

    /// Set a callback that is already shared elsewhere
    pub fn shared_callback(self, sink: Arc<dyn EventSink>) -> SessionBuilder<A, HasSink> {
        SessionBuilder {
            _state: TypeState::new(),
            registry: self.registry,
            address: self.address,
            sink: Some(sink),
            default_address: self.default_address,
        }
    }
}

impl<A, S> SessionBuilder<A, S>
where
    A: AddressState,
    S: SinkState,
{
    /// Address used when a callback arrives without one
    pub fn default_address(mut self, address: impl Into<String>) -> Self {
        self.default_address = Some(address.into());
        self
    }

    /// Apply a loaded configuration
    pub fn config(mut self, config: &SessionConfig) -> Self {
        if let Some(address) = &config.default_address {
            self.default_address = Some(address.clone());
        }
        self
    }

    fn assemble(self) -> Result<(Session, Option<Address>, Option<Arc<dyn EventSink>>)> {
        let default_address = self
            .default_address
            .as_deref()
            .map(Address::parse)
            .transpose()?;
        let address = self.address.as_deref().map(Address::parse).transpose()?;

        Ok((
            Session::from_parts(self.registry, default_address),
            address,
            self.sink,
        ))
    }
}

impl SessionBuilder<NoAddress, NoSink> {
    /// Build an unbound session
    pub fn build(self) -> Result<Session> {
        let (session, _, _) = self.assemble()?;
        Ok(session)
    }
}

impl SessionBuilder<HasAddress, NoSink> {
    /// Build a session that waits for its callback
    pub fn build(self) -> Result<Session> {
        let (session, address, _) = self.assemble()?;
        session.bind(address, None)?;
        Ok(session)
    }
}

impl SessionBuilder<NoAddress, HasSink> {
    /// Build a session bound to the default address
    ///
    /// Fails with [`SessionError::MissingIdentity`] if no default address
    /// was configured.
    pub fn build(self) -> Result<Session> {
        let (session, _, sink) = self.assemble()?;
        let sink = sink.ok_or_else(|| SessionError::MissingIdentity("no callback".into()))?;
        session.connect_callback(sink)?;
        Ok(session)
    }
}

impl SessionBuilder<HasAddress, HasSink> {
    /// Build a bound session
    pub fn build(self) -> Result<Session> {
        let (session, address, sink) = self.assemble()?;
        session.bind_complete(address, sink)?;
        Ok(session)
    }
}
