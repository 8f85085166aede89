//! One-time identity binding
//!
//! A session's identity is its address and its event sink. Each half may
//! arrive separately, in either order, but each can be set only once. The
//! call that supplies the last missing half parses the address, acquires the
//! origin's shared connection and registers the session on it.
//!
//! ```text
//!            address or sink            remaining half
//! Unbound ───────────────────> Partial ───────────────────> Bound
//!    │                            │
//!    └──── half given twice ──────┴──────────────────────> Rejected
//! ```
//!
//! All of this happens under one lock over the whole slot, so two racing
//! calls can never both see a complete identity, and nobody can observe a
//! complete identity whose connection has not been acquired yet. The lock
//! is released before the connection is told the session is ready, so a
//! sink notified at that point can use its session freely.

use crate::address::Address;
use crate::error::{Result, SessionError};
use crate::manager::ConnectionRegistry;
use crate::traits::{ConnectionHandle, EventSink};
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Which half of the identity a partially bound session holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    Address,
    Callback,
}

/// Observable binding state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindState {
    Unbound,
    PartiallyBound(Half),
    Bound,
    Rejected,
}

/// Successful outcome of a bind call
///
/// Rejections are reported through `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// Both halves are set and the session is registered on its connection
    Completed,
    /// Still waiting on a missing half
    Pending,
}

/// A completed identity
pub struct Binding {
    pub address: Address,
    pub origin: String,
    pub namespace: String,
    pub sink: Arc<dyn EventSink>,
    pub connection: Arc<dyn ConnectionHandle>,
}

enum Slot {
    Unbound,
    WithAddress(Address),
    WithSink(Arc<dyn EventSink>),
    Bound,
    Rejected,
}

/// Holds the write-once identity of one session
pub struct Binder {
    registry: Arc<ConnectionRegistry>,
    slot: Mutex<Slot>,
    /// Written once, while `slot` is locked, right before `slot` becomes `Bound`
    bound: OnceLock<Arc<Binding>>,
}

impl Binder {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            registry,
            slot: Mutex::new(Slot::Unbound),
            bound: OnceLock::new(),
        }
    }

    /// Supply either half, or both
    pub fn bind(
        &self,
        address: Option<Address>,
        sink: Option<Arc<dyn EventSink>>,
    ) -> Result<BindOutcome> {
        self.bind_inner(address, sink, None, false)
    }

    /// Complete the identity in this call or change nothing
    ///
    /// `fallback` is used as the address when none was given now or earlier.
    /// It is consulted under the slot lock, so it can never collide with an
    /// address another thread stores concurrently.
    pub fn bind_complete(
        &self,
        address: Option<Address>,
        sink: Option<Arc<dyn EventSink>>,
        fallback: Option<&Address>,
    ) -> Result<()> {
        self.bind_inner(address, sink, fallback, true).map(|_| ())
    }

    fn bind_inner(
        &self,
        address: Option<Address>,
        sink: Option<Arc<dyn EventSink>>,
        fallback: Option<&Address>,
        require_complete: bool,
    ) -> Result<BindOutcome> {
        let mut slot = self.slot.lock();

        let conflict = match &*slot {
            Slot::Bound => {
                warn!("Bind attempted on a bound session");
                return Err(SessionError::AlreadyBound(
                    "session identity is already complete".into(),
                ));
            }
            Slot::Rejected => {
                return Err(SessionError::AlreadyBound(
                    "session was rejected by an earlier rebind".into(),
                ));
            }
            Slot::Unbound => None,
            Slot::WithAddress(_) => address.is_some().then_some(Half::Address),
            Slot::WithSink(_) => sink.is_some().then_some(Half::Callback),
        };

        if let Some(half) = conflict {
            warn!("Rejecting session: {:?} supplied twice", half);
            *slot = Slot::Rejected;
            return Err(SessionError::AlreadyBound(format!(
                "{} was already set",
                match half {
                    Half::Address => "address",
                    Half::Callback => "callback",
                }
            )));
        }

        if address.is_none() && sink.is_none() && !require_complete {
            return Ok(BindOutcome::Pending);
        }

        let address = address.or_else(|| match &*slot {
            Slot::WithAddress(held) => Some(held.clone()),
            _ => None,
        });
        let sink = sink.or_else(|| match &*slot {
            Slot::WithSink(held) => Some(Arc::clone(held)),
            _ => None,
        });
        let address = match (address, &sink) {
            (None, Some(_)) => fallback.cloned(),
            (address, _) => address,
        };

        match (address, sink) {
            (address, sink) if require_complete && (address.is_none() || sink.is_none()) => {
                Err(SessionError::MissingIdentity(
                    match address {
                        None => "no address was supplied and no default address is configured",
                        Some(_) => "no callback was supplied",
                    }
                    .into(),
                ))
            }
            (Some(address), Some(sink)) => {
                // On failure the slot keeps its previous contents
                let binding = Arc::new(self.complete(address, sink)?);

                // Set exactly once: only reachable while the slot is not `Bound`
                let published = self.bound.set(Arc::clone(&binding)).is_ok();
                debug_assert!(published, "binding published twice");
                *slot = Slot::Bound;
                drop(slot);

                // Sinks may re-enter the session from here
                binding.connection.session_ready(&binding.namespace);
                Ok(BindOutcome::Completed)
            }
            (Some(address), None) => {
                debug!("Address '{}' stored, waiting for callback", address);
                *slot = Slot::WithAddress(address);
                Ok(BindOutcome::Pending)
            }
            (None, Some(sink)) => {
                debug!("Callback stored, waiting for address");
                *slot = Slot::WithSink(sink);
                Ok(BindOutcome::Pending)
            }
            (None, None) => Ok(BindOutcome::Pending),
        }
    }

    fn complete(&self, address: Address, sink: Arc<dyn EventSink>) -> Result<Binding> {
        let endpoint = address.endpoint();
        let connection = self.registry.acquire(&endpoint.origin)?;
        connection.register_session(&endpoint.namespace, Arc::clone(&sink))?;

        info!(
            "Session bound to '{}' (namespace '{}')",
            endpoint.origin, endpoint.namespace
        );

        Ok(Binding {
            address,
            origin: endpoint.origin,
            namespace: endpoint.namespace,
            sink,
            connection,
        })
    }

    /// Completed identity, without locking
    #[inline]
    pub fn binding(&self) -> Option<&Arc<Binding>> {
        self.bound.get()
    }

    pub fn state(&self) -> BindState {
        match &*self.slot.lock() {
            Slot::Unbound => BindState::Unbound,
            Slot::WithAddress(_) => BindState::PartiallyBound(Half::Address),
            Slot::WithSink(_) => BindState::PartiallyBound(Half::Callback),
            Slot::Bound => BindState::Bound,
            Slot::Rejected => BindState::Rejected,
        }
    }

    /// Address, whether stored alone or part of a completed binding
    pub fn address(&self) -> Option<Address> {
        if let Some(binding) = self.binding() {
            return Some(binding.address.clone());
        }
        match &*self.slot.lock() {
            Slot::WithAddress(address) => Some(address.clone()),
            _ => None,
        }
    }

    /// Sink, whether stored alone or part of a completed binding
    pub fn sink(&self) -> Option<Arc<dyn EventSink>> {
        if let Some(binding) = self.binding() {
            return Some(Arc::clone(&binding.sink));
        }
        match &*self.slot.lock() {
            Slot::WithSink(sink) => Some(Arc::clone(sink)),
            _ => None,
        }
    }
}
