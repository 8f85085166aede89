use crate::traits::{ConnectionFactory, ConnectionHandle, Result, SessionError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Origin string, `scheme://authority`
pub type Origin = String;

/// Registry of shared connections, one per origin
///
/// Every session bound to an origin receives the same connection instance,
/// which lets many namespaces share one physical link. The registry is an
/// ordinary value: create one per application (or per test) and hand it to
/// sessions as `Arc<ConnectionRegistry>`.
///
/// Entries are never removed here. Tearing down an idle link is the
/// connection manager's call.
///
/// # Example
/// ```ignore
/// let registry = Arc::new(ConnectionRegistry::new(QueuedFactory::new()));
///
/// let chat = Session::builder(Arc::clone(&registry))
///     .address("http://host/chat")
///     .callback(ChatSink::default())
///     .build()?;
/// let news = Session::builder(Arc::clone(&registry))
///     .address("http://host/news")
///     .callback(NewsSink::default())
///     .build()?;
///
/// assert_eq!(registry.len(), 1);
/// ```
pub struct ConnectionRegistry {
    factory: Arc<dyn ConnectionFactory>,
    connections: RwLock<HashMap<Origin, Arc<dyn ConnectionHandle>>>,
}

impl ConnectionRegistry {
    /// Create a registry that builds connections with `factory`
    pub fn new(factory: impl ConnectionFactory) -> Self {
        Self::with_factory(Arc::new(factory))
    }

    /// Create a registry around an already shared factory
    pub fn with_factory(factory: Arc<dyn ConnectionFactory>) -> Self {
        Self {
            factory,
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Get the connection for `origin`, creating it on first use
    ///
    /// Concurrent callers for the same origin all receive the instance
    /// created by whichever of them got there first. A factory failure is
    /// reported as [`SessionError::ConnectionUnavailable`] and nothing is
    /// stored, so a later call may try again.
    pub fn acquire(&self, origin: &str) -> Result<Arc<dyn ConnectionHandle>> {
        if let Some(existing) = self.connections.read().get(origin) {
            debug!("Reusing connection for '{}'", origin);
            return Ok(Arc::clone(existing));
        }

        let mut connections = self.connections.write();

        // Another caller may have created it between the two locks
        if let Some(existing) = connections.get(origin) {
            debug!("Reusing connection for '{}'", origin);
            return Ok(Arc::clone(existing));
        }

        let connection = self.factory.create(origin).map_err(|e| {
            warn!("Failed to create connection for '{}': {}", origin, e);
            match e {
                SessionError::ConnectionUnavailable { .. } => e,
                other => SessionError::ConnectionUnavailable {
                    origin: origin.to_string(),
                    reason: other.to_string(),
                },
            }
        })?;

        connections.insert(origin.to_string(), Arc::clone(&connection));
        info!("Created connection for '{}'", origin);
        Ok(connection)
    }

    /// Get the connection for `origin` without creating one
    pub fn get(&self, origin: &str) -> Option<Arc<dyn ConnectionHandle>> {
        self.connections.read().get(origin).map(Arc::clone)
    }

    /// Check if a connection exists for `origin`
    pub fn contains(&self, origin: &str) -> bool {
        self.connections.read().contains_key(origin)
    }

    /// Get the number of connections
    pub fn len(&self) -> usize {
        self.connections.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.read().is_empty()
    }

    /// Get all origins with a connection
    pub fn origins(&self) -> Vec<Origin> {
        self.connections.read().keys().cloned().collect()
    }

    /// Get the number of connections whose link is up
    pub fn connected_count(&self) -> usize {
        self.connections
            .read()
            .values()
            .filter(|c| c.is_connected())
            .count()
    }

    /// Get link status for all connections
    pub fn link_statuses(&self) -> HashMap<Origin, bool> {
        self.connections
            .read()
            .iter()
            .map(|(origin, connection)| (origin.clone(), connection.is_connected()))
            .collect()
    }
}
