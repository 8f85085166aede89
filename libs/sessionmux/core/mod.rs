//! # Sessionmux core
//!
//! Session binding and the pieces around it:
//!
//! - **address**: Splits an address into origin and namespace
//! - **binder**: Write-once identity state machine
//! - **session**: Application-facing handle that delegates to its connection
//! - **builder**: Type-state construction of sessions
//! - **queued**: Buffered in-process connection manager
//!
//! ## Example
//!
//! ```rust,ignore
//! use sessionmux::*;
//! use std::sync::Arc;
//!
//! let factory = Arc::new(QueuedFactory::new());
//! let registry = Arc::new(ConnectionRegistry::with_factory(factory.clone()));
//!
//! let chat = Session::builder(Arc::clone(&registry))
//!     .address("http://host/chat")
//!     .callback(NoOpSink)
//!     .build()?;
//!
//! chat.emit("hello", [json!("world")])?;
//!
//! // Transport side
//! let connection = factory.get("http://host").unwrap();
//! for frame in connection.drain_outbound() {
//!     println!("{:?}", frame);
//! }
//! ```

pub mod address;
pub mod binder;
pub mod builder;
pub mod config;
pub mod connection_state;
pub mod queued;
pub mod session;

// Re-export main types
pub use address::{Address, Endpoint};
pub use binder::{BindOutcome, BindState, Binder, Binding, Half};
pub use builder::{states, SessionBuilder};
pub use config::{ConfigError, SessionConfig};
pub use connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState, Metrics};
pub use queued::{Outbound, QueuedConnection, QueuedFactory};
pub use session::Session;
