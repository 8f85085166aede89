//! # Sessionmux
//!
//! Client-side session handles for realtime push messaging, multiplexed over
//! shared per-origin connections.
//!
//! ## Features
//!
//! - **Write-once identity**: A session's address and callback are each set
//!   once, in any order, under a single lock
//! - **Connection sharing**: Every session on an origin uses one connection;
//!   sessions are told apart by namespace
//! - **Injected registry**: No globals; swap the connection factory in tests
//! - **Type-state builder**: Construction forms checked at compile time
//! - **Non-blocking delegation**: Operations hand off to the connection and return

pub mod traits;
pub mod core;
pub mod manager;

// Re-export all traits
pub use traits::*;

// Re-export core functionality
pub use self::core::{
    address, binder, builder, config, connection_state, queued, session,
    address::{Address, Endpoint},
    binder::{BindOutcome, BindState, Binder, Binding, Half},
    builder::{states, SessionBuilder},
    config::{ConfigError, SessionConfig},
    connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState, Metrics},
    queued::{Outbound, QueuedConnection, QueuedFactory},
    session::Session,
};

// Re-export manager
pub use manager::{ConnectionRegistry, Origin};

pub use serde_json::Value;
