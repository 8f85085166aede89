//! # Sessionmux Traits
//!
//! Core traits and types shared by sessions and the connection manager:
//!
//! - **EventSink**: Receives inbound events for one namespace
//! - **ConnectionHandle**: Outbound delegation contract of a shared connection
//! - **ConnectionFactory**: Creates connections for the registry
//! - **Payload**: Text or JSON message for `send`
//!
//! ## Example
//!
//! ```rust,ignore
//! use sessionmux::*;
//!
//! struct PrintSink;
//!
//! impl EventSink for PrintSink {
//!     fn on_message(&self, payload: Payload) {
//!         println!("message: {:?}", payload);
//!     }
//!
//!     fn on_event(&self, event: &str, args: &[Value]) {
//!         println!("{}: {:?}", event, args);
//!     }
//! }
//! ```

pub mod connection;
pub mod error;
pub mod payload;
pub mod sink;

// Re-export commonly used types
pub use connection::{ConnectionFactory, ConnectionHandle};
pub use error::{Result, SessionError};
pub use payload::Payload;
pub use sink::{EventSink, NoOpSink};
