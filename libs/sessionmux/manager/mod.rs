//! # Sessionmux Manager
//!
//! Origin-keyed registry that hands the same shared connection to every
//! session bound to that origin.

pub mod registry;

pub use registry::{ConnectionRegistry, Origin};
