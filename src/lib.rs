//! Pushline - Main Library
//!
//! This crate ties the session library to the binaries that use it.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI, config paths)
//! - **logging**: Tracing subscriber setup
//! - **sessionmux**: Session binding and connection sharing (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust,ignore
//! use pushline::bin_common::{load_config_from_env, ConfigType};
//! use pushline::sessionmux::{ConnectionRegistry, QueuedFactory, Session};
//! ```

// Re-export workspace libraries for convenience
pub use sessionmux;

pub mod logging;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;

    pub use cli::{load_config_from_env, ConfigType};
}
