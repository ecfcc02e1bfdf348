//! Adapters - Infrastructure Implementations
//!
//! This crate contains the implementations of the ports defined in
//! bootgate-ports, plus the process-level glue: configuration, the shutdown
//! controller, and the OS signal listener.

pub mod config;
pub mod host;
pub mod registry;
pub mod signal;

pub use crate::config::{AppConfig, BootstrapConfig, ConfigError, LoggingConfig, ServerConfig};
pub use crate::host::ShutdownController;
pub use crate::registry::ActionRegistry;
pub use crate::signal::shutdown_signal;
