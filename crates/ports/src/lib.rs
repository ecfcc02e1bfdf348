//! Ports - Abstraction Layer
//!
//! This crate defines ports (traits) that represent the interfaces
//! needed by the application layer. These are implemented by adapters
//! or directly by the host application.

pub mod action;
pub mod host;

pub use crate::action::{ActionRunner, BootstrapAction, ConstructionError};
pub use crate::host::HostLifetime;
