//! Domain Core - Bootstrap State and Pipeline Types
//!
//! This crate contains the value objects shared across the system: the
//! bootstrap state machine vocabulary, action identifiers, and the startup
//! pipeline definition consumed by the orchestrator.

pub mod error;
pub mod pipeline;
pub mod state;

pub use crate::error::BootstrapError;
pub use crate::pipeline::{
    ActionId, DefaultPipeline, PipelineBuildError, PipelineBuilder, StartupPipeline,
};
pub use crate::state::{BootstrapSnapshot, BootstrapState, ErrorBehavior};

// Domain result type
pub type Result<T> = std::result::Result<T, BootstrapError>;
