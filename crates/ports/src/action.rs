//! Startup Action Ports
//!
//! Defines the interface of one startup step and the runner that turns an
//! action identifier into a runnable instance.

use async_trait::async_trait;
use bootgate_core::ActionId;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// One startup step - does something to set up the service.
#[async_trait]
pub trait BootstrapAction: Send + Sync {
    /// Display name of the action. The request gate returns it verbatim
    /// while the action runs, so it can be a human sentence ("Migrating
    /// database") or a machine tag ("db_migrate").
    fn name(&self) -> &str;

    /// Runs the action.
    ///
    /// `Ok(true)` means success, `Ok(false)` is a declared failure (logged,
    /// not a fault), and `Err` is an unhandled fault. `shutdown` fires when
    /// the process begins stopping; long-running actions should watch it.
    async fn invoke(&self, shutdown: CancellationToken) -> anyhow::Result<bool>;
}

/// A runnable instance for an identifier could not be produced.
#[derive(Error, Debug)]
pub enum ConstructionError {
    #[error("no startup action registered for '{0}'")]
    UnknownAction(ActionId),

    #[error("failed to construct startup action '{id}'")]
    Factory {
        id: ActionId,
        #[source]
        source: anyhow::Error,
    },
}

/// Materializes runnable actions from identifiers.
///
/// Any construction mechanism satisfies this: a factory registry, a service
/// container lookup, or a hand-written match.
pub trait ActionRunner: Send + Sync {
    fn materialize(&self, id: &ActionId) -> Result<Box<dyn BootstrapAction>, ConstructionError>;
}
