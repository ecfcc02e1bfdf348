//! Server Bootstrap - Production Initialization

use std::sync::Arc;

use bootgate_adapters::{AppConfig, ConfigError, ShutdownController};
use bootgate_application::BootstrapService;
use bootgate_core::StartupPipeline;
use bootgate_ports::{ActionRunner, HostLifetime};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("General error: {0}")]
    General(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;

/// Everything the binary needs after initialization.
pub struct ServerComponents {
    pub config: AppConfig,
    pub service: Arc<BootstrapService>,
    pub shutdown: Arc<ShutdownController>,
}

/// Wires the bootstrap orchestrator into a process.
///
/// Constructs the service from the supplied pipeline and runner, spawns the
/// execution routine on its own task, and returns the handles the server
/// needs. The pipeline starts running immediately.
pub fn initialize_server(
    config: AppConfig,
    pipeline: Arc<dyn StartupPipeline>,
    runner: Arc<dyn ActionRunner>,
) -> Result<ServerComponents> {
    let shutdown = Arc::new(ShutdownController::new());
    let host: Arc<dyn HostLifetime> = shutdown.clone();

    let service = Arc::new(BootstrapService::new(
        pipeline,
        runner,
        host,
        config.bootstrap.error_behavior,
    ));
    info!("✅ Bootstrap service initialized");

    tokio::spawn({
        let service = service.clone();
        let stopping = shutdown.token();
        async move {
            service.run(stopping).await;
        }
    });
    info!("✅ Bootstrap pipeline started");

    Ok(ServerComponents {
        config,
        service,
        shutdown,
    })
}
