//! Bootgate Server - Demo Application
//!
//! Wires a small startup pipeline (a simulated database migration and a
//! timed cache warmup) in front of an axum server. Until the pipeline
//! finishes, every request is answered with a structured 503 by the gate
//! middleware; afterwards requests pass through untouched.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use axum::{middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bootgate_adapters::{shutdown_signal, ActionRegistry, AppConfig, LoggingConfig};
use bootgate_core::PipelineBuilder;
use bootgate_ports::{BootstrapAction, HostLifetime};
use bootgate_server::{bootstrap_gate, initialize_server, BootstrapGateState, ServerError};

/// Simulated schema migration; set BOOTGATE_DEMO_FAIL_MIGRATION=1 to watch
/// the gate serve the error rejection instead.
struct MigrateDatabaseAction;

#[async_trait]
impl BootstrapAction for MigrateDatabaseAction {
    fn name(&self) -> &str {
        "Migrating database"
    }

    async fn invoke(&self, _shutdown: CancellationToken) -> anyhow::Result<bool> {
        tokio::time::sleep(Duration::from_secs(2)).await;

        if std::env::var("BOOTGATE_DEMO_FAIL_MIGRATION").is_ok() {
            error!("Demo migration was asked to fail");
            return Ok(false);
        }

        Ok(true)
    }
}

/// Simulated cache warmup that respects the shutdown signal.
struct WarmCachesAction {
    delay: Duration,
}

#[async_trait]
impl BootstrapAction for WarmCachesAction {
    fn name(&self) -> &str {
        "Warming caches"
    }

    async fn invoke(&self, shutdown: CancellationToken) -> anyhow::Result<bool> {
        tokio::select! {
            _ = shutdown.cancelled() => Ok(false),
            _ = tokio::time::sleep(self.delay) => Ok(true),
        }
    }
}

fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn root_handler() -> Json<Value> {
    Json(json!({
        "service": "bootgate-server",
        "message": "bootstrap complete, serving traffic"
    }))
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "bootgate-server",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let config = AppConfig::load()?;
    init_logging(&config.logging);
    info!("🚀 Starting Bootgate Server");

    let mut builder = PipelineBuilder::new();
    builder
        .use_action("migrate-database")
        .map_err(anyhow::Error::from)?;
    builder.use_action("warm-caches").map_err(anyhow::Error::from)?;
    let pipeline = builder.build();

    let mut registry = ActionRegistry::new();
    registry.register("migrate-database", || Ok(Box::new(MigrateDatabaseAction)));
    registry.register("warm-caches", || {
        Ok(Box::new(WarmCachesAction {
            delay: Duration::from_secs(5),
        }))
    });

    let components = initialize_server(config, Arc::new(pipeline), Arc::new(registry))?;

    // Forward OS signals into the shutdown controller.
    tokio::spawn({
        let shutdown = components.shutdown.clone();
        async move {
            shutdown_signal().await;
            shutdown.request_shutdown();
        }
    });

    // Background task that depends on a finished bootstrap.
    tokio::spawn({
        let service = components.service.clone();
        let stopping = components.shutdown.token();
        async move {
            info!("Waiting until bootstrap actions are done");
            match service.is_bootstrap_successful(stopping).await {
                Ok(true) => info!("Bootstrap actions are done, starting dependent work"),
                Ok(false) => error!("Bootstrap has failed, dependent work skipped"),
                Err(_) => {}
            }
        }
    });

    let gate = BootstrapGateState::new(components.service.clone());
    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .layer(middleware::from_fn_with_state(gate, bootstrap_gate))
        .layer(TraceLayer::new_for_http());

    let addr = format!(
        "{}:{}",
        components.config.server.host, components.config.server.port
    );
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("🚀 Server listening on http://{}", addr);

    let stopping = components.shutdown.token();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { stopping.cancelled().await })
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}
