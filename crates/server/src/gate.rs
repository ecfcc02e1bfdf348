//! Bootstrap Request Gate
//!
//! Middleware that short-circuits inbound requests until the bootstrap
//! pipeline has completed successfully. While the pipeline runs (or after it
//! failed) every request receives a structured 503 so load balancers and
//! frontends can tell maintenance from breakage.

use std::sync::{Arc, OnceLock};

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use bootgate_application::BootstrapService;
use bootgate_core::{BootstrapSnapshot, BootstrapState};

/// Response model returned as JSON while the service is not ready.
#[derive(Debug, Serialize, Deserialize)]
pub struct BootstrapResponse {
    pub state: BootstrapState,

    #[serde(rename = "currentTask", skip_serializing_if = "Option::is_none", default)]
    pub current_task: Option<String>,
}

/// Shared state of the gate middleware.
///
/// Subscribes once at construction; after the terminal state lands in the
/// cache the gate never queries the orchestrator again. Until then every
/// request reads the live snapshot, because the current task name keeps
/// changing while the pipeline runs.
#[derive(Clone)]
pub struct BootstrapGateState {
    service: Arc<BootstrapService>,
    terminal: Arc<OnceLock<BootstrapState>>,
}

impl BootstrapGateState {
    pub fn new(service: Arc<BootstrapService>) -> Self {
        let terminal = Arc::new(OnceLock::new());

        let cache = terminal.clone();
        service.subscribe(move |state| {
            let _ = cache.set(state);
        });

        Self { service, terminal }
    }

    fn snapshot(&self) -> BootstrapSnapshot {
        match self.terminal.get() {
            Some(state) => BootstrapSnapshot {
                state: *state,
                current_task: None,
            },
            None => self.service.snapshot(),
        }
    }
}

/// Gate middleware: pass requests through if and only if the bootstrap state
/// is `Successful`, otherwise answer with a maintenance rejection.
pub async fn bootstrap_gate(
    State(gate): State<BootstrapGateState>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(BootstrapState::Successful) = gate.terminal.get() {
        return next.run(request).await;
    }

    let snapshot = gate.snapshot();
    if snapshot.state == BootstrapState::Successful {
        return next.run(request).await;
    }

    maintenance_response(snapshot)
}

fn maintenance_response(snapshot: BootstrapSnapshot) -> Response {
    let in_progress = snapshot.state == BootstrapState::InProgress;

    let body = BootstrapResponse {
        state: snapshot.state,
        current_task: if in_progress {
            snapshot.current_task
        } else {
            None
        },
    };

    let mut response = (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();

    let headers = response.headers_mut();
    headers.insert("X-Maintenance", HeaderValue::from_static("true"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    if in_progress {
        headers.insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
    }

    response
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{body::Body, http::Request as HttpRequest, middleware, routing::get, Router};
    use bootgate_adapters::ActionRegistry;
    use bootgate_core::{ErrorBehavior, PipelineBuilder};
    use bootgate_ports::{BootstrapAction, HostLifetime};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    struct NoopHost;

    impl HostLifetime for NoopHost {
        fn request_shutdown(&self) {}
    }

    struct TimedAction {
        name: &'static str,
        delay: Duration,
        succeed: bool,
    }

    #[async_trait]
    impl BootstrapAction for TimedAction {
        fn name(&self) -> &str {
            self.name
        }

        async fn invoke(&self, _shutdown: CancellationToken) -> anyhow::Result<bool> {
            tokio::time::sleep(self.delay).await;
            Ok(self.succeed)
        }
    }

    fn gated_service(name: &'static str, delay: Duration, succeed: bool) -> Arc<BootstrapService> {
        let mut builder = PipelineBuilder::new();
        builder.use_action("step").unwrap();
        let pipeline = builder.build();

        let mut registry = ActionRegistry::new();
        registry.register("step", move || {
            Ok(Box::new(TimedAction {
                name,
                delay,
                succeed,
            }))
        });

        Arc::new(BootstrapService::new(
            Arc::new(pipeline),
            Arc::new(registry),
            Arc::new(NoopHost),
            ErrorBehavior::Continue,
        ))
    }

    fn gated_app(service: Arc<BootstrapService>) -> Router {
        Router::new()
            .route("/", get(|| async { "ready" }))
            .layer(middleware::from_fn_with_state(
                BootstrapGateState::new(service),
                bootstrap_gate,
            ))
    }

    async fn get_root(app: Router) -> axum::response::Response {
        app.oneshot(
            HttpRequest::builder()
                .method("GET")
                .uri("/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_gate_passes_requests_after_successful_bootstrap() {
        let service = gated_service("Warming caches", Duration::from_millis(10), true);

        let runner = service.clone();
        tokio::spawn(async move { runner.run(CancellationToken::new()).await });
        service
            .wait_for_bootstrap(CancellationToken::new())
            .await
            .unwrap();

        let response = get_root(gated_app(service)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"ready");
    }

    #[tokio::test]
    async fn test_gate_rejects_while_bootstrap_in_progress() {
        let service = gated_service("Warming caches", Duration::from_secs(30), true);

        let runner = service.clone();
        tokio::spawn(async move { runner.run(CancellationToken::new()).await });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let response = get_root(gated_app(service)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response.headers().get("X-Maintenance").unwrap(),
            &HeaderValue::from_static("true")
        );
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            &HeaderValue::from_static("no-cache")
        );
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            &HeaderValue::from_static("1")
        );

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let rejection: BootstrapResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(rejection.state, BootstrapState::InProgress);
        assert_eq!(rejection.current_task.as_deref(), Some("Warming caches"));
    }

    #[tokio::test]
    async fn test_gate_rejects_after_failed_bootstrap_without_task_name() {
        let service = gated_service("Migrating database", Duration::from_millis(10), false);

        let runner = service.clone();
        tokio::spawn(async move { runner.run(CancellationToken::new()).await });
        let state = service
            .wait_for_bootstrap(CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(state, BootstrapState::Error);

        let response = get_root(gated_app(service)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
        assert_eq!(
            response.headers().get("X-Maintenance").unwrap(),
            &HeaderValue::from_static("true")
        );

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let rejection: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(rejection["state"], "Error");
        assert!(rejection.get("currentTask").is_none());
    }
}
