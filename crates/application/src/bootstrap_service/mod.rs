//! Bootstrap Service
//!
//! Runs the startup pipeline exactly once per process lifetime and lets any
//! number of independent consumers observe the outcome: non-blocking polls,
//! one-shot subscriptions, and async waits.

mod broadcast;

use std::sync::Arc;

use bootgate_core::{
    ActionId, BootstrapError, BootstrapSnapshot, BootstrapState, ErrorBehavior, Result,
    StartupPipeline,
};
use bootgate_ports::{ActionRunner, HostLifetime};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use broadcast::StateBroadcast;

/// Startup service. Actually runs the bootstrap actions.
///
/// Constructed once at process start with state `InProgress`; [`run`]
/// performs the single terminal transition, after which the service stays
/// alive for queries and subscriptions for the rest of the process.
///
/// [`run`]: BootstrapService::run
pub struct BootstrapService {
    pipeline: Arc<dyn StartupPipeline>,
    runner: Arc<dyn ActionRunner>,
    host: Arc<dyn HostLifetime>,
    error_behavior: ErrorBehavior,
    broadcast: StateBroadcast,
}

impl BootstrapService {
    pub fn new(
        pipeline: Arc<dyn StartupPipeline>,
        runner: Arc<dyn ActionRunner>,
        host: Arc<dyn HostLifetime>,
        error_behavior: ErrorBehavior,
    ) -> Self {
        Self {
            pipeline,
            runner,
            host,
            error_behavior,
            broadcast: StateBroadcast::new(),
        }
    }

    /// Current state of the bootstrap. Never blocks.
    pub fn state(&self) -> BootstrapState {
        self.broadcast.state()
    }

    /// Display name of the step currently executing, if any.
    ///
    /// May be stale by the time the caller reads it; intended for display.
    pub fn current_task_name(&self) -> Option<String> {
        self.broadcast.current_task()
    }

    /// Consistent state/current-task pair read under one lock.
    pub fn snapshot(&self) -> BootstrapSnapshot {
        self.broadcast.snapshot()
    }

    /// Subscribes to the terminal state.
    ///
    /// The callback fires exactly once: immediately on the caller when the
    /// bootstrap already finished, otherwise at the moment of the terminal
    /// transition, on whichever task performs it. `InProgress` is never
    /// broadcast.
    pub fn subscribe(&self, callback: impl FnOnce(BootstrapState) + Send + 'static) {
        self.broadcast.subscribe(callback);
    }

    /// Waits until the bootstrap reaches a terminal state and returns it.
    ///
    /// `cancel` releases the waiter without touching the pipeline; a fired
    /// token yields [`BootstrapError::WaitCancelled`]. Must not be awaited
    /// from inside a running startup action: the pipeline would be waiting
    /// on itself.
    pub async fn wait_for_bootstrap(&self, cancel: CancellationToken) -> Result<BootstrapState> {
        let (tx, rx) = oneshot::channel();
        self.subscribe(move |state| {
            let _ = tx.send(state);
        });

        tokio::select! {
            _ = cancel.cancelled() => Err(BootstrapError::WaitCancelled),
            state = rx => Ok(state.unwrap_or_else(|_| self.state())),
        }
    }

    /// Waits for the bootstrap and returns whether it was successful.
    pub async fn is_bootstrap_successful(&self, cancel: CancellationToken) -> Result<bool> {
        Ok(self.wait_for_bootstrap(cancel).await? == BootstrapState::Successful)
    }

    /// Waits for the bootstrap and fails with [`BootstrapError::Failed`] if
    /// it did not end in `Successful`.
    pub async fn assert_bootstrap_successful(&self, cancel: CancellationToken) -> Result<()> {
        match self.wait_for_bootstrap(cancel).await? {
            BootstrapState::Successful => Ok(()),
            _ => Err(BootstrapError::Failed),
        }
    }

    /// Executes the startup pipeline.
    ///
    /// Runs each action sequentially, performs the terminal transition, and
    /// reacts to a failed bootstrap according to the configured
    /// [`ErrorBehavior`]. Called exactly once, from a dedicated task;
    /// consumers never await this directly.
    pub async fn run(&self, shutdown: CancellationToken) {
        let actions = self.pipeline.actions();
        self.execute_startup_actions(&actions, &shutdown).await;

        let final_state = self.state();

        if final_state == BootstrapState::Error && self.error_behavior == ErrorBehavior::ExitOnError
        {
            error!("Bootstrap failed, requesting process shutdown");
            self.host.request_shutdown();
            return;
        }

        if final_state == BootstrapState::Successful {
            info!("Bootstrap completed successfully");
        }
    }

    async fn execute_startup_actions(&self, actions: &[ActionId], shutdown: &CancellationToken) {
        let total = actions.len();
        info!("Starting bootstrap pipeline with {} actions", total);

        for (index, action_id) in actions.iter().enumerate() {
            if shutdown.is_cancelled() {
                self.set_bootstrap_cancelled();
                return;
            }

            let instance = match self.runner.materialize(action_id) {
                Ok(instance) => instance,
                Err(cause) => {
                    error!(
                        "[{}/{}] Failed to materialize startup action '{}': {}",
                        index + 1,
                        total,
                        action_id,
                        cause
                    );
                    self.broadcast.transition(BootstrapState::Error);
                    return;
                }
            };

            info!("[{}/{}] Running startup action '{}'", index + 1, total, instance.name());
            self.broadcast
                .set_current_task(Some(instance.name().to_string()));

            let result = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    self.set_bootstrap_cancelled();
                    return;
                }
                result = instance.invoke(shutdown.child_token()) => result,
            };

            match result {
                Ok(true) => {}
                Ok(false) => {
                    error!(
                        "[{}/{}] Startup action '{}' reported failure",
                        index + 1,
                        total,
                        instance.name()
                    );
                    self.broadcast.transition(BootstrapState::Error);
                    return;
                }
                Err(fault) => {
                    error!(
                        "[{}/{}] Unhandled fault in startup action '{}': {:#}",
                        index + 1,
                        total,
                        instance.name(),
                        fault
                    );
                    self.broadcast.transition(BootstrapState::Error);
                    return;
                }
            }
        }

        self.broadcast.transition(BootstrapState::Successful);
    }

    fn set_bootstrap_cancelled(&self) {
        error!("Bootstrap cancelled: shutdown requested before completion");
        self.broadcast.transition(BootstrapState::Error);
    }
}
