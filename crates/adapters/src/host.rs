//! Shutdown Controller
//!
//! Cancellation-token backed implementation of the `HostLifetime` port. The
//! controller owns the root token; everything that should stop when the
//! process winds down (the bootstrap pipeline, the HTTP server, background
//! tasks) holds a child of it.

use bootgate_ports::HostLifetime;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct ShutdownController {
    root: CancellationToken,
}

impl ShutdownController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Child token that fires when shutdown is requested.
    pub fn token(&self) -> CancellationToken {
        self.root.child_token()
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.root.is_cancelled()
    }
}

impl HostLifetime for ShutdownController {
    fn request_shutdown(&self) {
        info!("Process shutdown requested");
        self.root.cancel();
    }
}
