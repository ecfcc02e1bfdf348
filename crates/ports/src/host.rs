//! Host Lifetime Port

/// Handle onto the process lifetime.
///
/// The orchestrator calls `request_shutdown` exactly once, and only when the
/// bootstrap ends in `Error` under the `ExitOnError` behavior.
pub trait HostLifetime: Send + Sync {
    fn request_shutdown(&self);
}
