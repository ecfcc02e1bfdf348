//! Error types surfaced to bootstrap consumers

use thiserror::Error;

/// Errors returned by the wait-style consumer APIs.
///
/// Step-level faults never appear here: the execution routine absorbs them
/// and records a terminal `Error` state instead.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BootstrapError {
    /// The terminal state was not `Successful`. Raised only by the
    /// assert-style API.
    #[error("bootstrap has failed")]
    Failed,

    /// The caller's own cancellation fired before a terminal state was
    /// reached. The pipeline itself is unaffected.
    #[error("wait for bootstrap was cancelled")]
    WaitCancelled,
}
