//! Bootstrap state vocabulary

use serde::{Deserialize, Serialize};

/// Outcome of the startup pipeline as observed by consumers.
///
/// `InProgress` is the only non-terminal value. The orchestrator performs
/// exactly one transition out of it, after which the state never changes
/// again for the remainder of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BootstrapState {
    /// Startup actions are still running.
    InProgress,
    /// Every startup action completed and reported success.
    Successful,
    /// A startup action failed, faulted, or the process began shutting down.
    Error,
}

impl BootstrapState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BootstrapState::InProgress => "InProgress",
            BootstrapState::Successful => "Successful",
            BootstrapState::Error => "Error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BootstrapState::InProgress)
    }
}

impl std::fmt::Display for BootstrapState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Process-level reaction to a terminal `Error` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorBehavior {
    /// Request process shutdown so a supervisor (docker, systemd, k8s) can
    /// restart the service.
    #[default]
    ExitOnError,
    /// Keep the process alive; the request gate keeps serving rejections.
    Continue,
}

/// Point-in-time view of the orchestrator.
///
/// `current_task` is populated only while `state` is `InProgress` and a step
/// is executing; it is cleared atomically with the terminal transition. The
/// value may be stale by the time the caller reads it and is intended for
/// display purposes only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapSnapshot {
    pub state: BootstrapState,
    pub current_task: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!BootstrapState::InProgress.is_terminal());
        assert!(BootstrapState::Successful.is_terminal());
        assert!(BootstrapState::Error.is_terminal());
    }

    #[test]
    fn test_state_serializes_by_variant_name() {
        assert_eq!(
            serde_json::to_string(&BootstrapState::InProgress).unwrap(),
            "\"InProgress\""
        );
        assert_eq!(
            serde_json::to_string(&BootstrapState::Error).unwrap(),
            "\"Error\""
        );
    }

    #[test]
    fn test_default_error_behavior() {
        assert_eq!(ErrorBehavior::default(), ErrorBehavior::ExitOnError);
    }
}
