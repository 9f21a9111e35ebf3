use serde::{Deserialize, Serialize};
use std::fmt;

/// The single state variable of the manager. It records which confirmation
/// the manager is waiting for, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrchestratorState {
    /// Idle, accepting switch requests
    #[default]
    Running,
    /// An application was told to take focus
    AwaitingFocusConfirmation,
    /// The focused application was asked to close
    AwaitingCloseConfirmation,
    /// The focused application was asked to move to the background
    AwaitingLostFocusConfirmation,
}

impl OrchestratorState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_awaiting(&self) -> bool {
        !self.is_running()
    }
}

impl fmt::Display for OrchestratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::AwaitingFocusConfirmation => write!(f, "awaiting_focus_confirmation"),
            Self::AwaitingCloseConfirmation => write!(f, "awaiting_close_confirmation"),
            Self::AwaitingLostFocusConfirmation => write!(f, "awaiting_lost_focus_confirmation"),
        }
    }
}

impl std::str::FromStr for OrchestratorState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "awaiting_focus_confirmation" => Ok(Self::AwaitingFocusConfirmation),
            "awaiting_close_confirmation" => Ok(Self::AwaitingCloseConfirmation),
            "awaiting_lost_focus_confirmation" => Ok(Self::AwaitingLostFocusConfirmation),
            _ => Err(format!("Invalid orchestrator state: {s}")),
        }
    }
}
