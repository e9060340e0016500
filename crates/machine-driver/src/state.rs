//! Normalized lifecycle state of a managed machine

use serde::{Deserialize, Serialize};

/// Lifecycle state as observed through the provider
///
/// Always derived from the provider's current status; drivers never keep a
/// local transition table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Booting; not yet reachable over the network
    Starting,
    /// Up and network-reachable
    Running,
    /// Powered off
    Stopped,
    /// Provider reported an error or a status the driver does not recognise
    Error,
    /// Never observed
    #[default]
    Unknown,
}

impl LifecycleState {
    pub fn is_running(&self) -> bool {
        matches!(self, LifecycleState::Running)
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::Starting => write!(f, "Starting"),
            LifecycleState::Running => write!(f, "Running"),
            LifecycleState::Stopped => write!(f, "Stopped"),
            LifecycleState::Error => write!(f, "Error"),
            LifecycleState::Unknown => write!(f, "Unknown"),
        }
    }
}
