//! VPSie status strings

use machine_driver::LifecycleState;

pub const STATUS_STARTED: &str = "Started";
pub const STATUS_RUNNING: &str = "Running";
pub const STATUS_STOPPED: &str = "Stopped";
pub const STATUS_RESTARTED: &str = "Restarted";
pub const STATUS_DELETED: &str = "Deleted";

/// Map a VPSie status to a lifecycle state.
///
/// "Started" is the booting sub-state, not yet reachable.
pub fn lifecycle_state(status: &str) -> LifecycleState {
    match status {
        STATUS_STARTED => LifecycleState::Starting,
        STATUS_RUNNING => LifecycleState::Running,
        STATUS_STOPPED => LifecycleState::Stopped,
        _ => LifecycleState::Error,
    }
}
