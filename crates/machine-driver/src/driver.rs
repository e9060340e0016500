//! Machine driver trait definition

use crate::error::Result;
use crate::state::LifecycleState;
use async_trait::async_trait;

/// Lifecycle contract shared by all provider drivers
///
/// One driver value manages exactly one machine. Callers serialize their own
/// calls; drivers hold no locks.
#[async_trait]
pub trait MachineDriver: Send + Sync {
    /// Returns the driver name (e.g., "vpsie")
    fn driver_name(&self) -> &str;

    /// Operator-chosen machine name
    fn machine_name(&self) -> &str;

    /// Fail fast on configuration that would make `create` fail later
    async fn pre_create_check(&self) -> Result<()>;

    /// Provision the machine and install the operator's SSH key
    async fn create(&mut self) -> Result<()>;

    /// Current lifecycle state, always fetched from the provider.
    ///
    /// An `Err` means the query itself failed and is equivalent to
    /// [`LifecycleState::Error`] with the cause attached.
    async fn get_state(&self) -> Result<LifecycleState>;

    /// Public address, or an error while it is unset
    fn get_ip(&self) -> Result<String>;

    /// Connection endpoint; only available while the machine is running
    async fn get_url(&self) -> Result<String>;

    async fn start(&self) -> Result<()>;

    async fn stop(&self) -> Result<()>;

    async fn restart(&self) -> Result<()>;

    async fn kill(&self) -> Result<()>;

    async fn remove(&self) -> Result<()>;

    fn ssh_hostname(&self) -> Result<String> {
        self.get_ip()
    }

    fn ssh_port(&self) -> u16 {
        22
    }

    fn ssh_username(&self) -> &str {
        "root"
    }
}
