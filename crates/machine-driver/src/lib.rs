//! Machine driver core
//!
//! Provider-neutral building blocks for drivers that provision and manage a
//! single virtual machine on behalf of a higher-level orchestrator.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 vpsie-machine CLI                │
//! │        (create / status / start / stop ...)      │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                 machine-driver                   │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │          trait MachineDriver              │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌────────────┐ ┌────────────┐ ┌────────────┐   │
//! │  │  Catalog   │ │ Bootstrap  │ │   Store    │   │
//! │  │ validation │ │ (wait+SSH) │ │ (records)  │   │
//! │  └────────────┘ └────────────┘ └────────────┘   │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼───────┐
//! │     vpsie     │
//! │    driver     │
//! └───────────────┘
//! ```

pub mod bootstrap;
pub mod catalog;
pub mod driver;
pub mod error;
pub mod ssh;
pub mod state;
pub mod store;
pub mod wait;

// Re-exports
pub use bootstrap::{
    BootstrapPhase, BootstrapReport, KeyInstaller, SSH_PROBE_COMMAND, StateProbe, WaitPhase,
    authorized_keys_command,
};
pub use catalog::{CatalogEntry, CatalogSource, CatalogValidator, ProvisioningParams, ResourceKind};
pub use driver::MachineDriver;
pub use error::{DriverError, Result};
pub use ssh::{RemoteShell, Ssh2Shell, SshKeyPair, SshTarget};
pub use state::LifecycleState;
pub use store::{MachineRecord, MachineStore, validate_machine_name};
pub use wait::{WaitConfig, WaitTimeout, wait_for};
