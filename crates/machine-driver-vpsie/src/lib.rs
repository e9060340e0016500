//! VPSie driver
//!
//! [`VpsieDriver`] implements [`machine_driver::MachineDriver`] on top of the
//! VPSie REST API (`https://api.vpsie.com/v1`).
//!
//! ## Usage
//!
//! ```no_run
//! use machine_driver::MachineDriver;
//! use machine_driver_vpsie::{DriverOptions, VpsieDriver};
//!
//! # async fn example() -> machine_driver::Result<()> {
//! let options = DriverOptions::new("client-id", "client-secret");
//! let mut driver = VpsieDriver::new("web-01", options, "/tmp/web-01/id_rsa")?;
//! driver.create().await?;
//! println!("{}", driver.get_url().await?);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod driver;
pub mod error;
pub mod options;
pub mod state;

pub use client::{ActionStatus, CreateVpsie, CreatedVpsie, VpsieApi, VpsieClient, VpsieInfo};
pub use driver::{DRIVER_NAME, Instance, PendingBootstrap, VpsieDriver, VpsieDriverConfig};
pub use error::VpsieError;
pub use options::DriverOptions;
pub use state::lifecycle_state;
