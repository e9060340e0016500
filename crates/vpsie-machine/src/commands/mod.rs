pub mod create;
pub mod inspect;
pub mod lifecycle;
pub mod ls;
pub mod rm;
pub mod status;

use machine_driver::{MachineRecord, MachineStore};
use machine_driver_vpsie::{DRIVER_NAME, VpsieDriver, VpsieDriverConfig};

/// Load a stored VPSie machine record
pub async fn load_record(store: &MachineStore, name: &str) -> anyhow::Result<MachineRecord> {
    let record = store.load(name).await?;
    if record.driver_name != DRIVER_NAME {
        anyhow::bail!(
            "machine {} is managed by the {} driver, not {}",
            name,
            record.driver_name,
            DRIVER_NAME
        );
    }
    Ok(record)
}

/// Rebuild the driver of a stored machine
pub async fn load_driver(store: &MachineStore, name: &str) -> anyhow::Result<VpsieDriver> {
    let record = load_record(store, name).await?;
    let config: VpsieDriverConfig = record.driver()?;
    Ok(VpsieDriver::from_config(config)?)
}

/// Write the driver's current state into the machine record
pub async fn save_driver(store: &MachineStore, driver: &VpsieDriver) -> anyhow::Result<()> {
    let name = &driver.instance().machine_name;
    let mut record = if store.exists(name) {
        load_record(store, name).await?
    } else {
        MachineRecord::new(name.as_str(), DRIVER_NAME)
    };
    record.set_driver(&driver.config())?;
    store.save(&record).await?;
    Ok(())
}
