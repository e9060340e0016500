use super::load_driver;
use colored::Colorize;
use machine_driver::{DriverError, MachineDriver, MachineStore};

pub async fn handle(store: &MachineStore, name: &str, keep_record: bool) -> anyhow::Result<()> {
    let driver = load_driver(store, name).await?;

    match driver.remove().await {
        Ok(()) => println!("{}", format!("✓ Deleted VPSie instance of '{}'", name).green()),
        Err(DriverError::NotCreated) => {
            println!("{}", format!("ℹ '{}' has no VPSie instance", name).dimmed());
        }
        Err(e) => return Err(e.into()),
    }

    if !keep_record {
        store.remove(name).await?;
        println!("{}", format!("✓ Removed '{}'", name).green().bold());
        if store.ssh_key_path(name).exists() {
            println!(
                "{}",
                format!("ℹ SSH key kept at {}", store.ssh_key_path(name).display()).dimmed()
            );
        }
    }
    Ok(())
}
