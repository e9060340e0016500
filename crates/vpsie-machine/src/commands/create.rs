use super::save_driver;
use colored::Colorize;
use machine_driver::{MachineDriver, MachineStore, validate_machine_name};
use machine_driver_vpsie::{DriverOptions, VpsieDriver};

pub async fn handle(store: &MachineStore, name: &str, options: DriverOptions) -> anyhow::Result<()> {
    validate_machine_name(name)?;
    if store.exists(name) {
        anyhow::bail!("machine {} already exists", name);
    }

    let driver = VpsieDriver::new(name, options, store.ssh_key_path(name))?;
    println!("{}", format!("Creating machine '{}'...", name).yellow());
    run(store, driver).await
}

async fn run(store: &MachineStore, mut driver: VpsieDriver) -> anyhow::Result<()> {
    let name = driver.instance().machine_name.clone();
    let pending = driver.provision().await?;

    // The instance exists from here on; record it before the bootstrap wait
    save_driver(store, &driver).await?;

    if let Err(e) = driver.bootstrap(pending).await {
        eprintln!(
            "{}",
            format!(
                "Machine '{}' exists on VPSie but could not be provisioned; run `vpsie-machine rm {}` to delete it",
                name, name
            )
            .yellow()
        );
        return Err(e.into());
    }

    println!();
    println!("{}", format!("✓ Machine '{}' created", name).green().bold());
    println!("  IP:       {}", driver.get_ip()?.cyan());
    println!(
        "  SSH:      ssh -i {} {}@{} -p {}",
        driver.ssh_key_path().display(),
        driver.ssh_username(),
        driver.ssh_hostname()?,
        driver.ssh_port()
    );
    Ok(())
}
