use super::load_record;
use colored::Colorize;
use machine_driver::MachineStore;
use machine_driver_vpsie::VpsieDriverConfig;

pub async fn handle(store: &MachineStore) -> anyhow::Result<()> {
    let names = store.list().await?;
    if names.is_empty() {
        println!("{}", "No machines".dimmed());
        return Ok(());
    }

    println!(
        "{}",
        format!("{:<24} {:<8} {:<40} {}", "NAME", "DRIVER", "INSTANCE", "IP").bold()
    );
    for name in names {
        match describe(store, &name).await {
            Ok((driver_name, config)) => {
                println!(
                    "{:<24} {:<8} {:<40} {}",
                    name,
                    driver_name,
                    config.instance.instance_id.as_deref().unwrap_or("-"),
                    config.instance.ip_address.as_deref().unwrap_or("-")
                );
            }
            Err(e) => {
                tracing::warn!("Skipping machine {}: {}", name, e);
            }
        }
    }
    Ok(())
}

async fn describe(store: &MachineStore, name: &str) -> anyhow::Result<(String, VpsieDriverConfig)> {
    let record = load_record(store, name).await?;
    let config: VpsieDriverConfig = record.driver()?;
    Ok((record.driver_name, config))
}
