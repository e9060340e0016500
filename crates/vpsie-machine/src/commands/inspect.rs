use super::load_record;
use machine_driver::MachineStore;
use machine_driver_vpsie::VpsieDriverConfig;

pub async fn handle(store: &MachineStore, name: &str) -> anyhow::Result<()> {
    let mut record = load_record(store, name).await?;

    let mut config: VpsieDriverConfig = record.driver()?;
    config.options = config.options.redacted();
    record.driver = serde_json::to_value(&config)?;

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
