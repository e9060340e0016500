use super::load_driver;
use machine_driver::{MachineDriver, MachineStore};

pub async fn state(store: &MachineStore, name: &str) -> anyhow::Result<()> {
    let driver = load_driver(store, name).await?;
    println!("{}", driver.get_state().await?);
    Ok(())
}

pub async fn ip(store: &MachineStore, name: &str) -> anyhow::Result<()> {
    let driver = load_driver(store, name).await?;
    println!("{}", driver.get_ip()?);
    Ok(())
}

pub async fn url(store: &MachineStore, name: &str) -> anyhow::Result<()> {
    let driver = load_driver(store, name).await?;
    println!("{}", driver.get_url().await?);
    Ok(())
}
