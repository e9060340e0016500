use super::load_driver;
use colored::Colorize;
use machine_driver::{MachineDriver, MachineStore};

/// Single-call lifecycle actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Stop,
    Restart,
    Kill,
}

impl Action {
    fn past_tense(&self) -> &'static str {
        match self {
            Action::Start => "Started",
            Action::Stop => "Stopped",
            Action::Restart => "Restarted",
            Action::Kill => "Killed",
        }
    }
}

pub async fn handle(store: &MachineStore, name: &str, action: Action) -> anyhow::Result<()> {
    let driver = load_driver(store, name).await?;

    match action {
        Action::Start => driver.start().await?,
        Action::Stop => driver.stop().await?,
        Action::Restart => driver.restart().await?,
        Action::Kill => driver.kill().await?,
    }

    println!(
        "{}",
        format!("✓ {} '{}'", action.past_tense(), name).green()
    );
    Ok(())
}
