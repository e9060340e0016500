//! First-contact key installation
//!
//! A freshly created machine passes two independent readiness gates before
//! the operator's public key can be installed:
//!
//! 1. the provider reports the machine as running (hypervisor level);
//! 2. the guest's SSH daemon accepts a password-authenticated no-op command.
//!
//! Each gate is polled with [`wait_for`] under its own deadline. Once both
//! pass, the public key is appended to the guest's `authorized_keys` exactly
//! once, after which the one-time password is no longer needed.

use crate::error::{DriverError, Result};
use crate::ssh::{RemoteShell, SshTarget};
use crate::state::LifecycleState;
use crate::wait::{WaitConfig, wait_for};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Command used to check that SSH accepts the one-time password
pub const SSH_PROBE_COMMAND: &str = "exit 0";

/// Source of the machine's current lifecycle state
#[async_trait]
pub trait StateProbe: Send + Sync {
    async fn current_state(&self) -> Result<LifecycleState>;
}

/// Wait condition that can time out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitPhase {
    /// Provider-level: machine reported as running
    VmRunning,
    /// Guest-level: SSH daemon accepting connections
    Ssh,
}

impl std::fmt::Display for WaitPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaitPhase::VmRunning => write!(f, "VM running"),
            WaitPhase::Ssh => write!(f, "SSH"),
        }
    }
}

/// States of the bootstrap state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapPhase {
    WaitingForRunning,
    WaitingForSsh,
    Installed,
    TimedOut(WaitPhase),
}

/// Poll counts of a successful bootstrap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub state_polls: u32,
    pub ssh_polls: u32,
}

/// Shell command appending `public_key` to root's authorized keys
pub fn authorized_keys_command(public_key: &str) -> String {
    format!(
        "mkdir -p ~/.ssh && chmod 700 ~/.ssh && echo '{}' >> ~/.ssh/authorized_keys",
        public_key.trim().replace('\'', "'\\''")
    )
}

/// Drives a machine through both readiness gates and installs the key
pub struct KeyInstaller<'a> {
    probe: &'a dyn StateProbe,
    shell: &'a dyn RemoteShell,
    wait: WaitConfig,
}

impl<'a> KeyInstaller<'a> {
    pub fn new(probe: &'a dyn StateProbe, shell: &'a dyn RemoteShell, wait: WaitConfig) -> Self {
        Self { probe, shell, wait }
    }

    /// Install `public_key` on `target` using the one-time `password`.
    ///
    /// Fails with [`DriverError::BootstrapTimeout`] naming the gate that never
    /// opened, or with [`DriverError::Access`] if the append itself fails. In
    /// the latter case the machine exists but is not safely accessible.
    pub async fn install(
        &self,
        target: &SshTarget,
        password: &str,
        public_key: &str,
    ) -> Result<BootstrapReport> {
        let mut report = BootstrapReport::default();
        let mut phase = BootstrapPhase::WaitingForRunning;

        loop {
            phase = match phase {
                BootstrapPhase::WaitingForRunning => {
                    tracing::info!(
                        "Waiting for machine to be running, this may take a few minutes..."
                    );
                    match self.wait_running().await {
                        Ok(polls) => {
                            report.state_polls = polls;
                            BootstrapPhase::WaitingForSsh
                        }
                        Err(attempts) => {
                            report.state_polls = attempts;
                            BootstrapPhase::TimedOut(WaitPhase::VmRunning)
                        }
                    }
                }
                BootstrapPhase::WaitingForSsh => {
                    tracing::info!("Waiting for SSH to be available on {}...", target);
                    match self.wait_ssh(target, password).await {
                        Ok(polls) => {
                            report.ssh_polls = polls;
                            self.append_key(target, password, public_key).await?;
                            BootstrapPhase::Installed
                        }
                        Err(attempts) => {
                            report.ssh_polls = attempts;
                            BootstrapPhase::TimedOut(WaitPhase::Ssh)
                        }
                    }
                }
                BootstrapPhase::Installed => {
                    tracing::info!("Installed SSH key on {}", target);
                    return Ok(report);
                }
                BootstrapPhase::TimedOut(phase) => {
                    tracing::warn!(
                        "Gave up waiting for {} after {} state polls and {} SSH polls",
                        phase,
                        report.state_polls,
                        report.ssh_polls
                    );
                    return Err(DriverError::BootstrapTimeout { phase });
                }
            };
        }
    }

    async fn wait_running(&self) -> std::result::Result<u32, u32> {
        let probe = self.probe;
        wait_for(&self.wait, || async move {
            match probe.current_state().await {
                Ok(state) => {
                    tracing::debug!("Machine state: {}", state);
                    state.is_running()
                }
                Err(e) => {
                    tracing::warn!("Failed to read machine state: {}", e);
                    false
                }
            }
        })
        .await
        .map_err(|timeout| timeout.attempts)
    }

    async fn wait_ssh(&self, target: &SshTarget, password: &str) -> std::result::Result<u32, u32> {
        let shell = self.shell;
        wait_for(&self.wait, || async move {
            match shell.run(target, password, SSH_PROBE_COMMAND).await {
                Ok(_) => true,
                Err(e) => {
                    tracing::debug!("SSH command '{}' failed: {}", SSH_PROBE_COMMAND, e);
                    false
                }
            }
        })
        .await
        .map_err(|timeout| timeout.attempts)
    }

    async fn append_key(&self, target: &SshTarget, password: &str, public_key: &str) -> Result<()> {
        tracing::debug!("Appending public key to ~/.ssh/authorized_keys on {}", target);
        let output = self
            .shell
            .run(target, password, &authorized_keys_command(public_key))
            .await
            .map_err(|e| match e {
                DriverError::Access(msg) => {
                    DriverError::Access(format!("failed to install SSH key: {}", msg))
                }
                other => other,
            })?;
        tracing::debug!("SSH command output: {}", output.trim());
        Ok(())
    }
}
