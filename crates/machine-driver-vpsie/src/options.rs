//! Driver configuration

use crate::client::VPSIE_API_BASE;
use machine_driver::{DriverError, ProvisioningParams, Result, WaitConfig};
use serde::{Deserialize, Serialize};

pub const DEFAULT_OFFER_ID: &str = "9a0e49c6-9f22-11e3-8af5-005056aa8af7";
pub const DEFAULT_DATACENTER_ID: &str = "55f06b85-c9ee-11e3-9845-005056aa8af7";
pub const DEFAULT_IMAGE_ID: &str = "75401d7d-d9d3-11e3-b135-005056aa8af7";
pub const DEFAULT_SSH_USER: &str = "root";
pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_DOCKER_PORT: u16 = 2376;

const REDACTED: &str = "<redacted>";

/// Options recognised by the VPSie driver
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverOptions {
    pub client_id: String,

    pub client_secret: String,

    pub image_id: String,

    pub offer_id: String,

    pub datacenter_id: String,

    pub api_url: String,

    pub ssh_user: String,

    pub ssh_port: u16,

    pub docker_port: u16,

    pub wait: WaitConfig,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            image_id: DEFAULT_IMAGE_ID.to_string(),
            offer_id: DEFAULT_OFFER_ID.to_string(),
            datacenter_id: DEFAULT_DATACENTER_ID.to_string(),
            api_url: VPSIE_API_BASE.to_string(),
            ssh_user: DEFAULT_SSH_USER.to_string(),
            ssh_port: DEFAULT_SSH_PORT,
            docker_port: DEFAULT_DOCKER_PORT,
            wait: WaitConfig::default(),
        }
    }
}

impl std::fmt::Debug for DriverOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverOptions")
            .field("client_id", &self.client_id)
            .field("client_secret", &REDACTED)
            .field("image_id", &self.image_id)
            .field("offer_id", &self.offer_id)
            .field("datacenter_id", &self.datacenter_id)
            .field("api_url", &self.api_url)
            .field("ssh_user", &self.ssh_user)
            .field("ssh_port", &self.ssh_port)
            .field("docker_port", &self.docker_port)
            .field("wait", &self.wait)
            .finish()
    }
}

impl DriverOptions {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            ..Default::default()
        }
    }

    /// Both credentials are required; nothing else is.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(DriverError::MissingCredential {
                option: "--vpsie-client-id".to_string(),
            });
        }
        if self.client_secret.trim().is_empty() {
            return Err(DriverError::MissingCredential {
                option: "--vpsie-client-secret".to_string(),
            });
        }
        Ok(())
    }

    /// Blank identifiers replaced by the well-known defaults
    pub fn normalized(mut self) -> Self {
        fill_default(&mut self.image_id, DEFAULT_IMAGE_ID);
        fill_default(&mut self.offer_id, DEFAULT_OFFER_ID);
        fill_default(&mut self.datacenter_id, DEFAULT_DATACENTER_ID);
        fill_default(&mut self.api_url, VPSIE_API_BASE);
        fill_default(&mut self.ssh_user, DEFAULT_SSH_USER);
        self
    }

    pub fn provisioning_params(&self, hostname: &str) -> ProvisioningParams {
        ProvisioningParams {
            hostname: hostname.to_string(),
            image_id: self.image_id.clone(),
            offer_id: self.offer_id.clone(),
            datacenter_id: self.datacenter_id.clone(),
        }
    }

    /// Copy safe to print or write to `inspect` output
    pub fn redacted(&self) -> Self {
        Self {
            client_secret: REDACTED.to_string(),
            ..self.clone()
        }
    }
}

fn fill_default(value: &mut String, default: &str) {
    if value.trim().is_empty() {
        *value = default.to_string();
    }
}
