//! Machine record store
//!
//! Keeps one directory per machine under `<root>/machines/<name>/` holding
//! the driver's `config.json` and the operator's SSH key pair.

use crate::error::{DriverError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

const RECORD_VERSION: u32 = 1;
const MACHINES_DIR: &str = "machines";
const CONFIG_FILE: &str = "config.json";
const CONFIG_BACKUP: &str = "config.json.backup";
const SSH_KEY_FILE: &str = "id_rsa";

/// Persisted description of one machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineRecord {
    /// Record format version
    pub version: u32,

    /// Machine name
    pub name: String,

    /// Driver that manages the machine
    pub driver_name: String,

    /// Driver-specific state (options, instance ID, address)
    pub driver: serde_json::Value,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl MachineRecord {
    pub fn new(name: impl Into<String>, driver_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            version: RECORD_VERSION,
            name: name.into(),
            driver_name: driver_name.into(),
            driver: serde_json::Value::Null,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_driver<T: Serialize>(&mut self, driver: &T) -> Result<()> {
        self.driver = serde_json::to_value(driver)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn driver<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.driver.clone())?)
    }
}

/// Machine names double as directory names
pub fn validate_machine_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_first = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');

    if valid_first && valid_rest {
        Ok(())
    } else {
        Err(DriverError::Store(format!(
            "invalid machine name {:?}: use letters, digits, '-' and '.', starting with a letter or digit",
            name
        )))
    }
}

/// Reads and writes machine records
pub struct MachineStore {
    root: PathBuf,
}

impl MachineStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one machine's files
    pub fn machine_dir(&self, name: &str) -> PathBuf {
        self.root.join(MACHINES_DIR).join(name)
    }

    /// Private key path of a machine; the public key sits next to it
    pub fn ssh_key_path(&self, name: &str) -> PathBuf {
        self.machine_dir(name).join(SSH_KEY_FILE)
    }

    fn config_path(&self, name: &str) -> PathBuf {
        self.machine_dir(name).join(CONFIG_FILE)
    }

    fn backup_path(&self, name: &str) -> PathBuf {
        self.machine_dir(name).join(CONFIG_BACKUP)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.config_path(name).exists()
    }

    /// Load a machine record
    pub async fn load(&self, name: &str) -> Result<MachineRecord> {
        validate_machine_name(name)?;
        let path = self.config_path(name);
        if !path.exists() {
            return Err(DriverError::Store(format!(
                "machine {} does not exist",
                name
            )));
        }

        let content = fs::read_to_string(&path).await?;
        let record: MachineRecord = serde_json::from_str(&content)?;

        if record.version > RECORD_VERSION {
            return Err(DriverError::Store(format!(
                "record version {} is newer than supported version {}",
                record.version, RECORD_VERSION
            )));
        }

        tracing::debug!("Loaded machine record {}", path.display());
        Ok(record)
    }

    /// Save a machine record, keeping a backup of the previous one
    pub async fn save(&self, record: &MachineRecord) -> Result<()> {
        validate_machine_name(&record.name)?;
        let dir = self.machine_dir(&record.name);
        if !dir.exists() {
            fs::create_dir_all(&dir).await?;
            tracing::debug!("Created machine directory: {}", dir.display());
        }

        let path = self.config_path(&record.name);
        let backup = self.backup_path(&record.name);

        if path.exists() {
            if backup.exists() {
                fs::remove_file(&backup).await?;
            }
            fs::rename(&path, &backup).await?;
        }

        let content = serde_json::to_string_pretty(record)?;
        fs::write(&path, content).await?;

        tracing::debug!("Saved machine record {}", path.display());
        Ok(())
    }

    /// Delete a machine's record. The SSH key pair stays in place so that a
    /// machine created again under the same name reuses it; the directory
    /// itself goes once nothing else is left in it.
    pub async fn remove(&self, name: &str) -> Result<()> {
        validate_machine_name(name)?;
        for path in [self.config_path(name), self.backup_path(name)] {
            if path.exists() {
                fs::remove_file(&path).await?;
                tracing::debug!("Removed {}", path.display());
            }
        }

        let dir = self.machine_dir(name);
        if dir.exists() {
            let mut entries = fs::read_dir(&dir).await?;
            if entries.next_entry().await?.is_none() {
                fs::remove_dir(&dir).await?;
                tracing::debug!("Removed machine directory: {}", dir.display());
            }
        }
        Ok(())
    }

    /// Names of all stored machines, sorted
    pub async fn list(&self) -> Result<Vec<String>> {
        let dir = self.root.join(MACHINES_DIR);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.path().join(CONFIG_FILE).exists() {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
