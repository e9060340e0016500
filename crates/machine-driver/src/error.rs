//! Driver error types

use crate::bootstrap::WaitPhase;
use crate::catalog::ResourceKind;
use thiserror::Error;

/// Errors surfaced by machine drivers
///
/// Nothing in a driver swallows errors: every failure carries enough context
/// (identifier, expected vs. actual status) to diagnose without re-querying
/// the provider.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("driver requires the {option} option")]
    MissingCredential { option: String },

    #[error("{kind} ID {identifier} is invalid")]
    InvalidResource {
        kind: ResourceKind,
        identifier: String,
    },

    #[error("could not fetch the {kind} catalog: {reason}")]
    CatalogUnavailable { kind: ResourceKind, reason: String },

    #[error("provider request failed: {0}")]
    ProviderRequest(String),

    #[error("invalid status {actual} after {action} (expected {expected})")]
    UnexpectedStatus {
        action: String,
        expected: String,
        actual: String,
    },

    #[error("{action} failed with provider error code {code}")]
    ActionFailed { action: String, code: String },

    #[error("timed out waiting for {phase}")]
    BootstrapTimeout { phase: WaitPhase },

    #[error("SSH access failed: {0}")]
    Access(String),

    #[error("SSH key generation failed: {0}")]
    KeyGeneration(String),

    #[error("host is not running")]
    HostNotRunning,

    #[error("IP address is not set")]
    IpNotSet,

    #[error("machine has not been created yet")]
    NotCreated,

    #[error("machine store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DriverError {
    /// Configuration problems are detected before any provider-side resource
    /// is consumed and are never worth retrying.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DriverError::MissingCredential { .. } | DriverError::InvalidResource { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DriverError>;
