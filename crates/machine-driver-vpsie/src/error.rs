//! VPSie client error types

use machine_driver::DriverError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VpsieError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("VPSie API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("VPSie authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<VpsieError> for DriverError {
    fn from(err: VpsieError) -> Self {
        DriverError::ProviderRequest(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VpsieError>;
