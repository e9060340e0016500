//! Pre-flight validation of catalog identifiers
//!
//! Catalogs are provider-controlled and fetched fresh on every call, so a
//! successful validation is best-effort: an identifier may still disappear
//! between validation and use.

use crate::error::{DriverError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Kind of catalog a provisioning identifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Image,
    Offer,
    Datacenter,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Image => write!(f, "Image"),
            ResourceKind::Offer => write!(f, "Offer"),
            ResourceKind::Datacenter => write!(f, "Datacenter"),
        }
    }
}

/// One entry of a provider catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,

    /// Descriptive metadata, kept as returned by the provider
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metadata: serde_json::Map::new(),
        }
    }
}

/// Immutable input to instance creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningParams {
    pub hostname: String,
    pub image_id: String,
    pub offer_id: String,
    pub datacenter_id: String,
}

impl ProvisioningParams {
    /// Identifiers in validation order: image, datacenter, offer
    pub fn identifiers(&self) -> [(ResourceKind, &str); 3] {
        [
            (ResourceKind::Image, self.image_id.as_str()),
            (ResourceKind::Datacenter, self.datacenter_id.as_str()),
            (ResourceKind::Offer, self.offer_id.as_str()),
        ]
    }
}

/// Something that can list a provider catalog
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the full catalog for `kind`. The error string describes why the
    /// catalog could not be fetched.
    async fn list_catalog(&self, kind: ResourceKind)
    -> std::result::Result<Vec<CatalogEntry>, String>;
}

/// Resource validator backed by a catalog source
pub struct CatalogValidator<'a> {
    source: &'a dyn CatalogSource,
}

impl<'a> CatalogValidator<'a> {
    pub fn new(source: &'a dyn CatalogSource) -> Self {
        Self { source }
    }

    /// Succeeds iff `identifier` is present in the `kind` catalog.
    ///
    /// One round-trip per call; results are never cached.
    pub async fn validate(&self, kind: ResourceKind, identifier: &str) -> Result<()> {
        let entries = self
            .source
            .list_catalog(kind)
            .await
            .map_err(|reason| DriverError::CatalogUnavailable { kind, reason })?;

        tracing::debug!("Fetched {} catalog with {} entries", kind, entries.len());

        if entries.iter().any(|entry| entry.id == identifier) {
            Ok(())
        } else {
            Err(DriverError::InvalidResource {
                kind,
                identifier: identifier.to_string(),
            })
        }
    }

    /// Validate image, datacenter and offer in that order, stopping at the
    /// first failure.
    pub async fn validate_all(&self, params: &ProvisioningParams) -> Result<()> {
        for (kind, identifier) in params.identifiers() {
            self.validate(kind, identifier).await?;
        }
        Ok(())
    }
}
