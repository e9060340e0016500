//! VPSie REST API client
//!
//! OAuth2 client-credentials authentication; the access token is fetched on
//! first use and kept for the lifetime of the client.

use crate::error::{Result, VpsieError};
use async_trait::async_trait;
use machine_driver::CatalogEntry;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::OnceCell;

pub const VPSIE_API_BASE: &str = "https://api.vpsie.com/v1";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Calls the driver needs from the VPSie API
#[async_trait]
pub trait VpsieApi: Send + Sync {
    async fn create_vpsie(&self, request: &CreateVpsie) -> Result<CreatedVpsie>;

    async fn get_vpsie(&self, id: &str) -> Result<VpsieInfo>;

    /// Returns the status reported after the action
    async fn start_vpsie(&self, id: &str) -> Result<String>;

    /// Returns the status reported after the action
    async fn restart_vpsie(&self, id: &str) -> Result<String>;

    async fn shutdown_vpsie(&self, id: &str) -> Result<ActionStatus>;

    /// Returns the status reported after the action
    async fn delete_vpsie(&self, id: &str) -> Result<String>;

    async fn list_images(&self) -> Result<Vec<CatalogEntry>>;

    async fn list_offers(&self) -> Result<Vec<CatalogEntry>>;

    async fn list_datacenters(&self) -> Result<Vec<CatalogEntry>>;
}

/// Request body for creating a VPS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVpsie {
    pub hostname: String,
    pub offer_id: String,
    pub datacenter_id: String,
    pub os_id: String,
}

/// Response to a successful create
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedVpsie {
    pub id: String,

    #[serde(default)]
    pub hostname: Option<String>,

    #[serde(default)]
    pub ipv4: Option<String>,

    /// One-time root password; never persisted or logged
    pub password: String,
}

/// VPS details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VpsieInfo {
    pub id: String,

    pub status: String,

    #[serde(default)]
    pub hostname: Option<String>,

    #[serde(default)]
    pub ipv4: Option<String>,
}

/// Outcome of a shutdown request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStatus {
    pub error: bool,

    #[serde(default)]
    pub error_code: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// reqwest-backed [`VpsieApi`]
pub struct VpsieClient {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    token: OnceCell<String>,
}

impl VpsieClient {
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token: OnceCell::new(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn token(&self) -> Result<&str> {
        let token = self
            .token
            .get_or_try_init(|| async {
                tracing::debug!("Requesting VPSie access token");
                let response = self
                    .client
                    .post(self.url("token"))
                    .form(&[
                        ("grant_type", "client_credentials"),
                        ("client_id", self.client_id.as_str()),
                        ("client_secret", self.client_secret.as_str()),
                    ])
                    .send()
                    .await?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(VpsieError::AuthenticationFailed(format!(
                        "status={} body={}",
                        status.as_u16(),
                        body
                    )));
                }

                let token: TokenResponse = response.json().await?;
                Ok::<_, VpsieError>(token.access_token)
            })
            .await?;
        Ok(token.as_str())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&CreateVpsie>,
    ) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(self.token().await?);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("{} {} failed: status={}", method, url, status.as_u16());
            return Err(VpsieError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn action(&self, id: &str, action: &str) -> Result<String> {
        let response: StatusResponse = self
            .send(
                reqwest::Method::POST,
                &format!("vpsie/{}/{}", id, action),
                None,
            )
            .await?;
        Ok(response.status)
    }
}

#[async_trait]
impl VpsieApi for VpsieClient {
    async fn create_vpsie(&self, request: &CreateVpsie) -> Result<CreatedVpsie> {
        self.send(reqwest::Method::POST, "vpsie", Some(request)).await
    }

    async fn get_vpsie(&self, id: &str) -> Result<VpsieInfo> {
        self.send(reqwest::Method::GET, &format!("vpsie/{}", id), None)
            .await
    }

    async fn start_vpsie(&self, id: &str) -> Result<String> {
        self.action(id, "start").await
    }

    async fn restart_vpsie(&self, id: &str) -> Result<String> {
        self.action(id, "restart").await
    }

    async fn shutdown_vpsie(&self, id: &str) -> Result<ActionStatus> {
        self.send(
            reqwest::Method::POST,
            &format!("vpsie/{}/shutdown", id),
            None,
        )
        .await
    }

    async fn delete_vpsie(&self, id: &str) -> Result<String> {
        let response: StatusResponse = self
            .send(reqwest::Method::DELETE, &format!("vpsie/{}", id), None)
            .await?;
        Ok(response.status)
    }

    async fn list_images(&self) -> Result<Vec<CatalogEntry>> {
        self.send(reqwest::Method::GET, "images", None).await
    }

    async fn list_offers(&self) -> Result<Vec<CatalogEntry>> {
        self.send(reqwest::Method::GET, "offers", None).await
    }

    async fn list_datacenters(&self) -> Result<Vec<CatalogEntry>> {
        self.send(reqwest::Method::GET, "datacenters", None).await
    }
}
