//! Import API sink for product drafts.

mod auth;

pub use auth::{ClientCredentials, TokenResponse, token_url};

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use catalogen_core::{PRODUCT_DRAFT_TYPE, ProductDraft};

use crate::errors::{SinkError, SinkResult};
use crate::sink::{BatchSink, SinkReceipt, SinkSummary};

/// Maximum number of resources accepted by a single import request.
pub const MAX_RESOURCES_PER_REQUEST: usize = 20;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the Import API.
#[derive(Clone, Serialize, Deserialize)]
pub struct ImportApiConfig {
    pub auth_url: String,
    pub api_url: String,
    pub project_key: String,
    pub client_id: String,
    pub client_secret: String,
    /// OAuth scopes; `manage_project:{project_key}` when empty.
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Import container receiving the drafts.
    pub container_key: String,
}

impl ImportApiConfig {
    pub fn validate(&self) -> SinkResult<()> {
        let required = [
            ("auth_url", &self.auth_url),
            ("api_url", &self.api_url),
            ("project_key", &self.project_key),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("container_key", &self.container_key),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(SinkError::Config(format!("{name} is required")));
            }
        }
        Ok(())
    }

    pub fn effective_scopes(&self) -> Vec<String> {
        if self.scopes.is_empty() {
            vec![format!("manage_project:{}", self.project_key)]
        } else {
            self.scopes.clone()
        }
    }

    pub fn container_url(&self) -> String {
        format!(
            "{}/{}/import-containers/{}",
            self.api_url.trim_end_matches('/'),
            self.project_key,
            self.container_key
        )
    }

    pub fn containers_url(&self) -> String {
        format!(
            "{}/{}/import-containers",
            self.api_url.trim_end_matches('/'),
            self.project_key
        )
    }

    pub fn product_drafts_url(&self) -> String {
        format!(
            "{}/{}/product-drafts/import-containers/{}",
            self.api_url.trim_end_matches('/'),
            self.project_key,
            self.container_key
        )
    }
}

impl fmt::Debug for ImportApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportApiConfig")
            .field("auth_url", &self.auth_url)
            .field("api_url", &self.api_url)
            .field("project_key", &self.project_key)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("scopes", &self.scopes)
            .field("container_key", &self.container_key)
            .finish()
    }
}

/// Body of a product draft import request.
#[derive(Debug, Serialize)]
pub struct ImportRequest<'a> {
    #[serde(rename = "type")]
    pub resource_type: &'static str,
    pub resources: &'a [ProductDraft],
}

impl<'a> ImportRequest<'a> {
    pub fn product_drafts(resources: &'a [ProductDraft]) -> Self {
        Self {
            resource_type: PRODUCT_DRAFT_TYPE,
            resources,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContainerDraft<'a> {
    key: &'a str,
    resource_type: &'static str,
}

/// Per-resource status returned by the Import API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStatus {
    #[serde(default)]
    pub operation_id: Option<String>,
    pub state: String,
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    #[serde(default)]
    pub operation_status: Vec<OperationStatus>,
}

impl ImportResponse {
    pub fn state_counts(&self) -> BTreeMap<String, u64> {
        let mut counts = BTreeMap::new();
        for status in &self.operation_status {
            *counts.entry(status.state.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn error_count(&self) -> usize {
        self.operation_status
            .iter()
            .filter(|status| !status.errors.is_empty())
            .count()
    }
}

/// Pushes batches to an import container, authenticating with client credentials.
pub struct ImportApiSink {
    config: ImportApiConfig,
    http: reqwest::Client,
    credentials: ClientCredentials,
    container_ready: bool,
    summary: SinkSummary,
}

impl ImportApiSink {
    pub fn new(config: ImportApiConfig) -> SinkResult<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let credentials = ClientCredentials::new(
            &config.auth_url,
            config.client_id.clone(),
            config.client_secret.clone(),
            &config.effective_scopes(),
        );

        Ok(Self {
            summary: SinkSummary::new(config.product_drafts_url()),
            config,
            http,
            credentials,
            container_ready: false,
        })
    }

    pub fn config(&self) -> &ImportApiConfig {
        &self.config
    }

    /// Create the import container unless it already exists.
    pub async fn ensure_container(&mut self) -> SinkResult<()> {
        if self.container_ready {
            return Ok(());
        }

        let token = self.credentials.access_token(&self.http).await?;
        let url = self.config.container_url();
        let response = self.http.get(&url).bearer_auth(&token).send().await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => {
                let url = self.config.containers_url();
                let response = self
                    .http
                    .post(&url)
                    .bearer_auth(&token)
                    .json(&ContainerDraft {
                        key: &self.config.container_key,
                        resource_type: PRODUCT_DRAFT_TYPE,
                    })
                    .send()
                    .await?;
                check_status(&url, response).await?;
                info!(
                    event = "import_container_created",
                    container = %self.config.container_key
                );
            }
            _ => {
                check_status(&url, response).await?;
            }
        }

        self.container_ready = true;
        Ok(())
    }
}

#[async_trait]
impl BatchSink for ImportApiSink {
    fn kind(&self) -> &'static str {
        "import_api"
    }

    async fn send(&mut self, batch: usize, resources: &[ProductDraft]) -> SinkResult<SinkReceipt> {
        if resources.len() > MAX_RESOURCES_PER_REQUEST {
            return Err(SinkError::Config(format!(
                "batch {batch} has {} resources, the import limit is {MAX_RESOURCES_PER_REQUEST}",
                resources.len()
            )));
        }

        self.ensure_container().await?;
        let token = self.credentials.access_token(&self.http).await?;
        let url = self.config.product_drafts_url();
        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&ImportRequest::product_drafts(resources))
            .send()
            .await?;

        let response = check_status(&url, response).await?;
        let parsed: ImportResponse = response.json().await?;
        let errors = parsed.error_count();
        if errors > 0 {
            warn!(event = "import_operation_errors", batch, errors);
        }

        let receipt = SinkReceipt {
            batch,
            resources: resources.len(),
            operation_states: parsed.state_counts(),
            ..SinkReceipt::default()
        };
        self.summary.record(&receipt);
        Ok(receipt)
    }

    async fn finish(&mut self) -> SinkResult<SinkSummary> {
        Ok(self.summary.clone())
    }
}

async fn check_status(url: &str, response: reqwest::Response) -> SinkResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SinkError::Status {
        url: url.to_string(),
        status: status.as_u16(),
        body,
    })
}
