//! # Repository Provisioner
//!
//! Client for the edge function that creates and deletes a team's code
//! repository. The function is opaque: it takes a team name and join code and
//! answers with a URL, or takes a URL and answers whether it was deleted.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use error::{AppError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name used in external-call logs.
const SERVICE: &str = "repository_function";

/// What the provisioner needs to create a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRequest {
    pub team_id:   Uuid,
    pub team_name: String,
    pub join_code: String,
}

/// Creates and deletes team repositories.
#[async_trait]
pub trait RepositoryProvisioner: Send + Sync + std::fmt::Debug {
    /// Create a repository and return its URL.
    async fn create_repository(&self, request: &RepositoryRequest) -> Result<String>;

    /// Delete the repository at `url`. `Ok(false)` means the service declined.
    async fn delete_repository(&self, url: &str) -> Result<bool>;
}

/// Repository provisioner configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Edge-function endpoint; `None` disables provisioning
    pub function_url: Option<String>,
    /// Bearer key sent to the function
    pub service_key:  Option<String>,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl RepositoryConfig {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            function_url: None,
            service_key:  None,
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Pick the provisioner for `config`.
///
/// # Errors
///
/// Returns a `Config` error if the HTTP client cannot be built.
pub fn provisioner_from_config(config: &RepositoryConfig) -> Result<Arc<dyn RepositoryProvisioner>> {
    match config.function_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => {
            Ok(Arc::new(HttpRepositoryProvisioner::new(
                url,
                config.service_key.clone(),
                Duration::from_secs(config.timeout_secs),
            )?))
        },
        _ => Ok(Arc::new(DisabledRepositoryProvisioner)),
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
enum FunctionRequest<'a> {
    Create {
        team_id:   Uuid,
        team_name: &'a str,
        join_code: &'a str,
    },
    Delete {
        repository_url: &'a str,
    },
}

#[derive(Debug, Deserialize)]
struct CreateReply {
    repository_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeleteReply {
    #[serde(default)]
    deleted: bool,
}

/// Talks to the edge function over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpRepositoryProvisioner {
    client:      Client,
    url:         String,
    service_key: Option<String>,
}

impl HttpRepositoryProvisioner {
    /// # Errors
    ///
    /// Returns a `Config` error if the HTTP client cannot be built.
    pub fn new(url: &str, service_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build repository client: {}", e)))?;
        Ok(Self {
            client,
            url: url.to_string(),
            service_key,
        })
    }

    async fn send<T: for<'de> Deserialize<'de>>(&self, body: &FunctionRequest<'_>) -> Result<T> {
        let mut request = self.client.post(&self.url).json(body);
        if let Some(key) = &self.service_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::external(format!(
                "Repository function returned {}: {}",
                status, text
            )));
        }
        Ok(response.json::<T>().await?)
    }

    async fn call<T: for<'de> Deserialize<'de>>(&self, operation: &str, body: &FunctionRequest<'_>) -> Result<T> {
        let started = Instant::now();
        let outcome = self.send(body).await;

        logging::log_external_call!(
            SERVICE,
            operation,
            outcome.is_ok(),
            started.elapsed().as_millis()
        );
        if let Err(e) = &outcome {
            tracing::error!(operation, error = %e, "Repository function call failed");
        }
        outcome
    }
}

#[async_trait]
impl RepositoryProvisioner for HttpRepositoryProvisioner {
    async fn create_repository(&self, request: &RepositoryRequest) -> Result<String> {
        let reply: CreateReply = self
            .call(
                "create",
                &FunctionRequest::Create {
                    team_id:   request.team_id,
                    team_name: &request.team_name,
                    join_code: &request.join_code,
                },
            )
            .await?;

        reply
            .repository_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| AppError::external("Repository function returned no repository URL"))
    }

    async fn delete_repository(&self, url: &str) -> Result<bool> {
        let reply: DeleteReply = self
            .call(
                "delete",
                &FunctionRequest::Delete {
                    repository_url: url,
                },
            )
            .await?;
        Ok(reply.deleted)
    }
}

/// Used when no function URL is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledRepositoryProvisioner;

#[async_trait]
impl RepositoryProvisioner for DisabledRepositoryProvisioner {
    async fn create_repository(&self, _request: &RepositoryRequest) -> Result<String> {
        Err(AppError::config("Repository provisioning is not configured"))
    }

    async fn delete_repository(&self, _url: &str) -> Result<bool> {
        Err(AppError::config("Repository provisioning is not configured"))
    }
}
