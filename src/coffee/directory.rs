//! Role membership at the identity provider's user-management API.

use crate::observability::metrics;
use async_trait::async_trait;
use reqwest::Url;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("user directory is not configured: {0}")]
    NotConfigured(String),

    #[error("user directory request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("user directory returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Barista,
    Manager,
}

/// Provider-side ids of the two staff roles.
#[derive(Debug, Clone)]
pub struct RoleIds {
    pub barista: String,
    pub manager: String,
}

impl RoleIds {
    pub fn id(&self, role: Role) -> &str {
        match role {
            Role::Barista => &self.barista,
            Role::Manager => &self.manager,
        }
    }
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Users currently holding `role_id`, as the provider reports them.
    async fn role_members(&self, role_id: &str) -> Result<Value, DirectoryError>;
    async fn assign_role(&self, user_id: &str, role_id: &str) -> Result<(), DirectoryError>;
    async fn revoke_role(&self, user_id: &str, role_id: &str) -> Result<(), DirectoryError>;
}

/// Auth0 management API v2.
pub struct Auth0Directory {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl Auth0Directory {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, DirectoryError> {
        let bad_base = || DirectoryError::NotConfigured(format!("invalid base URL '{}'", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| bad_base())?;
        url.path_segments_mut()
            .map_err(|_| bad_base())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn token(&self) -> Result<&str, DirectoryError> {
        self.token
            .as_deref()
            .ok_or_else(|| DirectoryError::NotConfigured("management token missing".to_string()))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, DirectoryError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(DirectoryError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn change_roles(
        &self,
        method: reqwest::Method,
        user_id: &str,
        role_id: &str,
    ) -> Result<(), DirectoryError> {
        let url = self.endpoint(&["api", "v2", "users", user_id, "roles"])?;
        debug!("{} {}", method, url);
        let response = self
            .client
            .request(method, url)
            .bearer_auth(self.token()?)
            .json(&json!({ "roles": [role_id] }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

fn observe<T>(operation: &'static str, result: Result<T, DirectoryError>) -> Result<T, DirectoryError> {
    metrics::coffee::directory_call(operation, result.is_ok());
    if let Err(err) = &result {
        error!(operation, "User directory call failed: {err}");
    }
    result
}

#[async_trait]
impl UserDirectory for Auth0Directory {
    async fn role_members(&self, role_id: &str) -> Result<Value, DirectoryError> {
        let result = async {
            let url = self.endpoint(&["api", "v2", "roles", role_id, "users"])?;
            debug!("GET {}", url);
            let response = self
                .client
                .get(url)
                .bearer_auth(self.token()?)
                .send()
                .await?;
            Ok::<_, DirectoryError>(Self::check(response).await?.json::<Value>().await?)
        }
        .await;
        observe("role_members", result)
    }

    async fn assign_role(&self, user_id: &str, role_id: &str) -> Result<(), DirectoryError> {
        let result = self
            .change_roles(reqwest::Method::POST, user_id, role_id)
            .await;
        observe("assign_role", result)
    }

    async fn revoke_role(&self, user_id: &str, role_id: &str) -> Result<(), DirectoryError> {
        let result = self
            .change_roles(reqwest::Method::DELETE, user_id, role_id)
            .await;
        observe("revoke_role", result)
    }
}
