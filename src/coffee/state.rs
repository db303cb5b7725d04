use super::auth::{JwksVerifier, SharedSecretVerifier, TokenVerifier};
use super::directory::{Auth0Directory, RoleIds, UserDirectory};
use super::store::CoffeeStore;
use crate::config::Config;
use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tracing::info;

/// Everything the coffee-shop handlers share.
#[derive(Clone)]
pub struct CoffeeApp {
    pub store: CoffeeStore,
    pub verifier: Arc<dyn TokenVerifier>,
    pub directory: Arc<dyn UserDirectory>,
    pub roles: RoleIds,
}

impl CoffeeApp {
    pub fn new(
        store: CoffeeStore,
        verifier: Arc<dyn TokenVerifier>,
        directory: Arc<dyn UserDirectory>,
        roles: RoleIds,
    ) -> Self {
        Self {
            store,
            verifier,
            directory,
            roles,
        }
    }

    /// Picks the token verifier from `[auth]` and the user directory from
    /// `[directory]`.
    pub fn from_config(store: CoffeeStore, config: &Config) -> Result<Self> {
        let auth = &config.auth;
        let verifier: Arc<dyn TokenVerifier> = match auth.algorithm.to_ascii_uppercase().as_str() {
            "HS256" => {
                let secret = auth
                    .shared_secret
                    .as_deref()
                    .context("HS256 tokens need auth.shared_secret or COFFEE_AUTH_SECRET")?;
                info!("Verifying HS256 tokens with the shared secret");
                Arc::new(SharedSecretVerifier::new(secret, Some(&auth.audience)))
            }
            "RS256" => {
                if auth.domain.is_empty() {
                    bail!("RS256 tokens need auth.domain to locate the signing keys");
                }
                info!(domain = %auth.domain, "Verifying RS256 tokens against the provider's JWKS");
                Arc::new(JwksVerifier::new(&auth.domain, &auth.audience))
            }
            other => bail!("Unsupported auth.algorithm '{other}' (expected RS256 or HS256)"),
        };

        let directory = &config.directory;
        let base_url = if directory.base_url.is_empty() && !auth.domain.is_empty() {
            format!("https://{}", auth.domain.trim_end_matches('/'))
        } else {
            directory.base_url.clone()
        };

        Ok(Self::new(
            store,
            verifier,
            Arc::new(Auth0Directory::new(&base_url, directory.token.clone())),
            RoleIds {
                barista: directory.barista_role_id.clone(),
                manager: directory.manager_role_id.clone(),
            },
        ))
    }
}
