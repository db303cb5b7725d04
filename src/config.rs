use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::constants;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub booking: AppSection,
    pub trivia: AppSection,
    pub coffee: AppSection,
    pub auth: AuthConfig,
    pub directory: DirectoryConfig,
}

/// Listener and storage settings shared by every app.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub port: Option<u16>,
    pub database: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Identity provider tenant, e.g. `my-tenant.us.auth0.com`
    pub domain: String,
    pub audience: String,
    /// `RS256` verifies against the provider's JWKS, `HS256` against `shared_secret`
    pub algorithm: String,
    pub shared_secret: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            audience: "drinks".to_string(),
            algorithm: "RS256".to_string(),
            shared_secret: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub barista_role_id: String,
    pub manager_role_id: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: None,
            barista_role_id: "rol_barista".to_string(),
            manager_role_id: "rol_manager".to_string(),
        }
    }
}

/// Which of the three backends a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AppKind {
    Booking,
    Trivia,
    Coffee,
}

impl AppKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppKind::Booking => "booking",
            AppKind::Trivia => "trivia",
            AppKind::Coffee => "coffee",
        }
    }
}

impl Config {
    /// Loads `path` if it exists, otherwise falls back to defaults. Secrets
    /// from the environment always win over the file.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
            toml::from_str::<Config>(&content)
                .with_context(|| format!("Failed to parse config file '{}'", path.display()))?
        } else {
            info!("{} not found, using defaults", path.display());
            Config::default()
        };

        if let Ok(secret) = env::var("COFFEE_AUTH_SECRET") {
            config.auth.shared_secret = Some(secret);
        }
        if let Ok(token) = env::var("USER_DIRECTORY_TOKEN") {
            config.directory.token = Some(token);
        }
        if config.directory.token.is_none() && !config.directory.base_url.is_empty() {
            warn!("USER_DIRECTORY_TOKEN not set; role management calls will be rejected upstream");
        }

        Ok(config)
    }

    pub fn section(&self, app: AppKind) -> &AppSection {
        match app {
            AppKind::Booking => &self.booking,
            AppKind::Trivia => &self.trivia,
            AppKind::Coffee => &self.coffee,
        }
    }

    pub fn port(&self, app: AppKind) -> u16 {
        self.section(app).port.unwrap_or(match app {
            AppKind::Booking => constants::DEFAULT_BOOKING_PORT,
            AppKind::Trivia => constants::DEFAULT_TRIVIA_PORT,
            AppKind::Coffee => constants::DEFAULT_COFFEE_PORT,
        })
    }

    pub fn database_path(&self, app: AppKind) -> String {
        self.section(app)
            .database
            .clone()
            .unwrap_or_else(|| format!("data/{}.db", app.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = Config::load(Path::new("definitely/not/here.toml")).unwrap();
        assert_eq!(config.port(AppKind::Trivia), constants::DEFAULT_TRIVIA_PORT);
        assert_eq!(config.database_path(AppKind::Coffee), "data/coffee.db");
        assert_eq!(config.auth.algorithm, "RS256");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[booking]\nport = 9000\n\n[directory]\nbarista_role_id = \"rol_x\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.port(AppKind::Booking), 9000);
        assert_eq!(config.port(AppKind::Coffee), constants::DEFAULT_COFFEE_PORT);
        assert_eq!(config.directory.barista_role_id, "rol_x");
        assert_eq!(config.directory.manager_role_id, "rol_manager");
    }
}
