//! Configuration types and loading
//!
//! Precedence: env vars > config file > defaults. The client secret is read
//! from CLIENT_SECRET or client_secret_file, never from the TOML itself.
//! A `.env` file, if present, has already been merged into the environment
//! by the time this runs.

use common::Secret;
use delegated_client::{Credentials, DEFAULT_HOST, Endpoints};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CLIENT_ID_ENV: &str = "CLIENT_ID";
pub const ORGANIZATION_ID_ENV: &str = "ORGANIZATION_ID";
pub const CLIENT_SECRET_ENV: &str = "CLIENT_SECRET";

const DEFAULT_CONFIG_FILE: &str = "xbooker-delegated.toml";

/// Root configuration
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

/// Remote API settings
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Delegated-app credentials; any field may instead come from the environment
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    /// Path to a file containing the client secret (alternative to CLIENT_SECRET)
    #[serde(default)]
    pub client_secret_file: Option<PathBuf>,
    #[serde(skip)]
    pub client_secret: Option<Secret<String>>,
}

fn default_base_url() -> String {
    DEFAULT_HOST.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn endpoints(&self) -> Endpoints {
        Endpoints::for_host(&self.base_url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl CredentialsConfig {
    /// Build validated client credentials, naming the env var of the first
    /// missing value.
    pub fn resolve(&self) -> common::Result<Credentials> {
        let client_id = self
            .client_id
            .clone()
            .ok_or(common::Error::MissingCredential(CLIENT_ID_ENV))?;
        let organization_id = self
            .organization_id
            .clone()
            .ok_or(common::Error::MissingCredential(ORGANIZATION_ID_ENV))?;
        let client_secret = self
            .client_secret
            .clone()
            .ok_or(common::Error::MissingCredential(CLIENT_SECRET_ENV))?;

        Credentials::new(client_id, client_secret, organization_id)
            .map_err(|e| common::Error::Config(e.to_string()))
    }
}

impl Config {
    /// Load configuration from an optional TOML file, then overlay
    /// environment variables.
    ///
    /// Client secret resolution order:
    /// 1. CLIENT_SECRET env var
    /// 2. client_secret_file path from config
    pub fn load(path: Option<&Path>) -> common::Result<Self> {
        let mut config = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                toml::from_str::<Config>(&contents)?
            }
            None => Config::default(),
        };

        if !config.api.base_url.starts_with("http://")
            && !config.api.base_url.starts_with("https://")
        {
            return Err(common::Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                config.api.base_url
            )));
        }

        if config.api.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if let Ok(id) = std::env::var(CLIENT_ID_ENV) {
            config.credentials.client_id = Some(id);
        }
        if let Ok(id) = std::env::var(ORGANIZATION_ID_ENV) {
            config.credentials.organization_id = Some(id);
        }

        if let Ok(secret) = std::env::var(CLIENT_SECRET_ENV) {
            config.credentials.client_secret = Some(Secret::new(secret));
        } else if let Some(ref secret_file) = config.credentials.client_secret_file {
            let secret = std::fs::read_to_string(secret_file).map_err(|e| {
                common::Error::Config(format!(
                    "failed to read client_secret_file {}: {e}",
                    secret_file.display()
                ))
            })?;
            let secret = secret.trim().to_owned();
            if !secret.is_empty() {
                config.credentials.client_secret = Some(Secret::new(secret));
            }
        }

        Ok(config)
    }

    /// Resolve the config file from CLI arg or CONFIG_PATH env var.
    ///
    /// Falls back to `xbooker-delegated.toml` only if that file exists, so
    /// the sample runs from environment variables alone.
    pub fn resolve_path(cli_path: Option<&str>) -> Option<PathBuf> {
        if let Some(p) = cli_path {
            return Some(PathBuf::from(p));
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return Some(PathBuf::from(p));
        }
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        default.exists().then_some(default)
    }
}
