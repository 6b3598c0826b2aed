//! Server configuration.
//!
//! Resolution order, lowest to highest precedence:
//! 1. built-in defaults
//! 2. TOML file (`--config` / `ACADO_CONFIG`)
//! 3. `ACADO_*` environment variables
//! 4. command-line flags (applied by the binary)
//!
//! ```toml
//! bind_address = "0.0.0.0:8080"
//! log_level = "info,acado=debug"
//!
//! [storage]
//! backend = "file"
//! data_dir = "/var/lib/acado"
//!
//! [auth]
//! enabled = true
//! domain = "acado.edu"
//!
//! [[auth.tokens]]
//! token = "change-me"
//! email = "ops@acado.edu"
//! role = "admin"
//! ```

use std::path::Path;

use acado_auth::AuthConfig;
use acado_core::Error;
use acado_storage::StorageConfig;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "ACADO_";

/// Top-level configuration for `acado-api`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Socket address to listen on.
    pub bind_address: String,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Document store selection.
    pub storage: StorageConfig,
    /// Authentication settings.
    pub auth: AuthConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            log_level: "info".to_string(),
            storage: StorageConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from an optional file, then apply environment
    /// overrides from the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    Error::config(format!("Failed to read {}: {e}", path.display()))
                })?;
                Self::from_toml_str(&content)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::config(format!("Invalid configuration: {e}")).into())
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()).into())
    }

    /// Apply `ACADO_*` overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(value) = var("BIND_ADDRESS") {
            self.bind_address = value;
        }
        if let Some(value) = var("LOG_LEVEL") {
            self.log_level = value;
        }
        if let Some(value) = var("STORAGE_BACKEND") {
            self.storage.backend = value;
        }
        if let Some(value) = var("DATA_DIR") {
            self.storage.data_dir = Some(value.into());
        }
        if let Some(value) = var("AUTH_ENABLED") {
            self.auth.enabled = parse_bool("ACADO_AUTH_ENABLED", &value)?;
        }
        if let Some(value) = var("AUTH_DOMAIN") {
            self.auth.domain = value;
        }
        Ok(())
    }

    /// Check settings that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.bind_address.parse::<std::net::SocketAddr>().is_err() {
            return Err(Error::config(format!(
                "bind_address '{}' is not a socket address",
                self.bind_address
            ))
            .into());
        }
        if self.auth.enabled && self.auth.tokens.is_empty() {
            tracing::warn!("auth is enabled but no tokens are configured; writes will be refused");
        }
        Ok(())
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::config(format!("{name}: expected a boolean, got '{other}'")).into()),
    }
}
