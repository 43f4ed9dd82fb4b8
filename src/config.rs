//! Configuration Management
//!
//! Persistent settings for the REST provider: management endpoint and bearer
//! token. Acquiring credentials is out of scope; the token is taken as-is
//! from the environment or the config file.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding the configured endpoint.
pub const ENDPOINT_ENV: &str = "CLOUDCUTS_ENDPOINT";
/// Environment variable overriding the configured bearer token.
pub const TOKEN_ENV: &str = "CLOUDCUTS_TOKEN";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Management API endpoint
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Bearer token for the management API
    #[serde(default)]
    pub token: Option<String>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cloudcuts").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Get effective endpoint (env > config)
    pub fn effective_endpoint(&self) -> String {
        std::env::var(ENDPOINT_ENV)
            .ok()
            .or_else(|| self.endpoint.clone())
            .unwrap_or_default()
    }

    /// Get effective token (env > config)
    pub fn effective_token(&self) -> String {
        std::env::var(TOKEN_ENV)
            .ok()
            .or_else(|| self.token.clone())
            .unwrap_or_default()
    }
}
