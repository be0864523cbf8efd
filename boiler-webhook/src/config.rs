//! Agent configuration
//!
//! A JSON document read once at process start. The webhook secret is the
//! only sensitive value the agent holds; it is kept behind a newtype whose
//! `Debug` output is redacted so it can never leak through logging.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default location of the agent configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/boiler.json";

/// Errors that can occur while loading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("cannot read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid JSON or misses required fields
    #[error("malformed configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Shared secret used for webhook signature verification
///
/// Immutable for the process lifetime; never logged.
#[derive(Clone, Deserialize)]
pub struct WebhookSecret(String);

impl WebhookSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Raw key material for the HMAC computation
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WebhookSecret(<redacted>)")
    }
}

/// Top-level agent configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    pub github_webhook: GithubWebhookConfig,
}

/// Webhook section of the configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct GithubWebhookConfig {
    pub secret: WebhookSecret,
}

impl AgentConfig {
    /// Loads the configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
