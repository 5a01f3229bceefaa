//! Configuration for an HMB client: connection behaviour, transport tuning,
//! and the session parameters sent on open.

mod client_config;
pub mod defaults;
mod session_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use client_config::{ClientConfig, TransportConfig, WireFormat};
pub use session_config::{QueueSubscription, SessionConfig};

use crate::errors::ConfigError;

/// Top-level configuration aggregating all sections.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`HMB_*`), via [`HmbConfig::apply_env_overrides`]
/// 2. Config file
/// 3. Compiled defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HmbConfig {
    pub client: ClientConfig,
    pub transport: TransportConfig,
    pub session: SessionConfig,
}

impl HmbConfig {
    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Self::parse(toml_str, "<string>")
    }

    /// Load a TOML file, apply environment overrides, and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let mut config = Self::parse(&content, &path.display().to_string())?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn parse(toml_str: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `HMB_*` environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup. Unparseable values are
    /// ignored so a stray variable cannot clobber a valid file setting.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("HMB_URL") {
            self.client.url = url;
        }
        if let Some(format) = lookup("HMB_FORMAT").and_then(|v| v.parse().ok()) {
            self.client.format = format;
        }
        if let Some(wait) = lookup("HMB_RETRY_WAIT_SECS").and_then(|v| v.trim().parse().ok()) {
            self.client.retry_wait_secs = wait;
        }
        if let Some(flag) = lookup("HMB_AUTOCREATE_QUEUES").and_then(|v| parse_flag(&v)) {
            self.client.autocreate_queues = flag;
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.client.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationFailed {
                field: "client.url".to_string(),
                message: format!("'{url}' is not an http(s) URL"),
            });
        }
        if self.session.heartbeat_secs == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "session.heartbeat".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        for name in self.session.queues.keys() {
            if name.is_empty() || name.contains('/') {
                return Err(ConfigError::ValidationFailed {
                    field: format!("session.queue.{name}"),
                    message: "queue names must be non-empty and must not contain '/'".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
