use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants::{BSON_CONTENT_TYPE, JSON_CONTENT_TYPE};
use crate::errors::ConfigError;

/// Wire encoding used for every request and response of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// JSON text, batches keyed by stringified index.
    #[default]
    Json,
    /// BSON documents, batches concatenated.
    Bson,
}

impl WireFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Json => JSON_CONTENT_TYPE,
            Self::Bson => BSON_CONTENT_TYPE,
        }
    }

    /// Pick a format from a response `Content-Type` header.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next()?.trim();
        if essence.eq_ignore_ascii_case(BSON_CONTENT_TYPE) {
            Some(Self::Bson)
        } else if essence.eq_ignore_ascii_case(JSON_CONTENT_TYPE) {
            Some(Self::Json)
        } else {
            None
        }
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Bson => "bson",
        })
    }
}

impl FromStr for WireFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "bson" => Ok(Self::Bson),
            other => Err(ConfigError::ValidationFailed {
                field: "client.format".to_string(),
                message: format!("unknown wire format '{other}', expected json or bson"),
            }),
        }
    }
}

/// Client-side behaviour of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the message bus, e.g. `http://host:8000/bus`.
    pub url: String,
    /// Wire format used for the session.
    pub format: WireFormat,
    /// Seconds to sleep between retries after the first one.
    pub retry_wait_secs: u64,
    /// Create missing queues on open by sending a TOUCH message.
    pub autocreate_queues: bool,
}

impl ClientConfig {
    pub fn retry_wait(&self) -> Duration {
        Duration::from_secs(self.retry_wait_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            format: WireFormat::default(),
            retry_wait_secs: defaults::DEFAULT_RETRY_WAIT_SECS,
            autocreate_queues: defaults::DEFAULT_AUTOCREATE_QUEUES,
        }
    }
}

/// HTTP transport tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Whole-request timeout in milliseconds; 0 disables it. Long-poll
    /// sessions need this above the heartbeat interval.
    pub request_timeout_ms: u64,
    /// Connection establishment timeout in milliseconds; 0 disables it.
    pub connect_timeout_ms: u64,
}

impl TransportConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout_ms > 0).then(|| Duration::from_millis(self.connect_timeout_ms))
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: defaults::DEFAULT_REQUEST_TIMEOUT_MS,
            connect_timeout_ms: defaults::DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }
}
