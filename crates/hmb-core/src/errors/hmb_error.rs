use super::ConfigError;

/// Failures surfaced by HMB protocol operations.
///
/// The retry controller treats every variant as a failed attempt. The
/// classification helpers exist for callers that inspect the terminal error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HmbError {
    /// The server rejected the request (HTTP 400).
    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// The server is temporarily unavailable (HTTP 503).
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String },

    /// Connection failure, timeout, or any other non-2xx status.
    #[error("transport failure: {reason}")]
    Transport { reason: String },

    /// The response body could not be decoded in the active wire format.
    #[error("decode failure: {reason}")]
    Decode { reason: String },

    /// A request body could not be encoded in the active wire format.
    #[error("encode failure: {reason}")]
    Encode { reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl HmbError {
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    pub fn encode(reason: impl Into<String>) -> Self {
        Self::Encode {
            reason: reason.into(),
        }
    }

    /// Whether retrying the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ServiceUnavailable { .. } | Self::Transport { .. })
    }

    /// Whether the server refused the request itself.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::BadRequest { .. })
    }
}
