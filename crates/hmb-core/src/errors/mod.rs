//! Error types for the HMB client.

mod config_error;
mod hmb_error;

pub use config_error::ConfigError;
pub use hmb_error::HmbError;

/// Convenience alias used across the workspace.
pub type HmbResult<T> = Result<T, HmbError>;
