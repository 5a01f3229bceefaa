//! # hmb-core
//!
//! Foundation crate for the HMB message bus client.
//! Defines the session configuration, wire message types, errors, and the
//! transport/observer seams the client is built on.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::{HmbConfig, QueueSubscription, SessionConfig, WireFormat};
pub use errors::{ConfigError, HmbError, HmbResult};
pub use models::{Ack, Attempted, CollectEnd, Collected, Message, MessageKind};
pub use traits::{HttpResponse, SessionObserver, Transport};
