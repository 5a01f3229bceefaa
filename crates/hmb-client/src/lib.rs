//! # hmb-client
//!
//! Client for HTTP message bus (HMB) servers. An [`HmbSession`] opens a
//! session lazily, keeps per-queue cursors so reconnects resume where they
//! left off, retries failed operations with reconnect and backoff, and
//! separates heartbeats and end-of-stream markers from real data.
//!
//! Network failures never panic or propagate out of `send`/`recv`: they are
//! reported to the session's [`SessionObserver`](hmb_core::SessionObserver)
//! and returned alongside an empty result in [`Attempted`](hmb_core::Attempted).

pub mod codec;
pub mod session;
pub mod tracing_setup;
pub mod transport;

pub use hmb_core::{
    Ack, Attempted, CollectEnd, Collected, HmbConfig, HmbError, HmbResult, Message, MessageKind,
    QueueSubscription, SessionConfig, WireFormat,
};
pub use session::{HmbSession, QueryEndpoint, SessionState};
pub use tracing_setup::TracingObserver;
#[cfg(feature = "http")]
pub use transport::ReqwestTransport;
