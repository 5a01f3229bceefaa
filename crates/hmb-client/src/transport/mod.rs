//! Transport layer: URL layout, status-code contract, and the reqwest-backed
//! HTTP client.

#[cfg(feature = "http")]
pub mod http_client;
pub mod protocol;

pub use hmb_core::traits::{HttpResponse, Transport};
#[cfg(feature = "http")]
pub use http_client::ReqwestTransport;
