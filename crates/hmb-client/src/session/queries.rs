use hmb_core::constants::{FEATURES_PATH, INFO_PATH, STATUS_PATH};
use hmb_core::traits::Transport;
use hmb_core::{HmbResult, WireFormat};
use serde_json::Value;

use super::HmbSession;
use crate::codec;
use crate::transport::protocol;

/// Read-only server endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryEndpoint {
    /// Defined queues, topics, and available data.
    Info,
    /// Supported functions, optionally server name and version.
    Features,
    /// Connected clients (sessions).
    Status,
}

impl QueryEndpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Info => INFO_PATH,
            Self::Features => FEATURES_PATH,
            Self::Status => STATUS_PATH,
        }
    }
}

impl<T: Transport> HmbSession<T> {
    /// GET a read-only endpoint. Does not need an open session.
    ///
    /// The body is decoded as BSON when the response says so, JSON otherwise.
    pub fn query(&self, endpoint: QueryEndpoint) -> HmbResult<Value> {
        let response = self
            .transport
            .get(&protocol::endpoint(&self.url, endpoint.path()))?;
        let response = protocol::check_status(response)?;
        let format = response
            .content_type
            .as_deref()
            .and_then(WireFormat::from_content_type)
            .unwrap_or(WireFormat::Json);
        codec::decode_document(format, &response.body)
    }

    pub fn info(&self) -> Option<Value> {
        self.query_or_report(QueryEndpoint::Info)
    }

    pub fn features(&self) -> Option<Value> {
        self.query_or_report(QueryEndpoint::Features)
    }

    pub fn status(&self) -> Option<Value> {
        self.query_or_report(QueryEndpoint::Status)
    }

    fn query_or_report(&self, endpoint: QueryEndpoint) -> Option<Value> {
        match self.query(endpoint) {
            Ok(document) => Some(document),
            Err(error) => {
                self.observer.query_failed(endpoint.path(), &error);
                None
            }
        }
    }
}
