use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Server acknowledgment of an open request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    /// Session id used on send/recv URLs.
    pub sid: String,
    /// Client id, assigned or echoed.
    pub cid: String,
    #[serde(default, rename = "queue")]
    pub queues: BTreeMap<String, QueueAck>,
}

/// Per-queue part of an [`Ack`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueAck {
    /// Next sequence number the server will deliver, when known.
    #[serde(
        default,
        deserialize_with = "super::lenient_seq",
        skip_serializing_if = "Option::is_none"
    )]
    pub seq: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
