use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{TYPE_DATA, TYPE_EOF, TYPE_HEARTBEAT, TYPE_TOUCH};

/// Message type tag. Applications are free to invent their own types, which
/// decode into [`MessageKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageKind {
    Data,
    /// Keepalive sent while a long poll has nothing to deliver.
    Heartbeat,
    /// The stream is caught up with the queue head.
    Eof,
    /// Zero-payload message used to force queue creation.
    Touch,
    Other(String),
}

impl MessageKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Data => TYPE_DATA,
            Self::Heartbeat => TYPE_HEARTBEAT,
            Self::Eof => TYPE_EOF,
            Self::Touch => TYPE_TOUCH,
            Self::Other(name) => name,
        }
    }
}

impl From<String> for MessageKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            TYPE_DATA => Self::Data,
            TYPE_HEARTBEAT => Self::Heartbeat,
            TYPE_EOF => Self::Eof,
            TYPE_TOUCH => Self::Touch,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for MessageKind {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<MessageKind> for String {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single bus message.
///
/// Fields outside the common set (`starttime`, `endtime`, application
/// specific keys) are kept by name in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::lenient_seq",
        skip_serializing_if = "Option::is_none"
    )]
    pub seq: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Message {
    pub fn new(kind: impl Into<MessageKind>) -> Self {
        Self {
            kind: kind.into(),
            queue: None,
            seq: None,
            topic: None,
            data: None,
            extra: BTreeMap::new(),
        }
    }

    /// Zero-payload TOUCH for `queue`.
    pub fn touch(queue: impl Into<String>) -> Self {
        Self::new(MessageKind::Touch).to_queue(queue)
    }

    pub fn to_queue(mut self, queue: impl Into<String>) -> Self {
        self.queue = Some(queue.into());
        self
    }

    pub fn with_seq(mut self, seq: i64) -> Self {
        self.seq = Some(seq);
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn is_eof(&self) -> bool {
        self.kind == MessageKind::Eof
    }

    pub fn is_heartbeat(&self) -> bool {
        self.kind == MessageKind::Heartbeat
    }

    /// Queue and sequence number, when the message carries both.
    pub fn position(&self) -> Option<(&str, i64)> {
        Some((self.queue.as_deref()?, self.seq?))
    }
}
