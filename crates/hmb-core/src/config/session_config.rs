use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::defaults;

/// Parameters sent to the server when a session is opened.
///
/// Field names serialize to the wire names the server expects; the readable
/// Rust names are accepted as aliases when loading from a config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Client id; assigned by the server on the first open when absent.
    #[serde(rename = "cid", alias = "client_id", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Heartbeat interval in seconds for long-poll receives.
    #[serde(rename = "heartbeat", alias = "heartbeat_secs", skip_serializing_if = "Option::is_none")]
    pub heartbeat_secs: Option<u32>,
    /// Maximum number of messages per receive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recv_limit: Option<u32>,
    /// Subscriptions keyed by queue name.
    #[serde(rename = "queue", alias = "queues")]
    pub queues: BTreeMap<String, QueueSubscription>,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_heartbeat(mut self, secs: u32) -> Self {
        self.heartbeat_secs = Some(secs);
        self
    }

    pub fn with_recv_limit(mut self, limit: u32) -> Self {
        self.recv_limit = Some(limit);
        self
    }

    pub fn with_queue(mut self, name: impl Into<String>, subscription: QueueSubscription) -> Self {
        self.queues.insert(name.into(), subscription);
        self
    }

    pub fn subscription(&self, queue: &str) -> Option<&QueueSubscription> {
        self.queues.get(queue)
    }

    /// Current resume cursor for `queue`.
    pub fn cursor(&self, queue: &str) -> Option<i64> {
        self.queues.get(queue).map(|q| q.seq)
    }

    /// Whether any subscription asks the server to hold receives open.
    pub fn is_long_poll(&self) -> bool {
        self.queues.values().any(|q| q.keep)
    }

    /// Adopt the server's next sequence for `queue` when it is ahead of ours.
    ///
    /// Returns `true` if the cursor moved. Unknown queues are ignored.
    pub fn adopt_next_seq(&mut self, queue: &str, next_seq: i64) -> bool {
        match self.queues.get_mut(queue) {
            Some(sub) if next_seq > sub.seq => {
                sub.seq = next_seq;
                true
            }
            _ => false,
        }
    }

    /// Record a delivered sequence number for `queue`. See [`QueueSubscription::observe`].
    pub fn observe_seq(&mut self, queue: &str, seq: i64) -> bool {
        self.queues
            .get_mut(queue)
            .is_some_and(|sub| sub.observe(seq))
    }

    /// Overwrite the cursor for `queue`. Returns `false` for unknown queues.
    pub fn set_cursor(&mut self, queue: &str, seq: i64) -> bool {
        match self.queues.get_mut(queue) {
            Some(sub) => {
                sub.seq = seq;
                true
            }
            None => false,
        }
    }
}

/// Subscription parameters for a single queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueSubscription {
    /// Topics to receive; empty means all.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
    /// Resume cursor. Negative values count back from the queue head
    /// (-1 next new message, -2 most recent, ...).
    pub seq: i64,
    #[serde(rename = "endseq", alias = "end_seq", skip_serializing_if = "Option::is_none")]
    pub end_seq: Option<i64>,
    #[serde(rename = "starttime", alias = "start_time", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(rename = "endtime", alias = "end_time", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(rename = "qlen", alias = "queue_len", skip_serializing_if = "Option::is_none")]
    pub queue_len: Option<u32>,
    #[serde(rename = "oowait", alias = "out_of_order_wait", skip_serializing_if = "Option::is_none")]
    pub out_of_order_wait: Option<u32>,
    /// Block receives until data or a heartbeat is available.
    pub keep: bool,
}

impl QueueSubscription {
    /// Subscription starting at `seq`.
    pub fn starting_at(seq: i64) -> Self {
        Self {
            seq,
            ..Self::default()
        }
    }

    pub fn keep(mut self, keep: bool) -> Self {
        self.keep = keep;
        self
    }

    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_end_seq(mut self, end_seq: i64) -> Self {
        self.end_seq = Some(end_seq);
        self
    }

    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Advance the cursor past `seq` if it is at or ahead of the cursor.
    ///
    /// The cursor never moves backward. Returns `true` if it moved.
    pub fn observe(&mut self, seq: i64) -> bool {
        if seq >= self.seq {
            self.seq = seq.saturating_add(1);
            true
        } else {
            false
        }
    }
}

impl Default for QueueSubscription {
    fn default() -> Self {
        Self {
            topics: Vec::new(),
            seq: defaults::DEFAULT_START_SEQ,
            end_seq: None,
            start_time: None,
            end_time: None,
            filter: None,
            queue_len: None,
            out_of_order_wait: None,
            keep: defaults::DEFAULT_KEEP,
        }
    }
}
