//! Wire-level and result types.

mod ack;
mod message;
mod outcome;

pub use ack::{Ack, QueueAck};
pub use message::{Message, MessageKind};
pub use outcome::{Attempted, CollectEnd, Collected};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept any JSON value for a sequence field, keeping it only when it is an
/// integer. Servers may send placeholders (null, strings) for queues without
/// a position; those carry no cursor information.
fn lenient_seq<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_i64))
}
