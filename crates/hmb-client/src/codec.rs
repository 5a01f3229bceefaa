//! Wire codecs. JSON batches are objects keyed by stringified index
//! (`"0"`, `"1"`, ...); BSON batches are documents laid end to end.

use std::io::Cursor;

use bson::{Bson, Document};
use hmb_core::{HmbError, HmbResult, Message, WireFormat};
use serde_json::{Map, Value};

/// Encode a single document.
pub fn encode_document(format: WireFormat, document: &Value) -> HmbResult<Vec<u8>> {
    match format {
        WireFormat::Json => {
            serde_json::to_vec(document).map_err(|e| HmbError::encode(e.to_string()))
        }
        WireFormat::Bson => {
            let mut buf = Vec::new();
            write_bson(document, &mut buf)?;
            Ok(buf)
        }
    }
}

/// Encode several documents in the format's multi-message envelope.
pub fn encode_batch(format: WireFormat, documents: &[Value]) -> HmbResult<Vec<u8>> {
    match format {
        WireFormat::Json => {
            let envelope: Map<String, Value> = documents
                .iter()
                .enumerate()
                .map(|(i, doc)| (i.to_string(), doc.clone()))
                .collect();
            serde_json::to_vec(&envelope).map_err(|e| HmbError::encode(e.to_string()))
        }
        WireFormat::Bson => {
            let mut buf = Vec::new();
            for doc in documents {
                write_bson(doc, &mut buf)?;
            }
            Ok(buf)
        }
    }
}

/// Decode a single document.
pub fn decode_document(format: WireFormat, bytes: &[u8]) -> HmbResult<Value> {
    match format {
        WireFormat::Json => {
            serde_json::from_slice(bytes).map_err(|e| HmbError::decode(e.to_string()))
        }
        WireFormat::Bson => read_bson(&mut Cursor::new(bytes)),
    }
}

/// Decode a multi-message envelope into its documents, in order.
pub fn decode_batch(format: WireFormat, bytes: &[u8]) -> HmbResult<Vec<Value>> {
    match format {
        WireFormat::Json => match decode_document(format, bytes)? {
            Value::Object(mut envelope) => (0..envelope.len())
                .map(|i| {
                    envelope.remove(&i.to_string()).ok_or_else(|| {
                        HmbError::decode(format!("message batch is missing index {i}"))
                    })
                })
                .collect(),
            Value::Array(documents) => Ok(documents),
            other => Err(HmbError::decode(format!(
                "expected a message batch object, got {}",
                json_kind(&other)
            ))),
        },
        WireFormat::Bson => {
            let mut cursor = Cursor::new(bytes);
            let mut documents = Vec::new();
            while (cursor.position() as usize) < bytes.len() {
                documents.push(read_bson(&mut cursor)?);
            }
            Ok(documents)
        }
    }
}

/// Encode messages as a batch.
pub fn encode_messages(format: WireFormat, messages: &[Message]) -> HmbResult<Vec<u8>> {
    encode_batch(format, &messages_to_documents(messages)?)
}

/// Decode a batch into typed messages.
pub fn decode_messages(format: WireFormat, bytes: &[u8]) -> HmbResult<Vec<Message>> {
    decode_batch(format, bytes)?
        .into_iter()
        .map(|doc| {
            serde_json::from_value(doc).map_err(|e| HmbError::decode(format!("invalid message: {e}")))
        })
        .collect()
}

pub fn messages_to_documents(messages: &[Message]) -> HmbResult<Vec<Value>> {
    messages
        .iter()
        .map(|m| serde_json::to_value(m).map_err(|e| HmbError::encode(e.to_string())))
        .collect()
}

fn write_bson(document: &Value, buf: &mut Vec<u8>) -> HmbResult<()> {
    let document: Document =
        bson::to_document(document).map_err(|e| HmbError::encode(e.to_string()))?;
    document
        .to_writer(buf)
        .map_err(|e| HmbError::encode(e.to_string()))
}

fn read_bson(cursor: &mut Cursor<&[u8]>) -> HmbResult<Value> {
    let document = Document::from_reader(cursor).map_err(|e| HmbError::decode(e.to_string()))?;
    Ok(Bson::Document(document).into_relaxed_extjson())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
