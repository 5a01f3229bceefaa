//! Test fixtures for the HMB client: golden server payloads, a scripted
//! in-memory transport, and an observer that records every event.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use hmb_core::constants::{BSON_CONTENT_TYPE, JSON_CONTENT_TYPE};
use hmb_core::traits::{
    AttemptFailure, CloseReason, FailureSeverity, HttpResponse, Operation, SessionObserver,
    Transport,
};
use hmb_core::{Ack, HmbError, HmbResult, SessionConfig};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

// ─── Fixture files ─────────────────────────────────────────

/// Root directory of the test-fixtures folder.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    while !path.join("test-fixtures").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixture_path(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as raw JSON Value.
pub fn load_fixture_value(relative_path: &str) -> Value {
    load_fixture(relative_path)
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

// ─── Payload builders ──────────────────────────────────────

/// Index-keyed JSON batch envelope.
pub fn json_batch(messages: &[Value]) -> Value {
    let envelope: Map<String, Value> = messages
        .iter()
        .enumerate()
        .map(|(i, m)| (i.to_string(), m.clone()))
        .collect();
    Value::Object(envelope)
}

/// Concatenated BSON documents.
///
/// # Panics
/// Panics if a value is not a JSON object.
pub fn bson_batch(messages: &[Value]) -> Vec<u8> {
    let mut buf = Vec::new();
    for message in messages {
        let doc = bson::to_document(message).expect("fixture message must be an object");
        doc.to_writer(&mut buf).expect("writing to a Vec cannot fail");
    }
    buf
}

/// Open acknowledgment with the given per-queue entries.
pub fn ack(sid: &str, cid: &str, queues: Value) -> Value {
    json!({ "sid": sid, "cid": cid, "queue": queues })
}

pub fn json_response(status: u16, body: &Value) -> HttpResponse {
    HttpResponse::new(status, body.to_string()).with_content_type(JSON_CONTENT_TYPE)
}

pub fn bson_response(status: u16, documents: &[Value]) -> HttpResponse {
    HttpResponse::new(status, bson_batch(documents)).with_content_type(BSON_CONTENT_TYPE)
}

pub fn text_response(status: u16, text: &str) -> HttpResponse {
    HttpResponse::new(status, text.as_bytes().to_vec())
}

// ─── Scripted transport ────────────────────────────────────

/// HTTP method of a recorded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request seen by [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Body parsed as JSON.
    ///
    /// # Panics
    /// Panics if the body is not JSON.
    pub fn json_body(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }
}

#[derive(Debug, Default)]
struct Script {
    responses: VecDeque<HmbResult<HttpResponse>>,
    requests: Vec<RecordedRequest>,
}

/// In-memory [`Transport`] that replays queued responses in order and
/// records every request. Clones share the same script.
///
/// When the script runs dry every request fails with a transport error.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
    latency: Duration,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every request.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn push(&self, response: HttpResponse) -> &Self {
        self.lock().responses.push_back(Ok(response));
        self
    }

    pub fn push_json(&self, status: u16, body: Value) -> &Self {
        self.push(json_response(status, &body))
    }

    pub fn push_error(&self, error: HmbError) -> &Self {
        self.lock().responses.push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Recorded request URLs, in order.
    pub fn urls(&self) -> Vec<String> {
        self.lock().requests.iter().map(|r| r.url.clone()).collect()
    }

    pub fn remaining(&self) -> usize {
        self.lock().responses.len()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn respond(&self, request: RecordedRequest) -> HmbResult<HttpResponse> {
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        let mut script = self.lock();
        script.requests.push(request);
        script
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(HmbError::transport("connection refused (script exhausted)")))
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, url: &str) -> HmbResult<HttpResponse> {
        self.respond(RecordedRequest {
            method: Method::Get,
            url: url.to_string(),
            content_type: None,
            body: Vec::new(),
        })
    }

    fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> HmbResult<HttpResponse> {
        self.respond(RecordedRequest {
            method: Method::Post,
            url: url.to_string(),
            content_type: Some(content_type.to_string()),
            body,
        })
    }
}

// ─── Recording observer ────────────────────────────────────

/// Owned copy of an observer callback.
#[derive(Debug, Clone, PartialEq)]
pub enum ObservedEvent {
    Opened {
        sid: String,
        cid: String,
    },
    OpenFailed {
        error: HmbError,
    },
    QueueError {
        queue: String,
        error: String,
    },
    QueueCreated {
        queue: String,
    },
    AttemptFailed {
        operation: Operation,
        attempt: u32,
        max_attempts: u32,
        severity: FailureSeverity,
        error: HmbError,
        payload: Option<Vec<Value>>,
        retry_in: Option<Duration>,
    },
    Closed {
        sid: String,
        reason: CloseReason,
    },
    QueryFailed {
        endpoint: String,
        error: HmbError,
    },
}

/// Observer that stores every event. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ObservedEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObservedEvent> {
        self.lock().clone()
    }

    /// Severity of every failed attempt, in order.
    pub fn failure_severities(&self) -> Vec<FailureSeverity> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::AttemptFailed { severity, .. } => Some(*severity),
                _ => None,
            })
            .collect()
    }

    /// Requested delay after every failed attempt, in order.
    pub fn retry_delays(&self) -> Vec<Option<Duration>> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::AttemptFailed { retry_in, .. } => Some(*retry_in),
                _ => None,
            })
            .collect()
    }

    pub fn close_reasons(&self) -> Vec<CloseReason> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::Closed { reason, .. } => Some(*reason),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ObservedEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, event: ObservedEvent) {
        self.lock().push(event);
    }
}

impl SessionObserver for RecordingObserver {
    fn session_opened(&self, ack: &Ack, _config: &SessionConfig) {
        self.record(ObservedEvent::Opened {
            sid: ack.sid.clone(),
            cid: ack.cid.clone(),
        });
    }

    fn open_failed(&self, _url: &str, error: &HmbError) {
        self.record(ObservedEvent::OpenFailed {
            error: error.clone(),
        });
    }

    fn queue_error(&self, queue: &str, error: &str) {
        self.record(ObservedEvent::QueueError {
            queue: queue.to_string(),
            error: error.to_string(),
        });
    }

    fn queue_created(&self, queue: &str) {
        self.record(ObservedEvent::QueueCreated {
            queue: queue.to_string(),
        });
    }

    fn attempt_failed(&self, failure: &AttemptFailure<'_>) {
        self.record(ObservedEvent::AttemptFailed {
            operation: failure.operation,
            attempt: failure.attempt,
            max_attempts: failure.max_attempts,
            severity: failure.severity,
            error: failure.error.clone(),
            payload: failure.payload.map(<[Value]>::to_vec),
            retry_in: failure.retry_in,
        });
    }

    fn session_closed(&self, sid: &str, reason: CloseReason) {
        self.record(ObservedEvent::Closed {
            sid: sid.to_string(),
            reason,
        });
    }

    fn query_failed(&self, endpoint: &str, error: &HmbError) {
        self.record(ObservedEvent::QueryFailed {
            endpoint: endpoint.to_string(),
            error: error.clone(),
        });
    }
}
