//! The default observer emits one `tracing` event per session event, at the
//! level matching its severity.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hmb_client::{HmbSession, Message, QueueSubscription, SessionConfig};
use hmb_test_fixtures::{ack, text_response, ScriptedTransport};
use serde_json::json;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Debug, Clone)]
struct Captured {
    level: Level,
    fields: BTreeMap<String, String>,
}

impl Captured {
    fn event(&self) -> &str {
        self.fields.get("event").map_or("", String::as_str)
    }
}

#[derive(Default)]
struct FieldVisitor {
    fields: BTreeMap<String, String>,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.fields.insert(field.name().to_string(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields.insert(field.name().to_string(), value.to_string());
    }
}

#[derive(Clone, Default)]
struct CaptureLayer {
    events: Arc<Mutex<Vec<Captured>>>,
}

impl CaptureLayer {
    fn events(&self) -> Vec<Captured> {
        self.events.lock().unwrap().clone()
    }

    fn levels_of(&self, name: &str) -> Vec<Level> {
        self.events()
            .into_iter()
            .filter(|e| e.event() == name)
            .map(|e| e.level)
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events.lock().unwrap().push(Captured {
            level: *event.metadata().level(),
            fields: visitor.fields,
        });
    }
}

fn run_captured(f: impl FnOnce()) -> CaptureLayer {
    let layer = CaptureLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(subscriber, f);
    layer
}

#[test]
fn attempt_failures_follow_severity_levels() {
    let transport = ScriptedTransport::new();
    let config = SessionConfig::new().with_queue("Q", QueueSubscription::starting_at(-1));
    let mut session = HmbSession::new("http://bus.test", config, transport.clone())
        .with_retry_wait(Duration::from_millis(1));
    transport.push_json(200, ack("S1", "C1", json!({})));
    transport.push(text_response(503, "busy"));

    let capture = run_captured(|| {
        let outcome = session.send(&Message::new("ALERT").to_queue("Q"), 2);
        assert_eq!(outcome.attempts, 3);
    });

    assert_eq!(
        capture.levels_of("attempt_failed"),
        vec![Level::INFO, Level::WARN, Level::ERROR]
    );
    assert_eq!(capture.levels_of("session_opened"), vec![Level::INFO]);
    assert_eq!(capture.levels_of("session_closed"), vec![Level::DEBUG]);
    assert_eq!(capture.levels_of("open_failed"), vec![Level::WARN, Level::WARN]);

    let failures: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.event() == "attempt_failed")
        .collect();
    assert_eq!(failures[0].fields["operation"], "send");
    assert_eq!(failures[0].fields["attempt"], "1");
    assert!(!failures[0].fields.contains_key("payload"));
    assert!(failures[2].fields["payload"].contains("\"ALERT\""));
}

#[test]
fn queue_creation_and_query_failures_are_reported() {
    let transport = ScriptedTransport::new();
    let config = SessionConfig::new().with_queue("Q", QueueSubscription::starting_at(-1));
    let mut session = HmbSession::new("http://bus.test", config, transport.clone())
        .with_autocreate_queues(true);
    transport.push_json(
        200,
        ack("S1", "C1", json!({ "Q": { "seq": null, "error": "queue not found" } })),
    );
    transport.push(text_response(200, ""));
    transport.push(text_response(503, "maintenance"));

    let capture = run_captured(|| {
        session.open().unwrap();
        assert_eq!(session.status(), None);
    });

    assert_eq!(capture.levels_of("queue_error"), vec![Level::WARN]);
    assert_eq!(capture.levels_of("queue_created"), vec![Level::WARN]);
    assert_eq!(capture.levels_of("query_failed"), vec![Level::ERROR]);
    let created = capture
        .events()
        .into_iter()
        .find(|e| e.event() == "queue_created")
        .unwrap();
    assert_eq!(created.fields["queue"], "Q");
}
