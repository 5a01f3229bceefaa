//! Receiving: cursor tracking, offsets, heartbeats, EOF, and catch-up loops.

use std::time::Duration;

use hmb_client::{CollectEnd, HmbSession, MessageKind, QueueSubscription, SessionConfig, WireFormat};
use hmb_core::traits::CloseReason;
use hmb_test_fixtures::{
    ack, bson_response, json_batch, load_fixture_value, RecordingObserver, ScriptedTransport,
};
use proptest::prelude::*;
use serde_json::json;

const URL: &str = "http://bus.test";

// ─── Helpers ───────────────────────────────────────────────

fn open_session(
    start_seq: i64,
    server_seq: i64,
) -> (HmbSession<ScriptedTransport>, ScriptedTransport, RecordingObserver) {
    let transport = ScriptedTransport::new();
    let observer = RecordingObserver::new();
    let config = SessionConfig::new().with_queue("Q", QueueSubscription::starting_at(start_seq));
    let mut session = HmbSession::new(URL, config, transport.clone())
        .with_observer(observer.clone())
        .with_retry_wait(Duration::ZERO);
    transport.push_json(200, ack("S1", "C1", json!({ "Q": { "seq": server_seq } })));
    session.open().unwrap();
    (session, transport, observer)
}

fn data(seq: i64) -> serde_json::Value {
    json!({ "type": "DATA", "queue": "Q", "seq": seq, "data": { "n": seq } })
}

fn eof() -> serde_json::Value {
    json!({ "type": "EOF" })
}

fn heartbeat() -> serde_json::Value {
    json!({ "type": "HEARTBEAT" })
}

// ─── Single polls ──────────────────────────────────────────

#[test]
fn recv_returns_data_and_eof_then_closes() {
    let transport = ScriptedTransport::new();
    let observer = RecordingObserver::new();
    let config = SessionConfig::new().with_queue("Q", QueueSubscription::starting_at(-2));
    let mut session =
        HmbSession::new(URL, config, transport.clone()).with_observer(observer.clone());
    transport.push_json(200, load_fixture_value("hmb/ack_single_queue.json"));
    transport.push_json(200, load_fixture_value("hmb/recv_data_eof.json"));

    let outcome = session.recv(0);

    assert!(outcome.is_success());
    let messages = outcome.value;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].kind, MessageKind::Data);
    assert_eq!(messages[0].seq, Some(42));
    assert_eq!(messages[0].topic.as_deref(), Some("alerts"));
    assert_eq!(messages[0].data.as_ref().unwrap()["region"], "AEGEAN SEA");
    assert!(messages[1].is_eof());

    assert_eq!(session.cursor("Q"), Some(43));
    assert!(!session.is_open());
    assert_eq!(observer.close_reasons(), vec![CloseReason::CaughtUp]);
    assert_eq!(transport.urls(), vec!["http://bus.test/open", "http://bus.test/recv/S1"]);
}

#[test]
fn next_recv_carries_offset_of_last_message() {
    let (mut session, transport, _) = open_session(-1, 3);
    transport.push_json(200, json_batch(&[data(3), data(4), data(5)]));
    transport.push_json(200, json_batch(&[data(6)]));

    assert_eq!(session.recv(0).value.len(), 3);
    assert_eq!(session.state().offset(), "/Q/5");
    assert_eq!(session.recv(0).value.len(), 1);

    assert_eq!(
        transport.urls()[1..],
        ["http://bus.test/recv/S1", "http://bus.test/recv/S1/Q/5"]
    );
    assert_eq!(session.cursor("Q"), Some(7));
}

#[test]
fn lower_sequence_does_not_move_cursor_back() {
    let (mut session, transport, _) = open_session(-1, 10);
    transport.push_json(200, json_batch(&[data(10), data(4)]));

    let _ = session.recv(0);

    assert_eq!(session.cursor("Q"), Some(11));
    // The offset still follows the last message received.
    assert_eq!(session.state().offset(), "/Q/4");
}

#[test]
fn heartbeats_are_dropped_and_session_stays_open() {
    let (mut session, transport, _) = open_session(-1, 0);
    transport.push_json(200, load_fixture_value("hmb/recv_heartbeat.json"));

    let outcome = session.recv(0);

    assert!(outcome.is_success());
    assert!(outcome.value.is_empty());
    assert!(session.is_open());
    assert_eq!(session.state().offset(), "");
}

#[test]
fn empty_batch_keeps_session_open() {
    let (mut session, transport, observer) = open_session(-1, 0);
    transport.push_json(200, json!({}));

    let outcome = session.recv(0);

    assert!(outcome.is_success());
    assert!(outcome.value.is_empty());
    assert!(session.is_open());
    assert_eq!(session.cursor("Q"), Some(0));
    assert!(observer.close_reasons().is_empty());
}

#[test]
fn messages_on_unsubscribed_queues_do_not_touch_cursors() {
    let (mut session, transport, _) = open_session(-1, 0);
    transport.push_json(
        200,
        json_batch(&[json!({ "type": "DATA", "queue": "OTHER", "seq": 99 })]),
    );

    let outcome = session.recv(0);

    assert_eq!(outcome.value.len(), 1);
    assert_eq!(session.cursor("Q"), Some(0));
    assert_eq!(session.cursor("OTHER"), None);
    assert_eq!(session.state().offset(), "");
}

#[test]
fn failed_recv_returns_empty_batch_with_error() {
    let (mut session, transport, _) = open_session(-1, 0);
    transport.push_json(200, json!([1, 2]));

    let outcome = session.recv(0);

    assert!(outcome.value.is_empty());
    assert!(outcome.error.is_some());
    assert!(!session.is_open());
}

#[test]
fn recv_in_bson_mode_decodes_concatenated_documents() {
    let transport = ScriptedTransport::new();
    let config = SessionConfig::new().with_queue("Q", QueueSubscription::starting_at(-1));
    let mut session =
        HmbSession::new(URL, config, transport.clone()).with_format(WireFormat::Bson);
    transport.push(bson_response(200, &[ack("S1", "C1", json!({ "Q": { "seq": 1 } }))]));
    transport.push(bson_response(200, &[data(1), data(2), eof()]));

    let messages = session.recv(0).into_result().unwrap();

    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].seq, Some(2));
    assert_eq!(messages[1].data.as_ref().unwrap()["n"], 2);
    assert_eq!(session.cursor("Q"), Some(3));
}

// ─── Catch-up loop ─────────────────────────────────────────

#[test]
fn recv_all_collects_until_eof() {
    let (mut session, transport, _) = open_session(-1, 1);
    transport.push_json(200, json_batch(&[data(1)]));
    transport.push_json(200, json!({}));
    transport.push_json(200, json_batch(&[heartbeat()]));
    transport.push_json(200, json_batch(&[data(2), data(3), eof()]));

    let collected = session.recv_all(0, None);

    assert!(collected.caught_up());
    assert_eq!(collected.polls, 4);
    assert!(collected.last_error.is_none());
    let seqs: Vec<_> = collected.messages.iter().filter_map(|m| m.seq).collect();
    assert_eq!(seqs, vec![1, 2, 3]);
    assert!(collected.messages.iter().all(|m| !m.is_eof()));
    assert_eq!(session.cursor("Q"), Some(4));
    assert!(!session.is_open());
}

#[test]
fn recv_all_stops_and_closes_on_timeout() {
    let transport = ScriptedTransport::new().with_latency(Duration::from_millis(5));
    let observer = RecordingObserver::new();
    let config = SessionConfig::new().with_queue("Q", QueueSubscription::starting_at(-1));
    let mut session = HmbSession::new(URL, config, transport.clone())
        .with_observer(observer.clone())
        .with_retry_wait(Duration::ZERO);
    transport.push_json(200, ack("S1", "C1", json!({ "Q": { "seq": 0 } })));
    transport.push_json(200, json_batch(&[data(0)]));
    transport.push_json(200, json_batch(&[data(1)]));

    let collected = session.recv_all(0, Some(Duration::from_millis(1)));

    assert_eq!(collected.end, CollectEnd::TimedOut);
    assert_eq!(collected.polls, 1);
    assert_eq!(collected.messages.len(), 1);
    assert!(!session.is_open());
    assert_eq!(observer.close_reasons(), vec![CloseReason::TimedOut]);
    assert_eq!(transport.remaining(), 1);
}

#[test]
fn recv_all_with_zero_timeout_runs_until_eof() {
    let (mut session, transport, observer) = open_session(-1, 0);
    transport.push_json(200, json_batch(&[data(0)]));
    transport.push_json(200, json_batch(&[data(1), eof()]));

    let collected = session.recv_all(0, Some(Duration::ZERO));

    assert_eq!(collected.end, CollectEnd::CaughtUp);
    assert_eq!(collected.polls, 2);
    assert_eq!(collected.messages.len(), 2);
    assert_eq!(observer.close_reasons(), vec![CloseReason::CaughtUp]);
}

#[test]
fn recv_all_remembers_last_failure() {
    let (mut session, transport, _) = open_session(-1, 0);
    transport.push(hmb_test_fixtures::text_response(500, "oops"));
    transport.push_json(200, ack("S2", "C1", json!({})));
    transport.push_json(200, json_batch(&[eof()]));

    let collected = session.recv_all(0, None);

    assert!(collected.caught_up());
    assert_eq!(collected.polls, 2);
    assert!(collected.messages.is_empty());
    assert!(collected.last_error.is_some());
}

// ─── Properties ────────────────────────────────────────────

proptest! {
    #[test]
    fn cursor_is_one_past_highest_sequence_seen(
        start in -2i64..50,
        seqs in proptest::collection::vec(0i64..100, 1..20),
    ) {
        let (mut session, transport, _) = open_session(start, -1);
        let batch: Vec<_> = seqs.iter().copied().map(data).collect();
        transport.push_json(200, json_batch(&batch));

        let _ = session.recv(0);

        let highest = seqs.iter().copied().max().unwrap();
        prop_assert_eq!(session.cursor("Q"), Some(start.max(highest + 1)));
        let last = *seqs.last().unwrap();
        let expected_offset = format!("/Q/{last}");
        prop_assert_eq!(session.state().offset(), expected_offset.as_str());
    }
}
