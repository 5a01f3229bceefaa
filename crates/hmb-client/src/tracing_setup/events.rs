//! Structured log events for session activity.
//!
//! Each observer callback emits one `tracing` event with an `event` field.

use hmb_core::traits::{AttemptFailure, CloseReason, FailureSeverity, SessionObserver};
use hmb_core::{Ack, HmbError, SessionConfig};
use serde_json::Value;

/// Observer that reports session events through `tracing`.
///
/// Failed attempts are logged at info, warn, or error level following their
/// [`FailureSeverity`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SessionObserver for TracingObserver {
    fn session_opened(&self, ack: &Ack, config: &SessionConfig) {
        tracing::info!(
            event = "session_opened",
            sid = %ack.sid,
            cid = %ack.cid,
            "hmb session opened"
        );
        tracing::debug!(event = "session_parameters", params = ?config, "hmb session parameters");
    }

    fn open_failed(&self, url: &str, error: &HmbError) {
        if let HmbError::ServiceUnavailable { .. } = error {
            tracing::warn!(
                event = "open_failed",
                url = %url,
                error = %error,
                "hmb server is down for maintenance or over capacity"
            );
        } else {
            tracing::warn!(
                event = "open_failed",
                url = %url,
                error = %error,
                "connection to hmb message bus failed"
            );
        }
    }

    fn queue_error(&self, queue: &str, error: &str) {
        tracing::warn!(
            event = "queue_error",
            queue = %queue,
            error = %error,
            "hmb server reported an error for queue"
        );
    }

    fn queue_created(&self, queue: &str) {
        tracing::warn!(
            event = "queue_created",
            queue = %queue,
            "created hmb queue by sending a TOUCH message"
        );
    }

    fn attempt_failed(&self, failure: &AttemptFailure<'_>) {
        let operation = failure.operation.to_string();
        match failure.severity {
            FailureSeverity::Info => tracing::info!(
                event = "attempt_failed",
                operation = %operation,
                attempt = failure.attempt,
                max_attempts = failure.max_attempts,
                error = %failure.error,
                "hmb connection lost, retrying"
            ),
            FailureSeverity::Warning => tracing::warn!(
                event = "attempt_failed",
                operation = %operation,
                attempt = failure.attempt,
                max_attempts = failure.max_attempts,
                error = %failure.error,
                payload = %render_payload(failure.payload),
                retry_in_secs = failure.retry_in.map_or(0.0, |d| d.as_secs_f64()),
                "hmb connection lost, retrying after wait"
            ),
            FailureSeverity::Error => tracing::error!(
                event = "attempt_failed",
                operation = %operation,
                attempt = failure.attempt,
                max_attempts = failure.max_attempts,
                error = %failure.error,
                payload = %render_payload(failure.payload),
                "hmb operation failed, giving up"
            ),
        }
    }

    fn session_closed(&self, sid: &str, reason: CloseReason) {
        tracing::debug!(
            event = "session_closed",
            sid = %sid,
            reason = ?reason,
            "hmb session closed"
        );
    }

    fn query_failed(&self, endpoint: &str, error: &HmbError) {
        tracing::error!(
            event = "query_failed",
            endpoint = %endpoint,
            error = %error,
            "error getting {endpoint} from hmb server"
        );
    }
}

fn render_payload(payload: Option<&[Value]>) -> String {
    payload
        .and_then(|p| serde_json::to_string(p).ok())
        .unwrap_or_default()
}
