use std::fmt;
use std::time::Duration;

use serde_json::Value;

use crate::config::SessionConfig;
use crate::errors::HmbError;
use crate::models::Ack;

/// Protocol operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Send,
    Recv,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Send => "send",
            Self::Recv => "recv",
        })
    }
}

/// How loudly a failed attempt should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FailureSeverity {
    /// First attempt failed; retrying immediately.
    Info,
    /// A later attempt failed; retrying after the retry wait.
    Warning,
    /// The last attempt failed; giving up.
    Error,
}

/// Why a session moved to the closed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// The last received message was EOF.
    CaughtUp,
    /// An aggregate receive ran out of time.
    TimedOut,
    /// An operation failed.
    Failure,
    /// The wire format was switched.
    FormatChanged,
    /// The caller closed the session.
    Client,
}

/// Details of one failed attempt inside the retry controller.
#[derive(Debug, Clone, Copy)]
pub struct AttemptFailure<'a> {
    pub operation: Operation,
    /// 1-based attempt index.
    pub attempt: u32,
    pub max_attempts: u32,
    pub severity: FailureSeverity,
    pub error: &'a HmbError,
    /// Request payload, attached from the second attempt on.
    pub payload: Option<&'a [Value]>,
    /// Delay before the next attempt; `None` when giving up.
    pub retry_in: Option<Duration>,
}

/// Receives every loggable session event.
///
/// Injected into a session at construction; all methods default to no-ops
/// so implementations only override what they care about.
pub trait SessionObserver: Send + Sync {
    fn session_opened(&self, _ack: &Ack, _config: &SessionConfig) {}

    fn open_failed(&self, _url: &str, _error: &HmbError) {}

    /// The server reported an error for a subscribed queue on open.
    fn queue_error(&self, _queue: &str, _error: &str) {}

    /// A missing queue was created with a TOUCH message.
    fn queue_created(&self, _queue: &str) {}

    fn attempt_failed(&self, _failure: &AttemptFailure<'_>) {}

    fn session_closed(&self, _sid: &str, _reason: CloseReason) {}

    fn query_failed(&self, _endpoint: &str, _error: &HmbError) {}
}

/// Observer that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}
