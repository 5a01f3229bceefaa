use super::Message;
use crate::errors::{HmbError, HmbResult};

/// Best-effort result of a retried operation.
///
/// `value` is always usable (empty on failure); `error` holds the failure of
/// the final attempt when every attempt failed.
#[must_use]
#[derive(Debug)]
pub struct Attempted<T> {
    pub value: T,
    /// Attempts made, including the successful one.
    pub attempts: u32,
    pub error: Option<HmbError>,
}

impl<T> Attempted<T> {
    pub fn succeeded(value: T, attempts: u32) -> Self {
        Self {
            value,
            attempts,
            error: None,
        }
    }

    pub fn failed(value: T, attempts: u32, error: HmbError) -> Self {
        Self {
            value,
            attempts,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn into_parts(self) -> (T, Option<HmbError>) {
        (self.value, self.error)
    }

    /// Hard-failure view for callers that do not want best-effort semantics.
    pub fn into_result(self) -> HmbResult<T> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.value),
        }
    }
}

/// Why an aggregate receive stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectEnd {
    /// A poll ended with EOF.
    CaughtUp,
    /// The timeout elapsed first; the session was closed.
    TimedOut,
}

/// Result of an aggregate receive.
#[must_use]
#[derive(Debug)]
pub struct Collected {
    /// Messages in delivery order, without the EOF marker.
    pub messages: Vec<Message>,
    pub end: CollectEnd,
    pub polls: u32,
    /// Terminal error of the most recent poll that gave up, if any.
    pub last_error: Option<HmbError>,
}

impl Collected {
    pub fn caught_up(&self) -> bool {
        self.end == CollectEnd::CaughtUp
    }
}
