use std::time::Duration;

use hmb_core::traits::{AttemptFailure, CloseReason, FailureSeverity, Operation, Transport};
use hmb_core::{Attempted, HmbResult};
use serde_json::Value;

use super::HmbSession;

impl<T: Transport> HmbSession<T> {
    /// Run `attempt` up to `retries + 1` times, opening the session first
    /// whenever it is closed.
    ///
    /// Every failure closes the session. The first failure retries at once,
    /// later ones sleep for the retry wait, and the last one gives up and
    /// hands back the error.
    pub(crate) fn with_retries<R, F>(
        &mut self,
        operation: Operation,
        retries: u32,
        payload: Option<&[Value]>,
        mut attempt: F,
    ) -> Attempted<Option<R>>
    where
        F: FnMut(&mut Self) -> HmbResult<R>,
    {
        let max_attempts = retries.saturating_add(1);
        let mut index = 0;
        loop {
            index += 1;
            let result = match self.ensure_open() {
                Ok(()) => attempt(self),
                Err(error) => Err(error),
            };
            let error = match result {
                Ok(value) => return Attempted::succeeded(Some(value), index),
                Err(error) => error,
            };

            self.close_with(CloseReason::Failure);

            let severity = if index >= max_attempts {
                FailureSeverity::Error
            } else if index == 1 {
                FailureSeverity::Info
            } else {
                FailureSeverity::Warning
            };
            let retry_in = match severity {
                FailureSeverity::Info => Some(Duration::ZERO),
                FailureSeverity::Warning => Some(self.retry_wait),
                FailureSeverity::Error => None,
            };

            self.observer.attempt_failed(&AttemptFailure {
                operation,
                attempt: index,
                max_attempts,
                severity,
                error: &error,
                payload: payload.filter(|_| severity != FailureSeverity::Info),
                retry_in,
            });

            match retry_in {
                None => return Attempted::failed(None, index, error),
                Some(wait) if !wait.is_zero() => std::thread::sleep(wait),
                Some(_) => {}
            }
        }
    }
}
