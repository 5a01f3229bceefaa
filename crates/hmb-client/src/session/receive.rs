use std::time::{Duration, Instant};

use hmb_core::traits::{CloseReason, Operation, Transport};
use hmb_core::{Attempted, CollectEnd, Collected, HmbError, HmbResult, Message};

use super::HmbSession;
use crate::codec;
use crate::transport::protocol;

impl<T: Transport> HmbSession<T> {
    /// Poll the server once, retrying failures up to `retries` more times.
    ///
    /// Blocks until data or a heartbeat arrives when any subscription has
    /// `keep` set. HEARTBEAT messages are dropped from the result; a trailing
    /// EOF is kept so callers can see the stream is caught up (the session
    /// is closed in that case).
    pub fn recv(&mut self, retries: u32) -> Attempted<Vec<Message>> {
        let Attempted {
            value,
            attempts,
            error,
        } = self.with_retries(Operation::Recv, retries, None, Self::poll_once);
        let messages = value
            .unwrap_or_default()
            .into_iter()
            .filter(|m| !m.is_heartbeat())
            .collect();
        Attempted {
            value: messages,
            attempts,
            error,
        }
    }

    /// Keep polling until the stream is caught up (EOF) or `timeout` has
    /// elapsed. Meant for catching up on a backlog, not for live streaming.
    ///
    /// Empty polls do not end the loop. On timeout the session is closed.
    /// Without a timeout (or with a zero one) this only returns once an EOF
    /// arrives.
    pub fn recv_all(&mut self, retries: u32, timeout: Option<Duration>) -> Collected {
        let timeout = timeout.filter(|limit| !limit.is_zero());
        let started = Instant::now();
        let mut messages = Vec::new();
        let mut polls = 0;
        let mut last_error = None;

        loop {
            let (mut batch, error) = self.recv(retries).into_parts();
            polls += 1;
            if error.is_some() {
                last_error = error;
            }

            if batch.last().is_some_and(Message::is_eof) {
                batch.pop();
                messages.append(&mut batch);
                return Collected {
                    messages,
                    end: CollectEnd::CaughtUp,
                    polls,
                    last_error,
                };
            }
            messages.append(&mut batch);

            if timeout.is_some_and(|limit| started.elapsed() > limit) {
                self.close_with(CloseReason::TimedOut);
                return Collected {
                    messages,
                    end: CollectEnd::TimedOut,
                    polls,
                    last_error,
                };
            }
        }
    }

    fn poll_once(&mut self) -> HmbResult<Vec<Message>> {
        let url = match self.state.sid() {
            Some(sid) => protocol::recv_url(&self.url, sid, self.state.offset()),
            None => return Err(HmbError::transport("session is not open")),
        };
        let response = protocol::check_status(self.transport.get(&url)?)?;
        let messages = codec::decode_messages(self.format, &response.body)?;

        self.track_positions(&messages);

        // An empty batch carries no end-of-stream information.
        if messages.last().is_some_and(Message::is_eof) {
            self.close_with(CloseReason::CaughtUp);
        }
        Ok(messages)
    }

    /// Advance cursors and the offset for every positioned message on a
    /// subscribed queue.
    fn track_positions(&mut self, messages: &[Message]) {
        for (queue, seq) in messages.iter().filter_map(Message::position) {
            if self.config.subscription(queue).is_none() {
                continue;
            }
            self.config.observe_seq(queue, seq);
            self.state.set_offset(queue, seq);
        }
    }
}
