use hmb_core::constants::{OPEN_PATH, QUEUE_NOT_FOUND, SEQ_AFTER_TOUCH};
use hmb_core::traits::Transport;
use hmb_core::{Ack, HmbError, HmbResult};

use super::HmbSession;
use crate::codec;
use crate::transport::protocol;

impl<T: Transport> HmbSession<T> {
    /// Open a new server-side session with the current parameters.
    ///
    /// On success the session is open with an empty offset, the client id is
    /// taken from the acknowledgment, and queue cursors behind the server's
    /// next sequence are moved forward. On failure the session is closed.
    pub fn open(&mut self) -> HmbResult<Ack> {
        match self.try_open() {
            Ok(ack) => Ok(ack),
            Err(error) => {
                self.state.close();
                self.observer.open_failed(&self.url, &error);
                Err(error)
            }
        }
    }

    pub(crate) fn ensure_open(&mut self) -> HmbResult<()> {
        if self.state.is_open() {
            return Ok(());
        }
        self.open().map(drop)
    }

    fn try_open(&mut self) -> HmbResult<Ack> {
        let params = serde_json::to_value(&self.config)
            .map_err(|e| HmbError::encode(format!("session parameters: {e}")))?;
        let body = codec::encode_document(self.format, &params)?;
        let response = self.transport.post(
            &protocol::endpoint(&self.url, OPEN_PATH),
            self.format.content_type(),
            body,
        )?;
        let response = protocol::check_status(response)?;
        let ack: Ack = serde_json::from_value(codec::decode_document(self.format, &response.body)?)
            .map_err(|e| HmbError::decode(format!("invalid open acknowledgment: {e}")))?;

        self.state.open(ack.sid.clone());
        self.config.client_id = Some(ack.cid.clone());

        for (queue, info) in &ack.queues {
            if let Some(next_seq) = info.seq {
                self.config.adopt_next_seq(queue, next_seq);
            }
        }

        for (queue, info) in &ack.queues {
            let Some(error) = info.error.as_deref() else {
                continue;
            };
            self.observer.queue_error(queue, error);
            if error == QUEUE_NOT_FOUND
                && self.autocreate_queues
                && self.config.subscription(queue).is_some()
            {
                self.touch_queue(queue)?;
                self.config.set_cursor(queue, SEQ_AFTER_TOUCH);
                self.observer.queue_created(queue);
            }
        }

        self.observer.session_opened(&ack, &self.config);
        Ok(ack)
    }
}
