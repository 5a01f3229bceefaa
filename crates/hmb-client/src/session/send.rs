use hmb_core::traits::{Operation, Transport};
use hmb_core::{Attempted, HmbError, HmbResult, Message, MessageKind};
use serde_json::Value;

use super::HmbSession;
use crate::codec;
use crate::transport::protocol;

impl<T: Transport> HmbSession<T> {
    /// Send one message, retrying up to `retries` more times.
    pub fn send(&mut self, message: &Message, retries: u32) -> Attempted<()> {
        self.send_batch(std::slice::from_ref(message), retries)
    }

    /// Send several messages in one request.
    pub fn send_batch(&mut self, messages: &[Message], retries: u32) -> Attempted<()> {
        let documents = match codec::messages_to_documents(messages) {
            Ok(documents) => documents,
            Err(error) => return Attempted::failed((), 0, error),
        };
        let Attempted {
            attempts, error, ..
        } = self.with_retries(Operation::Send, retries, Some(documents.as_slice()), |session| {
            let body = codec::encode_batch(session.format, &documents)?;
            session.post_send(body)
        });
        Attempted {
            value: (),
            attempts,
            error,
        }
    }

    /// Build a message from its parts and send it. Every entry of `extra` is
    /// stored in the message under its own key.
    pub fn send_msg<I>(
        &mut self,
        kind: impl Into<MessageKind>,
        queue: &str,
        data: Value,
        topic: Option<&str>,
        extra: I,
        retries: u32,
    ) -> Attempted<()>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut message = Message::new(kind).to_queue(queue).with_data(data);
        if let Some(topic) = topic.filter(|t| !t.is_empty()) {
            message = message.with_topic(topic);
        }
        message.extra.extend(extra);
        self.send(&message, retries)
    }

    /// Create `queue` on the server with a zero-payload TOUCH over the
    /// current session. Single attempt.
    pub(crate) fn touch_queue(&self, queue: &str) -> HmbResult<()> {
        let body = codec::encode_messages(self.format, &[Message::touch(queue)])?;
        self.post_send(body)
    }

    fn post_send(&self, body: Vec<u8>) -> HmbResult<()> {
        let sid = self
            .state
            .sid()
            .ok_or_else(|| HmbError::transport("session is not open"))?;
        let response = self.transport.post(
            &protocol::send_url(&self.url, sid),
            self.format.content_type(),
            body,
        )?;
        protocol::check_status(response).map(drop)
    }
}
