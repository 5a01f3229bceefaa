//! HMB session: lazily opened connection state, per-queue cursors, and the
//! send/receive operations built on top of them.

mod open;
mod queries;
mod receive;
mod retry;
mod send;
mod state;

use std::sync::Arc;
use std::time::Duration;

use hmb_core::config::defaults;
use hmb_core::traits::{CloseReason, SessionObserver, Transport};
use hmb_core::{SessionConfig, WireFormat};

pub use queries::QueryEndpoint;
pub use state::SessionState;

use crate::tracing_setup::TracingObserver;

/// A client session with one HMB server.
///
/// The session owns its [`SessionConfig`] for its whole life; cursors and the
/// client id in it are updated as the server reports them. The server-side
/// session id is recreated on every reopen. Operations take `&mut self`, so
/// calls on one session are serialized.
pub struct HmbSession<T: Transport> {
    url: String,
    config: SessionConfig,
    format: WireFormat,
    retry_wait: Duration,
    autocreate_queues: bool,
    state: SessionState,
    transport: T,
    observer: Arc<dyn SessionObserver>,
}

impl<T: Transport> HmbSession<T> {
    /// Create a closed session; it opens on first use.
    pub fn new(url: impl Into<String>, config: SessionConfig, transport: T) -> Self {
        Self {
            url: url.into(),
            config,
            format: WireFormat::default(),
            retry_wait: Duration::from_secs(defaults::DEFAULT_RETRY_WAIT_SECS),
            autocreate_queues: defaults::DEFAULT_AUTOCREATE_QUEUES,
            state: SessionState::Closed,
            transport,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: impl SessionObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    pub fn with_format(mut self, format: WireFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_retry_wait(mut self, retry_wait: Duration) -> Self {
        self.retry_wait = retry_wait;
        self
    }

    pub fn with_autocreate_queues(mut self, autocreate: bool) -> Self {
        self.autocreate_queues = autocreate;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn format(&self) -> WireFormat {
        self.format
    }

    pub fn retry_wait(&self) -> Duration {
        self.retry_wait
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.state.sid()
    }

    pub fn client_id(&self) -> Option<&str> {
        self.config.client_id.as_deref()
    }

    /// Resume cursor for `queue`.
    pub fn cursor(&self, queue: &str) -> Option<i64> {
        self.config.cursor(queue)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Switch the wire format. Returns `false` (and does nothing) when the
    /// format is unchanged; otherwise the session is closed so the next
    /// operation reopens under the new format. Cursors are kept.
    pub fn set_format(&mut self, format: WireFormat) -> bool {
        if self.format == format {
            return false;
        }
        self.format = format;
        self.close_with(CloseReason::FormatChanged);
        true
    }

    /// Close the session client-side; the next operation reopens it.
    pub fn close(&mut self) {
        self.close_with(CloseReason::Client);
    }

    pub(crate) fn close_with(&mut self, reason: CloseReason) {
        if let Some(sid) = self.state.close() {
            self.observer.session_closed(&sid, reason);
        }
    }
}

#[cfg(feature = "http")]
impl HmbSession<crate::transport::ReqwestTransport> {
    /// Build a session over HTTP from a loaded configuration.
    pub fn from_config(config: hmb_core::HmbConfig) -> hmb_core::HmbResult<Self> {
        config.validate()?;
        let transport = crate::transport::ReqwestTransport::new(&config.transport)?;
        Ok(Self::new(config.client.url.clone(), config.session, transport)
            .with_format(config.client.format)
            .with_retry_wait(config.client.retry_wait())
            .with_autocreate_queues(config.client.autocreate_queues))
    }
}

impl<T: Transport> std::fmt::Debug for HmbSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmbSession")
            .field("url", &self.url)
            .field("format", &self.format)
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
