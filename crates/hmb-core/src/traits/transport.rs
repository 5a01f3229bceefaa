use crate::errors::HmbResult;

/// A minimal blocking HTTP client.
///
/// Implementations handle the mechanics of making requests (TLS, pooling,
/// timeouts) and report connection-level failures as
/// [`HmbError::Transport`](crate::errors::HmbError::Transport). Status codes
/// are returned untouched; interpreting them is the caller's job.
pub trait Transport {
    fn get(&self, url: &str) -> HmbResult<HttpResponse>;

    fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> HmbResult<HttpResponse>;
}

/// A minimal HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
    /// Value of the `Content-Type` header, if present.
    pub content_type: Option<String>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, lossily decoded and trimmed.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).trim().to_string()
    }
}
