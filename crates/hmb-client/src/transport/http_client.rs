//! Blocking HTTP transport backed by reqwest.

use hmb_core::config::TransportConfig;
use hmb_core::{HmbError, HmbResult};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;

use super::{HttpResponse, Transport};

/// [`Transport`] over a pooled `reqwest::blocking::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> HmbResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .gzip(true)
            .build()
            .map_err(|e| HmbError::transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    fn execute(request: RequestBuilder) -> HmbResult<HttpResponse> {
        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                HmbError::transport(format!("request timed out: {e}"))
            } else {
                HmbError::transport(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .map_err(|e| HmbError::transport(format!("failed to read response body: {e}")))?
            .to_vec();

        Ok(HttpResponse {
            status,
            body,
            content_type,
        })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str) -> HmbResult<HttpResponse> {
        Self::execute(self.client.get(url))
    }

    fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> HmbResult<HttpResponse> {
        Self::execute(
            self.client
                .post(url)
                .header(CONTENT_TYPE, content_type)
                .body(body),
        )
    }
}
