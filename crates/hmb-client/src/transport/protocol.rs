//! Endpoint layout and response status handling shared by every request.

use hmb_core::constants::{RECV_PATH, SEND_PATH};
use hmb_core::{HmbError, HmbResult};

use super::HttpResponse;

/// `{base}/{path}`, ignoring a trailing slash on `base`.
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{path}", base.trim_end_matches('/'))
}

pub fn send_url(base: &str, sid: &str) -> String {
    endpoint(base, &format!("{SEND_PATH}/{sid}"))
}

/// `offset` is empty or `/queue/seq`.
pub fn recv_url(base: &str, sid: &str, offset: &str) -> String {
    endpoint(base, &format!("{RECV_PATH}/{sid}{offset}"))
}

/// Map a response onto the status-code contract: 400 and 503 get their own
/// variants, any other non-2xx status is a transport failure.
pub fn check_status(response: HttpResponse) -> HmbResult<HttpResponse> {
    match response.status {
        400 => Err(HmbError::BadRequest {
            message: response.text(),
        }),
        503 => Err(HmbError::ServiceUnavailable {
            message: response.text(),
        }),
        _ if response.is_success() => Ok(response),
        status => Err(HmbError::transport(format!(
            "HTTP {status}: {}",
            response.text()
        ))),
    }
}
