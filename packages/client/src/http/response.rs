//! Response summaries recorded for successful entries

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

/// Status, headers and fully-read body of a server response.
///
/// Any response counts as delivered, including 4xx and 5xx statuses; judging
/// the status is left to the caller.
#[derive(Debug, Clone)]
pub struct ResponseSummary {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ResponseSummary {
    pub(crate) fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
