//! Per-entry outcomes

use std::error::Error as StdError;
use std::io;
use std::time::Duration;

use crate::http::{RequestEntry, ResponseSummary};

/// Why a single entry could not be delivered.
///
/// Only transport-level problems land here. A response with any status code
/// is a delivery.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestFailure {
    /// The endpoint or method could not form a request; nothing was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("TLS handshake failed: {0}")]
    Handshake(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("I/O error: {0}")]
    Io(String),
}

impl RequestFailure {
    /// Classify an error raised by the HTTP client or while reading a body.
    ///
    /// The cause chain is searched for a TLS error or a timed out socket
    /// before falling back on whether the connection was ever established.
    /// `timeout` is the bound reported if a socket timed out.
    pub(crate) fn classify(
        err: &(dyn StdError + 'static),
        is_connect: bool,
        timeout: Duration,
    ) -> Self {
        let mut cause = Some(err);
        while let Some(current) = cause {
            if let Some(tls) = current.downcast_ref::<rustls::Error>() {
                return RequestFailure::Handshake(tls.to_string());
            }
            if let Some(io_err) = current.downcast_ref::<io::Error>() {
                if io_err.kind() == io::ErrorKind::TimedOut {
                    return RequestFailure::Timeout(timeout);
                }
                // io::Error::source skips the wrapped error itself
                cause = io_err
                    .get_ref()
                    .map(|inner| inner as &(dyn StdError + 'static));
                continue;
            }
            cause = current.source();
        }

        if is_connect {
            RequestFailure::Connect(describe(err))
        } else {
            RequestFailure::Io(describe(err))
        }
    }

    /// Short label for logs and callbacks.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RequestFailure::InvalidRequest(_) => "invalid-request",
            RequestFailure::Connect(_) => "connect",
            RequestFailure::Handshake(_) => "handshake",
            RequestFailure::Timeout(_) => "timeout",
            RequestFailure::Io(_) => "io",
        }
    }
}

fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut text = err.to_string();
    let mut cause = err.source();
    while let Some(current) = cause {
        text.push_str(": ");
        text.push_str(&current.to_string());
        cause = current.source();
    }
    text
}

/// A dispatched entry together with what happened to it.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    entry: RequestEntry,
    result: Result<ResponseSummary, RequestFailure>,
}

impl RequestOutcome {
    pub(crate) fn success(entry: RequestEntry, response: ResponseSummary) -> Self {
        Self {
            entry,
            result: Ok(response),
        }
    }

    pub(crate) fn failure(entry: RequestEntry, failure: RequestFailure) -> Self {
        Self {
            entry,
            result: Err(failure),
        }
    }

    #[must_use]
    pub fn entry(&self) -> &RequestEntry {
        &self.entry
    }

    #[must_use]
    pub fn result(&self) -> &Result<ResponseSummary, RequestFailure> {
        &self.result
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub(crate) fn into_parts(self) -> (RequestEntry, Result<ResponseSummary, RequestFailure>) {
        (self.entry, self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("client error (Connect)")]
    struct Wrapper(#[source] Box<dyn StdError + Send + Sync>);

    #[test]
    fn tls_error_inside_io_error_is_a_handshake_failure() {
        let io_err = io::Error::new(
            io::ErrorKind::InvalidData,
            rustls::Error::InvalidCertificate(rustls::CertificateError::UnknownIssuer),
        );
        let err = Wrapper(Box::new(io_err));

        let failure = RequestFailure::classify(&err, true, Duration::from_secs(1));
        assert!(matches!(failure, RequestFailure::Handshake(_)));
    }

    #[test]
    fn timed_out_socket_is_a_timeout() {
        let err = Wrapper(Box::new(io::Error::new(io::ErrorKind::TimedOut, "connect timeout")));
        let failure = RequestFailure::classify(&err, true, Duration::from_secs(3));
        assert_eq!(failure, RequestFailure::Timeout(Duration::from_secs(3)));
    }

    #[test]
    fn refused_connection_is_a_connect_failure_with_cause() {
        let err = Wrapper(Box::new(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "connection refused",
        )));
        let failure = RequestFailure::classify(&err, true, Duration::from_secs(1));
        match failure {
            RequestFailure::Connect(text) => assert!(text.contains("connection refused")),
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn unestablished_flag_decides_io_vs_connect() {
        let err = Wrapper(Box::new(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe")));
        let failure = RequestFailure::classify(&err, false, Duration::from_secs(1));
        assert_eq!(failure.kind(), "io");
    }
}
