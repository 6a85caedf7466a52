//! Per-request completion hooks

use std::fmt;

use crate::dispatch::RequestOutcome;

/// Invoked once for every entry of every batch when its outcome is known.
///
/// Calls come from the batch coordinator, one at a time per batch, before
/// the outcome is recorded in the [`BatchResult`](crate::dispatch::BatchResult).
/// Implementations should return quickly.
pub trait RequestCallback: Send + Sync + fmt::Debug {
    fn on_complete(&self, endpoint: &str, outcome: &RequestOutcome);
}

/// Does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCallback;

impl RequestCallback for NoopCallback {
    fn on_complete(&self, _endpoint: &str, _outcome: &RequestOutcome) {}
}

/// Logs each outcome through `tracing`.
///
/// Deliveries are logged at debug, failures at warn. Bodies are never
/// logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingCallback;

impl RequestCallback for LoggingCallback {
    fn on_complete(&self, endpoint: &str, outcome: &RequestOutcome) {
        let method = outcome.entry().method();
        match outcome.result() {
            Ok(response) => tracing::debug!(
                endpoint,
                method,
                status = response.status().as_u16(),
                response_bytes = response.body().len(),
                "Request delivered"
            ),
            Err(failure) => tracing::warn!(
                endpoint,
                method,
                failure = failure.kind(),
                "Request failed: {}",
                failure
            ),
        }
    }
}
