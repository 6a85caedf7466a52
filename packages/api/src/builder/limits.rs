//! Timeouts, concurrency and completion hooks

use std::sync::Arc;
use std::time::Duration;

use httpsink_client::{LoggingCallback, RequestCallback};

use crate::builder::core::SinkClientBuilder;

impl SinkClientBuilder {
    /// Bound on establishing a TCP connection.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Bound on a whole exchange, from connect to the last body byte.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Requests in flight at once, across all batches of the client.
    #[must_use]
    pub fn max_concurrent_requests(mut self, limit: usize) -> Self {
        self.config.max_concurrent_requests = limit;
        self
    }

    /// Threads of the owned runtime. Ignored when the client is built
    /// inside a Tokio runtime.
    #[must_use]
    pub fn worker_threads(mut self, threads: usize) -> Self {
        self.config.worker_threads = threads;
        self
    }

    /// Invoke `callback` for every completed entry.
    #[must_use]
    pub fn callback(mut self, callback: impl RequestCallback + 'static) -> Self {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Log every outcome through `tracing`.
    #[must_use]
    pub fn log_requests(self) -> Self {
        self.callback(LoggingCallback)
    }
}
