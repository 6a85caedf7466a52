//! Client statistics

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by every batch a client dispatches.
#[derive(Debug, Default)]
pub struct ClientStats {
    /// Batches handed to the dispatcher
    pub batches_dispatched: AtomicU64,
    /// Batches that resolved with a result
    pub batches_completed: AtomicU64,
    /// Entries that reached the server, any status
    pub requests_successful: AtomicU64,
    /// Entries that failed below HTTP
    pub requests_failed: AtomicU64,
    /// Request body bytes handed to the transport
    pub bytes_sent: AtomicU64,
    /// Response body bytes read
    pub bytes_received: AtomicU64,
}

/// Point-in-time copy of [`ClientStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientStatsSnapshot {
    pub batches_dispatched: u64,
    pub batches_completed: u64,
    pub requests_successful: u64,
    pub requests_failed: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

impl ClientStatsSnapshot {
    /// Entries with an outcome.
    #[must_use]
    pub fn requests_total(&self) -> u64 {
        self.requests_successful + self.requests_failed
    }

    /// Share of delivered entries, 1.0 when nothing was dispatched.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        let total = self.requests_total();
        if total == 0 {
            1.0
        } else {
            self.requests_successful as f64 / total as f64
        }
    }
}

impl ClientStats {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_batch(&self) {
        self.batches_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch_completed(&self) {
        self.batches_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self, sent: usize, received: usize) {
        self.requests_successful.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(sent as u64, Ordering::Relaxed);
        self.bytes_received.fetch_add(received as u64, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Create a snapshot of current statistics
    #[must_use]
    pub fn snapshot(&self) -> ClientStatsSnapshot {
        ClientStatsSnapshot {
            batches_dispatched: self.batches_dispatched.load(Ordering::Relaxed),
            batches_completed: self.batches_completed.load(Ordering::Relaxed),
            requests_successful: self.requests_successful.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.batches_dispatched.store(0, Ordering::Relaxed);
        self.batches_completed.store(0, Ordering::Relaxed);
        self.requests_successful.store(0, Ordering::Relaxed);
        self.requests_failed.store(0, Ordering::Relaxed);
        self.bytes_sent.store(0, Ordering::Relaxed);
        self.bytes_received.store(0, Ordering::Relaxed);
    }
}
