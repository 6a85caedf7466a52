//! Batch results

use crate::http::{RequestEntry, ResponseSummary};

use super::outcome::{RequestFailure, RequestOutcome};

/// An entry that reached the server, with the response it got.
#[derive(Debug, Clone)]
pub struct SuccessfulRequest {
    pub entry: RequestEntry,
    pub response: ResponseSummary,
}

/// An entry that could not be delivered.
#[derive(Debug, Clone)]
pub struct FailedRequest {
    pub entry: RequestEntry,
    pub failure: RequestFailure,
}

/// Partition of a dispatched batch into delivered and failed entries.
///
/// Both lists are in completion order. The value is assembled by the batch
/// coordinator alone and is read-only once it reaches the caller.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    successful: Vec<SuccessfulRequest>,
    failed: Vec<FailedRequest>,
}

impl BatchResult {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            successful: Vec::with_capacity(capacity),
            failed: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, outcome: RequestOutcome) {
        match outcome.into_parts() {
            (entry, Ok(response)) => self.successful.push(SuccessfulRequest { entry, response }),
            (entry, Err(failure)) => self.failed.push(FailedRequest { entry, failure }),
        }
    }

    #[must_use]
    pub fn successful_requests(&self) -> &[SuccessfulRequest] {
        &self.successful
    }

    #[must_use]
    pub fn failed_requests(&self) -> &[FailedRequest] {
        &self.failed
    }

    /// Number of entries with an outcome.
    #[must_use]
    pub fn len(&self) -> usize {
        self.successful.len() + self.failed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when no entry failed. An empty batch counts as all succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn into_parts(self) -> (Vec<SuccessfulRequest>, Vec<FailedRequest>) {
        (self.successful, self.failed)
    }
}
