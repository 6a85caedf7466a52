//! Caller-side handle for an in-flight batch

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use super::batch::BatchResult;
use crate::error::{self, Error};

/// Resolves to the [`BatchResult`] once every entry of the batch has an
/// outcome.
///
/// Dropping the handle, or calling [`BatchHandle::cancel`], tells the
/// coordinator to stop issuing requests for the batch. Requests already on
/// the wire are allowed to finish.
#[must_use = "a batch handle does nothing unless awaited"]
#[derive(Debug)]
pub struct BatchHandle {
    rx: oneshot::Receiver<BatchResult>,
}

impl BatchHandle {
    pub(crate) fn new(rx: oneshot::Receiver<BatchResult>) -> Self {
        Self { rx }
    }

    /// Stop the batch. Entries not yet issued are never sent.
    pub fn cancel(mut self) {
        self.rx.close();
    }

    /// Block the current thread until the batch resolves.
    ///
    /// For callers outside any async runtime. Panics if called from within
    /// an async execution context.
    ///
    /// # Errors
    ///
    /// Returns a dispatch error if the coordinator stopped without a result,
    /// which happens when the owning client's runtime is shut down.
    pub fn blocking_wait(self) -> Result<BatchResult, Error> {
        self.rx
            .blocking_recv()
            .map_err(|_| error::dispatch_abandoned())
    }
}

impl Future for BatchHandle {
    type Output = Result<BatchResult, Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.map_err(|_| error::dispatch_abandoned()))
    }
}
