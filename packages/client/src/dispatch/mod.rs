//! Batch dispatch
//!
//! [`RequestDispatcher`] fans a batch out over the shared transport and
//! resolves a [`BatchHandle`] with the [`BatchResult`] once every entry has
//! an outcome.

mod batch;
mod dispatcher;
mod handle;
mod outcome;
pub(crate) mod pool;

pub use batch::{BatchResult, FailedRequest, SuccessfulRequest};
pub use dispatcher::{DispatchSettings, RequestDispatcher};
pub use handle::BatchHandle;
pub use outcome::{RequestFailure, RequestOutcome};
