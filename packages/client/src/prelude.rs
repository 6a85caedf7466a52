//! Common imports for sink code
//!
//! `use httpsink_client::prelude::*;` brings in the client, its
//! configuration, and the batch types.

pub use crate::client::{RequestCallback, SinkHttpClient};
pub use crate::config::SinkClientConfig;
pub use crate::dispatch::{BatchHandle, BatchResult, RequestFailure, RequestOutcome};
pub use crate::error::{Error, Result};
pub use crate::http::{RequestEntry, ResponseSummary};
pub use crate::tls::{KeyEncoding, StorePassword};

pub use ::http::StatusCode;
