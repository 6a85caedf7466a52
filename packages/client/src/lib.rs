//! # httpsink client
//!
//! Outbound HTTP(S) batch dispatch for stream-processing sinks.
//!
//! A [`SinkHttpClient`] is built once per sink from a [`SinkClientConfig`].
//! Construction loads every configured credential and assembles one TLS
//! context. Trust is either the platform roots, a custom CA bundle, a
//! PKCS#12 trust store, or accept-all for self-signed development servers.
//! An optional client identity comes from a certificate plus PEM or DER key,
//! or from a PKCS#12 key store.
//!
//! Each call to [`SinkHttpClient::dispatch`] sends a batch of
//! [`RequestEntry`] values concurrently and returns a [`BatchHandle`] that
//! resolves to a [`BatchResult`] splitting the batch into delivered and
//! failed entries.
//!
//! ```no_run
//! use httpsink_client::{RequestEntry, SinkClientConfig, SinkHttpClient};
//!
//! # async fn run() -> Result<(), httpsink_client::Error> {
//! let config = SinkClientConfig {
//!     server_trusted_cert: Some("/etc/sink/ca.crt".into()),
//!     ..SinkClientConfig::default()
//! };
//! let client = SinkHttpClient::new(config)?;
//!
//! let batch = vec![RequestEntry::post(r#"{"id":1}"#), RequestEntry::post(r#"{"id":2}"#)];
//! let result = client.dispatch(batch, "https://ingest.example.com/events").await?;
//! for failed in result.failed_requests() {
//!     eprintln!("{}: {}", failed.entry.method(), failed.failure);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod prelude;
pub mod tls;

pub use client::{
    ClientStats, ClientStatsSnapshot, LoggingCallback, NoopCallback, RequestCallback,
    SinkHttpClient,
};
pub use config::{ConfigurationError, SinkClientConfig, from_properties};
pub use dispatch::{
    BatchHandle, BatchResult, FailedRequest, RequestFailure, RequestOutcome, SuccessfulRequest,
};
pub use error::{Error, Kind, Result};
pub use http::{RequestEntry, ResponseSummary};
pub use tls::{CredentialError, KeyEncoding, StorePassword};
