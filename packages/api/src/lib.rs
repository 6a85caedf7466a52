//! httpsink public API
//!
//! Batch HTTP(S) delivery for stream-processing sinks, with custom CA trust
//! and mutual TLS. Build a client once per sink, then dispatch batches:
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use httpsink::{ContentType, HttpSink, RequestEntry};
//!
//! # async fn run() -> Result<(), httpsink::Error> {
//! let client = HttpSink::builder()
//!     .trusted_cert("/etc/sink/ca.crt")
//!     .client_cert("/etc/sink/client.crt", "/etc/sink/client.key")
//!     .content_type(ContentType::ApplicationJson)
//!     .request_timeout(Duration::from_secs(5))
//!     .build()?;
//!
//! let result = client
//!     .dispatch(vec![RequestEntry::post(r#"{"id":1}"#)], "https://ingest.example.com/events")
//!     .await?;
//! assert!(result.all_succeeded());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

use std::collections::HashMap;
use std::hash::BuildHasher;

pub mod builder;

pub use builder::{ContentType, SinkClientBuilder, header};

// Re-export important types from client package
pub use httpsink_client::{
    BatchHandle, BatchResult, ClientStatsSnapshot, ConfigurationError, CredentialError, Error,
    FailedRequest, KeyEncoding, Kind, LoggingCallback, NoopCallback, RequestCallback,
    RequestEntry, RequestFailure, RequestOutcome, ResponseSummary, SinkClientConfig,
    SinkHttpClient, StorePassword, SuccessfulRequest,
};

/// Main entry point providing static constructors
pub struct HttpSink;

impl HttpSink {
    /// Start a fluent builder with default options.
    #[must_use]
    pub fn builder() -> SinkClientBuilder {
        SinkClientBuilder::new()
    }

    /// Build a client directly from a configuration value.
    ///
    /// # Errors
    ///
    /// Any construction error of [`SinkHttpClient::new`].
    pub fn with_config(config: SinkClientConfig) -> Result<SinkHttpClient, Error> {
        SinkHttpClient::new(config)
    }

    /// Build a client from `gid.connector.http.*` connector properties.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unparseable values, otherwise any
    /// construction error of [`SinkHttpClient::new`].
    pub fn from_properties<S: BuildHasher>(
        properties: &HashMap<String, String, S>,
    ) -> Result<SinkHttpClient, Error> {
        SinkClientBuilder::from_properties(properties)?.build()
    }
}

/// Start a fluent builder with default options.
///
/// Shorthand for `HttpSink::builder()`
#[must_use]
pub fn builder() -> SinkClientBuilder {
    SinkClientBuilder::new()
}
