//! Sink HTTP client
//!
//! Credential loading, TLS assembly and runtime selection all happen in
//! [`SinkHttpClient::new`]; a client that was constructed successfully only
//! ever fails per entry.

use std::collections::BTreeMap;
use std::sync::Arc;

use http::{HeaderMap, HeaderName, HeaderValue};

use super::callback::{NoopCallback, RequestCallback};
use super::stats::{ClientStats, ClientStatsSnapshot};
use crate::config::{ConfigurationError, SinkClientConfig, Validator, options};
use crate::dispatch::pool::WorkerPool;
use crate::dispatch::{BatchHandle, DispatchSettings, RequestDispatcher};
use crate::error::{self, Result};
use crate::http::RequestEntry;
use crate::tls::{IdentityPolicy, SecureTransportFactory, TransportConfig, TrustPolicy};

/// Outbound HTTP(S) client for one sink instance.
#[derive(Debug)]
pub struct SinkHttpClient {
    config: SinkClientConfig,
    transport: TransportConfig,
    dispatcher: RequestDispatcher,
    stats: Arc<ClientStats>,
}

impl SinkHttpClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for contradictory or incomplete
    /// options, a credential error naming the option and path of any file
    /// that cannot be loaded, a transport error when rustls rejects the
    /// loaded material, and a runtime error if the worker runtime cannot be
    /// started.
    pub fn new(config: SinkClientConfig) -> Result<Self> {
        Self::with_callback(config, Arc::new(NoopCallback))
    }

    /// Like [`SinkHttpClient::new`], invoking `callback` for each completed
    /// entry.
    ///
    /// # Errors
    ///
    /// See [`SinkHttpClient::new`].
    pub fn with_callback(
        config: SinkClientConfig,
        callback: Arc<dyn RequestCallback>,
    ) -> Result<Self> {
        config.validate().map_err(error::configuration)?;

        let factory = SecureTransportFactory::new();
        let trust = TrustPolicy::from_config(&config)?;
        let identity = IdentityPolicy::from_config(&config, factory.provider())?;
        let transport = factory.build(&trust, &identity)?;

        let headers = header_map(&config.headers).map_err(error::configuration)?;
        let pool = WorkerPool::ambient_or_owned(config.worker_threads)?;

        tracing::info!(
            trust = transport.trust_policy(),
            identity = transport.identity_policy(),
            max_concurrent_requests = config.max_concurrent_requests,
            owned_runtime = pool.is_owned(),
            "Sink HTTP client ready"
        );

        let stats = Arc::new(ClientStats::new());
        let dispatcher = RequestDispatcher::new(
            &transport,
            DispatchSettings {
                connect_timeout: config.connect_timeout,
                request_timeout: config.request_timeout,
                max_concurrent_requests: config.max_concurrent_requests,
                headers,
            },
            callback,
            Arc::clone(&stats),
            pool,
        );

        Ok(Self {
            config,
            transport,
            dispatcher,
            stats,
        })
    }

    /// Send a batch to `endpoint`.
    ///
    /// The returned handle resolves once every entry has an outcome. Calling
    /// this again with the same entries starts an independent batch.
    pub fn dispatch(&self, entries: Vec<RequestEntry>, endpoint: &str) -> BatchHandle {
        self.dispatcher.dispatch(entries, endpoint)
    }

    #[must_use]
    pub fn config(&self) -> &SinkClientConfig {
        &self.config
    }

    /// The TLS transport shared by every request.
    #[must_use]
    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    #[must_use]
    pub fn stats(&self) -> ClientStatsSnapshot {
        self.stats.snapshot()
    }

    /// Headers added to every request.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.dispatcher.settings().headers
    }
}

fn header_map(headers: &BTreeMap<String, String>) -> std::result::Result<HeaderMap, ConfigurationError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ConfigurationError::InvalidValue {
                option: options::HEADER,
                reason: format!("header name '{name}': {e}"),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| ConfigurationError::InvalidValue {
            option: options::HEADER,
            reason: format!("header '{name}' value: {e}"),
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}
