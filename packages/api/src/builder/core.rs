//! Core `SinkClientBuilder` structure and construction

use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;
use std::sync::Arc;

use httpsink_client::{Error, RequestCallback, SinkClientConfig, SinkHttpClient};

/// Builder for [`SinkHttpClient`].
#[derive(Default)]
pub struct SinkClientBuilder {
    pub(crate) config: SinkClientConfig,
    pub(crate) callback: Option<Arc<dyn RequestCallback>>,
}

impl fmt::Debug for SinkClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkClientBuilder")
            .field("config", &self.config)
            .field("callback", &self.callback)
            .finish()
    }
}

impl SinkClientBuilder {
    /// Builder starting from the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder starting from an existing configuration.
    #[must_use]
    pub fn from_config(config: SinkClientConfig) -> Self {
        Self {
            config,
            callback: None,
        }
    }

    /// Builder starting from connector properties.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a property value does not parse.
    pub fn from_properties<S: BuildHasher>(
        properties: &HashMap<String, String, S>,
    ) -> Result<Self, Error> {
        httpsink_client::from_properties(properties)
            .map(Self::from_config)
            .map_err(httpsink_client::error::configuration)
    }

    /// The configuration assembled so far.
    #[must_use]
    pub fn config(&self) -> &SinkClientConfig {
        &self.config
    }

    /// Validate the configuration, load credentials and start the client.
    ///
    /// # Errors
    ///
    /// Any construction error of [`SinkHttpClient::new`].
    pub fn build(self) -> Result<SinkHttpClient, Error> {
        tracing::debug!("Building sink HTTP client");
        match self.callback {
            Some(callback) => SinkHttpClient::with_callback(self.config, callback),
            None => SinkHttpClient::new(self.config),
        }
    }
}
