//! Sink client configuration and defaults

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::tls::{KeyEncoding, StorePassword};

/// Configuration for one [`SinkHttpClient`](crate::SinkHttpClient).
///
/// Trust options (`allow_self_signed`, `server_trusted_cert`,
/// `trust_store_path`) are mutually exclusive. Identity options are either a
/// `client_cert` + `client_private_key` pair or a `key_store_path`.
/// Contradictions are reported when the client is constructed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SinkClientConfig {
    /// Accept any server certificate without chain or hostname checks.
    ///
    /// This disables all assurance about the server's identity and exists for
    /// test and development endpoints only.
    pub allow_self_signed: bool,
    /// PEM file with one or more CA certificates replacing the default roots.
    pub server_trusted_cert: Option<PathBuf>,
    /// PKCS#12 store whose certificates replace the default roots.
    pub trust_store_path: Option<PathBuf>,
    pub trust_store_password: Option<StorePassword>,
    /// PEM certificate (chain) presented for mutual TLS.
    pub client_cert: Option<PathBuf>,
    /// Private key matching `client_cert`, PEM or DER.
    pub client_private_key: Option<PathBuf>,
    /// Declared key encoding; inferred from the file when absent.
    pub client_private_key_encoding: Option<KeyEncoding>,
    /// PKCS#12 store supplying the client certificate chain and key.
    pub key_store_path: Option<PathBuf>,
    pub key_store_password: Option<StorePassword>,
    /// Bound on establishing the TCP connection.
    #[serde(deserialize_with = "duration_secs")]
    pub connect_timeout: Duration,
    /// Bound on the whole exchange, up to the last response body byte.
    #[serde(deserialize_with = "duration_secs")]
    pub request_timeout: Duration,
    /// Upper bound on requests in flight across all batches of one client.
    pub max_concurrent_requests: usize,
    /// Threads of the dedicated runtime, used only when the client is built
    /// outside a tokio runtime.
    pub worker_threads: usize,
    /// Headers added to every request.
    pub headers: BTreeMap<String, String>,
}

/// Default values for [`SinkClientConfig`].
pub struct ConfigDefaults;

impl ConfigDefaults {
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const MAX_CONCURRENT_REQUESTS: usize = 16;
    pub const WORKER_THREADS: usize = 1;
}

impl Default for SinkClientConfig {
    fn default() -> Self {
        Self {
            allow_self_signed: false,
            server_trusted_cert: None,
            trust_store_path: None,
            trust_store_password: None,
            client_cert: None,
            client_private_key: None,
            client_private_key_encoding: None,
            key_store_path: None,
            key_store_password: None,
            connect_timeout: ConfigDefaults::CONNECT_TIMEOUT,
            request_timeout: ConfigDefaults::REQUEST_TIMEOUT,
            max_concurrent_requests: ConfigDefaults::MAX_CONCURRENT_REQUESTS,
            worker_threads: ConfigDefaults::WORKER_THREADS,
            headers: BTreeMap::new(),
        }
    }
}

impl SinkClientConfig {
    /// Set a static header, replacing any value set under the same name.
    ///
    /// Header names are case-insensitive, so `Content-Type` replaces an
    /// earlier `content-type`.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers
            .retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
    }
}

fn duration_secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_kebab_case_with_defaults() {
        let config: SinkClientConfig = serde_json::from_str(
            r#"{
                "server-trusted-cert": "/certs/ca.crt",
                "client-cert": "/certs/client.crt",
                "client-private-key": "/certs/client.der",
                "client-private-key-encoding": "der",
                "request-timeout": 5,
                "headers": { "Content-Type": "application/json" }
            }"#,
        )
        .expect("valid config");

        assert_eq!(config.server_trusted_cert, Some(PathBuf::from("/certs/ca.crt")));
        assert_eq!(config.client_private_key_encoding, Some(KeyEncoding::Der));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, ConfigDefaults::CONNECT_TIMEOUT);
        assert_eq!(config.max_concurrent_requests, ConfigDefaults::MAX_CONCURRENT_REQUESTS);
        assert_eq!(config.headers.get("Content-Type").map(String::as_str), Some("application/json"));
        assert!(!config.allow_self_signed);
    }

    #[test]
    fn rejects_unknown_fields() {
        let result = serde_json::from_str::<SinkClientConfig>(r#"{ "allow-self-sigend": true }"#);
        assert!(result.is_err());
    }

    #[test]
    fn password_is_not_printed() {
        let config = SinkClientConfig {
            key_store_password: Some(StorePassword::new("secret")),
            ..SinkClientConfig::default()
        };
        assert!(!format!("{config:?}").contains("secret"));
    }
}
