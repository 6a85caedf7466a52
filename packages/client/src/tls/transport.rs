//! TLS context assembly
//!
//! Combines one [`TrustPolicy`] and one [`IdentityPolicy`] into the rustls
//! client configuration shared by every connection a client opens.

use std::fmt;
use std::sync::Arc;

use rustls::ClientConfig;
use rustls::client::ResolvesClientCert as _;
use rustls::crypto::CryptoProvider;

use super::identity::IdentityPolicy;
use super::trust::TrustPolicy;
use super::verifier::AcceptAnyServerCert;
use crate::error::{self, Error};

/// Resolved, immutable transport configuration.
///
/// Cloning is cheap; the TLS context is shared.
#[derive(Clone)]
pub struct TransportConfig {
    tls: Arc<ClientConfig>,
    trust: &'static str,
    identity: &'static str,
}

impl TransportConfig {
    /// The rustls client configuration.
    #[must_use]
    pub fn tls(&self) -> Arc<ClientConfig> {
        Arc::clone(&self.tls)
    }

    /// Name of the trust policy this configuration was built from.
    #[must_use]
    pub fn trust_policy(&self) -> &'static str {
        self.trust
    }

    /// Name of the identity policy this configuration was built from.
    #[must_use]
    pub fn identity_policy(&self) -> &'static str {
        self.identity
    }

    /// Whether a client certificate is presented when requested.
    #[must_use]
    pub fn presents_client_certificate(&self) -> bool {
        self.tls.client_auth_cert_resolver.has_certs()
    }
}

impl fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportConfig")
            .field("trust", &self.trust)
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

/// Builds [`TransportConfig`] values with a fixed crypto provider.
#[derive(Debug, Clone)]
pub struct SecureTransportFactory {
    provider: Arc<CryptoProvider>,
}

impl Default for SecureTransportFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SecureTransportFactory {
    /// Factory backed by the `ring` provider.
    #[must_use]
    pub fn new() -> Self {
        Self {
            provider: Arc::new(rustls::crypto::ring::default_provider()),
        }
    }

    /// Provider used for key validation and handshakes.
    #[must_use]
    pub fn provider(&self) -> &Arc<CryptoProvider> {
        &self.provider
    }

    /// Compose the TLS context for `trust` and `identity`.
    ///
    /// Only TLS 1.3 and TLS 1.2 are offered.
    ///
    /// # Errors
    ///
    /// Returns a transport error when rustls rejects the material, for
    /// example a private key that does not belong to the client certificate.
    pub fn build(
        &self,
        trust: &TrustPolicy,
        identity: &IdentityPolicy,
    ) -> Result<TransportConfig, Error> {
        let builder = ClientConfig::builder_with_provider(Arc::clone(&self.provider))
            .with_protocol_versions(&[&rustls::version::TLS13, &rustls::version::TLS12])
            .map_err(error::transport)?;

        let builder = match trust.root_store()? {
            Some(roots) => builder.with_root_certificates(roots),
            None => builder
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert::new(Arc::clone(
                    &self.provider,
                )))),
        };

        let config = match identity.certified_key() {
            Some((chain, key)) => builder
                .with_client_auth_cert(chain, key)
                .map_err(error::transport)?,
            None => builder.with_no_client_auth(),
        };

        tracing::info!(
            trust = trust.name(),
            identity = identity.name(),
            "Built TLS transport configuration"
        );

        Ok(TransportConfig {
            tls: Arc::new(config),
            trust: trust.name(),
            identity: identity.name(),
        })
    }
}
