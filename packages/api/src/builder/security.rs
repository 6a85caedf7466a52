//! Trust and client identity options
//!
//! Conflicting choices are not resolved here. Setting two trust sources,
//! or a key store alongside a certificate and key, is reported by
//! [`SinkClientBuilder::build`].

use std::path::PathBuf;

use httpsink_client::{KeyEncoding, StorePassword};

use crate::builder::core::SinkClientBuilder;

impl SinkClientBuilder {
    /// Accept any server certificate, including self-signed ones, without
    /// hostname checks.
    ///
    /// Only for development and test endpoints.
    #[must_use]
    pub fn allow_self_signed(mut self) -> Self {
        self.config.allow_self_signed = true;
        self
    }

    /// Trust only the CA certificate(s) in this PEM file.
    #[must_use]
    pub fn trusted_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.server_trusted_cert = Some(path.into());
        self
    }

    /// Trust the certificates in a PKCS#12 trust store.
    #[must_use]
    pub fn trust_store(mut self, path: impl Into<PathBuf>, password: impl Into<StorePassword>) -> Self {
        self.config.trust_store_path = Some(path.into());
        self.config.trust_store_password = Some(password.into());
        self
    }

    /// Present this certificate and private key for mutual TLS.
    ///
    /// The key may be PEM or DER; the encoding is detected from the file
    /// unless set with [`SinkClientBuilder::client_key_encoding`].
    #[must_use]
    pub fn client_cert(mut self, cert: impl Into<PathBuf>, key: impl Into<PathBuf>) -> Self {
        self.config.client_cert = Some(cert.into());
        self.config.client_private_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn client_key_encoding(mut self, encoding: KeyEncoding) -> Self {
        self.config.client_private_key_encoding = Some(encoding);
        self
    }

    /// Present the certificate chain and key from a PKCS#12 key store.
    #[must_use]
    pub fn key_store(mut self, path: impl Into<PathBuf>, password: impl Into<StorePassword>) -> Self {
        self.config.key_store_path = Some(path.into());
        self.config.key_store_password = Some(password.into());
        self
    }
}
