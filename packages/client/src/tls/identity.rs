//! Client identity policy
//!
//! The certificate chain and private key presented when a server asks for a
//! client certificate. Either a PEM certificate plus a separate key file, or a
//! PKCS#12 key store, never both.

use std::path::PathBuf;

use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};

use super::credentials;
use super::errors::CredentialError;
use super::types::KeyEncoding;
use crate::config::{ConfigurationError, SinkClientConfig, options};
use crate::error::{self, Error};

/// Client certificate material, if any.
#[derive(Debug)]
pub enum IdentityPolicy {
    /// No client certificate; servers requiring one fail the handshake.
    None,
    /// Certificate chain and key loaded from separate files.
    CertAndKey {
        cert_path: PathBuf,
        chain: Vec<CertificateDer<'static>>,
        key: PrivateKeyDer<'static>,
        encoding: KeyEncoding,
    },
    /// Chain and key extracted from a PKCS#12 key store.
    Store {
        path: PathBuf,
        chain: Vec<CertificateDer<'static>>,
        key: PrivateKeyDer<'static>,
    },
}

impl IdentityPolicy {
    /// Resolve and load the client identity named by `config`.
    ///
    /// Keys are validated against `provider`, the same provider the TLS
    /// context is later built with.
    ///
    /// # Errors
    ///
    /// Fails with a configuration error when only half of a certificate/key
    /// pair or store path/password pair is set, or when a key store is
    /// combined with separate files. Fails with a credential error when a file
    /// cannot be loaded.
    pub fn from_config(config: &SinkClientConfig, provider: &CryptoProvider) -> Result<Self, Error> {
        match (&config.client_cert, &config.client_private_key) {
            (Some(_), None) => {
                return Err(error::configuration(ConfigurationError::IncompleteIdentity {
                    present: options::CLIENT_CERT,
                    missing: options::CLIENT_PRIVATE_KEY,
                }));
            }
            (None, Some(_)) => {
                return Err(error::configuration(ConfigurationError::IncompleteIdentity {
                    present: options::CLIENT_PRIVATE_KEY,
                    missing: options::CLIENT_CERT,
                }));
            }
            _ => {}
        }

        if config.key_store_path.is_some() {
            let other = if config.client_cert.is_some() {
                Some(options::CLIENT_CERT)
            } else if config.client_private_key.is_some() {
                Some(options::CLIENT_PRIVATE_KEY)
            } else {
                None
            };
            if let Some(other) = other {
                return Err(error::configuration(ConfigurationError::ConflictingIdentity {
                    store: options::KEY_STORE_PATH,
                    other,
                }));
            }
        }

        match (&config.key_store_path, &config.key_store_password) {
            (Some(_), None) => {
                return Err(error::configuration(ConfigurationError::IncompleteStore {
                    present: options::KEY_STORE_PATH,
                    missing: options::KEY_STORE_PASSWORD,
                }));
            }
            (None, Some(_)) => {
                return Err(error::configuration(ConfigurationError::IncompleteStore {
                    present: options::KEY_STORE_PASSWORD,
                    missing: options::KEY_STORE_PATH,
                }));
            }
            _ => {}
        }

        if let (Some(cert_path), Some(key_path)) = (&config.client_cert, &config.client_private_key)
        {
            let chain = credentials::load_certificates(cert_path)
                .map_err(|e| error::credential(e, options::CLIENT_CERT))?;
            let loaded =
                credentials::load_private_key(key_path, config.client_private_key_encoding, provider)
                    .map_err(|e| error::credential(e, options::CLIENT_PRIVATE_KEY))?;
            tracing::info!(
                "Using client certificate {} with {} key {}",
                cert_path.display(),
                loaded.encoding.as_str(),
                key_path.display()
            );
            return Ok(IdentityPolicy::CertAndKey {
                cert_path: cert_path.clone(),
                chain,
                key: loaded.key,
                encoding: loaded.encoding,
            });
        }

        if let (Some(path), Some(password)) = (&config.key_store_path, &config.key_store_password) {
            let contents = credentials::load_store(path, password)
                .map_err(|e| error::credential(e, options::KEY_STORE_PATH))?;

            let mut identities = contents.identities.into_iter();
            let identity = identities.next().ok_or_else(|| {
                error::credential(
                    CredentialError::NoPrivateKey { path: path.clone() },
                    options::KEY_STORE_PATH,
                )
            })?;
            if identities.next().is_some() {
                tracing::warn!(
                    "Key store {} holds more than one key; using '{}'",
                    path.display(),
                    identity.alias
                );
            }
            provider
                .key_provider
                .load_private_key(identity.key.clone_key())
                .map_err(|e| {
                    error::credential(
                        CredentialError::UnsupportedKey {
                            path: path.clone(),
                            reason: e.to_string(),
                        },
                        options::KEY_STORE_PATH,
                    )
                })?;

            tracing::info!("Using client identity from key store {}", path.display());
            return Ok(IdentityPolicy::Store {
                path: path.clone(),
                chain: identity.chain,
                key: identity.key,
            });
        }

        Ok(IdentityPolicy::None)
    }

    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            IdentityPolicy::None => "none",
            IdentityPolicy::CertAndKey { .. } => "cert-and-key",
            IdentityPolicy::Store { .. } => "key-store",
        }
    }

    /// Chain and key to present, `None` when no identity is configured.
    pub(crate) fn certified_key(
        &self,
    ) -> Option<(Vec<CertificateDer<'static>>, PrivateKeyDer<'static>)> {
        match self {
            IdentityPolicy::None => None,
            IdentityPolicy::CertAndKey { chain, key, .. } | IdentityPolicy::Store { chain, key, .. } => {
                Some((chain.clone(), key.clone_key()))
            }
        }
    }
}
