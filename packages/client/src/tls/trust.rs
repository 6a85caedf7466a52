//! Server trust policy
//!
//! Decides which server certificates the client accepts. Exactly one policy
//! is active per client; the configuration is rejected before any file is
//! read if more than one trust source is set.

use std::path::{Path, PathBuf};

use rustls::RootCertStore;
use rustls::pki_types::CertificateDer;

use super::credentials;
use super::errors::CredentialError;
use crate::config::{ConfigurationError, SinkClientConfig, options};
use crate::error::{self, Error};

/// Rule set for accepting server certificates.
#[derive(Debug)]
pub enum TrustPolicy {
    /// Native platform roots, falling back to the bundled webpki roots.
    PlatformDefault,
    /// Accept every server certificate without chain or hostname validation.
    ///
    /// Disables all assurance about who the client is talking to. Only meant
    /// for test and development endpoints with self-signed certificates.
    AcceptAll,
    /// Certificates from a PEM file (one CA or a bundle) replace the roots.
    /// Hostname verification stays on.
    SingleCa {
        path: PathBuf,
        certificates: Vec<CertificateDer<'static>>,
    },
    /// Certificates from a PKCS#12 trust store replace the roots.
    Store {
        path: PathBuf,
        certificates: Vec<CertificateDer<'static>>,
    },
}

impl TrustPolicy {
    /// Resolve and load the trust policy named by `config`.
    ///
    /// # Errors
    ///
    /// Fails with a configuration error when more than one trust source is
    /// set or a trust store lacks its password, and with a credential error
    /// when the configured file cannot be loaded. There is no fallback to the
    /// platform roots after a failed load.
    pub fn from_config(config: &SinkClientConfig) -> Result<Self, Error> {
        let mut configured = Vec::new();
        if config.allow_self_signed {
            configured.push(options::ALLOW_SELF_SIGNED);
        }
        if config.server_trusted_cert.is_some() {
            configured.push(options::SERVER_TRUSTED_CERT);
        }
        if config.trust_store_path.is_some() {
            configured.push(options::TRUST_STORE_PATH);
        }
        if configured.len() > 1 {
            return Err(error::configuration(ConfigurationError::ConflictingTrust {
                options: configured,
            }));
        }

        match (&config.trust_store_path, &config.trust_store_password) {
            (Some(_), None) => {
                return Err(error::configuration(ConfigurationError::IncompleteStore {
                    present: options::TRUST_STORE_PATH,
                    missing: options::TRUST_STORE_PASSWORD,
                }));
            }
            (None, Some(_)) => {
                return Err(error::configuration(ConfigurationError::IncompleteStore {
                    present: options::TRUST_STORE_PASSWORD,
                    missing: options::TRUST_STORE_PATH,
                }));
            }
            _ => {}
        }

        if config.allow_self_signed {
            tracing::warn!(
                "Server certificate verification is disabled ({}); any server identity will be accepted",
                options::ALLOW_SELF_SIGNED
            );
            return Ok(TrustPolicy::AcceptAll);
        }

        if let Some(path) = &config.server_trusted_cert {
            let certificates = credentials::load_certificates(path)
                .map_err(|e| error::credential(e, options::SERVER_TRUSTED_CERT))?;
            return Ok(TrustPolicy::SingleCa {
                path: path.clone(),
                certificates,
            });
        }

        if let (Some(path), Some(password)) = (&config.trust_store_path, &config.trust_store_password)
        {
            let contents = credentials::load_store(path, password)
                .map_err(|e| error::credential(e, options::TRUST_STORE_PATH))?;
            if contents.certificates.is_empty() {
                return Err(error::credential(
                    CredentialError::NoCertificates { path: path.clone() },
                    options::TRUST_STORE_PATH,
                ));
            }
            return Ok(TrustPolicy::Store {
                path: path.clone(),
                certificates: contents.certificates,
            });
        }

        Ok(TrustPolicy::PlatformDefault)
    }

    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            TrustPolicy::PlatformDefault => "platform-default",
            TrustPolicy::AcceptAll => "accept-all",
            TrustPolicy::SingleCa { .. } => "custom-ca",
            TrustPolicy::Store { .. } => "trust-store",
        }
    }

    /// Root store for policies that verify the server chain; `None` for
    /// [`TrustPolicy::AcceptAll`].
    pub(crate) fn root_store(&self) -> Result<Option<RootCertStore>, Error> {
        match self {
            TrustPolicy::AcceptAll => Ok(None),
            TrustPolicy::PlatformDefault => Ok(Some(platform_roots())),
            TrustPolicy::SingleCa { path, certificates } => {
                anchors(path, certificates, options::SERVER_TRUSTED_CERT).map(Some)
            }
            TrustPolicy::Store { path, certificates } => {
                anchors(path, certificates, options::TRUST_STORE_PATH).map(Some)
            }
        }
    }
}

fn anchors(
    path: &Path,
    certificates: &[CertificateDer<'static>],
    option: &'static str,
) -> Result<RootCertStore, Error> {
    let mut roots = RootCertStore::empty();
    for cert in certificates {
        roots.add(cert.clone()).map_err(|e| {
            error::credential(
                CredentialError::MalformedCertificate {
                    path: path.to_path_buf(),
                    reason: format!("unusable as trust anchor: {e}"),
                },
                option,
            )
        })?;
    }
    tracing::debug!("Trusting {} certificate(s) from {}", roots.len(), path.display());
    Ok(roots)
}

fn platform_roots() -> RootCertStore {
    let mut root_store = RootCertStore::empty();

    let cert_result = rustls_native_certs::load_native_certs();
    for cert in cert_result.certs {
        if let Err(e) = root_store.add(cert) {
            tracing::warn!("Failed to add system certificate: {}", e);
        }
    }

    if !cert_result.errors.is_empty() || root_store.is_empty() {
        for err in &cert_result.errors {
            tracing::warn!("Certificate load error: {}", err);
        }
        // Fall back to webpki roots if native roots are unusable
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }

    tracing::debug!("Loaded {} platform root certificates", root_store.len());
    root_store
}
