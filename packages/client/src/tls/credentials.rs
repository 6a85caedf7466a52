//! Certificate, private key and key store loading
//!
//! Turns filesystem paths into the DER types rustls consumes. Every loader
//! fails closed: a file that cannot be read or parsed completely is an error,
//! never an empty result.

use std::collections::HashSet;
use std::path::Path;

use der::Decode;
use p12_keystore::error::Error as StoreError;
use p12_keystore::{KeyStore, KeyStoreEntry};
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{
    CertificateDer, PrivateKeyDer, PrivatePkcs1KeyDer, PrivatePkcs8KeyDer, PrivateSec1KeyDer,
};
use x509_cert::Certificate as X509Certificate;
use zeroize::Zeroizing;

use super::errors::CredentialError;
use super::types::{KeyEncoding, StorePassword};

/// A private key together with the encoding it was read from.
#[derive(Debug)]
pub struct LoadedKey {
    pub key: PrivateKeyDer<'static>,
    pub encoding: KeyEncoding,
}

/// A private key entry of a PKCS#12 store with its certificate chain.
#[derive(Debug)]
pub struct StoreIdentity {
    pub alias: String,
    /// Leaf first, then each issuer present in the store.
    pub chain: Vec<CertificateDer<'static>>,
    pub key: PrivateKeyDer<'static>,
}

/// Certificates and keys recovered from a PKCS#12 store.
#[derive(Debug)]
pub struct StoreContents {
    /// Every distinct certificate in the store: key chains and trusted
    /// certificate entries.
    pub certificates: Vec<CertificateDer<'static>>,
    pub identities: Vec<StoreIdentity>,
}

fn read(path: &Path) -> Result<Zeroizing<Vec<u8>>, CredentialError> {
    std::fs::read(path)
        .map(Zeroizing::new)
        .map_err(|e| CredentialError::io(path, e))
}

/// Load every PEM certificate in `path`.
///
/// A file may hold a single certificate or a bundle of concatenated blocks;
/// each block must decode as X.509.
pub fn load_certificates(path: &Path) -> Result<Vec<CertificateDer<'static>>, CredentialError> {
    let content = read(path)?;
    let certs = rustls_pemfile::certs(&mut content.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CredentialError::MalformedCertificate {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if certs.is_empty() {
        return Err(CredentialError::NoCertificates {
            path: path.to_path_buf(),
        });
    }

    for cert in &certs {
        ensure_x509(path, cert)?;
    }

    tracing::debug!("Loaded {} certificate(s) from {}", certs.len(), path.display());
    Ok(certs)
}

fn ensure_x509(path: &Path, cert: &CertificateDer<'_>) -> Result<(), CredentialError> {
    let parsed = X509Certificate::from_der(cert.as_ref()).map_err(|e| {
        CredentialError::MalformedCertificate {
            path: path.to_path_buf(),
            reason: format!("X.509 parsing failed: {e}"),
        }
    })?;
    tracing::trace!(
        subject = %parsed.tbs_certificate.subject,
        "Parsed certificate from {}",
        path.display()
    );
    Ok(())
}

/// Load a private key from `path`.
///
/// When `declared` is `None` the encoding is inferred with
/// [`KeyEncoding::infer`]. The key must be loadable as a signing key by
/// `provider`, so a file that merely looks like a key is rejected here rather
/// than during the first handshake.
pub fn load_private_key(
    path: &Path,
    declared: Option<KeyEncoding>,
    provider: &CryptoProvider,
) -> Result<LoadedKey, CredentialError> {
    let content = read(path)?;
    let encoding = declared.unwrap_or_else(|| KeyEncoding::infer(&content));

    let key = match encoding {
        KeyEncoding::Pem => pem_private_key(path, &content)?,
        KeyEncoding::Der => der_private_key(path, &content, provider)?,
    };

    provider
        .key_provider
        .load_private_key(key.clone_key())
        .map_err(|e| CredentialError::UnsupportedKey {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    tracing::debug!("Loaded {} private key from {}", encoding.as_str(), path.display());
    Ok(LoadedKey { key, encoding })
}

fn pem_private_key(path: &Path, content: &[u8]) -> Result<PrivateKeyDer<'static>, CredentialError> {
    let mut reader = content;
    rustls_pemfile::private_key(&mut reader)
        .map_err(|e| CredentialError::UnsupportedKey {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
        .ok_or_else(|| CredentialError::NoPrivateKey {
            path: path.to_path_buf(),
        })
}

/// DER carries no framing that names the key format, so the candidates are
/// tried in order PKCS#8, PKCS#1, SEC1 and the first one the provider accepts
/// wins.
fn der_private_key(
    path: &Path,
    content: &[u8],
    provider: &CryptoProvider,
) -> Result<PrivateKeyDer<'static>, CredentialError> {
    if content.is_empty() {
        return Err(CredentialError::NoPrivateKey {
            path: path.to_path_buf(),
        });
    }

    let candidates: [PrivateKeyDer<'static>; 3] = [
        PrivatePkcs8KeyDer::from(content.to_vec()).into(),
        PrivatePkcs1KeyDer::from(content.to_vec()).into(),
        PrivateSec1KeyDer::from(content.to_vec()).into(),
    ];

    for candidate in candidates {
        if provider.key_provider.load_private_key(candidate.clone_key()).is_ok() {
            return Ok(candidate);
        }
    }

    Err(CredentialError::UnsupportedKey {
        path: path.to_path_buf(),
        reason: "DER content is not a PKCS#8, PKCS#1 or SEC1 private key".to_string(),
    })
}

/// Open a PKCS#12 store and extract its certificates and keys.
///
/// Both the legacy SHA-1/3DES/RC2 layout and the PBES2/AES layout with a
/// SHA-2 MAC are read. A MAC mismatch is reported as a wrong password; any
/// other failure, including an unsupported algorithm, as an unreadable store.
pub fn load_store(path: &Path, password: &StorePassword) -> Result<StoreContents, CredentialError> {
    let content = read(path)?;
    let store = KeyStore::from_pkcs12(&content, password.expose()).map_err(|e| match e {
        StoreError::MacError(_) => CredentialError::StorePassword {
            path: path.to_path_buf(),
        },
        other => store_error(path, other),
    })?;

    let mut certificates: Vec<CertificateDer<'static>> = Vec::new();
    let mut identities = Vec::new();
    for (alias, entry) in store.entries() {
        match entry {
            KeyStoreEntry::PrivateKeyChain(key_chain) => {
                let chain: Vec<CertificateDer<'static>> = key_chain
                    .chain()
                    .iter()
                    .map(|cert| CertificateDer::from(cert.as_der().to_vec()))
                    .collect();
                certificates.extend(chain.iter().cloned());
                identities.push(StoreIdentity {
                    alias: alias.clone(),
                    chain,
                    key: PrivatePkcs8KeyDer::from(key_chain.key().to_vec()).into(),
                });
            }
            KeyStoreEntry::Certificate(cert) => {
                certificates.push(CertificateDer::from(cert.as_der().to_vec()));
            }
            KeyStoreEntry::Secret(_) => {
                tracing::debug!("Ignoring secret entry '{}' in {}", alias, path.display());
            }
        }
    }

    let mut seen = HashSet::new();
    certificates.retain(|cert| seen.insert(cert.as_ref().to_vec()));
    for cert in &certificates {
        ensure_x509(path, cert)?;
    }

    tracing::debug!(
        "Opened key store {} with {} certificate(s) and {} key(s)",
        path.display(),
        certificates.len(),
        identities.len()
    );
    Ok(StoreContents {
        certificates,
        identities,
    })
}

fn store_error(path: &Path, cause: StoreError) -> CredentialError {
    CredentialError::Store {
        path: path.to_path_buf(),
        reason: cause.to_string(),
    }
}
