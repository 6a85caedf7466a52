//! Credential loading errors

use std::path::{Path, PathBuf};

/// Failure to turn a configured file into certificate or key material.
///
/// Every variant carries the offending path so construction failures can be
/// traced back to the option that named it.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no certificates found in {}", .path.display())]
    NoCertificates { path: PathBuf },
    #[error("malformed certificate in {}: {}", .path.display(), .reason)]
    MalformedCertificate { path: PathBuf, reason: String },
    #[error("no private key found in {}", .path.display())]
    NoPrivateKey { path: PathBuf },
    #[error("unsupported private key in {}: {}", .path.display(), .reason)]
    UnsupportedKey { path: PathBuf, reason: String },
    #[error("failed to open key store {}: {}", .path.display(), .reason)]
    Store { path: PathBuf, reason: String },
    #[error("wrong password for key store {}", .path.display())]
    StorePassword { path: PathBuf },
}

impl CredentialError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The file the failing credential was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::NoCertificates { path }
            | Self::MalformedCertificate { path, .. }
            | Self::NoPrivateKey { path }
            | Self::UnsupportedKey { path, .. }
            | Self::Store { path, .. }
            | Self::StorePassword { path } => path,
        }
    }
}
