//! Core credential types shared by the trust and identity builders

use std::fmt;

use serde::{Deserialize, Deserializer};
use zeroize::Zeroizing;

/// On-disk encoding of a client private key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyEncoding {
    /// Base64 text framed by `-----BEGIN ... KEY-----`
    Pem,
    /// Raw ASN.1 bytes
    Der,
}

impl KeyEncoding {
    /// Infer the encoding from file content.
    ///
    /// Anything carrying a PEM pre-encapsulation boundary is PEM; everything
    /// else is treated as DER. There is no fallback between the two.
    #[must_use]
    pub fn infer(content: &[u8]) -> Self {
        if memchr::memmem::find(content, b"-----BEGIN").is_some() {
            KeyEncoding::Pem
        } else {
            KeyEncoding::Der
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            KeyEncoding::Pem => "pem",
            KeyEncoding::Der => "der",
        }
    }
}

impl std::str::FromStr for KeyEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pem" => Ok(KeyEncoding::Pem),
            "der" => Ok(KeyEncoding::Der),
            other => Err(format!("unknown key encoding '{other}', expected 'pem' or 'der'")),
        }
    }
}

/// Key store password, wiped from memory on drop and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct StorePassword(Zeroizing<String>);

impl StorePassword {
    pub fn new(password: impl Into<String>) -> Self {
        Self(Zeroizing::new(password.into()))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for StorePassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StorePassword(***)")
    }
}

impl From<&str> for StorePassword {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StorePassword {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for StorePassword {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(StorePassword::new)
    }
}
