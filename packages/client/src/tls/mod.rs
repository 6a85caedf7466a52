//! TLS trust and identity
//!
//! Credential files are loaded once, composed into a [`TrustPolicy`] and an
//! [`IdentityPolicy`], and combined by [`SecureTransportFactory`] into the
//! [`TransportConfig`] every request shares.

pub mod credentials;
pub mod errors;
pub mod identity;
pub mod transport;
pub mod trust;
pub mod types;
mod verifier;

pub use errors::CredentialError;
pub use identity::IdentityPolicy;
pub use transport::{SecureTransportFactory, TransportConfig};
pub use trust::TrustPolicy;
pub use types::{KeyEncoding, StorePassword};
