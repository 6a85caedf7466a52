use super::BoxError;
use super::types::{Error, Kind};
use crate::config::ConfigurationError;
use crate::tls::CredentialError;

/// Creates an `Error` for contradictory or incomplete options.
pub fn configuration(e: ConfigurationError) -> Error {
    let option = e.option();
    Error::new(Kind::Configuration).with(e).with_option(option)
}

/// Creates an `Error` for a credential that failed to load.
pub fn credential(e: CredentialError, option: &'static str) -> Error {
    Error::new(Kind::Credential).with(e).with_option(option)
}

/// Creates an `Error` for a TLS context that could not be assembled.
pub fn transport<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Transport).with(e.into())
}

/// Creates an `Error` for a worker runtime that failed to start.
pub fn runtime<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Runtime).with(e.into())
}

/// Creates an `Error` for a batch whose coordinator disappeared.
pub fn dispatch_abandoned() -> Error {
    Error::new(Kind::Dispatch)
        .with("batch coordinator stopped before producing a result")
}
