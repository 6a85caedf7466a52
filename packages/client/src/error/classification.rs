use super::types::{Error, Kind};
use crate::tls::CredentialError;

impl Error {
    /// Returns true if the options given to the client contradict each other
    /// or are incomplete.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        self.kind() == Kind::Configuration
    }

    /// Returns true if a certificate, key or store failed to load.
    #[must_use]
    pub fn is_credential(&self) -> bool {
        self.kind() == Kind::Credential
    }

    /// Returns true if loaded credentials were rejected while assembling the
    /// TLS context, for example a private key that does not match its
    /// certificate.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        self.kind() == Kind::Transport
    }

    /// Returns true if the batch handle lost its coordinator.
    #[must_use]
    pub fn is_dispatch(&self) -> bool {
        self.kind() == Kind::Dispatch
    }

    /// The underlying credential error, if this error came from loading one.
    #[must_use]
    pub fn credential_error(&self) -> Option<&CredentialError> {
        std::error::Error::source(self)?.downcast_ref::<CredentialError>()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::ConfigurationError;
    use crate::error;

    #[test]
    fn credential_error_keeps_option_and_path() {
        let err = error::credential(
            CredentialError::NoCertificates {
                path: PathBuf::from("/etc/certs/ca.crt"),
            },
            "server-trusted-cert",
        );

        assert!(err.is_credential());
        assert_eq!(err.option(), Some("server-trusted-cert"));
        let source = err.credential_error().expect("credential source");
        assert_eq!(source.path(), PathBuf::from("/etc/certs/ca.crt").as_path());

        let message = err.to_string();
        assert!(message.contains("server-trusted-cert"));
        assert!(message.contains("/etc/certs/ca.crt"));
    }

    #[test]
    fn configuration_error_names_option() {
        let err = error::configuration(ConfigurationError::IncompleteIdentity {
            present: "client-cert",
            missing: "client-private-key",
        });

        assert!(err.is_configuration());
        assert!(!err.is_credential());
        assert_eq!(err.option(), Some("client-private-key"));
        assert!(err.credential_error().is_none());
    }
}
