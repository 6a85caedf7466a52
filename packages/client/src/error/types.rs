use std::error::Error as StdError;
use std::fmt;

use super::BoxError;

/// A Result alias where the Err case is `httpsink_client::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while constructing a client or resolving a batch handle.
///
/// Per-entry request failures are not reported through this type; they are
/// recorded in the failed half of a [`BatchResult`](crate::dispatch::BatchResult).
pub struct Error {
    inner: Box<Inner>,
}

struct Inner {
    kind: Kind,
    source: Option<BoxError>,
    option: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Contradictory or incomplete credential options
    Configuration,
    /// A configured credential could not be read or parsed
    Credential,
    /// The TLS context could not be assembled from loaded credentials
    Transport,
    /// The worker runtime could not be started
    Runtime,
    /// The batch coordinator went away before producing a result
    Dispatch,
}

impl Error {
    pub fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                source: None,
                option: None,
            }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<BoxError>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    /// Attach the name of the configuration option that caused the error.
    #[must_use]
    pub fn with_option(mut self, option: &'static str) -> Error {
        self.inner.option = Some(option);
        self
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.inner.kind
    }

    /// The configuration option this error relates to, if known.
    #[must_use]
    pub fn option(&self) -> Option<&'static str> {
        self.inner.option
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("httpsink_client::Error");

        f.field("kind", &self.inner.kind);

        if let Some(option) = self.inner.option {
            f.field("option", &option);
        }

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.kind {
            Kind::Configuration => f.write_str("invalid client configuration")?,
            Kind::Credential => f.write_str("failed to load credentials")?,
            Kind::Transport => f.write_str("failed to build TLS transport")?,
            Kind::Runtime => f.write_str("failed to start worker runtime")?,
            Kind::Dispatch => f.write_str("batch dispatch abandoned")?,
        }

        if let Some(option) = self.inner.option {
            write!(f, " (option `{option}`)")?;
        }

        if let Some(ref source) = self.inner.source {
            write!(f, ": {source}")?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}
