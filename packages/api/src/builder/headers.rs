//! Static headers sent with every request

use crate::builder::core::SinkClientBuilder;

/// Header name constants
pub mod header {
    pub use http::header::*;
}

/// Common payload content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// application/json
    ApplicationJson,
    /// application/x-ndjson
    ApplicationNdJson,
    /// application/octet-stream
    ApplicationOctetStream,
    /// text/plain
    TextPlain,
}

impl ContentType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::ApplicationJson => "application/json",
            ContentType::ApplicationNdJson => "application/x-ndjson",
            ContentType::ApplicationOctetStream => "application/octet-stream",
            ContentType::TextPlain => "text/plain",
        }
    }
}

impl SinkClientBuilder {
    /// Add a header to every request.
    ///
    /// Setting the same name again replaces the value. Invalid names or
    /// values are reported by [`SinkClientBuilder::build`].
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.set_header(name, value);
        self
    }

    /// Add several headers.
    #[must_use]
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.config.set_header(name, value);
        }
        self
    }

    /// Set `Content-Type`. No content type is sent unless configured.
    #[must_use]
    pub fn content_type(self, content_type: ContentType) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type.as_str())
    }

    /// Set `Authorization: Bearer <token>`.
    #[must_use]
    pub fn bearer_token(self, token: &str) -> Self {
        self.header(header::AUTHORIZATION.as_str(), format!("Bearer {token}"))
    }
}
