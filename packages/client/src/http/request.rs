//! Batch request entries

use bytes::Bytes;

/// One serialized element of a batch.
///
/// The method is kept as the caller supplied it and only validated when the
/// entry is dispatched; an invalid method fails that entry alone. The body is
/// opaque and sent as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEntry {
    method: String,
    body: Bytes,
}

impl RequestEntry {
    pub fn new(method: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            method: method.into(),
            body: body.into(),
        }
    }

    /// `POST` entry, the usual case for a sink.
    pub fn post(body: impl Into<Bytes>) -> Self {
        Self::new("POST", body)
    }

    /// `PUT` entry.
    pub fn put(body: impl Into<Bytes>) -> Self {
        Self::new("PUT", body)
    }

    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Parse the method as an HTTP token.
    pub(crate) fn http_method(&self) -> Result<http::Method, http::method::InvalidMethod> {
        http::Method::from_bytes(self.method.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_shared_not_copied() {
        let body = Bytes::from_static(b"{\"id\":1}");
        let entry = RequestEntry::post(body.clone());
        assert_eq!(entry.body().as_ptr(), body.as_ptr());
        assert_eq!(entry.method(), "POST");
    }

    #[test]
    fn method_validity_is_checked_lazily() {
        assert!(RequestEntry::new("PATCH", "x").http_method().is_ok());
        assert!(RequestEntry::new("NOT A METHOD", "x").http_method().is_err());
        assert!(RequestEntry::new("", "x").http_method().is_err());
    }
}
