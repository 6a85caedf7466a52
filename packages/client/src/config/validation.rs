//! Configuration validation
//!
//! Option combinations that cannot produce a working client are rejected
//! before any credential is touched.

use std::time::Duration;

use http::{HeaderName, HeaderValue};

use super::client::SinkClientConfig;
use super::options;

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Contradictory or incomplete client options.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("only one trust source may be configured, found: {}", .options.join(", "))]
    ConflictingTrust { options: Vec<&'static str> },

    #[error(
        "`{present}` is set but `{missing}` is not; a client certificate and private key must be configured together"
    )]
    IncompleteIdentity {
        present: &'static str,
        missing: &'static str,
    },

    #[error("`{store}` cannot be combined with `{other}`")]
    ConflictingIdentity {
        store: &'static str,
        other: &'static str,
    },

    #[error("`{present}` is set but `{missing}` is not")]
    IncompleteStore {
        present: &'static str,
        missing: &'static str,
    },

    #[error("invalid value for `{option}`: {reason}")]
    InvalidValue { option: &'static str, reason: String },
}

impl ConfigurationError {
    /// The option the caller has to change to resolve the error.
    #[must_use]
    pub fn option(&self) -> &'static str {
        match self {
            Self::ConflictingTrust { options } => {
                options.last().copied().unwrap_or(options::ALLOW_SELF_SIGNED)
            }
            Self::IncompleteIdentity { missing, .. } | Self::IncompleteStore { missing, .. } => {
                *missing
            }
            Self::ConflictingIdentity { store, .. } => *store,
            Self::InvalidValue { option, .. } => *option,
        }
    }
}

/// Configuration validation trait
pub trait Validator {
    /// Validates the configuration settings
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if any setting is out of range.
    fn validate(&self) -> ConfigResult<()>;
}

/// Common configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate timeout duration
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidValue` if the timeout is zero or
    /// exceeds one hour.
    pub fn validate_timeout(timeout: Duration, option: &'static str) -> ConfigResult<()> {
        if timeout.is_zero() {
            return Err(ConfigurationError::InvalidValue {
                option,
                reason: "timeout cannot be zero".to_string(),
            });
        }

        if timeout.as_secs() > 3600 {
            return Err(ConfigurationError::InvalidValue {
                option,
                reason: "timeout cannot exceed 1 hour".to_string(),
            });
        }

        Ok(())
    }

    /// Validate numeric range
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidValue` if the value is outside
    /// the range [min, max] (inclusive).
    pub fn validate_range<T>(value: T, min: T, max: T, option: &'static str) -> ConfigResult<()>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if value < min || value > max {
            return Err(ConfigurationError::InvalidValue {
                option,
                reason: format!("must be between {min} and {max}, got {value}"),
            });
        }

        Ok(())
    }

    /// Validate a static header name and value
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidValue` if either part is not
    /// valid on the wire.
    pub fn validate_header(name: &str, value: &str) -> ConfigResult<()> {
        HeaderName::from_bytes(name.as_bytes()).map_err(|e| ConfigurationError::InvalidValue {
            option: options::HEADER,
            reason: format!("header name '{name}': {e}"),
        })?;
        HeaderValue::from_str(value).map_err(|e| ConfigurationError::InvalidValue {
            option: options::HEADER,
            reason: format!("header '{name}' value: {e}"),
        })?;
        Ok(())
    }
}

impl Validator for SinkClientConfig {
    fn validate(&self) -> ConfigResult<()> {
        ConfigValidator::validate_timeout(self.connect_timeout, options::CONNECT_TIMEOUT)?;
        ConfigValidator::validate_timeout(self.request_timeout, options::REQUEST_TIMEOUT)?;
        ConfigValidator::validate_range(
            self.max_concurrent_requests,
            1,
            10_000,
            options::MAX_CONCURRENT_REQUESTS,
        )?;
        ConfigValidator::validate_range(self.worker_threads, 1, 1024, options::WORKER_THREADS)?;

        for (name, value) in &self.headers {
            ConfigValidator::validate_header(name, value)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SinkClientConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let config = SinkClientConfig {
            max_concurrent_requests: 0,
            ..SinkClientConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.option(), options::MAX_CONCURRENT_REQUESTS);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = SinkClientConfig {
            request_timeout: Duration::ZERO,
            ..SinkClientConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.option(), options::REQUEST_TIMEOUT);
    }

    #[test]
    fn invalid_header_is_rejected() {
        let mut config = SinkClientConfig::default();
        config.headers.insert("Bad Header".to_string(), "x".to_string());
        let err = config.validate().unwrap_err();
        assert_eq!(err.option(), options::HEADER);
    }
}
