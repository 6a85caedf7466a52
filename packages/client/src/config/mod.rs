//! Client configuration
//!
//! [`SinkClientConfig`] is the configuration bag a sink hands to
//! [`SinkHttpClient::new`](crate::SinkHttpClient::new). It can be built in
//! code, deserialized with serde, or read from connector-style properties.

pub mod client;
pub mod options;
pub mod properties;
pub mod validation;

pub use client::{ConfigDefaults, SinkClientConfig};
pub use properties::from_properties;
pub use validation::{ConfigResult, ConfigValidator, ConfigurationError, Validator};
