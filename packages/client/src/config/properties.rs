//! Connector property names
//!
//! Sinks configured through flat string properties use these keys. Keys
//! outside the `gid.connector.http.` namespace handled here are ignored; they
//! belong to other layers of the connector.

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::client::SinkClientConfig;
use super::options;
use super::validation::{ConfigResult, ConfigurationError};
use crate::tls::{KeyEncoding, StorePassword};

pub const PREFIX: &str = "gid.connector.http.";

pub const ALLOW_SELF_SIGNED: &str = "gid.connector.http.security.cert.server.allowSelfSigned";
pub const SERVER_TRUSTED_CERT: &str = "gid.connector.http.security.cert.server";
pub const CLIENT_CERT: &str = "gid.connector.http.security.cert.client";
pub const CLIENT_PRIVATE_KEY: &str = "gid.connector.http.security.key.client";
pub const CLIENT_PRIVATE_KEY_ENCODING: &str = "gid.connector.http.security.key.client.encoding";
pub const KEY_STORE_PATH: &str = "gid.connector.http.security.keystore.path";
pub const KEY_STORE_PASSWORD: &str = "gid.connector.http.security.keystore.password";
pub const TRUST_STORE_PATH: &str = "gid.connector.http.security.truststore.path";
pub const TRUST_STORE_PASSWORD: &str = "gid.connector.http.security.truststore.password";
pub const REQUEST_TIMEOUT_SECONDS: &str = "gid.connector.http.sink.request.timeout";
pub const CONNECT_TIMEOUT_SECONDS: &str = "gid.connector.http.sink.connect.timeout";
pub const MAX_CONCURRENT_REQUESTS: &str = "gid.connector.http.sink.request.max-concurrency";
pub const WRITER_THREAD_POOL_SIZE: &str = "gid.connector.http.sink.writer.thread-pool.size";
pub const HEADER_PREFIX: &str = "gid.connector.http.sink.header.";

/// Build a [`SinkClientConfig`] from connector properties.
///
/// Blank values count as unset. Values that do not parse are reported
/// against the option they configure.
///
/// # Errors
///
/// Returns `ConfigurationError::InvalidValue` for booleans, numbers or key
/// encodings that do not parse.
pub fn from_properties<S: BuildHasher>(
    properties: &HashMap<String, String, S>,
) -> ConfigResult<SinkClientConfig> {
    let get = |key: &str| {
        properties
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    };

    let mut config = SinkClientConfig::default();

    if let Some(value) = get(ALLOW_SELF_SIGNED) {
        config.allow_self_signed = parse_bool(value, options::ALLOW_SELF_SIGNED)?;
    }
    config.server_trusted_cert = get(SERVER_TRUSTED_CERT).map(PathBuf::from);
    config.client_cert = get(CLIENT_CERT).map(PathBuf::from);
    config.client_private_key = get(CLIENT_PRIVATE_KEY).map(PathBuf::from);
    if let Some(value) = get(CLIENT_PRIVATE_KEY_ENCODING) {
        config.client_private_key_encoding =
            Some(parse(value, options::CLIENT_PRIVATE_KEY_ENCODING)?);
    }
    config.key_store_path = get(KEY_STORE_PATH).map(PathBuf::from);
    config.trust_store_path = get(TRUST_STORE_PATH).map(PathBuf::from);

    config.key_store_password = store_password(properties, KEY_STORE_PASSWORD, KEY_STORE_PATH);
    config.trust_store_password =
        store_password(properties, TRUST_STORE_PASSWORD, TRUST_STORE_PATH);

    if let Some(value) = get(REQUEST_TIMEOUT_SECONDS) {
        config.request_timeout =
            Duration::from_secs(parse::<u64>(value, options::REQUEST_TIMEOUT)?);
    }
    if let Some(value) = get(CONNECT_TIMEOUT_SECONDS) {
        config.connect_timeout =
            Duration::from_secs(parse::<u64>(value, options::CONNECT_TIMEOUT)?);
    }
    if let Some(value) = get(MAX_CONCURRENT_REQUESTS) {
        config.max_concurrent_requests = parse(value, options::MAX_CONCURRENT_REQUESTS)?;
    }
    if let Some(value) = get(WRITER_THREAD_POOL_SIZE) {
        config.worker_threads = parse(value, options::WORKER_THREADS)?;
    }

    for (key, value) in properties {
        if let Some(name) = key.strip_prefix(HEADER_PREFIX) {
            if !name.is_empty() {
                config.set_header(name, value.as_str());
            }
        }
    }

    Ok(config)
}

/// An empty password is legitimate for a configured store. Without a store
/// path it is a blank template value and counts as unset.
fn store_password<S: BuildHasher>(
    properties: &HashMap<String, String, S>,
    password_key: &str,
    path_key: &str,
) -> Option<StorePassword> {
    let password = properties.get(password_key)?;
    let has_path = properties
        .get(path_key)
        .is_some_and(|path| !path.trim().is_empty());
    if password.is_empty() && !has_path {
        return None;
    }
    Some(StorePassword::new(password.as_str()))
}

fn parse_bool(value: &str, option: &'static str) -> ConfigResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ConfigurationError::InvalidValue {
            option,
            reason: format!("expected 'true' or 'false', got '{other}'"),
        }),
    }
}

fn parse<T>(value: &str, option: &'static str) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigurationError::InvalidValue {
        option,
        reason: format!("'{value}': {e}"),
    })
}
