//! Names of the client options, as used in error messages and logs.

pub const ALLOW_SELF_SIGNED: &str = "allow-self-signed";
pub const SERVER_TRUSTED_CERT: &str = "server-trusted-cert";
pub const TRUST_STORE_PATH: &str = "trust-store-path";
pub const TRUST_STORE_PASSWORD: &str = "trust-store-password";
pub const CLIENT_CERT: &str = "client-cert";
pub const CLIENT_PRIVATE_KEY: &str = "client-private-key";
pub const CLIENT_PRIVATE_KEY_ENCODING: &str = "client-private-key-encoding";
pub const KEY_STORE_PATH: &str = "key-store-path";
pub const KEY_STORE_PASSWORD: &str = "key-store-password";
pub const CONNECT_TIMEOUT: &str = "connect-timeout";
pub const REQUEST_TIMEOUT: &str = "request-timeout";
pub const MAX_CONCURRENT_REQUESTS: &str = "max-concurrent-requests";
pub const WORKER_THREADS: &str = "worker-threads";
pub const HEADER: &str = "header";
