//! Fluent client builder
//!
//! [`SinkClientBuilder`] fills in a [`SinkClientConfig`](httpsink_client::SinkClientConfig)
//! option by option. Nothing is validated or loaded until
//! [`SinkClientBuilder::build`].

pub mod core;
pub mod headers;
pub mod limits;
pub mod security;

pub use self::core::SinkClientBuilder;
pub use headers::{ContentType, header};
