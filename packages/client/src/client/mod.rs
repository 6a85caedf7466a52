//! Sink client, statistics and completion callbacks

pub mod callback;
pub mod core;
pub mod stats;

pub use self::core::SinkHttpClient;

pub use callback::{LoggingCallback, NoopCallback, RequestCallback};
pub use stats::{ClientStats, ClientStatsSnapshot};
