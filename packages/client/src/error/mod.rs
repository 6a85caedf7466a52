pub mod classification;
pub mod constructors;
pub mod types;

pub use constructors::*;
pub use types::{Error, Kind, Result};

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;
