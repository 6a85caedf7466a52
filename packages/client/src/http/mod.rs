//! Request and response values exchanged with the dispatcher

pub mod request;
pub mod response;

pub use request::RequestEntry;
pub use response::ResponseSummary;
