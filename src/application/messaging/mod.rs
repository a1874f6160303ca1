//! Message handling - Intent dispatch

pub mod dispatcher;

pub use dispatcher::{IntentDispatcher, Route};
