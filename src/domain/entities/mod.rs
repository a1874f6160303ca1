//! Domain entities - Core business objects with no external dependencies

pub mod intent;
pub mod message;

pub use intent::Intent;
pub use message::{IncomingMessage, Interaction, MessageSource, OutgoingReply};
