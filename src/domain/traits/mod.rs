//! Domain traits - Abstractions for infrastructure implementations

pub mod interaction_log;
pub mod messenger;

pub use interaction_log::{DisabledLog, InteractionLog};
pub use messenger::Messenger;
