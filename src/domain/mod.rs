//! Domain layer - Core business objects with no external dependencies
//! 
//! This layer contains:
//! - Entities: Incoming messages, outgoing replies, logged interactions, intents
//! - Traits: Abstractions for infrastructure (Messenger, InteractionLog)

pub mod entities;
pub mod traits;
