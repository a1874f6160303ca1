//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Errors: Domain-specific errors
//! - Messaging: Intent dispatch
//! - Strategies: The four response strategies
//! - Reply: Rendering strategy outcomes into reply text
//! - Services: The per-message reply pipeline

pub mod errors;
pub mod messaging;
pub mod reply;
pub mod services;
pub mod strategies;
