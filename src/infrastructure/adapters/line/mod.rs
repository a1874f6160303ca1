//! LINE Messaging API adapter
//!
//! Webhook signature checks, payload parsing and the reply API.

pub mod client;
pub mod signature;
pub mod webhook;

pub use client::LineClient;
pub use signature::{sign, verify_signature, SIGNATURE_HEADER};
pub use webhook::parse_events;
