//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Adapters: Platform integrations (LINE, console)
//! - Server: The webhook HTTP endpoint
//! - LLM: Gemini completions
//! - Webcrawler, Documents: Page and PDF text extraction
//! - Sheets: Google Sheets interaction log

pub mod adapters;
pub mod config;
pub mod documents;
pub mod llm;
pub mod server;
pub mod sheets;
pub mod webcrawler;
