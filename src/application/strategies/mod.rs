//! Response strategies - One per intent

pub mod completion;
pub mod document;
pub mod static_text;
pub mod web_page;

use async_trait::async_trait;
use crate::application::errors::StrategyError;

pub use completion::CompletionStrategy;
pub use document::DocumentStrategy;
pub use static_text::StaticText;
pub use web_page::WebPageStrategy;

/// Reply text, or the categorized reason there is none
pub type StrategyResult = Result<String, StrategyError>;

/// A way of answering a message
#[async_trait]
pub trait ResponseStrategy: Send + Sync {
    fn name(&self) -> &str;

    async fn respond(&self, text: &str) -> StrategyResult;
}
