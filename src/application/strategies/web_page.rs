use async_trait::async_trait;
use crate::application::errors::StrategyError;
use crate::infrastructure::webcrawler::WebCrawler;
use super::{ResponseStrategy, StrategyResult};

/// Answers with the visible text of a fixed page
pub struct WebPageStrategy {
    crawler: WebCrawler,
    url: String,
}

impl WebPageStrategy {
    pub fn new(crawler: WebCrawler, url: impl Into<String>) -> Self {
        Self { crawler, url: url.into() }
    }
}

#[async_trait]
impl ResponseStrategy for WebPageStrategy {
    fn name(&self) -> &str {
        "web-page"
    }

    async fn respond(&self, _text: &str) -> StrategyResult {
        match self.crawler.fetch(&self.url).await {
            Ok(content) if content.is_empty() => {
                Err(StrategyError::Fetch(format!("{} has no visible text", self.url)))
            }
            Ok(content) => Ok(content),
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", self.url, e);
                Err(StrategyError::Fetch(e))
            }
        }
    }
}
