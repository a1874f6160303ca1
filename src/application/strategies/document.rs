use async_trait::async_trait;
use crate::application::errors::StrategyError;
use crate::infrastructure::documents::PdfReader;
use super::{ResponseStrategy, StrategyResult};

/// Answers with the text of a fixed local PDF
pub struct DocumentStrategy {
    reader: PdfReader,
}

impl DocumentStrategy {
    pub fn new(reader: PdfReader) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl ResponseStrategy for DocumentStrategy {
    fn name(&self) -> &str {
        "document"
    }

    async fn respond(&self, _text: &str) -> StrategyResult {
        self.reader.read_async().await.map_err(|e| {
            tracing::warn!("Failed to read {}: {}", self.reader.path().display(), e);
            StrategyError::Document(e)
        })
    }
}
