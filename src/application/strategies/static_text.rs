use async_trait::async_trait;
use super::{ResponseStrategy, StrategyResult};

/// Always answers with the same text
pub struct StaticText {
    text: String,
}

impl StaticText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl ResponseStrategy for StaticText {
    fn name(&self) -> &str {
        "static"
    }

    async fn respond(&self, _text: &str) -> StrategyResult {
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ignores_input() {
        let strategy = StaticText::new("https://regist.pn.psu.ac.th/");
        assert_eq!(strategy.respond("anything").await.unwrap(), "https://regist.pn.psu.ac.th/");
    }
}
