use async_trait::async_trait;
use std::sync::Arc;
use crate::application::errors::StrategyError;
use crate::infrastructure::llm::{LLMConfig, LLMError, LLMMessage, LLM};
use super::{ResponseStrategy, StrategyResult};

/// Answers with a language-model completion of `persona + text`
pub struct CompletionStrategy {
    llm: Arc<dyn LLM>,
    config: LLMConfig,
}

impl CompletionStrategy {
    pub fn new(llm: Arc<dyn LLM>, config: LLMConfig) -> Self {
        Self { llm, config }
    }
}

#[async_trait]
impl ResponseStrategy for CompletionStrategy {
    fn name(&self) -> &str {
        "completion"
    }

    async fn respond(&self, text: &str) -> StrategyResult {
        let messages = vec![LLMMessage::user(self.config.prompt_for(text))];

        let response = self.llm
            .chat(messages, None, self.config.temperature, self.config.max_tokens)
            .await
            .map_err(|e| {
                tracing::warn!("{} completion failed: {}", self.llm.name(), e);
                match e {
                    LLMError::EmptyResponse => StrategyError::EmptyCompletion,
                    other => StrategyError::Generation(other.to_string()),
                }
            })?;

        let content = response.content.trim();
        if content.is_empty() {
            return Err(StrategyError::EmptyCompletion);
        }
        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::{LLMResponse, LLMResult};
    use std::sync::Mutex;

    /// Replies with a canned result and records the prompt
    struct CannedLLM {
        result: LLMResult<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedLLM {
        fn new(result: LLMResult<String>) -> Self {
            Self { result, prompts: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl LLM for CannedLLM {
        fn name(&self) -> &str {
            "canned"
        }

        async fn chat(
            &self,
            messages: Vec<LLMMessage>,
            _model: Option<&str>,
            _temperature: Option<f32>,
            _max_tokens: Option<u32>,
        ) -> LLMResult<LLMResponse> {
            self.prompts.lock().unwrap().extend(messages.into_iter().map(|m| m.content));
            self.result.clone().map(|content| LLMResponse {
                content,
                model: "canned".to_string(),
                usage: None,
                finish_reason: None,
            })
        }
    }

    fn config() -> LLMConfig {
        LLMConfig { persona: "[persona] ".to_string(), ..LLMConfig::default() }
    }

    #[tokio::test]
    async fn test_prompt_is_persona_plus_text_and_reply_trimmed() {
        let llm = Arc::new(CannedLLM::new(Ok("  เปิดเทอม 1 มิ.ย.\n".to_string())));
        let strategy = CompletionStrategy::new(llm.clone(), config());

        assert_eq!(strategy.respond("เปิดเทอมเมื่อไหร่").await.unwrap(), "เปิดเทอม 1 มิ.ย.");
        assert_eq!(*llm.prompts.lock().unwrap(), vec!["[persona] เปิดเทอมเมื่อไหร่".to_string()]);
    }

    #[tokio::test]
    async fn test_failure_carries_provider_message() {
        let llm = Arc::new(CannedLLM::new(Err(LLMError::ApiError("quota exceeded".to_string()))));
        let strategy = CompletionStrategy::new(llm, config());

        assert_eq!(
            strategy.respond("hi").await,
            Err(StrategyError::Generation("quota exceeded".to_string()))
        );
    }

    #[tokio::test]
    async fn test_blank_text_is_empty_completion() {
        let strategy = CompletionStrategy::new(Arc::new(CannedLLM::new(Ok("   ".to_string()))), config());
        assert_eq!(strategy.respond("hi").await, Err(StrategyError::EmptyCompletion));

        let strategy = CompletionStrategy::new(Arc::new(CannedLLM::new(Err(LLMError::EmptyResponse))), config());
        assert_eq!(strategy.respond("hi").await, Err(StrategyError::EmptyCompletion));
    }
}
