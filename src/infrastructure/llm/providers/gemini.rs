//! Google Gemini Provider

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::infrastructure::llm::config::DEFAULT_MODEL;
use crate::infrastructure::llm::{LLMError, LLMMessage, LLMResponse, LLMResult, LLMUsage, LLM};

/// Gemini API endpoint
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini provider
pub struct GeminiProvider {
    api_key: String,
    client: Client,
    model: String,
    base: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>, model: Option<&str>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            base: API_BASE.to_string(),
        }
    }

    /// Point the provider at another host (proxies, tests)
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Get generateContent URL for a model
    fn base_url(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:generateContent", self.base, model)
    }
}

/// API request structure
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Debug)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// API response structure
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}

/// Error envelope returned with non-2xx statuses
#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    message: String,
}

/// Split messages into Gemini contents plus an optional system instruction
fn to_contents(messages: Vec<LLMMessage>) -> (Vec<GeminiContent>, Option<GeminiContent>) {
    let mut system = Vec::new();
    let mut contents = Vec::new();

    for msg in messages {
        let part = Part { text: Some(msg.content) };
        match msg.role.as_str() {
            "system" => system.push(part),
            "assistant" => contents.push(GeminiContent {
                role: Some("model".to_string()),
                parts: vec![part],
            }),
            _ => contents.push(GeminiContent {
                role: Some("user".to_string()),
                parts: vec![part],
            }),
        }
    }

    let system = if system.is_empty() {
        None
    } else {
        Some(GeminiContent { role: None, parts: system })
    };
    (contents, system)
}

/// Pull the provider's message out of an error body, falling back to the raw text
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) => env.error.message,
        Err(_) if body.trim().is_empty() => format!("status: {}", status),
        Err(_) => format!("status: {}, body: {}", status, body.trim()),
    }
}

#[async_trait]
impl LLM for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn chat(
        &self,
        messages: Vec<LLMMessage>,
        model: Option<&str>,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> LLMResult<LLMResponse> {
        if self.api_key.is_empty() {
            return Err(LLMError::MissingApiKey);
        }
        let model = model.unwrap_or(&self.model);

        let (contents, system_instruction) = to_contents(messages);
        if contents.is_empty() {
            return Err(LLMError::InvalidRequest("No user content".to_string()));
        }

        let generation_config = if temperature.is_some() || max_tokens.is_some() {
            Some(GenerationConfig {
                temperature,
                max_output_tokens: max_tokens,
            })
        } else {
            None
        };

        let request = GenerateRequest {
            contents,
            system_instruction,
            generation_config,
        };

        let response = self.client
            .post(self.base_url(model))
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(status, &body);
            if status == 429 {
                return Err(LLMError::RateLimited(message));
            }
            return Err(LLMError::ApiError(message));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(e.to_string()))?;

        let usage = generated.usage_metadata.map(|u| LLMUsage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        let candidate = generated.candidates
            .into_iter()
            .next()
            .ok_or(LLMError::EmptyResponse)?;

        let content: String = candidate.content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(LLMError::EmptyResponse);
        }

        Ok(LLMResponse {
            content,
            model: generated.model_version.unwrap_or_else(|| model.to_string()),
            usage,
            finish_reason: candidate.finish_reason,
        })
    }
}
