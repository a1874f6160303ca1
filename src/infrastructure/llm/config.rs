//! LLM Configuration

use serde::{Deserialize, Serialize};

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Persona prefixed to every user prompt
pub const DEFAULT_PERSONA: &str = "คุณคือผู้ช่วยตอบคำถามงานทะเบียนของมหาวิทยาลัยสงขลานครินทร์ วิทยาเขตปัตตานี \
ตอบเป็นภาษาไทยอย่างสุภาพ กระชับ และถูกต้อง\n\nคำถาม: ";

/// LLM Configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LLMConfig {
    /// Gemini API key
    pub api_key: Option<String>,

    /// Model name, with or without the `models/` prefix
    pub model: String,

    /// Default settings
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub persona: String,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
            persona: DEFAULT_PERSONA.to_string(),
        }
    }
}

impl LLMConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay environment variables onto this config
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    /// Overlay variables from any lookup (the process env in production)
    pub fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var("GEMINI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(model) = var("GEMINI_MODEL") {
            self.model = model;
        }
        if let Some(persona) = var("LLM_PERSONA") {
            self.persona = persona;
        }
        if let Some(temp) = var("LLM_TEMPERATURE") {
            if let Ok(t) = temp.parse() {
                self.temperature = Some(t);
            }
        }
    }

    /// Get API key, if set and non-empty
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Build the prompt sent to the model
    pub fn prompt_for(&self, text: &str) -> String {
        format!("{}{}", self.persona, text)
    }
}
