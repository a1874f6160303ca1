//! LINE Messaging API client

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::application::errors::BotError;
use crate::domain::entities::OutgoingReply;
use crate::domain::traits::Messenger;

/// LINE API base URL
const API_BASE: &str = "https://api.line.me";

/// Reply API client
pub struct LineClient {
    access_token: String,
    client: Client,
    base: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: Vec<TextMessage<'a>>,
}

#[derive(Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    message_type: &'static str,
    text: &'a str,
}

impl LineClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            client: Client::new(),
            base: API_BASE.to_string(),
        }
    }

    /// Point the client at another host (proxies, tests)
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the API URL for a path
    fn api_url(&self, path: &str) -> String {
        format!("{}/v2/bot/{}", self.base, path)
    }
}

#[async_trait]
impl Messenger for LineClient {
    async fn reply(&self, reply: &OutgoingReply) -> Result<(), BotError> {
        let request = ReplyRequest {
            reply_token: &reply.reply_token,
            messages: vec![TextMessage {
                message_type: "text",
                text: &reply.text,
            }],
        };

        let response = self.client
            .post(self.api_url("message/reply"))
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(BotError::Auth("LINE rejected the channel access token".to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Network(format!("LINE API error: {}, body: {}", status, body)));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "line"
    }
}
