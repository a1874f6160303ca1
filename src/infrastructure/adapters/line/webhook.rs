//! LINE webhook payload types

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::application::errors::BotError;
use crate::domain::entities::{IncomingMessage, MessageSource};

/// Top-level webhook body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: String,
    pub reply_token: Option<String>,
    pub timestamp: Option<i64>,
    pub source: Option<Source>,
    pub message: Option<EventMessage>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(rename = "type")]
    pub source_type: String,
    pub user_id: Option<String>,
    pub group_id: Option<String>,
    pub room_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventMessage {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub message_type: String,
    pub text: Option<String>,
}

impl From<&Source> for MessageSource {
    fn from(source: &Source) -> Self {
        let id = match source.source_type.as_str() {
            "group" => source.group_id.clone().map(MessageSource::Group),
            "room" => source.room_id.clone().map(MessageSource::Room),
            _ => source.user_id.clone().map(MessageSource::User),
        };
        id.unwrap_or(MessageSource::Unknown)
    }
}

impl Event {
    /// Convert into an incoming message if this is a text message with a reply token
    pub fn into_incoming(self) -> Option<IncomingMessage> {
        if self.event_type != "message" {
            return None;
        }
        let message = self.message?;
        if message.message_type != "text" {
            return None;
        }
        let text = message.text?;
        let reply_token = self.reply_token.filter(|t| !t.is_empty())?;

        let mut incoming = IncomingMessage::new(reply_token, text);
        if let Some(id) = message.id {
            incoming = incoming.with_message_id(id);
        }
        if let Some(source) = &self.source {
            incoming = incoming.with_source(source.into());
        }
        if let Some(at) = self.timestamp.and_then(|ms| Utc.timestamp_millis_opt(ms).single()) {
            incoming = incoming.with_received_at(at);
        }
        Some(incoming)
    }
}

/// Parse a verified webhook body into the text messages it carries
pub fn parse_events(body: &[u8]) -> Result<Vec<IncomingMessage>, BotError> {
    let payload: WebhookPayload = serde_json::from_slice(body)
        .map_err(|e| BotError::Parse(format!("Invalid webhook body: {}", e)))?;

    let total = payload.events.len();
    let messages: Vec<IncomingMessage> = payload.events
        .into_iter()
        .filter_map(Event::into_incoming)
        .collect();

    if messages.len() < total {
        tracing::debug!("Ignored {} non-text events", total - messages.len());
    }

    Ok(messages)
}
