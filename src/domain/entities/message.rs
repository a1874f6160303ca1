use chrono::{DateTime, Utc};

/// Where a LINE message came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageSource {
    User(String),
    Group(String),
    Room(String),
    Unknown,
}

impl MessageSource {
    pub fn as_str(&self) -> &str {
        match self {
            MessageSource::User(id) | MessageSource::Group(id) | MessageSource::Room(id) => id,
            MessageSource::Unknown => "unknown",
        }
    }
}

/// A text message delivered by the webhook
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub message_id: String,
    /// Single-use handle for answering this message
    pub reply_token: String,
    pub text: String,
    pub source: MessageSource,
    pub received_at: DateTime<Utc>,
}

impl IncomingMessage {
    pub fn new(reply_token: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            message_id: uuid::Uuid::new_v4().to_string(),
            reply_token: reply_token.into(),
            text: text.into(),
            source: MessageSource::Unknown,
            received_at: Utc::now(),
        }
    }

    pub fn with_message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = id.into();
        self
    }

    pub fn with_source(mut self, source: MessageSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_received_at(mut self, at: DateTime<Utc>) -> Self {
        self.received_at = at;
        self
    }

    /// Build the reply answering this message. Consumes the token.
    pub fn reply(self, text: impl Into<String>) -> OutgoingReply {
        OutgoingReply {
            reply_token: self.reply_token,
            text: text.into(),
        }
    }
}

/// A plain text reply paired with the token it answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingReply {
    pub reply_token: String,
    pub text: String,
}

/// One (question, answer) row for the interaction log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    pub question: String,
    pub answer: String,
}

impl Interaction {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    pub fn as_row(&self) -> [&str; 2] {
        [&self.question, &self.answer]
    }
}
