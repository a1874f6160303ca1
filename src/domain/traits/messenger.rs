use async_trait::async_trait;
use crate::domain::entities::OutgoingReply;
use crate::application::errors::BotError;

/// Messenger trait - abstraction for the messaging platform's reply API
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send one text reply using the message's reply token
    async fn reply(&self, reply: &OutgoingReply) -> Result<(), BotError>;

    /// Platform name, for logs
    fn name(&self) -> &str;
}
