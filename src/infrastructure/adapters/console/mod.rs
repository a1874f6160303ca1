//! Console messenger for development/testing

use async_trait::async_trait;
use tokio::sync::mpsc;
use crate::domain::entities::OutgoingReply;
use crate::domain::traits::Messenger;
use crate::application::errors::BotError;

/// Prints replies instead of calling the LINE API
pub struct ConsoleMessenger {
    sender: Option<mpsc::Sender<OutgoingReply>>,
}

impl ConsoleMessenger {
    pub fn new() -> Self {
        Self { sender: None }
    }

    /// Also forward every reply to a channel
    pub fn with_sender(mut self, sender: mpsc::Sender<OutgoingReply>) -> Self {
        self.sender = Some(sender);
        self
    }
}

impl Default for ConsoleMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Messenger for ConsoleMessenger {
    async fn reply(&self, reply: &OutgoingReply) -> Result<(), BotError> {
        println!("[reply {}] {}", reply.reply_token, reply.text);
        if let Some(sender) = &self.sender {
            sender
                .send(reply.clone())
                .await
                .map_err(|e| BotError::Internal(e.to_string()))?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reply_is_forwarded() {
        let (tx, mut rx) = mpsc::channel(1);
        let messenger = ConsoleMessenger::new().with_sender(tx);
        let reply = OutgoingReply { reply_token: "r1".to_string(), text: "hi".to_string() };

        messenger.reply(&reply).await.unwrap();

        assert_eq!(rx.recv().await, Some(reply));
    }
}
