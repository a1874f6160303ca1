use async_trait::async_trait;
use crate::domain::entities::Interaction;
use crate::application::errors::SheetsError;

/// InteractionLog trait - abstraction for the (question, answer) sink
#[async_trait]
pub trait InteractionLog: Send + Sync {
    /// Append one row
    async fn append(&self, interaction: &Interaction) -> Result<(), SheetsError>;
}

/// Used when no spreadsheet credentials are configured
pub struct DisabledLog;

#[async_trait]
impl InteractionLog for DisabledLog {
    async fn append(&self, interaction: &Interaction) -> Result<(), SheetsError> {
        tracing::debug!("Interaction log disabled, dropping row for: {}", interaction.question);
        Ok(())
    }
}
