//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Categorized failure of a response strategy.
///
/// Rendered into user-facing text by `application::reply::render`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrategyError {
    /// Web page could not be fetched or read
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// PDF could not be opened or parsed
    #[error("document failed: {0}")]
    Document(String),

    /// The model answered with no text
    #[error("empty completion")]
    EmptyCompletion,

    /// The model call failed; carries the provider's message
    #[error("{0}")]
    Generation(String),
}

/// Spreadsheet logging errors
#[derive(Error, Debug)]
pub enum SheetsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Spreadsheet not found: {0}")]
    NotFound(String),

    #[error("API error: {0}")]
    Api(String),
}
