//! Error types for the homework bot

/// Errors that can occur in the homework bot
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("Malformed API response: {0}")]
    MalformedResponse(String),

    #[error("Missing fields: {0}")]
    MissingFields(String),

    #[error("Unknown homework status: {0}")]
    UnknownStatus(String),

    #[error("Endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("Unexpected HTTP status {status} from {endpoint}")]
    UnexpectedStatus { endpoint: String, status: u16 },

    #[error("Message delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("Configuration error: {0}")]
    FatalConfig(String),
}

impl BotError {
    /// Short label for the subsystem that produced this error
    pub fn category(&self) -> &'static str {
        match self {
            BotError::Unreachable(_) | BotError::UnexpectedStatus { .. } => "api",
            BotError::MalformedResponse(_)
            | BotError::MissingFields(_)
            | BotError::UnknownStatus(_) => "response",
            BotError::DeliveryFailed(_) => "telegram",
            BotError::FatalConfig(_) => "config",
        }
    }
}

/// Result type alias for homework bot operations
pub type Result<T> = std::result::Result<T, BotError>;
