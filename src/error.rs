use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Request timed out")]
    NetworkTimeout,
    #[error("Network error: {0}")]
    NetworkFailure(String),
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("Empty response from model")]
    EmptyResponse,
    /// Every strategy failed. The diagnostic is already user-facing.
    #[error("{diagnostic}")]
    ConnectionExhausted { diagnostic: String },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Session error: {0}")]
    SessionError(String),
    #[error("Persistence error: {0}")]
    PersistenceError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("{0}")]
    Other(String),
}

impl ChatError {
    /// Failures that let the dispatcher move on to the next strategy.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            ChatError::NetworkTimeout | ChatError::NetworkFailure(_) | ChatError::ApiError { .. }
        )
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatError::NetworkTimeout
        } else {
            ChatError::NetworkFailure(err.to_string())
        }
    }
}

impl From<anyhow::Error> for ChatError {
    fn from(err: anyhow::Error) -> Self {
        ChatError::Other(format!("{:#}", err))
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
