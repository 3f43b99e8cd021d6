// ABOUTME: Error types for exec sessions over WebSocket

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid terminal URL: {0}")]
    InvalidUrl(String),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Session is not connected")]
    Closed,
}

impl From<url::ParseError> for SessionError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for SessionError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Connect(err.to_string())
    }
}
