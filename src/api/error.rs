// ABOUTME: Error types for calls against the management backend
// Non-2xx responses keep the body so the UI can show the server's own message

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Connection failed: {0}")]
    Transport(String),

    #[error("{}", status_message(*.status, .body))]
    Status { status: u16, body: String },

    #[error("Session expired, please log in again")]
    Unauthorized,

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Unauthorized => Some(401),
            _ => None,
        }
    }
}

fn status_message(status: u16, body: &str) -> String {
    let body = body.trim_end();
    if body.is_empty() {
        format!("HTTP {status}")
    } else {
        body.to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
