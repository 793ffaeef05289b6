use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid address: {0}")]
    Address(String),
}

impl SessionError {
    /// Failures worth retrying against the same-origin endpoint.
    pub fn warrants_fallback(&self) -> bool {
        match self {
            SessionError::Network(_) => true,
            SessionError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        SessionError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::Storage(err.to_string())
    }
}
