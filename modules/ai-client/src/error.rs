use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("Model returned no text content")]
    EmptyResponse,

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        AiError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for AiError {
    fn from(e: serde_json::Error) -> Self {
        AiError::Parse(e.to_string())
    }
}
