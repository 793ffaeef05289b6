use ai_client::AiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResearchError {
    #[error("Model call failed: {0}")]
    Model(#[from] AiError),

    #[error("Failed to generate strategy report: {0}")]
    Strategy(#[source] AiError),
}
