mod client;
pub(crate) mod schema;
pub(crate) mod types;

pub use schema::ResponseSchema;

use async_trait::async_trait;
use tracing::warn;

use crate::error::AiError;
use crate::traits::{Prompt, TextGenerator};

use client::GeminiClient;
use types::GenerateContentRequest;

// =============================================================================
// Gemini Agent
// =============================================================================

/// Gemini `generateContent` reached through an API relay.
#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
}

impl Gemini {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn client(&self) -> GeminiClient {
        let client = GeminiClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    /// Plain completion with no system instruction.
    pub async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        self.generate(Prompt::new(prompt)).await
    }
}

#[async_trait]
impl TextGenerator for Gemini {
    async fn generate(&self, prompt: Prompt) -> Result<String, AiError> {
        let model = prompt.options.model.as_deref().unwrap_or(&self.model);
        let request = GenerateContentRequest::from_prompt(&prompt);

        let response = self.client().generate_content(model, &request).await?;

        response.text().ok_or_else(|| {
            warn!(model, "Gemini reply carried no text content");
            AiError::EmptyResponse
        })
    }
}
