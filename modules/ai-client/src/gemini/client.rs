use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tracing::{debug, warn};

use super::types::*;
use crate::error::AiError;

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.302.ai";

pub(crate) struct GeminiClient {
    api_key: String,
    http: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn headers(&self) -> Result<HeaderMap, AiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| AiError::Config(format!("invalid API key header: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/v1/v1beta/models/{}:generateContent", self.base_url, model)
    }

    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AiError> {
        let url = self.endpoint(model);

        debug!(model, turns = request.contents.len(), "Gemini generateContent request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, model, "Gemini upstream returned an error status");
            return Err(AiError::Upstream { status, body });
        }

        let decoded: GenerateContentResponse = response.json().await?;
        if let Some(error) = &decoded.error {
            return Err(AiError::Api(error.to_string()));
        }
        Ok(decoded)
    }
}
