use serde::{Deserialize, Serialize};

use crate::traits::Prompt;

pub(crate) const MAX_OUTPUT_TOKENS: u32 = 8192;

const SYSTEM_ACK: &str = "Understood. I will follow these instructions.";
const JSON_ONLY_NOTE: &str = "\n\nPlease respond with valid JSON only, no markdown formatting.";

// =============================================================================
// Contents
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role: Some(role),
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }
}

// =============================================================================
// Request
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    pub max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Lay a prompt out as relay-compatible turns.
    ///
    /// The relay does not accept a `systemInstruction` field, so the system
    /// text travels as a leading user turn acknowledged by the model.
    pub fn from_prompt(prompt: &Prompt) -> Self {
        let mut contents = Vec::with_capacity(3);
        if let Some(system) = &prompt.system {
            contents.push(Content::text(Role::User, system.clone()));
            contents.push(Content::text(Role::Model, SYSTEM_ACK));
        }

        let mut user = prompt.user.clone();
        let mut config = GenerationConfig {
            max_output_tokens: MAX_OUTPUT_TOKENS,
            response_mime_type: None,
            response_schema: None,
        };

        if prompt.options.json {
            if !user.contains("JSON") && !user.contains("json") {
                user.push_str(JSON_ONLY_NOTE);
            }
            if let Some(schema) = &prompt.options.schema {
                config.response_mime_type = Some("application/json".to_string());
                config.response_schema = Some(schema.clone());
            }
        }
        contents.push(Content::text(Role::User, user));

        Self {
            contents,
            generation_config: config,
        }
    }
}

// =============================================================================
// Response
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Some relay deployments flatten the completion into `output`.
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl GenerateContentResponse {
    /// First candidate's first text part, else the flattened `output`.
    pub fn text(&self) -> Option<String> {
        let candidate_text = self
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.clone())
            .filter(|t| !t.is_empty());

        candidate_text.or_else(|| self.output.clone().filter(|t| !t.is_empty()))
    }
}
