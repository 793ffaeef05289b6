use async_trait::async_trait;

use crate::error::AiError;

// =============================================================================
// Prompt
// =============================================================================

/// Per-call knobs for a generation request.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Overrides the client's default model for this call only.
    pub model: Option<String>,
    /// Ask the model for a bare JSON reply.
    pub json: bool,
    /// Response schema hint. Only sent when `json` is set.
    pub schema: Option<serde_json::Value>,
}

/// A single-shot prompt: optional system instruction plus one user turn.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub system: Option<String>,
    pub user: String,
    pub options: GenerateOptions,
}

impl Prompt {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
            options: GenerateOptions::default(),
        }
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        let system = system.into();
        self.system = if system.trim().is_empty() {
            None
        } else {
            Some(system)
        };
        self
    }

    pub fn json(mut self) -> Self {
        self.options.json = true;
        self
    }

    pub fn schema(mut self, schema: serde_json::Value) -> Self {
        self.options.json = true;
        self.options.schema = Some(schema);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.options.model = Some(model.into());
        self
    }
}

// =============================================================================
// TextGenerator Trait
// =============================================================================

/// Anything that turns a prompt into the model's first textual completion.
///
/// Implementations perform exactly one upstream call and never retry.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: Prompt) -> Result<String, AiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_system_instruction_is_dropped() {
        let prompt = Prompt::new("hi").system("   ");
        assert!(prompt.system.is_none());
    }

    #[test]
    fn schema_implies_json() {
        let prompt = Prompt::new("hi").schema(serde_json::json!({"type": "object"}));
        assert!(prompt.options.json);
        assert!(prompt.options.schema.is_some());
    }
}
