use ai_client::{Prompt, TextGenerator};
use keyscout_common::UiLanguage;
use tracing::debug;

use crate::error::ResearchError;
use crate::prompts;

/// Rewrite a free-form user prompt as an English system instruction.
/// An empty reply hands back the input unchanged.
pub async fn translate_prompt(
    generator: &dyn TextGenerator,
    user_prompt: &str,
) -> Result<String, ResearchError> {
    let text = generator
        .generate(Prompt::new(prompts::optimize_prompt_request(user_prompt)))
        .await?;
    Ok(or_original(text, user_prompt))
}

/// Translate reference text into Chinese or English.
pub async fn translate_text(
    generator: &dyn TextGenerator,
    text: &str,
    target: UiLanguage,
) -> Result<String, ResearchError> {
    debug!(target = target.code(), chars = text.chars().count(), "Translating text");
    let translated = generator
        .generate(Prompt::new(prompts::translate_text_request(text, target)))
        .await?;
    Ok(or_original(translated, text))
}

fn or_original(reply: String, original: &str) -> String {
    if reply.trim().is_empty() {
        original.to_string()
    } else {
        reply
    }
}
