use ai_client::{extract_json_payload, Prompt, ResponseSchema, TextGenerator};
use keyscout_common::types::lenient_count;
use keyscout_common::{Intent, KeywordRecord, Outcome};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ResearchError;
use crate::prompts;

/// Inputs for one generation round.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub seed_keyword: String,
    pub target_language: String,
    pub system_instruction: String,
    pub existing_keywords: Vec<String>,
    /// 1 for the first round; anything higher asks for lateral keywords.
    pub round_index: u32,
}

impl GenerationRequest {
    pub fn new(seed_keyword: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            seed_keyword: seed_keyword.into(),
            target_language: target_language.into(),
            system_instruction: String::new(),
            existing_keywords: Vec::new(),
            round_index: 1,
        }
    }
}

/// One keyword as the model returns it.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GeneratedKeyword {
    pub keyword: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub intent: Intent,
    #[serde(default, deserialize_with = "lenient_count")]
    #[schemars(with = "u64")]
    pub volume: u64,
}

/// Models sometimes wrap the list in an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum GeneratedBatch {
    List(Vec<GeneratedKeyword>),
    Wrapped { keywords: Vec<GeneratedKeyword> },
}

impl From<GeneratedBatch> for Vec<GeneratedKeyword> {
    fn from(batch: GeneratedBatch) -> Self {
        match batch {
            GeneratedBatch::List(list) | GeneratedBatch::Wrapped { keywords: list } => list,
        }
    }
}

/// Ask the model for ten keywords around the seed.
///
/// Never fails outright: a transport or decode problem yields an empty list
/// marked `Degraded` with the cause attached.
pub async fn generate_keywords(
    generator: &dyn TextGenerator,
    request: &GenerationRequest,
) -> Outcome<Vec<KeywordRecord>, ResearchError> {
    let prompt = Prompt::new(prompts::generation_prompt(
        &request.seed_keyword,
        &request.target_language,
        &request.existing_keywords,
        request.round_index,
    ))
    .system(request.system_instruction.as_str())
    .schema(Vec::<GeneratedKeyword>::response_schema());

    let generated = match request_keywords(generator, prompt).await {
        Ok(generated) => generated,
        Err(e) => {
            warn!(
                seed = %request.seed_keyword,
                round = request.round_index,
                error = %e,
                "Keyword generation failed"
            );
            return Outcome::Degraded(Vec::new(), e);
        }
    };

    let records: Vec<KeywordRecord> = generated
        .into_iter()
        .filter(|g| !g.keyword.trim().is_empty())
        .map(|g| into_record(g, &request.target_language))
        .collect();

    info!(
        seed = %request.seed_keyword,
        round = request.round_index,
        count = records.len(),
        "Generated keywords"
    );

    Outcome::Ok(records)
}

async fn request_keywords(
    generator: &dyn TextGenerator,
    prompt: Prompt,
) -> Result<Vec<GeneratedKeyword>, ResearchError> {
    let text = generator.generate(prompt).await?;
    let batch: GeneratedBatch = extract_json_payload(&text)?;
    Ok(batch.into())
}

fn into_record(generated: GeneratedKeyword, target_language: &str) -> KeywordRecord {
    let mut record = KeywordRecord::new(generated.keyword);
    record.id = format!("kw-{}", Uuid::new_v4());
    record.translation = generated.translation;
    record.intent = generated.intent;
    record.volume = generated.volume;
    record.target_language = Some(target_language.to_string());
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{schema_types, MockGenerator};

    #[tokio::test]
    async fn records_get_ids_and_language() {
        let generator = MockGenerator::new().reply(
            r#"[{"keyword": "pet id card", "translation": "宠物身份证", "intent": "Commercial", "volume": 900},
                {"keyword": "fake dog passport", "translation": "假狗护照", "intent": "Transactional", "volume": "1,200"}]"#,
        );
        let request = GenerationRequest::new("ai pet photos", "fr");

        let records = generate_keywords(&generator, &request).await.into_result().unwrap();

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.id.starts_with("kw-")));
        assert_ne!(records[0].id, records[1].id);
        assert!(records.iter().all(|r| r.target_language.as_deref() == Some("fr")));
        assert_eq!(records[1].volume, 1200);
    }

    #[tokio::test]
    async fn wrapped_list_is_accepted() {
        let generator = MockGenerator::new()
            .reply(r#"{"keywords": [{"keyword": "cat genealogy", "intent": "Informational", "volume": 40}]}"#);
        let records = generate_keywords(&generator, &GenerationRequest::new("cats", "en"))
            .await
            .into_result()
            .unwrap();
        assert_eq!(records[0].keyword, "cat genealogy");
    }

    #[tokio::test]
    async fn request_carries_system_instruction_and_schema() {
        let generator = MockGenerator::new().reply("[]");
        let mut request = GenerationRequest::new("cats", "en");
        request.system_instruction = "You are an SEO expert.".into();

        let _ = generate_keywords(&generator, &request).await;

        let prompt = generator.last_prompt().unwrap();
        assert_eq!(prompt.system.as_deref(), Some("You are an SEO expert."));
        assert!(prompt.options.json);
        assert_eq!(prompt.options.schema.as_ref().unwrap()["type"], "array");
    }

    #[test]
    fn keyword_batch_schema_uses_single_gemini_types() {
        let types = schema_types(&Vec::<GeneratedKeyword>::response_schema());

        assert!(!types.is_empty());
        assert!(types.iter().all(|t| t.is_string()), "{types:?}");
    }
}
