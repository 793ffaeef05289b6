use std::time::Duration;

use ai_client::{extract_json_payload, Prompt, ResponseSchema, TextGenerator};
use futures::future::join_all;
use keyscout_common::{DomainType, KeywordRecord, Outcome, Probability, UiLanguage};
use schemars::JsonSchema;
use serde::Deserialize;
use serp_client::SerpSnapshot;
use tracing::{info, warn};

use crate::error::ResearchError;
use crate::prompts;
use crate::traits::SerpSource;

const DEFAULT_BATCH_SIZE: usize = 3;
const DEFAULT_BATCH_PAUSE: Duration = Duration::from_secs(1);

/// Concurrency knobs for the analysis step.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Keywords analysed concurrently per batch.
    pub batch_size: usize,
    /// Pause between batches. Not applied after the last one.
    pub pause: Duration,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            pause: DEFAULT_BATCH_PAUSE,
        }
    }
}

/// The model's judgement for one keyword.
#[derive(Debug, Deserialize, JsonSchema)]
struct Verdict {
    probability: Probability,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Estimate page-1 probability for every keyword.
///
/// Keywords run in batches of `options.batch_size`; a batch finishes before
/// the next starts. The result has the same length and order as the input,
/// and a failure on one keyword never affects another.
pub async fn analyze_ranking(
    generator: &dyn TextGenerator,
    serp: &dyn SerpSource,
    keywords: Vec<KeywordRecord>,
    system_instruction: &str,
    ui: UiLanguage,
    target_language: &str,
    options: &AnalysisOptions,
) -> Vec<KeywordRecord> {
    let batch_size = options.batch_size.max(1);
    let total = keywords.len();
    let mut analysed = Vec::with_capacity(total);

    info!(total, batch_size, "Analysing keywords");

    for (index, batch) in keywords.chunks(batch_size).enumerate() {
        let futures = batch.iter().map(|record| {
            let language = record.language_or(target_language);
            let language = if language.trim().is_empty() { "en" } else { language };
            analyze_keyword(generator, serp, record, system_instruction, ui, language)
        });

        let outcomes = join_all(futures).await;

        for (record, outcome) in batch.iter().zip(outcomes) {
            analysed.push(settle(record, outcome, ui));
        }

        let done = (index + 1) * batch_size;
        if done < total && !options.pause.is_zero() {
            tokio::time::sleep(options.pause).await;
        }
    }

    analysed
}

/// Analyse one keyword against its live SERP.
///
/// `Degraded` means the model replied but the verdict was unreadable, so the
/// record carries the `Medium` fallback. `Failed` means no verdict at all.
pub async fn analyze_keyword(
    generator: &dyn TextGenerator,
    serp: &dyn SerpSource,
    record: &KeywordRecord,
    system_instruction: &str,
    ui: UiLanguage,
    language: &str,
) -> Outcome<KeywordRecord, ResearchError> {
    let snapshot = serp.fetch(&record.keyword, language).await;

    let prompt = Prompt::new(prompts::analysis_prompt(&record.keyword))
        .system(prompts::analysis_instruction(
            system_instruction,
            &record.keyword,
            snapshot.as_ref(),
            ui,
        ))
        .schema(Verdict::response_schema());

    let text = match generator.generate(prompt).await {
        Ok(text) => text,
        Err(e) => return Outcome::Failed(e.into()),
    };

    let (verdict, decode_error) = match extract_json_payload::<Verdict>(&text) {
        Ok(verdict) => (verdict, None),
        Err(e) => {
            let fallback = Verdict {
                probability: Probability::Medium,
                reasoning: Some(prompts::unparsable_verdict_note(ui).to_string()),
            };
            (fallback, Some(ResearchError::from(e)))
        }
    };

    let reasoning = verdict
        .reasoning
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| prompts::missing_reasoning_note(ui).to_string());
    let (probability, reasoning) =
        apply_serp_overrides(verdict.probability, reasoning, snapshot.as_ref(), ui);

    let mut analysed = record.clone();
    analysed.probability = Some(probability);
    analysed.reasoning = Some(reasoning);
    match snapshot {
        Some(snapshot) => {
            analysed.serp_result_count = Some(snapshot.result_count);
            analysed.top_domain_type = Some(snapshot.top_domain_type);
            analysed.top_serp_snippets = snapshot.snippets;
        }
        None => {
            analysed.serp_result_count = Some(-1);
            analysed.top_domain_type = Some(DomainType::Unknown);
            analysed.top_serp_snippets = Vec::new();
        }
    }

    match decode_error {
        None => Outcome::Ok(analysed),
        Some(e) => Outcome::Degraded(analysed, e),
    }
}

/// Adjust the model's label with hard SERP evidence.
///
/// A sparse page forces `High`. Otherwise a `Medium` verdict moves up for
/// weak competition and down for strong competition. Every override
/// prefixes its own rationale.
pub fn apply_serp_overrides(
    probability: Probability,
    reasoning: String,
    snapshot: Option<&SerpSnapshot>,
    ui: UiLanguage,
) -> (Probability, String) {
    let Some(snapshot) = snapshot else {
        return (probability, reasoning);
    };

    if snapshot.is_sparse() {
        let note = prompts::blue_ocean_note(snapshot.result_count, ui);
        return (Probability::High, format!("{note} {reasoning}"));
    }

    let domain = snapshot.top_domain_type;
    match probability {
        Probability::Medium if domain.is_weak_competition() => (
            Probability::High,
            format!("{} {reasoning}", prompts::weak_competition_note(ui)),
        ),
        Probability::Medium if domain.is_strong_competition() => (
            Probability::Low,
            format!("{} {reasoning}", prompts::strong_competition_note(ui)),
        ),
        _ => (probability, reasoning),
    }
}

/// Turn a per-keyword outcome into the record that goes back to the caller.
fn settle(
    input: &KeywordRecord,
    outcome: Outcome<KeywordRecord, ResearchError>,
    ui: UiLanguage,
) -> KeywordRecord {
    match outcome {
        Outcome::Ok(record) => record,
        Outcome::Degraded(record, cause) => {
            warn!(keyword = %record.keyword, error = %cause, "Unreadable verdict, defaulted to Medium");
            record
        }
        Outcome::Failed(cause) => {
            warn!(keyword = %input.keyword, error = %cause, "Keyword analysis failed");
            failed_record(input, ui)
        }
    }
}

fn failed_record(input: &KeywordRecord, ui: UiLanguage) -> KeywordRecord {
    let mut record = input.clone();
    record.probability = Some(Probability::Low);
    record.reasoning = Some(prompts::analysis_failed_note(ui).to_string());
    record.serp_result_count = Some(-1);
    record.top_domain_type = Some(DomainType::Unknown);
    record.top_serp_snippets = Vec::new();
    record
}
