use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde::Deserialize;
use tracing::info;

use keyscout_common::{KeywordRecord, UiLanguage};
use keyscout_research::GenerationRequest;

use super::required;
use crate::error::ApiError;
use crate::AppState;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateBody {
    seed_keyword: Option<String>,
    target_language: Option<String>,
    system_instruction: Option<String>,
    existing_keywords: Option<Vec<String>>,
    round_index: Option<u32>,
}

/// `POST /api/generate-keywords`. Generation trouble answers `{"keywords": []}`.
pub async fn generate_keywords(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(body) = body?;
    let request = GenerationRequest {
        seed_keyword: required(&body.seed_keyword)?.to_string(),
        target_language: required(&body.target_language)?.to_string(),
        system_instruction: required(&body.system_instruction)?.to_string(),
        existing_keywords: body.existing_keywords.unwrap_or_default(),
        round_index: body.round_index.filter(|r| *r > 0).unwrap_or(1),
    };

    let keywords = state.research.generate_keywords(&request).await.masked()?;

    Ok(Json(serde_json::json!({ "keywords": keywords })))
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeBody {
    keywords: Option<Vec<serde_json::Value>>,
    system_instruction: Option<String>,
    ui_language: Option<String>,
    target_language: Option<String>,
}

/// `POST /api/analyze-ranking`.
///
/// Missing `uiLanguage` / `targetLanguage` are taken from the first keyword,
/// then default to English.
pub async fn analyze_ranking(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AnalyzeBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(body) = body?;
    let raw = body
        .keywords
        .filter(|k| !k.is_empty())
        .ok_or(ApiError::MissingFields)?;
    let system_instruction = required(&body.system_instruction)?;

    let ui = body
        .ui_language
        .filter(|v| !v.trim().is_empty())
        .or_else(|| first_keyword_field(&raw, "uiLanguage"))
        .map(|code| UiLanguage::from_code(&code))
        .unwrap_or_default();
    let target_language = body
        .target_language
        .filter(|v| !v.trim().is_empty())
        .or_else(|| first_keyword_field(&raw, "targetLanguage"))
        .unwrap_or_else(|| "en".to_string());

    let keywords = raw
        .into_iter()
        .map(serde_json::from_value::<KeywordRecord>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ApiError::BadRequest(format!("Invalid keyword record: {e}")))?;

    info!(
        count = keywords.len(),
        ui = ui.code(),
        target_language = %target_language,
        "Analyze ranking request"
    );

    let analysed = state
        .research
        .analyze_ranking(keywords, system_instruction, ui, &target_language)
        .await;

    Ok(Json(serde_json::json!({ "keywords": analysed })))
}

fn first_keyword_field(keywords: &[serde_json::Value], field: &str) -> Option<String> {
    keywords
        .first()?
        .get(field)?
        .as_str()
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}
