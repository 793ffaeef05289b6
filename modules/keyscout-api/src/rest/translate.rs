use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde::Deserialize;

use keyscout_common::UiLanguage;

use super::required;
use crate::error::ApiError;
use crate::AppState;

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct TranslatePromptBody {
    prompt: Option<String>,
}

pub async fn translate_prompt(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TranslatePromptBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(body) = body?;
    let prompt = required(&body.prompt)?;

    let optimized = state.research.translate_prompt(prompt).await?;

    Ok(Json(serde_json::json!({ "optimized": optimized })))
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslateTextBody {
    text: Option<String>,
    target_language: Option<String>,
}

pub async fn translate_text(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TranslateTextBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(body) = body?;
    let text = required(&body.text)?;
    let target = UiLanguage::from_code(required(&body.target_language)?);

    let translated = state.research.translate_text(text, target).await?;

    Ok(Json(serde_json::json!({ "translated": translated })))
}
