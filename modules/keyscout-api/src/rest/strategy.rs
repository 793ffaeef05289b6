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

/// The web client sends the whole keyword record; a bare string also works.
#[derive(Deserialize)]
#[serde(untagged)]
enum KeywordField {
    Text(String),
    Record { keyword: String },
}

impl KeywordField {
    fn text(&self) -> &str {
        match self {
            KeywordField::Text(text) | KeywordField::Record { keyword: text } => text.trim(),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DeepDiveBody {
    keyword: Option<KeywordField>,
    ui_language: Option<String>,
    target_language: Option<String>,
}

/// `POST /api/deep-dive-strategy`. Unlike generation, failures surface as 500.
pub async fn deep_dive_strategy(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DeepDiveBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(body) = body?;
    let keyword = body
        .keyword
        .as_ref()
        .map(KeywordField::text)
        .filter(|k| !k.is_empty())
        .ok_or(ApiError::MissingFields)?;
    let ui = UiLanguage::from_code(required(&body.ui_language)?);
    let target_language = required(&body.target_language)?;

    let report = state
        .research
        .deep_dive_strategy(keyword, ui, target_language)
        .await?;

    Ok(Json(serde_json::json!({ "report": report })))
}
