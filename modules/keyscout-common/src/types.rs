use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

pub use serp_client::{DomainType, SerpSnippet};

// --- Languages ---

/// Display name for a target-language code. Unknown codes read as English.
pub fn language_name(code: &str) -> &'static str {
    match code {
        "en" => "English",
        "fr" => "French",
        "ru" => "Russian",
        "ja" => "Japanese",
        "ko" => "Korean",
        "pt" => "Portuguese",
        "id" => "Indonesian",
        "es" => "Spanish",
        "ar" => "Arabic",
        "zh" => "Chinese",
        _ => "English",
    }
}

/// Language the end user reads explanations in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UiLanguage {
    Zh,
    #[default]
    En,
}

impl UiLanguage {
    /// Anything other than `zh` reads as English.
    pub fn from_code(code: &str) -> Self {
        if code.trim().eq_ignore_ascii_case("zh") {
            UiLanguage::Zh
        } else {
            UiLanguage::En
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            UiLanguage::Zh => "Chinese",
            UiLanguage::En => "English",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            UiLanguage::Zh => "zh",
            UiLanguage::En => "en",
        }
    }
}

impl<'de> Deserialize<'de> for UiLanguage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(UiLanguage::from_code(&raw))
    }
}

// --- Intent ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, JsonSchema)]
pub enum Intent {
    #[default]
    Informational,
    Transactional,
    Local,
    Commercial,
}

impl Intent {
    pub const ALL: [Intent; 4] = [
        Intent::Informational,
        Intent::Transactional,
        Intent::Local,
        Intent::Commercial,
    ];

    /// Case-insensitive; unrecognized labels fall back to `Informational`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Intent::ALL
            .into_iter()
            .find(|i| i.as_str().eq_ignore_ascii_case(label))
            .unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Informational => "Informational",
            Intent::Transactional => "Transactional",
            Intent::Local => "Local",
            Intent::Commercial => "Commercial",
        }
    }
}

impl<'de> Deserialize<'de> for Intent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Intent::from_label(&raw))
    }
}

// --- Probability ---

/// Page-1 ranking probability. Exactly three levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub enum Probability {
    High,
    Medium,
    Low,
}

impl Probability {
    /// Case-insensitive parse: `HIGH`, `high` and `High` are the same level.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Probability::High),
            "medium" => Some(Probability::Medium),
            "low" => Some(Probability::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Probability::High => "High",
            Probability::Medium => "Medium",
            Probability::Low => "Low",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for Probability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Probability::parse(&raw).ok_or_else(|| {
            serde::de::Error::unknown_variant(&raw, &["High", "Medium", "Low"])
        })
    }
}

// --- Keyword record ---

/// One candidate keyword. Created by generation, filled in by analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRecord {
    #[serde(default)]
    pub id: String,
    pub keyword: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub intent: Intent,
    #[serde(default, deserialize_with = "lenient_count")]
    pub volume: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<Probability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// `-1` when the SERP provider gave no count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serp_result_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_domain_type: Option<DomainType>,
    #[serde(default)]
    pub top_serp_snippets: Vec<SerpSnippet>,
}

impl KeywordRecord {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            keyword: keyword.into(),
            translation: String::new(),
            intent: Intent::default(),
            volume: 0,
            target_language: None,
            probability: None,
            reasoning: None,
            serp_result_count: None,
            top_domain_type: None,
            top_serp_snippets: Vec::new(),
        }
    }

    /// The record's own language when set, else `fallback`.
    pub fn language_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.target_language.as_deref() {
            Some(lang) if !lang.trim().is_empty() => lang,
            _ => fallback,
        }
    }
}

// --- Strategy report ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContentSection {
    pub header: String,
    pub header_trans: String,
    pub description: String,
    pub description_trans: String,
}

/// Content plan for one keyword. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StrategyReport {
    pub target_keyword: String,
    #[serde(rename = "pageTitleH1")]
    pub page_title_h1: String,
    #[serde(rename = "pageTitleH1_trans")]
    pub page_title_h1_trans: String,
    pub meta_description: String,
    #[serde(rename = "metaDescription_trans")]
    pub meta_description_trans: String,
    pub url_slug: String,
    pub user_intent_summary: String,
    pub content_structure: Vec<ContentSection>,
    pub long_tail_keywords: Vec<String>,
    #[serde(rename = "longTailKeywords_trans")]
    pub long_tail_keywords_trans: Vec<String>,
    #[serde(deserialize_with = "lenient_count")]
    #[schemars(with = "u64")]
    pub recommended_word_count: u64,
}

/// Accept `1200`, `1200.0`, `"1,200"` or `"1500-2000 words"` (first number wins).
pub fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    match &value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .ok_or_else(|| serde::de::Error::custom(format!("invalid count: {n}"))),
        serde_json::Value::String(s) => {
            let digits: String = s
                .chars()
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(|c| c.is_ascii_digit() || *c == ',')
                .filter(|c| c.is_ascii_digit())
                .collect();
            digits
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("invalid count: {s}")))
        }
        serde_json::Value::Null => Ok(0),
        other => Err(serde::de::Error::custom(format!("invalid count: {other}"))),
    }
}
