use ai_client::{extract_json_payload, Prompt, ResponseSchema, TextGenerator};
use keyscout_common::{StrategyReport, UiLanguage};
use tracing::{info, warn};

use crate::error::ResearchError;
use crate::prompts;

/// Produce a content plan for `keyword`. Any failure is final.
pub async fn deep_dive_strategy(
    generator: &dyn TextGenerator,
    keyword: &str,
    ui: UiLanguage,
    target_language: &str,
) -> Result<StrategyReport, ResearchError> {
    let prompt = Prompt::new(prompts::strategy_prompt(keyword, ui, target_language))
        .schema(StrategyReport::response_schema());

    let report = async {
        let text = generator.generate(prompt).await?;
        extract_json_payload::<StrategyReport>(&text)
    }
    .await
    .map_err(|e| {
        warn!(keyword, error = %e, "Deep dive failed");
        ResearchError::Strategy(e)
    })?;

    info!(
        keyword,
        sections = report.content_structure.len(),
        long_tail = report.long_tail_keywords.len(),
        "Strategy report ready"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{schema_types, MockGenerator};

    const REPORT: &str = r#"```json
{
  "targetKeyword": "cat genealogy",
  "pageTitleH1": "Cat Genealogy: Trace Your Cat's Family Tree",
  "pageTitleH1_trans": "猫谱系：追溯你的猫的家谱",
  "metaDescription": "Learn how to trace a cat's pedigree.",
  "metaDescription_trans": "了解如何追溯猫的血统。",
  "urlSlug": "cat-genealogy",
  "userIntentSummary": "想了解猫的血统",
  "contentStructure": [
    {"header": "What Is Cat Genealogy", "header_trans": "什么是猫谱系", "description": "Define", "description_trans": "定义"},
    {"header": "Pedigree Papers", "header_trans": "血统证书", "description": "Explain", "description_trans": "解释"},
    {"header": "DNA Tests", "header_trans": "DNA测试", "description": "Compare", "description_trans": "比较"}
  ],
  "longTailKeywords": ["cat pedigree lookup", "cat dna ancestry", "registered cat breeders", "cat family tree maker", "cat lineage certificate"],
  "longTailKeywords_trans": ["猫血统查询", "猫DNA祖先", "注册猫舍", "猫家谱制作", "猫血统证书"],
  "recommendedWordCount": 1800
}
```"#;

    #[tokio::test]
    async fn fenced_report_is_decoded() {
        let generator = MockGenerator::new().reply(REPORT);
        let report = deep_dive_strategy(&generator, "cat genealogy", UiLanguage::Zh, "en")
            .await
            .unwrap();

        assert_eq!(report.url_slug, "cat-genealogy");
        assert_eq!(report.content_structure.len(), 3);
        assert_eq!(report.long_tail_keywords_trans.len(), 5);
        assert_eq!(report.recommended_word_count, 1800);

        let prompt = generator.last_prompt().unwrap();
        assert!(prompt.system.is_none());
        assert!(prompt.user.contains("User Interface Language: Chinese"));
    }

    #[tokio::test]
    async fn malformed_reply_is_a_hard_error() {
        let generator = MockGenerator::new().reply("Sure! Here is your plan: ...");
        let err = deep_dive_strategy(&generator, "cat genealogy", UiLanguage::En, "en")
            .await
            .unwrap_err();
        assert!(matches!(err, ResearchError::Strategy(_)));
    }

    #[tokio::test]
    async fn transport_failure_is_a_hard_error() {
        let generator = MockGenerator::new().fail_with(|| ai_client::AiError::Network("timeout".into()));
        let err = deep_dive_strategy(&generator, "cat genealogy", UiLanguage::En, "en")
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to generate strategy report"));
    }

    #[test]
    fn report_schema_uses_single_gemini_types() {
        let types = schema_types(&StrategyReport::response_schema());

        assert!(!types.is_empty());
        assert!(types.iter().all(|t| t.is_string()), "{types:?}");
    }
}
