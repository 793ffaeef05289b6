//! Prompt text for every model call the research steps make.

use keyscout_common::{language_name, UiLanguage};
use serp_client::SerpSnapshot;

/// How many previously generated keywords a lateral round shows the model.
pub const EXISTING_KEYWORD_WINDOW: usize = 20;

pub const DEFAULT_GEN_PROMPT: &str = "\
You are a Senior SEO Specialist for Google Search.
Your task is to generate a comprehensive list of high-potential keywords in the target language.

Rules:
1. **Grammar**: Ensure perfect grammar and native phrasing for the target language.
2. **Intent**: Mix Informational (How-to, guide) and Commercial (Best, Review, Buy).
3. **LSI**: Include synonyms and semantically related terms.
4. **Volume**: Estimate realistic monthly search volume for Google.
";

pub const DEFAULT_ANALYZE_PROMPT: &str = "\
You are a Google SERP Analysis AI.
Estimate \"Page 1 Probability\" based on COMPETITION STRENGTH.

**High Probability Indicators**:
- Top results are Forums (Reddit, Quora), Social Media, or PDF files.
- Top results do not have the keyword in the Title tag.
- Very few results (< 20) in total index.

**Low Probability Indicators**:
- Top results are Wikipedia, Government sites, or Major Brands (Amazon, etc).
- Top results are highly optimized niche authority sites.
- Exact match optimized pages.
";

const KEYWORD_FIELDS: &str = "\
Return a JSON array with objects containing:
- keyword: The keyword in {lang}
- translation: Meaning in English/Chinese
- intent: One of \"Informational\", \"Transactional\", \"Local\", \"Commercial\"
- volume: Estimated monthly searches (number)";

// --- Generation ---

/// Round 1 asks for broad keywords; later rounds ask for lateral ones.
pub fn generation_prompt(
    seed_keyword: &str,
    target_language: &str,
    existing_keywords: &[String],
    round_index: u32,
) -> String {
    let lang = language_name(target_language);
    let fields = KEYWORD_FIELDS.replace("{lang}", lang);

    if round_index <= 1 {
        return format!(
            "Generate 10 high-potential {lang} SEO keywords for the seed term: \"{seed_keyword}\". \
             Focus on commercial and informational intent.\n\n\
             {fields}\n\n\
             Example format:\n\
             [{{\"keyword\": \"example\", \"translation\": \"示例\", \"intent\": \"Informational\", \"volume\": 1000}}]"
        );
    }

    let recent = existing_keywords
        .len()
        .saturating_sub(EXISTING_KEYWORD_WINDOW);
    let seen = existing_keywords[recent..].join(", ");

    format!(
        "The user is looking for \"Blue Ocean\" opportunities in the {lang} market.\n\
         We have already generated these: {seen}.\n\n\
         CRITICAL: Do NOT generate similar words.\n\
         Think LATERALLY. Use the \"SCAMPER\" method.\n\
         Example: If seed is \"AI Pet Photos\", think \"Pet ID Cards\", \"Fake Dog Passport\", \"Cat Genealogy\".\n\n\
         Generate 10 NEW, UNEXPECTED, but SEARCHABLE keywords related to \"{seed_keyword}\" in {lang}.\n\n\
         {fields}"
    )
}

// --- Analysis ---

pub fn analysis_prompt(keyword: &str) -> String {
    format!("Analyze Bing SERP competition for: {keyword}")
}

/// Caller's instruction, the task, the evidence block and the scoring rubric.
pub fn analysis_instruction(
    system_instruction: &str,
    keyword: &str,
    serp: Option<&SerpSnapshot>,
    ui: UiLanguage,
) -> String {
    let task = match ui {
        UiLanguage::Zh => format!("分析关键词 \"{keyword}\" 的 Bing SERP 竞争度。"),
        UiLanguage::En => format!("Analyze the Bing SERP competition for the keyword: \"{keyword}\"."),
    };

    let rubric = match ui {
        UiLanguage::Zh => RUBRIC_ZH,
        UiLanguage::En => RUBRIC_EN,
    };

    format!(
        "{system_instruction}\n\nTASK: {task}\n\n{evidence}\n\n{rubric}",
        evidence = serp_evidence(serp)
    )
}

fn serp_evidence(serp: Option<&SerpSnapshot>) -> String {
    let Some(snapshot) = serp else {
        return "No real SERP data available, use your knowledge to estimate.".to_string();
    };

    let top = snapshot
        .snippets
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {} ({})", i + 1, s.title, s.url))
        .collect::<Vec<_>>()
        .join("; ");

    format!(
        "REAL BING SERP DATA:\n\
         - Total Results Found: {}\n\
         - Top Domain Type: {}\n\
         - Top 3 Results: {top}\n\n\
         Use this REAL data to make your analysis more accurate.",
        snapshot.result_count, snapshot.top_domain_type
    )
}

const RUBRIC_ZH: &str = "\
根据以上真实数据（如有）或您的知识分析：
请注意：Bing首页通常显示10个结果，这是正常数量。

重点分析：
1. **结果数量**：如果少于10个结果（<10），这是蓝海机会。
2. **结果相关性**：首页结果是否与搜索词高度相关？如果有大量不相关结果，说明竞争弱。
3. **页面权威性**：首页结果是否是论坛帖子（Reddit、Quora）、社交媒体、文章、博客等低权威性页面？

评分标准：
- **HIGH (高概率)**:
  • 结果数量 < 10个（蓝海机会）
  • 首页是论坛、社交媒体、文章、博客等低权威性页面
  • 大量结果与搜索词不相关

- **MEDIUM (中概率)**:
  • 有竞争但非完全饱和
  • 首页有混合结果（部分权威网站 + 部分弱页面）

- **LOW (低概率)**:
  • 首页全是维基百科、政府/教育机构(.gov/.edu)、大品牌网站（Amazon等）
  • 专业领域权威网站占据首页
  • 所有结果都与搜索词高度相关且优化良好

返回 JSON 对象（reasoning 字段请直接用中文解释）：
{
  \"probability\": \"High\" | \"Medium\" | \"Low\",
  \"reasoning\": \"用中文解释的分析依据，重点说明为什么这个结果数量和相关性值得这个评分\"
}";

const RUBRIC_EN: &str = "\
Based on the real SERP data above (if available) or your knowledge, analyze:

IMPORTANT: Bing typically shows exactly 10 results on page 1, which is NORMAL. Do NOT consider 10 results as \"few\".

Key Analysis Points:
1. **RESULT COUNT**: If there are FEWER than 10 results (<10), this is a Blue Ocean opportunity.
2. **RELEVANCE**: Are the top results highly relevant to the search query? Many irrelevant results indicate weak competition.
3. **PAGE AUTHORITY**: Are the top results low-authority pages like forum posts (Reddit, Quora), social media, articles, or blogs?

SCORING:
- **HIGH Probability**:
  • Result count < 10 (Blue Ocean)
  • Top results are low-authority: forums, social media, articles, blogs
  • Many results are irrelevant to the search query

- **MEDIUM Probability**:
  • Moderate competition, not fully saturated
  • Mixed results on page 1 (some authority sites + some weak pages)

- **LOW Probability**:
  • Top results are Wikipedia, Government/Educational sites (.gov/.edu), Big Brands (Amazon, etc.)
  • Authority sites dominate the entire page
  • All results are highly relevant and well-optimized

Return a JSON object:
{
  \"probability\": \"High\" | \"Medium\" | \"Low\",
  \"reasoning\": \"explanation in English focusing on result count, relevance, and authority of competing pages\"
}";

// --- Analysis rationales ---

pub fn blue_ocean_note(result_count: i64, ui: UiLanguage) -> String {
    match ui {
        UiLanguage::Zh => format!("🌊 蓝海机会！仅发现 {result_count} 个搜索结果（正常首页应有10个）。"),
        UiLanguage::En => {
            format!("🌊 Blue Ocean opportunity! Only {result_count} results found (normal page has 10).")
        }
    }
}

pub fn weak_competition_note(ui: UiLanguage) -> &'static str {
    match ui {
        UiLanguage::Zh => "基于SERP数据：首页主要是论坛/利基网站，竞争较弱。",
        UiLanguage::En => "Based on SERP: Top results are forums/niche sites, indicating weak competition.",
    }
}

pub fn strong_competition_note(ui: UiLanguage) -> &'static str {
    match ui {
        UiLanguage::Zh => "基于SERP数据：首页是政府/大品牌网站，竞争极强。",
        UiLanguage::En => "Based on SERP: Top results are Gov/Edu/Big Brands, very strong competition.",
    }
}

pub fn unparsable_verdict_note(ui: UiLanguage) -> &'static str {
    match ui {
        UiLanguage::Zh => "AI分析解析失败，默认中等概率",
        UiLanguage::En => "AI analysis could not be parsed, defaulting to medium probability.",
    }
}

pub fn missing_reasoning_note(ui: UiLanguage) -> &'static str {
    match ui {
        UiLanguage::Zh => "AI分析完成",
        UiLanguage::En => "AI analysis complete.",
    }
}

pub fn analysis_failed_note(ui: UiLanguage) -> &'static str {
    match ui {
        UiLanguage::Zh => "分析失败（API错误或超时）。",
        UiLanguage::En => "Analysis failed (API error or timeout).",
    }
}

// --- Strategy ---

pub fn strategy_prompt(keyword: &str, ui: UiLanguage, target_language: &str) -> String {
    let ui_lang = ui.name();
    let lang = language_name(target_language);

    format!(
        "You are a Strategic SEO Content Manager for Google {lang}.\n\
         Create a detailed Content Strategy Report for the keyword: \"{keyword}\".\n\n\
         Target Language: {lang}\n\
         User Interface Language: {ui_lang}\n\n\
         Your goal is to outline a page that WILL rank #1 on Google.\n\n\
         Requirements:\n\
         1. Page Title (H1): Optimized for CTR and SEO in {lang}. Provide {ui_lang} translation.\n\
         2. URL Slug: SEO friendly (English characters preferred).\n\
         3. User Intent Summary: What is the user looking for? (Write in {ui_lang})\n\
         4. Content Structure: List 3-5 H2 headers ({lang}). Provide {ui_lang} translations.\n\
         5. Long-tail Keywords: Generate 5 specific long-tail variations ({lang}). Provide {ui_lang} translations.\n\
         6. Word Count: Recommended length.\n\n\
         Return a JSON object:\n\
         {{\n\
           \"targetKeyword\": \"string\",\n\
           \"pageTitleH1\": \"H1 in {lang}\",\n\
           \"pageTitleH1_trans\": \"translation in {ui_lang}\",\n\
           \"metaDescription\": \"160 chars max in {lang}\",\n\
           \"metaDescription_trans\": \"translation in {ui_lang}\",\n\
           \"urlSlug\": \"seo-friendly-slug\",\n\
           \"userIntentSummary\": \"string\",\n\
           \"contentStructure\": [\n\
             {{\"header\": \"H2 in {lang}\", \"header_trans\": \"trans\", \"description\": \"guide\", \"description_trans\": \"trans\"}}\n\
           ],\n\
           \"longTailKeywords\": [\"keyword1\", \"keyword2\"],\n\
           \"longTailKeywords_trans\": [\"trans1\", \"trans2\"],\n\
           \"recommendedWordCount\": 2000\n\
         }}"
    )
}

// --- Translation helpers ---

pub fn optimize_prompt_request(user_prompt: &str) -> String {
    format!(
        "Translate and optimize the following prompt into a high-quality System Instruction \
         for an AI SEO Agent targeting Google Search. Keep the instruction in English for \
         better model performance:\n\n\"{user_prompt}\""
    )
}

pub fn translate_text_request(text: &str, target: UiLanguage) -> String {
    format!(
        "Translate the following system instruction text into {} for reference purposes. \
         Preserve the original meaning and formatting:\n\n{text}",
        target.name()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serp_client::{DomainType, SerpSnippet};

    #[test]
    fn first_round_asks_for_broad_keywords() {
        let prompt = generation_prompt("ai pet photos", "ja", &[], 1);
        assert!(prompt.contains("Generate 10 high-potential Japanese SEO keywords"));
        assert!(prompt.contains("\"ai pet photos\""));
        assert!(!prompt.contains("SCAMPER"));
    }

    #[test]
    fn lateral_round_shows_only_recent_keywords() {
        let existing: Vec<String> = (0..25).map(|i| format!("kw{i}")).collect();
        let prompt = generation_prompt("ai pet photos", "en", &existing, 2);

        assert!(prompt.contains("SCAMPER"));
        assert!(prompt.contains("kw5, kw6"));
        assert!(prompt.contains("kw24"));
        assert!(!prompt.contains("kw4,"));
    }

    #[test]
    fn evidence_block_lists_top_results() {
        let snapshot = SerpSnapshot {
            result_count: 7,
            top_domain_type: DomainType::ForumSocial,
            snippets: vec![SerpSnippet {
                title: "Thread".into(),
                url: "https://reddit.com/r/cats".into(),
            }],
        };
        let text = analysis_instruction("Be precise.", "cat genealogy", Some(&snapshot), UiLanguage::En);

        assert!(text.starts_with("Be precise."));
        assert!(text.contains("Total Results Found: 7"));
        assert!(text.contains("Top Domain Type: Forum/Social"));
        assert!(text.contains("1. Thread (https://reddit.com/r/cats)"));
    }

    #[test]
    fn missing_evidence_is_stated() {
        let text = analysis_instruction("", "猫", None, UiLanguage::Zh);
        assert!(text.contains("No real SERP data available"));
        assert!(text.contains("分析关键词 \"猫\""));
    }
}
