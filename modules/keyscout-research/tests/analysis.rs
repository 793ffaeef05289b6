use std::time::Duration;

use ai_client::AiError;
use keyscout_common::{DomainType, KeywordRecord, Probability, UiLanguage};
use keyscout_research::testing::{keyword, snapshot, verdict, MockGenerator, MockSerp};
use keyscout_research::{analyze_ranking, AnalysisOptions, NoSerp};

const INSTRUCTION: &str = "You are a Google SERP Analysis AI.";

fn no_pause() -> AnalysisOptions {
    AnalysisOptions {
        pause: Duration::ZERO,
        ..AnalysisOptions::default()
    }
}

fn network_down() -> AiError {
    AiError::Network("connection reset".to_string())
}

async fn analyse(
    generator: &MockGenerator,
    serp: &MockSerp,
    keywords: Vec<KeywordRecord>,
) -> Vec<KeywordRecord> {
    analyze_ranking(
        generator,
        serp,
        keywords,
        INSTRUCTION,
        UiLanguage::En,
        "en",
        &no_pause(),
    )
    .await
}

#[tokio::test]
async fn sparse_results_force_high_for_every_model_label() {
    for count in 0..10 {
        for label in ["Low", "Medium", "High", "LOW"] {
            let generator = MockGenerator::new().reply(&verdict(label, "model view"));
            let serp = MockSerp::new().on("pet id card", snapshot(count, DomainType::BigBrand));

            let out = analyse(&generator, &serp, vec![keyword("pet id card", Some("en"))]).await;

            assert_eq!(out[0].probability, Some(Probability::High), "count={count} label={label}");
            assert_eq!(out[0].serp_result_count, Some(count));
            assert!(out[0].reasoning.as_deref().unwrap().contains("Blue Ocean"));
        }
    }
}

#[tokio::test]
async fn output_matches_input_length_and_order() {
    for n in [0usize, 1, 2, 3, 4, 7, 9] {
        let generator = MockGenerator::new().reply(&verdict("Medium", "mixed"));
        let serp = MockSerp::new();
        let input: Vec<KeywordRecord> = (0..n)
            .map(|i| keyword(&format!("keyword {i}"), Some("en")))
            .collect();

        let out = analyse(&generator, &serp, input.clone()).await;

        assert_eq!(out.len(), n);
        for (before, after) in input.iter().zip(&out) {
            assert_eq!(before.id, after.id);
            assert_eq!(before.keyword, after.keyword);
        }
    }
}

#[tokio::test]
async fn one_failing_keyword_does_not_sink_its_batch() {
    let generator = MockGenerator::new()
        .reply(&verdict("High", "forums everywhere"))
        .on_fail("fake dog passport", network_down);
    let serp = MockSerp::new();
    let input = vec![
        keyword("pet id card", Some("en")),
        keyword("fake dog passport", Some("en")),
        keyword("cat genealogy", Some("en")),
    ];

    let out = analyse(&generator, &serp, input).await;

    assert_eq!(out[0].probability, Some(Probability::High));
    assert_eq!(out[2].probability, Some(Probability::High));
    assert_eq!(out[1].probability, Some(Probability::Low));
    assert_eq!(
        out[1].reasoning.as_deref(),
        Some("Analysis failed (API error or timeout).")
    );
}

#[tokio::test]
async fn serp_and_model_both_failing_yields_low_unknown() {
    let generator = MockGenerator::new().fail_with(network_down);

    let out = analyze_ranking(
        &generator,
        &NoSerp,
        vec![keyword("cat genealogy", None)],
        INSTRUCTION,
        UiLanguage::Zh,
        "en",
        &no_pause(),
    )
    .await;

    let record = &out[0];
    assert_eq!(record.probability, Some(Probability::Low));
    assert_eq!(record.serp_result_count, Some(-1));
    assert_eq!(record.top_domain_type, Some(DomainType::Unknown));
    assert!(record.top_serp_snippets.is_empty());
    assert_eq!(record.reasoning.as_deref(), Some("分析失败（API错误或超时）。"));
}

#[tokio::test]
async fn missing_serp_still_uses_model_verdict() {
    let generator = MockGenerator::new().reply(&verdict("Medium", "some authority sites"));
    let serp = MockSerp::new();

    let out = analyse(&generator, &serp, vec![keyword("cat genealogy", Some("en"))]).await;

    let record = &out[0];
    assert_eq!(record.probability, Some(Probability::Medium));
    assert_eq!(record.reasoning.as_deref(), Some("some authority sites"));
    assert_eq!(record.serp_result_count, Some(-1));
    assert_eq!(record.top_domain_type, Some(DomainType::Unknown));

    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.system.unwrap().contains("No real SERP data available"));
}

#[tokio::test]
async fn unreadable_verdict_defaults_to_medium_then_overrides_apply() {
    let generator = MockGenerator::new().reply("I think it's fine");
    let serp = MockSerp::new()
        .on("pet id card", snapshot(5_000, DomainType::ForumSocial))
        .on("cat genealogy", snapshot(5_000, DomainType::NicheSite))
        .on("dog passport", snapshot(5_000, DomainType::Unknown));

    let out = analyse(
        &generator,
        &serp,
        vec![
            keyword("pet id card", Some("en")),
            keyword("cat genealogy", Some("en")),
            keyword("dog passport", Some("en")),
        ],
    )
    .await;

    assert_eq!(out[0].probability, Some(Probability::High));
    assert_eq!(out[1].probability, Some(Probability::High));
    assert_eq!(out[2].probability, Some(Probability::Medium));
    assert!(out[2]
        .reasoning
        .as_deref()
        .unwrap()
        .contains("could not be parsed"));
}

#[tokio::test]
async fn snippets_and_domain_come_from_serp() {
    let generator = MockGenerator::new().reply(&verdict("Low", "brands"));
    let serp = MockSerp::new().on("buy cat tree", snapshot(2_000_000, DomainType::BigBrand));

    let out = analyse(&generator, &serp, vec![keyword("buy cat tree", Some("en"))]).await;

    assert_eq!(out[0].top_domain_type, Some(DomainType::BigBrand));
    assert_eq!(out[0].top_serp_snippets.len(), 2);
    assert_eq!(out[0].serp_result_count, Some(2_000_000));
}

#[tokio::test]
async fn serp_language_prefers_record_then_step_then_english() {
    let generator = MockGenerator::new().reply(&verdict("Medium", "ok"));
    let serp = MockSerp::new();

    analyze_ranking(
        &generator,
        &serp,
        vec![keyword("chat", Some("fr")), keyword("neko", None)],
        INSTRUCTION,
        UiLanguage::En,
        "ja",
        &no_pause(),
    )
    .await;
    analyze_ranking(
        &generator,
        &serp,
        vec![keyword("cat", Some(""))],
        INSTRUCTION,
        UiLanguage::En,
        "",
        &no_pause(),
    )
    .await;

    let languages: Vec<String> = serp.requests().into_iter().map(|(_, lang)| lang).collect();
    assert_eq!(languages, vec!["fr", "ja", "en"]);
}

#[tokio::test(start_paused = true)]
async fn batches_of_three_with_pause_between() {
    let generator = MockGenerator::new()
        .reply(&verdict("Medium", "ok"))
        .with_delay(Duration::from_millis(100));
    let serp = MockSerp::new();
    let input: Vec<KeywordRecord> = (0..7)
        .map(|i| keyword(&format!("keyword {i}"), Some("en")))
        .collect();

    let started = tokio::time::Instant::now();
    let out = analyze_ranking(
        &generator,
        &serp,
        input,
        INSTRUCTION,
        UiLanguage::En,
        "en",
        &AnalysisOptions::default(),
    )
    .await;
    let elapsed = started.elapsed();

    assert_eq!(out.len(), 7);
    assert_eq!(generator.calls(), 7);
    assert_eq!(generator.peak_concurrency(), 3);
    // three batches of 100ms plus two one-second pauses
    assert!(elapsed >= Duration::from_millis(2_300), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(3_300), "{elapsed:?}");
}
