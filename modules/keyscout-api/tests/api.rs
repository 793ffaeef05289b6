use std::sync::Arc;
use std::time::Duration;

use ai_client::AiError;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use keyscout_api::{log_filter, router, AppState};
use keyscout_common::DomainType;
use keyscout_research::testing::{snapshot, verdict, MockGenerator, MockSerp};
use keyscout_research::{AnalysisOptions, Research};

fn app(generator: MockGenerator, serp: MockSerp) -> Router {
    let research = Research::new(Arc::new(generator), Arc::new(serp)).with_analysis_options(
        AnalysisOptions {
            pause: Duration::ZERO,
            ..AnalysisOptions::default()
        },
    );
    router(Arc::new(AppState { research }))
}

async fn call(app: Router, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(path);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = call(
        app(MockGenerator::new(), MockSerp::new()),
        Method::GET,
        "/api/health",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["message"], "Server is running");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn wrong_verb_is_405() {
    let (status, body) = call(
        app(MockGenerator::new(), MockSerp::new()),
        Method::GET,
        "/api/generate-keywords",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");
}

#[tokio::test]
async fn missing_fields_are_400() {
    let cases = [
        ("/api/generate-keywords", json!({"seedKeyword": "cats", "targetLanguage": "en"})),
        ("/api/analyze-ranking", json!({"keywords": [], "systemInstruction": "x"})),
        ("/api/deep-dive-strategy", json!({"keyword": "cats", "uiLanguage": "en"})),
        ("/api/translate-prompt", json!({"prompt": ""})),
        ("/api/translate-text", json!({"text": "hello"})),
    ];

    for (path, body) in cases {
        let (status, body) = call(
            app(MockGenerator::new(), MockSerp::new()),
            Method::POST,
            path,
            Some(body),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(body["error"], "Missing required fields", "{path}");
    }
}

#[tokio::test]
async fn generation_failure_is_masked_as_empty_list() {
    let generator = MockGenerator::new().fail_with(|| AiError::Network("relay down".into()));
    let (status, body) = call(
        app(generator, MockSerp::new()),
        Method::POST,
        "/api/generate-keywords",
        Some(json!({
            "seedKeyword": "AI Pet Photos",
            "targetLanguage": "en",
            "systemInstruction": "You are an SEO expert."
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"keywords": []}));
}

#[tokio::test]
async fn generated_keywords_carry_ids() {
    let generator = MockGenerator::new().reply(
        r#"[{"keyword": "pet id card", "translation": "宠物身份证", "intent": "Commercial", "volume": 900}]"#,
    );
    let (status, body) = call(
        app(generator, MockSerp::new()),
        Method::POST,
        "/api/generate-keywords",
        Some(json!({
            "seedKeyword": "AI Pet Photos",
            "targetLanguage": "ko",
            "systemInstruction": "You are an SEO expert.",
            "roundIndex": 1
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let first = &body["keywords"][0];
    assert!(first["id"].as_str().unwrap().starts_with("kw-"));
    assert_eq!(first["targetLanguage"], "ko");
    assert_eq!(first["intent"], "Commercial");
}

#[tokio::test]
async fn analysis_infers_languages_from_first_keyword() {
    let generator = MockGenerator::new().reply(&verdict("Medium", "mixed"));
    let serp = MockSerp::new().on("chat", snapshot(3, DomainType::NicheSite));
    let (status, body) = call(
        app(generator, serp),
        Method::POST,
        "/api/analyze-ranking",
        Some(json!({
            "keywords": [
                {"id": "kw-1", "keyword": "chat", "translation": "cat", "intent": "Informational",
                 "volume": 100, "targetLanguage": "fr", "uiLanguage": "zh"}
            ],
            "systemInstruction": "You are a Google SERP Analysis AI."
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let record = &body["keywords"][0];
    assert_eq!(record["id"], "kw-1");
    assert_eq!(record["probability"], "High");
    assert_eq!(record["serpResultCount"], 3);
    assert_eq!(record["topDomainType"], "Niche Site");
    assert!(record["reasoning"].as_str().unwrap().starts_with("🌊 蓝海机会"));
}

#[tokio::test]
async fn deep_dive_failure_is_500() {
    let generator = MockGenerator::new().reply("not json at all");
    let (status, body) = call(
        app(generator, MockSerp::new()),
        Method::POST,
        "/api/deep-dive-strategy",
        Some(json!({
            "keyword": {"id": "kw-1", "keyword": "cat genealogy"},
            "uiLanguage": "en",
            "targetLanguage": "en"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to generate strategy report"));
}

#[tokio::test]
async fn translate_helpers_return_model_text() {
    let generator = MockGenerator::new()
        .on("Translate and optimize", "You are an SEO agent...")
        .on("into Chinese", "你是一名SEO代理……");
    let app = app(generator, MockSerp::new());

    let (status, body) = call(
        app.clone(),
        Method::POST,
        "/api/translate-prompt",
        Some(json!({"prompt": "帮我找蓝海关键词"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["optimized"], "You are an SEO agent...");

    let (status, body) = call(
        app,
        Method::POST,
        "/api/translate-text",
        Some(json!({"text": "You are an SEO agent...", "targetLanguage": "zh"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["translated"], "你是一名SEO代理……");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = app(MockGenerator::new(), MockSerp::new());
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/analyze-ranking")
                .header("origin", "https://seo.example")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}

#[test]
fn default_log_filter_covers_client_crates() {
    let filter = log_filter().unwrap().to_string().to_lowercase();

    for target in ["keyscout", "ai_client", "serp_client", "session_client"] {
        assert!(filter.contains(&format!("{target}=info")), "{filter}");
    }
}
