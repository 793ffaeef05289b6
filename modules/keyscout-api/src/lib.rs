use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing_subscriber::filter::{EnvFilter, ParseError};

use keyscout_research::Research;

pub mod error;
pub mod rest;

/// Workspace crates whose events are shown without `RUST_LOG`.
const LOG_TARGETS: [&str; 4] = ["keyscout", "ai_client", "serp_client", "session_client"];

/// `RUST_LOG` plus `info` for every workspace crate.
pub fn log_filter() -> Result<EnvFilter, ParseError> {
    LOG_TARGETS
        .iter()
        .try_fold(EnvFilter::from_default_env(), |filter, target| {
            Ok(filter.add_directive(format!("{target}=info").parse()?))
        })
}

pub struct AppState {
    pub research: Research,
}

/// All routes plus CORS, no-store and request tracing layers.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route(
            "/api/health",
            get(rest::health).fallback(rest::method_not_allowed),
        )
        // Research steps
        .route(
            "/api/generate-keywords",
            post(rest::keywords::generate_keywords).fallback(rest::method_not_allowed),
        )
        .route(
            "/api/analyze-ranking",
            post(rest::keywords::analyze_ranking).fallback(rest::method_not_allowed),
        )
        .route(
            "/api/deep-dive-strategy",
            post(rest::strategy::deep_dive_strategy).fallback(rest::method_not_allowed),
        )
        // Prompt helpers
        .route(
            "/api/translate-prompt",
            post(rest::translate::translate_prompt).fallback(rest::method_not_allowed),
        )
        .route(
            "/api/translate-text",
            post(rest::translate::translate_text).fallback(rest::method_not_allowed),
        )
        .fallback(rest::not_found)
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Model output is never cacheable
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Logging layer: method + path only, bodies carry user prompts
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}
