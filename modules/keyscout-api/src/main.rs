use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use keyscout_api::{log_filter, router, AppState};
use keyscout_common::Config;
use keyscout_research::Research;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter()?)
        .init();

    let config = Config::from_env()?;
    config.log_redacted();

    let state = Arc::new(AppState {
        research: Research::from_config(&config),
    });
    let app = router(state);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Keyscout API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
