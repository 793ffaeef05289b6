// Trait seams for the research pipeline.
//
// TextGenerator (from ai-client) covers every model call; SerpSource covers
// live search evidence. Both have in-memory mocks in `testing` so the steps
// run with no network.

use async_trait::async_trait;
use serp_client::{SerpClient, SerpSnapshot};
use tracing::{debug, warn};

/// Live page-1 evidence for a keyword.
///
/// Enrichment is best-effort: implementations log their own failures and
/// yield `None`, never an error.
#[async_trait]
pub trait SerpSource: Send + Sync {
    async fn fetch(&self, keyword: &str, language: &str) -> Option<SerpSnapshot>;
}

#[async_trait]
impl SerpSource for SerpClient {
    async fn fetch(&self, keyword: &str, language: &str) -> Option<SerpSnapshot> {
        match self.snapshot(keyword, language).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(keyword, language, error = %e, "SERP fetch failed, analysing without evidence");
                None
            }
        }
    }
}

/// SERP enrichment switched off (no provider key configured).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSerp;

#[async_trait]
impl SerpSource for NoSerp {
    async fn fetch(&self, keyword: &str, _language: &str) -> Option<SerpSnapshot> {
        debug!(keyword, "SERP enrichment disabled");
        None
    }
}
