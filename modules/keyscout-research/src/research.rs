use std::sync::Arc;

use ai_client::{Gemini, TextGenerator};
use keyscout_common::{Config, KeywordRecord, Outcome, StrategyReport, UiLanguage};
use serp_client::SerpClient;
use tracing::info;

use crate::analysis::{self, AnalysisOptions};
use crate::error::ResearchError;
use crate::generation::{self, GenerationRequest};
use crate::strategy;
use crate::traits::{NoSerp, SerpSource};
use crate::translate;

/// The research steps bound to one model gateway and one SERP source.
#[derive(Clone)]
pub struct Research {
    generator: Arc<dyn TextGenerator>,
    serp: Arc<dyn SerpSource>,
    analysis: AnalysisOptions,
}

impl Research {
    pub fn new(generator: Arc<dyn TextGenerator>, serp: Arc<dyn SerpSource>) -> Self {
        Self {
            generator,
            serp,
            analysis: AnalysisOptions::default(),
        }
    }

    /// Gemini through the configured relay; SERP enrichment only with a key.
    pub fn from_config(config: &Config) -> Self {
        let generator = Gemini::new(&config.gemini_api_key, &config.gemini_model)
            .with_base_url(&config.gemini_base_url);

        let serp: Arc<dyn SerpSource> = match &config.serp_api_key {
            Some(key) => Arc::new(SerpClient::new(&config.serp_api_url, key)),
            None => {
                info!("SERP_API_KEY not set, analysis runs without live SERP evidence");
                Arc::new(NoSerp)
            }
        };

        Self::new(Arc::new(generator), serp)
    }

    pub fn with_analysis_options(mut self, options: AnalysisOptions) -> Self {
        self.analysis = options;
        self
    }

    pub async fn generate_keywords(
        &self,
        request: &GenerationRequest,
    ) -> Outcome<Vec<KeywordRecord>, ResearchError> {
        generation::generate_keywords(self.generator.as_ref(), request).await
    }

    pub async fn analyze_ranking(
        &self,
        keywords: Vec<KeywordRecord>,
        system_instruction: &str,
        ui: UiLanguage,
        target_language: &str,
    ) -> Vec<KeywordRecord> {
        analysis::analyze_ranking(
            self.generator.as_ref(),
            self.serp.as_ref(),
            keywords,
            system_instruction,
            ui,
            target_language,
            &self.analysis,
        )
        .await
    }

    pub async fn deep_dive_strategy(
        &self,
        keyword: &str,
        ui: UiLanguage,
        target_language: &str,
    ) -> Result<StrategyReport, ResearchError> {
        strategy::deep_dive_strategy(self.generator.as_ref(), keyword, ui, target_language).await
    }

    pub async fn translate_prompt(&self, user_prompt: &str) -> Result<String, ResearchError> {
        translate::translate_prompt(self.generator.as_ref(), user_prompt).await
    }

    pub async fn translate_text(
        &self,
        text: &str,
        target: UiLanguage,
    ) -> Result<String, ResearchError> {
        translate::translate_text(self.generator.as_ref(), text, target).await
    }
}
