pub mod analysis;
pub mod error;
pub mod generation;
pub mod prompts;
pub mod research;
pub mod strategy;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
pub mod translate;

pub use analysis::{analyze_ranking, AnalysisOptions};
pub use error::ResearchError;
pub use generation::{generate_keywords, GenerationRequest};
pub use research::Research;
pub use strategy::deep_dive_strategy;
pub use traits::{NoSerp, SerpSource};
pub use translate::{translate_prompt, translate_text};
