pub mod error;
pub mod gemini;
pub mod traits;
pub mod util;

pub use error::AiError;
pub use gemini::{Gemini, ResponseSchema};
pub use traits::{GenerateOptions, Prompt, TextGenerator};
pub use util::{extract_json_payload, strip_code_blocks, truncate_to_char_boundary};
