pub mod config;
pub mod error;
pub mod outcome;
pub mod types;

pub use config::Config;
pub use error::KeyscoutError;
pub use outcome::Outcome;
pub use types::*;
