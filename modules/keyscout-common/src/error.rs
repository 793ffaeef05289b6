use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeyscoutError {
    #[error("Configuration error: {0}")]
    Config(String),
}
