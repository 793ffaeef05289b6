use std::env;

use tracing::info;

use crate::error::KeyscoutError;

const DEFAULT_GEMINI_PROXY_URL: &str = "https://api.302.ai";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_SERP_API_URL: &str = "https://scraperapi.thordata.com";

/// Application configuration loaded from environment variables.
///
/// Built once at startup and passed by reference; nothing reads the
/// environment after that.
#[derive(Debug, Clone)]
pub struct Config {
    // Gemini relay
    pub gemini_base_url: String,
    pub gemini_api_key: String,
    pub gemini_model: String,

    // SERP provider (enrichment is disabled without a key)
    pub serp_api_url: String,
    pub serp_api_key: Option<String>,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, KeyscoutError> {
        let web_port = match env::var("WEB_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| KeyscoutError::Config(format!("WEB_PORT must be a number, got {raw}")))?,
            Err(_) => 3001,
        };

        Ok(Self {
            gemini_base_url: env_or("GEMINI_PROXY_URL", DEFAULT_GEMINI_PROXY_URL),
            gemini_api_key: required_env("GEMINI_API_KEY")?,
            gemini_model: env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            serp_api_url: env_or("SERP_API_URL", DEFAULT_SERP_API_URL),
            serp_api_key: env::var("SERP_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            web_host: env_or("WEB_HOST", "0.0.0.0"),
            web_port,
        })
    }

    /// Log the effective configuration with secrets masked.
    pub fn log_redacted(&self) {
        info!(
            gemini_base_url = %self.gemini_base_url,
            gemini_api_key = %redact(&self.gemini_api_key),
            gemini_model = %self.gemini_model,
            serp_api_url = %self.serp_api_url,
            serp_enabled = self.serp_api_key.is_some(),
            web_host = %self.web_host,
            web_port = self.web_port,
            "Loaded configuration"
        );
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn required_env(key: &str) -> Result<String, KeyscoutError> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| KeyscoutError::Config(format!("{key} environment variable is required")))
}

/// Keep the first four characters of a secret.
fn redact(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}****")
}
