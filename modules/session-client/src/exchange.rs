use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{Result, SessionError};
use crate::session::User;

pub const EXCHANGE_PATH: &str = "/api/auth/exchange-transfer-token";
pub const VERIFY_PATH: &str = "/api/auth/verify-transfer";

/// Reply of both exchange endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeResponse {
    pub token: String,
    pub user: ExchangeUser,
}

/// The main application sends `id`; the same-origin endpoint sends `userId`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExchangeUser {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default, rename = "userId")]
    pub user_id: Option<serde_json::Value>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

impl ExchangeUser {
    pub fn normalize(self) -> User {
        let user_id = self
            .id
            .or(self.user_id)
            .map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .unwrap_or_default();

        User {
            user_id,
            email: self.email.unwrap_or_default(),
            name: self.name,
            picture: self.picture,
        }
    }
}

/// Something that trades a transfer token for a long-lived session token.
#[async_trait]
pub trait ExchangeEndpoint: Send + Sync {
    async fn exchange(&self, transfer_token: &str) -> Result<ExchangeResponse>;
}

/// An exchange endpoint reached over HTTP.
pub struct HttpEndpoint {
    client: reqwest::Client,
    url: String,
}

impl HttpEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            url: url.into(),
        }
    }

    /// The main application's cross-origin exchange endpoint.
    pub fn primary(main_app_url: &str) -> Self {
        Self::new(format!("{}{EXCHANGE_PATH}", main_app_url.trim_end_matches('/')))
    }

    /// This deployment's own verification endpoint.
    pub fn fallback(local_origin: &str) -> Self {
        Self::new(format!("{}{VERIFY_PATH}", local_origin.trim_end_matches('/')))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ExchangeEndpoint for HttpEndpoint {
    async fn exchange(&self, transfer_token: &str) -> Result<ExchangeResponse> {
        let body = serde_json::json!({ "transferToken": transfer_token });

        let resp = self.client.post(&self.url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or_else(|| {
                    if text.is_empty() {
                        format!("HTTP {}", status.as_u16())
                    } else {
                        text
                    }
                });
            return Err(SessionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_app_user_shape() {
        let response: ExchangeResponse = serde_json::from_value(serde_json::json!({
            "token": "jwt",
            "user": {"id": 42, "email": "a@example.com", "name": "Ada"}
        }))
        .unwrap();
        let user = response.user.normalize();
        assert_eq!(user.user_id, "42");
        assert_eq!(user.name.as_deref(), Some("Ada"));
        assert!(user.picture.is_none());
    }

    #[test]
    fn local_user_shape() {
        let response: ExchangeResponse = serde_json::from_value(serde_json::json!({
            "token": "jwt",
            "user": {"userId": "u-7", "email": "b@example.com", "picture": "https://img/b.png"}
        }))
        .unwrap();
        let user = response.user.normalize();
        assert_eq!(user.user_id, "u-7");
        assert_eq!(user.picture.as_deref(), Some("https://img/b.png"));
    }

    #[test]
    fn endpoint_urls() {
        assert_eq!(
            HttpEndpoint::primary("https://main.example/").url(),
            "https://main.example/api/auth/exchange-transfer-token"
        );
        assert_eq!(
            HttpEndpoint::fallback("http://127.0.0.1:3001").url(),
            "http://127.0.0.1:3001/api/auth/verify-transfer"
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_warrants_fallback() {
        let endpoint = HttpEndpoint::new("http://127.0.0.1:9/api/auth/verify-transfer");
        let err = endpoint.exchange("tt").await.unwrap_err();
        assert!(err.warrants_fallback());
    }
}
