pub mod classify;
pub mod error;
pub mod types;

pub use classify::{classify_host, classify_url};
pub use error::{Result, SerpError};
pub use types::{
    BingSerpResponse, DomainType, OrganicResult, SearchInformation, SerpSnapshot, SerpSnippet,
    PAGE_ONE_SIZE,
};

use std::time::Duration;

use types::SerpRequest;

pub struct SerpClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl SerpClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// Fetch the first Bing results page for `keyword` in `language`.
    pub async fn bing_search(&self, keyword: &str, language: &str) -> Result<BingSerpResponse> {
        let endpoint = format!("{}/request", self.base_url);
        let body = SerpRequest {
            engine: "bing",
            q: keyword.to_string(),
            setlang: language.to_string(),
            mkt: market_for(language).to_string(),
            json: 1,
        };

        tracing::debug!(keyword, language, "Requesting Bing SERP");

        let resp = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SerpError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw: serde_json::Value = resp.json().await?;
        decode_page(raw)
    }

    /// Fetch and summarize page 1.
    pub async fn snapshot(&self, keyword: &str, language: &str) -> Result<SerpSnapshot> {
        let page = self.bing_search(keyword, language).await?;
        let snapshot = SerpSnapshot::from_response(&page);
        tracing::info!(
            keyword,
            result_count = snapshot.result_count,
            top_domain_type = %snapshot.top_domain_type,
            "SERP snapshot"
        );
        Ok(snapshot)
    }
}

/// Accept the page either bare or wrapped in a `{"data": ...}` envelope.
fn decode_page(raw: serde_json::Value) -> Result<BingSerpResponse> {
    let page = match raw {
        serde_json::Value::Object(mut map) if !map.contains_key("organic_results") => {
            match map.remove("data") {
                Some(serde_json::Value::String(inner)) => serde_json::from_str(&inner)?,
                Some(inner) => inner,
                None => serde_json::Value::Object(map),
            }
        }
        other => other,
    };
    Ok(serde_json::from_value(page)?)
}

/// Bing market code for a language code.
fn market_for(language: &str) -> &'static str {
    match language {
        "fr" => "fr-FR",
        "ru" => "ru-RU",
        "ja" => "ja-JP",
        "ko" => "ko-KR",
        "pt" => "pt-BR",
        "id" => "id-ID",
        "es" => "es-ES",
        "ar" => "ar-SA",
        "zh" => "zh-CN",
        _ => "en-US",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_bare_and_enveloped_pages() {
        let bare = serde_json::json!({
            "organic_results": [{"position": 1, "title": "Cats", "link": "https://cats.example/"}]
        });
        let page = decode_page(bare).unwrap();
        assert_eq!(page.organic_results.unwrap().len(), 1);

        let wrapped = serde_json::json!({
            "code": 200,
            "data": "{\"organic_results\": [], \"search_information\": {\"total_results\": 3}}"
        });
        let page = decode_page(wrapped).unwrap();
        assert_eq!(page.search_information.unwrap().total_results, Some(3));
    }

    #[test]
    fn unknown_language_uses_us_market() {
        assert_eq!(market_for("ja"), "ja-JP");
        assert_eq!(market_for("xx"), "en-US");
    }

    #[tokio::test]
    async fn unreachable_provider_is_network_error() {
        let client = SerpClient::new("http://127.0.0.1:9", "token");
        let err = client.snapshot("cat genealogy", "en").await.unwrap_err();
        assert!(matches!(err, SerpError::Network(_)));
    }
}
