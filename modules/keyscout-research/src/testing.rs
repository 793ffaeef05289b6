// Test mocks for the research steps.
//
// Two mocks matching the two trait boundaries:
// - MockGenerator (TextGenerator): scripted replies keyed on prompt text
// - MockSerp (SerpSource): HashMap-based keyword -> snapshot
//
// Plus helpers for building snapshots and keyword records.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use ai_client::{AiError, Prompt, TextGenerator};
use async_trait::async_trait;
use keyscout_common::{DomainType, KeywordRecord, SerpSnippet};
use serp_client::SerpSnapshot;

use crate::traits::SerpSource;

// ---------------------------------------------------------------------------
// MockGenerator
// ---------------------------------------------------------------------------

#[derive(Clone)]
enum Reply {
    Text(String),
    Fail(fn() -> AiError),
}

/// Scripted text generator. Rules match on the user prompt containing a
/// needle; the first matching rule wins, otherwise the default reply is used.
/// With no default, unmatched prompts fail with `EmptyResponse`.
pub struct MockGenerator {
    default: Reply,
    rules: Vec<(String, Reply)>,
    delay: Option<Duration>,
    prompts: Mutex<Vec<Prompt>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            default: Reply::Fail(|| AiError::EmptyResponse),
            rules: Vec::new(),
            delay: None,
            prompts: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn reply(mut self, text: &str) -> Self {
        self.default = Reply::Text(text.to_string());
        self
    }

    pub fn fail_with(mut self, error: fn() -> AiError) -> Self {
        self.default = Reply::Fail(error);
        self
    }

    pub fn on(mut self, needle: &str, text: &str) -> Self {
        self.rules
            .push((needle.to_string(), Reply::Text(text.to_string())));
        self
    }

    pub fn on_fail(mut self, needle: &str, error: fn() -> AiError) -> Self {
        self.rules.push((needle.to_string(), Reply::Fail(error)));
        self
    }

    /// Hold every call open for `delay` so overlapping calls are observable.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> Option<Prompt> {
        self.prompts.lock().unwrap().last().cloned()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Most calls ever in flight at once.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn reply_for(&self, prompt: &Prompt) -> Reply {
        self.rules
            .iter()
            .find(|(needle, _)| prompt.user.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default.clone())
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: Prompt) -> Result<String, AiError> {
        let reply = self.reply_for(&prompt);
        self.prompts.lock().unwrap().push(prompt);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match reply {
            Reply::Text(text) => Ok(text),
            Reply::Fail(error) => Err(error()),
        }
    }
}

// ---------------------------------------------------------------------------
// MockSerp
// ---------------------------------------------------------------------------

/// HashMap-based SERP source. Unregistered keywords yield `None`.
pub struct MockSerp {
    pages: HashMap<String, SerpSnapshot>,
    requests: Mutex<Vec<(String, String)>>,
}

impl MockSerp {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn on(mut self, keyword: &str, snapshot: SerpSnapshot) -> Self {
        self.pages.insert(keyword.to_string(), snapshot);
        self
    }

    /// `(keyword, language)` pairs in request order.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockSerp {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SerpSource for MockSerp {
    async fn fetch(&self, keyword: &str, language: &str) -> Option<SerpSnapshot> {
        self.requests
            .lock()
            .unwrap()
            .push((keyword.to_string(), language.to_string()));
        self.pages.get(keyword).cloned()
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn snapshot(result_count: i64, top_domain_type: DomainType) -> SerpSnapshot {
    SerpSnapshot {
        result_count,
        top_domain_type,
        snippets: vec![
            SerpSnippet {
                title: "First result".to_string(),
                url: "https://first.example/".to_string(),
            },
            SerpSnippet {
                title: "Second result".to_string(),
                url: "https://second.example/".to_string(),
            },
        ],
    }
}

pub fn keyword(text: &str, language: Option<&str>) -> KeywordRecord {
    let mut record = KeywordRecord::new(text);
    record.id = format!("kw-test-{}", text.replace(' ', "-"));
    record.target_language = language.map(str::to_string);
    record
}

pub fn verdict(probability: &str, reasoning: &str) -> String {
    serde_json::json!({ "probability": probability, "reasoning": reasoning }).to_string()
}

/// Every `type` value in a response schema, outside field names.
pub fn schema_types(schema: &serde_json::Value) -> Vec<serde_json::Value> {
    let mut found = Vec::new();
    collect_types(schema, &mut found);
    found
}

fn collect_types(value: &serde_json::Value, found: &mut Vec<serde_json::Value>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, v) in map {
                match key.as_str() {
                    "type" => found.push(v.clone()),
                    "properties" => {
                        if let serde_json::Value::Object(props) = v {
                            props.values().for_each(|p| collect_types(p, found));
                        }
                    }
                    _ => collect_types(v, found),
                }
            }
        }
        serde_json::Value::Array(items) => items.iter().for_each(|i| collect_types(i, found)),
        _ => {}
    }
}
