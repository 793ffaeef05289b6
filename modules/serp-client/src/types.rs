use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::classify::classify_url;

/// Number of organic results Bing shows on a full first page.
pub const PAGE_ONE_SIZE: i64 = 10;

/// How many top results feed the domain vote and the snippet list.
pub const TOP_RESULTS: usize = 3;

// --- Provider wire types ---

/// Raw Bing results page as returned by the SERP provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BingSerpResponse {
    #[serde(default)]
    pub organic_results: Option<Vec<OrganicResult>>,
    #[serde(default)]
    pub search_information: Option<SearchInformation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrganicResult {
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "url")]
    pub link: String,
    #[serde(default)]
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchInformation {
    #[serde(default)]
    pub total_results: Option<i64>,
}

/// Body sent to the provider's request endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SerpRequest {
    pub engine: &'static str,
    pub q: String,
    pub setlang: String,
    pub mkt: String,
    pub json: u8,
}

// --- Summary types ---

/// Coarse authority class of the sites holding page 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DomainType {
    ForumSocial,
    NicheSite,
    GovEdu,
    BigBrand,
    #[default]
    Unknown,
}

impl DomainType {
    pub fn label(self) -> &'static str {
        match self {
            DomainType::ForumSocial => "Forum/Social",
            DomainType::NicheSite => "Niche Site",
            DomainType::GovEdu => "Gov/Edu",
            DomainType::BigBrand => "Big Brand",
            DomainType::Unknown => "Unknown",
        }
    }

    /// Unrecognized labels map to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Forum/Social" => DomainType::ForumSocial,
            "Niche Site" => DomainType::NicheSite,
            "Gov/Edu" => DomainType::GovEdu,
            "Big Brand" => DomainType::BigBrand,
            _ => DomainType::Unknown,
        }
    }

    /// Page 1 held by forums, social posts or small niche sites.
    pub fn is_weak_competition(self) -> bool {
        matches!(self, DomainType::ForumSocial | DomainType::NicheSite)
    }

    /// Page 1 held by institutions or major brands.
    pub fn is_strong_competition(self) -> bool {
        matches!(self, DomainType::GovEdu | DomainType::BigBrand)
    }
}

impl fmt::Display for DomainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for DomainType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for DomainType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(DomainType::from_label(&raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerpSnippet {
    pub title: String,
    pub url: String,
}

/// What the analysis step needs to know about a results page.
#[derive(Debug, Clone, PartialEq)]
pub struct SerpSnapshot {
    /// Result count, or `-1` when the provider reported nothing usable.
    pub result_count: i64,
    pub top_domain_type: DomainType,
    pub snippets: Vec<SerpSnippet>,
}

impl SerpSnapshot {
    pub fn from_response(response: &BingSerpResponse) -> Self {
        let organic = response.organic_results.as_deref().unwrap_or_default();

        let result_count = response
            .search_information
            .as_ref()
            .and_then(|info| info.total_results)
            .filter(|n| *n >= 0)
            .or_else(|| {
                response
                    .organic_results
                    .as_ref()
                    .map(|results| results.len() as i64)
            })
            .unwrap_or(-1);

        let mut ranked: Vec<&OrganicResult> = organic.iter().filter(|r| !r.link.is_empty()).collect();
        ranked.sort_by_key(|r| r.position.unwrap_or(u32::MAX));
        let top: Vec<&OrganicResult> = ranked.into_iter().take(TOP_RESULTS).collect();

        let top_domain_type = dominant_domain_type(top.iter().map(|r| classify_url(&r.link)));

        let snippets = top
            .iter()
            .map(|r| SerpSnippet {
                title: r.title.clone(),
                url: r.link.clone(),
            })
            .collect();

        Self {
            result_count,
            top_domain_type,
            snippets,
        }
    }

    /// True when the page has fewer results than a full first page.
    pub fn is_sparse(&self) -> bool {
        self.result_count >= 0 && self.result_count < PAGE_ONE_SIZE
    }
}

/// Majority category in rank order; ties go to the higher-ranked result.
fn dominant_domain_type(ranked: impl Iterator<Item = DomainType>) -> DomainType {
    let mut tally: Vec<(DomainType, usize)> = Vec::new();
    for domain_type in ranked {
        match tally.iter_mut().find(|(t, _)| *t == domain_type) {
            Some((_, count)) => *count += 1,
            None => tally.push((domain_type, 1)),
        }
    }

    let mut best: Option<(DomainType, usize)> = None;
    for (domain_type, count) in tally {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((domain_type, count));
        }
    }
    best.map(|(t, _)| t).unwrap_or_default()
}
