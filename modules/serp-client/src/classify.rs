// Host-based authority classification for SERP results.

use crate::types::DomainType;

const FORUM_SOCIAL_DOMAINS: &[&str] = &[
    "reddit.com",
    "quora.com",
    "facebook.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "tiktok.com",
    "pinterest.com",
    "linkedin.com",
    "tumblr.com",
    "medium.com",
    "stackexchange.com",
    "stackoverflow.com",
    "discord.com",
    "zhihu.com",
    "weibo.com",
    "douban.com",
    "vk.com",
    "threads.net",
    "bsky.app",
];

const FORUM_PREFIXES: &[&str] = &["forum.", "forums.", "community.", "bbs.", "answers."];

const BIG_BRAND_DOMAINS: &[&str] = &[
    "wikipedia.org",
    "youtube.com",
    "google.com",
    "microsoft.com",
    "apple.com",
    "ebay.com",
    "walmart.com",
    "target.com",
    "bestbuy.com",
    "etsy.com",
    "ikea.com",
    "imdb.com",
    "yelp.com",
    "tripadvisor.com",
    "booking.com",
    "nytimes.com",
    "forbes.com",
    "bbc.com",
    "bbc.co.uk",
    "cnn.com",
    "webmd.com",
    "mayoclinic.org",
    "baidu.com",
];

/// Second-level labels that mark a brand regardless of country TLD.
const BIG_BRAND_LABELS: &[&str] = &["amazon", "wikipedia"];

const INSTITUTION_LABELS: &[&str] = &["gov", "edu", "mil"];

/// Classify a single result URL. Unparsable URLs are `Unknown`.
pub fn classify_url(link: &str) -> DomainType {
    match url::Url::parse(link).ok().and_then(|u| u.host_str().map(str::to_lowercase)) {
        Some(host) => classify_host(&host),
        None => DomainType::Unknown,
    }
}

pub fn classify_host(host: &str) -> DomainType {
    let host = host.trim_end_matches('.');
    let host = host.strip_prefix("www.").unwrap_or(host);
    let labels: Vec<&str> = host.split('.').collect();

    if is_institution(&labels) {
        return DomainType::GovEdu;
    }
    if matches_any(host, FORUM_SOCIAL_DOMAINS)
        || FORUM_PREFIXES.iter().any(|p| host.starts_with(p))
    {
        return DomainType::ForumSocial;
    }
    if matches_any(host, BIG_BRAND_DOMAINS) || has_brand_label(&labels) {
        return DomainType::BigBrand;
    }
    DomainType::NicheSite
}

/// `nih.gov`, `mit.edu`, `ox.ac.uk`, `gov.br`-style second levels.
fn is_institution(labels: &[&str]) -> bool {
    let n = labels.len();
    if n < 2 {
        return false;
    }
    INSTITUTION_LABELS.contains(&labels[n - 1])
        || INSTITUTION_LABELS.contains(&labels[n - 2])
        || (n >= 3 && labels[n - 2] == "ac")
}

fn matches_any(host: &str, domains: &[&str]) -> bool {
    domains
        .iter()
        .any(|d| host == *d || host.ends_with(&format!(".{d}")))
}

fn has_brand_label(labels: &[&str]) -> bool {
    labels
        .iter()
        .rev()
        .skip(1)
        .take(2)
        .any(|label| BIG_BRAND_LABELS.contains(label))
}
