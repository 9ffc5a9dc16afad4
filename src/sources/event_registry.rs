//! Event Registry (NewsAPI.AI) adapter (`article/getArticles`).
//!
//! Location scoping happens in the request payload (California-area source
//! URIs), so this source carries no fetch-stage relevance gate.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use super::NewsSource;
use crate::article::{or_na, Article};
use crate::filter::{DateFormat, DedupKey, DedupPolicy};

const ENDPOINT: &str = "https://eventregistry.org/api/v1/article/getArticles";

const SOURCE_LOCATIONS: &[&str] = &[
    "http://en.wikipedia.org/wiki/California",
    "http://en.wikipedia.org/wiki/Los_Angeles",
    "http://en.wikipedia.org/wiki/Orange_County,_California",
    "http://en.wikipedia.org/wiki/Riverside_County,_California",
    "http://en.wikipedia.org/wiki/San_Bernardino_County,_California",
];
const IGNORE_SOURCE_GROUP: &str = "paywall/paywalled_sources";
const ARTICLES_PER_PAGE: u32 = 100;

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    articles: Option<ArticlePage>,
}

#[derive(Debug, Deserialize)]
struct ArticlePage {
    #[serde(default)]
    results: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    title: Option<String>,
    body: Option<String>,
    url: Option<String>,
    date: Option<String>,
    source: Option<SourceRef>,
}

#[derive(Debug, Deserialize)]
struct SourceRef {
    title: Option<String>,
}

pub struct EventRegistry {
    http: reqwest::Client,
    api_key: String,
}

impl EventRegistry {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self { http, api_key }
    }
}

#[async_trait]
impl NewsSource for EventRegistry {
    fn name(&self) -> &'static str {
        "newsapiai"
    }

    fn display_name(&self) -> &'static str {
        "NewsAPI.AI"
    }

    async fn fetch(&self, keyword: &str) -> Result<Vec<Article>> {
        let payload = serde_json::json!({
            "action": "getArticles",
            "keyword": keyword,
            "sourceLocationUri": SOURCE_LOCATIONS,
            "ignoreSourceGroupUri": IGNORE_SOURCE_GROUP,
            "articlesPage": 1,
            "articlesCount": ARTICLES_PER_PAGE,
            "articlesSortBy": "date",
            "articlesSortByAsc": false,
            "dataType": ["news", "pr"],
            "forceMaxDataTimeWindow": 31,
            "resultType": "articles",
            "apiKey": self.api_key,
        });

        let resp = self
            .http
            .post(ENDPOINT)
            .json(&payload)
            .send()
            .await
            .context("event registry post")?;

        if !resp.status().is_success() {
            warn!(status = %resp.status(), %keyword, "event registry returned non-success status");
            return Ok(Vec::new());
        }
        let body: Response = resp.json().await.context("event registry response body")?;

        Ok(body
            .articles
            .map(|page| page.results)
            .unwrap_or_default()
            .into_iter()
            .map(|raw| Article {
                keyword: String::new(),
                published: or_na(raw.date),
                title: or_na(raw.title),
                description: or_na(raw.body),
                url: or_na(raw.url),
                source: or_na(raw.source.and_then(|s| s.title)),
            })
            .collect())
    }

    fn date_format(&self) -> Option<DateFormat> {
        Some(DateFormat::DateOnly)
    }

    fn dedup_policy(&self) -> DedupPolicy {
        DedupPolicy {
            threshold: 70.0,
            key: DedupKey::TitleOrDescription,
            by_url_first: false,
        }
    }
}
