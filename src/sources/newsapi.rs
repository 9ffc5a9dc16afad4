//! NewsAPI.org adapter (`/v2/everything`).

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Duration, Local};
use serde::Deserialize;
use tracing::warn;

use super::NewsSource;
use crate::article::{or_na, Article};
use crate::filter::{
    DateFormat, DedupKey, DedupPolicy, DEFAULT_RECENCY_DAYS, DEFAULT_RELEVANCE_THRESHOLD,
};

const ENDPOINT: &str = "https://newsapi.org/v2/everything";

#[derive(Debug, Deserialize)]
struct Response {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    source: Option<SourceRef>,
}

#[derive(Debug, Deserialize)]
struct SourceRef {
    name: Option<String>,
}

pub struct NewsApi {
    http: reqwest::Client,
    api_key: String,
}

impl NewsApi {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self { http, api_key }
    }
}

#[async_trait]
impl NewsSource for NewsApi {
    fn name(&self) -> &'static str {
        "newsapi"
    }

    fn display_name(&self) -> &'static str {
        "NewsAPI.org"
    }

    // The endpoint has no location parameter, so the state goes into the
    // query text itself.
    fn search_terms(&self, base: &[String]) -> Vec<String> {
        base.iter().map(|k| format!("{k} california")).collect()
    }

    async fn fetch(&self, keyword: &str) -> Result<Vec<Article>> {
        let from = (Local::now() - Duration::days(DEFAULT_RECENCY_DAYS))
            .format("%Y-%m-%d")
            .to_string();
        let resp = self
            .http
            .get(ENDPOINT)
            .query(&[
                ("q", keyword),
                ("from", from.as_str()),
                ("sortBy", "popularity"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("newsapi get")?;

        if !resp.status().is_success() {
            warn!(status = %resp.status(), %keyword, "newsapi returned non-success status");
            return Ok(Vec::new());
        }
        let body: Response = resp.json().await.context("newsapi response body")?;
        if body.status != "ok" {
            warn!(message = ?body.message, "newsapi returned error payload");
            return Ok(Vec::new());
        }

        Ok(body
            .articles
            .into_iter()
            .map(|raw| Article {
                keyword: String::new(),
                published: or_na(raw.published_at),
                title: or_na(raw.title),
                description: or_na(raw.description),
                url: or_na(raw.url),
                source: or_na(raw.source.and_then(|s| s.name)),
            })
            .collect())
    }

    fn relevance_threshold(&self) -> Option<f64> {
        Some(DEFAULT_RELEVANCE_THRESHOLD)
    }

    fn date_format(&self) -> Option<DateFormat> {
        Some(DateFormat::IsoUtc)
    }

    fn dedup_policy(&self) -> DedupPolicy {
        DedupPolicy {
            threshold: 90.0,
            key: DedupKey::Title,
            by_url_first: false,
        }
    }
}
