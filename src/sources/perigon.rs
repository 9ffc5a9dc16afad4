//! Perigon adapter (`/v1/all`).
//!
//! The query is already pinned to today and `state=CA`, so there is no
//! recency pass and no fetch-stage relevance gate; dedup drops exact-URL
//! repeats first, then near-duplicate titles/descriptions.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Local;
use serde::Deserialize;
use tracing::warn;

use super::NewsSource;
use crate::article::{or_na, Article};
use crate::filter::{DateFormat, DedupKey, DedupPolicy};

const ENDPOINT: &str = "https://api.goperigon.com/v1/all";

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    source: Option<SourceRef>,
}

#[derive(Debug, Deserialize)]
struct SourceRef {
    domain: Option<String>,
}

pub struct Perigon {
    http: reqwest::Client,
    api_key: String,
}

impl Perigon {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self { http, api_key }
    }
}

#[async_trait]
impl NewsSource for Perigon {
    fn name(&self) -> &'static str {
        "perigon"
    }

    fn display_name(&self) -> &'static str {
        "Perigon"
    }

    async fn fetch(&self, keyword: &str) -> Result<Vec<Article>> {
        let today = Local::now().format("%Y-%m-%d").to_string();
        let resp = self
            .http
            .get(ENDPOINT)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("q", keyword),
                ("showReprints", "false"),
                ("from", today.as_str()),
                ("to", today.as_str()),
                ("state", "CA"),
            ])
            .send()
            .await
            .context("perigon get")?;

        if !resp.status().is_success() {
            warn!(status = %resp.status(), %keyword, "perigon returned non-success status");
            return Ok(Vec::new());
        }
        let body: Response = resp.json().await.context("perigon response body")?;

        Ok(body
            .articles
            .into_iter()
            .map(|raw| Article {
                keyword: String::new(),
                published: or_na(raw.pub_date),
                title: or_na(raw.title),
                description: or_na(raw.description),
                url: or_na(raw.url),
                source: or_na(raw.source.and_then(|s| s.domain)),
            })
            .collect())
    }

    fn date_format(&self) -> Option<DateFormat> {
        None
    }

    fn dedup_policy(&self) -> DedupPolicy {
        DedupPolicy {
            threshold: 50.0,
            key: DedupKey::TitleOrDescription,
            by_url_first: true,
        }
    }
}
