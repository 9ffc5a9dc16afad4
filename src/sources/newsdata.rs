//! NewsData.io adapter (`/api/1/latest`).

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use super::NewsSource;
use crate::article::{or_na, Article};
use crate::filter::{DateFormat, DedupKey, DedupPolicy, DEFAULT_RELEVANCE_THRESHOLD};

const ENDPOINT: &str = "https://newsdata.io/api/1/latest";
const COUNTRY: &str = "us";

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    results: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    source_id: Option<String>,
}

pub struct NewsData {
    http: reqwest::Client,
    api_key: String,
}

impl NewsData {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self { http, api_key }
    }
}

#[async_trait]
impl NewsSource for NewsData {
    fn name(&self) -> &'static str {
        "newsdata"
    }

    fn display_name(&self) -> &'static str {
        "NewsData"
    }

    async fn fetch(&self, keyword: &str) -> Result<Vec<Article>> {
        let resp = self
            .http
            .get(ENDPOINT)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("q", keyword),
                ("country", COUNTRY),
            ])
            .send()
            .await
            .context("newsdata get")?;

        if !resp.status().is_success() {
            warn!(status = %resp.status(), %keyword, "newsdata returned non-success status");
            return Ok(Vec::new());
        }
        let body: Response = resp.json().await.context("newsdata response body")?;

        Ok(body
            .results
            .into_iter()
            .map(|raw| Article {
                keyword: String::new(),
                published: or_na(raw.pub_date),
                title: or_na(raw.title),
                description: or_na(raw.description),
                url: or_na(raw.link),
                source: or_na(raw.source_id),
            })
            .collect())
    }

    fn relevance_threshold(&self) -> Option<f64> {
        Some(DEFAULT_RELEVANCE_THRESHOLD)
    }

    fn date_format(&self) -> Option<DateFormat> {
        Some(DateFormat::SpaceSeparated)
    }

    fn dedup_policy(&self) -> DedupPolicy {
        DedupPolicy {
            threshold: 90.0,
            key: DedupKey::Title,
            by_url_first: false,
        }
    }
}
