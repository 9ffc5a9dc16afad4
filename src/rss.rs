//! RSS feed scraper.
//!
//! Polls the configured outlet feeds, matches entry text against the keyword
//! list with the partial-match score, and appends first matches to its own
//! CSV unless an identical title is already recorded there.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quick_xml::de::from_str;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::article::{clean_text, or_na, Article};
use crate::similarity::partial_ratio;
use crate::store;

pub const MATCH_THRESHOLD: f64 = 70.0;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

pub struct RssScraper {
    http: reqwest::Client,
    feeds: Vec<String>,
    keywords: Vec<String>,
    csv_path: PathBuf,
}

impl RssScraper {
    pub fn new(
        http: reqwest::Client,
        feeds: Vec<String>,
        keywords: Vec<String>,
        csv_path: PathBuf,
    ) -> Self {
        Self {
            http,
            feeds,
            keywords,
            csv_path,
        }
    }

    /// Poll every feed once. Returns how many new articles were appended.
    pub async fn run_once(&self) -> Result<usize> {
        let mut known_titles = known_titles(&self.csv_path);
        let mut appended = 0;

        for feed in &self.feeds {
            info!(%feed, "parsing feed");
            let entries = match self.fetch_feed(feed).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(%feed, error = ?e, "feed fetch or parse failed");
                    continue;
                }
            };
            if entries.is_empty() {
                info!(%feed, "no entries found in this feed");
                continue;
            }

            let fresh = self.match_entries(feed, entries, &mut known_titles);
            if !fresh.is_empty() {
                store::append_articles(&self.csv_path, &fresh)?;
                appended += fresh.len();
            }
        }
        Ok(appended)
    }

    fn match_entries(
        &self,
        feed: &str,
        entries: Vec<Item>,
        known_titles: &mut HashSet<String>,
    ) -> Vec<Article> {
        let mut fresh = Vec::new();
        for item in entries {
            let title = or_na(item.title);
            let description = clean_text(&item.description.unwrap_or_default());
            let text = format!("{title} {description}");

            let Some(keyword) = self
                .keywords
                .iter()
                .find(|kw| partial_ratio(kw, &text) >= MATCH_THRESHOLD)
            else {
                continue;
            };

            if known_titles.contains(&title) {
                debug!(%title, "duplicate found, already in CSV");
                continue;
            }
            known_titles.insert(title.clone());

            info!(%title, %keyword, "adding article from feed");
            fresh.push(Article {
                keyword: keyword.clone(),
                published: or_na(item.pub_date),
                title,
                description: or_na(Some(description)),
                url: or_na(item.link),
                source: feed_host(feed),
            });
        }
        fresh
    }

    async fn fetch_feed(&self, url: &str) -> Result<Vec<Item>> {
        let body = self
            .http
            .get(url)
            .send()
            .await
            .context("feed get")?
            .error_for_status()
            .context("feed non-2xx")?
            .text()
            .await
            .context("feed body")?;
        let rss: Rss = from_str(&body).context("parsing rss xml")?;
        Ok(rss.channel.item)
    }
}

/// Titles already recorded in the CSV; a missing file means none.
fn known_titles(path: &Path) -> HashSet<String> {
    match store::load_articles(path) {
        Ok(articles) => articles.into_iter().map(|a| a.title).collect(),
        Err(_) => HashSet::new(),
    }
}

fn feed_host(url: &str) -> String {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
        .split('/')
        .next()
        .unwrap_or(url)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_host_strips_scheme_and_path() {
        assert_eq!(feed_host("https://www.sbsun.com/feed/"), "www.sbsun.com");
        assert_eq!(
            feed_host("https://www.nbclosangeles.com/?rss=y"),
            "www.nbclosangeles.com"
        );
    }

    #[test]
    fn rss_items_deserialize() {
        let xml = r#"<rss version="2.0"><channel><title>t</title>
            <item>
                <title>Deputies investigate shooting</title>
                <link>https://example.test/story</link>
                <pubDate>Mon, 18 Nov 2024 22:00:01 +0000</pubDate>
                <description>&lt;p&gt;A deputy shooting was reported.&lt;/p&gt;</description>
            </item>
        </channel></rss>"#;
        let rss: Rss = from_str(xml).unwrap();
        assert_eq!(rss.channel.item.len(), 1);
        assert_eq!(
            rss.channel.item[0].title.as_deref(),
            Some("Deputies investigate shooting")
        );
    }

    #[test]
    fn empty_channel_is_fine() {
        let xml = r#"<rss version="2.0"><channel><title>t</title></channel></rss>"#;
        let rss: Rss = from_str(xml).unwrap();
        assert!(rss.channel.item.is_empty());
    }
}
