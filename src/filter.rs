//! Recency, relevance, and near-duplicate filtering over article lists.
//!
//! All three gates are pure functions over [`Article`] slices; the source
//! adapters choose the thresholds and date format.

use std::collections::HashSet;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::article::{Article, PLACEHOLDER};
use crate::similarity::{is_similar, partial_ratio};

pub const DEFAULT_RELEVANCE_THRESHOLD: f64 = 60.0;
pub const DEFAULT_RECENCY_DAYS: i64 = 7;

/// Per-source publication timestamp formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `2024-11-18T22:00:01Z` (NewsAPI.org)
    IsoUtc,
    /// `2024-11-18 22:00:01` (NewsData.io)
    SpaceSeparated,
    /// `2024-11-18` (Event Registry)
    DateOnly,
}

impl DateFormat {
    pub fn parse(&self, raw: &str) -> Option<NaiveDateTime> {
        match self {
            DateFormat::IsoUtc => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%SZ").ok(),
            DateFormat::SpaceSeparated => {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok()
            }
            DateFormat::DateOnly => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0)),
        }
    }
}

/// Keep articles published within the trailing window, measured against the
/// local clock (no timezone normalization).
pub fn filter_recent(articles: Vec<Article>, format: DateFormat, days: i64) -> Vec<Article> {
    filter_recent_at(Local::now().naive_local(), articles, format, days)
}

/// Same as [`filter_recent`] with an explicit "now". The cutoff boundary is
/// inclusive; missing or unparseable dates drop the row, never error.
pub fn filter_recent_at(
    now: NaiveDateTime,
    articles: Vec<Article>,
    format: DateFormat,
    days: i64,
) -> Vec<Article> {
    let cutoff = now - Duration::days(days);
    articles
        .into_iter()
        .filter(|article| {
            if article.published.is_empty() || article.published == PLACEHOLDER {
                warn!(title = %article.title, "missing publication date, dropping article");
                return false;
            }
            match format.parse(&article.published) {
                Some(published) if published >= cutoff => true,
                Some(_) => {
                    debug!(
                        published = %article.published,
                        title = %article.title,
                        "skipping old article"
                    );
                    false
                }
                None => {
                    warn!(
                        published = %article.published,
                        title = %article.title,
                        "invalid date format, dropping article"
                    );
                    false
                }
            }
        })
        .collect()
}

/// Fuzzy keyword gate over title and description; passing either is enough.
pub fn is_relevant(article: &Article, keyword: &str, threshold: f64) -> bool {
    partial_ratio(keyword, &article.title) >= threshold
        || partial_ratio(keyword, &article.description) >= threshold
}

/// Which text(s) the near-duplicate scan compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupKey {
    Title,
    TitleOrDescription,
}

#[derive(Debug, Clone, Copy)]
pub struct DedupPolicy {
    pub threshold: f64,
    pub key: DedupKey,
    /// Drop exact-URL repeats before the similarity scan.
    pub by_url_first: bool,
}

/// Sequential scan keeping the first occurrence of each similarity cluster.
/// Preserves first-seen order; O(n²) in the list size, which is fine at the
/// tens-to-hundreds of rows a run produces.
pub fn dedup_articles(articles: Vec<Article>, policy: DedupPolicy) -> Vec<Article> {
    let articles = if policy.by_url_first {
        dedup_by_url(articles)
    } else {
        articles
    };

    let mut seen: Vec<(String, String)> = Vec::new();
    let mut unique = Vec::with_capacity(articles.len());
    for article in articles {
        let duplicate = seen.iter().any(|(title, description)| match policy.key {
            DedupKey::Title => is_similar(title, &article.title, policy.threshold),
            DedupKey::TitleOrDescription => {
                is_similar(title, &article.title, policy.threshold)
                    || is_similar(description, &article.description, policy.threshold)
            }
        });
        if duplicate {
            debug!(title = %article.title, "skipping duplicate or similar article");
            continue;
        }
        seen.push((article.title.clone(), article.description.clone()));
        unique.push(article);
    }
    unique
}

fn dedup_by_url(articles: Vec<Article>) -> Vec<Article> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|article| article.url == PLACEHOLDER || seen.insert(article.url.clone()))
        .collect()
}
