//! Source adapters and the shared fetch → persist → reload → filter pipeline.
//!
//! Each vendor differs only in its endpoint call, search-term derivation,
//! date format, and filter thresholds; everything else is the one pipeline in
//! [`run_source`].

pub mod event_registry;
pub mod newsapi;
pub mod newsdata;
pub mod perigon;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use tracing::{info, warn};

use crate::article::Article;
use crate::filter::{self, DateFormat, DedupPolicy};
use crate::store;

/// One external news vendor plus its pipeline knobs.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Short identifier used in file and worksheet names ("newsapi", ...).
    fn name(&self) -> &'static str;

    /// Human-facing name used in email subjects.
    fn display_name(&self) -> &'static str;

    /// Fetch all articles for one search phrase. Non-2xx statuses and API
    /// error payloads surface as empty result sets (logged by the adapter);
    /// transport errors are the caller's to log.
    async fn fetch(&self, keyword: &str) -> Result<Vec<Article>>;

    /// Per-source variations of the base search phrases. NewsAPI.org appends
    /// the state name; the others narrow by query parameters instead.
    fn search_terms(&self, base: &[String]) -> Vec<String> {
        base.to_vec()
    }

    /// Fetch-stage relevance threshold; `None` skips the relevance gate.
    fn relevance_threshold(&self) -> Option<f64> {
        None
    }

    /// Timestamp format for the recency window; `None` skips the recency
    /// pass (Perigon restricts by query date instead).
    fn date_format(&self) -> Option<DateFormat>;

    fn dedup_policy(&self) -> DedupPolicy;
}

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("fetch_articles_total", "Articles returned by source APIs.");
        describe_counter!(
            "fetch_errors_total",
            "Source fetch failures (logged and skipped)."
        );
        describe_counter!(
            "articles_kept_total",
            "Articles surviving recency filtering and deduplication."
        );
        describe_counter!(
            "articles_dedup_total",
            "Articles removed as near-duplicates."
        );
    });
}

pub fn raw_path(dir: &Path, source: &dyn NewsSource) -> PathBuf {
    dir.join(format!("{}_results.csv", source.name()))
}

pub fn filtered_path(dir: &Path, source: &dyn NewsSource) -> PathBuf {
    dir.join(format!("{}_filtered_results.csv", source.name()))
}

/// Run the whole pipeline for one source: loop the keywords with a fixed
/// delay between calls, persist raw rows, reload them from disk, filter by
/// recency, deduplicate, and persist the filtered file.
///
/// Returns the filtered file path.
pub async fn run_source(
    source: &dyn NewsSource,
    keywords: &[String],
    out_dir: &Path,
    delay: Duration,
    window_days: i64,
) -> Result<PathBuf> {
    ensure_metrics_described();

    let mut all = Vec::new();
    for keyword in source.search_terms(keywords) {
        info!(source = source.name(), %keyword, "fetching news");
        let mut articles = match source.fetch(&keyword).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!(
                    source = source.name(),
                    %keyword,
                    error = ?e,
                    "fetch failed, skipping keyword"
                );
                counter!("fetch_errors_total").increment(1);
                Vec::new()
            }
        };
        counter!("fetch_articles_total").increment(articles.len() as u64);

        if let Some(threshold) = source.relevance_threshold() {
            articles.retain(|article| filter::is_relevant(article, &keyword, threshold));
        }
        for article in &mut articles {
            article.keyword = keyword.clone();
        }
        all.append(&mut articles);

        // Fixed pause between keyword calls to stay under vendor rate limits.
        tokio::time::sleep(delay).await;
    }

    let raw = raw_path(out_dir, source);
    info!(
        source = source.name(),
        count = all.len(),
        path = %raw.display(),
        "saving raw articles"
    );
    store::save_articles(&raw, &all)?;

    // Reload from disk so the filter stage sees exactly what was persisted.
    let reloaded = store::load_articles(&raw)?;

    let recent = match source.date_format() {
        Some(format) => filter::filter_recent(reloaded, format, window_days),
        None => reloaded,
    };

    let before = recent.len();
    let unique = filter::dedup_articles(recent, source.dedup_policy());
    counter!("articles_dedup_total").increment((before - unique.len()) as u64);
    counter!("articles_kept_total").increment(unique.len() as u64);

    let filtered = filtered_path(out_dir, source);
    info!(
        source = source.name(),
        count = unique.len(),
        path = %filtered.display(),
        "saving filtered articles"
    );
    store::save_articles(&filtered, &unique)?;
    Ok(filtered)
}
