// tests/source_pipeline.rs
//
// Drives the shared pipeline with mock sources instead of the network,
// mirroring the per-source flow: fetch → raw CSV → reload → recency →
// dedup → filtered CSV.

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Local;

use shooting_news_monitor::article::{Article, PLACEHOLDER};
use shooting_news_monitor::filter::{DateFormat, DedupKey, DedupPolicy};
use shooting_news_monitor::sources::{run_source, NewsSource};
use shooting_news_monitor::store;

fn article(title: &str, published: &str) -> Article {
    Article {
        keyword: String::new(),
        published: published.into(),
        title: title.into(),
        description: PLACEHOLDER.into(),
        url: PLACEHOLDER.into(),
        source: "Mock Wire".into(),
    }
}

fn days_ago(days: i64) -> String {
    (Local::now() - chrono::Duration::days(days))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

struct MockSource;

#[async_trait]
impl NewsSource for MockSource {
    fn name(&self) -> &'static str {
        "mock"
    }
    fn display_name(&self) -> &'static str {
        "Mock Wire"
    }

    async fn fetch(&self, _keyword: &str) -> Result<Vec<Article>> {
        Ok(vec![
            article("Police shoot man in Fresno", &days_ago(1)),
            article("Police shoot a man in Fresno", &days_ago(2)),
            article("Officer involved shooting last month", &days_ago(30)),
        ])
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

#[tokio::test]
async fn pipeline_persists_raw_then_filters_and_dedups() {
    let dir = tempfile::tempdir().unwrap();
    let keywords = vec!["police shooting".to_string()];

    let filtered = run_source(&MockSource, &keywords, dir.path(), Duration::ZERO, 7)
        .await
        .unwrap();

    let raw = store::load_articles(&dir.path().join("mock_results.csv")).unwrap();
    assert_eq!(raw.len(), 3);
    assert!(raw.iter().all(|a| a.keyword == "police shooting"));

    // stale article dropped by recency, near-duplicate dropped by dedup
    let kept = store::load_articles(&filtered).unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].title, "Police shoot man in Fresno");
}

struct FailingSource;

#[async_trait]
impl NewsSource for FailingSource {
    fn name(&self) -> &'static str {
        "failing"
    }
    fn display_name(&self) -> &'static str {
        "Failing Wire"
    }

    async fn fetch(&self, _keyword: &str) -> Result<Vec<Article>> {
        Err(anyhow!("connection refused"))
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

#[tokio::test]
async fn fetch_failures_produce_empty_files_not_errors() {
    let dir = tempfile::tempdir().unwrap();
    let keywords = vec!["police shooting".to_string(), "deputy shooting".to_string()];

    let filtered = run_source(&FailingSource, &keywords, dir.path(), Duration::ZERO, 7)
        .await
        .unwrap();

    assert!(store::load_articles(&dir.path().join("failing_results.csv"))
        .unwrap()
        .is_empty());
    assert!(store::load_articles(&filtered).unwrap().is_empty());
}

struct RelevanceGatedSource;

#[async_trait]
impl NewsSource for RelevanceGatedSource {
    fn name(&self) -> &'static str {
        "gated"
    }
    fn display_name(&self) -> &'static str {
        "Gated Wire"
    }

    async fn fetch(&self, _keyword: &str) -> Result<Vec<Article>> {
        Ok(vec![
            article("Police shooting under investigation", &days_ago(1)),
            article("Farmers market expands on Sundays", &days_ago(1)),
        ])
    }

    fn relevance_threshold(&self) -> Option<f64> {
        Some(60.0)
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

#[tokio::test]
async fn fetch_stage_relevance_gate_drops_unrelated_articles() {
    let dir = tempfile::tempdir().unwrap();
    let keywords = vec!["police shooting".to_string()];

    run_source(&RelevanceGatedSource, &keywords, dir.path(), Duration::ZERO, 7)
        .await
        .unwrap();

    let raw = store::load_articles(&dir.path().join("gated_results.csv")).unwrap();
    assert_eq!(raw.len(), 1);
    assert_eq!(raw[0].title, "Police shooting under investigation");
}
