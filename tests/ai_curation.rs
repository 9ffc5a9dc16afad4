// tests/ai_curation.rs
use std::sync::Arc;
use std::time::Duration;

use shooting_news_monitor::ai::{curate_file, DisabledClient, DynAiClient, MockClient};
use shooting_news_monitor::article::{Article, PLACEHOLDER};
use shooting_news_monitor::store;

fn article(title: &str) -> Article {
    Article {
        keyword: "police shooting".into(),
        published: "2024-11-18".into(),
        title: title.into(),
        description: PLACEHOLDER.into(),
        url: "https://example.test".into(),
        source: "test".into(),
    }
}

fn filtered_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("mock_filtered_results.csv");
    store::save_articles(
        &path,
        &[
            article("Bakery wins regional award"),
            article("Officer shoots suspect in Anaheim"),
            article("Deputy involved shooting in Riverside"),
        ],
    )
    .unwrap();
    path
}

#[tokio::test]
async fn editor_answer_selects_rows_by_index() {
    let dir = tempfile::tempdir().unwrap();
    let filtered = filtered_file(&dir);
    let curated = dir.path().join("curated/mock_filtered_results.csv");

    let client: DynAiClient = Arc::new(MockClient {
        fixed: "2, 3".to_string(),
    });
    curate_file(&client, &filtered, &curated, Duration::from_secs(500))
        .await
        .unwrap();

    let kept = store::load_articles(&curated).unwrap();
    let titles: Vec<&str> = kept.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Officer shoots suspect in Anaheim",
            "Deputy involved shooting in Riverside",
        ]
    );
}

#[tokio::test]
async fn out_of_range_indexes_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let filtered = filtered_file(&dir);
    let curated = dir.path().join("curated.csv");

    let client: DynAiClient = Arc::new(MockClient {
        fixed: "3, 9".to_string(),
    });
    curate_file(&client, &filtered, &curated, Duration::from_secs(500))
        .await
        .unwrap();

    let kept = store::load_articles(&curated).unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].title, "Deputy involved shooting in Riverside");
}

#[tokio::test]
async fn malformed_answer_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let filtered = filtered_file(&dir);
    let curated = dir.path().join("curated.csv");

    let client: DynAiClient = Arc::new(MockClient {
        fixed: "the second and third ones".to_string(),
    });
    curate_file(&client, &filtered, &curated, Duration::from_secs(500))
        .await
        .unwrap();

    assert!(!curated.exists());
}

#[tokio::test]
async fn disabled_provider_leaves_file_uncurated() {
    let dir = tempfile::tempdir().unwrap();
    let filtered = filtered_file(&dir);
    let curated = dir.path().join("curated.csv");

    let client: DynAiClient = Arc::new(DisabledClient);
    curate_file(&client, &filtered, &curated, Duration::from_secs(500))
        .await
        .unwrap();

    assert!(!curated.exists());
}

#[tokio::test]
async fn empty_filtered_file_skips_the_call() {
    let dir = tempfile::tempdir().unwrap();
    let filtered = dir.path().join("empty_filtered_results.csv");
    store::save_articles(&filtered, &[]).unwrap();
    let curated = dir.path().join("curated.csv");

    let client: DynAiClient = Arc::new(MockClient {
        fixed: "1".to_string(),
    });
    curate_file(&client, &filtered, &curated, Duration::from_secs(500))
        .await
        .unwrap();

    assert!(!curated.exists());
}
