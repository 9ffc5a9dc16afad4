// tests/store_roundtrip.rs
use shooting_news_monitor::article::{Article, PLACEHOLDER};
use shooting_news_monitor::store::{append_articles, load_articles, save_articles};

fn sample() -> Vec<Article> {
    vec![
        Article {
            keyword: "police shooting california".into(),
            published: "2024-11-18T22:00:01Z".into(),
            title: "Police shoot man in Fresno".into(),
            description: "A man was shot by officers, witnesses said".into(),
            url: "https://example.test/fresno".into(),
            source: "Example Times".into(),
        },
        Article {
            keyword: "deputy shooting".into(),
            published: PLACEHOLDER.into(),
            title: "Commas, \"quotes\" and\nnewlines survive".into(),
            description: PLACEHOLDER.into(),
            url: PLACEHOLDER.into(),
            source: PLACEHOLDER.into(),
        },
    ]
}

#[test]
fn written_rows_reload_with_identical_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("raw.csv");
    let original = sample();

    save_articles(&path, &original).unwrap();
    let reloaded = load_articles(&path).unwrap();

    assert_eq!(reloaded, original);
}

#[test]
fn rewrite_replaces_previous_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("raw.csv");

    save_articles(&path, &sample()).unwrap();
    save_articles(&path, &sample()[..1]).unwrap();

    assert_eq!(load_articles(&path).unwrap().len(), 1);
}

#[test]
fn appended_rows_accumulate_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rss.csv");
    let articles = sample();

    append_articles(&path, &articles[..1]).unwrap();
    append_articles(&path, &articles[1..]).unwrap();

    let reloaded = load_articles(&path).unwrap();
    assert_eq!(reloaded, articles);
}

#[test]
fn missing_file_is_an_error_for_the_caller_to_handle() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_articles(&dir.path().join("nope.csv")).is_err());
}
