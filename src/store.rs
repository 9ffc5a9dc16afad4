//! Flat CSV store: the interchange format between pipeline stages.
//!
//! Raw and filtered files are rewritten each run; the RSS scraper appends.
//! The header row is always written, even for an empty article list, so a
//! later stage can reload the file without special cases.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::article::Article;

pub fn save_articles(path: &Path, articles: &[Article]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("opening {} for writing", path.display()))?;
    writer.write_record(Article::HEADERS)?;
    for article in articles {
        writer.serialize(article)?;
    }
    writer.flush()?;
    Ok(())
}

/// Append rows, writing the header only when the file is new or empty.
pub fn append_articles(path: &Path, articles: &[Article]) -> Result<()> {
    ensure_parent(path)?;
    let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening {} for appending", path.display()))?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    if needs_header {
        writer.write_record(Article::HEADERS)?;
    }
    for article in articles {
        writer.serialize(article)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_articles(path: &Path) -> Result<Vec<Article>> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("reading {}", path.display()))?;
    let mut articles = Vec::new();
    for row in reader.deserialize() {
        let article: Article =
            row.with_context(|| format!("malformed row in {}", path.display()))?;
        articles.push(article);
    }
    Ok(articles)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::PLACEHOLDER;

    fn sample(title: &str) -> Article {
        Article {
            keyword: "police shooting".into(),
            published: "2024-11-18T22:00:01Z".into(),
            title: title.into(),
            description: "desc, with a comma".into(),
            url: "https://example.test/a".into(),
            source: PLACEHOLDER.into(),
        }
    }

    #[test]
    fn empty_save_still_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        save_articles(&path, &[]).unwrap();
        assert!(load_articles(&path).unwrap().is_empty());
    }

    #[test]
    fn append_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rss.csv");
        append_articles(&path, &[sample("first")]).unwrap();
        append_articles(&path, &[sample("second")]).unwrap();
        let rows = load_articles(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].title, "second");
    }
}
