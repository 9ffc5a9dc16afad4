//! Search phrases and RSS feed list.
//!
//! Built-in defaults with an optional TOML override, resolved as:
//! 1) `$KEYWORDS_CONFIG_PATH`
//! 2) `config/keywords.toml`
//! 3) the built-in lists below

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

pub const ENV_KEYWORDS_PATH: &str = "KEYWORDS_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config/keywords.toml";

/// The fixed, ordered search phrases every source loops over.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "officer involved shooting",
    "unarmed person shot by the police",
    "police shooting",
    "deputy shooting",
    "deputy involved shooting",
    "shots fired by police",
    "police killing",
    "suspect shot at",
    "man killed by police",
    "woman killed by police",
    "CHP shooting",
    "park ranger shooting",
    "law enforcement shooting",
    "police use of deadly force",
    "person died in custody",
    "death in custody of police",
];

/// Southern-California outlet feeds polled by the RSS scraper.
pub const DEFAULT_FEEDS: &[&str] = &[
    "https://www.sbsun.com/feed/",
    "https://www.westsidestorynewspaper.com/feed/",
    "https://www.nbclosangeles.com/tag/san-bernardino/feed/",
    "https://sanbernardinonewsdaily.com/feed/",
    "https://sb-american.com/feed/",
    "https://www.latimes.com/local/rss2.0.xml",
    "https://www.dailynews.com/feed/",
    "https://www.nbclosangeles.com/?rss=y",
    "https://www.ocregister.com/feed/",
    "https://abc7.com/tag/orange-county/feed/",
    "https://www.pe.com/feed/",
    "https://abc7.com/tag/riverside/feed/",
];

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub feeds: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            feeds: DEFAULT_FEEDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Load using the env var + fallback chain described in the module docs.
pub fn load_default() -> Result<SearchConfig> {
    if let Ok(p) = std::env::var(ENV_KEYWORDS_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_from(&pb);
        }
        return Err(anyhow!("KEYWORDS_CONFIG_PATH points to non-existent path"));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_PATH);
    if default.exists() {
        return load_from(&default);
    }
    Ok(SearchConfig::default())
}

/// Load from an explicit TOML file. Empty sections fall back to the built-in
/// lists, so an override file may carry only `keywords` or only `feeds`.
pub fn load_from(path: &Path) -> Result<SearchConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading keyword config from {}", path.display()))?;
    let mut cfg: SearchConfig =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    cfg.keywords = clean_list(cfg.keywords);
    cfg.feeds = clean_list(cfg.feeds);
    if cfg.keywords.is_empty() {
        cfg.keywords = SearchConfig::default().keywords;
    }
    if cfg.feeds.is_empty() {
        cfg.feeds = SearchConfig::default().feeds;
    }
    Ok(cfg)
}

/// Trim entries and drop empties, preserving order (the keyword list is an
/// ordered sequence).
fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn toml_override_with_fallback_feeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.toml");
        fs::write(&path, "keywords = [\" police shooting \", \"\"]\n").unwrap();
        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.keywords, vec!["police shooting".to_string()]);
        assert_eq!(cfg.feeds.len(), DEFAULT_FEEDS.len());
    }

    #[serial_test::serial]
    #[test]
    fn env_path_wins_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kw.toml");
        fs::write(&path, "keywords = [\"only this\"]\n").unwrap();
        env::set_var(ENV_KEYWORDS_PATH, path.display().to_string());
        let cfg = load_default().unwrap();
        env::remove_var(ENV_KEYWORDS_PATH);
        assert_eq!(cfg.keywords, vec!["only this".to_string()]);
    }

    #[serial_test::serial]
    #[test]
    fn missing_env_path_is_an_error() {
        env::set_var(ENV_KEYWORDS_PATH, "/definitely/not/here.toml");
        let err = load_default();
        env::remove_var(ENV_KEYWORDS_PATH);
        assert!(err.is_err());
    }
}
