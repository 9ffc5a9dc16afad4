//! The shared article record every stage reads and writes.
//!
//! Each source API maps its own JSON shape into this one; the CSV header
//! names are the interchange contract between the fetch, filter, curation,
//! sheets, and email stages.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Value written for fields a source did not provide.
pub const PLACEHOLDER: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(rename = "Keyword")]
    pub keyword: String,
    /// Source-specific string format; parsed by the recency filter only.
    #[serde(rename = "Published Date")]
    pub published: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Source")]
    pub source: String,
}

impl Article {
    /// CSV column order; must match the field order above.
    pub const HEADERS: [&'static str; 6] = [
        "Keyword",
        "Published Date",
        "Title",
        "Description",
        "URL",
        "Source",
    ];
}

/// Missing or empty field → placeholder value.
pub fn or_na(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Strip markup from feed/API text: decode HTML entities, drop tags,
/// collapse whitespace.
pub fn clean_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}
