//! Fuzzy text comparison used by the dedup and relevance gates.
//!
//! Scores are normalized to 0–100 like the classic fuzzy-matching tools.
//! Both inputs are case-folded before comparison; no other normalization
//! happens here.

use strsim::{levenshtein, normalized_levenshtein};

/// Edit-distance similarity of two full strings, 0–100.
///
/// Symmetric. Two empty strings score 100 (fully similar).
pub fn ratio(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    normalized_levenshtein(&a, &b) * 100.0
}

/// Best [`ratio`] of the shorter input against every same-length window of
/// the longer one. This is the partial-match score used to test a keyword
/// against a title or description.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (short, long) = if a_chars.len() <= b_chars.len() {
        (&a_chars, &b_chars)
    } else {
        (&b_chars, &a_chars)
    };
    if short.is_empty() {
        return if long.is_empty() { 100.0 } else { 0.0 };
    }

    let needle: String = short.iter().collect();
    let mut best = 0.0f64;
    for window in long.windows(short.len()) {
        let window: String = window.iter().collect();
        let dist = levenshtein(&needle, &window);
        let score = (1.0 - dist as f64 / short.len() as f64) * 100.0;
        if score > best {
            best = score;
        }
        if best >= 100.0 {
            break;
        }
    }
    best
}

/// Whether two short texts denote the same article at the given threshold.
pub fn is_similar(a: &str, b: &str, threshold: f64) -> bool {
    ratio(a, b) >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_titles_match_at_any_threshold() {
        let title = "Officer involved shooting in Riverside";
        assert!(is_similar(title, title, 100.0));
        assert!(is_similar(title, &title.to_uppercase(), 100.0));
    }

    #[test]
    fn empty_strings_are_fully_similar() {
        assert_eq!(ratio("", ""), 100.0);
        assert!(is_similar("", "", 100.0));
    }

    #[test]
    fn ratio_is_symmetric() {
        let a = "Police shoot man in Fresno";
        let b = "Police shoot a man in Fresno";
        assert_eq!(ratio(a, b), ratio(b, a));
        assert!(ratio(a, b) >= 90.0);
    }

    #[test]
    fn partial_ratio_finds_embedded_keyword() {
        let score = partial_ratio(
            "police shooting",
            "Breaking: police shooting reported downtown",
        );
        assert_eq!(score, 100.0);
    }

    #[test]
    fn partial_ratio_low_for_unrelated_text() {
        assert!(partial_ratio("police shooting", "Local bakery wins award") < 60.0);
    }

    #[test]
    fn partial_ratio_empty_needle() {
        assert_eq!(partial_ratio("", "anything"), 0.0);
        assert_eq!(partial_ratio("", ""), 100.0);
    }
}
