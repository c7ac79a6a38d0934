//! Sensitive-keyword matching and name normalization.
//!
//! Keyword-family entities (sensitive keywords, domains, tags) are
//! name-unique and normalized to lowercase on save. Draft
//! materialization scans the news text and comment case-insensitively
//! for configured keyword substrings.

/// Maximum number of tags attachable to a single news item.
pub const MAX_TAGS_PER_NEWS: usize = 6;

/// Normalize a keyword-family name for storage and comparison.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Return the keywords appearing as substrings in the news text or
/// comment, case-insensitively. Keyword names are assumed already
/// normalized to lowercase.
pub fn match_keywords<'a>(keywords: &'a [String], text: &str, comment: &str) -> Vec<&'a str> {
    let text = text.to_lowercase();
    let comment = comment.to_lowercase();
    keywords
        .iter()
        .filter(|name| text.contains(name.as_str()) || comment.contains(name.as_str()))
        .map(String::as_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn matches_are_case_insensitive() {
        let kws = keywords(&["vaccine", "election"]);
        let matched = match_keywords(&kws, "Breaking: VACCINE shortage", "");
        assert_eq!(matched, vec!["vaccine"]);
    }

    #[test]
    fn comment_is_scanned_too() {
        let kws = keywords(&["election"]);
        let matched = match_keywords(&kws, "nothing here", "about the Election result");
        assert_eq!(matched, vec!["election"]);
    }

    #[test]
    fn substring_matches_count() {
        let kws = keywords(&["virus"]);
        assert_eq!(
            match_keywords(&kws, "the coronavirus outbreak", ""),
            vec!["virus"]
        );
    }

    #[test]
    fn no_match_returns_empty() {
        let kws = keywords(&["vaccine"]);
        assert!(match_keywords(&kws, "ordinary news", "plain comment").is_empty());
    }

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize_name("  Health "), "health");
    }
}
