//! Hashtag extraction.

use std::sync::LazyLock;

use regex::Regex;

static HASHTAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    // A hash followed by word characters. Markdown headings ("# Title")
    // never match because of the space.
    Regex::new(r"#(\w+)").unwrap()
});

/// Extract all hashtags from `text`, in order of occurrence.
///
/// The leading `#` is stripped; duplicates are kept.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG_RE
        .captures_iter(text)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_tags_in_order() {
        let tags = extract_hashtags("A #blog post about #rust and #blog again.");
        assert_eq!(tags, vec!["blog", "rust", "blog"]);
    }

    #[test]
    fn heading_is_not_a_tag() {
        let tags = extract_hashtags("# Title\n\nBody with #one tag.");
        assert_eq!(tags, vec!["one"]);
    }

    #[test]
    fn tag_stops_at_non_word_character() {
        let tags = extract_hashtags("tagged #foo-bar");
        assert_eq!(tags, vec!["foo"]);
    }

    #[test]
    fn no_tags_yields_empty() {
        assert!(extract_hashtags("plain text, no tags").is_empty());
    }
}
