//! Cross-link extraction and rewriting.
//!
//! Cross-links are `[[target]]` or `[[target|label]]`. Image embeds share
//! the bracket syntax, so the extraction regex consumes `![[..]]` spans
//! without capturing them (the regex crate has no lookbehind).

use std::sync::LazyLock;

use regex::Regex;

/// Reserved suffix marking a section index note.
const INDEX_SUFFIX: &str = "_index";

static WIKILINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    // First alternative swallows image embeds so the second only ever
    // matches plain cross-links.
    Regex::new(r"(!\[\[[^\]]*\]\])|\[\[([^\]|]+)(?:\|([^\]]+))?\]\]").unwrap()
});

/// A cross-link found in note text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiLink {
    /// The exact span matched in the source text.
    pub source_span: String,
    /// Target identifier, optionally carrying a `#heading` suffix.
    pub link: String,
    /// Display text: the label, or the target when no label is given.
    pub text: String,
}

/// Extract all cross-links from `text`, skipping image embeds.
///
/// Targets and labels leading with `<export_dir>/` have that prefix
/// stripped; a target ending in `_index` loses the suffix exactly once,
/// so a section index note is addressed by its section name.
pub fn extract_wiki_links(text: &str, export_dir: &str) -> Vec<WikiLink> {
    let prefix = format!("{}/", export_dir);
    let mut links = Vec::new();

    for cap in WIKILINK_RE.captures_iter(text) {
        if cap.get(1).is_some() {
            continue;
        }

        let span = cap.get(0).map_or("", |m| m.as_str());
        let target = cap.get(2).map_or("", |m| m.as_str());
        let label = cap.get(3).map_or(target, |m| m.as_str());

        let mut link = strip_prefix(target, &prefix).to_string();
        let text = strip_prefix(label, &prefix).to_string();
        if link.ends_with(INDEX_SUFFIX) {
            link.truncate(link.len() - INDEX_SUFFIX.len());
        }

        links.push(WikiLink {
            source_span: span.to_string(),
            link,
            text,
        });
    }

    links
}

/// Render a cross-link as destination Markdown syntax.
///
/// A `#heading` anchor is normalized to Hugo's fragment form: lower-cased,
/// spaces replaced with hyphens. The path segment is left untouched.
pub fn to_markdown_link(link: &WikiLink) -> String {
    let target = match link.link.split_once('#') {
        Some((path, anchor)) => {
            format!("{}#{}", path, anchor.to_lowercase().replace(' ', "-"))
        }
        None => link.link.clone(),
    };
    format!("[{}]({})", link.text, target)
}

/// Replace every cross-link in `content` with Markdown link syntax.
///
/// Substitution is textual over the whole content, one extracted span at a
/// time, so repeated identical spans are rewritten together. Callers must
/// resolve image embeds first; afterwards no `![[..]]` span remains that a
/// cross-link substitution could clip.
pub fn rewrite_wiki_links(content: &str, export_dir: &str) -> String {
    let mut result = content.to_string();
    for link in extract_wiki_links(content, export_dir) {
        result = result.replace(&link.source_span, &to_markdown_link(&link));
    }
    result
}

fn strip_prefix<'a>(value: &'a str, prefix: &str) -> &'a str {
    value.strip_prefix(prefix).unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_basic_link() {
        let links = extract_wiki_links("See [[Page B]] here.", "notes");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].source_span, "[[Page B]]");
        assert_eq!(links[0].link, "Page B");
        assert_eq!(links[0].text, "Page B");
    }

    #[test]
    fn label_becomes_display_text() {
        let links = extract_wiki_links("See [[Page B|the other page]].", "notes");
        assert_eq!(links[0].link, "Page B");
        assert_eq!(links[0].text, "the other page");
    }

    #[test]
    fn image_embeds_are_skipped() {
        let links = extract_wiki_links("![[img.png]] and [[Page B]]", "notes");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].link, "Page B");
    }

    #[test]
    fn export_dir_prefix_is_stripped() {
        let links = extract_wiki_links("[[notes/Page B|notes/Page B]]", "notes");
        assert_eq!(links[0].link, "Page B");
        assert_eq!(links[0].text, "Page B");
    }

    #[test]
    fn index_suffix_is_stripped_once() {
        let links = extract_wiki_links("[[note_index]] and [[note_index_index]]", "notes");
        assert_eq!(links[0].link, "note");
        assert_eq!(links[1].link, "note_index");
    }

    #[test]
    fn heading_anchor_is_normalized() {
        let links = extract_wiki_links("[[Guide#Getting Started]]", "notes");
        assert_eq!(
            to_markdown_link(&links[0]),
            "[Guide#Getting Started](Guide#getting-started)"
        );
    }

    #[test]
    fn rewrite_without_links_is_identity() {
        let text = "No links here.\nJust prose and ![an image](img.png).\n";
        assert_eq!(rewrite_wiki_links(text, "notes"), text);
    }

    #[test]
    fn rewrite_replaces_every_occurrence() {
        let out = rewrite_wiki_links("[[Page B]] then [[Page B]] again", "notes");
        assert_eq!(out, "[Page B](Page B) then [Page B](Page B) again");
    }

    #[test]
    fn rewrite_with_label_and_anchor() {
        let out = rewrite_wiki_links("See [[Guide#Getting Started|the guide]].", "notes");
        assert_eq!(out, "See [the guide](Guide#getting-started).");
    }
}
