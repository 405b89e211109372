//! Image reference extraction.
//!
//! Two syntaxes are recognised: vault embeds `![[target]]` (optionally
//! `![[target|label]]`) and standard Markdown images `![label](target)`.

use std::sync::LazyLock;

use regex::Regex;

static EMBED_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    // ![[target]] or ![[target|label]], inner part split on the pipe below
    Regex::new(r"!\[\[([^\]]*)\]\]").unwrap()
});

static MARKDOWN_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    // ![label](target)
    Regex::new(r"!\[([^\]]*)\]\(([^)]*)\)").unwrap()
});

/// An image reference found in note text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// The exact span matched in the source text.
    pub source_span: String,
    /// Target path or URL, verbatim.
    pub link: String,
    /// Display text: the label, or the target when no label is given.
    pub text: String,
}

/// Extract image references from `text`: all embeds first, then all
/// standard Markdown images, each group in order of occurrence.
///
/// Empty targets or labels are kept as empty strings, not rejected.
pub fn extract_image_refs(text: &str) -> Vec<ImageRef> {
    let mut refs = Vec::new();

    for cap in EMBED_IMAGE_RE.captures_iter(text) {
        let span = cap.get(0).map_or("", |m| m.as_str());
        let inner = cap.get(1).map_or("", |m| m.as_str());
        let (link, label) = match inner.split_once('|') {
            Some((link, label)) => (link.to_string(), label.to_string()),
            None => (inner.to_string(), inner.to_string()),
        };
        refs.push(ImageRef {
            source_span: span.to_string(),
            link,
            text: label,
        });
    }

    for cap in MARKDOWN_IMAGE_RE.captures_iter(text) {
        refs.push(ImageRef {
            source_span: cap.get(0).map_or("", |m| m.as_str()).to_string(),
            link: cap.get(2).map_or("", |m| m.as_str()).to_string(),
            text: cap.get(1).map_or("", |m| m.as_str()).to_string(),
        });
    }

    refs
}
