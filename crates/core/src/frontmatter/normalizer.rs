//! Header normalization for exported notes.
//!
//! Every exported `index.md` gets the same fixed header layout: required
//! keys are always emitted (with defaults when the note is silent) and
//! optional keys pass through only when present. A first-level heading in
//! the body doubles as the title fallback and is removed either way.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::Value;

use super::parser;
use super::types::ParsedDocument;

static TITLE_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    // First-level heading at line start, consumed together with its newline
    Regex::new(r"(?m)^# (.*)\n?").unwrap()
});

/// Normalize a note into its exported form.
///
/// The emitted header carries, in order: `title`, `type`, `subtitle`,
/// `date`, `toc`, `year` (renamed from a `years` field), `series`,
/// `categories`, `tags`, `draft`, `lastmod`, `url`, `image`, `comments`.
/// Required keys default to `article`, `false`, `['todo']` and
/// `['untagged']` respectively; optional keys are skipped when absent
/// or null. An empty `tags` list or string counts as absent.
///
/// An unparseable header degrades to the full-default header with the
/// original text kept as body; this function never fails.
pub fn normalize(content: &str) -> String {
    let parsed = parser::parse(content).unwrap_or_else(|_| ParsedDocument {
        frontmatter: None,
        body: content.to_string(),
    });
    let fields = parsed.frontmatter.map(|fm| fm.fields).unwrap_or_default();

    let mut body = parsed.body;
    let heading_title = take_title_heading(&mut body);

    let mut header = String::from("---\n");

    let title = explicit(&fields, "title").map(inline).or(heading_title);
    push_field(&mut header, "title", &title.unwrap_or_default());

    let kind = explicit(&fields, "type").map(inline);
    push_field(&mut header, "type", kind.as_deref().unwrap_or("article"));

    if let Some(value) = explicit(&fields, "subtitle") {
        push_field(&mut header, "subtitle", &inline(value));
    }
    if let Some(value) = explicit(&fields, "date") {
        push_field(&mut header, "date", &inline(value));
    }

    let toc = explicit(&fields, "toc").map(inline);
    push_field(&mut header, "toc", toc.as_deref().unwrap_or("false"));

    if let Some(value) = explicit(&fields, "years") {
        push_field(&mut header, "year", &inline(value));
    }
    if let Some(value) = explicit(&fields, "series") {
        push_field(&mut header, "series", &inline(value));
    }

    let categories = explicit(&fields, "categories").map(inline);
    push_field(&mut header, "categories", categories.as_deref().unwrap_or("['todo']"));

    let tags = match explicit(&fields, "tags") {
        Some(Value::Sequence(items)) if items.is_empty() => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(value) => Some(inline(value)),
        None => None,
    };
    push_field(&mut header, "tags", tags.as_deref().unwrap_or("['untagged']"));

    let draft = explicit(&fields, "draft").map(inline);
    push_field(&mut header, "draft", draft.as_deref().unwrap_or("false"));

    if let Some(value) = explicit(&fields, "lastmod") {
        push_field(&mut header, "lastmod", &inline(value));
    }
    if let Some(value) = explicit(&fields, "url") {
        push_field(&mut header, "url", &inline(value));
    }
    if let Some(value) = explicit(&fields, "image") {
        push_field(&mut header, "image", &inline(value));
    }

    let comments = explicit(&fields, "comments").map(inline);
    push_field(&mut header, "comments", comments.as_deref().unwrap_or("false"));

    header.push_str("---\n\n");
    header.push_str(&body);
    header
}

/// Pull the first `# ` heading out of `body` and return its text.
///
/// The heading line is removed together with its newline, whether or not
/// the caller ends up using the text.
fn take_title_heading(body: &mut String) -> Option<String> {
    let (range, title) = TITLE_HEADING_RE.captures(body).map(|cap| {
        let range = cap.get(0).map_or(0..0, |m| m.range());
        let title = cap.get(1).map_or(String::new(), |m| m.as_str().trim().to_string());
        (range, title)
    })?;
    body.replace_range(range, "");
    Some(title)
}

/// Value for `key`, unless absent or null.
fn explicit<'a>(fields: &'a HashMap<String, Value>, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|v| !v.is_null())
}

fn push_field(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push_str(": ");
    out.push_str(value);
    out.push('\n');
}

/// Render a YAML value on a single header line.
///
/// Sequences come out in flow style with single-quoted string items, the
/// form the required-key defaults also use.
fn inline(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => {
            let rendered: Vec<String> = items.iter().map(quoted_item).collect();
            format!("[{}]", rendered.join(", "))
        }
        Value::Mapping(map) => {
            let rendered: Vec<String> =
                map.iter().map(|(k, v)| format!("{}: {}", inline(k), inline(v))).collect();
            format!("{{{}}}", rendered.join(", "))
        }
        Value::Tagged(tagged) => inline(&tagged.value),
    }
}

fn quoted_item(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s),
        other => inline(other),
    }
}
