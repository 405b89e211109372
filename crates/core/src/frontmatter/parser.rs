//! Header parsing from note content.

use super::types::{Frontmatter, ParsedDocument};
use thiserror::Error;

/// Errors that can occur during header parsing.
#[derive(Debug, Error)]
pub enum FrontmatterParseError {
    #[error("invalid YAML header: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
}

/// Parse the YAML header from note content.
///
/// The header is delimited by `---` at the start of the document:
/// ```markdown
/// ---
/// key: value
/// ---
/// # Note content
/// ```
///
/// A document without an opening delimiter, or without a closing one, is
/// treated as header-less with the full text as body.
pub fn parse(content: &str) -> Result<ParsedDocument, FrontmatterParseError> {
    let trimmed = content.trim_start();

    if !trimmed.starts_with("---") {
        return Ok(ParsedDocument { frontmatter: None, body: content.to_string() });
    }

    let after_open = &trimmed[3..];
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let Some((yaml_end, body_start)) = find_closing_delimiter(after_open) else {
        return Ok(ParsedDocument { frontmatter: None, body: content.to_string() });
    };

    let yaml_content = &after_open[..yaml_end];
    let body = after_open[body_start..].to_string();

    let frontmatter: Frontmatter = if yaml_content.trim().is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml_content.trim())?
    };

    Ok(ParsedDocument { frontmatter: Some(frontmatter), body })
}

/// Byte range spanned by the line holding the closing `---`, if any.
fn find_closing_delimiter(content: &str) -> Option<(usize, usize)> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if line.trim() == "---" {
            return Some((offset, offset + line.len()));
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_no_header() {
        let content = "# Hello\n\nSome content";
        let result = parse(content).unwrap();
        assert!(result.frontmatter.is_none());
        assert_eq!(result.body, content);
    }

    #[test]
    fn parse_simple_header() {
        let content = "---\ntitle: Hello\n---\n# Content";
        let result = parse(content).unwrap();
        let fm = result.frontmatter.unwrap();
        assert_eq!(fm.fields.get("title").and_then(|v| v.as_str()), Some("Hello"));
        assert_eq!(result.body, "# Content");
    }

    #[test]
    fn parse_header_with_multiple_fields() {
        let content = "---\ntitle: Test\ndate: 2024-01-15\ntags:\n  - rust\n  - cli\n---\n\nBody";
        let result = parse(content).unwrap();
        let fm = result.frontmatter.unwrap();
        assert_eq!(fm.fields.get("title").and_then(|v| v.as_str()), Some("Test"));
        assert!(fm.fields.contains_key("tags"));
        assert_eq!(result.body, "\nBody");
    }

    #[test]
    fn parse_empty_header() {
        let content = "---\n---\n# Content";
        let result = parse(content).unwrap();
        assert!(result.frontmatter.unwrap().fields.is_empty());
        assert_eq!(result.body, "# Content");
    }

    #[test]
    fn unclosed_header_is_all_body() {
        let content = "---\ntitle: Never closed\n\nStill the body";
        let result = parse(content).unwrap();
        assert!(result.frontmatter.is_none());
        assert_eq!(result.body, content);
    }

    #[test]
    fn crlf_header_is_parsed() {
        let content = "---\r\ntitle: Windows\r\n---\r\nBody";
        let result = parse(content).unwrap();
        let fm = result.frontmatter.unwrap();
        assert_eq!(fm.fields.get("title").and_then(|v| v.as_str()), Some("Windows"));
        assert_eq!(result.body, "Body");
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let content = "---\n{unclosed\n---\nBody";
        assert!(parse(content).is_err());
    }

    #[test]
    fn null_fields_are_kept_as_null() {
        let content = "---\nsubtitle:\n---\nBody";
        let result = parse(content).unwrap();
        let fm = result.frontmatter.unwrap();
        assert!(fm.fields.get("subtitle").map_or(false, serde_yaml::Value::is_null));
    }
}
