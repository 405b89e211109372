//! Header types and data structures.

use serde::Deserialize;
use serde_yaml::Value;
use std::collections::HashMap;

/// Parsed YAML header from a note.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Frontmatter {
    /// Fields as key-value pairs.
    #[serde(flatten)]
    pub fields: HashMap<String, Value>,
}

/// Result of splitting the header from note content.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Parsed header (if present).
    pub frontmatter: Option<Frontmatter>,
    /// The note body (everything after the header).
    pub body: String,
}
