//! Note header parsing and normalization.
//!
//! This module provides functionality to:
//! - Parse YAML headers from notes, tolerating absent or unclosed blocks
//! - Normalize a note into the fixed header layout Hugo articles expect

pub mod normalizer;
pub mod parser;
pub mod types;

pub use normalizer::normalize;
pub use parser::{parse, FrontmatterParseError};
pub use types::{Frontmatter, ParsedDocument};
