//! Reference extraction from raw note text.
//!
//! All extraction is regex over the raw text. Code fences, inline code and
//! escaped brackets are not understood; a reference inside a fence is
//! extracted like any other.

pub mod hashtags;
pub mod images;
pub mod wikilinks;

pub use hashtags::extract_hashtags;
pub use images::{extract_image_refs, ImageRef};
pub use wikilinks::{extract_wiki_links, rewrite_wiki_links, to_markdown_link, WikiLink};
