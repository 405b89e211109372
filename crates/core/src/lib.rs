//! Core library for vault2hugo.
//!
//! Turns a vault of wiki-style Markdown notes into Hugo page bundles:
//! one directory per note holding an `index.md` plus the images the note
//! references, with cross-links rewritten to standard Markdown and the
//! YAML header normalized to the field set a Hugo article expects.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assets;
pub mod config;
pub mod export;
pub mod extract;
pub mod frontmatter;
pub mod vault;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
