//! Note discovery.
//!
//! This module provides the walker that finds exportable notes below the
//! vault's export subdirectory, optionally restricted by hashtag.

pub mod walker;

pub use walker::{DiscoveredNote, NoteWalker, NoteWalkerError};
