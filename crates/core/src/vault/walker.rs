//! Recursive note discovery under the vault's export subdirectory.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::extract::hashtags::extract_hashtags;

#[derive(Debug, Error)]
pub enum NoteWalkerError {
    #[error("export directory does not exist: {0}")]
    MissingRoot(String),

    #[error("failed to walk export directory {0}: {1}")]
    WalkError(String, #[source] walkdir::Error),
}

/// A note discovered for export.
#[derive(Debug, Clone)]
pub struct DiscoveredNote {
    /// Absolute path to the note file.
    pub absolute_path: PathBuf,
    /// Path relative to the export subdirectory.
    pub relative_path: PathBuf,
}

/// Walker for discovering exportable notes.
#[derive(Debug)]
pub struct NoteWalker {
    root: PathBuf,
}

impl NoteWalker {
    /// Create a walker rooted at the export subdirectory.
    pub fn new(root: &Path) -> Result<Self, NoteWalkerError> {
        let root = root
            .canonicalize()
            .map_err(|_| NoteWalkerError::MissingRoot(root.display().to_string()))?;

        Ok(Self { root })
    }

    /// Walk the export subdirectory and return all notes, sorted by
    /// relative path.
    ///
    /// Hidden files and directories are skipped. With a tag filter only
    /// notes whose hashtags include `tag` are kept; a note that cannot be
    /// read is logged and dropped from the filtered set.
    pub fn walk(&self, tag: Option<&str>) -> Result<Vec<DiscoveredNote>, NoteWalkerError> {
        let mut notes = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !is_hidden(e))
        {
            let entry = entry.map_err(|e| {
                NoteWalkerError::WalkError(self.root.display().to_string(), e)
            })?;

            let path = entry.path();
            if !path.is_file() || !is_note_file(path) {
                continue;
            }

            if let Some(tag) = tag {
                if !has_hashtag(path, tag) {
                    continue;
                }
            }

            let relative_path =
                path.strip_prefix(&self.root).unwrap_or(path).to_path_buf();

            notes.push(DiscoveredNote {
                absolute_path: path.to_path_buf(),
                relative_path,
            });
        }

        notes.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(notes)
    }
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    // Never filter the root directory (depth 0)
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn is_note_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e == "md")
}

fn has_hashtag(path: &Path, tag: &str) -> bool {
    match std::fs::read_to_string(path) {
        Ok(content) => extract_hashtags(&content).iter().any(|t| t == tag),
        Err(e) => {
            tracing::warn!("failed to read {} while filtering: {}", path.display(), e);
            false
        }
    }
}
