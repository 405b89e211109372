//! Export configuration.
//!
//! One run is described by a directory triple: the vault root, the name of
//! the vault subdirectory holding the publishable notes, and the Hugo
//! content directory receiving the bundles.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("vault directory does not exist: {0}")]
    MissingVaultRoot(String),

    #[error("export subdirectory does not exist: {0}")]
    MissingExportDir(String),

    #[error("content directory does not exist: {0}")]
    MissingContentDir(String),
}

/// Resolved configuration for one export run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Root of the vault. Local asset links resolve against this.
    pub vault_root: PathBuf,
    /// Name of the vault subdirectory holding the notes to export.
    pub export_dir: String,
    /// Hugo content directory the bundles are written into.
    pub content_dir: PathBuf,
    /// Restrict discovery to notes carrying this hashtag.
    pub tag_filter: Option<String>,
}

impl ExportConfig {
    /// Validate the directory triple and build a config.
    ///
    /// All three directories must already exist. The content directory is
    /// cleared by the pipeline, never created from scratch.
    pub fn new(
        vault_root: &Path,
        export_dir: &str,
        content_dir: &Path,
    ) -> Result<Self, ConfigError> {
        if !vault_root.is_dir() {
            return Err(ConfigError::MissingVaultRoot(
                vault_root.display().to_string(),
            ));
        }

        let export_root = vault_root.join(export_dir);
        if !export_root.is_dir() {
            return Err(ConfigError::MissingExportDir(
                export_root.display().to_string(),
            ));
        }

        if !content_dir.is_dir() {
            return Err(ConfigError::MissingContentDir(
                content_dir.display().to_string(),
            ));
        }

        Ok(Self {
            vault_root: vault_root.to_path_buf(),
            export_dir: export_dir.to_string(),
            content_dir: content_dir.to_path_buf(),
            tag_filter: None,
        })
    }

    /// Restrict discovery to notes carrying `tag`.
    #[must_use]
    pub fn with_tag_filter(mut self, tag: &str) -> Self {
        self.tag_filter = Some(tag.to_string());
        self
    }

    /// Absolute path of the export subdirectory.
    pub fn export_root(&self) -> PathBuf {
        self.vault_root.join(&self.export_dir)
    }
}
