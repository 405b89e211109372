//! The note-to-bundle export pipeline.
//!
//! For each discovered note the pipeline creates a bundle directory named
//! after the note, copies the note in as `index.md`, materializes its
//! image references next to it, rewrites cross-links to Markdown syntax
//! and normalizes the header. A note that fails is skipped; the run
//! carries on with the rest.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use thiserror::Error;

use super::events::{emit, EventCallback, ExportEvent, ExportPhase};
use crate::assets::resolver::{AssetError, AssetResolver, AssetStats};
use crate::config::ExportConfig;
use crate::extract::wikilinks::rewrite_wiki_links;
use crate::frontmatter::normalizer::normalize;
use crate::vault::walker::{DiscoveredNote, NoteWalker, NoteWalkerError};

/// File name of a bundle's content file.
const BUNDLE_CONTENT_FILE: &str = "index.md";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("note discovery failed: {0}")]
    Walker(#[from] NoteWalkerError),

    #[error("failed to clear content directory {0}: {1}")]
    ClearDestination(String, #[source] std::io::Error),

    #[error("failed to create bundle directory {0}: {1}")]
    CreateBundle(String, #[source] std::io::Error),

    #[error("failed to copy note into {0}: {1}")]
    CopyNote(String, #[source] std::io::Error),

    #[error("asset resolution failed: {0}")]
    Assets(#[from] AssetError),

    #[error("failed to read {0}: {1}")]
    ReadContent(String, #[source] std::io::Error),

    #[error("failed to write {0}: {1}")]
    WriteContent(String, #[source] std::io::Error),
}

/// Counters for a whole export run.
#[derive(Debug, Clone, Default)]
pub struct ExportStats {
    /// Notes discovered under the export subdirectory.
    pub notes_found: usize,
    /// Notes exported as bundles.
    pub notes_exported: usize,
    /// Notes skipped because their export failed.
    pub notes_skipped: usize,
    /// Local assets copied into bundles.
    pub assets_copied: usize,
    /// Remote assets downloaded into bundles.
    pub assets_downloaded: usize,
    /// Asset references downgraded to the placeholder.
    pub assets_missing: usize,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
}

/// Runs the export described by an [`ExportConfig`].
pub struct Exporter {
    config: ExportConfig,
    resolver: AssetResolver,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Result<Self, ExportError> {
        let resolver = AssetResolver::new(config.vault_root.clone())?;
        Ok(Self { config, resolver })
    }

    /// Run the export.
    ///
    /// With `erase_destination` the content directory is deleted and
    /// recreated first; exports into a kept directory overwrite bundle
    /// files in place. A failing note is logged, counted as skipped and
    /// does not stop the run.
    pub fn process(
        &mut self,
        erase_destination: bool,
        observer: Option<EventCallback>,
    ) -> Result<ExportStats, ExportError> {
        let started = Instant::now();
        let observer = observer.as_ref();
        let mut stats = ExportStats::default();

        if erase_destination {
            emit(observer, &ExportEvent::PhaseStarted(ExportPhase::ClearDestination));
            self.clear_destination()?;
        }

        emit(observer, &ExportEvent::PhaseStarted(ExportPhase::Discovery));
        let walker = NoteWalker::new(&self.config.export_root())?;
        let notes = walker.walk(self.config.tag_filter.as_deref())?;
        stats.notes_found = notes.len();

        emit(observer, &ExportEvent::PhaseStarted(ExportPhase::Transfer));
        for note in &notes {
            emit(observer, &ExportEvent::NoteStarted { note: note.relative_path.clone() });

            match self.export_note(note, observer) {
                Ok((bundle, assets)) => {
                    stats.notes_exported += 1;
                    stats.assets_copied += assets.copied;
                    stats.assets_downloaded += assets.downloaded;
                    stats.assets_missing += assets.missing;
                    emit(observer, &ExportEvent::NoteExported {
                        note: note.relative_path.clone(),
                        bundle,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        "failed to export {}: {}",
                        note.relative_path.display(),
                        e
                    );
                    stats.notes_skipped += 1;
                    emit(observer, &ExportEvent::NoteSkipped {
                        note: note.relative_path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        stats.duration_ms = started.elapsed().as_millis() as u64;
        Ok(stats)
    }

    /// Export one note into its bundle.
    ///
    /// Assets are materialized first, so the link rewrite that follows
    /// only ever sees cross-links; the rewritten and normalized content
    /// is written back once.
    fn export_note(
        &mut self,
        note: &DiscoveredNote,
        observer: Option<&EventCallback>,
    ) -> Result<(PathBuf, AssetStats), ExportError> {
        let bundle = self.bundle_dir(note);
        fs::create_dir_all(&bundle)
            .map_err(|e| ExportError::CreateBundle(bundle.display().to_string(), e))?;

        let content_path = bundle.join(BUNDLE_CONTENT_FILE);
        fs::copy(&note.absolute_path, &content_path)
            .map_err(|e| ExportError::CopyNote(content_path.display().to_string(), e))?;
        emit(observer, &ExportEvent::BundleCreated { bundle: bundle.clone() });

        let assets = self.resolver.resolve_note_assets(&content_path, observer)?;

        let content = fs::read_to_string(&content_path)
            .map_err(|e| ExportError::ReadContent(content_path.display().to_string(), e))?;
        let content = rewrite_wiki_links(&content, &self.config.export_dir);
        let content = normalize(&content);
        fs::write(&content_path, content)
            .map_err(|e| ExportError::WriteContent(content_path.display().to_string(), e))?;

        Ok((bundle, assets))
    }

    /// Bundle directory for a note: the content directory joined with the
    /// note's file stem.
    fn bundle_dir(&self, note: &DiscoveredNote) -> PathBuf {
        let stem = note
            .absolute_path
            .file_stem()
            .map_or_else(|| "note".to_string(), |s| s.to_string_lossy().into_owned());
        self.config.content_dir.join(stem)
    }

    fn clear_destination(&self) -> Result<(), ExportError> {
        let destination = &self.config.content_dir;
        if destination.exists() {
            fs::remove_dir_all(destination).map_err(|e| {
                ExportError::ClearDestination(destination.display().to_string(), e)
            })?;
        }
        fs::create_dir_all(destination)
            .map_err(|e| ExportError::ClearDestination(destination.display().to_string(), e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup(tmp: &TempDir) -> ExportConfig {
        let vault = tmp.path().join("vault");
        let content = tmp.path().join("content");
        fs::create_dir_all(vault.join("notes")).unwrap();
        fs::create_dir_all(&content).unwrap();
        ExportConfig::new(&vault, "notes", &content).unwrap()
    }

    #[test]
    fn clear_destination_recreates_an_empty_directory() {
        let tmp = TempDir::new().unwrap();
        let config = setup(&tmp);
        fs::write(config.content_dir.join("stale.txt"), "old").unwrap();

        let exporter = Exporter::new(config.clone()).unwrap();
        exporter.clear_destination().unwrap();

        assert!(config.content_dir.is_dir());
        assert_eq!(fs::read_dir(&config.content_dir).unwrap().count(), 0);
    }

    #[test]
    fn bundle_directory_is_named_after_the_note() {
        let tmp = TempDir::new().unwrap();
        let config = setup(&tmp);
        fs::write(config.export_root().join("Page A.md"), "# Title\n").unwrap();

        let mut exporter = Exporter::new(config.clone()).unwrap();
        let stats = exporter.process(false, None).unwrap();

        assert_eq!(stats.notes_exported, 1);
        assert!(config.content_dir.join("Page A").join("index.md").is_file());
    }
}
