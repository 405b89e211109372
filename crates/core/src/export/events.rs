//! Progress events emitted by the export pipeline.
//!
//! The pipeline itself never prints; callers subscribe a callback and
//! render events however they like. Tests subscribe one to observe the
//! run, the CLI turns them into progress output.

use std::path::PathBuf;

/// A phase of an export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    /// Deleting and recreating the content directory.
    ClearDestination,
    /// Note discovery under the export subdirectory.
    Discovery,
    /// Per-note bundle materialization.
    Transfer,
}

/// Something the export pipeline just did.
#[derive(Debug, Clone)]
pub enum ExportEvent {
    PhaseStarted(ExportPhase),
    NoteStarted { note: PathBuf },
    BundleCreated { bundle: PathBuf },
    AssetCopying { source: PathBuf },
    AssetDownloading { url: String },
    AssetResolved { link: String },
    AssetFailed { reference: String, reason: String },
    NoteExported { note: PathBuf, bundle: PathBuf },
    NoteSkipped { note: PathBuf, reason: String },
}

/// Callback receiving export progress events.
pub type EventCallback = Box<dyn Fn(&ExportEvent)>;

/// Hand `event` to the observer, if one is subscribed.
pub(crate) fn emit(observer: Option<&EventCallback>, event: &ExportEvent) {
    if let Some(callback) = observer {
        callback(event);
    }
}
