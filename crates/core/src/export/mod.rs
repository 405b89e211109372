//! The export pipeline and its progress events.

pub mod events;
pub mod pipeline;

pub use events::{EventCallback, ExportEvent, ExportPhase};
pub use pipeline::{ExportError, ExportStats, Exporter};
