//! Asset resolution for bundle image references.
//!
//! Every image a note references is materialized inside the note's bundle:
//! local vault files are copied, remote URLs are downloaded under a
//! generated name, and anything unresolvable is replaced by a placeholder
//! link so the exported page never points outside its bundle.

pub mod namer;
pub mod resolver;

pub use namer::AssetNamer;
pub use resolver::{AssetError, AssetResolver, AssetStats};

/// Substitute link written when an asset cannot be resolved.
pub const MISSING_ASSET_PLACEHOLDER: &str = "missing-image.png";
