//! Generated names for downloaded assets.

use rand::{Rng, RngCore};

/// Prefix for generated remote-asset names.
const REMOTE_PREFIX: &str = "web";

/// Generates bundle-local file names for downloaded assets.
///
/// Names have the form `web<n>_<segment>` where `n` keeps repeated
/// downloads of equally-named files from colliding and `segment` is the
/// final path segment of the source URL. The random source is injected so
/// tests can seed it.
pub struct AssetNamer {
    rng: Box<dyn RngCore>,
}

impl AssetNamer {
    /// Namer backed by the thread-local generator.
    pub fn new() -> Self {
        Self { rng: Box::new(rand::thread_rng()) }
    }

    /// Namer with an explicit random source.
    pub fn with_rng(rng: Box<dyn RngCore>) -> Self {
        Self { rng }
    }

    /// Generate a file name for a remote asset URL.
    pub fn remote_name(&mut self, url: &str) -> String {
        let segment = url.rsplit('/').next().unwrap_or(url);
        let n: u32 = self.rng.gen_range(0..10_000);
        format!("{}{}_{}", REMOTE_PREFIX, n, segment)
    }
}

impl Default for AssetNamer {
    fn default() -> Self {
        Self::new()
    }
}
