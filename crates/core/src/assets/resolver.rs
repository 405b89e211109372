//! Materializes image references inside a note's bundle.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use super::namer::AssetNamer;
use super::MISSING_ASSET_PLACEHOLDER;
use crate::export::events::{emit, EventCallback, ExportEvent};
use crate::extract::images::extract_image_refs;

/// Remote downloads give up after this long.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that abort asset resolution for a note.
///
/// Failures on a single asset are not errors; they downgrade the
/// reference to the placeholder and resolution continues.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to construct http client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to read {0}: {1}")]
    ReadContent(String, #[source] io::Error),

    #[error("failed to write {0}: {1}")]
    WriteContent(String, #[source] io::Error),
}

/// Counters for one note's asset resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetStats {
    /// Local vault files copied into the bundle.
    pub copied: usize,
    /// Remote URLs downloaded into the bundle.
    pub downloaded: usize,
    /// References downgraded to the placeholder.
    pub missing: usize,
}

#[derive(Debug, Error)]
enum FetchError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Resolves every image reference of a bundle's content file.
///
/// Local links (no `http` in them) are copied from the vault root; remote
/// links are downloaded under a generated name. Each reference is rewritten
/// to standard Markdown pointing at the bundle-local file and the content
/// file is persisted after every resolution.
pub struct AssetResolver {
    vault_root: PathBuf,
    client: reqwest::blocking::Client,
    namer: AssetNamer,
}

impl AssetResolver {
    pub fn new(vault_root: PathBuf) -> Result<Self, AssetError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()?;
        Ok(Self { vault_root, client, namer: AssetNamer::new() })
    }

    /// Resolve all image references in the content file at `content_path`.
    pub fn resolve_note_assets(
        &mut self,
        content_path: &Path,
        observer: Option<&EventCallback>,
    ) -> Result<AssetStats, AssetError> {
        let bundle_dir = content_path.parent().unwrap_or_else(|| Path::new(""));
        let mut content = fs::read_to_string(content_path).map_err(|e| {
            AssetError::ReadContent(content_path.display().to_string(), e)
        })?;

        let mut stats = AssetStats::default();

        for image in extract_image_refs(&content) {
            let link = if image.link.contains("http") {
                self.download_remote(&image.link, bundle_dir, &mut stats, observer)
            } else {
                self.copy_local(&image.link, bundle_dir, &mut stats, observer)
            };

            let rewritten = format!("![{}]({})", image.text, link);
            content = content.replace(&image.source_span, &rewritten);
            fs::write(content_path, &content).map_err(|e| {
                AssetError::WriteContent(content_path.display().to_string(), e)
            })?;
        }

        Ok(stats)
    }

    /// Copy a vault-local asset into the bundle, keeping its base name.
    fn copy_local(
        &self,
        link: &str,
        bundle_dir: &Path,
        stats: &mut AssetStats,
        observer: Option<&EventCallback>,
    ) -> String {
        let source = self.vault_root.join(link);
        emit(observer, &ExportEvent::AssetCopying { source: source.clone() });

        let file_name = Path::new(link)
            .file_name()
            .map_or_else(|| link.to_string(), |n| n.to_string_lossy().into_owned());

        match fs::copy(&source, bundle_dir.join(&file_name)) {
            Ok(_) => {
                stats.copied += 1;
                emit(observer, &ExportEvent::AssetResolved { link: file_name.clone() });
                file_name
            }
            Err(e) => {
                tracing::warn!("failed to copy vault image {}: {}", source.display(), e);
                stats.missing += 1;
                emit(observer, &ExportEvent::AssetFailed {
                    reference: source.display().to_string(),
                    reason: e.to_string(),
                });
                MISSING_ASSET_PLACEHOLDER.to_string()
            }
        }
    }

    /// Download a remote asset into the bundle under a generated name.
    fn download_remote(
        &mut self,
        url: &str,
        bundle_dir: &Path,
        stats: &mut AssetStats,
        observer: Option<&EventCallback>,
    ) -> String {
        emit(observer, &ExportEvent::AssetDownloading { url: url.to_string() });

        let file_name = self.namer.remote_name(url);
        let destination = bundle_dir.join(&file_name);

        match self.fetch_to_file(url, &destination) {
            Ok(()) => {
                stats.downloaded += 1;
                emit(observer, &ExportEvent::AssetResolved { link: file_name.clone() });
                file_name
            }
            Err(e) => {
                tracing::warn!("failed to download {}: {}", url, e);
                // A partial file may exist if the transfer broke midway
                let _ = fs::remove_file(&destination);
                stats.missing += 1;
                emit(observer, &ExportEvent::AssetFailed {
                    reference: url.to_string(),
                    reason: e.to_string(),
                });
                MISSING_ASSET_PLACEHOLDER.to_string()
            }
        }
    }

    fn fetch_to_file(&self, url: &str, destination: &Path) -> Result<(), FetchError> {
        let mut response = self.client.get(url).send()?.error_for_status()?;
        let mut file = File::create(destination)?;
        io::copy(&mut response, &mut file)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::TempDir;

    fn bundle_with(tmp: &TempDir, content: &str) -> PathBuf {
        let bundle = tmp.path().join("out").join("Note");
        fs::create_dir_all(&bundle).unwrap();
        let path = bundle.join("index.md");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn copies_local_asset_into_bundle() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("pic.png"), b"data").unwrap();
        let content_path = bundle_with(&tmp, "Look ![[pic.png]] here.");

        let mut resolver = AssetResolver::new(tmp.path().to_path_buf()).unwrap();
        let stats = resolver.resolve_note_assets(&content_path, None).unwrap();

        assert_eq!(stats.copied, 1);
        assert_eq!(stats.missing, 0);
        assert!(content_path.parent().unwrap().join("pic.png").exists());
        assert_eq!(
            fs::read_to_string(&content_path).unwrap(),
            "Look ![pic.png](pic.png) here."
        );
    }

    #[test]
    fn missing_local_asset_gets_placeholder_and_resolution_continues() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("pic.png"), b"data").unwrap();
        let content_path = bundle_with(&tmp, "![[gone.png]] then ![[pic.png]]");

        let mut resolver = AssetResolver::new(tmp.path().to_path_buf()).unwrap();
        let stats = resolver.resolve_note_assets(&content_path, None).unwrap();

        assert_eq!(stats.copied, 1);
        assert_eq!(stats.missing, 1);
        assert_eq!(
            fs::read_to_string(&content_path).unwrap(),
            "![gone.png](missing-image.png) then ![pic.png](pic.png)"
        );
    }

    #[test]
    fn subdirectory_link_is_flattened_to_base_name() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("assets")).unwrap();
        fs::write(tmp.path().join("assets").join("pic.png"), b"data").unwrap();
        let content_path = bundle_with(&tmp, "![[assets/pic.png]]");

        let mut resolver = AssetResolver::new(tmp.path().to_path_buf()).unwrap();
        resolver.resolve_note_assets(&content_path, None).unwrap();

        assert!(content_path.parent().unwrap().join("pic.png").exists());
        assert_eq!(
            fs::read_to_string(&content_path).unwrap(),
            "![assets/pic.png](pic.png)"
        );
    }

    #[test]
    fn embed_label_survives_the_rewrite() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("pic.png"), b"data").unwrap();
        let content_path = bundle_with(&tmp, "![[pic.png|My picture]]");

        let mut resolver = AssetResolver::new(tmp.path().to_path_buf()).unwrap();
        resolver.resolve_note_assets(&content_path, None).unwrap();

        assert_eq!(
            fs::read_to_string(&content_path).unwrap(),
            "![My picture](pic.png)"
        );
    }

    #[test]
    fn downloaded_asset_lands_in_the_bundle_under_its_generated_name() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 512];
            loop {
                let n = stream.read(&mut chunk).unwrap();
                request.extend_from_slice(&chunk[..n]);
                if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            stream
                .write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Length: 7\r\nConnection: close\r\n\r\nPNGDATA",
                )
                .unwrap();
        });

        let tmp = TempDir::new().unwrap();
        let content_path = bundle_with(&tmp, &format!("![logo](http://{}/logo.png)", addr));

        let mut resolver = AssetResolver::new(tmp.path().to_path_buf()).unwrap();
        let stats = resolver.resolve_note_assets(&content_path, None).unwrap();
        server.join().unwrap();

        assert_eq!(stats.downloaded, 1);
        assert_eq!(stats.missing, 0);

        let bundle = content_path.parent().unwrap();
        let downloads: Vec<String> = fs::read_dir(bundle)
            .unwrap()
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with("web") && n.ends_with("_logo.png"))
            .collect();
        assert_eq!(downloads.len(), 1);
        assert_eq!(fs::read(bundle.join(&downloads[0])).unwrap(), b"PNGDATA");
        assert_eq!(
            fs::read_to_string(&content_path).unwrap(),
            format!("![logo]({})", downloads[0])
        );
    }

    #[test]
    fn failed_download_gets_placeholder() {
        let tmp = TempDir::new().unwrap();
        let content_path =
            bundle_with(&tmp, "![logo](http://127.0.0.1:1/logo.png)");

        let mut resolver = AssetResolver::new(tmp.path().to_path_buf()).unwrap();
        let stats = resolver.resolve_note_assets(&content_path, None).unwrap();

        assert_eq!(stats.downloaded, 0);
        assert_eq!(stats.missing, 1);
        assert_eq!(
            fs::read_to_string(&content_path).unwrap(),
            "![logo](missing-image.png)"
        );
        let leftovers: Vec<_> = fs::read_dir(content_path.parent().unwrap())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with("web"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
