mod logging;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use vault2hugo_core::config::ExportConfig;
use vault2hugo_core::export::{EventCallback, ExportEvent, ExportPhase, ExportStats, Exporter};

#[derive(Debug, Parser)]
#[command(
    name = "v2h",
    version = vault2hugo_core::version(),
    about = "Export vault notes into Hugo page bundles"
)]
struct Cli {
    /// Root directory of the vault
    #[arg(long, value_name = "DIR")]
    vault_dir: PathBuf,

    /// Vault subdirectory holding the notes to export
    #[arg(long, value_name = "NAME")]
    export_dir: String,

    /// Hugo content directory the bundles are written into
    #[arg(long, value_name = "DIR")]
    content_dir: PathBuf,

    /// Keep existing files in the content directory
    #[arg(long)]
    keep_content: bool,

    /// Only export notes carrying this hashtag
    #[arg(long, value_name = "TAG")]
    tag: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match ExportConfig::new(&cli.vault_dir, &cli.export_dir, &cli.content_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    let config = match &cli.tag {
        Some(tag) => config.with_tag_filter(tag),
        None => config,
    };
    tracing::debug!(
        "exporting {} into {}",
        config.export_root().display(),
        config.content_dir.display()
    );

    let mut exporter = match Exporter::new(config) {
        Ok(exporter) => exporter,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let observer: EventCallback = Box::new(print_event);
    match exporter.process(!cli.keep_content, Some(observer)) {
        Ok(stats) => print_summary(&stats, &cli.content_dir),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn print_event(event: &ExportEvent) {
    match event {
        ExportEvent::PhaseStarted(ExportPhase::ClearDestination) => {
            println!("Clearing content directory...");
        }
        ExportEvent::PhaseStarted(ExportPhase::Discovery) => {
            println!("Discovering notes to export...");
        }
        ExportEvent::PhaseStarted(ExportPhase::Transfer) => {}
        ExportEvent::NoteStarted { note } => {
            println!("Processing note: {}", note.display());
        }
        ExportEvent::BundleCreated { bundle } => {
            println!("  Created bundle: {}", bundle.display());
        }
        ExportEvent::AssetCopying { source } => {
            println!("    Transferring image {}", source.display());
        }
        ExportEvent::AssetDownloading { url } => {
            println!("    Downloading image '{}'", url);
        }
        ExportEvent::AssetResolved { .. } | ExportEvent::NoteExported { .. } => {}
        ExportEvent::AssetFailed { reference, reason } => {
            println!("    Error: could not resolve '{}' ({}), skipped...", reference, reason);
        }
        ExportEvent::NoteSkipped { note, reason } => {
            println!("  Error: note skipped: {} ({})", note.display(), reason);
        }
    }
}

fn print_summary(stats: &ExportStats, content_dir: &std::path::Path) {
    println!();
    println!("Export complete:");
    println!("  Notes found:      {}", stats.notes_found);
    println!("  Notes exported:   {}", stats.notes_exported);
    if stats.notes_skipped > 0 {
        println!("  Notes skipped:    {}", stats.notes_skipped);
    }
    println!("  Assets copied:    {}", stats.assets_copied);
    println!("  Assets fetched:   {}", stats.assets_downloaded);
    if stats.assets_missing > 0 {
        println!("  Assets missing:   {}", stats.assets_missing);
    }
    println!("  Duration:         {}ms", stats.duration_ms);
    println!();
    println!("Bundles written to: {}", content_dir.display());
}
