//! PDF Workshop CLI - Command line access to the document operations.
//!
//! Works directly on local files; no server or storage directory involved.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pdf_workshop_core::{
    AppConfig, GhostscriptCompressor, PageSequence, PdfDocument, Sweeper, compress_in_place,
    merge_files, move_page, remove_page,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "pdf-workshop")]
#[command(author, version, about = "Reorder, remove, merge and compress PDF pages", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Move one page to a new zero-based position
    MovePage {
        /// PDF file to edit
        file: PathBuf,
        /// Current position of the page
        #[arg(allow_hyphen_values = true)]
        source: i64,
        /// Position the page ends up at
        #[arg(allow_hyphen_values = true)]
        target: i64,
        /// Write the result here instead of editing in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove the page at a zero-based position
    RemovePage {
        /// PDF file to edit
        file: PathBuf,
        /// Position of the page to remove
        #[arg(allow_hyphen_values = true)]
        index: i64,
        /// Write the result here instead of editing in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Concatenate the pages of several PDFs, in argument order
    Merge {
        /// Input PDF files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Compress a PDF in place with Ghostscript
    Compress {
        /// PDF file to compress
        file: PathBuf,
        /// Ghostscript executable
        #[arg(long, env = "GS_BINARY")]
        gs: Option<PathBuf>,
        /// Seconds before the run is killed (0 = no limit)
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Delete files in a directory not modified for a while
    Sweep {
        /// Directory to sweep
        dir: PathBuf,
        /// Seconds a file may stay idle
        #[arg(long)]
        max_age: Option<u64>,
    },
}

/// Load, edit and save a document.
fn edit_file(
    file: &Path,
    output: Option<&Path>,
    op: impl FnOnce(&mut PdfDocument) -> pdf_workshop_core::Result<()>,
) -> Result<usize> {
    let mut doc = PdfDocument::from_file(file)
        .with_context(|| format!("Failed to load PDF: {}", file.display()))?;
    op(&mut doc)?;

    let bytes = doc.to_bytes().context("Failed to serialize PDF")?;
    let output = output.unwrap_or(file);
    std::fs::write(output, bytes)
        .with_context(|| format!("Failed to write output: {}", output.display()))?;

    Ok(doc.page_count())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let default_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    // Load or create config
    let config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };

    let summary = match args.command {
        Command::MovePage {
            file,
            source,
            target,
            output,
        } => {
            let count = edit_file(&file, output.as_deref(), |doc| move_page(doc, source, target))?;
            format!("Moved page {source} to {target} ({count} pages)")
        }

        Command::RemovePage {
            file,
            index,
            output,
        } => {
            let count = edit_file(&file, output.as_deref(), |doc| remove_page(doc, index))?;
            format!("Removed page {index} ({count} pages left)")
        }

        Command::Merge { inputs, output } => {
            info!("Merging {} files", inputs.len());
            let mut merged = merge_files(&inputs).context("Failed to merge PDFs")?;
            let bytes = merged.to_bytes().context("Failed to serialize PDF")?;
            std::fs::write(&output, bytes)
                .with_context(|| format!("Failed to write output: {}", output.display()))?;
            format!(
                "Merged {} files into {} ({} pages)",
                inputs.len(),
                output.display(),
                merged.page_count()
            )
        }

        Command::Compress { file, gs, timeout } => {
            let binary = gs.unwrap_or_else(|| config.compressor.binary.clone());
            let timeout = match timeout {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => config.compressor.timeout(),
            };

            let before = std::fs::metadata(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?
                .len();
            compress_in_place(&GhostscriptCompressor::new(binary), &file, timeout)
                .await
                .context("Failed to compress PDF")?;
            let after = std::fs::metadata(&file)?.len();

            format!("Compressed {}: {} -> {} bytes", file.display(), before, after)
        }

        Command::Sweep { dir, max_age } => {
            let retention = max_age.map_or_else(|| config.retention.max_age(), Duration::from_secs);
            let report = Sweeper::new(&dir, retention, config.retention.sweep_interval())
                .sweep()
                .with_context(|| format!("Failed to sweep {}", dir.display()))?;
            format!(
                "Swept {}: {} scanned, {} deleted, {} failed",
                dir.display(),
                report.scanned,
                report.deleted,
                report.failed
            )
        }
    };

    // CLI output is intentional
    #[allow(clippy::print_stdout)]
    {
        println!("{summary}");
    }

    Ok(())
}
