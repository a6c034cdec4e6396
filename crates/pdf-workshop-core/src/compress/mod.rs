//! In-place document compression through an external optimizer.
//!
//! The optimizer writes to a private temp file next to the document, named
//! like the store's other in-flight files so it never resolves as an
//! identifier. Only a successful run with a non-empty result is renamed over
//! the original. Every failure path removes the temp output and leaves the
//! original bytes as they were.

mod ghostscript;
mod traits;

pub use ghostscript::GhostscriptCompressor;
pub use traits::Compressor;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempPath;
use tracing::{debug, info, warn};

use crate::config::CompressorConfig;
use crate::error::{Error, Result};
use crate::storage::{TEMP_PREFIX, TEMP_SUFFIX};

/// Create a compressor from configuration
pub fn create_compressor(config: &CompressorConfig) -> Arc<dyn Compressor> {
    Arc::new(GhostscriptCompressor::new(config.binary.clone()))
}

/// Reserve a fresh temp output in the directory holding `path`.
///
/// The file is removed when the returned handle is dropped, unless it has
/// been persisted.
fn staging_file(path: &Path) -> Result<TempPath> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let staged = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)?;
    Ok(staged.into_temp_path())
}

/// Compress the file at `path` in place.
///
/// With a `timeout`, a run that takes longer is cancelled (the compressor
/// future is dropped) and reported as [`Error::Timeout`]. Concurrent runs on
/// the same file each get their own temp output.
pub async fn compress_in_place(
    compressor: &dyn Compressor,
    path: &Path,
    timeout: Option<Duration>,
) -> Result<()> {
    if path.file_name().is_none() {
        return Err(Error::InvalidArgument(format!(
            "not a document path: {}",
            path.display()
        )));
    }
    let temp = staging_file(path)?;
    debug!("Staging compressed {} in {}", path.display(), temp.display());

    let run = compressor.compress(path, &temp);
    let outcome = match timeout {
        Some(limit) => tokio::time::timeout(limit, run)
            .await
            .unwrap_or_else(|_| Err(Error::Timeout(limit.as_secs()))),
        None => run.await,
    };

    // On every error path `temp` is dropped, which removes the partial output
    let promoted = match outcome {
        Ok(()) => promote(temp, path),
        Err(e) => Err(e),
    };

    if let Err(e) = promoted {
        warn!(
            "Failed to compress {} with {}: {}",
            path.display(),
            compressor.name(),
            e
        );
        return Err(e);
    }

    info!("Compressed {} with {}", path.display(), compressor.name());
    Ok(())
}

fn promote(temp: TempPath, path: &Path) -> Result<()> {
    match std::fs::metadata(&temp) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => {}
        _ => {
            return Err(Error::ExternalTool(
                "compressor reported success but produced no output".to_string(),
            ));
        }
    }
    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
