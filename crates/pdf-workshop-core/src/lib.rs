//! PDF Workshop Core Library
//!
//! This library provides the document operations behind the workshop:
//! - Flat identifier-to-file storage with upload validation
//! - Page reordering and removal
//! - Merging documents into a new one
//! - In-place compression through an external optimizer
//! - Expiry sweeping of idle documents

pub mod compress;
pub mod config;
pub mod error;
pub mod pdf;
pub mod storage;
pub mod sweeper;
pub mod util;

pub use compress::{Compressor, GhostscriptCompressor, compress_in_place, create_compressor};
pub use config::{AppConfig, CompressorConfig, RetentionConfig, StorageConfig};
pub use error::{Error, ErrorKind, Result};
pub use pdf::{PageIndex, PageSequence, PdfDocument, merge_files, move_page, remove_page};
pub use storage::{DocumentId, DocumentStore, PendingUpload, is_pdf};
pub use sweeper::{SweepReport, Sweeper, SweeperHandle};

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// High-level entry point that ties storage, editing and compression together.
///
/// Every operation works on the stored file: it is resolved, loaded into a
/// private copy, transformed and written back (or written as a new document).
/// Codec work runs on the blocking pool.
#[derive(Clone)]
pub struct Workshop {
    store: DocumentStore,
    compressor: Arc<dyn Compressor>,
    compress_timeout: Option<Duration>,
}

impl Workshop {
    /// Create a workshop from configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let store = DocumentStore::open(&config.storage.dir)?;
        Ok(Self::with_compressor(
            store,
            create_compressor(&config.compressor),
            config.compressor.timeout(),
        ))
    }

    /// Create with a custom compressor
    pub fn with_compressor(
        store: DocumentStore,
        compressor: Arc<dyn Compressor>,
        compress_timeout: Option<Duration>,
    ) -> Self {
        Self {
            store,
            compressor,
            compress_timeout,
        }
    }

    pub const fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn compressor_name(&self) -> &'static str {
        self.compressor.name()
    }

    /// Validate and persist an uploaded document
    pub async fn upload(&self, upload: PendingUpload) -> Result<DocumentId> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.admit(upload)).await?
    }

    /// Stored bytes of a document, unchanged
    pub async fn fetch(&self, id: &str) -> Result<Vec<u8>> {
        let store = self.store.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || store.read(&id)).await?
    }

    /// Move the page at `source` to `target` and persist the result
    pub async fn move_page(&self, id: &str, source: i64, target: i64) -> Result<()> {
        self.edit(id, move |doc| pdf::move_page(doc, source, target))
            .await?;
        info!("Moved page {} to {} in {}", source, target, id);
        Ok(())
    }

    /// Remove the page at `index` and persist the result
    pub async fn remove_page(&self, id: &str, index: i64) -> Result<()> {
        self.edit(id, move |doc| pdf::remove_page(doc, index)).await?;
        info!("Removed page {} from {}", index, id);
        Ok(())
    }

    /// Concatenate the pages of `ids` (in list order) into a new document.
    ///
    /// Every identifier is resolved before anything is loaded; one miss
    /// aborts the merge and nothing is written.
    pub async fn merge(&self, ids: &[String]) -> Result<DocumentId> {
        let paths = ids
            .iter()
            .map(|id| self.store.locate(id))
            .collect::<Result<Vec<_>>>()?;

        let store = self.store.clone();
        let merged_id = tokio::task::spawn_blocking(move || {
            let mut merged = merge_files(&paths)?;
            let bytes = merged.to_bytes()?;
            store.insert(&bytes)
        })
        .await??;

        info!("Merged {} documents into {}", ids.len(), merged_id);
        Ok(merged_id)
    }

    /// Compress a stored document in place
    pub async fn compress(&self, id: &str) -> Result<()> {
        let path = self.store.locate(id)?;
        compress_in_place(self.compressor.as_ref(), &path, self.compress_timeout).await
    }

    /// Sweeper over this workshop's storage directory
    pub fn sweeper(&self, retention: &RetentionConfig) -> Sweeper {
        Sweeper::from_config(self.store.dir(), retention)
    }

    async fn edit<F>(&self, id: &str, op: F) -> Result<()>
    where
        F: FnOnce(&mut PdfDocument) -> Result<()> + Send + 'static,
    {
        let path = self.store.locate(id)?;
        let store = self.store.clone();
        let id = id.to_string();

        tokio::task::spawn_blocking(move || {
            let bytes = std::fs::read(&path).map_err(|e| storage::not_found_or_io(e, &id))?;
            let mut doc = PdfDocument::from_bytes(&bytes)?;
            op(&mut doc)?;
            let bytes = doc.to_bytes()?;
            store.write(&path, &bytes)
        })
        .await?
    }
}

impl std::fmt::Debug for Workshop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workshop")
            .field("store", &self.store)
            .field("compressor", &self.compressor.name())
            .field("compress_timeout", &self.compress_timeout)
            .finish()
    }
}
