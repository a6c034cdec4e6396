//! Multi-document merge.

use std::path::Path;

use tracing::debug;

use super::document::PdfDocument;
use super::editor::PageSequence;
use crate::error::Result;

/// Concatenate the pages of `paths`, in list order, into a new document.
///
/// Each source is loaded on its own turn and contributes all of its pages in
/// their original order. Sources are only read, never modified. An empty list
/// yields a document with zero pages.
pub fn merge_files<P: AsRef<Path>>(paths: &[P]) -> Result<PdfDocument> {
    let mut merged = PdfDocument::new_empty();

    for path in paths {
        let source = PdfDocument::from_file(path)?;
        let all_pages: Vec<usize> = (0..source.page_count()).collect();
        debug!(
            "Merging {} pages from {}",
            all_pages.len(),
            path.as_ref().display()
        );
        merged.copy_pages_from(source, &all_pages)?;
    }

    Ok(merged)
}
