use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;

use super::editor::PageSequence;
use crate::error::{Error, Result};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// A loaded PDF with a flat, position-indexed page list.
///
/// On load every page is re-parented directly under the root `Pages` node and
/// receives copies of any attributes it used to inherit, so a page can be
/// moved or copied to another document without changing how it renders. The
/// page order lives in `pages` and is written back to the root's `Kids` when
/// the document is serialized.
pub struct PdfDocument {
    inner: Document,
    /// Root `Pages` node
    pages_id: ObjectId,
    /// Page objects in display order
    pages: Vec<ObjectId>,
}

impl PdfDocument {
    /// Create a document with zero pages
    pub fn new_empty() -> Self {
        let mut inner = Document::with_version("1.7");
        let pages_id = inner.new_object_id();
        inner.objects.insert(
            pages_id,
            Object::Dictionary(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Kids", Object::Array(Vec::new())),
                ("Count", Object::Integer(0)),
            ])),
        );
        let catalog_id = inner.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        inner.trailer.set("Root", Object::Reference(catalog_id));

        Self {
            inner,
            pages_id,
            pages: Vec::new(),
        }
    }

    /// Open a PDF from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(bytes)
            .map_err(|e| Error::PdfOpen(format!("Failed to parse PDF: {e}")))?;
        Self::from_document(inner)
    }

    /// Open a PDF from a file path.
    ///
    /// A missing file is reported by its stem only, never by its full path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                let stem = path.file_stem().unwrap_or_default();
                Error::NotFound(stem.to_string_lossy().into_owned())
            } else {
                Error::Io(e)
            }
        })?;
        Self::from_bytes(&bytes)
    }

    fn from_document(mut inner: Document) -> Result<Self> {
        let pages_id = inner
            .catalog()
            .and_then(|catalog| catalog.get(b"Pages"))
            .and_then(Object::as_reference)
            .map_err(|e| Error::PdfOpen(format!("Missing page tree: {e}")))?;

        let pages: Vec<ObjectId> = inner.get_pages().into_values().collect();

        for &page_id in &pages {
            let inherited: Vec<(&[u8], Object)> = INHERITABLE_KEYS
                .iter()
                .filter(|key| {
                    inner
                        .get_dictionary(page_id)
                        .is_ok_and(|page| !page.has(key))
                })
                .filter_map(|key| inherited_attribute(&inner, page_id, key).map(|v| (*key, v)))
                .collect();

            let page = page_dict_mut(&mut inner, page_id)?;
            for (key, value) in inherited {
                page.set(key, value);
            }
            page.set("Parent", Object::Reference(pages_id));
        }

        debug!("Loaded PDF with {} pages", pages.len());

        Ok(Self {
            inner,
            pages_id,
            pages,
        })
    }

    /// Serialize the document.
    ///
    /// Rewrites the root page list from the current order and drops objects
    /// nothing refers to any more (removed pages and their resources).
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.sync_page_tree()?;
        self.inner.prune_objects();

        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| Error::PdfSave(e.to_string()))?;
        Ok(buffer)
    }

    /// Append copies of `other`'s pages at `indices` (in that order).
    ///
    /// `other`'s objects are renumbered past this document's highest id before
    /// they are moved over, so the two id spaces never collide.
    pub fn copy_pages_from(&mut self, mut other: Self, indices: &[usize]) -> Result<()> {
        let total = other.pages.len();
        if let Some(&bad) = indices.iter().find(|&&i| i >= total) {
            return Err(Error::InvalidPageIndex {
                index: i64::try_from(bad).unwrap_or(i64::MAX),
                total,
            });
        }

        other.sync_page_tree()?;
        other.inner.renumber_objects_with(self.inner.max_id + 1);

        let renumbered: Vec<ObjectId> = other.inner.get_pages().into_values().collect();
        let selected: Vec<ObjectId> = indices
            .iter()
            .filter_map(|&i| renumbered.get(i).copied())
            .collect();

        for (object_id, object) in std::mem::take(&mut other.inner.objects) {
            match object.type_name().unwrap_or(b"") {
                b"Catalog" | b"Pages" | b"Outlines" | b"Outline" => {}
                b"Page" if !selected.contains(&object_id) => {}
                _ => {
                    self.inner.objects.insert(object_id, object);
                }
            }
        }
        self.inner.max_id = self.inner.max_id.max(other.inner.max_id);

        for page_id in selected {
            page_dict_mut(&mut self.inner, page_id)?.set("Parent", Object::Reference(self.pages_id));
            self.pages.push(page_id);
        }

        Ok(())
    }

    fn sync_page_tree(&mut self) -> Result<()> {
        let kids = self.pages.iter().map(|&id| Object::Reference(id)).collect();
        let count = i64::try_from(self.pages.len()).unwrap_or(i64::MAX);

        let root = self
            .inner
            .get_object_mut(self.pages_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| Error::Lopdf(format!("Invalid page tree root: {e}")))?;
        root.set("Kids", Object::Array(kids));
        root.set("Count", Object::Integer(count));
        root.remove(b"Parent");
        Ok(())
    }
}

fn page_dict_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary> {
    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| Error::Lopdf(format!("Invalid page object {page_id:?}: {e}")))
}

/// Walk up the `Parent` chain looking for `key`.
fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent_id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
    }
    None
}

impl PageSequence for PdfDocument {
    type Page = ObjectId;

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_at(&self, index: usize) -> Option<ObjectId> {
        self.pages.get(index).copied()
    }

    fn remove_page_at(&mut self, index: usize) {
        self.pages.remove(index);
    }

    fn insert_page_at(&mut self, index: usize, page: ObjectId) {
        self.pages.insert(index, page);
    }
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new_empty()
    }
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("page_count", &self.pages.len())
            .field("objects", &self.inner.objects.len())
            .finish_non_exhaustive()
    }
}
