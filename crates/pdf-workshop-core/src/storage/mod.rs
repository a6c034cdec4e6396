//! Flat on-disk storage for uploaded documents.
//!
//! Every stored document is a single `<id>.pdf` file in one directory. The
//! file is the only source of truth between requests: operations read it,
//! work on a private in-memory copy and write the result back.
//!
//! Writes go through a temp sibling in the same directory followed by a
//! rename, so readers see either the old or the new content. Two concurrent
//! edits of the same id still race (last writer wins).

mod id;
mod upload;

pub use id::DocumentId;
pub use upload::{PDF_SIGNATURE, PendingUpload, is_pdf};

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};

/// Prefix of in-flight temp files; they never match `<id>.pdf`.
pub(crate) const TEMP_PREFIX: &str = ".pending-";
/// Suffix of in-flight temp files.
pub(crate) const TEMP_SUFFIX: &str = ".tmp";

/// Identifier-to-file mapping over a single storage directory.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        debug!("Opened document store at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the backing file for `id` (whether or not it exists).
    pub fn path_for(&self, id: &DocumentId) -> PathBuf {
        self.dir.join(id.file_name())
    }

    /// Resolve an identifier to an existing file.
    ///
    /// Missing, empty and unsafe identifiers, as well as identifiers with no
    /// backing file, all yield `None`.
    pub fn resolve(&self, id: Option<&str>) -> Option<PathBuf> {
        let id = DocumentId::parse(id?)?;
        let path = self.path_for(&id);
        if path.is_file() {
            Some(path)
        } else {
            debug!("No stored document for {}", id);
            None
        }
    }

    /// Like [`resolve`](Self::resolve), but a miss is an [`Error::NotFound`].
    pub fn locate(&self, id: &str) -> Result<PathBuf> {
        self.resolve(Some(id))
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Read the stored bytes for `id`.
    ///
    /// A file deleted between lookup and read (e.g. by the sweeper) is
    /// reported as not found rather than as an I/O failure.
    pub fn read(&self, id: &str) -> Result<Vec<u8>> {
        let path = self.locate(id)?;
        std::fs::read(&path).map_err(|e| not_found_or_io(e, id))
    }

    /// Atomically replace (or create) `path` with `bytes`.
    pub fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let mut staged = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(&self.dir)?;
        staged.write_all(bytes)?;
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    /// Persist `bytes` as a new stored document under a fresh identifier.
    pub fn insert(&self, bytes: &[u8]) -> Result<DocumentId> {
        let id = DocumentId::generate();
        self.write(&self.path_for(&id), bytes)?;
        debug!("Stored document {} ({} bytes)", id, bytes.len());
        Ok(id)
    }
}

pub(crate) fn not_found_or_io(e: io::Error, id: &str) -> Error {
    if e.kind() == io::ErrorKind::NotFound {
        Error::NotFound(id.to_string())
    } else {
        Error::Io(e)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, DocumentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_resolve_existing() {
        let (_dir, store) = store();
        std::fs::write(store.dir().join("12345.pdf"), b"%PDF-1.4").unwrap();

        let path = store.resolve(Some("12345")).unwrap();
        assert_eq!(path, store.dir().join("12345.pdf"));
    }

    #[test]
    fn test_resolve_absent_cases() {
        let (_dir, store) = store();
        assert!(store.resolve(None).is_none());
        assert!(store.resolve(Some("")).is_none());
        assert!(store.resolve(Some("12345")).is_none());
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let (dir, store) = store();
        // A real file outside the naming scheme must still be unreachable
        std::fs::write(dir.path().join("secret.pdf"), b"%PDF").unwrap();
        assert!(store.resolve(Some("../secret")).is_none());
        assert!(store.resolve(Some("sub/secret")).is_none());
        assert!(store.resolve(Some("..")).is_none());
    }

    #[test]
    fn test_resolve_ignores_directories() {
        let (_dir, store) = store();
        std::fs::create_dir(store.dir().join("folder.pdf")).unwrap();
        assert!(store.resolve(Some("folder")).is_none());
    }

    #[test]
    fn test_insert_and_read() {
        let (_dir, store) = store();
        let id = store.insert(b"%PDF-1.7 body").unwrap();
        assert_eq!(store.read(id.as_str()).unwrap(), b"%PDF-1.7 body");
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let (_dir, store) = store();
        assert!(matches!(store.read("nope"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_not_found_or_io_keeps_only_the_id() {
        let err = not_found_or_io(io::Error::from(io::ErrorKind::NotFound), "abc");
        assert!(matches!(&err, Error::NotFound(id) if id == "abc"));

        let err = not_found_or_io(io::Error::from(io::ErrorKind::PermissionDenied), "abc");
        assert!(matches!(err, Error::Io(e) if e.kind() == io::ErrorKind::PermissionDenied));
    }

    #[test]
    fn test_write_replaces_without_leftovers() {
        let (_dir, store) = store();
        let id = store.insert(b"old").unwrap();
        store.write(&store.path_for(&id), b"new").unwrap();

        assert_eq!(store.read(id.as_str()).unwrap(), b"new");
        let entries = std::fs::read_dir(store.dir()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
