//! Document identifier newtype.
//!
//! Identifiers double as filename stems, so anything that could escape the
//! storage directory is refused at parse time.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of one stored document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Generate a fresh random identifier (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accept an externally supplied identifier.
    ///
    /// Returns `None` for empty strings and for anything outside
    /// `[A-Za-z0-9_-]`, which rules out separators, `..` and NUL.
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = !raw.is_empty()
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        valid.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the backing file inside the storage directory.
    pub fn file_name(&self) -> String {
        format!("{}.pdf", self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_parseable_and_unique() {
        let a = DocumentId::generate();
        let b = DocumentId::generate();
        assert_ne!(a, b);
        assert_eq!(DocumentId::parse(a.as_str()).unwrap(), a);
    }

    #[test]
    fn test_rejects_unsafe_ids() {
        for raw in ["", "..", "../etc/passwd", "a/b", "a\\b", "a\0b", "a b", "x.pdf"] {
            assert!(DocumentId::parse(raw).is_none(), "accepted {raw:?}");
        }
    }

    #[test]
    fn test_file_name() {
        let id = DocumentId::parse("12345").unwrap();
        assert_eq!(id.file_name(), "12345.pdf");
        assert_eq!(id.to_string(), "12345");
    }
}
