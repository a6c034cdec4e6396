//! Page reordering and removal over any page sequence.
//!
//! Both operations validate every index against the *current* page count
//! before mutating, so a failed call leaves the document untouched.

use super::page_index::PageIndex;
use crate::error::{Error, Result};

/// The capabilities the editor needs from a document.
///
/// Pages have no identity beyond their position: removing or inserting shifts
/// every later page by one.
pub trait PageSequence {
    type Page: Clone;

    fn page_count(&self) -> usize;

    fn page_at(&self, index: usize) -> Option<Self::Page>;

    /// Remove the page at `index`. Callers guarantee `index < page_count()`.
    fn remove_page_at(&mut self, index: usize);

    /// Insert `page` before position `index`. Callers guarantee
    /// `index <= page_count()`.
    fn insert_page_at(&mut self, index: usize, page: Self::Page);
}

impl<T: Clone> PageSequence for Vec<T> {
    type Page = T;

    fn page_count(&self) -> usize {
        self.len()
    }

    fn page_at(&self, index: usize) -> Option<T> {
        self.get(index).cloned()
    }

    fn remove_page_at(&mut self, index: usize) {
        self.remove(index);
    }

    fn insert_page_at(&mut self, index: usize, page: T) {
        self.insert(index, page);
    }
}

/// Remove exactly one page; later pages shift left by one.
pub fn remove_page<D: PageSequence + ?Sized>(doc: &mut D, index: i64) -> Result<()> {
    let index = PageIndex::checked(index, doc.page_count())?;
    doc.remove_page_at(index.as_usize());
    Ok(())
}

/// Move the page at `source` so it ends up at `target`.
///
/// The page is taken out first and `target` is applied to the shortened
/// sequence (list-splice semantics, not a swap).
pub fn move_page<D: PageSequence + ?Sized>(doc: &mut D, source: i64, target: i64) -> Result<()> {
    let total = doc.page_count();
    let from = PageIndex::checked(source, total)?;
    let to = PageIndex::checked(target, total)?;

    if from == to {
        return Ok(());
    }

    let page = doc
        .page_at(from.as_usize())
        .ok_or(Error::InvalidPageIndex { index: source, total })?;
    doc.remove_page_at(from.as_usize());
    doc.insert_page_at(to.as_usize(), page);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pages(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("page{i}")).collect()
    }

    #[test]
    fn test_remove_valid_index() {
        let mut doc = pages(3);
        remove_page(&mut doc, 1).unwrap();
        assert_eq!(doc, ["page1", "page3"]);
    }

    #[test]
    fn test_remove_every_position() {
        for n in 1..6 {
            for i in 0..n {
                let mut doc = pages(n);
                let original = doc.clone();
                remove_page(&mut doc, i64::try_from(i).unwrap()).unwrap();

                assert_eq!(doc.len(), n - 1);
                assert_eq!(doc[..i], original[..i]);
                assert_eq!(doc[i..], original[i + 1..]);
            }
        }
    }

    #[test]
    fn test_remove_last_page_leaves_empty_document() {
        let mut doc = pages(1);
        remove_page(&mut doc, 0).unwrap();
        assert!(doc.is_empty());
        assert!(remove_page(&mut doc, 0).is_err());
    }

    #[test]
    fn test_remove_out_of_bounds_does_not_mutate() {
        for index in [-1, 3, 5, i64::MAX, i64::MIN] {
            let mut doc = pages(3);
            let err = remove_page(&mut doc, index).unwrap_err();
            assert!(matches!(err, Error::InvalidPageIndex { .. }));
            assert_eq!(doc, pages(3));
        }
    }

    #[test]
    fn test_move_forward() {
        let mut doc = pages(3);
        move_page(&mut doc, 1, 2).unwrap();
        assert_eq!(doc, ["page1", "page3", "page2"]);
    }

    #[test]
    fn test_move_backward() {
        let mut doc = pages(4);
        move_page(&mut doc, 3, 0).unwrap();
        assert_eq!(doc, ["page4", "page1", "page2", "page3"]);
    }

    #[test]
    fn test_move_target_is_post_removal_position() {
        // Splice semantics: 0 -> 2 on [a, b, c, d] gives [b, c, a, d]
        let mut doc = vec!["a", "b", "c", "d"];
        move_page(&mut doc, 0, 2).unwrap();
        assert_eq!(doc, ["b", "c", "a", "d"]);
    }

    #[test]
    fn test_move_same_index_is_noop() {
        for k in 0..3 {
            let mut doc = pages(3);
            move_page(&mut doc, k, k).unwrap();
            assert_eq!(doc, pages(3));
        }
    }

    #[test]
    fn test_move_invalid_indices_do_not_mutate() {
        for (source, target) in [(-1, 0), (0, -1), (3, 0), (0, 3), (10, 10)] {
            let mut doc = pages(3);
            let err = move_page(&mut doc, source, target).unwrap_err();
            assert!(matches!(err, Error::InvalidPageIndex { .. }));
            assert_eq!(doc, pages(3));
        }
    }

    #[test]
    fn test_move_on_empty_document_fails() {
        let mut doc: Vec<String> = Vec::new();
        assert!(move_page(&mut doc, 0, 0).is_err());
    }
}
