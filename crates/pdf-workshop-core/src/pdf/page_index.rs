//! Page index newtype for validated, zero-based page positions.
//!
//! Raw indices arrive as signed numbers (or strings from a query) and are only
//! turned into a `PageIndex` once they have been checked against the
//! document's current page count.

use std::fmt;

use crate::error::Error;

/// A zero-based page position known to be inside `[0, total)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageIndex(usize);

impl PageIndex {
    /// Get the index as usize for Rust collections.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// Parse a raw request parameter into a signed index.
    ///
    /// Only plain integers are accepted; decimals, `NaN`, empty strings and
    /// garbage fail with [`Error::InvalidArgument`]. Range is not checked here.
    pub fn parse(raw: &str, name: &str) -> Result<i64, Error> {
        raw.trim().parse::<i64>().map_err(|_| {
            Error::InvalidArgument(format!(
                "{name} should be whole number between 0 and (max page-1) on a non empty pdf"
            ))
        })
    }

    /// Validate `index` against the document's current page count.
    pub fn checked(index: i64, total: usize) -> Result<Self, Error> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < total)
            .map(Self)
            .ok_or(Error::InvalidPageIndex { index, total })
    }
}

impl fmt::Display for PageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_valid() {
        let idx = PageIndex::checked(2, 3).unwrap();
        assert_eq!(idx.as_usize(), 2);
    }

    #[test]
    fn test_checked_out_of_range() {
        assert!(matches!(
            PageIndex::checked(3, 3),
            Err(Error::InvalidPageIndex { index: 3, total: 3 })
        ));
        assert!(PageIndex::checked(-1, 3).is_err());
        assert!(PageIndex::checked(0, 0).is_err());
    }

    #[test]
    fn test_parse_integers() {
        assert_eq!(PageIndex::parse("0", "pageIndex").unwrap(), 0);
        assert_eq!(PageIndex::parse(" 7 ", "pageIndex").unwrap(), 7);
        assert_eq!(PageIndex::parse("-2", "pageIndex").unwrap(), -2);
    }

    #[test]
    fn test_parse_rejects_non_integers() {
        for raw in ["", "NaN", "1.5", "abc", "1e3", "Infinity"] {
            let err = PageIndex::parse(raw, "pageIndex").unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "accepted {raw:?}");
        }
    }

    #[test]
    fn test_display() {
        let idx = PageIndex::checked(7, 10).unwrap();
        assert_eq!(format!("{idx}"), "7");
    }
}
