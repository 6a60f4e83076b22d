//! Source locations.
//!
//! Tokens arrive pre-lexed, so positions are carried as line/column pairs
//! instead of byte offsets.

use std::fmt;

/// Position of a token in the original source.
///
/// `file` indexes the host's list of source files (copybooks included),
/// `line` and `column` are 1-based.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceLoc {
    pub file: u16,
    pub line: u32,
    pub column: u32,
}

impl SourceLoc {
    /// Location for synthesized tokens that have no source text.
    pub const DUMMY: SourceLoc = SourceLoc {
        file: 0,
        line: 0,
        column: 0,
    };

    /// Create a new location.
    #[inline]
    pub const fn new(file: u16, line: u32, column: u32) -> Self {
        SourceLoc { file, line, column }
    }

    /// Check if this is the dummy location.
    #[inline]
    pub const fn is_dummy(&self) -> bool {
        self.line == 0 && self.column == 0
    }
}

impl fmt::Debug for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dummy_location() {
        assert!(SourceLoc::DUMMY.is_dummy());
        assert!(!SourceLoc::new(0, 1, 8).is_dummy());
    }

    #[test]
    fn test_location_ordering() {
        let a = SourceLoc::new(0, 3, 12);
        let b = SourceLoc::new(0, 4, 8);
        let c = SourceLoc::new(0, 4, 20);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_location_formatting() {
        let loc = SourceLoc::new(2, 14, 8);
        assert_eq!(loc.to_string(), "14:8");
        assert_eq!(format!("{loc:?}"), "2:14:8");
    }
}
