//! Error recovery for the parser.
//!
//! A [`SyncSet`] names the tokens parsing may safely resume at: keyword
//! groups matched by spelling plus a mask of token kinds. Sets are `const`
//! so each grammar level declares its own without allocation.

use cobol_ir::{Token, TokenMask};

use crate::cursor::Cursor;
use crate::keywords::{DATA_SECTIONS, FILE_INDICATORS, TERMINATORS, UNIT_HEADERS, VERBS};

/// Tokens at which parsing can resume after an error.
///
/// # Example
/// ```ignore
/// const CLAUSE_END: SyncSet = SyncSet::new(&[&["."]]);
///
/// synchronize(&mut cursor, &CLAUSE_END);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SyncSet {
    keywords: &'static [&'static [&'static str]],
    kinds: TokenMask,
}

impl SyncSet {
    /// A set of keyword groups.
    pub const fn new(keywords: &'static [&'static [&'static str]]) -> Self {
        SyncSet {
            keywords,
            kinds: TokenMask::empty(),
        }
    }

    /// Also stop at any token of the given kinds.
    #[must_use]
    pub const fn with_kinds(self, kinds: TokenMask) -> Self {
        SyncSet {
            keywords: self.keywords,
            kinds: self.kinds.union(kinds),
        }
    }

    /// Check if parsing may resume at `token`.
    pub fn contains(&self, token: &Token) -> bool {
        token.is_kind(self.kinds)
            || self
                .keywords
                .iter()
                .any(|group| group.iter().any(|k| token.is(k)))
    }
}

const PERIOD: &[&str] = &["."];
const DIVISION_WORDS: &[&str] = &["IDENTIFICATION", "ID", "ENVIRONMENT", "DATA", "PROCEDURE", "END"];

/// Resume at the separator period of a data entry, or at the next section.
pub const DATA_ENTRY: SyncSet =
    SyncSet::new(&[PERIOD, DATA_SECTIONS, FILE_INDICATORS, DIVISION_WORDS, UNIT_HEADERS]);

/// Resume at the next statement, sentence end or scope terminator.
pub const STATEMENT: SyncSet =
    SyncSet::new(&[PERIOD, VERBS, TERMINATORS, &["ELSE", "WHEN"]]);

/// Resume at the next division or unit header.
pub const DIVISION: SyncSet = SyncSet::new(&[DIVISION_WORDS, UNIT_HEADERS]);

/// Skip tokens until one in `set` or an end-of-unit marker.
///
/// Returns `true` if a synchronization point was found, `false` if the
/// unit ran out first.
pub fn synchronize(cursor: &mut Cursor<'_>, set: &SyncSet) -> bool {
    while !cursor.is_at_end() {
        if set.contains(cursor.current()) {
            return true;
        }
        cursor.advance();
    }
    false
}
