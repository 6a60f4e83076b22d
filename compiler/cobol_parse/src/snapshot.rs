//! Parser snapshots for re-walking a token range.
//!
//! The resolution pass re-reads the DATA DIVISION from a snapshot taken
//! before the declaration pass. A snapshot captures the cursor position
//! and the pass only; arena contents and reported diagnostics are not
//! rolled back.

use crate::session::Pass;
use crate::Parser;

/// A lightweight snapshot of parser state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserSnapshot {
    /// Position in the token stream.
    pub(crate) cursor_pos: usize,
    /// Pass that was running when the snapshot was taken.
    pub(crate) pass: Pass,
}

impl ParserSnapshot {
    #[inline]
    pub(crate) fn new(cursor_pos: usize, pass: Pass) -> Self {
        ParserSnapshot { cursor_pos, pass }
    }
}

impl Parser<'_> {
    /// Capture the current position and pass.
    pub fn snapshot(&self) -> ParserSnapshot {
        ParserSnapshot::new(self.cursor.position(), self.session.pass())
    }

    /// Move back (or forward) to a snapshot and resume its pass.
    pub fn restore(&mut self, snapshot: ParserSnapshot) {
        self.cursor.set_position(snapshot.cursor_pos);
        if self.session.pass() != snapshot.pass {
            self.session.set_pass(snapshot.pass);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_size() {
        assert!(
            std::mem::size_of::<ParserSnapshot>() <= 16,
            "ParserSnapshot should be small (got {} bytes)",
            std::mem::size_of::<ParserSnapshot>()
        );
    }

    #[test]
    fn test_restore_rewinds_cursor_and_pass() {
        let tokens = crate::tests::support::lex("01 A PIC X. 01 B PIC X.");
        let mut parser = Parser::new(&tokens, &crate::ParseOptions::default());
        let snapshot = parser.snapshot();
        parser.cursor.advance_by(4);
        parser.session.set_pass(Pass::Resolution);

        parser.restore(snapshot);
        assert_eq!(parser.cursor.position(), 0);
        assert_eq!(parser.session.pass(), Pass::Declaration);
    }
}
