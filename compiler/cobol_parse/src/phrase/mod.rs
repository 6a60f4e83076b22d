//! Optional phrase families shared across statements.
//!
//! Phrases may come in any order and each may be given once per statement.
//! Every family is matched by one dispatch loop per statement that keeps an
//! explicit record of what was already seen, so repeated phrases are
//! reported without recursion.

mod inspect;


use cobol_diagnostic::ErrorCode;
use cobol_ir::{
    AdvanceBy, Advancing, Branch, LocaleSelection, Qualifier, Qualifiers, Raising, SourceLoc,
    Statement, StatusKind, StatusPhrase, Token, TokenKind, TokenMask,
};
use smallvec::SmallVec;
use tracing::debug;

use crate::keywords::UNIT_END_WORDS;
use crate::{Cursor, ParseError, Parser};

/// A conditional phrase family: `[noise] head [trailing]`, optionally
/// negated with a leading `NOT`.
#[derive(Debug)]
pub struct PhraseFamily {
    /// Canonical spelling, used for branch labels.
    pub name: &'static str,
    noise: Option<&'static str>,
    heads: &'static [&'static [&'static str]],
    trailing: Option<&'static str>,
}

impl PhraseFamily {
    const fn new(
        name: &'static str,
        noise: Option<&'static str>,
        heads: &'static [&'static [&'static str]],
        trailing: Option<&'static str>,
    ) -> Self {
        PhraseFamily {
            name,
            noise,
            heads,
            trailing,
        }
    }

    /// Length of the positive phrase starting `at` tokens ahead.
    fn match_len(&self, cursor: &Cursor<'_>, at: usize) -> Option<usize> {
        let mut pos = at;
        if let Some(noise) = self.noise {
            if cursor.check_at(pos, noise) {
                pos += 1;
            }
        }
        let head = self
            .heads
            .iter()
            .find(|head| head.iter().enumerate().all(|(i, word)| cursor.check_at(pos + i, word)))?;
        pos += head.len();
        // `END PROGRAM x` closes a unit, it is not an AT END phrase.
        if head.len() == 1
            && head[0] == "END"
            && (UNIT_END_WORDS.iter().any(|w| cursor.check_at(pos, w))
                || cursor.check_at(pos, "DECLARATIVES"))
        {
            return None;
        }
        if let Some(trailing) = self.trailing {
            if cursor.check_at(pos, trailing) {
                pos += 1;
            }
        }
        Some(pos - at)
    }

    /// Branch label for the positive or negated form.
    pub fn label(&self, negated: bool) -> String {
        if negated {
            format!("NOT {}", self.name)
        } else {
            self.name.to_string()
        }
    }
}

pub(crate) const AT_END: PhraseFamily = PhraseFamily::new("AT END", Some("AT"), &[&["END"]], None);
pub(crate) const SIZE_ERROR: PhraseFamily =
    PhraseFamily::new("ON SIZE ERROR", Some("ON"), &[&["SIZE", "ERROR"]], None);
pub(crate) const OVERFLOW: PhraseFamily = PhraseFamily::new("ON OVERFLOW", Some("ON"), &[&["OVERFLOW"]], None);
pub(crate) const EXCEPTION: PhraseFamily =
    PhraseFamily::new("ON EXCEPTION", Some("ON"), &[&["EXCEPTION"]], None);
pub(crate) const INVALID_KEY: PhraseFamily = PhraseFamily::new("INVALID KEY", None, &[&["INVALID"]], Some("KEY"));
pub(crate) const END_OF_PAGE: PhraseFamily =
    PhraseFamily::new("AT END-OF-PAGE", Some("AT"), &[&["END-OF-PAGE"], &["EOP"]], None);

/// A family and polarity that matched at the cursor, with its length.
fn match_phrase(
    cursor: &Cursor<'_>,
    families: &[&'static PhraseFamily],
) -> Option<(&'static PhraseFamily, bool, usize)> {
    let negated = cursor.check("NOT");
    let at = usize::from(negated);
    families
        .iter()
        .find_map(|family| family.match_len(cursor, at).map(|len| (*family, negated, at + len)))
}

/// Check if one of `families` starts at the cursor.
pub(crate) fn starts_phrase(cursor: &Cursor<'_>, families: &[&'static PhraseFamily]) -> bool {
    match_phrase(cursor, families).is_some()
}

/// Once-only guard over the phrases of one statement.
#[derive(Default)]
struct PhraseGuard {
    seen: SmallVec<[(String, SourceLoc, String); 4]>,
}

impl PhraseGuard {
    /// Claim `label`. Returns where it was first given if it was already claimed.
    fn claim(&mut self, label: &str, token: &Token) -> Option<(SourceLoc, String)> {
        if let Some((_, loc, excerpt)) = self.seen.iter().find(|(l, _, _)| l == label) {
            return Some((*loc, excerpt.clone()));
        }
        self.seen.push((label.to_string(), token.loc, token.excerpt()));
        None
    }
}

impl Parser<'_> {
    /// Report a phrase given twice, pointing at both occurrences.
    fn duplicate_phrase(
        &mut self,
        what: &str,
        token: &Token,
        first: (SourceLoc, String),
    ) -> Result<(), ParseError> {
        self.session
            .report(ErrorCode::E0035, format!("{what} given more than once"))
            .with_source(token, "repeated here")
            .with_location(first.0, first.1, "first given here")
            .with_note("each phrase may appear once per statement")
            .finish();
        self.check_error_limit()
    }

    /// Parse conditional phrases in any order, each followed by its
    /// imperative statements. Sets `stmt.conditional` when one matches.
    pub(crate) fn parse_conditional_phrases(
        &mut self,
        stmt: &mut Statement,
        families: &[&'static PhraseFamily],
    ) -> Result<(), ParseError> {
        let mut guard = PhraseGuard::default();
        while let Some((family, negated, len)) = match_phrase(&self.cursor, families) {
            let head = self.cursor.current();
            self.cursor.advance_by(len);
            let label = family.label(negated);
            debug!(verb = %stmt.verb, phrase = %label, "phrase");
            stmt.conditional = true;

            let duplicate = guard.claim(&label, head);
            if let Some(first) = duplicate.clone() {
                self.duplicate_phrase(&format!("`{label}` phrase"), head, first)?;
            }
            let body = self.parse_imperative_body()?;
            if duplicate.is_none() {
                stmt.branches.push(Branch {
                    label,
                    loc: head.loc,
                    condition: None,
                    body,
                });
            }
        }
        Ok(())
    }

    /// `{BEFORE|AFTER} [INITIAL] operand`, each at most once.
    pub(crate) fn parse_qualifiers(&mut self) -> Result<Qualifiers, ParseError> {
        let mut qualifiers = Qualifiers::default();
        let mut guard = PhraseGuard::default();
        while self.cursor.check_any(&["BEFORE", "AFTER"]) {
            let word = self.cursor.advance();
            let initial = self.cursor.optional("INITIAL");
            let operand = self.operand_text()?;
            let label = word.upper();
            if let Some(first) = guard.claim(&label, word) {
                self.duplicate_phrase(&format!("`{label}` qualifier"), word, first)?;
                continue;
            }
            let qualifier = Some(Qualifier { initial, operand });
            if label == "BEFORE" {
                qualifiers.before = qualifier;
            } else {
                qualifiers.after = qualifier;
            }
        }
        Ok(qualifiers)
    }

    /// WRITE's `{BEFORE|AFTER} [ADVANCING] {n [LINES] | identifier [LINES] | PAGE}`.
    pub(crate) fn parse_advancing(&mut self, stmt: &mut Statement) -> Result<(), ParseError> {
        let mut first: Option<(SourceLoc, String)> = None;
        while self.cursor.check_any(&["BEFORE", "AFTER"]) {
            let word = self.cursor.advance();
            self.cursor.optional("ADVANCING");
            let by = if self.cursor.optional("PAGE") {
                AdvanceBy::Page
            } else if self.cursor.check_kind(TokenMask::NUMERIC) {
                AdvanceBy::Lines(self.cursor.advance().text.clone())
            } else if self.cursor.check_identifier() {
                AdvanceBy::Lines(self.identifier_text()?)
            } else {
                return Err(self.cursor.expected_error("a line count or `PAGE`"));
            };
            if !self.cursor.optional("LINES") {
                self.cursor.optional("LINE");
            }

            if let Some(first) = first.clone() {
                self.duplicate_phrase("`ADVANCING` phrase", word, first)?;
                continue;
            }
            first = Some((word.loc, word.excerpt()));
            stmt.advancing = Some(Advancing {
                before: word.is("BEFORE"),
                by,
            });
        }
        Ok(())
    }

    /// `RAISING ...` and `WITH {ERROR|NORMAL} [STATUS] [operand]`, each once.
    pub(crate) fn parse_raising_status(&mut self, stmt: &mut Statement) -> Result<(), ParseError> {
        let mut guard = PhraseGuard::default();
        loop {
            if self.cursor.check("RAISING") {
                let word = self.cursor.advance();
                let raising = if self.cursor.optional("EXCEPTION") {
                    Raising::Exception(self.cursor.expect_identifier()?.text.clone())
                } else if self.cursor.optional("LAST") {
                    self.cursor.optional("EXCEPTION");
                    Raising::Last
                } else {
                    Raising::Identifier(self.identifier_text()?)
                };
                if let Some(first) = guard.claim("RAISING", word) {
                    self.duplicate_phrase("`RAISING` phrase", word, first)?;
                } else {
                    stmt.raising = Some(raising);
                }
            } else if self.cursor.check_any(&["ERROR", "NORMAL"])
                || (self.cursor.check("WITH")
                    && (self.cursor.check_at(1, "ERROR") || self.cursor.check_at(1, "NORMAL")))
            {
                let word = self.cursor.current();
                self.cursor.optional("WITH");
                let kind = if self.cursor.advance().is("ERROR") {
                    StatusKind::Error
                } else {
                    StatusKind::Normal
                };
                self.cursor.optional("STATUS");
                let value = if self.cursor.check_identifier() || self.cursor.check_literal() {
                    Some(self.operand_text()?)
                } else {
                    None
                };
                if let Some(first) = guard.claim("STATUS", word) {
                    self.duplicate_phrase("status phrase", word, first)?;
                } else {
                    stmt.status = Some(StatusPhrase { kind, value });
                }
            } else {
                return Ok(());
            }
        }
    }

    /// `SET LOCALE` categories, each once, then `TO` target. The cursor is
    /// just past `LOCALE`.
    pub(crate) fn parse_locale(&mut self, stmt: &mut Statement) -> Result<(), ParseError> {
        const CATEGORIES: &[&str] = &[
            "LC_ALL", "LC_COLLATE", "LC_CTYPE", "LC_MESSAGES", "LC_MONETARY", "LC_NUMERIC", "LC_TIME",
        ];
        let mut guard = PhraseGuard::default();
        let mut categories = Vec::new();
        while self.cursor.check_any(CATEGORIES) {
            let word = self.cursor.advance();
            let name = word.upper();
            if let Some(first) = guard.claim(&name, word) {
                self.duplicate_phrase(&format!("locale category `{name}`"), word, first)?;
            } else {
                categories.push(name);
            }
        }
        if categories.is_empty() {
            return Err(self.cursor.expected_error("a locale category such as `LC_ALL`"));
        }
        self.cursor.expect("TO")?;
        let target = if self.cursor.check_any(&["USER-DEFAULT", "SYSTEM-DEFAULT"]) {
            self.cursor.advance().upper()
        } else {
            self.identifier_text()?
        };
        stmt.locale = Some(LocaleSelection { categories, target });
        Ok(())
    }
}

/// Check if `token` can start an INSPECT target or qualifier operand.
fn is_operand(token: &Token) -> bool {
    matches!(token.kind, TokenKind::Identifier) || token.kind.is_literal()
}
