//! Token cursor for navigating the token stream.
//!
//! Provides token access, bounded lookahead, keyword matching and
//! consumption. Keyword matching is by spelling and case-insensitive;
//! category tests go through the parallel kind array.

use cobol_diagnostic::ErrorCode;
use cobol_ir::{Token, TokenKind, TokenList, TokenMask};
use tracing::trace;

use crate::ParseError;

/// Cursor for navigating tokens.
///
/// The position only moves forward, except through
/// [`ParserSnapshot`](crate::ParserSnapshot) restores.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    /// Dense kind array, parallel to `tokens`.
    kinds: &'a [TokenKind],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the start of the token stream.
    pub fn new(tokens: &'a TokenList) -> Self {
        Cursor {
            tokens,
            kinds: tokens.kinds(),
            pos: 0,
        }
    }

    /// Get the current position in the token stream.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the cursor position directly.
    ///
    /// Used by snapshot restore to re-walk a token range.
    pub(crate) fn set_position(&mut self, pos: usize) {
        debug_assert!(
            pos < self.tokens.len(),
            "cursor position {} out of bounds (max {})",
            pos,
            self.tokens.len()
        );
        self.pos = pos.min(self.tokens.len() - 1);
    }

    /// Get the current token.
    ///
    /// Invariant: the position is always valid and the last token is an
    /// end-of-unit marker.
    #[inline]
    pub fn current(&self) -> &'a Token {
        &self.tokens[self.pos]
    }

    /// Get the current token's kind.
    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.kinds[self.pos]
    }

    /// Get the token `n` places ahead; `peek(0)` is the current token.
    ///
    /// Past the end of the stream this yields the closing marker.
    #[inline]
    pub fn peek(&self, n: usize) -> &'a Token {
        let index = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    /// The most recently consumed token, if any.
    pub fn previous(&self) -> Option<&'a Token> {
        self.pos.checked_sub(1).map(|i| &self.tokens[i])
    }

    /// Check if the current token is an end-of-unit marker.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::EndOfUnit
    }

    /// Check if the cursor sits on the final marker of the whole stream.
    #[inline]
    pub fn is_at_stream_end(&self) -> bool {
        self.pos + 1 >= self.tokens.len()
    }

    /// Check if the current token has the given spelling.
    #[inline]
    pub fn check(&self, spelling: &str) -> bool {
        self.current().is(spelling)
    }

    /// Check the token `n` places ahead against a spelling.
    #[inline]
    pub fn check_at(&self, n: usize, spelling: &str) -> bool {
        self.peek(n).is(spelling)
    }

    /// Check if the current token has any of the given spellings.
    pub fn check_any(&self, spellings: &[&str]) -> bool {
        let current = self.current();
        spellings.iter().any(|s| current.is(s))
    }

    /// Check the current token's category against a mask.
    #[inline]
    pub fn check_kind(&self, mask: TokenMask) -> bool {
        mask.contains(self.current_kind().mask())
    }

    /// Check if the current token is a user-defined word.
    #[inline]
    pub fn check_identifier(&self) -> bool {
        self.current_kind() == TokenKind::Identifier
    }

    /// Check if the current token is a literal (figuratives included).
    #[inline]
    pub fn check_literal(&self) -> bool {
        self.check_kind(TokenMask::LITERAL)
    }

    /// Check if the current token is the separator period.
    #[inline]
    pub fn check_period(&self) -> bool {
        self.current_kind() == TokenKind::Symbol && self.current().text == "."
    }

    /// If the current token is a one- or two-digit unsigned integer, return
    /// its value. Whether it is a *valid* level is the resolver's call.
    pub fn check_level_number(&self) -> Option<u8> {
        level_number(self.current())
    }

    /// Advance to the next token and return the consumed one.
    ///
    /// Never moves past the closing marker of the stream.
    #[inline]
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        trace!(pos = self.pos, text = %token.text, kind = ?token.kind, "advance");
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Advance over `n` tokens.
    pub fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    /// Consume the current token if it has the given spelling.
    pub fn expect(&mut self, spelling: &str) -> Result<&'a Token, ParseError> {
        if self.check(spelling) {
            Ok(self.advance())
        } else {
            Err(self.expected_error(&format!("`{spelling}`")))
        }
    }

    /// Like [`expect`](Self::expect), but a mismatch is silent unless `required`.
    pub fn expect_opt(
        &mut self,
        spelling: &str,
        required: bool,
    ) -> Result<Option<&'a Token>, ParseError> {
        if self.check(spelling) {
            Ok(Some(self.advance()))
        } else if required {
            Err(self.expected_error(&format!("`{spelling}`")))
        } else {
            Ok(None)
        }
    }

    /// Consume the current token if it has the given spelling; silent otherwise.
    pub fn optional(&mut self, spelling: &str) -> bool {
        if self.check(spelling) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume one of several alternative spellings.
    pub fn choice(&mut self, spellings: &[&str]) -> Result<&'a Token, ParseError> {
        if self.check_any(spellings) {
            Ok(self.advance())
        } else {
            let list = spellings
                .iter()
                .map(|s| format!("`{s}`"))
                .collect::<Vec<_>>()
                .join(", ");
            Err(self.expected_error(&format!("one of {list}")))
        }
    }

    /// Consume a user-defined word.
    pub fn expect_identifier(&mut self) -> Result<&'a Token, ParseError> {
        if self.check_identifier() {
            Ok(self.advance())
        } else if self.is_at_end() {
            Err(ParseError::unexpected_end("an identifier", self.current()))
        } else {
            Err(self.unexpected(ErrorCode::E0011, "an identifier"))
        }
    }

    /// Consume a literal (figuratives included).
    pub fn expect_literal(&mut self) -> Result<&'a Token, ParseError> {
        if self.check_literal() {
            Ok(self.advance())
        } else if self.is_at_end() {
            Err(ParseError::unexpected_end("a literal", self.current()))
        } else {
            Err(self.unexpected(ErrorCode::E0012, "a literal"))
        }
    }

    /// Consume the separator period.
    pub fn expect_period(&mut self) -> Result<&'a Token, ParseError> {
        if self.check_period() {
            Ok(self.advance())
        } else {
            Err(self.expected_error("`.`"))
        }
    }

    /// Build an "expected X, found Y" error at the current token.
    #[cold]
    pub fn expected_error(&self, expected: &str) -> ParseError {
        if self.is_at_end() {
            ParseError::unexpected_end(expected, self.current())
        } else {
            self.unexpected(ErrorCode::E0010, expected)
        }
    }

    #[cold]
    fn unexpected(&self, code: ErrorCode, expected: &str) -> ParseError {
        let current = self.current();
        ParseError::new(
            code,
            format!("expected {expected}, found `{}`", current.excerpt()),
            current,
        )
    }
}

/// Value of a level-number token, when the token has that shape.
pub(crate) fn level_number(token: &Token) -> Option<u8> {
    if token.kind != TokenKind::Numeric
        || token.text.is_empty()
        || token.text.len() > 2
        || !token.text.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    token.text.parse().ok()
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
