//! Token list with a parallel kind array.

use std::ops::Index;

use super::{Token, TokenKind};
use crate::SourceLoc;

/// Ordered token sequence handed to the parser.
///
/// Keeps a dense `kinds` array parallel to `tokens` so category tests
/// don't touch the token text.
///
/// Invariant: the last token is always an end-of-unit marker. Construction
/// appends one when the input doesn't already end with it, so the cursor
/// can never run off the end.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TokenList {
    tokens: Vec<Token>,
    /// `kinds[i] == tokens[i].kind` for all `i`.
    kinds: Vec<TokenKind>,
}

impl Default for TokenList {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenList {
    /// Create a list holding only the closing end-of-unit marker.
    pub fn new() -> Self {
        TokenList {
            tokens: vec![Token::end_of_unit(SourceLoc::DUMMY)],
            kinds: vec![TokenKind::EndOfUnit],
        }
    }

    /// Create from a Vec of tokens, appending the end-of-unit marker if missing.
    pub fn from_vec(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map_or(true, |t| !t.is_end_of_unit()) {
            let loc = tokens.last().map_or(SourceLoc::DUMMY, |t| t.loc);
            tokens.push(Token::end_of_unit(loc));
        }
        let kinds = tokens.iter().map(|t| t.kind).collect();
        TokenList { tokens, kinds }
    }

    /// Number of tokens, the closing marker included.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// A list is never empty; it always holds its closing marker.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Get a token by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// The closing end-of-unit marker.
    #[inline]
    pub fn last(&self) -> &Token {
        // Construction guarantees at least one token.
        &self.tokens[self.tokens.len() - 1]
    }

    /// Dense kind array, parallel to the tokens.
    #[inline]
    pub fn kinds(&self) -> &[TokenKind] {
        &self.kinds
    }

    /// Iterate over the tokens.
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Get the tokens as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of compilation units (end-of-unit markers) in the stream.
    pub fn unit_count(&self) -> usize {
        self.kinds
            .iter()
            .filter(|k| **k == TokenKind::EndOfUnit)
            .count()
    }
}

impl Index<usize> for TokenList {
    type Output = Token;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
