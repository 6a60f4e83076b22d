//! Tokens of the pre-lexed COBOL source stream.
//!
//! The lexer is an external collaborator: it hands over one [`TokenList`]
//! per compilation, where each source unit ends with a
//! [`TokenKind::EndOfUnit`] marker.

mod list;

#[cfg(test)]
mod tests;

pub use list::TokenList;

use bitflags::bitflags;
use std::fmt;

use crate::SourceLoc;

/// Lexical category of a token.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// User-defined word (data name, paragraph name, ...).
    Identifier,
    /// Numeric literal, signed or with a decimal point.
    Numeric,
    /// Alphanumeric literal: `"ABC"` or `'ABC'`.
    String,
    /// Hexadecimal alphanumeric literal: `X"F1F2"`.
    HexString,
    /// Boolean literal: `B"1010"`.
    Boolean,
    /// Hexadecimal boolean literal: `BX"A"`.
    HexBoolean,
    /// National literal: `N"ABC"`.
    National,
    /// Hexadecimal national literal: `NX"0041"`.
    HexNational,
    /// Figurative constant: `ZERO`, `SPACES`, `HIGH-VALUES`, ...
    Figurative,
    /// Punctuation and operators: `.`, `(`, `+`, `>=`, ...
    Symbol,
    /// Reserved word.
    ReservedKeyword,
    /// Boundary between compilation units.
    EndOfUnit,
}

impl TokenKind {
    /// All token kinds, in declaration order.
    pub const ALL: &[TokenKind] = &[
        TokenKind::Identifier,
        TokenKind::Numeric,
        TokenKind::String,
        TokenKind::HexString,
        TokenKind::Boolean,
        TokenKind::HexBoolean,
        TokenKind::National,
        TokenKind::HexNational,
        TokenKind::Figurative,
        TokenKind::Symbol,
        TokenKind::ReservedKeyword,
        TokenKind::EndOfUnit,
    ];

    /// The single-bit mask for this kind.
    #[inline]
    pub const fn mask(self) -> TokenMask {
        match self {
            TokenKind::Identifier => TokenMask::IDENTIFIER,
            TokenKind::Numeric => TokenMask::NUMERIC,
            TokenKind::String => TokenMask::STRING,
            TokenKind::HexString => TokenMask::HEX_STRING,
            TokenKind::Boolean => TokenMask::BOOLEAN,
            TokenKind::HexBoolean => TokenMask::HEX_BOOLEAN,
            TokenKind::National => TokenMask::NATIONAL,
            TokenKind::HexNational => TokenMask::HEX_NATIONAL,
            TokenKind::Figurative => TokenMask::FIGURATIVE,
            TokenKind::Symbol => TokenMask::SYMBOL,
            TokenKind::ReservedKeyword => TokenMask::RESERVED,
            TokenKind::EndOfUnit => TokenMask::END_OF_UNIT,
        }
    }

    /// String-like literals never compare equal to keyword spellings.
    #[inline]
    pub const fn is_string_like(self) -> bool {
        self.mask().intersects(TokenMask::STRING_LIKE)
    }

    /// Check if this kind is any literal category (figuratives included).
    #[inline]
    pub const fn is_literal(self) -> bool {
        self.mask().intersects(TokenMask::LITERAL)
    }

    /// Human-readable name for error messages.
    pub const fn friendly_name(self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Numeric => "numeric literal",
            TokenKind::String => "alphanumeric literal",
            TokenKind::HexString => "hexadecimal literal",
            TokenKind::Boolean => "boolean literal",
            TokenKind::HexBoolean => "hexadecimal boolean literal",
            TokenKind::National => "national literal",
            TokenKind::HexNational => "hexadecimal national literal",
            TokenKind::Figurative => "figurative constant",
            TokenKind::Symbol => "symbol",
            TokenKind::ReservedKeyword => "reserved word",
            TokenKind::EndOfUnit => "end of source unit",
        }
    }
}

bitflags! {
    /// Set of token kinds, tested with a single bitwise AND.
    ///
    /// Used by the cursor to accept several categories at once
    /// (`check_kind(TokenMask::LITERAL)`).
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TokenMask: u16 {
        const IDENTIFIER = 1 << 0;
        const NUMERIC = 1 << 1;
        const STRING = 1 << 2;
        const HEX_STRING = 1 << 3;
        const BOOLEAN = 1 << 4;
        const HEX_BOOLEAN = 1 << 5;
        const NATIONAL = 1 << 6;
        const HEX_NATIONAL = 1 << 7;
        const FIGURATIVE = 1 << 8;
        const SYMBOL = 1 << 9;
        const RESERVED = 1 << 10;
        const END_OF_UNIT = 1 << 11;

        /// Quoted literals of every flavour.
        const STRING_LIKE = Self::STRING.bits()
            | Self::HEX_STRING.bits()
            | Self::BOOLEAN.bits()
            | Self::HEX_BOOLEAN.bits()
            | Self::NATIONAL.bits()
            | Self::HEX_NATIONAL.bits();
        /// Anything usable as a literal value.
        const LITERAL = Self::STRING_LIKE.bits()
            | Self::NUMERIC.bits()
            | Self::FIGURATIVE.bits();
        /// Identifiers or literals: the usual operand position.
        const OPERAND = Self::LITERAL.bits() | Self::IDENTIFIER.bits();
    }
}

/// A single token.
///
/// String-like literal text is stored without its delimiters and prefix;
/// the kind records which flavour it was.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    pub loc: SourceLoc,
}

impl Token {
    /// Create a new token.
    pub fn new(text: impl Into<String>, kind: TokenKind, loc: SourceLoc) -> Self {
        Token {
            text: text.into(),
            kind,
            loc,
        }
    }

    /// Create an end-of-unit marker.
    pub fn end_of_unit(loc: SourceLoc) -> Self {
        Token {
            text: String::new(),
            kind: TokenKind::EndOfUnit,
            loc,
        }
    }

    /// Case-insensitive comparison against a keyword or symbol spelling.
    ///
    /// A quoted literal never matches: `"END"` is not the keyword `END`.
    #[inline]
    pub fn is(&self, spelling: &str) -> bool {
        !self.kind.is_string_like() && self.text.eq_ignore_ascii_case(spelling)
    }

    /// Check membership in a kind mask.
    #[inline]
    pub fn is_kind(&self, mask: TokenMask) -> bool {
        mask.contains(self.kind.mask())
    }

    /// Check if this is an end-of-unit marker.
    #[inline]
    pub fn is_end_of_unit(&self) -> bool {
        self.kind == TokenKind::EndOfUnit
    }

    /// Upper-cased text, the canonical spelling of words.
    pub fn upper(&self) -> String {
        self.text.to_ascii_uppercase()
    }

    /// Source excerpt used in diagnostics.
    pub fn excerpt(&self) -> String {
        match self.kind {
            TokenKind::EndOfUnit => "<end of unit>".to_string(),
            TokenKind::String => format!("\"{}\"", self.text),
            TokenKind::HexString => format!("X\"{}\"", self.text),
            TokenKind::Boolean => format!("B\"{}\"", self.text),
            TokenKind::HexBoolean => format!("BX\"{}\"", self.text),
            TokenKind::National => format!("N\"{}\"", self.text),
            TokenKind::HexNational => format!("NX\"{}\"", self.text),
            _ => self.text.clone(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.excerpt())
    }
}
