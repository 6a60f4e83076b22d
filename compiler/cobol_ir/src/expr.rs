//! Normalized expressions.
//!
//! The parser rewrites COBOL's wordy relational grammar into canonical
//! operator tokens (`IS GREATER THAN OR EQUAL TO` becomes `>=`), then keeps
//! both the infix sequence and its postfix conversion.

use std::fmt;

use crate::SourceLoc;

/// Grammatical role of an expression token.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprRole {
    /// Identifier, literal, or a collapsed `FUNCTION` call.
    Operand,
    /// Binary operator (`+`, `AND`, `>=`, `NOT >`, ...).
    Operator,
    /// Prefix operator: unary sign or logical `NOT`.
    Prefix,
    /// Postfix operator: class and sign tests (`NUMERIC`, `NOT ZERO`, ...).
    Postfix,
    Open,
    Close,
}

impl ExprRole {
    /// Operators of any fixity.
    #[inline]
    pub const fn is_operator(self) -> bool {
        matches!(self, ExprRole::Operator | ExprRole::Prefix | ExprRole::Postfix)
    }
}

/// One token of a normalized expression.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExprToken {
    /// Canonical spelling (`>=`, `NOT <`, `A OF B`, `FUNCTION MAX(...)`).
    pub text: String,
    pub role: ExprRole,
    pub loc: SourceLoc,
}

impl ExprToken {
    /// Create a new expression token.
    pub fn new(text: impl Into<String>, role: ExprRole, loc: SourceLoc) -> Self {
        ExprToken {
            text: text.into(),
            role,
            loc,
        }
    }
}

/// Whether an expression is arithmetic or a condition.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprKind {
    Arithmetic,
    Condition,
}

/// A validated expression.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expression {
    pub kind: ExprKind,
    pub infix: Vec<ExprToken>,
    pub postfix: Vec<ExprToken>,
}

impl Expression {
    /// Infix tokens joined by single spaces.
    pub fn infix_text(&self) -> String {
        join(&self.infix)
    }

    /// Postfix tokens joined by single spaces.
    pub fn postfix_text(&self) -> String {
        join(&self.postfix)
    }

    /// Location of the first token.
    pub fn loc(&self) -> SourceLoc {
        self.infix.first().map_or(SourceLoc::DUMMY, |t| t.loc)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.infix_text())
    }
}

fn join(tokens: &[ExprToken]) -> String {
    let mut out = String::new();
    for (i, tok) in tokens.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&tok.text);
    }
    out
}
