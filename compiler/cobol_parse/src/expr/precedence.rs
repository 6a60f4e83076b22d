//! Operator precedence tables.
//!
//! Arithmetic and conditional expressions share one shunting-yard
//! implementation and differ only in the table passed to it. Higher
//! `precedence` binds tighter.

use cobol_ir::{ExprRole, ExprToken};

/// Where an operator sits relative to its operands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Fixity {
    Prefix,
    Infix,
    Postfix,
}

impl Fixity {
    /// Number of operands consumed.
    pub const fn arity(self) -> usize {
        match self {
            Fixity::Prefix | Fixity::Postfix => 1,
            Fixity::Infix => 2,
        }
    }

    const fn of(role: ExprRole) -> Option<Self> {
        match role {
            ExprRole::Prefix => Some(Fixity::Prefix),
            ExprRole::Operator => Some(Fixity::Infix),
            ExprRole::Postfix => Some(Fixity::Postfix),
            ExprRole::Operand | ExprRole::Open | ExprRole::Close => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Assoc {
    Left,
    Right,
}

/// One operator entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OperatorInfo {
    pub text: &'static str,
    pub fixity: Fixity,
    pub precedence: u8,
    pub assoc: Assoc,
}

const fn op(text: &'static str, fixity: Fixity, precedence: u8, assoc: Assoc) -> OperatorInfo {
    OperatorInfo {
        text,
        fixity,
        precedence,
        assoc,
    }
}

/// A set of operators with their binding strength.
#[derive(Copy, Clone, Debug)]
pub struct PrecedenceTable {
    entries: &'static [OperatorInfo],
}

impl PrecedenceTable {
    pub const fn new(entries: &'static [OperatorInfo]) -> Self {
        PrecedenceTable { entries }
    }

    /// Find the entry for an operator token. Postfix class tests match with
    /// or without their `NOT `.
    pub fn lookup(&self, token: &ExprToken) -> Option<&'static OperatorInfo> {
        let fixity = Fixity::of(token.role)?;
        let text = if fixity == Fixity::Postfix {
            token.text.strip_prefix("NOT ").unwrap_or(&token.text)
        } else {
            token.text.as_str()
        };
        self.entries
            .iter()
            .find(|e| e.fixity == fixity && e.text.eq_ignore_ascii_case(text))
    }
}

/// `+ - * / **` with prefix signs.
pub const ARITHMETIC: PrecedenceTable = PrecedenceTable::new(&[
    op("+", Fixity::Infix, 1, Assoc::Left),
    op("-", Fixity::Infix, 1, Assoc::Left),
    op("*", Fixity::Infix, 2, Assoc::Left),
    op("/", Fixity::Infix, 2, Assoc::Left),
    op("**", Fixity::Infix, 3, Assoc::Right),
    op("+", Fixity::Prefix, 4, Assoc::Right),
    op("-", Fixity::Prefix, 4, Assoc::Right),
]);

/// Logical, relational, class-test and arithmetic operators.
pub const CONDITIONAL: PrecedenceTable = PrecedenceTable::new(&[
    op("OR", Fixity::Infix, 1, Assoc::Left),
    op("AND", Fixity::Infix, 2, Assoc::Left),
    op("NOT", Fixity::Prefix, 3, Assoc::Right),
    op("=", Fixity::Infix, 4, Assoc::Left),
    op("<>", Fixity::Infix, 4, Assoc::Left),
    op(">", Fixity::Infix, 4, Assoc::Left),
    op("<", Fixity::Infix, 4, Assoc::Left),
    op(">=", Fixity::Infix, 4, Assoc::Left),
    op("<=", Fixity::Infix, 4, Assoc::Left),
    op("NOT >", Fixity::Infix, 4, Assoc::Left),
    op("NOT <", Fixity::Infix, 4, Assoc::Left),
    op("NUMERIC", Fixity::Postfix, 4, Assoc::Left),
    op("ALPHABETIC", Fixity::Postfix, 4, Assoc::Left),
    op("ALPHABETIC-LOWER", Fixity::Postfix, 4, Assoc::Left),
    op("ALPHABETIC-UPPER", Fixity::Postfix, 4, Assoc::Left),
    op("POSITIVE", Fixity::Postfix, 4, Assoc::Left),
    op("NEGATIVE", Fixity::Postfix, 4, Assoc::Left),
    op("ZERO", Fixity::Postfix, 4, Assoc::Left),
    op("+", Fixity::Infix, 5, Assoc::Left),
    op("-", Fixity::Infix, 5, Assoc::Left),
    op("*", Fixity::Infix, 6, Assoc::Left),
    op("/", Fixity::Infix, 6, Assoc::Left),
    op("**", Fixity::Infix, 7, Assoc::Right),
    op("+", Fixity::Prefix, 8, Assoc::Right),
    op("-", Fixity::Prefix, 8, Assoc::Right),
]);
