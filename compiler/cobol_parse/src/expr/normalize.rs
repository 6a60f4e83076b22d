//! Relational and class-test phrase normalization.
//!
//! COBOL spells comparisons as words: `IS NOT GREATER THAN OR EQUAL TO`.
//! The normalizer looks at the tokens after an operand (at most six, never
//! consuming) and returns the canonical operator they spell together with
//! how many tokens it covers.

use cobol_ir::{ExprRole, TokenKind};

use crate::Cursor;

/// A canonical operator read from a verbose phrase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relation {
    pub text: String,
    pub role: ExprRole,
    /// Tokens the phrase covers.
    pub len: usize,
}

/// Normalize the phrase at the cursor, if it is a relation or class test.
pub fn normalize_relation(cursor: &Cursor<'_>) -> Option<Relation> {
    let mut at = 0;
    if cursor.check_at(at, "IS") {
        at += 1;
    }
    let negated = cursor.check_at(at, "NOT");
    if negated {
        at += 1;
    }

    if let Some((op, len)) = relational_at(cursor, at) {
        let text = if negated { negate(op) } else { op };
        return Some(Relation {
            text: text.to_string(),
            role: ExprRole::Operator,
            len: at + len,
        });
    }

    let class = class_test_at(cursor, at)?;
    let text = if negated {
        format!("NOT {class}")
    } else {
        class.to_string()
    };
    Some(Relation {
        text,
        role: ExprRole::Postfix,
        len: at + 1,
    })
}

/// A relational operator starting `at` tokens ahead, with its length.
fn relational_at(cursor: &Cursor<'_>, at: usize) -> Option<(&'static str, usize)> {
    let token = cursor.peek(at);
    if token.kind == TokenKind::Symbol {
        let op = match token.text.as_str() {
            "=" => "=",
            ">" => ">",
            "<" => "<",
            ">=" => ">=",
            "<=" => "<=",
            "<>" => "<>",
            _ => return None,
        };
        return Some((op, 1));
    }

    if token.is("EQUALS") {
        return Some(("=", 1));
    }
    if token.is("EQUAL") {
        let len = if cursor.check_at(at + 1, "TO") { 2 } else { 1 };
        return Some(("=", len));
    }

    let (strict, inclusive) = if token.is("GREATER") {
        (">", ">=")
    } else if token.is("LESS") {
        ("<", "<=")
    } else {
        return None;
    };
    let mut len = 1;
    if cursor.check_at(at + len, "THAN") {
        len += 1;
    }
    if cursor.check_at(at + len, "OR") && cursor.check_at(at + len + 1, "EQUAL") {
        len += 2;
        if cursor.check_at(at + len, "TO") {
            len += 1;
        }
        return Some((inclusive, len));
    }
    Some((strict, len))
}

/// The relation that holds exactly when `op` does not.
fn negate(op: &'static str) -> &'static str {
    match op {
        "=" => "<>",
        "<>" => "=",
        ">=" => "<",
        "<=" => ">",
        ">" => "NOT >",
        "<" => "NOT <",
        other => other,
    }
}

fn class_test_at(cursor: &Cursor<'_>, at: usize) -> Option<&'static str> {
    let token = cursor.peek(at);
    [
        "NUMERIC",
        "ALPHABETIC",
        "ALPHABETIC-LOWER",
        "ALPHABETIC-UPPER",
        "POSITIVE",
        "NEGATIVE",
    ]
    .into_iter()
    .find(|word| token.is(word))
    .or_else(|| ["ZERO", "ZEROS", "ZEROES"].iter().any(|z| token.is(z)).then_some("ZERO"))
}
