//! Arithmetic and conditional expressions.
//!
//! Collection reads a maximal token run into canonical infix tokens
//! (normalizing verbose relations on the way). The run is then checked
//! for balanced parentheses, converted to postfix and validated. Any
//! failure is reported once and the rest of the expression is skipped, so
//! one bad expression never cascades into the statement around it.

mod normalize;
mod postfix;
mod precedence;


pub use normalize::{normalize_relation, Relation};
pub use postfix::{check_balance, to_postfix, validate_postfix};
pub use precedence::{Assoc, Fixity, OperatorInfo, PrecedenceTable, ARITHMETIC, CONDITIONAL};

use cobol_diagnostic::ErrorCode;
use cobol_ir::{ExprKind, ExprRole, ExprToken, Expression, TokenKind, TokenMask};

use crate::{recovery, ErrorContext, ParseError, Parser};

trait ExprKindExt {
    fn table(self) -> &'static PrecedenceTable;
    fn context(self) -> ErrorContext;
}

impl ExprKindExt for ExprKind {
    fn table(self) -> &'static PrecedenceTable {
        match self {
            ExprKind::Arithmetic => &ARITHMETIC,
            ExprKind::Condition => &CONDITIONAL,
        }
    }

    fn context(self) -> ErrorContext {
        match self {
            ExprKind::Arithmetic => ErrorContext::Arithmetic,
            ExprKind::Condition => ErrorContext::Condition,
        }
    }
}

impl Parser<'_> {
    /// Parse an arithmetic expression ending before any of `delimiters`.
    ///
    /// Returns `Ok(None)` when the expression was malformed; the problem has
    /// already been reported and the cursor sits at the next delimiter.
    pub fn parse_arithmetic(&mut self, delimiters: &[&str]) -> Result<Option<Expression>, ParseError> {
        self.parse_expression(ExprKind::Arithmetic, delimiters)
    }

    /// Parse a conditional expression ending before any of `delimiters`.
    pub fn parse_condition(&mut self, delimiters: &[&str]) -> Result<Option<Expression>, ParseError> {
        self.parse_expression(ExprKind::Condition, delimiters)
    }

    fn parse_expression(
        &mut self,
        kind: ExprKind,
        delimiters: &[&str],
    ) -> Result<Option<Expression>, ParseError> {
        match self.build_expression(kind, delimiters) {
            Ok(expr) => {
                tracing::trace!(infix = %expr.infix_text(), postfix = %expr.postfix_text(), "expression");
                Ok(Some(expr))
            }
            Err(error) if error.is_fatal() => Err(error),
            Err(error) => {
                self.report(error.with_context(kind.context()))?;
                self.skip_expression(delimiters);
                Ok(None)
            }
        }
    }

    fn build_expression(&mut self, kind: ExprKind, delimiters: &[&str]) -> Result<Expression, ParseError> {
        let infix = self.collect_expression(kind, delimiters)?;
        if infix.is_empty() {
            let current = self.cursor.current();
            return Err(if self.cursor.is_at_end() {
                ParseError::unexpected_end("an expression", current)
            } else {
                ParseError::new(
                    ErrorCode::E0325,
                    format!("expected an expression, found `{}`", current.excerpt()),
                    current,
                )
            });
        }
        check_balance(&infix)?;
        let postfix = to_postfix(&infix, kind.table())?;
        validate_postfix(&postfix, kind.table())?;
        Ok(Expression { kind, infix, postfix })
    }

    fn at_expression_end(&self, delimiters: &[&str]) -> bool {
        self.cursor.is_at_end() || self.cursor.check_period() || self.cursor.check_any(delimiters)
    }

    fn skip_expression(&mut self, delimiters: &[&str]) {
        while !self.at_expression_end(delimiters)
            && !recovery::STATEMENT.contains(self.cursor.current())
        {
            self.cursor.advance();
        }
    }

    /// Read canonical infix tokens up to the first token that cannot
    /// continue the expression.
    fn collect_expression(&mut self, kind: ExprKind, delimiters: &[&str]) -> Result<Vec<ExprToken>, ParseError> {
        let condition = kind == ExprKind::Condition;
        let mut infix = Vec::new();
        let mut expect_operand = true;

        while !self.at_expression_end(delimiters) {
            let token = self.cursor.current();
            let loc = token.loc;

            if condition && !expect_operand {
                if let Some(relation) = normalize_relation(&self.cursor) {
                    self.cursor.advance_by(relation.len);
                    expect_operand = relation.role != ExprRole::Postfix;
                    infix.push(ExprToken::new(relation.text, relation.role, loc));
                    continue;
                }
            }

            match token.kind {
                TokenKind::Symbol => {
                    let text = token.text.as_str();
                    let role = match text {
                        "(" => ExprRole::Open,
                        ")" => ExprRole::Close,
                        "+" | "-" if expect_operand => {
                            let next = self.cursor.peek(1);
                            if next.kind == TokenKind::Numeric && !next.text.starts_with(['+', '-']) {
                                let folded = format!("{text}{}", next.text);
                                self.cursor.advance_by(2);
                                infix.push(ExprToken::new(folded, ExprRole::Operand, loc));
                                expect_operand = false;
                                continue;
                            }
                            ExprRole::Prefix
                        }
                        "+" | "-" | "*" | "/" | "**" => ExprRole::Operator,
                        "=" | ">" | "<" | ">=" | "<=" | "<>" if condition => ExprRole::Operator,
                        _ => {
                            let what = if condition { "a condition" } else { "an arithmetic expression" };
                            return Err(ParseError::new(
                                ErrorCode::E0315,
                                format!("`{text}` cannot appear in {what}"),
                                token,
                            ));
                        }
                    };
                    self.cursor.advance();
                    expect_operand = role != ExprRole::Close;
                    infix.push(ExprToken::new(text, role, loc));
                }
                TokenKind::Identifier => {
                    if !expect_operand {
                        break;
                    }
                    let text = self.identifier_text()?;
                    infix.push(ExprToken::new(text, ExprRole::Operand, loc));
                    expect_operand = false;
                }
                TokenKind::Numeric | TokenKind::Figurative => {
                    if !expect_operand {
                        break;
                    }
                    self.cursor.advance();
                    infix.push(ExprToken::new(token.text.clone(), ExprRole::Operand, loc));
                    expect_operand = false;
                }
                other if other.is_string_like() => {
                    if !condition {
                        return Err(ParseError::new(
                            ErrorCode::E0315,
                            format!("nonnumeric literal {} in an arithmetic expression", token.excerpt()),
                            token,
                        ));
                    }
                    if !expect_operand {
                        break;
                    }
                    self.cursor.advance();
                    infix.push(ExprToken::new(token.excerpt(), ExprRole::Operand, loc));
                    expect_operand = false;
                }
                _ if token.is("FUNCTION") => {
                    if !expect_operand {
                        break;
                    }
                    let text = self.function_text()?;
                    infix.push(ExprToken::new(text, ExprRole::Operand, loc));
                    expect_operand = false;
                }
                _ if condition && (token.is("AND") || token.is("OR")) => {
                    self.cursor.advance();
                    infix.push(ExprToken::new(token.upper(), ExprRole::Operator, loc));
                    expect_operand = true;
                }
                _ if condition && token.is("NOT") => {
                    self.cursor.advance();
                    infix.push(ExprToken::new("NOT", ExprRole::Prefix, loc));
                    expect_operand = true;
                }
                _ => break,
            }
        }
        Ok(infix)
    }

    /// Read an identifier with its `OF`/`IN` qualifiers and any subscript
    /// or reference modification as one operand text.
    pub(crate) fn identifier_text(&mut self) -> Result<String, ParseError> {
        let mut text = self.cursor.expect_identifier()?.text.clone();
        while self.cursor.check_any(&["OF", "IN"]) && self.cursor.peek(1).kind == TokenKind::Identifier {
            let qualifier = self.cursor.advance().upper();
            let name = self.cursor.advance();
            text = format!("{text} {qualifier} {}", name.text);
        }
        while self.cursor.check("(") {
            text.push_str(&self.parenthesized()?);
        }
        Ok(text)
    }

    /// Read an identifier or a literal as operand text.
    pub(crate) fn operand_text(&mut self) -> Result<String, ParseError> {
        if self.cursor.check_identifier() {
            self.identifier_text()
        } else if self.cursor.check_literal() {
            Ok(self.cursor.advance().excerpt())
        } else {
            Err(self.cursor.expected_error("an identifier or literal"))
        }
    }

    /// `FUNCTION name [(args)]` as a single placeholder operand.
    fn function_text(&mut self) -> Result<String, ParseError> {
        self.cursor.advance();
        if !self.cursor.check_kind(TokenMask::IDENTIFIER | TokenMask::RESERVED) {
            return Err(self.cursor.expected_error("a function name"));
        }
        let mut text = format!("FUNCTION {}", self.cursor.advance().upper());
        if self.cursor.check("(") {
            text.push_str(&self.parenthesized()?);
        }
        Ok(text)
    }

    /// Consume a balanced parenthesized run and return it as text.
    fn parenthesized(&mut self) -> Result<String, ParseError> {
        let open = self.cursor.advance();
        let mut depth = 1usize;
        let mut parts: Vec<String> = Vec::new();
        loop {
            if self.cursor.is_at_end() || self.cursor.check_period() {
                return Err(ParseError::new(ErrorCode::E0320, "`(` is never closed", open));
            }
            let token = self.cursor.advance();
            if token.is("(") {
                depth += 1;
            } else if token.is(")") {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            parts.push(token.excerpt());
        }
        Ok(format!("({})", parts.join(" ")))
    }
}
