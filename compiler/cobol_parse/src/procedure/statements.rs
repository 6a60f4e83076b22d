//! Statement skeletons.
//!
//! Operands stay opaque text. Each verb hosts the phrase families and
//! expressions it allows; the dispatch in `parse_statement` is the only
//! place that knows which.

use cobol_diagnostic::ErrorCode;
use cobol_ir::{Branch, Statement, TokenKind, TokenMask};
use tracing::trace;

use crate::keywords::{is_terminator, is_verb, terminator_for};
use crate::phrase::{
    starts_phrase, PhraseFamily, AT_END, END_OF_PAGE, EXCEPTION, INVALID_KEY, OVERFLOW, SIZE_ERROR,
};
use crate::{ErrorContext, ParseError, Parser};

/// Every conditional family; opaque operands never run into one.
const ALL_FAMILIES: &[&PhraseFamily] =
    &[&AT_END, &SIZE_ERROR, &OVERFLOW, &EXCEPTION, &INVALID_KEY, &END_OF_PAGE];

const STATUS_WORDS: &[&str] = &["RAISING", "WITH", "ERROR", "NORMAL"];

impl Parser<'_> {
    /// Parse one statement; the cursor is on its verb.
    pub(super) fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let verb_token = self.cursor.advance();
        let verb = verb_token.upper();
        trace!(verb = %verb, nesting = self.nesting, "statement");
        let mut stmt = Statement::new(verb.as_str(), verb_token.loc);

        match verb.as_str() {
            "IF" => self.parse_if(&mut stmt)?,
            "EVALUATE" => self.parse_evaluate(&mut stmt)?,
            "PERFORM" => self.parse_perform(&mut stmt)?,
            "SEARCH" => self.parse_search(&mut stmt)?,
            "COMPUTE" => {
                self.parse_compute(&mut stmt)?;
                self.parse_conditional_phrases(&mut stmt, &[&SIZE_ERROR])?;
            }
            "ADD" | "SUBTRACT" | "MULTIPLY" | "DIVIDE" => self.hosted(&mut stmt, &[&SIZE_ERROR])?,
            "READ" | "RETURN" => self.hosted(&mut stmt, &[&AT_END, &INVALID_KEY])?,
            "REWRITE" | "DELETE" | "START" => self.hosted(&mut stmt, &[&INVALID_KEY])?,
            "STRING" | "UNSTRING" => self.hosted(&mut stmt, &[&OVERFLOW])?,
            "CALL" => self.hosted(&mut stmt, &[&EXCEPTION, &OVERFLOW])?,
            "INVOKE" | "ACCEPT" | "DISPLAY" => self.hosted(&mut stmt, &[&EXCEPTION])?,
            "WRITE" => {
                self.parse_operands(&mut stmt, &["BEFORE", "AFTER"]);
                self.parse_advancing(&mut stmt)
                    .map_err(|e| e.with_context(ErrorContext::Phrase))?;
                self.parse_conditional_phrases(&mut stmt, &[&END_OF_PAGE, &INVALID_KEY])?;
            }
            "INSPECT" => self
                .parse_inspect(&mut stmt)
                .map_err(|e| e.with_context(ErrorContext::Inspect))?,
            "SET" if self.cursor.check("LOCALE") => {
                self.cursor.advance();
                self.parse_locale(&mut stmt)
                    .map_err(|e| e.with_context(ErrorContext::Phrase))?;
            }
            "EXIT" => {
                if self.cursor.check("PERFORM") {
                    stmt.operands.push(self.cursor.advance().upper());
                    if self.cursor.check("CYCLE") {
                        stmt.operands.push(self.cursor.advance().upper());
                    }
                } else if self.cursor.check_any(&["PROGRAM", "PARAGRAPH", "SECTION", "METHOD", "FUNCTION"]) {
                    stmt.operands.push(self.cursor.advance().upper());
                }
                self.parse_raising_status(&mut stmt)
                    .map_err(|e| e.with_context(ErrorContext::Phrase))?;
            }
            "GOBACK" | "STOP" => {
                self.parse_operands(&mut stmt, STATUS_WORDS);
                self.parse_raising_status(&mut stmt)
                    .map_err(|e| e.with_context(ErrorContext::Phrase))?;
            }
            "RAISE" => {
                self.cursor.optional("EXCEPTION");
                self.parse_operands(&mut stmt, &[]);
            }
            _ => self.parse_operands(&mut stmt, &[]),
        }

        if stmt.verb != "PERFORM" {
            self.finish_statement(&mut stmt)?;
        }
        Ok(stmt)
    }

    /// Opaque operands, then the verb's conditional phrases.
    fn hosted(&mut self, stmt: &mut Statement, families: &[&'static PhraseFamily]) -> Result<(), ParseError> {
        self.parse_operands(stmt, &[]);
        self.parse_conditional_phrases(stmt, families)
    }

    /// Consume the explicit terminator if present and enforce it on nested
    /// conditional statements.
    fn finish_statement(&mut self, stmt: &mut Statement) -> Result<(), ParseError> {
        let Some(terminator) = terminator_for(&stmt.verb) else {
            return Ok(());
        };
        if self.cursor.check(terminator) {
            self.cursor.advance();
            stmt.terminated = true;
            return Ok(());
        }
        if stmt.conditional && self.nesting > 0 && self.options.nested_terminators {
            let current = self.cursor.current();
            self.session
                .report(
                    ErrorCode::E0055,
                    format!("nested `{}` with a conditional phrase must end with `{terminator}`", stmt.verb),
                )
                .with_source(current, format!("expected `{terminator}` before this"))
                .with_location(stmt.loc, stmt.verb.clone(), "statement starts here")
                .finish();
            self.check_error_limit()?;
        }
        Ok(())
    }

    /// Collect opaque operand words up to anything with grammatical
    /// meaning: a period, verb, terminator, branch word, phrase start, unit
    /// boundary or one of `stop`.
    fn parse_operands(&mut self, stmt: &mut Statement, stop: &[&str]) {
        loop {
            let current = self.cursor.current();
            let reserved = current.kind == TokenKind::ReservedKeyword;
            if self.cursor.is_at_end()
                || self.cursor.check_period()
                || (reserved && (is_verb(&current.text) || is_terminator(&current.text)))
                || self.cursor.check_any(&["ELSE", "WHEN"])
                || self.cursor.check_any(stop)
                || starts_phrase(&self.cursor, ALL_FAMILIES)
                || self.at_unit_boundary()
            {
                return;
            }
            stmt.operands.push(self.cursor.advance().excerpt());
        }
    }

    /// `IF condition [THEN] statements [ELSE statements]`.
    fn parse_if(&mut self, stmt: &mut Statement) -> Result<(), ParseError> {
        if let Some(condition) = self.parse_condition(&["THEN"])? {
            stmt.expressions.push(condition);
        }
        let then = self.cursor.current();
        self.cursor.optional("THEN");
        let body = self.parse_imperative_body()?;
        stmt.branches.push(Branch {
            label: "THEN".to_string(),
            loc: then.loc,
            condition: None,
            body,
        });
        if self.cursor.check("ELSE") {
            let otherwise = self.cursor.advance();
            let body = self.parse_imperative_body()?;
            stmt.branches.push(Branch {
                label: "ELSE".to_string(),
                loc: otherwise.loc,
                condition: None,
                body,
            });
        }
        Ok(())
    }

    /// `EVALUATE subject [ALSO subject]... {WHEN object... statements}...`.
    fn parse_evaluate(&mut self, stmt: &mut Statement) -> Result<(), ParseError> {
        loop {
            if self.cursor.check_any(&["TRUE", "FALSE"]) {
                stmt.operands.push(self.cursor.advance().upper());
            } else if let Some(subject) = self.parse_condition(&["ALSO", "WHEN"])? {
                stmt.expressions.push(subject);
            }
            if !self.cursor.optional("ALSO") {
                break;
            }
        }
        if !self.cursor.check("WHEN") {
            return Err(self.cursor.expected_error("`WHEN`"));
        }

        while self.cursor.check("WHEN") {
            let when = self.cursor.advance();
            if self.cursor.optional("OTHER") {
                let body = self.parse_imperative_body()?;
                stmt.branches.push(Branch {
                    label: "WHEN OTHER".to_string(),
                    loc: when.loc,
                    condition: None,
                    body,
                });
                break;
            }

            let mut condition = None;
            loop {
                if self.cursor.check_any(&["ANY", "TRUE", "FALSE"]) {
                    self.cursor.advance();
                } else {
                    let object = self.parse_condition(&["ALSO", "THRU", "THROUGH", "WHEN"])?;
                    if self.cursor.check_any(&["THRU", "THROUGH"]) {
                        self.cursor.advance();
                        self.parse_condition(&["ALSO", "WHEN"])?;
                    }
                    if condition.is_none() {
                        condition = object;
                    }
                }
                if !self.cursor.optional("ALSO") {
                    break;
                }
            }
            let body = self.parse_imperative_body()?;
            stmt.branches.push(Branch {
                label: "WHEN".to_string(),
                loc: when.loc,
                condition,
                body,
            });
        }
        Ok(())
    }

    /// Out-of-line `PERFORM proc [THRU proc] [loop]` or inline
    /// `PERFORM [loop] statements END-PERFORM`.
    fn parse_perform(&mut self, stmt: &mut Statement) -> Result<(), ParseError> {
        let out_of_line = self.cursor.check_identifier() && !self.cursor.check_at(1, "TIMES");
        if out_of_line {
            stmt.operands.push(self.cursor.advance().upper());
            if self.cursor.check_any(&["THRU", "THROUGH"]) {
                self.cursor.advance();
                stmt.operands.push(self.cursor.expect_identifier()?.upper());
            }
        }

        if self.cursor.check_kind(TokenMask::NUMERIC | TokenMask::IDENTIFIER)
            && self.cursor.check_at(1, "TIMES")
        {
            stmt.operands.push(self.operand_text()?);
            self.cursor.advance();
        } else {
            if self.cursor.check("WITH") || self.cursor.check("TEST") {
                self.cursor.optional("WITH");
                self.cursor.expect("TEST")?;
                let order = self.cursor.choice(&["BEFORE", "AFTER"])?;
                stmt.operands.push(format!("TEST {}", order.upper()));
            }
            if self.cursor.optional("UNTIL") {
                if let Some(condition) = self.parse_condition(&[])? {
                    stmt.expressions.push(condition);
                }
            } else if self.cursor.check("VARYING") {
                self.parse_varying(stmt)?;
            }
        }

        if out_of_line {
            return Ok(());
        }

        let start = self.cursor.current();
        let body = self.parse_imperative_body()?;
        stmt.branches.push(Branch {
            label: "PERFORM".to_string(),
            loc: start.loc,
            condition: None,
            body,
        });
        if self.cursor.check("END-PERFORM") {
            self.cursor.advance();
            stmt.terminated = true;
            return Ok(());
        }
        let current = self.cursor.current();
        self.session
            .report(ErrorCode::E0055, "inline `PERFORM` must end with `END-PERFORM`")
            .with_source(current, "expected `END-PERFORM` before this")
            .with_location(stmt.loc, "PERFORM", "inline `PERFORM` starts here")
            .finish();
        self.check_error_limit()
    }

    /// `VARYING id FROM x BY y UNTIL cond [AFTER id FROM x BY y UNTIL cond]...`.
    fn parse_varying(&mut self, stmt: &mut Statement) -> Result<(), ParseError> {
        while self.cursor.check_any(&["VARYING", "AFTER"]) {
            self.cursor.advance();
            let counter = self.identifier_text()?;
            self.cursor.expect("FROM")?;
            let from = self.operand_text()?;
            self.cursor.expect("BY")?;
            let by = self.operand_text()?;
            stmt.operands.push(format!("{counter} FROM {from} BY {by}"));
            self.cursor.expect("UNTIL")?;
            if let Some(condition) = self.parse_condition(&["AFTER"])? {
                stmt.expressions.push(condition);
            }
        }
        Ok(())
    }

    /// `COMPUTE target [ROUNDED]... {=|EQUAL} arithmetic`.
    fn parse_compute(&mut self, stmt: &mut Statement) -> Result<(), ParseError> {
        while self.cursor.check_identifier() {
            stmt.operands.push(self.identifier_text()?);
            if self.cursor.optional("ROUNDED") {
                stmt.operands.push("ROUNDED".to_string());
            }
        }
        if stmt.operands.is_empty() {
            return Err(self.cursor.expected_error("a receiving item"));
        }
        self.cursor.choice(&["=", "EQUAL"])?;
        if let Some(expr) = self.parse_arithmetic(&[])? {
            stmt.expressions.push(expr);
        }
        Ok(())
    }

    /// `SEARCH [ALL] table ... [AT END statements] {WHEN condition statements}...`.
    fn parse_search(&mut self, stmt: &mut Statement) -> Result<(), ParseError> {
        self.parse_operands(stmt, &[]);
        self.parse_conditional_phrases(stmt, &[&AT_END])?;
        if !self.cursor.check("WHEN") {
            return Err(self.cursor.expected_error("`WHEN`"));
        }
        while self.cursor.check("WHEN") {
            let when = self.cursor.advance();
            let condition = self.parse_condition(&[])?;
            let body = self.parse_imperative_body()?;
            stmt.branches.push(Branch {
                label: "WHEN".to_string(),
                loc: when.loc,
                condition,
                body,
            });
        }
        Ok(())
    }
}
