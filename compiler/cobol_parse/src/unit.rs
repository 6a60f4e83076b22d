//! Unit driver: headers, divisions, nested units and end markers.
//!
//! Every unit-fatal error unwinds to [`Parser::parse_units`], which marks
//! the innermost open unit aborted and resumes after the next end-of-unit
//! marker.

use cobol_diagnostic::ErrorCode;
use cobol_ir::{Token, TokenMask};
use tracing::debug;

use crate::keywords::{UNIT_END_WORDS, UNIT_HEADERS};
use crate::{recovery, synchronize, ErrorContext, ParseError, Parser, UnitKind};

const DIVISIONS: &[&str] = &["IDENTIFICATION", "ID", "ENVIRONMENT", "DATA", "PROCEDURE"];

impl Parser<'_> {
    /// Parse every unit in the token stream.
    ///
    /// Each end-of-unit marker closes all open units. Parsing stops early
    /// only when the error limit is reached.
    pub fn parse_units(&mut self) {
        loop {
            if self.cursor.is_at_end() {
                self.session.exit_all();
                if self.cursor.is_at_stream_end() {
                    return;
                }
                self.cursor.advance();
                continue;
            }

            if let Err(error) = self.parse_unit_or_recover() {
                debug!(code = %error.code, depth = self.session.depth(), "unit aborted");
                self.session.emit(error.to_diagnostic());
                self.session.abort_unit();
                while !self.cursor.is_at_end() {
                    self.cursor.advance();
                }
                self.session.exit_all();
                if error.code == ErrorCode::E0900 {
                    return;
                }
            }
        }
    }

    /// Parse one unit; a malformed header is reported and skipped.
    /// Only unit-fatal errors come back.
    fn parse_unit_or_recover(&mut self) -> Result<(), ParseError> {
        match self.parse_unit() {
            Ok(()) => Ok(()),
            Err(error) if error.is_fatal() => Err(error),
            Err(error) => {
                self.report(error.with_context(ErrorContext::UnitHeader))?;
                self.cursor.advance();
                while !self.cursor.is_at_end() && !self.at_unit_boundary() {
                    self.cursor.advance();
                }
                Ok(())
            }
        }
    }

    fn parse_unit(&mut self) -> Result<(), ParseError> {
        if self.cursor.check_any(&["IDENTIFICATION", "ID"]) && self.cursor.check_at(1, "DIVISION") {
            self.cursor.advance_by(2);
            self.expect_separator("`IDENTIFICATION DIVISION`")?;
        }

        let kind = match UnitKind::from_keyword(&self.cursor.current().text) {
            Some(kind) if self.cursor.check_any(UNIT_HEADERS) => kind,
            _ => return Err(self.cursor.expected_error("a unit header such as `PROGRAM-ID`")),
        };
        self.cursor.advance();
        self.cursor.optional(".");

        if !self.cursor.check_identifier() && !self.cursor.check_kind(TokenMask::STRING_LIKE) {
            return Err(self.cursor.expected_error("a unit name"));
        }
        let name = self.cursor.advance();
        if self.cursor.optional("AS") {
            self.cursor.expect_literal()?;
        }
        // IS COMMON, INITIAL, RECURSIVE, INHERITS ... are not modelled.
        while !self.cursor.is_at_end() && !self.cursor.check_period() && !self.at_division_header() {
            self.cursor.advance();
        }

        self.session.enter_unit(kind, name.text.clone(), name.loc);
        self.expect_separator("the unit header")?;
        self.skip_division_body();

        if self.at_division("ENVIRONMENT") {
            self.cursor.advance_by(2);
            self.expect_separator("`ENVIRONMENT DIVISION`")?;
            self.skip_division_body();
        }
        if self.at_division("DATA") {
            self.parse_data_division()?;
        }
        if self.at_division("PROCEDURE") {
            let body = self.parse_procedure_division()?;
            if let Some(unit) = self.session.current_unit_mut() {
                unit.procedure = Some(body);
            }
        }

        while self.at_unit_start() {
            self.parse_unit_or_recover()?;
        }

        if self.at_end_marker() {
            self.parse_end_marker(kind, name)?;
        }
        self.session.exit_unit();
        Ok(())
    }

    /// `END {PROGRAM|FUNCTION|METHOD|CLASS} name.`
    ///
    /// A marker naming the enclosing unit is left for that unit to consume.
    fn parse_end_marker(&mut self, kind: UnitKind, header: &Token) -> Result<(), ParseError> {
        let end = self.cursor.current();
        let word = self.cursor.peek(1);
        let closing = self.cursor.peek(2);
        let has_name = closing.is_kind(TokenMask::IDENTIFIER | TokenMask::STRING_LIKE);

        let matches = |name: &str| has_name && closing.text.eq_ignore_ascii_case(name);
        if UnitKind::from_keyword(&word.text) == Some(kind) && matches(&header.text) {
            self.cursor.advance_by(3);
            return self.expect_separator("the END marker");
        }

        let parent = self
            .session
            .current_unit()
            .and_then(|unit| unit.parent)
            .and_then(|id| self.session.unit(id));
        let closes_parent = parent.is_some_and(|unit| matches(&unit.name));

        let found = if has_name {
            format!("END {} {}", word.upper(), closing.text)
        } else {
            format!("END {}", word.upper())
        };
        let summary = if closes_parent {
            format!("`{}` is not closed before `{found}`", header.text)
        } else {
            format!("`{found}` does not match `{} {}`", kind.end_word(), header.text)
        };
        self.session
            .report(ErrorCode::E0060, summary)
            .with_source(end, "end marker here")
            .with_location(header.loc, header.excerpt(), "unit declared here")
            .with_note(format!("expected `END {} {}.`", kind.end_word(), header.text))
            .finish();
        self.check_error_limit()?;

        if !closes_parent {
            self.cursor.advance_by(if has_name { 3 } else { 2 });
            self.expect_separator("the END marker")?;
        }
        Ok(())
    }

    /// Skip paragraphs nothing downstream needs (IDENTIFICATION paragraphs,
    /// ENVIRONMENT DIVISION contents).
    fn skip_division_body(&mut self) {
        while synchronize(&mut self.cursor, &recovery::DIVISION)
            && !self.at_division_header()
            && !self.at_unit_boundary()
        {
            self.cursor.advance();
        }
    }

    fn at_division(&self, word: &str) -> bool {
        self.cursor.check(word) && self.cursor.check_at(1, "DIVISION")
    }

    pub(crate) fn at_division_header(&self) -> bool {
        self.cursor.check_any(DIVISIONS) && self.cursor.check_at(1, "DIVISION")
    }

    fn at_unit_start(&self) -> bool {
        self.cursor.check_any(UNIT_HEADERS) || self.at_division("IDENTIFICATION") || self.at_division("ID")
    }

    fn at_end_marker(&self) -> bool {
        self.cursor.check("END") && UNIT_END_WORDS.iter().any(|word| self.cursor.check_at(1, word))
    }

    /// A unit header or end marker: no construct inside a unit runs past one.
    pub(crate) fn at_unit_boundary(&self) -> bool {
        self.at_unit_start() || self.at_end_marker()
    }
}
