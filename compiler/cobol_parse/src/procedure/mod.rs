//! PROCEDURE DIVISION: header, sections, paragraphs and sentences.
//!
//! Statement lists recover locally: an error inside one statement is
//! reported, the cursor skips to the next verb, period or scope
//! terminator, and the enclosing list carries on.

mod statements;

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;

use cobol_diagnostic::ErrorCode;
use cobol_ir::{Paragraph, ProcedureBody, Statement, TokenKind};
use tracing::debug;

use crate::keywords::is_verb;
use crate::{recovery, ErrorContext, ParseError, Parser};

impl Parser<'_> {
    /// Parse the PROCEDURE DIVISION; the cursor is on `PROCEDURE`.
    pub(crate) fn parse_procedure_division(&mut self) -> Result<ProcedureBody, ParseError> {
        let mut body = ProcedureBody::default();
        if let Err(error) = self.parse_procedure_header(&mut body) {
            self.recover(error.with_context(ErrorContext::ProcedureDivision), &recovery::STATEMENT)?;
            self.cursor.optional(".");
        }

        let mut section: Option<String> = None;
        let mut paragraph: Option<Paragraph> = None;

        while !self.cursor.is_at_end() && !self.at_unit_boundary() {
            if self.cursor.check("DECLARATIVES") {
                self.cursor.advance();
                self.expect_separator("`DECLARATIVES`")?;
            } else if self.cursor.check("END") && self.cursor.check_at(1, "DECLARATIVES") {
                self.cursor.advance_by(2);
                self.expect_separator("`END DECLARATIVES`")?;
            } else if self.cursor.check("USE") {
                let stmt = self.parse_use_sentence();
                push_statement(&mut body, paragraph.as_mut(), stmt);
            } else if self.cursor.check_identifier() && self.cursor.check_at(1, "SECTION") {
                let name = self.cursor.advance().upper();
                self.cursor.advance();
                // Segment number.
                if self.cursor.current_kind() == TokenKind::Numeric {
                    self.cursor.advance();
                }
                self.expect_separator("a section header")?;
                debug!(section = %name, "procedure section");
                body.paragraphs.extend(paragraph.take());
                body.sections.push(name.clone());
                section = Some(name);
            } else if self.cursor.check_identifier() && self.cursor.peek(1).is(".") {
                let name = self.cursor.advance();
                self.cursor.advance();
                body.paragraphs.extend(paragraph.take());
                paragraph = Some(Paragraph {
                    name: name.upper(),
                    section: section.clone(),
                    loc: name.loc,
                    statements: Vec::new(),
                });
            } else if self.cursor.check_period() {
                self.cursor.advance();
            } else if self.at_verb() {
                let mut statements = Vec::new();
                self.parse_statement_list(&mut statements)?;
                for stmt in statements {
                    push_statement(&mut body, paragraph.as_mut(), stmt);
                }
            } else {
                let current = self.cursor.current();
                let error = ParseError::new(
                    ErrorCode::E0010,
                    format!("expected a statement, found `{}`", current.excerpt()),
                    current,
                );
                self.report(error.with_context(ErrorContext::Statement))?;
                self.cursor.advance();
                self.skip_to_statement();
            }
        }

        body.paragraphs.extend(paragraph);
        Ok(body)
    }

    /// `DIVISION [USING ...] [RETURNING x].`
    fn parse_procedure_header(&mut self, body: &mut ProcedureBody) -> Result<(), ParseError> {
        self.cursor.advance();
        self.cursor.expect("DIVISION")?;
        if self.cursor.optional("USING") {
            loop {
                if self.cursor.check("BY") {
                    self.cursor.advance();
                    self.cursor.choice(&["REFERENCE", "VALUE", "CONTENT"])?;
                } else if self.cursor.check_any(&["OPTIONAL", "ANY"]) {
                    self.cursor.advance();
                } else if self.cursor.check_identifier() {
                    let name = self.identifier_text()?;
                    body.using.push(name);
                } else {
                    break;
                }
            }
            if body.using.is_empty() {
                return Err(self.cursor.expected_error("a parameter name after `USING`"));
            }
        }
        if self.cursor.optional("RETURNING") {
            body.returning = Some(self.identifier_text()?);
        }
        self.expect_separator("the PROCEDURE DIVISION header")
    }

    /// `USE ...` in DECLARATIVES, kept as opaque text.
    fn parse_use_sentence(&mut self) -> Statement {
        let head = self.cursor.advance();
        let mut stmt = Statement::new("USE", head.loc);
        while !self.cursor.is_at_end() && !self.cursor.check_period() {
            stmt.operands.push(self.cursor.advance().excerpt());
        }
        stmt
    }

    /// Parse statements up to the first token that cannot start one.
    fn parse_statement_list(&mut self, body: &mut Vec<Statement>) -> Result<(), ParseError> {
        while self.at_verb() {
            match self.parse_statement() {
                Ok(stmt) => body.push(stmt),
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => {
                    self.report(error.with_context(ErrorContext::Statement))?;
                    self.skip_to_statement();
                }
            }
        }
        Ok(())
    }

    /// The statements of a branch: `NEXT SENTENCE`, or a list of
    /// statements nested one level deeper.
    pub(crate) fn parse_imperative_body(&mut self) -> Result<Vec<Statement>, ParseError> {
        if self.cursor.check("NEXT") && self.cursor.check_at(1, "SENTENCE") {
            let next = self.cursor.advance();
            self.cursor.advance();
            return Ok(vec![Statement::new("NEXT SENTENCE", next.loc)]);
        }
        let mut body = Vec::new();
        self.nesting += 1;
        let result = self.parse_statement_list(&mut body);
        self.nesting -= 1;
        result?;
        Ok(body)
    }

    /// Skip to the next verb, period or scope terminator, never past the
    /// end of the unit.
    fn skip_to_statement(&mut self) {
        while !self.cursor.is_at_end()
            && !self.at_unit_boundary()
            && !recovery::STATEMENT.contains(self.cursor.current())
        {
            self.cursor.advance();
        }
    }

    fn at_verb(&self) -> bool {
        let current = self.cursor.current();
        current.kind == TokenKind::ReservedKeyword && is_verb(&current.text)
    }
}

fn push_statement(body: &mut ProcedureBody, paragraph: Option<&mut Paragraph>, stmt: Statement) {
    match paragraph {
        Some(paragraph) => paragraph.statements.push(stmt),
        None => body.statements.push(stmt),
    }
}
