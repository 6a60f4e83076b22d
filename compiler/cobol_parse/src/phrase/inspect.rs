//! INSPECT's TALLYING, REPLACING and CONVERTING phrases.
//!
//! Two nested loops: the outer one over `counter FOR` groups (TALLYING
//! only), the inner one over `CHARACTERS`/`ALL`/`LEADING`/`FIRST`
//! sub-phrases, each with its targets and once-only qualifiers.

use cobol_diagnostic::ErrorCode;
use cobol_ir::{InspectItem, InspectMode, InspectSpec, InspectTarget, Statement, TallyGroup, TokenKind};

use super::is_operand;
use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse what follows `INSPECT`.
    pub(crate) fn parse_inspect(&mut self, stmt: &mut Statement) -> Result<(), ParseError> {
        let subject = self.identifier_text()?;
        let mut spec = InspectSpec {
            subject,
            ..InspectSpec::default()
        };

        if self.cursor.optional("CONVERTING") {
            let pattern = self.operand_text()?;
            self.cursor.expect("TO")?;
            let replacement = self.operand_text()?;
            let qualifiers = self.parse_qualifiers()?;
            spec.converting = Some(InspectTarget {
                pattern,
                replacement: Some(replacement),
                qualifiers,
            });
        } else {
            let tallying = self.cursor.optional("TALLYING");
            if tallying {
                spec.tallying = self.parse_tally_groups()?;
            }
            let replacing = self.cursor.optional("REPLACING");
            if replacing {
                spec.replacing = self.parse_inspect_items(true)?;
                if spec.replacing.is_empty() {
                    return Err(self
                        .cursor
                        .expected_error("`CHARACTERS`, `ALL`, `LEADING` or `FIRST`"));
                }
            }
            if !tallying && !replacing {
                return Err(self
                    .cursor
                    .expected_error("`TALLYING`, `REPLACING` or `CONVERTING`"));
            }
        }

        stmt.inspect = Some(spec);
        Ok(())
    }

    fn parse_tally_groups(&mut self) -> Result<Vec<TallyGroup>, ParseError> {
        let mut groups = Vec::new();
        while self.cursor.check_identifier() && self.cursor.check_at(1, "FOR") {
            let counter = self.cursor.advance().text.clone();
            self.cursor.advance();
            let items = self.parse_inspect_items(false)?;
            if items.is_empty() {
                return Err(self.cursor.expected_error("`CHARACTERS`, `ALL` or `LEADING`"));
            }
            groups.push(TallyGroup { counter, items });
        }
        if groups.is_empty() {
            return Err(self.cursor.expected_error("a counter followed by `FOR`"));
        }
        Ok(groups)
    }

    fn parse_inspect_items(&mut self, replacing: bool) -> Result<Vec<InspectItem>, ParseError> {
        let mut items = Vec::new();
        loop {
            if self.cursor.optional("CHARACTERS") {
                let replacement = self.inspect_replacement(replacing)?;
                let qualifiers = self.parse_qualifiers()?;
                items.push(InspectItem {
                    mode: InspectMode::Characters,
                    targets: vec![InspectTarget {
                        pattern: "CHARACTERS".to_string(),
                        replacement,
                        qualifiers,
                    }],
                });
                continue;
            }

            let mode = if self.cursor.check("ALL") {
                InspectMode::All
            } else if self.cursor.check("LEADING") {
                InspectMode::Leading
            } else if replacing && self.cursor.check("FIRST") {
                InspectMode::First
            } else {
                break;
            };
            let word = self.cursor.advance();

            let mut targets = Vec::new();
            while self.at_inspect_target() {
                let pattern = self.operand_text()?;
                let replacement = self.inspect_replacement(replacing)?;
                let qualifiers = self.parse_qualifiers()?;
                targets.push(InspectTarget {
                    pattern,
                    replacement,
                    qualifiers,
                });
            }
            if targets.is_empty() {
                if self.cursor.is_at_end() {
                    return Err(ParseError::unexpected_end("an INSPECT target", self.cursor.current()));
                }
                return Err(ParseError::new(
                    ErrorCode::E0010,
                    format!("`{}` needs at least one identifier or literal", word.upper()),
                    word,
                ));
            }
            items.push(InspectItem { mode, targets });
        }
        Ok(items)
    }

    fn inspect_replacement(&mut self, replacing: bool) -> Result<Option<String>, ParseError> {
        if !replacing {
            return Ok(None);
        }
        self.cursor.expect("BY")?;
        Ok(Some(self.operand_text()?))
    }

    /// An operand that is not the counter of the next TALLYING group.
    fn at_inspect_target(&self) -> bool {
        let token = self.cursor.current();
        is_operand(token) && !(token.kind == TokenKind::Identifier && self.cursor.check_at(1, "FOR"))
    }
}
