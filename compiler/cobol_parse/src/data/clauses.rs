//! Clauses of a data description entry, their combination rules and the
//! storage length they imply.

use cobol_diagnostic::ErrorCode;
use cobol_ir::{
    ClauseFlags, DataEntryId, EntryKind, Occurs, PictureCategory, RenamesSpec, SourceLoc, Token,
    TokenKind, TokenMask, UsageCategory,
};

use super::analyze_picture;
use crate::keywords::{DATA_SECTIONS, FILE_INDICATORS};
use crate::{ErrorContext, ParseError, Parser};

impl Parser<'_> {
    /// Clauses up to the end of entry `id`.
    ///
    /// Screen and report entries carry many clauses that are not modelled;
    /// there, unknown words are skipped instead of reported. A repeated
    /// clause is reported and the first one kept.
    pub(super) fn parse_clauses(&mut self, id: DataEntryId) -> Result<(), ParseError> {
        let lenient = matches!(
            self.session.arena()[id].kind,
            EntryKind::Screen | EntryKind::ReportGroup
        );
        let mut seen: Vec<(ClauseFlags, SourceLoc, String)> = Vec::new();

        while !self.at_entry_end(lenient) {
            if self.cursor.check("IS") {
                self.cursor.advance();
                continue;
            }
            let start = self.cursor.current();
            let before = self.session.arena()[id].clone();
            let Some(flag) = self
                .parse_clause(id, lenient)
                .map_err(|e| e.with_context(ErrorContext::Clause))?
            else {
                continue;
            };

            match seen.iter().find(|(f, ..)| *f == flag) {
                Some((_, loc, excerpt)) => {
                    self.session
                        .report(ErrorCode::E0036, format!("duplicate `{}` clause", start.upper()))
                        .with_source(start, "repeated here")
                        .with_location(*loc, excerpt.clone(), "first given here")
                        .finish();
                    self.check_error_limit()?;
                    self.session.arena_mut()[id] = before;
                }
                None => seen.push((flag, start.loc, start.excerpt())),
            }
        }
        Ok(())
    }

    fn at_entry_end(&self, lenient: bool) -> bool {
        self.cursor.is_at_end()
            || self.cursor.check_period()
            || self.at_division_header()
            || self.at_unit_boundary()
            || (self.cursor.check_any(DATA_SECTIONS) && self.cursor.check_at(1, "SECTION"))
            || self.cursor.check_any(FILE_INDICATORS)
            || (!lenient && self.cursor.check_level_number().is_some())
    }

    /// One clause. `None` when a word was skipped in a lenient entry.
    fn parse_clause(&mut self, id: DataEntryId, lenient: bool) -> Result<Option<ClauseFlags>, ParseError> {
        let token = self.cursor.current();
        if !token.is_kind(TokenMask::IDENTIFIER | TokenMask::RESERVED) {
            return self.unknown_clause(lenient);
        }

        let word = token.upper();
        let flag = match word.as_str() {
            "REDEFINES" => {
                self.cursor.advance();
                let target = self.identifier_text()?;
                let entry = &self.session.arena()[id];
                if !entry.clauses.is_empty() {
                    let summary = format!("REDEFINES must be the first clause of `{}`", entry.display_name());
                    self.diagnose(ErrorCode::E0045, summary, token, "move this clause after the name")?;
                }
                self.session.arena_mut()[id].redefines = Some(target);
                ClauseFlags::REDEFINES
            }
            "RENAMES" => {
                self.cursor.advance();
                let from = self.identifier_text()?;
                let thru = if self.cursor.check_any(&["THRU", "THROUGH"]) {
                    self.cursor.advance();
                    Some(self.identifier_text()?)
                } else {
                    None
                };
                if self.session.arena()[id].kind == EntryKind::Renames {
                    self.session.arena_mut()[id].renames = Some(RenamesSpec { from, thru });
                } else {
                    self.diagnose(
                        ErrorCode::E0045,
                        "RENAMES is only allowed on a level 66 entry",
                        token,
                        "not a level 66 entry",
                    )?;
                }
                ClauseFlags::RENAMES
            }
            "PIC" | "PICTURE" => {
                self.cursor.advance();
                self.cursor.optional("IS");
                if self.cursor.is_at_end() || self.cursor.check_period() {
                    return Err(self.cursor.expected_error("a picture string"));
                }
                let text = self.cursor.advance();
                match analyze_picture(&text.text) {
                    Some(picture) => self.session.arena_mut()[id].picture = Some(picture),
                    None => self.diagnose(
                        ErrorCode::E0010,
                        format!("malformed picture string `{}`", text.text),
                        text,
                        "not a valid picture",
                    )?,
                }
                ClauseFlags::PICTURE
            }
            "USAGE" => {
                self.cursor.advance();
                self.cursor.optional("IS");
                self.parse_usage(id)?;
                ClauseFlags::USAGE
            }
            _ if UsageCategory::from_keyword(&word).is_some() => {
                self.parse_usage(id)?;
                ClauseFlags::USAGE
            }
            "VALUE" | "VALUES" => {
                self.cursor.advance();
                if !self.cursor.optional("IS") {
                    self.cursor.optional("ARE");
                }
                self.cursor.optional("ALL");
                let (value, length) = if self.cursor.check_any(&["NULL", "NULLS"]) {
                    self.cursor.advance();
                    ("NULL".to_string(), 0)
                } else {
                    let literal = self.cursor.expect_literal()?;
                    (literal.excerpt(), literal_length(literal))
                };
                let entry = &mut self.session.arena_mut()[id];
                entry.value = Some(value);
                entry.value_length = length;
                ClauseFlags::VALUE
            }
            "OCCURS" => {
                self.cursor.advance();
                let occurs = self.parse_occurs()?;
                self.session.arena_mut()[id].occurs = Some(occurs);
                ClauseFlags::OCCURS
            }
            "GLOBAL" => {
                self.cursor.advance();
                ClauseFlags::GLOBAL
            }
            "EXTERNAL" => {
                self.cursor.advance();
                if self.cursor.optional("AS") {
                    self.cursor.expect_literal()?;
                }
                ClauseFlags::EXTERNAL
            }
            "TYPE" => {
                self.cursor.advance();
                self.cursor.optional("IS");
                if lenient {
                    // Report group types (DETAIL, PAGE HEADING ...) are not modelled.
                    if !self.at_entry_end(lenient) {
                        self.cursor.advance();
                    }
                } else {
                    let name = self.cursor.expect_identifier()?.text.clone();
                    self.session.arena_mut()[id].type_name = Some(name);
                }
                ClauseFlags::TYPE
            }
            "TYPEDEF" => {
                self.cursor.advance();
                self.cursor.optional("STRONG");
                ClauseFlags::TYPEDEF
            }
            "JUST" | "JUSTIFIED" => {
                self.cursor.advance();
                self.cursor.optional("RIGHT");
                ClauseFlags::JUSTIFIED
            }
            "BLANK" => {
                self.cursor.advance();
                self.cursor.optional("WHEN");
                self.cursor.choice(&["ZERO", "ZEROS", "ZEROES"])?;
                ClauseFlags::BLANK_WHEN_ZERO
            }
            "SIGN" | "LEADING" | "TRAILING" => {
                if self.cursor.advance().is("SIGN") {
                    self.cursor.optional("IS");
                    self.cursor.choice(&["LEADING", "TRAILING"])?;
                }
                if self.cursor.optional("SEPARATE") {
                    self.cursor.optional("CHARACTER");
                    self.session.arena_mut()[id].sign_separate = true;
                }
                ClauseFlags::SIGN
            }
            "SYNC" | "SYNCHRONIZED" => {
                self.cursor.advance();
                if !self.cursor.optional("LEFT") {
                    self.cursor.optional("RIGHT");
                }
                ClauseFlags::SYNCHRONIZED
            }
            "CONSTANT" => {
                self.cursor.advance();
                self.cursor.optional("IS");
                let global = self.cursor.optional("GLOBAL");
                self.cursor.expect("AS")?;
                let literal = self.cursor.expect_literal()?;
                let entry = &mut self.session.arena_mut()[id];
                entry.value = Some(literal.excerpt());
                entry.value_length = literal_length(literal);
                entry.is_constant = true;
                if global {
                    entry.clauses |= ClauseFlags::GLOBAL;
                }
                ClauseFlags::CONSTANT
            }
            "BASED" => {
                self.cursor.advance();
                ClauseFlags::BASED
            }
            _ => return self.unknown_clause(lenient),
        };

        self.session.arena_mut()[id].clauses |= flag;
        Ok(Some(flag))
    }

    fn unknown_clause(&mut self, lenient: bool) -> Result<Option<ClauseFlags>, ParseError> {
        if lenient {
            self.cursor.advance();
            return Ok(None);
        }
        let current = self.cursor.current();
        Err(ParseError::new(
            ErrorCode::E0010,
            format!("`{}` is not a data description clause", current.excerpt()),
            current,
        ))
    }

    /// A usage word, with `OBJECT REFERENCE [class]`.
    fn parse_usage(&mut self, id: DataEntryId) -> Result<(), ParseError> {
        let word = self.cursor.current();
        let Some(usage) = UsageCategory::from_keyword(&word.text).filter(|_| !word.kind.is_string_like())
        else {
            return Err(self.cursor.expected_error("a usage such as `DISPLAY` or `BINARY`"));
        };
        self.cursor.advance();
        if usage == UsageCategory::ObjectReference {
            self.cursor.expect("REFERENCE")?;
            if self.cursor.check_identifier() {
                self.cursor.advance();
            }
        }
        self.session.arena_mut()[id].usage = usage;
        Ok(())
    }

    /// `n [TO m] [TIMES] [DEPENDING ON x] [{ASCENDING|DESCENDING} KEY ...] [INDEXED BY ...]`
    fn parse_occurs(&mut self) -> Result<Occurs, ParseError> {
        let min = self.occurs_count()?;
        let max = if self.cursor.optional("TO") {
            self.occurs_count()?
        } else {
            min
        };
        self.cursor.optional("TIMES");
        let mut occurs = Occurs {
            min,
            max,
            ..Occurs::default()
        };
        loop {
            if self.cursor.optional("DEPENDING") {
                self.cursor.optional("ON");
                occurs.depending_on = Some(self.identifier_text()?);
            } else if self.cursor.check_any(&["ASCENDING", "DESCENDING"]) {
                self.cursor.advance();
                self.cursor.optional("KEY");
                self.cursor.optional("IS");
                occurs.keys.push(self.cursor.expect_identifier()?.text.clone());
                while self.cursor.check_identifier() {
                    occurs.keys.push(self.cursor.advance().text.clone());
                }
            } else if self.cursor.optional("INDEXED") {
                self.cursor.optional("BY");
                occurs.indexed_by.push(self.cursor.expect_identifier()?.text.clone());
                while self.cursor.check_identifier() {
                    occurs.indexed_by.push(self.cursor.advance().text.clone());
                }
            } else {
                return Ok(occurs);
            }
        }
    }

    fn occurs_count(&mut self) -> Result<u32, ParseError> {
        let token = self.cursor.current();
        match token.text.parse::<u32>() {
            Ok(count) if token.is_kind(TokenMask::NUMERIC) => {
                self.cursor.advance();
                Ok(count)
            }
            _ => Err(self.cursor.expected_error("an occurrence count")),
        }
    }

    /// Storage length from usage and picture. Groups are summed later, on
    /// the resolution pass.
    pub(super) fn set_storage_length(&mut self, id: DataEntryId) {
        let entry = &mut self.session.arena_mut()[id];
        if let Some(length) = entry.usage.fixed_length() {
            entry.length = length;
            return;
        }
        let Some(picture) = &entry.picture else {
            // Unpictured items keep their literal length (constants, fillers with VALUE).
            if entry.value.is_some() {
                entry.length = entry.value_length;
            }
            return;
        };
        entry.length = match entry.usage {
            UsageCategory::Binary | UsageCategory::NativeBinary => match picture.digits {
                0..=4 => 2,
                5..=9 => 4,
                _ => 8,
            },
            UsageCategory::Packed => picture.digits / 2 + 1,
            UsageCategory::National => picture.size.saturating_mul(2),
            _ if picture.category == PictureCategory::National => picture.size.saturating_mul(2),
            _ => picture
                .size
                .saturating_add(u32::from(picture.signed && entry.sign_separate)),
        };
    }

    /// Clause combination checks, run when an entry closes.
    pub(super) fn validate_entry(&mut self, id: DataEntryId) -> Result<(), ParseError> {
        let entry = &self.session.arena()[id];
        let name = entry.display_name().to_string();
        let (loc, clauses) = (entry.loc, entry.clauses);
        let mut problems: Vec<(String, &str)> = Vec::new();

        if entry.kind == EntryKind::Renames {
            let extra = clauses - ClauseFlags::RENAMES;
            if !extra.is_empty() {
                problems.push((
                    format!("level 66 entry `{name}` may only have a RENAMES clause"),
                    "remove the other clauses",
                ));
            }
        } else if entry.is_group {
            if clauses.contains(ClauseFlags::PICTURE) {
                problems.push((format!("group item `{name}` cannot have a PICTURE clause"), "this group"));
            }
        } else if entry.level != 0 && !entry.is_constant {
            if !clauses.intersects(ClauseFlags::DESCRIBES_STORAGE) {
                problems.push((
                    format!("elementary item `{name}` needs a PICTURE, USAGE, TYPE or VALUE clause"),
                    "this item",
                ));
            }
            if clauses.contains(ClauseFlags::PICTURE) && !entry.usage.allows_picture() {
                problems.push((
                    format!("PICTURE is not allowed with USAGE {} on `{name}`", entry.usage),
                    "this item",
                ));
            }
            if clauses.contains(ClauseFlags::VALUE) && !entry.usage.allows_value() {
                problems.push((
                    format!("VALUE is not allowed with USAGE {} on `{name}`", entry.usage),
                    "this item",
                ));
            }
            if clauses.contains(ClauseFlags::BLANK_WHEN_ZERO)
                && entry.picture.as_ref().is_some_and(|p| p.category == PictureCategory::Alphanumeric)
            {
                problems.push((
                    format!("BLANK WHEN ZERO needs a numeric picture on `{name}`"),
                    "this item",
                ));
            }
        }
        if entry.level == 1 && clauses.contains(ClauseFlags::REDEFINES) && entry.section == cobol_ir::SectionKind::File {
            problems.push((
                format!("record `{name}` in a file description cannot have REDEFINES"),
                "records of one file already share storage",
            ));
        }

        for (summary, label) in problems {
            self.session
                .report(ErrorCode::E0045, summary)
                .with_location(loc, name.clone(), label)
                .finish();
            self.check_error_limit()?;
        }
        Ok(())
    }
}

/// Storage bytes a literal occupies: hexadecimal forms hold two digits
/// per byte, national characters take two bytes each.
fn literal_length(literal: &Token) -> u32 {
    let chars = u32::try_from(literal.text.chars().count()).unwrap_or(u32::MAX);
    match literal.kind {
        TokenKind::HexString | TokenKind::HexNational => chars.div_ceil(2),
        TokenKind::National => chars.saturating_mul(2),
        TokenKind::HexBoolean => chars.saturating_mul(4),
        TokenKind::Numeric => {
            let digits = literal.text.chars().filter(char::is_ascii_digit).count();
            u32::try_from(digits).unwrap_or(u32::MAX)
        }
        TokenKind::Figurative => 1,
        _ => chars,
    }
}
