//! DATA DIVISION: sections, entries and the two-pass hierarchy resolver.
//!
//! The declaration pass builds entries, links parents, registers names and
//! reports problems. The resolution pass re-walks the same token range
//! from a snapshot with the diagnostics queue muted: it maps each entry
//! line back to its entry by declaration position, replays the level
//! transitions and folds lengths upward as levels close.

mod clauses;
mod levels;
mod picture;


pub use levels::{LevelError, LevelStack, Placement};
pub use picture::analyze_picture;

use std::ops::Range;

use cobol_diagnostic::ErrorCode;
use cobol_ir::{ClauseFlags, DataEntry, DataEntryId, EntryKind, SectionKind, Token, TokenMask};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::keywords::{DATA_SECTIONS, FILE_INDICATORS};
use crate::recovery::{self, synchronize};
use crate::{DataSection, ErrorContext, ParseError, Parser, Pass};

/// Resolver state for the DATA DIVISION being parsed.
#[derive(Default)]
pub(crate) struct DataState {
    levels: LevelStack,
    section: Option<SectionKind>,
    /// Open file or report description; records hang below it.
    file: Option<DataEntryId>,
    /// Most recent item that condition-names attach to.
    last_item: Option<DataEntryId>,
    /// Entries whose clauses failed to parse.
    damaged: FxHashSet<DataEntryId>,
    /// Token position of each entry line, with the position after it.
    lines: FxHashMap<usize, (DataEntryId, usize)>,
    /// Level 66 entries waiting for the resolution pass.
    renames: Vec<DataEntryId>,
}

impl Parser<'_> {
    /// Parse the DATA DIVISION; the cursor is on `DATA`.
    pub(crate) fn parse_data_division(&mut self) -> Result<(), ParseError> {
        self.cursor.advance_by(2);
        self.expect_separator("`DATA DIVISION`")?;
        self.data = DataState::default();

        let start = self.cursor.position();
        self.parse_data_body(usize::MAX)?;
        let end = self.cursor.position();
        if let Some(unit) = self.session.current_unit_mut() {
            unit.data_range = Some(start..end);
        }
        if self.options.resolve_lengths {
            self.resolve_data(start..end)?;
        }
        Ok(())
    }

    /// Re-walk a parsed DATA DIVISION body in the resolution pass.
    ///
    /// Nothing is registered or reported during the walk. RENAMES operands
    /// are resolved once afterwards, the first time this runs.
    pub(crate) fn resolve_data(&mut self, range: Range<usize>) -> Result<(), ParseError> {
        let resume = self.snapshot();
        self.cursor.set_position(range.start);
        self.session.set_pass(Pass::Resolution);
        self.data.levels = LevelStack::new();
        self.data.section = None;
        self.data.file = None;
        self.data.last_item = None;

        let walked = self.parse_data_body(range.end);
        self.restore(resume);
        walked?;
        self.resolve_renames();
        Ok(())
    }

    /// Sections, file descriptions and entries up to the next division,
    /// unit boundary or `limit`.
    fn parse_data_body(&mut self, limit: usize) -> Result<(), ParseError> {
        while self.cursor.position() < limit
            && !self.cursor.is_at_end()
            && !self.at_division_header()
            && !self.at_unit_boundary()
        {
            if self.session.pass() == Pass::Resolution {
                if let Some(&(id, next)) = self.data.lines.get(&self.cursor.position()) {
                    self.replay_entry(id)?;
                    self.cursor.set_position(next);
                    continue;
                }
            }

            if self.cursor.check_any(DATA_SECTIONS) && self.cursor.check_at(1, "SECTION") {
                self.begin_section()?;
            } else if self.cursor.check_any(FILE_INDICATORS) {
                self.parse_file_description()?;
            } else if let Some(level) = self.cursor.check_level_number() {
                self.parse_data_entry(level)?;
            } else if self.cursor.check_period() {
                self.cursor.advance();
            } else {
                let current = self.cursor.current();
                let error = ParseError::new(
                    ErrorCode::E0010,
                    format!("expected a level number, found `{}`", current.excerpt()),
                    current,
                );
                self.report(error.with_context(ErrorContext::DataDivision))?;
                self.cursor.advance();
                synchronize(&mut self.cursor, &recovery::DATA_ENTRY);
            }
        }
        self.close_file()
    }

    /// `name SECTION.`; the cursor is on the section name.
    fn begin_section(&mut self) -> Result<(), ParseError> {
        self.close_file()?;
        let Some(kind) = SectionKind::from_keyword(&self.cursor.current().text) else {
            return Err(self.cursor.expected_error("a DATA DIVISION section"));
        };
        self.cursor.advance_by(2);
        self.expect_separator(&format!("`{kind}`"))?;
        debug!(section = %kind, pass = ?self.session.pass(), "data section");

        self.data.section = Some(kind);
        self.data.last_item = None;
        if self.session.pass() == Pass::Declaration {
            if let Some(unit) = self.session.current_unit_mut() {
                unit.sections.push(DataSection {
                    kind,
                    entries: Vec::new(),
                });
            }
        }
        Ok(())
    }

    /// The section entries are declared in, opening WORKING-STORAGE when
    /// entries come before any section header.
    fn current_section(&mut self) -> SectionKind {
        if let Some(kind) = self.data.section {
            return kind;
        }
        let kind = SectionKind::WorkingStorage;
        self.data.section = Some(kind);
        if let Some(unit) = self.session.current_unit_mut() {
            unit.sections.push(DataSection {
                kind,
                entries: Vec::new(),
            });
        }
        kind
    }

    /// `{FD|SD|RD} name [file clauses].`
    fn parse_file_description(&mut self) -> Result<(), ParseError> {
        let start = self.cursor.position();
        self.close_file()?;
        let indicator = self.cursor.advance();
        let kind = if indicator.is("RD") {
            EntryKind::Report
        } else {
            EntryKind::File
        };
        let name = self.entry_name_or_report(ErrorContext::FileDescription)?;
        let section = self.current_section();
        let id = self.alloc_entry(name, 0, kind, section, start, indicator);
        self.add_to_section(id);
        self.register(id)?;
        self.data.file = Some(id);
        self.data.last_item = None;

        // RECORD CONTAINS, BLOCK, LABEL RECORDS ... are not modelled.
        while !self.cursor.is_at_end()
            && !self.cursor.check_period()
            && !self.at_division_header()
            && !self.at_unit_boundary()
        {
            self.cursor.advance();
        }
        let what = format!("{} `{}`", indicator.upper(), self.session.arena()[id].display_name());
        self.expect_separator(&what)?;
        self.data.lines.insert(start, (id, self.cursor.position()));
        Ok(())
    }

    fn parse_data_entry(&mut self, level: u8) -> Result<(), ParseError> {
        let start = self.cursor.position();
        let id = match level {
            1..=49 | 77 => self.parse_item(level)?,
            88 => self.parse_condition_name()?,
            66 => self.parse_renames_entry()?,
            _ => {
                let token = self.cursor.advance();
                self.diagnose(
                    ErrorCode::E0041,
                    format!("invalid level number `{}`", token.text),
                    token,
                    "expected 01-49, 66, 77 or 88",
                )?;
                synchronize(&mut self.cursor, &recovery::DATA_ENTRY);
                self.cursor.optional(".");
                return Ok(());
            }
        };
        self.data.lines.insert(start, (id, self.cursor.position()));
        Ok(())
    }

    /// A structural item (01-49) or independent item (77).
    fn parse_item(&mut self, level: u8) -> Result<DataEntryId, ParseError> {
        let start = self.cursor.position();
        let level_token = self.cursor.advance();
        let name = if self.cursor.check("FILLER") {
            self.cursor.advance();
            None
        } else if self.cursor.check_identifier() {
            Some(self.cursor.advance().text.clone())
        } else {
            None
        };
        let section = self.current_section();
        let kind = match section {
            SectionKind::Screen => EntryKind::Screen,
            SectionKind::Report => EntryKind::ReportGroup,
            _ => EntryKind::Data,
        };
        let id = self.alloc_entry(name, level, kind, section, start, level_token);

        let placement = self.data.levels.place(level, id);
        for closed in &placement.closed {
            self.close_entry(*closed)?;
        }
        match placement.parent.or(self.data.file) {
            Some(parent) => {
                let arena = self.session.arena_mut();
                arena[id].parent = Some(parent);
                arena[parent].children.push(id);
                if arena[parent].level != 0 {
                    arena[parent].is_group = true;
                }
            }
            None => self.add_to_section(id),
        }
        if let Some(error) = placement.error {
            self.level_error(id, error, level_token)?;
        }

        self.register(id)?;
        self.data.last_item = Some(id);
        self.finish_entry(id, ErrorContext::DataEntry)?;
        Ok(id)
    }

    /// `88 name VALUE[S] [IS|ARE] literal [THRU literal]... .`
    fn parse_condition_name(&mut self) -> Result<DataEntryId, ParseError> {
        let start = self.cursor.position();
        let level_token = self.cursor.advance();
        let name = self.entry_name_or_report(ErrorContext::ConditionName)?;
        let section = self.current_section();
        let id = self.alloc_entry(name.clone(), 88, EntryKind::Condition, section, start, level_token);

        match self.data.last_item {
            Some(item) => {
                let arena = self.session.arena();
                let first = name.as_deref().and_then(|name| {
                    arena[item]
                        .conditions
                        .iter()
                        .map(|c| &arena[*c])
                        .find(|c| c.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name)))
                        .map(|c| (c.loc, c.display_name().to_string()))
                });
                if let Some((loc, excerpt)) = first {
                    let owner = arena[item].display_name().to_string();
                    let shown = self.session.arena()[id].display_name().to_string();
                    self.session
                        .report(
                            ErrorCode::E0030,
                            format!("condition-name `{shown}` is already defined for `{owner}`"),
                        )
                        .with_location(level_token.loc, shown.clone(), "defined again here")
                        .with_location(loc, excerpt, "first defined here")
                        .finish();
                    self.check_error_limit()?;
                }
                let arena = self.session.arena_mut();
                arena[id].parent = Some(item);
                arena[item].conditions.push(id);
            }
            None => {
                let shown = self.session.arena()[id].display_name().to_string();
                self.diagnose(
                    ErrorCode::E0040,
                    format!("condition-name `{shown}` does not follow a data item"),
                    level_token,
                    "level 88 needs an item to attach to",
                )?;
            }
        }

        self.register(id)?;
        let values = self.parse_condition_values(id);
        self.recover_clauses(id, values, ErrorContext::ConditionName)?;
        self.end_entry(id)?;
        Ok(id)
    }

    fn parse_condition_values(&mut self, id: DataEntryId) -> Result<(), ParseError> {
        if !self.cursor.check_any(&["VALUE", "VALUES"]) {
            return Err(self.cursor.expected_error("`VALUE`"));
        }
        self.cursor.advance();
        if !self.cursor.optional("IS") {
            self.cursor.optional("ARE");
        }
        let mut values = Vec::new();
        loop {
            let low = self.cursor.expect_literal()?.excerpt();
            let high = if self.cursor.check_any(&["THRU", "THROUGH"]) {
                self.cursor.advance();
                Some(self.cursor.expect_literal()?.excerpt())
            } else {
                None
            };
            values.push(cobol_ir::ConditionValue { low, high });
            if !self.cursor.check_literal() || self.at_next_entry() {
                break;
            }
        }
        let entry = &mut self.session.arena_mut()[id];
        entry.condition_values = values;
        entry.clauses |= ClauseFlags::VALUE;
        Ok(())
    }

    /// A level number starting a new line and followed by a data name:
    /// the next entry, not another condition value.
    fn at_next_entry(&self) -> bool {
        let current = self.cursor.current();
        let new_line = self
            .cursor
            .previous()
            .is_some_and(|prev| prev.loc.line != current.loc.line);
        let next = self.cursor.peek(1);
        self.cursor.check_level_number().is_some()
            && new_line
            && (next.is_kind(TokenMask::IDENTIFIER) || next.is("FILLER"))
    }

    /// `66 name RENAMES a [THRU b].`, overlaying the current record.
    fn parse_renames_entry(&mut self) -> Result<DataEntryId, ParseError> {
        let start = self.cursor.position();
        let level_token = self.cursor.advance();
        let name = self.entry_name_or_report(ErrorContext::RenamesEntry)?;
        let section = self.current_section();
        let id = self.alloc_entry(name, 66, EntryKind::Renames, section, start, level_token);

        match self.data.levels.root() {
            Some(record) => {
                let arena = self.session.arena_mut();
                arena[id].parent = Some(record);
                arena[record].overlays.push(id);
            }
            None => {
                let shown = self.session.arena()[id].display_name().to_string();
                self.diagnose(
                    ErrorCode::E0040,
                    format!("RENAMES entry `{shown}` does not follow a record"),
                    level_token,
                    "level 66 needs a record to rename",
                )?;
            }
        }

        self.register(id)?;
        self.data.renames.push(id);
        self.finish_entry(id, ErrorContext::RenamesEntry)?;

        let entry = &self.session.arena()[id];
        if !entry.clauses.contains(ClauseFlags::RENAMES) && !self.data.damaged.contains(&id) {
            let summary = format!("level 66 entry `{}` has no RENAMES clause", entry.display_name());
            self.diagnose(ErrorCode::E0010, summary, level_token, "expected `RENAMES` in this entry")?;
        }
        self.validate_entry(id)?;
        Ok(id)
    }

    /// A required entry name; a missing one is reported and the entry
    /// carries on unnamed.
    fn entry_name_or_report(&mut self, context: ErrorContext) -> Result<Option<String>, ParseError> {
        match self.cursor.expect_identifier() {
            Ok(token) => Ok(Some(token.text.clone())),
            Err(error) if error.is_fatal() => Err(error),
            Err(error) => {
                self.report(error.with_context(context))?;
                Ok(None)
            }
        }
    }

    /// Clauses, storage length and separator period of an entry.
    fn finish_entry(&mut self, id: DataEntryId, context: ErrorContext) -> Result<(), ParseError> {
        let clauses = self.parse_clauses(id);
        self.recover_clauses(id, clauses, context)?;
        self.set_storage_length(id);
        self.end_entry(id)
    }

    /// Report a failed clause list and skip the rest of the entry.
    fn recover_clauses(
        &mut self,
        id: DataEntryId,
        result: Result<(), ParseError>,
        context: ErrorContext,
    ) -> Result<(), ParseError> {
        match result {
            Ok(()) => Ok(()),
            Err(error) if error.is_fatal() => Err(error),
            Err(error) => {
                self.data.damaged.insert(id);
                self.report(error.with_context(context))?;
                synchronize(&mut self.cursor, &recovery::DATA_ENTRY);
                Ok(())
            }
        }
    }

    /// The separator period. After a clause error that was already
    /// reported, a missing period is not reported again.
    fn end_entry(&mut self, id: DataEntryId) -> Result<(), ParseError> {
        if self.data.damaged.contains(&id) && !self.cursor.check_period() {
            return Ok(());
        }
        let what = format!("data entry `{}`", self.session.arena()[id].display_name());
        self.expect_separator(&what)
    }

    fn alloc_entry(
        &mut self,
        name: Option<String>,
        level: u8,
        kind: EntryKind,
        section: SectionKind,
        start: usize,
        token: &Token,
    ) -> DataEntryId {
        let unit = self.session.current_unit().map(|u| u.id).unwrap_or_default();
        let entry = DataEntry::new(name, level, kind, section, unit, start, token.loc);
        self.session.arena_mut().alloc(entry)
    }

    fn add_to_section(&mut self, id: DataEntryId) {
        if let Some(section) = self.session.current_unit_mut().and_then(|u| u.sections.last_mut()) {
            section.entries.push(id);
        }
    }

    /// Register a named entry in the unit. A second record with the same
    /// name is reported; both stay registered.
    fn register(&mut self, id: DataEntryId) -> Result<(), ParseError> {
        let entry = &self.session.arena()[id];
        let Some(name) = entry.name.clone() else {
            return Ok(());
        };
        let (loc, is_root) = (entry.loc, entry.is_root());

        let first = if is_root {
            self.session
                .current_unit()
                .and_then(|unit| unit.symbols.fetch_list(&name).ok())
                .and_then(|ids| ids.iter().map(|other| &self.session.arena()[*other]).find(|o| o.is_root()))
                .map(|other| (other.loc, other.display_name().to_string()))
        } else {
            None
        };

        if let Some(unit) = self.session.current_unit_mut() {
            unit.symbols.add(&name, id);
        }

        if let Some((first_loc, first_name)) = first {
            self.session
                .report(ErrorCode::E0030, format!("`{name}` is already defined as a record in this unit"))
                .with_location(loc, name.clone(), "defined again here")
                .with_location(first_loc, first_name, "first defined here")
                .with_note("record names (levels 01 and 77) must be unique within a unit")
                .finish();
            self.check_error_limit()?;
        }
        Ok(())
    }

    fn level_error(&mut self, id: DataEntryId, error: LevelError, token: &Token) -> Result<(), ParseError> {
        let entry = &self.session.arena()[id];
        let (level, name) = (entry.level, entry.display_name().to_string());
        let (summary, label, note) = match error {
            LevelError::Orphan => (
                format!("level {level:02} item `{name}` has no enclosing record"),
                "expected a level 01 item before this",
                None,
            ),
            LevelError::UnderIndependent => (
                format!("level {level:02} item `{name}` cannot be subordinate to a level 77 item"),
                "placed as a new record",
                None,
            ),
            LevelError::Unmatched { open } => {
                let open = open.iter().map(|l| format!("{l:02}")).collect::<Vec<_>>().join(", ");
                (
                    format!("level {level:02} does not match any open level"),
                    "placed next to the innermost open item",
                    Some(format!("open levels are {open}")),
                )
            }
        };
        let mut report = self.session.report(ErrorCode::E0040, summary).with_source(token, label);
        if let Some(note) = note {
            report = report.with_note(note);
        }
        report.finish();
        self.check_error_limit()
    }

    /// Pass 2 counterpart of an entry line: replay its level transition.
    fn replay_entry(&mut self, id: DataEntryId) -> Result<(), ParseError> {
        let level = self.session.arena()[id].level;
        match level {
            0 => {
                self.close_file()?;
                self.data.file = Some(id);
            }
            1..=49 | 77 => {
                let placement = self.data.levels.place(level, id);
                for closed in placement.closed {
                    self.close_entry(closed)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// An entry's level closed: check its clauses on the declaration pass,
    /// fold its length on the resolution pass.
    fn close_entry(&mut self, id: DataEntryId) -> Result<(), ParseError> {
        match self.session.pass() {
            Pass::Declaration => {
                let kind = self.session.arena()[id].kind;
                if kind == EntryKind::Data && !self.data.damaged.contains(&id) {
                    self.validate_entry(id)?;
                }
            }
            Pass::Resolution => self.fold_length(id),
        }
        Ok(())
    }

    fn close_levels(&mut self) -> Result<(), ParseError> {
        for id in self.data.levels.close_all() {
            self.close_entry(id)?;
        }
        Ok(())
    }

    /// Close the open file description: its length is its longest record.
    fn close_file(&mut self) -> Result<(), ParseError> {
        self.close_levels()?;
        if let Some(file) = self.data.file.take() {
            if self.session.pass() == Pass::Resolution {
                let arena = self.session.arena_mut();
                let longest = arena[file].children.iter().map(|c| arena[*c].length).max().unwrap_or(0);
                arena[file].length = longest;
            }
        }
        Ok(())
    }

    fn fold_length(&mut self, id: DataEntryId) {
        let entry = &self.session.arena()[id];
        let length = if entry.is_group {
            Some(self.session.arena().children_length(id))
        } else {
            entry.type_name.as_deref().and_then(|name| self.typedef_length(name))
        };
        if let Some(length) = length {
            self.session.arena_mut()[id].length = length;
        }
    }

    /// Length of the `TYPEDEF` entry registered under `name`.
    fn typedef_length(&self, name: &str) -> Option<u32> {
        let arena = self.session.arena();
        self.session
            .current_unit()?
            .symbols
            .fetch_list(name)
            .ok()?
            .iter()
            .map(|id| &arena[*id])
            .find(|entry| entry.clauses.contains(ClauseFlags::TYPEDEF))
            .map(|entry| entry.length)
    }

    /// Resolve level 66 lengths. Runs after the resolution walk with the
    /// queue live again: unknown operands can only be found here.
    fn resolve_renames(&mut self) {
        for id in std::mem::take(&mut self.data.renames) {
            let entry = &self.session.arena()[id];
            let Some(spec) = entry.renames.clone() else {
                continue;
            };
            let record = entry.parent;

            let from = self.renamed_item(&spec.from, record);
            let length = match (from, spec.thru.as_deref()) {
                (None, _) => Err(format!("cannot resolve RENAMES operand `{}`", spec.from)),
                (Some(from), None) => Ok(self.session.arena()[from].length),
                (Some(from), Some(thru_name)) => match self.renamed_item(thru_name, record) {
                    None => Err(format!("cannot resolve RENAMES operand `{thru_name}`")),
                    Some(thru) => self
                        .span_length(record.unwrap_or(from), from, thru)
                        .ok_or_else(|| format!("`{thru_name}` does not follow `{}` in the record", spec.from)),
                },
            };

            match length {
                Ok(length) => self.session.arena_mut()[id].length = length,
                Err(summary) => {
                    let entry = &self.session.arena()[id];
                    let (loc, shown) = (entry.loc, entry.display_name().to_string());
                    self.session
                        .report(ErrorCode::W0050, summary)
                        .with_location(loc, shown, "in this RENAMES entry")
                        .finish();
                }
            }
        }
    }

    /// The item a RENAMES operand names, preferring one in `record`.
    fn renamed_item(&self, operand: &str, record: Option<DataEntryId>) -> Option<DataEntryId> {
        let base = operand.split([' ', '(']).next().unwrap_or(operand);
        let arena = self.session.arena();
        let candidates: Vec<DataEntryId> = self
            .session
            .current_unit()?
            .symbols
            .fetch_list(base)
            .ok()?
            .iter()
            .copied()
            .filter(|id| matches!(arena[*id].kind, EntryKind::Data | EntryKind::Screen | EntryKind::ReportGroup))
            .collect();
        candidates
            .iter()
            .copied()
            .find(|id| Some(arena.record_of(*id)) == record)
            .or_else(|| candidates.first().copied())
    }

    /// Sum of the elementary items of `record` from the first one of
    /// `from` through the last one of `thru`.
    fn span_length(&self, record: DataEntryId, from: DataEntryId, thru: DataEntryId) -> Option<u32> {
        let arena = self.session.arena();
        let items = arena.elementary_items(record);
        let first = *arena.elementary_items(from).first()?;
        let last = *arena.elementary_items(thru).last()?;
        let start = items.iter().position(|id| *id == first)?;
        let end = items.iter().position(|id| *id == last)?;
        (start <= end).then(|| {
            items[start..=end]
                .iter()
                .map(|id| arena[*id].length)
                .fold(0u32, u32::saturating_add)
        })
    }
}
