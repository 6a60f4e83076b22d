//! Parse session: the state every grammar component shares.
//!
//! One `Session` is threaded through the parser. It owns the stack of open
//! source units, the finished units, the data arena and the diagnostics
//! queue. Nested units are pushed with [`Session::enter_unit`] and popped
//! with [`Session::exit_unit`]; only the top of the stack receives new
//! symbols and data sections.

use std::ops::Range;

use cobol_diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticConfig, DiagnosticQueue, ErrorCode};
use cobol_ir::{DataArena, DataEntryId, ProcedureBody, SectionKind, SourceLoc, UnitId};
use tracing::debug;

use crate::SymbolTable;

/// Which walk over a token range is running.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Pass {
    /// First walk: build entries, register names, report problems.
    Declaration,
    /// Re-walk from a snapshot: fold lengths only, never report.
    Resolution,
}

/// Kind of compilation unit, from its header keyword.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Program,
    Function,
    Method,
    Class,
}

impl UnitKind {
    /// Map a header word (`PROGRAM-ID`) or end-marker word (`PROGRAM`).
    pub fn from_keyword(word: &str) -> Option<Self> {
        let kind = match word.to_ascii_uppercase().as_str() {
            "PROGRAM-ID" | "PROGRAM" => UnitKind::Program,
            "FUNCTION-ID" | "FUNCTION" => UnitKind::Function,
            "METHOD-ID" | "METHOD" => UnitKind::Method,
            "CLASS-ID" | "CLASS" => UnitKind::Class,
            _ => return None,
        };
        Some(kind)
    }

    /// The word used in `END` markers.
    pub const fn end_word(self) -> &'static str {
        match self {
            UnitKind::Program => "PROGRAM",
            UnitKind::Function => "FUNCTION",
            UnitKind::Method => "METHOD",
            UnitKind::Class => "CLASS",
        }
    }
}

/// A DATA DIVISION section and its top-level entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataSection {
    pub kind: SectionKind,
    /// Parentless entries in declaration order: file descriptors and
    /// records outside any file.
    pub entries: Vec<DataEntryId>,
}

/// One compilation unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceUnit {
    pub id: UnitId,
    pub kind: UnitKind,
    pub name: String,
    pub loc: SourceLoc,
    pub parent: Option<UnitId>,
    /// Every named data entry, keyed case-insensitively.
    pub symbols: SymbolTable<DataEntryId>,
    pub sections: Vec<DataSection>,
    /// Token range of the DATA DIVISION body, for the resolution pass.
    pub data_range: Option<Range<usize>>,
    pub procedure: Option<ProcedureBody>,
    /// Set when a unit-fatal error cut parsing short.
    pub aborted: bool,
}

impl SourceUnit {
    fn new(id: UnitId, kind: UnitKind, name: String, loc: SourceLoc, parent: Option<UnitId>) -> Self {
        SourceUnit {
            id,
            kind,
            name,
            loc,
            parent,
            symbols: SymbolTable::new(),
            sections: Vec::new(),
            data_range: None,
            procedure: None,
            aborted: false,
        }
    }

    /// The section a new top-level entry belongs to.
    pub fn section(&self, kind: SectionKind) -> Option<&DataSection> {
        self.sections.iter().rev().find(|s| s.kind == kind)
    }
}

/// Shared mutable state for one parse.
pub struct Session {
    /// Open units, innermost last.
    open: Vec<SourceUnit>,
    finished: Vec<SourceUnit>,
    arena: DataArena,
    queue: DiagnosticQueue,
    pass: Pass,
    next_unit: u32,
}

impl Session {
    pub fn new(config: DiagnosticConfig) -> Self {
        Session {
            open: Vec::new(),
            finished: Vec::new(),
            arena: DataArena::new(),
            queue: DiagnosticQueue::with_config(config),
            pass: Pass::Declaration,
            next_unit: 0,
        }
    }

    /// Push a new unit; it becomes the active one.
    pub fn enter_unit(&mut self, kind: UnitKind, name: impl Into<String>, loc: SourceLoc) -> UnitId {
        let id = UnitId(self.next_unit);
        self.next_unit += 1;
        let parent = self.open.last().map(|u| u.id);
        let unit = SourceUnit::new(id, kind, name.into(), loc, parent);
        debug!(unit = %unit.name, ?kind, depth = self.open.len(), "enter unit");
        self.open.push(unit);
        id
    }

    /// Pop the active unit.
    pub fn exit_unit(&mut self) -> Option<UnitId> {
        let unit = self.open.pop()?;
        debug!(unit = %unit.name, aborted = unit.aborted, "exit unit");
        let id = unit.id;
        self.finished.push(unit);
        Some(id)
    }

    /// Mark the active unit aborted and pop it.
    pub fn abort_unit(&mut self) -> Option<UnitId> {
        if let Some(unit) = self.open.last_mut() {
            unit.aborted = true;
        }
        self.exit_unit()
    }

    /// Pop every open unit.
    pub fn exit_all(&mut self) {
        while self.exit_unit().is_some() {}
    }

    /// Number of open units.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn current_unit(&self) -> Option<&SourceUnit> {
        self.open.last()
    }

    pub fn current_unit_mut(&mut self) -> Option<&mut SourceUnit> {
        self.open.last_mut()
    }

    /// Look a unit up by id, open or finished.
    pub fn unit(&self, id: UnitId) -> Option<&SourceUnit> {
        self.open
            .iter()
            .chain(self.finished.iter())
            .find(|u| u.id == id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut SourceUnit> {
        self.open
            .iter_mut()
            .chain(self.finished.iter_mut())
            .find(|u| u.id == id)
    }

    pub fn pass(&self) -> Pass {
        self.pass
    }

    /// Switch passes. The queue is muted for the whole resolution pass.
    /// Returns the previous pass.
    pub fn set_pass(&mut self, pass: Pass) -> Pass {
        debug!(?pass, "pass");
        self.queue.set_muted(pass == Pass::Resolution);
        std::mem::replace(&mut self.pass, pass)
    }

    pub fn arena(&self) -> &DataArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut DataArena {
        &mut self.arena
    }

    pub fn queue(&self) -> &DiagnosticQueue {
        &self.queue
    }

    /// Start a diagnostic.
    pub fn report(&mut self, code: ErrorCode, summary: impl Into<String>) -> DiagnosticBuilder<'_> {
        self.queue.begin(code, summary)
    }

    /// Emit a finished diagnostic.
    pub fn emit(&mut self, diagnostic: Diagnostic) -> bool {
        self.queue.emit(diagnostic)
    }

    /// Close every unit and hand back the results, units in declaration order.
    pub fn finish(mut self) -> (Vec<SourceUnit>, DataArena, Vec<Diagnostic>) {
        self.exit_all();
        let mut units = self.finished;
        units.sort_by_key(|u| u.id);
        (units, self.arena, self.queue.flush())
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
