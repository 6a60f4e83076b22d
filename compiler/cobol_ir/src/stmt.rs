//! Procedure-division statements.
//!
//! Statement operands stay opaque text; only the pieces the front end
//! validates (expressions, phrase branches, INSPECT structure, ...) are
//! modelled.

use crate::{Expression, SourceLoc};

/// A parsed statement.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statement {
    /// Upper-cased verb.
    pub verb: String,
    pub loc: SourceLoc,
    /// Set when a conditional phrase (`AT END`, `ON SIZE ERROR`, ...) was used.
    pub conditional: bool,
    /// Ended with its explicit `END-verb` terminator.
    pub terminated: bool,
    /// Operand words not modelled further.
    pub operands: Vec<String>,
    pub expressions: Vec<Expression>,
    /// Nested statement lists: phrase bodies, `THEN`/`ELSE`, `WHEN` arms.
    pub branches: Vec<Branch>,
    pub advancing: Option<Advancing>,
    pub raising: Option<Raising>,
    pub status: Option<StatusPhrase>,
    pub locale: Option<LocaleSelection>,
    pub inspect: Option<InspectSpec>,
}

impl Statement {
    /// Create a statement with nothing parsed after its verb.
    pub fn new(verb: impl Into<String>, loc: SourceLoc) -> Self {
        Statement {
            verb: verb.into(),
            loc,
            conditional: false,
            terminated: false,
            operands: Vec::new(),
            expressions: Vec::new(),
            branches: Vec::new(),
            advancing: None,
            raising: None,
            status: None,
            locale: None,
            inspect: None,
        }
    }

    /// Find a branch by its label (`"AT END"`, `"ELSE"`, ...).
    pub fn branch(&self, label: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.label == label)
    }
}

/// A labelled statement list nested in a statement.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Branch {
    pub label: String,
    pub loc: SourceLoc,
    /// Condition guarding the branch, for `WHEN` arms with conditions.
    pub condition: Option<Expression>,
    pub body: Vec<Statement>,
}

/// `BEFORE`/`AFTER` operand with optional `INITIAL`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Qualifier {
    pub initial: bool,
    pub operand: String,
}

/// Chained `BEFORE`/`AFTER` qualifiers, each given at most once.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Qualifiers {
    pub before: Option<Qualifier>,
    pub after: Option<Qualifier>,
}

/// `WRITE ... {BEFORE|AFTER} ADVANCING ...`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Advancing {
    pub before: bool,
    pub by: AdvanceBy,
}

/// Amount of an `ADVANCING` phrase.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AdvanceBy {
    /// A line count: numeric literal or identifier.
    Lines(String),
    Page,
}

/// `RAISING` phrase of `EXIT`/`GOBACK`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Raising {
    Exception(String),
    Last,
    Identifier(String),
}

/// `WITH {ERROR|NORMAL} [STATUS]`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    Error,
    Normal,
}

/// `WITH {ERROR|NORMAL} [STATUS] [operand]`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusPhrase {
    pub kind: StatusKind,
    pub value: Option<String>,
}

/// `SET LOCALE categories TO target`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocaleSelection {
    /// Upper-cased `LC_*` category names in source order.
    pub categories: Vec<String>,
    pub target: String,
}

/// Sub-phrase mode of `INSPECT`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InspectMode {
    Characters,
    All,
    Leading,
    First,
}

/// A search target with its replacement (REPLACING only).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InspectTarget {
    pub pattern: String,
    pub replacement: Option<String>,
    pub qualifiers: Qualifiers,
}

/// `CHARACTERS`, `ALL`, `LEADING` or `FIRST` sub-phrase.
///
/// `CHARACTERS` carries exactly one target whose pattern is `CHARACTERS`,
/// holding the replacement and qualifiers.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InspectItem {
    pub mode: InspectMode,
    pub targets: Vec<InspectTarget>,
}

/// `counter FOR sub-phrases...` of `INSPECT ... TALLYING`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TallyGroup {
    pub counter: String,
    pub items: Vec<InspectItem>,
}

/// Structure of an `INSPECT` statement.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InspectSpec {
    pub subject: String,
    pub tallying: Vec<TallyGroup>,
    pub replacing: Vec<InspectItem>,
    /// `CONVERTING pattern TO replacement`.
    pub converting: Option<InspectTarget>,
}

/// A named paragraph and its sentences.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Paragraph {
    pub name: String,
    /// Enclosing section, if any.
    pub section: Option<String>,
    pub loc: SourceLoc,
    pub statements: Vec<Statement>,
}

/// The PROCEDURE DIVISION of a unit.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcedureBody {
    pub using: Vec<String>,
    pub returning: Option<String>,
    /// Sentences before the first paragraph header.
    pub statements: Vec<Statement>,
    pub sections: Vec<String>,
    pub paragraphs: Vec<Paragraph>,
}

impl ProcedureBody {
    /// Find a paragraph by name (case-insensitive).
    pub fn paragraph(&self, name: &str) -> Option<&Paragraph> {
        self.paragraphs
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// All top-level statements, unsectioned ones first.
    pub fn all_statements(&self) -> impl Iterator<Item = &Statement> {
        self.statements
            .iter()
            .chain(self.paragraphs.iter().flat_map(|p| p.statements.iter()))
    }
}
