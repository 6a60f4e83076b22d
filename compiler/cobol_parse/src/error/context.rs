//! Error context for "while parsing X" notes.

/// Context describing what was being parsed when an error occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorContext {
    // === Units ===
    /// Parsing a unit header (`PROGRAM-ID.` and friends).
    UnitHeader,
    /// Parsing an `END PROGRAM` style marker.
    EndMarker,

    // === Data division ===
    /// Parsing the DATA DIVISION.
    DataDivision,
    /// Parsing an `FD`, `SD` or `RD` entry.
    FileDescription,
    /// Parsing a data description entry.
    DataEntry,
    /// Parsing a clause of a data description entry.
    Clause,
    /// Parsing a level 88 condition-name.
    ConditionName,
    /// Parsing a level 66 `RENAMES` entry.
    RenamesEntry,

    // === Procedure division ===
    /// Parsing the PROCEDURE DIVISION header.
    ProcedureDivision,
    /// Parsing a statement.
    Statement,
    /// Parsing an optional phrase.
    Phrase,
    /// Parsing the body of `INSPECT`.
    Inspect,

    // === Expressions ===
    /// Parsing an arithmetic expression.
    Arithmetic,
    /// Parsing a conditional expression.
    Condition,
}

impl ErrorContext {
    /// Description with article, for notes.
    pub fn description(self) -> &'static str {
        match self {
            Self::UnitHeader => "a unit header",
            Self::EndMarker => "an END marker",
            Self::DataDivision => "the DATA DIVISION",
            Self::FileDescription => "a file description",
            Self::DataEntry => "a data description entry",
            Self::Clause => "a data clause",
            Self::ConditionName => "a condition-name entry",
            Self::RenamesEntry => "a RENAMES entry",
            Self::ProcedureDivision => "the PROCEDURE DIVISION header",
            Self::Statement => "a statement",
            Self::Phrase => "an optional phrase",
            Self::Inspect => "an INSPECT statement",
            Self::Arithmetic => "an arithmetic expression",
            Self::Condition => "a condition",
        }
    }

    /// Short label for the primary source label.
    pub fn label(self) -> &'static str {
        match self {
            Self::UnitHeader => "in this unit header",
            Self::EndMarker => "in this END marker",
            Self::DataDivision => "in DATA DIVISION",
            Self::FileDescription => "in this file description",
            Self::DataEntry => "in this data entry",
            Self::Clause => "in this clause",
            Self::ConditionName => "in this condition-name",
            Self::RenamesEntry => "in this RENAMES entry",
            Self::ProcedureDivision => "in PROCEDURE DIVISION header",
            Self::Statement => "in this statement",
            Self::Phrase => "in this phrase",
            Self::Inspect => "in this INSPECT",
            Self::Arithmetic => "in this expression",
            Self::Condition => "in this condition",
        }
    }
}
