//! Error codes for all front-end diagnostics.
//!
//! Codes keep the numbering of the classic COBOL front end so that message
//! catalogues and `--explain` style lookups stay stable: `E0315` is still
//! "bad symbol in expression".

use std::fmt;

/// Error codes for all front-end diagnostics.
///
/// Format: E#### (W#### for warnings). Ranges:
/// - E00xx: token-level and structural errors
/// - E03xx: expression errors
/// - E09xx: internal limits
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCode {
    /// Unexpected token
    E0010,
    /// Expected identifier
    E0011,
    /// Expected literal
    E0012,
    /// Unexpected end of token stream (aborts the unit)
    E0015,
    /// Missing separator period
    E0025,
    /// Duplicate root or condition name
    E0030,
    /// Phrase given more than once in a statement
    E0035,
    /// Clause given more than once for an item
    E0036,
    /// Invalid level-number sequencing
    E0040,
    /// Invalid level number
    E0041,
    /// Incompatible clause combination
    E0045,
    /// Missing explicit scope terminator
    E0055,
    /// `END` marker names a different unit
    E0060,
    /// Bad symbol in expression
    E0315,
    /// Unbalanced parentheses
    E0320,
    /// Invalid expression structure
    E0325,
    /// Too many errors (aborts the unit)
    E0900,
    /// `RENAMES` operand could not be resolved
    W0050,
}

/// Broad category of a diagnostic, derived from its code.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticClass {
    Syntax,
    MissingSeparator,
    Duplicate,
    DuplicatePhrase,
    StructuralLevel,
    ClauseCombination,
    ExpressionMalformed,
    Internal,
}

impl fmt::Display for DiagnosticClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticClass::Syntax => "syntax",
            DiagnosticClass::MissingSeparator => "missing separator",
            DiagnosticClass::Duplicate => "duplicate",
            DiagnosticClass::DuplicatePhrase => "duplicate phrase",
            DiagnosticClass::StructuralLevel => "structural level",
            DiagnosticClass::ClauseCombination => "clause combination",
            DiagnosticClass::ExpressionMalformed => "malformed expression",
            DiagnosticClass::Internal => "internal",
        };
        f.write_str(name)
    }
}

impl ErrorCode {
    /// All error code variants, for exhaustive testing.
    ///
    /// When adding a new variant: add it to the enum, `as_str()`, and here.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E0010,
        ErrorCode::E0011,
        ErrorCode::E0012,
        ErrorCode::E0015,
        ErrorCode::E0025,
        ErrorCode::E0030,
        ErrorCode::E0035,
        ErrorCode::E0036,
        ErrorCode::E0040,
        ErrorCode::E0041,
        ErrorCode::E0045,
        ErrorCode::E0055,
        ErrorCode::E0060,
        ErrorCode::E0315,
        ErrorCode::E0320,
        ErrorCode::E0325,
        ErrorCode::E0900,
        ErrorCode::W0050,
    ];

    /// Get the code as a string (e.g., "E0315").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0010 => "E0010",
            ErrorCode::E0011 => "E0011",
            ErrorCode::E0012 => "E0012",
            ErrorCode::E0015 => "E0015",
            ErrorCode::E0025 => "E0025",
            ErrorCode::E0030 => "E0030",
            ErrorCode::E0035 => "E0035",
            ErrorCode::E0036 => "E0036",
            ErrorCode::E0040 => "E0040",
            ErrorCode::E0041 => "E0041",
            ErrorCode::E0045 => "E0045",
            ErrorCode::E0055 => "E0055",
            ErrorCode::E0060 => "E0060",
            ErrorCode::E0315 => "E0315",
            ErrorCode::E0320 => "E0320",
            ErrorCode::E0325 => "E0325",
            ErrorCode::E0900 => "E0900",
            ErrorCode::W0050 => "W0050",
        }
    }

    /// The numeric part of the code (`E0315` is 315).
    pub fn number(&self) -> u16 {
        self.as_str()[1..].parse().unwrap_or(0)
    }

    /// Class this code belongs to.
    pub fn class(&self) -> DiagnosticClass {
        match self {
            ErrorCode::E0010
            | ErrorCode::E0011
            | ErrorCode::E0012
            | ErrorCode::E0015
            | ErrorCode::E0055
            | ErrorCode::E0060 => DiagnosticClass::Syntax,
            ErrorCode::E0025 => DiagnosticClass::MissingSeparator,
            ErrorCode::E0030 => DiagnosticClass::Duplicate,
            ErrorCode::E0035 | ErrorCode::E0036 => DiagnosticClass::DuplicatePhrase,
            ErrorCode::E0040 | ErrorCode::E0041 | ErrorCode::W0050 => {
                DiagnosticClass::StructuralLevel
            }
            ErrorCode::E0045 => DiagnosticClass::ClauseCombination,
            ErrorCode::E0315 | ErrorCode::E0320 | ErrorCode::E0325 => {
                DiagnosticClass::ExpressionMalformed
            }
            ErrorCode::E0900 => DiagnosticClass::Internal,
        }
    }

    /// Check if this code aborts the current source unit.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorCode::E0015 | ErrorCode::E0900)
    }

    /// Check if this is an expression error (E03xx range).
    pub fn is_expression_error(&self) -> bool {
        matches!(self.class(), DiagnosticClass::ExpressionMalformed)
    }

    /// Check if this is a warning code (Wxxxx range).
    pub fn is_warning(&self) -> bool {
        matches!(self, ErrorCode::W0050)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E0315"` or `"W0050"`.
///
/// Case-insensitive. Derived from [`ErrorCode::ALL`] and [`ErrorCode::as_str()`].
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
