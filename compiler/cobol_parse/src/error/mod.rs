//! Parse error types.
//!
//! Grammar functions return `Result<T, ParseError>`. The caller decides
//! what happens next: most errors are converted into a diagnostic and
//! parsing resumes at a synchronization point, while fatal ones (stream
//! exhaustion, error limit) unwind to the unit driver.

mod context;

#[cfg(test)]
mod tests;

pub use context::ErrorContext;

use cobol_diagnostic::{Diagnostic, ErrorCode};
use cobol_ir::{SourceLoc, Token};

/// A parse error with location and context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// Error code for searchability.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Location of the error.
    pub loc: SourceLoc,
    /// Source text at the location.
    pub excerpt: String,
    /// What was being parsed.
    pub context: Option<ErrorContext>,
    /// Extra notes.
    pub notes: Vec<String>,
}

impl ParseError {
    /// Create a parse error pointing at a token.
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>, token: &Token) -> Self {
        Self::at(code, message, token.loc, token.excerpt())
    }

    /// Create a parse error at an explicit location.
    #[cold]
    pub fn at(
        code: ErrorCode,
        message: impl Into<String>,
        loc: SourceLoc,
        excerpt: impl Into<String>,
    ) -> Self {
        ParseError {
            code,
            message: message.into(),
            loc,
            excerpt: excerpt.into(),
            context: None,
            notes: Vec::new(),
        }
    }

    /// Create an "unexpected end of token stream" error.
    #[cold]
    pub fn unexpected_end(expected: &str, token: &Token) -> Self {
        Self::new(
            ErrorCode::E0015,
            format!("unexpected end of source unit, expected {expected}"),
            token,
        )
    }

    /// Attach the construct being parsed, unless one is already set.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context.get_or_insert(context);
        self
    }

    /// Add a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Check if this error aborts the current unit.
    pub fn is_fatal(&self) -> bool {
        self.code.is_fatal()
    }

    /// Convert to a full Diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let label = self.context.map_or("here", ErrorContext::label);
        let mut diag = Diagnostic::new(self.code)
            .with_message(&self.message)
            .with_label_at(self.loc, &self.excerpt, label);

        if let Some(context) = self.context {
            diag = diag.with_note(format!("while parsing {}", context.description()));
        }
        for note in &self.notes {
            diag = diag.with_note(note);
        }

        diag
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} at {}", self.code, self.message, self.loc)
    }
}
