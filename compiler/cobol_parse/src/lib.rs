//! Parser and data-hierarchy resolver for the COBOL front end.
//!
//! Consumes a pre-tokenized stream and produces source units with their
//! data entries, symbol tables and procedure bodies, plus every diagnostic
//! found on the way.
//!
//! ```text
//! let output = cobol_parse::parse(&tokens, &ParseOptions::default());
//! for diagnostic in &output.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! ```

mod cursor;
mod data;
mod error;
mod expr;
mod keywords;
mod phrase;
mod procedure;
mod recovery;
mod session;
mod snapshot;
mod symbols;
mod unit;

#[cfg(test)]
mod tests;

pub use cursor::Cursor;
pub use data::{analyze_picture, LevelError, LevelStack, Placement};
pub use error::{ErrorContext, ParseError};
pub use expr::{
    check_balance, normalize_relation, to_postfix, validate_postfix, Assoc, Fixity, OperatorInfo,
    PrecedenceTable, Relation, ARITHMETIC, CONDITIONAL,
};
pub use phrase::PhraseFamily;
pub use recovery::{synchronize, SyncSet};
pub use session::{DataSection, Pass, Session, SourceUnit, UnitKind};
pub use snapshot::ParserSnapshot;
pub use symbols::{SymbolError, SymbolTable};

use std::sync::Once;

use cobol_diagnostic::{Diagnostic, DiagnosticConfig, ErrorCode};
use cobol_ir::{DataArena, DataEntry, Token, TokenList};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=cobol_parse=debug` or `RUST_LOG=cobol_parse=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Knobs for one parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    pub diagnostics: DiagnosticConfig,
    /// Run the resolution pass that folds group, file and RENAMES lengths.
    pub resolve_lengths: bool,
    /// Require explicit terminators on nested statements that used a
    /// conditional phrase.
    pub nested_terminators: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            diagnostics: DiagnosticConfig::default(),
            resolve_lengths: true,
            nested_terminators: true,
        }
    }
}

/// Result of parsing a token stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOutput {
    /// Units in declaration order, nested ones included.
    pub units: Vec<SourceUnit>,
    pub arena: DataArena,
    /// Diagnostics in emission order.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    /// Check if any error (not warning) was reported.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Find a unit by name, ignoring case.
    pub fn unit(&self, name: &str) -> Option<&SourceUnit> {
        self.units.iter().find(|u| u.name.eq_ignore_ascii_case(name))
    }

    /// First data entry registered under `name` in the named unit.
    pub fn entry(&self, unit: &str, name: &str) -> Option<&DataEntry> {
        let id = *self.unit(unit)?.symbols.fetch_unique(name).ok()?;
        self.arena.get(id)
    }

    /// Codes of all diagnostics, in emission order.
    pub fn codes(&self) -> Vec<ErrorCode> {
        self.diagnostics.iter().map(|d| d.code).collect()
    }
}

/// Parse a whole token stream.
pub fn parse(tokens: &TokenList, options: &ParseOptions) -> ParseOutput {
    let mut parser = Parser::new(tokens, options);
    parser.parse_units();
    parser.finish()
}

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    session: Session,
    options: ParseOptions,
    data: data::DataState,
    /// How many statement bodies enclose the statement being parsed.
    nesting: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser.
    pub fn new(tokens: &'a TokenList, options: &ParseOptions) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            session: Session::new(options.diagnostics.clone()),
            options: options.clone(),
            data: data::DataState::default(),
            nesting: 0,
        }
    }

    /// Close every open unit and return the results.
    pub fn finish(self) -> ParseOutput {
        let (units, arena, diagnostics) = self.session.finish();
        ParseOutput {
            units,
            arena,
            diagnostics,
        }
    }

    /// Report a recoverable error. Fails with a unit-fatal error once the
    /// error limit is reached.
    fn report(&mut self, error: ParseError) -> Result<(), ParseError> {
        self.session.emit(error.to_diagnostic());
        self.check_error_limit()
    }

    /// Report a problem with `token`.
    fn diagnose(
        &mut self,
        code: ErrorCode,
        summary: impl Into<String>,
        token: &Token,
        label: &str,
    ) -> Result<(), ParseError> {
        self.session.report(code, summary).with_source(token, label).finish();
        self.check_error_limit()
    }

    fn check_error_limit(&self) -> Result<(), ParseError> {
        let queue = self.session.queue();
        if queue.limit_reached() && !queue.is_muted() {
            Err(ParseError::new(
                ErrorCode::E0900,
                format!("too many errors ({}), abandoning this unit", queue.error_count()),
                self.cursor.current(),
            ))
        } else {
            Ok(())
        }
    }

    /// Report a recoverable error and skip to a synchronization point.
    /// Fatal errors are handed back untouched.
    fn recover(&mut self, error: ParseError, set: &SyncSet) -> Result<(), ParseError> {
        if error.is_fatal() {
            return Err(error);
        }
        self.report(error)?;
        synchronize(&mut self.cursor, set);
        Ok(())
    }

    /// Consume a separator period, reporting a missing one and carrying on.
    fn expect_separator(&mut self, after: &str) -> Result<(), ParseError> {
        if self.cursor.check_period() {
            self.cursor.advance();
            return Ok(());
        }
        let current = self.cursor.current();
        self.diagnose(
            ErrorCode::E0025,
            format!("missing period after {after}"),
            current,
            "expected `.` before this",
        )
    }
}
