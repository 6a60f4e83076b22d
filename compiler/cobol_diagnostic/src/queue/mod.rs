//! Diagnostic queue: the single sink every front-end component reports into.
//!
//! Features:
//! - Builder-style reporting through [`DiagnosticQueue::begin`]
//! - Error limits, checked by the parser to abort runaway units
//! - Muting, so a re-walk of already reported tokens stays silent
//! - `ErrorGuaranteed` proof that errors were emitted
//!
//! Unlike a rendering front end, the queue never deduplicates or filters:
//! every diagnostic the parser raises surfaces exactly once, in emission
//! order.

use cobol_ir::{SourceLoc, Token};
use tracing::debug;

use crate::{Diagnostic, ErrorCode, ErrorGuaranteed};

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Default)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before the current unit is abandoned
    /// (0 = unlimited).
    pub error_limit: usize,
}

impl DiagnosticConfig {
    /// Create a config with no limits.
    pub fn unlimited() -> Self {
        DiagnosticConfig { error_limit: 0 }
    }

    /// Create a config that gives up after `limit` errors.
    pub fn with_error_limit(limit: usize) -> Self {
        DiagnosticConfig { error_limit: limit }
    }
}

/// Queue collecting diagnostics in emission order.
///
/// # Example
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// queue
///     .begin(ErrorCode::E0040, "level 05 has no enclosing group")
///     .with_source(&token, "this item")
///     .finish();
/// let diagnostics = queue.flush();
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    /// Count of errors (not warnings/notes).
    error_count: usize,
    /// While set, reports are dropped without being counted.
    muted: bool,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    /// Create a diagnostic queue with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            muted: false,
            config,
        }
    }

    /// Start building a diagnostic. Nothing is recorded until
    /// [`DiagnosticBuilder::finish`].
    pub fn begin(&mut self, code: ErrorCode, summary: impl Into<String>) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            queue: self,
            diagnostic: Diagnostic::new(code).with_message(summary),
        }
    }

    /// Add a finished diagnostic.
    ///
    /// Returns `false` if the queue is muted and the diagnostic was dropped.
    pub fn emit(&mut self, diag: Diagnostic) -> bool {
        if self.muted {
            debug!(code = %diag.code, "diagnostic muted");
            return false;
        }
        debug!(code = %diag.code, message = %diag.message, "diagnostic");
        if diag.is_error() {
            self.error_count += 1;
        }
        self.diagnostics.push(diag);
        true
    }

    /// Emit an error diagnostic and get proof it was emitted.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        self.emit(diag);
        ErrorGuaranteed::new()
    }

    /// Mute or unmute the queue. Returns the previous state.
    pub fn set_muted(&mut self, muted: bool) -> bool {
        std::mem::replace(&mut self.muted, muted)
    }

    /// Check if reports are currently dropped.
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    /// Get the number of errors collected.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Check if any errors were emitted and get proof if so.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    /// Diagnostics collected so far, in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of diagnostics collected.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Check if nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Take all diagnostics, in emission order, and reset the counters.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        self.error_count = 0;
        std::mem::take(&mut self.diagnostics)
    }
}

/// In-progress diagnostic bound to its queue.
///
/// The first source label attached becomes the primary one.
#[must_use = "call `finish()` to record the diagnostic"]
pub struct DiagnosticBuilder<'q> {
    queue: &'q mut DiagnosticQueue,
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder<'_> {
    /// Attach the token the diagnostic is about.
    pub fn with_source(self, token: &Token, note: impl Into<String>) -> Self {
        let excerpt = token.excerpt();
        self.with_location(token.loc, excerpt, note)
    }

    /// Attach a location with an explicit excerpt.
    pub fn with_location(
        mut self,
        loc: SourceLoc,
        excerpt: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        self.diagnostic = if self.diagnostic.labels.iter().any(|l| l.is_primary) {
            self.diagnostic.with_secondary_label(loc, excerpt, note)
        } else {
            self.diagnostic.with_label_at(loc, excerpt, note)
        };
        self
    }

    /// Add a free-standing note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.diagnostic = self.diagnostic.with_note(note);
        self
    }

    /// Record the diagnostic. Returns a guarantee when an error was
    /// actually recorded (not dropped by a muted queue).
    pub fn finish(self) -> Option<ErrorGuaranteed> {
        let is_error = self.diagnostic.is_error();
        let DiagnosticBuilder { queue, diagnostic } = self;
        let recorded = queue.emit(diagnostic);
        (is_error && recorded).then(ErrorGuaranteed::new)
    }
}

#[cfg(test)]
mod tests;
