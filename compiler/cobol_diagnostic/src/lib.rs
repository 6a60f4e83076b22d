//! Diagnostic system for the COBOL front end.
//!
//! Every diagnostic carries:
//! - an error code for searchability (`E0315`)
//! - a class derived from the code (syntax, structural level, ...)
//! - a one-line summary (what went wrong)
//! - source labels with excerpts (where it went wrong)
//! - notes (what was being parsed)
//!
//! # Error Guarantees
//!
//! The `ErrorGuaranteed` type provides type-level proof that at least one
//! error was emitted.
//!
//! ```text
//! let guarantee = queue.emit_error(diagnostic);
//! ```

mod diagnostic;
mod error_code;
mod guarantee;
pub mod queue;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::{DiagnosticClass, ErrorCode};
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticBuilder, DiagnosticConfig, DiagnosticQueue};
