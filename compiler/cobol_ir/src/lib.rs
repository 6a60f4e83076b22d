//! Intermediate representation types for the COBOL front end.
//!
//! This crate holds the plain data shared by every analysis pass:
//! - [`SourceLoc`]: line/column positions inside a source file
//! - [`Token`], [`TokenKind`], [`TokenList`]: the pre-tokenized input stream
//! - [`DataEntry`], [`DataArena`]: the data-item hierarchy with arena handles
//! - [`Expression`]: normalized infix and postfix expression forms
//! - [`Statement`]: procedure statements and their phrase payloads
//!
//! Nothing in here performs parsing; see `cobol_parse` for that.

mod arena;
mod data;
mod expr;
pub mod keywords;
mod loc;
mod stmt;
mod token;

pub use arena::{DataArena, DataEntryId, UnitId};
pub use data::{
    ClauseFlags, ConditionValue, DataEntry, EntryKind, Occurs, Picture, PictureCategory,
    RenamesSpec, SectionKind, UsageCategory,
};
pub use expr::{ExprKind, ExprRole, ExprToken, Expression};
pub use loc::SourceLoc;
pub use stmt::{
    AdvanceBy, Advancing, Branch, InspectItem, InspectMode, InspectSpec, InspectTarget,
    LocaleSelection, Paragraph, ProcedureBody, Qualifier, Qualifiers, Raising, Statement,
    StatusKind, StatusPhrase, TallyGroup,
};
pub use token::{Token, TokenKind, TokenList, TokenMask};
