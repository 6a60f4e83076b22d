//! Data-division entries.
//!
//! A [`DataEntry`] is created when its level-number line is read, gains
//! clause payloads and children while the rest of its record is parsed,
//! and receives its final length on the resolution pass.

use bitflags::bitflags;
use std::fmt;

use crate::{DataEntryId, SourceLoc, UnitId};

/// Section of the DATA DIVISION an entry was declared in.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SectionKind {
    File,
    WorkingStorage,
    LocalStorage,
    Linkage,
    Screen,
    Report,
}

impl SectionKind {
    /// Map a section header word to its kind.
    pub fn from_keyword(word: &str) -> Option<Self> {
        let kind = match word.to_ascii_uppercase().as_str() {
            "FILE" => SectionKind::File,
            "WORKING-STORAGE" => SectionKind::WorkingStorage,
            "LOCAL-STORAGE" => SectionKind::LocalStorage,
            "LINKAGE" => SectionKind::Linkage,
            "SCREEN" => SectionKind::Screen,
            "REPORT" => SectionKind::Report,
            _ => return None,
        };
        Some(kind)
    }

    /// The header keyword (without `SECTION`).
    pub const fn keyword(self) -> &'static str {
        match self {
            SectionKind::File => "FILE",
            SectionKind::WorkingStorage => "WORKING-STORAGE",
            SectionKind::LocalStorage => "LOCAL-STORAGE",
            SectionKind::Linkage => "LINKAGE",
            SectionKind::Screen => "SCREEN",
            SectionKind::Report => "REPORT",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} SECTION", self.keyword())
    }
}

/// What a data entry describes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntryKind {
    /// `FD` or `SD` file description (level 0).
    File,
    /// `RD` report description (level 0).
    Report,
    /// Ordinary storage item (levels 1-49 and 77).
    Data,
    /// Item of the SCREEN SECTION.
    Screen,
    /// Report group item of the REPORT SECTION.
    ReportGroup,
    /// Level 88 condition-name.
    Condition,
    /// Level 66 `RENAMES` item.
    Renames,
}

/// Storage representation selected by the `USAGE` clause.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UsageCategory {
    #[default]
    Display,
    National,
    /// `BINARY`, `COMP`, `COMP-4`.
    Binary,
    /// `COMP-5`: native binary.
    NativeBinary,
    /// `COMP-3`, `PACKED-DECIMAL`.
    Packed,
    /// `COMP-1`, `FLOAT-SHORT`.
    FloatShort,
    /// `COMP-2`, `FLOAT-LONG`.
    FloatLong,
    Index,
    Pointer,
    FunctionPointer,
    ProgramPointer,
    ProcedurePointer,
    ObjectReference,
    MessageTag,
}

impl UsageCategory {
    /// Map a usage word to its category.
    ///
    /// `OBJECT` is the first word of `OBJECT REFERENCE`; the grammar
    /// consumes the second word.
    pub fn from_keyword(word: &str) -> Option<Self> {
        let usage = match word.to_ascii_uppercase().as_str() {
            "DISPLAY" => UsageCategory::Display,
            "NATIONAL" => UsageCategory::National,
            "BINARY" | "COMP" | "COMP-4" | "COMPUTATIONAL" | "COMPUTATIONAL-4" => {
                UsageCategory::Binary
            }
            "COMP-5" | "COMPUTATIONAL-5" => UsageCategory::NativeBinary,
            "COMP-3" | "COMPUTATIONAL-3" | "PACKED-DECIMAL" => UsageCategory::Packed,
            "COMP-1" | "COMPUTATIONAL-1" | "FLOAT-SHORT" => UsageCategory::FloatShort,
            "COMP-2" | "COMPUTATIONAL-2" | "FLOAT-LONG" => UsageCategory::FloatLong,
            "INDEX" => UsageCategory::Index,
            "POINTER" => UsageCategory::Pointer,
            "FUNCTION-POINTER" => UsageCategory::FunctionPointer,
            "PROGRAM-POINTER" => UsageCategory::ProgramPointer,
            "PROCEDURE-POINTER" => UsageCategory::ProcedurePointer,
            "OBJECT" => UsageCategory::ObjectReference,
            "MESSAGE-TAG" => UsageCategory::MessageTag,
            _ => return None,
        };
        Some(usage)
    }

    /// Whether a `PICTURE` clause may accompany this usage.
    pub const fn allows_picture(self) -> bool {
        matches!(
            self,
            UsageCategory::Display
                | UsageCategory::National
                | UsageCategory::Binary
                | UsageCategory::NativeBinary
                | UsageCategory::Packed
        )
    }

    /// Whether a `VALUE` clause may accompany this usage.
    pub const fn allows_value(self) -> bool {
        !matches!(
            self,
            UsageCategory::Index
                | UsageCategory::Pointer
                | UsageCategory::FunctionPointer
                | UsageCategory::ProgramPointer
                | UsageCategory::ProcedurePointer
                | UsageCategory::ObjectReference
                | UsageCategory::MessageTag
        )
    }

    /// Storage size for usages whose size doesn't depend on a picture.
    pub const fn fixed_length(self) -> Option<u32> {
        match self {
            UsageCategory::FloatShort | UsageCategory::Index => Some(4),
            UsageCategory::FloatLong
            | UsageCategory::Pointer
            | UsageCategory::FunctionPointer
            | UsageCategory::ProgramPointer
            | UsageCategory::ProcedurePointer
            | UsageCategory::ObjectReference
            | UsageCategory::MessageTag => Some(8),
            UsageCategory::Display
            | UsageCategory::National
            | UsageCategory::Binary
            | UsageCategory::NativeBinary
            | UsageCategory::Packed => None,
        }
    }
}

impl fmt::Display for UsageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UsageCategory::Display => "DISPLAY",
            UsageCategory::National => "NATIONAL",
            UsageCategory::Binary => "BINARY",
            UsageCategory::NativeBinary => "COMP-5",
            UsageCategory::Packed => "PACKED-DECIMAL",
            UsageCategory::FloatShort => "FLOAT-SHORT",
            UsageCategory::FloatLong => "FLOAT-LONG",
            UsageCategory::Index => "INDEX",
            UsageCategory::Pointer => "POINTER",
            UsageCategory::FunctionPointer => "FUNCTION-POINTER",
            UsageCategory::ProgramPointer => "PROGRAM-POINTER",
            UsageCategory::ProcedurePointer => "PROCEDURE-POINTER",
            UsageCategory::ObjectReference => "OBJECT REFERENCE",
            UsageCategory::MessageTag => "MESSAGE-TAG",
        };
        f.write_str(name)
    }
}

/// Category implied by a picture string.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PictureCategory {
    Numeric,
    NumericEdited,
    Alphabetic,
    Alphanumeric,
    AlphanumericEdited,
    National,
    Boolean,
}

/// An analysed `PICTURE` string.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Picture {
    /// The picture string as written.
    pub text: String,
    /// Character positions described (display size).
    pub size: u32,
    /// Digit positions (`9` and `P`).
    pub digits: u32,
    /// Digits to the right of the assumed decimal point.
    pub scale: u32,
    /// Has an `S` sign.
    pub signed: bool,
    pub category: PictureCategory,
}

/// `OCCURS` payload. Repetitions are recorded, not folded into lengths.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Occurs {
    pub min: u32,
    pub max: u32,
    pub depending_on: Option<String>,
    pub keys: Vec<String>,
    pub indexed_by: Vec<String>,
}

/// One value (or `THRU` range) of a condition-name.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionValue {
    pub low: String,
    pub high: Option<String>,
}

/// Operands of a level 66 `RENAMES` clause.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenamesSpec {
    pub from: String,
    pub thru: Option<String>,
}

bitflags! {
    /// Clauses present on a data entry.
    ///
    /// Used both for duplicate-clause detection and for the clause
    /// combination checks run when an entry closes.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ClauseFlags: u32 {
        const PICTURE = 1 << 0;
        const USAGE = 1 << 1;
        const VALUE = 1 << 2;
        const OCCURS = 1 << 3;
        const REDEFINES = 1 << 4;
        const RENAMES = 1 << 5;
        const GLOBAL = 1 << 6;
        const EXTERNAL = 1 << 7;
        const TYPE = 1 << 8;
        const TYPEDEF = 1 << 9;
        const JUSTIFIED = 1 << 10;
        const BLANK_WHEN_ZERO = 1 << 11;
        const SIGN = 1 << 12;
        const SYNCHRONIZED = 1 << 13;
        const CONSTANT = 1 << 14;
        const BASED = 1 << 15;

        /// Clauses that give an elementary item its storage description.
        const DESCRIBES_STORAGE = Self::PICTURE.bits()
            | Self::TYPE.bits()
            | Self::USAGE.bits()
            | Self::VALUE.bits();
    }
}

/// A data-division entry.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataEntry {
    /// `None` for `FILLER` and unnamed items.
    pub name: Option<String>,
    /// 1-49, 66, 77, 88; 0 for file and report descriptions.
    pub level: u8,
    pub kind: EntryKind,
    pub section: SectionKind,
    pub unit: UnitId,
    pub parent: Option<DataEntryId>,
    /// Structural children in declaration order.
    pub children: Vec<DataEntryId>,
    /// Level 88 condition-names attached to this item.
    pub conditions: Vec<DataEntryId>,
    /// Level 66 items renaming parts of this record.
    pub overlays: Vec<DataEntryId>,
    /// Byte length; for groups, the sum of the direct children.
    pub length: u32,
    pub clauses: ClauseFlags,
    pub usage: UsageCategory,
    pub picture: Option<Picture>,
    pub occurs: Option<Occurs>,
    pub value: Option<String>,
    /// Storage bytes of the VALUE or CONSTANT literal.
    pub value_length: u32,
    pub condition_values: Vec<ConditionValue>,
    pub redefines: Option<String>,
    pub renames: Option<RenamesSpec>,
    pub type_name: Option<String>,
    pub is_group: bool,
    pub is_constant: bool,
    pub sign_separate: bool,
    /// Token index of the level number, stable across passes.
    pub position: usize,
    pub loc: SourceLoc,
}

impl DataEntry {
    /// Create an entry with no clauses yet.
    pub fn new(
        name: Option<String>,
        level: u8,
        kind: EntryKind,
        section: SectionKind,
        unit: UnitId,
        position: usize,
        loc: SourceLoc,
    ) -> Self {
        DataEntry {
            name,
            level,
            kind,
            section,
            unit,
            parent: None,
            children: Vec::new(),
            conditions: Vec::new(),
            overlays: Vec::new(),
            length: 0,
            clauses: ClauseFlags::empty(),
            usage: UsageCategory::Display,
            picture: None,
            occurs: None,
            value: None,
            value_length: 0,
            condition_values: Vec::new(),
            redefines: None,
            renames: None,
            type_name: None,
            is_group: false,
            is_constant: false,
            sign_separate: false,
            position,
            loc,
        }
    }

    /// Name for messages; `FILLER` when unnamed.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("FILLER")
    }

    /// Level 01 or 77: starts a new record.
    pub fn is_root(&self) -> bool {
        matches!(self.level, 1 | 77)
    }

    /// Not a group, condition-name or descriptor.
    pub fn is_elementary(&self) -> bool {
        !self.is_group && matches!(self.kind, EntryKind::Data | EntryKind::Screen | EntryKind::ReportGroup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_usage_keywords() {
        assert_eq!(UsageCategory::from_keyword("comp-3"), Some(UsageCategory::Packed));
        assert_eq!(UsageCategory::from_keyword("COMP"), Some(UsageCategory::Binary));
        assert_eq!(UsageCategory::from_keyword("FLOAT-LONG"), Some(UsageCategory::FloatLong));
        assert_eq!(UsageCategory::from_keyword("PIC"), None);
    }

    #[test]
    fn test_usage_picture_and_value_rules() {
        assert!(UsageCategory::Packed.allows_picture());
        assert!(!UsageCategory::Index.allows_picture());
        assert!(!UsageCategory::FloatShort.allows_picture());
        assert!(UsageCategory::FloatShort.allows_value());
        assert!(!UsageCategory::Pointer.allows_value());
        assert!(!UsageCategory::MessageTag.allows_value());
    }

    #[test]
    fn test_fixed_lengths() {
        assert_eq!(UsageCategory::Index.fixed_length(), Some(4));
        assert_eq!(UsageCategory::ObjectReference.fixed_length(), Some(8));
        assert_eq!(UsageCategory::Display.fixed_length(), None);
    }

    #[test]
    fn test_section_keywords() {
        assert_eq!(SectionKind::from_keyword("working-storage"), Some(SectionKind::WorkingStorage));
        assert_eq!(SectionKind::from_keyword("PROCEDURE"), None);
        assert_eq!(SectionKind::Linkage.to_string(), "LINKAGE SECTION");
    }

    #[test]
    fn test_filler_display_name() {
        let e = DataEntry::new(
            None,
            5,
            EntryKind::Data,
            SectionKind::WorkingStorage,
            UnitId(0),
            0,
            SourceLoc::DUMMY,
        );
        assert_eq!(e.display_name(), "FILLER");
        assert!(e.is_elementary());
        assert!(!e.is_root());
    }
}
