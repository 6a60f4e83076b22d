//! Arena storage for data entries.
//!
//! Entries refer to their parent and children through [`DataEntryId`]
//! handles instead of references, so the hierarchy can be mutated while
//! later siblings are still being parsed.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::DataEntry;

/// Handle to a [`DataEntry`] inside a [`DataArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataEntryId(u32);

impl DataEntryId {
    /// Create a handle from a raw index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        DataEntryId(index)
    }

    /// The raw index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for DataEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataEntryId({})", self.0)
    }
}

/// Identifier of a source unit (program, function, method or class).
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

/// Owning storage for every data entry of a compilation.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataArena {
    entries: Vec<DataEntry>,
}

impl DataArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        DataArena {
            entries: Vec::new(),
        }
    }

    /// Store an entry and return its handle. Handles follow declaration order.
    pub fn alloc(&mut self, entry: DataEntry) -> DataEntryId {
        let index = u32::try_from(self.entries.len()).unwrap_or(u32::MAX);
        self.entries.push(entry);
        DataEntryId(index)
    }

    /// Get an entry, if the handle belongs to this arena.
    #[inline]
    pub fn get(&self, id: DataEntryId) -> Option<&DataEntry> {
        self.entries.get(id.index())
    }

    /// Get a mutable entry, if the handle belongs to this arena.
    #[inline]
    pub fn get_mut(&mut self, id: DataEntryId) -> Option<&mut DataEntry> {
        self.entries.get_mut(id.index())
    }

    /// Number of stored entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the arena is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(handle, entry)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (DataEntryId, &DataEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (DataEntryId(u32::try_from(i).unwrap_or(u32::MAX)), e))
    }

    /// Sum of the lengths of an entry's direct children.
    pub fn children_length(&self, id: DataEntryId) -> u32 {
        self[id]
            .children
            .iter()
            .map(|child| self[*child].length)
            .fold(0u32, u32::saturating_add)
    }

    /// Elementary items below `id` (or `id` itself when elementary), in
    /// declaration order.
    pub fn elementary_items(&self, id: DataEntryId) -> Vec<DataEntryId> {
        let mut out = Vec::new();
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            let entry = &self[next];
            if entry.children.is_empty() {
                out.push(next);
            } else {
                pending.extend(entry.children.iter().rev().copied());
            }
        }
        out
    }

    /// Walk parent links up to the outermost record (the file entry excluded).
    pub fn record_of(&self, id: DataEntryId) -> DataEntryId {
        let mut current = id;
        while let Some(parent) = self[current].parent {
            if self[parent].level == 0 {
                break;
            }
            current = parent;
        }
        current
    }
}

impl Index<DataEntryId> for DataArena {
    type Output = DataEntry;

    #[inline]
    fn index(&self, id: DataEntryId) -> &Self::Output {
        &self.entries[id.index()]
    }
}

impl IndexMut<DataEntryId> for DataArena {
    #[inline]
    fn index_mut(&mut self, id: DataEntryId) -> &mut Self::Output {
        &mut self.entries[id.index()]
    }
}
