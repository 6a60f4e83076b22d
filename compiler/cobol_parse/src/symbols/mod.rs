//! Case-insensitive, multi-valued symbol table.
//!
//! COBOL names are not unique: `TOTAL` may be declared under several
//! records and qualified with `OF`. The table therefore maps each name to
//! the ordered list of everything declared with it. Uniqueness rules (such
//! as one root item per name) are enforced by callers.

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Error returned by symbol lookups.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("`{0}` is not defined")]
    NotFound(String),
}

/// Name registry generic over the entry type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolTable<T> {
    /// Keyed by the upper-cased name.
    entries: FxHashMap<String, Vec<T>>,
}

impl<T> Default for SymbolTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SymbolTable<T> {
    /// Create an empty table.
    pub fn new() -> Self {
        SymbolTable {
            entries: FxHashMap::default(),
        }
    }

    /// Append `value` to the list for `name`, creating the list on first use.
    pub fn add(&mut self, name: &str, value: T) {
        self.entries
            .entry(name.to_ascii_uppercase())
            .or_default()
            .push(value);
    }

    /// Check if anything is registered under `name`.
    pub fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_uppercase())
    }

    /// Returns `(exists, is_singleton)` for `name`.
    pub fn has_unique(&self, name: &str) -> (bool, bool) {
        match self.entries.get(&name.to_ascii_uppercase()) {
            Some(list) => (true, list.len() == 1),
            None => (false, false),
        }
    }

    /// All values registered under `name`, in insertion order.
    pub fn fetch_list(&self, name: &str) -> Result<&[T], SymbolError> {
        self.entries
            .get(&name.to_ascii_uppercase())
            .map(Vec::as_slice)
            .ok_or_else(|| SymbolError::NotFound(name.to_string()))
    }

    /// The first value registered under `name`.
    ///
    /// Does not check that the name is unique; callers that care use
    /// [`has_unique`](Self::has_unique) first.
    pub fn fetch_unique(&self, name: &str) -> Result<&T, SymbolError> {
        self.fetch_list(name)?
            .first()
            .ok_or_else(|| SymbolError::NotFound(name.to_string()))
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no names are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of values across all names.
    pub fn value_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Registered names (upper-cased), in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
