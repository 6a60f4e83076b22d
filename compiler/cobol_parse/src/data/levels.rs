//! The level-number state machine.
//!
//! A [`LevelStack`] holds the open structural levels of the current record,
//! innermost last, each paired with the entry that opened it. Levels are
//! strictly increasing from bottom to top. Placing a new item closes what
//! it ends and says where the item hangs.

use cobol_ir::DataEntryId;
use smallvec::SmallVec;
use tracing::debug;

/// Why an item could not be placed where its level number says.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LevelError {
    /// A subordinate level with no open record.
    Orphan,
    /// A subordinate level directly after a level 77 item.
    UnderIndependent,
    /// A lower level that matches none of the open ones.
    Unmatched { open: Vec<u8> },
}

/// Outcome of placing one item.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Placement {
    /// Entries whose level the item closed, innermost first.
    pub closed: Vec<DataEntryId>,
    /// The structural parent, `None` for a record root.
    pub parent: Option<DataEntryId>,
    /// Set when the item was recovered to a nearby position.
    pub error: Option<LevelError>,
}

/// Open levels of the record being declared.
#[derive(Clone, Debug, Default)]
pub struct LevelStack {
    open: SmallVec<[(u8, DataEntryId); 8]>,
}

impl LevelStack {
    pub fn new() -> Self {
        LevelStack::default()
    }

    /// Place an item with a structural level (1-49 or 77).
    pub fn place(&mut self, level: u8, id: DataEntryId) -> Placement {
        let mut placement = Placement::default();

        match (level, self.open.last().copied()) {
            (1 | 77, _) => {
                placement.closed = self.close_all();
            }
            (_, None) => {
                placement.error = Some(LevelError::Orphan);
            }
            (_, Some((77, _))) => {
                placement.closed = self.close_all();
                placement.error = Some(LevelError::UnderIndependent);
            }
            (_, Some((top, top_id))) if level > top => {
                placement.parent = Some(top_id);
            }
            _ => match self.open.iter().rposition(|(open, _)| *open <= level) {
                Some(at) if self.open[at].0 == level => {
                    placement.closed = self.close_above(at);
                    placement.parent = self.open.last().map(|(_, id)| *id);
                }
                _ => {
                    // Keep the record intact and hang the item next to the
                    // innermost open one, at that one's level.
                    let open = self.open.iter().map(|(l, _)| *l).collect();
                    let innermost = self.open.len() - 1;
                    let kept = self.open[innermost].0;
                    placement.closed = self.close_above(innermost);
                    placement.parent = self.open.last().map(|(_, id)| *id);
                    placement.error = Some(LevelError::Unmatched { open });
                    self.open.push((kept, id));
                    debug!(level, kept, depth = self.open.len(), "level recovered");
                    return placement;
                }
            },
        }

        self.open.push((level, id));
        debug!(level, depth = self.open.len(), closed = placement.closed.len(), "level placed");
        placement
    }

    /// Close every open level, innermost first.
    pub fn close_all(&mut self) -> Vec<DataEntryId> {
        self.close_above(0)
    }

    /// Close levels from the top down to and including index `at`.
    fn close_above(&mut self, at: usize) -> Vec<DataEntryId> {
        let mut closed = Vec::with_capacity(self.open.len().saturating_sub(at));
        while self.open.len() > at {
            if let Some((_, id)) = self.open.pop() {
                closed.push(id);
            }
        }
        closed
    }

    /// Innermost open level and its entry.
    pub fn top(&self) -> Option<(u8, DataEntryId)> {
        self.open.last().copied()
    }

    /// The record root: the outermost open entry.
    pub fn root(&self) -> Option<DataEntryId> {
        self.open.first().map(|(_, id)| *id)
    }

    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Open level numbers, outermost first.
    pub fn levels(&self) -> Vec<u8> {
        self.open.iter().map(|(level, _)| *level).collect()
    }
}
