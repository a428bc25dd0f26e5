//! Sparse cache of resolved positions used to shorten position lookups.

use crate::position::Position;

/// Positions sampled at a fixed code-point interval, ordered by offset.
///
/// The index is derived state: it is wiped whenever content or layout
/// changes and regrown lazily by lookups.
#[derive(Clone, Debug, Default)]
pub(crate) struct PositionIndex {
    entries: Vec<Position>,
    revision: u64,
}

impl PositionIndex {
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Buffer revision the entries were sampled against.
    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }

    /// Start a fresh index from the content origin.
    pub(crate) fn seed(&mut self, origin: Position, revision: u64) {
        self.entries.clear();
        self.entries.push(origin);
        self.revision = revision;
    }

    /// Append a sample if it extends the index past its last entry.
    pub(crate) fn record(&mut self, pos: Position) -> bool {
        match self.entries.last() {
            Some(last) if last.char_offset >= pos.char_offset => false,
            _ => {
                self.entries.push(pos);
                true
            }
        }
    }

    /// Latest entry for which `reached` is false, or the origin.
    ///
    /// `reached` must be monotone over the entries (false, then true).
    pub(crate) fn nearest_before(&self, reached: impl FnMut(&Position) -> bool) -> Option<Position> {
        let mut reached = reached;
        let idx = self.entries.partition_point(|pos| !reached(pos));
        self.entries.get(idx.saturating_sub(1)).copied()
    }
}
