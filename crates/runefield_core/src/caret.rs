//! Caret and selection endpoints.

use crate::position::Position;

/// What a caret movement does to the selection end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionAction {
    /// Leave the selection end in place, producing or growing a selection.
    Extend,
    /// Collapse the selection end onto the moved caret.
    Clear,
}

impl SelectionAction {
    /// `Extend` while a selection modifier (shift) is held.
    pub fn from_select(select: bool) -> Self {
        if select {
            Self::Extend
        } else {
            Self::Clear
        }
    }
}

/// The caret and the far end of the selection.
///
/// `start` is the caret itself. There is no ordering between `start` and
/// `end`; the selection is empty when their code-point offsets match.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Caret {
    pub(crate) start: Position,
    pub(crate) end: Position,
    /// Horizontal anchor kept across vertical moves.
    pub(crate) xoff: f32,
    /// The view should follow the caret on the next scroll update.
    pub(crate) scroll: bool,
}

impl Caret {
    pub(crate) fn selection_len(&self) -> usize {
        self.start.char_offset.abs_diff(self.end.char_offset)
    }

    /// Selection endpoints ordered by code-point offset.
    pub(crate) fn ordered(&self) -> (Position, Position) {
        if self.end.char_offset < self.start.char_offset {
            (self.end, self.start)
        } else {
            (self.start, self.end)
        }
    }

    pub(crate) fn clear_selection(&mut self) {
        self.end = self.start;
    }

    pub(crate) fn update_selection(&mut self, action: SelectionAction) {
        if action == SelectionAction::Clear {
            self.clear_selection();
        }
    }
}
