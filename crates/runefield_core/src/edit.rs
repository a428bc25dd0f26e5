//! Content mutation. Every edit funnels through [`Editor::replace`].

use crate::caret::Caret;
use crate::editor::Editor;
use crate::position::Position;
use std::borrow::Cow;
use tracing::debug;

impl Editor {
    /// Walk from `hint` to code-point offset `chars`, clamped to the content.
    ///
    /// Only the storage and code-point offsets of the result are meaningful.
    pub(crate) fn seek(&self, hint: Position, chars: usize) -> Position {
        let mut pos = hint;
        while pos.char_offset > chars && pos.byte_offset > 0 {
            pos.byte_offset -= self.rune_len_before(pos.byte_offset);
            pos.char_offset -= 1;
        }
        while pos.char_offset < chars && pos.byte_offset < self.buffer.len() {
            pos.byte_offset += self.rune_len_at(pos.byte_offset);
            pos.char_offset += 1;
        }
        pos
    }

    /// Replace the code points between `start` and `end` with `text`.
    ///
    /// The bounds may come in either order and are clamped to the content.
    /// The caret and selection end are carried across the edit: offsets
    /// inside the replaced range collapse to the end of the new text, offsets
    /// at or after its end shift by the change in length.
    ///
    /// Returns the number of code points inserted.
    pub fn replace(&mut self, start: usize, end: usize, text: &str) -> usize {
        let text = if self.config.single_line && text.contains('\n') {
            Cow::Owned(text.replace('\n', " "))
        } else {
            Cow::Borrowed(text)
        };
        let (start, end) = if start > end { (end, start) } else { (start, end) };
        let start_pos = self.seek(self.caret.start, start);
        let end_pos = self.seek(self.caret.end, end);

        let removed = self
            .buffer
            .delete_range(start_pos.byte_offset, end_pos.byte_offset - start_pos.byte_offset);
        self.buffer.insert(start_pos.byte_offset, &text);
        let inserted = text.chars().count();
        let new_end = start_pos.char_offset + inserted;

        let remap = |chars: usize| {
            if chars >= end_pos.char_offset {
                chars - end_pos.char_offset + new_end
            } else if chars > start_pos.char_offset {
                new_end
            } else {
                chars
            }
        };
        let caret_start = remap(self.caret.start.char_offset);
        let caret_end = remap(self.caret.end.char_offset);
        self.caret.start = self.seek(start_pos, caret_start);
        self.caret.end = self.seek(start_pos, caret_end);
        self.invalidate();
        debug!(
            at = start_pos.char_offset,
            removed_bytes = removed,
            inserted,
            "replace"
        );
        inserted
    }

    /// Insert `text` at the caret, replacing the selection, and leave the
    /// caret after it.
    pub(crate) fn append(&mut self, text: &str) {
        let (lo, hi) = self.caret.ordered();
        let inserted = self.replace(lo.char_offset, hi.char_offset, text);
        self.caret.xoff = 0.0;
        self.caret.start = self.seek(self.caret.start, lo.char_offset + inserted);
        self.caret.clear_selection();
    }

    /// Insert `text` at the caret, overwriting any selection, and scroll the
    /// caret into view.
    pub fn insert(&mut self, text: &str) {
        self.append(text);
        self.caret.scroll = true;
    }

    /// Delete `runes` code points from the caret; negative deletes backward.
    ///
    /// A selection counts as a single code point.
    pub fn delete(&mut self, runes: isize) {
        if runes == 0 {
            return;
        }
        let (lo, hi) = self.caret.ordered();
        let (from, to) = if lo.char_offset != hi.char_offset {
            let extra = runes.unsigned_abs() - 1;
            if runes > 0 {
                (lo.char_offset, hi.char_offset.saturating_add(extra))
            } else {
                (lo.char_offset.saturating_sub(extra), hi.char_offset)
            }
        } else {
            let caret = self.caret.start.char_offset;
            (caret, caret.saturating_add_signed(runes))
        };
        self.replace(from, to, "");
        self.caret.xoff = 0.0;
        self.caret.clear_selection();
    }

    /// Delete `distance` words from the caret; negative deletes backward.
    ///
    /// A run of whitespace counts as a word of its own, and a selection
    /// counts as one word.
    pub fn delete_word(&mut self, distance: isize) {
        if distance == 0 {
            return;
        }
        let mut distance = distance;
        if self.caret.selection_len() > 0 {
            self.delete(1);
            distance -= distance.signum();
            if distance == 0 {
                return;
            }
        }
        let direction = distance.signum();
        let mut ofs = self.caret.start.byte_offset;
        let mut runes = 0isize;
        for _ in 0..distance.unsigned_abs() {
            let Some((first, _)) = self.rune_toward(ofs, direction) else {
                break;
            };
            let whitespace = first.is_whitespace();
            while let Some((c, size)) = self.rune_toward(ofs, direction) {
                if c.is_whitespace() != whitespace {
                    break;
                }
                ofs = if direction < 0 { ofs - size } else { ofs + size };
                runes += 1;
            }
        }
        if runes > 0 {
            self.delete(runes * direction);
        }
    }

    /// Replace the whole content; caret and selection collapse to the start.
    pub fn set_text(&mut self, text: &str) {
        self.buffer.clear();
        self.caret = Caret {
            scroll: self.caret.scroll,
            ..Caret::default()
        };
        self.invalidate();
        self.replace(0, 0, text);
        self.caret.start = Position::default();
        self.caret.end = Position::default();
        self.caret.xoff = 0.0;
    }
}
