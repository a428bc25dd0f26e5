//! Position lookup: binary search over the index, then a linear walk over
//! layout advances and buffer code points.

use crate::constants::RUNES_PER_INDEX_ENTRY;
use crate::editor::Editor;
use crate::position::{Position, Target};
use tracing::trace;

impl Editor {
    /// X origin of a layout line under the current alignment.
    pub(crate) fn line_origin_x(&self, line: usize) -> f32 {
        self.config
            .alignment
            .offset(self.layout.lines[line].width, self.config.viewport_width)
    }

    /// Last reachable column of `line`.
    ///
    /// Only the last line lets the caret sit after its final code point;
    /// other lines end before their newline or wrapped code point.
    pub(crate) fn end_column(&self, line: usize) -> usize {
        let advances = self.layout.lines[line].advances.len();
        if line + 1 == self.layout.lines.len() {
            advances
        } else {
            advances.saturating_sub(1)
        }
    }

    /// Encoded size of the code point at `ofs`.
    pub(crate) fn rune_len_at(&self, ofs: usize) -> usize {
        let size = self.buffer.code_point_at(ofs).map(|(_, size)| size);
        debug_assert!(size.is_some(), "layout walks past the end of the buffer");
        size.unwrap_or(0)
    }

    /// Encoded size of the code point ending at `ofs`.
    pub(crate) fn rune_len_before(&self, ofs: usize) -> usize {
        let size = self.buffer.code_point_before(ofs).map(|(_, size)| size);
        debug_assert!(size.is_some(), "layout walks past the start of the buffer");
        size.unwrap_or(0)
    }

    /// Reports whether `pos` is at or after `target`.
    ///
    /// All fields of `pos` must be consistent with the current layout.
    pub(crate) fn position_reaches(&self, pos: &Position, target: Target) -> bool {
        let lines = &self.layout.lines;
        let line = &lines[pos.line];
        let last_line = pos.line + 1 == lines.len();
        let eol = pos.column == self.end_column(pos.line);
        match target {
            Target::Chars(chars) => pos.char_offset >= chars,
            Target::LineColumn {
                line: target_line,
                column,
            } => {
                if pos.line != target_line {
                    return pos.line > target_line;
                }
                eol || pos.column >= column
            }
            Target::Point { x, y } => {
                let bottom = pos.y + line.descent_px();
                let top = pos.y - line.ascent_px();
                if bottom < y && !last_line {
                    return false;
                }
                if top >= y && pos.line > 0 {
                    return true;
                }
                if eol {
                    return true;
                }
                // Stop here unless the next column would be strictly closer.
                let advance = line.advances[pos.column];
                pos.x + advance - x >= x - pos.x
            }
        }
    }

    fn origin(&self) -> Position {
        Position {
            x: self.line_origin_x(0),
            y: self.layout.lines[0].ascent_px(),
            ..Position::default()
        }
    }

    /// Latest indexed position strictly before `target`.
    fn index_position(&mut self, target: Target) -> Position {
        if self.layout.index.is_empty() {
            let origin = self.origin();
            self.layout.index.seed(origin, self.buffer.revision());
        }
        debug_assert_eq!(
            self.layout.index.revision(),
            self.buffer.revision(),
            "position index is stale"
        );
        self.layout
            .index
            .nearest_before(|pos| self.position_reaches(pos, target))
            .unwrap_or_else(|| self.origin())
    }

    /// First position at or after `target`, or the end of content.
    ///
    /// The layout must be valid.
    pub(crate) fn closest_position(&mut self, target: Target) -> Position {
        debug_assert!(self.layout.valid, "position lookup on a stale layout");
        debug_assert_eq!(
            self.layout.revision,
            self.buffer.revision(),
            "layout was shaped from another buffer revision"
        );
        let mut closest = self.index_position(target);
        let mut count = 0usize;
        loop {
            let columns = self.layout.lines[closest.line].advances.len();
            while closest.column < columns {
                if count == RUNES_PER_INDEX_ENTRY {
                    if self.layout.index.record(closest) {
                        trace!(char_offset = closest.char_offset, "index extended");
                    }
                    count = 0;
                }
                count += 1;
                if self.position_reaches(&closest, target) {
                    return closest;
                }
                closest.x += self.layout.lines[closest.line].advances[closest.column];
                closest.byte_offset += self.rune_len_at(closest.byte_offset);
                closest.char_offset += 1;
                closest.column += 1;
            }
            if closest.line + 1 == self.layout.lines.len() {
                return closest;
            }
            let lines = &self.layout.lines;
            let gap = lines[closest.line].baseline_gap(&lines[closest.line + 1]);
            closest.line += 1;
            closest.column = 0;
            closest.x = self.line_origin_x(closest.line);
            closest.y += gap;
        }
    }
}
