//! Caret movement: characters, words, lines, pages, line ends and pointer
//! coordinates.

use crate::caret::SelectionAction;
use crate::editor::Editor;
use crate::position::{Position, Target};

impl Editor {
    /// Code point next to `ofs` in the direction of `direction`'s sign.
    pub(crate) fn rune_toward(&self, ofs: usize, direction: isize) -> Option<(char, usize)> {
        if direction < 0 {
            self.buffer.code_point_before(ofs)
        } else {
            self.buffer.code_point_at(ofs)
        }
    }

    /// Move the caret and the selection end by code-point deltas.
    ///
    /// Both endpoints are clamped to the content.
    pub fn move_caret(&mut self, start_delta: isize, end_delta: isize) {
        self.make_valid();
        self.caret.xoff = 0.0;
        let start = self.caret.start.char_offset.saturating_add_signed(start_delta);
        let end = self.caret.end.char_offset.saturating_add_signed(end_delta);
        self.caret.start = self.closest_position(Target::Chars(start));
        self.caret.end = self.closest_position(Target::Chars(end));
    }

    /// Move the caret by `distance` words; negative moves backward.
    ///
    /// Forward skips the rest of the current word and then the whitespace
    /// after it. Backward skips whitespace and then the word before it.
    pub fn move_word(&mut self, distance: isize, action: SelectionAction) {
        self.make_valid();
        let direction = distance.signum();
        // Whitespace-ness of each run, in the order the runs are skipped.
        let runs = if direction > 0 {
            [false, true]
        } else {
            [true, false]
        };
        for _ in 0..distance.unsigned_abs() {
            for whitespace in runs {
                while self
                    .rune_toward(self.caret.start.byte_offset, direction)
                    .is_some_and(|(c, _)| c.is_whitespace() == whitespace)
                {
                    self.move_caret(direction, 0);
                }
            }
        }
        self.caret.update_selection(action);
    }

    /// Move the caret `distance` lines, keeping its horizontal anchor.
    pub fn move_lines(&mut self, distance: isize, action: SelectionAction) {
        self.make_valid();
        let line = (self.caret.start.line as isize).saturating_add(distance);
        self.move_to_line(line, action);
    }

    /// Move the caret by whole viewport heights.
    pub fn move_pages(&mut self, pages: isize, action: SelectionAction) {
        self.make_valid();
        let lines = &self.layout.lines;
        let y = (pages as i64)
            .saturating_mul(self.config.viewport_height as i64)
            .saturating_add(i64::from(self.caret.start.y))
            .clamp(i64::from(i32::MIN), i64::from(i32::MAX));
        let mut y2 = i64::from(lines[0].ascent_px());
        let mut target = 0isize;
        for i in 1..lines.len() {
            if y2 >= y {
                break;
            }
            let h = i64::from(lines[i - 1].baseline_gap(&lines[i]));
            if y2 + h - y >= y - y2 {
                break;
            }
            y2 += h;
            target += 1;
        }
        self.move_to_line(target, action);
    }

    fn move_to_line(&mut self, line: isize, action: SelectionAction) {
        let x = self.caret.start.x + self.caret.xoff;
        self.caret.start = self.move_pos_to_line(self.caret.start, x, line);
        self.caret.xoff = x - self.caret.start.x;
        self.caret.update_selection(action);
    }

    /// Move the caret to the start of its line.
    pub fn move_start(&mut self, action: SelectionAction) {
        self.make_valid();
        self.caret.start = self.pos_to_start(self.caret.start);
        self.caret.xoff = -self.caret.start.x;
        self.caret.update_selection(action);
    }

    /// Move the caret to the end of its line.
    ///
    /// The horizontal anchor is set to the line's right edge, so a following
    /// line move lands past the end of the next line as well.
    pub fn move_end(&mut self, action: SelectionAction) {
        self.make_valid();
        let (pos, xoff) = self.pos_to_end(self.caret.start);
        self.caret.start = pos;
        self.caret.xoff = xoff;
        self.caret.update_selection(action);
    }

    /// Put the selection end at the start of content and the caret at its end.
    pub fn select_all(&mut self) {
        self.make_valid();
        self.caret.end = self.closest_position(Target::Chars(0));
        self.caret.start = self.closest_position(Target::end());
    }

    /// Move the caret to `start` and the selection end to `end`, in code points.
    pub fn set_caret(&mut self, start: usize, end: usize) {
        self.make_valid();
        self.caret.start = self.closest_position(Target::Chars(start));
        self.caret.end = self.closest_position(Target::Chars(end));
        self.caret.scroll = true;
    }

    /// Move the caret to viewport coordinates `(x, y)`.
    pub(crate) fn move_coord(&mut self, x: f32, y: i32) {
        self.make_valid();
        let target = Target::Point {
            x: x + self.scroll.x as f32,
            y: y + self.scroll.y,
        };
        self.caret.start = self.closest_position(target);
        self.caret.xoff = 0.0;
    }

    /// Walk `pos` back to column 0 of its line.
    pub(crate) fn pos_to_start(&self, mut pos: Position) -> Position {
        let advances = &self.layout.lines[pos.line].advances;
        for i in (0..pos.column).rev() {
            pos.byte_offset -= self.rune_len_before(pos.byte_offset);
            pos.char_offset -= 1;
            pos.x -= advances[i];
        }
        pos.column = 0;
        pos
    }

    /// Walk `pos` forward to the last column of its line.
    ///
    /// Also returns the distance from the reached column to the line's right
    /// edge.
    pub(crate) fn pos_to_end(&self, mut pos: Position) -> (Position, f32) {
        let line = &self.layout.lines[pos.line];
        for i in pos.column..self.end_column(pos.line) {
            pos.byte_offset += self.rune_len_at(pos.byte_offset);
            pos.char_offset += 1;
            pos.x += line.advances[i];
            pos.column += 1;
        }
        let xoff = line.width + self.line_origin_x(pos.line) - pos.x;
        (pos, xoff)
    }

    /// Move `pos` to `line` (clamped), on the column closest to `x`.
    pub(crate) fn move_pos_to_line(&self, mut pos: Position, x: f32, line: isize) -> Position {
        let lines = &self.layout.lines;
        let line = line.clamp(0, lines.len() as isize - 1) as usize;
        while pos.line < line {
            pos = self.pos_to_end(pos).0;
            pos.byte_offset += self.rune_len_at(pos.byte_offset);
            pos.char_offset += 1;
            pos.y += lines[pos.line].baseline_gap(&lines[pos.line + 1]);
            pos.column = 0;
            pos.line += 1;
        }
        while pos.line > line {
            pos = self.pos_to_start(pos);
            pos.byte_offset -= self.rune_len_before(pos.byte_offset);
            pos.char_offset -= 1;
            pos.y -= lines[pos.line - 1].baseline_gap(&lines[pos.line]);
            pos.line -= 1;
            pos.column = lines[pos.line].advances.len().saturating_sub(1);
        }
        pos = self.pos_to_start(pos);
        pos.x = self.line_origin_x(line);
        let advances = &lines[line].advances;
        for &advance in &advances[..self.end_column(line)] {
            if pos.x >= x {
                break;
            }
            // Same tie-break as pixel lookups: stay unless the next column is closer.
            if pos.x + advance - x >= x - pos.x {
                break;
            }
            pos.x += advance;
            pos.byte_offset += self.rune_len_at(pos.byte_offset);
            pos.char_offset += 1;
            pos.column += 1;
        }
        pos
    }
}
