//! Viewport scrolling. Single-line editors scroll horizontally, others
//! vertically.

use crate::editor::{Editor, ScrollOffset};

/// Inclusive range of valid scroll offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ScrollBounds {
    pub(crate) min: ScrollOffset,
    pub(crate) max: ScrollOffset,
}

impl Editor {
    pub(crate) fn scroll_bounds(&mut self) -> ScrollBounds {
        self.make_valid();
        let mut bounds = ScrollBounds::default();
        let view_width = self.config.viewport_width as i32;
        let view_height = self.config.viewport_height as i32;
        if self.config.single_line {
            let origin = self.line_origin_x(0).floor() as i32;
            bounds.min.x = origin.min(0);
            bounds.max.x = self.layout.dims.width + bounds.min.x - view_width;
        } else {
            bounds.max.y = self.layout.dims.height - view_height;
        }
        bounds
    }

    /// Scroll to an absolute offset, clamped to the content.
    ///
    /// When the content fits in the viewport the lower bound wins.
    pub fn scroll_to(&mut self, x: i32, y: i32) {
        let bounds = self.scroll_bounds();
        self.scroll.x = x.min(bounds.max.x).max(bounds.min.x);
        self.scroll.y = y.min(bounds.max.y).max(bounds.min.y);
    }

    /// Scroll relative to the current offset.
    pub fn scroll_by(&mut self, dx: i32, dy: i32) {
        self.scroll_to(self.scroll.x.saturating_add(dx), self.scroll.y.saturating_add(dy));
    }

    /// Scroll along the editor's scrolling axis.
    pub fn scroll_along(&mut self, distance: i32) {
        if self.config.single_line {
            self.scroll_by(distance, 0);
        } else {
            self.scroll_by(0, distance);
        }
    }

    /// Current scroll offset, after following the caret if a command asked
    /// for it.
    pub fn scroll_offset(&mut self) -> ScrollOffset {
        self.follow_caret();
        self.scroll
    }

    pub(crate) fn follow_caret(&mut self) {
        if self.caret.scroll {
            self.caret.scroll = false;
            self.scroll_to_caret();
        }
    }

    /// Scroll the minimum distance that brings the caret into view.
    pub fn scroll_to_caret(&mut self) {
        self.make_valid();
        let caret = self.caret.start;
        if self.config.single_line {
            let view_width = self.config.viewport_width as i32;
            let left = caret.x.floor() as i32 - self.scroll.x;
            let right = caret.x.ceil() as i32 - (self.scroll.x + view_width);
            let dist = if left < 0 {
                left
            } else if right > 0 {
                right
            } else {
                0
            };
            self.scroll_by(dist, 0);
        } else {
            let line = &self.layout.lines[caret.line];
            let view_height = self.config.viewport_height as i32;
            let top = caret.y - line.ascent_px() - self.scroll.y;
            let bottom = caret.y + line.descent_px() - (self.scroll.y + view_height);
            let dist = if top < 0 {
                top
            } else if bottom > 0 {
                bottom
            } else {
                0
            };
            self.scroll_by(0, dist);
        }
    }
}
