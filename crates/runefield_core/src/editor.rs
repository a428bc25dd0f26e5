//! Editor state: content, layout cache, caret, scroll offset and events.

use crate::buffer::EditBuffer;
use crate::caret::Caret;
use crate::config::EditorConfig;
use crate::index::PositionIndex;
use crate::layout::{
    measure_lines, null_layout, Alignment, Dimensions, FontSpec, Line, MaskedRunes,
    MonospaceShaper, Shaper,
};
use crate::position::{Position, Target};
use serde::Serialize;
use tracing::{debug, warn};

/// Notifications queued while applying commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorEvent {
    /// The content changed.
    Change,
    /// Enter was pressed while submit mode is on.
    Submit { text: String },
    /// The selection moved or changed length, including going away.
    Select,
}

/// Scroll position of the viewport over the content, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScrollOffset {
    pub x: i32,
    pub y: i32,
}

/// Layout lines, the position index, and the validity flag covering both.
#[derive(Debug, Default)]
pub(crate) struct LayoutState {
    pub(crate) lines: Vec<Line>,
    pub(crate) dims: Dimensions,
    pub(crate) index: PositionIndex,
    /// Buffer revision the lines were shaped from.
    pub(crate) revision: u64,
    pub(crate) valid: bool,
}

impl LayoutState {
    /// Drop the index and mark the layout stale as a single step.
    pub(crate) fn invalidate(&mut self) {
        self.index.clear();
        self.valid = false;
    }
}

/// Editable, scrollable text field engine.
///
/// Every query and command brings the layout up to date before touching
/// positions, so returned positions are consistent with the current content.
pub struct Editor {
    pub(crate) config: EditorConfig,
    shaper: Box<dyn Shaper>,
    pub(crate) buffer: EditBuffer,
    pub(crate) layout: LayoutState,
    pub(crate) caret: Caret,
    pub(crate) scroll: ScrollOffset,
    pub(crate) dragging: bool,
    pub(crate) events: Vec<EditorEvent>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default(), MonospaceShaper::default())
    }
}

impl Editor {
    /// Create an empty editor laid out by `shaper`.
    pub fn new(config: EditorConfig, shaper: impl Shaper + 'static) -> Self {
        Self {
            config,
            shaper: Box::new(shaper),
            buffer: EditBuffer::new(),
            layout: LayoutState::default(),
            caret: Caret::default(),
            scroll: ScrollOffset::default(),
            dragging: false,
            events: Vec::new(),
        }
    }

    /// Create an editor holding `text`, caret at the start.
    pub fn with_text(config: EditorConfig, shaper: impl Shaper + 'static, text: &str) -> Self {
        let mut editor = Self::new(config, shaper);
        editor.set_text(text);
        editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Mark layout, index and caret positions stale.
    pub(crate) fn invalidate(&mut self) {
        self.layout.invalidate();
    }

    pub fn set_shaper(&mut self, shaper: impl Shaper + 'static) {
        self.shaper = Box::new(shaper);
        self.invalidate();
    }

    pub fn set_single_line(&mut self, single_line: bool) {
        if self.config.single_line != single_line {
            self.config.single_line = single_line;
            self.invalidate();
        }
    }

    pub fn set_submit(&mut self, submit: bool) {
        self.config.submit = submit;
    }

    pub fn set_mask(&mut self, mask: Option<char>) {
        if self.config.mask != mask {
            self.config.mask = mask;
            self.invalidate();
        }
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        if self.config.alignment != alignment {
            self.config.alignment = alignment;
            self.invalidate();
        }
    }

    pub fn set_font(&mut self, font: FontSpec) {
        if self.config.font != font {
            self.config.font = font;
            self.invalidate();
        }
    }

    pub fn set_text_size(&mut self, size: f32) {
        if self.config.text_size != size {
            self.config.text_size = size;
            self.invalidate();
        }
    }

    pub fn set_wrap_width(&mut self, width: Option<f32>) {
        if self.config.wrap_width != width {
            self.config.wrap_width = width;
            self.invalidate();
        }
    }

    /// Resize the viewport. Alignment and paging depend on it.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if self.config.viewport_width != width || self.config.viewport_height != height {
            self.config.viewport_width = width;
            self.config.viewport_height = height;
            self.invalidate();
        }
    }

    /// Re-shape the content and re-resolve the caret if anything changed.
    pub(crate) fn make_valid(&mut self) {
        if self.layout.valid {
            return;
        }
        let lines = self.layout_text();
        self.layout.dims = self.measure(&lines);
        self.layout.lines = lines;
        self.layout.revision = self.buffer.revision();
        self.layout.index.clear();
        self.layout.valid = true;
        debug!(
            lines = self.layout.lines.len(),
            revision = self.layout.revision,
            "relayout"
        );
        self.caret.start = self.closest_position(Target::Chars(self.caret.start.char_offset));
        self.caret.end = self.closest_position(Target::Chars(self.caret.end.char_offset));
    }

    fn layout_text(&self) -> Vec<Line> {
        let max_width = if self.config.single_line {
            None
        } else {
            self.config.wrap_width
        };
        let font = &self.config.font;
        let size = self.config.text_size;
        let mut runes = self.buffer.runes();
        let lines = match self.config.mask {
            Some(mask) => {
                self.shaper
                    .layout(font, size, max_width, &mut MaskedRunes::new(runes, mask))
            }
            None => self.shaper.layout(font, size, max_width, &mut runes),
        };
        if lines.is_empty() {
            warn!("shaper returned no lines; using an unshaped single line");
            return null_layout(&mut self.buffer.runes());
        }
        debug_assert_eq!(
            lines.iter().map(|line| line.advances.len()).sum::<usize>(),
            self.buffer.rune_count(),
            "shaper advances must cover every code point exactly once"
        );
        lines
    }

    fn measure(&self, lines: &[Line]) -> Dimensions {
        let mut dims = measure_lines(lines);
        if self.config.single_line {
            return dims;
        }
        // Soft-wrapped content reports the full wrap width.
        if let Some(width) = self.config.wrap_width {
            let wrapped = lines[..lines.len().saturating_sub(1)]
                .iter()
                .any(|line| !line.text.is_empty() && !line.ends_with_newline());
            if wrapped {
                dims.width = width.ceil() as i32;
            }
        }
        dims
    }

    /// Resolve `target` to a consistent position.
    pub fn resolve(&mut self, target: Target) -> Position {
        self.make_valid();
        self.closest_position(target)
    }

    /// Content length in code points.
    pub fn len(&mut self) -> usize {
        self.resolve(Target::end()).char_offset
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Unmasked content.
    pub fn text(&self) -> String {
        self.buffer.contents()
    }

    /// Number of laid-out lines, including soft-wrapped ones.
    pub fn num_lines(&mut self) -> usize {
        self.make_valid();
        self.layout.lines.len()
    }

    /// Current line layout.
    pub fn lines(&mut self) -> &[Line] {
        self.make_valid();
        &self.layout.lines
    }

    pub fn dimensions(&mut self) -> Dimensions {
        self.make_valid();
        self.layout.dims
    }

    /// Line and column of the caret.
    pub fn caret_pos(&mut self) -> (usize, usize) {
        self.make_valid();
        (self.caret.start.line, self.caret.start.column)
    }

    /// Pixel coordinates of the caret baseline.
    pub fn caret_coords(&mut self) -> (f32, i32) {
        self.make_valid();
        (self.caret.start.x, self.caret.start.y)
    }

    /// Caret position, the moving end of the selection.
    pub fn caret(&mut self) -> Position {
        self.make_valid();
        self.caret.start
    }

    /// Far end of the selection.
    pub fn selection_end(&mut self) -> Position {
        self.make_valid();
        self.caret.end
    }

    /// Selection as `(caret, end)` code-point offsets; `caret` may exceed `end`.
    pub fn selection(&self) -> (usize, usize) {
        (self.caret.start.char_offset, self.caret.end.char_offset)
    }

    /// Selection length in code points.
    pub fn selection_len(&self) -> usize {
        self.caret.selection_len()
    }

    /// Currently selected text; empty without a selection.
    pub fn selected_text(&self) -> String {
        let (lo, hi) = self.caret.ordered();
        self.buffer.slice(lo.byte_offset..hi.byte_offset)
    }

    pub fn clear_selection(&mut self) {
        self.caret.clear_selection();
    }

    /// Drain queued events.
    pub fn events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{editor_with, test_config, test_shaper};
    use crate::EditorCommand;

    #[test]
    fn layout_is_rebuilt_lazily_after_invalidation() {
        let mut editor = editor_with("ab\ncd");
        assert_eq!(editor.num_lines(), 2);
        assert!(editor.layout.valid);
        editor.set_wrap_width(Some(8.0));
        assert!(!editor.layout.valid);
        assert!(editor.layout.index.is_empty());
        assert_eq!(editor.num_lines(), 4);
    }

    #[test]
    fn unchanged_settings_keep_layout_valid() {
        let mut editor = editor_with("abc");
        editor.make_valid();
        editor.set_alignment(Alignment::Start);
        editor.set_text_size(test_config().text_size);
        editor.set_viewport(test_config().viewport_width, test_config().viewport_height);
        assert!(editor.layout.valid);
        editor.set_viewport(100.0, 50.0);
        assert!(!editor.layout.valid);
    }

    #[test]
    fn mask_changes_layout_but_not_text() {
        let mut editor = editor_with("pw\n12");
        editor.set_mask(Some('*'));
        let texts: Vec<String> = editor.lines().iter().map(|l| l.text.clone()).collect();
        assert_eq!(texts, vec!["**\n".to_string(), "**".to_string()]);
        assert_eq!(editor.text(), "pw\n12");
    }

    #[test]
    fn masked_wide_glyphs_move_caret_by_mask_width() {
        let mut editor = editor_with("中文");
        editor.set_mask(Some('*'));
        editor.set_caret(2, 2);
        assert_eq!(editor.caret_coords().0, 16.0);
    }

    #[test]
    fn soft_wrap_reports_wrap_width() {
        let mut editor = editor_with("aaa bbb");
        editor.set_wrap_width(Some(40.0));
        let dims = editor.dimensions();
        assert_eq!(dims.width, 40);
        assert_eq!(dims.height, 32);
    }

    #[test]
    fn submit_toggle_applies_to_next_enter() {
        let mut editor = editor_with("query");
        editor.set_submit(true);
        let result = editor.apply_commands(&[EditorCommand::InsertNewline { shift: false }]);
        assert_eq!(result.submitted.as_deref(), Some("query"));
        assert_eq!(editor.text(), "query");
        editor.set_submit(false);
        let result = editor.apply_commands(&[EditorCommand::InsertNewline { shift: false }]);
        assert!(result.submitted.is_none());
        assert_eq!(editor.text(), "\nquery");
    }

    #[test]
    fn selection_end_stays_at_anchor_while_extending() {
        let mut editor = editor_with("hello");
        editor.set_caret(1, 1);
        let extend = EditorCommand::MoveRight {
            select: true,
            word: false,
        };
        editor.apply_commands(&[extend.clone(), extend]);
        assert_eq!(editor.caret().char_offset, 3);
        let anchor = editor.selection_end();
        assert_eq!(anchor.char_offset, 1);
        assert_eq!(anchor.x, 8.0);
        assert_eq!(editor.selected_text(), "el");
    }

    #[test]
    fn empty_shaper_output_falls_back_to_single_line() {
        struct Silent;
        impl Shaper for Silent {
            fn layout(
                &self,
                _font: &FontSpec,
                _size: f32,
                _max_width: Option<f32>,
                _runes: &mut dyn Iterator<Item = char>,
            ) -> Vec<Line> {
                Vec::new()
            }
        }
        let mut editor = Editor::with_text(test_config(), Silent, "a\nb");
        assert_eq!(editor.num_lines(), 1);
        assert_eq!(editor.len(), 3);
        editor.set_shaper(test_shaper());
        assert_eq!(editor.num_lines(), 2);
    }
}
