//! Caret positions expressed in all four coordinate spaces at once.

use serde::Serialize;

/// A point in the editor content.
///
/// Every field describes the same location: the storage offset, the code
/// point offset, the line/column inside the current layout, and the pixel
/// position of the caret baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Position {
    /// Offset into the buffer in bytes.
    pub byte_offset: usize,
    /// Offset in code points.
    pub char_offset: usize,
    /// Index into the layout lines.
    pub line: usize,
    /// Column inside `line`, in code points.
    pub column: usize,
    /// Horizontal pixel position.
    pub x: f32,
    /// Baseline pixel position.
    pub y: i32,
}

/// What a position lookup is searching for.
///
/// Each variant names exactly one coordinate space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Target {
    /// Absolute code-point offset.
    Chars(usize),
    /// Line and column inside the current layout.
    LineColumn { line: usize, column: usize },
    /// Pixel coordinates relative to the content origin.
    Point { x: f32, y: i32 },
}

impl Target {
    /// Target for the end of content.
    pub fn end() -> Self {
        Self::Chars(usize::MAX)
    }
}
