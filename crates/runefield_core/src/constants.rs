//! Shared constants used across runefield crates.

/// Number of code points advanced between two samples of the position index.
pub const RUNES_PER_INDEX_ENTRY: usize = 50;

/// Default text size in pixels.
pub const DEFAULT_TEXT_SIZE: f32 = 16.0;

/// Default viewport width in pixels.
pub const DEFAULT_VIEWPORT_WIDTH: f32 = 640.0;
/// Default viewport height in pixels.
pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 480.0;

/// Default font family requested from the shaper.
pub const DEFAULT_FONT_FAMILY: &str = "monospace";
/// Default font weight requested from the shaper.
pub const DEFAULT_FONT_WEIGHT: u16 = 400;

/// Number of monospace cells a tab occupies in the reference shaper.
pub const TAB_CELLS: usize = 4;

/// Prefix shared by every environment variable read by [`crate::EditorConfig`].
pub const ENV_PREFIX: &str = "RUNEFIELD_";
