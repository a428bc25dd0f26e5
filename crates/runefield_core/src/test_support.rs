//! Shared test-only helpers for runefield_core.

use crate::{Editor, EditorConfig, MonospaceShaper};

/// Shaper with whole-pixel metrics at the fixture text size.
///
/// At 16px every cell is 8px wide, ascent is 12 and descent 4, so baselines
/// sit at 12, 28, 44 and so on.
pub(crate) fn test_shaper() -> MonospaceShaper {
    MonospaceShaper::new(0.5, 0.75, 0.25)
}

/// Configuration with a 200x64 viewport (25 cells by 4 lines).
pub(crate) fn test_config() -> EditorConfig {
    EditorConfig {
        text_size: 16.0,
        viewport_width: 200.0,
        viewport_height: 64.0,
        ..EditorConfig::default()
    }
}

/// Editor holding `text` laid out with the fixture shaper and config.
pub(crate) fn editor_with(text: &str) -> Editor {
    Editor::with_text(test_config(), test_shaper(), text)
}
