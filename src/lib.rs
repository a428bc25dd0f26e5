//! runefield: a text-editing engine with a scriptable command-line driver.

/// Script loading, replay and reporting.
pub mod script;

pub use runefield_core::{
    Alignment, ApplyResult, Dimensions, EditBuffer, Editor, EditorCommand, EditorConfig,
    EditorError, EditorEvent, FontSpec, Line, MonospaceShaper, Position, ScrollOffset,
    SelectionAction, Shaper, Target,
};
