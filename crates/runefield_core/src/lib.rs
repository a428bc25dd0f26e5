//! Core editing engine for runefield: code-point buffer, position index,
//! caret and selection model, and the replace primitive.

/// Gap buffer holding the editor content.
pub mod buffer;
/// Caret and selection endpoints.
pub mod caret;
/// Editor commands and their dispatch.
pub mod command;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Editor state and queries.
pub mod editor;
/// Error types for config and command parsing.
pub mod error;
/// Line layout records and the shaper capability.
pub mod layout;
/// Positions and lookup targets.
pub mod position;

mod edit;
mod index;
mod motion;
mod resolver;
mod scroll;

#[cfg(test)]
mod env;
#[cfg(test)]
mod test_support;

pub use buffer::EditBuffer;
pub use caret::SelectionAction;
pub use command::{ApplyResult, EditorCommand};
pub use config::EditorConfig;
pub use editor::{Editor, EditorEvent, ScrollOffset};
pub use error::EditorError;
pub use layout::{Alignment, Dimensions, FontSpec, Line, MonospaceShaper, Shaper};
pub use position::{Position, Target};
