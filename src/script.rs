//! Command scripts: one command per line, blank lines and `#` comments
//! ignored.

use runefield_core::{
    Dimensions, Editor, EditorCommand, EditorError, EditorEvent, Position, ScrollOffset,
};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Parse a script, reporting the first bad line by number.
pub fn parse_script(source: &str) -> Result<Vec<EditorCommand>, EditorError> {
    let mut commands = Vec::new();
    for (index, line) in source.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        // Text arguments keep their inner and trailing spaces.
        let command = line.trim_start().parse().map_err(|err| match err {
            EditorError::InvalidCommand(message) => {
                EditorError::InvalidCommand(format!("line {}: {}", index + 1, message))
            }
            other => other,
        })?;
        commands.push(command);
    }
    Ok(commands)
}

/// Read and parse a script file.
pub fn load_script(path: &Path) -> Result<Vec<EditorCommand>, EditorError> {
    let source = fs::read_to_string(path)?;
    let commands = parse_script(&source)?;
    debug!(path = %path.display(), commands = commands.len(), "loaded script");
    Ok(commands)
}

/// Editor state after a script run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub text: String,
    pub caret: Position,
    /// `(caret, selection end)` in code points.
    pub selection: (usize, usize),
    pub selected_text: String,
    pub lines: usize,
    pub dimensions: Dimensions,
    pub scroll: ScrollOffset,
    /// Clipboard contents produced by copy and cut, in order.
    pub copied: Vec<String>,
    pub submitted: Vec<String>,
    pub events: Vec<EditorEvent>,
}

/// Apply `commands` one batch each, as a host would per input frame.
pub fn run_script(editor: &mut Editor, commands: &[EditorCommand]) -> Report {
    let mut copied = Vec::new();
    let mut submitted = Vec::new();
    let mut events = Vec::new();
    for command in commands {
        let result = editor.apply_commands(std::slice::from_ref(command));
        copied.extend(result.copied);
        submitted.extend(result.submitted);
        events.extend(editor.events());
    }
    info!(commands = commands.len(), events = events.len(), "script replayed");
    Report {
        text: editor.text(),
        caret: editor.caret(),
        selection: editor.selection(),
        selected_text: editor.selected_text(),
        lines: editor.num_lines(),
        dimensions: editor.dimensions(),
        scroll: editor.scroll_offset(),
        copied,
        submitted,
        events,
    }
}

impl Report {
    /// Human-readable summary.
    pub fn render_plain(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("text: {:?}\n", self.text));
        out.push_str(&format!(
            "caret: line {} column {} (offset {})\n",
            self.caret.line, self.caret.column, self.caret.char_offset
        ));
        out.push_str(&format!(
            "selection: {}..{} {:?}\n",
            self.selection.0, self.selection.1, self.selected_text
        ));
        out.push_str(&format!(
            "layout: {} lines, {}x{}, scroll {},{}\n",
            self.lines, self.dimensions.width, self.dimensions.height, self.scroll.x, self.scroll.y
        ));
        for text in &self.copied {
            out.push_str(&format!("copied: {:?}\n", text));
        }
        for text in &self.submitted {
            out.push_str(&format!("submitted: {:?}\n", text));
        }
        out
    }
}
