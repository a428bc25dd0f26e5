//! Editor commands, their dispatch, and the text form used by scripts.

use crate::caret::SelectionAction;
use crate::editor::{Editor, EditorEvent};
use crate::error::EditorError;
use serde::Serialize;
use std::str::FromStr;
use tracing::debug;

/// Normalized commands consumed by [`Editor::apply_commands`].
#[derive(Clone, Debug, PartialEq)]
pub enum EditorCommand {
    MoveLeft { select: bool, word: bool },
    MoveRight { select: bool, word: bool },
    MoveUp { select: bool },
    MoveDown { select: bool },
    MoveHome { select: bool },
    MoveEnd { select: bool },
    PageUp { select: bool },
    PageDown { select: bool },
    Backspace { word: bool },
    DeleteForward { word: bool },
    InsertText(String),
    /// Enter. Submits instead when submit mode is on and shift is not held.
    InsertNewline { shift: bool },
    InsertTab,
    SelectAll,
    SetCaret { start: usize, end: usize },
    Copy,
    Cut,
    Paste(String),
    /// Pointer press in viewport coordinates; `clicks` counts rapid presses.
    PointerPress { x: f32, y: i32, extend: bool, clicks: u32 },
    PointerDrag { x: f32, y: i32 },
    PointerRelease { x: f32, y: i32 },
    /// Scroll along the editor's axis by a pixel distance.
    Scroll(i32),
}

/// Summary of one [`Editor::apply_commands`] batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ApplyResult {
    /// The content changed.
    pub changed: bool,
    /// Text placed on the clipboard by the last copy or cut.
    pub copied: Option<String>,
    /// Content submitted by the last Enter in submit mode.
    pub submitted: Option<String>,
}

impl Editor {
    fn selection_key(&self) -> (usize, usize) {
        let (lo, _) = self.caret.ordered();
        (lo.char_offset, self.caret.selection_len())
    }

    /// Apply a batch of commands, queueing change, select and submit events.
    pub fn apply_commands(&mut self, commands: &[EditorCommand]) -> ApplyResult {
        let mut result = ApplyResult::default();
        if commands.is_empty() {
            return result;
        }
        let selection_before = self.selection_key();
        for command in commands {
            let revision = self.buffer.revision();
            if self.apply_command(command, &mut result) {
                self.caret.scroll = true;
            }
            if self.buffer.revision() != revision {
                result.changed = true;
                self.events.push(EditorEvent::Change);
            }
        }
        if self.selection_key() != selection_before {
            self.events.push(EditorEvent::Select);
        }
        self.follow_caret();
        result
    }

    /// Apply one command; returns true when the caret should be scrolled
    /// into view.
    fn apply_command(&mut self, command: &EditorCommand, result: &mut ApplyResult) -> bool {
        use EditorCommand as C;
        match command {
            C::MoveLeft { select, word } => self.step(-1, *select, *word),
            C::MoveRight { select, word } => self.step(1, *select, *word),
            C::MoveUp { select } => self.move_lines(-1, SelectionAction::from_select(*select)),
            C::MoveDown { select } => self.move_lines(1, SelectionAction::from_select(*select)),
            C::MoveHome { select } => self.move_start(SelectionAction::from_select(*select)),
            C::MoveEnd { select } => self.move_end(SelectionAction::from_select(*select)),
            C::PageUp { select } => self.move_pages(-1, SelectionAction::from_select(*select)),
            C::PageDown { select } => self.move_pages(1, SelectionAction::from_select(*select)),
            C::Backspace { word: true } => self.delete_word(-1),
            C::Backspace { word: false } => self.delete(-1),
            C::DeleteForward { word: true } => self.delete_word(1),
            C::DeleteForward { word: false } => self.delete(1),
            C::InsertText(text) | C::Paste(text) => {
                if text.is_empty() {
                    return false;
                }
                self.append(text);
            }
            C::InsertNewline { shift } => {
                if self.config.submit && !*shift {
                    let text = self.text();
                    debug!(len = text.len(), "submit");
                    self.events.push(EditorEvent::Submit { text: text.clone() });
                    result.submitted = Some(text);
                    return false;
                }
                self.append("\n");
            }
            C::InsertTab => self.append("\t"),
            C::SelectAll => self.select_all(),
            C::SetCaret { start, end } => self.set_caret(*start, *end),
            C::Copy => {
                let text = self.selected_text();
                if text.is_empty() {
                    return false;
                }
                result.copied = Some(text);
            }
            C::Cut => {
                let text = self.selected_text();
                if text.is_empty() {
                    return false;
                }
                result.copied = Some(text);
                self.delete(1);
            }
            C::PointerPress {
                x,
                y,
                extend,
                clicks,
            } => self.press(*x, *y, *extend, *clicks),
            C::PointerDrag { x, y } => self.drag(*x, *y, false),
            C::PointerRelease { x, y } => self.drag(*x, *y, true),
            C::Scroll(distance) => {
                self.scroll_along(*distance);
                return false;
            }
        }
        !matches!(
            command,
            C::PointerPress { .. } | C::PointerDrag { .. } | C::PointerRelease { .. }
        )
    }

    fn step(&mut self, direction: isize, select: bool, word: bool) {
        let action = SelectionAction::from_select(select);
        if word {
            self.move_word(direction, action);
        } else if action == SelectionAction::Clear {
            self.clear_selection();
            self.move_caret(direction, direction);
        } else {
            self.move_caret(direction, 0);
        }
    }

    fn press(&mut self, x: f32, y: i32, extend: bool, clicks: u32) {
        self.make_valid();
        let previous = self.caret.start;
        self.move_coord(x, y);
        self.caret.scroll = true;
        if extend {
            // Keep whichever old endpoint is farther from the click as anchor.
            let start = self.caret.start.char_offset;
            if self.caret.end.char_offset.abs_diff(start) < start.abs_diff(previous.char_offset) {
                self.caret.end = previous;
            }
        } else {
            self.clear_selection();
        }
        self.dragging = true;
        if clicks == 2 {
            self.move_word(-1, SelectionAction::Clear);
            self.move_word(1, SelectionAction::Extend);
            self.dragging = false;
        }
    }

    fn drag(&mut self, x: f32, y: i32, release: bool) {
        if !self.dragging {
            return;
        }
        self.move_coord(x, y);
        self.caret.scroll = true;
        if release {
            self.dragging = false;
        }
    }
}

fn invalid(message: impl Into<String>) -> EditorError {
    EditorError::InvalidCommand(message.into())
}

fn parse_arg<T: FromStr>(name: &str, value: Option<&str>) -> Result<T, EditorError> {
    let value = value.ok_or_else(|| invalid(format!("'{}' is missing an argument", name)))?;
    value
        .parse()
        .map_err(|_| invalid(format!("'{}' has a bad argument '{}'", name, value)))
}

/// Expand `\n`, `\t` and `\\` in script text arguments.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

impl FromStr for EditorCommand {
    type Err = EditorError;

    /// Parse one script line such as `shift+ctrl+left`, `type hello` or
    /// `click 10 4`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
        let mut select = false;
        let mut word = false;
        let mut name = head.to_ascii_lowercase();
        while let Some((modifier, tail)) = name.split_once('+') {
            match modifier {
                "shift" => select = true,
                "ctrl" | "alt" => word = true,
                other => return Err(invalid(format!("unknown modifier '{}'", other))),
            }
            name = tail.to_string();
        }
        let mut args = rest.split_whitespace();
        let command = match name.as_str() {
            "left" => Self::MoveLeft { select, word },
            "right" => Self::MoveRight { select, word },
            "up" => Self::MoveUp { select },
            "down" => Self::MoveDown { select },
            "home" => Self::MoveHome { select },
            "end" => Self::MoveEnd { select },
            "pageup" => Self::PageUp { select },
            "pagedown" => Self::PageDown { select },
            "backspace" => Self::Backspace { word },
            "delete" => Self::DeleteForward { word },
            "enter" => Self::InsertNewline { shift: select },
            "tab" => Self::InsertTab,
            "select-all" => Self::SelectAll,
            "copy" => Self::Copy,
            "cut" => Self::Cut,
            "type" => Self::InsertText(unescape(rest)),
            "paste" => Self::Paste(unescape(rest)),
            "caret" => {
                let start = parse_arg(&name, args.next())?;
                let end = match args.next() {
                    Some(end) => parse_arg(&name, Some(end))?,
                    None => start,
                };
                Self::SetCaret { start, end }
            }
            "click" | "dblclick" => Self::PointerPress {
                x: parse_arg(&name, args.next())?,
                y: parse_arg(&name, args.next())?,
                extend: select,
                clicks: if name == "dblclick" { 2 } else { 1 },
            },
            "drag" => Self::PointerDrag {
                x: parse_arg(&name, args.next())?,
                y: parse_arg(&name, args.next())?,
            },
            "release" => Self::PointerRelease {
                x: parse_arg(&name, args.next())?,
                y: parse_arg(&name, args.next())?,
            },
            "scroll" => Self::Scroll(parse_arg(&name, args.next())?),
            "" => return Err(invalid("empty command")),
            other => return Err(invalid(format!("unknown command '{}'", other))),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{editor_with, test_config, test_shaper};
    use crate::EditorConfig;

    fn parse(line: &str) -> EditorCommand {
        line.parse().expect("command")
    }

    #[test]
    fn parses_modifiers_and_arguments() {
        assert_eq!(
            parse("shift+ctrl+right"),
            EditorCommand::MoveRight {
                select: true,
                word: true
            }
        );
        assert_eq!(
            parse("type hello  world"),
            EditorCommand::InsertText("hello  world".to_string())
        );
        assert_eq!(parse("paste a\\nb"), EditorCommand::Paste("a\nb".to_string()));
        assert_eq!(parse("caret 3"), EditorCommand::SetCaret { start: 3, end: 3 });
        assert_eq!(parse("caret 2 8"), EditorCommand::SetCaret { start: 2, end: 8 });
        assert_eq!(
            parse("shift+click 10.5 4"),
            EditorCommand::PointerPress {
                x: 10.5,
                y: 4,
                extend: true,
                clicks: 1
            }
        );
        assert_eq!(parse("ctrl+backspace"), EditorCommand::Backspace { word: true });
    }

    #[test]
    fn rejects_unknown_commands() {
        for line in ["", "jump", "meta+left", "caret x", "click 1"] {
            let err = line.parse::<EditorCommand>().unwrap_err();
            assert!(matches!(err, EditorError::InvalidCommand(_)), "line: {:?}", line);
        }
    }

    #[test]
    fn typing_emits_change_and_select() {
        let mut editor = editor_with("");
        let result = editor.apply_commands(&[
            EditorCommand::InsertText("héllo".to_string()),
            EditorCommand::InsertNewline { shift: false },
            EditorCommand::InsertTab,
        ]);
        assert!(result.changed);
        assert_eq!(editor.text(), "héllo\n\t");
        assert_eq!(editor.selection(), (7, 7));
        let events = editor.events();
        assert_eq!(events.iter().filter(|e| **e == EditorEvent::Change).count(), 3);
        assert_eq!(events.last(), Some(&EditorEvent::Select));
        assert!(editor.events().is_empty());
    }

    #[test]
    fn caret_only_commands_do_not_report_change() {
        let mut editor = editor_with("abc");
        let result = editor.apply_commands(&[EditorCommand::MoveRight {
            select: true,
            word: false,
        }]);
        assert!(!result.changed);
        assert_eq!(editor.selection(), (1, 0));
        assert_eq!(editor.events(), vec![EditorEvent::Select]);
    }

    #[test]
    fn plain_arrows_collapse_selection_and_step() {
        let mut editor = editor_with("abcdef");
        editor.set_caret(4, 1);
        editor.apply_commands(&[EditorCommand::MoveLeft {
            select: false,
            word: false,
        }]);
        assert_eq!(editor.selection(), (3, 3));
    }

    #[test]
    fn submit_mode_turns_enter_into_submit() {
        let config = EditorConfig {
            submit: true,
            ..test_config()
        };
        let mut editor = crate::Editor::with_text(config, test_shaper(), "query");
        let result = editor.apply_commands(&[EditorCommand::InsertNewline { shift: false }]);
        assert_eq!(result.submitted.as_deref(), Some("query"));
        assert!(!result.changed);
        assert_eq!(
            editor.events(),
            vec![EditorEvent::Submit {
                text: "query".to_string()
            }]
        );
        editor.apply_commands(&[EditorCommand::InsertNewline { shift: true }]);
        assert_eq!(editor.text(), "\nquery");
    }

    #[test]
    fn copy_cut_and_paste_use_selection() {
        let mut editor = editor_with("hello world");
        let result = editor.apply_commands(&[
            EditorCommand::SetCaret { start: 0, end: 5 },
            EditorCommand::Copy,
        ]);
        assert_eq!(result.copied.as_deref(), Some("hello"));
        assert!(!result.changed);

        let result = editor.apply_commands(&[EditorCommand::Cut]);
        assert_eq!(result.copied.as_deref(), Some("hello"));
        assert_eq!(editor.text(), " world");

        editor.apply_commands(&[
            EditorCommand::MoveEnd { select: false },
            EditorCommand::Paste("!".to_string()),
        ]);
        assert_eq!(editor.text(), " world!");

        let result = editor.apply_commands(&[EditorCommand::Copy]);
        assert_eq!(result.copied, None);
    }

    #[test]
    fn shift_click_keeps_farther_endpoint() {
        let mut editor = editor_with("abcdefghij");
        editor.set_caret(2, 6);
        // Click at column 8; the old caret at 2 is farther than the end at 6.
        editor.apply_commands(&[EditorCommand::PointerPress {
            x: 64.0,
            y: 12,
            extend: true,
            clicks: 1,
        }]);
        assert_eq!(editor.selection(), (8, 2));
        // Column 4 is nearer the anchor at 2, so the old caret becomes the anchor.
        editor.apply_commands(&[EditorCommand::PointerPress {
            x: 32.0,
            y: 12,
            extend: true,
            clicks: 1,
        }]);
        assert_eq!(editor.selection(), (4, 8));
    }

    #[test]
    fn drag_selects_until_release() {
        let mut editor = editor_with("abcdefghij");
        editor.apply_commands(&[
            EditorCommand::PointerPress {
                x: 8.0,
                y: 12,
                extend: false,
                clicks: 1,
            },
            EditorCommand::PointerDrag { x: 40.0, y: 12 },
            EditorCommand::PointerRelease { x: 48.0, y: 12 },
            EditorCommand::PointerDrag { x: 80.0, y: 12 },
        ]);
        assert_eq!(editor.selection(), (6, 1));
        assert_eq!(editor.selected_text(), "bcdef");
    }

    #[test]
    fn double_click_selects_word() {
        let mut editor = editor_with("hello brave world");
        editor.apply_commands(&[EditorCommand::PointerPress {
            x: 60.0,
            y: 12,
            extend: false,
            clicks: 2,
        }]);
        assert_eq!(editor.selected_text(), "brave ");
        assert!(!editor.dragging);
    }

    #[test]
    fn word_backspace_and_delete() {
        let mut editor = editor_with("one two");
        editor.apply_commands(&[
            EditorCommand::MoveEnd { select: false },
            EditorCommand::Backspace { word: true },
            EditorCommand::MoveHome { select: false },
            EditorCommand::DeleteForward { word: false },
        ]);
        assert_eq!(editor.text(), "ne ");
    }

    #[test]
    fn commands_scroll_caret_into_view() {
        let text: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        let mut editor = editor_with(&text.join("\n"));
        editor.apply_commands(&[EditorCommand::PageDown { select: false }]);
        assert_eq!(editor.caret_pos(), (4, 0));
        assert_eq!(editor.scroll_offset().y, 16);
        editor.apply_commands(&[EditorCommand::Scroll(-100)]);
        assert_eq!(editor.scroll_offset().y, 0);
    }
}
