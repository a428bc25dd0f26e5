//! Line layout records consumed from the shaper, the mask adapter, and a
//! monospace reference shaper.

use crate::constants::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_WEIGHT, TAB_CELLS};
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

/// Horizontal placement of each line inside the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Start,
    Middle,
    End,
}

impl Alignment {
    /// X origin of a line `width` pixels wide inside a view `view_width` wide.
    pub fn offset(self, width: f32, view_width: f32) -> f32 {
        match self {
            Self::Start => 0.0,
            Self::Middle => ((view_width - width) / 2.0).floor(),
            Self::End => (view_width - width).floor(),
        }
    }
}

impl std::str::FromStr for Alignment {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "start" | "left" => Ok(Self::Start),
            "middle" | "center" => Ok(Self::Middle),
            "end" | "right" => Ok(Self::End),
            other => Err(format!("unknown alignment '{}'", other)),
        }
    }
}

/// Font request forwarded to the shaper.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    pub family: String,
    pub weight: u16,
    pub italic: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            weight: DEFAULT_FONT_WEIGHT,
            italic: false,
        }
    }
}

/// One laid-out line.
///
/// `advances` has one entry per code point of `text`, including a trailing
/// newline when the line ends with a hard break.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Line {
    pub text: String,
    pub advances: Vec<f32>,
    pub ascent: f32,
    pub descent: f32,
    pub width: f32,
}

impl Line {
    /// Ascent rounded up to whole pixels.
    pub fn ascent_px(&self) -> i32 {
        self.ascent.ceil() as i32
    }

    /// Descent rounded up to whole pixels.
    pub fn descent_px(&self) -> i32 {
        self.descent.ceil() as i32
    }

    /// True when the line ends at a hard newline rather than a soft wrap.
    pub fn ends_with_newline(&self) -> bool {
        self.text.ends_with('\n')
    }

    /// Vertical distance between the baselines of `self` and the line below.
    pub(crate) fn baseline_gap(&self, next: &Line) -> i32 {
        (self.descent + next.ascent).ceil() as i32
    }
}

/// Size of the laid-out content in whole pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: i32,
    pub height: i32,
    /// Distance from the bottom edge to the first baseline.
    pub baseline: i32,
}

/// Measure the bounding box of a run of lines.
pub fn measure_lines(lines: &[Line]) -> Dimensions {
    let Some(first) = lines.first() else {
        return Dimensions::default();
    };
    let mut width = 0.0f32;
    let mut height = 0i32;
    let mut prev_descent = 0.0f32;
    for line in lines {
        height += (prev_descent + line.ascent).ceil() as i32;
        prev_descent = line.descent;
        width = width.max(line.width);
    }
    height += prev_descent.ceil() as i32;
    Dimensions {
        width: width.ceil() as i32,
        height,
        baseline: height - first.ascent_px(),
    }
}

/// Line layout capability supplied by the host.
///
/// Implementations must return lines whose advances, taken together, cover
/// every code point yielded by `runes` exactly once, in order.
pub trait Shaper {
    fn layout(
        &self,
        font: &FontSpec,
        size: f32,
        max_width: Option<f32>,
        runes: &mut dyn Iterator<Item = char>,
    ) -> Vec<Line>;
}

/// Single zero-advance line used when a shaper produces nothing.
pub(crate) fn null_layout(runes: &mut dyn Iterator<Item = char>) -> Vec<Line> {
    let text: String = runes.collect();
    let advances = vec![0.0; text.chars().count()];
    vec![Line {
        text,
        advances,
        ..Line::default()
    }]
}

/// Replaces every code point except newline with a mask code point.
pub struct MaskedRunes<I> {
    inner: I,
    mask: char,
}

impl<I> MaskedRunes<I> {
    pub fn new(inner: I, mask: char) -> Self {
        Self { inner, mask }
    }
}

impl<I: Iterator<Item = char>> Iterator for MaskedRunes<I> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let c = self.inner.next()?;
        Some(if c == '\n' { c } else { self.mask })
    }
}

/// Fixed-pitch shaper measuring cells with `unicode-width`.
///
/// Metrics are expressed in ems and scaled by the requested size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceShaper {
    pub cell_width: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl Default for MonospaceShaper {
    fn default() -> Self {
        Self::new(0.6, 0.8, 0.2)
    }
}

impl MonospaceShaper {
    pub fn new(cell_width: f32, ascent: f32, descent: f32) -> Self {
        Self {
            cell_width,
            ascent,
            descent,
        }
    }

    fn cells(c: char) -> usize {
        match c {
            '\n' => 0,
            '\t' => TAB_CELLS,
            _ => c.width().unwrap_or(0),
        }
    }
}

#[derive(Default)]
struct LineBuilder {
    chars: Vec<char>,
    advances: Vec<f32>,
    width: f32,
}

impl LineBuilder {
    fn push(&mut self, c: char, advance: f32) {
        self.chars.push(c);
        self.advances.push(advance);
        self.width += advance;
    }

    /// Split after the last whitespace, returning the carried-over tail.
    fn split_at_break(&mut self) -> LineBuilder {
        let Some(brk) = self.chars.iter().rposition(|c| c.is_whitespace()) else {
            return LineBuilder::default();
        };
        let chars = self.chars.split_off(brk + 1);
        let advances = self.advances.split_off(brk + 1);
        let carried: f32 = advances.iter().sum();
        self.width -= carried;
        LineBuilder {
            chars,
            advances,
            width: carried,
        }
    }

    fn finish(self, ascent: f32, descent: f32) -> Line {
        Line {
            text: self.chars.into_iter().collect(),
            advances: self.advances,
            ascent,
            descent,
            width: self.width,
        }
    }
}

impl Shaper for MonospaceShaper {
    fn layout(
        &self,
        _font: &FontSpec,
        size: f32,
        max_width: Option<f32>,
        runes: &mut dyn Iterator<Item = char>,
    ) -> Vec<Line> {
        let cell = self.cell_width * size;
        let ascent = self.ascent * size;
        let descent = self.descent * size;
        let mut lines = Vec::new();
        let mut current = LineBuilder::default();
        for c in runes {
            if c == '\n' {
                current.push(c, 0.0);
                let done = std::mem::take(&mut current);
                lines.push(done.finish(ascent, descent));
                continue;
            }
            let advance = Self::cells(c) as f32 * cell;
            if let Some(limit) = max_width {
                if !current.chars.is_empty() && current.width + advance > limit {
                    let tail = current.split_at_break();
                    let done = std::mem::replace(&mut current, tail);
                    lines.push(done.finish(ascent, descent));
                }
            }
            current.push(c, advance);
        }
        lines.push(current.finish(ascent, descent));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(text: &str, max_width: Option<f32>) -> Vec<Line> {
        let shaper = MonospaceShaper::new(0.5, 0.75, 0.25);
        shaper.layout(&FontSpec::default(), 16.0, max_width, &mut text.chars())
    }

    #[test]
    fn hard_newlines_keep_trailing_empty_line() {
        let lines = shape("ab\ncd\n", None);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text, "ab\n");
        assert_eq!(lines[0].advances, vec![8.0, 8.0, 0.0]);
        assert_eq!(lines[0].width, 16.0);
        assert_eq!(lines[2].text, "");
        assert!(lines[2].advances.is_empty());
    }

    #[test]
    fn soft_wrap_breaks_after_whitespace() {
        let lines = shape("aaa bbb ccc", Some(40.0));
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["aaa ", "bbb ", "ccc"]);
        assert!(!lines[0].ends_with_newline());
        let total: usize = lines.iter().map(|l| l.advances.len()).sum();
        assert_eq!(total, 11);
    }

    #[test]
    fn soft_wrap_hard_breaks_long_words() {
        let lines = shape("abcdefghij", Some(32.0));
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wide_and_tab_cells_scale_advances() {
        let lines = shape("中\t", None);
        assert_eq!(lines[0].advances, vec![16.0, 32.0]);
    }

    #[test]
    fn mask_keeps_newlines() {
        let masked: String = MaskedRunes::new("ab\nc".chars(), '*').collect();
        assert_eq!(masked, "**\n*");
    }

    #[test]
    fn measure_lines_sums_baseline_gaps() {
        let lines = shape("a\nbcd", None);
        let dims = measure_lines(&lines);
        assert_eq!(dims.width, 24);
        assert_eq!(dims.height, 32);
        assert_eq!(dims.baseline, 20);
    }

    #[test]
    fn alignment_offsets_floor() {
        assert_eq!(Alignment::Start.offset(30.0, 101.0), 0.0);
        assert_eq!(Alignment::Middle.offset(30.0, 101.0), 35.0);
        assert_eq!(Alignment::End.offset(30.0, 101.0), 71.0);
        assert_eq!("center".parse::<Alignment>(), Ok(Alignment::Middle));
    }
}
