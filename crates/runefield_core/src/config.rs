//! Editor configuration from environment variables or JSON.

use crate::constants::{
    DEFAULT_TEXT_SIZE, DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH, ENV_PREFIX,
};
use crate::error::EditorError;
use crate::layout::{Alignment, FontSpec};
use serde::{Deserialize, Serialize};
use std::env;

/// Layout and behavior settings for an [`crate::Editor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Keep the text on one line; newlines are inserted as spaces.
    pub single_line: bool,
    /// Turn Enter into a submit event instead of a newline.
    pub submit: bool,
    /// Display every code point except newline as this one.
    pub mask: Option<char>,
    pub alignment: Alignment,
    pub font: FontSpec,
    pub text_size: f32,
    /// Soft-wrap width; `None` disables wrapping.
    pub wrap_width: Option<f32>,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            single_line: false,
            submit: false,
            mask: None,
            alignment: Alignment::Start,
            font: FontSpec::default(),
            text_size: DEFAULT_TEXT_SIZE,
            wrap_width: None,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(format!("{}{}", ENV_PREFIX, name)).ok()
}

fn env_flag(name: &str) -> bool {
    env_var(name)
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    env_var(name).and_then(|value| value.trim().parse().ok())
}

/// Parse a mask setting: a single code point, or `none`/empty to disable.
fn parse_mask(value: &str) -> Option<char> {
    if value.eq_ignore_ascii_case("none") {
        return None;
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c != '\n' => Some(c),
        _ => None,
    }
}

impl EditorConfig {
    /// Load configuration from `RUNEFIELD_*` environment variables.
    ///
    /// # Returns
    /// A populated [`EditorConfig`] with defaults applied when variables are
    /// missing or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            single_line: env_flag("SINGLE_LINE"),
            submit: env_flag("SUBMIT"),
            mask: env_var("MASK").as_deref().and_then(parse_mask),
            alignment: env_parsed("ALIGNMENT").unwrap_or(defaults.alignment),
            font: FontSpec {
                family: env_var("FONT_FAMILY").unwrap_or(defaults.font.family),
                ..defaults.font
            },
            text_size: env_parsed("TEXT_SIZE")
                .filter(|size: &f32| size.is_finite() && *size > 0.0)
                .unwrap_or(defaults.text_size),
            wrap_width: env_parsed("WRAP_WIDTH").filter(|w: &f32| w.is_finite() && *w > 0.0),
            viewport_width: env_parsed("VIEWPORT_WIDTH")
                .filter(|w: &f32| w.is_finite() && *w >= 0.0)
                .unwrap_or(defaults.viewport_width),
            viewport_height: env_parsed("VIEWPORT_HEIGHT")
                .filter(|h: &f32| h.is_finite() && *h >= 0.0)
                .unwrap_or(defaults.viewport_height),
        }
    }

    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    /// Returns [`EditorError::Json`] for malformed JSON and
    /// [`EditorError::InvalidConfig`] when a value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self, EditorError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// Returns [`EditorError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), EditorError> {
        if !(self.text_size.is_finite() && self.text_size > 0.0) {
            return Err(EditorError::InvalidConfig(format!(
                "text_size must be positive, got {}",
                self.text_size
            )));
        }
        if let Some(width) = self.wrap_width {
            if !(width.is_finite() && width > 0.0) {
                return Err(EditorError::InvalidConfig(format!(
                    "wrap_width must be positive, got {}",
                    width
                )));
            }
        }
        if !(self.viewport_width >= 0.0 && self.viewport_height >= 0.0) {
            return Err(EditorError::InvalidConfig(
                "viewport size must not be negative".to_string(),
            ));
        }
        if self.mask == Some('\n') {
            return Err(EditorError::InvalidConfig(
                "mask must not be a newline".to_string(),
            ));
        }
        Ok(())
    }
}
