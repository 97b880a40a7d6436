use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Text size of a section, rendered as a fixed pixel size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontSize {
    #[serde(rename = "12px")]
    Small,
    #[default]
    #[serde(rename = "16px")]
    Medium,
    #[serde(rename = "20px")]
    Large,
}

impl FontSize {
    /// CSS value used in previews and exported HTML
    pub fn css(self) -> &'static str {
        match self {
            FontSize::Small => "12px",
            FontSize::Medium => "16px",
            FontSize::Large => "20px",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        }
    }

    /// Next size in the Small -> Medium -> Large -> Small cycle
    pub fn next(self) -> Self {
        match self {
            FontSize::Small => FontSize::Medium,
            FontSize::Medium => FontSize::Large,
            FontSize::Large => FontSize::Small,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color {0:?}, expected #rgb or #rrggbb")]
pub struct InvalidColor(pub String);

/// A hex color such as `#000000` or `#f0a`.
///
/// Only validated values can be constructed, so a `Color` is always safe to
/// embed in a CSS declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    pub fn parse(value: &str) -> Result<Self, InvalidColor> {
        static HEX_COLOR: OnceLock<Regex> = OnceLock::new();
        let hex_color = HEX_COLOR.get_or_init(|| {
            Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("Invalid color regex")
        });

        if hex_color.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(InvalidColor(value.to_string()))
        }
    }

    pub fn black() -> Self {
        Self("#000000".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Red, green and blue channels, expanding the short `#rgb` form
    pub fn rgb(&self) -> (u8, u8, u8) {
        let digits = &self.0[1..];
        let channel = |hex: &str| u8::from_str_radix(hex, 16).unwrap_or(0);

        if digits.len() == 3 {
            let expand = |i: usize| channel(&digits[i..=i].repeat(2));
            (expand(0), expand(1), expand(2))
        } else {
            (
                channel(&digits[0..2]),
                channel(&digits[2..4]),
                channel(&digits[4..6]),
            )
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Color {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

/// Visual formatting of a text section.
///
/// Every field is required when deserializing: a stored style is always
/// fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Style {
    pub bold: bool,
    pub italic: bool,
    pub font_size: FontSize,
    pub color: Color,
}

impl Style {
    /// Apply a partial update field by field; fields missing from the delta keep their value
    pub fn merged(&self, delta: &StyleDelta) -> Style {
        Style {
            bold: delta.bold.unwrap_or(self.bold),
            italic: delta.italic.unwrap_or(self.italic),
            font_size: delta.font_size.unwrap_or(self.font_size),
            color: delta.color.clone().unwrap_or_else(|| self.color.clone()),
        }
    }
}

/// Partial style update
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleDelta {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub font_size: Option<FontSize>,
    pub color: Option<Color>,
}

impl StyleDelta {
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    pub fn font_size(mut self, font_size: FontSize) -> Self {
        self.font_size = Some(font_size);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}
