//! Categorical color palettes
//!
//! Palettes are finite color lists consumed positionally by
//! [`OrdinalScale`](crate::scale::OrdinalScale). Built-in palettes:
//! - `category10`: ten-hue general purpose palette
//! - `set2`: eight soft pastel hues
//! - `gender`: pink/blue pair
//! - `monitoring`: teal/indigo/red triple
//!
//! Colors serialize as `#RRGGBB` strings so configuration files can list
//! custom palettes directly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A color in RGBA format (0.0 to 1.0)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a new color
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from RGB (alpha = 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create an opaque color from 8-bit channels
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Create a color from hex string (e.g., "#FF5733" or "FF5733")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Self::rgb8(r, g, b))
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        format!(
            "#{:02X}{:02X}{:02X}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }

    /// Convert to array [r, g, b, a]
    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

fn channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0.5, 0.5, 0.5)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid hex color '{}'", value))
    }
}

/// A named, ordered list of colors
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    pub colors: Vec<Color>,
}

impl Palette {
    /// Create a palette from colors
    pub fn new(name: impl Into<String>, colors: Vec<Color>) -> Self {
        Self {
            name: name.into(),
            colors,
        }
    }

    /// Create a palette from hex strings; `None` if any entry is malformed
    pub fn from_hex(name: impl Into<String>, hex: &[&str]) -> Option<Self> {
        let colors = hex
            .iter()
            .map(|h| Color::from_hex(h))
            .collect::<Option<Vec<_>>>()?;
        Some(Self::new(name, colors))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at a position, wrapping past the end
    pub fn color(&self, index: usize) -> Option<Color> {
        if self.colors.is_empty() {
            return None;
        }
        Some(self.colors[index % self.colors.len()])
    }
}

fn builtin(name: &str, hex: &[&str]) -> Palette {
    let colors = hex.iter().filter_map(|h| Color::from_hex(h)).collect();
    Palette::new(name, colors)
}

// MARK: - Built-in Palettes

/// Ten-hue categorical palette
pub fn category10() -> Palette {
    builtin(
        "category10",
        &[
            "#1F77B4", "#FF7F0E", "#2CA02C", "#D62728", "#9467BD", "#8C564B", "#E377C2",
            "#7F7F7F", "#BCBD22", "#17BECF",
        ],
    )
}

/// Eight-hue pastel palette
pub fn set2() -> Palette {
    builtin(
        "set2",
        &[
            "#66C2A5", "#FC8D62", "#8DA0CB", "#E78AC3", "#A6D854", "#FFD92F", "#E5C494",
            "#B3B3B3",
        ],
    )
}

/// Pink and blue pair for two-category splits
pub fn gender() -> Palette {
    builtin("gender", &["#FF69B4", "#4169E1"])
}

/// Three-hue palette for yes/no/other answers
pub fn monitoring() -> Palette {
    builtin("monitoring", &["#69B3A2", "#404080", "#E60049"])
}

/// Get a list of all built-in palette names
pub fn builtin_palette_names() -> Vec<&'static str> {
    vec!["category10", "set2", "gender", "monitoring"]
}

/// Get a built-in palette by name
pub fn get_palette(name: &str) -> Option<Palette> {
    match name.to_lowercase().as_str() {
        "category10" => Some(category10()),
        "set2" => Some(set2()),
        "gender" => Some(gender()),
        "monitoring" => Some(monitoring()),
        _ => None,
    }
}

/// Palette selection in a chart definition: a built-in name or explicit colors
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaletteSpec {
    Named(String),
    Colors(Vec<Color>),
}

impl PaletteSpec {
    /// Resolve to a palette; `None` for an unknown built-in name
    pub fn resolve(&self) -> Option<Palette> {
        match self {
            PaletteSpec::Named(name) => get_palette(name),
            PaletteSpec::Colors(colors) => Some(Palette::new("custom", colors.clone())),
        }
    }
}

impl Default for PaletteSpec {
    fn default() -> Self {
        PaletteSpec::Named("category10".to_string())
    }
}

impl From<&str> for PaletteSpec {
    fn from(name: &str) -> Self {
        PaletteSpec::Named(name.to_string())
    }
}
