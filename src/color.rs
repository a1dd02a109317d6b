//! RGB colors for cells and pieces, written as `#rrggbb` in config files

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("color must start with '#': {0}")]
    MissingHash(String),
    #[error("color must have 6 hex digits: {0}")]
    BadLength(String),
    #[error("invalid hex digit in color: {0}")]
    InvalidHex(String),
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Sentinel color shared by every empty cell
    pub const EMPTY: Color = Color::rgb(0x45, 0xE3, 0xBC);
    /// Paint applied to rows while they wait to be removed
    pub const HIGHLIGHT: Color = Color::rgb(0xD8, 0x1C, 0x38);
}

/// Default piece palette
pub const DEFAULT_PALETTE: [Color; 17] = [
    Color::rgb(0xFF, 0xD3, 0x00),
    Color::rgb(0xDE, 0x38, 0xC8),
    Color::rgb(0x65, 0x2E, 0xC7),
    Color::rgb(0x33, 0x13, 0x5C),
    Color::rgb(0x13, 0xCA, 0x91),
    Color::rgb(0xFF, 0x94, 0x72),
    Color::rgb(0x35, 0x21, 0x2A),
    Color::rgb(0xFF, 0x8B, 0x8B),
    Color::rgb(0x28, 0xCF, 0x75),
    Color::rgb(0x00, 0xA9, 0xFE),
    Color::rgb(0x04, 0x00, 0x5E),
    Color::rgb(0x12, 0x00, 0x52),
    Color::rgb(0x27, 0x28, 0x22),
    Color::rgb(0xF9, 0x26, 0x72),
    Color::rgb(0x66, 0xD9, 0xEF),
    Color::rgb(0xA6, 0xE2, 0x2E),
    Color::rgb(0xFD, 0x97, 0x1F),
];

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let Some(hex) = trimmed.strip_prefix('#') else {
            return Err(ColorParseError::MissingHash(s.to_string()));
        };
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ColorParseError::BadLength(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| ColorParseError::InvalidHex(s.to_string()))
        };
        Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        let color: Color = "#45E3BC".parse().unwrap();
        assert_eq!(color, Color::EMPTY);
        assert_eq!(color.to_string(), "#45e3bc");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "45e3bc".parse::<Color>(),
            Err(ColorParseError::MissingHash("45e3bc".to_string()))
        );
        assert!(matches!(
            "#45e3b".parse::<Color>(),
            Err(ColorParseError::BadLength(_))
        ));
        assert!(matches!(
            "#45e3zz".parse::<Color>(),
            Err(ColorParseError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_default_palette_excludes_sentinels() {
        assert!(!DEFAULT_PALETTE.contains(&Color::EMPTY));
        assert!(!DEFAULT_PALETTE.contains(&Color::HIGHLIGHT));
    }
}
