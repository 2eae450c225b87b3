//! # Theme Module
//!
//! Colors and the six-slot palette the fretboard is painted with.
//! Palettes travel through settings files as `#rrggbb` strings, so `Color`
//! serializes to and from that form.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FretboardError, Result};

/// An RGBA color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::from_rgb8(0, 0, 0);
    pub const WHITE: Color = Color::from_rgb8(0xff, 0xff, 0xff);

    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Parses `#rgb` or `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || FretboardError::InvalidColor(hex.to_string());

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

        match digits.len() {
            3 => {
                // "#abc" expands to "#aabbcc"
                let expand = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                Ok(Self::from_rgb8(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::from_rgb8(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_hex(&self) -> String {
        let to8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", to8(self.r), to8(self.g), to8(self.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = FretboardError;

    fn try_from(value: String) -> Result<Self> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// The colors of every non-note element of the board plus the two
/// highlight colors used for scale notes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub neck: Color,
    pub dot: Color,
    pub fret: Color,
    pub string: Color,
    /// Fill of the tonic's glyphs.
    pub root: Color,
    /// Fill of every other scale member's glyphs.
    pub scale: Color,
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            neck: Color::from_rgb8(0x39, 0x40, 0x49),
            dot: Color::BLACK,
            fret: Color::from_rgb8(0xc5, 0xca, 0xcd),
            string: Color::from_rgb8(0x76, 0xf5, 0x8c),
            root: Color::from_rgb8(0x1e, 0x9e, 0xe0),
            scale: Color::from_rgb8(0x80, 0xe4, 0x88),
        }
    }

    pub fn light() -> Self {
        Self {
            neck: Color::WHITE,
            dot: Color::BLACK,
            fret: Color::BLACK,
            string: Color::BLACK,
            ..Self::dark()
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!(Color::from_hex("#fff").unwrap(), Color::WHITE);
        assert_eq!(Color::from_hex("#000000").unwrap(), Color::BLACK);
        assert_eq!(
            Color::from_hex("8001ce").unwrap(),
            Color::from_rgb8(0x80, 0x01, 0xce)
        );
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(Color::from_hex("#12").is_err());
        assert!(Color::from_hex("#gggggg").is_err());
        assert!(Color::from_hex("").is_err());
    }

    #[test]
    fn hex_survives_formatting() {
        let color = Color::from_rgb8(0x1e, 0x9e, 0xe0);
        assert_eq!(color.to_hex(), "#1e9ee0");
    }

    #[test]
    fn palette_reads_partial_records() {
        let palette: Palette = serde_json::from_str(r##"{"neck": "#fff"}"##).unwrap();
        assert_eq!(palette.neck, Color::WHITE);
        assert_eq!(palette.root, Palette::dark().root);
    }
}
