//! RGB colors with linear interpolation
//!
//! Colors serialize as `#rrggbb` strings so styles stay hand-editable in
//! configuration files.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a hex color
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid color '{0}': expected #rrggbb")]
pub struct ColorParseError(pub String);

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const LIGHT_GREY: Color = Color::rgb(211, 211, 211);
    pub const CRIMSON: Color = Color::rgb(220, 20, 60);
    pub const GREY: Color = Color::rgb(128, 128, 128);
    pub const ROYAL_BLUE: Color = Color::rgb(65, 105, 225);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation: `self * (1 - t) + other * t` per channel.
    ///
    /// `t` is clamped to `[0, 1]` (NaN counts as 0) and each channel is
    /// rounded to the nearest integer.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: u8, b: u8| -> u8 {
            (f64::from(a) * (1.0 - t) + f64::from(b) * t)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Color::rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS `rgba(r, g, b, a)` with alpha clamped to `[0, 1]`
    pub fn to_rgba(self, alpha: f64) -> String {
        let alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }

    /// Parses `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(text: &str) -> Result<Color, ColorParseError> {
        let digits = text.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorParseError(text.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorParseError(text.to_string()))
        };
        Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        assert_eq!(Color::CRIMSON.lerp(Color::GREY, 0.0), Color::CRIMSON);
        assert_eq!(Color::CRIMSON.lerp(Color::GREY, 1.0), Color::GREY);
        // 220*0.5 + 128*0.5 = 174, 20*0.5 + 128*0.5 = 74, 60*0.5 + 128*0.5 = 94
        assert_eq!(
            Color::CRIMSON.lerp(Color::GREY, 0.5),
            Color::rgb(174, 74, 94)
        );
    }

    #[test]
    fn test_lerp_rounds_and_clamps() {
        // 0.25 * 255 = 63.75
        assert_eq!(
            Color::rgb(0, 0, 0).lerp(Color::rgb(255, 255, 255), 0.25),
            Color::rgb(64, 64, 64)
        );
        assert_eq!(Color::RED.lerp(Color::GREEN, -3.0), Color::RED);
        assert_eq!(Color::RED.lerp(Color::GREEN, 7.0), Color::GREEN);
        assert_eq!(Color::RED.lerp(Color::GREEN, f64::NAN), Color::RED);
    }

    #[test]
    fn test_hex_encoding() {
        assert_eq!(Color::CRIMSON.to_hex(), "#dc143c");
        assert_eq!(Color::from_hex("#dc143c").unwrap(), Color::CRIMSON);
        assert_eq!("d3d3d3".parse::<Color>().unwrap(), Color::LIGHT_GREY);
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
        assert!(Color::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_rgba_encoding() {
        assert_eq!(Color::RED.to_rgba(0.4), "rgba(255, 0, 0, 0.4)");
        assert_eq!(Color::RED.to_rgba(2.0), "rgba(255, 0, 0, 1)");
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Color::GREEN).unwrap();
        assert_eq!(json, "\"#008000\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::GREEN);
        assert!(serde_json::from_str::<Color>("\"green\"").is_err());
    }
}
