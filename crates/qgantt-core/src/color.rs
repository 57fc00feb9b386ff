//! Hex color resolution
//!
//! Every output format resolves colors through [`parse_color`] so that empty
//! or malformed colors fall back to the same default everywhere.

use serde::Serialize;
use std::fmt;

/// An opaque RGB color. Opacity is applied per drawing primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Fallback for empty or malformed colors (cornflower blue)
    pub const DEFAULT: Self = Self::new(100, 149, 237);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Scale every channel by `factor` (0.0 = black, 1.0 = unchanged)
    pub fn darken(self, factor: f32) -> Self {
        let scale = |c: u8| (f32::from(c) * factor.clamp(0.0, 1.0)).round() as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }

    /// Composite this color at `opacity` over an opaque `background`
    pub fn over(self, background: Self, opacity: f32) -> Self {
        let a = opacity.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (f32::from(fg) * a + f32::from(bg) * (1.0 - a)).round() as u8;
        Self::new(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Parse `#RRGGBB` (the `#` is optional).
///
/// Anything that is not exactly six hex digits after the optional `#`
/// resolves to [`Rgb::DEFAULT`]. This never fails.
pub fn parse_color(hex: &str) -> Rgb {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Rgb::DEFAULT;
    }

    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .unwrap_or(0)
    };

    Rgb::new(channel(0..2), channel(2..4), channel(4..6))
}
