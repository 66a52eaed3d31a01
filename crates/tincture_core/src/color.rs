//! RGBA color type
//!
//! Colors are stored as `f32` components in `0.0..=1.0`. Themes identify
//! color-derived schemes by the canonical `#AARRGGBB` string produced by the
//! [`Display`](std::fmt::Display) impl, so parsing and formatting round-trip
//! through 8-bit channels.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors produced when parsing a color string
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color string is empty")]
    Empty,

    #[error("color `{0}` must start with `#`")]
    MissingHash(String),

    #[error("color `{0}` must have 3, 6 or 8 hex digits")]
    InvalidLength(String),

    #[error("color `{0}` contains a non-hex digit")]
    InvalidDigit(String),
}

/// RGBA color
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create from u8 components (0-255)
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Create from hex value (0xRRGGBB)
    pub fn from_hex(hex: u32) -> Self {
        Self::from_rgba8(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
            255,
        )
    }

    /// Create from a packed ARGB value (0xAARRGGBB)
    pub fn from_argb(argb: u32) -> Self {
        Self::from_rgba8(
            ((argb >> 16) & 0xFF) as u8,
            ((argb >> 8) & 0xFF) as u8,
            (argb & 0xFF) as u8,
            ((argb >> 24) & 0xFF) as u8,
        )
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    /// Convert to u8 array [r, g, b, a], rounding to the nearest channel value
    pub fn to_rgba8(&self) -> [u8; 4] {
        fn channel(v: f32) -> u8 {
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [channel(self.r), channel(self.g), channel(self.b), channel(self.a)]
    }

    /// Packed ARGB value (0xAARRGGBB)
    pub fn to_argb(&self) -> u32 {
        let [r, g, b, a] = self.to_rgba8();
        u32::from_be_bytes([a, r, g, b])
    }

    /// Compare two colors at 8-bit channel precision
    pub fn same_rgba8(&self, other: &Color) -> bool {
        self.to_rgba8() == other.to_rgba8()
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.to_argb())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(s.to_string()));
        }
        if !matches!(digits.len(), 3 | 6 | 8) {
            return Err(ColorParseError::InvalidLength(s.to_string()));
        }
        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| ColorParseError::InvalidDigit(s.to_string()))?;

        match digits.len() {
            3 => {
                let expand = |nibble: u32| ((nibble & 0xF) * 0x11) as u8;
                Ok(Self::from_rgba8(
                    expand(value >> 8),
                    expand(value >> 4),
                    expand(value),
                    255,
                ))
            }
            6 => Ok(Self::from_hex(value)),
            8 => Ok(Self::from_argb(value)),
            _ => Err(ColorParseError::InvalidLength(s.to_string())),
        }
    }
}
