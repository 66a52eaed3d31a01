//! HSL color math and tinting
//!
//! Conversions work on 8-bit channels: RGB -> HSL reads the rounded channel
//! values of a [`Color`], HSL -> RGB rounds back to 8-bit. A round trip
//! reproduces every channel within one step.

use std::hash::{Hash, Hasher};

use crate::Color;

/// Components closer than this are considered equal.
pub const HSL_TOLERANCE: f64 = 1e-6;

/// Multiplier used to combine component hashes.
const HASH_MULTIPLIER: i64 = 397;

/// Hash buckets per unit of a component; each bucket is wider than
/// [`HSL_TOLERANCE`].
const HASH_QUANTUM: f64 = 1e4;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < HSL_TOLERANCE
}

/// A color in the HSL space
///
/// - `a`: alpha in `0.0..=1.0`
/// - `h`: hue in degrees, `0.0..360.0`
/// - `s`: saturation in `0.0..=1.0`
/// - `l`: lightness in `0.0..=1.0`
#[derive(Clone, Copy, Debug)]
pub struct HslColor {
    pub a: f64,
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl HslColor {
    pub fn new(a: f64, h: f64, s: f64, l: f64) -> Self {
        Self {
            a,
            h: h.rem_euclid(360.0),
            s,
            l,
        }
    }

    /// Convert an RGB color to HSL
    pub fn from_color(color: Color) -> Self {
        let [r8, g8, b8, a8] = color.to_rgba8();
        let (r, g, b) = (r8 as f64, g8 as f64, b8 as f64);

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let hue = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * (((g - b) / delta) % 6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };

        let lightness = (max + min) / (2.0 * 255.0);
        let saturation = if approx_eq(lightness, 0.0) || approx_eq(lightness, 1.0) {
            0.0
        } else {
            delta / (255.0 * (1.0 - (2.0 * lightness - 1.0).abs()))
        };

        Self {
            a: a8 as f64 / 255.0,
            h: hue.rem_euclid(360.0),
            s: saturation,
            l: lightness,
        }
    }

    /// Convert back to an RGB color
    pub fn to_color(&self) -> Color {
        let a = self.s * self.l.min(1.0 - self.l);
        let channel = |offset: f64| -> u8 {
            let k = (offset + self.h / 30.0).rem_euclid(12.0);
            let value = self.l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
            (255.0 * value).round().clamp(0.0, 255.0) as u8
        };
        let alpha = (self.a * 255.0).round().clamp(0.0, 255.0) as u8;

        Color::from_rgba8(channel(0.0), channel(8.0), channel(4.0), alpha)
    }

    /// Lighten or darken the color in HSL space
    ///
    /// `tint` is clamped to `-1.0..=1.0`. Negative values scale the lightness
    /// toward black, positive values blend it toward white.
    pub fn tinted_hsl(&self, tint: f64) -> HslColor {
        let tint = tint.clamp(-1.0, 1.0);
        let mut lightness = self.l * 255.0;

        if tint < 0.0 {
            lightness *= 1.0 + tint;
        } else {
            lightness = lightness * (1.0 - tint) + (255.0 - 255.0 * (1.0 - tint));
        }

        HslColor {
            l: lightness / 255.0,
            ..*self
        }
    }

    /// [`tinted_hsl`](Self::tinted_hsl), converted back to RGB
    pub fn tinted(&self, tint: f64) -> Color {
        self.tinted_hsl(tint).to_color()
    }
}

impl From<Color> for HslColor {
    fn from(color: Color) -> Self {
        Self::from_color(color)
    }
}

impl From<HslColor> for Color {
    fn from(hsl: HslColor) -> Self {
        hsl.to_color()
    }
}

impl PartialEq for HslColor {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.a, other.a)
            && approx_eq(self.h, other.h)
            && approx_eq(self.s, other.s)
            && approx_eq(self.l, other.l)
    }
}

/// Components are hashed by bucket, not by value.
///
/// Equality is approximate, so no bucketing fully agrees with it: two colors
/// that compare equal but straddle a bucket edge hash differently. Hashed
/// collections keyed on `HslColor` can miss such near-duplicates.
impl Hash for HslColor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let quantize = |v: f64| (v * HASH_QUANTUM).round() as i64;

        let mut combined = quantize(self.a);
        combined = combined.wrapping_mul(HASH_MULTIPLIER) ^ quantize(self.h);
        combined = combined.wrapping_mul(HASH_MULTIPLIER) ^ quantize(self.s);
        combined = combined.wrapping_mul(HASH_MULTIPLIER) ^ quantize(self.l);
        state.write_i64(combined);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(c: &HslColor) -> u64 {
        let mut h = DefaultHasher::new();
        c.hash(&mut h);
        h.finish()
    }

    #[test]
    fn primaries_convert_to_expected_hues() {
        let red = HslColor::from_color(Color::from_hex(0xFF0000));
        assert!(approx_eq(red.h, 0.0));
        assert!(approx_eq(red.s, 1.0));
        assert!(approx_eq(red.l, 0.5));

        let green = HslColor::from_color(Color::from_hex(0x00FF00));
        assert!(approx_eq(green.h, 120.0));

        let blue = HslColor::from_color(Color::from_hex(0x0000FF));
        assert!(approx_eq(blue.h, 240.0));
    }

    #[test]
    fn hue_is_normalized_when_blue_exceeds_green() {
        // max == r and g < b yields a negative raw hue
        let magenta_ish = HslColor::from_color(Color::from_hex(0xFF0080));
        assert!(magenta_ish.h >= 300.0 && magenta_ish.h < 360.0);
    }

    #[test]
    fn black_and_white_have_no_saturation() {
        let black = HslColor::from_color(Color::BLACK);
        let white = HslColor::from_color(Color::WHITE);
        assert_eq!(black.s, 0.0);
        assert_eq!(white.s, 0.0);
        assert!(approx_eq(white.l, 1.0));
    }

    #[test]
    fn converts_back_to_the_same_rgb() {
        let accent = Color::from_hex(0x0078D7);
        let hsl = HslColor::from_color(accent);
        assert_eq!(hsl.to_color().to_rgba8(), accent.to_rgba8());
    }

    #[test]
    fn alpha_survives_the_round_trip() {
        let accent = Color::from_argb(0x800078D7);
        let hsl = HslColor::from_color(accent);
        assert!(approx_eq(hsl.a, 128.0 / 255.0));
        assert_eq!(hsl.to_color().to_rgba8()[3], 128);
    }

    #[test]
    fn full_tints_reach_black_and_white() {
        let hsl = HslColor::from_color(Color::from_hex(0x1E66F5));
        assert_eq!(hsl.tinted(-1.0).to_rgba8(), [0, 0, 0, 255]);
        assert_eq!(hsl.tinted(1.0).to_rgba8(), [255, 255, 255, 255]);
    }

    #[test]
    fn zero_tint_keeps_the_color() {
        let accent = Color::from_hex(0x40A02B);
        let hsl = HslColor::from_color(accent);
        assert_eq!(hsl.tinted(0.0).to_rgba8(), accent.to_rgba8());
    }

    #[test]
    fn equality_uses_tolerance_and_hash_is_stable() {
        let a = HslColor::new(1.0, 210.0, 0.5, 0.4);
        let b = HslColor::new(1.0, 210.0 + 1e-9, 0.5, 0.4);
        let c = HslColor::new(1.0, 211.0, 0.5, 0.4);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn equal_colors_across_a_bucket_edge_hash_apart() {
        let below = HslColor::new(1.0, 0.0, 0.0, 0.000_049_999_95);
        let above = HslColor::new(1.0, 0.0, 0.0, 0.000_050_000_05);
        assert_eq!(below, above);
        assert_ne!(hash_of(&below), hash_of(&above));
    }
}
