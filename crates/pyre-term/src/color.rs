// SPDX-License-Identifier: MIT
//
// Color: an immutable 8-bit RGB triple.
//
// Cells store colors fully resolved. There is no alpha and no palette
// indirection: what the grid holds is exactly what the renderer paints,
// which keeps glyph equality (and therefore dirty-cell coalescing) a
// plain three-byte comparison.
//
// Two arithmetic operations exist and they disagree about
// clamping:
//
//   add   : saturating. Each channel result is clamped to 0..=255, so any
//            fraction (negative, > 1) is safe.
//   blend : linear interpolation. The fraction is NOT clamped; values
//            outside 0..=1 extrapolate. Only the final u8 conversion
//            saturates.
//
// Both truncate toward zero (19.9 → 19), never round.

use std::fmt;

// ─── Color ───────────────────────────────────────────────────────────────────

/// An RGB color with one byte per channel.
///
/// # Examples
///
/// ```
/// use pyre_term::color::Color;
///
/// let a = Color::new(10, 10, 10);
/// let b = Color::new(100, 100, 100);
/// assert_eq!(a.blend(b, 0.1), Color::new(19, 19, 19));
///
/// let c = Color::new(245, 245, 15).add(Color::new(15, 15, 15), 1.0);
/// assert_eq!(c, Color::new(255, 255, 30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a color from its channels.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Add `other` scaled by `fraction`, saturating each channel.
    ///
    /// `self.c + other.c * fraction`, clamped to 0..=255 and truncated.
    #[must_use]
    pub fn add(self, other: Self, fraction: f64) -> Self {
        let add = |a: u8, b: u8| saturate(f64::from(b).mul_add(fraction, f64::from(a)));
        Self {
            r: add(self.r, other.r),
            g: add(self.g, other.g),
            b: add(self.b, other.b),
        }
    }

    /// Linearly interpolate toward `other`.
    ///
    /// `self.c * (1 - fraction) + other.c * fraction`, truncated.
    /// `fraction` is not clamped: values outside 0..=1 extrapolate and the
    /// result saturates at the channel limits.
    #[must_use]
    pub fn blend(self, other: Self, fraction: f64) -> Self {
        let keep = 1.0 - fraction;
        let mix = |a: u8, b: u8| saturate(f64::from(a).mul_add(keep, f64::from(b) * fraction));
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }

    /// [`blend`](Self::blend) with the fraction given in percent.
    #[inline]
    #[must_use]
    pub fn blend_percent(self, other: Self, percent: i32) -> Self {
        self.blend(other, f64::from(percent) / 100.0)
    }

    /// The legacy lookup hash: XOR of the three channels.
    ///
    /// Collides for any permutation of channels (and many more), so the
    /// [`Hash`] impl does not use it. Kept for callers that key caches
    /// by this value.
    #[inline]
    #[must_use]
    pub const fn xor_hash(self) -> u8 {
        self.r ^ self.g ^ self.b
    }

    /// Parse a hex color: `#RRGGBB` or `#RGB`, `#` optional.
    ///
    /// Returns `None` for anything else.
    #[must_use]
    pub fn hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        match digits.len() {
            6 => Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            3 => {
                let short = |i: usize| channel(i..i + 1).map(|v| v * 17);
                Some(Self::new(short(0)?, short(1)?, short(2)?))
            }
            _ => None,
        }
    }

    // ─── Named colors ────────────────────────────────────────────────────

    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const RED: Self = Self::new(128, 0, 0);
    pub const GREEN: Self = Self::new(0, 128, 0);
    pub const YELLOW: Self = Self::new(128, 128, 0);
    pub const BLUE: Self = Self::new(0, 0, 128);
    pub const MAGENTA: Self = Self::new(128, 0, 128);
    pub const CYAN: Self = Self::new(0, 128, 128);
    /// The default foreground. Light gray, not pure white.
    pub const WHITE: Self = Self::new(192, 192, 192);
    pub const BRIGHT_BLACK: Self = Self::new(128, 128, 128);
    pub const BRIGHT_RED: Self = Self::new(255, 0, 0);
    pub const BRIGHT_GREEN: Self = Self::new(0, 255, 0);
    pub const BRIGHT_YELLOW: Self = Self::new(255, 255, 0);
    pub const BRIGHT_BLUE: Self = Self::new(0, 0, 255);
    pub const BRIGHT_MAGENTA: Self = Self::new(255, 0, 255);
    pub const BRIGHT_CYAN: Self = Self::new(0, 255, 255);
    pub const BRIGHT_WHITE: Self = Self::new(255, 255, 255);
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Clamp to the channel range and truncate toward zero.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped to 0..=255 first.
fn saturate(v: f64) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

// ─── Tests ───────────────────────────────────────────────────────────────────
