// SPDX-License-Identifier: MIT
//
// The demo banner: block letters painted in seeded random colors.
//
// Every cell of the banner is a space. Letter strokes get a random
// background; the gaps between them stay black. A fixed seed always paints
// the same picture.

use pyre_term::Result;
use pyre_term::color::Color;
use pyre_term::geometry::{Point, Size};
use pyre_term::glyph::{CharCode, Glyph};
use pyre_term::terminal::Terminal;

const BANNER: [&str; 5] = [
    "_|_|_|_|  _|      _|  _|_|_|    _|      _|  _|_|_|      _|_|",
    "_|        _|_|  _|_|  _|    _|    _|  _|    _|    _|  _|    _|",
    "_|_|_|    _|  _|  _|  _|_|_|        _|      _|_|_|    _|    _|",
    "_|        _|      _|  _|            _|      _|    _|  _|    _|",
    "_|_|_|_|  _|      _|  _|            _|      _|    _|    _|_|",
];

// ─── Xorshift32 ──────────────────────────────────────────────────────────────

/// Minimal deterministic PRNG.
struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    const fn next(&mut self) -> u32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    fn color(&mut self) -> Color {
        let [r, g, b, _] = self.next().to_le_bytes();
        Color::new(r, g, b)
    }
}

// ─── Drawing ─────────────────────────────────────────────────────────────────

/// Cells needed to show the whole banner.
#[must_use]
pub fn banner_size() -> Size {
    let width = BANNER.iter().map(|line| line.len()).max().unwrap_or(0);
    Size::new(
        u16::try_from(width).unwrap_or(u16::MAX),
        BANNER.len() as u16,
    )
}

/// Paint the banner with its top-left corner at the origin of `term`.
///
/// # Errors
///
/// Out-of-bounds errors if `term` is smaller than [`banner_size`].
pub fn draw_banner<T: Terminal + ?Sized>(term: &mut T, seed: u32) -> Result<()> {
    let mut rng = Xorshift32::new(seed);
    for (y, line) in (0u16..).zip(BANNER) {
        for (x, ch) in (0u16..).zip(line.chars()) {
            let fg = rng.color();
            let bg = if ch == ' ' { Color::BLACK } else { rng.color() };
            term.draw_glyph(Glyph::new(CharCode::SPACE, fg, bg), Point::new(x, y))?;
        }
    }
    tracing::debug!(seed, "banner drawn");
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
