// SPDX-License-Identifier: MIT
//
// Presentation surfaces: where glyph pixels end up.
//
// The renderer speaks three verbs to a surface: paint a rectangle with a
// solid color, composite a tinted coverage mask over a rectangle, and
// present a list of rectangles. A window-backed surface would flush those
// rectangles to the screen; `PixelSurface` keeps an in-memory RGB image
// and records what was presented, which is what tests and the PNG
// backend need.
//
// Compositing: each channel becomes
//
//   out = under + (tint - under) * coverage / 255
//
// so coverage 0 leaves the pixel alone and 255 replaces it with the tint.
// For a sheet drawn white-on-black this is the glyph multiplied by the
// foreground color laid over the background.

use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use pyre_term::color::Color;

use crate::error::Result;

// ─── PixelRect ───────────────────────────────────────────────────────────────

/// A rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    #[inline]
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Total number of pixels.
    #[inline]
    #[must_use]
    pub const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

// ─── Surface ─────────────────────────────────────────────────────────────────

/// A pixel target the renderer draws onto.
pub trait Surface {
    /// Paint `rect` with a solid color.
    fn fill_rect(&mut self, rect: PixelRect, color: Color);

    /// Composite `tint` through a coverage mask (row-major, `rect.width *
    /// rect.height` bytes) onto `rect`.
    fn composite(&mut self, rect: PixelRect, coverage: &[u8], tint: Color);

    /// Make `rects` visible.
    ///
    /// # Errors
    ///
    /// Whatever the underlying display reports.
    fn present(&mut self, rects: &[PixelRect]) -> Result<()>;
}

// ─── PixelSurface ────────────────────────────────────────────────────────────

/// An in-memory RGB framebuffer.
///
/// Drawing outside the image is clipped.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    image: RgbImage,
    presented: Vec<PixelRect>,
    frames: u64,
}

impl PixelSurface {
    /// A black surface of `width × height` pixels.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
            presented: Vec::new(),
            frames: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Color of one pixel, or `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.image
            .get_pixel_checked(x, y)
            .map(|&Rgb([r, g, b])| Color::new(r, g, b))
    }

    /// Rectangles passed to the most recent `present`.
    #[must_use]
    pub fn last_presented(&self) -> &[PixelRect] {
        &self.presented
    }

    /// Number of `present` calls so far.
    #[inline]
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    #[must_use]
    pub const fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Encode the framebuffer as a PNG file.
    ///
    /// # Errors
    ///
    /// I/O or encoding errors from `image`.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.image.save_with_format(path, ImageFormat::Png)?;
        tracing::debug!(path = %path.display(), "surface saved");
        Ok(())
    }

    /// The part of `rect` inside the image, as pixel ranges.
    fn clip(&self, rect: PixelRect) -> (std::ops::Range<u32>, std::ops::Range<u32>) {
        let x_end = rect.x.saturating_add(rect.width).min(self.width());
        let y_end = rect.y.saturating_add(rect.height).min(self.height());
        (rect.x.min(x_end)..x_end, rect.y.min(y_end)..y_end)
    }
}

impl Surface for PixelSurface {
    fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        let (xs, ys) = self.clip(rect);
        let px = Rgb([color.r, color.g, color.b]);
        for y in ys {
            for x in xs.clone() {
                self.image.put_pixel(x, y, px);
            }
        }
    }

    fn composite(&mut self, rect: PixelRect, coverage: &[u8], tint: Color) {
        let stride = rect.width as usize;
        if stride == 0 || coverage.len() < stride * rect.height as usize {
            tracing::warn!(?rect, len = coverage.len(), "coverage mask does not match rect");
            return;
        }
        let (xs, ys) = self.clip(rect);
        for y in ys {
            let row = &coverage[(y - rect.y) as usize * stride..];
            for x in xs.clone() {
                let cov = row[(x - rect.x) as usize];
                if cov == 0 {
                    continue;
                }
                let Rgb([r, g, b]) = *self.image.get_pixel(x, y);
                self.image.put_pixel(
                    x,
                    y,
                    Rgb([mix(r, tint.r, cov), mix(g, tint.g, cov), mix(b, tint.b, cov)]),
                );
            }
        }
    }

    fn present(&mut self, rects: &[PixelRect]) -> Result<()> {
        self.presented.clear();
        self.presented.extend_from_slice(rects);
        self.frames += 1;
        tracing::trace!(rects = rects.len(), frame = self.frames, "present");
        Ok(())
    }
}

/// `under + (over - under) * coverage / 255`, exact at both ends.
#[inline]
fn mix(under: u8, over: u8, coverage: u8) -> u8 {
    let (u, o, c) = (i32::from(under), i32::from(over), i32::from(coverage));
    let v = u + (o - u) * c / 255;
    // v lies between `under` and `over`.
    u8::try_from(v).unwrap_or(over)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── mix ─────────────────────────────────────────────────────────────

    #[test]
    fn mix_endpoints() {
        assert_eq!(mix(10, 200, 0), 10);
        assert_eq!(mix(10, 200, 255), 200);
        assert_eq!(mix(200, 10, 255), 10);
    }

    #[test]
    fn mix_halfway_truncates() {
        // 0 + 255 * 128 / 255 = 128.
        assert_eq!(mix(0, 255, 128), 128);
        // 100 + (0 - 100) * 128 / 255 = 100 - 50 (truncated toward zero).
        assert_eq!(mix(100, 0, 128), 50);
    }

    // ── PixelSurface ────────────────────────────────────────────────────

    #[test]
    fn new_surface_is_black() {
        let s = PixelSurface::new(4, 3);
        assert_eq!((s.width(), s.height()), (4, 3));
        assert_eq!(s.pixel(3, 2), Some(Color::BLACK));
        assert_eq!(s.pixel(4, 0), None);
    }

    #[test]
    fn fill_rect_paints_only_rect() {
        let mut s = PixelSurface::new(4, 4);
        s.fill_rect(PixelRect::new(1, 1, 2, 2), Color::BLUE);
        assert_eq!(s.pixel(1, 1), Some(Color::BLUE));
        assert_eq!(s.pixel(2, 2), Some(Color::BLUE));
        assert_eq!(s.pixel(3, 3), Some(Color::BLACK));
        assert_eq!(s.pixel(0, 1), Some(Color::BLACK));
    }

    #[test]
    fn fill_rect_clips() {
        let mut s = PixelSurface::new(2, 2);
        s.fill_rect(PixelRect::new(1, 1, 10, 10), Color::RED);
        s.fill_rect(PixelRect::new(50, 50, 1, 1), Color::RED);
        assert_eq!(s.pixel(1, 1), Some(Color::RED));
        assert_eq!(s.pixel(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn composite_tints_covered_pixels() {
        let mut s = PixelSurface::new(2, 1);
        s.fill_rect(PixelRect::new(0, 0, 2, 1), Color::BLUE);
        s.composite(PixelRect::new(0, 0, 2, 1), &[0, 255], Color::BRIGHT_YELLOW);
        assert_eq!(s.pixel(0, 0), Some(Color::BLUE));
        assert_eq!(s.pixel(1, 0), Some(Color::BRIGHT_YELLOW));
    }

    #[test]
    fn composite_with_short_mask_is_ignored() {
        let mut s = PixelSurface::new(2, 2);
        s.composite(PixelRect::new(0, 0, 2, 2), &[255], Color::BRIGHT_WHITE);
        assert_eq!(s.pixel(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn present_records_rects_and_counts_frames() {
        let mut s = PixelSurface::new(8, 8);
        let rects = [PixelRect::new(0, 0, 8, 8)];
        s.present(&rects).unwrap();
        s.present(&[]).unwrap();
        assert_eq!(s.frames(), 2);
        assert!(s.last_presented().is_empty());
    }

    #[test]
    fn save_png_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let mut s = PixelSurface::new(3, 2);
        s.fill_rect(PixelRect::new(2, 1, 1, 1), Color::BRIGHT_GREEN);
        s.save_png(&path).unwrap();

        let back = image::open(&path).unwrap().to_rgb8();
        assert_eq!(back.dimensions(), (3, 2));
        assert_eq!(back.get_pixel(2, 1), &Rgb([0, 255, 0]));
    }
}
