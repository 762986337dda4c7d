// SPDX-License-Identifier: MIT
//
// Output buffering and stateful cell writing for the ANSI backend.
//
//   OutputBuffer: collects a whole frame's bytes so it reaches the
//   terminal in one write.
//
//   CellWriter: remembers cursor position and colors last emitted and
//   leaves out escapes that would not change anything. A row-major run of
//   same-colored cells comes out as bare characters after one cursor move.

use std::io::{self, Write};

use pyre_term::color::Color;
use pyre_term::geometry::Point;
use pyre_term::glyph::Glyph;

use crate::ansi;

// ─── OutputBuffer ────────────────────────────────────────────────────────────

const DEFAULT_CAPACITY: usize = 16_384;

/// In-memory frame buffer, flushed with a single `write_all`.
#[derive(Debug)]
pub struct OutputBuffer {
    buf: Vec<u8>,
}

impl OutputBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append `ch` as UTF-8.
    pub fn push_char(&mut self, ch: char) {
        let mut enc = [0u8; 4];
        self.buf.extend_from_slice(ch.encode_utf8(&mut enc).as_bytes());
    }

    /// Empty the buffer, keeping its allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write everything to `w` in one call, flush `w`, then clear.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails; the buffer is kept.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // No-op; see `flush_to`.
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── CellWriter ──────────────────────────────────────────────────────────────

/// Writes glyphs at grid positions, skipping redundant escapes.
///
/// - **Cursor**: skipped when the cell is directly right of the previous
///   one; the terminal advances by itself after each character.
/// - **Colors**: skipped when unchanged since the last emit.
#[allow(clippy::struct_field_names)]
#[derive(Debug)]
pub struct CellWriter {
    /// Where the terminal cursor is, if known.
    cursor: Option<Point>,
    last_fg: Option<Color>,
    last_bg: Option<Color>,
}

impl CellWriter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cursor: None,
            last_fg: None,
            last_bg: None,
        }
    }

    /// Forget all tracked state. Call after an SGR reset or a screen clear.
    #[allow(clippy::missing_const_for_fn)]
    pub fn reset_state(&mut self) {
        *self = Self::new();
    }

    /// Emit `glyph` at `at`.
    pub fn write_glyph(&mut self, out: &mut OutputBuffer, at: Point, glyph: Glyph) {
        let sequential = self
            .cursor
            .is_some_and(|c| c.y == at.y && c.x.checked_add(1) == Some(at.x));
        if !sequential {
            ansi::cursor_to(out, at.x, at.y).ok();
        }

        if self.last_fg != Some(glyph.fg) {
            ansi::fg(out, glyph.fg).ok();
            self.last_fg = Some(glyph.fg);
        }
        if self.last_bg != Some(glyph.bg) {
            ansi::bg(out, glyph.bg).ok();
            self.last_bg = Some(glyph.bg);
        }

        out.push_char(glyph.code.to_char());
        self.cursor = Some(at);
    }
}

impl Default for CellWriter {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pyre_term::glyph::CharCode;

    // ── OutputBuffer ────────────────────────────────────────────────────

    #[test]
    fn buffer_starts_empty() {
        let buf = OutputBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn buffer_implements_write() {
        let mut buf = OutputBuffer::new();
        write!(buf, "hello {}", 42).unwrap();
        assert_eq!(buf.as_bytes(), b"hello 42");
    }

    #[test]
    fn push_char_encodes_utf8() {
        let mut buf = OutputBuffer::new();
        buf.push_char('A');
        buf.push_char('█');
        assert_eq!(buf.as_bytes(), "A█".as_bytes());
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buf = OutputBuffer::new();
        write!(buf, "some data").unwrap();
        let cap = buf.buf.capacity();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.buf.capacity(), cap);
    }

    #[test]
    fn flush_to_drains_buffer() {
        let mut buf = OutputBuffer::new();
        write!(buf, "frame").unwrap();
        let mut dest = Vec::new();
        buf.flush_to(&mut dest).unwrap();
        assert_eq!(dest, b"frame");
        assert!(buf.is_empty());

        buf.flush_to(&mut dest).unwrap();
        assert_eq!(dest, b"frame");
    }

    // ── CellWriter ──────────────────────────────────────────────────────

    fn render(cells: &[(u16, u16, Glyph)]) -> String {
        let mut out = OutputBuffer::new();
        let mut writer = CellWriter::new();
        for &(x, y, glyph) in cells {
            writer.write_glyph(&mut out, Point::new(x, y), glyph);
        }
        String::from_utf8(out.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn first_cell_moves_cursor_and_sets_colors() {
        let out = render(&[(5, 3, Glyph::from_char('A'))]);
        assert_eq!(out, "\x1b[4;6H\x1b[38;2;192;192;192m\x1b[48;2;0;0;0mA");
    }

    #[test]
    fn sequential_cells_share_one_cursor_move() {
        let out = render(&[
            (0, 0, Glyph::from_char('A')),
            (1, 0, Glyph::from_char('B')),
            (2, 0, Glyph::from_char('C')),
        ]);
        assert_eq!(out.matches('H').count(), 1);
        assert!(out.ends_with("ABC"));
    }

    #[test]
    fn gaps_and_new_rows_move_cursor() {
        let out = render(&[
            (0, 0, Glyph::from_char('a')),
            (5, 0, Glyph::from_char('b')),
            (6, 1, Glyph::from_char('c')),
        ]);
        assert_eq!(out.matches('H').count(), 3);
    }

    #[test]
    fn unchanged_colors_are_not_re_emitted() {
        let red = Glyph::from_char('x').with_fg(Color::BRIGHT_RED);
        let out = render(&[(0, 0, red), (1, 0, red)]);
        assert_eq!(out.matches("\x1b[38;2;255;0;0m").count(), 1);
        assert_eq!(out.matches("\x1b[48;2;0;0;0m").count(), 1);
    }

    #[test]
    fn changed_background_is_emitted() {
        let out = render(&[
            (0, 0, Glyph::blank(Color::BLUE)),
            (1, 0, Glyph::blank(Color::RED)),
        ]);
        assert!(out.contains("\x1b[48;2;0;0;128m"));
        assert!(out.contains("\x1b[48;2;128;0;0m"));
    }

    #[test]
    fn cp437_codes_render_as_unicode() {
        let g = Glyph::new(CharCode(0x03), Color::WHITE, Color::BLACK);
        assert!(render(&[(0, 0, g)]).ends_with('♥'));
    }

    #[test]
    fn reset_state_forces_full_emit() {
        let mut out = OutputBuffer::new();
        let mut w = CellWriter::new();
        w.write_glyph(&mut out, Point::new(0, 0), Glyph::CLEAR);
        w.reset_state();
        out.clear();
        w.write_glyph(&mut out, Point::new(1, 0), Glyph::CLEAR);
        let s = String::from_utf8(out.as_bytes().to_vec()).unwrap();
        assert!(s.starts_with("\x1b[1;2H\x1b[38;2;192;192;192m"));
    }
}
