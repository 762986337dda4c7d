// SPDX-License-Identifier: MIT
//
// ANSI escape sequences for the terminal backend.
//
// Pure functions writing to any `impl Write`; `CellWriter` decides when to
// call them. Grid colors are always RGB, so color changes use the 24-bit
// SGR forms only.
//
// Coordinates are 0-indexed here and 1-indexed on the wire.

use std::io::{self, Write};

use pyre_term::color::Color;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` (CUP).
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// SGR 0. Any tracked color state is stale afterwards.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

// ─── Color ───────────────────────────────────────────────────────────────────

/// Set the foreground color (`38;2;R;G;B`).
#[inline]
pub fn fg(w: &mut impl Write, c: Color) -> io::Result<()> {
    write!(w, "\x1b[38;2;{};{};{}m", c.r, c.g, c.b)
}

/// Set the background color (`48;2;R;G;B`).
#[inline]
pub fn bg(w: &mut impl Write, c: Color) -> io::Result<()> {
    write!(w, "\x1b[48;2;{};{};{}m", c.r, c.g, c.b)
}

// ─── Synchronized Output ─────────────────────────────────────────────────────

/// Begin synchronized output (DEC mode 2026). The terminal holds the frame
/// until [`end_sync`].
#[inline]
pub fn begin_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026h")
}

#[inline]
pub fn end_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026l")
}

// ─── Alternate Screen ────────────────────────────────────────────────────────

/// Switch to the alternate screen buffer (DEC mode 1049).
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

/// Return to the main screen, restoring what was there.
#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    #[test]
    fn cursor_to_is_one_based() {
        assert_eq!(emit(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
        assert_eq!(emit(|w| cursor_to(w, 10, 20)), "\x1b[21;11H");
    }

    #[test]
    fn cursor_to_max_does_not_overflow() {
        assert_eq!(
            emit(|w| cursor_to(w, u16::MAX, u16::MAX)),
            "\x1b[65536;65536H"
        );
    }

    #[test]
    fn cursor_visibility() {
        assert_eq!(emit(|w| cursor_hide(w)), "\x1b[?25l");
        assert_eq!(emit(|w| cursor_show(w)), "\x1b[?25h");
    }

    // ── Screen ──────────────────────────────────────────────────────────

    #[test]
    fn screen_sequences() {
        assert_eq!(emit(|w| clear_screen(w)), "\x1b[2J");
        assert_eq!(emit(|w| reset(w)), "\x1b[0m");
        assert_eq!(emit(|w| enter_alt_screen(w)), "\x1b[?1049h");
        assert_eq!(emit(|w| exit_alt_screen(w)), "\x1b[?1049l");
    }

    // ── Color ───────────────────────────────────────────────────────────

    #[test]
    fn fg_is_truecolor() {
        assert_eq!(emit(|w| fg(w, Color::new(255, 128, 0))), "\x1b[38;2;255;128;0m");
        assert_eq!(emit(|w| fg(w, Color::BLACK)), "\x1b[38;2;0;0;0m");
    }

    #[test]
    fn bg_is_truecolor() {
        assert_eq!(emit(|w| bg(w, Color::new(0, 100, 200))), "\x1b[48;2;0;100;200m");
    }

    // ── Synchronized Output ─────────────────────────────────────────────

    #[test]
    fn sync_markers() {
        assert_eq!(emit(|w| begin_sync(w)), "\x1b[?2026h");
        assert_eq!(emit(|w| end_sync(w)), "\x1b[?2026l");
    }

    #[test]
    fn sequences_compose() {
        let mut buf = Vec::new();
        cursor_to(&mut buf, 5, 3).unwrap();
        fg(&mut buf, Color::BRIGHT_RED).unwrap();
        bg(&mut buf, Color::BLACK).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "\x1b[4;6H\x1b[38;2;255;0;0m\x1b[48;2;0;0;0m"
        );
    }
}
