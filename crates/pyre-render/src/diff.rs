// SPDX-License-Identifier: MIT
//
// ANSI renderer: the grid drawn by a real terminal emulator.
//
// The grid already knows what changed, so there is no previous frame to
// diff against. Per frame:
//
//   1. Drain the changed cells (row-major, so runs stay sequential).
//   2. Hand each to the CellWriter, which emits the minimal escapes.
//   3. Wrap the frame in synchronized-output markers and end with SGR 0
//      so colors never leak into the shell afterwards.
//   4. Write the whole frame with one `write_all`.
//
// A clean grid writes nothing at all, not even the sync markers.

use std::io::Write;

use pyre_term::terminal::RootTerminal;

use crate::ansi;
use crate::error::Result;
use crate::output::{CellWriter, OutputBuffer};
use crate::renderer::{RenderStats, Renderer};

// ─── AnsiRenderer ────────────────────────────────────────────────────────────

/// Renders grid changes as ANSI escape sequences into `W`.
///
/// ```
/// use pyre_render::diff::AnsiRenderer;
/// use pyre_render::renderer::Renderer;
/// use pyre_term::geometry::{Point, Size};
/// use pyre_term::terminal::{RootTerminal, Terminal};
///
/// let mut term = RootTerminal::new(Size::new(8, 2));
/// let mut ansi = AnsiRenderer::new(Vec::new());
///
/// term.write("ok", Point::new(1, 1), None, None).unwrap();
/// let stats = ansi.render(&mut term).unwrap();
/// assert_eq!(stats.cells_rendered, 2);
/// assert!(String::from_utf8_lossy(ansi.get_ref()).contains("ok"));
/// ```
#[derive(Debug)]
pub struct AnsiRenderer<W: Write> {
    out: W,
    buf: OutputBuffer,
    writer: CellWriter,
}

impl<W: Write> AnsiRenderer<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out,
            buf: OutputBuffer::new(),
            writer: CellWriter::new(),
        }
    }

    #[must_use]
    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Switch to the alternate screen, hide the cursor, and clear.
    ///
    /// # Errors
    ///
    /// Write failures on the output.
    pub fn enter(&mut self) -> Result<()> {
        ansi::enter_alt_screen(&mut self.buf)?;
        ansi::cursor_hide(&mut self.buf)?;
        ansi::clear_screen(&mut self.buf)?;
        self.writer.reset_state();
        self.buf.flush_to(&mut self.out)?;
        Ok(())
    }

    /// Undo [`enter`](Self::enter): reset colors, show the cursor, and go
    /// back to the main screen.
    ///
    /// # Errors
    ///
    /// Write failures on the output.
    pub fn leave(&mut self) -> Result<()> {
        ansi::reset(&mut self.buf)?;
        ansi::cursor_show(&mut self.buf)?;
        ansi::exit_alt_screen(&mut self.buf)?;
        self.buf.flush_to(&mut self.out)?;
        Ok(())
    }

    /// Clear the screen and draw every committed cell.
    ///
    /// Pending changes stay pending for the next [`render`](Renderer::render).
    ///
    /// # Errors
    ///
    /// Write failures on the output.
    pub fn repaint(&mut self, term: &RootTerminal) -> Result<RenderStats> {
        self.buf.clear();
        self.writer.reset_state();
        ansi::begin_sync(&mut self.buf)?;
        ansi::clear_screen(&mut self.buf)?;
        let mut stats = RenderStats::default();
        for (at, glyph) in term.grid().committed_cells() {
            self.writer.write_glyph(&mut self.buf, at, glyph);
            stats.cells_rendered += 1;
        }
        self.finish_frame(&mut stats)?;
        Ok(stats)
    }

    fn finish_frame(&mut self, stats: &mut RenderStats) -> Result<()> {
        ansi::reset(&mut self.buf)?;
        ansi::end_sync(&mut self.buf)?;
        // SGR 0 invalidated the tracked colors.
        self.writer.reset_state();
        stats.bytes_written = self.buf.len();
        stats.rects_flushed = 1;
        self.buf.flush_to(&mut self.out)?;
        Ok(())
    }
}

impl<W: Write> Renderer for AnsiRenderer<W> {
    fn render(&mut self, term: &mut RootTerminal) -> Result<RenderStats> {
        let mut stats = RenderStats::default();
        if !term.grid().is_dirty() {
            return Ok(stats);
        }

        self.buf.clear();
        ansi::begin_sync(&mut self.buf)?;
        for (at, glyph) in term.consume_changed_cells() {
            self.writer.write_glyph(&mut self.buf, at, glyph);
            stats.cells_rendered += 1;
        }
        self.finish_frame(&mut stats)?;

        tracing::debug!(
            cells = stats.cells_rendered,
            bytes = stats.bytes_written,
            "ansi frame written"
        );
        Ok(stats)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
