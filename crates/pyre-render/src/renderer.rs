// SPDX-License-Identifier: MIT
//
// Pixel renderer: draws the grid's changed cells onto a surface.
//
// Per frame:
//
//   1. Drain the terminal's changed cells (this commits them).
//   2. For each cell, paint its background into the cell's pixel rect,
//      then composite the glyph's coverage tinted by the foreground.
//   3. Present every touched rect in a single call.
//
// A frame with nothing dirty does no drawing and no present: unchanged
// screens cost nothing.
//
// `repaint` is the full-redraw path for a fresh surface (window created,
// image re-allocated). It paints the committed state of every cell and
// leaves pending changes alone for the next `render`.

use pyre_term::geometry::Point;
use pyre_term::glyph::Glyph;
use pyre_term::terminal::RootTerminal;

use crate::error::Result;
use crate::sheet::GlyphSheet;
use crate::surface::{PixelRect, PixelSurface, Surface};

// ─── RenderStats ─────────────────────────────────────────────────────────────

/// What one render pass did, for profiling and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Cells drawn.
    pub cells_rendered: usize,
    /// Pixels covered by drawn cells.
    pub pixels_touched: u64,
    /// Rectangles handed to the presentation step.
    pub rects_flushed: usize,
    /// Bytes written by text backends.
    pub bytes_written: usize,
}

// ─── Renderer ────────────────────────────────────────────────────────────────

/// A backend that turns pending grid changes into visible output.
pub trait Renderer {
    /// Draw and commit everything that changed since the last render.
    ///
    /// # Errors
    ///
    /// Presentation or I/O failures. Cells drained before the failure
    /// stay committed.
    fn render(&mut self, term: &mut RootTerminal) -> Result<RenderStats>;
}

// ─── PixelRenderer ───────────────────────────────────────────────────────────

/// Renders through a glyph sheet onto a pixel surface.
///
/// # Examples
///
/// ```
/// use pyre_render::renderer::{PixelRenderer, Renderer};
/// use pyre_render::sheet::BitmapSheet;
/// use pyre_term::geometry::{Point, Size};
/// use pyre_term::terminal::{RootTerminal, Terminal};
///
/// let mut term = RootTerminal::new(Size::new(4, 2));
/// let mut renderer = PixelRenderer::for_terminal(BitmapSheet::builtin(), &term);
///
/// term.write("hi", Point::new(0, 0), None, None).unwrap();
/// let stats = renderer.render(&mut term).unwrap();
/// assert_eq!(stats.cells_rendered, 2);
/// assert_eq!(renderer.render(&mut term).unwrap().cells_rendered, 0);
/// ```
#[derive(Debug)]
pub struct PixelRenderer<G, S> {
    sheet: G,
    surface: S,
    /// Reused across frames.
    rects: Vec<PixelRect>,
}

impl<G: GlyphSheet> PixelRenderer<G, PixelSurface> {
    /// A renderer with an in-memory surface sized to fit `term` exactly.
    #[must_use]
    pub fn for_terminal(sheet: G, term: &RootTerminal) -> Self {
        let cell = sheet.cell_size();
        let size = term.size();
        let surface = PixelSurface::new(
            u32::from(size.width) * u32::from(cell.width),
            u32::from(size.height) * u32::from(cell.height),
        );
        Self::new(sheet, surface)
    }
}

impl<G: GlyphSheet, S: Surface> PixelRenderer<G, S> {
    #[must_use]
    pub const fn new(sheet: G, surface: S) -> Self {
        Self {
            sheet,
            surface,
            rects: Vec::new(),
        }
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub const fn sheet(&self) -> &G {
        &self.sheet
    }

    /// Give the surface back, e.g. to save it.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Pixel rectangle of the cell at `at`.
    #[must_use]
    pub fn cell_rect(&self, at: Point) -> PixelRect {
        let cell = self.sheet.cell_size();
        let (cw, ch) = (u32::from(cell.width), u32::from(cell.height));
        PixelRect::new(u32::from(at.x) * cw, u32::from(at.y) * ch, cw, ch)
    }

    /// Redraw every committed cell and present the whole surface.
    ///
    /// Pending changes are not drawn and stay pending.
    ///
    /// # Errors
    ///
    /// Presentation failures.
    pub fn repaint(&mut self, term: &RootTerminal) -> Result<RenderStats> {
        let _span = tracing::debug_span!("repaint").entered();
        self.rects.clear();
        let mut stats = RenderStats::default();
        for (at, glyph) in term.grid().committed_cells() {
            stats.pixels_touched += self.draw_cell(at, glyph).area();
            stats.cells_rendered += 1;
        }
        let size = term.size();
        let cell = self.sheet.cell_size();
        let full = PixelRect::new(
            0,
            0,
            u32::from(size.width) * u32::from(cell.width),
            u32::from(size.height) * u32::from(cell.height),
        );
        self.surface.present(&[full])?;
        stats.rects_flushed = 1;
        Ok(stats)
    }

    fn draw_cell(&mut self, at: Point, glyph: Glyph) -> PixelRect {
        let rect = self.cell_rect(at);
        self.surface.fill_rect(rect, glyph.bg);
        self.surface
            .composite(rect, self.sheet.coverage(glyph.code), glyph.fg);
        rect
    }
}

impl<G: GlyphSheet, S: Surface> Renderer for PixelRenderer<G, S> {
    fn render(&mut self, term: &mut RootTerminal) -> Result<RenderStats> {
        let _span = tracing::debug_span!("render").entered();
        let mut stats = RenderStats::default();
        if !term.grid().is_dirty() {
            return Ok(stats);
        }

        let mut rects = std::mem::take(&mut self.rects);
        rects.clear();
        rects.reserve(term.grid().dirty_count());
        for (at, glyph) in term.consume_changed_cells() {
            let rect = self.draw_cell(at, glyph);
            stats.pixels_touched += rect.area();
            rects.push(rect);
        }
        stats.cells_rendered = rects.len();
        stats.rects_flushed = rects.len();

        let presented = self.surface.present(&rects);
        self.rects = rects;
        presented?;

        tracing::debug!(
            cells = stats.cells_rendered,
            pixels = stats.pixels_touched,
            "frame rendered"
        );
        Ok(stats)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
