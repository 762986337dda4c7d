// SPDX-License-Identifier: MIT
//
// Terminal: text and fill operations over the dirty-cell grid.
//
// `Terminal` has one real primitive, `draw_glyph`; everything else (text
// runs, fills, clears) is provided in terms of it. Two implementors:
//
//   RootTerminal : owns the single `DirtyGrid` and forwards `draw_glyph`
//                   straight to `set_glyph`.
//   View<'a>     : a window onto a root, borrowed mutably. Local (0, 0)
//                   is the window's top-left; `draw_glyph` translates and
//                   forwards to the root.
//
// `view` is part of the trait, so code generic over `Terminal` can carve
// out sub-windows. A view of a view does not chain: the new window is
// validated against the parent view's local rect, then composed into root
// coordinates and the new `View` borrows the root directly.
//
// Every provided operation validates its whole extent before the first
// write. A failed call leaves the grid untouched.

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{Contains, Point, Rect, Size};
use crate::glyph::{CharCode, Glyph};
use crate::grid::{DirtyGrid, Drain};

// ─── Terminal ────────────────────────────────────────────────────────────────

/// A rectangular character surface.
///
/// Coordinates are local: `rect()` always has its origin at `(0, 0)`.
pub trait Terminal {
    /// The terminal's own extent, anchored at the origin.
    fn rect(&self) -> Rect;

    /// Current default `(foreground, background)`.
    fn colors(&self) -> (Color, Color);

    fn set_colors(&mut self, fg: Color, bg: Color);

    /// Write one glyph at a local position.
    ///
    /// # Errors
    ///
    /// [`Error::PointOutOfBounds`] if `at` is outside [`rect`](Self::rect).
    fn draw_glyph(&mut self, glyph: Glyph, at: Point) -> Result<()>;

    /// A terminal onto `window`, given in this terminal's coordinates.
    ///
    /// The result writes straight into the root grid, however deeply views
    /// are nested. It borrows `self` mutably, so sibling views are taken
    /// one after another, each ending before the next begins.
    ///
    /// # Errors
    ///
    /// [`Error::WindowOutOfBounds`] unless `window` lies inside
    /// [`rect`](Self::rect).
    fn view(&mut self, window: Rect) -> Result<View<'_>>;

    /// Set the default colors used when a write omits them. Only affects
    /// this terminal; views keep their own defaults.
    fn color(&mut self, fg: Color, bg: Color) -> &mut Self
    where
        Self: Sized,
    {
        self.set_colors(fg, bg);
        self
    }

    /// Write `text` left to right starting at `at`.
    ///
    /// Characters outside CP437 are written as `?`. Missing colors fall back
    /// to the terminal defaults.
    ///
    /// # Errors
    ///
    /// Out of bounds if `at` is outside the terminal or the run would pass
    /// the right edge. Text never wraps.
    fn write(&mut self, text: &str, at: Point, fg: Option<Color>, bg: Option<Color>) -> Result<()> {
        let codes: Vec<CharCode> = text.chars().map(CharCode::lossy).collect();
        self.write_codes(&codes, at, fg, bg)
    }

    /// Write raw character codes left to right starting at `at`.
    ///
    /// # Errors
    ///
    /// Same as [`write`](Self::write).
    fn write_codes(
        &mut self,
        codes: &[CharCode],
        at: Point,
        fg: Option<Color>,
        bg: Option<Color>,
    ) -> Result<()> {
        let (default_fg, default_bg) = self.colors();
        let fg = fg.unwrap_or(default_fg);
        let bg = bg.unwrap_or(default_bg);
        let glyphs: Vec<Glyph> = codes.iter().map(|&code| Glyph::new(code, fg, bg)).collect();
        self.write_glyphs(&glyphs, at)
    }

    /// Write fully specified glyphs left to right starting at `at`.
    ///
    /// # Errors
    ///
    /// Same as [`write`](Self::write).
    fn write_glyphs(&mut self, glyphs: &[Glyph], at: Point) -> Result<()> {
        check_run(self.rect(), at, glyphs.len())?;
        for (glyph, x) in glyphs.iter().zip(at.x..=u16::MAX) {
            self.draw_glyph(*glyph, Point::new(x, at.y))?;
        }
        Ok(())
    }

    /// Paint every cell of `window` as a space with background `bg`.
    ///
    /// # Errors
    ///
    /// [`Error::WindowOutOfBounds`] unless `window` lies fully inside the
    /// terminal.
    fn fill(&mut self, bg: Color, window: Rect) -> Result<()> {
        let bounds = self.rect();
        if !bounds.contains(window) {
            return Err(Error::WindowOutOfBounds { window, bounds });
        }
        let blank = Glyph::blank(bg);
        for at in window.positions() {
            self.draw_glyph(blank, at)?;
        }
        Ok(())
    }

    /// [`fill`](Self::fill) with the default background; `None` clears the
    /// whole terminal.
    ///
    /// # Errors
    ///
    /// Same as [`fill`](Self::fill).
    fn clear(&mut self, window: Option<Rect>) -> Result<()> {
        let window = window.unwrap_or_else(|| self.rect());
        let (_, bg) = self.colors();
        self.fill(bg, window)
    }

    /// Clear the whole terminal.
    ///
    /// Infallible: the window is [`rect`](Self::rect) itself.
    fn clear_all(&mut self) {
        let cleared = self.clear(None);
        debug_assert!(cleared.is_ok(), "clearing own rect failed: {cleared:?}");
    }
}

/// Validate a horizontal run of `len` cells starting at `at`.
fn check_run(bounds: Rect, at: Point, len: usize) -> Result<()> {
    if !bounds.contains(at) {
        return Err(Error::PointOutOfBounds { at, bounds });
    }
    let end = u32::try_from(len).map_or(u32::MAX, |n| u32::from(at.x).saturating_add(n));
    if end > bounds.right() {
        let width = u16::try_from(len).unwrap_or(u16::MAX);
        return Err(Error::WindowOutOfBounds {
            window: Rect::new(at.x, at.y, width, 1),
            bounds,
        });
    }
    Ok(())
}

// ─── RootTerminal ────────────────────────────────────────────────────────────

/// The terminal that owns the grid.
///
/// # Examples
///
/// ```
/// use pyre_term::geometry::{Point, Rect, Size};
/// use pyre_term::terminal::{RootTerminal, Terminal};
///
/// let mut root = RootTerminal::new(Size::new(10, 10));
/// let mut view = root.view(Rect::new(2, 2, 3, 3)).unwrap();
/// view.write("hi", Point::new(0, 0), None, None).unwrap();
/// assert!(view.write("x", Point::new(3, 0), None, None).is_err());
///
/// let dirty: Vec<_> = root.dirty_cells().collect();
/// assert_eq!(dirty, vec![Point::new(2, 2), Point::new(3, 2)]);
/// ```
#[derive(Debug, Clone)]
pub struct RootTerminal {
    grid: DirtyGrid,
    fg: Color,
    bg: Color,
}

impl RootTerminal {
    /// A terminal of `size` with every cell clear and the default colors.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            grid: DirtyGrid::new(size),
            fg: Glyph::DEFAULT_FG,
            bg: Glyph::DEFAULT_BG,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.grid.size()
    }

    /// Read-only access to the grid, for renderers.
    #[inline]
    #[must_use]
    pub const fn grid(&self) -> &DirtyGrid {
        &self.grid
    }

    /// Positions changed since the last consume. Does not commit.
    pub fn dirty_cells(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.grid.dirty_cells()
    }

    /// Drain and commit changed cells. See [`DirtyGrid::consume_changed_cells`].
    pub fn consume_changed_cells(&mut self) -> Drain<'_> {
        self.grid.consume_changed_cells()
    }
}

impl Terminal for RootTerminal {
    fn rect(&self) -> Rect {
        self.grid.bounds()
    }

    fn colors(&self) -> (Color, Color) {
        (self.fg, self.bg)
    }

    fn set_colors(&mut self, fg: Color, bg: Color) {
        self.fg = fg;
        self.bg = bg;
    }

    fn draw_glyph(&mut self, glyph: Glyph, at: Point) -> Result<()> {
        self.grid.set_glyph(at, glyph)
    }

    fn view(&mut self, window: Rect) -> Result<View<'_>> {
        let bounds = self.rect();
        if !bounds.contains(window) {
            return Err(Error::WindowOutOfBounds { window, bounds });
        }
        Ok(View::new(self, window))
    }
}

// ─── View ────────────────────────────────────────────────────────────────────

/// A window onto a [`RootTerminal`] with its own origin and default colors.
#[derive(Debug)]
pub struct View<'a> {
    root: &'a mut RootTerminal,
    /// In root coordinates.
    window: Rect,
    fg: Color,
    bg: Color,
}

impl<'a> View<'a> {
    fn new(root: &'a mut RootTerminal, window: Rect) -> Self {
        tracing::trace!(?window, "view created");
        Self {
            root,
            window,
            fg: Glyph::DEFAULT_FG,
            bg: Glyph::DEFAULT_BG,
        }
    }

    /// Where this view sits on the root.
    #[inline]
    #[must_use]
    pub const fn window(&self) -> Rect {
        self.window
    }
}

impl Terminal for View<'_> {
    fn rect(&self) -> Rect {
        Rect::from_size(self.window.size())
    }

    fn colors(&self) -> (Color, Color) {
        (self.fg, self.bg)
    }

    fn set_colors(&mut self, fg: Color, bg: Color) {
        self.fg = fg;
        self.bg = bg;
    }

    fn draw_glyph(&mut self, glyph: Glyph, at: Point) -> Result<()> {
        let bounds = self.rect();
        if !bounds.contains(at) {
            return Err(Error::PointOutOfBounds { at, bounds });
        }
        let root_at = at
            .checked_offset(self.window.top_left())
            .ok_or(Error::PointOutOfBounds { at, bounds })?;
        self.root.draw_glyph(glyph, root_at)
    }

    /// The result borrows the root directly.
    fn view(&mut self, window: Rect) -> Result<View<'_>> {
        let bounds = self.rect();
        if !bounds.contains(window) {
            return Err(Error::WindowOutOfBounds { window, bounds });
        }
        let absolute = window
            .checked_offset(self.window.top_left())
            .ok_or(Error::WindowOutOfBounds { window, bounds })?;
        Ok(View::new(&mut *self.root, absolute))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
