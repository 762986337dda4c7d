// SPDX-License-Identifier: MIT
//
// DirtyGrid: the committed cell grid plus the set of pending changes.
//
// Two layers:
//
//   committed : flat row-major `Vec<Glyph>`, what the renderer last
//                drew (or what a fresh grid starts as: `Glyph::CLEAR`).
//   pending   : position → glyph, the writes not yet rendered.
//
// Invariant: a position is pending iff its pending glyph differs from the
// committed glyph at that position. `set_glyph` keeps this true on every
// write: writing the committed value back cancels a pending change, so a
// renderer never repaints a cell whose appearance did not change, no
// matter how many times it was overwritten in between.
//
// Pending changes are keyed in a `BTreeMap` so they drain in row-major
// order. Backends that stream output (ANSI) rely on that to keep cursor
// movement sequential.
//
// Draining is lazy: `consume_changed_cells` returns an iterator that
// commits each entry as it is yielded. Dropping it early leaves the rest
// pending for the next frame.

use std::collections::BTreeMap;
use std::iter::FusedIterator;

use crate::error::{Error, Result};
use crate::geometry::{Contains, Point, Rect, Size};
use crate::glyph::Glyph;

// ─── DirtyGrid ───────────────────────────────────────────────────────────────

/// A fixed-size glyph grid that tracks which cells changed since the last
/// render.
///
/// # Examples
///
/// ```
/// use pyre_term::geometry::{Point, Size};
/// use pyre_term::glyph::Glyph;
/// use pyre_term::grid::DirtyGrid;
///
/// let mut grid = DirtyGrid::new(Size::new(4, 2));
/// grid.set_glyph(Point::new(1, 1), Glyph::from_char('x')).unwrap();
/// assert_eq!(grid.dirty_count(), 1);
///
/// let drained: Vec<_> = grid.consume_changed_cells().collect();
/// assert_eq!(drained, vec![(Point::new(1, 1), Glyph::from_char('x'))]);
/// assert!(!grid.is_dirty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirtyGrid {
    size: Size,
    cells: Vec<Glyph>,
    pending: BTreeMap<Point, Glyph>,
}

impl DirtyGrid {
    /// Create a grid with every cell committed as [`Glyph::CLEAR`] and
    /// nothing pending.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            cells: vec![Glyph::CLEAR; size.area() as usize],
            pending: BTreeMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// The grid's own rectangle, anchored at the origin.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.size)
    }

    /// Record a write to `at`.
    ///
    /// If `glyph` equals the committed glyph the position is removed from
    /// the pending set (cancelling any earlier write); otherwise it
    /// replaces whatever was pending there.
    ///
    /// # Errors
    ///
    /// [`Error::PointOutOfBounds`] if `at` is outside the grid. Nothing is
    /// recorded in that case.
    pub fn set_glyph(&mut self, at: Point, glyph: Glyph) -> Result<()> {
        let index = self.index_of(at)?;
        if self.cells[index] == glyph {
            if self.pending.remove(&at).is_some() {
                tracing::trace!(?at, "write restores committed glyph; change dropped");
            }
        } else {
            self.pending.insert(at, glyph);
        }
        Ok(())
    }

    /// The glyph that will be visible after the next render: the pending
    /// glyph if any, otherwise the committed one.
    #[must_use]
    pub fn get(&self, at: Point) -> Option<Glyph> {
        self.pending.get(&at).copied().or_else(|| self.committed(at))
    }

    /// The glyph last committed at `at`.
    #[must_use]
    pub fn committed(&self, at: Point) -> Option<Glyph> {
        self.index_of(at).ok().map(|i| self.cells[i])
    }

    /// The glyph waiting to be rendered at `at`, if there is one.
    #[must_use]
    pub fn pending(&self, at: Point) -> Option<Glyph> {
        self.pending.get(&at).copied()
    }

    /// Positions with a pending change, in row-major order. Does not
    /// consume anything.
    pub fn dirty_cells(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.pending.keys().copied()
    }

    /// Pending `(position, glyph)` pairs in row-major order, without
    /// committing them.
    pub fn pending_cells(&self) -> impl ExactSizeIterator<Item = (Point, Glyph)> + '_ {
        self.pending.iter().map(|(at, glyph)| (*at, *glyph))
    }

    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.pending.len()
    }

    /// Drain pending changes in row-major order, committing each one as it
    /// is yielded.
    ///
    /// Entries not pulled before the iterator is dropped stay pending.
    pub fn consume_changed_cells(&mut self) -> Drain<'_> {
        tracing::debug!(cells = self.pending.len(), "consuming changed cells");
        Drain { grid: self }
    }

    /// Every committed cell in row-major order, for a full repaint.
    pub fn committed_cells(&self) -> impl ExactSizeIterator<Item = (Point, Glyph)> + '_ {
        let width = usize::from(self.size.width.max(1));
        self.cells.iter().enumerate().map(move |(i, glyph)| {
            // Both quotients fit: i < width * height, each a u16.
            #[allow(clippy::cast_possible_truncation)]
            let at = Point::new((i % width) as u16, (i / width) as u16);
            (at, *glyph)
        })
    }

    fn index_of(&self, at: Point) -> Result<usize> {
        if !self.bounds().contains(at) {
            return Err(Error::PointOutOfBounds {
                at,
                bounds: self.bounds(),
            });
        }
        Ok(usize::from(at.y) * usize::from(self.size.width) + usize::from(at.x))
    }
}

// ─── Drain ───────────────────────────────────────────────────────────────────

/// Iterator returned by [`DirtyGrid::consume_changed_cells`].
#[derive(Debug)]
pub struct Drain<'a> {
    grid: &'a mut DirtyGrid,
}

impl Iterator for Drain<'_> {
    type Item = (Point, Glyph);

    fn next(&mut self) -> Option<Self::Item> {
        let (at, glyph) = self.grid.pending.pop_first()?;
        // Pending keys were bounds-checked on insert.
        let index = usize::from(at.y) * usize::from(self.grid.size.width) + usize::from(at.x);
        self.grid.cells[index] = glyph;
        Some((at, glyph))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.grid.pending.len();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Drain<'_> {}
impl FusedIterator for Drain<'_> {}

// ─── Tests ───────────────────────────────────────────────────────────────────
