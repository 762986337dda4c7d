// SPDX-License-Identifier: MIT
//
// Geometry: cell-space points, sizes, and rectangles.
//
// All coordinates are 0-indexed cell positions. Components are `u16`
// (a terminal never has negative or 65k+ cells on an axis); anything
// that adds a position to an extent widens to `u32` first so no bounds
// test can overflow.
//
// Containment is a trait rather than a method taking "a point or a
// rect" so that asking a rectangle whether it contains some other shape
// is checked at compile time.

use std::cmp::Ordering;
use std::fmt;

// ─── Point ───────────────────────────────────────────────────────────────────

/// A cell position.
///
/// Points order row-major (`y`, then `x`), the order a renderer visits
/// cells in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    /// The origin: column 0, row 0.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    #[inline]
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Translate by `offset`, or `None` if either axis overflows.
    #[inline]
    #[must_use]
    pub const fn checked_offset(self, offset: Self) -> Option<Self> {
        match (self.x.checked_add(offset.x), self.y.checked_add(offset.y)) {
            (Some(x), Some(y)) => Some(Self { x, y }),
            _ => None,
        }
    }
}

impl Ord for Point {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Point {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<(u16, u16)> for Point {
    #[inline]
    fn from((x, y): (u16, u16)) -> Self {
        Self { x, y }
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ─── Size ────────────────────────────────────────────────────────────────────

/// A width and height in cells (or pixels, for glyph sheets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    #[inline]
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Total number of cells.
    #[inline]
    #[must_use]
    pub const fn area(self) -> u32 {
        self.width as u32 * self.height as u32
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u16, u16)> for Size {
    #[inline]
    fn from((width, height): (u16, u16)) -> Self {
        Self { width, height }
    }
}

// ─── Rect ────────────────────────────────────────────────────────────────────

/// A rectangle: top-left corner plus extent.
///
/// The right and bottom edges are exclusive: `Rect::new(1, 2, 3, 4)` covers
/// columns 1..4 and rows 2..6.
///
/// # Examples
///
/// ```
/// use pyre_term::geometry::{Contains, Point, Rect};
///
/// let r = Rect::new(4, 4, 8, 8);
/// assert!(r.contains(Point::new(5, 6)));
/// assert!(!r.contains(Point::new(1, 2)));
/// assert!(r.contains(r));
/// assert!(Rect::new(2, 1, 5, 3).contains(Rect::new(2, 2, 2, 2)));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle at the origin with the given size.
    #[inline]
    #[must_use]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    #[inline]
    #[must_use]
    pub const fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Total number of cells covered.
    #[inline]
    #[must_use]
    pub const fn area(self) -> u32 {
        self.size().area()
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.size().is_empty()
    }

    /// The center, relative to the rectangle's own top-left.
    #[inline]
    #[must_use]
    pub const fn center(self) -> Point {
        Point::new(self.width / 2, self.height / 2)
    }

    /// Exclusive right edge, widened so it cannot overflow.
    #[inline]
    #[must_use]
    pub const fn right(self) -> u32 {
        self.x as u32 + self.width as u32
    }

    /// Exclusive bottom edge, widened so it cannot overflow.
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> u32 {
        self.y as u32 + self.height as u32
    }

    #[inline]
    #[must_use]
    pub const fn top_left(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Top-right corner (exclusive right edge).
    #[inline]
    #[must_use]
    pub const fn top_right(self) -> Point {
        Point::new(self.x.saturating_add(self.width), self.y)
    }

    /// Bottom-left corner (exclusive bottom edge).
    #[inline]
    #[must_use]
    pub const fn bottom_left(self) -> Point {
        Point::new(self.x, self.y.saturating_add(self.height))
    }

    /// Bottom-right corner (exclusive on both axes).
    #[inline]
    #[must_use]
    pub const fn bottom_right(self) -> Point {
        Point::new(
            self.x.saturating_add(self.width),
            self.y.saturating_add(self.height),
        )
    }

    /// Translate by `offset`, or `None` if the result leaves `u16` space.
    #[must_use]
    pub fn checked_offset(self, offset: Point) -> Option<Self> {
        let origin = self.top_left().checked_offset(offset)?;
        let moved = Self::new(origin.x, origin.y, self.width, self.height);
        (moved.right() <= u32::from(u16::MAX) + 1 && moved.bottom() <= u32::from(u16::MAX) + 1)
            .then_some(moved)
    }

    /// Every cell position in the rectangle, row by row.
    pub fn positions(self) -> impl Iterator<Item = Point> {
        (self.y..self.y.saturating_add(self.height)).flat_map(move |y| {
            (self.x..self.x.saturating_add(self.width)).map(move |x| Point::new(x, y))
        })
    }

    /// The smallest rectangle covering both, ignoring empty rectangles.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, clamp_u16(right - u32::from(x)), clamp_u16(bottom - u32::from(y)))
    }
}

#[inline]
fn clamp_u16(v: u32) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect({}, {}, {}×{})",
            self.x, self.y, self.width, self.height
        )
    }
}

// ─── Containment ─────────────────────────────────────────────────────────────

/// Whether a shape lies inside `self`.
pub trait Contains<T> {
    fn contains(&self, other: T) -> bool;
}

impl Contains<Point> for Rect {
    /// `x <= px < x + w` and `y <= py < y + h`.
    #[inline]
    fn contains(&self, p: Point) -> bool {
        self.x <= p.x
            && u32::from(p.x) < self.right()
            && self.y <= p.y
            && u32::from(p.y) < self.bottom()
    }
}

impl Contains<Rect> for Rect {
    /// The other rectangle's top-left is inside, and its far edges do not
    /// extend past ours.
    #[inline]
    fn contains(&self, other: Rect) -> bool {
        self.contains(other.top_left())
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
