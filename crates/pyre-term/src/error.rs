// SPDX-License-Identifier: MIT
//
// Error type for the core.
//
// The core has exactly one failure mode: a write, fill, clear, or view
// that reaches outside the addressed rectangle. Bounds are checked before
// anything is mutated, so an `OutOfBounds` error always means the grid
// was left exactly as it was.

use thiserror::Error;

use crate::geometry::{Point, Rect};

/// Errors raised by grid and terminal operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A single cell position fell outside the target.
    #[error("position {at:?} is out of bounds {bounds:?}")]
    PointOutOfBounds { at: Point, bounds: Rect },

    /// A rectangular region (text run, fill window, view window) is not
    /// fully inside the target.
    #[error("window {window:?} is out of bounds {bounds:?}")]
    WindowOutOfBounds { window: Rect, bounds: Rect },
}

impl Error {
    /// Whether this is an out-of-bounds condition of either shape.
    ///
    /// Every variant currently is; callers matching on "out of bounds"
    /// should use this rather than enumerating variants.
    #[inline]
    #[must_use]
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            Self::PointOutOfBounds { .. } | Self::WindowOutOfBounds { .. }
        )
    }
}

/// Result alias for core operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
