// SPDX-License-Identifier: MIT
//
// Error type for the backends.
//
// Grid errors from `pyre-term` pass through unchanged via `Grid`. Asset
// problems (bad font file names, sheets of the wrong shape) get their own
// variants so the binary can report them without string matching.

use std::io;
use std::path::PathBuf;

use pyre_term::geometry::Size;
use thiserror::Error;

/// Errors raised while loading assets, rendering, or reading input.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Decoding or encoding an image failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// A font file name does not follow `name_WxH.ext`.
    #[error("font file name {path:?} is not of the form name_WxH.ext")]
    FontName { path: PathBuf },

    /// A glyph sheet image is not a 16×16 grid of the declared cell size.
    #[error("glyph sheet is {actual:?}, expected 16×16 cells of {cell:?}")]
    SheetSize { actual: (u32, u32), cell: Size },

    /// No font with this key was discovered.
    #[error("unknown font {0:?}")]
    UnknownFont(String),

    #[error(transparent)]
    Grid(#[from] pyre_term::Error),

    /// The input source has no more keys and never will.
    #[error("input closed")]
    InputClosed,
}

/// Result alias for backend operations.
pub type Result<T, E = RenderError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pyre_term::geometry::{Point, Rect};

    #[test]
    fn io_converts() {
        let err: RenderError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, RenderError::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }

    #[test]
    fn grid_error_is_transparent() {
        let inner = pyre_term::Error::PointOutOfBounds {
            at: Point::new(3, 3),
            bounds: Rect::new(0, 0, 2, 2),
        };
        let err = RenderError::from(inner);
        assert_eq!(err.to_string(), inner.to_string());
    }

    #[test]
    fn font_name_mentions_path() {
        let err = RenderError::FontName {
            path: PathBuf::from("fonts/broken.png"),
        };
        assert!(err.to_string().contains("broken.png"));
    }
}
