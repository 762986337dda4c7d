// SPDX-License-Identifier: MIT
//
// pyre-render: backends for the pyre character grid.
//
// Two ways to show a grid:
//
//   PixelRenderer: glyph sheet + pixel surface. Fonts are 16×16 CP437
//   sheets found on disk (`font`) or the built-in 8×8 set (`sheet`); the
//   in-memory surface can be saved as PNG.
//
//   AnsiRenderer: truecolor escape sequences to any `Write`, normally a
//   terminal in the alternate screen.
//
// Both implement `Renderer` and consume only the grid's changed cells.
// Keyboard input comes from a `KeySource`: a raw-mode TTY or a scripted
// queue.

pub mod ansi;
pub mod diff;
pub mod error;
pub mod font;
pub mod input;
pub mod keys;
pub mod output;
pub mod reader;
pub mod renderer;
pub mod sheet;
pub mod surface;
pub mod tty;

pub use error::{RenderError, Result};
