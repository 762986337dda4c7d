// SPDX-License-Identifier: MIT
//
// pyre-term: the character-grid core of pyre.
//
// A fixed-size grid of CP437 glyphs, each with its own foreground and
// background color, plus the bookkeeping that makes rendering it cheap:
// writes land in a pending set, writes that restore what is already on
// screen cancel out, and a renderer drains only what actually changed.
//
// Nothing here draws. Backends (pixels, ANSI, anything else) live in
// `pyre-render` and consume `RootTerminal::consume_changed_cells`.

pub mod color;
pub mod error;
pub mod geometry;
pub mod glyph;
pub mod grid;
pub mod key;
pub mod terminal;

pub use error::{Error, Result};
