// SPDX-License-Identifier: MIT
//
// Font discovery.
//
// A font is an image holding a 16×16 grid of CP437 glyphs. Its cell size
// is encoded in the file name:
//
//   [name]_[width]x[height].[ext]      e.g. cp437_9x16.png
//
// which is registered under the key `CP437_9x16` (name upper-cased, size
// kept verbatim). Discovery is an explicit call that returns a catalog;
// nothing is registered globally.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use pyre_term::geometry::Size;

use crate::error::{RenderError, Result};

// ─── FontDescriptor ──────────────────────────────────────────────────────────

/// Where a font lives and how big its cells are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDescriptor {
    /// Catalog key, e.g. `CP437_9x16`.
    pub name: String,
    /// One glyph's size in pixels.
    pub cell: Size,
    pub path: PathBuf,
}

/// Parse a font file name into a descriptor.
///
/// ```
/// use std::path::Path;
/// use pyre_render::font::parse_font_file_name;
///
/// let font = parse_font_file_name(Path::new("fonts/terminal_8x12.png")).unwrap();
/// assert_eq!(font.name, "TERMINAL_8x12");
/// assert_eq!((font.cell.width, font.cell.height), (8, 12));
/// ```
///
/// # Errors
///
/// [`RenderError::FontName`] if the stem has no `_`, the size part is not
/// `WxH`, or either dimension is zero or not a number.
pub fn parse_font_file_name(path: &Path) -> Result<FontDescriptor> {
    let bad = || RenderError::FontName {
        path: path.to_path_buf(),
    };
    let stem = path.file_stem().and_then(|s| s.to_str()).ok_or_else(bad)?;
    let (name, dims) = stem.rsplit_once('_').ok_or_else(bad)?;
    let (w, h) = dims.split_once('x').ok_or_else(bad)?;
    let width: u16 = w.parse().map_err(|_| bad())?;
    let height: u16 = h.parse().map_err(|_| bad())?;
    if name.is_empty() || width == 0 || height == 0 {
        return Err(bad());
    }
    Ok(FontDescriptor {
        name: format!("{}_{dims}", name.to_uppercase()),
        cell: Size::new(width, height),
        path: path.to_path_buf(),
    })
}

// ─── FontCatalog ─────────────────────────────────────────────────────────────

/// Fonts found by [`discover_fonts`], keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontCatalog {
    fonts: BTreeMap<String, FontDescriptor>,
}

impl FontCatalog {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FontDescriptor> {
        self.fonts.get(name)
    }

    /// Like [`get`](Self::get), but a missing font is an error.
    ///
    /// # Errors
    ///
    /// [`RenderError::UnknownFont`] if no font has this name.
    pub fn require(&self, name: &str) -> Result<&FontDescriptor> {
        self.get(name)
            .ok_or_else(|| RenderError::UnknownFont(name.to_owned()))
    }

    /// Font names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FontDescriptor> {
        self.fonts.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Add a font, replacing any with the same name.
    pub fn insert(&mut self, font: FontDescriptor) {
        self.fonts.insert(font.name.clone(), font);
    }
}

/// Scan `dir` (not recursively) for font files.
///
/// Subdirectories and files whose names do not parse are skipped.
///
/// # Errors
///
/// Propagates I/O errors from reading the directory itself.
pub fn discover_fonts(dir: &Path) -> Result<FontCatalog> {
    let _span = tracing::debug_span!("discover_fonts", dir = %dir.display()).entered();
    let mut catalog = FontCatalog::default();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let path = entry.path();
        match parse_font_file_name(&path) {
            Ok(font) => {
                tracing::debug!(name = %font.name, path = %path.display(), "font found");
                catalog.insert(font);
            }
            Err(err) => tracing::debug!(%err, "skipping file"),
        }
    }

    tracing::debug!(count = catalog.len(), "font discovery done");
    Ok(catalog)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
