// SPDX-License-Identifier: MIT
//
// Command line and the configuration resolved from it.
//
// `Cli` is what the user typed; `Config` is what the run uses. Resolving
// one into the other is where flag combinations are checked and the glyph
// sheet is located, so `main` never touches the filesystem for fonts.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, ValueEnum};
use pyre_render::RenderError;
use pyre_render::font::discover_fonts;
use pyre_render::sheet::BitmapSheet;
use thiserror::Error;

// ─── Cli ─────────────────────────────────────────────────────────────────────

/// Where a frame goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Backend {
    /// Truecolor escape sequences on this terminal.
    #[default]
    Ansi,
    /// A PNG image drawn with a glyph sheet.
    Png,
}

#[derive(Debug, Parser)]
#[command(name = "pyre", version, about = "Draw a character-grid banner")]
pub struct Cli {
    /// Output backend.
    #[arg(long, value_enum, default_value_t = Backend::Ansi)]
    pub backend: Backend,

    /// Directory holding `name_WxH.png` glyph sheets.
    #[arg(long, value_name = "DIR")]
    pub font_dir: Option<PathBuf>,

    /// Font to use from `--font-dir`, e.g. `TERMINAL_8x12`.
    #[arg(long, value_name = "NAME")]
    pub font: Option<String>,

    /// Image written by the png backend.
    #[arg(long, value_name = "PATH", default_value = "pyre.png")]
    pub out: PathBuf,

    /// Seed for the banner colors. Defaults to the clock.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Write logs here instead of stderr.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

// ─── Config ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("--font requires --font-dir")]
    FontWithoutDir,

    #[error("no fonts found in {0:?}")]
    NoFonts(PathBuf),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A fully resolved run.
#[derive(Debug)]
pub struct Config {
    pub backend: Backend,
    pub sheet: BitmapSheet,
    pub out: PathBuf,
    pub seed: u32,
}

impl Config {
    /// Check flag combinations and load the glyph sheet.
    ///
    /// With `--font-dir` alone the first font by name is used; with
    /// neither flag the built-in sheet is.
    ///
    /// # Errors
    ///
    /// Bad flag combinations, an empty or unreadable font directory, an
    /// unknown font name, or a sheet that fails to load.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let sheet = match (&cli.font_dir, &cli.font) {
            (None, Some(_)) => return Err(ConfigError::FontWithoutDir),
            (None, None) => BitmapSheet::builtin(),
            (Some(dir), name) => {
                let catalog = discover_fonts(dir)?;
                let font = match name {
                    Some(name) => catalog.require(name)?,
                    None => catalog
                        .iter()
                        .next()
                        .ok_or_else(|| ConfigError::NoFonts(dir.clone()))?,
                };
                tracing::info!(font = %font.name, "using font");
                BitmapSheet::open(font)?
            }
        };

        Ok(Self {
            backend: cli.backend,
            sheet,
            out: cli.out.clone(),
            seed: cli.seed.unwrap_or_else(clock_seed),
        })
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(1, |d| d.subsec_nanos() ^ (d.as_secs() as u32))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pyre_render::sheet::GlyphSheet;
    use pyre_term::geometry::Size;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pyre").chain(args.iter().copied())).unwrap()
    }

    // ── Parsing ──

    #[test]
    fn defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.backend, Backend::Ansi);
        assert_eq!(cli.out, PathBuf::from("pyre.png"));
        assert!(cli.font_dir.is_none());
        assert!(cli.seed.is_none());
    }

    #[test]
    fn png_backend_with_seed() {
        let cli = parse(&["--backend", "png", "--seed", "7", "--out", "x.png"]);
        assert_eq!(cli.backend, Backend::Png);
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.out, PathBuf::from("x.png"));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(Cli::try_parse_from(["pyre", "--backend", "sdl"]).is_err());
    }

    // ── Resolution ──

    #[test]
    fn builtin_sheet_without_font_flags() {
        let config = Config::from_cli(&parse(&["--seed", "3"])).unwrap();
        assert_eq!(config.seed, 3);
        assert_eq!(config.sheet.cell_size(), Size::new(8, 8));
    }

    #[test]
    fn font_without_dir_is_rejected() {
        let err = Config::from_cli(&parse(&["--font", "VGA_8x16"])).unwrap_err();
        assert!(matches!(err, ConfigError::FontWithoutDir));
    }

    #[test]
    fn missing_font_dir_is_an_io_error() {
        let err = Config::from_cli(&parse(&["--font-dir", "/nonexistent/pyre-fonts"]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Render(RenderError::Io(_))));
    }

    #[test]
    fn empty_font_dir_has_no_fonts() {
        let dir = tempfile::tempdir().unwrap();
        let dir_arg = dir.path().to_str().unwrap();
        let err = Config::from_cli(&parse(&["--font-dir", dir_arg])).unwrap_err();
        assert!(matches!(err, ConfigError::NoFonts(_)));
    }

    #[test]
    fn unknown_font_name_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let dir_arg = dir.path().to_str().unwrap();
        let err = Config::from_cli(&parse(&["--font-dir", dir_arg, "--font", "NOPE_8x8"]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Render(RenderError::UnknownFont(_))));
    }
}
