// SPDX-License-Identifier: MIT
//
// pyre: draw a banner on a character grid and show it.
//
// This binary wires the two crates together:
//
//   pyre-term   → the grid, its dirty-cell bookkeeping, drawing helpers
//   pyre-render → pixel and ANSI backends, glyph sheets, key input
//
// Flow for one run:
//
//   argv → Cli → Config (font lookup) → banner drawn into RootTerminal
//        → png:  PixelRenderer → PixelSurface → file
//        → ansi: AnsiRenderer → stdout, then keys until Escape or Ctrl+Q
//
// Space repaints the banner with the next seed; only cells whose colors
// changed are sent to the terminal.

mod banner;
mod cli;

use std::error::Error;
use std::fs::File;
use std::io;
use std::path::Path;
use std::process;
use std::sync::Mutex;

use clap::Parser;
use pyre_render::RenderError;
use pyre_render::diff::AnsiRenderer;
use pyre_render::keys::{KeySource, TtyKeys};
use pyre_render::renderer::{PixelRenderer, Renderer};
use pyre_render::tty;
use pyre_term::geometry::{Rect, Size};
use pyre_term::key::{Key, KeyCode};
use pyre_term::terminal::{RootTerminal, Terminal};
use tracing_subscriber::EnvFilter;

use crate::banner::{banner_size, draw_banner};
use crate::cli::{Backend, Cli, Config};

/// Environment variable holding the log filter, e.g. `PYRE_LOG=debug`.
const LOG_ENV: &str = "PYRE_LOG";

type AppResult<T> = Result<T, Box<dyn Error>>;

// ─── Logging ─────────────────────────────────────────────────────────────────

fn init_logging(log_file: Option<&Path>) -> io::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

// ─── Keys ────────────────────────────────────────────────────────────────────

/// What a key press asks the demo to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Quit,
    Reseed,
    Ignore,
}

fn action_for(key: Key) -> Action {
    match key.code {
        KeyCode::Escape => Action::Quit,
        KeyCode::Char('q') if key.ctrl() => Action::Quit,
        KeyCode::Space => Action::Reseed,
        _ => Action::Ignore,
    }
}

// ─── Backends ────────────────────────────────────────────────────────────────

fn run_png(config: Config) -> AppResult<()> {
    let mut term = RootTerminal::new(banner_size());
    draw_banner(&mut term, config.seed)?;

    let mut renderer = PixelRenderer::for_terminal(config.sheet, &term);
    let stats = renderer.render(&mut term)?;
    renderer.surface().save_png(&config.out)?;

    tracing::info!(
        path = %config.out.display(),
        cells = stats.cells_rendered,
        "image written"
    );
    Ok(())
}

/// The screen size if known, grown to fit the banner.
fn screen_size() -> Size {
    let banner = banner_size();
    tty::terminal_size().map_or(banner, |screen| {
        Size::new(
            screen.width.max(banner.width),
            screen.height.max(banner.height),
        )
    })
}

/// Where the banner sits: centered on `screen`.
fn banner_window(screen: Size) -> Rect {
    let banner = banner_size();
    Rect::new(
        (screen.width - banner.width) / 2,
        (screen.height - banner.height) / 2,
        banner.width,
        banner.height,
    )
}

fn paint(term: &mut RootTerminal, seed: u32) -> pyre_term::Result<()> {
    let window = banner_window(term.size());
    let mut view = term.view(window)?;
    draw_banner(&mut view, seed)
}

/// Show the banner until a quit key; returns how many frames were drawn.
fn interact<R: Renderer, K: KeySource>(
    term: &mut RootTerminal,
    renderer: &mut R,
    keys: &mut K,
    mut seed: u32,
) -> AppResult<usize> {
    paint(term, seed)?;
    renderer.render(term)?;
    let mut frames = 1;

    loop {
        let key = match keys.read_key() {
            Ok(key) => key,
            Err(RenderError::InputClosed) => break,
            Err(err) => return Err(err.into()),
        };
        match action_for(key) {
            Action::Quit => break,
            Action::Reseed => {
                seed = seed.wrapping_add(1);
                paint(term, seed)?;
                let stats = renderer.render(term)?;
                tracing::debug!(seed, cells = stats.cells_rendered, "repainted");
                frames += 1;
            }
            Action::Ignore => {}
        }
    }
    Ok(frames)
}

fn run_ansi(config: &Config) -> AppResult<()> {
    let mut term = RootTerminal::new(screen_size());
    let mut keys = TtyKeys::open()?;
    let mut renderer = AnsiRenderer::new(io::stdout().lock());

    renderer.enter()?;
    let shown = interact(&mut term, &mut renderer, &mut keys, config.seed);
    renderer.leave()?;
    keys.close();

    let frames = shown?;
    tracing::info!(frames, "done");
    Ok(())
}

fn run(config: Config) -> AppResult<()> {
    match config.backend {
        Backend::Png => run_png(config),
        Backend::Ansi => run_ansi(&config),
    }
}

// ─── Entry Point ─────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_file.as_deref()) {
        eprintln!("pyre: cannot open log file: {e}");
        process::exit(1);
    }

    let config = Config::from_cli(&cli).unwrap_or_else(|e| {
        eprintln!("pyre: {e}");
        process::exit(2);
    });

    if let Err(e) = run(config) {
        tracing::error!(error = %e, "run failed");
        eprintln!("pyre: {e}");
        process::exit(1);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pyre_render::keys::ScriptedKeys;
    use pyre_render::sheet::BitmapSheet;
    use pyre_term::key::KeyMod;

    // ── Keys ──

    #[test]
    fn quit_keys() {
        assert_eq!(action_for(Key::plain(KeyCode::Escape)), Action::Quit);
        assert_eq!(
            action_for(Key::new(KeyCode::Char('q'), KeyMod::CTRL)),
            Action::Quit
        );
        assert_eq!(action_for(Key::plain(KeyCode::Char('q'))), Action::Ignore);
        assert_eq!(action_for(Key::plain(KeyCode::Space)), Action::Reseed);
    }

    // ── Layout ──

    #[test]
    fn banner_is_centered() {
        let window = banner_window(Size::new(80, 25));
        assert_eq!(window, Rect::new(9, 10, 62, 5));
    }

    #[test]
    fn banner_fills_an_exact_screen() {
        assert_eq!(banner_window(banner_size()), Rect::new(0, 0, 62, 5));
    }

    // ── Runs ──

    #[test]
    fn interact_stops_on_escape_and_counts_frames() {
        let mut term = RootTerminal::new(Size::new(70, 8));
        let mut renderer = AnsiRenderer::new(Vec::new());
        let mut keys = ScriptedKeys::new([
            Key::plain(KeyCode::Char('x')),
            Key::plain(KeyCode::Space),
            Key::plain(KeyCode::Escape),
            Key::plain(KeyCode::Space),
        ]);

        let frames = interact(&mut term, &mut renderer, &mut keys, 7).unwrap();
        assert_eq!(frames, 2);
        assert_eq!(keys.remaining(), 1);
        assert!(!term.grid().is_dirty());
        assert!(!renderer.get_ref().is_empty());
    }

    #[test]
    fn interact_ends_when_input_closes() {
        let mut term = RootTerminal::new(banner_size());
        let mut renderer = AnsiRenderer::new(Vec::new());
        let mut keys = ScriptedKeys::default();
        assert_eq!(interact(&mut term, &mut renderer, &mut keys, 1).unwrap(), 1);
    }

    #[test]
    fn png_run_writes_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("banner.png");
        let config = Config {
            backend: Backend::Png,
            sheet: BitmapSheet::builtin(),
            out: out.clone(),
            seed: 11,
        };
        run(config).unwrap();
        assert!(out.is_file());
    }
}
