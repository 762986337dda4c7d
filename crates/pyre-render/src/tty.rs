// SPDX-License-Identifier: MIT
//
// TTY control: raw mode, size queries, and panic-safe restore.
//
// Safety: termios, ioctl, isatty, and the raw fd write in the panic hook
// are plain POSIX calls with no safe std equivalent. Each unsafe block is
// a single call on a valid fd with a properly initialised struct.
#![allow(unsafe_code)]
//
// `RawMode` is an RAII guard: construct it to put stdin in raw mode, drop
// it to restore the saved settings. If the program panics while raw, the
// hook installed on first use writes a restore sequence straight to fd 1
// (no stdout lock, so no deadlock mid-frame), restores termios from a
// global backup, and then hands over to the previous hook.

use std::fmt;
use std::io;
use std::sync::{Mutex, Once};

use pyre_term::geometry::Size;

// ─── Queries ─────────────────────────────────────────────────────────────────

/// The terminal's size in cells, or `None` when stdout is not a terminal.
#[cfg(unix)]
#[must_use]
pub fn terminal_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };
    (result == 0 && ws.ws_col > 0 && ws.ws_row > 0).then(|| Size::new(ws.ws_col, ws.ws_row))
}

#[cfg(not(unix))]
#[must_use]
pub fn terminal_size() -> Option<Size> {
    None
}

/// Whether stdin is a terminal.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic Restore ───────────────────────────────────────────────────────────

/// Settings to restore if a panic skips `RawMode`'s drop.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// End sync, reset colors, show cursor, leave the alternate screen.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[?2026l\x1b[0m\x1b[?25h\x1b[?1049l";

static PANIC_HOOK_INSTALLED: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();
            original(info);
        }));
    });
}

fn emergency_restore() {
    #[cfg(unix)]
    {
        unsafe {
            let _ = libc::write(
                libc::STDOUT_FILENO,
                EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
                EMERGENCY_RESTORE.len(),
            );
        }
        if let Ok(guard) = TERMIOS_BACKUP.lock() {
            if let Some(ref original) = *guard {
                unsafe {
                    let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        use std::io::Write;
        let mut out = io::stdout();
        let _ = out.write_all(EMERGENCY_RESTORE);
        let _ = out.flush();
    }
}

// ─── RawMode ─────────────────────────────────────────────────────────────────

/// Raw mode on stdin for as long as this value lives.
///
/// Enabling is a no-op (but still succeeds) when stdin is not a terminal,
/// so piped runs and tests work unchanged.
pub struct RawMode {
    #[cfg(unix)]
    original: Option<libc::termios>,
}

impl RawMode {
    /// Switch stdin to raw mode.
    ///
    /// # Errors
    ///
    /// The OS error from `tcgetattr` or `tcsetattr`.
    #[cfg(unix)]
    pub fn enable() -> io::Result<Self> {
        install_panic_hook();
        if !is_tty() {
            tracing::debug!("stdin is not a tty; raw mode skipped");
            return Ok(Self { original: None });
        }

        let fd = libc::STDIN_FILENO;
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &raw mut termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let original = termios;
        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = Some(original);
        }

        // cfmakeraw, spelled out.
        termios.c_iflag &= !(libc::IGNBRK
            | libc::BRKINT
            | libc::PARMRK
            | libc::ISTRIP
            | libc::INLCR
            | libc::IGNCR
            | libc::ICRNL
            | libc::IXON);
        termios.c_oflag &= !libc::OPOST;
        termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
        termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
        termios.c_cflag |= libc::CS8;
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;

        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        tracing::debug!("raw mode enabled");
        Ok(Self {
            original: Some(original),
        })
    }

    #[cfg(not(unix))]
    pub fn enable() -> io::Result<Self> {
        install_panic_hook();
        Ok(Self {})
    }

    /// Whether the terminal settings were actually changed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        #[cfg(unix)]
        {
            self.original.is_some()
        }
        #[cfg(not(unix))]
        {
            false
        }
    }
}

impl fmt::Debug for RawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawMode")
            .field("active", &self.is_active())
            .finish()
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            if let Some(original) = self.original.take() {
                unsafe {
                    let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const original);
                }
                if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                    *guard = None;
                }
                tracing::debug!("raw mode restored");
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
