// SPDX-License-Identifier: MIT
//
// Key sources: blocking `read_key` over a real TTY or a scripted queue.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use pyre_term::key::Key;

use crate::error::{RenderError, Result};
use crate::input::{Decoder, decode_keys};
use crate::reader::StdinReader;
use crate::tty::RawMode;

/// How long a lone ESC waits for the rest of a sequence.
const ESC_TIMEOUT: Duration = Duration::from_millis(25);

// ─── KeySource ───────────────────────────────────────────────────────────────

/// Something keys can be read from.
pub trait KeySource {
    /// Block until the next key arrives.
    ///
    /// Input the key vocabulary cannot express is skipped, never returned.
    ///
    /// # Errors
    ///
    /// [`RenderError::InputClosed`] once no more keys can arrive.
    fn read_key(&mut self) -> Result<Key>;
}

// ─── TtyKeys ─────────────────────────────────────────────────────────────────

/// Keys typed at the controlling terminal.
///
/// Stdin is in raw mode while this value lives.
#[derive(Debug)]
pub struct TtyKeys {
    // Field order is drop order: stop reading before leaving raw mode.
    reader: StdinReader,
    rx: Receiver<Vec<u8>>,
    decoder: Decoder,
    ready: VecDeque<Key>,
    _raw: RawMode,
}

impl TtyKeys {
    /// Enter raw mode and start reading stdin.
    ///
    /// # Errors
    ///
    /// Terminal setup or thread spawn failures.
    pub fn open() -> Result<Self> {
        let raw = RawMode::enable()?;
        let (reader, rx) = StdinReader::spawn()?;
        Ok(Self {
            reader,
            rx,
            decoder: Decoder::new(),
            ready: VecDeque::new(),
            _raw: raw,
        })
    }

    /// Stop the reader thread now instead of on drop.
    pub fn close(&mut self) {
        self.reader.stop();
    }

    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        if !self.decoder.has_pending() {
            return self.rx.recv().map(Some).map_err(|_| RenderError::InputClosed);
        }
        match self.rx.recv_timeout(ESC_TIMEOUT) {
            Ok(chunk) => Ok(Some(chunk)),
            // Nothing followed; resolve what is pending.
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {
                self.ready.extend(self.decoder.flush());
                Ok(None)
            }
        }
    }
}

impl KeySource for TtyKeys {
    fn read_key(&mut self) -> Result<Key> {
        loop {
            if let Some(key) = self.ready.pop_front() {
                tracing::trace!(%key, "key");
                return Ok(key);
            }
            if let Some(chunk) = self.next_chunk()? {
                self.ready.extend(self.decoder.advance(&chunk));
            }
        }
    }
}

// ─── ScriptedKeys ────────────────────────────────────────────────────────────

/// A fixed queue of keys, for tests and headless runs.
///
/// ```
/// use pyre_render::keys::{KeySource, ScriptedKeys};
/// use pyre_term::key::{Key, KeyCode};
///
/// let mut keys = ScriptedKeys::from_bytes(b"a\x1b");
/// assert_eq!(keys.read_key().unwrap(), Key::plain(KeyCode::Char('a')));
/// assert_eq!(keys.read_key().unwrap(), Key::plain(KeyCode::Escape));
/// assert!(keys.read_key().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys {
    keys: VecDeque<Key>,
}

impl ScriptedKeys {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Keys decoded from raw terminal bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(decode_keys(bytes))
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.keys.len()
    }

    pub fn push(&mut self, key: Key) {
        self.keys.push_back(key);
    }
}

impl KeySource for ScriptedKeys {
    fn read_key(&mut self) -> Result<Key> {
        self.keys.pop_front().ok_or(RenderError::InputClosed)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pyre_term::key::{KeyCode, KeyMod};

    #[test]
    fn scripted_keys_pop_in_order() {
        let mut keys = ScriptedKeys::new([
            Key::plain(KeyCode::Up),
            Key::new(KeyCode::Char('q'), KeyMod::CTRL),
        ]);
        assert_eq!(keys.remaining(), 2);
        assert_eq!(keys.read_key().unwrap(), Key::plain(KeyCode::Up));
        assert!(keys.read_key().unwrap().ctrl());
        assert!(matches!(keys.read_key(), Err(RenderError::InputClosed)));
    }

    #[test]
    fn scripted_keys_from_bytes_skip_unknown_input() {
        let mut keys = ScriptedKeys::from_bytes(b"!\x1b[15~\x11");
        assert_eq!(keys.remaining(), 1);
        assert_eq!(
            keys.read_key().unwrap(),
            Key::new(KeyCode::Char('q'), KeyMod::CTRL)
        );
    }

    #[test]
    fn push_appends() {
        let mut keys = ScriptedKeys::default();
        keys.push(Key::plain(KeyCode::Enter));
        assert_eq!(keys.read_key().unwrap(), Key::plain(KeyCode::Enter));
    }

    #[test]
    fn read_key_works_through_trait_object() {
        let mut keys: Box<dyn KeySource> =
            Box::new(ScriptedKeys::new([Key::plain(KeyCode::Escape)]));
        assert_eq!(keys.read_key().unwrap().code, KeyCode::Escape);
    }
}
