// SPDX-License-Identifier: MIT
//
// Terminal input decoder.
//
// Turns raw TTY bytes into `Key`s from the pyre key vocabulary:
//
// - printable ASCII (uppercase letters become Shift + the lowercase key)
// - Ctrl+letter control bytes, Tab, Enter, Backspace (0x08 and 0x7F)
// - Escape, and Alt+key as an ESC prefix
// - CSI and SS3 arrows, xterm modifier parameters included
// - CSI 3~ for Delete
// - UTF-8, which only matters for skipping whole characters cleanly
//
// Anything outside the vocabulary (function keys, `!`, `é`, mouse
// reports) is consumed and dropped.
//
// Sequences can straddle reads, so the decoder keeps unconsumed bytes.
// A lone ESC is ambiguous until more bytes arrive or a short timeout
// passes; the caller then calls `flush` to turn it into Escape.

use pyre_term::key::{Key, KeyCode, KeyMod};

// ─── Decoder ─────────────────────────────────────────────────────────────────

/// Incremental byte-to-key decoder.
#[derive(Debug, Default)]
pub struct Decoder {
    /// Bytes not yet decoded, waiting for the rest of a sequence.
    buf: Vec<u8>,
}

impl Decoder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    /// Feed bytes and return every key they complete.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Key> {
        self.buf.extend_from_slice(data);
        let mut keys = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Key(key, consumed) => {
                    keys.push(key);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => {
                    tracing::trace!(bytes = ?&self.buf[pos..pos + n], "unmapped input");
                    pos += n;
                }
            }
        }

        self.buf.drain(..pos);
        keys
    }

    /// Whether bytes are waiting for the rest of a sequence.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Resolve whatever is pending as if no more bytes will come.
    ///
    /// A lone ESC becomes Escape. The rest of an unfinished sequence is
    /// decoded byte by byte, so `ESC [` yields Escape then `[`.
    pub fn flush(&mut self) -> Vec<Key> {
        let pending = std::mem::take(&mut self.buf);
        let mut keys = Vec::new();
        for &byte in &pending {
            let key = match byte {
                0x1B => Some(Key::plain(KeyCode::Escape)),
                b @ 0x20..=0x7E => char_key(char::from(b), KeyMod::NONE),
                b => control_key(b),
            };
            keys.extend(key);
        }
        keys
    }
}

/// Decode a complete byte string in one go, flushing at the end.
///
/// ```
/// use pyre_render::input::decode_keys;
/// use pyre_term::key::{Key, KeyCode, KeyMod};
///
/// let keys = decode_keys(b"aB\x1b[1;5A\x1b");
/// assert_eq!(keys, vec![
///     Key::plain(KeyCode::Char('a')),
///     Key::new(KeyCode::Char('b'), KeyMod::SHIFT),
///     Key::new(KeyCode::Up, KeyMod::CTRL),
///     Key::plain(KeyCode::Escape),
/// ]);
/// ```
#[must_use]
pub fn decode_keys(bytes: &[u8]) -> Vec<Key> {
    let mut decoder = Decoder::new();
    let mut keys = decoder.advance(bytes);
    keys.extend(decoder.flush());
    keys
}

// ─── Parsing ─────────────────────────────────────────────────────────────────
//
// Pure functions over `buf`: each reports what it found and how many bytes
// that took.

enum Parsed {
    Key(Key, usize),
    /// Need more bytes.
    Incomplete,
    /// Not in the vocabulary; drop this many bytes.
    Skip(usize),
}

impl Parsed {
    fn or_skip(key: Option<Key>, consumed: usize) -> Self {
        key.map_or(Self::Skip(consumed), |k| Self::Key(k, consumed))
    }
}

fn try_parse(buf: &[u8]) -> Parsed {
    match buf[0] {
        0x1B => parse_escape(buf),
        b @ 0x20..=0x7E => Parsed::or_skip(char_key(char::from(b), KeyMod::NONE), 1),
        0xC0..=0xFF => parse_utf8(buf),
        b => Parsed::or_skip(control_key(b), 1),
    }
}

fn parse_escape(buf: &[u8]) -> Parsed {
    let Some(&next) = buf.get(1) else {
        return Parsed::Incomplete;
    };
    match next {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        0x1B => Parsed::Key(Key::new(KeyCode::Escape, KeyMod::ALT), 2),
        b @ 0x20..=0x7E => Parsed::or_skip(char_key(char::from(b), KeyMod::ALT), 2),
        b @ (0x00..=0x1A | 0x7F) => Parsed::or_skip(
            control_key(b).map(|k| Key::new(k.code, k.mods | KeyMod::ALT)),
            2,
        ),
        // Not a prefix we know: the ESC stands alone.
        _ => Parsed::Key(Key::plain(KeyCode::Escape), 1),
    }
}

fn parse_csi(buf: &[u8]) -> Parsed {
    // Parameter and intermediate bytes run until a final byte in 0x40..=0x7E.
    let mut end = 2;
    while let Some(&b) = buf.get(end) {
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        // Not part of any CSI: drop the prefix, parse this byte afresh.
        if !(0x20..=0x3F).contains(&b) {
            return Parsed::Skip(end);
        }
        end += 1;
    }
    let Some(&final_byte) = buf.get(end) else {
        return Parsed::Incomplete;
    };

    let params: Vec<u16> = csi_params(&buf[2..end]).collect();
    let mods = params.get(1).map_or(KeyMod::NONE, |&p| decode_modifiers(p));
    let consumed = end + 1;

    let code = match final_byte {
        b'~' if params.first() == Some(&3) => KeyCode::Delete,
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'Z' => return Parsed::Key(Key::new(KeyCode::Tab, KeyMod::SHIFT), consumed),
        _ => return Parsed::Skip(consumed),
    };
    Parsed::Key(Key::new(code, mods), consumed)
}

fn parse_ss3(buf: &[u8]) -> Parsed {
    let Some(&b) = buf.get(2) else {
        return Parsed::Incomplete;
    };
    let code = match b {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        _ => return Parsed::Skip(3),
    };
    Parsed::Key(Key::plain(code), 3)
}

fn parse_utf8(buf: &[u8]) -> Parsed {
    let expected = utf8_char_len(buf[0]);
    if expected == 0 {
        return Parsed::Skip(1);
    }
    if buf.len() < expected {
        return Parsed::Incomplete;
    }
    match std::str::from_utf8(&buf[..expected]) {
        Ok(s) => Parsed::or_skip(
            s.chars().next().and_then(|ch| char_key(ch, KeyMod::NONE)),
            expected,
        ),
        Err(_) => Parsed::Skip(1),
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// The key typing `ch`, with Shift added for uppercase letters.
fn char_key(ch: char, mods: KeyMod) -> Option<Key> {
    let code = KeyCode::from_char(ch)?;
    let shift = if ch.is_ascii_uppercase() {
        KeyMod::SHIFT
    } else {
        KeyMod::NONE
    };
    Some(Key::new(code, mods | shift))
}

/// Keys for C0 control bytes and DEL.
fn control_key(b: u8) -> Option<Key> {
    match b {
        0x00 => Some(Key::new(KeyCode::Space, KeyMod::CTRL)),
        0x08 | 0x7F => Some(Key::plain(KeyCode::Backspace)),
        0x09 => Some(Key::plain(KeyCode::Tab)),
        0x0A | 0x0D => Some(Key::plain(KeyCode::Enter)),
        b @ 0x01..=0x1A => Some(Key::new(
            KeyCode::Char(char::from(b'a' + b - 1)),
            KeyMod::CTRL,
        )),
        _ => None,
    }
}

/// Semicolon-separated numeric parameters. Empty fields read as 0.
fn csi_params(raw: &[u8]) -> impl Iterator<Item = u16> + '_ {
    raw.split(|&b| b == b';')
        .filter(move |_| !raw.is_empty())
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &d| {
                    acc.saturating_mul(10).saturating_add(u16::from(d - b'0'))
                })
        })
}

/// xterm modifier parameter: `1 + bitmask` with Shift=1, Alt=2, Ctrl=4.
fn decode_modifiers(param: u16) -> KeyMod {
    let bits = param.saturating_sub(1);
    let mut mods = KeyMod::NONE;
    if bits & 1 != 0 {
        mods |= KeyMod::SHIFT;
    }
    if bits & 2 != 0 {
        mods |= KeyMod::ALT;
    }
    if bits & 4 != 0 {
        mods |= KeyMod::CTRL;
    }
    mods
}

/// Byte length of a UTF-8 character from its lead byte; 0 if invalid.
const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(data: &[u8]) -> Vec<Key> {
        Decoder::new().advance(data)
    }

    fn parse_one(data: &[u8]) -> Key {
        let keys = parse(data);
        assert_eq!(keys.len(), 1, "expected 1 key, got {keys:?}");
        keys[0]
    }

    fn ch(c: char) -> Key {
        Key::plain(KeyCode::Char(c))
    }

    fn with(code: KeyCode, mods: KeyMod) -> Key {
        Key::new(code, mods)
    }

    // ── Printable ───────────────────────────────────────────────────────

    #[test]
    fn lowercase_letters_and_digits() {
        assert_eq!(parse(b"a9"), vec![ch('a'), ch('9')]);
    }

    #[test]
    fn uppercase_is_shift_plus_lowercase() {
        assert_eq!(parse_one(b"Q"), with(KeyCode::Char('q'), KeyMod::SHIFT));
    }

    #[test]
    fn space_and_symbols() {
        assert_eq!(
            parse(b" ;/\\"),
            vec![Key::plain(KeyCode::Space), ch(';'), ch('/'), ch('\\')]
        );
    }

    #[test]
    fn shifted_symbols_are_dropped() {
        assert_eq!(parse(b"!a~"), vec![ch('a')]);
    }

    #[test]
    fn non_ascii_is_dropped_whole() {
        assert_eq!(parse("é日x".as_bytes()), vec![ch('x')]);
    }

    // ── Control Bytes ───────────────────────────────────────────────────

    #[test]
    fn ctrl_letters() {
        assert_eq!(parse_one(b"\x01"), with(KeyCode::Char('a'), KeyMod::CTRL));
        assert_eq!(parse_one(b"\x11"), with(KeyCode::Char('q'), KeyMod::CTRL));
        assert_eq!(parse_one(b"\x1A"), with(KeyCode::Char('z'), KeyMod::CTRL));
    }

    #[test]
    fn ctrl_space_is_nul() {
        assert_eq!(parse_one(b"\x00"), with(KeyCode::Space, KeyMod::CTRL));
    }

    #[test]
    fn editing_keys() {
        assert_eq!(parse_one(b"\t"), Key::plain(KeyCode::Tab));
        assert_eq!(parse_one(b"\r"), Key::plain(KeyCode::Enter));
        assert_eq!(parse_one(b"\n"), Key::plain(KeyCode::Enter));
        assert_eq!(parse_one(b"\x08"), Key::plain(KeyCode::Backspace));
        assert_eq!(parse_one(b"\x7F"), Key::plain(KeyCode::Backspace));
        assert_eq!(parse_one(b"\x1b[3~"), Key::plain(KeyCode::Delete));
    }

    #[test]
    fn unmapped_controls_are_dropped() {
        assert_eq!(parse(b"\x1C\x1Fa"), vec![ch('a')]);
    }

    // ── Arrows ──────────────────────────────────────────────────────────

    #[test]
    fn csi_arrows() {
        assert_eq!(
            parse(b"\x1b[A\x1b[B\x1b[C\x1b[D"),
            vec![
                Key::plain(KeyCode::Up),
                Key::plain(KeyCode::Down),
                Key::plain(KeyCode::Right),
                Key::plain(KeyCode::Left),
            ]
        );
    }

    #[test]
    fn ss3_arrows() {
        assert_eq!(parse_one(b"\x1bOA"), Key::plain(KeyCode::Up));
        assert_eq!(parse_one(b"\x1bOD"), Key::plain(KeyCode::Left));
    }

    #[test]
    fn arrow_modifiers() {
        assert_eq!(parse_one(b"\x1b[1;2A"), with(KeyCode::Up, KeyMod::SHIFT));
        assert_eq!(parse_one(b"\x1b[1;3B"), with(KeyCode::Down, KeyMod::ALT));
        assert_eq!(parse_one(b"\x1b[1;5C"), with(KeyCode::Right, KeyMod::CTRL));
        assert_eq!(
            parse_one(b"\x1b[1;6D"),
            with(KeyCode::Left, KeyMod::CTRL | KeyMod::SHIFT)
        );
    }

    #[test]
    fn ctrl_delete() {
        assert_eq!(parse_one(b"\x1b[3;5~"), with(KeyCode::Delete, KeyMod::CTRL));
    }

    #[test]
    fn shift_tab() {
        assert_eq!(parse_one(b"\x1b[Z"), with(KeyCode::Tab, KeyMod::SHIFT));
    }

    #[test]
    fn unknown_sequences_are_dropped() {
        // F5, Home, Insert, SS3 F1, then a real key.
        assert_eq!(parse(b"\x1b[15~\x1b[H\x1b[2~\x1bOPz"), vec![ch('z')]);
    }

    #[test]
    fn interrupted_csi_keeps_the_next_sequence() {
        assert_eq!(decode_keys(b"\x1b[\x1b[A"), vec![Key::plain(KeyCode::Up)]);
        assert_eq!(
            parse(b"\x1b[1;\x1b[1;5B"),
            vec![with(KeyCode::Down, KeyMod::CTRL)]
        );
    }

    #[test]
    fn interrupted_csi_keeps_the_interrupting_key() {
        assert_eq!(parse(b"\x1b[2\x11"), vec![with(KeyCode::Char('q'), KeyMod::CTRL)]);
    }

    // ── Alt ─────────────────────────────────────────────────────────────

    #[test]
    fn alt_prefix() {
        assert_eq!(parse_one(b"\x1bx"), with(KeyCode::Char('x'), KeyMod::ALT));
        assert_eq!(
            parse_one(b"\x1bX"),
            with(KeyCode::Char('x'), KeyMod::ALT | KeyMod::SHIFT)
        );
        assert_eq!(parse_one(b"\x1b\x1b"), with(KeyCode::Escape, KeyMod::ALT));
        assert_eq!(
            parse_one(b"\x1b\x01"),
            with(KeyCode::Char('a'), KeyMod::ALT | KeyMod::CTRL)
        );
        assert_eq!(parse_one(b"\x1b\x7F"), with(KeyCode::Backspace, KeyMod::ALT));
    }

    // ── Buffering ───────────────────────────────────────────────────────

    #[test]
    fn lone_escape_waits_for_flush() {
        let mut d = Decoder::new();
        assert!(d.advance(b"\x1b").is_empty());
        assert!(d.has_pending());
        assert_eq!(d.flush(), vec![Key::plain(KeyCode::Escape)]);
        assert!(!d.has_pending());
    }

    #[test]
    fn split_sequence_completes_across_reads() {
        let mut d = Decoder::new();
        assert!(d.advance(b"\x1b[1;").is_empty());
        assert_eq!(d.advance(b"5A"), vec![with(KeyCode::Up, KeyMod::CTRL)]);
        assert!(!d.has_pending());
    }

    #[test]
    fn split_utf8_completes_across_reads() {
        let mut d = Decoder::new();
        let bytes = "é".as_bytes();
        assert!(d.advance(&bytes[..1]).is_empty());
        assert!(d.has_pending());
        assert!(d.advance(&bytes[1..]).is_empty());
        assert!(!d.has_pending());
    }

    #[test]
    fn flush_decodes_partial_csi_bytewise() {
        let mut d = Decoder::new();
        d.advance(b"\x1b[");
        assert_eq!(d.flush(), vec![Key::plain(KeyCode::Escape), ch('[')]);
    }

    #[test]
    fn decode_keys_flushes_trailing_escape() {
        assert_eq!(
            decode_keys(b"\x11\x1b"),
            vec![
                with(KeyCode::Char('q'), KeyMod::CTRL),
                Key::plain(KeyCode::Escape)
            ]
        );
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    #[test]
    fn csi_params_parse() {
        assert_eq!(csi_params(b"1;5").collect::<Vec<_>>(), vec![1, 5]);
        assert_eq!(csi_params(b";2").collect::<Vec<_>>(), vec![0, 2]);
        assert!(csi_params(b"").next().is_none());
        assert_eq!(csi_params(b"99999999").collect::<Vec<_>>(), vec![u16::MAX]);
    }

    #[test]
    fn modifier_param_mapping() {
        assert_eq!(decode_modifiers(0), KeyMod::NONE);
        assert_eq!(decode_modifiers(1), KeyMod::NONE);
        assert_eq!(decode_modifiers(8), KeyMod::all());
    }
}
