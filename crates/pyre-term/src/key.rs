// SPDX-License-Identifier: MIT
//
// Key vocabulary.
//
// The set of keys is small: what a plain US keyboard produces
// without function keys or a numpad. Letters are always stored lowercase;
// whether Shift was held is carried in the modifiers, so `Shift+a` and a
// capital `A` read from a terminal decode to the same `Key`.

use std::borrow::Cow;
use std::fmt;

use bitflags::bitflags;

/// Symbol keys on a US layout, in the order the keyboard lists them.
const SYMBOLS: &[char] = &[';', '=', ',', '-', '.', '/', '`', '[', '\\', ']', '\''];

// ─── KeyCode ─────────────────────────────────────────────────────────────────

/// Identity of a key.
///
/// Digits, lowercase letters, and the symbols `` ; = , - . / ` [ \ ] ' ``
/// use [`Char`](KeyCode::Char). Build it through
/// [`from_char`](KeyCode::from_char) to stay inside that set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    // ── Control keys ────────────────────────────────────────────
    Space,
    Tab,
    Enter,
    Backspace,
    Delete,
    Escape,
    // ── Arrows ──────────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
}

impl KeyCode {
    /// The key that types `ch`, if it is in the vocabulary.
    ///
    /// Uppercase letters map to their lowercase key; `' '` maps to
    /// [`Space`](KeyCode::Space).
    #[must_use]
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            ' ' => Some(Self::Space),
            '0'..='9' | 'a'..='z' => Some(Self::Char(ch)),
            'A'..='Z' => Some(Self::Char(ch.to_ascii_lowercase())),
            _ if SYMBOLS.contains(&ch) => Some(Self::Char(ch)),
            _ => None,
        }
    }

    /// Printable text for the key.
    ///
    /// Digits and symbols are their character, letters their uppercase
    /// letter, Space a single space and Tab four spaces. Other keys give
    /// their name.
    #[must_use]
    pub fn name(self) -> Cow<'static, str> {
        match self {
            Self::Char(ch) => Cow::Owned(ch.to_ascii_uppercase().to_string()),
            Self::Space => Cow::Borrowed(" "),
            Self::Tab => Cow::Borrowed("    "),
            Self::Enter => Cow::Borrowed("Enter"),
            Self::Backspace => Cow::Borrowed("Backspace"),
            Self::Delete => Cow::Borrowed("Delete"),
            Self::Escape => Cow::Borrowed("Escape"),
            Self::Up => Cow::Borrowed("Up"),
            Self::Down => Cow::Borrowed("Down"),
            Self::Left => Cow::Borrowed("Left"),
            Self::Right => Cow::Borrowed("Right"),
        }
    }

    /// Space, Tab, Enter, Backspace, Delete, and Escape.
    #[inline]
    #[must_use]
    pub const fn is_control(self) -> bool {
        matches!(
            self,
            Self::Space | Self::Tab | Self::Enter | Self::Backspace | Self::Delete | Self::Escape
        )
    }

    #[inline]
    #[must_use]
    pub const fn is_arrow(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }
}

// ─── KeyMod ──────────────────────────────────────────────────────────────────

bitflags! {
    /// Modifier keys held with a key. Independently combinable.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct KeyMod: u8 {
        const NONE  = 0;
        const CTRL  = 0b0000_0001;
        const SHIFT = 0b0000_0010;
        const ALT   = 0b0000_0100;
    }
}

// ─── Key ─────────────────────────────────────────────────────────────────────

/// A key with its modifiers.
///
/// ```
/// use pyre_term::key::{Key, KeyCode, KeyMod};
///
/// let quit = Key::new(KeyCode::Char('q'), KeyMod::CTRL);
/// assert_eq!(quit.to_string(), "Ctrl+Q");
/// assert!(Key::plain(KeyCode::Escape).mods.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub code: KeyCode,
    pub mods: KeyMod,
}

impl Key {
    #[inline]
    #[must_use]
    pub const fn new(code: KeyCode, mods: KeyMod) -> Self {
        Self { code, mods }
    }

    /// A key with no modifiers.
    #[inline]
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyMod::NONE)
    }

    #[inline]
    #[must_use]
    pub const fn ctrl(self) -> bool {
        self.mods.contains(KeyMod::CTRL)
    }
}

impl From<KeyCode> for Key {
    #[inline]
    fn from(code: KeyCode) -> Self {
        Self::plain(code)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, label) in [
            (KeyMod::CTRL, "Ctrl+"),
            (KeyMod::ALT, "Alt+"),
            (KeyMod::SHIFT, "Shift+"),
        ] {
            if self.mods.contains(flag) {
                f.write_str(label)?;
            }
        }
        match self.code {
            KeyCode::Space => f.write_str("Space"),
            KeyCode::Tab => f.write_str("Tab"),
            code => f.write_str(&code.name()),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── KeyCode ─────────────────────────────────────────────────────────

    #[test]
    fn from_char_covers_vocabulary() {
        assert_eq!(KeyCode::from_char('7'), Some(KeyCode::Char('7')));
        assert_eq!(KeyCode::from_char('q'), Some(KeyCode::Char('q')));
        assert_eq!(KeyCode::from_char('Q'), Some(KeyCode::Char('q')));
        assert_eq!(KeyCode::from_char(' '), Some(KeyCode::Space));
        for &sym in SYMBOLS {
            assert_eq!(KeyCode::from_char(sym), Some(KeyCode::Char(sym)), "{sym:?}");
        }
    }

    #[test]
    fn from_char_rejects_outside_vocabulary() {
        for ch in ['!', '@', '~', 'é', '\t', '\n'] {
            assert_eq!(KeyCode::from_char(ch), None, "{ch:?}");
        }
    }

    #[test]
    fn names() {
        assert_eq!(KeyCode::Char('5').name(), "5");
        assert_eq!(KeyCode::Char('a').name(), "A");
        assert_eq!(KeyCode::Char('\\').name(), "\\");
        assert_eq!(KeyCode::Space.name(), " ");
        assert_eq!(KeyCode::Tab.name(), "    ");
        assert_eq!(KeyCode::Escape.name(), "Escape");
        assert_eq!(KeyCode::Left.name(), "Left");
    }

    #[test]
    fn control_keys() {
        assert!(KeyCode::Enter.is_control());
        assert!(KeyCode::Space.is_control());
        assert!(!KeyCode::Up.is_control());
        assert!(!KeyCode::Char('a').is_control());
        assert!(KeyCode::Up.is_arrow());
    }

    // ── KeyMod ──────────────────────────────────────────────────────────

    #[test]
    fn modifier_bits() {
        assert_eq!(KeyMod::NONE.bits(), 0);
        assert_eq!(KeyMod::CTRL.bits(), 1);
        assert_eq!(KeyMod::SHIFT.bits(), 2);
        assert_eq!(KeyMod::ALT.bits(), 4);
        assert_eq!((KeyMod::CTRL | KeyMod::ALT).bits(), 5);
    }

    // ── Key ─────────────────────────────────────────────────────────────

    #[test]
    fn display_lists_modifiers() {
        let k = Key::new(KeyCode::Up, KeyMod::CTRL | KeyMod::SHIFT);
        assert_eq!(k.to_string(), "Ctrl+Shift+Up");
        assert_eq!(Key::plain(KeyCode::Space).to_string(), "Space");
    }

    #[test]
    fn ctrl_helper() {
        assert!(Key::new(KeyCode::Char('c'), KeyMod::CTRL).ctrl());
        assert!(!Key::from(KeyCode::Char('c')).ctrl());
    }
}
