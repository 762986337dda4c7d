// SPDX-License-Identifier: MIT
//
// Glyph: the content of one character cell.
//
// A glyph is a code-page-437 character code plus a foreground and a
// background color. Glyph equality over all three fields is what the
// dirty-cell grid uses to decide whether a write is a real change, so
// the type is small, `Copy`, and compares in one go.
//
// Character codes are CP437 indices (0–255) rather than Unicode scalars
// because that is what a glyph sheet is indexed by: a 16×16 grid of
// cells, one per code. Text written through the terminal API is mapped
// from Unicode to CP437 at the edge (`CharCode::from_char`); text backends
// map back with `CharCode::to_char`.

use std::fmt;

use crate::color::Color;

// ─── CP437 ───────────────────────────────────────────────────────────────────

/// Unicode rendering of every CP437 code, in code order.
///
/// Code 0 has no graphic; it is shown as a space.
#[rustfmt::skip]
const CP437: [char; 256] = [
    // 0x00
    ' ', '☺', '☻', '♥', '♦', '♣', '♠', '•', '◘', '○', '◙', '♂', '♀', '♪', '♫', '☼',
    // 0x10
    '►', '◄', '↕', '‼', '¶', '§', '▬', '↨', '↑', '↓', '→', '←', '∟', '↔', '▲', '▼',
    // 0x20
    ' ', '!', '"', '#', '$', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/',
    // 0x30
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', ':', ';', '<', '=', '>', '?',
    // 0x40
    '@', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O',
    // 0x50
    'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', '[', '\\', ']', '^', '_',
    // 0x60
    '`', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o',
    // 0x70
    'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', '{', '|', '}', '~', '⌂',
    // 0x80
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å',
    // 0x90
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ',
    // 0xA0
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»',
    // 0xB0
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐',
    // 0xC0
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧',
    // 0xD0
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀',
    // 0xE0
    'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩',
    // 0xF0
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{a0}',
];

// ─── CharCode ────────────────────────────────────────────────────────────────

/// A code-page-437 character code: the index of a glyph in a glyph sheet.
///
/// ```
/// use pyre_term::glyph::CharCode;
///
/// assert_eq!(CharCode::from_char('A'), Some(CharCode(0x41)));
/// assert_eq!(CharCode::from_char('█'), Some(CharCode(0xDB)));
/// assert_eq!(CharCode::from_char('日'), None);
/// assert_eq!(CharCode::lossy('日'), CharCode::QUESTION);
/// assert_eq!(CharCode(0x03).to_char(), '♥');
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CharCode(pub u8);

impl CharCode {
    /// The blank cell character.
    pub const SPACE: Self = Self(0x20);

    /// Substitute for characters CP437 cannot express.
    pub const QUESTION: Self = Self(0x3F);

    /// Full block, handy for solid fills.
    pub const FULL_BLOCK: Self = Self(0xDB);

    /// Map a Unicode character to its CP437 code.
    ///
    /// Printable ASCII maps to itself. Everything else is looked up in the
    /// graphical CP437 table. Returns `None` when CP437 has no such glyph.
    #[must_use]
    pub fn from_char(ch: char) -> Option<Self> {
        if ch == ' ' || ch.is_ascii_graphic() {
            return u8::try_from(ch).ok().map(Self);
        }
        CP437
            .iter()
            .skip(1)
            .position(|&c| c == ch)
            .and_then(|i| u8::try_from(i + 1).ok())
            .map(Self)
    }

    /// Like [`from_char`](Self::from_char), substituting `?` when unmapped.
    #[inline]
    #[must_use]
    pub fn lossy(ch: char) -> Self {
        Self::from_char(ch).unwrap_or(Self::QUESTION)
    }

    /// The Unicode character this code displays as.
    #[inline]
    #[must_use]
    pub const fn to_char(self) -> char {
        CP437[self.0 as usize]
    }

    /// Position of this code in a 16×16 glyph sheet: `(column, row)`.
    #[inline]
    #[must_use]
    pub const fn sheet_cell(self) -> (u8, u8) {
        (self.0 % 16, self.0 / 16)
    }
}

impl From<u8> for CharCode {
    #[inline]
    fn from(code: u8) -> Self {
        Self(code)
    }
}

impl fmt::Debug for CharCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CharCode({:#04x} {:?})", self.0, self.to_char())
    }
}

// ─── Glyph ───────────────────────────────────────────────────────────────────

/// One cell's content: a character code with foreground and background.
///
/// Two glyphs are equal iff code, foreground, and background all match.
///
/// ```
/// use pyre_term::color::Color;
/// use pyre_term::glyph::Glyph;
///
/// let g = Glyph::from_char('@').with_fg(Color::BRIGHT_YELLOW);
/// assert_eq!(g.bg, Color::BLACK);
/// assert_ne!(g, Glyph::from_char('@'));
/// assert_eq!(Glyph::CLEAR, Glyph::default());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Glyph {
    pub code: CharCode,
    pub fg: Color,
    pub bg: Color,
}

impl Glyph {
    /// Default foreground for new glyphs.
    pub const DEFAULT_FG: Color = Color::WHITE;

    /// Default background for new glyphs.
    pub const DEFAULT_BG: Color = Color::BLACK;

    /// An empty cell: a space in the default colors.
    pub const CLEAR: Self = Self::new(CharCode::SPACE, Self::DEFAULT_FG, Self::DEFAULT_BG);

    #[inline]
    #[must_use]
    pub const fn new(code: CharCode, fg: Color, bg: Color) -> Self {
        Self { code, fg, bg }
    }

    /// A glyph for `ch` in the default colors (`?` if CP437 lacks it).
    #[inline]
    #[must_use]
    pub fn from_char(ch: char) -> Self {
        Self::new(CharCode::lossy(ch), Self::DEFAULT_FG, Self::DEFAULT_BG)
    }

    /// A space with the given background.
    #[inline]
    #[must_use]
    pub const fn blank(bg: Color) -> Self {
        Self::new(CharCode::SPACE, Self::DEFAULT_FG, bg)
    }

    #[inline]
    #[must_use]
    pub const fn with_fg(self, fg: Color) -> Self {
        Self { fg, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn with_bg(self, bg: Color) -> Self {
        Self { bg, ..self }
    }
}

impl Default for Glyph {
    #[inline]
    fn default() -> Self {
        Self::CLEAR
    }
}

impl fmt::Debug for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Glyph({:?}", self.code.to_char())?;
        if self.fg != Self::DEFAULT_FG {
            write!(f, ", fg={}", self.fg)?;
        }
        if self.bg != Self::DEFAULT_BG {
            write!(f, ", bg={}", self.bg)?;
        }
        write!(f, ")")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem;

    // ── Layout ──────────────────────────────────────────────────────────

    #[test]
    fn glyph_is_7_bytes() {
        assert_eq!(mem::size_of::<Glyph>(), 7);
    }

    // ── CharCode mapping ────────────────────────────────────────────────

    #[test]
    fn ascii_maps_to_itself() {
        for b in 0x20u8..=0x7E {
            let ch = char::from(b);
            assert_eq!(CharCode::from_char(ch), Some(CharCode(b)), "{ch:?}");
            assert_eq!(CharCode(b).to_char(), ch);
        }
    }

    #[test]
    fn every_graphic_code_round_trips() {
        // 0x00 and 0x20 both display as space; space resolves to 0x20.
        for b in 1u8..=255 {
            let code = CharCode(b);
            assert_eq!(CharCode::from_char(code.to_char()), Some(code), "{code:?}");
        }
    }

    #[test]
    fn table_has_no_duplicates_besides_space() {
        let mut seen = std::collections::HashSet::new();
        for &c in &CP437[1..] {
            assert!(seen.insert(c), "duplicate {c:?}");
        }
    }

    #[test]
    fn control_range_is_graphical() {
        assert_eq!(CharCode::from_char('☺'), Some(CharCode(0x01)));
        assert_eq!(CharCode::from_char('▼'), Some(CharCode(0x1F)));
        assert_eq!(CharCode::from_char('⌂'), Some(CharCode(0x7F)));
    }

    #[test]
    fn box_drawing_codes() {
        assert_eq!(CharCode::from_char('─'), Some(CharCode(0xC4)));
        assert_eq!(CharCode::from_char('│'), Some(CharCode(0xB3)));
        assert_eq!(CharCode::from_char('┌'), Some(CharCode(0xDA)));
    }

    #[test]
    fn control_characters_are_unmapped() {
        assert_eq!(CharCode::from_char('\n'), None);
        assert_eq!(CharCode::from_char('\t'), None);
    }

    #[test]
    fn lossy_substitutes_question_mark() {
        assert_eq!(CharCode::lossy('日'), CharCode::QUESTION);
        assert_eq!(CharCode::lossy('a'), CharCode(b'a'));
    }

    #[test]
    fn sheet_cell_position() {
        assert_eq!(CharCode(0x00).sheet_cell(), (0, 0));
        assert_eq!(CharCode(0x41).sheet_cell(), (1, 4));
        assert_eq!(CharCode(0xFF).sheet_cell(), (15, 15));
    }

    // ── Glyph ───────────────────────────────────────────────────────────

    #[test]
    fn clear_is_space_on_black() {
        assert_eq!(Glyph::CLEAR.code, CharCode::SPACE);
        assert_eq!(Glyph::CLEAR.fg, Color::WHITE);
        assert_eq!(Glyph::CLEAR.bg, Color::BLACK);
    }

    #[test]
    fn equality_covers_all_fields() {
        let g = Glyph::from_char('x');
        assert_eq!(g, Glyph::new(CharCode(b'x'), Color::WHITE, Color::BLACK));
        assert_ne!(g, g.with_fg(Color::RED));
        assert_ne!(g, g.with_bg(Color::RED));
        assert_ne!(g, Glyph::from_char('y'));
    }

    #[test]
    fn blank_keeps_default_fg() {
        let g = Glyph::blank(Color::BLUE);
        assert_eq!(g.code, CharCode::SPACE);
        assert_eq!(g.fg, Glyph::DEFAULT_FG);
        assert_eq!(g.bg, Color::BLUE);
    }

    #[test]
    fn blank_on_black_is_clear() {
        assert_eq!(Glyph::blank(Color::BLACK), Glyph::CLEAR);
    }

    #[test]
    fn debug_omits_default_colors() {
        assert_eq!(format!("{:?}", Glyph::from_char('A')), "Glyph('A')");
        let dbg = format!("{:?}", Glyph::from_char('A').with_bg(Color::BRIGHT_RED));
        assert_eq!(dbg, "Glyph('A', bg=#ff0000)");
    }
}
