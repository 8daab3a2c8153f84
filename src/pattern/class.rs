//! Character class predicates behind the built-in category patterns.
//!
//! Letters, numbers and case come from `char`'s own Unicode tables. The
//! punctuation and symbol classes are exact over ASCII and cover the main
//! Unicode punctuation, currency, arrow and operator blocks beyond it.

use std::fmt;

/// One member of a custom character set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharClass {
    Single(char),
    /// Inclusive range.
    Range(char, char),
}

impl CharClass {
    pub fn contains(&self, ch: char) -> bool {
        match self {
            CharClass::Single(c) => *c == ch,
            CharClass::Range(lo, hi) => *lo <= ch && ch <= *hi,
        }
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharClass::Single(c) => write!(f, "{}", c.escape_debug()),
            CharClass::Range(lo, hi) => write!(f, "{}..{}", lo.escape_debug(), hi.escape_debug()),
        }
    }
}

/// Unicode letters.
pub fn is_letter(ch: char) -> bool {
    ch.is_alphabetic()
}

pub fn is_uppercase(ch: char) -> bool {
    ch.is_uppercase()
}

pub fn is_lowercase(ch: char) -> bool {
    ch.is_lowercase()
}

/// Unicode numbers (decimal digits, letter-like and other numerics).
pub fn is_number(ch: char) -> bool {
    ch.is_numeric()
}

pub fn is_punctuation(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_punctuation() && !is_ascii_symbol(ch);
    }
    matches!(
        ch,
        '\u{A1}' | '\u{A7}' | '\u{AB}' | '\u{B6}' | '\u{B7}' | '\u{BB}' | '\u{BF}'
            | '\u{2010}'..='\u{2027}'
            | '\u{2030}'..='\u{2043}'
            | '\u{2045}'..='\u{2051}'
            | '\u{2053}'..='\u{205E}'
            | '\u{2E00}'..='\u{2E4F}'
            | '\u{3001}'..='\u{3003}'
            | '\u{3008}'..='\u{3011}'
            | '\u{3014}'..='\u{301F}'
            | '\u{FF01}'..='\u{FF03}'
            | '\u{FF05}'..='\u{FF0A}'
            | '\u{FF0C}'..='\u{FF0F}'
    )
}

pub fn is_symbol(ch: char) -> bool {
    if ch.is_ascii() {
        return is_ascii_symbol(ch);
    }
    matches!(
        ch,
        '\u{A2}'..='\u{A6}' | '\u{A8}' | '\u{A9}' | '\u{AC}' | '\u{AE}'..='\u{B1}'
            | '\u{B4}' | '\u{B8}' | '\u{D7}' | '\u{F7}'
            | '\u{2044}' | '\u{2052}'
            | '\u{20A0}'..='\u{20C0}'
            | '\u{2100}'..='\u{214F}'
            | '\u{2190}'..='\u{23FF}'
            | '\u{2500}'..='\u{27BF}'
            | '\u{2900}'..='\u{2BFF}'
    )
}

/// ASCII characters in the Unicode symbol categories (Sc, Sk, Sm).
fn is_ascii_symbol(ch: char) -> bool {
    matches!(ch, '$' | '+' | '<' | '=' | '>' | '^' | '`' | '|' | '~')
}

/// Unicode separators (Zs, Zl, Zp).
pub fn is_separator(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

/// Single-unit line terminators. `"\r\n"` is handled by the pattern.
pub fn is_line_terminator(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\u{B}' | '\u{C}' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

pub fn is_whitespace(ch: char) -> bool {
    ch.is_whitespace()
}

/// Matches any unit.
pub fn is_any(_: char) -> bool {
    true
}
