//! The cursor-bearing input consumed by patterns.
//!
//! All positions are **character** (not byte) indices into the buffer.

use std::cell::OnceCell;
use std::hash::{Hash, Hasher};
use std::io::{self, Read};

use ropey::RopeSlice;

use crate::compare::{Compare, fold};

/// Input text plus a cursor.
///
/// The cursor only moves through matching; callers observe it through
/// [`Source::position`] and can start over with [`Source::reset`].
#[derive(Debug, Clone)]
pub struct Source {
    buffer: Vec<char>,
    /// Lowercase copy of `buffer`, built once by [`Source::folded`].
    folded: Option<Vec<char>>,
    /// `buffer` as a string plus the byte offset of every unit (and of the
    /// end), built the first time an expression leaf runs.
    text: OnceCell<(String, Vec<usize>)>,
    position: usize,
}

/// Outcome of comparing a literal against the units under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Probe {
    /// The literal is present; the value is its length.
    Equal(usize),
    /// Enough input remains, but it differs from the literal.
    Different(usize),
    /// Fewer units remain than the literal needs.
    Short,
}

impl Source {
    pub fn new(text: &str) -> Self {
        Self::from_chars(text.chars().collect())
    }

    /// Create a source that pre-folds its text for case-insensitive matching.
    ///
    /// Folding happens once here, so every case-insensitive comparison after
    /// that only folds the pattern side.
    pub fn folded(text: &str) -> Self {
        let mut source = Self::new(text);
        source.folded = Some(source.buffer.iter().copied().map(fold).collect());
        source
    }

    fn from_chars(buffer: Vec<char>) -> Self {
        Self {
            buffer,
            folded: None,
            text: OnceCell::new(),
            position: 0,
        }
    }

    /// Read all of `reader` into a new source.
    ///
    /// Rollback repositions the cursor, so the whole input is held in memory.
    pub fn from_reader(mut reader: impl Read) -> io::Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self::new(&text))
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of units left after the cursor.
    pub fn len(&self) -> usize {
        self.buffer.len() - self.position
    }

    /// True when nothing is left to read.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Alias of [`Source::is_empty`] named after the end-of-input assertion.
    pub fn is_eof(&self) -> bool {
        self.is_empty()
    }

    /// Length of the whole buffer regardless of the cursor.
    pub fn total_len(&self) -> usize {
        self.buffer.len()
    }

    /// Move the cursor back to the start of the buffer.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Move the cursor back to an earlier `position`, e.g. the start of a
    /// previous [`MatchResult`](crate::MatchResult). The cursor never moves
    /// forward this way.
    pub fn rewind(&mut self, position: usize) {
        self.position = self.position.min(position);
    }

    /// Next unit, without advancing.
    pub fn peek(&self) -> Option<char> {
        self.buffer.get(self.position).copied()
    }

    /// Next `count` units, without advancing.
    pub fn peek_n(&self, count: usize) -> Option<&[char]> {
        self.buffer.get(self.position..self.position.checked_add(count)?)
    }

    /// Next unit, advancing past it.
    pub fn read(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }

    /// Next `count` units, advancing past them.
    pub fn read_n(&mut self, count: usize) -> Option<&[char]> {
        let start = self.position;
        let end = start.checked_add(count).filter(|&end| end <= self.buffer.len())?;
        self.position = end;
        Some(&self.buffer[start..end])
    }

    /// Units in `start..start + length`, clamped to the buffer.
    pub fn slice(&self, start: usize, length: usize) -> &[char] {
        let start = start.min(self.buffer.len());
        let end = start.saturating_add(length).min(self.buffer.len());
        &self.buffer[start..end]
    }

    /// Units after the cursor.
    pub fn remaining(&self) -> &[char] {
        &self.buffer[self.position..]
    }

    /// Units after the cursor as a string slice.
    pub(crate) fn remaining_str(&self) -> &str {
        let (text, offsets) = self.text.get_or_init(|| {
            let text: String = self.buffer.iter().collect();
            let offsets = text
                .char_indices()
                .map(|(offset, _)| offset)
                .chain(std::iter::once(text.len()))
                .collect();
            (text, offsets)
        });
        &text[offsets[self.position]..]
    }

    pub(crate) fn set_position(&mut self, position: usize) {
        debug_assert!(position <= self.buffer.len());
        self.position = position.min(self.buffer.len());
    }

    pub(crate) fn advance(&mut self, count: usize) {
        self.set_position(self.position + count);
    }

    /// Compare `literal` against the units under the cursor.
    pub(crate) fn probe(&self, literal: &[char], compare: Compare) -> Probe {
        let Some(window) = self.peek_n(literal.len()) else {
            return Probe::Short;
        };
        let equal = if !compare.is_case_insensitive() {
            window == literal
        } else if let Some(folded) = &self.folded {
            let window = &folded[self.position..self.position + literal.len()];
            window.iter().zip(literal).all(|(&a, &b)| a == fold(b))
        } else {
            window.iter().zip(literal).all(|(&a, &b)| fold(a) == fold(b))
        };
        if equal {
            Probe::Equal(literal.len())
        } else {
            Probe::Different(literal.len())
        }
    }

    /// True when the next unit equals `ch` under `compare`.
    pub(crate) fn starts_with(&self, ch: char, compare: Compare) -> bool {
        self.peek().is_some_and(|next| compare.eq_char(next, ch))
    }
}

/// Two sources are equal when their text is, wherever their cursors are.
impl PartialEq for Source {
    fn eq(&self, other: &Self) -> bool {
        self.buffer == other.buffer
    }
}

impl Eq for Source {}

impl Hash for Source {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.buffer.hash(state);
    }
}

impl From<&str> for Source {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Source {
    fn from(text: String) -> Self {
        Self::new(&text)
    }
}

impl From<&[char]> for Source {
    fn from(chars: &[char]) -> Self {
        Self::from_chars(chars.to_vec())
    }
}

impl From<RopeSlice<'_>> for Source {
    fn from(slice: RopeSlice<'_>) -> Self {
        Self::from_chars(slice.chars().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ropey::Rope;

    #[test]
    fn new_source_starts_at_zero() {
        let source = Source::new("hello");
        assert_eq!(source.position(), 0);
        assert_eq!(source.len(), 5);
        assert!(!source.is_eof());
    }

    #[test]
    fn empty_source_is_eof() {
        let source = Source::new("");
        assert!(source.is_eof());
        assert_eq!(source.peek(), None);
    }

    #[test]
    fn read_advances_peek_does_not() {
        let mut source = Source::new("abc");
        assert_eq!(source.peek(), Some('a'));
        assert_eq!(source.peek(), Some('a'));
        assert_eq!(source.read(), Some('a'));
        assert_eq!(source.position(), 1);
        assert_eq!(source.read_n(2), Some(&['b', 'c'][..]));
        assert!(source.is_eof());
        assert_eq!(source.read(), None);
    }

    #[test]
    fn read_n_past_end_leaves_cursor() {
        let mut source = Source::new("ab");
        assert_eq!(source.read_n(3), None);
        assert_eq!(source.position(), 0);
        assert_eq!(source.peek_n(2), Some(&['a', 'b'][..]));
    }

    #[test]
    fn length_tracks_position() {
        let mut source = Source::new("héllo");
        source.read_n(2);
        assert_eq!(source.len(), 3);
        assert_eq!(source.total_len(), 5);
        source.reset();
        assert_eq!(source.len(), 5);
    }

    #[test]
    fn rewind_only_moves_back() {
        let mut source = Source::new("abcdef");
        source.read_n(4);
        source.rewind(2);
        assert_eq!(source.position(), 2);
        source.rewind(5);
        assert_eq!(source.position(), 2);
    }

    #[test]
    fn remaining_str_follows_cursor() {
        let mut source = Source::new("héllo wörld");
        assert_eq!(source.remaining_str(), "héllo wörld");
        source.read_n(7);
        assert_eq!(source.remaining_str(), "örld");
        source.read_n(4);
        assert_eq!(source.remaining_str(), "");
    }

    #[test]
    fn equality_ignores_cursor() {
        let a = Source::new("same");
        let mut b = Source::new("same");
        b.read();
        assert_eq!(a, b);
        assert_ne!(a, Source::new("other"));
        let set: std::collections::HashSet<Source> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn probe_reports_short_input() {
        let source = Source::new("ab");
        let literal: Vec<char> = "abc".chars().collect();
        assert_eq!(source.probe(&literal, Compare::None), Probe::Short);
    }

    #[test]
    fn probe_uses_folded_buffer() {
        let literal: Vec<char> = "HeLLo".chars().collect();
        let folded = Source::folded("hello");
        let plain = Source::new("HELLO");
        assert_eq!(
            folded.probe(&literal, Compare::CaseInsensitive),
            Probe::Equal(5)
        );
        assert_eq!(
            plain.probe(&literal, Compare::CaseInsensitive),
            Probe::Equal(5)
        );
        assert_eq!(
            plain.probe(&literal, Compare::CaseSensitive),
            Probe::Different(5)
        );
    }

    #[test]
    fn folded_source_keeps_original_text() {
        let source = Source::folded("ABC");
        assert_eq!(source.peek(), Some('A'));
    }

    #[test]
    fn from_rope_slice() {
        let rope = Rope::from_str("one\ntwo\n");
        let source = Source::from(rope.line(1));
        assert_eq!(source.remaining().iter().collect::<String>(), "two\n");
    }

    #[test]
    fn from_reader_reads_everything() {
        let source = Source::from_reader("line one\nline two".as_bytes()).unwrap();
        assert_eq!(source.len(), 17);
    }
}
