//! The outcome of a single match attempt.

use crate::error::MatchError;
use crate::source::Source;

/// Where a match attempt started, how much it consumed, and whether it
/// failed.
///
/// Positions and lengths count characters.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    start: usize,
    length: usize,
    error: Option<MatchError>,
}

impl MatchResult {
    /// A fresh, successful, empty result starting at `start`.
    pub fn new(start: usize) -> Self {
        Self {
            start,
            length: 0,
            error: None,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Number of characters consumed.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// One past the last consumed character.
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&MatchError> {
        self.error.as_ref()
    }

    /// The matched text, copied out of `source`.
    pub fn text(&self, source: &Source) -> String {
        source.slice(self.start, self.length).iter().collect()
    }

    /// The matched part of `text`, assuming this result came from matching
    /// `text` from its first character.
    pub fn slice<'t>(&self, text: &'t str) -> &'t str {
        let byte_at = |chars: usize| {
            text.char_indices()
                .nth(chars)
                .map_or(text.len(), |(offset, _)| offset)
        };
        &text[byte_at(self.start)..byte_at(self.end())]
    }

    /// Turn a failure into an `Err`.
    pub fn into_result(self) -> Result<MatchResult, MatchError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    pub(crate) fn grow(&mut self, count: usize) {
        self.length += count;
    }

    pub(crate) fn fail(&mut self, error: MatchError) {
        self.error = Some(error);
    }

    /// Roll the length back to an earlier value and clear any error raised
    /// since.
    pub(crate) fn restore(&mut self, length: usize) {
        self.length = length;
        self.error = None;
    }
}

impl From<MatchResult> for bool {
    fn from(result: MatchResult) -> bool {
        result.is_success()
    }
}

impl From<&MatchResult> for bool {
    fn from(result: &MatchResult) -> bool {
        result.is_success()
    }
}
