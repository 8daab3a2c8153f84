//! Comparison modes used by literal leaves.

/// How literal text is compared against the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compare {
    /// No preference; behaves as [`Compare::CaseSensitive`] unless an
    /// enclosing pattern chooses otherwise.
    #[default]
    None,
    /// Exact unit-by-unit comparison.
    CaseSensitive,
    /// Both sides are case folded before comparing.
    CaseInsensitive,
}

impl Compare {
    /// Resolve a leaf's own mode against the mode active at the call site.
    ///
    /// A leaf that was built with an explicit mode keeps it.
    pub fn or(self, active: Compare) -> Compare {
        match self {
            Compare::None => active,
            explicit => explicit,
        }
    }

    pub fn is_case_insensitive(self) -> bool {
        matches!(self, Compare::CaseInsensitive)
    }

    /// Compare two units under this mode.
    pub fn eq_char(self, a: char, b: char) -> bool {
        if self.is_case_insensitive() {
            fold(a) == fold(b)
        } else {
            a == b
        }
    }
}

/// Simple (one-to-one) case fold.
///
/// Characters whose lowercase form expands to several units are left alone,
/// so folding never changes the length of the text.
pub fn fold(ch: char) -> char {
    if ch.is_ascii() {
        return ch.to_ascii_lowercase();
    }
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(single), None) => single,
        _ => ch,
    }
}
