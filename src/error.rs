//! Error types.
//!
//! Match-time failures ([`MatchError`]) travel inside a
//! [`MatchResult`](crate::MatchResult) and only become `Err` values when the
//! caller asks for it. Construction mistakes ([`PatternError`]) are returned
//! immediately from the builder that detected them.

use thiserror::Error;

use crate::pattern::Pattern;

/// Why a match attempt failed, with the fragment of the pattern that failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("reached the end of the source while matching {0}")]
    EndOfSource(Pattern),
    #[error("failed to consume {0}")]
    ConsumeFailed(Pattern),
    #[error("failed to neglect {0}")]
    NeglectFailed(Pattern),
}

impl MatchError {
    /// The pattern fragment that could not be matched.
    pub fn fragment(&self) -> &Pattern {
        match self {
            Self::EndOfSource(p) | Self::ConsumeFailed(p) | Self::NeglectFailed(p) => p,
        }
    }

    pub fn is_end_of_source(&self) -> bool {
        matches!(self, Self::EndOfSource(_))
    }
}

/// Errors raised while building a pattern.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatternError {
    /// A mutable pattern was combined or matched before it had a head.
    #[error("pattern undefined: a mutable pattern was used before anything was assigned to it")]
    Undefined,
    /// A required argument was empty.
    #[error("{0} must not be empty")]
    EmptyArgument(&'static str),
    /// An adapted expression can match away from the start of the input.
    #[error("expression {0:?} must be anchored to the start of input with `^` or `\\A`")]
    NotAnchored(String),
    #[error("invalid expression: {0}")]
    Regex(#[from] regex_syntax::Error),
    /// The expression parsed but could not be compiled, e.g. it is too large.
    #[error("failed to build expression: {0}")]
    Build(String),
}
