//! Composable patterns.
//!
//! A [`Pattern`] is a handle to an immutable graph of matcher nodes. Patterns
//! are built from literals and the built-in classes, then combined:
//!
//! | Method            | Operator  | Meaning                                   |
//! |-------------------|-----------|-------------------------------------------|
//! | `a.or(b)`         | `a \| b`  | `a`, or else `b` (first match wins)       |
//! | `a.then(b)`       | `a & b`   | `a` followed by `b`                       |
//! | `a.optional()`    | `-a`      | `a` if present                            |
//! | `a.many()`        |           | one or more `a`, greedily                 |
//! | `a.repeat(n)`     | `a * n`   | exactly `n` times `a`                     |
//! | `a.not()`         | `!a`      | anything but `a`                          |
//! | `a.except()`      |           | one character where `a` does not match    |
//! | `a.capture(&c)`   |           | `a`, remembering the text in `c`          |
//! | `a.with(mode)`    |           | `a` compared under `mode`                 |
//!
//! Combining never changes the operands; every call returns a new pattern
//! that shares their nodes.

pub mod builtin;
pub mod class;
mod mutable;
pub(crate) mod node;


use std::fmt;
use std::ops::{BitAnd, BitOr, Mul, Neg, Not};
use std::rc::Rc;

use regex_automata::meta;
use regex_syntax::hir::Look;

use crate::capture::Capture;
use crate::compare::Compare;
use crate::error::PatternError;
use crate::match_result::MatchResult;
use crate::source::Source;

pub use class::CharClass;
pub use mutable::MutablePattern;

use node::{Checker, Node};

/// A reusable, immutable pattern.
#[derive(Clone)]
pub struct Pattern {
    head: Rc<Node>,
}

type Step = fn(&Rc<Node>, &mut Source, &mut MatchResult, Compare);

impl Pattern {
    pub(crate) fn from_node(head: Rc<Node>) -> Self {
        Self { head }
    }

    fn wrap(node: Node) -> Self {
        Self::from_node(Rc::new(node))
    }

    pub(crate) fn node(&self) -> &Rc<Node> {
        &self.head
    }

    pub(crate) fn checker(name: &'static str, test: fn(char) -> bool) -> Self {
        Self::wrap(Node::Checker(Checker::Named { name, test }))
    }

    /// Any single character in `lo..=hi`.
    pub fn range(lo: char, hi: char) -> Self {
        Self::wrap(Node::Checker(Checker::Set(vec![CharClass::Range(lo, hi)])))
    }

    /// Any single character from `chars`.
    pub fn one_of(chars: &str) -> Result<Self, PatternError> {
        if chars.is_empty() {
            return Err(PatternError::EmptyArgument("character set"));
        }
        Ok(Self::set(chars.chars().map(CharClass::Single).collect()))
    }

    /// Any single character belonging to one of `classes`.
    pub fn set(classes: Vec<CharClass>) -> Self {
        Self::wrap(Node::Checker(Checker::Set(classes)))
    }

    /// Match `capture`'s current value literally.
    pub fn backreference(capture: &Capture) -> Self {
        Self::wrap(Node::Backreference {
            capture: capture.clone(),
            compare: Compare::None,
        })
    }

    /// Adapt a regular expression.
    ///
    /// Every match of the expression must begin with `^` or `\A`, so that it
    /// can only match at the cursor; `^a|b` is rejected because of its `b`
    /// branch. Multi-line `(?m)^` does not count as an anchor.
    pub fn regex(expression: &str) -> Result<Self, PatternError> {
        let hir = regex_syntax::parse(expression)?;
        if !hir.properties().look_set_prefix().contains(Look::Start) {
            return Err(PatternError::NotAnchored(expression.to_string()));
        }
        let regex = meta::Builder::new()
            .build_from_hir(&hir)
            .map_err(|err| PatternError::Build(err.to_string()))?;
        Ok(Self::wrap(Node::Regex {
            regex,
            expression: expression.into(),
        }))
    }

    /// `self`, or else `other`. The first alternative that matches wins, even
    /// when `other` would match more.
    pub fn or(&self, other: impl Into<Pattern>) -> Pattern {
        Self::wrap(Node::Alternator(self.head.clone(), other.into().head))
    }

    /// `self` followed by `other`.
    pub fn then(&self, other: impl Into<Pattern>) -> Pattern {
        Self::wrap(Node::Concatenator(self.head.clone(), other.into().head))
    }

    /// `self` if it is present; never fails.
    pub fn optional(&self) -> Pattern {
        Self::wrap(Node::Optor(self.head.clone()))
    }

    /// One or more `self`, as many as match.
    pub fn many(&self) -> Pattern {
        Self::wrap(Node::Spanner(self.head.clone()))
    }

    /// Exactly `times` repetitions of `self`.
    pub fn repeat(&self, times: usize) -> Pattern {
        Self::wrap(Node::Repeater(self.head.clone(), times))
    }

    /// Anything that `self` does not match, one `self`-sized step at a time.
    pub fn not(&self) -> Pattern {
        Self::wrap(Node::Negator(self.head.clone()))
    }

    /// Any single character, unless `self` matches at the cursor.
    ///
    /// Unlike [`Pattern::not`], which steps over as many units as `self`
    /// examines, this always advances by exactly one.
    pub fn except(&self) -> Pattern {
        Self::wrap(Node::Except(self.head.clone()))
    }

    /// `self`, storing the matched text in `capture` when it succeeds.
    pub fn capture(&self, capture: &Capture) -> Pattern {
        Self::wrap(Node::Capturer(self.head.clone(), capture.clone()))
    }

    /// `self` with literals compared under `compare`.
    pub fn with(&self, compare: Compare) -> Pattern {
        match &*self.head {
            Node::Char { ch, .. } => Self::wrap(Node::Char { ch: *ch, compare }),
            Node::Literal { text, .. } => Self::wrap(Node::Literal {
                text: text.clone(),
                compare,
            }),
            Node::Backreference { capture, .. } => Self::wrap(Node::Backreference {
                capture: capture.clone(),
                compare,
            }),
            _ => Self::wrap(Node::Modal(self.head.clone(), compare)),
        }
    }

    /// Ordinary patterns are always sealed; this returns `self` unchanged.
    pub fn seal(self) -> Pattern {
        self
    }

    /// True when this pattern stands for exactly `text` and nothing else.
    pub fn represents(&self, text: &str) -> bool {
        self.head
            .literal_text()
            .is_some_and(|literal| literal.iter().copied().eq(text.chars()))
    }

    /// Match against the start of `text`.
    ///
    /// # Panics
    ///
    /// Panics if the pattern reaches a recursive reference to a
    /// [`MutablePattern`] that was never defined or has been dropped.
    pub fn consume(&self, text: &str) -> MatchResult {
        self.consume_source(&mut Source::new(text))
    }

    /// Match against the start of `chars`.
    pub fn consume_chars(&self, chars: &[char]) -> MatchResult {
        self.consume_source(&mut Source::from(chars))
    }

    /// Match at the cursor of `source`. On success the cursor moves past the
    /// match; on failure it is left where it was.
    pub fn consume_source(&self, source: &mut Source) -> MatchResult {
        let mut result = MatchResult::new(source.position());
        self.consume_into(source, &mut result);
        result
    }

    /// Continue `result` with a match at the cursor of `source`.
    ///
    /// Nothing happens if `result` has already failed.
    pub fn consume_into(&self, source: &mut Source, result: &mut MatchResult) {
        self.run("consume", Node::consume, source, result);
    }

    /// Match the negation of this pattern against the start of `text`.
    pub fn neglect(&self, text: &str) -> MatchResult {
        self.neglect_source(&mut Source::new(text))
    }

    pub fn neglect_chars(&self, chars: &[char]) -> MatchResult {
        self.neglect_source(&mut Source::from(chars))
    }

    pub fn neglect_source(&self, source: &mut Source) -> MatchResult {
        let mut result = MatchResult::new(source.position());
        self.neglect_into(source, &mut result);
        result
    }

    pub fn neglect_into(&self, source: &mut Source, result: &mut MatchResult) {
        self.run("neglect", Node::neglect, source, result);
    }

    fn run(&self, op: &'static str, step: Step, source: &mut Source, result: &mut MatchResult) {
        if !result.is_success() {
            return;
        }
        let start = source.position();
        step(&self.head, source, result, Compare::None);
        if !result.is_success() {
            source.set_position(start);
        }
        tracing::trace!(
            op,
            pattern = %self,
            start,
            length = result.len(),
            success = result.is_success(),
            "match attempt"
        );
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.head, &other.head) || self.head == other.head
    }
}

impl PartialEq<str> for Pattern {
    fn eq(&self, other: &str) -> bool {
        self.represents(other)
    }
}

impl PartialEq<&str> for Pattern {
    fn eq(&self, other: &&str) -> bool {
        self.represents(other)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.head, f)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern")
            .field(&format_args!("{}", self.head))
            .finish()
    }
}

impl From<char> for Pattern {
    fn from(ch: char) -> Self {
        Self::wrap(Node::Char {
            ch,
            compare: Compare::None,
        })
    }
}

impl From<&str> for Pattern {
    fn from(text: &str) -> Self {
        Self::wrap(Node::literal(text))
    }
}

impl From<String> for Pattern {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}

impl From<&Capture> for Pattern {
    fn from(capture: &Capture) -> Self {
        Self::backreference(capture)
    }
}

impl From<&Pattern> for Pattern {
    fn from(pattern: &Pattern) -> Self {
        pattern.clone()
    }
}

impl<T: Into<Pattern>> BitOr<T> for Pattern {
    type Output = Pattern;

    fn bitor(self, other: T) -> Pattern {
        Pattern::or(&self, other)
    }
}

impl<T: Into<Pattern>> BitOr<T> for &Pattern {
    type Output = Pattern;

    fn bitor(self, other: T) -> Pattern {
        Pattern::or(self, other)
    }
}

impl<T: Into<Pattern>> BitAnd<T> for Pattern {
    type Output = Pattern;

    fn bitand(self, other: T) -> Pattern {
        Pattern::then(&self, other)
    }
}

impl<T: Into<Pattern>> BitAnd<T> for &Pattern {
    type Output = Pattern;

    fn bitand(self, other: T) -> Pattern {
        Pattern::then(self, other)
    }
}

impl Neg for Pattern {
    type Output = Pattern;

    fn neg(self) -> Pattern {
        self.optional()
    }
}

impl Neg for &Pattern {
    type Output = Pattern;

    fn neg(self) -> Pattern {
        self.optional()
    }
}

impl Not for Pattern {
    type Output = Pattern;

    fn not(self) -> Pattern {
        Pattern::not(&self)
    }
}

impl Not for &Pattern {
    type Output = Pattern;

    fn not(self) -> Pattern {
        Pattern::not(self)
    }
}

impl Mul<usize> for Pattern {
    type Output = Pattern;

    fn mul(self, times: usize) -> Pattern {
        self.repeat(times)
    }
}

impl Mul<usize> for &Pattern {
    type Output = Pattern;

    fn mul(self, times: usize) -> Pattern {
        self.repeat(times)
    }
}
