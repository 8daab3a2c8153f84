//! Patterns that can refer to themselves.
//!
//! A [`MutablePattern`] starts empty. While it is unsealed every combinator
//! rewrites its head in place, so the pattern can appear inside its own
//! definition:
//!
//! ```
//! use strand::{MutablePattern, Pattern};
//!
//! let parens = MutablePattern::new();
//! parens
//!     .then('(')?
//!     .then(Pattern::from(&parens).optional())?
//!     .then(')')?;
//! let parens = parens.seal()?;
//!
//! assert_eq!(parens.consume("(())").len(), 4);
//! # Ok::<(), strand::PatternError>(())
//! ```
//!
//! Sealing hands back an ordinary [`Pattern`]; from then on combining it
//! builds new patterns as usual.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::capture::Capture;
use crate::compare::Compare;
use crate::error::PatternError;
use crate::match_result::MatchResult;
use crate::source::Source;

use super::Pattern;
use super::node::{Node, Slot};

/// A pattern under construction whose head is replaced by each combinator.
///
/// References taken with `Pattern::from(&mutable)` do not keep the pattern
/// alive; keep the sealed pattern (or this one) around for as long as they
/// are used. Left recursion (a pattern whose first step is itself) is not
/// supported.
#[derive(Default)]
pub struct MutablePattern {
    slot: Rc<Slot>,
}

impl MutablePattern {
    pub fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(None)),
        }
    }

    /// True once something has been assigned with [`MutablePattern::then`].
    pub fn is_defined(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Append `other`. On an empty pattern this sets the head.
    pub fn then(&self, other: impl Into<Pattern>) -> Result<&Self, PatternError> {
        let other = other.into();
        let mut slot = self.slot.borrow_mut();
        let head = match slot.take() {
            None => Rc::clone(other.node()),
            Some(head) => Rc::new(Node::Concatenator(head, Rc::clone(other.node()))),
        };
        *slot = Some(head);
        Ok(self)
    }

    /// Replace the head with `head | other`.
    pub fn or(&self, other: impl Into<Pattern>) -> Result<&Self, PatternError> {
        let other = other.into();
        self.rewrite("or", |head| Node::Alternator(head, Rc::clone(other.node())))
    }

    pub fn optional(&self) -> Result<&Self, PatternError> {
        self.rewrite("optional", Node::Optor)
    }

    pub fn many(&self) -> Result<&Self, PatternError> {
        self.rewrite("many", Node::Spanner)
    }

    pub fn repeat(&self, times: usize) -> Result<&Self, PatternError> {
        self.rewrite("repeat", |head| Node::Repeater(head, times))
    }

    pub fn not(&self) -> Result<&Self, PatternError> {
        self.rewrite("not", Node::Negator)
    }

    pub fn capture(&self, capture: &Capture) -> Result<&Self, PatternError> {
        self.rewrite("capture", |head| Node::Capturer(head, capture.clone()))
    }

    pub fn with(&self, compare: Compare) -> Result<&Self, PatternError> {
        self.rewrite("with", |head| Node::Modal(head, compare))
    }

    /// Freeze the definition and return it as an ordinary pattern.
    pub fn seal(self) -> Result<Pattern, PatternError> {
        if !self.is_defined() {
            tracing::debug!("refusing to seal an undefined pattern");
            return Err(PatternError::Undefined);
        }
        tracing::debug!(pattern = %self, "sealed mutable pattern");
        Ok(self.pattern())
    }

    pub fn consume(&self, text: &str) -> Result<MatchResult, PatternError> {
        self.consume_source(&mut Source::new(text))
    }

    pub fn consume_source(&self, source: &mut Source) -> Result<MatchResult, PatternError> {
        Ok(self.defined()?.consume_source(source))
    }

    pub fn neglect(&self, text: &str) -> Result<MatchResult, PatternError> {
        self.neglect_source(&mut Source::new(text))
    }

    pub fn neglect_source(&self, source: &mut Source) -> Result<MatchResult, PatternError> {
        Ok(self.defined()?.neglect_source(source))
    }

    /// An owning pattern for the current definition.
    fn pattern(&self) -> Pattern {
        Pattern::from_node(Rc::new(Node::Recursive(Rc::clone(&self.slot))))
    }

    fn defined(&self) -> Result<Pattern, PatternError> {
        if self.is_defined() {
            Ok(self.pattern())
        } else {
            Err(PatternError::Undefined)
        }
    }

    fn rewrite(
        &self,
        op: &'static str,
        combine: impl FnOnce(Rc<Node>) -> Node,
    ) -> Result<&Self, PatternError> {
        let mut slot = self.slot.borrow_mut();
        let Some(head) = slot.take() else {
            tracing::debug!(op, "combinator applied to an undefined mutable pattern");
            return Err(PatternError::Undefined);
        };
        *slot = Some(Rc::new(combine(head)));
        Ok(self)
    }
}

impl From<&MutablePattern> for Pattern {
    /// A non-owning reference, suitable for use inside the pattern's own
    /// definition.
    ///
    /// # Panics
    ///
    /// The returned pattern panics when it is matched after `pattern` and the
    /// pattern sealed from it have both been dropped, even if the returned
    /// pattern is itself embedded in a pattern that is still alive. It also
    /// panics when matched before `pattern` has been defined.
    fn from(pattern: &MutablePattern) -> Self {
        Pattern::from_node(Rc::new(Node::Deferred(Rc::downgrade(&pattern.slot))))
    }
}

impl fmt::Display for MutablePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.slot.borrow() {
            Some(head) => fmt::Display::fmt(head, f),
            None => f.write_str("undefined"),
        }
    }
}

impl fmt::Debug for MutablePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MutablePattern")
            .field(&format_args!("{self}"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_undefined() {
        let pattern = MutablePattern::new();
        assert!(!pattern.is_defined());
        assert_eq!(pattern.to_string(), "undefined");
    }

    #[test]
    fn then_defines_head() {
        let pattern = MutablePattern::new();
        pattern.then("ab").unwrap();
        assert!(pattern.is_defined());
        assert_eq!(pattern.consume("abc").unwrap().len(), 2);
    }

    #[test]
    fn combinators_need_a_head() {
        let pattern = MutablePattern::new();
        assert_eq!(pattern.or('a').unwrap_err(), PatternError::Undefined);
        assert_eq!(pattern.optional().unwrap_err(), PatternError::Undefined);
        assert_eq!(pattern.many().unwrap_err(), PatternError::Undefined);
        assert_eq!(pattern.repeat(2).unwrap_err(), PatternError::Undefined);
        assert_eq!(pattern.not().unwrap_err(), PatternError::Undefined);
        assert_eq!(
            pattern.capture(&Capture::new()).unwrap_err(),
            PatternError::Undefined
        );
        assert_eq!(
            pattern.with(Compare::CaseInsensitive).unwrap_err(),
            PatternError::Undefined
        );
        assert!(!pattern.is_defined());
    }

    #[test]
    fn consume_undefined_is_an_error() {
        let pattern = MutablePattern::new();
        assert_eq!(pattern.consume("x").unwrap_err(), PatternError::Undefined);
        assert_eq!(pattern.neglect("x").unwrap_err(), PatternError::Undefined);
    }

    #[test]
    fn seal_undefined_is_an_error() {
        assert_eq!(
            MutablePattern::new().seal().unwrap_err(),
            PatternError::Undefined
        );
    }

    #[test]
    fn combinators_rewrite_in_place() {
        let pattern = MutablePattern::new();
        pattern.then('a').unwrap().or('b').unwrap().many().unwrap();
        assert_eq!(pattern.to_string(), "+('a' | 'b')");
        assert_eq!(pattern.consume("abba!").unwrap().len(), 4);
    }

    #[test]
    fn sealed_pattern_combines_immutably() {
        let pattern = MutablePattern::new();
        pattern.then('a').unwrap();
        let sealed = pattern.seal().unwrap();
        let longer = sealed.then('b');
        assert_eq!(sealed.consume("ab").len(), 1);
        assert_eq!(longer.consume("ab").len(), 2);
    }

    #[test]
    fn balanced_parentheses() {
        let parens = MutablePattern::new();
        parens
            .then('(')
            .unwrap()
            .then(-Pattern::from(&parens))
            .unwrap()
            .then(')')
            .unwrap();
        let parens = parens.seal().unwrap();

        assert_eq!(parens.consume("(())").len(), 4);
        assert_eq!(parens.consume("((()))x").len(), 6);
        assert!(!parens.consume("(()").is_success());
    }

    #[test]
    #[should_panic(expected = "pattern undefined")]
    fn embedding_pattern_does_not_keep_reference_alive() {
        let value = MutablePattern::new();
        let array = Pattern::from('[').then(&value).then(']');
        value.then('x').unwrap().or(&array).unwrap();
        drop(value.seal().unwrap());
        let _ = array.consume("[x]");
    }

    #[test]
    fn sealed_pattern_outlives_reference_sites() {
        let list = MutablePattern::new();
        list.then('x')
            .unwrap()
            .then(Pattern::from(',').then(&list).optional())
            .unwrap();
        let list = list.seal().unwrap();
        let wrapped = Pattern::from('[').then(&list).then(']');
        drop(list);
        assert_eq!(wrapped.consume("[x,x,x]").len(), 7);
    }
}
