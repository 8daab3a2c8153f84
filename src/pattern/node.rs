//! The matcher graph.
//!
//! Every node can `consume` (match itself at the cursor), `neglect` (match
//! the logical negation of itself) and `check_header` (cheaply rule itself
//! out by looking at the next unit only).
//!
//! Failure handling is shallow. Leaves never move the cursor when they fail.
//! Combinators that recover from a child's failure (alternation, optional,
//! span) restore their single checkpoint before carrying on; combinators that
//! propagate a failure (concatenation, repetition) leave the cursor where the
//! failing child stopped. Only the entry points on [`Pattern`] undo a failed
//! match as a whole.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use itertools::Itertools;
use regex_automata::{Anchored, Input, meta};

use crate::capture::Capture;
use crate::compare::Compare;
use crate::error::MatchError;
use crate::match_result::MatchResult;
use crate::source::{Probe, Source};

use super::Pattern;
use super::class::CharClass;

/// The head of a mutable pattern, shared with the nodes that refer back to it.
pub(crate) type Slot = RefCell<Option<Rc<Node>>>;

pub(crate) const UNDEFINED: &str =
    "pattern undefined: a recursive pattern was matched before it was defined, or after it was dropped";

/// A single-unit predicate.
#[derive(Debug, Clone)]
pub(crate) enum Checker {
    /// A named predicate such as `letter` or `any`.
    Named {
        name: &'static str,
        test: fn(char) -> bool,
    },
    /// A set of characters and ranges.
    Set(Vec<CharClass>),
}

impl Checker {
    fn accepts(&self, ch: char) -> bool {
        match self {
            Checker::Named { test, .. } => test(ch),
            Checker::Set(classes) => classes.iter().any(|class| class.contains(ch)),
        }
    }
}

impl PartialEq for Checker {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Checker::Named { name: a, .. }, Checker::Named { name: b, .. }) => a == b,
            (Checker::Set(a), Checker::Set(b)) => a == b,
            _ => false,
        }
    }
}

pub(crate) enum Node {
    Char {
        ch: char,
        compare: Compare,
    },
    Literal {
        text: Box<[char]>,
        compare: Compare,
    },
    Backreference {
        capture: Capture,
        compare: Compare,
    },
    Checker(Checker),
    End,
    /// An expression anchored at the cursor, run by `regex-automata`.
    Regex {
        regex: meta::Regex,
        expression: Box<str>,
    },
    Alternator(Rc<Node>, Rc<Node>),
    Concatenator(Rc<Node>, Rc<Node>),
    Repeater(Rc<Node>, usize),
    Optor(Rc<Node>),
    Spanner(Rc<Node>),
    Negator(Rc<Node>),
    /// One unit, provided the guard does not match at the cursor.
    Except(Rc<Node>),
    Capturer(Rc<Node>, Capture),
    /// Applies a comparison mode to everything below it.
    Modal(Rc<Node>, Compare),
    /// Owning link to a sealed mutable pattern's head.
    Recursive(Rc<Slot>),
    /// Non-owning link back to a mutable pattern, used for self-reference.
    Deferred(Weak<Slot>),
}

impl Node {
    pub(crate) fn literal(text: &str) -> Node {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Node::Char {
                ch,
                compare: Compare::None,
            },
            _ => Node::Literal {
                text: text.chars().collect(),
                compare: Compare::None,
            },
        }
    }

    fn fragment(self: &Rc<Self>) -> Pattern {
        Pattern::from_node(Rc::clone(self))
    }

    pub(crate) fn consume(
        self: &Rc<Self>,
        source: &mut Source,
        result: &mut MatchResult,
        compare: Compare,
    ) {
        match &**self {
            Node::Char { ch, compare: own } => {
                self.consume_literal(std::slice::from_ref(ch), own.or(compare), source, result)
            }
            Node::Literal { text, compare: own } => {
                self.consume_literal(text, own.or(compare), source, result)
            }
            Node::Backreference {
                capture,
                compare: own,
            } => capture.with_units(|units| {
                self.consume_literal(units, own.or(compare), source, result)
            }),
            Node::Checker(checker) => match source.peek() {
                None => result.fail(MatchError::EndOfSource(self.fragment())),
                Some(ch) if checker.accepts(ch) => {
                    source.advance(1);
                    result.grow(1);
                }
                Some(_) => result.fail(MatchError::ConsumeFailed(self.fragment())),
            },
            Node::End => {
                if !source.is_eof() {
                    result.fail(MatchError::ConsumeFailed(self.fragment()));
                }
            }
            Node::Regex { regex, .. } => {
                match match_at_cursor(regex, source) {
                    Some(count) => {
                        source.advance(count);
                        result.grow(count);
                    }
                    None if source.is_eof() => {
                        result.fail(MatchError::EndOfSource(self.fragment()))
                    }
                    None => result.fail(MatchError::ConsumeFailed(self.fragment())),
                }
            }
            Node::Alternator(left, right) => {
                let (position, length) = (source.position(), result.len());
                if left.check_header(source, compare) {
                    left.consume(source, result, compare);
                    if result.is_success() {
                        return;
                    }
                    source.set_position(position);
                    result.restore(length);
                }
                if right.check_header(source, compare) {
                    right.consume(source, result, compare);
                } else if source.is_eof() {
                    result.fail(MatchError::EndOfSource(self.fragment()));
                } else {
                    result.fail(MatchError::ConsumeFailed(self.fragment()));
                }
            }
            Node::Concatenator(left, right) => {
                left.consume(source, result, compare);
                if result.is_success() {
                    right.consume(source, result, compare);
                }
            }
            Node::Repeater(inner, times) => {
                for _ in 0..*times {
                    inner.consume(source, result, compare);
                    if !result.is_success() {
                        return;
                    }
                }
            }
            Node::Optor(inner) => {
                let (position, length) = (source.position(), result.len());
                inner.consume(source, result, compare);
                if !result.is_success() {
                    source.set_position(position);
                    result.restore(length);
                }
            }
            Node::Spanner(inner) => span(source, result, |source, result| {
                inner.consume(source, result, compare)
            }),
            Node::Negator(inner) => inner.neglect(source, result, compare),
            Node::Except(guard) => {
                if source.is_eof() {
                    result.fail(MatchError::EndOfSource(self.fragment()));
                    return;
                }
                let (position, length) = (source.position(), result.len());
                guard.consume(source, result, compare);
                let guarded = result.is_success();
                source.set_position(position);
                result.restore(length);
                if guarded {
                    result.fail(MatchError::NeglectFailed(self.fragment()));
                } else {
                    source.advance(1);
                    result.grow(1);
                }
            }
            Node::Capturer(inner, capture) => {
                let start = source.position();
                inner.consume(source, result, compare);
                if result.is_success() {
                    capture.set(source.slice(start, source.position() - start));
                }
            }
            Node::Modal(inner, mode) => inner.consume(source, result, mode.or(compare)),
            Node::Recursive(_) | Node::Deferred(_) => {
                self.resolve().consume(source, result, compare)
            }
        }
    }

    pub(crate) fn neglect(
        self: &Rc<Self>,
        source: &mut Source,
        result: &mut MatchResult,
        compare: Compare,
    ) {
        match &**self {
            Node::Char { ch, compare: own } => {
                self.neglect_literal(std::slice::from_ref(ch), own.or(compare), source, result)
            }
            Node::Literal { text, compare: own } => {
                self.neglect_literal(text, own.or(compare), source, result)
            }
            Node::Backreference {
                capture,
                compare: own,
            } => capture.with_units(|units| {
                self.neglect_literal(units, own.or(compare), source, result)
            }),
            Node::Checker(checker) => match source.peek() {
                None => result.fail(MatchError::EndOfSource(self.fragment())),
                Some(ch) if !checker.accepts(ch) => {
                    source.advance(1);
                    result.grow(1);
                }
                Some(_) => result.fail(MatchError::NeglectFailed(self.fragment())),
            },
            Node::End => {
                if source.is_eof() {
                    result.fail(MatchError::NeglectFailed(self.fragment()));
                }
            }
            Node::Regex { regex, .. } => {
                if source.is_eof() {
                    result.fail(MatchError::EndOfSource(self.fragment()));
                    return;
                }
                if match_at_cursor(regex, source).is_some() {
                    result.fail(MatchError::NeglectFailed(self.fragment()));
                } else {
                    source.advance(1);
                    result.grow(1);
                }
            }
            Node::Alternator(left, right) => {
                // Neither branch may match here. The step taken is the
                // shortest span either branch rejected.
                let (position, length) = (source.position(), result.len());
                let mut step: Option<usize> = None;
                for branch in [left, right] {
                    branch.neglect(source, result, compare);
                    match result.error() {
                        None => {
                            let taken = source.position() - position;
                            step = Some(step.map_or(taken, |s| s.min(taken)));
                        }
                        Some(MatchError::EndOfSource(_)) => {}
                        Some(_) => return,
                    }
                    source.set_position(position);
                    result.restore(length);
                }
                match step {
                    Some(taken) => {
                        source.advance(taken);
                        result.grow(taken);
                    }
                    None => result.fail(MatchError::EndOfSource(self.fragment())),
                }
            }
            Node::Concatenator(left, right) => {
                left.neglect(source, result, compare);
                if result.is_success() {
                    right.neglect(source, result, compare);
                }
            }
            Node::Repeater(inner, times) => {
                for _ in 0..*times {
                    inner.neglect(source, result, compare);
                    if !result.is_success() {
                        return;
                    }
                }
            }
            Node::Optor(inner) => {
                let (position, length) = (source.position(), result.len());
                inner.neglect(source, result, compare);
                if !result.is_success() {
                    source.set_position(position);
                    result.restore(length);
                }
            }
            Node::Spanner(inner) => span(source, result, |source, result| {
                inner.neglect(source, result, compare)
            }),
            Node::Negator(inner) => inner.consume(source, result, compare),
            Node::Except(guard) => guard.consume(source, result, compare),
            Node::Capturer(inner, capture) => {
                let start = source.position();
                inner.neglect(source, result, compare);
                if result.is_success() {
                    capture.set(source.slice(start, source.position() - start));
                }
            }
            Node::Modal(inner, mode) => inner.neglect(source, result, mode.or(compare)),
            Node::Recursive(_) | Node::Deferred(_) => {
                self.resolve().neglect(source, result, compare)
            }
        }
    }

    /// Could this node possibly consume at the cursor? Looks at one unit at
    /// most and never answers `false` for a node that would match.
    pub(crate) fn check_header(&self, source: &Source, compare: Compare) -> bool {
        match self {
            Node::Char { ch, compare: own } => source.starts_with(*ch, own.or(compare)),
            Node::Literal { text, compare: own } => text
                .first()
                .is_none_or(|&ch| source.starts_with(ch, own.or(compare))),
            Node::Backreference {
                capture,
                compare: own,
            } => capture.with_units(|units| {
                units
                    .first()
                    .is_none_or(|&ch| source.starts_with(ch, own.or(compare)))
            }),
            Node::Checker(checker) => source.peek().is_some_and(|ch| checker.accepts(ch)),
            Node::End => source.is_eof(),
            Node::Alternator(left, right) => {
                left.check_header(source, compare) || right.check_header(source, compare)
            }
            Node::Concatenator(left, _) => {
                left.is_nullable() || left.check_header(source, compare)
            }
            Node::Repeater(inner, times) => *times == 0 || inner.check_header(source, compare),
            Node::Spanner(inner) | Node::Capturer(inner, _) => {
                inner.check_header(source, compare)
            }
            Node::Modal(inner, mode) => inner.check_header(source, mode.or(compare)),
            Node::Except(_) => !source.is_eof(),
            Node::Regex { .. }
            | Node::Optor(_)
            | Node::Negator(_)
            | Node::Recursive(_)
            | Node::Deferred(_) => true,
        }
    }

    /// Might this node succeed without consuming anything? Errs towards `true`.
    fn is_nullable(&self) -> bool {
        match self {
            Node::Char { .. } | Node::Checker(_) | Node::Except(_) => false,
            Node::Literal { text, .. } => text.is_empty(),
            Node::Alternator(left, right) => left.is_nullable() || right.is_nullable(),
            Node::Concatenator(left, right) => left.is_nullable() && right.is_nullable(),
            Node::Repeater(inner, times) => *times == 0 || inner.is_nullable(),
            Node::Spanner(inner) | Node::Capturer(inner, _) | Node::Modal(inner, _) => {
                inner.is_nullable()
            }
            Node::Backreference { .. }
            | Node::End
            | Node::Regex { .. }
            | Node::Optor(_)
            | Node::Negator(_)
            | Node::Recursive(_)
            | Node::Deferred(_) => true,
        }
    }

    /// The exact text this node stands for, if it is built only from literals.
    pub(crate) fn literal_text(&self) -> Option<Vec<char>> {
        match self {
            Node::Char { ch, .. } => Some(vec![*ch]),
            Node::Literal { text, .. } => Some(text.to_vec()),
            Node::Concatenator(left, right) => {
                let mut text = left.literal_text()?;
                text.extend(right.literal_text()?);
                Some(text)
            }
            Node::Repeater(inner, times) => Some(inner.literal_text()?.repeat(*times)),
            Node::Modal(inner, _) => inner.literal_text(),
            _ => None,
        }
    }

    /// Follow a recursive link to the current head.
    ///
    /// # Panics
    ///
    /// Panics if the mutable pattern behind the link was never defined or has
    /// been dropped; either means the grammar was built incorrectly.
    fn resolve(&self) -> Rc<Node> {
        let head = match self {
            Node::Recursive(slot) => slot.borrow().clone(),
            Node::Deferred(slot) => slot.upgrade().and_then(|slot| slot.borrow().clone()),
            _ => unreachable!("resolve called on a non-recursive node"),
        };
        match head {
            Some(head) => head,
            None => panic!("{UNDEFINED}"),
        }
    }

    fn slot_ptr(&self) -> Option<*const Slot> {
        match self {
            Node::Recursive(slot) => Some(Rc::as_ptr(slot)),
            Node::Deferred(slot) => Some(slot.as_ptr()),
            _ => None,
        }
    }

    fn consume_literal(
        self: &Rc<Self>,
        literal: &[char],
        compare: Compare,
        source: &mut Source,
        result: &mut MatchResult,
    ) {
        match source.probe(literal, compare) {
            Probe::Equal(count) => {
                source.advance(count);
                result.grow(count);
            }
            Probe::Different(_) => result.fail(MatchError::ConsumeFailed(self.fragment())),
            Probe::Short => result.fail(MatchError::EndOfSource(self.fragment())),
        }
    }

    fn neglect_literal(
        self: &Rc<Self>,
        literal: &[char],
        compare: Compare,
        source: &mut Source,
        result: &mut MatchResult,
    ) {
        match source.probe(literal, compare) {
            Probe::Different(count) => {
                source.advance(count);
                result.grow(count);
            }
            Probe::Equal(_) => result.fail(MatchError::NeglectFailed(self.fragment())),
            Probe::Short => result.fail(MatchError::EndOfSource(self.fragment())),
        }
    }

    fn collect_alternatives<'a>(&'a self, out: &mut Vec<&'a Node>) {
        match self {
            Node::Alternator(left, right) => {
                left.collect_alternatives(out);
                right.collect_alternatives(out);
            }
            other => out.push(other),
        }
    }

    fn collect_sequence<'a>(&'a self, out: &mut Vec<&'a Node>) {
        match self {
            Node::Concatenator(left, right) => {
                left.collect_sequence(out);
                right.collect_sequence(out);
            }
            other => out.push(other),
        }
    }
}

/// Length in units of the expression's match at the cursor, if any.
fn match_at_cursor(regex: &meta::Regex, source: &Source) -> Option<usize> {
    let rest = source.remaining_str();
    let found = regex.find(Input::new(rest).anchored(Anchored::Yes))?;
    Some(rest[..found.end()].chars().count())
}

/// Apply `step` until it fails; succeed if it matched at least once.
///
/// The failing attempt is rolled back. A step that matches without moving the
/// cursor ends the span.
fn span(
    source: &mut Source,
    result: &mut MatchResult,
    mut step: impl FnMut(&mut Source, &mut MatchResult),
) {
    let mut matched = false;
    loop {
        let (position, length) = (source.position(), result.len());
        step(source, result);
        if !result.is_success() {
            if matched {
                source.set_position(position);
                result.restore(length);
            }
            return;
        }
        matched = true;
        if source.position() == position {
            return;
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Char { ch: a, compare: x }, Node::Char { ch: b, compare: y }) => {
                a == b && x == y
            }
            (Node::Literal { text: a, compare: x }, Node::Literal { text: b, compare: y }) => {
                a == b && x == y
            }
            (
                Node::Backreference {
                    capture: a,
                    compare: x,
                },
                Node::Backreference {
                    capture: b,
                    compare: y,
                },
            ) => a == b && x == y,
            (Node::Checker(a), Node::Checker(b)) => a == b,
            (Node::End, Node::End) => true,
            (Node::Regex { expression: a, .. }, Node::Regex { expression: b, .. }) => a == b,
            (Node::Alternator(a, b), Node::Alternator(c, d))
            | (Node::Concatenator(a, b), Node::Concatenator(c, d)) => a == c && b == d,
            (Node::Repeater(a, n), Node::Repeater(b, m)) => n == m && a == b,
            (Node::Optor(a), Node::Optor(b))
            | (Node::Spanner(a), Node::Spanner(b))
            | (Node::Negator(a), Node::Negator(b))
            | (Node::Except(a), Node::Except(b)) => a == b,
            (Node::Capturer(a, x), Node::Capturer(b, y)) => x == y && a == b,
            (Node::Modal(a, x), Node::Modal(b, y)) => x == y && a == b,
            _ => match (self.slot_ptr(), other.slot_ptr()) {
                (Some(a), Some(b)) => std::ptr::eq(a, b),
                _ => false,
            },
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Char { ch, compare } => write_leaf(f, &format!("{ch:?}"), *compare),
            Node::Literal { text, compare } => {
                write_leaf(f, &format!("{:?}", text.iter().collect::<String>()), *compare)
            }
            Node::Backreference { capture, compare } => {
                let text = match capture.name() {
                    Some(name) => format!("ref({name})"),
                    None => format!("ref({:?})", capture.value()),
                };
                write_leaf(f, &text, *compare)
            }
            Node::Checker(Checker::Named { name, .. }) => f.write_str(name),
            Node::Checker(Checker::Set(classes)) => {
                write!(f, "[{}]", classes.iter().join(""))
            }
            Node::End => f.write_str("end"),
            Node::Regex { expression, .. } => write!(f, "regex({expression:?})"),
            Node::Alternator(..) => {
                let mut alternatives = Vec::new();
                self.collect_alternatives(&mut alternatives);
                write!(f, "({})", alternatives.iter().join(" | "))
            }
            Node::Concatenator(..) => {
                let mut sequence = Vec::new();
                self.collect_sequence(&mut sequence);
                write!(f, "({})", sequence.iter().join(" & "))
            }
            Node::Repeater(inner, times) => write!(f, "[{times}]{inner}"),
            Node::Optor(inner) => write!(f, "-{inner}"),
            Node::Spanner(inner) => write!(f, "+{inner}"),
            Node::Negator(inner) => write!(f, "!{inner}"),
            Node::Except(guard) => write!(f, "except({guard})"),
            Node::Capturer(inner, _) => write!(f, "capture({inner})"),
            Node::Modal(inner, Compare::None) => write!(f, "{inner}"),
            Node::Modal(inner, Compare::CaseSensitive) => write!(f, "sensitive({inner})"),
            Node::Modal(inner, Compare::CaseInsensitive) => write!(f, "insensitive({inner})"),
            Node::Recursive(_) | Node::Deferred(_) => f.write_str("recursive"),
        }
    }
}

fn write_leaf(f: &mut fmt::Formatter<'_>, text: &str, compare: Compare) -> fmt::Result {
    match compare {
        Compare::None => f.write_str(text),
        Compare::CaseSensitive => write!(f, "sensitive({text})"),
        Compare::CaseInsensitive => write!(f, "insensitive({text})"),
    }
}
