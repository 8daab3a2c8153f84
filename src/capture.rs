//! Capture cells: matched text kept for reuse as a backreference.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A shared cell holding the text most recently matched by its capturing
/// pattern.
///
/// Cloning a `Capture` clones the handle, not the text: every clone sees the
/// same value. Two captures are equal only when they are the same cell.
#[derive(Clone, Default)]
pub struct Capture {
    name: Option<Rc<str>>,
    value: Rc<RefCell<Vec<char>>>,
}

impl Capture {
    /// Create an empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty capture with a name, shown when the capture is printed
    /// as part of a pattern.
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The captured text.
    pub fn value(&self) -> String {
        self.value.borrow().iter().collect()
    }

    /// True until the capturing pattern first matches something non-empty.
    pub fn is_empty(&self) -> bool {
        self.value.borrow().is_empty()
    }

    /// Length of the captured text in characters.
    pub fn len(&self) -> usize {
        self.value.borrow().len()
    }

    pub(crate) fn set(&self, text: &[char]) {
        let mut value = self.value.borrow_mut();
        value.clear();
        value.extend_from_slice(text);
    }

    /// Run `f` over the captured units without copying them.
    pub(crate) fn with_units<R>(&self, f: impl FnOnce(&[char]) -> R) -> R {
        f(&self.value.borrow())
    }

    pub(crate) fn ptr_eq(&self, other: &Capture) -> bool {
        Rc::ptr_eq(&self.value, &other.value)
    }
}

impl PartialEq for Capture {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Capture {}

impl fmt::Debug for Capture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capture")
            .field("name", &self.name())
            .field("value", &self.value())
            .finish()
    }
}

impl fmt::Display for Capture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value())
    }
}
