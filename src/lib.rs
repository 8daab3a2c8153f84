//! Pattern combinators over text.
//!
//! Patterns are built in code rather than parsed from a regex string:
//! literals, character classes and the combinators on [`Pattern`] compose
//! into a matcher graph that can be reused against any number of inputs.
//!
//! # Example
//!
//! ```rust
//! use strand::{Capture, Compare, Pattern, builtin};
//!
//! let word = Capture::new();
//! let repeated = builtin::letter()
//!     .many()
//!     .capture(&word)
//!     .then(' ')
//!     .then(&word);
//!
//! assert!(repeated.consume("hello hello").is_success());
//! assert!(!repeated.consume("hello world").is_success());
//!
//! let keyword = Pattern::from("SELECT").with(Compare::CaseInsensitive);
//! let result = keyword.consume("select *");
//! assert_eq!(result.slice("select *"), "select");
//! ```
//!
//! Failures are ordinary values: a [`MatchResult`] says where the attempt
//! started, how far it got and, on failure, which fragment of the pattern
//! could not be matched. Call [`MatchResult::into_result`] to turn a failure
//! into an `Err`.

mod capture;
mod compare;
mod error;
mod match_result;
pub mod pattern;
mod source;

pub use capture::Capture;
pub use compare::Compare;
pub use error::{MatchError, PatternError};
pub use match_result::MatchResult;
pub use pattern::{CharClass, MutablePattern, Pattern, builtin};
pub use source::Source;
