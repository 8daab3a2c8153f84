//! Predefined patterns: character categories and common lexical shapes.

use phf::{Map, phf_map};

use crate::error::PatternError;

use super::Pattern;
use super::class;

/// Any letter.
pub fn letter() -> Pattern {
    Pattern::checker("letter", class::is_letter)
}

pub fn uppercase() -> Pattern {
    Pattern::checker("uppercase", class::is_uppercase)
}

pub fn lowercase() -> Pattern {
    Pattern::checker("lowercase", class::is_lowercase)
}

/// Any numeric character.
pub fn number() -> Pattern {
    Pattern::checker("number", class::is_number)
}

pub fn punctuation() -> Pattern {
    Pattern::checker("punctuation", class::is_punctuation)
}

pub fn symbol() -> Pattern {
    Pattern::checker("symbol", class::is_symbol)
}

/// Space separators plus the line and paragraph separators.
pub fn separator() -> Pattern {
    Pattern::checker("separator", class::is_separator)
}

pub fn whitespace() -> Pattern {
    Pattern::checker("whitespace", class::is_whitespace)
}

/// `"\r\n"` or any single line-terminating character.
pub fn line_terminator() -> Pattern {
    Pattern::from("\r\n").or(Pattern::checker("newline", class::is_line_terminator))
}

/// Any single character.
pub fn any() -> Pattern {
    Pattern::checker("any", class::is_any)
}

/// The end of the input. Consumes nothing.
pub fn end() -> Pattern {
    Pattern::wrap(super::node::Node::End)
}

pub type Builtin = fn() -> Pattern;

/// Built-in patterns by name, for callers that pick a pattern at runtime.
/// Please keep names sorted alphabetically.
pub const BY_NAME: Map<&'static str, Builtin> = phf_map! {
    "any" => any as Builtin,
    "end" => end as Builtin,
    "letter" => letter as Builtin,
    "line-terminator" => line_terminator as Builtin,
    "lowercase" => lowercase as Builtin,
    "number" => number as Builtin,
    "punctuation" => punctuation as Builtin,
    "separator" => separator as Builtin,
    "symbol" => symbol as Builtin,
    "uppercase" => uppercase as Builtin,
    "whitespace" => whitespace as Builtin,
};

/// Look up a built-in pattern by name.
pub fn by_name(name: &str) -> Option<Pattern> {
    BY_NAME.get(name).map(|make| make())
}

impl Pattern {
    /// A comment running from `delimiter` to the end of the line, not
    /// including the line terminator.
    pub fn line_comment(delimiter: &str) -> Result<Pattern, PatternError> {
        if delimiter.is_empty() {
            return Err(PatternError::EmptyArgument("comment delimiter"));
        }
        Ok(Pattern::from(delimiter).then(line_terminator().not().many().optional()))
    }

    /// Text between two `delimiter`s, with no way to escape the delimiter.
    pub fn string_literal(delimiter: &str) -> Result<Pattern, PatternError> {
        if delimiter.is_empty() {
            return Err(PatternError::EmptyArgument("string delimiter"));
        }
        let delimiter = Pattern::from(delimiter);
        Ok(delimiter
            .then(delimiter.except().many().optional())
            .then(&delimiter))
    }

    /// Text between two `delimiter`s, where `escape` followed by the
    /// delimiter or by another `escape` stands for that text.
    pub fn string_literal_escaped(delimiter: &str, escape: &str) -> Result<Pattern, PatternError> {
        if delimiter.is_empty() {
            return Err(PatternError::EmptyArgument("string delimiter"));
        }
        if escape.is_empty() {
            return Err(PatternError::EmptyArgument("escape sequence"));
        }
        let delimiter = Pattern::from(delimiter);
        let escape = Pattern::from(escape);
        let escaped = escape.then(delimiter.or(&escape));
        Ok(delimiter
            .then(escaped.or(delimiter.except()).many().optional())
            .then(&delimiter))
    }
}
