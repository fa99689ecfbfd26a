use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of error categories a validator can report. Kept distinct
/// from `message` because the spec guarantees kind + offset, not wording.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegExpSyntaxErrorKind {
    UnterminatedGroup,
    UnterminatedClass,
    UnterminatedEscape,
    InvalidEscape,
    InvalidCharacterClass,
    InvalidQuantifier,
    InvalidUnicodeProperty,
    InvalidBackreference,
    InvalidFlags,
    InvalidNamedCapture,
    InvalidGrammar,
    PatternTooLarge,
    /// Event-stream misuse / assembler invariant violation: a bug in this
    /// crate, not in the input pattern.
    InternalError,
}

#[derive(Debug, Error, Deserialize, Serialize, PartialEq, Eq)]
#[error("Invalid regular expression: {message}")]
pub struct RegExpSyntaxError {
    pub message: String,
    pub index: usize,
    pub kind: RegExpSyntaxErrorKind,
}

impl RegExpSyntaxError {
    pub fn new(index: usize, kind: RegExpSyntaxErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            index,
            kind,
        }
    }
}
