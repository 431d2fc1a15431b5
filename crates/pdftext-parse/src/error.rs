//! Error types for the tokenizer and interpreter layers.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Lexical and structural
//! variants carry the absolute byte offset in the logical content stream
//! (all parts concatenated) where the problem was detected.

use thiserror::Error;

/// Error raised while scanning, assembling or interpreting a content stream.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The source is exhausted and no partial token is pending.
    #[error("end of input")]
    EndOfInput,

    /// A token violates the lexical grammar.
    #[error("malformed token at offset {offset}: {reason}")]
    MalformedToken { offset: u64, reason: String },

    /// `>>` or `]` without a matching open frame of the same kind.
    #[error("unbalanced '{marker}' at offset {offset}")]
    UnbalancedClose { offset: u64, marker: &'static str },

    /// A dictionary closed with an odd number of accumulated values.
    #[error("dictionary closed with a key but no value at offset {offset}")]
    OddDictionary { offset: u64 },

    /// A dictionary key position held something other than a name.
    #[error("dictionary key is not a name at offset {offset}")]
    NonNameKey { offset: u64 },

    /// Error reported by the underlying byte source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configured nesting or operand limit was exceeded.
    #[error("{limit} limit exceeded ({value})")]
    LimitExceeded { limit: &'static str, value: usize },

    /// A font could not be resolved to a decoder.
    #[error("font error for {font}: {reason}")]
    Font { font: String, reason: String },

    /// Error returned by a caller's text handler.
    #[error("handler error: {0}")]
    Handler(String),
}

impl ContentError {
    pub(crate) fn malformed(offset: u64, reason: impl Into<String>) -> Self {
        ContentError::MalformedToken {
            offset,
            reason: reason.into(),
        }
    }

    /// Whether this is the normal end-of-input signal.
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, ContentError::EndOfInput)
    }
}
