//! Error types for lookahead matching
//!
//! Errors come from two places: the bracket scan of the pattern, and the
//! delegated regex engine compiling the lookahead-free fragments. The
//! remaining variants report budget exhaustion and span layouts the matcher
//! cannot translate.

use std::fmt;
use thiserror::Error;

/// The main error type for lookahead matching
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Unbalanced parentheses in the pattern
    #[error("invalid syntax at position {position}: {kind}")]
    InvalidSyntax {
        /// Byte offset of the offending bracket
        position: usize,
        /// Which side of the pair is missing
        kind: SyntaxErrorKind,
    },

    /// A lookahead-free fragment was rejected by the regex engine
    #[error("compilation error: {0}")]
    Compile(#[from] regex::Error),

    /// The pattern has more than one lookahead group
    #[error("unsupported lookahead at position {position}: {count} lookahead groups, only one is supported")]
    MultipleLookaheads {
        /// Byte offset of the second lookahead group in the pattern
        position: usize,
        /// Number of lookahead groups found
        count: usize,
    },

    /// A lookahead span does not lie inside the fragment being matched
    #[error("lookahead span {start}..{end} is outside the pattern fragment of length {len}")]
    SpanOutOfRange {
        /// Translated start of the span
        start: isize,
        /// Translated end of the span (exclusive)
        end: isize,
        /// Length of the current fragment
        len: usize,
    },

    /// Recursion went deeper than the configured ceiling
    #[error("recursion depth limit of {0} exceeded")]
    DepthLimitExceeded(usize),

    /// More engine searches were needed than the configured budget
    #[error("match attempt limit of {0} exceeded")]
    AttemptLimitExceeded(usize),
}

/// Specific kinds of bracket imbalance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// A `)` with no open group
    UnmatchedClose,
    /// A `(` still open at the end of the pattern
    UnclosedOpen,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxErrorKind::UnmatchedClose => write!(f, "unmatched `)`"),
            SyntaxErrorKind::UnclosedOpen => write!(f, "unclosed `(`"),
        }
    }
}

impl Error {
    /// Whether this error reports unbalanced brackets
    pub fn is_invalid_syntax(&self) -> bool {
        matches!(self, Error::InvalidSyntax { .. })
    }
}

/// Result type alias for lookahead operations
pub type Result<T> = std::result::Result<T, Error>;
