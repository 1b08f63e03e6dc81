//! Lookahead assertions for the `regex` crate
//!
//! The `regex` crate guarantees linear-time matching and so has no
//! look-around. This crate adds `(?=...)` and `(?!...)` on top of it: the
//! pattern is scanned once for lookahead groups, and matching recurses over
//! them while the engine handles every lookahead-free fragment.
//!
//! A pattern may hold at most one lookahead group; patterns with more, nested
//! or sequential, are rejected with [`Error::MultipleLookaheads`]. Text that
//! follows the lookahead group is not matched; the assertion is checked at
//! each position where the text before it matches.

pub mod error;
pub mod matcher;
pub mod scanner;
pub mod trace;

pub use error::{Error, Result, SyntaxErrorKind};
pub use matcher::{DEFAULT_ATTEMPT_LIMIT, DEFAULT_MAX_DEPTH, Matcher, MatcherBuilder};
pub use scanner::{BracketFrame, BracketKind, LookaheadKind, LookaheadSpan, Scanner, scan};
pub use trace::{TraceEvent, TraceLog, TraceSink, TraceStage};

/// Check whether `subject` matches `pattern`, honoring lookahead groups
///
/// This is the main entry point for one-off matches. Use [`Matcher`] to reuse
/// a scanned pattern or [`MatcherBuilder`] to configure limits and tracing.
///
/// # Example
/// ```
/// use lookahead::match_string;
///
/// assert!(match_string("^foo(?=bar)", "foobar").unwrap());
/// assert!(!match_string("^foo(?=bar)", "foobaz").unwrap());
/// assert!(match_string("a)", "a").is_err());
/// ```
pub fn match_string(pattern: &str, subject: &str) -> Result<bool> {
    Matcher::new(pattern)?.is_match(subject)
}
