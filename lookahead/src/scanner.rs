//! Bracket scanner for locating lookahead groups
//!
//! A single left-to-right pass over the pattern keeps a stack of open
//! brackets. Ordinary groups are discarded when they close; lookahead groups
//! become [`LookaheadSpan`]s, emitted in the order their `)` is seen.

use crate::error::{Error, Result, SyntaxErrorKind};
use std::fmt;

/// Opening marker of a positive lookahead
pub const POSITIVE_MARKER: &str = "(?=";
/// Opening marker of a negative lookahead
pub const NEGATIVE_MARKER: &str = "(?!";
/// Length of both lookahead markers
pub const MARKER_LEN: usize = 3;

/// The kind of an open bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    /// A capturing or non-capturing group, left to the engine
    Ordinary,
    /// `(?=`
    PositiveLookahead,
    /// `(?!`
    NegativeLookahead,
}

/// An open bracket waiting for its `)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketFrame {
    pub kind: BracketKind,
    /// Byte offset of the opening `(`
    pub start: usize,
}

/// Polarity of a lookahead assertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookaheadKind {
    Positive,
    Negative,
}

impl LookaheadKind {
    /// The opening marker for this kind
    pub fn marker(self) -> &'static str {
        match self {
            LookaheadKind::Positive => POSITIVE_MARKER,
            LookaheadKind::Negative => NEGATIVE_MARKER,
        }
    }

    /// Apply the polarity to the result of the interior match
    pub fn apply(self, matched: bool) -> bool {
        match self {
            LookaheadKind::Positive => matched,
            LookaheadKind::Negative => !matched,
        }
    }
}

impl fmt::Display for LookaheadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookaheadKind::Positive => write!(f, "positive"),
            LookaheadKind::Negative => write!(f, "negative"),
        }
    }
}

/// A resolved lookahead group, `start..end` covering the marker through the `)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookaheadSpan {
    pub kind: LookaheadKind,
    /// Byte offset of the opening `(`
    pub start: usize,
    /// Byte offset one past the closing `)`
    pub end: usize,
}

impl LookaheadSpan {
    /// The assertion body, between the marker and the closing `)`
    ///
    /// Returns `None` if the span does not belong to `pattern`.
    pub fn interior<'p>(&self, pattern: &'p str) -> Option<&'p str> {
        pattern.get(self.start + MARKER_LEN..self.end.checked_sub(1)?)
    }

    /// The full group text including the marker
    pub fn as_str<'p>(&self, pattern: &'p str) -> Option<&'p str> {
        pattern.get(self.start..self.end)
    }
}

/// Scanner over the bytes of a pattern
pub struct Scanner<'a> {
    input: &'a [u8],
    position: usize,
    stack: Vec<BracketFrame>,
    spans: Vec<LookaheadSpan>,
    /// Off for patterns too short to hold a whole lookahead group
    recognize_lookaheads: bool,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given pattern
    pub fn new(pattern: &'a str) -> Self {
        Scanner {
            input: pattern.as_bytes(),
            position: 0,
            stack: Vec::new(),
            spans: Vec::new(),
            recognize_lookaheads: pattern.len() > MARKER_LEN,
        }
    }

    /// Run the scan and return the lookahead spans in discovery order
    pub fn scan(mut self) -> Result<Vec<LookaheadSpan>> {
        while self.position < self.input.len() {
            match self.input[self.position] {
                b'(' => self.open(),
                b')' => self.close()?,
                b'\\' => self.position += 1,
                b'[' => {
                    self.skip_class();
                    continue;
                }
                _ => {}
            }
            self.position += 1;
        }

        match self.stack.last() {
            Some(frame) => Err(Error::InvalidSyntax {
                position: frame.start,
                kind: SyntaxErrorKind::UnclosedOpen,
            }),
            None => Ok(self.spans),
        }
    }

    fn open(&mut self) {
        let start = self.position;
        let kind = match self.peek_marker() {
            Some(b"?=") => BracketKind::PositiveLookahead,
            Some(b"?!") => BracketKind::NegativeLookahead,
            _ => BracketKind::Ordinary,
        };
        if kind != BracketKind::Ordinary {
            // skip the two marker bytes; the main loop steps over the `(`
            self.position += 2;
        }
        self.stack.push(BracketFrame { kind, start });
    }

    fn peek_marker(&self) -> Option<&'a [u8]> {
        if !self.recognize_lookaheads {
            return None;
        }
        self.input.get(self.position + 1..self.position + MARKER_LEN)
    }

    fn close(&mut self) -> Result<()> {
        let frame = self.stack.pop().ok_or(Error::InvalidSyntax {
            position: self.position,
            kind: SyntaxErrorKind::UnmatchedClose,
        })?;
        let kind = match frame.kind {
            BracketKind::Ordinary => return Ok(()),
            BracketKind::PositiveLookahead => LookaheadKind::Positive,
            BracketKind::NegativeLookahead => LookaheadKind::Negative,
        };
        self.spans.push(LookaheadSpan {
            kind,
            start: frame.start,
            end: self.position + 1,
        });
        Ok(())
    }

    /// Move past a character class, nested classes included. Brackets inside
    /// a class are literals. An unterminated class runs to the end of input
    /// and is left for the engine to reject.
    fn skip_class(&mut self) {
        let mut depth = 0usize;
        while self.position < self.input.len() {
            match self.input[self.position] {
                b'[' => {
                    depth += 1;
                    self.position += 1;
                    self.skip_class_prefix();
                    continue;
                }
                b']' => {
                    depth -= 1;
                    if depth == 0 {
                        self.position += 1;
                        return;
                    }
                }
                b'\\' => self.position += 1,
                _ => {}
            }
            self.position += 1;
        }
    }

    /// A `^` and then a `]` right after `[` are literal members of the class
    fn skip_class_prefix(&mut self) {
        if self.input.get(self.position) == Some(&b'^') {
            self.position += 1;
        }
        if self.input.get(self.position) == Some(&b']') {
            self.position += 1;
        }
    }
}

/// Scan a pattern for lookahead groups
///
/// # Example
/// ```
/// use lookahead::{scan, LookaheadKind};
///
/// let spans = scan("^foo(?=bar)").unwrap();
/// assert_eq!(spans.len(), 1);
/// assert_eq!(spans[0].kind, LookaheadKind::Positive);
/// assert_eq!((spans[0].start, spans[0].end), (4, 11));
/// ```
pub fn scan(pattern: &str) -> Result<Vec<LookaheadSpan>> {
    Scanner::new(pattern).scan()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(kind: LookaheadKind, start: usize, end: usize) -> LookaheadSpan {
        LookaheadSpan { kind, start, end }
    }

    #[test]
    fn test_no_brackets() {
        assert_eq!(scan("abcdef").unwrap(), vec![]);
        assert_eq!(scan("").unwrap(), vec![]);
    }

    #[test]
    fn test_ordinary_groups_not_tracked() {
        assert_eq!(scan("(a)(b(c))").unwrap(), vec![]);
        assert_eq!(scan("(?:abc)+").unwrap(), vec![]);
    }

    #[test]
    fn test_positive_lookahead() {
        assert_eq!(
            scan("^foo(?=bar)").unwrap(),
            vec![span(LookaheadKind::Positive, 4, 11)]
        );
    }

    #[test]
    fn test_negative_lookahead() {
        assert_eq!(
            scan("^foo(?!bar)").unwrap(),
            vec![span(LookaheadKind::Negative, 4, 11)]
        );
    }

    #[test]
    fn test_sequential_lookaheads_in_source_order() {
        assert_eq!(
            scan("a(?=b)c(?!d)").unwrap(),
            vec![
                span(LookaheadKind::Positive, 1, 6),
                span(LookaheadKind::Negative, 7, 12)
            ]
        );
    }

    #[test]
    fn test_nested_lookaheads_in_closing_order() {
        // inner group closes first
        assert_eq!(
            scan("a(?=b(?!c))").unwrap(),
            vec![
                span(LookaheadKind::Negative, 5, 10),
                span(LookaheadKind::Positive, 1, 11)
            ]
        );
    }

    #[test]
    fn test_lookahead_containing_ordinary_group() {
        assert_eq!(
            scan("x(?=(ab)+)").unwrap(),
            vec![span(LookaheadKind::Positive, 1, 10)]
        );
    }

    #[test]
    fn test_short_pattern_fast_path() {
        assert_eq!(scan("(a)").unwrap(), vec![]);
        assert_eq!(scan("ab").unwrap(), vec![]);
        // too short to be a lookahead, so the `(` is an ordinary open group
        assert_eq!(
            scan("(?=").unwrap_err(),
            Error::InvalidSyntax {
                position: 0,
                kind: SyntaxErrorKind::UnclosedOpen
            }
        );
    }

    #[test]
    fn test_empty_lookahead_body() {
        assert_eq!(
            scan("a(?=)").unwrap(),
            vec![span(LookaheadKind::Positive, 1, 5)]
        );
    }

    #[test]
    fn test_unmatched_close() {
        assert_eq!(
            scan("a)").unwrap_err(),
            Error::InvalidSyntax {
                position: 1,
                kind: SyntaxErrorKind::UnmatchedClose
            }
        );
        assert!(scan("(a))b").unwrap_err().is_invalid_syntax());
    }

    #[test]
    fn test_unclosed_open() {
        assert_eq!(
            scan("(a").unwrap_err(),
            Error::InvalidSyntax {
                position: 0,
                kind: SyntaxErrorKind::UnclosedOpen
            }
        );
        assert_eq!(
            scan("x(?=ab(c)").unwrap_err(),
            Error::InvalidSyntax {
                position: 1,
                kind: SyntaxErrorKind::UnclosedOpen
            }
        );
    }

    #[test]
    fn test_escaped_parens_are_literal() {
        assert_eq!(scan(r"a\)b\(").unwrap(), vec![]);
        assert_eq!(
            scan(r"\((?=\))").unwrap(),
            vec![span(LookaheadKind::Positive, 2, 8)]
        );
    }

    #[test]
    fn test_parens_in_class_are_literal() {
        assert_eq!(scan("[()]+").unwrap(), vec![]);
        assert_eq!(scan("[]()]x").unwrap(), vec![]);
        assert_eq!(scan("[^]()]x").unwrap(), vec![]);
        assert_eq!(scan("[[:alpha:]()]").unwrap(), vec![]);
        assert_eq!(
            scan("a(?=[)])").unwrap(),
            vec![span(LookaheadKind::Positive, 1, 8)]
        );
    }

    #[test]
    fn test_unicode_subject_text_in_pattern() {
        let pattern = "héllo(?=wörld)";
        let spans = scan(pattern).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].interior(pattern), Some("wörld"));
        assert_eq!(spans[0].as_str(pattern), Some("(?=wörld)"));
    }

    #[test]
    fn test_kind_helpers() {
        assert_eq!(LookaheadKind::Positive.marker(), "(?=");
        assert_eq!(LookaheadKind::Negative.marker(), "(?!");
        assert!(LookaheadKind::Positive.apply(true));
        assert!(LookaheadKind::Negative.apply(false));
        assert!(!LookaheadKind::Negative.apply(true));
    }
}
