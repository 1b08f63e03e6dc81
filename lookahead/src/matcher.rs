//! Lookahead-aware matching on top of the `regex` crate
//!
//! The pattern is cut at its first remaining lookahead group. The text before
//! the group is a lookahead-free prefix that the regex engine can search on
//! its own; every non-overlapping match of that prefix is a candidate
//! position. The group's interior, anchored with `^`, is then matched
//! recursively against the subject right after each candidate, and the
//! result is negated for `(?!`. Any candidate that succeeds makes the whole
//! match succeed.

use crate::error::{Error, Result};
use crate::scanner::{LookaheadSpan, MARKER_LEN, scan};
use crate::trace::{TraceEvent, TraceSink, TraceStage};
use regex::RegexBuilder;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Default ceiling on recursion depth
pub const DEFAULT_MAX_DEPTH: usize = 64;
/// Default number of engine searches allowed per match
pub const DEFAULT_ATTEMPT_LIMIT: usize = 1_000_000;

#[derive(Clone)]
struct MatcherOptions {
    max_depth: usize,
    attempt_limit: usize,
    delegate_size_limit: Option<usize>,
    trace: Option<TraceSink>,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        MatcherOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            attempt_limit: DEFAULT_ATTEMPT_LIMIT,
            delegate_size_limit: None,
            trace: None,
        }
    }
}

impl fmt::Debug for MatcherOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatcherOptions")
            .field("max_depth", &self.max_depth)
            .field("attempt_limit", &self.attempt_limit)
            .field("delegate_size_limit", &self.delegate_size_limit)
            .field("trace", &self.trace.is_some())
            .finish()
    }
}

/// A builder for a [`Matcher`] to allow configuring options
#[derive(Debug, Clone, Default)]
pub struct MatcherBuilder(MatcherOptions);

impl MatcherBuilder {
    /// Create a new builder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the [`Matcher`]
    ///
    /// # Errors
    /// Returns [`Error::InvalidSyntax`] if the pattern's brackets are unbalanced,
    /// and [`Error::MultipleLookaheads`] if it has more than one lookahead group.
    pub fn build(&self, pattern: impl Into<String>) -> Result<Matcher> {
        let pattern = pattern.into();
        let spans = scan(&pattern)?;
        if spans.len() > 1 {
            let mut starts: Vec<usize> = spans.iter().map(|span| span.start).collect();
            starts.sort_unstable();
            return Err(Error::MultipleLookaheads {
                position: starts[1],
                count: spans.len(),
            });
        }
        Ok(Matcher {
            pattern,
            spans,
            options: self.0.clone(),
        })
    }

    /// Limit how deep the recursion over lookahead groups may go. Exceeding
    /// it returns [`Error::DepthLimitExceeded`].
    ///
    /// Default is 64.
    pub fn max_depth(&mut self, limit: usize) -> &mut Self {
        self.0.max_depth = limit;
        self
    }

    /// Limit how many times the regex engine is asked to search during one
    /// [`Matcher::is_match`] call. Every candidate position of a prefix spawns
    /// a full sub-match, so patterns with several lookaheads can grow
    /// exponentially. Exceeding the limit returns [`Error::AttemptLimitExceeded`].
    ///
    /// Default is `1_000_000` (1 million).
    pub fn attempt_limit(&mut self, limit: usize) -> &mut Self {
        self.0.attempt_limit = limit;
        self
    }

    /// Set the approximate size limit of each compiled fragment, forwarded to
    /// [`regex::RegexBuilder::size_limit`].
    pub fn delegate_size_limit(&mut self, limit: usize) -> &mut Self {
        self.0.delegate_size_limit = Some(limit);
        self
    }

    /// Install a sink receiving every fragment handed to the regex engine
    pub fn trace<F>(&mut self, sink: F) -> &mut Self
    where
        F: Fn(&TraceEvent<'_>) + Send + Sync + 'static,
    {
        self.0.trace = Some(Arc::new(sink));
        self
    }
}

/// A pattern with lookahead groups, ready for matching
#[derive(Debug, Clone)]
pub struct Matcher {
    pattern: String,
    spans: Vec<LookaheadSpan>,
    options: MatcherOptions,
}

impl Matcher {
    /// Scan a pattern with default options
    pub fn new(pattern: &str) -> Result<Self> {
        MatcherBuilder::new().build(pattern)
    }

    /// The original pattern text
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Lookahead groups in the order they are consumed
    pub fn spans(&self) -> &[LookaheadSpan] {
        &self.spans
    }

    /// Check whether the subject matches, honoring lookahead groups
    ///
    /// # Example
    /// ```
    /// use lookahead::Matcher;
    ///
    /// let matcher = Matcher::new("^foo(?!bar)").unwrap();
    /// assert!(matcher.is_match("foobaz").unwrap());
    /// assert!(!matcher.is_match("foobar").unwrap());
    /// ```
    pub fn is_match(&self, subject: &str) -> Result<bool> {
        let state = MatchState {
            pattern: &self.pattern,
            spans: &self.spans,
            offset: 0,
            subject,
        };
        Search::new(&self.options).run(state, 0)
    }
}

/// One level of the recursion
#[derive(Debug, Clone, Copy)]
struct MatchState<'a> {
    /// The fragment being matched, either the original pattern or an
    /// anchored lookahead interior
    pattern: &'a str,
    spans: &'a [LookaheadSpan],
    /// Subject bytes consumed so far; subtracted from span offsets to map
    /// them into `pattern`
    offset: usize,
    subject: &'a str,
}

impl<'a> MatchState<'a> {
    /// Cut the fragment at `span` into the prefix before it and its interior
    fn split(&self, span: &LookaheadSpan) -> Result<(&'a str, &'a str)> {
        let out_of_range = || Error::SpanOutOfRange {
            start: span.start as isize - self.offset as isize,
            end: span.end as isize - self.offset as isize,
            len: self.pattern.len(),
        };
        let start = span.start.checked_sub(self.offset).ok_or_else(out_of_range)?;
        let end = span.end.checked_sub(self.offset).ok_or_else(out_of_range)?;
        let prefix = self.pattern.get(..start).ok_or_else(out_of_range)?;
        let interior = self
            .pattern
            .get(start + MARKER_LEN..end.saturating_sub(1))
            .ok_or_else(out_of_range)?;
        Ok((prefix, interior))
    }
}

/// Per-call bookkeeping for a single `is_match`
struct Search<'m> {
    options: &'m MatcherOptions,
    attempts: usize,
    /// Compiled fragments keyed by pattern text
    compiled: HashMap<String, regex::Regex>,
}

impl<'m> Search<'m> {
    fn new(options: &'m MatcherOptions) -> Self {
        Search {
            options,
            attempts: 0,
            compiled: HashMap::new(),
        }
    }

    fn run(&mut self, state: MatchState<'_>, depth: usize) -> Result<bool> {
        if depth > self.options.max_depth {
            return Err(Error::DepthLimitExceeded(self.options.max_depth));
        }

        let Some((span, rest)) = state.spans.split_first() else {
            self.emit(TraceStage::Residue, depth, state.pattern, state.subject);
            let regex = self.compile(state.pattern)?;
            self.attempt()?;
            return Ok(regex.is_match(state.subject));
        };

        let (prefix, interior) = state.split(span)?;
        let regex = self.compile(prefix)?;
        self.emit(TraceStage::Prefix, depth, prefix, state.subject);
        self.attempt()?;

        let anchored = format!("^{interior}");
        for candidate in regex.find_iter(state.subject) {
            let next = MatchState {
                pattern: &anchored,
                spans: rest,
                offset: state.offset + candidate.end(),
                subject: &state.subject[candidate.end()..],
            };
            let matched = self.run(next, depth + 1)?;
            if span.kind.apply(matched) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn compile(&mut self, pattern: &str) -> Result<regex::Regex> {
        if let Some(regex) = self.compiled.get(pattern) {
            return Ok(regex.clone());
        }
        let mut builder = RegexBuilder::new(pattern);
        if let Some(limit) = self.options.delegate_size_limit {
            builder.size_limit(limit);
        }
        let regex = builder.build()?;
        self.compiled.insert(pattern.to_string(), regex.clone());
        Ok(regex)
    }

    fn attempt(&mut self) -> Result<()> {
        self.attempts += 1;
        if self.attempts > self.options.attempt_limit {
            return Err(Error::AttemptLimitExceeded(self.options.attempt_limit));
        }
        Ok(())
    }

    fn emit(&self, stage: TraceStage, depth: usize, pattern: &str, subject: &str) {
        if let Some(sink) = &self.options.trace {
            sink(&TraceEvent {
                stage,
                depth,
                pattern,
                subject,
            });
        }
    }
}
