//! Optional tracing of intermediate match attempts
//!
//! The matcher reports every lookahead-free fragment it hands to the regex
//! engine, together with the subject text it is tested against. Nothing is
//! printed unless a sink is installed on the [`MatcherBuilder`].
//!
//! [`MatcherBuilder`]: crate::MatcherBuilder

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Which step of the recursion produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceStage {
    /// The text before a lookahead, searched for candidate positions
    Prefix,
    /// A fragment with no lookahead left, decided by the engine directly
    Residue,
}

/// A single fragment handed to the regex engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEvent<'a> {
    pub stage: TraceStage,
    /// Recursion depth, 0 for the caller's pattern
    pub depth: usize,
    pub pattern: &'a str,
    pub subject: &'a str,
}

impl fmt::Display for TraceEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "try to match {} by {}", self.subject, self.pattern)
    }
}

/// Receiver of trace events
pub type TraceSink = Arc<dyn Fn(&TraceEvent<'_>) + Send + Sync>;

/// Collects events into memory; used by tests and the CLI `--trace` output
#[derive(Debug, Clone, Default)]
pub struct TraceLog {
    lines: Arc<Mutex<Vec<(TraceStage, usize, String, String)>>>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that appends to this log
    pub fn sink(&self) -> impl Fn(&TraceEvent<'_>) + Send + Sync + 'static {
        let lines = Arc::clone(&self.lines);
        move |event: &TraceEvent<'_>| {
            lines
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((
                    event.stage,
                    event.depth,
                    event.pattern.to_string(),
                    event.subject.to_string(),
                ));
        }
    }

    /// Recorded `(stage, depth, pattern, subject)` entries in order
    pub fn entries(&self) -> Vec<(TraceStage, usize, String, String)> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
