//! Developer diagnostics for pipeline discipline violations
//!
//! Violations are reported, never fatal: the store keeps running after a
//! report. Reporting is off by default in release builds, leaving a single
//! branch on the hot path.

use std::fmt;
use std::rc::Rc;

/// A breach of the store's usage contract detected at runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// `reduce` was entered while a reducer was still running.
    ///
    /// Reducers must be pure. A reducer that reaches a dispatcher and
    /// dispatches breaks the one-reduce-at-a-time rule of the store's thread.
    ReentrantReduce { action: String },
    /// A dispatch was dropped because nesting exceeded `max_dispatch_depth`
    DispatchDepthExceeded { depth: usize, limit: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::ReentrantReduce { action } => {
                write!(f, "reducer re-entered while reducing, action: {}", action)
            }
            Violation::DispatchDepthExceeded { depth, limit } => write!(
                f,
                "dispatch depth {} exceeds limit of {}, action dropped",
                depth, limit
            ),
        }
    }
}

/// Callback receiving every reported violation
pub type DiagnosticSink = Rc<dyn Fn(&Violation)>;

pub(crate) struct Diagnostics {
    sink: Option<DiagnosticSink>,
}

impl Diagnostics {
    /// Disabled diagnostics ignore the sink entirely
    pub(crate) fn new(enabled: bool, sink: Option<DiagnosticSink>) -> Self {
        let sink = enabled.then(|| sink.unwrap_or_else(|| Rc::new(log_violation)));
        Self { sink }
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub(crate) fn report(&self, violation: Violation) {
        if let Some(sink) = &self.sink {
            sink(&violation);
        }
    }
}

fn log_violation(violation: &Violation) {
    log::warn!("reflow: {}", violation);
}
