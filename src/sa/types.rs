//! Observational records emitted during a run.

/// Snapshot handed to the progress callback.
///
/// Purely informational: nothing the callback does feeds back into the
/// search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Moves generated so far in this run.
    pub iteration: usize,
    /// Moves since the run-local best last improved.
    pub idle: usize,
    pub current_cost: i64,
    /// Best current cost seen during this run.
    pub local_best_cost: i64,
    /// Best cost of the whole session.
    pub best_cost: i64,
    pub temperature: f64,
}
