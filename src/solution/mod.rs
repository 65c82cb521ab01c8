//! Solution state.
//!
//! Owns every piece of mutable scheduling data: the lecture assignment table
//! and the incidence counters derived from it. Also hosts the full-objective
//! recomputation and the hard-constraint oracle consulted before a move is
//! applied.

mod state;
mod types;

pub use state::Solution;
pub use types::{Assignment, CostBreakdown, CostWeights};
