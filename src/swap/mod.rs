//! Swap neighborhood.
//!
//! A move picks one lecture and a target room/day/slot. If the target is
//! occupied the two lectures trade places, otherwise the lecture simply
//! relocates. Evaluation is incremental: the soft-cost delta is derived in
//! closed form from the solution's incidence counters, and hard feasibility
//! is checked by the solution's oracle before anything is mutated.

mod delta;
mod moves;
mod types;

pub use delta::compute_delta;
pub use moves::{apply, predict, swap_extended};
pub use types::{SwapDelta, SwapHelper, SwapMove, SwapResult, SwapStrategy};
