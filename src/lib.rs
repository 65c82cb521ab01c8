//! Curriculum-based course timetabling by simulated annealing.
//!
//! Assigns every lecture of a course timetabling instance to a
//! room/day/slot triple, minimising soft-constraint violations while keeping
//! all hard constraints satisfied:
//!
//! - **`model`**: Read-only instance data and an ITC-2007 `.ctt` reader.
//! - **`solution`**: The assignment table plus the incidence counters that
//!   make incremental cost queries cheap; full-objective recomputation and
//!   the hard-constraint oracle.
//! - **`swap`**: Random swap moves, their closed-form soft-cost deltas, and
//!   the applicator.
//! - **`sa`**: The annealing controller with reheating and near-best
//!   early stopping.
//!
//! # Example
//!
//! ```
//! use u_timetable::model::TimetableModelBuilder;
//! use u_timetable::sa::{AnnealingParams, AnnealingRunner, HeuristicSolverState};
//! use u_timetable::solution::Solution;
//!
//! let model = TimetableModelBuilder::new("toy", 1, 2)
//!     .add_course("A", "t1", 1, 1, 3)
//!     .add_course("B", "t2", 1, 1, 1)
//!     .add_room("small", 2)
//!     .add_room("large", 5)
//!     .build()
//!     .unwrap();
//!
//! // An initial hard-feasible timetable.
//! let mut solution = Solution::new(&model);
//! solution.assign(0, 0, 0, 0);
//! solution.assign(1, 0, 0, 1);
//!
//! let mut state = HeuristicSolverState::new(solution);
//! let params = AnnealingParams::default().with_seed(7);
//! let report = AnnealingRunner::run(&mut state, &params, || false, |_| {}).unwrap();
//! assert!(report.best_cost <= 1);
//! ```
//!
//! # Architecture
//!
//! Building an initial feasible timetable is left to the caller; the
//! annealer only ever moves between feasible timetables.

pub mod error;
pub mod model;
pub mod sa;
pub mod solution;
pub mod swap;

#[cfg(test)]
pub(crate) mod testing;

pub use error::TimetableError;
