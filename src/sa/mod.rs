//! Simulated Annealing over the swap neighborhood.
//!
//! A single chain: one [`HeuristicSolverState`] holds the current and best
//! timetables, and [`AnnealingRunner`] cools through fixed-length
//! temperature plateaus, accepting worsening moves with the Metropolis
//! probability. Successive runs on the same state start hotter the longer
//! the best solution has not improved.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Bellio, Ceschia, Di Gaspero, Schaerf & Urli (2016), "Feature-based tuning
//!   of simulated annealing applied to the curriculum-based course
//!   timetabling problem"

mod config;
mod runner;
mod state;
mod types;

pub use config::AnnealingParams;
pub use runner::{deadline, AnnealingReport, AnnealingRunner};
pub use state::HeuristicSolverState;
pub use types::Progress;
