//! Annealing control loop.

use std::time::{Duration, Instant};

use log::{debug, error, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::AnnealingParams;
use super::state::HeuristicSolverState;
use super::types::Progress;
use crate::error::TimetableError;
use crate::swap::compute_delta;

/// Summary of one [`AnnealingRunner::run`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealingReport {
    /// Moves generated.
    pub iterations: usize,

    /// Temperature plateaus completed.
    pub plateaus: usize,

    /// Moves per plateau.
    pub plateau_length: usize,

    /// Starting temperature after reheating.
    pub initial_temperature: f64,

    /// Temperature when the loop stopped.
    pub final_temperature: f64,

    /// Moves applied.
    pub accepted_moves: usize,

    /// Applied moves with a negative delta.
    pub improving_moves: usize,

    /// Audits whose recomputed cost disagreed with the tracked cost.
    pub audit_mismatches: usize,

    /// Whether the timeout predicate ended the run.
    pub timed_out: bool,

    /// Whether the best solution improved during this run.
    pub improved_best: bool,

    /// Best cost at the end of the run.
    pub best_cost: i64,
}

/// Drives simulated annealing over the swap neighborhood.
///
/// # Algorithm
///
/// 1. Reheat: `T = T0 * reheat_coeff ^ non_improving_best_cycles`
/// 2. Until the timeout fires or `T <= min_temperature` (earlier near the best):
///    a. Run a plateau of `round(L * R * D * S * temperature_length_coeff)` moves
///    b. Each move is drawn at random; effective, feasible moves are accepted
///       if they beat the best cost or pass the Metropolis test
///    c. Cool: `T *= cooling_rate`
///
/// The search must start from a complete, hard-feasible solution; anything
/// else is rejected before any move is drawn. The timeout is only checked
/// between plateaus.
pub struct AnnealingRunner;

impl AnnealingRunner {
    /// Runs one annealing cycle on `state`, seeding the generator from
    /// `params.seed` (or the OS when unset).
    pub fn run<T, P>(
        state: &mut HeuristicSolverState<'_>,
        params: &AnnealingParams,
        timeout: T,
        progress: P,
    ) -> Result<AnnealingReport, TimetableError>
    where
        T: FnMut() -> bool,
        P: FnMut(&Progress),
    {
        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::run_with_rng(state, params, &mut rng, timeout, progress)
    }

    /// Runs one annealing cycle with a caller-provided random generator.
    pub fn run_with_rng<R, T, P>(
        state: &mut HeuristicSolverState<'_>,
        params: &AnnealingParams,
        rng: &mut R,
        mut timeout: T,
        mut progress: P,
    ) -> Result<AnnealingReport, TimetableError>
    where
        R: Rng,
        T: FnMut() -> bool,
        P: FnMut(&Progress),
    {
        params.validate().map_err(TimetableError::InvalidParams)?;
        check_feasible_start(state)?;

        let plateau_length =
            ((state.instance_size() as f64 * params.temperature_length_coeff).round() as usize).max(1);
        let report_every = 5 * plateau_length;

        let reheat = reheat_factor(params.reheat_coeff, state.non_improving_best_cycles());
        let initial_temperature = params.initial_temperature * reheat;

        debug!(
            "annealing start: cost {} best {} T0 {:.4} (reheat x{:.4}) plateau {}",
            state.current_cost(),
            state.best_cost(),
            initial_temperature,
            reheat,
            plateau_length
        );

        let start_best = state.best_cost();
        let mut temperature = initial_temperature;
        let mut local_best_cost = state.current_cost();
        let mut idle = 0usize;
        let mut iterations = 0usize;
        let mut plateaus = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut audit_mismatches = 0usize;
        let mut timed_out = false;

        loop {
            if timeout() {
                timed_out = true;
                break;
            }

            if should_stop(params, temperature, state.current_cost(), state.best_cost()) {
                break;
            }

            for _ in 0..plateau_length {
                let mv = state.generate_swap_move(rng);

                if let Some(helper) = mv.helper(state.current()) {
                    if helper.is_effective()
                        && state
                            .current()
                            .satisfy_hard_constraints_after_swap(&mv, &helper)
                    {
                        let delta = compute_delta(state.current(), &mv, &helper).cost;
                        let accept = state.current_cost() + delta < state.best_cost()
                            || rng.random::<f64>() < (-(delta as f64) / temperature).exp();

                        if accept {
                            state.apply_swap(&mv, &helper, delta);
                            accepted_moves += 1;
                            if delta < 0 {
                                improving_moves += 1;
                            }
                            if params.audit_interval > 0
                                && accepted_moves % params.audit_interval == 0
                                && !audit(state)
                            {
                                audit_mismatches += 1;
                            }
                            state.update_best_solution();
                        }
                    }
                }

                if state.current_cost() < local_best_cost {
                    local_best_cost = state.current_cost();
                    idle = 0;
                } else {
                    idle += 1;
                }

                let idle_tick = params.report_idle_interval > 0
                    && idle > 0
                    && idle % params.report_idle_interval == 0;
                if idle_tick || iterations % report_every == 0 {
                    let p = Progress {
                        iteration: iterations,
                        idle,
                        current_cost: state.current_cost(),
                        local_best_cost,
                        best_cost: state.best_cost(),
                        temperature,
                    };
                    trace!(
                        "iter {} | idle {} | current {} | local best {} | best {} | T {:.4}",
                        p.iteration,
                        p.idle,
                        p.current_cost,
                        p.local_best_cost,
                        p.best_cost,
                        p.temperature
                    );
                    progress(&p);
                }

                iterations += 1;
            }

            plateaus += 1;
            temperature *= params.cooling_rate;
        }

        if !audit(state) {
            audit_mismatches += 1;
            state.update_best_solution();
        }

        let improved_best = state.best_cost() < start_best;
        if !improved_best {
            state.record_non_improving_cycle();
        }

        debug!(
            "annealing stop: {} iterations, {} plateaus, {} accepted, best {} ({}), T {:.4}{}",
            iterations,
            plateaus,
            accepted_moves,
            state.best_cost(),
            if improved_best { "improved" } else { "not improved" },
            temperature,
            if timed_out { ", timed out" } else { "" }
        );

        Ok(AnnealingReport {
            iterations,
            plateaus,
            plateau_length,
            initial_temperature,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            audit_mismatches,
            timed_out,
            improved_best,
            best_cost: state.best_cost(),
        })
    }
}

/// Whether cooling is over.
///
/// `min_temperature` always ends the run. Near the best cost
/// (`current < round(near_best_ratio * best)`) the run also ends at
/// `min_temperature * min_temperature_near_best_coeff`, so that clause can
/// only shorten a run, never extend it.
fn should_stop(params: &AnnealingParams, temperature: f64, current_cost: i64, best_cost: i64) -> bool {
    if temperature <= params.min_temperature {
        return true;
    }
    let near_best = (current_cost as f64) < (params.near_best_ratio * best_cost as f64).round();
    near_best && temperature <= params.min_temperature * params.min_temperature_near_best_coeff
}

/// `coeff ^ cycles`; saturates to infinity rather than wrapping.
fn reheat_factor(coeff: f64, cycles: u32) -> f64 {
    coeff.powf(f64::from(cycles))
}

fn check_feasible_start(state: &HeuristicSolverState<'_>) -> Result<(), TimetableError> {
    let current = state.current();
    if !current.is_complete() {
        return Err(TimetableError::InfeasibleStart(
            "some lectures are unassigned".into(),
        ));
    }
    let violations = current.hard_violations();
    if violations > 0 {
        return Err(TimetableError::InfeasibleStart(format!(
            "{violations} hard constraint violations"
        )));
    }
    Ok(())
}

/// Recomputes the current cost from scratch. On disagreement the recomputed
/// value replaces the tracked one and `false` is returned.
fn audit(state: &mut HeuristicSolverState<'_>) -> bool {
    let actual = state.current().compute_total_cost();
    if actual == state.current_cost() {
        return true;
    }
    error!(
        "incremental cost {} disagrees with recomputed cost {}; resynchronising",
        state.current_cost(),
        actual
    );
    state.resync_current_cost(actual);
    false
}

/// A timeout predicate that fires once `limit` has elapsed since the call.
pub fn deadline(limit: Duration) -> impl FnMut() -> bool {
    let start = Instant::now();
    move || start.elapsed() > limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TimetableModel, TimetableModelBuilder};
    use crate::solution::Solution;
    use crate::testing::{assign_all, small_model};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn params() -> AnnealingParams {
        AnnealingParams::default()
            .with_initial_temperature(1.4)
            .with_min_temperature(0.12)
            .with_cooling_rate(0.965)
            .with_temperature_length_coeff(0.125)
            .with_seed(42)
    }

    #[test]
    fn test_run_improves_greedy_start() {
        init_logger();
        let model = small_model();
        let mut state = HeuristicSolverState::new(assign_all(&model));
        let start = state.best_cost();

        let report = AnnealingRunner::run(
            &mut state,
            &params().with_audit_interval(1),
            || false,
            |_| {},
        )
        .unwrap();

        assert!(report.best_cost < start, "{} !< {start}", report.best_cost);
        assert!(report.improved_best);
        assert_eq!(report.audit_mismatches, 0);
        assert_eq!(state.best().hard_violations(), 0);
        assert_eq!(state.best().compute_total_cost(), state.best_cost());
        assert_eq!(state.current().compute_total_cost(), state.current_cost());
        state.best().check_invariants().unwrap();
        assert_eq!(state.non_improving_best_cycles(), 0);
    }

    /// One lecture of 30 students in a 2-seat room: the cost is stuck at
    /// 28, so the search sits near the best for the whole run.
    fn stuck_model() -> TimetableModel {
        TimetableModelBuilder::new("stuck", 1, 1)
            .add_course("A", "t1", 1, 1, 30)
            .add_room("R", 2)
            .build()
            .unwrap()
    }

    #[test]
    fn test_plateau_count_bound_near_best() {
        let model = stuck_model();
        let mut sol = Solution::new(&model);
        sol.assign(0, 0, 0, 0);
        let mut state = HeuristicSolverState::new(sol);
        assert_eq!(state.best_cost(), 28);

        let p = AnnealingParams::default().with_seed(3);
        let report = AnnealingRunner::run(&mut state, &p, || false, |_| {}).unwrap();

        // ln(0.12 / 1.4) / ln(0.965) = 68.96..
        let bound = ((p.min_temperature / p.initial_temperature).ln() / p.cooling_rate.ln()).ceil()
            as usize;
        assert_eq!(bound, 69);
        assert!(report.plateaus <= bound, "{} > {bound}", report.plateaus);
        assert!(report.final_temperature <= p.min_temperature);
        assert!(report.final_temperature > p.min_temperature * p.cooling_rate);
        assert_eq!(report.best_cost, 28);
    }

    #[test]
    fn test_plateau_count_bound() {
        let model = small_model();
        let mut state = HeuristicSolverState::new(assign_all(&model));
        let p = params();

        let report = AnnealingRunner::run(&mut state, &p, || false, |_| {}).unwrap();

        let bound = ((p.min_temperature / p.initial_temperature).ln() / p.cooling_rate.ln()).ceil()
            as usize;
        assert!(report.plateaus <= bound, "{} > {bound}", report.plateaus);
        assert!(report.plateaus > 0);
        assert_eq!(report.iterations, report.plateaus * report.plateau_length);
        assert!(!report.timed_out);
    }

    #[test]
    fn test_should_stop() {
        let p = params();
        assert!(should_stop(&p, 0.12, 500, 100));
        assert!(should_stop(&p, 0.05, 100, 100));
        assert!(!should_stop(&p, 0.13, 100, 100));
        assert!(!should_stop(&p, 0.13, 105, 100));
        assert!(!should_stop(&p, 0.13, 0, 0));
        // Near the best the floor never drops below `min_temperature`.
        assert!(should_stop(&p, 0.1, 100, 100));
    }

    #[test]
    fn test_reheat_factor() {
        assert_eq!(reheat_factor(1.015, 0), 1.0);
        assert!((reheat_factor(1.5, 2) - 2.25).abs() < 1e-12);
        let huge = reheat_factor(1.015, u32::MAX);
        assert!(huge > 1.0);
        assert_eq!(reheat_factor(1.0, u32::MAX), 1.0);
    }

    #[test]
    fn test_incomplete_start_rejected() {
        let model = small_model();
        let mut sol = assign_all(&model);
        sol.unassign(0);
        let mut state = HeuristicSolverState::new(sol);
        let err = AnnealingRunner::run(&mut state, &params(), || false, |_| {}).unwrap_err();
        assert!(matches!(err, TimetableError::InfeasibleStart(_)));
        assert_eq!(state.non_improving_best_cycles(), 0);
    }

    #[test]
    fn test_conflicting_start_rejected() {
        // Both lectures of A share the only timeslot.
        let model = TimetableModelBuilder::new("clash", 1, 1)
            .add_course("A", "t1", 2, 1, 1)
            .add_room("R1", 5)
            .add_room("R2", 5)
            .build()
            .unwrap();
        let mut sol = Solution::new(&model);
        sol.assign(0, 0, 0, 0);
        sol.assign(1, 1, 0, 0);
        assert_eq!(sol.hard_violations(), 1);

        let mut state = HeuristicSolverState::new(sol);
        let start = state.current_cost();
        let err = AnnealingRunner::run(&mut state, &params(), || false, |_| {}).unwrap_err();
        assert!(matches!(err, TimetableError::InfeasibleStart(_)));
        assert_eq!(state.current_cost(), start);
    }

    #[test]
    fn test_timeout_stops_before_first_plateau() {
        let model = small_model();
        let mut state = HeuristicSolverState::new(assign_all(&model));
        let report = AnnealingRunner::run(&mut state, &params(), || true, |_| {}).unwrap();
        assert!(report.timed_out);
        assert_eq!(report.iterations, 0);
        assert_eq!(report.plateaus, 0);
    }

    #[test]
    fn test_timeout_checked_between_plateaus() {
        let model = small_model();
        let mut state = HeuristicSolverState::new(assign_all(&model));
        let mut calls = 0;
        let report = AnnealingRunner::run(
            &mut state,
            &params(),
            || {
                calls += 1;
                calls > 3
            },
            |_| {},
        )
        .unwrap();
        assert!(report.timed_out);
        assert_eq!(report.plateaus, 3);
    }

    #[test]
    fn test_reheating_after_non_improving_runs() {
        let model = small_model();
        let mut state = HeuristicSolverState::new(assign_all(&model));
        let p = params().with_reheat_coeff(1.5);

        // Two immediately cancelled runs cannot improve the best.
        AnnealingRunner::run(&mut state, &p, || true, |_| {}).unwrap();
        AnnealingRunner::run(&mut state, &p, || true, |_| {}).unwrap();
        assert_eq!(state.non_improving_best_cycles(), 2);

        let report = AnnealingRunner::run(&mut state, &p, || true, |_| {}).unwrap();
        assert!((report.initial_temperature - 1.4 * 1.5 * 1.5).abs() < 1e-9);
        assert_eq!(state.non_improving_best_cycles(), 3);
    }

    #[test]
    fn test_progress_reports() {
        let model = small_model();
        let mut state = HeuristicSolverState::new(assign_all(&model));
        let mut seen = Vec::new();
        let report = AnnealingRunner::run(
            &mut state,
            &params().with_report_idle_interval(0),
            || false,
            |p| seen.push(*p),
        )
        .unwrap();

        let every = 5 * report.plateau_length;
        assert_eq!(seen.len(), report.iterations.div_ceil(every));
        assert_eq!(seen[0].iteration, 0);
        for p in &seen {
            assert_eq!(p.iteration % every, 0);
            assert!(p.best_cost <= p.local_best_cost);
            assert!(p.temperature > 0.0);
        }
        for w in seen.windows(2) {
            assert!(w[1].best_cost <= w[0].best_cost);
            assert!(w[1].temperature < w[0].temperature);
        }
    }

    #[test]
    fn test_invalid_params_rejected() {
        let model = small_model();
        let mut state = HeuristicSolverState::new(assign_all(&model));
        let err = AnnealingRunner::run(
            &mut state,
            &params().with_cooling_rate(1.2),
            || false,
            |_| {},
        )
        .unwrap_err();
        assert!(matches!(err, TimetableError::InvalidParams(_)));
        assert_eq!(state.non_improving_best_cycles(), 0);
    }

    #[test]
    fn test_toy_improving_move_always_accepted() {
        // One lecture of a 3-student course in a 2-seat room; the only other
        // timeslot has a 5-seat room free.
        let model = TimetableModelBuilder::new("toy", 1, 2)
            .add_course("A", "t1", 1, 1, 3)
            .add_course("B", "t2", 1, 1, 1)
            .add_room("small", 2)
            .add_room("large", 5)
            .build()
            .unwrap();
        let mut sol = Solution::new(&model);
        sol.assign(0, 0, 0, 0);
        sol.assign(1, 0, 0, 1);
        let mut state = HeuristicSolverState::new(sol);
        assert_eq!(state.best_cost(), 1);

        let p = AnnealingParams::default()
            .with_initial_temperature(1e-3)
            .with_min_temperature(1e-4)
            .with_seed(1)
            .with_audit_interval(1);
        let report = AnnealingRunner::run(&mut state, &p, || false, |_| {}).unwrap();
        assert_eq!(report.best_cost, 0);
        assert_eq!(report.audit_mismatches, 0);
    }

    #[test]
    fn test_deadline() {
        let mut expired = deadline(Duration::ZERO);
        std::thread::sleep(Duration::from_millis(2));
        assert!(expired());
        let mut pending = deadline(Duration::from_secs(3600));
        assert!(!pending());
    }
}
