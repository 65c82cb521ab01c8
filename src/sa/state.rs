//! Search session state shared across annealing runs.

use rand::Rng;

use crate::model::TimetableModel;
use crate::solution::Solution;
use crate::swap::{self, SwapHelper, SwapMove, SwapResult};

/// The current and best timetables of a search, with their costs.
///
/// `current` and `best` are independent copies: improving the best copies
/// the current solution over, so later moves never leak into it.
#[derive(Debug, Clone)]
pub struct HeuristicSolverState<'m> {
    model: &'m TimetableModel,
    current: Solution<'m>,
    best: Solution<'m>,
    current_cost: i64,
    best_cost: i64,
    non_improving_best_cycles: u32,
}

impl<'m> HeuristicSolverState<'m> {
    /// Starts a session from a complete, hard-feasible solution.
    pub fn new(solution: Solution<'m>) -> Self {
        let cost = solution.compute_total_cost();
        Self {
            model: solution.model(),
            best: solution.clone(),
            current: solution,
            current_cost: cost,
            best_cost: cost,
            non_improving_best_cycles: 0,
        }
    }

    pub fn model(&self) -> &'m TimetableModel {
        self.model
    }

    pub fn current(&self) -> &Solution<'m> {
        &self.current
    }

    pub fn best(&self) -> &Solution<'m> {
        &self.best
    }

    pub fn current_cost(&self) -> i64 {
        self.current_cost
    }

    pub fn best_cost(&self) -> i64 {
        self.best_cost
    }

    /// Consecutive runs that ended without improving the best.
    pub fn non_improving_best_cycles(&self) -> u32 {
        self.non_improving_best_cycles
    }

    /// Consumes the session and returns the best solution.
    pub fn into_best(self) -> Solution<'m> {
        self.best
    }

    /// `lectures * rooms * days * slots`.
    pub(crate) fn instance_size(&self) -> usize {
        let m = self.model;
        m.n_lectures() * m.n_rooms() * m.n_days() * m.n_slots()
    }

    pub fn generate_swap_move<R: Rng>(&self, rng: &mut R) -> SwapMove {
        SwapMove::random(self.model, rng)
    }

    /// Evaluates a move against the current solution.
    pub fn predict_swap(&self, mv: &SwapMove) -> Option<(SwapHelper, SwapResult)> {
        swap::predict(&self.current, mv, true, true)
    }

    /// Applies an already evaluated move and books its cost delta.
    pub fn apply_swap(&mut self, mv: &SwapMove, helper: &SwapHelper, delta: i64) {
        swap::apply(&mut self.current, mv, helper);
        self.current_cost += delta;
    }

    /// Replaces the tracked current cost, e.g. after an audit.
    pub(crate) fn resync_current_cost(&mut self, cost: i64) {
        self.current_cost = cost;
    }

    /// Copies the current solution into the best one if it is strictly
    /// cheaper. Returns whether the best changed.
    pub fn update_best_solution(&mut self) -> bool {
        if self.current_cost < self.best_cost {
            self.best.copy_from(&self.current);
            self.best_cost = self.current_cost;
            self.non_improving_best_cycles = 0;
            true
        } else {
            false
        }
    }

    pub(crate) fn record_non_improving_cycle(&mut self) {
        self.non_improving_best_cycles = self.non_improving_best_cycles.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assign_all, small_model};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_state_costs() {
        let model = small_model();
        let sol = assign_all(&model);
        let cost = sol.compute_total_cost();
        let state = HeuristicSolverState::new(sol);
        assert_eq!(state.current_cost(), cost);
        assert_eq!(state.best_cost(), cost);
        assert_eq!(state.non_improving_best_cycles(), 0);
        assert_eq!(state.instance_size(), 12 * 3 * 3 * 4);
    }

    #[test]
    fn test_best_is_not_aliased() {
        let model = small_model();
        let mut state = HeuristicSolverState::new(assign_all(&model));
        let mut rng = StdRng::seed_from_u64(3);

        // Find an improving feasible move and take it.
        let mut improved = false;
        for _ in 0..10_000 {
            let mv = state.generate_swap_move(&mut rng);
            let (helper, result) = state.predict_swap(&mv).unwrap();
            if result.feasible && result.delta.cost < 0 {
                state.apply_swap(&mv, &helper, result.delta.cost);
                improved = state.update_best_solution();
                break;
            }
        }
        assert!(improved);
        let best_text = state.best().to_string();
        let best_cost = state.best_cost();

        // Worsen the current solution; the best must not follow.
        for _ in 0..10_000 {
            let mv = state.generate_swap_move(&mut rng);
            let (helper, result) = state.predict_swap(&mv).unwrap();
            if result.feasible && result.delta.cost > 0 {
                state.apply_swap(&mv, &helper, result.delta.cost);
                break;
            }
        }
        assert!(state.current_cost() > best_cost);
        assert!(!state.update_best_solution());
        assert_eq!(state.best().to_string(), best_text);
        assert_eq!(state.best().compute_total_cost(), best_cost);
        assert_eq!(state.current().compute_total_cost(), state.current_cost());
    }
}
