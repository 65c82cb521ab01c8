//! Move evaluation and application.

use super::delta::compute_delta;
use super::types::{SwapHelper, SwapMove, SwapResult, SwapStrategy};
use crate::solution::Solution;

/// Evaluates `mv` against `sol` without mutating it.
///
/// Returns the endpoint snapshot alongside the result so the caller can pass
/// it on to [`apply`]. Returns `None` if the moved lecture is unassigned.
pub fn predict(
    sol: &Solution<'_>,
    mv: &SwapMove,
    require_feasibility: bool,
    compute_cost: bool,
) -> Option<(SwapHelper, SwapResult)> {
    let helper = mv.helper(sol)?;
    let mut result = SwapResult::default();

    if require_feasibility {
        result.feasible = sol.satisfy_hard_constraints_after_swap(mv, &helper);
    }
    if compute_cost {
        result.delta = compute_delta(sol, mv, &helper);
    }

    Some((helper, result))
}

/// Performs `mv`: `l1` goes to the target, its previous occupant (if any)
/// goes to the slot `l1` left.
///
/// No feasibility check is made. `helper` must have been computed against
/// the current state of `sol`.
pub fn apply(sol: &mut Solution<'_>, mv: &SwapMove, helper: &SwapHelper) {
    if mv.is_noop(helper) {
        return;
    }

    sol.unassign(mv.l1);
    if let Some(l2) = helper.l2 {
        sol.unassign(l2);
    }

    sol.assign(mv.l1, mv.r2, mv.d2, mv.s2);
    if let Some(l2) = helper.l2 {
        sol.assign(l2, helper.r1, helper.d1, helper.s1);
    }
}

/// Evaluates `mv` and applies it if `strategy` allows. Returns whether the
/// move was applied.
pub fn swap_extended(sol: &mut Solution<'_>, mv: &SwapMove, strategy: SwapStrategy) -> bool {
    let Some((helper, result)) = predict(sol, mv, true, true) else {
        return false;
    };

    let apply_it = match strategy {
        SwapStrategy::Always | SwapStrategy::IfFeasible => result.feasible,
        SwapStrategy::IfBetter | SwapStrategy::IfFeasibleAndBetter => {
            result.feasible && result.delta.cost < 0
        }
    };

    if apply_it {
        apply(sol, mv, &helper);
    }
    apply_it
}
