//! Closed-form soft-cost deltas of a swap move.
//!
//! Every term is evaluated from the incidence counters of the current
//! solution plus the two endpoints of the move, once per direction
//! (`c1` leaving `(r1, d1, s1)` for `(r2, d2, s2)`, and `c2` making the
//! opposite trip) and summed. Nothing is mutated.
//!
//! The compactness term assumes the move keeps the timetable hard-feasible
//! (at most one lecture per curriculum and timeslot). Deltas of infeasible
//! moves are not meaningful; such moves are rejected by the oracle anyway.

use super::types::{SwapDelta, SwapHelper, SwapMove};
use crate::solution::Solution;

/// Computes every soft-cost delta of `mv`.
pub fn compute_delta(sol: &Solution<'_>, mv: &SwapMove, h: &SwapHelper) -> SwapDelta {
    let c1 = Some(h.c1);
    let c2 = h.c2;
    let from = (h.d1, h.s1);
    let to = (mv.d2, mv.s2);

    let room_capacity =
        room_capacity_cost(sol, c1, h.r1, mv.r2) + room_capacity_cost(sol, c2, mv.r2, h.r1);

    let min_working_days = min_working_days_cost(sol, c1, h.d1, c2, mv.d2)
        + min_working_days_cost(sol, c2, mv.d2, c1, h.d1);

    let room_stability = room_stability_cost(sol, c1, h.r1, c2, mv.r2)
        + room_stability_cost(sol, c2, mv.r2, c1, h.r1);

    let curriculum_compactness = curriculum_compactness_cost(sol, c1, from, c2, to)
        + curriculum_compactness_cost(sol, c2, to, c1, from);

    SwapDelta {
        room_capacity,
        min_working_days,
        curriculum_compactness,
        room_stability,
        cost: room_capacity + min_working_days + curriculum_compactness + room_stability,
    }
}

/// `course` moves from room `r1` to room `r2`.
///
/// The first clamp is never positive and the second never negative: the
/// result is the overflow gained at `r2` minus the overflow released at `r1`.
fn room_capacity_cost(sol: &Solution<'_>, course: Option<usize>, r1: usize, r2: usize) -> i64 {
    let Some(c) = course else {
        return 0;
    };
    let model = sol.model();
    let students = model.courses()[c].n_students as i64;
    let cap1 = model.rooms()[r1].capacity as i64;
    let cap2 = model.rooms()[r2].capacity as i64;
    let cost = (cap1 - students).min(0) + (students - cap2).max(0);
    cost * sol.weights().room_capacity
}

/// `course` loses a lecture on `d1` and gains one on `d2`.
fn min_working_days_cost(
    sol: &Solution<'_>,
    course: Option<usize>,
    d1: usize,
    other: Option<usize>,
    d2: usize,
) -> i64 {
    let Some(c) = course else {
        return 0;
    };
    if course == other {
        return 0;
    }
    let model = sol.model();
    let required = model.courses()[c].min_working_days as i64;

    let mut prev_days = 0i64;
    let mut cur_days = 0i64;
    for d in 0..model.n_days() {
        let count = sol.sum_cd(c, d) as i64;
        if count > 0 {
            prev_days += 1;
        }
        let after = count - i64::from(d == d1) + i64::from(d == d2);
        if after > 0 {
            cur_days += 1;
        }
    }

    let cost = (prev_days - required).min(0) + (required - cur_days).max(0);
    cost * sol.weights().min_working_days
}

/// `course` loses a lecture in room `r1` and gains one in room `r2`.
fn room_stability_cost(
    sol: &Solution<'_>,
    course: Option<usize>,
    r1: usize,
    other: Option<usize>,
    r2: usize,
) -> i64 {
    let Some(c) = course else {
        return 0;
    };
    if course == other || r1 == r2 {
        return 0;
    }
    let model = sol.model();

    let mut prev_rooms = 0i64;
    let mut cur_rooms = 0i64;
    for r in 0..model.n_rooms() {
        let count = sol.sum_cr(c, r) as i64;
        if count > 0 {
            prev_rooms += 1;
        }
        let after = count - i64::from(r == r1) + i64::from(r == r2);
        if after > 0 {
            cur_rooms += 1;
        }
    }

    let cost = (cur_rooms - 1).max(0) - (prev_rooms - 1).max(0);
    cost * sol.weights().room_stability
}

/// `course` leaves timeslot `from` for timeslot `to` (both `(day, slot)`).
///
/// Curricula shared with `other` are skipped: the two courses trade places
/// and the curriculum's occupancy grid does not change.
fn curriculum_compactness_cost(
    sol: &Solution<'_>,
    course: Option<usize>,
    from: (usize, usize),
    other: Option<usize>,
    to: (usize, usize),
) -> i64 {
    let Some(c) = course else {
        return 0;
    };
    if course == other {
        return 0;
    }
    let model = sol.model();
    let relocation = Relocation { from, to };
    let (d1, s1) = (from.0, from.1 as isize);
    let (d2, s2) = (to.0, to.1 as isize);

    let mut cost = 0i64;
    for &q in &model.courses()[c].curricula {
        if other.is_some_and(|o| model.course_in_curriculum(o, q)) {
            continue;
        }

        let alone = |phase: Phase, day: usize, slot: isize| {
            i64::from(isolated(sol, q, &relocation, phase, day, slot))
        };

        let out_prev = alone(Phase::Vacated, d1, s1 - 1) - alone(Phase::Before, d1, s1 - 1);
        let out_next = alone(Phase::Vacated, d1, s1 + 1) - alone(Phase::Before, d1, s1 + 1);
        let in_prev = alone(Phase::Moved, d2, s2 - 1) - alone(Phase::Vacated, d2, s2 - 1);
        let in_next = alone(Phase::Moved, d2, s2 + 1) - alone(Phase::Vacated, d2, s2 + 1);
        let itself = alone(Phase::Moved, d2, s2) - alone(Phase::Before, d1, s1);

        cost += out_prev + out_next + in_prev + in_next + itself;
    }

    cost * sol.weights().curriculum_compactness
}

/// A curriculum presence moving between two timeslots.
#[derive(Debug, Clone, Copy)]
struct Relocation {
    from: (usize, usize),
    to: (usize, usize),
}

/// Which version of the curriculum grid a predicate looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// The grid as stored.
    Before,
    /// The source timeslot has been emptied.
    Vacated,
    /// The source is empty and the target is occupied.
    Moved,
}

/// Curriculum `q` has a lecture at `(day, slot)` in the given phase.
/// Slots outside the day are never occupied.
fn occupied(
    sol: &Solution<'_>,
    q: usize,
    relocation: &Relocation,
    phase: Phase,
    day: usize,
    slot: isize,
) -> bool {
    if slot < 0 || slot as usize >= sol.model().n_slots() {
        return false;
    }
    let cell = (day, slot as usize);
    let stored = || sol.sum_qds(q, cell.0, cell.1) > 0;
    match phase {
        Phase::Before => stored(),
        Phase::Vacated => cell != relocation.from && stored(),
        Phase::Moved => cell == relocation.to || (cell != relocation.from && stored()),
    }
}

/// Curriculum `q` has a lecture at `(day, slot)` with no neighbour on the
/// same day.
fn isolated(
    sol: &Solution<'_>,
    q: usize,
    relocation: &Relocation,
    phase: Phase,
    day: usize,
    slot: isize,
) -> bool {
    occupied(sol, q, relocation, phase, day, slot)
        && !occupied(sol, q, relocation, phase, day, slot - 1)
        && !occupied(sol, q, relocation, phase, day, slot + 1)
}
