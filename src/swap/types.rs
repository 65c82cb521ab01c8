//! Swap move value types.

use rand::Rng;

use crate::model::TimetableModel;
use crate::solution::Solution;

/// Moves lecture `l1` to `(r2, d2, s2)`. Whatever lecture sits there moves
/// into the slot `l1` vacates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapMove {
    pub l1: usize,
    pub r2: usize,
    pub d2: usize,
    pub s2: usize,
}

/// Snapshot of the two endpoints of a move, taken against a solution
/// immediately before the move is evaluated or applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapHelper {
    /// Course of `l1`.
    pub c1: usize,
    /// Current slot of `l1`.
    pub r1: usize,
    pub d1: usize,
    pub s1: usize,
    /// Lecture currently at the target, if any.
    pub l2: Option<usize>,
    /// Course of `l2`.
    pub c2: Option<usize>,
}

impl SwapMove {
    pub fn new(l1: usize, r2: usize, d2: usize, s2: usize) -> Self {
        Self { l1, r2, d2, s2 }
    }

    /// Draws a lecture and a target room/day/slot uniformly at random.
    ///
    /// No filtering happens here: the target may be the lecture's own slot,
    /// an empty slot, or a slot holding another lecture.
    pub fn random<R: Rng>(model: &TimetableModel, rng: &mut R) -> Self {
        Self {
            l1: rng.random_range(0..model.n_lectures()),
            r2: rng.random_range(0..model.n_rooms()),
            d2: rng.random_range(0..model.n_days()),
            s2: rng.random_range(0..model.n_slots()),
        }
    }

    /// Computes the endpoint snapshot against `solution`.
    ///
    /// Returns `None` if `l1` is currently unassigned.
    pub fn helper(&self, solution: &Solution<'_>) -> Option<SwapHelper> {
        let a = solution.assignment(self.l1)?;
        let model = solution.model();
        let l2 = solution.lecture_at(self.r2, self.d2, self.s2);
        Some(SwapHelper {
            c1: model.course_of(self.l1),
            r1: a.room,
            d1: a.day,
            s1: a.slot,
            l2,
            c2: l2.map(|l| model.course_of(l)),
        })
    }

    /// `true` if the target is the lecture's own slot.
    pub fn is_noop(&self, helper: &SwapHelper) -> bool {
        helper.l2 == Some(self.l1)
    }
}

impl SwapHelper {
    /// A move only changes the soft cost when the two courses differ.
    pub fn is_effective(&self) -> bool {
        self.c2 != Some(self.c1)
    }
}

/// Soft-cost change of a move, per term and in total. Terms are weighted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapDelta {
    pub room_capacity: i64,
    pub min_working_days: i64,
    pub curriculum_compactness: i64,
    pub room_stability: i64,
    pub cost: i64,
}

/// Outcome of evaluating a move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapResult {
    /// Hard constraints still hold after the move. Left `false` when
    /// feasibility was not requested.
    pub feasible: bool,
    pub delta: SwapDelta,
}

/// When [`swap_extended`](super::swap_extended) applies a move. Every
/// strategy requires the move to be feasible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SwapStrategy {
    /// Any feasible move.
    Always,
    /// Same as `Always`.
    IfFeasible,
    /// Feasible and strictly improving.
    IfBetter,
    /// Feasible and strictly improving.
    #[default]
    IfFeasibleAndBetter,
}
