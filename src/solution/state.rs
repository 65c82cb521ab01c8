//! Assignment state and its incidence indices.

use std::fmt;

use super::types::{Assignment, CostBreakdown, CostWeights};
use crate::error::TimetableError;
use crate::model::TimetableModel;
use crate::swap::{SwapHelper, SwapMove};

/// A (possibly partial) timetable.
///
/// Besides the lecture → slot table, four dense indices are kept in lockstep
/// by [`assign`](Self::assign) and [`unassign`](Self::unassign):
///
/// - `l_rds[room][day][slot]`: occupying lecture
/// - `sum_cd[course][day]`: lectures of a course on a day
/// - `sum_cr[course][room]`: lectures of a course in a room
/// - `sum_qds[curriculum][day][slot]`: lectures of a curriculum at a timeslot
///
/// They are what makes move evaluation in [`crate::swap`] constant-ish time.
#[derive(Debug, Clone)]
pub struct Solution<'m> {
    model: &'m TimetableModel,
    weights: CostWeights,
    assignments: Vec<Option<Assignment>>,
    l_rds: Vec<Option<usize>>,
    sum_cd: Vec<u32>,
    sum_cr: Vec<u32>,
    sum_qds: Vec<u32>,
}

impl<'m> Solution<'m> {
    /// An empty timetable with default weights.
    pub fn new(model: &'m TimetableModel) -> Self {
        Self::with_weights(model, CostWeights::default())
    }

    pub fn with_weights(model: &'m TimetableModel, weights: CostWeights) -> Self {
        let (r, d, s) = (model.n_rooms(), model.n_days(), model.n_slots());
        let c = model.n_courses();
        Self {
            model,
            weights,
            assignments: vec![None; model.n_lectures()],
            l_rds: vec![None; r * d * s],
            sum_cd: vec![0; c * d],
            sum_cr: vec![0; c * r],
            sum_qds: vec![0; model.n_curricula() * d * s],
        }
    }

    pub fn model(&self) -> &'m TimetableModel {
        self.model
    }

    pub fn weights(&self) -> &CostWeights {
        &self.weights
    }

    #[inline]
    fn rds(&self, room: usize, day: usize, slot: usize) -> usize {
        (room * self.model.n_days() + day) * self.model.n_slots() + slot
    }

    #[inline]
    fn cd(&self, course: usize, day: usize) -> usize {
        course * self.model.n_days() + day
    }

    #[inline]
    fn cr(&self, course: usize, room: usize) -> usize {
        course * self.model.n_rooms() + room
    }

    #[inline]
    fn qds(&self, curriculum: usize, day: usize, slot: usize) -> usize {
        (curriculum * self.model.n_days() + day) * self.model.n_slots() + slot
    }

    /// Current slot of `lecture`.
    #[inline]
    pub fn assignment(&self, lecture: usize) -> Option<Assignment> {
        self.assignments[lecture]
    }

    /// Lecture held in `room` at `(day, slot)`.
    #[inline]
    pub fn lecture_at(&self, room: usize, day: usize, slot: usize) -> Option<usize> {
        self.l_rds[self.rds(room, day, slot)]
    }

    #[inline]
    pub fn sum_cd(&self, course: usize, day: usize) -> u32 {
        self.sum_cd[self.cd(course, day)]
    }

    #[inline]
    pub fn sum_cr(&self, course: usize, room: usize) -> u32 {
        self.sum_cr[self.cr(course, room)]
    }

    #[inline]
    pub fn sum_qds(&self, curriculum: usize, day: usize, slot: usize) -> u32 {
        self.sum_qds[self.qds(curriculum, day, slot)]
    }

    /// `true` once every lecture has a slot.
    pub fn is_complete(&self) -> bool {
        self.assignments.iter().all(Option::is_some)
    }

    /// Places an unassigned lecture at a free `(room, day, slot)`.
    pub fn assign(&mut self, lecture: usize, room: usize, day: usize, slot: usize) {
        debug_assert!(
            self.assignments[lecture].is_none(),
            "lecture {lecture} is already assigned"
        );
        let rds = self.rds(room, day, slot);
        debug_assert!(
            self.l_rds[rds].is_none(),
            "room {room} day {day} slot {slot} is already occupied"
        );

        let model = self.model;
        let course = model.course_of(lecture);
        self.assignments[lecture] = Some(Assignment::new(room, day, slot));
        self.l_rds[rds] = Some(lecture);
        let cd = self.cd(course, day);
        self.sum_cd[cd] += 1;
        let cr = self.cr(course, room);
        self.sum_cr[cr] += 1;
        for &q in &model.courses()[course].curricula {
            let qds = self.qds(q, day, slot);
            self.sum_qds[qds] += 1;
        }
    }

    /// Frees the slot of `lecture`. Does nothing if it is unassigned.
    pub fn unassign(&mut self, lecture: usize) {
        let Some(a) = self.assignments[lecture].take() else {
            return;
        };

        let model = self.model;
        let course = model.course_of(lecture);
        let rds = self.rds(a.room, a.day, a.slot);
        debug_assert_eq!(self.l_rds[rds], Some(lecture));
        self.l_rds[rds] = None;
        let cd = self.cd(course, a.day);
        debug_assert!(self.sum_cd[cd] > 0);
        self.sum_cd[cd] -= 1;
        let cr = self.cr(course, a.room);
        debug_assert!(self.sum_cr[cr] > 0);
        self.sum_cr[cr] -= 1;
        for &q in &model.courses()[course].curricula {
            let qds = self.qds(q, a.day, a.slot);
            debug_assert!(self.sum_qds[qds] > 0);
            self.sum_qds[qds] -= 1;
        }
    }

    /// Deep copy of `other` into `self`, reusing allocations.
    pub fn copy_from(&mut self, other: &Solution<'m>) {
        self.model = other.model;
        self.weights = other.weights;
        self.assignments.clone_from(&other.assignments);
        self.l_rds.clone_from(&other.l_rds);
        self.sum_cd.clone_from(&other.sum_cd);
        self.sum_cr.clone_from(&other.sum_cr);
        self.sum_qds.clone_from(&other.sum_qds);
    }

    /// Recomputes the whole objective from scratch.
    ///
    /// Linear in the size of the timetable: meant for initialisation and
    /// audits, not for move evaluation.
    pub fn compute_total_cost(&self) -> i64 {
        self.cost_breakdown().total()
    }

    /// Recomputes every objective term from scratch.
    pub fn cost_breakdown(&self) -> CostBreakdown {
        let model = self.model;
        let w = &self.weights;
        let (n_days, n_slots, n_rooms) = (model.n_days(), model.n_slots(), model.n_rooms());

        let hard = self.hard_violations();

        let mut room_capacity = 0i64;
        for (l, a) in self.assignments.iter().enumerate() {
            if let Some(a) = a {
                let students = model.courses()[model.course_of(l)].n_students as i64;
                let capacity = model.rooms()[a.room].capacity as i64;
                room_capacity += (students - capacity).max(0);
            }
        }

        let mut min_working_days = 0i64;
        let mut room_stability = 0i64;
        for (c, course) in model.courses().iter().enumerate() {
            let days = (0..n_days).filter(|&d| self.sum_cd(c, d) > 0).count() as i64;
            min_working_days += (course.min_working_days as i64 - days).max(0);
            let rooms = (0..n_rooms).filter(|&r| self.sum_cr(c, r) > 0).count() as i64;
            room_stability += (rooms - 1).max(0);
        }

        let mut curriculum_compactness = 0i64;
        for q in 0..model.n_curricula() {
            for d in 0..n_days {
                for s in 0..n_slots {
                    let occupied = |s: usize| self.sum_qds(q, d, s) > 0;
                    if occupied(s)
                        && (s == 0 || !occupied(s - 1))
                        && (s + 1 == n_slots || !occupied(s + 1))
                    {
                        curriculum_compactness += 1;
                    }
                }
            }
        }

        CostBreakdown {
            hard_violations: hard,
            hard_cost: hard as i64 * w.hard_violation,
            room_capacity: room_capacity * w.room_capacity,
            min_working_days: min_working_days * w.min_working_days,
            curriculum_compactness: curriculum_compactness * w.curriculum_compactness,
            room_stability: room_stability * w.room_stability,
        }
    }

    /// Unassigned lectures, pairwise timeslot conflicts and lectures placed
    /// in an unavailable timeslot.
    pub fn hard_violations(&self) -> u64 {
        let model = self.model;
        let mut violations = 0u64;

        for (l, a) in self.assignments.iter().enumerate() {
            match a {
                None => violations += 1,
                Some(a) => {
                    if model.is_unavailable(model.course_of(l), a.day, a.slot) {
                        violations += 1;
                    }
                }
            }
        }

        let mut present = Vec::with_capacity(model.n_rooms());
        for d in 0..model.n_days() {
            for s in 0..model.n_slots() {
                present.clear();
                present.extend(
                    (0..model.n_rooms())
                        .filter_map(|r| self.lecture_at(r, d, s))
                        .map(|l| model.course_of(l)),
                );
                for i in 0..present.len() {
                    for j in i + 1..present.len() {
                        if model.courses_conflict(present[i], present[j]) {
                            violations += 1;
                        }
                    }
                }
            }
        }

        violations
    }

    /// Reports whether the solution would still satisfy every hard
    /// constraint after applying `mv`, without touching the state.
    ///
    /// Assumes the current state is itself hard-feasible: only the
    /// constraints touching the two moved lectures are checked.
    pub fn satisfy_hard_constraints_after_swap(&self, mv: &SwapMove, helper: &SwapHelper) -> bool {
        if mv.is_noop(helper) {
            return true;
        }
        let model = self.model;

        if model.is_unavailable(helper.c1, mv.d2, mv.s2) {
            return false;
        }
        if let Some(c2) = helper.c2 {
            if model.is_unavailable(c2, helper.d1, helper.s1) {
                return false;
            }
        }

        // Exchanging rooms within one timeslot changes no timeslot relation.
        if helper.d1 == mv.d2 && helper.s1 == mv.s2 {
            return true;
        }

        let moved = [Some(mv.l1), helper.l2];
        let clashes = |course: usize, day: usize, slot: usize| {
            (0..model.n_rooms())
                .filter_map(|r| self.lecture_at(r, day, slot))
                .filter(|l| !moved.contains(&Some(*l)))
                .any(|l| model.courses_conflict(course, model.course_of(l)))
        };

        if clashes(helper.c1, mv.d2, mv.s2) {
            return false;
        }
        if let Some(c2) = helper.c2 {
            if clashes(c2, helper.d1, helper.s1) {
                return false;
            }
        }
        true
    }

    /// Recounts every index from the assignment table and compares.
    ///
    /// A mismatch means an `assign` / `unassign` pair was broken somewhere.
    pub fn check_invariants(&self) -> Result<(), TimetableError> {
        let model = self.model;
        let mut fresh = Solution::with_weights(model, self.weights);
        for (l, a) in self.assignments.iter().enumerate() {
            if let Some(a) = a {
                if let Some(other) = fresh.lecture_at(a.room, a.day, a.slot) {
                    return Err(TimetableError::Invariant(format!(
                        "lectures {other} and {l} share room {} day {} slot {}",
                        a.room, a.day, a.slot
                    )));
                }
                fresh.assign(l, a.room, a.day, a.slot);
            }
        }

        if fresh.l_rds != self.l_rds {
            return Err(TimetableError::Invariant("l_rds disagrees with assignments".into()));
        }
        if fresh.sum_cd != self.sum_cd {
            return Err(TimetableError::Invariant("sum_cd disagrees with assignments".into()));
        }
        if fresh.sum_cr != self.sum_cr {
            return Err(TimetableError::Invariant("sum_cr disagrees with assignments".into()));
        }
        if fresh.sum_qds != self.sum_qds {
            return Err(TimetableError::Invariant("sum_qds disagrees with assignments".into()));
        }

        if self.is_complete() {
            for (c, course) in model.courses().iter().enumerate() {
                let total: u32 = (0..model.n_days()).map(|d| self.sum_cd(c, d)).sum();
                if total as usize != course.n_lectures {
                    return Err(TimetableError::Invariant(format!(
                        "course {} has {total} scheduled lectures, expected {}",
                        course.id, course.n_lectures
                    )));
                }
            }
        }
        Ok(())
    }
}

/// ITC-2007 solution format: `<course> <room> <day> <slot>` per lecture.
impl fmt::Display for Solution<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model = self.model;
        for (l, a) in self.assignments.iter().enumerate() {
            if let Some(a) = a {
                writeln!(
                    f,
                    "{} {} {} {}",
                    model.courses()[model.course_of(l)].id,
                    model.rooms()[a.room].id,
                    a.day,
                    a.slot
                )?;
            }
        }
        Ok(())
    }
}
