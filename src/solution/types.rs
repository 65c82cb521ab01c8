//! Value types shared by the solution and the swap engine.

/// Where a lecture is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Assignment {
    pub room: usize,
    pub day: usize,
    pub slot: usize,
}

impl Assignment {
    pub fn new(room: usize, day: usize, slot: usize) -> Self {
        Self { room, day, slot }
    }
}

/// Objective weights.
///
/// Defaults follow the ITC-2007 curriculum-based track. Any soft term may be
/// zero-weighted; `hard_violation` should dominate the largest reachable
/// soft cost.
///
/// # Examples
///
/// ```
/// use u_timetable::solution::CostWeights;
///
/// let weights = CostWeights::default().with_room_stability(0);
/// assert_eq!(weights.min_working_days, 5);
/// assert_eq!(weights.room_stability, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostWeights {
    /// Per student exceeding the room capacity.
    pub room_capacity: i64,
    /// Per day missing from a course's minimum working days.
    pub min_working_days: i64,
    /// Per isolated curriculum lecture.
    pub curriculum_compactness: i64,
    /// Per extra room used by a course.
    pub room_stability: i64,
    /// Per hard-constraint violation.
    pub hard_violation: i64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            room_capacity: 1,
            min_working_days: 5,
            curriculum_compactness: 2,
            room_stability: 1,
            hard_violation: 1_000_000,
        }
    }
}

impl CostWeights {
    pub fn with_room_capacity(mut self, w: i64) -> Self {
        self.room_capacity = w;
        self
    }

    pub fn with_min_working_days(mut self, w: i64) -> Self {
        self.min_working_days = w;
        self
    }

    pub fn with_curriculum_compactness(mut self, w: i64) -> Self {
        self.curriculum_compactness = w;
        self
    }

    pub fn with_room_stability(mut self, w: i64) -> Self {
        self.room_stability = w;
        self
    }

    pub fn with_hard_violation(mut self, w: i64) -> Self {
        self.hard_violation = w;
        self
    }
}

/// Full objective split into its components. Soft terms are already weighted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CostBreakdown {
    /// Unassigned lectures, conflicts and unavailability violations (unweighted count).
    pub hard_violations: u64,
    /// Weighted [`hard_violations`](Self::hard_violations).
    pub hard_cost: i64,
    pub room_capacity: i64,
    pub min_working_days: i64,
    pub curriculum_compactness: i64,
    pub room_stability: i64,
}

impl CostBreakdown {
    /// Sum of the soft terms.
    pub fn soft(&self) -> i64 {
        self.room_capacity + self.min_working_days + self.curriculum_compactness + self.room_stability
    }

    /// Hard and soft cost combined.
    pub fn total(&self) -> i64 {
        self.hard_cost + self.soft()
    }
}
