//! Shared fixtures for unit tests.

use crate::model::{TimetableModel, TimetableModelBuilder};
use crate::solution::{CostWeights, Solution};

/// Five courses, three rooms, three days of four slots, overlapping
/// curricula, a shared teacher and a few unavailable timeslots.
pub(crate) fn small_model() -> TimetableModel {
    TimetableModelBuilder::new("small", 3, 4)
        .add_course("Alg", "t1", 3, 3, 25)
        .add_course("Geo", "t2", 2, 2, 50)
        .add_course("Phy", "t3", 3, 2, 8)
        .add_course("Che", "t1", 2, 2, 40)
        .add_course("Bio", "t4", 2, 1, 12)
        .add_room("R10", 10)
        .add_room("R30", 30)
        .add_room("R60", 60)
        .add_curriculum("Q1", &["Alg", "Geo", "Phy"])
        .add_curriculum("Q2", &["Phy", "Che"])
        .add_curriculum("Q3", &["Bio", "Geo"])
        .add_unavailability("Geo", 0, 0)
        .add_unavailability("Geo", 0, 1)
        .add_unavailability("Phy", 1, 2)
        .add_unavailability("Bio", 2, 3)
        .build()
        .unwrap()
}

/// A complete hard-feasible solution, first fit in day/slot/room order.
pub(crate) fn assign_all(model: &TimetableModel) -> Solution<'_> {
    assign_all_with(model, CostWeights::default())
}

pub(crate) fn assign_all_with(model: &TimetableModel, weights: CostWeights) -> Solution<'_> {
    let mut sol = Solution::with_weights(model, weights);
    'lectures: for l in 0..model.n_lectures() {
        let c = model.course_of(l);
        for d in 0..model.n_days() {
            for s in 0..model.n_slots() {
                if model.is_unavailable(c, d, s) {
                    continue;
                }
                let clash = (0..model.n_rooms())
                    .filter_map(|r| sol.lecture_at(r, d, s))
                    .any(|other| model.courses_conflict(c, model.course_of(other)));
                if clash {
                    continue;
                }
                if let Some(r) = (0..model.n_rooms()).find(|&r| sol.lecture_at(r, d, s).is_none()) {
                    sol.assign(l, r, d, s);
                    continue 'lectures;
                }
            }
        }
        panic!("no feasible slot for lecture {l}");
    }
    assert_eq!(sol.hard_violations(), 0);
    sol
}
