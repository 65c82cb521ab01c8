//! Incremental construction of a [`TimetableModel`].

use std::collections::{HashMap, HashSet};

use super::types::{Course, Curriculum, Lecture, Room, TimetableModel};
use crate::error::TimetableError;

/// Builds a [`TimetableModel`] from ids, resolving references at [`build`](Self::build).
///
/// # Examples
///
/// ```
/// use u_timetable::model::TimetableModelBuilder;
///
/// let model = TimetableModelBuilder::new("toy", 1, 2)
///     .add_course("A", "t1", 1, 1, 3)
///     .add_course("B", "t2", 1, 1, 1)
///     .add_room("small", 2)
///     .add_room("large", 5)
///     .add_curriculum("Q", &["A", "B"])
///     .build()
///     .unwrap();
/// assert_eq!(model.n_lectures(), 2);
/// assert!(model.courses_conflict(0, 1));
/// ```
#[derive(Debug, Clone)]
pub struct TimetableModelBuilder {
    name: String,
    n_days: usize,
    n_slots: usize,
    courses: Vec<CourseSpec>,
    rooms: Vec<(String, u32)>,
    curricula: Vec<(String, Vec<String>)>,
    unavailability: Vec<(String, usize, usize)>,
}

#[derive(Debug, Clone)]
struct CourseSpec {
    id: String,
    teacher: String,
    n_lectures: usize,
    min_working_days: usize,
    n_students: u32,
}

impl TimetableModelBuilder {
    pub fn new(name: impl Into<String>, n_days: usize, n_slots: usize) -> Self {
        Self {
            name: name.into(),
            n_days,
            n_slots,
            courses: Vec::new(),
            rooms: Vec::new(),
            curricula: Vec::new(),
            unavailability: Vec::new(),
        }
    }

    /// Adds a course taught by `teacher` with `n_lectures` lectures.
    pub fn add_course(
        mut self,
        id: impl Into<String>,
        teacher: impl Into<String>,
        n_lectures: usize,
        min_working_days: usize,
        n_students: u32,
    ) -> Self {
        self.courses.push(CourseSpec {
            id: id.into(),
            teacher: teacher.into(),
            n_lectures,
            min_working_days,
            n_students,
        });
        self
    }

    pub fn add_room(mut self, id: impl Into<String>, capacity: u32) -> Self {
        self.rooms.push((id.into(), capacity));
        self
    }

    /// Adds a curriculum made of the given course ids.
    pub fn add_curriculum<S: AsRef<str>>(mut self, id: impl Into<String>, courses: &[S]) -> Self {
        let members = courses.iter().map(|c| c.as_ref().to_string()).collect();
        self.curricula.push((id.into(), members));
        self
    }

    /// Forbids `course` at `(day, slot)`.
    pub fn add_unavailability(mut self, course: impl Into<String>, day: usize, slot: usize) -> Self {
        self.unavailability.push((course.into(), day, slot));
        self
    }

    /// Resolves all references and derives the dense lookup tables.
    pub fn build(self) -> Result<TimetableModel, TimetableError> {
        if self.n_days == 0 || self.n_slots == 0 {
            return Err(TimetableError::InvalidModel(format!(
                "days ({}) and slots per day ({}) must be positive",
                self.n_days, self.n_slots
            )));
        }
        if self.rooms.is_empty() {
            return Err(TimetableError::InvalidModel("instance has no rooms".into()));
        }

        let mut course_ids: HashMap<&str, usize> = HashMap::new();
        let mut teacher_ids: HashMap<&str, usize> = HashMap::new();
        let mut teachers = Vec::new();
        let mut courses = Vec::with_capacity(self.courses.len());

        for spec in &self.courses {
            if course_ids.insert(&spec.id, courses.len()).is_some() {
                return Err(TimetableError::InvalidModel(format!(
                    "duplicate course id {}",
                    spec.id
                )));
            }
            let teacher = *teacher_ids.entry(&spec.teacher).or_insert_with(|| {
                teachers.push(spec.teacher.clone());
                teachers.len() - 1
            });
            courses.push(Course {
                id: spec.id.clone(),
                teacher,
                n_lectures: spec.n_lectures,
                min_working_days: spec.min_working_days,
                n_students: spec.n_students,
                curricula: Vec::new(),
            });
        }

        let mut room_ids: HashSet<&str> = HashSet::new();
        let mut rooms = Vec::with_capacity(self.rooms.len());
        for (id, capacity) in &self.rooms {
            if !room_ids.insert(id) {
                return Err(TimetableError::InvalidModel(format!("duplicate room id {id}")));
            }
            rooms.push(Room {
                id: id.clone(),
                capacity: *capacity,
            });
        }

        let mut curricula = Vec::with_capacity(self.curricula.len());
        for (q, (id, members)) in self.curricula.iter().enumerate() {
            if curricula.iter().any(|other: &Curriculum| other.id == *id) {
                return Err(TimetableError::InvalidModel(format!(
                    "duplicate curriculum id {id}"
                )));
            }
            let mut indices = Vec::with_capacity(members.len());
            for member in members {
                let c = *course_ids.get(member.as_str()).ok_or_else(|| {
                    TimetableError::InvalidModel(format!(
                        "curriculum {id} references unknown course {member}"
                    ))
                })?;
                indices.push(c);
            }
            indices.sort_unstable();
            indices.dedup();
            for &c in &indices {
                courses[c].curricula.push(q);
            }
            curricula.push(Curriculum {
                id: id.clone(),
                courses: indices,
            });
        }

        let (n_days, n_slots, n_courses) = (self.n_days, self.n_slots, courses.len());

        let mut unavailable = vec![false; n_courses * n_days * n_slots];
        for (course, day, slot) in &self.unavailability {
            let c = *course_ids.get(course.as_str()).ok_or_else(|| {
                TimetableError::InvalidModel(format!(
                    "unavailability references unknown course {course}"
                ))
            })?;
            if *day >= n_days || *slot >= n_slots {
                return Err(TimetableError::InvalidModel(format!(
                    "unavailability of {course} at day {day} slot {slot} is out of range"
                )));
            }
            unavailable[(c * n_days + day) * n_slots + slot] = true;
        }

        let mut conflicts = vec![false; n_courses * n_courses];
        for a in 0..n_courses {
            for b in 0..n_courses {
                conflicts[a * n_courses + b] = a == b
                    || courses[a].teacher == courses[b].teacher
                    || shares_curriculum(&courses[a].curricula, &courses[b].curricula);
            }
        }

        let lectures: Vec<Lecture> = courses
            .iter()
            .enumerate()
            .flat_map(|(c, course)| std::iter::repeat(Lecture { course: c }).take(course.n_lectures))
            .collect();
        if lectures.is_empty() {
            return Err(TimetableError::InvalidModel("instance has no lectures".into()));
        }

        Ok(TimetableModel {
            name: self.name,
            n_days,
            n_slots,
            courses,
            rooms,
            curricula,
            lectures,
            teachers,
            unavailable,
            conflicts,
        })
    }
}

/// Both slices are sorted ascending.
fn shares_curriculum(a: &[usize], b: &[usize]) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => return true,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> TimetableModelBuilder {
        TimetableModelBuilder::new("t", 2, 3)
            .add_course("A", "alice", 2, 2, 10)
            .add_course("B", "bob", 1, 1, 20)
            .add_course("C", "alice", 1, 1, 5)
            .add_room("R1", 15)
    }

    #[test]
    fn test_lectures_follow_course_order() {
        let model = base().build().unwrap();
        let courses: Vec<usize> = model.lectures().iter().map(|l| l.course).collect();
        assert_eq!(courses, vec![0, 0, 1, 2]);
    }

    #[test]
    fn test_teacher_conflict() {
        let model = base().build().unwrap();
        assert_eq!(model.teachers().len(), 2);
        assert!(model.courses_conflict(0, 2));
        assert!(!model.courses_conflict(0, 1));
        assert!(model.courses_conflict(1, 1));
    }

    #[test]
    fn test_curriculum_membership() {
        let model = base().add_curriculum("Q", &["B", "A"]).build().unwrap();
        assert_eq!(model.curricula()[0].courses, vec![0, 1]);
        assert!(model.course_in_curriculum(1, 0));
        assert!(!model.course_in_curriculum(2, 0));
        assert!(model.courses_conflict(0, 1));
    }

    #[test]
    fn test_unavailability() {
        let model = base().add_unavailability("B", 1, 2).build().unwrap();
        assert!(model.is_unavailable(1, 1, 2));
        assert!(!model.is_unavailable(1, 0, 2));
        assert!(!model.is_unavailable(0, 1, 2));
    }

    #[test]
    fn test_unknown_course_rejected() {
        let err = base().add_curriculum("Q", &["Z"]).build().unwrap_err();
        assert!(matches!(err, TimetableError::InvalidModel(_)));
    }

    #[test]
    fn test_duplicate_course_rejected() {
        let err = base().add_course("A", "x", 1, 1, 1).build().unwrap_err();
        assert!(matches!(err, TimetableError::InvalidModel(_)));
    }

    #[test]
    fn test_out_of_range_unavailability_rejected() {
        assert!(base().add_unavailability("A", 2, 0).build().is_err());
    }

    #[test]
    fn test_instance_without_lectures_rejected() {
        let err = TimetableModelBuilder::new("empty", 1, 1)
            .add_room("R", 1)
            .build()
            .unwrap_err();
        assert!(matches!(err, TimetableError::InvalidModel(_)));

        let err = TimetableModelBuilder::new("hollow", 1, 1)
            .add_course("A", "t1", 0, 0, 5)
            .add_room("R", 1)
            .build()
            .unwrap_err();
        assert!(matches!(err, TimetableError::InvalidModel(_)));
    }

    #[test]
    fn test_zero_slots_rejected() {
        let err = TimetableModelBuilder::new("t", 1, 0)
            .add_room("R", 1)
            .build()
            .unwrap_err();
        assert!(matches!(err, TimetableError::InvalidModel(_)));
    }
}
