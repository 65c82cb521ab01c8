//! Immutable instance data.

/// A course: a set of lectures taught by one teacher to a fixed audience.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    /// Instance identifier, e.g. `SceCosC`.
    pub id: String,
    /// Index into [`TimetableModel::teachers`].
    pub teacher: usize,
    /// Number of lectures to schedule.
    pub n_lectures: usize,
    /// Days over which the lectures should be spread.
    pub min_working_days: usize,
    /// Number of attending students.
    pub n_students: u32,
    /// Curricula this course belongs to, ascending.
    pub curricula: Vec<usize>,
}

/// A room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    /// Instance identifier.
    pub id: String,
    /// Seats.
    pub capacity: u32,
}

/// A group of courses sharing students.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curriculum {
    /// Instance identifier.
    pub id: String,
    /// Member course indices, ascending.
    pub courses: Vec<usize>,
}

/// One teaching unit of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lecture {
    /// Owning course index.
    pub course: usize,
}

/// A curriculum-based course timetabling instance.
///
/// All collections are dense and indexed by small integers assigned at load
/// time. Built through [`TimetableModelBuilder`](super::TimetableModelBuilder)
/// or [`TimetableModel::parse`].
#[derive(Debug, Clone)]
pub struct TimetableModel {
    pub(crate) name: String,
    pub(crate) n_days: usize,
    pub(crate) n_slots: usize,
    pub(crate) courses: Vec<Course>,
    pub(crate) rooms: Vec<Room>,
    pub(crate) curricula: Vec<Curriculum>,
    pub(crate) lectures: Vec<Lecture>,
    pub(crate) teachers: Vec<String>,
    /// `[course][day][slot]`
    pub(crate) unavailable: Vec<bool>,
    /// `[course][course]`
    pub(crate) conflicts: Vec<bool>,
}

impl TimetableModel {
    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn n_days(&self) -> usize {
        self.n_days
    }

    pub fn n_slots(&self) -> usize {
        self.n_slots
    }

    pub fn n_rooms(&self) -> usize {
        self.rooms.len()
    }

    pub fn n_courses(&self) -> usize {
        self.courses.len()
    }

    pub fn n_curricula(&self) -> usize {
        self.curricula.len()
    }

    pub fn n_lectures(&self) -> usize {
        self.lectures.len()
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn curricula(&self) -> &[Curriculum] {
        &self.curricula
    }

    pub fn lectures(&self) -> &[Lecture] {
        &self.lectures
    }

    pub fn teachers(&self) -> &[String] {
        &self.teachers
    }

    /// Course index of a lecture.
    #[inline]
    pub fn course_of(&self, lecture: usize) -> usize {
        self.lectures[lecture].course
    }

    /// Looks up a course by its instance identifier.
    pub fn course_index(&self, id: &str) -> Option<usize> {
        self.courses.iter().position(|c| c.id == id)
    }

    /// Returns `true` if `course` may not be scheduled at `(day, slot)`.
    #[inline]
    pub fn is_unavailable(&self, course: usize, day: usize, slot: usize) -> bool {
        self.unavailable[(course * self.n_days + day) * self.n_slots + slot]
    }

    /// Returns `true` if lectures of the two courses may not share a timeslot:
    /// same course, same teacher, or a common curriculum.
    #[inline]
    pub fn courses_conflict(&self, a: usize, b: usize) -> bool {
        self.conflicts[a * self.courses.len() + b]
    }

    /// Returns `true` if `course` is a member of `curriculum`.
    #[inline]
    pub fn course_in_curriculum(&self, course: usize, curriculum: usize) -> bool {
        self.courses[course].curricula.binary_search(&curriculum).is_ok()
    }
}
