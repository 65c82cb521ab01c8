//! Timetabling instance model.
//!
//! A read-only description of a curriculum-based course timetabling
//! instance: courses and their lectures, rooms, curricula, teachers and
//! per-course unavailability. Every other module consumes it by shared
//! reference.
//!
//! # References
//!
//! - Di Gaspero, McCollum & Schaerf (2007), "The Second International
//!   Timetabling Competition (ITC-2007): Curriculum-based Course Timetabling
//!   (Track 3)"

mod builder;
mod parser;
mod types;

pub use builder::TimetableModelBuilder;
pub use types::{Course, Curriculum, Lecture, Room, TimetableModel};
