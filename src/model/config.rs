//! Timetabling input configuration.

use std::collections::{BTreeSet, HashMap, HashSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::ModelError;

/// A subject taught to every student.
///
/// Each student must attend exactly `hours` lessons of the subject per week.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Subject {
    /// Subject identifier.
    pub id: String,
    /// Weekly lesson quota per student.
    pub hours: usize,
    /// Identifier of the teacher giving this subject.
    pub teacher: String,
    /// Room the subject should be held in.
    pub preferred_room: String,
}

impl Subject {
    /// Creates a subject.
    pub fn new(
        id: impl Into<String>,
        hours: usize,
        teacher: impl Into<String>,
        preferred_room: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            hours,
            teacher: teacher.into(),
            preferred_room: preferred_room.into(),
        }
    }
}

/// Static description of a timetabling problem.
///
/// # Examples
///
/// ```
/// use u_timetable::model::{Subject, TimetableConfig};
///
/// let config = TimetableConfig::new(vec!["Mon".into(), "Tue".into()], 5)
///     .with_student("S1")
///     .with_subject(Subject::new("A", 2, "T1", "Room_A"))
///     .with_room("Room_A")
///     .with_teacher_days("T1", [1]);
///
/// assert_eq!(config.slot_count(), 10);
/// assert_eq!(config.teacher_capacity("T1"), 5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimetableConfig {
    /// Ordered student identifiers.
    pub students: Vec<String>,
    /// Subjects with quota, teacher and preferred room.
    pub subjects: Vec<Subject>,
    /// Rooms lessons may be held in.
    pub rooms: Vec<String>,
    /// Allowed day indices per teacher. Absent or empty means every day.
    pub teacher_days: HashMap<String, BTreeSet<usize>>,
    /// Ordered day names.
    pub days: Vec<String>,
    /// Periods per day.
    pub periods_per_day: usize,
}

impl TimetableConfig {
    /// Creates an empty configuration over the given week shape.
    pub fn new(days: Vec<String>, periods_per_day: usize) -> Self {
        Self {
            days,
            periods_per_day,
            ..Self::default()
        }
    }

    /// Adds a student.
    pub fn with_student(mut self, id: impl Into<String>) -> Self {
        self.students.push(id.into());
        self
    }

    /// Adds a subject.
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subjects.push(subject);
        self
    }

    /// Adds a room.
    pub fn with_room(mut self, id: impl Into<String>) -> Self {
        self.rooms.push(id.into());
        self
    }

    /// Restricts a teacher to the given day indices.
    pub fn with_teacher_days(
        mut self,
        teacher: impl Into<String>,
        days: impl IntoIterator<Item = usize>,
    ) -> Self {
        self.teacher_days
            .insert(teacher.into(), days.into_iter().collect());
        self
    }

    /// Number of (day, period) slots in the week.
    pub fn slot_count(&self) -> usize {
        self.days.len() * self.periods_per_day
    }

    /// Whether `teacher` may teach on day index `day`.
    pub fn is_teacher_available(&self, teacher: &str, day: usize) -> bool {
        if day >= self.days.len() {
            return false;
        }
        match self.teacher_days.get(teacher) {
            None => true,
            Some(days) if days.is_empty() => true,
            Some(days) => days.contains(&day),
        }
    }

    /// Number of slots `teacher` can teach in.
    pub fn teacher_capacity(&self, teacher: &str) -> usize {
        let days = (0..self.days.len())
            .filter(|&d| self.is_teacher_available(teacher, d))
            .count();
        days * self.periods_per_day
    }

    /// Distinct teachers in subject order.
    pub fn teachers(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.subjects
            .iter()
            .map(|s| s.teacher.as_str())
            .filter(|t| seen.insert(*t))
            .collect()
    }

    /// Lessons one student attends per week.
    pub fn lessons_per_student(&self) -> usize {
        self.subjects.iter().map(|s| s.hours).sum()
    }

    /// Total lessons across all students.
    pub fn total_lessons(&self) -> usize {
        self.students.len() * self.lessons_per_student()
    }

    /// Looks up a subject by identifier.
    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Checks identifiers for emptiness and duplicates.
    pub fn validate(&self) -> Result<(), ModelError> {
        check_ids("student", self.students.iter().map(String::as_str))?;
        check_ids("subject", self.subjects.iter().map(|s| s.id.as_str()))?;
        check_ids("room", self.rooms.iter().map(String::as_str))?;
        for subject in &self.subjects {
            if subject.teacher.is_empty() {
                return Err(ModelError::InvalidConfig(format!(
                    "subject {} has no teacher",
                    subject.id
                )));
            }
        }
        Ok(())
    }
}

fn check_ids<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), ModelError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.is_empty() {
            return Err(ModelError::InvalidConfig(format!("empty {kind} identifier")));
        }
        if !seen.insert(id) {
            return Err(ModelError::InvalidConfig(format!("duplicate {kind}: {id}")));
        }
    }
    Ok(())
}
