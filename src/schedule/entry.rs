//! Schedule entries and assignment decoding.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cp::Assignment;
use crate::model::{TimetableConfig, TimetableModel, VarKey};

/// One lesson: a student attends a subject in a room at a slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleEntry {
    pub student: String,
    /// Day index into [`TimetableConfig::days`].
    pub day: usize,
    /// Period index within the day.
    pub period: usize,
    pub subject: String,
    pub room: String,
}

/// Ordered lessons by student, then day, then period.
///
/// Slots without an entry are free periods.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all entries in order.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Returns the number of lessons.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ScheduleEntry> {
        self.entries.iter()
    }

    /// Lessons of one student in slot order.
    pub fn entries_for_student<'a>(
        &'a self,
        student: &'a str,
    ) -> impl Iterator<Item = &'a ScheduleEntry> + 'a {
        self.entries.iter().filter(move |e| e.student == student)
    }

    /// The lesson of `student` at `(day, period)`, or `None` for a free period.
    pub fn entry_at(&self, student: &str, day: usize, period: usize) -> Option<&ScheduleEntry> {
        self.entries
            .iter()
            .find(|e| e.student == student && e.day == day && e.period == period)
    }

    /// Number of lessons held outside their subject's preferred room.
    pub fn penalty(&self, config: &TimetableConfig) -> usize {
        self.entries
            .iter()
            .filter(|e| {
                config
                    .subject(&e.subject)
                    .is_some_and(|s| s.preferred_room != e.room)
            })
            .count()
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a ScheduleEntry;
    type IntoIter = std::slice::Iter<'a, ScheduleEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<ScheduleEntry> for Schedule {
    fn from_iter<I: IntoIterator<Item = ScheduleEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Converts a complete assignment into schedule entries.
///
/// Scans students, days and periods in order; for each slot the true
/// `(subject, room)` variable, if any, becomes an entry. The output is a pure
/// function of its inputs.
pub fn decode(config: &TimetableConfig, model: &TimetableModel, assignment: &Assignment) -> Schedule {
    let layout = model.layout();
    let mut entries = Vec::new();
    for student in 0..layout.students {
        for day in 0..layout.days {
            for period in 0..layout.periods {
                'slot: for subject in 0..layout.subjects {
                    for room in 0..layout.rooms {
                        let var = layout.index(VarKey {
                            student,
                            subject,
                            day,
                            period,
                            room,
                        });
                        if assignment.value(var) {
                            entries.push(ScheduleEntry {
                                student: config.students[student].clone(),
                                day,
                                period,
                                subject: config.subjects[subject].id.clone(),
                                room: config.rooms[room].clone(),
                            });
                            break 'slot;
                        }
                    }
                }
            }
        }
    }
    Schedule { entries }
}
