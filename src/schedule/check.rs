//! Verification of a schedule against its configuration.
//!
//! Independent of the solver: it re-derives every hard rule from the
//! entries alone, so it can double-check solver output.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::entry::Schedule;
use crate::model::TimetableConfig;

/// A broken hard rule.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Violation {
    /// A student has the wrong number of lessons of a subject.
    QuotaMismatch {
        student: String,
        subject: String,
        expected: usize,
        actual: usize,
    },
    /// A student attends two lessons at once.
    StudentClash {
        student: String,
        day: usize,
        period: usize,
    },
    /// A room hosts two lessons at once.
    RoomClash { room: String, day: usize, period: usize },
    /// A teacher gives two lessons at once.
    TeacherClash {
        teacher: String,
        day: usize,
        period: usize,
    },
    /// A lesson falls on a day its teacher is off.
    TeacherUnavailable {
        teacher: String,
        subject: String,
        day: usize,
    },
    /// An entry names a subject missing from the configuration.
    UnknownSubject { subject: String },
}

/// Returns every violation in `schedule`, empty if it is valid.
pub fn verify(config: &TimetableConfig, schedule: &Schedule) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut quota: HashMap<(&str, &str), usize> = HashMap::new();
    let mut student_slot: HashMap<(&str, usize, usize), usize> = HashMap::new();
    let mut room_slot: HashMap<(&str, usize, usize), usize> = HashMap::new();
    let mut teacher_slot: HashMap<(&str, usize, usize), usize> = HashMap::new();

    for entry in schedule {
        let Some(subject) = config.subject(&entry.subject) else {
            violations.push(Violation::UnknownSubject {
                subject: entry.subject.clone(),
            });
            continue;
        };
        *quota
            .entry((entry.student.as_str(), entry.subject.as_str()))
            .or_default() += 1;
        *student_slot
            .entry((entry.student.as_str(), entry.day, entry.period))
            .or_default() += 1;
        *room_slot
            .entry((entry.room.as_str(), entry.day, entry.period))
            .or_default() += 1;
        *teacher_slot
            .entry((subject.teacher.as_str(), entry.day, entry.period))
            .or_default() += 1;
        if !config.is_teacher_available(&subject.teacher, entry.day) {
            violations.push(Violation::TeacherUnavailable {
                teacher: subject.teacher.clone(),
                subject: subject.id.clone(),
                day: entry.day,
            });
        }
    }

    for student in &config.students {
        for subject in &config.subjects {
            let actual = quota
                .get(&(student.as_str(), subject.id.as_str()))
                .copied()
                .unwrap_or(0);
            if actual != subject.hours {
                violations.push(Violation::QuotaMismatch {
                    student: student.clone(),
                    subject: subject.id.clone(),
                    expected: subject.hours,
                    actual,
                });
            }
        }
    }

    push_clashes(&mut violations, student_slot, |student, day, period| {
        Violation::StudentClash {
            student,
            day,
            period,
        }
    });
    push_clashes(&mut violations, room_slot, |room, day, period| {
        Violation::RoomClash { room, day, period }
    });
    push_clashes(&mut violations, teacher_slot, |teacher, day, period| {
        Violation::TeacherClash {
            teacher,
            day,
            period,
        }
    });

    violations
}

fn push_clashes(
    violations: &mut Vec<Violation>,
    counts: HashMap<(&str, usize, usize), usize>,
    make: impl Fn(String, usize, usize) -> Violation,
) {
    let mut keys: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(k, _)| k)
        .collect();
    keys.sort_unstable();
    for (id, day, period) in keys {
        violations.push(make(id.to_string(), day, period));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Subject;
    use crate::schedule::ScheduleEntry;

    fn config() -> TimetableConfig {
        TimetableConfig::new(vec!["Mon".into(), "Tue".into()], 2)
            .with_student("S1")
            .with_student("S2")
            .with_subject(Subject::new("A", 1, "T1", "R1"))
            .with_room("R1")
            .with_room("R2")
            .with_teacher_days("T1", [0])
    }

    fn entry(student: &str, day: usize, period: usize, room: &str) -> ScheduleEntry {
        ScheduleEntry {
            student: student.into(),
            day,
            period,
            subject: "A".into(),
            room: room.into(),
        }
    }

    fn schedule(entries: Vec<ScheduleEntry>) -> Schedule {
        entries.into_iter().collect()
    }

    #[test]
    fn test_valid_schedule() {
        let s = schedule(vec![entry("S1", 0, 0, "R1"), entry("S2", 0, 1, "R1")]);
        assert!(verify(&config(), &s).is_empty());
    }

    #[test]
    fn test_quota_mismatch() {
        let s = schedule(vec![entry("S1", 0, 0, "R1")]);
        assert_eq!(
            verify(&config(), &s),
            vec![Violation::QuotaMismatch {
                student: "S2".into(),
                subject: "A".into(),
                expected: 1,
                actual: 0,
            }]
        );
    }

    #[test]
    fn test_teacher_and_room_clash() {
        let s = schedule(vec![entry("S1", 0, 0, "R1"), entry("S2", 0, 0, "R1")]);
        let violations = verify(&config(), &s);
        assert!(violations.contains(&Violation::RoomClash {
            room: "R1".into(),
            day: 0,
            period: 0,
        }));
        assert!(violations.contains(&Violation::TeacherClash {
            teacher: "T1".into(),
            day: 0,
            period: 0,
        }));
    }

    #[test]
    fn test_unavailable_day() {
        let s = schedule(vec![entry("S1", 1, 0, "R1"), entry("S2", 0, 1, "R2")]);
        assert_eq!(
            verify(&config(), &s),
            vec![Violation::TeacherUnavailable {
                teacher: "T1".into(),
                subject: "A".into(),
                day: 1,
            }]
        );
    }

    #[test]
    fn test_unknown_subject() {
        let mut bogus = entry("S1", 0, 0, "R1");
        bogus.subject = "Z".into();
        let s = schedule(vec![bogus, entry("S1", 0, 1, "R1"), entry("S2", 0, 0, "R2")]);
        assert_eq!(
            verify(&config(), &s),
            vec![Violation::UnknownSubject { subject: "Z".into() }]
        );
    }
}
