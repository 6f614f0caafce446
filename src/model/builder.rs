//! Model builder: configuration to flat boolean model.
//!
//! # Formulation
//!
//! One boolean `x[s, j, d, p, r]` per student, subject, day, period and
//! room, meaning "student `s` attends subject `j` in room `r` at `(d, p)`".
//!
//! - Quota: `Σ_{d,p,r} x[s,j,d,p,r] == hours(j)` for every `(s, j)`
//! - Student: `Σ_{j,r} x[s,j,d,p,r] <= 1` for every `(s, d, p)`
//! - Room: `Σ_{s,j} x[s,j,d,p,r] <= 1` for every `(r, d, p)`
//! - Teacher: `Σ_{s, j taught by t, r} x[s,j,d,p,r] <= 1` for every `(t, d, p)`
//! - Availability: `x[s,j,d,p,r] = 0` when teacher of `j` is off on `d`
//! - Objective: minimize `Σ x[s,j,d,p,r]` over `r != preferred_room(j)`

use std::collections::HashMap;

use super::config::TimetableConfig;
use super::constraint::{ConstraintId, ConstraintKind, LinearConstraint, Objective};
use super::error::ModelError;
use super::index::{VarId, VarLayout};
use super::problem::TimetableModel;

/// Builds a [`TimetableModel`] from a [`TimetableConfig`].
///
/// # Examples
///
/// ```
/// use u_timetable::model::{ModelBuilder, Subject, TimetableConfig};
///
/// let config = TimetableConfig::new(vec!["Mon".into()], 2)
///     .with_student("S1")
///     .with_subject(Subject::new("A", 1, "T1", "R1"))
///     .with_room("R1");
///
/// let model = ModelBuilder::new(&config).build().unwrap();
/// assert_eq!(model.var_count(), 2);
/// // 1 quota + 2 student slots + 2 room slots + 2 teacher slots
/// assert_eq!(model.constraint_count(), 7);
/// ```
pub struct ModelBuilder<'a> {
    config: &'a TimetableConfig,
}

impl<'a> ModelBuilder<'a> {
    /// Creates a builder over `config`.
    pub fn new(config: &'a TimetableConfig) -> Self {
        Self { config }
    }

    /// Variable space shape for the configuration.
    pub fn layout(&self) -> VarLayout {
        VarLayout {
            students: self.config.students.len(),
            subjects: self.config.subjects.len(),
            days: self.config.days.len(),
            periods: self.config.periods_per_day,
            rooms: self.config.rooms.len(),
        }
    }

    /// Compares each teacher's required lessons against its available slots.
    ///
    /// Necessary but not sufficient for feasibility.
    pub fn check_capacity(&self) -> Result<(), ModelError> {
        let students = self.config.students.len();
        for teacher in self.config.teachers() {
            let hours: usize = self
                .config
                .subjects
                .iter()
                .filter(|s| s.teacher == teacher)
                .map(|s| s.hours)
                .sum();
            let required = hours * students;
            let capacity = self.config.teacher_capacity(teacher);
            tracing::debug!(teacher, required, capacity, "teacher capacity check");
            if required > capacity {
                tracing::warn!(teacher, required, capacity, "teacher overloaded");
                return Err(ModelError::TeacherOverloaded {
                    teacher: teacher.to_string(),
                    required,
                    capacity,
                });
            }
        }
        Ok(())
    }

    /// Validates the configuration, runs the capacity check and emits the
    /// model.
    pub fn build(&self) -> Result<TimetableModel, ModelError> {
        self.config.validate()?;
        self.check_capacity()?;

        let config = self.config;
        let layout = self.layout();
        let n = layout.len();
        let slots = layout.days * layout.periods;

        // Teachers numbered by first appearance.
        let mut teacher_index: HashMap<&str, usize> = HashMap::new();
        let teacher_of: Vec<usize> = config
            .subjects
            .iter()
            .map(|s| {
                let next = teacher_index.len();
                *teacher_index.entry(s.teacher.as_str()).or_insert(next)
            })
            .collect();

        let mut quota = vec![Vec::new(); layout.students * layout.subjects];
        let mut student_slot = vec![Vec::new(); layout.students * slots];
        let mut room_slot = vec![Vec::new(); layout.rooms * slots];
        let mut teacher_slot = vec![Vec::new(); teacher_index.len() * slots];
        for (i, key) in layout.keys().enumerate() {
            let var = VarId(i);
            let slot = key.day * layout.periods + key.period;
            quota[key.student * layout.subjects + key.subject].push(var);
            student_slot[key.student * slots + slot].push(var);
            room_slot[key.room * slots + slot].push(var);
            teacher_slot[teacher_of[key.subject] * slots + slot].push(var);
        }

        // Quota constraints come first: ConstraintId(s * subjects + j) is
        // the quota of (s, j).
        let mut constraints = Vec::new();
        for (q, scope) in quota.into_iter().enumerate() {
            let hours = config.subjects[q % layout.subjects].hours;
            constraints.push(LinearConstraint::equal(ConstraintKind::Quota, scope, hours));
        }
        for scope in student_slot {
            push_at_most_one(&mut constraints, ConstraintKind::StudentSlot, scope);
        }
        for scope in room_slot {
            push_at_most_one(&mut constraints, ConstraintKind::RoomSlot, scope);
        }
        for scope in teacher_slot {
            push_at_most_one(&mut constraints, ConstraintKind::TeacherSlot, scope);
        }

        let mut watches: Vec<Vec<ConstraintId>> = vec![Vec::new(); n];
        let mut quota_of = vec![ConstraintId(0); n];
        for (ci, c) in constraints.iter().enumerate() {
            for &var in &c.scope {
                watches[var.0].push(ConstraintId(ci));
                if c.kind == ConstraintKind::Quota {
                    quota_of[var.0] = ConstraintId(ci);
                }
            }
        }

        let mut forced_false = Vec::new();
        let mut penalized = Vec::with_capacity(n);
        for (i, key) in layout.keys().enumerate() {
            let subject = &config.subjects[key.subject];
            if !config.is_teacher_available(&subject.teacher, key.day) {
                forced_false.push(VarId(i));
            }
            penalized.push(config.rooms[key.room] != subject.preferred_room);
        }

        tracing::debug!(
            variables = n,
            constraints = constraints.len(),
            forced_false = forced_false.len(),
            "timetable model built"
        );

        Ok(TimetableModel {
            layout,
            constraints,
            watches,
            quota_of,
            forced_false,
            objective: Objective::new(penalized),
        })
    }
}

fn push_at_most_one(
    constraints: &mut Vec<LinearConstraint>,
    kind: ConstraintKind,
    scope: Vec<VarId>,
) {
    if !scope.is_empty() {
        constraints.push(LinearConstraint::at_most(kind, scope, 1));
    }
}
