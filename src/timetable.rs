//! End-to-end timetabling: configuration in, schedule out.
//!
//! Builds the model, runs the solver and decodes the incumbent. Model
//! errors short-circuit to [`SolverStatus::ModelInvalid`] without search.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::cp::{BranchAndBoundSolver, CpSolver, SearchStats, SolverConfig, SolverStatus};
use crate::model::{ModelBuilder, ModelError, TimetableConfig};
use crate::schedule::{decode, Schedule};

/// Result of solving a timetabling problem.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TimetableResult {
    pub status: SolverStatus,
    /// Decoded lessons; empty unless a solution was found.
    pub schedule: Schedule,
    /// Lessons outside their preferred room, when a solution was found.
    pub penalty: Option<usize>,
    pub stats: SearchStats,
    /// Why the model was rejected, for `ModelInvalid`.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub error: Option<ModelError>,
}

impl TimetableResult {
    fn invalid(error: ModelError) -> Self {
        Self {
            status: SolverStatus::ModelInvalid,
            schedule: Schedule::new(),
            penalty: None,
            stats: SearchStats::default(),
            error: Some(error),
        }
    }

    /// Whether a schedule is available.
    pub fn is_solution_found(&self) -> bool {
        self.status.is_solution_found()
    }
}

/// Timetabling entry point.
pub struct TimetableSolver;

impl TimetableSolver {
    /// Solves with the exact [`BranchAndBoundSolver`].
    ///
    /// # Examples
    ///
    /// ```
    /// use u_timetable::cp::{SolverConfig, SolverStatus};
    /// use u_timetable::model::{Subject, TimetableConfig};
    /// use u_timetable::timetable::TimetableSolver;
    ///
    /// let config = TimetableConfig::new(vec!["Mon".into()], 1)
    ///     .with_student("S1")
    ///     .with_student("S2")
    ///     .with_subject(Subject::new("A", 1, "T1", "R1"))
    ///     .with_room("R1")
    ///     .with_teacher_days("T1", [4]);
    ///
    /// let result = TimetableSolver::solve(&config, &SolverConfig::default());
    /// assert_eq!(result.status, SolverStatus::ModelInvalid);
    /// assert!(result.schedule.is_empty());
    /// ```
    pub fn solve(config: &TimetableConfig, solver_config: &SolverConfig) -> TimetableResult {
        Self::solve_with(&BranchAndBoundSolver::new(), config, solver_config)
    }

    /// Solves with any [`CpSolver`].
    pub fn solve_with<S: CpSolver>(
        solver: &S,
        config: &TimetableConfig,
        solver_config: &SolverConfig,
    ) -> TimetableResult {
        let _span = tracing::info_span!(
            "timetable",
            students = config.students.len(),
            subjects = config.subjects.len(),
            rooms = config.rooms.len(),
            slots = config.slot_count()
        )
        .entered();

        let model = match ModelBuilder::new(config).build() {
            Ok(model) => model,
            Err(error) => {
                tracing::warn!(%error, "model rejected");
                return TimetableResult::invalid(error);
            }
        };

        let outcome = solver.solve(&model, solver_config);
        let schedule = outcome
            .assignment
            .as_ref()
            .map(|a| decode(config, &model, a))
            .unwrap_or_default();

        TimetableResult {
            status: outcome.status,
            schedule,
            penalty: outcome.penalty,
            stats: outcome.stats,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Subject;
    use crate::schedule::verify;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn days(names: &[&str]) -> Vec<String> {
        names.iter().map(|d| d.to_string()).collect()
    }

    fn week() -> Vec<String> {
        days(&["Mon", "Tue", "Wed", "Thu", "Fri"])
    }

    /// Three students, five subjects with dedicated rooms, teacher T1 on
    /// Tuesday and Wednesday only.
    fn school_week() -> TimetableConfig {
        let mut config = TimetableConfig::new(week(), 5)
            .with_student("S1")
            .with_student("S2")
            .with_student("S3")
            .with_teacher_days("T1", [1, 2]);
        for (id, hours, teacher) in [("A", 2, "T1"), ("B", 2, "T2"), ("C", 5, "T3"), ("D", 1, "T4"), ("E", 1, "T5")] {
            let room = format!("Room_{id}");
            config = config
                .with_subject(Subject::new(id, hours, teacher, room.as_str()))
                .with_room(room);
        }
        config
    }

    fn assert_valid(config: &TimetableConfig, result: &TimetableResult) {
        assert!(result.is_solution_found(), "status {}", result.status);
        assert_eq!(verify(config, &result.schedule), vec![]);
        assert_eq!(result.penalty, Some(result.schedule.penalty(config)));
    }

    #[test]
    fn test_single_lesson() {
        let config = TimetableConfig::new(days(&["Mon"]), 1)
            .with_student("S1")
            .with_subject(Subject::new("A", 1, "T1", "R1"))
            .with_room("R1");
        let result = TimetableSolver::solve(&config, &SolverConfig::default());
        assert_eq!(result.status, SolverStatus::Optimal);
        assert_eq!(result.schedule.len(), 1);
        assert_eq!(result.penalty, Some(0));
        assert_valid(&config, &result);
    }

    #[test]
    fn test_teacher_without_slots_is_model_invalid() {
        let config = TimetableConfig::new(week(), 5)
            .with_student("S1")
            .with_student("S2")
            .with_subject(Subject::new("A", 1, "T1", "R1"))
            .with_room("R1")
            .with_teacher_days("T1", [7]);
        let result = TimetableSolver::solve(&config, &SolverConfig::default());
        assert_eq!(result.status, SolverStatus::ModelInvalid);
        assert_eq!(
            result.error,
            Some(ModelError::TeacherOverloaded {
                teacher: "T1".into(),
                required: 2,
                capacity: 0,
            })
        );
        assert_eq!(result.stats.nodes, 0);
    }

    #[test]
    fn test_room_overload_is_infeasible() {
        let config = TimetableConfig::new(days(&["Mon"]), 2)
            .with_student("S1")
            .with_student("S2")
            .with_subject(Subject::new("A", 1, "T1", "R1"))
            .with_subject(Subject::new("B", 1, "T2", "R1"))
            .with_room("R1");
        let result = TimetableSolver::solve(&config, &SolverConfig::default().with_time_limit_secs(60));
        assert_eq!(result.status, SolverStatus::Infeasible);
        assert!(result.schedule.is_empty());
    }

    #[test]
    fn test_non_preferred_rooms_only() {
        let config = TimetableConfig::new(days(&["Mon", "Tue"]), 2)
            .with_student("S1")
            .with_student("S2")
            .with_subject(Subject::new("A", 1, "T1", "Lab_A"))
            .with_subject(Subject::new("B", 1, "T2", "Lab_B"))
            .with_room("R1")
            .with_room("R2");
        let result = TimetableSolver::solve(&config, &SolverConfig::default().with_time_limit_secs(60));
        assert_eq!(result.status, SolverStatus::Optimal);
        assert_eq!(result.penalty, Some(config.total_lessons()));
        assert_valid(&config, &result);
    }

    #[test]
    fn test_shared_teacher_never_double_booked() {
        let config = TimetableConfig::new(days(&["Mon"]), 3)
            .with_student("S1")
            .with_student("S2")
            .with_subject(Subject::new("A", 1, "T1", "R1"))
            .with_subject(Subject::new("B", 1, "T1", "R2"))
            .with_room("R1")
            .with_room("R2");
        // T1 needs 4 slots but the day has 3.
        let result = TimetableSolver::solve(&config, &SolverConfig::default());
        assert_eq!(result.status, SolverStatus::ModelInvalid);

        let config = TimetableConfig {
            periods_per_day: 4,
            ..config
        };
        let result = TimetableSolver::solve(&config, &SolverConfig::default());
        assert_eq!(result.status, SolverStatus::Optimal);
        assert_valid(&config, &result);
        let mut per_slot: HashMap<(usize, usize), usize> = HashMap::new();
        for e in &result.schedule {
            *per_slot.entry((e.day, e.period)).or_default() += 1;
        }
        assert!(per_slot.values().all(|&n| n == 1));
    }

    #[test]
    fn test_school_week_respects_availability() {
        let config = school_week();
        let result = TimetableSolver::solve(&config, &SolverConfig::default().with_time_limit_ms(2_000));
        assert_valid(&config, &result);
        assert_eq!(result.schedule.len(), config.total_lessons());
        for e in result.schedule.iter().filter(|e| e.subject == "A") {
            assert!(e.day == 1 || e.day == 2, "A scheduled on day {}", e.day);
        }
    }

    #[test]
    fn test_free_periods_reported() {
        let config = TimetableConfig::new(days(&["Mon"]), 3)
            .with_student("S1")
            .with_subject(Subject::new("A", 1, "T1", "R1"))
            .with_room("R1");
        let result = TimetableSolver::solve(&config, &SolverConfig::default());
        let occupied = (0..3)
            .filter(|&p| result.schedule.entry_at("S1", 0, p).is_some())
            .count();
        assert_eq!(occupied, 1);
    }

    #[test]
    fn test_empty_problem_is_trivially_optimal() {
        let config = TimetableConfig::new(week(), 5);
        let result = TimetableSolver::solve(&config, &SolverConfig::default());
        assert_eq!(result.status, SolverStatus::Optimal);
        assert_eq!(result.penalty, Some(0));
        assert!(result.schedule.is_empty());
    }

    #[test]
    fn test_invalid_config_reported() {
        let config = TimetableConfig::new(week(), 5)
            .with_student("S1")
            .with_student("S1");
        let result = TimetableSolver::solve(&config, &SolverConfig::default());
        assert_eq!(result.status, SolverStatus::ModelInvalid);
        assert!(matches!(result.error, Some(ModelError::InvalidConfig(_))));
    }

    fn arb_config() -> impl Strategy<Value = TimetableConfig> {
        let subject = (0usize..=2, 0usize..2, 0usize..3);
        (
            1usize..=2,
            prop::collection::vec(subject, 1..=2),
            1usize..=2,
            1usize..=2,
            1usize..=3,
            prop::option::of(prop::collection::btree_set(0usize..2, 0..=2)),
        )
            .prop_map(|(students, subjects, rooms, day_count, periods, t1_days)| {
                let names: Vec<String> = (0..day_count).map(|d| format!("D{d}")).collect();
                let mut config = TimetableConfig::new(names, periods);
                for s in 0..students {
                    config = config.with_student(format!("S{s}"));
                }
                for r in 0..rooms {
                    config = config.with_room(format!("R{r}"));
                }
                for (j, (hours, teacher, room)) in subjects.into_iter().enumerate() {
                    let preferred = if room == 2 { "Lab".to_string() } else { format!("R{room}") };
                    config = config.with_subject(Subject::new(
                        format!("J{j}"),
                        hours,
                        format!("T{teacher}"),
                        preferred,
                    ));
                }
                if let Some(days) = t1_days {
                    config = config.with_teacher_days("T0", days);
                }
                config
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_solutions_satisfy_every_hard_rule(config in arb_config()) {
            let result = TimetableSolver::solve(&config, &SolverConfig::default());
            if result.is_solution_found() {
                prop_assert!(verify(&config, &result.schedule).is_empty());
                prop_assert_eq!(result.penalty, Some(result.schedule.penalty(&config)));
                prop_assert_eq!(result.schedule.len(), config.total_lessons());
            }
            if result.status == SolverStatus::ModelInvalid {
                prop_assert!(result.error.is_some());
            }
        }

        #[test]
        fn prop_optimal_never_worse_than_first_solution(config in arb_config()) {
            let optimal = TimetableSolver::solve(&config, &SolverConfig::default());
            let first = TimetableSolver::solve(
                &config,
                &SolverConfig::default().with_stop_after_first(true),
            );
            prop_assert_eq!(optimal.is_solution_found(), first.is_solution_found());
            if optimal.status == SolverStatus::Optimal {
                prop_assert!(optimal.penalty <= first.penalty);
            }
        }

        #[test]
        fn prop_decoding_is_stable(config in arb_config()) {
            let a = TimetableSolver::solve(&config, &SolverConfig::default());
            let b = TimetableSolver::solve(&config, &SolverConfig::default());
            prop_assert_eq!(a.status, b.status);
            prop_assert_eq!(a.schedule, b.schedule);
        }
    }
}
