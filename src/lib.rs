//! School timetabling on a from-scratch boolean constraint solver.
//!
//! Assigns weekly lesson slots to students so that every hard rule holds
//! (weekly quotas, no double-booking of students, rooms or teachers, teacher
//! availability) while minimizing the number of lessons held outside the
//! subject's preferred room.
//!
//! - **Model** (`model`): configuration, dense variable layout, constraint
//!   records and the model builder with its capacity sanity check.
//! - **CP** (`cp`): domain store with an undo trail, counter-based
//!   propagation, depth-first search and a branch-and-bound optimizer.
//! - **Schedule** (`schedule`): decoding of an assignment into ordered
//!   schedule entries and verification against the configuration.
//! - **Timetable** (`timetable`): end-to-end facade.
//!
//! # Example
//!
//! ```
//! use u_timetable::cp::{SolverConfig, SolverStatus};
//! use u_timetable::model::{Subject, TimetableConfig};
//! use u_timetable::timetable::TimetableSolver;
//!
//! let config = TimetableConfig::new(vec!["Mon".into()], 2)
//!     .with_student("S1")
//!     .with_subject(Subject::new("Math", 1, "T1", "R1"))
//!     .with_subject(Subject::new("Art", 1, "T2", "R2"))
//!     .with_room("R1")
//!     .with_room("R2");
//!
//! let result = TimetableSolver::solve(&config, &SolverConfig::default());
//! assert_eq!(result.status, SolverStatus::Optimal);
//! assert_eq!(result.schedule.len(), 2);
//! assert_eq!(result.penalty, Some(0));
//! ```
//!
//! # References
//!
//! - Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"
//! - Schaerf (1999), "A Survey of Automated Timetabling"

pub mod cp;
pub mod model;
pub mod schedule;
pub mod timetable;
