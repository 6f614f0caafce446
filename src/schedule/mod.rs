//! Decoded timetables.
//!
//! - **Entries**: [`ScheduleEntry`], [`Schedule`] and [`decode`], which turns a
//!   solver [`Assignment`](crate::cp::Assignment) into ordered lessons
//! - **Verification**: [`verify`] re-checks a schedule against its
//!   configuration and reports each [`Violation`]
//!
//! Rendering and textual reports are left to consumers; [`Schedule::entry_at`]
//! distinguishes free periods from occupied ones.

mod check;
mod entry;

pub use check::{verify, Violation};
pub use entry::{decode, Schedule, ScheduleEntry};
