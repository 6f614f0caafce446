//! Timetabling model.
//!
//! Turns a [`TimetableConfig`] into a flat set of boolean decision variables
//! and linear constraints over them.
//!
//! # Key Components
//!
//! - **Configuration**: [`TimetableConfig`], [`Subject`]
//! - **Layout**: [`VarLayout`], [`VarId`], [`VarKey`], [`TimeSlot`]
//! - **Constraints**: [`LinearConstraint`], [`Relation`], [`ConstraintKind`], [`Objective`]
//! - **Builder**: [`ModelBuilder`] producing a [`TimetableModel`]

mod builder;
mod config;
mod constraint;
mod error;
mod index;
mod problem;

pub use builder::ModelBuilder;
pub use config::{Subject, TimetableConfig};
pub use constraint::{ConstraintId, ConstraintKind, LinearConstraint, Objective, Relation};
pub use error::ModelError;
pub use index::{TimeSlot, VarId, VarKey, VarLayout};
pub use problem::TimetableModel;
