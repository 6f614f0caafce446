//! Boolean constraint solver for timetable models.
//!
//! # Key Components
//!
//! - **Domain store** ([`DomainStore`]): three-valued domains with an undo trail
//! - **Propagation** ([`Propagator`]): counter-based rules for `==` and `<=`
//!   constraints, plus the objective lower bound
//! - **Search** ([`BranchAndBound`]): depth-first search over undecided
//!   variables with incumbent tracking and a deadline
//! - **Solver**: [`CpSolver`] trait and [`BranchAndBoundSolver`]
//!
//! # Design
//!
//! The engine is single-threaded. A search run exclusively owns its store
//! and counters; the only interruption is the deadline (or node limit)
//! checked before each branching decision. Propagation conflicts are
//! recovered by backtracking and never leave this module.
//!
//! # References
//!
//! - Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming", Ch. 3-4
//! - Land & Doig (1960), "An Automatic Method of Solving Discrete Programming Problems"

mod domain;
mod propagator;
mod search;
mod solver;

pub use domain::{BoolDomain, Checkpoint, Conflict, DomainStore};
pub use propagator::Propagator;
pub use search::{BranchAndBound, NodeState, SearchContext};
pub use solver::{
    Assignment, BranchAndBoundSolver, CpSolver, SearchOutcome, SearchStats, SolverConfig,
    SolverStatus,
};
