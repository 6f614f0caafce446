//! Solver interface, configuration and results.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::search::BranchAndBound;
use crate::model::{TimetableModel, VarId};

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolverStatus {
    /// Search tree exhausted with an incumbent: proven minimal penalty.
    Optimal,
    /// Stopped early with an incumbent that is not proven optimal.
    Feasible,
    /// Search tree exhausted without any complete assignment.
    Infeasible,
    /// Stopped early before any complete assignment was found.
    Unknown,
    /// The model failed its structural checks; search was not attempted.
    ModelInvalid,
}

impl SolverStatus {
    /// Whether a schedule is available.
    pub fn is_solution_found(self) -> bool {
        matches!(self, SolverStatus::Optimal | SolverStatus::Feasible)
    }

    /// Returns the upper-case status name.
    pub fn as_str(self) -> &'static str {
        match self {
            SolverStatus::Optimal => "OPTIMAL",
            SolverStatus::Feasible => "FEASIBLE",
            SolverStatus::Infeasible => "INFEASIBLE",
            SolverStatus::Unknown => "UNKNOWN",
            SolverStatus::ModelInvalid => "MODEL_INVALID",
        }
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Solver configuration.
///
/// # Examples
///
/// ```
/// use u_timetable::cp::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_time_limit_ms(2_000)
///     .with_node_limit(50_000);
/// assert_eq!(config.time_limit_ms, 2_000);
/// assert_eq!(config.node_limit, Some(50_000));
/// assert!(!config.stop_after_first);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverConfig {
    /// Wall-clock budget in milliseconds.
    pub time_limit_ms: u64,
    /// Maximum number of branching nodes (None for unlimited).
    pub node_limit: Option<u64>,
    /// Stop after finding the first complete assignment.
    pub stop_after_first: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 10_000,
            node_limit: None,
            stop_after_first: false,
        }
    }
}

impl SolverConfig {
    /// Sets the wall-clock budget in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Sets the wall-clock budget in whole seconds.
    pub fn with_time_limit_secs(mut self, secs: u64) -> Self {
        self.time_limit_ms = secs.saturating_mul(1_000);
        self
    }

    /// Caps the number of branching nodes.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    /// Stops at the first complete assignment.
    pub fn with_stop_after_first(mut self, stop: bool) -> Self {
        self.stop_after_first = stop;
        self
    }

    /// Returns the wall-clock budget.
    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }
}

/// Counters collected during one search run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchStats {
    /// Branching decisions taken.
    pub nodes: u64,
    /// Alternatives tried after a failed or exhausted branch.
    pub backtracks: u64,
    /// Propagation conflicts.
    pub conflicts: u64,
    /// Branches cut by the objective bound.
    pub pruned: u64,
    /// Improving complete assignments found.
    pub solutions: u64,
    /// Solve time in milliseconds.
    pub solve_time_ms: u64,
}

/// A complete assignment of every decision variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    values: Vec<bool>,
}

impl Assignment {
    /// Creates an assignment from one value per variable.
    pub fn new(values: Vec<bool>) -> Self {
        Self { values }
    }

    /// Returns the value of `var`.
    #[inline]
    pub fn value(&self, var: VarId) -> bool {
        self.values[var.0]
    }

    /// Returns all values in index order.
    pub fn values(&self) -> &[bool] {
        &self.values
    }

    /// Returns the number of variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Variables set to true, in index order.
    pub fn true_vars(&self) -> impl Iterator<Item = VarId> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, &v)| v)
            .map(|(i, _)| VarId(i))
    }
}

/// Result of a search run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub status: SolverStatus,
    /// Best assignment found, present for `Optimal` and `Feasible`.
    pub assignment: Option<Assignment>,
    /// Penalty of `assignment`.
    pub penalty: Option<usize>,
    pub stats: SearchStats,
}

impl SearchOutcome {
    /// Whether an assignment is available.
    pub fn is_solution_found(&self) -> bool {
        self.status.is_solution_found()
    }
}

/// Trait for timetable model solvers.
pub trait CpSolver {
    /// Solves the model and returns the best assignment found.
    fn solve(&self, model: &TimetableModel, config: &SolverConfig) -> SearchOutcome;
}

/// Exact solver: propagation, depth-first search and branch-and-bound.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchAndBoundSolver;

impl BranchAndBoundSolver {
    /// Creates the solver.
    pub fn new() -> Self {
        Self
    }
}

impl CpSolver for BranchAndBoundSolver {
    fn solve(&self, model: &TimetableModel, config: &SolverConfig) -> SearchOutcome {
        BranchAndBound::new(model, config).run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_config_default() {
        let config = SolverConfig::default();
        assert_eq!(config.time_limit_ms, 10_000);
        assert_eq!(config.time_limit(), Duration::from_secs(10));
        assert!(config.node_limit.is_none());
        assert!(!config.stop_after_first);
    }

    #[test]
    fn test_solver_config_builder() {
        let config = SolverConfig::default()
            .with_time_limit_secs(3)
            .with_node_limit(10)
            .with_stop_after_first(true);
        assert_eq!(config.time_limit_ms, 3_000);
        assert_eq!(config.node_limit, Some(10));
        assert!(config.stop_after_first);
    }

    #[test]
    fn test_status_names() {
        assert_eq!(SolverStatus::Optimal.to_string(), "OPTIMAL");
        assert_eq!(SolverStatus::ModelInvalid.to_string(), "MODEL_INVALID");
        assert!(SolverStatus::Feasible.is_solution_found());
        assert!(!SolverStatus::Unknown.is_solution_found());
        assert!(!SolverStatus::Infeasible.is_solution_found());
    }

    #[test]
    fn test_assignment_true_vars() {
        let a = Assignment::new(vec![false, true, false, true]);
        assert_eq!(a.true_vars().collect::<Vec<_>>(), vec![VarId(1), VarId(3)]);
        assert!(a.value(VarId(3)));
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn test_outcome_without_assignment() {
        let outcome = SearchOutcome {
            status: SolverStatus::Unknown,
            assignment: None,
            penalty: None,
            stats: SearchStats::default(),
        };
        assert!(!outcome.is_solution_found());
    }
}
