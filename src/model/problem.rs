//! The flat boolean model handed to the solver.

use super::constraint::{ConstraintId, LinearConstraint, Objective};
use super::index::{VarId, VarLayout};

/// Variables, hard constraints and the soft objective of one timetabling
/// problem.
///
/// Built once by [`ModelBuilder`](super::ModelBuilder); its structure is
/// never mutated afterwards. Only the solver's domain store changes during
/// search.
#[derive(Debug, Clone)]
pub struct TimetableModel {
    pub(crate) layout: VarLayout,
    pub(crate) constraints: Vec<LinearConstraint>,
    /// Constraints whose scope contains each variable.
    pub(crate) watches: Vec<Vec<ConstraintId>>,
    /// The quota constraint of each variable.
    pub(crate) quota_of: Vec<ConstraintId>,
    pub(crate) forced_false: Vec<VarId>,
    pub(crate) objective: Objective,
}

impl TimetableModel {
    /// Returns the variable layout.
    pub fn layout(&self) -> &VarLayout {
        &self.layout
    }

    /// Returns the number of decision variables.
    pub fn var_count(&self) -> usize {
        self.layout.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Returns all constraints, quotas first.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Returns the constraint with the given id.
    #[inline]
    pub fn constraint(&self, id: ConstraintId) -> &LinearConstraint {
        &self.constraints[id.0]
    }

    /// Returns the constraints whose scope contains `var`.
    #[inline]
    pub fn watches(&self, var: VarId) -> &[ConstraintId] {
        &self.watches[var.0]
    }

    /// Returns the quota constraint of `var`.
    #[inline]
    pub fn quota_of(&self, var: VarId) -> ConstraintId {
        self.quota_of[var.0]
    }

    /// Variables fixed to false before search (unavailable teacher days).
    pub fn forced_false(&self) -> &[VarId] {
        &self.forced_false
    }

    /// Returns the objective.
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Checks a complete assignment against every hard constraint and the
    /// pre-forced variables.
    pub fn is_consistent(&self, values: &[bool]) -> bool {
        if values.len() != self.var_count() {
            return false;
        }
        if self.forced_false.iter().any(|v| values[v.0]) {
            return false;
        }
        self.constraints.iter().all(|c| {
            let count = c.scope.iter().filter(|v| values[v.0]).count();
            c.is_satisfied_by(count)
        })
    }
}
