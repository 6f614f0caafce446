//! Constraint records and the soft objective.

use super::index::VarId;

/// Index of a constraint in [`TimetableModel::constraints`](super::TimetableModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub usize);

/// Comparison between the number of true variables in scope and the bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `sum == bound`
    Equal,
    /// `sum <= bound`
    AtMost,
}

/// What a hard constraint encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// Weekly hours of one subject for one student.
    Quota,
    /// One lesson per student per slot.
    StudentSlot,
    /// One lesson per room per slot.
    RoomSlot,
    /// One lesson per teacher per slot.
    TeacherSlot,
}

/// A linear relation over boolean variables with unit coefficients.
#[derive(Debug, Clone)]
pub struct LinearConstraint {
    pub kind: ConstraintKind,
    pub scope: Vec<VarId>,
    pub relation: Relation,
    pub bound: usize,
}

impl LinearConstraint {
    /// Creates a `sum(scope) == bound` constraint.
    pub fn equal(kind: ConstraintKind, scope: Vec<VarId>, bound: usize) -> Self {
        Self {
            kind,
            scope,
            relation: Relation::Equal,
            bound,
        }
    }

    /// Creates a `sum(scope) <= bound` constraint.
    pub fn at_most(kind: ConstraintKind, scope: Vec<VarId>, bound: usize) -> Self {
        Self {
            kind,
            scope,
            relation: Relation::AtMost,
            bound,
        }
    }

    /// Whether `true_count` true variables satisfy the relation once every
    /// variable in scope is decided.
    pub fn is_satisfied_by(&self, true_count: usize) -> bool {
        match self.relation {
            Relation::Equal => true_count == self.bound,
            Relation::AtMost => true_count <= self.bound,
        }
    }
}

/// Minimize the number of true penalized variables.
#[derive(Debug, Clone, Default)]
pub struct Objective {
    penalized: Vec<bool>,
}

impl Objective {
    /// Creates an objective from per-variable penalty flags.
    pub fn new(penalized: Vec<bool>) -> Self {
        Self { penalized }
    }

    /// Whether setting `var` true costs one penalty unit.
    #[inline]
    pub fn is_penalized(&self, var: VarId) -> bool {
        self.penalized[var.0]
    }

    /// Penalty of a complete assignment given as one bool per variable.
    pub fn evaluate(&self, values: &[bool]) -> usize {
        values
            .iter()
            .zip(&self.penalized)
            .filter(|(&v, &p)| v && p)
            .count()
    }
}
