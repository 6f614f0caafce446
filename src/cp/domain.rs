//! Boolean domain store with an undo trail.
//!
//! Every domain change is logged as `(variable, previous state)`. A
//! [`Checkpoint`] is the trail length at the time it was taken; rolling back
//! pops entries newest-first and restores the previous state, so undoing
//! `k` changes costs `O(k)`.

use crate::model::VarId;

/// Remaining domain of a boolean variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoolDomain {
    #[default]
    Undecided,
    True,
    False,
}

impl BoolDomain {
    /// Creates a decided domain.
    #[inline]
    pub fn of(value: bool) -> Self {
        if value {
            BoolDomain::True
        } else {
            BoolDomain::False
        }
    }

    /// The decided value, if any.
    #[inline]
    pub fn value(self) -> Option<bool> {
        match self {
            BoolDomain::Undecided => None,
            BoolDomain::True => Some(true),
            BoolDomain::False => Some(false),
        }
    }

    /// Whether both values are still possible.
    #[inline]
    pub fn is_undecided(self) -> bool {
        self == BoolDomain::Undecided
    }
}

/// A variable was asked to take the value opposite to its decided one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict;

/// Position in the trail to roll back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint(usize);

#[derive(Debug, Clone, Copy)]
struct TrailEntry {
    var: VarId,
    previous: BoolDomain,
}

/// Per-variable domains plus the trail that undoes them.
#[derive(Debug, Clone)]
pub struct DomainStore {
    domains: Vec<BoolDomain>,
    trail: Vec<TrailEntry>,
    undecided: usize,
}

impl DomainStore {
    /// Creates a store with `n` undecided variables.
    pub fn new(n: usize) -> Self {
        Self {
            domains: vec![BoolDomain::Undecided; n],
            trail: Vec::with_capacity(n),
            undecided: n,
        }
    }

    /// Returns the number of variables.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Returns the domain of `var`.
    #[inline]
    pub fn domain(&self, var: VarId) -> BoolDomain {
        self.domains[var.0]
    }

    /// Returns the decided value of `var`, if any.
    #[inline]
    pub fn value(&self, var: VarId) -> Option<bool> {
        self.domains[var.0].value()
    }

    /// Number of variables not yet decided.
    pub fn undecided_count(&self) -> usize {
        self.undecided
    }

    /// Whether every variable is decided.
    pub fn is_complete(&self) -> bool {
        self.undecided == 0
    }

    /// Lowest undecided variable with index `>= start`.
    pub fn first_undecided_from(&self, start: usize) -> Option<VarId> {
        self.domains
            .get(start..)?
            .iter()
            .position(|d| d.is_undecided())
            .map(|offset| VarId(start + offset))
    }

    /// Decides `var`.
    ///
    /// Returns `Ok(true)` when the domain changed and `Ok(false)` when the
    /// variable already held `value`.
    pub fn assign(&mut self, var: VarId, value: bool) -> Result<bool, Conflict> {
        let target = BoolDomain::of(value);
        let current = self.domains[var.0];
        if current == target {
            return Ok(false);
        }
        if !current.is_undecided() {
            return Err(Conflict);
        }
        self.trail.push(TrailEntry {
            var,
            previous: current,
        });
        self.domains[var.0] = target;
        self.undecided -= 1;
        Ok(true)
    }

    /// Marks the current trail position.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.trail.len())
    }

    /// Undoes every change made after `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.rollback_with(checkpoint, |_, _| {});
    }

    /// Undoes every change made after `checkpoint`, newest first, calling
    /// `on_undo(var, undone_value)` for each.
    pub fn rollback_with(&mut self, checkpoint: Checkpoint, mut on_undo: impl FnMut(VarId, bool)) {
        while self.trail.len() > checkpoint.0 {
            let Some(entry) = self.trail.pop() else { break };
            let undone = self.domains[entry.var.0];
            self.domains[entry.var.0] = entry.previous;
            if entry.previous.is_undecided() {
                self.undecided += 1;
            }
            if let Some(value) = undone.value() {
                on_undo(entry.var, value);
            }
        }
    }

    /// Decided values, or `None` while any variable is undecided.
    pub fn snapshot(&self) -> Option<Vec<bool>> {
        self.domains.iter().map(|d| d.value()).collect()
    }
}
