//! Counter-based propagation for linear boolean constraints.
//!
//! For each constraint the propagator keeps the number of true and of still
//! undecided (open) variables in scope. Each decision updates only the
//! counters of the constraints watching the variable and queues the variable;
//! the worklist is drained until no constraint forces anything more.
//!
//! # Rules
//!
//! With `t` true and `o` open variables:
//!
//! | Relation | Conflict | Force false | Force true |
//! |----------|----------|-------------|------------|
//! | `== k` | `t > k` or `t + o < k` | `t == k` | `t + o == k` |
//! | `<= k` | `t > k` | `t == k` | never |
//!
//! The propagator also tracks a lower bound on the objective: the penalty
//! already incurred plus, for every quota, the lessons that can no longer be
//! placed in an unpenalized room.

use super::domain::{Checkpoint, Conflict, DomainStore};
use crate::model::{ConstraintId, Relation, TimetableModel, VarId};

/// Propagation state for one search run.
#[derive(Debug, Clone)]
pub struct Propagator<'m> {
    model: &'m TimetableModel,
    true_count: Vec<usize>,
    open_count: Vec<usize>,
    /// Open variables outside the penalized set, per constraint.
    open_free: Vec<usize>,
    /// Forced penalty per quota constraint.
    deficit: Vec<usize>,
    deficit_total: usize,
    penalty: usize,
    queue: Vec<VarId>,
}

impl<'m> Propagator<'m> {
    /// Creates counters for a store where every variable is undecided.
    pub fn new(model: &'m TimetableModel) -> Self {
        let objective = model.objective();
        let open_count: Vec<usize> = model.constraints().iter().map(|c| c.scope.len()).collect();
        let open_free: Vec<usize> = model
            .constraints()
            .iter()
            .map(|c| c.scope.iter().filter(|&&v| !objective.is_penalized(v)).count())
            .collect();

        let mut propagator = Self {
            model,
            true_count: vec![0; model.constraint_count()],
            open_count,
            open_free,
            deficit: vec![0; model.constraint_count()],
            deficit_total: 0,
            penalty: 0,
            queue: Vec::new(),
        };
        for (i, c) in model.constraints().iter().enumerate() {
            if c.relation == Relation::Equal {
                propagator.refresh_deficit(ConstraintId(i));
            }
        }
        propagator
    }

    /// Penalty of the variables decided true so far.
    pub fn penalty(&self) -> usize {
        self.penalty
    }

    /// Lower bound on the penalty of any completion of the current state.
    pub fn lower_bound(&self) -> usize {
        self.penalty + self.deficit_total
    }

    /// Variables of `c` decided true.
    pub fn true_count(&self, c: ConstraintId) -> usize {
        self.true_count[c.0]
    }

    /// Variables of `c` still undecided.
    pub fn open_count(&self, c: ConstraintId) -> usize {
        self.open_count[c.0]
    }

    /// Decides `var` and queues it for propagation.
    pub fn fix(&mut self, store: &mut DomainStore, var: VarId, value: bool) -> Result<(), Conflict> {
        if store.assign(var, value)? {
            self.on_assign(var, value);
            self.queue.push(var);
        }
        Ok(())
    }

    /// Drains the worklist to a fixed point.
    ///
    /// On conflict the worklist is cleared; the caller rolls the store back.
    pub fn propagate(&mut self, store: &mut DomainStore) -> Result<(), Conflict> {
        let model = self.model;
        while let Some(var) = self.queue.pop() {
            for &c in model.watches(var) {
                if let Err(conflict) = self.revise(store, c) {
                    self.queue.clear();
                    return Err(conflict);
                }
            }
        }
        Ok(())
    }

    /// Revises every constraint once, then propagates.
    ///
    /// Used at the root, where constraints with no decided variable (or an
    /// empty scope) would otherwise never be examined.
    pub fn propagate_all(&mut self, store: &mut DomainStore) -> Result<(), Conflict> {
        for c in 0..self.model.constraint_count() {
            if let Err(conflict) = self.revise(store, ConstraintId(c)) {
                self.queue.clear();
                return Err(conflict);
            }
        }
        self.propagate(store)
    }

    /// Rolls `store` back to `checkpoint`, restoring counters.
    pub fn rollback(&mut self, store: &mut DomainStore, checkpoint: Checkpoint) {
        store.rollback_with(checkpoint, |var, value| self.on_undo(var, value));
    }

    fn revise(&mut self, store: &mut DomainStore, c: ConstraintId) -> Result<(), Conflict> {
        let constraint = self.model.constraint(c);
        let t = self.true_count[c.0];
        let o = self.open_count[c.0];
        let k = constraint.bound;

        if t > k {
            return Err(Conflict);
        }
        match constraint.relation {
            Relation::Equal if t + o < k => Err(Conflict),
            _ if o == 0 => Ok(()),
            _ if t == k => self.force(store, c, false),
            Relation::Equal if t + o == k => self.force(store, c, true),
            _ => Ok(()),
        }
    }

    fn force(&mut self, store: &mut DomainStore, c: ConstraintId, value: bool) -> Result<(), Conflict> {
        let model = self.model;
        for &var in &model.constraint(c).scope {
            if store.domain(var).is_undecided() {
                self.fix(store, var, value)?;
            }
        }
        Ok(())
    }

    fn on_assign(&mut self, var: VarId, value: bool) {
        let model = self.model;
        for &c in model.watches(var) {
            self.open_count[c.0] -= 1;
            if value {
                self.true_count[c.0] += 1;
            }
        }
        let quota = model.quota_of(var);
        if model.objective().is_penalized(var) {
            if value {
                self.penalty += 1;
            }
        } else {
            self.open_free[quota.0] -= 1;
        }
        self.refresh_deficit(quota);
    }

    fn on_undo(&mut self, var: VarId, value: bool) {
        let model = self.model;
        for &c in model.watches(var) {
            self.open_count[c.0] += 1;
            if value {
                self.true_count[c.0] -= 1;
            }
        }
        let quota = model.quota_of(var);
        if model.objective().is_penalized(var) {
            if value {
                self.penalty -= 1;
            }
        } else {
            self.open_free[quota.0] += 1;
        }
        self.refresh_deficit(quota);
    }

    fn refresh_deficit(&mut self, quota: ConstraintId) {
        let need = self.model.constraint(quota).bound.saturating_sub(self.true_count[quota.0]);
        let deficit = need.saturating_sub(self.open_free[quota.0]);
        self.deficit_total = self.deficit_total - self.deficit[quota.0] + deficit;
        self.deficit[quota.0] = deficit;
    }
}
