//! Depth-first search with branch-and-bound.
//!
//! # Algorithm
//!
//! 1. Fix the pre-forced variables and propagate every constraint once
//! 2. At each node:
//!    a. Prune if the objective lower bound cannot beat the incumbent
//!    b. Check the deadline and node limit
//!    c. Branch on the lowest-index undecided variable, `true` first
//!    d. Propagate; on conflict roll back and try `false`
//! 3. On a complete assignment, keep it if strictly better and backtrack to
//!    look for improvements
//! 4. Terminate when the tree is exhausted or a limit fires
//!
//! Decisions live on an explicit stack. Each frame holds the trail
//! checkpoint taken before its first value, so backtracking is a trail
//! truncation.

use std::time::{Duration, Instant};

use super::domain::{Checkpoint, DomainStore};
use super::propagator::Propagator;
use super::solver::{Assignment, SearchOutcome, SearchStats, SolverConfig, SolverStatus};
use crate::model::{TimetableModel, VarId};

/// Phase of the search loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Partial assignment consistent so far.
    Searching,
    /// Current branch is dead.
    Contradiction,
    /// Every variable is decided.
    Complete,
}

/// Limits threaded through the search loop.
#[derive(Debug, Clone, Copy)]
pub struct SearchContext {
    start: Instant,
    deadline: Option<Instant>,
    node_limit: Option<u64>,
}

impl SearchContext {
    /// Creates a context whose deadline starts now.
    pub fn new(time_limit: Duration, node_limit: Option<u64>) -> Self {
        let start = Instant::now();
        Self {
            start,
            deadline: start.checked_add(time_limit),
            node_limit,
        }
    }

    /// Creates a context from solver limits.
    pub fn from_config(config: &SolverConfig) -> Self {
        Self::new(config.time_limit(), config.node_limit)
    }

    /// Whether the search must stop before taking node number `nodes + 1`.
    pub fn is_exhausted(&self, nodes: u64) -> bool {
        if self.node_limit.is_some_and(|limit| nodes >= limit) {
            return true;
        }
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Returns the time since the context was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    var: VarId,
    checkpoint: Checkpoint,
    false_untried: bool,
}

#[derive(Debug, Clone)]
struct Incumbent {
    values: Vec<bool>,
    penalty: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Termination {
    Exhausted,
    LimitReached,
    FirstSolution,
}

/// One branch-and-bound run over a [`TimetableModel`].
pub struct BranchAndBound<'m> {
    model: &'m TimetableModel,
    store: DomainStore,
    propagator: Propagator<'m>,
    context: SearchContext,
    stop_after_first: bool,
    stack: Vec<Frame>,
    incumbent: Option<Incumbent>,
    stats: SearchStats,
}

impl<'m> BranchAndBound<'m> {
    /// Creates a search over `model` with fresh domains and counters.
    pub fn new(model: &'m TimetableModel, config: &SolverConfig) -> Self {
        Self {
            model,
            store: DomainStore::new(model.var_count()),
            propagator: Propagator::new(model),
            context: SearchContext::from_config(config),
            stop_after_first: config.stop_after_first,
            stack: Vec::new(),
            incumbent: None,
            stats: SearchStats::default(),
        }
    }

    /// Runs the search to termination.
    pub fn run(mut self) -> SearchOutcome {
        let termination = match self.initialize() {
            Some(root_bound) => self.search(root_bound),
            None => Termination::Exhausted,
        };
        self.finish(termination)
    }

    /// Applies pre-forced variables and root propagation. Returns the root
    /// lower bound, or `None` when the root is already contradictory.
    fn initialize(&mut self) -> Option<usize> {
        let model = self.model;
        for &var in model.forced_false() {
            if self.propagator.fix(&mut self.store, var, false).is_err() {
                return None;
            }
        }
        if self.propagator.propagate_all(&mut self.store).is_err() {
            self.stats.conflicts += 1;
            tracing::debug!("root propagation failed");
            return None;
        }
        let bound = self.propagator.lower_bound();
        tracing::debug!(
            undecided = self.store.undecided_count(),
            lower_bound = bound,
            "root propagation done"
        );
        Some(bound)
    }

    fn search(&mut self, root_bound: usize) -> Termination {
        let mut state = NodeState::Searching;
        loop {
            state = match state {
                NodeState::Searching => {
                    if self.is_dominated() {
                        self.stats.pruned += 1;
                        NodeState::Contradiction
                    } else {
                        let start = self.stack.last().map_or(0, |f| f.var.0 + 1);
                        match self.store.first_undecided_from(start) {
                            None => NodeState::Complete,
                            Some(var) => {
                                if self.context.is_exhausted(self.stats.nodes) {
                                    return Termination::LimitReached;
                                }
                                self.stats.nodes += 1;
                                self.stack.push(Frame {
                                    var,
                                    checkpoint: self.store.checkpoint(),
                                    false_untried: true,
                                });
                                self.decide(var, true)
                            }
                        }
                    }
                }
                NodeState::Complete => {
                    self.record_solution();
                    let proven = self
                        .incumbent
                        .as_ref()
                        .is_some_and(|inc| inc.penalty <= root_bound);
                    if self.stop_after_first && !proven {
                        return Termination::FirstSolution;
                    }
                    NodeState::Contradiction
                }
                NodeState::Contradiction => match self.backtrack() {
                    Some(var) => self.decide(var, false),
                    None => return Termination::Exhausted,
                },
            };
        }
    }

    /// Whether the current node cannot strictly improve on the incumbent.
    fn is_dominated(&self) -> bool {
        self.incumbent
            .as_ref()
            .is_some_and(|inc| self.propagator.lower_bound() >= inc.penalty)
    }

    fn decide(&mut self, var: VarId, value: bool) -> NodeState {
        let result = self
            .propagator
            .fix(&mut self.store, var, value)
            .and_then(|()| self.propagator.propagate(&mut self.store));
        match result {
            Ok(()) => NodeState::Searching,
            Err(_) => {
                self.stats.conflicts += 1;
                NodeState::Contradiction
            }
        }
    }

    /// Unwinds to the deepest frame with an untried `false` branch and
    /// returns its variable, or `None` when the tree is exhausted.
    fn backtrack(&mut self) -> Option<VarId> {
        while let Some(frame) = self.stack.last_mut() {
            let checkpoint = frame.checkpoint;
            let retry = frame.false_untried;
            frame.false_untried = false;
            let var = frame.var;
            self.propagator.rollback(&mut self.store, checkpoint);
            if retry {
                self.stats.backtracks += 1;
                return Some(var);
            }
            self.stack.pop();
        }
        None
    }

    fn record_solution(&mut self) {
        let Some(values) = self.store.snapshot() else {
            return;
        };
        let penalty = self.propagator.penalty();
        debug_assert!(self.model.is_consistent(&values));
        debug_assert_eq!(penalty, self.model.objective().evaluate(&values));

        if self.incumbent.as_ref().is_some_and(|inc| inc.penalty <= penalty) {
            return;
        }
        self.stats.solutions += 1;
        tracing::debug!(
            penalty,
            nodes = self.stats.nodes,
            elapsed_ms = self.context.elapsed().as_millis() as u64,
            "new incumbent"
        );
        self.incumbent = Some(Incumbent { values, penalty });
    }

    fn finish(mut self, termination: Termination) -> SearchOutcome {
        self.stats.solve_time_ms = self.context.elapsed().as_millis() as u64;
        let status = match (termination, &self.incumbent) {
            (Termination::Exhausted, Some(_)) => SolverStatus::Optimal,
            (Termination::Exhausted, None) => SolverStatus::Infeasible,
            (_, Some(_)) => SolverStatus::Feasible,
            (_, None) => SolverStatus::Unknown,
        };
        tracing::info!(
            %status,
            nodes = self.stats.nodes,
            backtracks = self.stats.backtracks,
            pruned = self.stats.pruned,
            solve_time_ms = self.stats.solve_time_ms,
            "search finished"
        );
        let (assignment, penalty) = match self.incumbent {
            Some(inc) => (Some(Assignment::new(inc.values)), Some(inc.penalty)),
            None => (None, None),
        };
        SearchOutcome {
            status,
            assignment,
            penalty,
            stats: self.stats,
        }
    }
}
