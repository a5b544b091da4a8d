//! Plans produced by the planner.

use std::fmt;
use std::time::Duration;

use crate::action::{ActionId, Cost};
use crate::error::{ErrorSeverity, GoapError};
use crate::library::ActionLibrary;
use crate::state::{FactKey, WorldState};

/// Counters collected during one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Nodes whose successors were enumerated.
    pub expanded: usize,
    /// Successor states computed (including the start state).
    pub generated: usize,
    /// States reached again through a strictly cheaper path.
    pub reopened: usize,
    /// Successors dropped because their state was already reached as cheaply.
    pub duplicates: usize,
    /// Outdated open-set entries skipped on pop.
    pub stale: usize,
    /// Regressed candidate plans that failed forward validation.
    pub rejected: usize,
    pub frontier_high_water: usize,
    pub elapsed: Duration,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expanded={} generated={} reopened={} duplicates={} frontier_max={} elapsed={:?}",
            self.expanded,
            self.generated,
            self.reopened,
            self.duplicates,
            self.frontier_high_water,
            self.elapsed
        )
    }
}

/// One action of a plan.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanStep {
    pub action: ActionId,
    /// Target a targeted action was bound to.
    pub target: Option<FactKey>,
    /// Cost evaluated on the state preceding this step.
    pub cost: Cost,
    /// State the planner expects once this step has run.
    pub expected_state: WorldState,
}

/// Ordered sequence of actions leading from a start state to a goal.
///
/// Immutable once produced.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plan {
    start: WorldState,
    steps: Vec<PlanStep>,
    total_cost: Cost,
    stats: SearchStats,
}

impl fmt::Display for PlanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{}@{}", self.action, target),
            None => write!(f, "{}", self.action),
        }
    }
}

impl Plan {
    pub(crate) fn new(start: WorldState, steps: Vec<PlanStep>, stats: SearchStats) -> Self {
        let total_cost = steps.iter().map(|step| step.cost).sum();
        Self {
            start,
            steps,
            total_cost,
            stats,
        }
    }

    pub fn start(&self) -> &WorldState {
        &self.start
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&PlanStep> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn total_cost(&self) -> Cost {
        self.total_cost
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// State expected after the last step.
    pub fn final_state(&self) -> &WorldState {
        self.steps
            .last()
            .map_or(&self.start, |step| &step.expected_state)
    }

    pub fn action_ids(&self) -> impl Iterator<Item = &ActionId> {
        self.steps.iter().map(|step| &step.action)
    }

    /// Re-applies every step from the start state against `library`.
    ///
    /// Checks that each action exists (bound to its target, if any), is
    /// applicable where it is used and produces the expected state. Returns
    /// the final state.
    pub fn replay(&self, library: &ActionLibrary) -> Result<WorldState, PlanReplayError> {
        let mut state = self.start.clone();
        for (index, step) in self.steps.iter().enumerate() {
            let action = library
                .resolve(step.action.as_str(), step.target.as_ref())
                .ok_or_else(|| PlanReplayError::UnknownAction {
                    index,
                    id: step.action.clone(),
                })?;
            if !action.is_applicable(&state) {
                return Err(PlanReplayError::NotApplicable {
                    index,
                    id: step.action.clone(),
                });
            }
            state = action.apply(&state);
            if state != step.expected_state {
                return Err(PlanReplayError::UnexpectedState {
                    index,
                    id: step.action.clone(),
                });
            }
        }
        Ok(state)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "<empty> (cost {})", self.total_cost);
        }
        for (index, step) in self.steps.iter().enumerate() {
            if index > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{step}")?;
        }
        write!(f, " (cost {})", self.total_cost)
    }
}

/// A plan no longer matches the library it is replayed against.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlanReplayError {
    #[error("step {index}: action `{id}` is not in the library")]
    UnknownAction { index: usize, id: ActionId },

    #[error("step {index}: action `{id}` is not applicable")]
    NotApplicable { index: usize, id: ActionId },

    #[error("step {index}: action `{id}` did not produce the expected state")]
    UnexpectedState { index: usize, id: ActionId },
}

impl GoapError for PlanReplayError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAction { .. } => "PLAN_UNKNOWN_ACTION",
            Self::NotApplicable { .. } => "PLAN_NOT_APPLICABLE",
            Self::UnexpectedState { .. } => "PLAN_UNEXPECTED_STATE",
        }
    }
}
