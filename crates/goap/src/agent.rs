//! Goal arbitration on top of a plan runner.

use std::sync::Arc;

use crate::config::GoapConfig;
use crate::goal::{Goal, GoalSet};
use crate::library::ActionLibrary;
use crate::planner::{FactDeficit, Heuristic, Planner};
use crate::memory::Memory;
use crate::runner::{ActionExecutor, CancelToken, FailureReason, PlanRunner, RunnerState};
use crate::state::{FactKey, WorldState};

/// An agent that picks its own goals.
///
/// Each tick selects the best goal for the live world, switches episodes
/// when the choice changes and then advances the runner. A finished episode
/// (completed or failed) clears the pursued goal so the next tick
/// arbitrates again.
///
/// A goal that could not be planned or whose episode failed sits out of
/// arbitration until the live world, the goal set or the memory changes.
pub struct GoapAgent<E: ActionExecutor, H = FactDeficit> {
    goals: GoalSet,
    runner: PlanRunner<E, H>,
    pursued: Option<String>,
    stalled: Option<(String, WorldState)>,
}

impl<E: ActionExecutor> GoapAgent<E, FactDeficit> {
    pub fn new(library: Arc<ActionLibrary>, config: GoapConfig) -> Self {
        Self::with_heuristic(library, config, FactDeficit)
    }
}

impl<E: ActionExecutor, H: Heuristic> GoapAgent<E, H> {
    pub fn with_heuristic(library: Arc<ActionLibrary>, config: GoapConfig, heuristic: H) -> Self {
        let planner = Planner::with_heuristic(config.planner, heuristic);
        Self {
            goals: GoalSet::new(),
            runner: PlanRunner::new(library, planner, config.runner),
            pursued: None,
            stalled: None,
        }
    }

    /// Adds or replaces a goal by name.
    ///
    /// Replacing the pursued goal forces re-arbitration on the next tick.
    pub fn add_goal(&mut self, goal: Goal) {
        self.stalled = None;
        let name = goal.name().to_owned();
        if self.goals.insert(goal).is_some() && self.pursued.as_deref() == Some(name.as_str()) {
            tracing::debug!("pursued goal {} was redefined", name);
            self.pursued = None;
        }
    }

    /// Removes a goal, cancelling the episode if it was being pursued.
    pub fn remove_goal(&mut self, name: &str, executor: &mut E) -> Option<Goal> {
        let removed = self.goals.remove(name)?;
        self.stalled = None;
        if self.pursued.as_deref() == Some(name) {
            self.runner.cancel(executor);
            self.pursued = None;
        }
        Some(removed)
    }

    pub fn goals(&self) -> &GoalSet {
        &self.goals
    }

    pub fn runner(&self) -> &PlanRunner<E, H> {
        &self.runner
    }

    pub fn pursued_goal(&self) -> Option<&str> {
        self.pursued.as_deref()
    }

    /// Goal left alone until something changes, if any.
    pub fn stalled_goal(&self) -> Option<&str> {
        self.stalled.as_ref().map(|(name, _)| name.as_str())
    }

    pub fn memory(&self) -> &Memory {
        self.runner.memory()
    }

    /// Adds `target` to the memory targeted actions bind to.
    pub fn remember(&mut self, target: impl Into<FactKey>) -> bool {
        let added = self.runner.memory_mut().register(target);
        if added {
            self.stalled = None;
        }
        added
    }

    pub fn forget(&mut self, target: &str) -> bool {
        let removed = self.runner.memory_mut().unregister(target);
        if removed {
            self.stalled = None;
        }
        removed
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.runner.cancel_token()
    }

    /// Arbitrates goals and advances the current episode.
    pub fn tick(&mut self, live: &WorldState, executor: &mut E) -> RunnerState {
        let skip = self
            .stalled
            .as_ref()
            .filter(|(_, world)| world == live)
            .map(|(name, _)| name.as_str());
        match self.goals.select_except(live, skip).cloned() {
            Some(goal) if self.pursued.as_deref() != Some(goal.name()) => {
                if self.runner.can_interrupt() {
                    self.switch_to(goal, live, executor);
                } else {
                    tracing::debug!(
                        "deferring switch to {}: in-flight action cannot be cancelled",
                        goal.name()
                    );
                }
            }
            Some(_) => {}
            None => {
                if self.pursued.is_some() && self.runner.can_interrupt() {
                    tracing::debug!("no goal worth pursuing; going idle");
                    self.runner.reset(executor);
                    self.pursued = None;
                }
            }
        }

        let state = self.runner.tick(live, executor);
        if state.is_terminal()
            && let Some(name) = self.pursued.take()
        {
            tracing::debug!("episode ended: {}", state);
            if matches!(&state, RunnerState::Failed(reason) if *reason != FailureReason::Cancelled) {
                self.stall(name, live);
            }
        }
        state
    }

    fn stall(&mut self, name: String, live: &WorldState) {
        tracing::debug!("holding off on {} until the world changes", name);
        self.stalled = Some((name, live.clone()));
    }

    fn switch_to(&mut self, goal: Goal, live: &WorldState, executor: &mut E) {
        tracing::info!(
            "goal switch: {} -> {} (priority {})",
            self.pursued.as_deref().unwrap_or("<none>"),
            goal.name(),
            goal.priority()
        );
        let name = goal.name().to_owned();
        match self.runner.pursue(goal, live, executor) {
            Ok(()) => self.pursued = Some(name),
            Err(failure) => {
                tracing::warn!("goal {} has no plan this tick: {}", name, failure);
                self.pursued = None;
                self.stall(name, live);
            }
        }
    }
}

impl<E: ActionExecutor, H: std::fmt::Debug> std::fmt::Debug for GoapAgent<E, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoapAgent")
            .field("goals", &self.goals)
            .field("pursued", &self.pursued)
            .field("stalled", &self.stalled.as_ref().map(|(name, _)| name))
            .field("runner", &self.runner)
            .finish()
    }
}
