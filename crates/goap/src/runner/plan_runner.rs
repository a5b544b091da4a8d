//! Tick-driven plan execution with re-planning.

use std::sync::Arc;

use super::cancel::CancelToken;
use super::executor::{ActionExecutor, ExecutionStatus};
use super::state::{DivergenceReason, FailureReason, RunnerState};
use crate::action::SharedAction;
use crate::config::RunnerConfig;
use crate::goal::Goal;
use crate::library::ActionLibrary;
use crate::memory::Memory;
use crate::planner::{FactDeficit, Heuristic, Plan, PlanFailure, Planner};
use crate::state::WorldState;

/// Executes a plan one tick at a time.
///
/// Every tick re-checks the current action's precondition against the live
/// world. Divergence (a violated precondition or a failed execution) moves
/// the runner to [`RunnerState::Replanning`]; the next tick plans again from
/// the live world toward the same goal.
///
/// Plans bind targeted actions to the runner's [`Memory`].
pub struct PlanRunner<E: ActionExecutor, H = FactDeficit> {
    library: Arc<ActionLibrary>,
    planner: Planner<H>,
    config: RunnerConfig,
    memory: Memory,
    state: RunnerState,
    goal: Option<Goal>,
    plan: Option<Plan>,
    cursor: usize,
    tracked: WorldState,
    in_flight: Option<E::Handle>,
    replans: u32,
    last_divergence: Option<DivergenceReason>,
    cancel_token: CancelToken,
}

impl<E: ActionExecutor, H: Heuristic> PlanRunner<E, H> {
    pub fn new(library: Arc<ActionLibrary>, planner: Planner<H>, config: RunnerConfig) -> Self {
        Self {
            library,
            planner,
            config,
            memory: Memory::new(),
            state: RunnerState::Idle,
            goal: None,
            plan: None,
            cursor: 0,
            tracked: WorldState::new(),
            in_flight: None,
            replans: 0,
            last_divergence: None,
            cancel_token: CancelToken::new(),
        }
    }

    pub fn state(&self) -> &RunnerState {
        &self.state
    }

    pub fn goal(&self) -> Option<&Goal> {
        self.goal.as_ref()
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    /// Index of the step being executed.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Plan start with the effects of every completed step applied.
    pub fn tracked_state(&self) -> &WorldState {
        &self.tracked
    }

    /// Re-plans performed in the current episode.
    pub fn replans(&self) -> u32 {
        self.replans
    }

    pub fn last_divergence(&self) -> Option<&DivergenceReason> {
        self.last_divergence.as_ref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn library(&self) -> &Arc<ActionLibrary> {
        &self.library
    }

    pub fn planner(&self) -> &Planner<H> {
        &self.planner
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Targets used by the next planning call; the current plan is kept.
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Token observed at the start of every tick.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel_token.clone()
    }

    /// Action at the cursor, bound to its target, if the plan has one.
    pub fn current_action(&self) -> Option<SharedAction> {
        let step = self.plan.as_ref()?.step(self.cursor)?;
        self.library
            .resolve(step.action.as_str(), step.target.as_ref())
    }

    /// Whether the episode may be interrupted right now.
    ///
    /// False only while an action that cannot be cancelled is in flight.
    pub fn can_interrupt(&self) -> bool {
        if self.in_flight.is_none() {
            return true;
        }
        self.current_action()
            .is_none_or(|action| action.can_be_cancelled())
    }

    /// Starts a new episode with `plan`.
    ///
    /// Any in-flight action of the previous episode is cancelled first.
    pub fn start(&mut self, plan: Plan, goal: Goal, executor: &mut E) {
        self.release(executor);
        self.cancel_token.clear();
        self.replans = 0;
        self.last_divergence = None;
        tracing::info!("starting plan for {}: {}", goal.name(), plan);
        self.goal = Some(goal);
        self.adopt(plan);
    }

    /// Plans from `live` toward `goal` and starts the result.
    ///
    /// On failure the runner ends in [`FailureReason::PlanningFailed`].
    pub fn pursue(
        &mut self,
        goal: Goal,
        live: &WorldState,
        executor: &mut E,
    ) -> Result<(), PlanFailure> {
        match self.plan_for(live, &goal) {
            Ok(plan) => {
                self.start(plan, goal, executor);
                Ok(())
            }
            Err(failure) => {
                tracing::warn!("no plan for {}: {}", goal.name(), failure);
                self.release(executor);
                self.goal = Some(goal);
                self.plan = None;
                self.fail(FailureReason::PlanningFailed(failure.kind()));
                Err(failure)
            }
        }
    }

    /// Advances the episode by one step of game time.
    pub fn tick(&mut self, live: &WorldState, executor: &mut E) -> RunnerState {
        if self.cancel_token.is_cancelled() && !self.state.is_terminal() {
            self.cancel(executor);
            return self.state.clone();
        }

        match self.state {
            RunnerState::Executing => self.tick_executing(live, executor),
            RunnerState::Replanning => self.tick_replanning(live, executor),
            RunnerState::Idle | RunnerState::Completed | RunnerState::Failed(_) => {}
        }
        self.state.clone()
    }

    /// Stops the episode immediately with [`FailureReason::Cancelled`].
    ///
    /// Terminal episodes are left untouched. Unlike goal switching this
    /// also interrupts actions that cannot be cancelled.
    pub fn cancel(&mut self, executor: &mut E) {
        if self.state.is_terminal() {
            return;
        }
        self.release(executor);
        tracing::info!("episode cancelled");
        self.fail(FailureReason::Cancelled);
    }

    /// Drops the episode and returns to [`RunnerState::Idle`].
    pub fn reset(&mut self, executor: &mut E) {
        self.release(executor);
        self.cancel_token.clear();
        self.goal = None;
        self.plan = None;
        self.cursor = 0;
        self.tracked = WorldState::new();
        self.replans = 0;
        self.last_divergence = None;
        self.transition(RunnerState::Idle);
    }

    fn tick_executing(&mut self, live: &WorldState, executor: &mut E) {
        let Some(step) = self.plan.as_ref().and_then(|plan| plan.step(self.cursor)) else {
            self.transition(RunnerState::Completed);
            return;
        };
        let id = step.action.clone();
        let Some(action) = self.library.resolve(id.as_str(), step.target.as_ref()) else {
            self.release(executor);
            self.fail(FailureReason::UnknownAction { id });
            return;
        };

        if !action.is_applicable(live) {
            self.release(executor);
            self.diverge(DivergenceReason::PreconditionViolated { action: id });
            return;
        }

        if self.in_flight.is_none() {
            tracing::debug!("step {}: begin {}", self.cursor, id);
            self.in_flight = Some(executor.begin_execute(action.as_ref(), live));
        }

        let status = match &self.in_flight {
            Some(handle) => executor.poll_status(handle),
            None => return,
        };

        match status {
            ExecutionStatus::Running => {}
            ExecutionStatus::Succeeded => {
                self.in_flight = None;
                self.tracked = action.apply(&self.tracked);
                self.cursor += 1;
                tracing::debug!("step {}: {} succeeded", self.cursor - 1, id);

                let finished = self
                    .plan
                    .as_ref()
                    .is_none_or(|plan| self.cursor >= plan.len());
                if finished {
                    tracing::info!("plan completed");
                    self.transition(RunnerState::Completed);
                }
            }
            ExecutionStatus::Failed => {
                self.in_flight = None;
                self.diverge(DivergenceReason::ExecutionFailed { action: id });
            }
        }
    }

    fn tick_replanning(&mut self, live: &WorldState, executor: &mut E) {
        if self.replans >= self.config.max_replans {
            self.fail(FailureReason::ReplanLimitReached {
                limit: self.config.max_replans,
            });
            return;
        }
        let Some(goal) = self.goal.clone() else {
            self.transition(RunnerState::Idle);
            return;
        };
        self.replans += 1;

        match self.plan_for(live, &goal) {
            Ok(plan) => {
                tracing::info!(
                    "re-plan {}/{} for {}: {}",
                    self.replans,
                    self.config.max_replans,
                    goal.name(),
                    plan
                );
                self.adopt(plan);
            }
            Err(failure) => {
                tracing::warn!("re-planning for {} failed: {}", goal.name(), failure);
                self.release(executor);
                self.fail(FailureReason::PlanningFailed(failure.kind()));
            }
        }
    }

    fn plan_for(&self, live: &WorldState, goal: &Goal) -> Result<Plan, PlanFailure> {
        self.planner.plan_with_memory(
            live,
            goal,
            &self.library,
            &self.memory,
            &self.planner.config().budget,
        )
    }

    fn adopt(&mut self, plan: Plan) {
        self.tracked = plan.start().clone();
        self.cursor = 0;
        let next = if plan.is_empty() {
            RunnerState::Completed
        } else {
            RunnerState::Executing
        };
        self.plan = Some(plan);
        self.transition(next);
    }

    fn diverge(&mut self, reason: DivergenceReason) {
        tracing::warn!("diverged at step {}: {}", self.cursor, reason);
        self.last_divergence = Some(reason);
        self.transition(RunnerState::Replanning);
    }

    fn fail(&mut self, reason: FailureReason) {
        self.transition(RunnerState::Failed(reason));
    }

    fn release(&mut self, executor: &mut E) {
        if let Some(handle) = self.in_flight.take() {
            tracing::debug!("cancelling in-flight step {}", self.cursor);
            executor.cancel(handle);
        }
    }

    fn transition(&mut self, next: RunnerState) {
        if self.state != next {
            tracing::debug!("runner: {} -> {}", self.state, next);
        }
        self.state = next;
    }
}

impl<E: ActionExecutor, H: std::fmt::Debug> std::fmt::Debug for PlanRunner<E, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanRunner")
            .field("state", &self.state)
            .field("cursor", &self.cursor)
            .field("replans", &self.replans)
            .field("in_flight", &self.in_flight.is_some())
            .field("planner", &self.planner)
            .finish_non_exhaustive()
    }
}
