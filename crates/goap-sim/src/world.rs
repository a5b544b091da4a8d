//! Simulated world that executes actions over several ticks.

use std::sync::Arc;

use goap::{Action, ActionExecutor, ActionId, ActionLibrary, ExecutionStatus, FactKey, WorldState};

use crate::domain;

/// Scripted disturbance applied at a fixed tick.
pub struct Event {
    pub at: u64,
    pub label: &'static str,
    pub apply: fn(&WorldState) -> WorldState,
}

struct Job {
    action: ActionId,
    target: Option<FactKey>,
    remaining: u32,
    cancelled: bool,
}

/// Host world acting as the agent's executor.
pub struct SimWorld {
    library: Arc<ActionLibrary>,
    state: WorldState,
    tick: u64,
    jobs: Vec<Job>,
    events: Vec<Event>,
}

impl SimWorld {
    pub fn new(library: Arc<ActionLibrary>, state: WorldState, events: Vec<Event>) -> Self {
        Self {
            library,
            state,
            tick: 0,
            jobs: Vec::new(),
            events,
        }
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Moves time forward and fires due events.
    pub fn advance(&mut self) {
        self.tick += 1;
        for event in self.events.iter().filter(|event| event.at == self.tick) {
            tracing::info!("[t={}] event: {}", self.tick, event.label);
            self.state = (event.apply)(&self.state);
        }
    }

    pub fn completed_jobs(&self) -> usize {
        self.jobs
            .iter()
            .filter(|job| job.remaining == 0 && !job.cancelled)
            .count()
    }
}

impl ActionExecutor for SimWorld {
    type Handle = usize;

    fn begin_execute(&mut self, action: &dyn Action, _world: &WorldState) -> usize {
        let id = action.id().clone();
        let remaining = domain::duration(id.as_str());
        tracing::info!("[t={}] start {} ({} ticks)", self.tick, id, remaining);
        self.jobs.push(Job {
            action: id,
            target: action.target().cloned(),
            remaining,
            cancelled: false,
        });
        self.jobs.len() - 1
    }

    fn poll_status(&mut self, handle: &usize) -> ExecutionStatus {
        let Some(job) = self.jobs.get_mut(*handle) else {
            return ExecutionStatus::Failed;
        };
        if job.cancelled {
            return ExecutionStatus::Failed;
        }
        job.remaining = job.remaining.saturating_sub(1);
        if job.remaining > 0 {
            return ExecutionStatus::Running;
        }

        let Some(action) = self
            .library
            .resolve(job.action.as_str(), job.target.as_ref())
        else {
            tracing::warn!("[t={}] unknown action {}", self.tick, job.action);
            return ExecutionStatus::Failed;
        };
        self.state = action.apply(&self.state);
        tracing::info!("[t={}] done {} -> {}", self.tick, job.action, self.state);
        ExecutionStatus::Succeeded
    }

    fn cancel(&mut self, handle: usize) {
        if let Some(job) = self.jobs.get_mut(handle) {
            tracing::info!("[t={}] interrupted {}", self.tick, job.action);
            job.cancelled = true;
        }
    }
}
