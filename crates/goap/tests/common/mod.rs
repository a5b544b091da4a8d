//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use goap::{
    Action, ActionDef, ActionExecutor, ActionId, ActionLibrary, Conditions, Cost, ExecutionStatus,
    FactKey, Goal, WorldState,
};

pub fn woodcutter_actions() -> Vec<ActionDef> {
    vec![
        ActionDef::new("get_axe")
            .requires_eq("has_axe", false)
            .sets("has_axe", true),
        ActionDef::new("go_to_tree").sets("near_tree", true),
        ActionDef::new("chop_tree")
            .requires_eq("near_tree", true)
            .requires_eq("has_axe", true)
            .sets("has_wood", true)
            .cost(Cost::new(2)),
    ]
}

pub fn woodcutter_library() -> ActionLibrary {
    ActionLibrary::from_actions(woodcutter_actions()).expect("woodcutter library is valid")
}

pub fn woodcutter_start() -> WorldState {
    WorldState::from_facts([("has_axe", false), ("near_tree", false), ("has_wood", false)])
}

pub fn wood_goal() -> Goal {
    Goal::new("gather_wood", Conditions::new().and_eq("has_wood", true))
}

struct Job {
    action: ActionId,
    target: Option<FactKey>,
    remaining: u32,
}

/// Executor that owns a world and applies action effects on completion.
///
/// Hosts tick with a snapshot: `let live = exec.world.clone();`.
pub struct WorldExecutor {
    library: Arc<ActionLibrary>,
    pub world: WorldState,
    /// Extra `Running` polls before each action completes.
    pub ticks_per_action: u32,
    /// Actions whose next execution fails.
    pub fail_once: HashSet<String>,
    pub started: Vec<String>,
    pub completed: Vec<String>,
    pub cancelled: Vec<String>,
    jobs: Vec<Job>,
}

impl WorldExecutor {
    pub fn new(library: Arc<ActionLibrary>, world: WorldState) -> Self {
        Self {
            library,
            world,
            ticks_per_action: 0,
            fail_once: HashSet::new(),
            started: Vec::new(),
            completed: Vec::new(),
            cancelled: Vec::new(),
            jobs: Vec::new(),
        }
    }

    pub fn slow(mut self, ticks: u32) -> Self {
        self.ticks_per_action = ticks;
        self
    }
}

impl ActionExecutor for WorldExecutor {
    type Handle = usize;

    fn begin_execute(&mut self, action: &dyn Action, _world: &WorldState) -> usize {
        self.started.push(action.id().to_string());
        self.jobs.push(Job {
            action: action.id().clone(),
            target: action.target().cloned(),
            remaining: self.ticks_per_action,
        });
        self.jobs.len() - 1
    }

    fn poll_status(&mut self, handle: &usize) -> ExecutionStatus {
        let job = &mut self.jobs[*handle];
        if self.fail_once.remove(job.action.as_str()) {
            return ExecutionStatus::Failed;
        }
        if job.remaining > 0 {
            job.remaining -= 1;
            return ExecutionStatus::Running;
        }
        let action = self
            .library
            .resolve(job.action.as_str(), job.target.as_ref())
            .expect("executor only runs library actions");
        self.world = action.apply(&self.world);
        self.completed.push(job.action.to_string());
        ExecutionStatus::Succeeded
    }

    fn cancel(&mut self, handle: usize) {
        self.cancelled.push(self.jobs[handle].action.to_string());
    }
}
