//! Goal-oriented action planning.
//!
//! An agent describes the world as a set of symbolic facts ([`WorldState`]),
//! declares the actions it can take ([`ActionDef`] or any [`Action`]) and the
//! goals it wants to reach ([`Goal`]). The [`Planner`] finds a minimum-cost
//! sequence of actions with A* search, forward from the current state or
//! backward from the goal; the [`PlanRunner`] executes it tick by
//! tick through a host [`ActionExecutor`] and re-plans when the world
//! diverges. [`GoapAgent`] adds goal arbitration on top.
//!
//! # Architecture
//!
//! - [`state`]: facts, world states and conditions
//! - [`action`]: the action capability trait, declarative actions and costs
//! - [`library`]: the shared, read-only action registry
//! - [`memory`]: the targets an agent knows, which targeted actions bind to
//! - [`planner`]: search budgets, heuristics and the A* planner
//! - [`runner`]: the tick-driven execution state machine
//! - [`agent`]: goal selection and episode switching
//!
//! # Example
//!
//! ```
//! use goap::{ActionDef, ActionLibrary, Conditions, Cost, Goal, Planner, PlannerConfig,
//!     SearchBudget, WorldState};
//!
//! let library = ActionLibrary::from_actions([
//!     ActionDef::new("get_axe").requires_eq("has_axe", false).sets("has_axe", true),
//!     ActionDef::new("go_to_tree").sets("near_tree", true),
//!     ActionDef::new("chop_tree")
//!         .requires_eq("near_tree", true)
//!         .requires_eq("has_axe", true)
//!         .sets("has_wood", true)
//!         .cost(Cost::new(2)),
//! ])?;
//!
//! let start = WorldState::from_facts([("has_axe", false), ("near_tree", false)]);
//! let goal = Goal::new("wood", Conditions::new().and_eq("has_wood", true));
//!
//! let plan = Planner::new(PlannerConfig::default())
//!     .plan(&start, &goal, &library, &SearchBudget::default())?;
//! assert_eq!(plan.total_cost(), Cost::new(4));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod action;
pub mod agent;
pub mod config;
pub mod error;
pub mod goal;
pub mod library;
pub mod memory;
pub mod planner;
pub mod runner;
pub mod state;

pub use action::{
    Action, ActionCost, ActionDef, ActionError, ActionId, ActionSchema, Cost, Effect, NetWrite,
    SharedAction, TargetedDef,
};
pub use agent::GoapAgent;
pub use config::{GoapConfig, PlannerConfig, RunnerConfig, Solver};
pub use error::{ErrorSeverity, GoapError};
pub use goal::{Goal, GoalSet};
pub use library::{ActionLibrary, LibraryError};
pub use memory::Memory;
pub use planner::{
    ActionBounds, BudgetLimit, FactDeficit, Heuristic, Plan, PlanFailure, PlanFailureKind,
    PlanStep, Planner, SearchBudget, SearchStats, ZeroHeuristic,
};
pub use runner::{
    ActionExecutor, CancelToken, DivergenceReason, ExecutionStatus, FailureReason, PlanRunner,
    RunnerState,
};
pub use state::{Comparison, Condition, Conditions, FactKey, FactValue, WorldState};
