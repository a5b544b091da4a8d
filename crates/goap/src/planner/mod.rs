//! Goal-directed search.
//!
//! [`Planner::plan`] turns a start state, a goal and an action library into
//! a [`Plan`] or a [`PlanFailure`]. The search runs forward from the start
//! state or, with [`Solver::Backward`](crate::config::Solver), regresses
//! the goal toward it. All search scratch data lives in crate-private
//! modules and is dropped when the call returns.
pub mod budget;
mod candidates;
pub mod error;
mod frontier;
pub mod heuristic;
mod node;
pub mod plan;
mod regressive;
pub mod search;

pub use budget::{BudgetLimit, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, SearchBudget};
pub use error::{PlanFailure, PlanFailureKind};
pub use heuristic::{ActionBounds, FactDeficit, Heuristic, ZeroHeuristic};
pub use plan::{Plan, PlanReplayError, PlanStep, SearchStats};
pub use search::Planner;
