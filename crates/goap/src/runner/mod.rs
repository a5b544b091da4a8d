//! Plan execution.
//!
//! A [`PlanRunner`] walks a [`Plan`](crate::planner::Plan) through a host
//! supplied [`ActionExecutor`], re-validating every step against the live
//! world and re-planning on divergence.
pub mod cancel;
pub mod executor;
pub mod plan_runner;
pub mod state;

pub use cancel::CancelToken;
pub use executor::{ActionExecutor, ExecutionStatus};
pub use plan_runner::PlanRunner;
pub use state::{DivergenceReason, FailureReason, RunnerState};
