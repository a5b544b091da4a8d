//! Runner lifecycle states.

use std::fmt;

use crate::action::ActionId;
use crate::error::{ErrorSeverity, GoapError};
use crate::planner::PlanFailureKind;

/// Lifecycle of a [`PlanRunner`](super::PlanRunner) episode.
///
/// ```text
/// Idle -> Executing -> Completed
///             |  ^
///             v  |
///          Replanning -> Failed(reason)
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RunnerState {
    /// No plan has been started.
    #[default]
    Idle,
    /// Working through the current plan.
    Executing,
    /// The world diverged; a new plan is computed on the next tick.
    Replanning,
    /// Every step succeeded.
    Completed,
    /// The episode ended without reaching the goal.
    Failed(FailureReason),
}

impl RunnerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed(_))
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Executing | Self::Replanning)
    }
}

impl fmt::Display for RunnerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Executing => f.write_str("executing"),
            Self::Replanning => f.write_str("replanning"),
            Self::Completed => f.write_str("completed"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Why an episode failed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FailureReason {
    #[error("cancelled")]
    Cancelled,

    #[error("planning failed: {0}")]
    PlanningFailed(PlanFailureKind),

    #[error("re-plan limit of {limit} reached")]
    ReplanLimitReached { limit: u32 },

    /// The plan names an action the runner's library does not have.
    #[error("plan references unknown action `{id}`")]
    UnknownAction { id: ActionId },
}

impl GoapError for FailureReason {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Cancelled => ErrorSeverity::Fatal,
            Self::PlanningFailed(_) | Self::ReplanLimitReached { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::UnknownAction { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Cancelled => "RUNNER_CANCELLED",
            Self::PlanningFailed(_) => "RUNNER_PLANNING_FAILED",
            Self::ReplanLimitReached { .. } => "RUNNER_REPLAN_LIMIT",
            Self::UnknownAction { .. } => "RUNNER_UNKNOWN_ACTION",
        }
    }
}

/// Why the runner left [`RunnerState::Executing`] for re-planning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DivergenceReason {
    /// The live world no longer satisfies the current action's precondition.
    PreconditionViolated { action: ActionId },
    /// The executor reported failure.
    ExecutionFailed { action: ActionId },
}

impl DivergenceReason {
    pub fn action(&self) -> &ActionId {
        match self {
            Self::PreconditionViolated { action } | Self::ExecutionFailed { action } => action,
        }
    }
}

impl fmt::Display for DivergenceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreconditionViolated { action } => {
                write!(f, "precondition of `{action}` violated")
            }
            Self::ExecutionFailed { action } => write!(f, "execution of `{action}` failed"),
        }
    }
}
