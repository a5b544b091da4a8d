//! Planning failures.

use std::fmt;

use super::budget::BudgetLimit;
use super::plan::SearchStats;
use crate::error::{ErrorSeverity, GoapError};

/// Why a planning call produced no plan.
///
/// These are expected outcomes, not bugs: callers usually idle or pick
/// another goal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlanFailure {
    /// The reachable state space was exhausted without meeting the goal.
    #[error("goal is unreachable ({stats})")]
    Unreachable { stats: SearchStats },

    /// A budget limit stopped the search first.
    #[error("search budget exceeded: {limit} ({stats})")]
    BudgetExceeded {
        limit: BudgetLimit,
        stats: SearchStats,
    },
}

impl PlanFailure {
    pub fn kind(&self) -> PlanFailureKind {
        match self {
            Self::Unreachable { .. } => PlanFailureKind::Unreachable,
            Self::BudgetExceeded { limit, .. } => PlanFailureKind::BudgetExceeded(*limit),
        }
    }

    pub fn stats(&self) -> &SearchStats {
        match self {
            Self::Unreachable { stats } | Self::BudgetExceeded { stats, .. } => stats,
        }
    }
}

impl GoapError for PlanFailure {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self.kind() {
            PlanFailureKind::Unreachable => "PLAN_UNREACHABLE",
            PlanFailureKind::BudgetExceeded(BudgetLimit::Nodes) => "PLAN_BUDGET_NODES",
            PlanFailureKind::BudgetExceeded(BudgetLimit::Depth) => "PLAN_BUDGET_DEPTH",
            PlanFailureKind::BudgetExceeded(BudgetLimit::Time) => "PLAN_BUDGET_TIME",
        }
    }
}

/// [`PlanFailure`] without its statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlanFailureKind {
    Unreachable,
    BudgetExceeded(BudgetLimit),
}

impl fmt::Display for PlanFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable => f.write_str("unreachable"),
            Self::BudgetExceeded(limit) => write!(f, "budget_exceeded({limit})"),
        }
    }
}
