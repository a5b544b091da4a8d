//! Search budgets.

use std::time::Duration;

/// Default cap on expanded nodes.
pub const DEFAULT_MAX_NODES: usize = 10_000;
/// Default cap on plan length.
pub const DEFAULT_MAX_DEPTH: u32 = 32;

/// Limits a single planning call may consume.
///
/// Each limit is optional; `None` means unbounded. The time limit is the
/// only non-deterministic limit: two identical calls may stop at different
/// points when it is hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchBudget {
    /// Maximum number of node expansions.
    pub max_nodes: Option<usize>,
    /// Maximum plan length; nodes at this depth are not expanded.
    pub max_depth: Option<u32>,
    /// Wall-clock limit checked once per expansion.
    pub time_limit: Option<Duration>,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_nodes: Some(DEFAULT_MAX_NODES),
            max_depth: Some(DEFAULT_MAX_DEPTH),
            time_limit: None,
        }
    }
}

impl SearchBudget {
    /// Budget without any limit.
    pub const fn unbounded() -> Self {
        Self {
            max_nodes: None,
            max_depth: None,
            time_limit: None,
        }
    }

    #[must_use]
    pub const fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    #[must_use]
    pub const fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }
}

/// The budget dimension that stopped a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BudgetLimit {
    Nodes,
    Depth,
    Time,
}
