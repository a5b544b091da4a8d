//! Planner and runner configuration structures and loaders.
use std::env;
use std::time::Duration;

use crate::planner::SearchBudget;

/// Default number of re-plans allowed per episode.
pub const DEFAULT_MAX_REPLANS: u32 = 8;

/// Configuration shared by an agent's planner and runner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GoapConfig {
    pub planner: PlannerConfig,
    pub runner: RunnerConfig,
}

impl GoapConfig {
    pub const fn new(planner: PlannerConfig, runner: RunnerConfig) -> Self {
        Self { planner, runner }
    }

    /// Construct configuration from process environment variables.
    ///
    /// - `GOAP_MAX_NODES` / `GOAP_MAX_DEPTH`
    /// - `GOAP_TIME_LIMIT_MS`
    /// - `GOAP_UNIT_COSTS` (`true`/`false`/`1`/`0`)
    /// - `GOAP_SOLVER` (`forward`/`backward`)
    /// - `GOAP_MAX_REPLANS`
    ///
    /// Missing or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(max_nodes) = parse::<usize>(&lookup, "GOAP_MAX_NODES") {
            config.planner.budget.max_nodes = Some(max_nodes);
        }

        if let Some(max_depth) = parse::<u32>(&lookup, "GOAP_MAX_DEPTH") {
            config.planner.budget.max_depth = Some(max_depth);
        }

        if let Some(millis) = parse::<u64>(&lookup, "GOAP_TIME_LIMIT_MS") {
            config.planner.budget.time_limit = Some(Duration::from_millis(millis));
        }

        if let Some(flag) = lookup("GOAP_UNIT_COSTS").and_then(|raw| parse_flag(&raw)) {
            config.planner.unit_action_costs = flag;
        }

        if let Some(solver) = parse::<Solver>(&lookup, "GOAP_SOLVER") {
            config.planner.solver = solver;
        }

        if let Some(max_replans) = parse::<u32>(&lookup, "GOAP_MAX_REPLANS") {
            config.runner.max_replans = max_replans;
        }

        config
    }
}

/// Search direction used by the planner.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Solver {
    /// A* from the start state toward the goal.
    #[default]
    Forward,
    /// A* from the goal back toward the start state, over the conditions
    /// still to be met. Only actions with a declarative schema take part.
    Backward,
}

/// Search settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerConfig {
    /// Budget used when the caller does not pass one.
    pub budget: SearchBudget,
    /// Price every action at 1 during search, ignoring declared costs.
    pub unit_action_costs: bool,
    pub solver: Solver,
}

/// Plan execution settings.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunnerConfig {
    /// Re-plans allowed before an episode fails.
    pub max_replans: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_replans: DEFAULT_MAX_REPLANS,
        }
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
