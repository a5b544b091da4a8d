//! Cost-to-go estimates.

use crate::action::{Cost, SharedAction};
use crate::goal::Goal;
use crate::state::WorldState;

/// Library-wide bounds the heuristic may rely on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionBounds {
    floor: Cost,
    width: usize,
}

impl ActionBounds {
    /// `width` is clamped to at least 1.
    pub fn new(floor: Cost, width: usize) -> Self {
        Self {
            floor,
            width: width.max(1),
        }
    }

    /// Bounds over `actions`, skipping unbound targeted templates.
    ///
    /// No actions yield a zero floor, which makes every estimate zero.
    pub fn of<'a>(actions: impl Iterator<Item = &'a SharedAction> + Clone) -> Self {
        let concrete = actions.filter(|action| !action.is_targeted());
        let floor = concrete
            .clone()
            .map(|action| action.cost_floor())
            .min()
            .unwrap_or(Cost::ZERO);
        let width = concrete
            .map(|action| action.effect_width())
            .max()
            .unwrap_or(1);
        Self::new(floor, width)
    }

    /// Lower bound on the cost of any single action.
    pub fn floor(&self) -> Cost {
        self.floor
    }

    /// Upper bound on the number of facts any single action changes.
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn with_floor(mut self, floor: Cost) -> Self {
        self.floor = floor;
        self
    }
}

/// Estimates the remaining cost from a state to a goal.
///
/// The planner only guarantees optimal plans when the estimate is
/// admissible (never above the true remaining cost).
pub trait Heuristic {
    fn estimate(&self, state: &WorldState, goal: &Goal, bounds: &ActionBounds) -> Cost;
}

/// Counts unsatisfied goal facts.
///
/// With `k` distinct unsatisfied goal keys, at least `ceil(k / width)`
/// actions are still needed, each costing at least `floor`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FactDeficit;

impl Heuristic for FactDeficit {
    fn estimate(&self, state: &WorldState, goal: &Goal, bounds: &ActionBounds) -> Cost {
        let missing = goal.conditions().unsatisfied_keys(state);
        if missing == 0 {
            return Cost::ZERO;
        }
        let steps = missing.div_ceil(bounds.width());
        bounds.floor().saturating_mul(steps as u64)
    }
}

/// Always zero; turns the search into uniform-cost search.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn estimate(&self, _state: &WorldState, _goal: &Goal, _bounds: &ActionBounds) -> Cost {
        Cost::ZERO
    }
}
