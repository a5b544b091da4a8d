//! Declarative action definitions.

use std::fmt;
use std::sync::Arc;

use super::{Action, ActionError, ActionId, ActionSchema, Cost, Effect};
use crate::state::{Comparison, Condition, Conditions, FactKey, FactValue, WorldState};

/// State-dependent cost function.
pub type CostFn = dyn Fn(&WorldState) -> Cost + Send + Sync;

/// How an [`ActionDef`] prices itself.
#[derive(Clone)]
pub enum ActionCost {
    /// Fixed cost regardless of state.
    Static(Cost),
    /// Cost computed from the state the action is applied to.
    ///
    /// `floor` is a declared lower bound; evaluated costs are clamped to it
    /// so the planner's heuristic can rely on it.
    Dynamic { floor: Cost, eval: Arc<CostFn> },
}

impl ActionCost {
    pub fn evaluate(&self, state: &WorldState) -> Cost {
        match self {
            Self::Static(cost) => *cost,
            Self::Dynamic { floor, eval } => eval(state).max(*floor),
        }
    }

    pub fn floor(&self) -> Cost {
        match self {
            Self::Static(cost) => *cost,
            Self::Dynamic { floor, .. } => *floor,
        }
    }
}

impl fmt::Debug for ActionCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(cost) => f.debug_tuple("Static").field(cost).finish(),
            Self::Dynamic { floor, .. } => f
                .debug_struct("Dynamic")
                .field("floor", floor)
                .finish_non_exhaustive(),
        }
    }
}

/// Action described by preconditions, effects and a cost.
///
/// This is the form authored domains register; custom behaviour can
/// implement [`Action`] directly instead.
///
/// ```
/// use goap::action::{ActionDef, Cost};
///
/// let chop = ActionDef::new("chop_tree")
///     .requires_eq("near_tree", true)
///     .requires_eq("has_axe", true)
///     .sets("has_wood", true)
///     .cost(Cost::new(2));
/// ```
#[derive(Clone, Debug)]
pub struct ActionDef {
    id: ActionId,
    preconditions: Conditions,
    effects: Vec<Effect>,
    cost: ActionCost,
    cancellable: bool,
    target: Option<FactKey>,
}

impl ActionDef {
    /// Creates an action with no preconditions, no effects and unit cost.
    pub fn new(id: impl Into<ActionId>) -> Self {
        Self {
            id: id.into(),
            preconditions: Conditions::new(),
            effects: Vec::new(),
            cost: ActionCost::Static(Cost::ONE),
            cancellable: true,
            target: None,
        }
    }

    #[must_use]
    pub fn requires(mut self, condition: Condition) -> Self {
        self.preconditions.push(condition);
        self
    }

    #[must_use]
    pub fn requires_eq(self, key: impl Into<FactKey>, value: impl Into<FactValue>) -> Self {
        self.requires(Condition::equals(key, value))
    }

    #[must_use]
    pub fn requires_all(mut self, conditions: Conditions) -> Self {
        for condition in conditions.iter() {
            self.preconditions.push(condition.clone());
        }
        self
    }

    #[must_use]
    pub fn effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn sets(self, key: impl Into<FactKey>, value: impl Into<FactValue>) -> Self {
        self.effect(Effect::set(key, value))
    }

    #[must_use]
    pub fn cost(mut self, cost: Cost) -> Self {
        self.cost = ActionCost::Static(cost);
        self
    }

    /// State-dependent cost with a declared lower bound.
    #[must_use]
    pub fn cost_fn<F>(mut self, floor: Cost, eval: F) -> Self
    where
        F: Fn(&WorldState) -> Cost + Send + Sync + 'static,
    {
        self.cost = ActionCost::Dynamic {
            floor,
            eval: Arc::new(eval),
        };
        self
    }

    /// Marks the action as not interruptible once started.
    #[must_use]
    pub fn uncancellable(mut self) -> Self {
        self.cancellable = false;
        self
    }

    /// Instance of the template `id` bound to `target`.
    pub(crate) fn instance_of(mut self, id: &ActionId, target: &FactKey) -> Self {
        self.id = id.clone();
        self.target = Some(target.clone());
        self
    }

    pub fn preconditions(&self) -> &Conditions {
        &self.preconditions
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn action_cost(&self) -> &ActionCost {
        &self.cost
    }
}

impl Action for ActionDef {
    fn id(&self) -> &ActionId {
        &self.id
    }

    fn is_applicable(&self, state: &WorldState) -> bool {
        self.preconditions.is_satisfied_by(state)
    }

    fn apply(&self, state: &WorldState) -> WorldState {
        Effect::apply_all(&self.effects, state)
    }

    fn cost(&self, state: &WorldState) -> Cost {
        self.cost.evaluate(state)
    }

    fn cost_floor(&self) -> Cost {
        self.cost.floor()
    }

    fn effect_width(&self) -> usize {
        Effect::width(&self.effects)
    }

    fn can_be_cancelled(&self) -> bool {
        self.cancellable
    }

    fn target(&self) -> Option<&FactKey> {
        self.target.as_ref()
    }

    fn schema(&self) -> Option<ActionSchema<'_>> {
        Some(ActionSchema {
            preconditions: &self.preconditions,
            effects: &self.effects,
        })
    }

    fn validate(&self) -> Result<(), ActionError> {
        if self.id.as_str().is_empty() {
            return Err(ActionError::EmptyId);
        }
        self.preconditions.validate()?;

        for effect in &self.effects {
            if let Effect::Add { key, .. } = effect {
                let pinned_non_int = self
                    .preconditions
                    .iter()
                    .any(|c| {
                        &c.key == key
                            && c.comparison == Comparison::Eq
                            && c.value.as_int().is_none()
                    });
                if pinned_non_int {
                    return Err(ActionError::AddOnNonInteger { key: key.clone() });
                }
            }
        }
        Ok(())
    }
}
