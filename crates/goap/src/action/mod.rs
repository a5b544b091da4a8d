//! Actions: the edges of the planning graph.
//!
//! Every action exposes the same capability interface ([`Action`]):
//! applicability test, effect, cost. Domains usually register declarative
//! [`ActionDef`]s; hosts with bespoke logic implement the trait directly.
//!
//! All three capabilities must be side-effect free and deterministic: the
//! planner calls them many times per search, on states that are never
//! executed.
//!
//! Targeted actions ([`TargetedDef`]) are templates instantiated once per
//! target the agent remembers; the planner binds them before searching.
pub mod cost;
pub mod definition;
pub mod effect;
pub mod error;
pub mod targeted;

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use crate::state::{Conditions, FactKey, WorldState};

pub use cost::Cost;
pub use definition::{ActionCost, ActionDef, CostFn};
pub use effect::{Effect, NetWrite};
pub use error::ActionError;
pub use targeted::{BindFn, TargetedDef};

/// Unique identifier of an action inside an
/// [`ActionLibrary`](crate::library::ActionLibrary).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", from = "String")
)]
pub struct ActionId(Arc<str>);

impl ActionId {
    pub fn new(id: &str) -> Self {
        Self(Arc::from(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ActionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ActionId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl From<ActionId> for String {
    fn from(id: ActionId) -> Self {
        id.0.to_string()
    }
}

impl PartialEq<str> for ActionId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for ActionId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Uniform capability interface of a plannable action.
///
/// # Contract
///
/// - [`is_applicable`](Action::is_applicable), [`apply`](Action::apply) and
///   [`cost`](Action::cost) read only their argument and are deterministic.
/// - `cost(state) >= cost_floor()` for every state.
/// - `apply` changes at most [`effect_width`](Action::effect_width) facts.
///
/// The last two feed the planner's admissible heuristic; the conservative
/// defaults (floor 0, unbounded width) are always correct.
pub trait Action: Send + Sync + fmt::Debug {
    fn id(&self) -> &ActionId;

    /// Precondition: may this action run in `state`?
    fn is_applicable(&self, state: &WorldState) -> bool;

    /// Effect: the state after running this action in `state`.
    fn apply(&self, state: &WorldState) -> WorldState;

    /// Cost of running this action in `state`.
    fn cost(&self, state: &WorldState) -> Cost;

    /// Lower bound of [`cost`](Action::cost) over all states.
    fn cost_floor(&self) -> Cost {
        Cost::ZERO
    }

    /// Upper bound on the number of facts [`apply`](Action::apply) changes.
    fn effect_width(&self) -> usize {
        usize::MAX
    }

    /// Whether an in-flight execution may be interrupted (e.g. by a goal switch).
    fn can_be_cancelled(&self) -> bool {
        true
    }

    /// Domain-setup validation, run once on registration.
    fn validate(&self) -> Result<(), ActionError> {
        Ok(())
    }

    /// Target this instance is bound to.
    fn target(&self) -> Option<&FactKey> {
        None
    }

    /// Whether this is a template that must be [bound](Action::bind) to a
    /// target before it can be planned with or executed.
    fn is_targeted(&self) -> bool {
        false
    }

    /// Instantiates a targeted action for `target`.
    ///
    /// `None` means the action does not apply to that target.
    fn bind(&self, _target: &FactKey) -> Option<SharedAction> {
        None
    }

    /// Declarative form of the action.
    ///
    /// Only actions with a schema take part in regressive search.
    fn schema(&self) -> Option<ActionSchema<'_>> {
        None
    }
}

/// Preconditions and effects of a declaratively described action.
#[derive(Clone, Copy, Debug)]
pub struct ActionSchema<'a> {
    pub preconditions: &'a Conditions,
    pub effects: &'a [Effect],
}

/// Shared handle to a registered action.
pub type SharedAction = Arc<dyn Action>;
