//! Actions instantiated per target.

use std::fmt;
use std::sync::Arc;

use super::{Action, ActionDef, ActionId, Cost, SharedAction};
use crate::state::{FactKey, WorldState};

/// Builds the concrete action for one target, or `None` if it does not apply.
pub type BindFn = dyn Fn(&FactKey) -> Option<ActionDef> + Send + Sync;

/// Action template bound to each target an agent remembers.
///
/// The planner expands the template once per remembered target; every
/// bound instance keeps the template's id and records its target, so plan
/// steps name both.
///
/// ```
/// use goap::action::{Action, ActionDef, TargetedDef};
/// use goap::FactKey;
///
/// let chop = TargetedDef::new("chop", |tree: &FactKey| {
///     let at = format!("at_{tree}");
///     Some(ActionDef::new("chop").requires_eq(at.as_str(), true).sets("has_wood", true))
/// });
/// let bound = chop.bind(&FactKey::new("oak")).unwrap();
/// assert_eq!(bound.id(), "chop");
/// assert_eq!(bound.target().map(FactKey::as_str), Some("oak"));
/// ```
#[derive(Clone)]
pub struct TargetedDef {
    id: ActionId,
    bind: Arc<BindFn>,
}

impl TargetedDef {
    pub fn new<F>(id: impl Into<ActionId>, bind: F) -> Self
    where
        F: Fn(&FactKey) -> Option<ActionDef> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            bind: Arc::new(bind),
        }
    }
}

impl fmt::Debug for TargetedDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetedDef")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

// An unbound template is never applicable; the planner and runner only use
// bound instances.
impl Action for TargetedDef {
    fn id(&self) -> &ActionId {
        &self.id
    }

    fn is_applicable(&self, _state: &WorldState) -> bool {
        false
    }

    fn apply(&self, state: &WorldState) -> WorldState {
        state.clone()
    }

    fn cost(&self, _state: &WorldState) -> Cost {
        Cost::ZERO
    }

    fn is_targeted(&self) -> bool {
        true
    }

    fn bind(&self, target: &FactKey) -> Option<SharedAction> {
        let def = (self.bind)(target)?;
        Some(Arc::new(def.instance_of(&self.id, target)))
    }
}
