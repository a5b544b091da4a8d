//! Concrete actions available to one search.

use std::sync::Arc;

use super::heuristic::ActionBounds;
use crate::action::SharedAction;
use crate::library::ActionLibrary;
use crate::memory::Memory;

/// Library actions with every targeted template bound to each remembered
/// target.
///
/// Order: registration order, and within a template, memory order.
pub(crate) struct Candidates {
    actions: Vec<SharedAction>,
}

impl Candidates {
    pub fn bind(library: &ActionLibrary, memory: &Memory) -> Self {
        let mut actions = Vec::with_capacity(library.len());
        for action in library.iter() {
            if !action.is_targeted() {
                actions.push(Arc::clone(action));
                continue;
            }
            for target in memory.iter() {
                let Some(bound) = action.bind(target) else {
                    continue;
                };
                match bound.validate() {
                    Ok(()) => actions.push(bound),
                    Err(err) => {
                        tracing::warn!("skipping {} on {}: {}", action.id(), target, err);
                    }
                }
            }
        }
        Self { actions }
    }

    pub fn get(&self, index: usize) -> Option<&SharedAction> {
        self.actions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedAction> + Clone {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn bounds(&self) -> ActionBounds {
        ActionBounds::of(self.actions.iter())
    }
}
