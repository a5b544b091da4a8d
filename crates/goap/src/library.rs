//! Registry of the actions an agent may plan with.
//!
//! A library is built once during setup and then shared read-only (behind an
//! `Arc`) by every planner and runner. Reloading a domain means building a new
//! library and swapping the `Arc`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::action::{Action, ActionError, ActionId, SharedAction};
use crate::error::{ErrorSeverity, GoapError};
use crate::planner::ActionBounds;
use crate::state::FactKey;

/// Errors raised while populating an [`ActionLibrary`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LibraryError {
    #[error("action `{id}` is already registered")]
    DuplicateAction { id: ActionId },

    #[error("action `{id}` is invalid: {source}")]
    InvalidAction {
        id: ActionId,
        #[source]
        source: ActionError,
    },
}

impl GoapError for LibraryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateAction { .. } => "LIBRARY_DUPLICATE_ACTION",
            Self::InvalidAction { source, .. } => source.error_code(),
        }
    }
}

/// Append-only, identifier-indexed set of actions.
///
/// Iteration follows registration order; the planner expands children in
/// that order.
#[derive(Default)]
pub struct ActionLibrary {
    actions: Vec<SharedAction>,
    index: HashMap<ActionId, usize>,
}

impl ActionLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a library from a list of actions, stopping at the first error.
    pub fn from_actions<A, I>(actions: I) -> Result<Self, LibraryError>
    where
        A: Action + 'static,
        I: IntoIterator<Item = A>,
    {
        let mut library = Self::new();
        for action in actions {
            library.register(action)?;
        }
        Ok(library)
    }

    /// Validates and registers an action.
    pub fn register<A: Action + 'static>(&mut self, action: A) -> Result<(), LibraryError> {
        self.register_shared(Arc::new(action))
    }

    /// Registers an already shared action.
    pub fn register_shared(&mut self, action: SharedAction) -> Result<(), LibraryError> {
        let id = action.id().clone();
        if self.index.contains_key(&id) {
            return Err(LibraryError::DuplicateAction { id });
        }
        action
            .validate()
            .map_err(|source| LibraryError::InvalidAction {
                id: id.clone(),
                source,
            })?;

        tracing::debug!("registered action {} (#{})", id, self.actions.len());
        self.index.insert(id, self.actions.len());
        self.actions.push(action);
        Ok(())
    }

    pub fn lookup(&self, id: &str) -> Option<&SharedAction> {
        self.index.get(id).map(|&position| &self.actions[position])
    }

    /// Concrete action for a plan step.
    ///
    /// Targeted actions are bound to `target` and need one; untargeted
    /// actions resolve only without a target.
    pub fn resolve(&self, id: &str, target: Option<&FactKey>) -> Option<SharedAction> {
        let action = self.lookup(id)?;
        match target {
            Some(target) if action.is_targeted() => action.bind(target),
            Some(_) => None,
            None if action.is_targeted() => None,
            None => Some(Arc::clone(action)),
        }
    }

    /// Registration index of `id`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Action at a registration index.
    pub fn get(&self, position: usize) -> Option<&SharedAction> {
        self.actions.get(position)
    }

    /// All actions in registration order.
    pub fn all(&self) -> &[SharedAction] {
        &self.actions
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedAction> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Cost floor and effect width over the untargeted actions.
    ///
    /// An empty library yields a zero floor, which makes every heuristic
    /// estimate zero.
    pub fn bounds(&self) -> ActionBounds {
        ActionBounds::of(self.actions.iter())
    }
}

impl fmt::Debug for ActionLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.actions.iter().map(|action| action.id()))
            .finish()
    }
}
