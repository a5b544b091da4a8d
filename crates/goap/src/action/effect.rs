//! Declarative action effects.

use std::collections::BTreeSet;
use std::fmt;

use crate::state::{FactKey, FactMap, FactValue, WorldState};

/// Combined outcome of a list of effects on one key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NetWrite {
    /// The key keeps its previous value.
    Untouched,
    /// The key ends with this value (`None` = removed), whatever it held.
    Assign(Option<FactValue>),
    /// An integer value is shifted by this amount.
    ///
    /// An absent value becomes `Int(offset)`; non-integers stay unchanged.
    Offset(i64),
}

/// A single write performed by an action.
///
/// Effects are pure: applying them to a state yields a new state and the
/// result depends only on the input state.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effect {
    /// Set `key` to `value`.
    Set { key: FactKey, value: FactValue },
    /// Add `delta` to an integer fact (an absent fact counts as 0).
    ///
    /// Non-integer facts are left unchanged; registration rejects actions
    /// whose preconditions pin such a key to a non-integer value.
    Add { key: FactKey, delta: i64 },
    /// Remove `key` from the state.
    Remove { key: FactKey },
}

impl Effect {
    pub fn set(key: impl Into<FactKey>, value: impl Into<FactValue>) -> Self {
        Self::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn add(key: impl Into<FactKey>, delta: i64) -> Self {
        Self::Add {
            key: key.into(),
            delta,
        }
    }

    pub fn remove(key: impl Into<FactKey>) -> Self {
        Self::Remove { key: key.into() }
    }

    pub fn key(&self) -> &FactKey {
        match self {
            Self::Set { key, .. } | Self::Add { key, .. } | Self::Remove { key } => key,
        }
    }

    fn write(&self, facts: &mut FactMap) {
        match self {
            Self::Set { key, value } => {
                facts.insert(key.clone(), value.clone());
            }
            Self::Add { key, delta } => match facts.get_mut(key.as_str()) {
                Some(FactValue::Int(current)) => *current = current.saturating_add(*delta),
                Some(_) => {}
                None => {
                    facts.insert(key.clone(), FactValue::Int(*delta));
                }
            },
            Self::Remove { key } => {
                facts.remove(key.as_str());
            }
        }
    }

    /// Applies a list of effects in order, producing a new state.
    pub fn apply_all(effects: &[Effect], state: &WorldState) -> WorldState {
        if effects.is_empty() {
            return state.clone();
        }
        state.derive(|facts| {
            for effect in effects {
                effect.write(facts);
            }
        })
    }

    /// Folds every effect on `key` into one [`NetWrite`].
    pub fn net_write(effects: &[Effect], key: &FactKey) -> NetWrite {
        effects
            .iter()
            .filter(|effect| effect.key() == key)
            .fold(NetWrite::Untouched, |net, effect| match (net, effect) {
                (_, Self::Set { value, .. }) => NetWrite::Assign(Some(value.clone())),
                (_, Self::Remove { .. }) => NetWrite::Assign(None),
                (NetWrite::Untouched, Self::Add { delta, .. }) => NetWrite::Offset(*delta),
                (NetWrite::Offset(offset), Self::Add { delta, .. }) => {
                    NetWrite::Offset(offset.saturating_add(*delta))
                }
                (NetWrite::Assign(Some(FactValue::Int(n))), Self::Add { delta, .. }) => {
                    NetWrite::Assign(Some(FactValue::Int(n.saturating_add(*delta))))
                }
                (NetWrite::Assign(None), Self::Add { delta, .. }) => {
                    NetWrite::Assign(Some(FactValue::Int(*delta)))
                }
                (assigned @ NetWrite::Assign(Some(_)), Self::Add { .. }) => assigned,
            })
    }

    /// Number of distinct keys written by `effects`.
    pub fn width(effects: &[Effect]) -> usize {
        effects.iter().map(Effect::key).collect::<BTreeSet<_>>().len()
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set { key, value } => write!(f, "{key} := {value}"),
            Self::Add { key, delta } => write!(f, "{key} += {delta}"),
            Self::Remove { key } => write!(f, "{key} := <unset>"),
        }
    }
}
