//! Immutable world-state snapshots.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::{FactKey, FactValue};

/// Ordered fact table backing a [`WorldState`].
pub type FactMap = BTreeMap<FactKey, FactValue>;

/// Immutable snapshot of symbolic facts.
///
/// A world state is both the planner's input and the payload of every search
/// node. It is never mutated in place: every derivation (`with`, `without`,
/// `derive`) returns a new snapshot and leaves the receiver untouched, so a
/// state referenced by an in-flight search node stays valid for the whole
/// search. Clones share the underlying table.
///
/// Equality and hashing are structural over the (ordered) fact table.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "FactMap", from = "FactMap")
)]
pub struct WorldState {
    facts: Arc<FactMap>,
}

impl WorldState {
    /// Creates an empty world state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a state from `(key, value)` pairs. Later pairs win on duplicate keys.
    pub fn from_facts<K, V, I>(facts: I) -> Self
    where
        K: Into<FactKey>,
        V: Into<FactValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        facts.into_iter().collect()
    }

    pub fn get(&self, key: &str) -> Option<&FactValue> {
        self.facts.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.facts.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Iterates facts in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&FactKey, &FactValue)> {
        self.facts.iter()
    }

    pub fn facts(&self) -> &FactMap {
        &self.facts
    }

    /// Returns a new state with `key` set to `value`.
    #[must_use]
    pub fn with(&self, key: impl Into<FactKey>, value: impl Into<FactValue>) -> Self {
        let (key, value) = (key.into(), value.into());
        self.derive(|facts| {
            facts.insert(key, value);
        })
    }

    /// Returns a new state without `key`.
    #[must_use]
    pub fn without(&self, key: &str) -> Self {
        if !self.contains(key) {
            return self.clone();
        }
        self.derive(|facts| {
            facts.remove(key);
        })
    }

    /// Returns a new state with every fact of `overlay` written over this one.
    #[must_use]
    pub fn merged(&self, overlay: &WorldState) -> Self {
        if overlay.is_empty() {
            return self.clone();
        }
        self.derive(|facts| {
            facts.extend(overlay.iter().map(|(k, v)| (k.clone(), v.clone())));
        })
    }

    /// Copy-on-write derivation: clones the fact table, lets `edit` change the
    /// copy, and returns it as a new snapshot.
    #[must_use]
    pub fn derive(&self, edit: impl FnOnce(&mut FactMap)) -> Self {
        let mut facts = FactMap::clone(&self.facts);
        edit(&mut facts);
        Self {
            facts: Arc::new(facts),
        }
    }

    /// Returns true if both states share the same fact table allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.facts, &other.facts)
    }
}

impl<K: Into<FactKey>, V: Into<FactValue>> FromIterator<(K, V)> for WorldState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let facts: FactMap = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            facts: Arc::new(facts),
        }
    }
}

impl From<FactMap> for WorldState {
    fn from(facts: FactMap) -> Self {
        Self {
            facts: Arc::new(facts),
        }
    }
}

impl From<WorldState> for FactMap {
    fn from(state: WorldState) -> Self {
        Arc::unwrap_or_clone(state.facts)
    }
}

impl fmt::Debug for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.facts.iter()).finish()
    }
}

impl fmt::Display for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, (key, value)) in self.facts.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn woodcutter() -> WorldState {
        WorldState::from_facts([("has_axe", false), ("near_tree", false), ("has_wood", false)])
    }

    #[test]
    fn with_leaves_receiver_untouched() {
        let start = woodcutter();
        let next = start.with("has_axe", true);

        assert_eq!(start.get("has_axe"), Some(&FactValue::Bool(false)));
        assert_eq!(next.get("has_axe"), Some(&FactValue::Bool(true)));
        assert!(!start.ptr_eq(&next));
    }

    #[test]
    fn structural_equality_ignores_construction_order() {
        let a = WorldState::from_facts([("a", 1), ("b", 2)]);
        let b = WorldState::new().with("b", 2).with("a", 1);
        assert_eq!(a, b);

        let mut seen = HashSet::new();
        seen.insert(a);
        assert!(seen.contains(&b), "hash must be structural");
    }

    #[test]
    fn without_missing_key_returns_shared_clone() {
        let start = woodcutter();
        let same = start.without("unknown");
        assert!(same.ptr_eq(&start));

        let smaller = start.without("has_wood");
        assert_eq!(smaller.len(), 2);
        assert_eq!(start.len(), 3);
    }

    #[test]
    fn merged_overlays_facts() {
        let start = woodcutter();
        let overlay = WorldState::from_facts([("has_wood", FactValue::Bool(true)), ("logs", FactValue::Int(3))]);
        let merged = start.merged(&overlay);

        assert_eq!(merged.get("has_wood"), Some(&FactValue::Bool(true)));
        assert_eq!(merged.get("logs"), Some(&FactValue::Int(3)));
        assert_eq!(merged.get("has_axe"), Some(&FactValue::Bool(false)));
    }

    #[test]
    fn display_is_key_ordered() {
        let state = WorldState::from_facts([("b", true), ("a", false)]);
        assert_eq!(state.to_string(), "{a: false, b: true}");
    }
}
