//! Targets known to an agent.

use crate::state::FactKey;

/// Ordered set of targets an agent remembers.
///
/// Targeted actions are expanded once per remembered target, in
/// registration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Memory {
    targets: Vec<FactKey>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_targets<K, I>(targets: I) -> Self
    where
        K: Into<FactKey>,
        I: IntoIterator<Item = K>,
    {
        let mut memory = Self::new();
        for target in targets {
            memory.register(target);
        }
        memory
    }

    /// Remembers `target`. Returns false if it was already known.
    pub fn register(&mut self, target: impl Into<FactKey>) -> bool {
        let target = target.into();
        if self.targets.contains(&target) {
            return false;
        }
        tracing::debug!("remembering {}", target);
        self.targets.push(target);
        true
    }

    /// Forgets `target`. Returns false if it was not known.
    pub fn unregister(&mut self, target: &str) -> bool {
        let Some(position) = self.targets.iter().position(|t| t.as_str() == target) else {
            return false;
        };
        tracing::debug!("forgetting {}", target);
        self.targets.remove(position);
        true
    }

    pub fn contains(&self, target: &str) -> bool {
        self.targets.iter().any(|t| t.as_str() == target)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FactKey> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
