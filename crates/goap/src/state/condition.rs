//! Fact predicates shared by preconditions and goals.

use std::collections::BTreeSet;
use std::fmt;

use super::{FactKey, FactValue, ValueKind, WorldState};

/// Errors detected when validating a condition set during domain setup.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConditionError {
    /// `AtLeast` / `AtMost` used with a non-integer operand.
    #[error("ordering comparison `{comparison}` on `{key}` needs an integer, got {kind}")]
    OrderingOnNonInteger {
        key: FactKey,
        comparison: Comparison,
        kind: ValueKind,
    },

    /// Two conditions on the same key can never hold together.
    #[error("conditions on `{key}` contradict each other ({first} vs {second})")]
    Contradiction {
        key: FactKey,
        first: String,
        second: String,
    },
}

/// Comparison operator of a [`Condition`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Comparison {
    /// Fact is present and equal to the operand.
    Eq,
    /// Fact is absent or differs from the operand.
    NotEq,
    /// Integer fact is present and `>=` the operand.
    AtLeast,
    /// Integer fact is present and `<=` the operand.
    AtMost,
}

impl Comparison {
    const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::AtLeast => ">=",
            Self::AtMost => "<=",
        }
    }

    const fn is_ordering(self) -> bool {
        matches!(self, Self::AtLeast | Self::AtMost)
    }
}

/// Single predicate over one fact.
///
/// An absent fact satisfies only [`Comparison::NotEq`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Condition {
    pub key: FactKey,
    pub comparison: Comparison,
    pub value: FactValue,
}

impl Condition {
    pub fn new(key: impl Into<FactKey>, comparison: Comparison, value: impl Into<FactValue>) -> Self {
        Self {
            key: key.into(),
            comparison,
            value: value.into(),
        }
    }

    pub fn equals(key: impl Into<FactKey>, value: impl Into<FactValue>) -> Self {
        Self::new(key, Comparison::Eq, value)
    }

    pub fn not_equals(key: impl Into<FactKey>, value: impl Into<FactValue>) -> Self {
        Self::new(key, Comparison::NotEq, value)
    }

    pub fn at_least(key: impl Into<FactKey>, value: i64) -> Self {
        Self::new(key, Comparison::AtLeast, value)
    }

    pub fn at_most(key: impl Into<FactKey>, value: i64) -> Self {
        Self::new(key, Comparison::AtMost, value)
    }

    /// Evaluates the predicate against `state`.
    pub fn is_satisfied_by(&self, state: &WorldState) -> bool {
        self.holds_for(state.get(self.key.as_str()))
    }

    /// Evaluates the predicate against a single fact value (`None` = absent).
    pub fn holds_for(&self, current: Option<&FactValue>) -> bool {
        match self.comparison {
            Comparison::Eq => current == Some(&self.value),
            Comparison::NotEq => current != Some(&self.value),
            Comparison::AtLeast => matches!(
                (current.and_then(FactValue::as_int), self.value.as_int()),
                (Some(have), Some(want)) if have >= want
            ),
            Comparison::AtMost => matches!(
                (current.and_then(FactValue::as_int), self.value.as_int()),
                (Some(have), Some(want)) if have <= want
            ),
        }
    }

    /// Checks that the operand type fits the comparison.
    pub fn validate(&self) -> Result<(), ConditionError> {
        if self.comparison.is_ordering() && self.value.as_int().is_none() {
            return Err(ConditionError::OrderingOnNonInteger {
                key: self.key.clone(),
                comparison: self.comparison,
                kind: self.value.kind(),
            });
        }
        Ok(())
    }

    /// Returns true if no state can satisfy both `self` and `other`.
    ///
    /// Only pairs on the same key are compared; the check is exact for
    /// equality pairs and for integer ranges.
    fn contradicts(&self, other: &Condition) -> bool {
        use Comparison::*;

        if self.key != other.key {
            return false;
        }
        match (self.comparison, other.comparison) {
            (Eq, Eq) => self.value != other.value,
            (Eq, NotEq) | (NotEq, Eq) => self.value == other.value,
            (Eq, AtLeast | AtMost) => !other.holds_for(Some(&self.value)),
            (AtLeast | AtMost, Eq) => !self.holds_for(Some(&other.value)),
            (AtLeast, AtMost) => matches!(
                (self.value.as_int(), other.value.as_int()),
                (Some(low), Some(high)) if low > high
            ),
            (AtMost, AtLeast) => other.contradicts(self),
            _ => false,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.key, self.comparison.symbol(), self.value)
    }
}

/// Conjunction of [`Condition`]s.
///
/// Used as an action's precondition and as a goal's termination test. An
/// empty set is always satisfied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Conditions {
    items: Vec<Condition>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// One `Eq` condition per fact of `state`.
    pub fn from_state(state: &WorldState) -> Self {
        state
            .iter()
            .map(|(key, value)| Condition::equals(key.clone(), value.clone()))
            .collect()
    }

    /// Builder: adds a condition.
    #[must_use]
    pub fn and(mut self, condition: Condition) -> Self {
        self.items.push(condition);
        self
    }

    /// Builder: adds `key == value`.
    #[must_use]
    pub fn and_eq(self, key: impl Into<FactKey>, value: impl Into<FactValue>) -> Self {
        self.and(Condition::equals(key, value))
    }

    pub fn push(&mut self, condition: Condition) {
        self.items.push(condition);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_satisfied_by(&self, state: &WorldState) -> bool {
        self.items.iter().all(|c| c.is_satisfied_by(state))
    }

    /// Conditions that do not hold in `state`, in declaration order.
    pub fn unsatisfied<'a>(&'a self, state: &'a WorldState) -> impl Iterator<Item = &'a Condition> {
        self.items.iter().filter(move |c| !c.is_satisfied_by(state))
    }

    /// Number of distinct fact keys with at least one unsatisfied condition.
    ///
    /// Several conditions on one key can be fixed by a single write, so the
    /// planner's heuristic counts keys rather than conditions.
    pub fn unsatisfied_keys(&self, state: &WorldState) -> usize {
        self.unsatisfied(state)
            .map(|c| &c.key)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Distinct keys mentioned by this set.
    pub fn keys(&self) -> BTreeSet<&FactKey> {
        self.items.iter().map(|c| &c.key).collect()
    }

    /// Sorted copy without repeated conditions.
    ///
    /// Two sets that differ only in order or repetition normalize to equal
    /// values, which makes them usable as search keys.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut items = self.items.clone();
        items.sort();
        items.dedup();
        Self { items }
    }

    /// Validates operand types and rejects contradictory pairs.
    pub fn validate(&self) -> Result<(), ConditionError> {
        for (index, condition) in self.items.iter().enumerate() {
            condition.validate()?;
            if let Some(other) = self.items[..index].iter().find(|o| o.contradicts(condition)) {
                return Err(ConditionError::Contradiction {
                    key: condition.key.clone(),
                    first: other.to_string(),
                    second: condition.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<Condition> for Conditions {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Conditions {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for Conditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, condition) in self.items.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{condition}")?;
        }
        f.write_str("]")
    }
}
