//! Fact values.

use std::fmt;

use super::FactKey;

/// Value stored under a [`FactKey`].
///
/// Values are deliberately small and structurally comparable: search
/// deduplication hashes whole world states, so every payload must have exact
/// equality.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FactValue {
    /// Boolean flag (e.g. `has_axe`).
    Bool(bool),
    /// Small integer scalar (e.g. `wood_count`).
    Int(i64),
    /// Symbolic enum member (e.g. `location = forest`).
    Enum(FactKey),
}

/// Discriminant of a [`FactValue`], used in validation errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ValueKind {
    Bool,
    Int,
    Enum,
}

impl FactValue {
    /// Creates a symbolic enum value.
    pub fn symbol(name: &str) -> Self {
        Self::Enum(FactKey::new(name))
    }

    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Enum(_) => ValueKind::Enum,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&FactKey> {
        match self {
            Self::Enum(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Enum(value) => write!(f, ":{value}"),
        }
    }
}

impl From<bool> for FactValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FactValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FactValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for FactValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<FactKey> for FactValue {
    fn from(value: FactKey) -> Self {
        Self::Enum(value)
    }
}
