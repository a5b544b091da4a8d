//! Non-negative action costs.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use super::ActionError;

/// Non-negative cost of an action or plan.
///
/// Negative costs would break cost-ordered expansion, so they are not
/// representable: converting from a signed number fails with
/// [`ActionError::NegativeCost`]. Arithmetic saturates instead of wrapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cost(u64);

impl Cost {
    pub const ZERO: Cost = Cost(0);
    pub const ONE: Cost = Cost(1);
    pub const MAX: Cost = Cost(u64::MAX);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Converts a signed value, rejecting negatives.
    pub fn from_signed(value: i64) -> Result<Self, ActionError> {
        if value < 0 {
            return Err(ActionError::NegativeCost { value });
        }
        Ok(Self(value as u64))
    }

    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn saturating_add(self, other: Cost) -> Cost {
        Cost(self.0.saturating_add(other.0))
    }

    #[must_use]
    pub const fn saturating_mul(self, factor: u64) -> Cost {
        Cost(self.0.saturating_mul(factor))
    }

    /// `self - other`, or `None` if `other` is larger.
    pub const fn checked_sub(self, other: Cost) -> Option<Cost> {
        match self.0.checked_sub(other.0) {
            Some(value) => Some(Cost(value)),
            None => None,
        }
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, other: Cost) -> Cost {
        self.saturating_add(other)
    }
}

impl AddAssign for Cost {
    fn add_assign(&mut self, other: Cost) {
        *self = self.saturating_add(other);
    }
}

impl Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Cost {
        iter.fold(Cost::ZERO, Cost::saturating_add)
    }
}

impl<'a> Sum<&'a Cost> for Cost {
    fn sum<I: Iterator<Item = &'a Cost>>(iter: I) -> Cost {
        iter.copied().sum()
    }
}

impl From<u32> for Cost {
    fn from(value: u32) -> Self {
        Self(u64::from(value))
    }
}

impl From<u64> for Cost {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl TryFrom<i64> for Cost {
    type Error = ActionError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_signed(value)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
