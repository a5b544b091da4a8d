//! Action definition errors.
//!
//! These are programming-contract violations. They surface when an action is
//! registered in an [`ActionLibrary`](crate::library::ActionLibrary), never
//! during live planning.

use crate::error::{ErrorSeverity, GoapError};
use crate::state::{ConditionError, FactKey};

/// Errors produced while building or validating an action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// Action identifier is empty.
    #[error("action id must not be empty")]
    EmptyId,

    /// A cost was built from a negative number.
    #[error("action cost must be non-negative, got {value}")]
    NegativeCost { value: i64 },

    /// Precondition set is malformed.
    #[error("invalid precondition: {0}")]
    Precondition(#[from] ConditionError),

    /// `Add` effect on a key the preconditions pin to a non-integer value.
    #[error("`add` effect on `{key}` which the preconditions require to be non-integer")]
    AddOnNonInteger { key: FactKey },
}

impl GoapError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyId => "ACTION_EMPTY_ID",
            Self::NegativeCost { .. } => "ACTION_NEGATIVE_COST",
            Self::Precondition(ConditionError::OrderingOnNonInteger { .. }) => {
                "ACTION_ORDERING_ON_NON_INTEGER"
            }
            Self::Precondition(ConditionError::Contradiction { .. }) => {
                "ACTION_CONTRADICTORY_PRECONDITION"
            }
            Self::AddOnNonInteger { .. } => "ACTION_ADD_ON_NON_INTEGER",
        }
    }
}
