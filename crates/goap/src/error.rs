//! Common error infrastructure for the planning core.
//!
//! Domain-specific errors (e.g. [`ActionError`](crate::action::ActionError),
//! [`PlanFailure`](crate::planner::PlanFailure)) live next to the modules that
//! produce them. This module only provides the shared classification used by
//! hosts to pick a recovery strategy.
//!
//! # Design Principles
//!
//! - **Values, not panics**: expected search outcomes are returned as errors
//! - **Setup-time validation**: malformed actions are rejected on registration
//! - **Severity Classification**: errors are categorized for recovery strategies

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the agent can idle, retry with a larger budget or pick another goal
/// - **Validation**: the domain configuration is wrong and must be fixed
/// - **Internal**: unexpected inconsistency between plan and library
/// - **Fatal**: the episode cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ErrorSeverity {
    /// Recoverable error - retry later or fall back to another goal.
    ///
    /// Examples: goal unreachable, search budget exhausted
    Recoverable,

    /// Validation error - invalid domain setup, should not retry without changes.
    ///
    /// Examples: duplicate action id, ordering comparison on a boolean fact
    Validation,

    /// Internal error - plan references data the library no longer has.
    Internal,

    /// Fatal error - the episode was stopped and cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug or broken configuration.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all planning-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GoapError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a stable error code for logs and telemetry.
    ///
    /// Format: `MODULE_ERROR_NAME` (e.g. `PLAN_UNREACHABLE`).
    fn error_code(&self) -> &'static str;
}
