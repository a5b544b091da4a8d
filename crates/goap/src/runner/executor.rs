//! Host-side execution of planned actions.

use crate::action::Action;
use crate::state::WorldState;

/// Progress of an action started through an [`ActionExecutor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ExecutionStatus {
    Running,
    Succeeded,
    Failed,
}

/// Bridge from the runner to the host game.
///
/// Execution is polled, never awaited: the runner calls
/// [`poll_status`](ActionExecutor::poll_status) once per tick until the
/// action leaves [`ExecutionStatus::Running`]. A handle is consumed either by
/// a terminal status or by [`cancel`](ActionExecutor::cancel), never both.
pub trait ActionExecutor {
    type Handle;

    fn begin_execute(&mut self, action: &dyn Action, world: &WorldState) -> Self::Handle;

    fn poll_status(&mut self, handle: &Self::Handle) -> ExecutionStatus;

    /// Releases an action that is still running.
    fn cancel(&mut self, handle: Self::Handle);
}
