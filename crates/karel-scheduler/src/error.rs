use karel_types::RuntimeFault;
use thiserror::Error;

/// Requests the scheduler cannot carry out in its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("no world is loaded")]
    WorldNotLoaded,

    #[error("no program has been started")]
    NoProgram,

    #[error("there is no paused run to resume")]
    NothingToResume,

    #[error(transparent)]
    Fault(#[from] RuntimeFault),
}
