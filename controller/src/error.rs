use thiserror::Error;

use troupe_shared::{FlagError, StateFlags};

/// Errors that can occur during controller transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// Flags passed to a transition were not positive
    #[error("Invalid state flags: {0}")]
    InvalidFlags(#[from] FlagError),

    /// The state factory does not know one of the requested bits
    #[error("State factory produced no state for flag {flag:#x}. Every bit passed to a transition must be known to the factory")]
    UnknownState { flag: StateFlags },
}
