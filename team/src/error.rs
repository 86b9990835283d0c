use thiserror::Error;

use troupe_shared::{CooperateMethodError, FlagError};

/// Errors that can occur while building teams or editing their members
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TeamError {
    /// A team was created without any formal member
    #[error("A team needs at least one formal member to be able to trigger propagation")]
    EmptyFormalMembers,

    /// Member states were not positive
    #[error("Invalid member states: {0}")]
    InvalidFlags(#[from] FlagError),

    /// A raw cooperate method code was not recognized
    #[error("Invalid cooperate method: {0}")]
    InvalidCooperateMethod(#[from] CooperateMethodError),
}
