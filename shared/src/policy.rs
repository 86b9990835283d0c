use std::convert::TryFrom;

use thiserror::Error;

/// Errors that can occur when decoding a raw dispatch policy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("Unknown dispatch policy code {value}. Expected 1 (broadcast) or 2 (consume)")]
    UnknownPolicy { value: u8 },
}

/// Errors that can occur when decoding a raw cooperate method
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CooperateMethodError {
    #[error("Unknown cooperate method code {value}. Expected 1 (base) or 3 (all)")]
    UnknownMethod { value: u8 },
}

/// Errors that can occur when decoding a raw member scope
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemberScopeError {
    #[error("Member scope {value:#04x} contains bits other than formal (0x01) and outer (0x02)")]
    UnknownBits { value: u8 },
}

// DispatchPolicy

/// How a message travels through a set of receivers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchPolicy {
    /// Every receiver is given the message; the result is whether any handled it
    Broadcast,
    /// Delivery stops at the first receiver that handles the message
    Consume,
}

impl DispatchPolicy {
    pub fn code(&self) -> u8 {
        match self {
            Self::Broadcast => 1,
            Self::Consume => 2,
        }
    }

    pub fn stops_on_handled(&self) -> bool {
        matches!(self, Self::Consume)
    }
}

impl TryFrom<u8> for DispatchPolicy {
    type Error = PolicyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Broadcast),
            2 => Ok(Self::Consume),
            _ => Err(PolicyError::UnknownPolicy { value }),
        }
    }
}

// CooperateMethod

/// How eagerly a team member takes part in team-wide propagation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CooperateMethod {
    /// Receives forwarded transitions, except those triggered by a mutex state
    Base,
    /// Receives every forwarded transition
    All,
}

impl CooperateMethod {
    pub fn code(&self) -> u8 {
        match self {
            Self::Base => 1,
            Self::All => 3,
        }
    }

    /// Whether a transition caused by a mutex state reaches this member
    pub fn accepts_mutex(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl Default for CooperateMethod {
    fn default() -> Self {
        Self::Base
    }
}

impl TryFrom<u8> for CooperateMethod {
    type Error = CooperateMethodError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Base),
            3 => Ok(Self::All),
            _ => Err(CooperateMethodError::UnknownMethod { value }),
        }
    }
}

// MemberScope

/// Selects which member lists of a team take part in an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberScope(u8);

impl MemberScope {
    pub const FORMAL: MemberScope = MemberScope(0x01);
    pub const OUTER: MemberScope = MemberScope(0x02);
    pub const ALL: MemberScope = MemberScope(0x03);

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn includes_formal(&self) -> bool {
        self.0 & Self::FORMAL.0 != 0
    }

    pub fn includes_outer(&self) -> bool {
        self.0 & Self::OUTER.0 != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for MemberScope {
    type Output = MemberScope;

    fn bitor(self, rhs: Self) -> Self::Output {
        MemberScope(self.0 | rhs.0)
    }
}

impl TryFrom<u8> for MemberScope {
    type Error = MemberScopeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value & !Self::ALL.0 != 0 {
            return Err(MemberScopeError::UnknownBits { value });
        }
        Ok(MemberScope(value))
    }
}
