use std::{convert::TryFrom, fmt};

use troupe_controller::{Controller, ControllerHandle};
use troupe_shared::{validate_flags, CooperateMethod, StateFlags};

use crate::TeamError;

// Member

/// A weak, flag-scoped association between a team and one controller.
///
/// The member never keeps its controller alive. Once the controller is gone
/// the member is dead; teams drop dead members the next time they walk their
/// member lists.
pub struct Member<P> {
    controller: ControllerHandle<P>,
    states: StateFlags,
    method: CooperateMethod,
}

impl<P> Member<P> {
    pub fn try_new(
        controller: &Controller<P>,
        states: StateFlags,
        method: CooperateMethod,
    ) -> Result<Self, TeamError> {
        let states = validate_flags(states)?;
        Ok(Self {
            controller: controller.downgrade(),
            states,
            method,
        })
    }

    /// Panics if `states` is zero
    pub fn new(controller: &Controller<P>, states: StateFlags, method: CooperateMethod) -> Self {
        Self::try_new(controller, states, method)
            .unwrap_or_else(|err| panic!("Cannot create team member: {}", err))
    }

    /// A member cooperating with [`CooperateMethod::Base`]. Panics if
    /// `states` is zero.
    pub fn base(controller: &Controller<P>, states: StateFlags) -> Self {
        Self::new(controller, states, CooperateMethod::Base)
    }

    /// Builds a member from a raw cooperate method code
    pub fn from_raw(controller: &Controller<P>, states: StateFlags, method: u8) -> Result<Self, TeamError> {
        let method = CooperateMethod::try_from(method)?;
        Self::try_new(controller, states, method)
    }

    /// The referenced controller, if it is still alive
    pub fn controller(&self) -> Option<Controller<P>> {
        self.controller.upgrade()
    }

    pub fn handle(&self) -> &ControllerHandle<P> {
        &self.controller
    }

    pub fn is_alive(&self) -> bool {
        self.controller.is_alive()
    }

    pub fn refers_to(&self, controller: &Controller<P>) -> bool {
        self.is_alive() && self.controller.refers_to(controller)
    }

    /// The states of the controller the team cares about
    pub fn states(&self) -> StateFlags {
        self.states
    }

    pub fn cooperate_method(&self) -> CooperateMethod {
        self.method
    }

    /// Returns whether none of `states` was tracked before
    pub(crate) fn add_states(&mut self, states: StateFlags) -> bool {
        let shared = self.states & states;
        self.states |= states;
        shared == 0
    }

    /// Returns whether the member tracks no state anymore
    pub(crate) fn remove_states(&mut self, states: StateFlags) -> bool {
        self.states &= !states;
        self.states == 0
    }
}

impl<P> Clone for Member<P> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            states: self.states,
            method: self.method,
        }
    }
}

/// Members are equal only while both are alive and reference the same
/// controller with the same states and cooperate method
impl<P> PartialEq for Member<P> {
    fn eq(&self, other: &Self) -> bool {
        self.is_alive()
            && other.is_alive()
            && self.controller.ptr_eq(&other.controller)
            && self.method == other.method
            && self.states == other.states
    }
}

impl<P> fmt::Debug for Member<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("controller", &self.controller)
            .field("states", &format_args!("{:#x}", self.states))
            .field("cooperate_method", &self.method)
            .finish()
    }
}
