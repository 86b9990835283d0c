use std::fmt;

use troupe_shared::StateFlags;

use crate::ControllerHandle;

/// The three ways a state can change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    Enter,
    Exit,
    /// An already-active state was explicitly targeted again
    Reenter,
}

// Trigger

/// Describes one state transition of one controller, as reported to the
/// transition listener the controller is bound to
pub struct Trigger<P> {
    controller: ControllerHandle<P>,
    flag: StateFlags,
    kind: TransitionKind,
    param: P,
    mutex: bool,
}

impl<P> Trigger<P> {
    pub fn new(
        controller: ControllerHandle<P>,
        flag: StateFlags,
        kind: TransitionKind,
        param: P,
        mutex: bool,
    ) -> Self {
        Self {
            controller,
            flag,
            kind,
            param,
            mutex,
        }
    }

    /// The controller whose state changed
    pub fn controller(&self) -> &ControllerHandle<P> {
        &self.controller
    }

    /// The single state bit that changed
    pub fn flag(&self) -> StateFlags {
        self.flag
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    /// The merged parameter the triggering state was given
    pub fn param(&self) -> &P {
        &self.param
    }

    /// Whether the triggering state is exclusive with its siblings
    pub fn is_mutex(&self) -> bool {
        self.mutex
    }
}

impl<P> fmt::Debug for Trigger<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("controller", &self.controller)
            .field("flag", &format_args!("{:#x}", self.flag))
            .field("kind", &self.kind)
            .field("mutex", &self.mutex)
            .finish()
    }
}

// TransitionListener

/// Receives every transition a bound controller reports upward
pub trait TransitionListener<P> {
    fn on_state_transition(&self, trigger: &Trigger<P>);
}
