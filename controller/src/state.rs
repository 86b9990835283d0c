use std::{cell::RefCell, rc::Rc};

use troupe_shared::{Message, StateFlags};

use crate::{Controller, TransitionKind};

/// Shared handle to a live state owned by a controller
pub type StateRef<P> = Rc<RefCell<Box<dyn State<P>>>>;

/// A unit of behavior bound to one state-flag bit.
///
/// Every hook has an empty default, so a state only implements what it
/// reacts to. Hooks run synchronously inside the controller call that
/// caused them and may call back into `ctx.controller()`.
pub trait State<P> {
    fn on_enter(&mut self, _ctx: &StateContext<'_, P>) {}

    fn on_exit(&mut self, _ctx: &StateContext<'_, P>) {}

    fn on_reenter(&mut self, _ctx: &StateContext<'_, P>) {}

    /// Called once per external tick while the state is active
    fn on_update(&mut self, _delta_time: u64, _ctx: &StateContext<'_, P>) {}

    /// Called by `Controller::notify_state_update` after the new parameter
    /// has been merged
    fn on_param_update(&mut self, _ctx: &StateContext<'_, P>) {}

    /// Returns whether the message was handled
    fn handle_message(&mut self, _message: &Message<P>, _ctx: &StateContext<'_, P>) -> bool {
        false
    }

    /// A transition of another team member was forwarded to this state.
    ///
    /// The state is already active, so by default an entering or reentering
    /// team mate is seen as a reenter and an exiting one is ignored.
    fn on_team_transition(&mut self, kind: TransitionKind, ctx: &StateContext<'_, P>) {
        match kind {
            TransitionKind::Enter | TransitionKind::Reenter => self.on_reenter(ctx),
            TransitionKind::Exit => {}
        }
    }

    /// Mutex states are exclusive with their siblings; transitions they
    /// trigger are not forwarded to base-cooperating team members
    fn is_mutex(&self) -> bool {
        false
    }
}

// StateContext

/// What a state sees while one of its hooks runs
pub struct StateContext<'c, P> {
    controller: &'c Controller<P>,
    flag: StateFlags,
    param: &'c P,
    from_team: bool,
}

impl<'c, P> StateContext<'c, P> {
    pub(crate) fn new(
        controller: &'c Controller<P>,
        flag: StateFlags,
        param: &'c P,
        from_team: bool,
    ) -> Self {
        Self {
            controller,
            flag,
            param,
            from_team,
        }
    }

    /// The controller owning the state
    pub fn controller(&self) -> &'c Controller<P> {
        self.controller
    }

    /// The single bit this state is bound to
    pub fn flag(&self) -> StateFlags {
        self.flag
    }

    pub fn param(&self) -> &'c P {
        self.param
    }

    /// Whether the hook was reached through team propagation
    pub fn is_from_team(&self) -> bool {
        self.from_team
    }
}

// StateFactory

/// Builds the state bound to a single flag bit. Returning `None` means the
/// flag is unknown, which aborts the transition that asked for it.
pub trait StateFactory<P> {
    fn create_state(&self, flag: StateFlags, param: &P) -> Option<Box<dyn State<P>>>;
}

impl<P, F> StateFactory<P> for F
where
    F: Fn(StateFlags, &P) -> Option<Box<dyn State<P>>>,
{
    fn create_state(&self, flag: StateFlags, param: &P) -> Option<Box<dyn State<P>>> {
        (self)(flag, param)
    }
}
