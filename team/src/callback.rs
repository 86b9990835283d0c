use log::debug;

use troupe_controller::{Trigger, TransitionKind};
use troupe_shared::MemberScope;

use crate::Team;

/// Invoked when a formal member of a team reports a transition of one of the
/// states the team tracks for it
pub trait TeamCallback<P> {
    fn on_team_enter(&self, _team: &Team<P>, _trigger: &Trigger<P>) {}

    fn on_team_exit(&self, _team: &Team<P>, _trigger: &Trigger<P>) {}

    fn on_team_reenter(&self, _team: &Team<P>, _trigger: &Trigger<P>) {}
}

// CooperativeCallback

/// The stock team callback: forwards the transition to every other live
/// member, formal members first, according to each member's cooperate
/// method.
///
/// While a member's controller receives the forwarded transition it is kept
/// from reporting its own transitions, so a state reacting to the forwarded
/// call cannot start the propagation over again.
#[derive(Clone, Copy, Debug, Default)]
pub struct CooperativeCallback;

impl CooperativeCallback {
    fn propagate<P: Clone + 'static>(&self, team: &Team<P>, trigger: &Trigger<P>, kind: TransitionKind) {
        let by_mutex = trigger.is_mutex();

        for (member, controller) in team.live_members(MemberScope::ALL) {
            if trigger.controller().refers_to(&controller) {
                continue;
            }

            let _guard = controller.suppress_team_dispatch();
            if by_mutex && !member.cooperate_method().accepts_mutex() {
                debug!(
                    "Not forwarding {:?} to {:?}: triggered by a mutex state",
                    trigger, member
                );
                continue;
            }
            controller.notify_team_transition(kind, member.states(), trigger.param());
        }
    }
}

impl<P: Clone + 'static> TeamCallback<P> for CooperativeCallback {
    fn on_team_enter(&self, team: &Team<P>, trigger: &Trigger<P>) {
        self.propagate(team, trigger, TransitionKind::Enter);
    }

    fn on_team_exit(&self, team: &Team<P>, trigger: &Trigger<P>) {
        self.propagate(team, trigger, TransitionKind::Exit);
    }

    fn on_team_reenter(&self, team: &Team<P>, trigger: &Trigger<P>) {
        self.propagate(team, trigger, TransitionKind::Reenter);
    }
}
