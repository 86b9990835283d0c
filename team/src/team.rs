use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Weak,
};

use log::debug;

use troupe_controller::{Controller, ControllerHandle, TransitionKind, TransitionListener, Trigger};
use troupe_shared::{intersects, DispatchPolicy, MemberScope, Message, StateFlags};

use crate::{CooperativeCallback, Member, TeamCallback, TeamError};

// TeamKey
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct TeamKey(u32);

impl TeamKey {
    pub(crate) fn new(value: u32) -> Self {
        TeamKey(value)
    }

    pub fn to_u32(&self) -> u32 {
        self.0
    }
}

// Team

/// A set of members across possibly different controllers.
///
/// Formal members can trigger team-wide propagation and receive it; outer
/// members only receive it. Member lists shed dead members whenever they are
/// walked.
pub struct Team<P> {
    formal: RefCell<Vec<Member<P>>>,
    outer: RefCell<Vec<Member<P>>>,
    callback: Box<dyn TeamCallback<P>>,
    key: Cell<Option<TeamKey>>,
    listener: RefCell<Option<Weak<dyn TransitionListener<P>>>>,
}

impl<P: Clone + 'static> Team<P> {
    pub fn new(
        formal: Vec<Member<P>>,
        outer: Vec<Member<P>>,
        callback: impl TeamCallback<P> + 'static,
    ) -> Result<Self, TeamError> {
        if formal.is_empty() {
            return Err(TeamError::EmptyFormalMembers);
        }

        Ok(Self {
            formal: RefCell::new(formal),
            outer: RefCell::new(outer),
            callback: Box::new(callback),
            key: Cell::new(None),
            listener: RefCell::new(None),
        })
    }

    /// A team using [`CooperativeCallback`]
    pub fn with_default_callback(formal: Vec<Member<P>>, outer: Vec<Member<P>>) -> Result<Self, TeamError> {
        Self::new(formal, outer, CooperativeCallback)
    }

    // Registration

    /// The key of this team in the registry it belongs to
    pub fn key(&self) -> Option<TeamKey> {
        self.key.get()
    }

    pub fn is_registered(&self) -> bool {
        self.key.get().is_some()
    }

    /// Tells every formal member's controller to report to `listener`
    pub(crate) fn attach(&self, key: TeamKey, listener: Weak<dyn TransitionListener<P>>) {
        self.key.set(Some(key));
        for member in self.formal.borrow().iter() {
            if let Some(controller) = member.controller() {
                controller.set_transition_listener(listener.clone());
            }
        }
        *self.listener.borrow_mut() = Some(listener);
    }

    /// Returns the live formal controllers, which may have to be unbound
    pub(crate) fn detach(&self) -> Vec<Controller<P>> {
        self.key.set(None);
        *self.listener.borrow_mut() = None;
        self.live_members(MemberScope::FORMAL)
            .into_iter()
            .map(|(_, controller)| controller)
            .collect()
    }

    // Members

    /// Snapshot of the formal members, dead ones included
    pub fn formal_members(&self) -> Vec<Member<P>> {
        self.formal.borrow().clone()
    }

    /// Snapshot of the outer members, dead ones included
    pub fn outer_members(&self) -> Vec<Member<P>> {
        self.outer.borrow().clone()
    }

    pub fn is_formal_member(&self, member: &Member<P>) -> bool {
        self.formal.borrow().contains(member)
    }

    pub fn is_outer_member(&self, member: &Member<P>) -> bool {
        self.outer.borrow().contains(member)
    }

    pub fn has_formal_controller(&self, controller: &Controller<P>) -> bool {
        self.formal
            .borrow()
            .iter()
            .any(|member| member.refers_to(controller))
    }

    /// Every live member within `scope`, formal members first, paired with
    /// its resolved controller. Dead members are removed from the team in
    /// the same pass.
    pub fn live_members(&self, scope: MemberScope) -> Vec<(Member<P>, Controller<P>)> {
        let mut live = Vec::new();
        if scope.includes_formal() {
            Self::collect_live(&mut self.formal.borrow_mut(), &mut live);
        }
        if scope.includes_outer() {
            Self::collect_live(&mut self.outer.borrow_mut(), &mut live);
        }
        live
    }

    fn collect_live(members: &mut Vec<Member<P>>, live: &mut Vec<(Member<P>, Controller<P>)>) {
        members.retain(|member| match member.controller() {
            Some(controller) => {
                live.push((member.clone(), controller));
                true
            }
            None => {
                debug!("Pruning dead team member {:?}", member);
                false
            }
        });
    }

    pub(crate) fn add_formal_member(&self, member: Member<P>) {
        if let Some(listener) = self.listener.borrow().as_ref() {
            if let Some(controller) = member.controller() {
                controller.set_transition_listener(listener.clone());
            }
        }
        self.formal.borrow_mut().push(member);
    }

    pub(crate) fn add_outer_member(&self, member: Member<P>) {
        self.outer.borrow_mut().push(member);
    }

    /// Adds `states` to the member referencing `controller`. Returns true only
    /// if the member exists and tracked none of `states` before.
    pub(crate) fn add_member_states(
        &self,
        controller: &Controller<P>,
        states: StateFlags,
        scope: MemberScope,
    ) -> bool {
        let mut success = false;
        if scope.includes_formal() {
            success |= Self::add_states_in(&mut self.formal.borrow_mut(), controller, states);
        }
        if scope.includes_outer() {
            success |= Self::add_states_in(&mut self.outer.borrow_mut(), controller, states);
        }
        success
    }

    fn add_states_in(members: &mut Vec<Member<P>>, controller: &Controller<P>, states: StateFlags) -> bool {
        members.retain(Member::is_alive);
        match members.iter_mut().find(|member| member.refers_to(controller)) {
            Some(member) => member.add_states(states),
            None => false,
        }
    }

    /// Removes the member referencing `controller`, or only `states` of it
    /// when given. A member left without states is removed entirely.
    pub(crate) fn delete_member(
        &self,
        controller: &Controller<P>,
        states: Option<StateFlags>,
        scope: MemberScope,
    ) -> bool {
        let mut success = false;
        if scope.includes_formal() {
            success |= Self::delete_in(&mut self.formal.borrow_mut(), controller, states);
        }
        if scope.includes_outer() {
            success |= Self::delete_in(&mut self.outer.borrow_mut(), controller, states);
        }
        success
    }

    fn delete_in(members: &mut Vec<Member<P>>, controller: &Controller<P>, states: Option<StateFlags>) -> bool {
        members.retain(Member::is_alive);
        let index = match members.iter().position(|member| member.refers_to(controller)) {
            Some(index) => index,
            None => return false,
        };

        let emptied = match states {
            Some(states) => members[index].remove_states(states),
            None => true,
        };
        if emptied {
            members.remove(index);
        }
        true
    }

    // Ticks & messages

    pub fn update(&self, delta_time: u64, param: &P) {
        for (member, controller) in self.live_members(MemberScope::ALL) {
            controller.update_active_states(member.states(), delta_time, param);
        }
    }

    /// Routes `message` to the members within `scope`, formal before outer.
    /// Does not recycle the message.
    pub fn dispatch_message(&self, message: &mut Message<P>, policy: DispatchPolicy, scope: MemberScope) -> bool {
        let mut handled = false;
        if scope.includes_formal() {
            handled |= Self::dispatch_to(self.live_members(MemberScope::FORMAL), message, policy);
            if handled && policy.stops_on_handled() {
                return true;
            }
        }
        if scope.includes_outer() {
            handled |= Self::dispatch_to(self.live_members(MemberScope::OUTER), message, policy);
        }
        handled
    }

    fn dispatch_to(
        members: Vec<(Member<P>, Controller<P>)>,
        message: &mut Message<P>,
        policy: DispatchPolicy,
    ) -> bool {
        let mut handled = false;
        for (member, controller) in members {
            message.mark_from_team();
            let consumed = controller.route_message(member.states(), message, policy);
            handled |= consumed;
            if consumed && policy.stops_on_handled() {
                break;
            }
        }
        handled
    }

    // Propagation

    /// Fires the team callback if the trigger's controller is a formal member
    /// tracking the changed state. Returns whether it fired.
    pub(crate) fn on_transition(&self, trigger: &Trigger<P>) -> bool {
        if !self.tracks(trigger.controller(), trigger.flag()) {
            return false;
        }

        match trigger.kind() {
            TransitionKind::Enter => self.callback.on_team_enter(self, trigger),
            TransitionKind::Exit => self.callback.on_team_exit(self, trigger),
            TransitionKind::Reenter => self.callback.on_team_reenter(self, trigger),
        }
        true
    }

    fn tracks(&self, controller: &ControllerHandle<P>, flag: StateFlags) -> bool {
        self.formal.borrow().iter().any(|member| {
            member.is_alive() && member.handle().ptr_eq(controller) && intersects(member.states(), flag)
        })
    }
}

impl<P> fmt::Debug for Team<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Team")
            .field("key", &self.key.get())
            .field("formal_members", &self.formal.borrow())
            .field("outer_members", &self.outer.borrow())
            .finish()
    }
}
