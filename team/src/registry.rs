use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::{Rc, Weak},
};

use log::{info, trace, warn};

use troupe_controller::{Controller, TransitionListener, Trigger};
use troupe_shared::{validate_flags, DispatchPolicy, MemberScope, Message, StateFlags};

use crate::{CooperativeCallback, Member, Team, TeamCallback, TeamError, TeamKey};

// RegistryInner

struct RegistryInner<P> {
    teams: RefCell<BTreeMap<TeamKey, Rc<Team<P>>>>,
    last_key: Cell<u32>,
}

impl<P> RegistryInner<P> {
    /// Snapshot so that callbacks may register or unregister teams while the
    /// registry is being walked
    fn teams(&self) -> Vec<Rc<Team<P>>> {
        self.teams.borrow().values().cloned().collect()
    }
}

impl<P: Clone + 'static> TransitionListener<P> for RegistryInner<P> {
    fn on_state_transition(&self, trigger: &Trigger<P>) {
        for team in self.teams() {
            if !team.is_registered() {
                continue;
            }
            if team.on_transition(trigger) {
                trace!("Team {:?} handled {:?}", team.key(), trigger);
            }
        }
    }
}

// TeamRegistry

/// Owns every registered [`Team`], keyed by a [`TeamKey`] that is assigned
/// once and never reused.
///
/// Controllers that are formal members of a registered team report their
/// transitions here; the registry hands each report to the teams that track
/// the changed state. Cloning the registry yields another handle to the same
/// set of teams.
pub struct TeamRegistry<P> {
    inner: Rc<RegistryInner<P>>,
}

impl<P: Clone + 'static> TeamRegistry<P> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RegistryInner {
                teams: RefCell::new(BTreeMap::new()),
                last_key: Cell::new(0),
            }),
        }
    }

    fn listener(&self) -> Weak<dyn TransitionListener<P>> {
        let inner: Weak<RegistryInner<P>> = Rc::downgrade(&self.inner);
        inner
    }

    // Registration

    /// Registers a prepared team and binds its formal members' controllers
    /// to this registry
    pub fn register(&self, team: Team<P>) -> TeamKey {
        let next = self.inner.last_key.get() + 1;
        self.inner.last_key.set(next);
        let key = TeamKey::new(next);

        if team.live_members(MemberScope::FORMAL).is_empty() {
            warn!("Registering team {:?} whose formal members are all dead", key);
        }

        team.attach(key, self.listener());
        self.inner.teams.borrow_mut().insert(key, Rc::new(team));
        info!("Registered team {:?}", key);
        key
    }

    pub fn register_team(
        &self,
        formal: Vec<Member<P>>,
        outer: Vec<Member<P>>,
        callback: impl TeamCallback<P> + 'static,
    ) -> Result<TeamKey, TeamError> {
        let team = Team::new(formal, outer, callback)?;
        Ok(self.register(team))
    }

    /// Registers a team using [`CooperativeCallback`]
    pub fn register_default_team(&self, formal: Vec<Member<P>>, outer: Vec<Member<P>>) -> Result<TeamKey, TeamError> {
        self.register_team(formal, outer, CooperativeCallback)
    }

    pub fn unregister_team(&self, key: &TeamKey) -> bool {
        let team = match self.inner.teams.borrow_mut().remove(key) {
            Some(team) => team,
            None => return false,
        };

        for controller in team.detach() {
            self.release_if_unused(&controller);
        }
        info!("Unregistered team {:?}", key);
        true
    }

    /// Unregisters `team` if it is registered here
    pub fn unregister_team_instance(&self, team: &Rc<Team<P>>) -> bool {
        let key = match team.key() {
            Some(key) => key,
            None => return false,
        };
        let registered_here = self
            .inner
            .teams
            .borrow()
            .get(&key)
            .map(|registered| Rc::ptr_eq(registered, team))
            .unwrap_or(false);

        registered_here && self.unregister_team(&key)
    }

    pub fn unregister_all(&self) {
        let teams = std::mem::take(&mut *self.inner.teams.borrow_mut());
        let listener = self.listener();
        for (_, team) in teams {
            for controller in team.detach() {
                controller.release_transition_listener(&listener);
            }
        }
        info!("Unregistered all teams");
    }

    /// Unbinds `controller` unless another team here still has it as a
    /// formal member
    fn release_if_unused(&self, controller: &Controller<P>) {
        let still_formal = self
            .inner
            .teams
            .borrow()
            .values()
            .any(|team| team.has_formal_controller(controller));
        if !still_formal {
            controller.release_transition_listener(&self.listener());
        }
    }

    // Lookup

    pub fn team(&self, key: &TeamKey) -> Option<Rc<Team<P>>> {
        self.inner.teams.borrow().get(key).cloned()
    }

    pub fn has_team(&self, key: &TeamKey) -> bool {
        self.inner.teams.borrow().contains_key(key)
    }

    pub fn team_count(&self) -> usize {
        self.inner.teams.borrow().len()
    }

    /// Registered keys, ascending
    pub fn team_keys(&self) -> Vec<TeamKey> {
        self.inner.teams.borrow().keys().copied().collect()
    }

    /// Whether `member` is a formal member of any registered team
    pub fn is_formal_member(&self, member: &Member<P>) -> bool {
        self.inner
            .teams
            .borrow()
            .values()
            .any(|team| team.is_formal_member(member))
    }

    /// Whether `member` is an outer member of any registered team
    pub fn is_outer_member(&self, member: &Member<P>) -> bool {
        self.inner
            .teams
            .borrow()
            .values()
            .any(|team| team.is_outer_member(member))
    }

    pub fn teams_as_formal(&self, member: &Member<P>) -> Vec<TeamKey> {
        self.teams_of_scoped(member, MemberScope::FORMAL)
    }

    pub fn teams_as_outer(&self, member: &Member<P>) -> Vec<TeamKey> {
        self.teams_of_scoped(member, MemberScope::OUTER)
    }

    /// Teams where `member` is either a formal or an outer member
    pub fn teams_of(&self, member: &Member<P>) -> Vec<TeamKey> {
        self.teams_of_scoped(member, MemberScope::ALL)
    }

    fn teams_of_scoped(&self, member: &Member<P>, scope: MemberScope) -> Vec<TeamKey> {
        self.inner
            .teams
            .borrow()
            .iter()
            .filter(|(_, team)| {
                (scope.includes_formal() && team.is_formal_member(member))
                    || (scope.includes_outer() && team.is_outer_member(member))
            })
            .map(|(key, _)| *key)
            .collect()
    }

    // Members

    pub fn add_formal_member(&self, key: &TeamKey, member: Member<P>) -> bool {
        match self.team(key) {
            Some(team) => {
                team.add_formal_member(member);
                true
            }
            None => false,
        }
    }

    pub fn add_outer_member(&self, key: &TeamKey, member: Member<P>) -> bool {
        match self.team(key) {
            Some(team) => {
                team.add_outer_member(member);
                true
            }
            None => false,
        }
    }

    /// Widens the formal member referencing `controller`. `Ok(true)` only if
    /// none of `states` was tracked for it before.
    pub fn add_formal_member_states(
        &self,
        key: &TeamKey,
        controller: &Controller<P>,
        states: StateFlags,
    ) -> Result<bool, TeamError> {
        self.add_member_states(key, controller, states, MemberScope::FORMAL)
    }

    pub fn add_outer_member_states(
        &self,
        key: &TeamKey,
        controller: &Controller<P>,
        states: StateFlags,
    ) -> Result<bool, TeamError> {
        self.add_member_states(key, controller, states, MemberScope::OUTER)
    }

    fn add_member_states(
        &self,
        key: &TeamKey,
        controller: &Controller<P>,
        states: StateFlags,
        scope: MemberScope,
    ) -> Result<bool, TeamError> {
        validate_flags(states)?;
        match self.team(key) {
            Some(team) => Ok(team.add_member_states(controller, states, scope)),
            None => Ok(false),
        }
    }

    pub fn delete_formal_member(&self, key: &TeamKey, controller: &Controller<P>) -> bool {
        self.delete_scoped(key, controller, None, MemberScope::FORMAL)
    }

    pub fn delete_outer_member(&self, key: &TeamKey, controller: &Controller<P>) -> bool {
        self.delete_scoped(key, controller, None, MemberScope::OUTER)
    }

    /// Removes `controller` from both member lists of the team
    pub fn delete_member(&self, key: &TeamKey, controller: &Controller<P>) -> bool {
        self.delete_scoped(key, controller, None, MemberScope::ALL)
    }

    /// Stops tracking `states` for the formal member referencing
    /// `controller`; the member goes away once it tracks nothing
    pub fn delete_formal_member_states(
        &self,
        key: &TeamKey,
        controller: &Controller<P>,
        states: StateFlags,
    ) -> Result<bool, TeamError> {
        validate_flags(states)?;
        Ok(self.delete_scoped(key, controller, Some(states), MemberScope::FORMAL))
    }

    pub fn delete_outer_member_states(
        &self,
        key: &TeamKey,
        controller: &Controller<P>,
        states: StateFlags,
    ) -> Result<bool, TeamError> {
        validate_flags(states)?;
        Ok(self.delete_scoped(key, controller, Some(states), MemberScope::OUTER))
    }

    pub fn delete_member_states(
        &self,
        key: &TeamKey,
        controller: &Controller<P>,
        states: StateFlags,
    ) -> Result<bool, TeamError> {
        validate_flags(states)?;
        Ok(self.delete_scoped(key, controller, Some(states), MemberScope::ALL))
    }

    fn delete_scoped(
        &self,
        key: &TeamKey,
        controller: &Controller<P>,
        states: Option<StateFlags>,
        scope: MemberScope,
    ) -> bool {
        let team = match self.team(key) {
            Some(team) => team,
            None => return false,
        };

        let deleted = team.delete_member(controller, states, scope);
        if deleted && scope.includes_formal() {
            self.release_if_unused(controller);
        }
        deleted
    }

    // Ticks & messages

    /// Ticks one team. Returns whether the team exists.
    pub fn update(&self, key: &TeamKey, delta_time: u64, param: &P) -> bool {
        match self.team(key) {
            Some(team) => {
                team.update(delta_time, param);
                true
            }
            None => false,
        }
    }

    /// Ticks every team in ascending key order
    pub fn update_all(&self, delta_time: u64, param: &P) {
        for team in self.inner.teams() {
            team.update(delta_time, param);
        }
    }

    /// Routes `message` into one team and recycles it afterwards, whether
    /// or not the team exists
    pub fn dispatch_message(
        &self,
        key: &TeamKey,
        mut message: Message<P>,
        policy: DispatchPolicy,
        scope: MemberScope,
    ) -> bool {
        let handled = match self.team(key) {
            Some(team) => team.dispatch_message(&mut message, policy, scope),
            None => false,
        };
        message.recycle();
        handled
    }

    /// Routes `message` through every team in ascending key order and
    /// recycles it afterwards. Under [`DispatchPolicy::Consume`] the first
    /// team that handles it ends the walk.
    pub fn dispatch_message_all(&self, mut message: Message<P>, policy: DispatchPolicy, scope: MemberScope) -> bool {
        let mut handled = false;
        for team in self.inner.teams() {
            handled |= team.dispatch_message(&mut message, policy, scope);
            if handled && policy.stops_on_handled() {
                break;
            }
        }
        message.recycle();
        handled
    }
}

impl<P> Clone for TeamRegistry<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P: Clone + 'static> Default for TeamRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}
