use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, HashMap},
    fmt,
    rc::{Rc, Weak},
};

use log::{debug, trace, warn};

use troupe_shared::{
    difference, intersects, lowest_bit, single_bits, validate_flags, DispatchPolicy, Message,
    ParameterMerger, ReplaceMerger, StateFlags,
};

use crate::{
    ControllerConfig, ControllerError, State, StateContext, StateFactory, StateHistory, StateRef,
    SuppressGuard, TransitionKind, TransitionListener, Trigger,
};

// StateLayer

/// One set of live states plus the bitmask they make up
struct StateLayer<P> {
    flags: StateFlags,
    states: BTreeMap<StateFlags, StateRef<P>>,
}

impl<P> StateLayer<P> {
    fn new() -> Self {
        Self {
            flags: 0,
            states: BTreeMap::new(),
        }
    }

    fn states_in(&self, mask: StateFlags) -> Vec<(StateFlags, StateRef<P>)> {
        self.states
            .iter()
            .filter(|(flag, _)| intersects(**flag, mask))
            .map(|(flag, state)| (*flag, state.clone()))
            .collect()
    }

    fn insert(&mut self, created: Vec<(StateFlags, StateRef<P>)>) -> Vec<(StateFlags, StateRef<P>)> {
        for (flag, state) in &created {
            self.flags |= *flag;
            self.states.insert(*flag, state.clone());
        }
        created
    }

    fn take(&mut self, mask: StateFlags) -> Vec<(StateFlags, StateRef<P>)> {
        let mut removed = Vec::new();
        for flag in single_bits(mask & self.flags) {
            if let Some(state) = self.states.remove(&flag) {
                removed.push((flag, state));
            }
        }
        self.flags &= !mask;
        removed
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Layer {
    Regular,
    Global,
}

/// The hooks a transition still has to run once the core is released
struct Transition<P> {
    exited: Vec<(StateFlags, StateRef<P>)>,
    entered: Vec<(StateFlags, StateRef<P>)>,
    reentered: Vec<(StateFlags, StateRef<P>)>,
    param: P,
}

impl<P> Transition<P> {
    fn reenter(reentered: Vec<(StateFlags, StateRef<P>)>, param: P) -> Self {
        Self {
            exited: Vec::new(),
            entered: Vec::new(),
            reentered,
            param,
        }
    }

    fn exit(exited: Vec<(StateFlags, StateRef<P>)>, param: P) -> Self {
        Self {
            exited,
            entered: Vec::new(),
            reentered: Vec::new(),
            param,
        }
    }
}

// ControllerCore

struct ControllerCore<P> {
    regular: StateLayer<P>,
    global: StateLayer<P>,
    history: StateHistory,
    locked_events: HashMap<i32, bool>,
    share_param: P,
    state_param: P,
    factory: Box<dyn StateFactory<P>>,
    merger: Box<dyn ParameterMerger<P>>,
}

impl<P: Clone> ControllerCore<P> {
    fn layer(&self, layer: Layer) -> &StateLayer<P> {
        match layer {
            Layer::Regular => &self.regular,
            Layer::Global => &self.global,
        }
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut StateLayer<P> {
        match layer {
            Layer::Regular => &mut self.regular,
            Layer::Global => &mut self.global,
        }
    }

    fn merged_param(&self, extra: Option<P>) -> P {
        let supplied = extra.unwrap_or_else(|| self.share_param.clone());
        self.merger.merge(&self.state_param, &supplied)
    }

    /// Builds every requested state up front so an unknown flag aborts the
    /// transition before anything changes
    fn create_states(
        &self,
        flags: StateFlags,
        param: &P,
    ) -> Result<Vec<(StateFlags, StateRef<P>)>, ControllerError> {
        single_bits(flags)
            .map(|flag| {
                self.factory
                    .create_state(flag, param)
                    .map(|state| (flag, Rc::new(RefCell::new(state))))
                    .ok_or(ControllerError::UnknownState { flag })
            })
            .collect()
    }

    /// Moves `layer` to exactly `target`. A bit lives in one layer at a time:
    /// the regular layer leaves bits held by the global one alone, and the
    /// global layer takes over live regular states it is asked to hold.
    fn retarget(
        &mut self,
        layer: Layer,
        target: StateFlags,
        param: P,
        reenter_shared: bool,
    ) -> Result<Transition<P>, ControllerError> {
        let (target, adopt) = match layer {
            Layer::Regular => (difference(target, self.global.flags), 0),
            Layer::Global => (target, target & self.regular.flags),
        };
        let current = self.layer(layer).flags;
        let created = self.create_states(difference(target, current | adopt), &param)?;

        let exited = self.layer_mut(layer).take(difference(current, target));
        let mut reentered = if reenter_shared {
            self.layer(layer).states_in(current & target)
        } else {
            Vec::new()
        };
        if adopt != 0 {
            let adopted = self.regular.take(adopt);
            let adopted = self.global.insert(adopted);
            if reenter_shared {
                reentered.extend(adopted);
                reentered.sort_by_key(|(flag, _)| *flag);
            }
        }
        let entered = self.layer_mut(layer).insert(created);

        Ok(Transition {
            exited,
            entered,
            reentered,
            param,
        })
    }
}

// ControllerInner

struct ControllerInner<P> {
    core: RefCell<ControllerCore<P>>,
    team_enabled: Cell<bool>,
    suppressed: Cell<u32>,
    listener: RefCell<Option<Weak<dyn TransitionListener<P>>>>,
}

// Controller

/// Owns a multi-state bitmask and the live states behind it.
///
/// `Controller` is a cheap, clonable handle; the controller lives as long as
/// any strong handle does. Teams only ever hold a [`ControllerHandle`].
///
/// Every method takes `&self` and no internal borrow is held while state
/// hooks or the transition listener run, so hooks may freely call back into
/// this or any other controller.
pub struct Controller<P> {
    inner: Rc<ControllerInner<P>>,
}

impl<P: Clone + Default + 'static> Controller<P> {
    pub fn new(factory: impl StateFactory<P> + 'static) -> Self {
        Self::with_config(factory, ControllerConfig::default())
    }

    pub fn with_config(factory: impl StateFactory<P> + 'static, config: ControllerConfig) -> Self {
        let core = ControllerCore {
            regular: StateLayer::new(),
            global: StateLayer::new(),
            history: StateHistory::new(config.max_history, config.history_enabled),
            locked_events: HashMap::new(),
            share_param: P::default(),
            state_param: P::default(),
            factory: Box::new(factory),
            merger: Box::new(ReplaceMerger),
        };

        Self {
            inner: Rc::new(ControllerInner {
                core: RefCell::new(core),
                team_enabled: Cell::new(config.team_enabled),
                suppressed: Cell::new(0),
                listener: RefCell::new(None),
            }),
        }
    }
}

impl<P: Clone + 'static> Controller<P> {
    // Transitions

    /// Enters every requested state that is not active yet in either layer.
    /// If all of them already are, they are reentered instead. Returns whether
    /// any state was newly entered.
    pub fn try_add_state(&self, flags: StateFlags, extra: Option<P>) -> Result<bool, ControllerError> {
        validate_flags(flags)?;

        let (transition, global, added) = {
            let mut core = self.inner.core.borrow_mut();
            let param = core.merged_param(extra);
            let fresh = difference(flags, core.regular.flags | core.global.flags);

            if fresh == 0 {
                core.state_param = param.clone();
                let global = Transition::reenter(core.global.states_in(flags), param.clone());
                let regular = Transition::reenter(core.regular.states_in(flags), param);
                (regular, Some(global), false)
            } else {
                let created = core.create_states(fresh, &param)?;
                core.state_param = param.clone();
                let previous = core.regular.flags;
                core.history.record(previous);
                let entered = core.regular.insert(created);
                let transition = Transition {
                    exited: Vec::new(),
                    entered,
                    reentered: Vec::new(),
                    param,
                };
                (transition, None, true)
            }
        };

        self.run(Layer::Regular, transition);
        if let Some(global) = global {
            self.run(Layer::Global, global);
        }
        Ok(added)
    }

    /// Panics if `flags` is zero or unknown to the factory
    pub fn add_state(&self, flags: StateFlags, extra: Option<P>) -> bool {
        self.try_add_state(flags, extra)
            .unwrap_or_else(|err| panic!("add_state({:#x}) failed: {}", flags, err))
    }

    /// Exits every requested state that is active. Returns whether any was.
    pub fn try_remove_state(&self, flags: StateFlags, extra: Option<P>) -> Result<bool, ControllerError> {
        validate_flags(flags)?;

        let transition = {
            let mut core = self.inner.core.borrow_mut();
            let leaving = flags & core.regular.flags;
            if leaving == 0 {
                return Ok(false);
            }
            let param = core.merged_param(extra);
            core.state_param = param.clone();
            let previous = core.regular.flags;
            core.history.record(previous);
            Transition::exit(core.regular.take(leaving), param)
        };

        self.run(Layer::Regular, transition);
        Ok(true)
    }

    /// Panics if `flags` is zero
    pub fn remove_state(&self, flags: StateFlags, extra: Option<P>) -> bool {
        self.try_remove_state(flags, extra)
            .unwrap_or_else(|err| panic!("remove_state({:#x}) failed: {}", flags, err))
    }

    /// Makes `flags` the exact set of active regular states. States outside
    /// it exit, missing ones enter and the overlap is reentered. Bits held by
    /// the global layer are left untouched.
    pub fn try_set_state(&self, flags: StateFlags, extra: Option<P>) -> Result<(), ControllerError> {
        validate_flags(flags)?;

        let transition = {
            let mut core = self.inner.core.borrow_mut();
            let param = core.merged_param(extra);
            let previous = core.regular.flags;
            let transition = core.retarget(Layer::Regular, flags, param.clone(), true)?;
            core.state_param = param;
            core.history.record(previous);
            transition
        };

        self.run(Layer::Regular, transition);
        Ok(())
    }

    /// Panics if `flags` is zero or unknown to the factory
    pub fn set_state(&self, flags: StateFlags, extra: Option<P>) {
        self.try_set_state(flags, extra)
            .unwrap_or_else(|err| panic!("set_state({:#x}) failed: {}", flags, err))
    }

    /// Exits every regular state. Returns whether any was active.
    pub fn clear_state(&self, extra: Option<P>) -> bool {
        let transition = {
            let mut core = self.inner.core.borrow_mut();
            let previous = core.regular.flags;
            if previous == 0 {
                return false;
            }
            let param = core.merged_param(extra);
            core.state_param = param.clone();
            core.history.record(previous);
            Transition::exit(core.regular.take(previous), param)
        };

        self.run(Layer::Regular, transition);
        true
    }

    /// Restores the bitmask held before the latest recorded transition. The
    /// revert itself is not recorded.
    pub fn try_revert_to_previous_state(&self) -> Result<bool, ControllerError> {
        let transition = {
            let mut core = self.inner.core.borrow_mut();
            let target = match core.history.pop() {
                Some(target) => target,
                None => return Ok(false),
            };
            let param = core.state_param.clone();
            match core.retarget(Layer::Regular, target, param, false) {
                Ok(transition) => transition,
                Err(err) => {
                    core.history.record(target);
                    return Err(err);
                }
            }
        };

        debug!("Reverting controller to {:#x}", self.state_flags());
        self.run(Layer::Regular, transition);
        Ok(true)
    }

    /// Returns false, changing nothing, when the history is empty or disabled
    pub fn revert_to_previous_state(&self) -> bool {
        self.try_revert_to_previous_state()
            .unwrap_or_else(|err| panic!("revert_to_previous_state() failed: {}", err))
    }

    /// Makes `flags` the exact set of global states: states that count as
    /// active regardless of regular transitions. Active regular states inside
    /// `flags` move to the global layer and are reentered. Global transitions
    /// are not recorded and not reported to teams.
    pub fn try_set_global_state(&self, flags: StateFlags, extra: Option<P>) -> Result<(), ControllerError> {
        validate_flags(flags)?;

        let transition = {
            let mut core = self.inner.core.borrow_mut();
            let param = core.merged_param(extra);
            let transition = core.retarget(Layer::Global, flags, param.clone(), true)?;
            core.state_param = param;
            transition
        };

        self.run(Layer::Global, transition);
        Ok(())
    }

    /// Panics if `flags` is zero or unknown to the factory
    pub fn set_global_state(&self, flags: StateFlags, extra: Option<P>) {
        self.try_set_global_state(flags, extra)
            .unwrap_or_else(|err| panic!("set_global_state({:#x}) failed: {}", flags, err))
    }

    /// Exits every global state. Returns whether any was active.
    pub fn clear_global_state(&self) -> bool {
        let transition = {
            let mut core = self.inner.core.borrow_mut();
            let previous = core.global.flags;
            if previous == 0 {
                return false;
            }
            let param = core.state_param.clone();
            Transition::exit(core.global.take(previous), param)
        };

        self.run(Layer::Global, transition);
        true
    }

    // Queries

    /// Active regular states
    pub fn state_flags(&self) -> StateFlags {
        self.inner.core.borrow().regular.flags
    }

    pub fn global_state_flags(&self) -> StateFlags {
        self.inner.core.borrow().global.flags
    }

    /// Whether the full active bitmask, global layer included, equals `flags`
    pub fn is_in_state(&self, flags: StateFlags) -> bool {
        let core = self.inner.core.borrow();
        core.regular.flags | core.global.flags == flags
    }

    /// Whether any of `flags` is active in either layer
    pub fn has_state(&self, flags: StateFlags) -> bool {
        let core = self.inner.core.borrow();
        intersects(core.regular.flags | core.global.flags, flags)
    }

    /// Active regular flags, lowest bit first
    pub fn current_states(&self) -> Vec<StateFlags> {
        single_bits(self.state_flags()).collect()
    }

    /// Lowest active regular flag
    pub fn current_state(&self) -> Option<StateFlags> {
        lowest_bit(self.state_flags())
    }

    /// The live state bound to `flag`, looking at the regular layer first
    pub fn state(&self, flag: StateFlags) -> Option<StateRef<P>> {
        let core = self.inner.core.borrow();
        core.regular
            .states
            .get(&flag)
            .or_else(|| core.global.states.get(&flag))
            .cloned()
    }

    // Parameters

    /// The parameter merged in when a transition supplies none
    pub fn set_share_state_param(&self, param: P) {
        self.inner.core.borrow_mut().share_param = param;
    }

    pub fn share_state_param(&self) -> P {
        self.inner.core.borrow().share_param.clone()
    }

    /// The parameter states most recently received
    pub fn state_param(&self) -> P {
        self.inner.core.borrow().state_param.clone()
    }

    pub fn set_parameter_merger(&self, merger: impl ParameterMerger<P> + 'static) {
        self.inner.core.borrow_mut().merger = Box::new(merger);
    }

    pub fn set_state_factory(&self, factory: impl StateFactory<P> + 'static) {
        self.inner.core.borrow_mut().factory = Box::new(factory);
    }

    /// Merges `param` and lets every active state know about it
    pub fn notify_state_update(&self, param: P) {
        let (targets, merged) = {
            let mut core = self.inner.core.borrow_mut();
            let merged = core.merged_param(Some(param));
            core.state_param = merged.clone();
            (Self::active_in(&core, StateFlags::MAX), merged)
        };

        for (flag, state) in &targets {
            self.invoke(*flag, state, &merged, false, |state, ctx| state.on_param_update(ctx));
        }
    }

    // History

    pub fn set_max_history(&self, max: usize) {
        self.inner.core.borrow_mut().history.set_capacity(max);
    }

    /// Disabling also clears the recorded history
    pub fn set_history_enabled(&self, enabled: bool) {
        self.inner.core.borrow_mut().history.set_enabled(enabled);
    }

    pub fn is_history_enabled(&self) -> bool {
        self.inner.core.borrow().history.is_enabled()
    }

    pub fn history_len(&self) -> usize {
        self.inner.core.borrow().history.len()
    }

    pub fn clear_history(&self) {
        self.inner.core.borrow_mut().history.clear();
    }

    // Event locks

    /// Returns whether the key was unlocked before
    pub fn lock_event(&self, key: i32) -> bool {
        let mut core = self.inner.core.borrow_mut();
        let previous = core.locked_events.insert(key, true);
        previous != Some(true)
    }

    /// Returns whether the key was locked before
    pub fn unlock_event(&self, key: i32) -> bool {
        let mut core = self.inner.core.borrow_mut();
        let previous = core.locked_events.insert(key, false);
        previous == Some(true)
    }

    pub fn is_locked_event(&self, key: i32) -> bool {
        let core = self.inner.core.borrow();
        core.locked_events.get(&key).copied().unwrap_or(false)
    }

    // Ticks & messages

    /// Delivers one external tick to the active states intersecting `mask`
    pub fn update_active_states(&self, mask: StateFlags, delta_time: u64, param: &P) {
        let targets = Self::active_in(&self.inner.core.borrow(), mask);

        for (flag, state) in &targets {
            self.invoke(*flag, state, param, false, |state, ctx| {
                state.on_update(delta_time, ctx)
            });
        }
    }

    /// Routes `message` to the active states intersecting `mask`, then
    /// recycles it
    pub fn dispatch_message(&self, mask: StateFlags, message: Message<P>, policy: DispatchPolicy) -> bool {
        let handled = self.route_message(mask, &message, policy);
        message.recycle();
        handled
    }

    /// Routes `message` without recycling it, for callers that deliver one
    /// message to several controllers
    pub fn route_message(&self, mask: StateFlags, message: &Message<P>, policy: DispatchPolicy) -> bool {
        let (targets, param) = {
            let core = self.inner.core.borrow();
            (Self::active_in(&core, mask), core.state_param.clone())
        };

        let mut handled = false;
        for (flag, state) in &targets {
            let consumed = self
                .invoke(*flag, state, &param, message.is_from_team(), |state, ctx| {
                    state.handle_message(message, ctx)
                })
                .unwrap_or(false);
            handled |= consumed;
            if consumed && policy.stops_on_handled() {
                break;
            }
        }
        handled
    }

    // Team plumbing

    /// Delivers a transition forwarded from another team member to this
    /// controller's active states inside `flags`. Nothing enters or exits.
    pub fn notify_team_transition(&self, kind: TransitionKind, flags: StateFlags, param: &P) {
        let (targets, merged) = {
            let mut core = self.inner.core.borrow_mut();
            let merged = core.merged_param(Some(param.clone()));
            core.state_param = merged.clone();
            (Self::active_in(&core, flags), merged)
        };

        for (flag, state) in &targets {
            self.invoke(*flag, state, &merged, true, |state, ctx| {
                state.on_team_transition(kind, ctx)
            });
        }
    }

    // Internals

    fn active_in(core: &ControllerCore<P>, mask: StateFlags) -> Vec<(StateFlags, StateRef<P>)> {
        let mut targets = core.regular.states_in(mask);
        targets.extend(core.global.states_in(mask));
        targets
    }

    fn run(&self, layer: Layer, transition: Transition<P>) {
        let Transition {
            exited,
            entered,
            reentered,
            param,
        } = transition;

        for (flag, state) in &exited {
            self.invoke(*flag, state, &param, false, |state, ctx| state.on_exit(ctx));
        }
        for (flag, state) in &entered {
            self.invoke(*flag, state, &param, false, |state, ctx| state.on_enter(ctx));
        }
        for (flag, state) in &reentered {
            self.invoke(*flag, state, &param, false, |state, ctx| state.on_reenter(ctx));
        }

        if layer == Layer::Global {
            return;
        }

        for (flag, state) in &exited {
            self.report(TransitionKind::Exit, *flag, state, &param);
        }
        for (flag, state) in &entered {
            self.report(TransitionKind::Enter, *flag, state, &param);
        }
        for (flag, state) in &reentered {
            self.report(TransitionKind::Reenter, *flag, state, &param);
        }
    }

    fn invoke<R>(
        &self,
        flag: StateFlags,
        state: &StateRef<P>,
        param: &P,
        from_team: bool,
        hook: impl FnOnce(&mut dyn State<P>, &StateContext<'_, P>) -> R,
    ) -> Option<R> {
        let ctx = StateContext::new(self, flag, param, from_team);
        match state.try_borrow_mut() {
            Ok(mut state) => Some(hook(&mut **state, &ctx)),
            Err(_) => {
                warn!(
                    "State {:#x} is already running a hook, skipping the nested call",
                    flag
                );
                None
            }
        }
    }

    fn report(&self, kind: TransitionKind, flag: StateFlags, state: &StateRef<P>, param: &P) {
        if !self.dispatches_to_team() {
            return;
        }
        let listener = self.inner.listener.borrow().as_ref().and_then(Weak::upgrade);
        let listener = match listener {
            Some(listener) => listener,
            None => return,
        };

        let mutex = state.try_borrow().map(|state| state.is_mutex()).unwrap_or(false);
        let trigger = Trigger::new(self.downgrade(), flag, kind, param.clone(), mutex);
        trace!("Reporting {:?}", trigger);
        listener.on_state_transition(&trigger);
    }
}

impl<P> Controller<P> {
    pub fn downgrade(&self) -> ControllerHandle<P> {
        ControllerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether both handles refer to the same controller
    pub fn ptr_eq(&self, other: &Controller<P>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Turns reporting to the bound transition listener on or off
    pub fn set_team_enabled(&self, enabled: bool) {
        self.inner.team_enabled.set(enabled);
    }

    pub fn is_team_enabled(&self) -> bool {
        self.inner.team_enabled.get()
    }

    /// Stops this controller from reporting transitions until the returned
    /// guard is dropped. Guards nest.
    pub fn suppress_team_dispatch(&self) -> SuppressGuard<'_> {
        SuppressGuard::new(&self.inner.suppressed)
    }

    pub fn is_team_dispatch_suppressed(&self) -> bool {
        self.inner.suppressed.get() > 0
    }

    /// Whether a transition right now would be reported upward
    pub fn dispatches_to_team(&self) -> bool {
        self.is_team_enabled() && !self.is_team_dispatch_suppressed()
    }

    /// Binds the controller to the listener its transitions are reported to,
    /// replacing any previous one
    pub fn set_transition_listener(&self, listener: Weak<dyn TransitionListener<P>>) {
        *self.inner.listener.borrow_mut() = Some(listener);
    }

    pub fn clear_transition_listener(&self) {
        *self.inner.listener.borrow_mut() = None;
    }

    /// Unbinds only if currently bound to `listener`. Returns whether it was.
    pub fn release_transition_listener(&self, listener: &Weak<dyn TransitionListener<P>>) -> bool {
        let mut slot = self.inner.listener.borrow_mut();
        let bound = slot
            .as_ref()
            .map(|current| Weak::ptr_eq(current, listener))
            .unwrap_or(false);
        if bound {
            *slot = None;
        }
        bound
    }

    pub fn is_bound_to(&self, listener: &Weak<dyn TransitionListener<P>>) -> bool {
        self.inner
            .listener
            .borrow()
            .as_ref()
            .map(|current| Weak::ptr_eq(current, listener))
            .unwrap_or(false)
    }

    pub fn has_transition_listener(&self) -> bool {
        self.inner
            .listener
            .borrow()
            .as_ref()
            .map(|listener| listener.strong_count() > 0)
            .unwrap_or(false)
    }
}

impl<P> Clone for Controller<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P> fmt::Debug for Controller<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Controller");
        debug.field("ptr", &Rc::as_ptr(&self.inner));
        match self.inner.core.try_borrow() {
            Ok(core) => debug
                .field("states", &format_args!("{:#x}", core.regular.flags))
                .field("global", &format_args!("{:#x}", core.global.flags)),
            Err(_) => debug.field("states", &"<in transition>"),
        };
        debug.field("team_enabled", &self.inner.team_enabled.get()).finish()
    }
}

// ControllerHandle

/// Non-owning reference to a [`Controller`]. Resolves to `None` once every
/// strong handle is gone.
pub struct ControllerHandle<P> {
    inner: Weak<ControllerInner<P>>,
}

impl<P> ControllerHandle<P> {
    pub fn upgrade(&self) -> Option<Controller<P>> {
        self.inner.upgrade().map(|inner| Controller { inner })
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Whether this handle refers to `controller`
    pub fn refers_to(&self, controller: &Controller<P>) -> bool {
        std::ptr::eq(self.inner.as_ptr(), Rc::as_ptr(&controller.inner))
    }

    pub fn ptr_eq(&self, other: &ControllerHandle<P>) -> bool {
        self.inner.ptr_eq(&other.inner)
    }
}

impl<P> Clone for ControllerHandle<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P> fmt::Debug for ControllerHandle<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_alive() {
            write!(f, "ControllerHandle({:p})", self.inner.as_ptr())
        } else {
            write!(f, "ControllerHandle(<dead>)")
        }
    }
}
