//! # Troupe Controller
//! A multi-state controller: any number of bit-flagged states may be active
//! at once. Provides add/remove/set/revert transitions with parameter
//! merging, a bounded transition history, a global state layer and event
//! locks, and reports every transition to a bound [`TransitionListener`].

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod config;
mod controller;
mod error;
mod guard;
mod history;
mod state;
mod transition;

pub use config::ControllerConfig;
pub use controller::{Controller, ControllerHandle};
pub use error::ControllerError;
pub use guard::SuppressGuard;
pub use history::StateHistory;
pub use state::{State, StateContext, StateFactory, StateRef};
pub use transition::{TransitionKind, TransitionListener, Trigger};

pub mod shared {
    pub use troupe_shared::{
        single_bits, validate_flags, DispatchPolicy, FlagError, Message, MessagePool,
        ParameterMerger, StateFlags,
    };
}
