//! # Troupe Shared
//! Common functionality shared between troupe-controller & troupe-team crates:
//! state-flag bitmask helpers, pooled messages, dispatch policies and the
//! parameter merging contract.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod constants;
mod flags;
mod merger;
mod message;
mod policy;

pub use constants::{DEFAULT_MAX_HISTORY, DEFAULT_MAX_POOLED_MESSAGES};
pub use flags::{
    bit_count, difference, intersects, is_subset, is_superset, lowest_bit, single_bits,
    validate_flags, FlagError, SingleBits, StateFlags,
};
pub use merger::{BundleMerger, ParameterMerger, ReplaceMerger};
pub use message::{Message, MessagePool, MessagePoolConfig};
pub use policy::{
    CooperateMethod, CooperateMethodError, DispatchPolicy, MemberScope, MemberScopeError,
    PolicyError,
};
