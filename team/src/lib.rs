//! # Troupe Team
//! Groups troupe controllers into teams. A transition of a state that a team
//! tracks on one of its formal members is forwarded to the other members,
//! and team-wide messages are routed through the members' active states.
//! Members only hold weak references to their controllers.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod callback;
mod error;
mod member;
mod registry;
mod team;

pub use callback::{CooperativeCallback, TeamCallback};
pub use error::TeamError;
pub use member::Member;
pub use registry::TeamRegistry;
pub use team::{Team, TeamKey};

pub mod shared {
    pub use troupe_shared::{CooperateMethod, DispatchPolicy, MemberScope, Message, StateFlags};
}
