use std::default::Default;

use troupe_shared::DEFAULT_MAX_HISTORY;

/// Contains Config properties which will be used by a Controller
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// How many previous state bitmasks are kept for
    /// `revert_to_previous_state`. The oldest entry is dropped once full.
    pub max_history: usize,
    /// Whether transitions are recorded into the history at all
    pub history_enabled: bool,
    /// Whether transitions are reported to the team registry the controller
    /// is bound to
    pub team_enabled: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            history_enabled: true,
            team_enabled: true,
        }
    }
}
