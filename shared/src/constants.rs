/// Capacity of a controller's transition history unless configured otherwise
pub const DEFAULT_MAX_HISTORY: usize = 10;

/// Number of idle messages a pool keeps unless configured otherwise
pub const DEFAULT_MAX_POOLED_MESSAGES: usize = 50;
