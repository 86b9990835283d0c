use std::collections::VecDeque;

use troupe_shared::StateFlags;

// StateHistory

/// Bounded stack of the active bitmasks a controller held before each
/// transition. Behaves like a ring buffer: pushing onto a full history
/// discards the oldest entry.
pub struct StateHistory {
    entries: VecDeque<StateFlags>,
    capacity: usize,
    enabled: bool,
}

impl StateHistory {
    pub fn new(capacity: usize, enabled: bool) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            enabled,
        }
    }

    pub fn record(&mut self, previous: StateFlags) {
        if !self.enabled || self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(previous);
    }

    pub fn pop(&mut self) -> Option<StateFlags> {
        if !self.enabled {
            return None;
        }
        self.entries.pop_back()
    }

    pub fn peek(&self) -> Option<StateFlags> {
        self.entries.back().copied()
    }

    /// Disabling clears every recorded entry
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.entries.clear();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Shrinking drops the oldest entries first
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.entries.len() > capacity {
            self.entries.pop_front();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
