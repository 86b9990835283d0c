use thiserror::Error;

/// A bitmask where every set bit identifies one orthogonal state.
/// Several bits may be set at once: an entity can be in multiple states.
pub type StateFlags = u32;

/// Errors that can occur when validating state flags
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    /// Zero was passed where at least one state bit is required
    #[error("State flags must be positive (at least one bit set), got {flags}")]
    ZeroFlags { flags: StateFlags },
}

/// Returns `flags` unchanged if at least one bit is set
pub fn validate_flags(flags: StateFlags) -> Result<StateFlags, FlagError> {
    if flags == 0 {
        return Err(FlagError::ZeroFlags { flags });
    }
    Ok(flags)
}

/// Returns whether `a` and `b` share at least one bit
/// intersects(0b011, 0b110) will return true
/// intersects(0b001, 0b010) will return false
pub fn intersects(a: StateFlags, b: StateFlags) -> bool {
    a & b != 0
}

/// Returns whether every bit of `sub` is also set in `sup`
/// is_subset(0b010, 0b110) will return true
/// is_subset(0, anything) will return true
pub fn is_subset(sub: StateFlags, sup: StateFlags) -> bool {
    sub & sup == sub
}

/// Returns whether `sup` contains every bit of `sub`
pub fn is_superset(sup: StateFlags, sub: StateFlags) -> bool {
    is_subset(sub, sup)
}

/// Bits set in `a` but not in `b`
pub fn difference(a: StateFlags, b: StateFlags) -> StateFlags {
    a & !b
}

/// The lowest set bit of `flags`, if any
pub fn lowest_bit(flags: StateFlags) -> Option<StateFlags> {
    if flags == 0 {
        None
    } else {
        Some(flags & flags.wrapping_neg())
    }
}

/// Number of distinct states encoded in `flags`
pub fn bit_count(flags: StateFlags) -> u32 {
    flags.count_ones()
}

/// Iterates the single-bit flags contained in `flags`, lowest bit first
pub fn single_bits(flags: StateFlags) -> SingleBits {
    SingleBits { remaining: flags }
}

// SingleBits
pub struct SingleBits {
    remaining: StateFlags,
}

impl Iterator for SingleBits {
    type Item = StateFlags;

    fn next(&mut self) -> Option<Self::Item> {
        let bit = lowest_bit(self.remaining)?;
        self.remaining &= !bit;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = bit_count(self.remaining) as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for SingleBits {}
