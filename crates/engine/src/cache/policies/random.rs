//! Random replacement policy.
//!
//! Evicts a uniformly chosen line once the set is full. Uses a xorshift64
//! generator rather than a full RNG crate; the seed is injectable so a run
//! is fully reproducible for a fixed access pattern.

use super::{ReplacementPolicy, first_invalid};
use crate::cache::line::CacheLine;

/// Default xorshift seed for unseeded simulators.
const DEFAULT_SEED: u64 = 123_456_789;

/// Random policy state.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    /// xorshift64 state; never zero.
    state: u64,
}

impl RandomPolicy {
    /// Creates a policy with the default deterministic seed.
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Creates a policy seeded with `seed`.
    ///
    /// A zero seed would pin xorshift at zero forever, so it falls back to
    /// the default seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: if seed == 0 { DEFAULT_SEED } else { seed },
        }
    }

    /// Advances the generator and returns the next raw value.
    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplacementPolicy for RandomPolicy {
    /// Returns the first invalid line when one exists, otherwise a
    /// uniformly chosen index over the whole set.
    fn select_victim(&mut self, set: &[CacheLine]) -> usize {
        if let Some(index) = first_invalid(set) {
            return index;
        }
        (self.next() as usize) % set.len()
    }
}
