//! Least Recently Used (LRU) replacement policy.
//!
//! Evicts the line whose logical-clock timestamp is smallest. The recency
//! state lives on the lines themselves (the simulator stamps every access),
//! so the policy is stateless: a left-to-right scan with a strict
//! less-than comparison, which makes the first-seen minimum win ties.

use super::{ReplacementPolicy, first_invalid};
use crate::cache::line::CacheLine;

/// LRU policy; stateless, recency is read from the set.
#[derive(Debug, Clone, Copy, Default)]
pub struct LruPolicy;

impl ReplacementPolicy for LruPolicy {
    /// Returns the first invalid line when one exists, otherwise the index
    /// of the smallest `last_used` value.
    fn select_victim(&mut self, set: &[CacheLine]) -> usize {
        if let Some(index) = first_invalid(set) {
            return index;
        }

        let mut victim = 0;
        let mut oldest = u64::MAX;
        for (index, line) in set.iter().enumerate() {
            if line.last_used() < oldest {
                oldest = line.last_used();
                victim = index;
            }
        }
        victim
    }
}
