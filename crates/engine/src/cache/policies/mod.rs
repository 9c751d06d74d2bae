//! Cache replacement policies.
//!
//! Implements the victim-selection strategies for set-associative caches.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used, driven by the simulator's logical clock.
//! - `Random`: xorshift-based uniform selection with an injectable seed.

/// Least Recently Used replacement policy.
pub mod lru;

/// Random replacement policy.
pub mod random;

pub use lru::LruPolicy;
pub use random::RandomPolicy;

use super::line::CacheLine;
use crate::config::PolicyKind;

/// Trait for cache replacement policies.
///
/// Policies are resolved once at construction and held behind a boxed
/// trait object; the engine never inspects the concrete type at runtime.
pub trait ReplacementPolicy: Send {
    /// Selects the victim line index within a set.
    ///
    /// Must always return an index in `0..set.len()`, including when the
    /// set is full. Both policies return the first invalid line when one
    /// exists (compulsory-miss fast path).
    fn select_victim(&mut self, set: &[CacheLine]) -> usize;
}

/// Constructs the policy named by `kind`.
///
/// `seed` only affects [`RandomPolicy`]; pass `None` for the default
/// deterministic seed.
pub fn build(kind: PolicyKind, seed: Option<u64>) -> Box<dyn ReplacementPolicy> {
    match kind {
        PolicyKind::Lru => Box::new(LruPolicy),
        PolicyKind::Random => match seed {
            Some(seed) => Box::new(RandomPolicy::with_seed(seed)),
            None => Box::new(RandomPolicy::new()),
        },
    }
}

/// Index of the first invalid line, if any.
pub(crate) fn first_invalid(set: &[CacheLine]) -> Option<usize> {
    set.iter().position(|line| !line.valid())
}
