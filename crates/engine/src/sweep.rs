//! Batch experiment runner.
//!
//! Replays one shared, read-only trace across N independent configurations
//! built by merging per-variation deltas onto a base configuration. Each
//! variation gets a fresh simulator (fresh cache, clock, counters); no
//! state is shared, so runs may execute concurrently. Cancellation is
//! cooperative and only takes effect between configurations — an access is
//! not safely interruptible without corrupting its counters.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use serde::Deserialize;
use tracing::info;

use crate::cache::{CacheSimulator, RunResult};
use crate::config::{CacheConfig, MemoryConfig, PolicyKind, SimulationConfig, WritePolicy};
use crate::error::ConfigError;
use crate::trace::MemoryAccess;

/// Per-variation overrides merged onto the base configuration.
///
/// Unset fields inherit the base value. Deserializes from JSON with every
/// field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigDelta {
    /// Overrides the cache line size.
    pub line_size: Option<u32>,
    /// Overrides the total line count.
    pub num_lines: Option<u32>,
    /// Overrides the associativity.
    pub associativity: Option<u32>,
    /// Overrides the write policy.
    pub write_policy: Option<WritePolicy>,
    /// Overrides the replacement policy.
    pub replacement_policy: Option<PolicyKind>,
    /// Overrides the hit time.
    pub hit_time: Option<u64>,
    /// Overrides the memory read time.
    pub read_time: Option<u64>,
    /// Overrides the memory write time.
    pub write_time: Option<u64>,
}

impl ConfigDelta {
    /// Merges this delta onto a base pair, producing one complete
    /// configuration.
    pub fn apply(&self, base: &SimulationConfig) -> SimulationConfig {
        SimulationConfig {
            cache: CacheConfig {
                line_size: self.line_size.unwrap_or(base.cache.line_size),
                num_lines: self.num_lines.unwrap_or(base.cache.num_lines),
                associativity: self.associativity.unwrap_or(base.cache.associativity),
                write_policy: self.write_policy.unwrap_or(base.cache.write_policy),
                replacement_policy: self
                    .replacement_policy
                    .unwrap_or(base.cache.replacement_policy),
                hit_time: self.hit_time.unwrap_or(base.cache.hit_time),
            },
            memory: MemoryConfig {
                read_time: self.read_time.unwrap_or(base.memory.read_time),
                write_time: self.write_time.unwrap_or(base.memory.write_time),
            },
        }
    }
}

/// Replays one trace across many configuration variations.
///
/// Results preserve the input ordering of the deltas; no sorting is
/// applied.
#[derive(Debug, Clone)]
pub struct ExperimentRunner {
    base: SimulationConfig,
    deltas: Vec<ConfigDelta>,
    seed: Option<u64>,
}

impl ExperimentRunner {
    /// Creates a runner over `base` and its per-variation `deltas`.
    pub fn new(base: SimulationConfig, deltas: Vec<ConfigDelta>) -> Self {
        Self {
            base,
            deltas,
            seed: None,
        }
    }

    /// Seeds every variation's Random policy for reproducible sweeps.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The merged configuration of every variation, in input order.
    pub fn variations(&self) -> Vec<SimulationConfig> {
        self.deltas
            .iter()
            .map(|delta| delta.apply(&self.base))
            .collect()
    }

    /// Builds one independent simulator per variation.
    ///
    /// Validates every merged configuration before any trace is replayed:
    /// a sweep with an invalid variation fails fast and produces no
    /// statistics or access logs at all.
    fn build_simulators(&self) -> Result<Vec<CacheSimulator>, ConfigError> {
        self.variations()
            .into_iter()
            .map(|config| match self.seed {
                Some(seed) => CacheSimulator::with_seed(config.cache, config.memory, seed),
                None => CacheSimulator::new(config.cache, config.memory),
            })
            .collect()
    }

    /// Runs every variation sequentially.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when any merged variation fails validation; nothing
    /// is run in that case.
    pub fn run(&self, trace: &[MemoryAccess]) -> Result<Vec<RunResult>, ConfigError> {
        let never = AtomicBool::new(false);
        self.run_with_cancel(trace, &never)
    }

    /// Runs variations sequentially, honoring a cancellation flag.
    ///
    /// The flag is checked only at configuration boundaries. On
    /// cancellation the completed prefix of results is returned — partial
    /// results remain valid.
    pub fn run_with_cancel(
        &self,
        trace: &[MemoryAccess],
        cancel: &AtomicBool,
    ) -> Result<Vec<RunResult>, ConfigError> {
        let simulators = self.build_simulators()?;
        let total = simulators.len();
        let mut results = Vec::with_capacity(total);

        for (index, mut simulator) in simulators.into_iter().enumerate() {
            if cancel.load(Ordering::Relaxed) {
                info!(completed = index, total, "sweep cancelled");
                break;
            }
            simulator.run(trace);
            results.push(simulator.into_result());
        }
        Ok(results)
    }

    /// Runs variations across scoped worker threads.
    ///
    /// The variations are mutually independent (each simulator exclusively
    /// owns its cache, clock, and counters) and the trace is shared
    /// read-only, so the split needs no locking. Result ordering matches
    /// the input ordering regardless of thread count.
    pub fn run_parallel(
        &self,
        trace: &[MemoryAccess],
        threads: NonZeroUsize,
    ) -> Result<Vec<RunResult>, ConfigError> {
        let mut simulators = self.build_simulators()?;
        if simulators.is_empty() {
            return Ok(Vec::new());
        }

        let chunk_size = simulators.len().div_ceil(threads.get());
        thread::scope(|scope| {
            for chunk in simulators.chunks_mut(chunk_size) {
                let _ = scope.spawn(move || {
                    for simulator in chunk {
                        simulator.run(trace);
                    }
                });
            }
        });

        Ok(simulators
            .into_iter()
            .map(CacheSimulator::into_result)
            .collect())
    }
}
