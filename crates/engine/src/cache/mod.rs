//! Set-associative cache simulator.
//!
//! This module implements the simulation engine: address decoding, the
//! per-line state machine, replacement-policy dispatch, and the per-access
//! hit/miss/traffic accounting. One [`CacheSimulator`] owns one cache, one
//! logical clock, and one set of counters; nothing is shared across
//! instances, so batch sweeps need no locking.

/// Address decoding (tag / set index / block offset).
pub mod decoder;

/// Per-line state machine (valid/dirty/tag/recency).
pub mod line;

/// Replacement policy implementations (LRU, Random).
pub mod policies;

use serde::Serialize;
use tracing::debug;

use self::decoder::{AddressDecoder, Geometry};
use self::line::{CacheLine, LineSnapshot};
use self::policies::ReplacementPolicy;
use crate::config::{CacheConfig, MemoryConfig, WritePolicy};
use crate::error::ConfigError;
use crate::stats::{Counters, SimulationStatistics};
use crate::trace::{MemoryAccess, Operation};

/// Outcome of one access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessResult {
    /// Whether a matching valid line was found.
    pub hit: bool,
    /// The addressed set.
    pub set_index: u32,
    /// The line touched (hit) or installed into (miss).
    pub line_index: usize,
    /// Tag of the access.
    pub tag: u32,
    /// Prior state of an evicted dirty line, when a write-back occurred.
    pub evicted: Option<LineSnapshot>,
}

/// Complete output of one finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// The cache configuration the run used.
    pub cache: CacheConfig,
    /// The memory timing the run used.
    pub memory: MemoryConfig,
    /// Finalized statistics.
    pub statistics: SimulationStatistics,
    /// Ordered per-access log.
    pub accesses: Vec<AccessResult>,
    /// Final snapshot of every line, by set.
    pub final_state: Vec<Vec<LineSnapshot>>,
}

/// Trace-driven simulator for one cache configuration.
///
/// Exclusively owns its cache, logical clock, counters, and access log.
/// `access` is synchronous and CPU-bound: pure bit arithmetic plus a short
/// linear scan, with no I/O.
pub struct CacheSimulator {
    config: CacheConfig,
    memory: MemoryConfig,
    decoder: AddressDecoder,
    policy: Box<dyn ReplacementPolicy>,
    sets: Vec<Vec<CacheLine>>,
    clock: u64,
    counters: Counters,
    accesses: Vec<AccessResult>,
}

impl std::fmt::Debug for CacheSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheSimulator")
            .field("config", &self.config)
            .field("memory", &self.memory)
            .field("clock", &self.clock)
            .field("counters", &self.counters)
            .finish_non_exhaustive()
    }
}

impl CacheSimulator {
    /// Builds a simulator, validating both configurations first.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when any geometry or timing invariant fails; nothing
    /// is allocated on failure.
    pub fn new(config: CacheConfig, memory: MemoryConfig) -> Result<Self, ConfigError> {
        Self::build(config, memory, None)
    }

    /// Builds a simulator whose Random policy (if selected) uses `seed`.
    ///
    /// LRU ignores the seed. Two simulators with the same seed and trace
    /// produce identical results.
    pub fn with_seed(
        config: CacheConfig,
        memory: MemoryConfig,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::build(config, memory, Some(seed))
    }

    fn build(
        config: CacheConfig,
        memory: MemoryConfig,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let decoder = AddressDecoder::new(&config)?;
        memory.validate()?;

        let num_sets = config.num_sets() as usize;
        let ways = config.associativity as usize;
        let policy = policies::build(config.replacement_policy, seed);

        debug!(
            line_size = config.line_size,
            num_lines = config.num_lines,
            associativity = config.associativity,
            "cache simulator created"
        );

        Ok(Self {
            config,
            memory,
            decoder,
            policy,
            sets: vec![vec![CacheLine::default(); ways]; num_sets],
            clock: 0,
            counters: Counters::default(),
            accesses: Vec::new(),
        })
    }

    /// Performs one access, returning its result.
    ///
    /// Advances the logical clock, decodes the address, scans the addressed
    /// set left to right (first match wins), then applies the hit or miss
    /// handler. Memory traffic follows the write-policy matrix exactly:
    /// every miss reads one block; write-through writes memory on every
    /// write; write-back writes memory only when evicting a dirty line.
    pub fn access(&mut self, address: u32, operation: Operation) -> AccessResult {
        self.clock += 1;
        let parts = self.decoder.decode(address);
        let set_index = parts.set_index as usize;

        let hit_index = self.sets[set_index]
            .iter()
            .position(|candidate| candidate.matches(parts.tag));
        self.counters.record(operation, hit_index.is_some());

        let result = match hit_index {
            Some(line_index) => {
                self.handle_hit(set_index, line_index, operation);
                AccessResult {
                    hit: true,
                    set_index: parts.set_index,
                    line_index,
                    tag: parts.tag,
                    evicted: None,
                }
            }
            None => {
                let (line_index, evicted) = self.handle_miss(set_index, parts.tag, operation);
                AccessResult {
                    hit: false,
                    set_index: parts.set_index,
                    line_index,
                    tag: parts.tag,
                    evicted,
                }
            }
        };

        self.accesses.push(result.clone());
        result
    }

    /// Hit path: refresh recency, then apply the write policy.
    fn handle_hit(&mut self, set_index: usize, line_index: usize, operation: Operation) {
        let line = &mut self.sets[set_index][line_index];
        line.touch(self.clock);

        if operation == Operation::Write {
            match self.config.write_policy {
                WritePolicy::WriteBack => line.mark_dirty(self.clock),
                // Every write hit still reaches memory.
                WritePolicy::WriteThrough => self.counters.memory_writes += 1,
            }
        }
    }

    /// Miss path: pick a victim, account for its eviction, fetch the block.
    fn handle_miss(
        &mut self,
        set_index: usize,
        tag: u32,
        operation: Operation,
    ) -> (usize, Option<LineSnapshot>) {
        let victim_index = self.policy.select_victim(&self.sets[set_index]);
        let victim = &mut self.sets[set_index][victim_index];

        let mut evicted = None;
        if victim.valid() && victim.dirty() && self.config.write_policy == WritePolicy::WriteBack {
            self.counters.memory_writes += 1;
            evicted = Some(victim.snapshot());
        }

        // Fetch the missing block.
        self.counters.memory_reads += 1;
        victim.load(tag, self.clock);

        if operation == Operation::Write {
            match self.config.write_policy {
                WritePolicy::WriteBack => victim.mark_dirty(self.clock),
                WritePolicy::WriteThrough => self.counters.memory_writes += 1,
            }
        }

        (victim_index, evicted)
    }

    /// Replays a parsed trace in order.
    pub fn run(&mut self, trace: &[MemoryAccess]) {
        for access in trace {
            let _ = self.access(access.address, access.operation);
        }
    }

    /// Finalized statistics, computed once from the raw counters.
    pub fn finalize(&self) -> SimulationStatistics {
        self.counters.finalize(self.config.hit_time, &self.memory)
    }

    /// Snapshot of every line's current state, by set.
    pub fn cache_state(&self) -> Vec<Vec<LineSnapshot>> {
        self.sets
            .iter()
            .map(|set| set.iter().map(CacheLine::snapshot).collect())
            .collect()
    }

    /// Derived geometry, for display and validation.
    pub fn geometry(&self) -> Geometry {
        self.decoder.geometry()
    }

    /// The cache configuration this simulator runs.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Raw counters accumulated so far.
    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// The ordered access log accumulated so far.
    pub fn accesses(&self) -> &[AccessResult] {
        &self.accesses
    }

    /// Discards all run state: lines, clock, counters, and access log.
    ///
    /// The configuration is kept; the next access starts a fresh run.
    pub fn reset(&mut self) {
        for set in &mut self.sets {
            for cache_line in set {
                cache_line.invalidate();
            }
        }
        self.clock = 0;
        self.counters = Counters::default();
        self.accesses.clear();
    }

    /// Consumes the simulator into its complete run output.
    pub fn into_result(self) -> RunResult {
        let statistics = self.finalize();
        let final_state = self.cache_state();
        RunResult {
            cache: self.config,
            memory: self.memory,
            statistics,
            accesses: self.accesses,
            final_state,
        }
    }
}
