//! Configuration system for the cache simulator.
//!
//! This module defines all configuration structures and enums used to
//! parameterize a simulation. It provides:
//! 1. **Defaults:** Baseline geometry and timing constants.
//! 2. **Structures:** Cache geometry/policy and main-memory timing.
//! 3. **Enums:** Write policy and replacement policy, resolved once at
//!    construction — the engine never operates on raw identifiers.
//!
//! Configuration is supplied via JSON (serde) or `Default`; every field is
//! re-validated at simulator construction regardless of the source.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default configuration constants for the simulator.
///
/// These values define the baseline cache when not explicitly overridden
/// in a JSON configuration.
mod defaults {
    /// Default cache line size in bytes.
    pub const LINE_SIZE: u32 = 64;

    /// Default number of cache lines (total, across all sets).
    pub const NUM_LINES: u32 = 64;

    /// Default associativity (4-way set-associative).
    pub const ASSOCIATIVITY: u32 = 4;

    /// Default cache hit time in nanoseconds.
    pub const HIT_TIME: u64 = 5;

    /// Default main-memory read time in nanoseconds.
    pub const READ_TIME: u64 = 70;

    /// Default main-memory write time in nanoseconds.
    pub const WRITE_TIME: u64 = 70;
}

/// Write propagation policy.
///
/// Decides whether writes reach main memory immediately or only when a
/// dirty line is evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WritePolicy {
    /// Every write is propagated to memory, hit or miss.
    #[default]
    #[serde(alias = "WriteThrough")]
    WriteThrough,
    /// Writes only dirty the line; memory is updated on dirty eviction.
    #[serde(alias = "WriteBack")]
    WriteBack,
}

/// Cache replacement policy algorithms.
///
/// Specifies the algorithm used to select which cache line to evict when
/// a new line must be installed in a full cache set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PolicyKind {
    /// Least Recently Used: evicts the line with the oldest logical-clock
    /// timestamp.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// Random: evicts a uniformly chosen line once the set is full.
    #[serde(alias = "Random")]
    Random,
}

/// Cache geometry, policy, and timing configuration.
///
/// All geometry fields must be powers of two and the associativity must
/// divide (and not exceed) the number of lines; `validate` enforces this
/// before any simulator is built. The structure is an immutable value
/// type: a simulator takes its own copy at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache line (block) size in bytes.
    #[serde(default = "CacheConfig::default_line_size")]
    pub line_size: u32,

    /// Total number of cache lines.
    #[serde(default = "CacheConfig::default_num_lines")]
    pub num_lines: u32,

    /// Associativity (lines per set).
    #[serde(default = "CacheConfig::default_associativity")]
    pub associativity: u32,

    /// Write propagation policy.
    #[serde(default)]
    pub write_policy: WritePolicy,

    /// Replacement policy.
    #[serde(default)]
    pub replacement_policy: PolicyKind,

    /// Cache hit time in nanoseconds.
    #[serde(default = "CacheConfig::default_hit_time")]
    pub hit_time: u64,
}

impl CacheConfig {
    /// Returns the default cache line size in bytes.
    fn default_line_size() -> u32 {
        defaults::LINE_SIZE
    }

    /// Returns the default total line count.
    fn default_num_lines() -> u32 {
        defaults::NUM_LINES
    }

    /// Returns the default associativity.
    fn default_associativity() -> u32 {
        defaults::ASSOCIATIVITY
    }

    /// Returns the default hit time in nanoseconds.
    fn default_hit_time() -> u64 {
        defaults::HIT_TIME
    }

    /// Number of sets addressable by the set index.
    pub fn num_sets(&self) -> u32 {
        self.num_lines / self.associativity
    }

    /// Total cache capacity in bytes.
    pub fn size_bytes(&self) -> u64 {
        u64::from(self.num_lines) * u64::from(self.line_size)
    }

    /// Checks every geometry and timing invariant.
    ///
    /// Fails before any access is processed: all three geometry fields must
    /// be powers of two, the associativity must divide and not exceed the
    /// line count, the derived offset/set bit widths must fit a 32-bit
    /// address, and the hit time must be positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_power_of_two(self.line_size) {
            return Err(ConfigError::NotPowerOfTwo {
                field: "line_size",
                value: self.line_size,
            });
        }
        if !is_power_of_two(self.num_lines) {
            return Err(ConfigError::NotPowerOfTwo {
                field: "num_lines",
                value: self.num_lines,
            });
        }
        if !is_power_of_two(self.associativity) {
            return Err(ConfigError::NotPowerOfTwo {
                field: "associativity",
                value: self.associativity,
            });
        }
        if self.associativity > self.num_lines {
            return Err(ConfigError::AssociativityTooLarge {
                associativity: self.associativity,
                num_lines: self.num_lines,
            });
        }
        // Powers of two with associativity <= num_lines always divide
        // evenly; the check stays as a guard for future field changes.
        if self.num_lines % self.associativity != 0 {
            return Err(ConfigError::AssociativityTooLarge {
                associativity: self.associativity,
                num_lines: self.num_lines,
            });
        }
        let offset_bits = self.line_size.trailing_zeros();
        let set_bits = self.num_sets().trailing_zeros();
        if offset_bits + set_bits > 32 {
            return Err(ConfigError::GeometryTooWide {
                bits: offset_bits + set_bits,
            });
        }
        if self.hit_time == 0 {
            return Err(ConfigError::NonPositiveTime { field: "hit_time" });
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            line_size: defaults::LINE_SIZE,
            num_lines: defaults::NUM_LINES,
            associativity: defaults::ASSOCIATIVITY,
            write_policy: WritePolicy::default(),
            replacement_policy: PolicyKind::default(),
            hit_time: defaults::HIT_TIME,
        }
    }
}

/// Main-memory timing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Memory read time in nanoseconds (the miss penalty).
    #[serde(default = "MemoryConfig::default_read_time")]
    pub read_time: u64,

    /// Memory write time in nanoseconds.
    #[serde(default = "MemoryConfig::default_write_time")]
    pub write_time: u64,
}

impl MemoryConfig {
    /// Returns the default memory read time in nanoseconds.
    fn default_read_time() -> u64 {
        defaults::READ_TIME
    }

    /// Returns the default memory write time in nanoseconds.
    fn default_write_time() -> u64 {
        defaults::WRITE_TIME
    }

    /// Checks that both timing fields are positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.read_time == 0 {
            return Err(ConfigError::NonPositiveTime { field: "read_time" });
        }
        if self.write_time == 0 {
            return Err(ConfigError::NonPositiveTime {
                field: "write_time",
            });
        }
        Ok(())
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            read_time: defaults::READ_TIME,
            write_time: defaults::WRITE_TIME,
        }
    }
}

/// Root configuration structure: one cache plus its backing memory.
///
/// This is the JSON config-file shape consumed by the CLI.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::SimulationConfig;
///
/// let json = r#"{
///     "cache": {
///         "line_size": 64,
///         "num_lines": 128,
///         "associativity": 4,
///         "write_policy": "WRITE_BACK",
///         "replacement_policy": "LRU",
///         "hit_time": 5
///     },
///     "memory": { "read_time": 70, "write_time": 70 }
/// }"#;
///
/// let config: SimulationConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.cache.num_lines, 128);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Cache geometry and policies.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Main-memory timing.
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl SimulationConfig {
    /// Validates both halves of the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cache.validate()?;
        self.memory.validate()
    }
}

/// True when `n` is a nonzero power of two.
fn is_power_of_two(n: u32) -> bool {
    n > 0 && n & (n - 1) == 0
}
