//! Access counters, finalized statistics, and comparison series.
//!
//! This module tracks the per-run metrics of the simulator. It provides:
//! 1. **Counters:** Exact integer counts (accesses, hits/misses split by
//!    operation, memory traffic) updated on every access.
//! 2. **Finalized statistics:** Derived rates and average access time,
//!    computed once from the raw counters, never incrementally.
//! 3. **Series extraction:** (x, y) pairs over a batch of results for
//!    parameter-sweep comparisons.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::cache::RunResult;
use crate::config::MemoryConfig;
use crate::trace::Operation;

/// Raw integer counters updated on every access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    /// All accesses.
    pub total_accesses: u64,
    /// Read accesses.
    pub read_accesses: u64,
    /// Write accesses.
    pub write_accesses: u64,
    /// Hits (any operation).
    pub hits: u64,
    /// Misses (any operation).
    pub misses: u64,
    /// Read hits.
    pub read_hits: u64,
    /// Read misses.
    pub read_misses: u64,
    /// Write hits.
    pub write_hits: u64,
    /// Write misses.
    pub write_misses: u64,
    /// Blocks fetched from memory (one per miss).
    pub memory_reads: u64,
    /// Words/blocks written to memory (write-through writes and dirty
    /// evictions).
    pub memory_writes: u64,
}

impl Counters {
    /// Records the outcome of one access in the hit/miss counters.
    ///
    /// Traffic counters are owned by the simulator's hit/miss handlers,
    /// which know the write policy.
    pub(crate) fn record(&mut self, operation: Operation, hit: bool) {
        self.total_accesses += 1;
        match operation {
            Operation::Read => {
                self.read_accesses += 1;
                if hit {
                    self.read_hits += 1;
                } else {
                    self.read_misses += 1;
                }
            }
            Operation::Write => {
                self.write_accesses += 1;
                if hit {
                    self.write_hits += 1;
                } else {
                    self.write_misses += 1;
                }
            }
        }
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }

    /// Derives the finalized statistics from the raw counters.
    ///
    /// The miss penalty in the average access time uses only the memory
    /// read time, for read and write misses alike. That asymmetry is the
    /// model's defined behavior, not an oversight.
    pub fn finalize(&self, hit_time: u64, memory: &MemoryConfig) -> SimulationStatistics {
        let average_access_time = if self.total_accesses == 0 {
            0.0
        } else {
            hit_time as f64
                + (self.misses as f64 / self.total_accesses as f64) * memory.read_time as f64
        };

        SimulationStatistics {
            counters: self.clone(),
            hit_rate: rate(self.hits, self.total_accesses),
            read_hit_rate: rate(self.read_hits, self.read_accesses),
            write_hit_rate: rate(self.write_hits, self.write_accesses),
            average_access_time,
        }
    }
}

/// Percentage of `part` in `whole`; 0 when `whole` is 0.
fn rate(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}

/// Finalized per-run statistics: exact counters plus derived rates.
///
/// Rates and times are plain `f64`; fixed-precision rendering (4 decimals)
/// is the reporting boundary's job, not this type's.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationStatistics {
    /// The raw counters the rates were derived from.
    #[serde(flatten)]
    pub counters: Counters,
    /// Hit percentage over all accesses.
    pub hit_rate: f64,
    /// Hit percentage over reads.
    pub read_hit_rate: f64,
    /// Hit percentage over writes.
    pub write_hit_rate: f64,
    /// hit_time + miss_ratio × memory read time, in nanoseconds.
    pub average_access_time: f64,
}

/// Configuration parameter extractable as a sweep's x-axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    /// Total capacity in KiB.
    CacheSizeKb,
    /// Line size in bytes.
    LineSize,
    /// Total line count.
    NumLines,
    /// Lines per set.
    Associativity,
    /// Hit time in nanoseconds.
    HitTime,
}

impl Parameter {
    /// Extracts this parameter's value from one result.
    pub fn extract(self, result: &RunResult) -> f64 {
        let config = &result.cache;
        match self {
            Self::CacheSizeKb => config.size_bytes() as f64 / 1024.0,
            Self::LineSize => f64::from(config.line_size),
            Self::NumLines => f64::from(config.num_lines),
            Self::Associativity => f64::from(config.associativity),
            Self::HitTime => config.hit_time as f64,
        }
    }
}

impl FromStr for Parameter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cache_size" | "cache_size_kb" => Ok(Self::CacheSizeKb),
            "line_size" => Ok(Self::LineSize),
            "num_lines" => Ok(Self::NumLines),
            "associativity" => Ok(Self::Associativity),
            "hit_time" => Ok(Self::HitTime),
            other => Err(format!("unknown parameter `{other}`")),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CacheSizeKb => "cache_size_kb",
            Self::LineSize => "line_size",
            Self::NumLines => "num_lines",
            Self::Associativity => "associativity",
            Self::HitTime => "hit_time",
        };
        f.write_str(name)
    }
}

/// Statistic extractable as a sweep's y-axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Overall hit percentage.
    HitRate,
    /// Read hit percentage.
    ReadHitRate,
    /// Write hit percentage.
    WriteHitRate,
    /// Average access time in nanoseconds.
    AverageAccessTime,
    /// Memory read count.
    MemoryReads,
    /// Memory write count.
    MemoryWrites,
    /// memory_reads + memory_writes.
    TotalTraffic,
}

impl Metric {
    /// Extracts this metric's value from one result.
    pub fn extract(self, result: &RunResult) -> f64 {
        let stats = &result.statistics;
        match self {
            Self::HitRate => stats.hit_rate,
            Self::ReadHitRate => stats.read_hit_rate,
            Self::WriteHitRate => stats.write_hit_rate,
            Self::AverageAccessTime => stats.average_access_time,
            Self::MemoryReads => stats.counters.memory_reads as f64,
            Self::MemoryWrites => stats.counters.memory_writes as f64,
            Self::TotalTraffic => {
                (stats.counters.memory_reads + stats.counters.memory_writes) as f64
            }
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hit_rate" => Ok(Self::HitRate),
            "read_hit_rate" => Ok(Self::ReadHitRate),
            "write_hit_rate" => Ok(Self::WriteHitRate),
            "average_access_time" | "amat" => Ok(Self::AverageAccessTime),
            "memory_reads" => Ok(Self::MemoryReads),
            "memory_writes" => Ok(Self::MemoryWrites),
            "total_traffic" => Ok(Self::TotalTraffic),
            other => Err(format!("unknown metric `{other}`")),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::HitRate => "hit_rate",
            Self::ReadHitRate => "read_hit_rate",
            Self::WriteHitRate => "write_hit_rate",
            Self::AverageAccessTime => "average_access_time",
            Self::MemoryReads => "memory_reads",
            Self::MemoryWrites => "memory_writes",
            Self::TotalTraffic => "total_traffic",
        };
        f.write_str(name)
    }
}

/// Extracts an ordered (x, y) series over a batch of results.
///
/// Input ordering is preserved; no sorting is applied.
pub fn series(results: &[RunResult], x: Parameter, y: Metric) -> Vec<(f64, f64)> {
    results
        .iter()
        .map(|result| (x.extract(result), y.extract(result)))
        .collect()
}
