//! Trace-driven set-associative cache simulator library.
//!
//! This crate implements a configurable cache model for memory-hierarchy
//! experiments with the following:
//! 1. **Cache:** Address decoding, per-line state machine, replacement
//!    policies (LRU, Random), and the hit/miss/traffic simulator.
//! 2. **Trace:** Parser for plain-text access traces (`<hex address> <R|W>`)
//!    with per-line error recovery and trace summaries.
//! 3. **Statistics:** Raw access/traffic counters and finalized rates and
//!    average access time.
//! 4. **Sweep:** Batch experiment runner replaying one trace across many
//!    configuration variations, with series extraction for comparison.

/// Cache model (address decoder, line state machine, policies, simulator).
pub mod cache;
/// Simulator configuration (cache geometry, policies, memory timing).
pub mod config;
/// Error types (configuration, address, and trace errors).
pub mod error;
/// Access counters, finalized statistics, and comparison series.
pub mod stats;
/// Memory-trace parsing and summaries.
pub mod trace;
/// Batch experiment runner (configuration deltas, sweeps).
pub mod sweep;

/// Single-run engine; construct with [`CacheSimulator::new`].
pub use crate::cache::CacheSimulator;
/// Cache geometry/policy configuration; use serde or `CacheConfig::default()`.
pub use crate::config::CacheConfig;
/// Main memory timing configuration.
pub use crate::config::MemoryConfig;
/// Batch runner; replays one trace across many configurations.
pub use crate::sweep::ExperimentRunner;
