//! Shared builders for engine tests.
//!
//! Small constructors that keep individual tests focused on behavior
//! rather than configuration plumbing.

use cachesim_core::config::{CacheConfig, MemoryConfig, PolicyKind, WritePolicy};
use cachesim_core::trace::{MemoryAccess, Operation};

/// Builds a cache configuration with explicit geometry and policies.
pub fn cache_config(
    line_size: u32,
    num_lines: u32,
    associativity: u32,
    write_policy: WritePolicy,
    replacement_policy: PolicyKind,
) -> CacheConfig {
    CacheConfig {
        line_size,
        num_lines,
        associativity,
        write_policy,
        replacement_policy,
        hit_time: 5,
    }
}

/// Memory timing used across the suite (70 ns read, 70 ns write).
pub fn memory_config() -> MemoryConfig {
    MemoryConfig {
        read_time: 70,
        write_time: 70,
    }
}

/// A read access at `address`.
pub fn read(address: u32) -> MemoryAccess {
    MemoryAccess {
        address,
        operation: Operation::Read,
        line_number: 0,
    }
}

/// A write access at `address`.
pub fn write(address: u32) -> MemoryAccess {
    MemoryAccess {
        address,
        operation: Operation::Write,
        line_number: 0,
    }
}
