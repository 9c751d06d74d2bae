//! Cache line state machine.
//!
//! A line moves between three states: invalid, valid-clean, and
//! valid-dirty (write-back only). The recency field is a logical clock
//! value supplied by the owning simulator, never wall-clock time.

use serde::Serialize;

/// Per-line state: validity, dirtiness, tag, and recency.
///
/// Owned exclusively by its containing set slot and mutated only by the
/// simulator that owns the whole cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheLine {
    valid: bool,
    dirty: bool,
    tag: u32,
    last_used: u64,
}

impl CacheLine {
    /// Whether the line holds a block.
    pub fn valid(&self) -> bool {
        self.valid
    }

    /// Whether the line was written since load (write-back only).
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Tag of the resident block; meaningful only when valid.
    pub fn tag(&self) -> u32 {
        self.tag
    }

    /// Logical clock value of the most recent access.
    pub fn last_used(&self) -> u64 {
        self.last_used
    }

    /// The sole hit predicate: valid and tag equal.
    pub fn matches(&self, tag: u32) -> bool {
        self.valid && self.tag == tag
    }

    /// Installs a block: any state becomes valid-clean.
    ///
    /// Unconditionally discards prior content; the caller must already
    /// have accounted for eviction of a dirty victim.
    pub fn load(&mut self, tag: u32, clock: u64) {
        self.valid = true;
        self.dirty = false;
        self.tag = tag;
        self.last_used = clock;
    }

    /// Marks a valid line dirty and refreshes its recency.
    ///
    /// Only reachable under write-back.
    pub fn mark_dirty(&mut self, clock: u64) {
        self.dirty = true;
        self.last_used = clock;
    }

    /// Refreshes recency without changing valid/dirty; used on every hit.
    pub fn touch(&mut self, clock: u64) {
        self.last_used = clock;
    }

    /// Returns the line to the invalid state, clearing tag and recency.
    pub fn invalidate(&mut self) {
        self.valid = false;
        self.dirty = false;
        self.tag = 0;
        self.last_used = 0;
    }

    /// Serializable copy of the line's current state.
    pub fn snapshot(&self) -> LineSnapshot {
        LineSnapshot {
            valid: self.valid,
            dirty: self.dirty,
            tag: self.tag,
            last_used: self.last_used,
        }
    }
}

/// Point-in-time copy of a line, used in access results and final state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineSnapshot {
    /// Whether the line held a block.
    pub valid: bool,
    /// Whether the block was dirty.
    pub dirty: bool,
    /// Tag of the block.
    pub tag: u32,
    /// Logical clock value of the last access.
    pub last_used: u64,
}
