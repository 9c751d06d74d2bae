//! Memory-trace parsing and summaries.
//!
//! A trace is plain text with one access per line, `<hex address> <R|W>`.
//! Blank lines and `#` comments are ignored. Addresses take an optional
//! case-insensitive `0x` prefix and at most 8 hex digits (32-bit bound);
//! the operation letter is case-insensitive. Malformed lines are skipped
//! with a `tracing` diagnostic; the whole trace is rejected only when it
//! yields zero valid accesses.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AddressError, TraceError, TraceLineError};

/// Memory operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// A read (load) access.
    #[serde(rename = "R")]
    Read,
    /// A write (store) access.
    #[serde(rename = "W")]
    Write,
}

/// One parsed trace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryAccess {
    /// 32-bit byte address.
    pub address: u32,
    /// Read or write.
    pub operation: Operation,
    /// 1-based source line number, kept for diagnostics.
    pub line_number: usize,
}

/// Parses one hexadecimal address token.
///
/// Strips an optional `0x`/`0X` prefix, rejects empty tokens, non-hex
/// characters, and tokens wider than 8 hex digits.
pub fn parse_address(token: &str) -> Result<u32, AddressError> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);

    if digits.is_empty() {
        return Err(AddressError::Empty);
    }
    if digits.len() > 8 {
        return Err(AddressError::TooWide(token.to_string()));
    }
    u32::from_str_radix(digits, 16).map_err(|_| AddressError::InvalidHex(token.to_string()))
}

/// Parses one non-blank, non-comment trace line.
fn parse_line(line: &str, line_number: usize) -> Result<MemoryAccess, TraceLineError> {
    let mut fields = line.split_whitespace();
    let address_token = fields.next().ok_or(TraceLineError::MissingField)?;
    let operation_token = fields.next().ok_or(TraceLineError::MissingField)?;

    let address = parse_address(address_token)?;
    let operation = match operation_token {
        "R" | "r" => Operation::Read,
        "W" | "w" => Operation::Write,
        other => return Err(TraceLineError::InvalidOperation(other.to_string())),
    };

    Ok(MemoryAccess {
        address,
        operation,
        line_number,
    })
}

/// Parses a whole trace, skipping malformed lines.
///
/// Each malformed line emits a `warn` event naming the line number. Fails
/// with [`TraceError::Empty`] only when no line parsed.
pub fn parse_trace(source: &str) -> Result<Vec<MemoryAccess>, TraceError> {
    let mut accesses = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_line(line, index + 1) {
            Ok(access) => accesses.push(access),
            Err(e) => warn!(line = index + 1, error = %e, "skipping malformed trace line"),
        }
    }

    if accesses.is_empty() {
        return Err(TraceError::Empty);
    }
    Ok(accesses)
}

/// Aggregate shape of a parsed trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceSummary {
    /// Total valid accesses.
    pub total_accesses: usize,
    /// Read accesses.
    pub reads: usize,
    /// Write accesses.
    pub writes: usize,
    /// Count of distinct addresses touched.
    pub unique_addresses: usize,
    /// Smallest address in the trace.
    pub min_address: u32,
    /// Largest address in the trace.
    pub max_address: u32,
}

/// Summarizes a parsed trace for display and sanity checks.
pub fn summarize(accesses: &[MemoryAccess]) -> TraceSummary {
    let mut seen: std::collections::HashSet<u32> = std::collections::HashSet::new();
    let mut reads = 0;
    let mut min_address = u32::MAX;
    let mut max_address = 0;

    for access in accesses {
        if access.operation == Operation::Read {
            reads += 1;
        }
        let _ = seen.insert(access.address);
        min_address = min_address.min(access.address);
        max_address = max_address.max(access.address);
    }

    TraceSummary {
        total_accesses: accesses.len(),
        reads,
        writes: accesses.len() - reads,
        unique_addresses: seen.len(),
        min_address: if accesses.is_empty() { 0 } else { min_address },
        max_address,
    }
}

/// Generates a random sample trace in the accepted format.
///
/// Addresses are xorshift-derived within the low 16 MiB so small caches
/// still see reuse. Intended for demos and quick experiments.
pub fn generate_sample(count: usize, seed: u64) -> String {
    let mut state = if seed == 0 { 0x2545_F491_4F6C_DD1D } else { seed };
    let mut out = String::from("# sample trace\n");

    for _ in 0..count {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let address = (state as u32) & 0x00FF_FFFF;
        let op = if state & 0x100 == 0 { 'R' } else { 'W' };
        out.push_str(&format!("{address:08x} {op}\n"));
    }
    out
}
