//! Error definitions for the cache simulator.
//!
//! This module defines the error handling for the engine. It provides:
//! 1. **Configuration Errors:** Geometry/timing invariant violations,
//!    raised at construction and never mid-run.
//! 2. **Address Errors:** Invalid 32-bit hexadecimal addresses, raised at
//!    the parsing boundary rather than inside the per-access algorithm.
//! 3. **Trace Errors:** Per-line malformations (recovered by skipping) and
//!    whole-file rejection when nothing parses.

use thiserror::Error;

/// A configuration field violates a geometry or timing invariant.
///
/// Raised when a simulator or decoder is constructed, before any access is
/// processed; construction never partially mutates state on failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A geometry field is not a nonzero power of two.
    #[error("{field} must be a power of two, got {value}")]
    NotPowerOfTwo {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: u32,
    },

    /// The associativity exceeds (or does not divide) the line count.
    #[error("associativity {associativity} must divide and not exceed num_lines {num_lines}")]
    AssociativityTooLarge {
        /// Configured associativity.
        associativity: u32,
        /// Configured total line count.
        num_lines: u32,
    },

    /// The offset and set index fields do not fit a 32-bit address.
    #[error("geometry needs {bits} offset+set bits, more than the 32 available")]
    GeometryTooWide {
        /// Combined offset and set bit width.
        bits: u32,
    },

    /// A timing field is zero.
    #[error("{field} must be positive")]
    NonPositiveTime {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// An address token is not a valid 32-bit hexadecimal value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The token is empty after stripping an optional `0x` prefix.
    #[error("empty address")]
    Empty,

    /// The token contains a non-hexadecimal character.
    #[error("invalid hex address `{0}`")]
    InvalidHex(String),

    /// The token has more than 8 hex digits (wider than 32 bits).
    #[error("address `{0}` is wider than 32 bits")]
    TooWide(String),
}

/// A single trace line is malformed.
///
/// Recovered locally: the line is skipped with a diagnostic and parsing
/// continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceLineError {
    /// Fewer than two whitespace-separated fields.
    #[error("expected `<hex address> <R|W>`")]
    MissingField,

    /// The address field failed validation.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// The operation field is not `R` or `W` (any case).
    #[error("invalid operation `{0}`, expected R or W")]
    InvalidOperation(String),
}

/// The trace as a whole is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    /// Every line was blank, a comment, or malformed.
    #[error("trace contains no valid accesses")]
    Empty,
}
