//! Address decoding for a 32-bit address space.
//!
//! Splits an address into `{tag, set_index, block_offset}` by pure bit
//! arithmetic derived from the cache geometry. The bit-field widths are
//! fixed at construction; decoding itself never fails.

use serde::Serialize;

use crate::config::CacheConfig;
use crate::error::ConfigError;

/// Decoded components of one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddressParts {
    /// High-order bits identifying the memory block.
    pub tag: u32,
    /// Index of the addressed set.
    pub set_index: u32,
    /// Byte offset within the block.
    pub block_offset: u32,
}

/// Derived geometry, for display and validation by callers.
///
/// Never consulted on the hit/miss path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Geometry {
    /// Line size in bytes.
    pub line_size: u32,
    /// Total line count.
    pub num_lines: u32,
    /// Number of sets.
    pub num_sets: u32,
    /// Lines per set.
    pub associativity: u32,
    /// Bits addressing a byte within the block.
    pub offset_bits: u32,
    /// Bits selecting the set.
    pub set_bits: u32,
    /// Remaining tag bits (32 − set − offset).
    pub tag_bits: u32,
}

/// Pure address-to-components function for one cache geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressDecoder {
    line_size: u32,
    num_lines: u32,
    associativity: u32,
    offset_bits: u32,
    set_bits: u32,
    tag_bits: u32,
    offset_mask: u32,
    set_mask: u32,
    tag_mask: u32,
}

impl AddressDecoder {
    /// Builds a decoder, validating the geometry first.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when any geometry field is not a power of two, the
    /// associativity exceeds the line count, or the derived bit widths do
    /// not fit 32 bits.
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let num_sets = config.num_sets();
        let offset_bits = config.line_size.trailing_zeros();
        let set_bits = num_sets.trailing_zeros();
        let tag_bits = 32 - set_bits - offset_bits;

        Ok(Self {
            line_size: config.line_size,
            num_lines: config.num_lines,
            associativity: config.associativity,
            offset_bits,
            set_bits,
            tag_bits,
            offset_mask: mask(offset_bits),
            set_mask: mask(set_bits),
            tag_mask: mask(tag_bits),
        })
    }

    /// Splits `address` into tag, set index, and block offset.
    pub fn decode(&self, address: u32) -> AddressParts {
        // u64 shifts keep the set_bits == 0 / tag_bits == 32 corners legal.
        let addr = u64::from(address);
        AddressParts {
            block_offset: (addr as u32) & self.offset_mask,
            set_index: ((addr >> self.offset_bits) as u32) & self.set_mask,
            tag: ((addr >> (self.offset_bits + self.set_bits)) as u32) & self.tag_mask,
        }
    }

    /// Address of the block containing `address` (offset bits cleared).
    pub fn block_address(&self, address: u32) -> u32 {
        address & !self.offset_mask
    }

    /// Reassembles an address from decoded components.
    pub fn reconstruct(&self, parts: AddressParts) -> u32 {
        let tag = u64::from(parts.tag) << (self.offset_bits + self.set_bits);
        let set = u64::from(parts.set_index) << self.offset_bits;
        (tag | set | u64::from(parts.block_offset)) as u32
    }

    /// Derived geometry as a pure function of the configuration.
    pub fn geometry(&self) -> Geometry {
        Geometry {
            line_size: self.line_size,
            num_lines: self.num_lines,
            num_sets: self.num_lines / self.associativity,
            associativity: self.associativity,
            offset_bits: self.offset_bits,
            set_bits: self.set_bits,
            tag_bits: self.tag_bits,
        }
    }
}

/// Low `bits` bits set; valid for the full 0..=32 range.
fn mask(bits: u32) -> u32 {
    ((1u64 << bits) - 1) as u32
}
