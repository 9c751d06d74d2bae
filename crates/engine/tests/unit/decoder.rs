//! Address Decoder Unit Tests.
//!
//! Verifies the tag/set/offset bit-field extraction, the derived geometry,
//! construction-time validation, and the decode-reconstruct round-trip
//! property for sampled and boundary addresses.

use proptest::prelude::*;
use rstest::rstest;

use cachesim_core::cache::decoder::AddressDecoder;
use cachesim_core::config::{CacheConfig, PolicyKind, WritePolicy};
use cachesim_core::error::ConfigError;

use crate::common::cache_config;

/// 64 B lines, 4 lines, direct-mapped: offset 6 bits, set 2 bits, tag 24.
fn direct_mapped() -> CacheConfig {
    cache_config(64, 4, 1, WritePolicy::WriteThrough, PolicyKind::Lru)
}

// ══════════════════════════════════════════════════════════
// 1. Bit-field extraction
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0x0000_0000, 0, 0, 0)]
#[case(0x0000_0040, 0, 1, 0)] // next line, same tag
#[case(0x0000_003F, 0, 0, 0x3F)] // last byte of line 0
#[case(0x0000_0100, 1, 0, 0)] // wraps back to set 0, tag 1
#[case(0xFFFF_FFFF, 0x00FF_FFFF, 3, 0x3F)]
fn decode_extracts_fields(
    #[case] address: u32,
    #[case] tag: u32,
    #[case] set_index: u32,
    #[case] block_offset: u32,
) {
    let decoder = AddressDecoder::new(&direct_mapped()).unwrap();
    let parts = decoder.decode(address);
    assert_eq!(parts.tag, tag);
    assert_eq!(parts.set_index, set_index);
    assert_eq!(parts.block_offset, block_offset);
}

/// A fully-associative cache has zero set bits; the whole index goes to
/// the tag.
#[test]
fn fully_associative_has_no_set_bits() {
    let config = cache_config(64, 32, 32, WritePolicy::WriteBack, PolicyKind::Lru);
    let decoder = AddressDecoder::new(&config).unwrap();
    let geometry = decoder.geometry();

    assert_eq!(geometry.num_sets, 1);
    assert_eq!(geometry.set_bits, 0);
    assert_eq!(geometry.tag_bits, 26);

    let parts = decoder.decode(0xDEAD_BEEF);
    assert_eq!(parts.set_index, 0);
    assert_eq!(parts.tag, 0xDEAD_BEEF >> 6);
}

#[test]
fn block_address_clears_offset() {
    let decoder = AddressDecoder::new(&direct_mapped()).unwrap();
    assert_eq!(decoder.block_address(0x0000_1234), 0x0000_1200);
    assert_eq!(decoder.block_address(0x0000_1200), 0x0000_1200);
}

// ══════════════════════════════════════════════════════════
// 2. Round-trip property
// ══════════════════════════════════════════════════════════

/// Boundary addresses survive a decode-reconstruct round trip exactly.
#[rstest]
#[case(0x0000_0000)]
#[case(0xFFFF_FFFF)]
#[case(0x8000_0000)]
#[case(0x0000_0001)]
fn round_trip_boundary_addresses(#[case] address: u32) {
    let decoder = AddressDecoder::new(&direct_mapped()).unwrap();
    assert_eq!(decoder.reconstruct(decoder.decode(address)), address);
}

proptest! {
    /// Tag, set index, and offset partition the 32 address bits: any
    /// address round-trips under any valid power-of-two geometry.
    #[test]
    fn round_trip_any_address(
        address in any::<u32>(),
        line_shift in 0u32..8,
        lines_shift in 0u32..8,
        ways_shift in 0u32..4,
    ) {
        let config = cache_config(
            1 << line_shift,
            1 << (lines_shift + ways_shift),
            1 << ways_shift,
            WritePolicy::WriteThrough,
            PolicyKind::Lru,
        );
        let decoder = AddressDecoder::new(&config).unwrap();
        prop_assert_eq!(decoder.reconstruct(decoder.decode(address)), address);
    }
}

// ══════════════════════════════════════════════════════════
// 3. Geometry
// ══════════════════════════════════════════════════════════

#[test]
fn geometry_reports_derived_fields() {
    let config = cache_config(64, 64, 4, WritePolicy::WriteBack, PolicyKind::Lru);
    let geometry = AddressDecoder::new(&config).unwrap().geometry();

    assert_eq!(geometry.line_size, 64);
    assert_eq!(geometry.num_lines, 64);
    assert_eq!(geometry.num_sets, 16);
    assert_eq!(geometry.associativity, 4);
    assert_eq!(geometry.offset_bits, 6);
    assert_eq!(geometry.set_bits, 4);
    assert_eq!(geometry.tag_bits, 22);
    assert_eq!(
        geometry.offset_bits + geometry.set_bits + geometry.tag_bits,
        32
    );
}

// ══════════════════════════════════════════════════════════
// 4. Validation
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(48, 64, 4, "line_size")] // not a power of two
#[case(64, 48, 4, "num_lines")]
#[case(64, 64, 3, "associativity")]
fn rejects_non_power_of_two(
    #[case] line_size: u32,
    #[case] num_lines: u32,
    #[case] associativity: u32,
    #[case] field: &str,
) {
    let config = cache_config(
        line_size,
        num_lines,
        associativity,
        WritePolicy::WriteThrough,
        PolicyKind::Lru,
    );
    match AddressDecoder::new(&config) {
        Err(ConfigError::NotPowerOfTwo { field: f, .. }) => assert_eq!(f, field),
        other => panic!("expected NotPowerOfTwo, got {other:?}"),
    }
}

#[test]
fn rejects_associativity_above_num_lines() {
    let config = cache_config(64, 4, 8, WritePolicy::WriteThrough, PolicyKind::Lru);
    assert_eq!(
        AddressDecoder::new(&config).unwrap_err(),
        ConfigError::AssociativityTooLarge {
            associativity: 8,
            num_lines: 4,
        }
    );
}

#[test]
fn rejects_zero_hit_time() {
    let mut config = direct_mapped();
    config.hit_time = 0;
    assert_eq!(
        config.validate().unwrap_err(),
        ConfigError::NonPositiveTime { field: "hit_time" }
    );
}
