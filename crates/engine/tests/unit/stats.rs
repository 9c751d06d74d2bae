//! Statistics Unit Tests.
//!
//! Verifies rate finalization edge cases and the parameter/metric
//! extraction used by sweep comparisons.

use pretty_assertions::assert_eq;
use rstest::rstest;

use cachesim_core::CacheSimulator;
use cachesim_core::cache::RunResult;
use cachesim_core::config::{PolicyKind, WritePolicy};
use cachesim_core::stats::{Metric, Parameter, series};

use crate::common::{cache_config, memory_config, read, write};

/// Runs a short mixed trace through one configuration.
fn result_for(line_size: u32, num_lines: u32, associativity: u32) -> RunResult {
    let config = cache_config(
        line_size,
        num_lines,
        associativity,
        WritePolicy::WriteThrough,
        PolicyKind::Lru,
    );
    let mut sim = CacheSimulator::new(config, memory_config()).unwrap();
    sim.run(&[read(0x000), read(0x000), write(0x040), read(0x1000)]);
    sim.into_result()
}

// ══════════════════════════════════════════════════════════
// 1. Finalization
// ══════════════════════════════════════════════════════════

#[test]
fn rates_are_percentages() {
    let result = result_for(64, 64, 4);
    let stats = &result.statistics;

    // 1 hit of 4 accesses, 1 read hit of 3 reads, 0 write hits of 1 write.
    assert_eq!(stats.hit_rate, 25.0);
    assert!((stats.read_hit_rate - 100.0 / 3.0).abs() < 1e-9);
    assert_eq!(stats.write_hit_rate, 0.0);
}

/// A read-only trace leaves the write rate at zero, not NaN.
#[test]
fn no_writes_means_zero_write_rate() {
    let config = cache_config(64, 4, 1, WritePolicy::WriteThrough, PolicyKind::Lru);
    let mut sim = CacheSimulator::new(config, memory_config()).unwrap();
    sim.run(&[read(0x000), read(0x000)]);
    let stats = sim.finalize();

    assert_eq!(stats.write_hit_rate, 0.0);
    assert!(stats.hit_rate.is_finite());
}

// ══════════════════════════════════════════════════════════
// 2. Parameter extraction
// ══════════════════════════════════════════════════════════

#[test]
fn parameter_extract_reads_configuration() {
    let result = result_for(64, 64, 4);

    // 64 lines × 64 B = 4 KiB.
    assert_eq!(Parameter::CacheSizeKb.extract(&result), 4.0);
    assert_eq!(Parameter::LineSize.extract(&result), 64.0);
    assert_eq!(Parameter::NumLines.extract(&result), 64.0);
    assert_eq!(Parameter::Associativity.extract(&result), 4.0);
    assert_eq!(Parameter::HitTime.extract(&result), 5.0);
}

#[rstest]
#[case("cache_size", Parameter::CacheSizeKb)]
#[case("cache_size_kb", Parameter::CacheSizeKb)]
#[case("line_size", Parameter::LineSize)]
#[case("num_lines", Parameter::NumLines)]
#[case("associativity", Parameter::Associativity)]
#[case("hit_time", Parameter::HitTime)]
fn parameter_parses_its_names(#[case] name: &str, #[case] expected: Parameter) {
    assert_eq!(name.parse::<Parameter>(), Ok(expected));
}

#[test]
fn parameter_rejects_unknown_names() {
    assert!("block_size".parse::<Parameter>().is_err());
}

/// Display output round-trips through FromStr.
#[rstest]
#[case(Parameter::CacheSizeKb)]
#[case(Parameter::LineSize)]
#[case(Parameter::HitTime)]
fn parameter_display_round_trips(#[case] parameter: Parameter) {
    assert_eq!(parameter.to_string().parse::<Parameter>(), Ok(parameter));
}

// ══════════════════════════════════════════════════════════
// 3. Metric extraction
// ══════════════════════════════════════════════════════════

#[test]
fn metric_extract_reads_statistics() {
    let result = result_for(64, 64, 4);
    let stats = &result.statistics;

    assert_eq!(Metric::HitRate.extract(&result), stats.hit_rate);
    assert_eq!(
        Metric::AverageAccessTime.extract(&result),
        stats.average_access_time
    );
    assert_eq!(Metric::MemoryReads.extract(&result), 3.0);
    // Write-through: one write reaches memory.
    assert_eq!(Metric::MemoryWrites.extract(&result), 1.0);
    assert_eq!(Metric::TotalTraffic.extract(&result), 4.0);
}

#[rstest]
#[case("hit_rate", Metric::HitRate)]
#[case("read_hit_rate", Metric::ReadHitRate)]
#[case("write_hit_rate", Metric::WriteHitRate)]
#[case("average_access_time", Metric::AverageAccessTime)]
#[case("amat", Metric::AverageAccessTime)]
#[case("memory_reads", Metric::MemoryReads)]
#[case("memory_writes", Metric::MemoryWrites)]
#[case("total_traffic", Metric::TotalTraffic)]
fn metric_parses_its_names(#[case] name: &str, #[case] expected: Metric) {
    assert_eq!(name.parse::<Metric>(), Ok(expected));
}

#[test]
fn metric_rejects_unknown_names() {
    assert!("latency".parse::<Metric>().is_err());
}

// ══════════════════════════════════════════════════════════
// 4. Series
// ══════════════════════════════════════════════════════════

/// Series pairs follow input order, never sorted.
#[test]
fn series_preserves_input_order() {
    let results = vec![result_for(64, 64, 4), result_for(64, 16, 2), result_for(64, 128, 4)];
    let points = series(&results, Parameter::NumLines, Metric::HitRate);

    let xs: Vec<f64> = points.iter().map(|(x, _)| *x).collect();
    assert_eq!(xs, vec![64.0, 16.0, 128.0]);
    for (point, result) in points.iter().zip(&results) {
        assert_eq!(point.1, result.statistics.hit_rate);
    }
}

#[test]
fn series_of_empty_batch_is_empty() {
    assert!(series(&[], Parameter::LineSize, Metric::HitRate).is_empty());
}
