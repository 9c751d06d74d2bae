//! Cache simulator CLI.
//!
//! This binary provides a single entry point for all simulation modes. It
//! performs:
//! 1. **Single run:** Replay one trace through one configuration and print
//!    a statistics report (or the full result as JSON).
//! 2. **Sweep:** Replay one trace across many configuration variations and
//!    print a comparison table, CSV, or JSON.
//! 3. **Trace generation:** Emit a random sample trace for quick
//!    experiments.

use std::num::NonZeroUsize;
use std::{fs, process};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cachesim_core::cache::RunResult;
use cachesim_core::config::SimulationConfig;
use cachesim_core::stats::{Metric, Parameter, series};
use cachesim_core::sweep::{ConfigDelta, ExperimentRunner};
use cachesim_core::trace::{self, MemoryAccess};
use cachesim_core::CacheSimulator;

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    version,
    about = "Trace-driven set-associative cache simulator",
    long_about = "Replay a memory-access trace through a configurable cache model.\n\nTrace format: one access per line as `<hex address> <R|W>`; `#` starts a comment.\nConfiguration is JSON (see SimulationConfig); the CLI uses built-in defaults when no file is given.\n\nExamples:\n  cachesim run --trace gcc.trace\n  cachesim run --trace gcc.trace --config l1.json --json\n  cachesim sweep --trace gcc.trace --vary associativity --values 1,2,4,8\n  cachesim gen --count 500 > sample.trace"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace through one configuration.
    Run {
        /// Trace file (`<hex address> <R|W>` per line).
        #[arg(short, long)]
        trace: String,

        /// JSON configuration file (defaults apply when omitted).
        #[arg(short, long)]
        config: Option<String>,

        /// Seed for the Random replacement policy.
        #[arg(long)]
        seed: Option<u64>,

        /// Print the full run result as JSON instead of a report.
        #[arg(long)]
        json: bool,
    },

    /// Replay a trace across many configuration variations.
    Sweep {
        /// Trace file shared by every variation.
        #[arg(short, long)]
        trace: String,

        /// JSON base configuration file.
        #[arg(short, long)]
        config: Option<String>,

        /// Parameter to vary (line_size, num_lines, associativity,
        /// hit_time, read_time, write_time).
        #[arg(long, conflicts_with = "deltas")]
        vary: Option<String>,

        /// Comma-separated values for the varied parameter.
        #[arg(long, value_delimiter = ',', conflicts_with = "deltas")]
        values: Vec<u64>,

        /// JSON file with an explicit array of configuration deltas.
        #[arg(long)]
        deltas: Option<String>,

        /// Metric reported in the (x, y) series.
        #[arg(long, default_value = "hit_rate")]
        metric: Metric,

        /// Worker threads (variations are mutually independent).
        #[arg(long, default_value = "1")]
        jobs: NonZeroUsize,

        /// Seed for the Random replacement policy.
        #[arg(long)]
        seed: Option<u64>,

        /// Print all results as JSON.
        #[arg(long, conflicts_with = "csv")]
        json: bool,

        /// Print the comparison as CSV.
        #[arg(long)]
        csv: bool,
    },

    /// Generate a random sample trace on stdout.
    Gen {
        /// Number of accesses to generate.
        #[arg(long, default_value = "100")]
        count: usize,

        /// Generator seed.
        #[arg(long, default_value = "1")]
        seed: u64,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            trace,
            config,
            seed,
            json,
        } => cmd_run(&trace, config.as_deref(), seed, json),
        Commands::Sweep {
            trace,
            config,
            vary,
            values,
            deltas,
            metric,
            jobs,
            seed,
            json,
            csv,
        } => cmd_sweep(&SweepArgs {
            trace,
            config,
            vary,
            values,
            deltas,
            metric,
            jobs,
            seed,
            json,
            csv,
        }),
        Commands::Gen { count, seed } => print!("{}", trace::generate_sample(count, seed)),
    }
}

/// Arguments of the `sweep` subcommand, grouped to keep `main` flat.
struct SweepArgs {
    trace: String,
    config: Option<String>,
    vary: Option<String>,
    values: Vec<u64>,
    deltas: Option<String>,
    metric: Metric,
    jobs: NonZeroUsize,
    seed: Option<u64>,
    json: bool,
    csv: bool,
}

/// Reads and parses the trace file, exiting on failure.
fn load_trace(path: &str) -> Vec<MemoryAccess> {
    let source = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading trace {path}: {e}");
        process::exit(1);
    });
    trace::parse_trace(&source).unwrap_or_else(|e| {
        eprintln!("Error parsing trace {path}: {e}");
        process::exit(1);
    })
}

/// Reads the JSON configuration file, or the defaults when omitted.
fn load_config(path: Option<&str>) -> SimulationConfig {
    let Some(path) = path else {
        return SimulationConfig::default();
    };
    let source = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading config {path}: {e}");
        process::exit(1);
    });
    serde_json::from_str(&source).unwrap_or_else(|e| {
        eprintln!("Error parsing config {path}: {e}");
        process::exit(1);
    })
}

/// Runs one configuration and prints the report or JSON result.
fn cmd_run(trace_path: &str, config_path: Option<&str>, seed: Option<u64>, json: bool) {
    let config = load_config(config_path);
    let accesses = load_trace(trace_path);
    let summary = trace::summarize(&accesses);

    let mut simulator = match seed {
        Some(seed) => CacheSimulator::with_seed(config.cache, config.memory, seed),
        None => CacheSimulator::new(config.cache, config.memory),
    }
    .unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {e}");
        process::exit(1);
    });

    simulator.run(&accesses);
    let result = simulator.into_result();

    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Error serializing result: {e}");
                process::exit(1);
            }
        }
        return;
    }

    println!(
        "trace: {} accesses ({} reads, {} writes, {} unique addresses)",
        summary.total_accesses, summary.reads, summary.writes, summary.unique_addresses
    );
    print_report(&result);
}

/// Prints one run's statistics report.
///
/// Rendering contract: rates and times with exactly 4 decimals, counts and
/// sizes as integers.
fn print_report(result: &RunResult) {
    let stats = &result.statistics;
    let counters = &stats.counters;
    let config = &result.cache;

    println!("\n==========================================================");
    println!("CACHE SIMULATION STATISTICS");
    println!("==========================================================");
    println!(
        "configuration            {} B lines x {} ({}-way, {:?}, {:?})",
        config.line_size,
        config.num_lines,
        config.associativity,
        config.write_policy,
        config.replacement_policy
    );
    println!("cache_size               {} B", config.size_bytes());
    println!("----------------------------------------------------------");
    println!("accesses                 {}", counters.total_accesses);
    println!("  reads                  {}", counters.read_accesses);
    println!("  writes                 {}", counters.write_accesses);
    println!("hits                     {}", counters.hits);
    println!("misses                   {}", counters.misses);
    println!("hit_rate                 {:.4}%", stats.hit_rate);
    println!("read_hit_rate            {:.4}%", stats.read_hit_rate);
    println!("write_hit_rate           {:.4}%", stats.write_hit_rate);
    println!("----------------------------------------------------------");
    println!("memory_reads             {}", counters.memory_reads);
    println!("memory_writes            {}", counters.memory_writes);
    println!(
        "avg_access_time          {:.4} ns",
        stats.average_access_time
    );
    println!("==========================================================");
}

/// Builds the delta list from `--vary/--values` or a deltas file.
fn build_deltas(args: &SweepArgs) -> Vec<ConfigDelta> {
    if let Some(path) = &args.deltas {
        let source = fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error reading deltas {path}: {e}");
            process::exit(1);
        });
        return serde_json::from_str(&source).unwrap_or_else(|e| {
            eprintln!("Error parsing deltas {path}: {e}");
            process::exit(1);
        });
    }

    let Some(vary) = &args.vary else {
        eprintln!("Error: specify --vary <parameter> --values a,b,c or --deltas <file>");
        process::exit(1);
    };
    if args.values.is_empty() {
        eprintln!("Error: --vary requires --values a,b,c");
        process::exit(1);
    }

    args.values
        .iter()
        .map(|&value| {
            let mut delta = ConfigDelta::default();
            match vary.as_str() {
                "line_size" => delta.line_size = Some(value as u32),
                "num_lines" => delta.num_lines = Some(value as u32),
                "associativity" => delta.associativity = Some(value as u32),
                "hit_time" => delta.hit_time = Some(value),
                "read_time" => delta.read_time = Some(value),
                "write_time" => delta.write_time = Some(value),
                other => {
                    eprintln!("Error: unknown sweep parameter `{other}`");
                    process::exit(1);
                }
            }
            delta
        })
        .collect()
}

/// The x-axis parameter matching a `--vary` name, for the series output.
fn x_parameter(vary: Option<&str>) -> Parameter {
    match vary {
        Some("line_size") => Parameter::LineSize,
        Some("num_lines") => Parameter::NumLines,
        Some("associativity") => Parameter::Associativity,
        Some("hit_time") => Parameter::HitTime,
        _ => Parameter::CacheSizeKb,
    }
}

/// Runs a sweep and prints the comparison in the requested format.
fn cmd_sweep(args: &SweepArgs) {
    let base = load_config(args.config.as_deref());
    let accesses = load_trace(&args.trace);
    let deltas = build_deltas(args);

    let mut runner = ExperimentRunner::new(base, deltas);
    if let Some(seed) = args.seed {
        runner = runner.with_seed(seed);
    }

    let results = runner
        .run_parallel(&accesses, args.jobs)
        .unwrap_or_else(|e| {
            eprintln!("Invalid configuration in sweep: {e}");
            process::exit(1);
        });

    if args.json {
        match serde_json::to_string_pretty(&results) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Error serializing results: {e}");
                process::exit(1);
            }
        }
        return;
    }

    if args.csv {
        println!("config,hit_rate,avg_access_time,memory_reads,memory_writes");
        for (index, result) in results.iter().enumerate() {
            let stats = &result.statistics;
            println!(
                "config_{},{:.4},{:.4},{},{}",
                index + 1,
                stats.hit_rate,
                stats.average_access_time,
                stats.counters.memory_reads,
                stats.counters.memory_writes
            );
        }
        return;
    }

    println!(
        "{:<28} {:>12} {:>14} {:>12} {:>13}",
        "configuration", "hit_rate", "avg_time (ns)", "mem_reads", "mem_writes"
    );
    for result in &results {
        let config = &result.cache;
        let stats = &result.statistics;
        let desc = format!(
            "{} B, {} B block, {}-way",
            config.size_bytes(),
            config.line_size,
            config.associativity
        );
        println!(
            "{:<28} {:>11.4}% {:>14.4} {:>12} {:>13}",
            desc,
            stats.hit_rate,
            stats.average_access_time,
            stats.counters.memory_reads,
            stats.counters.memory_writes
        );
    }

    let x = x_parameter(args.vary.as_deref());
    println!("\nseries ({x} vs {}):", args.metric);
    for (x_value, y_value) in series(&results, x, args.metric) {
        println!("  {x_value} {y_value:.4}");
    }
}
