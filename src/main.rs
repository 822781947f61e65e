//! Benchmark driver: generate keys, build the dense index once, then
//! time bounded-distance queries for each requested radius.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use hamming_ball::bench::{build_index, run_radius, BenchConfig};
use hamming_ball::keygen::{self, KeySource};
use hamming_ball::rng::Mwc;
use hamming_ball::search::{search, ResultBuf};
use hamming_ball::{Key, KeyIndex};

#[derive(Parser, Debug)]
#[command(name = "hamming-ball")]
#[command(about = "Bounded-radius Hamming search benchmark over a dense 32-bit membership index")]
struct Args {
    /// Number of distinct keys to index
    nkeys: usize,

    /// Minimum benchmark duration per radius, in seconds
    seconds: u64,

    /// Radius values to test (maximum Hamming distance, 1..32)
    #[arg(required = true)]
    radii: Vec<u32>,

    /// Read keys from a line-delimited file (decimal or 0b-prefixed
    /// binary) instead of drawing them from the PRNG
    #[arg(long)]
    keys_file: Option<PathBuf>,

    /// PRNG seed (default: derived from the wall clock)
    #[arg(long)]
    seed: Option<u32>,

    /// Per-radius hit/coverage/probe statistics
    #[arg(short, long)]
    verbose: bool,

    /// After each radius, print one example query and its matches in
    /// binary, unchanged bits as '.'
    #[arg(long)]
    print: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = BenchConfig::new(
        args.nkeys,
        Duration::from_secs(args.seconds),
        args.radii.clone(),
    )?;

    let (mut rng, seed) = match args.seed {
        Some(seed) => (Mwc::seed(seed), seed),
        None => Mwc::from_time(),
    };
    eprintln!("seed: {seed}");

    println!("Type: bitset search");
    println!("Keys: {}", config.nkeys);
    println!("Seconds (at least): {}", args.seconds);
    println!();

    println!("Generating keys...");
    let keys = match &args.keys_file {
        Some(path) => {
            let list = keygen::read_key_file(path)?;
            keygen::generate(&mut KeySource::Literal(list), config.nkeys)?
        }
        None => keygen::generate(&mut KeySource::Rng(&mut rng), config.nkeys)?,
    };

    println!("Building index...");
    let (index, build) = build_index(&keys);
    drop(keys);
    println!("Time: {:.3} sec", build.elapsed.as_secs_f64());
    println!("Keys indexed: {}", build.keys);
    println!("Index size: {} bytes", build.footprint_bytes);

    for &radius in &config.radii {
        let report = run_radius(&index, &mut rng, radius, config.min_duration);
        if args.verbose {
            println!();
            println!("Distance: {radius}");
            println!("Rate: {:.3} query/sec", report.rate());
            println!("Time: {:.6} msec/query", report.ms_per_query());
            println!("Queries: {}", report.queries);
            println!("Hits: {:.6}", report.hits_per_query());
            println!("Coverage: {:.6}%", 100.0 * report.coverage(index.len()));
            println!("Probes/hit: {:.3}", report.probes_per_hit());
        } else {
            println!("{:2} {:10.2} {:10}", report.radius, report.rate(), report.queries);
        }

        if args.print {
            print_example_query(&index, &mut rng, radius);
        }
    }

    Ok(())
}

/// 32-character binary rendering of a key.
fn key_bits(key: Key) -> String {
    format!("{key:032b}")
}

/// Binary rendering relative to `query`: positions equal to the query
/// are shown as '.', flipped positions show their bit value.
fn key_bits_diff(key: Key, query: Key) -> String {
    let diff = key ^ query;
    (0..32)
        .rev()
        .map(|i| {
            if (diff >> i) & 1 == 0 {
                '.'
            } else if (key >> i) & 1 == 1 {
                '1'
            } else {
                '0'
            }
        })
        .collect()
}

fn print_example_query<I: KeyIndex>(index: &I, rng: &mut Mwc, radius: u32) {
    let query = rng.next_u32();
    let mut out = ResultBuf::new();
    search(index, query, radius, &mut out);
    println!("Query: {}", key_bits(query));
    for &key in &out {
        println!("       {}", key_bits_diff(key, query));
    }
}
