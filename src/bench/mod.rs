//! Build and query timing for the bounded-distance search benchmark.
//!
//! All statistics live in the returned report structs; nothing is
//! accumulated in globals.

use std::time::{Duration, Instant};

use crate::dense::DenseBitIndex;
use crate::rng::Mwc;
use crate::search::{search, ResultBuf};
use crate::{ConfigError, Key, KeyIndex, MAX_DISTANCE};

/// Validated run parameters: at least one key, every radius in 1..32.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub nkeys: usize,
    pub min_duration: Duration,
    pub radii: Vec<u32>,
}

impl BenchConfig {
    pub fn new(
        nkeys: usize,
        min_duration: Duration,
        radii: Vec<u32>,
    ) -> Result<Self, ConfigError> {
        if nkeys == 0 {
            return Err(ConfigError::ZeroKeys);
        }
        for &radius in &radii {
            if radius == 0 || radius >= MAX_DISTANCE {
                return Err(ConfigError::InvalidRadius(radius));
            }
        }
        Ok(Self {
            nkeys,
            min_duration,
            radii,
        })
    }
}

/// Timed index construction.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Distinct keys indexed.
    pub keys: usize,
    pub elapsed: Duration,
    pub footprint_bytes: usize,
}

pub fn build_index(keys: &[Key]) -> (DenseBitIndex, BuildReport) {
    let start = Instant::now();
    let index = DenseBitIndex::build(keys);
    let elapsed = start.elapsed();
    let report = BuildReport {
        keys: index.len(),
        elapsed,
        footprint_bytes: index.footprint_bytes(),
    };
    (index, report)
}

/// Aggregate query statistics for one radius.
#[derive(Debug, Clone)]
pub struct RadiusReport {
    pub radius: u32,
    pub queries: u64,
    /// Total keys matched across all queries.
    pub hits: u64,
    /// Total membership probes across all queries.
    pub probes: u64,
    pub elapsed: Duration,
}

impl RadiusReport {
    /// Queries per second.
    pub fn rate(&self) -> f64 {
        self.queries as f64 / self.elapsed.as_secs_f64()
    }

    pub fn ms_per_query(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1_000.0 / self.queries as f64
    }

    pub fn hits_per_query(&self) -> f64 {
        self.hits as f64 / self.queries as f64
    }

    /// Probe work relative to a brute-force linear scan:
    /// `probes / (indexed keys * queries)`.
    pub fn coverage(&self, indexed_len: usize) -> f64 {
        self.probes as f64 / (indexed_len as f64 * self.queries as f64)
    }

    pub fn probes_per_hit(&self) -> f64 {
        self.probes as f64 / self.hits as f64
    }
}

/// Drive queries at one radius until `min_duration` has elapsed, with a
/// floor of three queries so a zero-length window still measures work.
///
/// Query keys are drawn from `rng`; one result buffer is reused for the
/// whole loop. Batch sizes grow with the query count so the clock stays
/// off the hot path.
pub fn run_radius<I: KeyIndex>(
    index: &I,
    rng: &mut Mwc,
    radius: u32,
    min_duration: Duration,
) -> RadiusReport {
    let mut out = ResultBuf::new();
    let mut queries = 0u64;
    let mut hits = 0u64;
    let mut probes = 0u64;

    let start = Instant::now();
    let mut elapsed = start.elapsed();
    while queries < 3 || elapsed < min_duration {
        for _ in 0..queries + 1 {
            let query = rng.next_u32();
            out.clear();
            probes += search(index, query, radius, &mut out);
            hits += out.len() as u64;
            queries += 1;
        }
        elapsed = start.elapsed();
    }

    RadiusReport {
        radius,
        queries,
        hits,
        probes,
        elapsed,
    }
}
