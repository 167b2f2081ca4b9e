//! Benchmark driver
//!
//! Runs the same three-phase workload against every heap variant:
//!
//! 1. **insert**: push `iterations` items with random `u32` priorities
//! 2. **find_min**: query the minimum `iterations` times
//! 3. **delete_min**: pop `iterations` times, checking `is_empty` first
//!
//! Each phase is timed and, through an [`AllocProbe`], charged with the
//! allocations it made. The drained priorities must come out sorted; a heap
//! that loses or reorders items fails the run instead of producing numbers.
//!
//! Configuration comes from the environment (see [`DriverConfig::from_env`]).
//!
//! # Example
//!
//! ```rust
//! use mergeable_heaps::driver::{self, DriverConfig, NoAllocProbe, Variant};
//!
//! let config = DriverConfig {
//!     iterations: 1_000,
//!     seed: 7,
//!     variants: vec![Variant::Pairing, Variant::Binary],
//! };
//! let reports = driver::run(&config, &NoAllocProbe).unwrap();
//! assert_eq!(reports.len(), 2);
//! println!("{}", driver::render_table(&reports));
//! ```

use std::fmt;
use std::hint::black_box;
use std::str::FromStr;
use std::time::{Duration, Instant};

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::binary::BinaryHeap;
use crate::binomial::BinomialHeap;
use crate::fibonacci::FibonacciHeap;
use crate::leftist::LeftistHeap;
use crate::pairing::PairingHeap;
use crate::rank_pairing::RankPairingHeap;
use crate::traits::{Heap, HeapError};

/// Environment variable holding the number of items per phase
pub const ITERATIONS_VAR: &str = "HEAP_BENCH_ITERATIONS";
/// Environment variable holding the RNG seed
pub const SEED_VAR: &str = "HEAP_BENCH_SEED";
/// Environment variable holding a comma-separated list of variant names
pub const VARIANTS_VAR: &str = "HEAP_BENCH_VARIANTS";

const DEFAULT_ITERATIONS: usize = 100_000;
const DEFAULT_SEED: u64 = 42;

/// The heap implementations the driver knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Binary,
    Binomial,
    Fibonacci,
    Leftist,
    Pairing,
    RankPairing,
}

impl Variant {
    /// Every variant, in report order
    pub const ALL: [Variant; 6] = [
        Variant::Binary,
        Variant::Binomial,
        Variant::Fibonacci,
        Variant::Leftist,
        Variant::Pairing,
        Variant::RankPairing,
    ];

    /// Short name used in reports and in `HEAP_BENCH_VARIANTS`
    pub fn name(self) -> &'static str {
        match self {
            Variant::Binary => "binary",
            Variant::Binomial => "binomial",
            Variant::Fibonacci => "fibonacci",
            Variant::Leftist => "leftist",
            Variant::Pairing => "pairing",
            Variant::RankPairing => "rank-pairing",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = DriverError;

    /// Case-insensitive; `_` is accepted in place of `-`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Variant::ALL
            .into_iter()
            .find(|variant| variant.name() == wanted)
            .ok_or_else(|| DriverError::UnknownVariant(s.to_string()))
    }
}

/// Errors produced while configuring or running the benchmark
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// A variant name did not match any [`Variant`]
    UnknownVariant(String),
    /// An environment variable held a value that could not be used
    InvalidConfig {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
    /// A heap operation failed during the run
    Heap(HeapError),
    /// The drain did not return every inserted item
    LostItems {
        variant: Variant,
        expected: usize,
        drained: usize,
    },
    /// The drain returned a larger priority before a smaller one
    UnsortedDrain { variant: Variant, position: usize },
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::UnknownVariant(name) => write!(
                f,
                "unknown heap variant {name:?} (expected one of: {})",
                Variant::ALL.map(Variant::name).join(", ")
            ),
            DriverError::InvalidConfig { key, value, reason } => {
                write!(f, "invalid {key}={value:?}: {reason}")
            }
            DriverError::Heap(err) => write!(f, "heap operation failed: {err}"),
            DriverError::LostItems {
                variant,
                expected,
                drained,
            } => write!(f, "{variant} heap drained {drained} of {expected} items"),
            DriverError::UnsortedDrain { variant, position } => {
                write!(f, "{variant} heap drained out of order at position {position}")
            }
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriverError::Heap(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HeapError> for DriverError {
    fn from(err: HeapError) -> Self {
        DriverError::Heap(err)
    }
}

/// Workload item: a payload plus the priority it is queued under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    pub data: usize,
    pub priority: u32,
}

/// What to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Items inserted, queried and deleted per phase
    pub iterations: usize,
    /// Seed for the priority generator; the same seed gives every variant the
    /// same priorities
    pub seed: u64,
    /// Variants to run, in order
    pub variants: Vec<Variant>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            seed: DEFAULT_SEED,
            variants: Variant::ALL.to_vec(),
        }
    }
}

impl DriverConfig {
    /// Reads `HEAP_BENCH_ITERATIONS`, `HEAP_BENCH_SEED` and
    /// `HEAP_BENCH_VARIANTS`, falling back to the defaults for unset ones
    ///
    /// # Errors
    /// Returns [`DriverError::InvalidConfig`] for unparsable values and
    /// [`DriverError::UnknownVariant`] for unrecognised variant names.
    pub fn from_env() -> Result<Self, DriverError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DriverError> {
        let mut config = Self::default();

        if let Some(value) = lookup(ITERATIONS_VAR) {
            config.iterations = match value.trim().parse::<usize>() {
                Ok(0) => return Err(invalid(ITERATIONS_VAR, value, "must be at least 1")),
                Ok(n) => n,
                Err(_) => return Err(invalid(ITERATIONS_VAR, value, "not a whole number")),
            };
        }

        if let Some(value) = lookup(SEED_VAR) {
            config.seed = value
                .trim()
                .parse()
                .map_err(|_| invalid(SEED_VAR, value.clone(), "not a 64-bit unsigned integer"))?;
        }

        if let Some(value) = lookup(VARIANTS_VAR) {
            let variants = value
                .split(',')
                .filter(|name| !name.trim().is_empty())
                .map(str::parse)
                .collect::<Result<Vec<Variant>, _>>()?;
            if variants.is_empty() {
                return Err(invalid(VARIANTS_VAR, value, "names no variants"));
            }
            config.variants = variants;
        }

        Ok(config)
    }
}

fn invalid(key: &'static str, value: String, reason: &'static str) -> DriverError {
    DriverError::InvalidConfig { key, value, reason }
}

/// Source of a monotonically increasing allocation count
///
/// The `heap-bench` binary reads the counting global allocator; closures
/// returning `u64` work directly.
pub trait AllocProbe {
    /// Allocations made by the process so far
    fn allocations(&self) -> u64;
}

impl<F: Fn() -> u64> AllocProbe for F {
    fn allocations(&self) -> u64 {
        self()
    }
}

/// Probe for runs without an allocation counter; always reports zero
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAllocProbe;

impl AllocProbe for NoAllocProbe {
    fn allocations(&self) -> u64 {
        0
    }
}

/// Cost of one phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpReport {
    /// Wall time for the whole phase
    pub total: Duration,
    /// Mean nanoseconds per operation
    pub per_op_ns: f64,
    /// Allocations made during the phase
    pub allocations: u64,
}

impl OpReport {
    fn new(total: Duration, ops: usize, allocations: u64) -> Self {
        let per_op_ns = if ops == 0 {
            0.0
        } else {
            total.as_nanos() as f64 / ops as f64
        };
        Self {
            total,
            per_op_ns,
            allocations,
        }
    }
}

/// Costs of all three phases for one variant
#[derive(Debug, Clone, PartialEq)]
pub struct VariantReport {
    pub variant: Variant,
    pub iterations: usize,
    pub insert: OpReport,
    pub find_min: OpReport,
    pub delete_min: OpReport,
}

/// Times `phase` and counts its allocations
fn measure<R>(
    ops: usize,
    probe: &impl AllocProbe,
    phase: impl FnOnce() -> R,
) -> (R, OpReport) {
    let allocs_before = probe.allocations();
    let start = Instant::now();
    let result = phase();
    let elapsed = start.elapsed();
    let allocations = probe.allocations().saturating_sub(allocs_before);
    (result, OpReport::new(elapsed, ops, allocations))
}

/// Generates the workload shared by every variant for a given seed
fn workload(config: &DriverConfig) -> Vec<Stat> {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    (0..config.iterations)
        .map(|data| Stat {
            data,
            priority: rng.gen(),
        })
        .collect()
}

/// Runs the three phases against one heap type
///
/// # Errors
/// Fails if a heap operation errors or the drain is incomplete or unsorted.
pub fn run_variant<H>(
    variant: Variant,
    config: &DriverConfig,
    probe: &impl AllocProbe,
) -> Result<VariantReport, DriverError>
where
    H: Heap<Stat, u32>,
    H::Order: Default,
{
    info!("{variant}: {} iterations, seed {}", config.iterations, config.seed);

    let stats = workload(config);
    let n = stats.len();
    let mut drained = Vec::with_capacity(n);
    let mut heap = H::new();

    let ((), insert) = measure(n, probe, || {
        for stat in stats {
            heap.push(stat.priority, stat);
        }
    });
    debug!("{variant}: insert {:.1} ns/op, {} allocs", insert.per_op_ns, insert.allocations);

    let (found, find_min) = measure(n, probe, || -> Result<(), HeapError> {
        for _ in 0..n {
            black_box(heap.find_min()?);
        }
        Ok(())
    });
    found?;
    debug!("{variant}: find_min {:.1} ns/op, {} allocs", find_min.per_op_ns, find_min.allocations);

    let (popped, delete_min) = measure(n, probe, || -> Result<(), HeapError> {
        for _ in 0..n {
            if heap.is_empty() {
                break;
            }
            let (priority, _stat) = heap.delete_min()?;
            drained.push(priority);
        }
        Ok(())
    });
    popped?;
    debug!(
        "{variant}: delete_min {:.1} ns/op, {} allocs",
        delete_min.per_op_ns, delete_min.allocations
    );

    if drained.len() != n {
        return Err(DriverError::LostItems {
            variant,
            expected: n,
            drained: drained.len(),
        });
    }
    if let Some(position) = drained.windows(2).position(|pair| pair[0] > pair[1]) {
        return Err(DriverError::UnsortedDrain {
            variant,
            position: position + 1,
        });
    }

    info!("{variant}: done in {:?}", insert.total + find_min.total + delete_min.total);
    Ok(VariantReport {
        variant,
        iterations: n,
        insert,
        find_min,
        delete_min,
    })
}

/// Runs every configured variant in order
///
/// # Errors
/// Stops at the first variant that fails.
pub fn run(config: &DriverConfig, probe: &impl AllocProbe) -> Result<Vec<VariantReport>, DriverError> {
    info!("Running {} heap variants", config.variants.len());
    config
        .variants
        .iter()
        .map(|&variant| match variant {
            Variant::Binary => run_variant::<BinaryHeap<Stat, u32>>(variant, config, probe),
            Variant::Binomial => run_variant::<BinomialHeap<Stat, u32>>(variant, config, probe),
            Variant::Fibonacci => run_variant::<FibonacciHeap<Stat, u32>>(variant, config, probe),
            Variant::Leftist => run_variant::<LeftistHeap<Stat, u32>>(variant, config, probe),
            Variant::Pairing => run_variant::<PairingHeap<Stat, u32>>(variant, config, probe),
            Variant::RankPairing => {
                run_variant::<RankPairingHeap<Stat, u32>>(variant, config, probe)
            }
        })
        .collect()
}

fn format_time(ns: f64) -> String {
    if ns < 1_000.0 {
        format!("{:.1}ns", ns)
    } else if ns < 1_000_000.0 {
        format!("{:.1}us", ns / 1_000.0)
    } else if ns < 1_000_000_000.0 {
        format!("{:.1}ms", ns / 1_000_000.0)
    } else {
        format!("{:.2}s", ns / 1_000_000_000.0)
    }
}

/// Formats reports as a fixed-width table, one row per variant
///
/// Times are per operation; allocation columns are totals for the phase.
pub fn render_table(reports: &[VariantReport]) -> String {
    let mut out = format!(
        "{:<14} {:>10} {:>10} {:>12} {:>12} {:>12} {:>12}\n",
        "variant", "insert", "find_min", "delete_min", "ins allocs", "find allocs", "del allocs"
    );
    for report in reports {
        out.push_str(&format!(
            "{:<14} {:>10} {:>10} {:>12} {:>12} {:>12} {:>12}\n",
            report.variant.name(),
            format_time(report.insert.per_op_ns),
            format_time(report.find_min.per_op_ns),
            format_time(report.delete_min.per_op_ns),
            report.insert.allocations,
            report.find_min.allocations,
            report.delete_min.allocations,
        ));
    }
    out
}
