//! Allocation counting for heap benchmarks.
//!
//! This crate provides a [`CountingAllocator`] that wraps the system allocator
//! and counts every allocation, plus (behind the `criterion` feature) a
//! Criterion `Measurement` that reports allocations per iteration instead of
//! wall clock time.
//!
//! The counters are process-wide, so the allocator has to be installed as the
//! global allocator of the benchmark binary:
//!
//! ```ignore
//! use alloc_measurement::CountingAllocator;
//!
//! #[global_allocator]
//! static GLOBAL: CountingAllocator = CountingAllocator;
//!
//! let before = CountingAllocator::snapshot();
//! let v = vec![1u8; 64];
//! let delta = CountingAllocator::snapshot().since(&before);
//! assert_eq!(delta.allocations, 1);
//! ```
//!
//! With the `criterion` feature:
//!
//! ```ignore
//! use criterion::{criterion_group, criterion_main, Criterion};
//! use alloc_measurement::AllocMeasurement;
//!
//! fn bench(c: &mut Criterion<AllocMeasurement>) {
//!     c.bench_function("my_function", |b| b.iter(|| my_function()));
//! }
//!
//! criterion_group!(
//!     name = benches;
//!     config = Criterion::default().with_measurement(AllocMeasurement::new());
//!     targets = bench
//! );
//! criterion_main!(benches);
//! ```

#![warn(missing_docs)]

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};

static ALLOCATIONS: AtomicU64 = AtomicU64::new(0);
static DEALLOCATIONS: AtomicU64 = AtomicU64::new(0);
static REALLOCATIONS: AtomicU64 = AtomicU64::new(0);
static BYTES_ALLOCATED: AtomicU64 = AtomicU64::new(0);

/// Global allocator that forwards to [`System`] and counts calls.
///
/// Counting uses relaxed atomics: the totals are exact, but allocations made
/// by other threads between two snapshots are attributed to the interval.
#[derive(Debug, Default, Clone, Copy)]
pub struct CountingAllocator;

/// Allocation counters read at one point in time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocSnapshot {
    /// Calls to `alloc` and `alloc_zeroed`
    pub allocations: u64,
    /// Calls to `dealloc`
    pub deallocations: u64,
    /// Calls to `realloc`
    pub reallocations: u64,
    /// Bytes requested by `alloc`, `alloc_zeroed` and growing `realloc`
    pub bytes: u64,
}

impl AllocSnapshot {
    /// Counter deltas accumulated since `earlier`.
    #[must_use]
    pub fn since(&self, earlier: &AllocSnapshot) -> AllocSnapshot {
        AllocSnapshot {
            allocations: self.allocations.wrapping_sub(earlier.allocations),
            deallocations: self.deallocations.wrapping_sub(earlier.deallocations),
            reallocations: self.reallocations.wrapping_sub(earlier.reallocations),
            bytes: self.bytes.wrapping_sub(earlier.bytes),
        }
    }

    /// Trips to the allocator that may hand out new memory: fresh
    /// allocations plus reallocations, so container growth is counted.
    #[must_use]
    pub fn requests(&self) -> u64 {
        self.allocations.wrapping_add(self.reallocations)
    }
}

impl CountingAllocator {
    /// Read the current process-wide counters.
    #[must_use]
    pub fn snapshot() -> AllocSnapshot {
        AllocSnapshot {
            allocations: ALLOCATIONS.load(Ordering::Relaxed),
            deallocations: DEALLOCATIONS.load(Ordering::Relaxed),
            reallocations: REALLOCATIONS.load(Ordering::Relaxed),
            bytes: BYTES_ALLOCATED.load(Ordering::Relaxed),
        }
    }
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
        BYTES_ALLOCATED.fetch_add(layout.size() as u64, Ordering::Relaxed);
        System.alloc(layout)
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
        BYTES_ALLOCATED.fetch_add(layout.size() as u64, Ordering::Relaxed);
        System.alloc_zeroed(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        DEALLOCATIONS.fetch_add(1, Ordering::Relaxed);
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        REALLOCATIONS.fetch_add(1, Ordering::Relaxed);
        if new_size > layout.size() {
            BYTES_ALLOCATED.fetch_add((new_size - layout.size()) as u64, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

#[cfg(feature = "criterion")]
pub use measurement::{AllocFormatter, AllocMeasurement};

#[cfg(feature = "criterion")]
mod measurement {
    use super::{AllocSnapshot, CountingAllocator};
    use criterion::{
        measurement::{Measurement, ValueFormatter},
        Throughput,
    };

    /// Criterion measurement that counts allocations instead of time.
    ///
    /// Each sample is [`AllocSnapshot::requests`] over the iteration. Only
    /// meaningful when [`CountingAllocator`] is the global allocator of
    /// the benchmark binary; otherwise every sample reads zero.
    #[derive(Clone, Default)]
    pub struct AllocMeasurement {
        formatter: AllocFormatter,
    }

    impl AllocMeasurement {
        /// Create a new allocation measurement.
        #[must_use]
        pub fn new() -> Self {
            Self {
                formatter: AllocFormatter,
            }
        }
    }

    impl Measurement for AllocMeasurement {
        type Intermediate = AllocSnapshot;
        type Value = u64;

        fn start(&self) -> Self::Intermediate {
            CountingAllocator::snapshot()
        }

        fn end(&self, intermediate: Self::Intermediate) -> Self::Value {
            CountingAllocator::snapshot()
                .since(&intermediate)
                .requests()
        }

        fn add(&self, v1: &Self::Value, v2: &Self::Value) -> Self::Value {
            v1 + v2
        }

        fn zero(&self) -> Self::Value {
            0
        }

        #[allow(clippy::cast_precision_loss)]
        fn to_f64(&self, val: &Self::Value) -> f64 {
            *val as f64
        }

        fn formatter(&self) -> &dyn ValueFormatter {
            &self.formatter
        }
    }

    /// Formats allocation counts, scaling to thousands or millions.
    #[derive(Clone, Copy, Default)]
    pub struct AllocFormatter;

    impl ValueFormatter for AllocFormatter {
        fn scale_values(&self, typical_value: f64, values: &mut [f64]) -> &'static str {
            if typical_value < 1_000.0 {
                "allocs"
            } else if typical_value < 1_000_000.0 {
                for val in values.iter_mut() {
                    *val /= 1_000.0;
                }
                "Kallocs"
            } else {
                for val in values.iter_mut() {
                    *val /= 1_000_000.0;
                }
                "Mallocs"
            }
        }

        #[allow(clippy::cast_precision_loss)]
        fn scale_throughputs(
            &self,
            _typical_value: f64,
            throughput: &Throughput,
            values: &mut [f64],
        ) -> &'static str {
            // Allocations per element rather than a rate
            match throughput {
                Throughput::Elements(n) => {
                    for val in values.iter_mut() {
                        *val /= *n as f64;
                    }
                    "allocs/elem"
                }
                Throughput::Bytes(n) | Throughput::BytesDecimal(n) => {
                    for val in values.iter_mut() {
                        *val /= *n as f64;
                    }
                    "allocs/B"
                }
            }
        }

        fn scale_for_machines(&self, _values: &mut [f64]) -> &'static str {
            "allocs"
        }
    }
}
