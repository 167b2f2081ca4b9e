//! Allocation benchmarks for the six heap variants
//!
//! Runs the same workloads as `heap_ops` but reports heap allocations per
//! iteration instead of time. The counting allocator is installed as this
//! binary's global allocator.
//!
//! ## Running
//!
//! ```bash
//! cargo bench --bench heap_allocs
//! ```

use alloc_measurement::{AllocMeasurement, CountingAllocator};
use criterion::{criterion_group, criterion_main, Criterion};

mod common;

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

criterion_group!(
    name = alloc_benches;
    config = Criterion::default()
        .with_measurement(AllocMeasurement::new())
        .sample_size(10);
    targets = common::bench_insert, common::bench_find_min, common::bench_delete_min
);
criterion_main!(alloc_benches);
