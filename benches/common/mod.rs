//! Workloads shared by the wall-clock and allocation benchmarks.
//!
//! Each group runs every heap variant on the same seeded `u32` priorities,
//! mirroring the insert / find / delete benchmarks of the driver.

use std::hint::black_box;

use criterion::measurement::Measurement;
use criterion::{BatchSize, BenchmarkGroup, BenchmarkId, Criterion, Throughput};
use mergeable_heaps::binary::BinaryHeap;
use mergeable_heaps::binomial::BinomialHeap;
use mergeable_heaps::driver::{Stat, Variant};
use mergeable_heaps::fibonacci::FibonacciHeap;
use mergeable_heaps::leftist::LeftistHeap;
use mergeable_heaps::pairing::PairingHeap;
use mergeable_heaps::rank_pairing::RankPairingHeap;
use mergeable_heaps::Heap;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const SEED: u64 = 42;
const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

/// Registers one benchmark function for every heap variant
macro_rules! for_each_variant {
    ($bench:ident, $group:expr, $stats:expr) => {
        $bench::<BinaryHeap<Stat, u32>, _>($group, Variant::Binary, $stats);
        $bench::<BinomialHeap<Stat, u32>, _>($group, Variant::Binomial, $stats);
        $bench::<FibonacciHeap<Stat, u32>, _>($group, Variant::Fibonacci, $stats);
        $bench::<LeftistHeap<Stat, u32>, _>($group, Variant::Leftist, $stats);
        $bench::<PairingHeap<Stat, u32>, _>($group, Variant::Pairing, $stats);
        $bench::<RankPairingHeap<Stat, u32>, _>($group, Variant::RankPairing, $stats);
    };
}

fn workload(size: usize) -> Vec<Stat> {
    let mut rng = SmallRng::seed_from_u64(SEED);
    (0..size)
        .map(|data| Stat {
            data,
            priority: rng.gen(),
        })
        .collect()
}

fn build<H>(stats: &[Stat]) -> H
where
    H: Heap<Stat, u32>,
    H::Order: Default,
{
    let mut heap = H::new();
    for stat in stats {
        heap.push(stat.priority, *stat);
    }
    heap
}

fn insert<H, M>(group: &mut BenchmarkGroup<'_, M>, variant: Variant, stats: &[Stat])
where
    H: Heap<Stat, u32>,
    H::Order: Default,
    M: Measurement,
{
    group.bench_with_input(BenchmarkId::new(variant.name(), stats.len()), stats, |b, stats| {
        b.iter_with_large_drop(|| build::<H>(black_box(stats)));
    });
}

fn find_min<H, M>(group: &mut BenchmarkGroup<'_, M>, variant: Variant, stats: &[Stat])
where
    H: Heap<Stat, u32>,
    H::Order: Default,
    M: Measurement,
{
    let heap = build::<H>(stats);
    group.bench_with_input(BenchmarkId::new(variant.name(), stats.len()), &heap, |b, heap| {
        b.iter(|| black_box(heap.find_min()));
    });
}

fn delete_min<H, M>(group: &mut BenchmarkGroup<'_, M>, variant: Variant, stats: &[Stat])
where
    H: Heap<Stat, u32>,
    H::Order: Default,
    M: Measurement,
{
    group.bench_with_input(BenchmarkId::new(variant.name(), stats.len()), stats, |b, stats| {
        b.iter_batched(
            || build::<H>(stats),
            |mut heap| {
                while !heap.is_empty() {
                    let _ = black_box(heap.delete_min());
                }
                heap
            },
            BatchSize::LargeInput,
        );
    });
}

/// Builds a heap of `size` random priorities, per variant
pub fn bench_insert<M: Measurement>(c: &mut Criterion<M>) {
    let mut group = c.benchmark_group("insert");
    for size in SIZES {
        let stats = workload(size);
        group.throughput(Throughput::Elements(size as u64));
        for_each_variant!(insert, &mut group, &stats);
    }
    group.finish();
}

/// A single find-min on a heap of `size` items, per variant
pub fn bench_find_min<M: Measurement>(c: &mut Criterion<M>) {
    let mut group = c.benchmark_group("find_min");
    for size in SIZES {
        let stats = workload(size);
        group.throughput(Throughput::Elements(1));
        for_each_variant!(find_min, &mut group, &stats);
    }
    group.finish();
}

/// Drains a heap of `size` items, per variant
pub fn bench_delete_min<M: Measurement>(c: &mut Criterion<M>) {
    let mut group = c.benchmark_group("delete_min");
    for size in SIZES {
        let stats = workload(size);
        group.throughput(Throughput::Elements(size as u64));
        for_each_variant!(delete_min, &mut group, &stats);
    }
    group.finish();
}
