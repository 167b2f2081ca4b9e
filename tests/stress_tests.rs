//! Stress tests that push the heaps through large operation counts
//!
//! These run the same patterns against every variant to catch structural
//! bugs that only show up once trees get deep or wide.

use mergeable_heaps::binary::BinaryHeap;
use mergeable_heaps::binomial::BinomialHeap;
use mergeable_heaps::fibonacci::FibonacciHeap;
use mergeable_heaps::leftist::LeftistHeap;
use mergeable_heaps::pairing::PairingHeap;
use mergeable_heaps::rank::RankRule;
use mergeable_heaps::rank_pairing::{Passes, RankPairingConfig, RankPairingHeap};
use mergeable_heaps::{DecreaseKeyHeap, Heap};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Insert then drain a large ascending run
fn test_massive_operations<H: Heap<i32, i32, Order: Default>>() {
    let mut heap = H::new();

    for i in 0..10_000 {
        heap.push(i, i);
    }
    assert_eq!(heap.len(), 10_000);

    for i in 0..10_000 {
        assert_eq!(heap.pop(), Some((i, i)));
    }
    assert!(heap.is_empty());
}

/// Descending inserts force a new minimum every push
fn test_descending_inserts<H: Heap<i32, i32, Order: Default>>() {
    let mut heap = H::new();

    for i in (0..10_000).rev() {
        heap.push(i, i);
        assert_eq!(heap.peek(), Some((&i, &i)));
    }

    for i in 0..10_000 {
        assert_eq!(heap.pop(), Some((i, i)));
    }
}

/// Interleaved pushes and pops keep the heap small but churn it constantly
fn test_alternating_ops<H: Heap<i32, i32, Order: Default>>() {
    let mut heap = H::new();
    let mut popped = 0;

    for i in 0..2_000 {
        heap.push(i * 2, i);
        heap.push(i * 2 + 1, i + 100_000);
        assert!(heap.pop().is_some());
        popped += 1;
    }
    assert_eq!(heap.len(), 4_000 - popped);

    let mut last = i32::MIN;
    while let Some((priority, _)) = heap.pop() {
        assert!(priority >= last);
        last = priority;
    }
}

/// Merging two large interleaved heaps yields every key in order
fn test_large_merge<H: Heap<i32, i32, Order: Default>>() {
    let mut evens = H::new();
    let mut odds = H::new();

    for i in 0..5_000 {
        evens.push(i * 2, i);
        odds.push(i * 2 + 1, i);
    }

    evens.merge(odds);
    assert_eq!(evens.len(), 10_000);

    for i in 0..10_000 {
        assert_eq!(evens.pop().map(|(p, _)| p), Some(i));
    }
}

/// Repeatedly fold many small heaps into one
fn test_many_small_merges<H: Heap<i32, i32, Order: Default>>() {
    let mut heap = H::new();

    for chunk in 0..1_000 {
        let mut small = H::new();
        for j in 0..5 {
            small.push(chunk * 5 + j, chunk);
        }
        heap.merge(small);
        if chunk % 10 == 0 {
            assert!(heap.pop().is_some());
        }
    }
    assert_eq!(heap.len(), 5_000 - 100);

    let mut last = i32::MIN;
    while let Some((priority, _)) = heap.pop() {
        assert!(priority >= last);
        last = priority;
    }
}

/// Random keys with heavy duplication
fn test_random_duplicates<H: Heap<i32, i32, Order: Default>>() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut heap = H::new();
    let mut keys: Vec<i32> = (0..20_000).map(|_| rng.gen_range(0..64)).collect();

    for &key in &keys {
        heap.push(key, key);
    }

    keys.sort_unstable();
    for key in keys {
        assert_eq!(heap.pop().map(|(p, _)| p), Some(key));
    }
    assert!(heap.is_empty());
}

/// Decrease every key after a pop has built deep trees
fn test_many_decrease_keys<H: DecreaseKeyHeap<i32, i32, Order: Default>>() {
    let mut heap = H::new();
    let mut handles = Vec::new();

    for i in 0..2_000 {
        handles.push(heap.push_with_handle(100_000 + i, i));
    }
    // Sentinel that is popped to force consolidation before the decreases
    heap.push(-1, -1);
    assert_eq!(heap.pop(), Some((-1, -1)));

    for (i, handle) in handles.iter().enumerate().rev() {
        assert!(heap.decrease_key(handle, i as i32).is_ok());
    }

    for i in 0..2_000 {
        assert_eq!(heap.pop(), Some((i, i)));
    }
    assert!(heap.is_empty());
}

/// Random decreases interleaved with pops, checked against a reference
fn test_random_decrease_keys<H: DecreaseKeyHeap<usize, i64, Order: Default>>() {
    let mut rng = SmallRng::seed_from_u64(99);
    let mut heap = H::new();
    let mut handles = Vec::new();
    let mut live: Vec<Option<i64>> = Vec::new();

    for i in 0..3_000 {
        let priority = rng.gen_range(0..1_000_000);
        handles.push(heap.push_with_handle(priority, i));
        live.push(Some(priority));
    }

    for round in 0..6_000 {
        if round % 4 == 3 {
            let (priority, index) = heap.pop().expect("heap is not empty");
            assert_eq!(live[index], Some(priority));
            live[index] = None;
            continue;
        }

        let index = rng.gen_range(0..handles.len());
        if let Some(priority) = live[index] {
            let lowered = priority - rng.gen_range(1..10_000);
            assert!(heap.decrease_key(&handles[index], lowered).is_ok());
            live[index] = Some(lowered);
        } else {
            assert!(heap.decrease_key(&handles[index], 0).is_err());
        }
    }

    let mut last = i64::MIN;
    while let Some((priority, index)) = heap.pop() {
        assert!(priority >= last);
        assert_eq!(live[index], Some(priority));
        live[index] = None;
        last = priority;
    }
    assert!(live.iter().all(Option::is_none));
}

/// Deep trees with no intervening pop still drop without overflowing the stack
fn test_deep_drop<H: Heap<i32, i32, Order: Default>>() {
    let mut heap = H::new();
    for i in 0..200_000 {
        heap.push(i, i);
    }
    assert_eq!(heap.pop(), Some((0, 0)));
    drop(heap);
}

macro_rules! stress_tests {
    ($name:ident, $heap:ty) => {
        mod $name {
            use super::*;

            #[test]
            fn massive_operations() {
                test_massive_operations::<$heap>();
            }

            #[test]
            fn descending_inserts() {
                test_descending_inserts::<$heap>();
            }

            #[test]
            fn alternating_ops() {
                test_alternating_ops::<$heap>();
            }

            #[test]
            fn large_merge() {
                test_large_merge::<$heap>();
            }

            #[test]
            fn many_small_merges() {
                test_many_small_merges::<$heap>();
            }

            #[test]
            fn random_duplicates() {
                test_random_duplicates::<$heap>();
            }

            #[test]
            fn deep_drop() {
                test_deep_drop::<$heap>();
            }
        }
    };
}

stress_tests!(binary, BinaryHeap<i32, i32>);
stress_tests!(leftist, LeftistHeap<i32, i32>);
stress_tests!(pairing, PairingHeap<i32, i32>);
stress_tests!(binomial, BinomialHeap<i32, i32>);
stress_tests!(fibonacci, FibonacciHeap<i32, i32>);
stress_tests!(rank_pairing, RankPairingHeap<i32, i32>);

#[test]
fn test_pairing_many_decrease_keys() {
    test_many_decrease_keys::<PairingHeap<i32, i32>>();
    test_random_decrease_keys::<PairingHeap<usize, i64>>();
}

#[test]
fn test_fibonacci_many_decrease_keys() {
    test_many_decrease_keys::<FibonacciHeap<i32, i32>>();
    test_random_decrease_keys::<FibonacciHeap<usize, i64>>();
}

#[test]
fn test_rank_pairing_many_decrease_keys() {
    test_many_decrease_keys::<RankPairingHeap<i32, i32>>();
    test_random_decrease_keys::<RankPairingHeap<usize, i64>>();
}

#[test]
fn test_rank_pairing_configs_under_load() {
    let mut rng = SmallRng::seed_from_u64(3);
    let keys: Vec<i32> = (0..20_000).map(|_| rng.gen()).collect();
    let mut expected = keys.clone();
    expected.sort_unstable();

    for rank_rule in [RankRule::One, RankRule::Two] {
        for passes in [Passes::Single, Passes::Multi] {
            let config = RankPairingConfig { rank_rule, passes };
            let mut heap = RankPairingHeap::with_config(config);
            let mut handles = Vec::with_capacity(keys.len());
            for &key in &keys {
                handles.push(heap.push_with_handle(key, ()));
            }
            assert_eq!(heap.pop().map(|(p, _)| p), expected.first().copied());

            let mut drained = vec![expected[0]];
            while let Some((priority, ())) = heap.pop() {
                drained.push(priority);
            }
            assert_eq!(drained, expected, "{config:?}");
        }
    }
}
