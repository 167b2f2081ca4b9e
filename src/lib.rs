//! Mergeable Heap Data Structures for Rust
//!
//! This crate provides six min-priority queues behind one interface so that
//! they can be benchmarked against each other on identical workloads.
//!
//! # Features
//!
//! - **Binary Heap**: O(log n) insert and delete-min; O(n + m) merge (the baseline)
//! - **Leftist Heap**: O(log n) insert, delete-min and merge, all worst case
//! - **Pairing Heap**: O(1) insert and merge; O(log n) amortized delete-min; o(log n) amortized decrease_key
//! - **Binomial Heap**: O(log n) insert, delete-min and merge; O(1) find-min
//! - **Fibonacci Heap**: O(1) insert and merge; O(1) amortized decrease_key; O(log n) amortized delete-min
//! - **Rank-Pairing Heap**: O(1) insert and merge; O(1) amortized decrease_key; O(log n) amortized delete-min
//!
//! Every heap implements [`Heap`]. The pairing, Fibonacci and rank-pairing
//! heaps also implement [`DecreaseKeyHeap`].
//!
//! The [`driver`] module runs the insert / find-min / delete-min workload
//! over every variant and is what the `heap-bench` binary calls.
//!
//! # Example
//!
//! ```rust
//! use mergeable_heaps::fibonacci::FibonacciHeap;
//! use mergeable_heaps::{DecreaseKeyHeap, Heap};
//!
//! let mut heap = FibonacciHeap::new();
//! let handle1 = heap.push_with_handle(5, "item1");
//! let _handle2 = heap.push_with_handle(3, "item2");
//! heap.decrease_key(&handle1, 1).unwrap();
//! assert_eq!(heap.find_min(), Ok((&1, &"item1")));
//! ```

pub mod binary;
pub mod binomial;
pub mod driver;
pub mod fibonacci;
pub mod leftist;
pub mod pairing;
pub mod rank;
pub mod rank_pairing;
pub mod storage;
pub mod traits;

// Re-export the main traits for convenience
pub use traits::{Comparator, DecreaseKeyHeap, Heap, HeapError};
