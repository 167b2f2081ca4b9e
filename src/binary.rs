//! Binary Heap implementation
//!
//! The array-backed baseline every other variant is measured against. The
//! heap is a complete binary tree stored level by level in a `Vec`: index
//! `i` has children `2i + 1` and `2i + 2`.
//!
//! # Time Complexity
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | `push`    | O(log n)   |
//! | `pop`     | O(log n)   |
//! | `peek`    | O(1)       |
//! | `merge`   | O(n + m)   |
//!
//! The binary heap is not a mergeable heap in the efficient sense: `merge`
//! exists only so it can share the [`Heap`] interface, and rebuilds the
//! combined array with a bottom-up heapify.
//!
//! # Example
//!
//! ```rust
//! use mergeable_heaps::Heap;
//! use mergeable_heaps::binary::BinaryHeap;
//!
//! let mut heap = BinaryHeap::new();
//! heap.push(3, "three");
//! heap.push(1, "one");
//! heap.push(2, "two");
//!
//! assert_eq!(heap.peek(), Some((&1, &"one")));
//! assert_eq!(heap.pop(), Some((1, "one")));
//! assert_eq!(heap.pop(), Some((2, "two")));
//! assert_eq!(heap.pop(), Some((3, "three")));
//! assert_eq!(heap.pop(), None);
//! ```

use crate::traits::{Comparator, Heap, NaturalOrder};

/// A binary min-heap over `(priority, item)` pairs
#[derive(Debug, Clone)]
pub struct BinaryHeap<T, P, C = NaturalOrder> {
    /// The heap data stored as a vector of (priority, item) pairs
    data: Vec<(P, T)>,
    order: C,
}

impl<T, P, C: Comparator<P>> Heap<T, P> for BinaryHeap<T, P, C> {
    type Order = C;

    fn with_comparator(order: C) -> Self {
        Self {
            data: Vec::new(),
            order,
        }
    }

    fn comparator(&self) -> &C {
        &self.order
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn push(&mut self, priority: P, item: T) {
        self.data.push((priority, item));
        self.sift_up(self.data.len() - 1);
    }

    fn peek(&self) -> Option<(&P, &T)> {
        self.data.first().map(|(p, t)| (p, t))
    }

    fn pop(&mut self) -> Option<(P, T)> {
        if self.data.is_empty() {
            return None;
        }

        let last_idx = self.data.len() - 1;
        self.data.swap(0, last_idx);
        let result = self.data.pop();

        if !self.data.is_empty() {
            self.sift_down(0);
        }

        result
    }

    fn merge(&mut self, other: Self) {
        if other.data.is_empty() {
            return;
        }
        if self.data.is_empty() {
            self.data = other.data;
            return;
        }

        self.data.extend(other.data);
        self.heapify();
    }
}

impl<T, P: Ord> BinaryHeap<T, P> {
    /// Creates an empty min-heap ordered by `P: Ord`
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T, P, C: Comparator<P>> BinaryHeap<T, P, C> {
    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        self.order.less(&self.data[a].0, &self.data[b].0)
    }

    /// Move element at index up to maintain heap property
    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.less(index, parent) {
                self.data.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Move element at index down to maintain heap property
    fn sift_down(&mut self, mut index: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;

            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }

            if smallest != index {
                self.data.swap(index, smallest);
                index = smallest;
            } else {
                break;
            }
        }
    }

    /// Floyd's bottom-up construction: sift down every internal node
    fn heapify(&mut self) {
        let len = self.data.len();
        if len < 2 {
            return;
        }
        for index in (0..len / 2).rev() {
            self.sift_down(index);
        }
    }

    #[cfg(test)]
    fn is_heap_ordered(&self) -> bool {
        (1..self.data.len()).all(|i| !self.less(i, (i - 1) / 2))
    }
}

impl<T, P, C: Comparator<P> + Default> Default for BinaryHeap<T, P, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T, P, C: Comparator<P> + Default> FromIterator<(P, T)> for BinaryHeap<T, P, C> {
    /// Builds the heap in O(n) with a single heapify pass
    fn from_iter<I: IntoIterator<Item = (P, T)>>(iter: I) -> Self {
        let mut heap = Self::with_comparator(C::default());
        heap.data = iter.into_iter().collect();
        heap.heapify();
        heap
    }
}
