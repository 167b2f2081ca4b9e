//! Common traits for heap data structures
//!
//! This module provides the contract every heap variant satisfies so that the
//! variants can be benchmarked against each other fairly:
//!
//! - [`Comparator`]: how two priorities are ordered
//! - [`Heap`]: the uniform insert / find-min / delete-min / merge interface
//! - [`DecreaseKeyHeap`]: handle-based priority updates for the variants whose
//!   design supports them cheaply
//!
//! Heaps store `(priority, item)` pairs to separate the ordering key from the
//! payload. All heaps are min-heaps with respect to their comparator; use
//! [`ReverseOrder`] for max-heap behaviour.

use std::cmp::Ordering;
use std::fmt;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// The operation needs at least one element but the heap is empty
    EmptyHeap,
    /// The priority cannot be ordered by the heap's comparator
    InvalidComparator,
    /// The new priority is not less than the current priority
    PriorityNotDecreased,
    /// The handle is no longer valid (element was removed)
    InvalidHandle,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::EmptyHeap => write!(f, "heap is empty"),
            HeapError::InvalidComparator => {
                write!(f, "priority is not orderable by the heap's comparator")
            }
            HeapError::PriorityNotDecreased => {
                write!(f, "new priority is not less than current priority")
            }
            HeapError::InvalidHandle => {
                write!(f, "handle is no longer valid (element was removed)")
            }
        }
    }
}

impl std::error::Error for HeapError {}

/// Total order over priorities.
///
/// Ties are broken arbitrarily but consistently by each heap: insertion order
/// is **not** preserved among equal priorities, and different variants may
/// return tied items in different orders.
pub trait Comparator<P> {
    /// Compares two priorities.
    fn compare(&self, a: &P, b: &P) -> Ordering;

    /// Returns true if `a` orders strictly before `b`.
    #[inline]
    fn less(&self, a: &P, b: &P) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    /// Checks that a priority can take part in the order at all.
    ///
    /// Comparators over partially ordered types use this to reject values
    /// such as NaN. [`Heap::try_push`] calls it before inserting.
    #[inline]
    fn admit(&self, _priority: &P) -> Result<(), HeapError> {
        Ok(())
    }
}

/// Ascending order of an [`Ord`] priority (min-heap). The default comparator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<P: Ord> Comparator<P> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &P, b: &P) -> Ordering {
        a.cmp(b)
    }
}

/// Descending order of an [`Ord`] priority (max-heap).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReverseOrder;

impl<P: Ord> Comparator<P> for ReverseOrder {
    #[inline]
    fn compare(&self, a: &P, b: &P) -> Ordering {
        b.cmp(a)
    }
}

/// Ascending order of a [`PartialOrd`] priority such as `f64`.
///
/// Priorities that are not comparable with themselves (NaN) are rejected by
/// [`Comparator::admit`]. If one is inserted anyway through [`Heap::push`] it
/// compares equal to everything and the heap's output order is unspecified,
/// though the heap stays memory safe and keeps every item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialOrder;

impl<P: PartialOrd> Comparator<P> for PartialOrder {
    #[inline]
    fn compare(&self, a: &P, b: &P) -> Ordering {
        a.partial_cmp(b).unwrap_or(Ordering::Equal)
    }

    fn admit(&self, priority: &P) -> Result<(), HeapError> {
        match priority.partial_cmp(priority) {
            Some(_) => Ok(()),
            None => Err(HeapError::InvalidComparator),
        }
    }
}

/// Order given by a user-supplied function.
///
/// ```rust
/// use mergeable_heaps::traits::OrderBy;
/// use mergeable_heaps::pairing::PairingHeap;
/// use mergeable_heaps::Heap;
///
/// // Order strings by length
/// let mut heap = PairingHeap::with_comparator(OrderBy::new(|a: &String, b: &String| {
///     a.len().cmp(&b.len())
/// }));
/// heap.push("three".to_string(), 3);
/// heap.push("one".to_string(), 1);
/// assert_eq!(heap.pop(), Some(("one".to_string(), 1)));
/// ```
#[derive(Clone, Copy)]
pub struct OrderBy<F> {
    f: F,
}

impl<F> OrderBy<F> {
    /// Wraps an ordering function.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> fmt::Debug for OrderBy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderBy").finish_non_exhaustive()
    }
}

impl<P, F: Fn(&P, &P) -> Ordering> Comparator<P> for OrderBy<F> {
    #[inline]
    fn compare(&self, a: &P, b: &P) -> Ordering {
        (self.f)(a, b)
    }
}

/// A handle to an element in the heap, used for decrease_key operations
///
/// This is an opaque type that identifies a specific element in the heap.
/// The exact implementation varies by heap type.
pub trait Handle: Clone + PartialEq + Eq {}

/// Base trait for heap/priority queue data structures
///
/// The API mirrors Rust's `BinaryHeap` (`push` / `peek` / `pop`) and adds
/// `Result`-returning `find_min` / `delete_min` that report
/// [`HeapError::EmptyHeap`] explicitly. Emptiness should be checked with
/// [`is_empty`](Heap::is_empty) or [`len`](Heap::len); the error is for
/// callers that treat an empty heap as a fault, not a loop condition.
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::{Heap, HeapError};
/// use mergeable_heaps::binary::BinaryHeap;
///
/// let mut heap = BinaryHeap::new();
/// heap.push(3, "three");
/// heap.push(1, "one");
/// heap.push(2, "two");
///
/// assert_eq!(heap.peek(), Some((&1, &"one")));
/// assert_eq!(heap.pop(), Some((1, "one")));
/// assert_eq!(heap.delete_min(), Ok((2, "two")));
/// assert_eq!(heap.delete_min(), Ok((3, "three")));
/// assert_eq!(heap.delete_min(), Err(HeapError::EmptyHeap));
/// ```
pub trait Heap<T, P>: Sized {
    /// The ordering used for priorities
    type Order: Comparator<P>;

    /// Creates a new empty heap ordered by `order`
    fn with_comparator(order: Self::Order) -> Self;

    /// Creates a new empty heap using the comparator's default value
    fn new() -> Self
    where
        Self::Order: Default,
    {
        Self::with_comparator(Self::Order::default())
    }

    /// Returns the heap's comparator
    fn comparator(&self) -> &Self::Order;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts an element with the given priority
    ///
    /// # Time Complexity
    /// O(log n) for the binary, leftist and binomial heaps; O(1) for the
    /// pairing, Fibonacci and rank-pairing heaps.
    fn push(&mut self, priority: P, item: T);

    /// Inserts an element after checking that the comparator can order it
    ///
    /// # Errors
    /// Returns [`HeapError::InvalidComparator`] and leaves the heap unchanged
    /// if the comparator rejects `priority`.
    fn try_push(&mut self, priority: P, item: T) -> Result<(), HeapError> {
        self.comparator().admit(&priority)?;
        self.push(priority, item);
        Ok(())
    }

    /// Returns the minimum priority and associated item without removing it
    ///
    /// # Time Complexity
    /// O(1) for all implementations
    fn peek(&self) -> Option<(&P, &T)>;

    /// Removes and returns the minimum priority and associated item
    ///
    /// # Time Complexity
    /// O(log n), amortized for the pairing, Fibonacci and rank-pairing heaps.
    fn pop(&mut self) -> Option<(P, T)>;

    /// Like [`peek`](Heap::peek), reporting an empty heap as an error
    ///
    /// # Errors
    /// Returns [`HeapError::EmptyHeap`] if the heap has no elements.
    fn find_min(&self) -> Result<(&P, &T), HeapError> {
        self.peek().ok_or(HeapError::EmptyHeap)
    }

    /// Like [`pop`](Heap::pop), reporting an empty heap as an error
    ///
    /// # Errors
    /// Returns [`HeapError::EmptyHeap`] if the heap has no elements; the heap
    /// is left untouched.
    fn delete_min(&mut self) -> Result<(P, T), HeapError> {
        self.pop().ok_or(HeapError::EmptyHeap)
    }

    /// Merges another heap into this one, consuming the other heap
    ///
    /// The receiving heap keeps its own comparator. A heap can never be
    /// merged with itself: `other` is moved in by value.
    ///
    /// # Time Complexity
    /// O(1) structural work for the pairing, Fibonacci and rank-pairing
    /// heaps (plus relocating `other`'s nodes), O(log n) for the leftist and
    /// binomial heaps, O(n + m) for the binary heap.
    fn merge(&mut self, other: Self);

    /// Merges two heaps into a new one, consuming both
    fn merged(mut self, other: Self) -> Self {
        self.merge(other);
        self
    }
}

/// Extended heap trait with `decrease_key` support
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::{Heap, DecreaseKeyHeap};
/// use mergeable_heaps::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.push_with_handle(10, "item");
/// heap.decrease_key(&handle, 5).unwrap();
/// assert_eq!(heap.peek(), Some((&5, &"item")));
/// ```
pub trait DecreaseKeyHeap<T, P>: Heap<T, P> {
    /// The handle type for this heap, used to reference elements for decrease_key
    type Handle: Handle;

    /// Inserts an element with the given priority, returning a handle
    ///
    /// Handles stay valid until their element is popped. Merging another heap
    /// into this one keeps this heap's handles valid; handles issued by the
    /// consumed heap become invalid.
    fn push_with_handle(&mut self, priority: P, item: T) -> Self::Handle;

    /// Decreases the priority of an element identified by the handle
    ///
    /// # Errors
    /// Returns `HeapError::InvalidHandle` if the element was already removed,
    /// and `HeapError::PriorityNotDecreased` if the new priority is not
    /// strictly less than the current one. The heap is unchanged on error.
    ///
    /// # Time Complexity
    /// - Fibonacci Heap: O(1) amortized
    /// - Pairing Heap: o(log n) amortized
    /// - Rank-Pairing Heap: O(1) amortized
    fn decrease_key(&mut self, handle: &Self::Handle, new_priority: P) -> Result<(), HeapError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_and_reverse_order() {
        assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
        assert_eq!(ReverseOrder.compare(&1, &2), Ordering::Greater);
        assert!(NaturalOrder.less(&-5, &0));
        assert!(!NaturalOrder.less(&3, &3));
    }

    #[test]
    fn test_partial_order_rejects_nan() {
        assert_eq!(PartialOrder.admit(&1.5f64), Ok(()));
        assert_eq!(PartialOrder.admit(&f64::NAN), Err(HeapError::InvalidComparator));
        assert_eq!(PartialOrder.compare(&1.0f64, &2.0), Ordering::Less);
    }

    #[test]
    fn test_order_by() {
        let by_len = OrderBy::new(|a: &&str, b: &&str| a.len().cmp(&b.len()));
        assert_eq!(by_len.compare(&"ab", &"abc"), Ordering::Less);
        assert_eq!(by_len.compare(&"xy", &"ab"), Ordering::Equal);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(HeapError::EmptyHeap.to_string(), "heap is empty");
        assert!(HeapError::InvalidHandle.to_string().contains("no longer valid"));
    }
}
