//! Leftist Heap implementation
//!
//! A leftist heap is a heap-ordered binary tree in which every node's left
//! subtree has rank at least that of its right subtree, where the rank of a
//! node is the length of its rightmost path down to a missing child. The
//! right spine therefore has at most ⌊log₂(n + 1)⌋ nodes.
//!
//! Merge is the only structural primitive:
//! - **Merge**: O(log n) worst - merge along the right spines, then swap
//!   children wherever the right side outranks the left
//! - **Insert**: O(log n) worst - merge with a singleton
//! - **Delete-min**: O(log n) worst - discard the root, merge its children
//!
//! Nodes are uniquely owned boxes. The recursion in merge only follows right
//! spines, so its depth is logarithmic; the left side can grow arbitrarily
//! deep, which is why the heap tears itself down iteratively on drop.

use std::mem;

use crate::rank::{checked_increment, Rank};
use crate::traits::{Comparator, Heap, NaturalOrder};

type Link<T, P> = Option<Box<Node<T, P>>>;

struct Node<T, P> {
    priority: P,
    item: T,
    /// Length of the rightmost path to a missing child (a leaf has rank 1)
    rank: Rank,
    left: Link<T, P>,
    right: Link<T, P>,
}

#[inline]
fn rank_of<T, P>(link: &Link<T, P>) -> Rank {
    link.as_ref().map_or(0, |node| node.rank)
}

/// Leftist Heap
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::leftist::LeftistHeap;
/// use mergeable_heaps::Heap;
///
/// let mut a = LeftistHeap::new();
/// a.push(5, "five");
/// let mut b = LeftistHeap::new();
/// b.push(2, "two");
///
/// a.merge(b);
/// assert_eq!(a.pop(), Some((2, "two")));
/// ```
pub struct LeftistHeap<T, P, C = NaturalOrder> {
    root: Link<T, P>,
    len: usize,
    order: C,
}

impl<T, P, C> Drop for LeftistHeap<T, P, C> {
    fn drop(&mut self) {
        // Detach children before each node drops so no drop recurses
        let mut pending: Vec<Box<Node<T, P>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

impl<T, P, C: Comparator<P>> Heap<T, P> for LeftistHeap<T, P, C> {
    type Order = C;

    fn with_comparator(order: C) -> Self {
        Self {
            root: None,
            len: 0,
            order,
        }
    }

    fn comparator(&self) -> &C {
        &self.order
    }

    fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    fn len(&self) -> usize {
        self.len
    }

    fn push(&mut self, priority: P, item: T) {
        let singleton = Box::new(Node {
            priority,
            item,
            rank: 1,
            left: None,
            right: None,
        });
        let root = self.root.take();
        self.root = Self::meld(&self.order, root, Some(singleton));
        self.len += 1;
    }

    fn peek(&self) -> Option<(&P, &T)> {
        self.root.as_ref().map(|node| (&node.priority, &node.item))
    }

    fn pop(&mut self) -> Option<(P, T)> {
        let root = self.root.take()?;
        let Node {
            priority,
            item,
            left,
            right,
            ..
        } = *root;

        self.root = Self::meld(&self.order, left, right);
        self.len -= 1;
        Some((priority, item))
    }

    fn merge(&mut self, mut other: Self) {
        let theirs = other.root.take();
        let ours = self.root.take();
        self.root = Self::meld(&self.order, ours, theirs);
        self.len += mem::take(&mut other.len);
    }
}

impl<T, P: Ord> LeftistHeap<T, P> {
    /// Creates an empty min-heap ordered by `P: Ord`
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T, P, C: Comparator<P>> LeftistHeap<T, P, C> {
    /// Merges two leftist trees along their right spines
    ///
    /// The smaller root wins (ties keep `a` on top), its right subtree is
    /// merged with the loser, and the children are swapped if the new right
    /// subtree outranks the left. Recursion depth is bounded by the sum of
    /// the two right spine lengths.
    fn meld(order: &C, a: Link<T, P>, b: Link<T, P>) -> Link<T, P> {
        match (a, b) {
            (None, tree) | (tree, None) => tree,
            (Some(mut a), Some(mut b)) => {
                if order.less(&b.priority, &a.priority) {
                    mem::swap(&mut a, &mut b);
                }

                let right = a.right.take();
                a.right = Self::meld(order, right, Some(b));

                if rank_of(&a.left) < rank_of(&a.right) {
                    mem::swap(&mut a.left, &mut a.right);
                }
                a.rank = checked_increment(rank_of(&a.right));
                Some(a)
            }
        }
    }
}

impl<T, P, C: Comparator<P> + Default> Default for LeftistHeap<T, P, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}
