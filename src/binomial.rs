//! Binomial Heap implementation
//!
//! A binomial heap is a collection of binomial trees with:
//! - O(log n) worst-case insert (O(1) amortized over a sequence of inserts)
//! - O(log n) delete_min and merge
//! - O(1) find_min through a cached minimum slot
//!
//! # Algorithm Overview
//!
//! A binomial heap maintains a collection of binomial trees, where:
//! - Each tree satisfies the heap property
//! - At most one tree of each rank (0, 1, 2, ..., log n)
//! - This is analogous to binary representation of n
//!
//! **Binomial Tree Bₖ**: Recursively defined:
//! - B₀ is a single node
//! - Bₖ is formed by linking two B_{k-1} trees
//! - Bₖ has exactly 2ᵏ nodes and its root has children B₀, B₁, ..., B_{k-1}
//!
//! Because a root's children are exactly one tree of each smaller rank, this
//! implementation stores them in a `Vec` indexed by rank. Removing a root
//! therefore hands back a ready-made rank-indexed forest.
//!
//! **Key Operations**:
//! - **Insert**: merge a single-node tree into the forest (binary increment)
//! - **Delete-min**: remove the minimum root, merge its children back
//! - **Merge**: merge trees by rank with carry propagation (binary addition)
//!
//! **Invariant**: After every operation, at most one tree of each rank and
//! `min` names the slot holding the smallest root.

use std::iter;
use std::mem;

use crate::traits::{Comparator, Heap, NaturalOrder};

/// Internal node structure for binomial heap
///
/// `children[i]` is the root of a Bᵢ tree, so `children.len()` is the node's
/// rank and the subtree holds 2^rank nodes.
struct Node<T, P> {
    priority: P,
    item: T,
    children: Vec<Box<Node<T, P>>>,
}

impl<T, P> Node<T, P> {
    #[inline]
    fn rank(&self) -> usize {
        self.children.len()
    }
}

type Forest<T, P> = Vec<Option<Box<Node<T, P>>>>;

/// Binomial Heap
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::binomial::BinomialHeap;
/// use mergeable_heaps::Heap;
///
/// let mut heap = BinomialHeap::new();
/// heap.push(5, "five");
/// heap.push(1, "one");
/// assert_eq!(heap.find_min(), Ok((&1, &"one")));
/// ```
pub struct BinomialHeap<T, P, C = NaturalOrder> {
    /// Binomial trees indexed by rank. Each slot holds at most one tree and
    /// the last slot is never empty.
    trees: Forest<T, P>,
    /// Rank slot of the minimum root
    min: Option<usize>,
    /// Number of elements in the heap
    len: usize,
    order: C,
}

impl<T, P, C: Comparator<P>> Heap<T, P> for BinomialHeap<T, P, C> {
    type Order = C;

    fn with_comparator(order: C) -> Self {
        Self {
            trees: Vec::new(),
            min: None,
            len: 0,
            order,
        }
    }

    fn comparator(&self) -> &C {
        &self.order
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn len(&self) -> usize {
        self.len
    }

    /// Inserts a new element into the heap
    ///
    /// **Time Complexity**: O(log n) worst-case, O(1) amortized
    ///
    /// **Algorithm**: binary increment. Starting at rank 0, a carried tree
    /// either drops into an empty slot or links with the occupant and moves
    /// one rank up.
    ///
    /// The minimum slot is maintained without a rescan: if the new priority
    /// is strictly smaller it wins every link and ends up as the root of the
    /// placed tree; otherwise an old minimum swept up by the carry is now the
    /// placed tree's root (nothing can be smaller than it).
    fn push(&mut self, priority: P, item: T) {
        let new_is_min = match self.min {
            Some(slot) => self.order.less(&priority, &self.root(slot).priority),
            None => true,
        };

        let mut carry = Box::new(Node {
            priority,
            item,
            children: Vec::new(),
        });

        let mut rank = 0;
        let placed = loop {
            if rank == self.trees.len() {
                self.trees.push(Some(carry));
                break rank;
            }
            match self.trees[rank].take() {
                None => {
                    self.trees[rank] = Some(carry);
                    break rank;
                }
                Some(existing) => {
                    carry = Self::link(&self.order, existing, carry);
                    rank += 1;
                }
            }
        };

        self.min = match self.min {
            _ if new_is_min => Some(placed),
            Some(slot) if slot < placed => Some(placed),
            unchanged => unchanged,
        };
        self.len += 1;
    }

    fn peek(&self) -> Option<(&P, &T)> {
        self.min.map(|slot| {
            let node = self.root(slot);
            (&node.priority, &node.item)
        })
    }

    /// Removes and returns the minimum element
    ///
    /// **Time Complexity**: O(log n) worst-case
    ///
    /// **Algorithm**:
    /// 1. Take the tree in the minimum slot
    /// 2. Its root's children are B₀..B_{k-1}: already a rank-indexed forest
    /// 3. Add that forest back into the heap (binary addition)
    /// 4. Rescan the O(log n) roots for the new minimum
    fn pop(&mut self) -> Option<(P, T)> {
        let slot = self.min?;
        let root = self.trees[slot]
            .take()
            .expect("minimum slot always holds a tree");
        let Node {
            priority,
            item,
            children,
        } = *root;

        self.trim();
        self.add_forest(children.into_iter().map(Some).collect());
        self.refresh_min();
        self.len -= 1;

        Some((priority, item))
    }

    /// Merges another heap into this heap
    ///
    /// **Time Complexity**: O(log n) worst-case
    ///
    /// **Algorithm**: rank-by-rank binary addition of the two forests; two
    /// trees of equal rank link into one of rank + 1 which is carried
    /// forward, exactly like adding two binary numbers.
    fn merge(&mut self, mut other: Self) {
        if other.is_empty() {
            return;
        }
        let forest = mem::take(&mut other.trees);
        self.add_forest(forest);
        self.refresh_min();
        self.len += other.len;
    }
}

impl<T, P: Ord> BinomialHeap<T, P> {
    /// Creates an empty min-heap ordered by `P: Ord`
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T, P, C: Comparator<P>> BinomialHeap<T, P, C> {
    #[inline]
    fn root(&self, slot: usize) -> &Node<T, P> {
        self.trees[slot]
            .as_deref()
            .expect("slot named by `min` always holds a tree")
    }

    /// Links two binomial trees of the same rank into one tree of rank + 1
    ///
    /// **Time Complexity**: O(1)
    ///
    /// The root with the smaller priority becomes the parent (ties keep `a`),
    /// and the other tree is appended as its highest-rank child.
    fn link(order: &C, a: Box<Node<T, P>>, b: Box<Node<T, P>>) -> Box<Node<T, P>> {
        debug_assert_eq!(a.rank(), b.rank());
        let (mut parent, child) = if order.less(&b.priority, &a.priority) {
            (b, a)
        } else {
            (a, b)
        };
        parent.children.push(child);
        parent
    }

    /// Adds a rank-indexed forest into this heap's forest
    ///
    /// At each rank up to three trees can meet (ours, theirs, carry); two of
    /// them link into the carry and the third, if any, stays in the slot.
    fn add_forest(&mut self, other: Forest<T, P>) {
        let width = self.trees.len().max(other.len());
        self.trees.resize_with(width, || None);

        let mut carry: Option<Box<Node<T, P>>> = None;
        let theirs = other.into_iter().chain(iter::repeat_with(|| None));

        for (rank, theirs) in theirs.take(width).enumerate() {
            let ours = self.trees[rank].take();
            match (ours, theirs, carry.take()) {
                (None, None, None) => {}
                (Some(tree), None, None) | (None, Some(tree), None) | (None, None, Some(tree)) => {
                    self.trees[rank] = Some(tree);
                }
                (Some(a), Some(b), rest) => {
                    self.trees[rank] = rest;
                    carry = Some(Self::link(&self.order, a, b));
                }
                (Some(a), None, Some(b)) | (None, Some(a), Some(b)) => {
                    carry = Some(Self::link(&self.order, a, b));
                }
            }
        }

        if let Some(tree) = carry {
            self.trees.push(Some(tree));
        }
        self.trim();
    }

    /// Drops empty slots from the top of the forest
    fn trim(&mut self) {
        while let Some(None) = self.trees.last() {
            self.trees.pop();
        }
    }

    /// Finds the minimum slot by scanning all roots
    fn refresh_min(&mut self) {
        let mut best: Option<usize> = None;
        for (slot, tree) in self.trees.iter().enumerate() {
            let Some(tree) = tree else { continue };
            best = match best {
                Some(current) if !self.order.less(&tree.priority, &self.root(current).priority) => {
                    Some(current)
                }
                _ => Some(slot),
            };
        }
        self.min = best;
    }
}

impl<T, P, C: Comparator<P> + Default> Default for BinomialHeap<T, P, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Checks that `node` roots a well-formed heap-ordered Bₖ; returns its size
    fn check_tree<T, P: Ord>(node: &Node<T, P>) -> usize {
        let mut size = 1;
        for (rank, child) in node.children.iter().enumerate() {
            assert_eq!(child.rank(), rank, "children must be B0..B(k-1) in order");
            assert!(node.priority <= child.priority, "heap order violated");
            size += check_tree(child);
        }
        assert_eq!(size, 1 << node.rank(), "a Bk tree has 2^k nodes");
        size
    }

    fn check_invariants<T, P: Ord + std::fmt::Debug>(heap: &BinomialHeap<T, P>) {
        let mut total = 0;
        for (rank, tree) in heap.trees.iter().enumerate() {
            if let Some(tree) = tree {
                assert_eq!(tree.rank(), rank, "tree stored in the wrong slot");
                total += check_tree(tree);
            }
        }
        assert_eq!(total, heap.len());
        assert!(!matches!(heap.trees.last(), Some(None)), "untrimmed forest");

        let true_min = heap.trees.iter().flatten().map(|t| &t.priority).min();
        assert_eq!(heap.peek().map(|(p, _)| p), true_min);
    }

    #[test]
    fn test_forest_mirrors_binary_count() {
        let mut heap = BinomialHeap::new();
        for i in 0..37 {
            heap.push(100 - i, i);
            check_invariants(&heap);
        }

        // 37 = 0b100101: trees of rank 0, 2 and 5
        let occupied: Vec<usize> = heap
            .trees
            .iter()
            .enumerate()
            .filter_map(|(rank, tree)| tree.as_ref().map(|_| rank))
            .collect();
        assert_eq!(occupied, vec![0, 2, 5]);
    }

    #[test]
    fn test_pop_restores_invariants() {
        let mut heap = BinomialHeap::new();
        for i in [13, 2, 8, 21, 5, 1, 34, 3, 1, 55] {
            heap.push(i, ());
        }
        check_invariants(&heap);

        let mut drained = Vec::new();
        while let Some((p, ())) = heap.pop() {
            check_invariants(&heap);
            drained.push(p);
        }
        assert_eq!(drained, vec![1, 1, 2, 3, 5, 8, 13, 21, 34, 55]);
    }

    #[test]
    fn test_merge_carries() {
        // 7 + 1 = 8: every rank carries into a single B3
        let mut heap1 = BinomialHeap::new();
        for i in 0..7 {
            heap1.push(i * 3, i);
        }
        let mut heap2 = BinomialHeap::new();
        heap2.push(-1, 99);

        heap1.merge(heap2);
        check_invariants(&heap1);
        assert_eq!(heap1.trees.len(), 4);
        assert!(heap1.trees[..3].iter().all(Option::is_none));
        assert_eq!(heap1.peek(), Some((&-1, &99)));
    }

    #[test]
    fn test_min_tracking_with_ties() {
        let mut heap = BinomialHeap::new();
        heap.push(4, "a");
        heap.push(4, "b");
        heap.push(4, "c");
        check_invariants(&heap);
        assert_eq!(heap.peek().map(|(p, _)| *p), Some(4));
        heap.push(2, "d");
        assert_eq!(heap.peek(), Some((&2, &"d")));
        check_invariants(&heap);
    }
}
