//! Rank-Pairing Heap implementation
//!
//! A rank-pairing heap is a heap data structure that achieves:
//! - O(1) insert and merge (merge also relocates the other heap's nodes)
//! - O(1) amortized decrease_key
//! - O(log n) amortized delete_min
//!
//! Rank-pairing heaps are designed to be simpler than Fibonacci heaps while
//! maintaining the same optimal amortized bounds. There are no mark bits and
//! no cascading cuts: ranks are explicit and restored locally.
//!
//! # Algorithm Overview
//!
//! The heap is a list of **half-trees**. Every node has a `left` and a `right`
//! child, but a node is only ordered against its left subtree: all nodes in
//! the left subtree of `x` have priority ≥ `x`. A root has no right child.
//!
//! - **Insert**: add a rank-0 half-tree to the root list
//! - **Merge**: concatenate root lists, keep the smaller minimum
//! - **Delete-min**: remove the minimum root, walk its left child's right
//!   spine and turn every spine node into a half-tree root, then link
//!   half-trees of equal rank
//! - **Decrease-key**: cut the node (with its left subtree) into a new
//!   half-tree, splice its right child into its old place, then recompute
//!   ranks up the ancestor path until they stop changing
//!
//! # Ranks
//!
//! A root's rank is one more than its left child's (0 with no left child).
//! A non-root's rank follows the configured [`RankRule`]; a missing child
//! counts as rank −1.
//!
//! # Example
//!
//! ```rust
//! use mergeable_heaps::rank::RankRule;
//! use mergeable_heaps::rank_pairing::{Passes, RankPairingConfig, RankPairingHeap};
//! use mergeable_heaps::Heap;
//!
//! let mut heap = RankPairingHeap::with_config(RankPairingConfig {
//!     rank_rule: RankRule::Two,
//!     passes: Passes::Multi,
//! });
//! heap.push(3, "c");
//! heap.push(1, "a");
//! assert_eq!(heap.pop(), Some((1, "a")));
//! ```

use smallvec::SmallVec;

use crate::rank::{checked_increment, root_rank, Rank, RankRule};
use crate::storage::{relocate_link, Arena, NodeKey, NodeRef, Relocate, Relocation};
use crate::traits::{Comparator, DecreaseKeyHeap, Handle, Heap, HeapError, NaturalOrder};

/// How delete-min links the half-trees it has collected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Passes {
    /// Link each pair of equal-rank half-trees once, then stop. Winners of a
    /// link are not linked again in the same delete-min.
    #[default]
    Single,
    /// Keep linking until every root has a distinct rank, as in a binomial
    /// queue.
    Multi,
}

/// Tuning knobs for [`RankPairingHeap`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankPairingConfig {
    /// Rank rule for non-root nodes
    pub rank_rule: RankRule,
    /// Consolidation strategy during delete-min
    pub passes: Passes,
}

/// Handle to an element in a Rank-pairing heap
///
/// Valid until the element is popped. Handles of a heap that was merged into
/// another one stop resolving.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RankPairingHandle(NodeRef);

impl Handle for RankPairingHandle {}

/// Internal node structure for rank-pairing heap
///
/// `parent` points at the node this one hangs from, whether as the left or
/// the right child; roots have no parent and no right child.
struct Node<T, P> {
    priority: P,
    item: T,
    left: Option<NodeKey>,
    right: Option<NodeKey>,
    parent: Option<NodeKey>,
    rank: Rank,
}

impl<T, P> Relocate for Node<T, P> {
    fn relocate(&mut self, moved: &Relocation) {
        relocate_link(&mut self.left, moved);
        relocate_link(&mut self.right, moved);
        relocate_link(&mut self.parent, moved);
    }
}

/// Rank-indexed buckets used while linking; ranks are O(log n)
type RankBuckets = SmallVec<[Option<NodeKey>; 64]>;

/// Rank-Pairing Heap
pub struct RankPairingHeap<T, P, C = NaturalOrder> {
    nodes: Arena<Node<T, P>>,
    /// Half-tree roots, in no particular order
    roots: Vec<NodeKey>,
    min: Option<NodeKey>,
    config: RankPairingConfig,
    order: C,
}

impl<T, P, C: Comparator<P>> Heap<T, P> for RankPairingHeap<T, P, C> {
    type Order = C;

    fn with_comparator(order: C) -> Self {
        Self::with_config_and_comparator(RankPairingConfig::default(), order)
    }

    fn comparator(&self) -> &C {
        &self.order
    }

    fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn push(&mut self, priority: P, item: T) {
        self.push_with_handle(priority, item);
    }

    fn peek(&self) -> Option<(&P, &T)> {
        self.min.map(|min| {
            let node = &self.nodes[min];
            (&node.priority, &node.item)
        })
    }

    /// Removes and returns the minimum element
    ///
    /// **Time Complexity**: O(log n) amortized
    ///
    /// **Algorithm**:
    /// 1. Remove the minimum root
    /// 2. Walk the right spine of its left child; each spine node loses its
    ///    right child and becomes a half-tree root with rank = left + 1
    /// 3. Link half-trees of equal rank (one pass or until distinct)
    /// 4. Rescan the roots for the new minimum
    fn pop(&mut self) -> Option<(P, T)> {
        let min = self.min.take()?;
        let node = self.nodes.remove(min).expect("minimum key is always live");

        let mut roots = std::mem::take(&mut self.roots);
        roots.retain(|&root| root != min);

        let mut spine = node.left;
        while let Some(key) = spine {
            spine = self.nodes[key].right.take();
            self.nodes[key].parent = None;
            self.nodes[key].rank = root_rank(self.left_rank(key));
            roots.push(key);
        }

        self.roots = self.link_roots(roots);
        self.min = self.scan_min();

        Some((node.priority, node.item))
    }

    /// Merges another heap into this heap
    ///
    /// **Time Complexity**: O(1) structural work after moving `other`'s m
    /// nodes into this heap's arena in O(m)
    fn merge(&mut self, other: Self) {
        let Some(their_min) = other.min else {
            return;
        };
        let moved = self.nodes.absorb(other.nodes);

        self.roots
            .extend(other.roots.into_iter().map(|root| moved[root]));
        let their_min = moved[their_min];
        self.offer_min(their_min);
    }
}

impl<T, P, C: Comparator<P>> DecreaseKeyHeap<T, P> for RankPairingHeap<T, P, C> {
    type Handle = RankPairingHandle;

    /// Inserts a new element as a rank-0 half-tree
    ///
    /// **Time Complexity**: O(1)
    fn push_with_handle(&mut self, priority: P, item: T) -> RankPairingHandle {
        let key = self.nodes.insert(Node {
            priority,
            item,
            left: None,
            right: None,
            parent: None,
            rank: 0,
        });
        self.roots.push(key);
        self.offer_min(key);

        RankPairingHandle(self.nodes.node_ref(key))
    }

    /// Decreases the priority of an element
    ///
    /// **Time Complexity**: O(1) amortized
    ///
    /// **Algorithm**:
    /// 1. Update the priority; a root only needs the minimum refreshed
    /// 2. Otherwise detach the node together with its left subtree, moving
    ///    its right child into its old place
    /// 3. The node becomes a new half-tree root with rank = left + 1
    /// 4. Walk up from the old parent recomputing ranks with the rank rule,
    ///    stopping as soon as a rank does not drop (or at a root)
    fn decrease_key(&mut self, handle: &RankPairingHandle, new_priority: P) -> Result<(), HeapError> {
        let key = self.nodes.resolve(handle.0).ok_or(HeapError::InvalidHandle)?;
        self.order.admit(&new_priority)?;
        if !self.order.less(&new_priority, &self.nodes[key].priority) {
            return Err(HeapError::PriorityNotDecreased);
        }

        self.nodes[key].priority = new_priority;

        if let Some(parent) = self.nodes[key].parent {
            let right = self.nodes[key].right.take();
            if self.nodes[parent].left == Some(key) {
                self.nodes[parent].left = right;
            } else {
                self.nodes[parent].right = right;
            }
            if let Some(right) = right {
                self.nodes[right].parent = Some(parent);
            }

            self.nodes[key].parent = None;
            self.nodes[key].rank = root_rank(self.left_rank(key));
            self.roots.push(key);
            self.restore_ranks(parent);
        }

        self.offer_min(key);
        Ok(())
    }
}

impl<T, P: Ord> RankPairingHeap<T, P> {
    /// Creates an empty min-heap ordered by `P: Ord`
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }

    /// Creates an empty min-heap ordered by `P: Ord` with the given tuning
    pub fn with_config(config: RankPairingConfig) -> Self {
        Self::with_config_and_comparator(config, NaturalOrder)
    }
}

impl<T, P, C: Comparator<P>> RankPairingHeap<T, P, C> {
    /// Creates an empty heap with the given tuning and comparator
    pub fn with_config_and_comparator(config: RankPairingConfig, order: C) -> Self {
        Self {
            nodes: Arena::default(),
            roots: Vec::new(),
            min: None,
            config,
            order,
        }
    }

    /// The heap's tuning
    pub fn config(&self) -> RankPairingConfig {
        self.config
    }

    #[inline]
    fn less(&self, a: NodeKey, b: NodeKey) -> bool {
        self.order.less(&self.nodes[a].priority, &self.nodes[b].priority)
    }

    #[inline]
    fn rank_of(&self, link: Option<NodeKey>) -> Option<Rank> {
        link.map(|key| self.nodes[key].rank)
    }

    #[inline]
    fn left_rank(&self, key: NodeKey) -> Option<Rank> {
        self.rank_of(self.nodes[key].left)
    }

    /// Makes `candidate` the minimum if it beats the current one
    fn offer_min(&mut self, candidate: NodeKey) {
        match self.min {
            Some(min) if !self.less(candidate, min) => {}
            _ => self.min = Some(candidate),
        }
    }

    fn scan_min(&self) -> Option<NodeKey> {
        self.roots
            .iter()
            .copied()
            .reduce(|best, root| if self.less(root, best) { root } else { best })
    }

    /// Links two half-tree roots of equal rank, returning the winner
    ///
    /// The loser becomes the winner's left child and takes the winner's old
    /// left subtree as its right subtree. Its rank is unchanged; the winner's
    /// grows by one. Ties keep `a` on top.
    fn link(&mut self, a: NodeKey, b: NodeKey) -> NodeKey {
        debug_assert_eq!(self.nodes[a].rank, self.nodes[b].rank);
        let (winner, loser) = if self.less(b, a) { (b, a) } else { (a, b) };

        let displaced = self.nodes[winner].left;
        if let Some(displaced) = displaced {
            self.nodes[displaced].parent = Some(loser);
        }

        let loser_node = &mut self.nodes[loser];
        loser_node.right = displaced;
        loser_node.parent = Some(winner);

        let winner_node = &mut self.nodes[winner];
        winner_node.left = Some(loser);
        winner_node.rank = checked_increment(winner_node.rank);
        winner
    }

    /// Links equal-rank roots according to the configured number of passes
    fn link_roots(&mut self, roots: Vec<NodeKey>) -> Vec<NodeKey> {
        let mut buckets = RankBuckets::new();
        let mut linked = Vec::with_capacity(roots.len());

        for root in roots {
            let mut tree = root;
            loop {
                let rank = usize::from(self.nodes[tree].rank);
                if buckets.len() <= rank {
                    buckets.resize(rank + 1, None);
                }
                match buckets[rank].take() {
                    None => {
                        buckets[rank] = Some(tree);
                        break;
                    }
                    Some(other) => {
                        let winner = self.link(other, tree);
                        match self.config.passes {
                            Passes::Single => {
                                linked.push(winner);
                                break;
                            }
                            Passes::Multi => tree = winner,
                        }
                    }
                }
            }
        }

        linked.extend(buckets.into_iter().flatten());
        linked
    }

    /// Recomputes ranks upward from `key` after one of its children changed
    ///
    /// Ranks can only drop after a cut, so the walk stops at the first node
    /// whose rank does not change. A root's rank is always left + 1.
    fn restore_ranks(&mut self, mut key: NodeKey) {
        loop {
            let node = &self.nodes[key];
            let Some(parent) = node.parent else {
                self.nodes[key].rank = root_rank(self.left_rank(key));
                return;
            };

            let rank = self
                .config
                .rank_rule
                .apply(self.rank_of(node.left), self.rank_of(node.right));
            if rank >= node.rank {
                return;
            }
            self.nodes[key].rank = rank;
            key = parent;
        }
    }
}

impl<T, P, C: Comparator<P> + Default> Default for RankPairingHeap<T, P, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}
