//! Pairing Heap implementation
//!
//! A pairing heap is a type of heap-ordered tree with:
//! - O(1) insert and merge (merge also relocates the other heap's nodes)
//! - O(log n) amortized delete_min
//! - o(log n) amortized decrease_key (in fact, better than log n)
//!
//! The pairing heap is simpler than Fibonacci heaps while still providing
//! excellent amortized performance for decrease_key operations.
//!
//! Each node keeps its first child, its next sibling and a `prev` link that
//! points at the previous sibling, or at the parent for a first child. The
//! `prev` link is what lets decrease_key cut a node out in O(1).

use crate::storage::{relocate_link, Arena, NodeKey, NodeRef, Relocate, Relocation};
use crate::traits::{Comparator, DecreaseKeyHeap, Handle, Heap, HeapError, NaturalOrder};

/// Handle to an element in a Pairing heap
///
/// Valid until the element is popped. Handles of a heap that was merged into
/// another one stop resolving.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PairingHandle(NodeRef);

impl Handle for PairingHandle {}

struct Node<T, P> {
    priority: P,
    item: T,
    child: Option<NodeKey>,
    sibling: Option<NodeKey>,
    /// Parent for a first child, previous sibling otherwise
    prev: Option<NodeKey>,
}

impl<T, P> Relocate for Node<T, P> {
    fn relocate(&mut self, moved: &Relocation) {
        relocate_link(&mut self.child, moved);
        relocate_link(&mut self.sibling, moved);
        relocate_link(&mut self.prev, moved);
    }
}

/// Pairing Heap
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::pairing::PairingHeap;
/// use mergeable_heaps::{DecreaseKeyHeap, Heap};
///
/// let mut heap = PairingHeap::new();
/// let handle = heap.push_with_handle(5, "item");
/// heap.decrease_key(&handle, 1).unwrap();
/// assert_eq!(heap.find_min(), Ok((&1, &"item")));
/// ```
pub struct PairingHeap<T, P, C = NaturalOrder> {
    nodes: Arena<Node<T, P>>,
    root: Option<NodeKey>,
    order: C,
}

impl<T, P, C: Comparator<P>> Heap<T, P> for PairingHeap<T, P, C> {
    type Order = C;

    fn with_comparator(order: C) -> Self {
        Self {
            nodes: Arena::default(),
            root: None,
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
        self.nodes.len()
    }

    fn push(&mut self, priority: P, item: T) {
        self.push_with_handle(priority, item);
    }

    fn peek(&self) -> Option<(&P, &T)> {
        self.root.map(|root| {
            let node = &self.nodes[root];
            (&node.priority, &node.item)
        })
    }

    /// Removes and returns the minimum element
    ///
    /// **Time Complexity**: O(log n) amortized
    ///
    /// **Algorithm (Two-Pass Pairing)**:
    /// 1. Remove the root
    /// 2. Pair up the root's children left to right
    /// 3. Merge the pairs right to left into a single tree
    fn pop(&mut self) -> Option<(P, T)> {
        let root = self.root.take()?;
        let node = self
            .nodes
            .remove(root)
            .expect("root key is always live");

        if let Some(first) = node.child {
            self.nodes[first].prev = None;
            self.root = Some(self.merge_pairs(first));
        }

        Some((node.priority, node.item))
    }

    /// Merges another heap into this heap
    ///
    /// **Time Complexity**: O(1) structural work after moving `other`'s m
    /// nodes into this heap's arena in O(m)
    ///
    /// The root with the smaller priority becomes the parent; the other root
    /// becomes its first child.
    fn merge(&mut self, other: Self) {
        let Some(their_root) = other.root else {
            return;
        };
        let moved = self.nodes.absorb(other.nodes);
        let their_root = moved[their_root];

        self.root = Some(match self.root {
            Some(root) => self.link(root, their_root),
            None => their_root,
        });
    }
}

impl<T, P, C: Comparator<P>> DecreaseKeyHeap<T, P> for PairingHeap<T, P, C> {
    type Handle = PairingHandle;

    /// Inserts a new element
    ///
    /// **Time Complexity**: O(1)
    ///
    /// The new node is linked with the root: if it is smaller it becomes the
    /// new root, otherwise it becomes the root's first child.
    fn push_with_handle(&mut self, priority: P, item: T) -> PairingHandle {
        let key = self.nodes.insert(Node {
            priority,
            item,
            child: None,
            sibling: None,
            prev: None,
        });

        self.root = Some(match self.root {
            Some(root) => self.link(root, key),
            None => key,
        });

        PairingHandle(self.nodes.node_ref(key))
    }

    /// Decreases the priority of an element
    ///
    /// **Time Complexity**: o(log n) amortized
    ///
    /// **Algorithm**:
    /// 1. Update the priority
    /// 2. If the node is not the root, cut it (with its subtree) from its
    ///    parent
    /// 3. Link the cut subtree with the root
    fn decrease_key(&mut self, handle: &PairingHandle, new_priority: P) -> Result<(), HeapError> {
        let key = self.nodes.resolve(handle.0).ok_or(HeapError::InvalidHandle)?;
        self.order.admit(&new_priority)?;
        if !self.order.less(&new_priority, &self.nodes[key].priority) {
            return Err(HeapError::PriorityNotDecreased);
        }

        self.nodes[key].priority = new_priority;

        let root = self.root.expect("a live node implies a non-empty heap");
        if key != root {
            self.cut(key);
            self.root = Some(self.link(root, key));
        }
        Ok(())
    }
}

impl<T, P: Ord> PairingHeap<T, P> {
    /// Creates an empty min-heap ordered by `P: Ord`
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T, P, C: Comparator<P>> PairingHeap<T, P, C> {
    /// Links two detached trees, returning the new root
    ///
    /// The root with the smaller priority wins (ties keep `a`); the loser
    /// becomes the winner's first child.
    fn link(&mut self, a: NodeKey, b: NodeKey) -> NodeKey {
        let (winner, loser) = if self.order.less(&self.nodes[b].priority, &self.nodes[a].priority)
        {
            (b, a)
        } else {
            (a, b)
        };

        let first_child = self.nodes[winner].child;
        if let Some(child) = first_child {
            self.nodes[child].prev = Some(loser);
        }

        let loser_node = &mut self.nodes[loser];
        loser_node.sibling = first_child;
        loser_node.prev = Some(winner);

        self.nodes[winner].child = Some(loser);
        winner
    }

    /// Merges a sibling list into a single tree using two-pass pairing
    ///
    /// `first` must already be detached from its parent.
    fn merge_pairs(&mut self, first: NodeKey) -> NodeKey {
        // Pass 1: link consecutive siblings left to right
        let mut pairs = Vec::new();
        let mut current = Some(first);

        while let Some(a) = current {
            let next = self.detach(a);
            match next {
                Some(b) => {
                    current = self.detach(b);
                    pairs.push(self.link(a, b));
                }
                None => {
                    pairs.push(a);
                    current = None;
                }
            }
        }

        // Pass 2: merge the pairs right to left
        let mut result = pairs.pop().expect("sibling list is non-empty");
        while let Some(tree) = pairs.pop() {
            result = self.link(tree, result);
        }
        result
    }

    /// Clears a node's sibling and prev links, returning its old sibling
    fn detach(&mut self, key: NodeKey) -> Option<NodeKey> {
        let node = &mut self.nodes[key];
        node.prev = None;
        node.sibling.take()
    }

    /// Cuts a non-root node (and its subtree) out of its parent's child list
    fn cut(&mut self, key: NodeKey) {
        let prev = self.nodes[key]
            .prev
            .expect("non-root node always has a prev link");
        let sibling = self.detach(key);

        if self.nodes[prev].child == Some(key) {
            self.nodes[prev].child = sibling;
        } else {
            self.nodes[prev].sibling = sibling;
        }
        if let Some(sibling) = sibling {
            self.nodes[sibling].prev = Some(prev);
        }
    }
}

impl<T, P, C: Comparator<P> + Default> Default for PairingHeap<T, P, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walks the whole tree checking heap order and the prev links
    fn check_invariants<T, P: Ord>(heap: &PairingHeap<T, P>) {
        let Some(root) = heap.root else {
            assert!(heap.nodes.is_empty());
            return;
        };
        assert!(heap.nodes[root].prev.is_none());
        assert!(heap.nodes[root].sibling.is_none());

        let mut seen = 0;
        let mut stack = vec![root];
        while let Some(parent) = stack.pop() {
            seen += 1;
            let mut prev = parent;
            let mut child = heap.nodes[parent].child;
            while let Some(key) = child {
                let node = &heap.nodes[key];
                assert_eq!(node.prev, Some(prev), "broken prev link");
                assert!(heap.nodes[parent].priority <= node.priority, "heap order violated");
                stack.push(key);
                prev = key;
                child = node.sibling;
            }
        }
        assert_eq!(seen, heap.len());
    }

    #[test]
    fn test_basic_operations() {
        let mut heap = PairingHeap::new();
        heap.push(5, "a");
        heap.push(3, "b");
        heap.push(7, "c");
        check_invariants(&heap);

        assert_eq!(heap.peek(), Some((&3, &"b")));
        assert_eq!(heap.pop(), Some((3, "b")));
        check_invariants(&heap);
        assert_eq!(heap.pop(), Some((5, "a")));
        assert_eq!(heap.pop(), Some((7, "c")));
        assert!(heap.is_empty());
    }

    #[test]
    fn test_decrease_key() {
        let mut heap = PairingHeap::new();
        let _h1 = heap.push_with_handle(10, "a");
        let h2 = heap.push_with_handle(20, "b");
        let h3 = heap.push_with_handle(30, "c");

        heap.decrease_key(&h2, 5).unwrap();
        assert_eq!(heap.peek(), Some((&5, &"b")));
        check_invariants(&heap);

        heap.decrease_key(&h3, 1).unwrap();
        assert_eq!(heap.peek(), Some((&1, &"c")));
        check_invariants(&heap);
    }

    #[test]
    fn test_decrease_key_deep_node() {
        let mut heap = PairingHeap::new();
        let handles: Vec<_> = (0..64).map(|i| heap.push_with_handle(100 + i, i)).collect();

        // Force a multi-level tree
        assert_eq!(heap.pop(), Some((100, 0)));
        check_invariants(&heap);

        heap.decrease_key(&handles[40], 50).unwrap();
        check_invariants(&heap);
        assert_eq!(heap.pop(), Some((50, 40)));

        let drained: Vec<i32> = std::iter::from_fn(|| heap.pop().map(|(_, i)| i)).collect();
        let expected: Vec<i32> = (1..64).filter(|&i| i != 40).collect();
        assert_eq!(drained, expected);
    }

    #[test]
    fn test_decrease_key_errors() {
        let mut heap = PairingHeap::new();
        let handle = heap.push_with_handle(10, "a");
        heap.push(20, "b");

        assert_eq!(heap.decrease_key(&handle, 10), Err(HeapError::PriorityNotDecreased));
        assert_eq!(heap.decrease_key(&handle, 15), Err(HeapError::PriorityNotDecreased));
        assert_eq!(heap.peek(), Some((&10, &"a")));

        heap.pop();
        assert_eq!(heap.decrease_key(&handle, 1), Err(HeapError::InvalidHandle));
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn test_merge() {
        let mut heap1 = PairingHeap::new();
        let kept = heap1.push_with_handle(5, "a");
        heap1.push(10, "b");

        let mut heap2 = PairingHeap::new();
        let consumed = heap2.push_with_handle(3, "c");
        heap2.push(7, "d");

        heap1.merge(heap2);
        check_invariants(&heap1);
        assert_eq!(heap1.len(), 4);
        assert_eq!(heap1.peek(), Some((&3, &"c")));

        // Handles of the receiving heap survive, the consumed heap's do not
        heap1.decrease_key(&kept, 1).unwrap();
        assert_eq!(heap1.peek(), Some((&1, &"a")));
        assert_eq!(heap1.decrease_key(&consumed, 0), Err(HeapError::InvalidHandle));
    }

    #[test]
    fn test_merge_with_empty() {
        let mut heap1: PairingHeap<&str, i32> = PairingHeap::new();
        let mut heap2 = PairingHeap::new();
        heap2.push(4, "x");

        heap1.merge(PairingHeap::new());
        assert!(heap1.is_empty());
        heap1.merge(heap2);
        assert_eq!(heap1.pop(), Some((4, "x")));
    }
}
