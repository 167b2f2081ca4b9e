//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) amortized insert, decrease_key, and merge
//! - O(log n) amortized delete_min
//!
//! The structure consists of a collection of heap-ordered trees. Roots are linked
//! in a circular doubly linked list. The heap maintains the minimum node pointer.
//!
//! Sibling lists (the root list and every child list) are circular, with the
//! `left` / `right` links of a node stored as arena keys. A lone node links to
//! itself.

use smallvec::SmallVec;

use crate::rank::{checked_increment, Rank};
use crate::storage::{relocate_link, Arena, NodeKey, NodeRef, Relocate, Relocation};
use crate::traits::{Comparator, DecreaseKeyHeap, Handle, Heap, HeapError, NaturalOrder};

/// Handle to an element in a Fibonacci heap
///
/// Valid until the element is popped. Handles of a heap that was merged into
/// another one stop resolving.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FibonacciHandle(NodeRef);

impl Handle for FibonacciHandle {}

struct Node<T, P> {
    priority: P,
    item: T,
    parent: Option<NodeKey>,
    child: Option<NodeKey>,
    left: NodeKey,
    right: NodeKey,
    degree: Rank,
    /// Set when the node has lost a child since it last became a child
    marked: bool,
}

impl<T, P> Relocate for Node<T, P> {
    fn relocate(&mut self, moved: &Relocation) {
        relocate_link(&mut self.parent, moved);
        relocate_link(&mut self.child, moved);
        self.left = moved[self.left];
        self.right = moved[self.right];
    }
}

/// Degree-indexed table used by consolidation; degrees are O(log n)
type DegreeTable = SmallVec<[Option<NodeKey>; 64]>;

/// Fibonacci Heap
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::fibonacci::FibonacciHeap;
/// use mergeable_heaps::{DecreaseKeyHeap, Heap};
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.push_with_handle(5, "item");
/// heap.decrease_key(&handle, 1).unwrap();
/// assert_eq!(heap.find_min(), Ok((&1, &"item")));
/// ```
pub struct FibonacciHeap<T, P, C = NaturalOrder> {
    nodes: Arena<Node<T, P>>,
    min: Option<NodeKey>,
    order: C,
}

impl<T, P, C: Comparator<P>> Heap<T, P> for FibonacciHeap<T, P, C> {
    type Order = C;

    fn with_comparator(order: C) -> Self {
        Self {
            nodes: Arena::default(),
            min: None,
            order,
        }
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
    /// 1. Promote the minimum's children to the root list
    /// 2. Remove the minimum from the root list
    /// 3. Consolidate: link roots of equal degree until all degrees are
    ///    distinct, then rescan the roots for the new minimum
    fn pop(&mut self) -> Option<(P, T)> {
        let min = self.min?;

        if let Some(child) = self.nodes[min].child.take() {
            let mut current = child;
            loop {
                let node = &mut self.nodes[current];
                node.parent = None;
                node.marked = false;
                current = node.right;
                if current == child {
                    break;
                }
            }
            self.splice(min, child);
        }

        let next = self.nodes[min].right;
        self.unlink(min);
        let node = self.nodes.remove(min).expect("minimum key is always live");

        if next == min {
            self.min = None;
        } else {
            self.consolidate(next);
        }

        Some((node.priority, node.item))
    }

    /// Merges another heap into this heap
    ///
    /// **Time Complexity**: O(1) structural work after moving `other`'s m
    /// nodes into this heap's arena in O(m)
    ///
    /// **Algorithm**: concatenate the two circular root lists and keep the
    /// smaller of the two minimums.
    fn merge(&mut self, other: Self) {
        let Some(their_min) = other.min else {
            return;
        };
        let moved = self.nodes.absorb(other.nodes);
        let their_min = moved[their_min];

        match self.min {
            Some(min) => {
                self.splice(min, their_min);
                if self.less(their_min, min) {
                    self.min = Some(their_min);
                }
            }
            None => self.min = Some(their_min),
        }
    }
}

impl<T, P, C: Comparator<P>> DecreaseKeyHeap<T, P> for FibonacciHeap<T, P, C> {
    type Handle = FibonacciHandle;

    /// Inserts a new element into the heap
    ///
    /// **Time Complexity**: O(1)
    ///
    /// The new node becomes a singleton tree spliced into the root list; no
    /// consolidation happens until the next delete_min.
    fn push_with_handle(&mut self, priority: P, item: T) -> FibonacciHandle {
        let key = self.nodes.insert_with_key(|key| Node {
            priority,
            item,
            parent: None,
            child: None,
            left: key,
            right: key,
            degree: 0,
            marked: false,
        });

        match self.min {
            Some(min) => {
                self.splice(min, key);
                if self.less(key, min) {
                    self.min = Some(key);
                }
            }
            None => self.min = Some(key),
        }

        FibonacciHandle(self.nodes.node_ref(key))
    }

    /// Decreases the priority of an element
    ///
    /// **Time Complexity**: O(1) amortized
    ///
    /// **Algorithm**:
    /// 1. Update the priority
    /// 2. If heap order with the parent is violated, cut the node into the
    ///    root list
    /// 3. Cascading cut: walk up through marked ancestors cutting each one;
    ///    the first unmarked non-root ancestor gets marked
    fn decrease_key(&mut self, handle: &FibonacciHandle, new_priority: P) -> Result<(), HeapError> {
        let key = self.nodes.resolve(handle.0).ok_or(HeapError::InvalidHandle)?;
        self.order.admit(&new_priority)?;
        if !self.order.less(&new_priority, &self.nodes[key].priority) {
            return Err(HeapError::PriorityNotDecreased);
        }

        self.nodes[key].priority = new_priority;

        if let Some(parent) = self.nodes[key].parent {
            if self.less(key, parent) {
                self.cut(key, parent);
                self.cascading_cut(parent);
            }
        }

        let min = self.min.expect("a live node implies a non-empty heap");
        if self.less(key, min) {
            self.min = Some(key);
        }
        Ok(())
    }
}

impl<T, P: Ord> FibonacciHeap<T, P> {
    /// Creates an empty min-heap ordered by `P: Ord`
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T, P, C: Comparator<P>> FibonacciHeap<T, P, C> {
    #[inline]
    fn less(&self, a: NodeKey, b: NodeKey) -> bool {
        self.order.less(&self.nodes[a].priority, &self.nodes[b].priority)
    }

    /// Joins the circular list containing `b` into the one containing `a`
    fn splice(&mut self, a: NodeKey, b: NodeKey) {
        let a_right = self.nodes[a].right;
        let b_left = self.nodes[b].left;

        self.nodes[a].right = b;
        self.nodes[b].left = a;
        self.nodes[b_left].right = a_right;
        self.nodes[a_right].left = b_left;
    }

    /// Removes a node from its circular list, leaving it linked to itself
    fn unlink(&mut self, key: NodeKey) {
        let (left, right) = (self.nodes[key].left, self.nodes[key].right);
        self.nodes[left].right = right;
        self.nodes[right].left = left;

        let node = &mut self.nodes[key];
        node.left = key;
        node.right = key;
    }

    /// Consolidates the heap by linking trees of the same degree
    ///
    /// Losers leave the root list as they are linked, so afterwards the root
    /// list holds exactly the degree table's entries, all of distinct degree.
    /// The minimum is rescanned from the table.
    fn consolidate(&mut self, start: NodeKey) {
        let mut roots = Vec::new();
        let mut current = start;
        loop {
            roots.push(current);
            current = self.nodes[current].right;
            if current == start {
                break;
            }
        }

        let mut table = DegreeTable::new();
        for root in roots {
            let mut x = root;
            let mut degree = usize::from(self.nodes[x].degree);

            loop {
                if table.len() <= degree {
                    table.resize(degree + 1, None);
                }
                match table[degree].take() {
                    Some(y) => {
                        x = self.link(x, y);
                        degree += 1;
                    }
                    None => {
                        table[degree] = Some(x);
                        break;
                    }
                }
            }
        }

        self.min = table
            .into_iter()
            .flatten()
            .reduce(|best, root| if self.less(root, best) { root } else { best });
    }

    /// Links two roots of equal degree, returning the winner
    ///
    /// The root with the larger priority (ties: `b`) is removed from the root
    /// list and becomes a child of the other.
    fn link(&mut self, a: NodeKey, b: NodeKey) -> NodeKey {
        let (parent, child) = if self.less(b, a) { (b, a) } else { (a, b) };

        self.unlink(child);
        {
            let node = &mut self.nodes[child];
            node.parent = Some(parent);
            node.marked = false;
        }

        match self.nodes[parent].child {
            Some(first) => self.splice(first, child),
            None => self.nodes[parent].child = Some(child),
        }

        let parent_node = &mut self.nodes[parent];
        parent_node.degree = checked_increment(parent_node.degree);
        parent
    }

    /// Cuts a node from its parent and adds it to the root list
    fn cut(&mut self, key: NodeKey, parent: NodeKey) {
        let right = self.nodes[key].right;
        if self.nodes[parent].child == Some(key) {
            self.nodes[parent].child = (right != key).then_some(right);
        }
        self.unlink(key);
        self.nodes[parent].degree -= 1;

        let node = &mut self.nodes[key];
        node.parent = None;
        node.marked = false;

        let min = self.min.expect("a node with a parent implies a non-empty heap");
        self.splice(min, key);
    }

    /// Walks up from `key`, cutting marked ancestors until it reaches a root
    /// or marks an unmarked node
    fn cascading_cut(&mut self, mut key: NodeKey) {
        while let Some(parent) = self.nodes[key].parent {
            if !self.nodes[key].marked {
                self.nodes[key].marked = true;
                return;
            }
            self.cut(key, parent);
            key = parent;
        }
    }
}

impl<T, P, C: Comparator<P> + Default> Default for FibonacciHeap<T, P, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}
