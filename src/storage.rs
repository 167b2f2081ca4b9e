//! Arena storage for pointer-rich heap nodes
//!
//! The pairing, Fibonacci and rank-pairing heaps link nodes to parents,
//! siblings and children in both directions. Instead of raw pointers or
//! `Rc<RefCell<_>>`, their nodes live in a [`slotmap`] arena and refer to each
//! other by [`NodeKey`]:
//!
//! - Keys are `Copy` and stable while the node is alive, so relinking is O(1)
//! - Keys are generational: a key to a removed node never resolves again,
//!   which is how stale decrease-key handles are detected
//! - The arena owns every node, so dropping the heap frees everything without
//!   a recursive teardown
//!
//! Keys are only unique within one arena. Handles given out to callers are
//! [`NodeRef`]s, which also carry the issuing arena's [`ArenaId`], so a handle
//! from a different (or consumed) heap never resolves to an unrelated node.
//!
//! # Merging arenas
//!
//! Two heaps own two arenas. [`Arena::absorb`] moves every node of the other
//! arena into this one and rewrites the moved nodes' links through the
//! [`Relocate`] trait. The returned [`Relocation`] maps old keys to new ones
//! so the caller can translate the other heap's root or minimum.

use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::{new_key_type, SecondaryMap, SlotMap};

new_key_type! {
    /// Stable key of a node inside an [`Arena`]
    pub struct NodeKey;
}

/// Identity of one arena, unique for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaId(u64);

impl ArenaId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        ArenaId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A node key qualified by the arena that issued it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    arena: ArenaId,
    key: NodeKey,
}

/// Old-to-new key mapping produced by [`Arena::absorb`]
pub type Relocation = SecondaryMap<NodeKey, NodeKey>;

/// Rewrites a node's links after it moved to another arena
pub trait Relocate {
    /// Replace every stored key `k` with `moved[k]`
    fn relocate(&mut self, moved: &Relocation);
}

/// Translate an optional link through a relocation map
#[inline]
pub fn relocate_link(link: &mut Option<NodeKey>, moved: &Relocation) {
    if let Some(key) = link {
        *key = moved[*key];
    }
}

/// Node arena backed by a [`SlotMap`]
#[derive(Debug)]
pub struct Arena<N> {
    nodes: SlotMap<NodeKey, N>,
    id: ArenaId,
}

impl<N> Default for Arena<N> {
    fn default() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            id: ArenaId::fresh(),
        }
    }
}

impl<N> Arena<N> {
    /// Insert a node, returning its key
    #[inline]
    pub fn insert(&mut self, node: N) -> NodeKey {
        self.nodes.insert(node)
    }

    /// Insert a node built from its own key, for nodes that link to themselves
    #[inline]
    pub fn insert_with_key(&mut self, f: impl FnOnce(NodeKey) -> N) -> NodeKey {
        self.nodes.insert_with_key(f)
    }

    /// Remove a node, returning it if the key was live
    #[inline]
    pub fn remove(&mut self, key: NodeKey) -> Option<N> {
        self.nodes.remove(key)
    }

    /// Get a node by key
    #[inline]
    pub fn get(&self, key: NodeKey) -> Option<&N> {
        self.nodes.get(key)
    }

    /// Returns true if the key refers to a live node
    #[inline]
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Number of live nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena holds no nodes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Identity of this arena
    #[inline]
    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// Qualify a key of this arena for handing out to callers
    #[inline]
    pub fn node_ref(&self, key: NodeKey) -> NodeRef {
        NodeRef { arena: self.id, key }
    }

    /// Resolve a reference back to a live key of this arena
    ///
    /// Returns `None` if the node was removed or the reference was issued by
    /// another arena.
    #[inline]
    pub fn resolve(&self, node: NodeRef) -> Option<NodeKey> {
        (node.arena == self.id && self.nodes.contains_key(node.key)).then_some(node.key)
    }
}

impl<N: Relocate> Arena<N> {
    /// Move every node of `other` into this arena
    ///
    /// Keys and references already issued by `self` stay valid. Keys of
    /// `other` are translated through the returned map; moved nodes have
    /// their links rewritten before this returns. References issued by
    /// `other` no longer resolve anywhere.
    ///
    /// # Time Complexity
    /// O(m) for m nodes in `other`; no priorities are compared.
    pub fn absorb(&mut self, other: Arena<N>) -> Relocation {
        let mut moved = Relocation::with_capacity(other.len());
        let mut fresh = Vec::with_capacity(other.len());

        for (old, node) in other.nodes {
            let new = self.nodes.insert(node);
            moved.insert(old, new);
            fresh.push(new);
        }

        for key in fresh {
            self.nodes[key].relocate(&moved);
        }

        moved
    }
}

impl<N> Index<NodeKey> for Arena<N> {
    type Output = N;

    /// Panics if `key` is stale; heaps only index with keys they hold.
    #[inline]
    fn index(&self, key: NodeKey) -> &N {
        &self.nodes[key]
    }
}

impl<N> IndexMut<NodeKey> for Arena<N> {
    #[inline]
    fn index_mut(&mut self, key: NodeKey) -> &mut N {
        &mut self.nodes[key]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Link {
        value: i32,
        next: Option<NodeKey>,
    }

    impl Relocate for Link {
        fn relocate(&mut self, moved: &Relocation) {
            relocate_link(&mut self.next, moved);
        }
    }

    #[test]
    fn test_arena_basic() {
        let mut arena: Arena<i32> = Arena::default();

        let key = arena.insert(42);
        assert_eq!(arena.get(key), Some(&42));
        assert_eq!(arena[key], 42);

        arena[key] = 100;
        assert_eq!(arena.get(key), Some(&100));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_removed_key_is_stale() {
        let mut arena: Arena<i32> = Arena::default();

        let key = arena.insert(7);
        assert_eq!(arena.remove(key), Some(7));
        assert!(!arena.contains(key));
        assert!(arena.get(key).is_none());

        // Reusing the slot must not revive the old key
        let reused = arena.insert(8);
        assert!(arena.get(key).is_none());
        assert_eq!(arena[reused], 8);
        assert!(arena.remove(key).is_none());
    }

    #[test]
    fn test_absorb_rewrites_links() {
        let mut left: Arena<Link> = Arena::default();
        let kept = left.insert(Link { value: 1, next: None });

        let mut right: Arena<Link> = Arena::default();
        let tail = right.insert(Link { value: 3, next: None });
        let head = right.insert(Link {
            value: 2,
            next: Some(tail),
        });

        let moved = left.absorb(right);
        assert_eq!(left.len(), 3);
        assert_eq!(left[kept].value, 1);

        let new_head = moved[head];
        let new_tail = left[new_head].next.expect("link survives relocation");
        assert_eq!(new_tail, moved[tail]);
        assert_eq!(left[new_tail].value, 3);
    }

    #[test]
    fn test_node_ref_is_arena_scoped() {
        let mut first: Arena<i32> = Arena::default();
        let mut second: Arena<i32> = Arena::default();
        assert_ne!(first.id(), second.id());

        // Fresh slotmaps hand out identical keys for their first insert
        let a = first.insert(1);
        let b = second.insert(2);
        assert_eq!(a, b);

        let from_first = first.node_ref(a);
        assert_eq!(first.resolve(from_first), Some(a));
        assert_eq!(second.resolve(from_first), None);

        first.remove(a);
        assert_eq!(first.resolve(from_first), None);
    }

    #[test]
    fn test_absorb_keeps_own_refs() {
        let mut left: Arena<Link> = Arena::default();
        let kept = left.insert(Link { value: 1, next: None });
        let kept_ref = left.node_ref(kept);

        let mut right: Arena<Link> = Arena::default();
        let gone = right.insert(Link { value: 2, next: None });
        let gone_ref = right.node_ref(gone);

        left.absorb(right);
        assert_eq!(left.resolve(kept_ref), Some(kept));
        assert_eq!(left.resolve(gone_ref), None);
    }
}
