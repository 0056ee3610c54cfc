//! Rebuilding a tree's shape from a linear traversal of another one.
//!
//! The source is walked in reverse pre-order, from its last node up to its root, and every visited node is rebuilt in the destination right away. Because of the walking order, the children of a node are always built before the node itself: they wait on a stack, tagged with their depth in the source, until a shallower node comes along and adopts every entry deeper than itself as its child chain. The leftmost child is the most recently built one, which puts it at the top of the stack, so popping yields the children from left to right.

use alloc::vec::Vec;
use core::{fmt::Debug, mem};
use granite::{Storage, SparseStorage};
use tracing::{debug, instrument};
use super::{
    cursor::depth_first_prev,
    node::Children,
    KTree,
    Node,
};
use crate::util::corrupted;

/// Reverse pre-order walk over a tree, yielding every node's key along with its depth.
struct ReversePreorder<'a, T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    tree: &'a KTree<T, K, S>,
    next: Option<(K, usize)>,
}
impl<'a, T, K, S> Iterator for ReversePreorder<'a, T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    type Item = (K, usize);
    fn next(&mut self) -> Option<Self::Item> {
        let (key, depth) = self.next.take()?;
        if key != self.tree.root {
            self.next = depth_first_prev(self.tree, &key)
                .ok()
                .map(|(previous, delta)| (previous, apply_delta(depth, delta)));
        }
        Some((key, depth))
    }
}
#[inline]
fn apply_delta(depth: usize, delta: isize) -> usize {
    if delta < 0 {
        depth - delta.unsigned_abs()
    } else {
        depth + delta.unsigned_abs()
    }
}

/// Builds a tree out of nodes supplied in reverse pre-order with their depths.
struct Builder<K> {
    /// Built nodes which have not been adopted by their parent yet.
    pending: Vec<(K, usize)>,
    built: usize,
}
impl<K> Builder<K>
where
    K: Clone + Debug + Eq,
{
    const fn new() -> Self {
        Self {
            pending: Vec::new(),
            built: 0,
        }
    }
    /// Builds the next node. The destination tree must have been empty when the first node was placed, and a node of depth 0 must come last.
    fn place<T, S>(&mut self, tree: &mut KTree<T, K, S>, value: T, depth: usize)
    where
        S: Storage<Element = Node<T, K>, Key = K>,
    {
        let key = if depth == 0 {
            tree.set_root(value).into_raw_key()
        } else {
            tree.allocate(value)
        };
        self.built += 1;
        self.adopt(tree, &key, depth);
        if depth == 0 {
            debug_assert!(self.pending.is_empty(), "nodes left over after building the root");
            return;
        }
        // A pending node of the same depth which was not adopted above is the right sibling
        if let Some((right, right_depth)) = self.pending.last().cloned() {
            if right_depth == depth {
                tree.link_mut(&key).right = Some(right.clone());
                tree.link_mut(&right).left = Some(key.clone());
            }
        }
        self.pending.push((key, depth));
    }
    /// Makes every pending node deeper than `depth` a child of `parent`.
    fn adopt<T, S>(&mut self, tree: &mut KTree<T, K, S>, parent: &K, depth: usize)
    where
        S: Storage<Element = Node<T, K>, Key = K>,
    {
        let mut bounds: Option<Children<K>> = None;
        while let Some((child, child_depth)) = self.pending.last().cloned() {
            if child_depth <= depth {
                break;
            }
            debug_assert_eq!(child_depth, depth + 1, "child run skipped a level");
            self.pending.pop();
            tree.link_mut(&child).parent = Some(parent.clone());
            bounds = Some(match bounds {
                Some(Children { begin, .. }) => Children { begin, end: child },
                None => Children::single(child),
            });
        }
        if bounds.is_some() {
            tree.link_mut(parent).children = bounds;
        }
    }
}

impl<T, K, S> KTree<T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    fn reverse_preorder(&self) -> ReversePreorder<'_, T, K, S> {
        // The sentinel sits at depth 0 to the right of the root, so the depth delta of its
        // predecessor is the predecessor's depth
        let next = if self.is_empty() {
            None
        } else {
            depth_first_prev(self, &self.foot)
                .ok()
                .map(|(last, depth)| (last, apply_delta(0, depth)))
        };
        ReversePreorder { tree: self, next }
    }
    /// Fills this tree, which must be empty, with a structural copy of `source`, producing the values with `copy`.
    #[instrument(level = "trace", skip_all)]
    fn transfer_from(&mut self, source: &Self, mut copy: impl FnMut(&T) -> T) {
        debug_assert!(self.is_empty(), "transfer into a non-empty tree");
        let mut builder = Builder::new();
        for (key, depth) in source.reverse_preorder() {
            let value = match &source.link(&key).value {
                Some(value) => copy(value),
                None => corrupted("reached the sentinel while walking backwards"),
            };
            builder.place(self, value, depth);
        }
        debug!(copied = builder.built, "transferred a tree");
    }
}

impl<T, K, S> Clone for KTree<T, K, S>
where
    T: Clone,
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    /// Creates a structurally identical tree with cloned values. No nodes are shared between the two trees.
    fn clone(&self) -> Self {
        let mut tree = Self::with_capacity(self.storage.capacity());
        tree.transfer_from(self, T::clone);
        tree
    }
    /// Replaces the contents of the tree with a copy of `source`, reusing the storage.
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.transfer_from(source, T::clone);
    }
}

impl<T, S> KTree<T, usize, SparseStorage<Node<T, usize>, S>>
where
    S: granite::ListStorage<Element = granite::SparseStorageSlot<Node<T, usize>>>,
{
    /// Removes all holes from the storage by rebuilding the tree into a fresh one, moving the values over.
    ///
    /// **All outstanding cursors are invalidated**, since nodes get new keys. Does nothing if there are no holes.
    ///
    /// # Example
    /// ```rust
    /// # use ktree::KTree;
    /// let mut tree = KTree::<_>::new();
    /// let root = tree.set_root(0);
    /// let doomed = tree.append_child(&root, 1).unwrap();
    /// tree.append_child(&root, 2).unwrap();
    /// tree.erase(&doomed).unwrap();
    /// assert_eq!(tree.num_holes(), 1);
    ///
    /// tree.defragment();
    /// assert!(tree.is_dense());
    /// assert!(tree.iter().copied().eq([0, 2].iter().copied()));
    /// ```
    pub fn defragment(&mut self) {
        if self.is_dense() {
            return;
        }
        let holes = self.num_holes();
        let capacity = Storage::capacity(&self.storage);
        let mut source = mem::replace(self, Self::with_capacity(capacity));
        let order: Vec<(usize, usize)> = source.reverse_preorder().collect();
        let mut builder = Builder::new();
        for (key, depth) in order {
            let value = match source.link_mut(&key).value.take() {
                Some(value) => value,
                None => corrupted("reached the sentinel while walking backwards"),
            };
            builder.place(self, value, depth);
        }
        debug!(holes, nodes = builder.built, "defragmented the storage");
    }
}
