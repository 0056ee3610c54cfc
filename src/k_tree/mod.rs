//! K-ary trees, positional trees where every node can have any number of ordered children, traversed with STL-style cursors.
//!
//! A tree always owns a valueless **sentinel** node. An empty tree consists of nothing but the sentinel; a non-empty one has exactly one top-level node, the root, with the sentinel linked as its right neighbour. Cursors returned by [`end`] point at the sentinel, and every traversal finishes there.
//!
//! Cursors are detached from the tree: they store a key into the tree's storage and the state of their traversal strategy, and every movement or access takes the tree as an argument. This makes it possible to hold on to a cursor while mutating the tree through other cursors. Removing a node invalidates the cursors pointing at it and at its descendants, and nothing else.
//!
//! # Example
//! ```rust
//! use ktree::{KTree, BreadthFirst, DepthFirst};
//!
//! // The turbofish is needed to state that we are using the default storage, which the compiler
//! // would not be able to infer.
//! let mut tree = KTree::<_>::new();
//! assert!(tree.is_empty());
//!
//! let root = tree.set_root(0);
//! let one = tree.append_child(&root, 1).unwrap();
//! let two = tree.insert_right(&one, 2).unwrap();
//! tree.append_child(&two, 3).unwrap();
//! tree.prepend_child(&two, 4).unwrap();
//!
//! // Pre-order, left to right:
//! assert!(tree.iter().copied().eq([0, 1, 2, 4, 3].iter().copied()));
//! // Level order:
//! assert!(tree.iter_breadth_first().copied().eq([0, 1, 2, 4, 3].iter().copied()));
//!
//! // Cursors are moved by giving them the tree they point into.
//! let mut cursor = tree.begin::<BreadthFirst<_>>();
//! cursor.advance(&tree).unwrap();
//! assert_eq!(tree.value(&cursor), Ok(&1));
//!
//! // Removing a node removes its entire subtree.
//! tree.erase(&two).unwrap();
//! assert_eq!(tree.len(), 2);
//! assert_eq!(tree.begin::<DepthFirst>(), root);
//! ```
//!
//! [`end`]: struct.KTree.html#method.end " "

use core::fmt::Debug;
use granite::{Storage, DefaultStorage, SparseStorage};
use crate::{
    util::{expect_link, corrupted},
    CursorError,
    CursorResult,
    NodeRole,
    Operation,
};

mod node;
mod cursor;
mod mutate;
mod transfer;
mod relation;

pub use node::Node;
pub use cursor::{
    Cursor,
    Traversal,
    ReversibleTraversal,
    DepthFirst,
    DepthFirstBackward,
    BreadthFirst,
    Cursors,
    Iter,
};

/// A k-ary tree.
///
/// See the [module-level documentation] for more.
///
/// # Storage requirements
/// The storage must not move elements around when another element gets removed, since that would invalidate the keys held by the tree and by outstanding cursors. Sparse storages and slot maps satisfy this.
///
/// [module-level documentation]: index.html " "
#[derive(Debug)]
pub struct KTree<T, K = usize, S = DefaultStorage<Node<T, K>>>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    storage: S,
    root: K,
    foot: K,
}
impl<T, K, S> KTree<T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    /// Creates an empty tree. Only the sentinel is allocated.
    ///
    /// # Panics
    /// Storages with a fixed capacity panic here, since they can only be created with exactly that capacity; use [`with_capacity`] for them.
    ///
    /// # Example
    /// ```rust
    /// # use ktree::KTree;
    /// let tree = KTree::<u32>::new();
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.len(), 0);
    /// ```
    ///
    /// [`with_capacity`]: #method.with_capacity " "
    #[inline]
    pub fn new() -> Self {
        Self::from_storage(S::new())
    }
    /// Creates an empty tree with the specified capacity for the storage. One of the slots is taken by the sentinel.
    ///
    /// # Panics
    /// The storage may panic if it has fixed capacity and the specified value does not match it.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_storage(S::with_capacity(capacity))
    }
    fn from_storage(mut storage: S) -> Self {
        let foot = storage.add(Node::new(None));
        Self {
            storage,
            root: foot.clone(),
            foot,
        }
    }

    /// Returns `true` if the tree has no nodes besides the sentinel, `false` otherwise.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root == self.foot
    }
    /// Counts the nodes of the tree by traversing it.
    ///
    /// This is an *O(n)* operation, the tree does not keep track of its size.
    #[inline]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns a cursor to the root of the tree, or `None` if the tree is empty.
    #[inline]
    pub fn root(&self) -> Option<Cursor<K>> {
        if self.is_empty() {
            None
        } else {
            Some(Cursor::at(self, self.root.clone()))
        }
    }
    /// Returns a cursor to the first node of a traversal of strategy `O`, or to the sentinel if the tree is empty.
    ///
    /// # Example
    /// ```rust
    /// # use ktree::{KTree, DepthFirst, DepthFirstBackward};
    /// let mut tree = KTree::<_>::new();
    /// let root = tree.set_root('r');
    /// tree.append_child(&root, 'a').unwrap();
    /// tree.append_child(&root, 'b').unwrap();
    ///
    /// assert_eq!(tree.value(&tree.begin::<DepthFirst>()), Ok(&'r'));
    /// assert_eq!(tree.value(&tree.begin::<DepthFirstBackward>()), Ok(&'b'));
    /// ```
    #[inline]
    pub fn begin<O: Traversal<K>>(&self) -> Cursor<K, O> {
        Cursor::at(self, O::first(self))
    }
    /// Returns a cursor to the sentinel, which terminates traversals of every strategy.
    #[inline]
    pub fn end<O: Traversal<K>>(&self) -> Cursor<K, O> {
        Cursor::at(self, self.foot.clone())
    }

    /// Returns a reference to the value of the node the cursor points to.
    ///
    /// # Errors
    /// Fails if the cursor does not point into the tree or points to the sentinel.
    ///
    /// # Panics
    /// Sparse storages panic if the cursor points to a node which has been erased.
    #[inline]
    pub fn value<O>(&self, cursor: &Cursor<K, O>) -> CursorResult<&T> {
        self.node(cursor.raw_key())?
            .value
            .as_ref()
            .ok_or_else(|| CursorError::role(Operation::Dereference, NodeRole::Sentinel))
    }
    /// Returns a mutable reference to the value of the node the cursor points to.
    ///
    /// # Errors
    /// Same as [`value`].
    ///
    /// [`value`]: #method.value " "
    #[inline]
    pub fn value_mut<O>(&mut self, cursor: &Cursor<K, O>) -> CursorResult<&mut T> {
        self.node_mut(cursor.raw_key())?
            .value
            .as_mut()
            .ok_or_else(|| CursorError::role(Operation::Dereference, NodeRole::Sentinel))
    }

    /// Looks up a node by a key which came from outside of the tree.
    #[inline]
    fn node(&self, key: &K) -> CursorResult<&Node<T, K>> {
        self.storage.get(key).ok_or(CursorError::Dangling)
    }
    #[inline]
    fn node_mut(&mut self, key: &K) -> CursorResult<&mut Node<T, K>> {
        self.storage.get_mut(key).ok_or(CursorError::Dangling)
    }
    /// Looks up a node by a key read from the links of another node.
    #[inline]
    #[track_caller]
    fn link(&self, key: &K) -> &Node<T, K> {
        self.storage
            .get(key)
            .unwrap_or_else(|| corrupted("link points outside of the storage"))
    }
    #[inline]
    #[track_caller]
    fn link_mut(&mut self, key: &K) -> &mut Node<T, K> {
        self.storage
            .get_mut(key)
            .unwrap_or_else(|| corrupted("link points outside of the storage"))
    }
    /// Checks that `key` points into the tree, at a node which can take part in `operation`.
    fn check_role(&self, key: &K, operation: Operation, allow_root: bool) -> CursorResult<()> {
        self.node(key)?;
        if *key == self.foot {
            Err(CursorError::role(operation, NodeRole::Sentinel))
        } else if !allow_root && *key == self.root {
            Err(CursorError::role(operation, NodeRole::Root))
        } else {
            Ok(())
        }
    }
    /// The parent of a node which is known to have one.
    #[inline]
    #[track_caller]
    fn parent_of(&self, key: &K) -> K {
        expect_link(self.link(key).parent.clone(), "non-root node has no parent")
    }
}

impl<T, S> KTree<T, usize, SparseStorage<Node<T, usize>, S>>
where
    S: granite::ListStorage<Element = granite::SparseStorageSlot<Node<T, usize>>>,
{
    /// Returns the number of holes in the storage, left behind by erased nodes and not yet reused.
    #[inline(always)]
    pub fn num_holes(&self) -> usize {
        self.storage.num_holes()
    }
    /// Returns `true` if the storage has no holes, `false` otherwise.
    #[inline(always)]
    pub fn is_dense(&self) -> bool {
        self.storage.is_dense()
    }
}

impl<T, K, S> Default for KTree<T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T, K, S> IntoIterator for &'a KTree<T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, K, S>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A k-ary tree which uses a *sparse* `Vec` as backing storage.
///
/// The default `KTree` type already uses this, so this is only provided for explicitness and consistency.
#[allow(unused_qualifications)]
pub type SparseVecKTree<T> = KTree<T, usize, granite::SparseVec<Node<T, usize>>>;
/// A k-ary tree which uses a *sparse* `ArrayVec` as backing storage, and thus never allocates node memory. Create it with `with_capacity` and the capacity of the array.
///
/// `A` is the array type, `[SparseStorageSlot<Node<T, usize>>; N]`.
#[allow(unused_qualifications)]
pub type SparseArrayVecKTree<T, A> = KTree<T, usize, SparseStorage<Node<T, usize>, arrayvec::ArrayVec<A>>>;
