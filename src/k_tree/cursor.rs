use alloc::collections::VecDeque;
use core::{
    fmt::{self, Formatter, Debug},
    hash::{Hash, Hasher},
    iter::FusedIterator,
};
use granite::Storage;
use super::{KTree, Node};
use crate::{CursorError, CursorResult, NodeRole, Operation};

/// A traversal strategy, which defines the order in which a [`Cursor`] visits the nodes of a tree.
///
/// Strategies may keep state between steps, which is stored inside the cursor. All strategies finish the traversal on the sentinel of the tree.
///
/// [`Cursor`]: struct.Cursor.html " "
pub trait Traversal<K>: Clone + Debug
where
    K: Clone + Debug + Eq,
{
    /// Creates the traversal state for a cursor which starts at `key`.
    fn start<T, S>(tree: &KTree<T, K, S>, key: &K) -> Self
    where
        S: Storage<Element = Node<T, K>, Key = K>;
    /// Returns the key of the first node of a full traversal, or of the sentinel if the tree is empty.
    fn first<T, S>(tree: &KTree<T, K, S>) -> K
    where
        S: Storage<Element = Node<T, K>, Key = K>;
    /// Returns the key of the node visited after `key`.
    ///
    /// # Errors
    /// Fails if `key` does not point into the tree or points to the sentinel.
    fn advance<T, S>(&mut self, tree: &KTree<T, K, S>, key: &K) -> CursorResult<K>
    where
        S: Storage<Element = Node<T, K>, Key = K>;
}
/// A traversal strategy which can also be walked backwards.
pub trait ReversibleTraversal<K>: Traversal<K>
where
    K: Clone + Debug + Eq,
{
    /// Returns the key of the node visited before `key`.
    ///
    /// # Errors
    /// Fails if `key` does not point into the tree or points to the first node of the traversal.
    fn retreat<T, S>(&mut self, tree: &KTree<T, K, S>, key: &K) -> CursorResult<K>
    where
        S: Storage<Element = Node<T, K>, Key = K>;
}

/// Depth-first pre-order traversal: a node, then each of its children's subtrees from left to right.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DepthFirst;
impl<K> Traversal<K> for DepthFirst
where
    K: Clone + Debug + Eq,
{
    #[inline(always)]
    fn start<T, S>(_: &KTree<T, K, S>, _: &K) -> Self
    where
        S: Storage<Element = Node<T, K>, Key = K>,
    {
        Self
    }
    #[inline]
    fn first<T, S>(tree: &KTree<T, K, S>) -> K
    where
        S: Storage<Element = Node<T, K>, Key = K>,
    {
        tree.root.clone()
    }
    #[inline]
    fn advance<T, S>(&mut self, tree: &KTree<T, K, S>, key: &K) -> CursorResult<K>
    where
        S: Storage<Element = Node<T, K>, Key = K>,
    {
        depth_first_next(tree, key)
    }
}
impl<K> ReversibleTraversal<K> for DepthFirst
where
    K: Clone + Debug + Eq,
{
    #[inline]
    fn retreat<T, S>(&mut self, tree: &KTree<T, K, S>, key: &K) -> CursorResult<K>
    where
        S: Storage<Element = Node<T, K>, Key = K>,
    {
        depth_first_prev(tree, key).map(|(key, _)| key)
    }
}

/// The exact reverse of [`DepthFirst`]: children before their parent, right to left, ending with the root and then the sentinel.
///
/// Retreating from the sentinel lands on the root.
///
/// [`DepthFirst`]: struct.DepthFirst.html " "
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DepthFirstBackward;
impl<K> Traversal<K> for DepthFirstBackward
where
    K: Clone + Debug + Eq,
{
    #[inline(always)]
    fn start<T, S>(_: &KTree<T, K, S>, _: &K) -> Self
    where
        S: Storage<Element = Node<T, K>, Key = K>,
    {
        Self
    }
    fn first<T, S>(tree: &KTree<T, K, S>) -> K
    where
        S: Storage<Element = Node<T, K>, Key = K>,
    {
        depth_first_prev(tree, &tree.foot).map_or_else(|_| tree.foot.clone(), |(key, _)| key)
    }
    fn advance<T, S>(&mut self, tree: &KTree<T, K, S>, key: &K) -> CursorResult<K>
    where
        S: Storage<Element = Node<T, K>, Key = K>,
    {
        tree.node(key)?;
        if *key == tree.foot {
            Err(CursorError::role(Operation::Advance, NodeRole::Sentinel))
        } else if *key == tree.root {
            Ok(tree.foot.clone())
        } else {
            depth_first_prev(tree, key).map(|(key, _)| key)
        }
    }
}
impl<K> ReversibleTraversal<K> for DepthFirstBackward
where
    K: Clone + Debug + Eq,
{
    fn retreat<T, S>(&mut self, tree: &KTree<T, K, S>, key: &K) -> CursorResult<K>
    where
        S: Storage<Element = Node<T, K>, Key = K>,
    {
        tree.node(key)?;
        if *key == tree.foot {
            return if tree.is_empty() {
                Err(CursorError::role(Operation::Retreat, NodeRole::First))
            } else {
                Ok(tree.root.clone())
            };
        }
        let next = depth_first_next(tree, key)?;
        if next == tree.foot {
            Err(CursorError::role(Operation::Retreat, NodeRole::First))
        } else {
            Ok(next)
        }
    }
}

/// Breadth-first traversal: all nodes of one depth from left to right, then the next depth.
///
/// Only moves forward: it keeps a queue of visited nodes whose children have not been visited yet, which cannot be replayed backwards.
#[derive(Clone, Debug)]
pub struct BreadthFirst<K> {
    queue: VecDeque<K>,
    foot: K,
}
impl<K> Traversal<K> for BreadthFirst<K>
where
    K: Clone + Debug + Eq,
{
    #[inline]
    fn start<T, S>(tree: &KTree<T, K, S>, key: &K) -> Self
    where
        S: Storage<Element = Node<T, K>, Key = K>,
    {
        let mut queue = VecDeque::new();
        queue.push_back(key.clone());
        Self {
            queue,
            foot: tree.foot.clone(),
        }
    }
    #[inline]
    fn first<T, S>(tree: &KTree<T, K, S>) -> K
    where
        S: Storage<Element = Node<T, K>, Key = K>,
    {
        tree.root.clone()
    }
    fn advance<T, S>(&mut self, tree: &KTree<T, K, S>, key: &K) -> CursorResult<K>
    where
        S: Storage<Element = Node<T, K>, Key = K>,
    {
        let node = tree.node(key)?;
        if node.is_sentinel() {
            return Err(CursorError::role(Operation::Advance, NodeRole::Sentinel));
        }
        // The right neighbour of the root is the sentinel, which only comes after all levels
        if node.parent.is_some() {
            if let Some(right) = &node.right {
                self.queue.push_back(right.clone());
                return Ok(right.clone());
            }
        }
        while let Some(discovered) = self.queue.pop_front() {
            if let Some(children) = &tree.link(&discovered).children {
                self.queue.push_back(children.begin.clone());
                return Ok(children.begin.clone());
            }
        }
        Ok(self.foot.clone())
    }
}

/// Depth-first successor of `key`.
fn depth_first_next<T, K, S>(tree: &KTree<T, K, S>, key: &K) -> CursorResult<K>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    let node = tree.node(key)?;
    if node.is_sentinel() {
        return Err(CursorError::role(Operation::Advance, NodeRole::Sentinel));
    }
    if let Some(children) = &node.children {
        return Ok(children.begin.clone());
    }
    let mut current = node;
    loop {
        if let Some(right) = &current.right {
            return Ok(right.clone());
        }
        current = match &current.parent {
            Some(parent) => tree.link(parent),
            // Only nodes detached from the tree run out of ancestors before reaching the root,
            // whose right neighbour is the sentinel
            None => return Err(CursorError::Dangling),
        };
    }
}
/// Depth-first predecessor of `key`, along with the change in depth from `key` to it. The sentinel counts as a top-level node.
pub(super) fn depth_first_prev<T, K, S>(tree: &KTree<T, K, S>, key: &K) -> CursorResult<(K, isize)>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    let node = tree.node(key)?;
    if let Some(left) = &node.left {
        let mut current = left.clone();
        let mut descended = 0;
        while let Some(children) = &tree.link(&current).children {
            current = children.end.clone();
            descended += 1;
        }
        Ok((current, descended))
    } else if let Some(parent) = &node.parent {
        Ok((parent.clone(), -1))
    } else {
        Err(CursorError::role(Operation::Retreat, NodeRole::First))
    }
}

/// A position in a [`KTree`], walked in the order defined by the traversal strategy `O`.
///
/// Cursors don't borrow the tree: every operation takes it as an argument. A cursor stays valid until the node it points to is erased; using it afterwards returns an error or, with sparse storages, panics. Using a cursor with a tree it was not obtained from is not undefined behavior, but produces meaningless results.
///
/// Cursors compare equal if they point to the same node, regardless of their strategies.
///
/// [`KTree`]: struct.KTree.html " "
#[derive(Copy, Clone, Debug)]
pub struct Cursor<K, O = DepthFirst> {
    key: K,
    order: O,
}
impl<K, O> Cursor<K, O> {
    /// Returns the storage key of the node the cursor points to.
    #[inline(always)]
    pub const fn raw_key(&self) -> &K {
        &self.key
    }
    /// Consumes the cursor and returns the storage key of the node it points to.
    #[inline(always)]
    #[allow(clippy::missing_const_for_fn)]
    pub fn into_raw_key(self) -> K {
        self.key
    }
}
impl<K, O> Cursor<K, O>
where
    K: Clone + Debug + Eq,
    O: Traversal<K>,
{
    #[inline]
    pub(super) fn at<T, S>(tree: &KTree<T, K, S>, key: K) -> Self
    where
        S: Storage<Element = Node<T, K>, Key = K>,
    {
        let order = O::start(tree, &key);
        Self { key, order }
    }
    /// Moves the cursor to the next node of the traversal. Advancing from the last node moves the cursor to the sentinel.
    ///
    /// # Errors
    /// Fails if the cursor points to the sentinel already or does not point into the tree. The cursor is left untouched in that case.
    #[inline]
    pub fn advance<T, S>(&mut self, tree: &KTree<T, K, S>) -> CursorResult<()>
    where
        S: Storage<Element = Node<T, K>, Key = K>,
    {
        self.key = self.order.advance(tree, &self.key)?;
        Ok(())
    }
    /// Returns `true` if the cursor points to the sentinel of the tree, `false` otherwise.
    #[inline]
    pub fn is_end<T, S>(&self, tree: &KTree<T, K, S>) -> bool
    where
        S: Storage<Element = Node<T, K>, Key = K>,
    {
        self.key == tree.foot
    }
    /// Converts the cursor into one with a different traversal strategy, pointing to the same node. The new traversal starts from scratch at that node.
    #[inline]
    pub fn reorder<P, T, S>(self, tree: &KTree<T, K, S>) -> Cursor<K, P>
    where
        P: Traversal<K>,
        S: Storage<Element = Node<T, K>, Key = K>,
    {
        Cursor::at(tree, self.key)
    }
}
impl<K, O> Cursor<K, O>
where
    K: Clone + Debug + Eq,
    O: ReversibleTraversal<K>,
{
    /// Moves the cursor to the previous node of the traversal. Retreating from the sentinel moves the cursor to the last node.
    ///
    /// # Errors
    /// Fails if the cursor points to the first node of the traversal (or to the sentinel of an empty tree) or does not point into the tree. The cursor is left untouched in that case.
    #[inline]
    pub fn retreat<T, S>(&mut self, tree: &KTree<T, K, S>) -> CursorResult<()>
    where
        S: Storage<Element = Node<T, K>, Key = K>,
    {
        self.key = self.order.retreat(tree, &self.key)?;
        Ok(())
    }
}
impl<K: PartialEq, O, P> PartialEq<Cursor<K, P>> for Cursor<K, O> {
    #[inline]
    fn eq(&self, other: &Cursor<K, P>) -> bool {
        self.key == other.key
    }
}
impl<K: Eq, O> Eq for Cursor<K, O> {}
impl<K: Hash, O> Hash for Cursor<K, O> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state)
    }
}

/// An iterator over the positions of a tree, produced by [`KTree::cursors`].
///
/// [`KTree::cursors`]: struct.KTree.html#method.cursors " "
pub struct Cursors<'a, T, K, S, O = DepthFirst>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    tree: &'a KTree<T, K, S>,
    cursor: Option<Cursor<K, O>>,
}
impl<'a, T, K, S, O> Iterator for Cursors<'a, T, K, S, O>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
    O: Traversal<K>,
{
    type Item = Cursor<K, O>;
    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;
        if cursor.is_end(self.tree) {
            self.cursor = None;
            return None;
        }
        let current = cursor.clone();
        if cursor.advance(self.tree).is_err() {
            self.cursor = None;
        }
        Some(current)
    }
}
impl<'a, T, K, S, O> FusedIterator for Cursors<'a, T, K, S, O>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
    O: Traversal<K>,
{}
impl<'a, T, K, S, O> Debug for Cursors<'a, T, K, S, O>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
    O: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursors").field("cursor", &self.cursor).finish()
    }
}

/// An iterator over references to the values of a tree in the order of strategy `O`.
pub struct Iter<'a, T, K, S, O = DepthFirst>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    tree: &'a KTree<T, K, S>,
    cursor: Option<Cursor<K, O>>,
}
impl<'a, T, K, S, O> Iterator for Iter<'a, T, K, S, O>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
    O: Traversal<K>,
{
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let cursor = self.cursor.as_mut()?;
        let value = match &tree.link(cursor.raw_key()).value {
            Some(value) => value,
            None => {
                self.cursor = None;
                return None;
            }
        };
        if cursor.advance(tree).is_err() {
            self.cursor = None;
        }
        Some(value)
    }
}
impl<'a, T, K, S, O> FusedIterator for Iter<'a, T, K, S, O>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
    O: Traversal<K>,
{}
impl<'a, T, K, S, O> Debug for Iter<'a, T, K, S, O>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
    O: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("cursor", &self.cursor).finish()
    }
}

impl<T, K, S> KTree<T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    /// Iterates over the values of the tree in depth-first pre-order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, K, S> {
        self.iter_with()
    }
    /// Iterates over the values of the tree in reverse depth-first pre-order.
    #[inline]
    pub fn iter_backward(&self) -> Iter<'_, T, K, S, DepthFirstBackward> {
        self.iter_with()
    }
    /// Iterates over the values of the tree in breadth-first order.
    #[inline]
    pub fn iter_breadth_first(&self) -> Iter<'_, T, K, S, BreadthFirst<K>> {
        self.iter_with()
    }
    /// Iterates over the values of the tree in the order of strategy `O`.
    #[inline]
    pub fn iter_with<O: Traversal<K>>(&self) -> Iter<'_, T, K, S, O> {
        Iter {
            tree: self,
            cursor: Some(self.begin()),
        }
    }
    /// Iterates over every position of the tree, excluding the sentinel, in the order of strategy `O`.
    ///
    /// # Example
    /// ```rust
    /// # use ktree::{KTree, DepthFirst};
    /// let mut tree = KTree::<_>::new();
    /// let root = tree.set_root("root");
    /// tree.append_child(&root, "first").unwrap();
    /// tree.append_child(&root, "second").unwrap();
    ///
    /// let second = tree.cursors::<DepthFirst>().nth(2).unwrap();
    /// tree.insert_left(&second, "between").unwrap();
    /// assert!(tree.iter().copied().eq(["root", "first", "between", "second"].iter().copied()));
    /// ```
    #[inline]
    pub fn cursors<O: Traversal<K>>(&self) -> Cursors<'_, T, K, S, O> {
        Cursors {
            tree: self,
            cursor: Some(self.begin()),
        }
    }
}
