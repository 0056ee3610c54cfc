//! Doubly linked lists, stored in an arena the same way as trees.
//!
//! The list keeps a valueless tail sentinel after its last element. An empty list has its head pointing at the sentinel.
//!
//! # Example
//! ```rust
//! use ktree::List;
//!
//! let mut list: List<_> = (1..=3).collect();
//! let second = {
//!     let mut cursor = list.begin();
//!     cursor.advance(&list).unwrap();
//!     cursor
//! };
//! list.insert(&second, 20).unwrap();
//! list.insert_before(&second, 10).unwrap();
//! assert!(list.iter().copied().eq([1, 10, 2, 20, 3].iter().copied()));
//! assert!(list.iter().rev().copied().eq([3, 20, 2, 10, 1].iter().copied()));
//! ```

use core::{
    fmt::{self, Formatter, Debug},
    iter::FromIterator,
};
use granite::{Storage, DefaultStorage};
use tracing::{debug, trace};
use crate::{
    util::{corrupted, expect_link},
    CursorError,
    CursorResult,
    NodeRole,
    Operation,
};

mod node;
mod cursor;
pub use node::Node;
pub use cursor::{Cursor, Iter};

/// A doubly linked list.
///
/// See the [module-level documentation] for more.
///
/// [module-level documentation]: index.html " "
pub struct List<T, K = usize, S = DefaultStorage<Node<T, K>>>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    storage: S,
    head: K,
    tail: K,
}
impl<T, K, S> List<T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    /// Creates an empty list. Only the sentinel is allocated.
    ///
    /// # Panics
    /// Storages with a fixed capacity panic here; use [`with_capacity`] for them.
    ///
    /// [`with_capacity`]: #method.with_capacity " "
    #[inline]
    pub fn new() -> Self {
        Self::from_storage(S::new())
    }
    /// Creates an empty list with the specified capacity for the storage. One of the slots is taken by the sentinel.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_storage(S::with_capacity(capacity))
    }
    fn from_storage(mut storage: S) -> Self {
        let tail = storage.add(Node::new(None));
        Self {
            storage,
            head: tail.clone(),
            tail,
        }
    }

    /// Returns `true` if the list has no elements, `false` otherwise.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }
    /// Counts the elements by walking the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.iter().count()
    }
    /// Returns a cursor to the first element, or to the sentinel if the list is empty.
    #[inline]
    pub fn begin(&self) -> Cursor<K> {
        Cursor::new(self.head.clone())
    }
    /// Returns a cursor to the sentinel.
    #[inline]
    pub fn end(&self) -> Cursor<K> {
        Cursor::new(self.tail.clone())
    }
    /// Iterates over the values from front to back. Use `.rev()` to go the other way.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, K, S> {
        Iter::new(self)
    }

    /// Returns a reference to the value the cursor points to.
    ///
    /// # Errors
    /// Fails if the cursor does not point into the list or points to the sentinel.
    #[inline]
    pub fn value(&self, cursor: &Cursor<K>) -> CursorResult<&T> {
        self.node(cursor.raw_key())?
            .value
            .as_ref()
            .ok_or_else(|| CursorError::role(Operation::Dereference, NodeRole::Sentinel))
    }
    /// Returns a mutable reference to the value the cursor points to.
    ///
    /// # Errors
    /// Same as [`value`].
    ///
    /// [`value`]: #method.value " "
    #[inline]
    pub fn value_mut(&mut self, cursor: &Cursor<K>) -> CursorResult<&mut T> {
        self.node_mut(cursor.raw_key())?
            .value
            .as_mut()
            .ok_or_else(|| CursorError::role(Operation::Dereference, NodeRole::Sentinel))
    }

    /// Inserts a value after the element pointed to by `cursor`, returning a cursor to it. In an empty list the value becomes the only element, regardless of the cursor.
    ///
    /// # Errors
    /// Fails if the cursor does not point into the list, or points to the sentinel of a non-empty list.
    pub fn insert(&mut self, cursor: &Cursor<K>, value: T) -> CursorResult<Cursor<K>> {
        let target = cursor.raw_key().clone();
        self.node(&target)?;
        if self.is_empty() {
            return Ok(self.push_back(value));
        }
        if target == self.tail {
            return Err(CursorError::role(Operation::InsertAfter, NodeRole::Sentinel));
        }
        let next = expect_link(self.link(&target).next.clone(), "element has no successor");
        Ok(self.link_between(Some(target), next, value))
    }
    /// Inserts a value before the element pointed to by `cursor`, returning a cursor to it. Inserting before the sentinel appends the value.
    ///
    /// # Errors
    /// Fails if the cursor does not point into the list.
    pub fn insert_before(&mut self, cursor: &Cursor<K>, value: T) -> CursorResult<Cursor<K>> {
        let target = cursor.raw_key().clone();
        let prev = self.node(&target)?.prev.clone();
        Ok(self.link_between(prev, target, value))
    }
    /// Appends a value to the back of the list, returning a cursor to it.
    #[inline]
    pub fn push_back(&mut self, value: T) -> Cursor<K> {
        let tail = self.tail.clone();
        let prev = self.link(&tail).prev.clone();
        self.link_between(prev, tail, value)
    }

    /// Removes the element pointed to by `cursor`, returning a cursor to the element after it.
    ///
    /// # Errors
    /// Fails if the cursor does not point into the list or points to the sentinel.
    pub fn erase(&mut self, cursor: &Cursor<K>) -> CursorResult<Cursor<K>> {
        let target = cursor.raw_key().clone();
        self.node(&target)?;
        if target == self.tail {
            return Err(CursorError::role(Operation::Erase, NodeRole::Sentinel));
        }
        let next = self.unlink(&target);
        trace!(element = ?target, "erased an element");
        Ok(Cursor::new(next))
    }
    /// Removes the elements from `first` to `last`, both included, returning a cursor to the element after `last`.
    ///
    /// If `last` comes before `first` or is not in the list, everything from `first` to the end is removed. Nothing is removed if `first` is the end cursor.
    ///
    /// # Errors
    /// Fails if either cursor does not point into the list.
    ///
    /// # Example
    /// ```rust
    /// # use ktree::List;
    /// let mut list: List<_> = (0..6).collect();
    /// let mut first = list.begin();
    /// first.advance(&list).unwrap();
    /// let mut last = first;
    /// last.advance(&list).unwrap();
    /// last.advance(&list).unwrap();
    ///
    /// let after = list.erase_range(&first, &last).unwrap();
    /// assert_eq!(list.value(&after), Ok(&4));
    /// assert!(list.iter().copied().eq([0, 4, 5].iter().copied()));
    /// ```
    pub fn erase_range(&mut self, first: &Cursor<K>, last: &Cursor<K>) -> CursorResult<Cursor<K>> {
        self.node(first.raw_key())?;
        self.node(last.raw_key())?;
        let mut current = first.raw_key().clone();
        let mut removed = 0_usize;
        while current != self.tail {
            let reached_last = current == *last.raw_key();
            current = self.unlink(&current);
            removed += 1;
            if reached_last {
                break;
            }
        }
        debug!(removed, "erased a range of elements");
        Ok(Cursor::new(current))
    }
    /// Removes every element. Does nothing if the list is already empty.
    pub fn clear(&mut self) {
        let mut removed = 0_usize;
        while !self.is_empty() {
            let head = self.head.clone();
            self.unlink(&head);
            removed += 1;
        }
        if removed > 0 {
            debug!(removed, "cleared the list");
        }
    }

    /// Allocates a value and links it between two neighbours, the second of which must exist.
    fn link_between(&mut self, prev: Option<K>, next: K, value: T) -> Cursor<K> {
        let new = self.storage.add(Node::new(Some(value)));
        {
            let node = self.link_mut(&new);
            node.prev = prev.clone();
            node.next = Some(next.clone());
        }
        self.link_mut(&next).prev = Some(new.clone());
        match prev {
            Some(prev) => self.link_mut(&prev).next = Some(new.clone()),
            None => self.head = new.clone(),
        }
        trace!(element = ?new, "inserted an element");
        Cursor::new(new)
    }
    /// Removes an element which is not the sentinel, returning the key of its successor.
    fn unlink(&mut self, target: &K) -> K {
        let Node { prev, next, .. } = self.storage.remove(target);
        let next = expect_link(next, "element has no successor");
        self.link_mut(&next).prev = prev.clone();
        match prev {
            Some(prev) => self.link_mut(&prev).next = Some(next.clone()),
            None => self.head = next.clone(),
        }
        next
    }

    #[inline]
    fn node(&self, key: &K) -> CursorResult<&Node<T, K>> {
        self.storage.get(key).ok_or(CursorError::Dangling)
    }
    #[inline]
    fn node_mut(&mut self, key: &K) -> CursorResult<&mut Node<T, K>> {
        self.storage.get_mut(key).ok_or(CursorError::Dangling)
    }
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
}

impl<T, K, S> Default for List<T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
impl<T, K, S> Clone for List<T, K, S>
where
    T: Clone,
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    fn clone(&self) -> Self {
        let mut list = Self::with_capacity(self.storage.capacity());
        list.extend(self.iter().cloned());
        list
    }
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.extend(source.iter().cloned());
    }
}
impl<T, K, S> PartialEq for List<T, K, S>
where
    T: PartialEq,
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}
impl<T, K, S> Eq for List<T, K, S>
where
    T: Eq,
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
}
impl<T, K, S> Debug for List<T, K, S>
where
    T: Debug,
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
impl<T, K, S> Extend<T> for List<T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}
impl<T, K, S> FromIterator<T> for List<T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}
impl<'a, T, K, S> IntoIterator for &'a List<T, K, S>
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
