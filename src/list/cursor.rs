use core::{
    fmt::{self, Formatter, Debug},
    iter::FusedIterator,
};
use granite::Storage;
use super::{List, Node};
use crate::{CursorError, CursorResult, NodeRole, Operation};

/// A position in a [`List`].
///
/// Like tree cursors, list cursors don't borrow the list and take it as an argument for every operation. A cursor stays valid until the element it points to is erased.
///
/// [`List`]: struct.List.html " "
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cursor<K> {
    key: K,
}
impl<K> Cursor<K> {
    #[inline(always)]
    pub(super) const fn new(key: K) -> Self {
        Self { key }
    }
    /// Returns the storage key of the element the cursor points to.
    #[inline(always)]
    pub const fn raw_key(&self) -> &K {
        &self.key
    }
    /// Consumes the cursor and returns the storage key of the element it points to.
    #[inline(always)]
    #[allow(clippy::missing_const_for_fn)]
    pub fn into_raw_key(self) -> K {
        self.key
    }
}
impl<K> Cursor<K>
where
    K: Clone + Debug + Eq,
{
    /// Moves the cursor to the next element, or to the sentinel if it pointed to the last one.
    ///
    /// # Errors
    /// Fails if the cursor points to the sentinel or does not point into the list.
    pub fn advance<T, S>(&mut self, list: &List<T, K, S>) -> CursorResult<()>
    where
        S: Storage<Element = Node<T, K>, Key = K>,
    {
        let node = list.node(&self.key)?;
        match &node.next {
            Some(next) => {
                self.key = next.clone();
                Ok(())
            }
            None => Err(CursorError::role(Operation::Advance, NodeRole::Sentinel)),
        }
    }
    /// Moves the cursor to the previous element. Retreating from the sentinel moves the cursor to the last element.
    ///
    /// # Errors
    /// Fails if the cursor points to the first position or does not point into the list.
    pub fn retreat<T, S>(&mut self, list: &List<T, K, S>) -> CursorResult<()>
    where
        S: Storage<Element = Node<T, K>, Key = K>,
    {
        let node = list.node(&self.key)?;
        match &node.prev {
            Some(prev) => {
                self.key = prev.clone();
                Ok(())
            }
            None => Err(CursorError::role(Operation::Retreat, NodeRole::First)),
        }
    }
    /// Returns `true` if the cursor points to the sentinel of the list, `false` otherwise.
    #[inline]
    pub fn is_end<T, S>(&self, list: &List<T, K, S>) -> bool
    where
        S: Storage<Element = Node<T, K>, Key = K>,
    {
        self.key == list.tail
    }
}

/// An iterator over the values of a [`List`], created by [`List::iter`].
///
/// [`List`]: struct.List.html " "
/// [`List::iter`]: struct.List.html#method.iter " "
pub struct Iter<'a, T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    list: &'a List<T, K, S>,
    /// The remaining range, both ends inclusive. `None` once exhausted.
    range: Option<(K, K)>,
}
impl<'a, T, K, S> Iter<'a, T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    pub(super) fn new(list: &'a List<T, K, S>) -> Self {
        let range = list
            .link(&list.tail)
            .prev
            .clone()
            .map(|last| (list.head.clone(), last));
        Self { list, range }
    }
    fn value_of(&self, key: &K) -> &'a T {
        let list: &'a List<T, K, S> = self.list;
        match &list.link(key).value {
            Some(value) => value,
            None => crate::util::corrupted("the sentinel is inside the element range"),
        }
    }
}
impl<'a, T, K, S> Iterator for Iter<'a, T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        let (front, back) = self.range.take()?;
        if front != back {
            let next = crate::util::expect_link(self.list.link(&front).next.clone(), "element has no successor");
            self.range = Some((next, back));
        }
        Some(self.value_of(&front))
    }
}
impl<'a, T, K, S> DoubleEndedIterator for Iter<'a, T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        let (front, back) = self.range.take()?;
        if front != back {
            let prev = crate::util::expect_link(self.list.link(&back).prev.clone(), "element has no predecessor");
            self.range = Some((front, prev));
        }
        Some(self.value_of(&back))
    }
}
impl<'a, T, K, S> FusedIterator for Iter<'a, T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
}
impl<'a, T, K, S> Debug for Iter<'a, T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("range", &self.range).finish()
    }
}
