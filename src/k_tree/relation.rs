use core::fmt::Debug;
use granite::Storage;
use super::{Cursor, DepthFirst, KTree, Node};
use crate::CursorResult;

impl<T, K, S> KTree<T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    /// Returns the number of parent hops from the node pointed to by `cursor` up to the root. The root and the sentinel are at depth 0.
    ///
    /// # Errors
    /// Fails if the cursor does not point into the tree.
    #[inline]
    pub fn depth<O>(&self, cursor: &Cursor<K, O>) -> CursorResult<usize> {
        self.node(cursor.raw_key())?;
        Ok(self.key_depth(cursor.raw_key()))
    }
    /// Returns the number of parent hops from `from` up to `to`, or 0 if `to` is not a proper ancestor of `from`.
    ///
    /// # Errors
    /// Fails if either cursor does not point into the tree.
    ///
    /// # Example
    /// ```rust
    /// # use ktree::KTree;
    /// let mut tree = KTree::<_>::new();
    /// let root = tree.set_root(0);
    /// let child = tree.append_child(&root, 1).unwrap();
    /// let grandchild = tree.append_child(&child, 2).unwrap();
    ///
    /// assert_eq!(tree.depth_between(&grandchild, &root), Ok(2));
    /// assert_eq!(tree.depth_between(&root, &grandchild), Ok(0));
    /// ```
    pub fn depth_between<O, P>(&self, from: &Cursor<K, O>, to: &Cursor<K, P>) -> CursorResult<usize> {
        self.node(from.raw_key())?;
        self.node(to.raw_key())?;
        Ok(self.distance(from.raw_key(), to.raw_key(), |node| &node.parent))
    }
    /// Returns the number of right hops from `from` to `to` along their sibling chain, or 0 if `to` is not a sibling to the right of `from`.
    ///
    /// # Errors
    /// Fails if either cursor does not point into the tree.
    pub fn breadth_between<O, P>(&self, from: &Cursor<K, O>, to: &Cursor<K, P>) -> CursorResult<usize> {
        self.node(from.raw_key())?;
        self.node(to.raw_key())?;
        Ok(self.distance(from.raw_key(), to.raw_key(), |node| &node.right))
    }
    /// Returns `true` if `ancestor` is a proper ancestor of `descendant`, `false` otherwise.
    ///
    /// # Errors
    /// Fails if either cursor does not point into the tree.
    #[inline]
    pub fn is_ancestor_of<O, P>(&self, ancestor: &Cursor<K, O>, descendant: &Cursor<K, P>) -> CursorResult<bool> {
        self.depth_between(descendant, ancestor).map(|hops| hops > 0)
    }
    /// Returns `true` if `left` is a sibling somewhere to the left of `right`, `false` otherwise.
    ///
    /// # Errors
    /// Fails if either cursor does not point into the tree.
    #[inline]
    pub fn is_left_of<O, P>(&self, left: &Cursor<K, O>, right: &Cursor<K, P>) -> CursorResult<bool> {
        self.breadth_between(left, right).map(|hops| hops > 0)
    }
    /// Returns `true` if `right` is a sibling somewhere to the right of `left`, `false` otherwise.
    ///
    /// # Errors
    /// Fails if either cursor does not point into the tree.
    #[inline]
    pub fn is_right_of<O, P>(&self, right: &Cursor<K, O>, left: &Cursor<K, P>) -> CursorResult<bool> {
        self.is_left_of(left, right)
    }

    fn key_depth(&self, key: &K) -> usize {
        let mut depth = 0;
        let mut current = self.link(key);
        while let Some(parent) = &current.parent {
            depth += 1;
            current = self.link(parent);
        }
        depth
    }
    /// Depth of `current`, given that `previous` comes right before it in pre-order and sits at `previous_depth`.
    fn next_depth(&self, previous: &K, previous_depth: usize, current: &K) -> usize {
        let node = self.link(current);
        if node.parent.as_ref() == Some(previous) {
            return previous_depth + 1;
        }
        // Otherwise the left sibling of `current` is `previous` or one of its ancestors
        match &node.left {
            Some(left) if left != previous => {
                previous_depth - self.distance(previous, left, |node| &node.parent)
            }
            _ => previous_depth,
        }
    }
    /// Follows one kind of link from `from` until `to` is found, returning the number of hops taken. Returns 0 if the chain ends first. The sentinel is never counted as a sibling of the root.
    fn distance(&self, from: &K, to: &K, follow: fn(&Node<T, K>) -> &Option<K>) -> usize {
        let mut hops = 0;
        let mut current = from.clone();
        while let Some(next) = follow(self.link(&current)).clone() {
            if next == self.foot {
                break;
            }
            hops += 1;
            if next == *to {
                return hops;
            }
            current = next;
        }
        0
    }
    /// How `previous` relates to `current`: whether it is an ancestor, a sibling to the left and a sibling to the right.
    fn relation(&self, previous: &K, current: &K) -> (bool, bool, bool) {
        (
            self.distance(current, previous, |node| &node.parent) > 0,
            self.distance(previous, current, |node| &node.right) > 0,
            self.distance(current, previous, |node| &node.right) > 0,
        )
    }
}

/// Trees are equal if their depth-first traversals visit equal values at equal depths, with every pair of consecutive nodes related the same way.
impl<T, K, S> PartialEq for KTree<T, K, S>
where
    T: PartialEq,
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    fn eq(&self, other: &Self) -> bool {
        let mut ours = self.cursors::<DepthFirst>().map(Cursor::into_raw_key);
        let mut theirs = other.cursors::<DepthFirst>().map(Cursor::into_raw_key);
        // Pairs of visited keys along with their shared depth
        let mut previous: Option<(K, K, usize)> = None;
        loop {
            let (a, b) = match (ours.next(), theirs.next()) {
                (Some(a), Some(b)) => (a, b),
                (None, None) => return true,
                _ => return false,
            };
            if self.link(&a).value != other.link(&b).value {
                return false;
            }
            let depth = match &previous {
                Some((previous_a, previous_b, depth)) => {
                    let (depth_a, depth_b) = (
                        self.next_depth(previous_a, *depth, &a),
                        other.next_depth(previous_b, *depth, &b),
                    );
                    if depth_a != depth_b
                        || self.relation(previous_a, &a) != other.relation(previous_b, &b)
                    {
                        return false;
                    }
                    depth_a
                }
                None => 0,
            };
            previous = Some((a, b, depth));
        }
    }
}
impl<T, K, S> Eq for KTree<T, K, S>
where
    T: Eq,
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
}
