use alloc::vec::Vec;
use core::fmt::Debug;
use granite::Storage;
use tracing::{debug, instrument, trace};
use super::{node::Children, Cursor, KTree, Node, Traversal};
use crate::{CursorResult, Operation};

impl<T, K, S> KTree<T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    /// Allocates a detached node. Every mutator calls this before touching any links, so that a storage which panics when full leaves the tree as it was.
    #[inline]
    pub(super) fn allocate(&mut self, value: T) -> K {
        self.storage.add(Node::new(Some(value)))
    }

    /// Sets the value of the root node, creating it if the tree is empty. Returns a cursor to the root.
    ///
    /// The old value, if any, is dropped; the children of the root are kept.
    ///
    /// # Example
    /// ```rust
    /// # use ktree::{KTree, DepthFirst};
    /// let mut tree = KTree::<_>::new();
    /// let root = tree.set_root(451);
    /// tree.append_child(&root, 1).unwrap();
    ///
    /// let root = tree.set_root(120);
    /// assert_eq!(tree.value(&tree.begin::<DepthFirst>()), Ok(&120));
    /// assert_eq!(tree.value(&root), Ok(&120));
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn set_root(&mut self, value: T) -> Cursor<K> {
        if self.is_empty() {
            let root = self.allocate(value);
            let foot = self.foot.clone();
            self.link_mut(&root).right = Some(foot.clone());
            self.link_mut(&foot).left = Some(root.clone());
            self.root = root;
            trace!(root = ?self.root, "created the root node");
        } else {
            let root = self.root.clone();
            self.link_mut(&root).value = Some(value);
            trace!(root = ?self.root, "replaced the value of the root node");
        }
        Cursor::at(self, self.root.clone())
    }

    /// Inserts a new node immediately to the left of the one pointed to by `cursor`, returning a cursor to it.
    ///
    /// # Errors
    /// Fails if the cursor points to the root, which cannot have siblings, or to the sentinel.
    pub fn insert_left<O: Traversal<K>>(
        &mut self,
        cursor: &Cursor<K, O>,
        value: T,
    ) -> CursorResult<Cursor<K, O>> {
        let target = cursor.raw_key().clone();
        self.check_role(&target, Operation::InsertSibling, false)?;
        let parent = self.parent_of(&target);
        let new = self.allocate(value);
        let left = self.link(&target).left.clone();
        {
            let node = self.link_mut(&new);
            node.parent = Some(parent.clone());
            node.left = left.clone();
            node.right = Some(target.clone());
        }
        self.link_mut(&target).left = Some(new.clone());
        match left {
            Some(left) => self.link_mut(&left).right = Some(new.clone()),
            None => self.children_mut(&parent).begin = new.clone(),
        }
        trace!(node = ?new, right = ?target, "inserted a left sibling");
        Ok(Cursor::at(self, new))
    }
    /// Inserts a new node immediately to the right of the one pointed to by `cursor`, returning a cursor to it.
    ///
    /// # Errors
    /// Fails if the cursor points to the root, which cannot have siblings, or to the sentinel.
    pub fn insert_right<O: Traversal<K>>(
        &mut self,
        cursor: &Cursor<K, O>,
        value: T,
    ) -> CursorResult<Cursor<K, O>> {
        let target = cursor.raw_key().clone();
        self.check_role(&target, Operation::InsertSibling, false)?;
        let parent = self.parent_of(&target);
        let new = self.allocate(value);
        let right = self.link(&target).right.clone();
        {
            let node = self.link_mut(&new);
            node.parent = Some(parent.clone());
            node.left = Some(target.clone());
            node.right = right.clone();
        }
        self.link_mut(&target).right = Some(new.clone());
        match right {
            Some(right) => self.link_mut(&right).left = Some(new.clone()),
            None => self.children_mut(&parent).end = new.clone(),
        }
        trace!(node = ?new, left = ?target, "inserted a right sibling");
        Ok(Cursor::at(self, new))
    }
    /// Adds a new rightmost child to the node pointed to by `cursor`, returning a cursor to it.
    ///
    /// # Errors
    /// Fails if the cursor points to the sentinel.
    pub fn append_child<O: Traversal<K>>(
        &mut self,
        cursor: &Cursor<K, O>,
        value: T,
    ) -> CursorResult<Cursor<K, O>> {
        let target = cursor.raw_key().clone();
        self.check_role(&target, Operation::AppendChild, true)?;
        let new = self.allocate(value);
        self.link_mut(&new).parent = Some(target.clone());
        match self.link(&target).children.clone() {
            Some(children) => {
                self.link_mut(&new).left = Some(children.end.clone());
                self.link_mut(&children.end).right = Some(new.clone());
                self.children_mut(&target).end = new.clone();
            }
            None => self.link_mut(&target).children = Some(Children::single(new.clone())),
        }
        trace!(node = ?new, parent = ?target, "appended a child");
        Ok(Cursor::at(self, new))
    }
    /// Adds a new leftmost child to the node pointed to by `cursor`, returning a cursor to it.
    ///
    /// # Errors
    /// Fails if the cursor points to the sentinel.
    pub fn prepend_child<O: Traversal<K>>(
        &mut self,
        cursor: &Cursor<K, O>,
        value: T,
    ) -> CursorResult<Cursor<K, O>> {
        let target = cursor.raw_key().clone();
        self.check_role(&target, Operation::PrependChild, true)?;
        let new = self.allocate(value);
        self.link_mut(&new).parent = Some(target.clone());
        match self.link(&target).children.clone() {
            Some(children) => {
                self.link_mut(&new).right = Some(children.begin.clone());
                self.link_mut(&children.begin).left = Some(new.clone());
                self.children_mut(&target).begin = new.clone();
            }
            None => self.link_mut(&target).children = Some(Children::single(new.clone())),
        }
        trace!(node = ?new, parent = ?target, "prepended a child");
        Ok(Cursor::at(self, new))
    }

    /// Removes the node pointed to by `cursor` along with its entire subtree.
    ///
    /// Returns a cursor to the right sibling of the removed node, or to its parent if it was the rightmost child. Erasing the root empties the tree and returns the end cursor.
    ///
    /// Cursors to nodes outside of the removed subtree stay valid.
    ///
    /// # Errors
    /// Fails if the cursor points to the sentinel.
    ///
    /// # Example
    /// ```rust
    /// # use ktree::KTree;
    /// let mut tree = KTree::<_>::new();
    /// let root = tree.set_root(0);
    /// let one = tree.append_child(&root, 1).unwrap();
    /// tree.append_child(&one, 2).unwrap();
    /// let three = tree.append_child(&root, 3).unwrap();
    ///
    /// let next = tree.erase(&one).unwrap();
    /// assert_eq!(next, three);
    /// assert!(tree.iter().copied().eq([0, 3].iter().copied()));
    ///
    /// let next = tree.erase(&three).unwrap();
    /// assert_eq!(next, root);
    /// ```
    #[instrument(level = "trace", skip_all)]
    pub fn erase<O: Traversal<K>>(&mut self, cursor: &Cursor<K, O>) -> CursorResult<Cursor<K, O>> {
        let target = cursor.raw_key().clone();
        self.check_role(&target, Operation::Erase, true)?;
        let next = self.excise(&target);
        let removed = self.destroy_subtree(target);
        debug!(removed, "erased a subtree");
        Ok(Cursor::at(self, next))
    }
    /// Removes every node of the tree, leaving only the sentinel. Does nothing if the tree is already empty.
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        let root = self.root.clone();
        self.excise(&root);
        let removed = self.destroy_subtree(root);
        debug!(removed, "cleared the tree");
    }

    /// Unlinks a node from its siblings and parent, returning the key of the node which took its place in the traversal.
    fn excise(&mut self, target: &K) -> K {
        let (parent, left, right) = {
            let node = self.link_mut(target);
            (node.parent.take(), node.left.take(), node.right.take())
        };
        if let Some(left) = &left {
            self.link_mut(left).right = right.clone();
        }
        if let Some(right) = &right {
            self.link_mut(right).left = left.clone();
        }
        if let Some(parent) = &parent {
            let parent_node = self.link_mut(parent);
            if let Some(children) = parent_node.children.clone() {
                let begin = if children.begin == *target { right.clone() } else { Some(children.begin) };
                let end = if children.end == *target { left.clone() } else { Some(children.end) };
                parent_node.children = match (begin, end) {
                    (Some(begin), Some(end)) => Some(Children { begin, end }),
                    _ => None,
                };
            }
        }
        if *target == self.root {
            self.root = self.foot.clone();
        }
        match right.or(parent) {
            Some(next) => next,
            // The root always has the sentinel as its right neighbour
            None => self.foot.clone(),
        }
    }
    /// Drops an excised node and all of its descendants, descendants first. Returns the number of nodes removed.
    fn destroy_subtree(&mut self, top: K) -> usize {
        // Every node gets listed before its descendants, so going through the list backwards
        // removes children before their parents
        let mut listed = Vec::new();
        let mut pending = alloc::vec![top];
        while let Some(key) = pending.pop() {
            let mut child = self.link(&key).children.as_ref().map(|children| children.begin.clone());
            while let Some(current) = child {
                child = self.link(&current).right.clone();
                pending.push(current);
            }
            listed.push(key);
        }
        let removed = listed.len();
        for key in listed.into_iter().rev() {
            drop(self.storage.remove(&key));
        }
        removed
    }

    #[inline]
    #[track_caller]
    fn children_mut(&mut self, key: &K) -> &mut Children<K> {
        match &mut self.link_mut(key).children {
            Some(children) => children,
            None => crate::util::corrupted("parent node has no children"),
        }
    }
}
