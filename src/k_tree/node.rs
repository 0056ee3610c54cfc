use core::num::NonZeroIsize;
use granite::{ListStorage, MoveFix};

/// A node of a k-ary tree.
///
/// Created by the tree internally and only publicly exposed so that tree storages' generic arguments could be specified.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Node<T, K> {
    /// `None` only for the sentinel.
    pub(super) value: Option<T>,
    pub(super) parent: Option<K>,
    pub(super) left: Option<K>,
    pub(super) right: Option<K>,
    pub(super) children: Option<Children<K>>,
}

/// The bounds of a node's child chain. A childless node has neither.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(super) struct Children<K> {
    pub(super) begin: K,
    pub(super) end: K,
}

impl<T, K> Node<T, K> {
    /// Creates a node with all links absent.
    #[inline(always)]
    pub(super) const fn new(value: Option<T>) -> Self {
        Self {
            value,
            parent: None,
            left: None,
            right: None,
            children: None,
        }
    }
    #[inline(always)]
    pub(super) const fn is_sentinel(&self) -> bool {
        self.value.is_none()
    }
}

impl<K: Clone> Children<K> {
    #[inline(always)]
    pub(super) fn single(key: K) -> Self {
        Self {
            begin: key.clone(),
            end: key,
        }
    }
}

impl<T> Node<T, usize> {
    fn links_mut(&mut self) -> [&mut Option<usize>; 3] {
        [&mut self.parent, &mut self.left, &mut self.right]
    }
}

impl<T> MoveFix for Node<T, usize> {
    unsafe fn fix_shift<S>(storage: &mut S, shifted_from: usize, shifted_by: NonZeroIsize)
    where
        S: ListStorage<Element = Self>,
    {
        let shift = shifted_by.get();
        // Everything at or past this index has moved by `shift`. Removed elements were unlinked
        // beforehand, so nothing points into the removed range.
        let threshold = if shift > 0 {
            shifted_from
        } else {
            shifted_from + shift.unsigned_abs()
        };
        let relabel = |key: &mut usize| {
            if *key >= threshold {
                *key = (*key as isize + shift) as usize;
            }
        };
        for i in 0..storage.len() {
            if shift > 0 && i == shifted_from {
                // The inserted element, its links are already correct
                continue;
            }
            let node = storage.get_unchecked_mut(i);
            for link in node.links_mut().iter_mut() {
                if let Some(key) = link {
                    relabel(key);
                }
            }
            if let Some(children) = &mut node.children {
                relabel(&mut children.begin);
                relabel(&mut children.end);
            }
        }
    }

    unsafe fn fix_move<S>(storage: &mut S, previous_index: usize, current_index: usize)
    where
        S: ListStorage<Element = Self>,
    {
        let node = storage.get_unchecked(current_index);
        let (parent, left, right, children) = (node.parent, node.left, node.right, node.children);
        if let Some(children) = children {
            let mut child = Some(children.begin);
            while let Some(key) = child {
                let child_node = storage.get_unchecked_mut(key);
                child_node.parent = Some(current_index);
                child = child_node.right;
            }
        }
        if let Some(left) = left {
            storage.get_unchecked_mut(left).right = Some(current_index);
        }
        if let Some(right) = right {
            storage.get_unchecked_mut(right).left = Some(current_index);
        }
        if let Some(parent) = parent {
            if let Some(children) = &mut storage.get_unchecked_mut(parent).children {
                if children.begin == previous_index {
                    children.begin = current_index;
                }
                if children.end == previous_index {
                    children.end = current_index;
                }
            }
        }
    }
}
