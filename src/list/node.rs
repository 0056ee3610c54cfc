use core::num::NonZeroIsize;
use granite::{ListStorage, MoveFix};

/// A node of a linked list.
///
/// Created by the list internally and only publicly exposed so that list storages' generic arguments could be specified.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Node<T, K> {
    /// `None` only for the tail sentinel.
    pub(super) value: Option<T>,
    pub(super) prev: Option<K>,
    pub(super) next: Option<K>,
}
impl<T, K> Node<T, K> {
    #[inline(always)]
    pub(super) const fn new(value: Option<T>) -> Self {
        Self {
            value,
            prev: None,
            next: None,
        }
    }
}

impl<T> MoveFix for Node<T, usize> {
    unsafe fn fix_shift<S>(storage: &mut S, shifted_from: usize, shifted_by: NonZeroIsize)
    where
        S: ListStorage<Element = Self>,
    {
        let shift = shifted_by.get();
        let threshold = if shift > 0 {
            shifted_from
        } else {
            shifted_from + shift.unsigned_abs()
        };
        for i in 0..storage.len() {
            if shift > 0 && i == shifted_from {
                continue;
            }
            let node = storage.get_unchecked_mut(i);
            for link in [&mut node.prev, &mut node.next].iter_mut() {
                if let Some(key) = link {
                    if *key >= threshold {
                        *key = (*key as isize + shift) as usize;
                    }
                }
            }
        }
    }

    unsafe fn fix_move<S>(storage: &mut S, _previous_index: usize, current_index: usize)
    where
        S: ListStorage<Element = Self>,
    {
        let node = storage.get_unchecked(current_index);
        let (prev, next) = (node.prev, node.next);
        if let Some(prev) = prev {
            storage.get_unchecked_mut(prev).next = Some(current_index);
        }
        if let Some(next) = next {
            storage.get_unchecked_mut(next).prev = Some(current_index);
        }
    }
}
