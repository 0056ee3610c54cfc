//! Arena-allocated positional containers: a k-ary tree with STL-style cursors, and a doubly linked list built the same way.
//!
//! # Overview
//! Both containers keep their nodes in an arena (see the *Storage* section) and link them together with storage keys instead of pointers. Every container owns one extra, valueless node called the **sentinel** which marks the one-past-the-end position: a cursor pointing at it is what [`KTree::end`] and [`List::end`] return, and a container whose first position *is* the sentinel is empty.
//!
//! The tree is positional, not a search tree: nodes stay where they were inserted relative to their siblings, parents and children. Three traversal disciplines are available, selected by a strategy type on the cursor:
//! - [`DepthFirst`] - pre-order, left to right, bidirectional;
//! - [`DepthFirstBackward`] - the exact reverse of the above, also bidirectional;
//! - [`BreadthFirst`] - level order, forward only. Retreating a breadth-first cursor does not compile.
//!
//! Cursors don't borrow the container they point into, which lets them be passed into the mutating methods of that container. They are invalidated only by removing the node they point at.
//!
//! # Storage
//! The arena is any type implementing [`Storage`] from the `granite` crate, with [`SparseVec`] being the default. Sparse storages leave holes behind removed elements instead of shifting the remaining ones to the left, which is what keeps cursors to unrelated nodes valid across removals. **Storages which shift elements on removal must not be used**: while the nodes fix their own links via [`MoveFix`], the container and any outstanding cursors have no way of learning about the shift.
//!
//! Holes get reused by later insertions. If you need to compact the storage all at once, use `defragment` on trees backed by a sparse storage.
//!
//! # Feature flags
//! - `std` (**enabled by default**) - enables the full standard library, disabling `no_std` for the crate. Adds [`Error`] trait implementations and lets `tracing` use the standard library.
//! - `unwind_safety` (**enabled by default**) - makes internal consistency checks abort the process instead of unwinding, so that corrupted containers cannot be observed by unwinders.
//! - `alloc` (**enabled by default**) - makes the default storage available. *This does not require standard library support.*
//! - `k_tree` (**enabled by default**, requires `alloc`) - the [`KTree`] container.
//! - `linked_list` (**enabled by default**, requires `alloc`) - the [`List`] container.
//! - `smallvec`, `slab`, `slotmap` - enable the respective storage implementations in `granite`.
//! - `union_optimizations` - passed through to `granite`, decreasing memory usage of sparse storage. **Requires a nightly compiler.**
//!
//! # Logging
//! Structural mutations emit [`tracing`] events (`trace` for single-node splices, `debug` for subtree removals, copies and compaction). Nothing is logged unless the application installs a subscriber.
//!
//! # Public dependencies
//! - `arrayvec` (**required**) - `^0.5`
//! - `granite` (**required**) - `^1.0`
//!
//! [`Error`]: https://doc.rust-lang.org/std/error/trait.Error.html " "
//! [`tracing`]: https://docs.rs/tracing/*/tracing/ " "
//! [`Storage`]: https://docs.rs/granite/*/granite/trait.Storage.html " "
//! [`SparseVec`]: https://docs.rs/granite/*/granite/type.SparseVec.html " "
//! [`MoveFix`]: https://docs.rs/granite/*/granite/trait.MoveFix.html " "

#![warn(
    rust_2018_idioms,
    clippy::cargo,
    clippy::nursery,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    variant_size_differences,
    clippy::cast_lossless,
    clippy::checked_conversions,
    clippy::copy_iterator,
    clippy::expl_impl_clone_on_copy,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
    clippy::filter_map_next,
    clippy::map_flatten,
    clippy::map_unwrap_or,
    clippy::fn_params_excessive_bools,
    clippy::implicit_saturating_sub,
    clippy::inefficient_to_string,
    clippy::items_after_statements,
    clippy::large_stack_arrays,
    clippy::let_unit_value,
    clippy::macro_use_imports,
    clippy::match_same_arms,
    clippy::match_wild_err_arm,
    clippy::match_wildcard_for_single_variants,
    clippy::mut_mut,
    clippy::needless_continue,
    clippy::needless_pass_by_value,
    clippy::option_option,
    clippy::range_plus_one,
    clippy::range_minus_one,
    clippy::redundant_closure_for_method_calls,
    clippy::same_functions_in_if_condition,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::too_many_lines,
    clippy::type_repetition_in_bounds,
    clippy::trivially_copy_pass_by_ref,
    clippy::unnested_or_patterns,
    clippy::unused_self,
    clippy::used_underscore_binding,
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::get_unwrap,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unneeded_field_pattern,
    clippy::unwrap_used, // Only .expect() allowed
    clippy::use_debug,
)]
#![deny(
    anonymous_parameters,
    bare_trait_objects,
    clippy::exit,
)]
#![allow(clippy::use_self)]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(feature = "doc_cfg", feature(doc_cfg))]

#[cfg(feature = "alloc")]
extern crate alloc;

#[doc(no_inline)]
pub use granite::{Storage, ListStorage, MoveFix, DefaultStorage, SparseStorage, SparseStorageSlot};

#[cfg(feature = "k_tree")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "k_tree")))]
pub mod k_tree;
#[cfg(feature = "k_tree")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "k_tree")))]
pub use k_tree::{
    KTree,
    Cursor,
    Traversal,
    ReversibleTraversal,
    DepthFirst,
    DepthFirstBackward,
    BreadthFirst,
};

#[cfg(feature = "linked_list")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "linked_list")))]
pub mod list;
#[cfg(feature = "linked_list")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "linked_list")))]
pub use list::List;

/// A prelude for using the crate, containing the most used types in a renamed form for safe glob-importing.
pub mod prelude {
    #[doc(no_inline)]
    pub use granite::{
        Storage as ContainerStorage,
        SparseStorage as SparseContainerStorage,
        DefaultStorage as DefaultContainerStorage,
    };
    #[cfg(feature = "k_tree")]
    #[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "k_tree")))]
    #[doc(no_inline)]
    pub use crate::k_tree::{
        KTree,
        Cursor as KTreeCursor,
        Traversal,
        ReversibleTraversal,
        DepthFirst,
        DepthFirstBackward,
        BreadthFirst,
    };
    #[cfg(feature = "linked_list")]
    #[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "linked_list")))]
    #[doc(no_inline)]
    pub use crate::list::{
        List,
        Cursor as ListCursor,
    };
    #[doc(no_inline)]
    pub use crate::{CursorError, CursorResult};
}

pub(crate) mod util;

use core::fmt::{self, Formatter, Display};
use thiserror::Error;

/// The error type returned by container operations which take a cursor.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The cursor does not point to a node stored in the container. Usually this means that the cursor was obtained from a different container.
    #[error("the cursor does not point to a node of this container")]
    Dangling,
    /// The cursor points to a node which plays a role that the operation is not valid for, such as inserting a sibling of the root of a tree or dereferencing the sentinel.
    #[error("cannot {operation} {role}")]
    InvalidRole {
        /// The operation which was attempted.
        operation: Operation,
        /// The role of the node which the cursor pointed to.
        role: NodeRole,
    },
}
impl CursorError {
    #[inline]
    pub(crate) const fn role(operation: Operation, role: NodeRole) -> Self {
        Self::InvalidRole { operation, role }
    }
}

/// Shorthand for `Result<T, CursorError>`.
pub type CursorResult<T> = Result<T, CursorError>;

/// An operation performed on a container through a cursor, as reported by [`CursorError::InvalidRole`].
///
/// [`CursorError::InvalidRole`]: enum.CursorError.html#variant.InvalidRole " "
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum Operation {
    /// Inserting a sibling to the left or right of a tree node.
    InsertSibling,
    /// Inserting an element after a list position.
    InsertAfter,
    /// Adding a rightmost child.
    AppendChild,
    /// Adding a leftmost child.
    PrependChild,
    /// Removing a node (and, for trees, its subtree).
    Erase,
    /// Accessing the value of a node.
    Dereference,
    /// Moving a cursor forward.
    Advance,
    /// Moving a cursor backward.
    Retreat,
}
impl Display for Operation {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::InsertSibling => "insert a sibling of",
            Self::InsertAfter => "insert after",
            Self::AppendChild => "append a child to",
            Self::PrependChild => "prepend a child to",
            Self::Erase => "erase",
            Self::Dereference => "dereference",
            Self::Advance => "advance past",
            Self::Retreat => "retreat before",
        })
    }
}

/// The role of the node a cursor pointed to when an operation was rejected.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum NodeRole {
    /// The root of a tree, which has no siblings.
    Root,
    /// The valueless end marker.
    Sentinel,
    /// The first position of a traversal, which has no predecessor.
    First,
}
impl Display for NodeRole {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Root => "the root node",
            Self::Sentinel => "the end sentinel",
            Self::First => "the first position",
        })
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CursorError::Dangling, "the cursor does not point to a node of this container")]
    #[case(
        CursorError::role(Operation::InsertSibling, NodeRole::Root),
        "cannot insert a sibling of the root node",
    )]
    #[case(
        CursorError::role(Operation::Dereference, NodeRole::Sentinel),
        "cannot dereference the end sentinel",
    )]
    #[case(
        CursorError::role(Operation::Retreat, NodeRole::First),
        "cannot retreat before the first position",
    )]
    fn error_messages(#[case] error: CursorError, #[case] message: &str) {
        assert_eq!(error.to_string(), message);
    }
}
