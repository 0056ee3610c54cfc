use ktree::{
    k_tree::{Node, SparseArrayVecKTree},
    DepthFirst,
    SparseStorageSlot,
};
use std::panic::{self, AssertUnwindSafe};

const CAPACITY: usize = 6;
/// Room for the sentinel and five nodes.
type Tree = SparseArrayVecKTree<u32, [SparseStorageSlot<Node<u32, usize>>; CAPACITY]>;

fn full_tree() -> Tree {
    let mut tree = Tree::with_capacity(CAPACITY);
    let root = tree.set_root(0);
    let one = tree.append_child(&root, 1).unwrap();
    tree.append_child(&root, 2).unwrap();
    tree.append_child(&one, 3).unwrap();
    tree.insert_right(&one, 4).unwrap();
    tree
}
fn values(tree: &Tree) -> Vec<u32> {
    tree.iter().copied().collect()
}

#[test]
fn failed_allocation_leaves_tree_untouched() {
    let mut tree = full_tree();
    let before = tree.clone();
    assert_eq!(values(&tree), [0, 1, 3, 4, 2]);

    let one = tree.cursors::<DepthFirst>().nth(1).unwrap();
    let attempts: [fn(&mut Tree, &ktree::Cursor<usize>); 4] = [
        |tree, cursor| {
            let _ = tree.insert_left(cursor, 9);
        },
        |tree, cursor| {
            let _ = tree.insert_right(cursor, 9);
        },
        |tree, cursor| {
            let _ = tree.append_child(cursor, 9);
        },
        |tree, cursor| {
            let _ = tree.prepend_child(cursor, 9);
        },
    ];
    for attempt in attempts.iter() {
        let result = panic::catch_unwind(AssertUnwindSafe(|| attempt(&mut tree, &one)));
        assert!(result.is_err());
        assert_eq!(tree, before);
        assert_eq!(tree.iter_backward().count(), 5);
    }
}
#[test]
fn erased_slots_are_reused() {
    let mut tree = full_tree();
    let three = tree.cursors::<DepthFirst>().nth(2).unwrap();
    tree.erase(&three).unwrap();
    assert_eq!(tree.num_holes(), 1);
    let root = tree.root().unwrap();
    tree.prepend_child(&root, 5).unwrap();
    assert!(tree.is_dense());
    assert_eq!(values(&tree), [0, 5, 1, 4, 2]);
}
#[test]
fn defragment_within_the_array() {
    let mut tree = full_tree();
    let one = tree.cursors::<DepthFirst>().nth(1).unwrap();
    tree.erase(&one).unwrap();
    assert_eq!(tree.num_holes(), 2);
    let len = tree.len();
    tree.defragment();
    assert!(tree.is_dense());
    assert_eq!(tree.num_holes(), 0);
    assert_eq!(tree.len(), len);
    assert_eq!(values(&tree), [0, 4, 2]);
}
#[test]
fn wrong_capacity_is_rejected() {
    assert!(panic::catch_unwind(|| Tree::with_capacity(CAPACITY + 1)).is_err());
}
