//! Random operation sequences applied to a tree and to a flat model of it.
//!
//! The model is the pre-order sequence of `(value, depth)` pairs, which determines the shape of a tree uniquely. Every structural operation is a splice on that sequence: the subtree of the node at index `i` is the run starting at `i` and ending before the next entry that is not deeper than it.

use ktree::{BreadthFirst, Cursor, DepthFirst, DepthFirstBackward, KTree};
use proptest::prelude::*;
use std::{cell::Cell, rc::Rc};
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug)]
enum Op {
    SetRoot(u32),
    InsertLeft(usize, u32),
    InsertRight(usize, u32),
    AppendChild(usize, u32),
    PrependChild(usize, u32),
    Erase(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => (0..100_u32).prop_map(Op::SetRoot),
        3 => (any::<usize>(), 0..100_u32).prop_map(|(i, v)| Op::InsertLeft(i, v)),
        3 => (any::<usize>(), 0..100_u32).prop_map(|(i, v)| Op::InsertRight(i, v)),
        4 => (any::<usize>(), 0..100_u32).prop_map(|(i, v)| Op::AppendChild(i, v)),
        3 => (any::<usize>(), 0..100_u32).prop_map(|(i, v)| Op::PrependChild(i, v)),
        1 => any::<usize>().prop_map(Op::Erase),
    ]
}

type Model = Vec<(u32, usize)>;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn subtree_end(model: &Model, index: usize) -> usize {
    let depth = model[index].1;
    model[index + 1..]
        .iter()
        .position(|&(_, d)| d <= depth)
        .map_or(model.len(), |offset| index + 1 + offset)
}
fn nth<T>(tree: &KTree<T>, index: usize) -> Cursor<usize> {
    tree.cursors::<DepthFirst>().nth(index).expect("index within the tree")
}

/// Applies the operation to both the tree and the model. Indices are taken modulo the size of the tree.
fn apply<T>(tree: &mut KTree<T>, model: &mut Model, op: Op, make: impl Fn(u32) -> T) {
    if let Op::SetRoot(value) = op {
        tree.set_root(make(value));
        match model.first_mut() {
            Some(root) => root.0 = value,
            None => model.push((value, 0)),
        }
        return;
    }
    if model.is_empty() {
        return;
    }
    let (index, value) = match op {
        Op::InsertLeft(i, v) | Op::InsertRight(i, v) | Op::AppendChild(i, v) | Op::PrependChild(i, v) => {
            (i % model.len(), v)
        }
        Op::Erase(i) => (i % model.len(), 0),
        Op::SetRoot(..) => unreachable!(),
    };
    let cursor = nth(tree, index);
    let depth = model[index].1;
    match op {
        Op::InsertLeft(..) | Op::InsertRight(..) if index == 0 => {
            let result = match op {
                Op::InsertLeft(..) => tree.insert_left(&cursor, make(value)),
                _ => tree.insert_right(&cursor, make(value)),
            };
            assert!(result.is_err());
        }
        Op::InsertLeft(..) => {
            tree.insert_left(&cursor, make(value)).unwrap();
            model.insert(index, (value, depth));
        }
        Op::InsertRight(..) => {
            tree.insert_right(&cursor, make(value)).unwrap();
            model.insert(subtree_end(model, index), (value, depth));
        }
        Op::AppendChild(..) => {
            tree.append_child(&cursor, make(value)).unwrap();
            model.insert(subtree_end(model, index), (value, depth + 1));
        }
        Op::PrependChild(..) => {
            tree.prepend_child(&cursor, make(value)).unwrap();
            model.insert(index + 1, (value, depth + 1));
        }
        Op::Erase(..) => {
            tree.erase(&cursor).unwrap();
            let end = subtree_end(model, index);
            model.drain(index..end);
        }
        Op::SetRoot(..) => unreachable!(),
    }
}

fn build(ops: &[Op]) -> (KTree<u32>, Model) {
    let mut tree = KTree::new();
    let mut model = Model::new();
    for &op in ops {
        apply(&mut tree, &mut model, op, |v| v);
    }
    (tree, model)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn traversals_match_model(ops in prop::collection::vec(op(), 0..64)) {
        init_logging();
        let (tree, model) = build(&ops);
        let values: Vec<u32> = model.iter().map(|&(v, _)| v).collect();
        prop_assert_eq!(tree.len(), model.len());
        prop_assert_eq!(tree.iter().copied().collect::<Vec<_>>(), values.clone());
        prop_assert_eq!(
            tree.iter_backward().copied().collect::<Vec<_>>(),
            values.iter().rev().copied().collect::<Vec<_>>(),
        );
        let mut by_level = model.clone();
        by_level.sort_by_key(|&(_, depth)| depth);
        prop_assert_eq!(
            tree.iter_breadth_first().copied().collect::<Vec<_>>(),
            by_level.iter().map(|&(v, _)| v).collect::<Vec<_>>(),
        );
        let depths: Vec<usize> = tree
            .cursors::<DepthFirst>()
            .map(|c| tree.depth(&c).unwrap())
            .collect();
        prop_assert_eq!(depths, model.iter().map(|&(_, d)| d).collect::<Vec<_>>());
    }

    #[test]
    fn breadth_first_depths_never_decrease(ops in prop::collection::vec(op(), 0..64)) {
        let (tree, _) = build(&ops);
        let depths: Vec<usize> = tree
            .cursors::<BreadthFirst<usize>>()
            .map(|c| tree.depth(&c).unwrap())
            .collect();
        prop_assert!(depths.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn advance_then_retreat_is_identity(ops in prop::collection::vec(op(), 0..64)) {
        let (tree, _) = build(&ops);
        for start in tree.cursors::<DepthFirst>() {
            let mut cursor = start;
            cursor.advance(&tree).unwrap();
            cursor.retreat(&tree).unwrap();
            prop_assert_eq!(cursor, start);
        }
        for start in tree.cursors::<DepthFirstBackward>() {
            let mut cursor = start;
            cursor.advance(&tree).unwrap();
            cursor.retreat(&tree).unwrap();
            prop_assert_eq!(cursor, start);
        }
    }

    #[test]
    fn clone_is_equal_and_independent(
        ops in prop::collection::vec(op(), 0..64),
        victim in any::<usize>(),
    ) {
        init_logging();
        let (tree, model) = build(&ops);
        let mut copy = tree.clone();
        prop_assert_eq!(&copy, &tree);
        prop_assert_eq!(
            copy.iter_breadth_first().collect::<Vec<_>>(),
            tree.iter_breadth_first().collect::<Vec<_>>(),
        );
        if !model.is_empty() {
            let cursor = nth(&copy, victim % model.len());
            copy.erase(&cursor).unwrap();
            prop_assert_ne!(&copy, &tree);
            prop_assert_eq!(tree.len(), model.len());
        }
    }

    #[test]
    fn values_are_dropped_exactly_once(ops in prop::collection::vec(op(), 0..64)) {
        let live = Rc::new(Cell::new(0_isize));
        {
            let mut tree = KTree::new();
            let mut model = Model::new();
            for &op in &ops {
                apply(&mut tree, &mut model, op, |_| Tracked::new(&live));
                prop_assert_eq!(live.get(), model.len() as isize);
            }
            let copy = tree.clone();
            prop_assert_eq!(live.get(), 2 * model.len() as isize);
            drop(copy);
            tree.defragment();
            prop_assert_eq!(live.get(), model.len() as isize);
        }
        prop_assert_eq!(live.get(), 0);
    }
}

struct Tracked(Rc<Cell<isize>>);
impl Tracked {
    fn new(live: &Rc<Cell<isize>>) -> Self {
        live.set(live.get() + 1);
        Self(Rc::clone(live))
    }
}
impl Clone for Tracked {
    fn clone(&self) -> Self {
        Self::new(&self.0)
    }
}
impl Drop for Tracked {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}
