use criterion::{criterion_group, criterion_main, Criterion};
use ktree::{Cursor, KTree};
use std::hint::black_box;

const FANOUT: u32 = 4;
const DEPTH: u32 = 6;

/// A complete tree where every inner node has `FANOUT` children.
fn complete_tree() -> KTree<u32> {
    let mut tree = KTree::new();
    let root = tree.set_root(0);
    let mut level: Vec<Cursor<usize>> = vec![root];
    let mut next_value = 1;
    for _ in 0..DEPTH {
        let mut next_level = Vec::with_capacity(level.len() * FANOUT as usize);
        for parent in &level {
            for _ in 0..FANOUT {
                next_level.push(tree.append_child(parent, next_value).unwrap());
                next_value += 1;
            }
        }
        level = next_level;
    }
    tree
}

fn traversal(c: &mut Criterion) {
    let tree = complete_tree();
    c.bench_function("depth_first", |b| {
        b.iter(|| black_box(&tree).iter().copied().sum::<u32>());
    });
    c.bench_function("depth_first_backward", |b| {
        b.iter(|| black_box(&tree).iter_backward().copied().sum::<u32>());
    });
    c.bench_function("breadth_first", |b| {
        b.iter(|| black_box(&tree).iter_breadth_first().copied().sum::<u32>());
    });
}

fn copying(c: &mut Criterion) {
    let tree = complete_tree();
    c.bench_function("clone", |b| {
        b.iter(|| black_box(&tree).clone());
    });
    c.bench_function("equality", |b| {
        let copy = tree.clone();
        b.iter(|| black_box(&tree) == black_box(&copy));
    });
}

criterion_group!(benches, traversal, copying);
criterion_main!(benches);
