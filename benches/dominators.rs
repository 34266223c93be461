//! Benchmarks for dominance queries and graph editing.
//!
//! Covers:
//! - Dominator set computation on chains and nested diamonds
//! - Dominator tree construction
//! - Replace-all-uses on a value with many users

extern crate ssagraph;

use criterion::{criterion_group, criterion_main, Criterion};
use ssagraph::ir::{BlockId, Function};
use std::hint::black_box;

/// A straight chain of `n` blocks.
fn chain(n: usize) -> (Function, BlockId) {
    let mut func = Function::new("chain");
    let blocks: Vec<BlockId> = (0..n).map(|i| func.create_block(format!("b{i}"))).collect();
    for pair in blocks.windows(2) {
        func.link_successor(pair[0], pair[1]).unwrap();
    }
    (func, blocks[n - 1])
}

/// `n` diamonds in sequence, each with a back edge to its head.
fn diamonds(n: usize) -> (Function, BlockId) {
    let mut func = Function::new("diamonds");
    let mut head = func.create_block("entry");
    for i in 0..n {
        let left = func.create_block(format!("l{i}"));
        let right = func.create_block(format!("r{i}"));
        let join = func.create_block(format!("j{i}"));
        func.link_successor(head, left).unwrap();
        func.link_successor(head, right).unwrap();
        func.link_successor(left, join).unwrap();
        func.link_successor(right, join).unwrap();
        func.link_successor(join, head).unwrap();
        head = join;
    }
    (func, head)
}

/// Dominators of the last block of a 64 block chain.
fn bench_dominators_chain(c: &mut Criterion) {
    let (func, last) = chain(64);

    c.bench_function("dominators_chain_64", |b| {
        b.iter(|| black_box(func.dominators(black_box(last)).unwrap()));
    });
}

/// Immediate dominator in 32 looping diamonds.
fn bench_idom_diamonds(c: &mut Criterion) {
    let (func, last) = diamonds(32);

    c.bench_function("idom_diamonds_32", |b| {
        b.iter(|| black_box(func.immediate_dominator(black_box(last)).unwrap()));
    });
}

/// Full dominator tree of 32 looping diamonds.
fn bench_dominator_tree(c: &mut Criterion) {
    let (func, _) = diamonds(32);

    c.bench_function("dominator_tree_diamonds_32", |b| {
        b.iter(|| black_box(func.dominator_tree().unwrap()));
    });
}

/// Redirect 1000 uses back and forth between two constants.
fn bench_replace_all_uses(c: &mut Criterion) {
    let mut func = Function::new("rauw");
    let a = func.const_int(0);
    let b = func.const_int(1);
    for _ in 0..1000 {
        func.create_phi(vec![a, a], "").unwrap();
    }

    c.bench_function("replace_all_uses_2000", |bench| {
        bench.iter(|| {
            func.replace_all_uses_with(black_box(a), b).unwrap();
            func.replace_all_uses_with(black_box(b), a).unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_dominators_chain,
    bench_idom_diamonds,
    bench_dominator_tree,
    bench_replace_all_uses,
);
criterion_main!(benches);
