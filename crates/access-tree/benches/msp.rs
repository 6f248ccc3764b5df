//! Benchmarks for span program construction, sharing and solving
//!
//! Trees are balanced 2-of-3 gates, the shape threshold policies tend to take
//! once they nest a few levels deep.

use std::collections::BTreeSet;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use access_tree::{lagrange_coefficients, AccessTree, Fp, MonotoneSpanProgram, ShareId};

type F = Fp<2305843009213693951>;

/// Balanced 2-of-3 tree of the given depth, leaves numbered left to right
fn balanced(depth: u32, next: &mut ShareId) -> AccessTree {
    if depth == 0 {
        let leaf = AccessTree::leaf(*next);
        *next += 1;
        return leaf;
    }
    AccessTree::Inner {
        threshold: 2,
        children: (0..3).map(|_| balanced(depth - 1, next)).collect(),
    }
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("msp_build");

    for depth in [2u32, 3, 4, 5].iter() {
        let tree = balanced(*depth, &mut 0);
        group.bench_with_input(
            BenchmarkId::from_parameter(tree.leaf_count()),
            &tree,
            |b, tree| b.iter(|| black_box(MonotoneSpanProgram::<F>::build(tree).unwrap())),
        );
    }

    group.finish();
}

fn bench_share(c: &mut Criterion) {
    let mut group = c.benchmark_group("msp_share");
    let mut rng = ChaCha20Rng::seed_from_u64(0);

    for depth in [2u32, 3, 4, 5].iter() {
        let tree = balanced(*depth, &mut 0);
        let msp = MonotoneSpanProgram::<F>::build(&tree).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(tree.leaf_count()),
            &msp,
            |b, msp| b.iter(|| black_box(msp.share_with_rng(F::new(42), &mut rng))),
        );
    }

    group.finish();
}

fn bench_solving_vector(c: &mut Criterion) {
    let mut group = c.benchmark_group("msp_solving_vector");

    for depth in [2u32, 3, 4].iter() {
        let tree = balanced(*depth, &mut 0);
        let msp = MonotoneSpanProgram::<F>::build(&tree).unwrap();
        // every leaf: the solver has to discard redundant rows
        let all: BTreeSet<ShareId> = (0..tree.leaf_count()).collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(tree.leaf_count()),
            &all,
            |b, all| b.iter(|| black_box(msp.solving_vector(all).unwrap())),
        );
    }

    group.finish();
}

fn bench_satisfaction(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_queries");
    let tree = balanced(5, &mut 0);
    let all: BTreeSet<ShareId> = (0..tree.leaf_count()).collect();

    group.bench_function("is_satisfied_by", |b| {
        b.iter(|| black_box(tree.is_satisfied_by(&all)))
    });
    group.bench_function("minimal_satisfying_subset", |b| {
        b.iter(|| black_box(tree.minimal_satisfying_subset(&all).unwrap()))
    });

    group.finish();
}

fn bench_lagrange(c: &mut Criterion) {
    let mut group = c.benchmark_group("lagrange_coefficients");

    for k in [4u32, 16, 64].iter() {
        let indices: Vec<u32> = (1..=*k).collect();
        group.bench_with_input(BenchmarkId::from_parameter(k), &indices, |b, indices| {
            b.iter(|| black_box(lagrange_coefficients::<F>(indices, &F::new(0)).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_share,
    bench_solving_vector,
    bench_satisfaction,
    bench_lagrange
);
criterion_main!(benches);
