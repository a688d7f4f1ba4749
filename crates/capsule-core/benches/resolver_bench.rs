//! # Resolver Benchmarks
//!
//! Performance benchmarks for capsule-core catalog operations.
//!
//! Run with: `cargo bench -p capsule-core`

use capsule_core::{Catalog, DuplicatePolicy, Registry, rewrite_deep_links};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// One tour containing `size` places, each place pointing back at the tour
/// and at its predecessor.
fn tour_documents(size: usize) -> Vec<String> {
    let contains: Vec<String> = (0..size)
        .map(|i| format!(r#"{{"rel":"contains","target":"place-p{i}"}}"#))
        .collect();

    let mut docs = Vec::with_capacity(size + 1);
    docs.push(format!(
        r#"{{"type":"tour","slug":"hub","links":[{}]}}"#,
        contains.join(",")
    ));

    for i in 0..size {
        let nearby = if i == 0 {
            String::new()
        } else {
            format!(r#",{{"rel":"nearby","targetSlug":"p{}"}}"#, i - 1)
        };
        docs.push(format!(
            r#"{{"type":"place","slug":"p{i}","title":"Place {i}","links":[{{"rel":"part_of","targetSlug":"hub"}}{nearby}]}}"#
        ));
    }

    docs
}

fn catalog(size: usize) -> Catalog {
    let registry = Registry::from_json_documents(tour_documents(size), DuplicatePolicy::Reject)
        .expect("build");
    Catalog::new(registry)
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_build");

    for size in [100, 1000, 5000].iter() {
        let docs = tour_documents(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &docs, |b, docs| {
            b.iter(|| {
                black_box(
                    Registry::from_json_documents(docs, DuplicatePolicy::Overwrite)
                        .expect("build"),
                )
            });
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("slug_lookup");

    for size in [100, 1000, 5000].iter() {
        let catalog = catalog(*size);
        let target = format!("p{}", size / 2);
        group.bench_with_input(BenchmarkId::from_parameter(size), &target, |b, target| {
            b.iter(|| black_box(catalog.get(target)));
        });
    }

    group.finish();
}

fn bench_children(c: &mut Criterion) {
    let mut group = c.benchmark_group("children_of");

    for size in [100, 1000, 5000].iter() {
        let catalog = catalog(*size);
        let hub = catalog.find_tour("hub").expect("hub should exist").clone();
        group.bench_with_input(BenchmarkId::from_parameter(size), &hub, |b, hub| {
            b.iter(|| black_box(catalog.children_of(hub)));
        });
    }

    group.finish();
}

fn bench_dangling(c: &mut Criterion) {
    let mut group = c.benchmark_group("dangling_links");

    for size in [100, 1000].iter() {
        let catalog = catalog(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(catalog.dangling_links()));
        });
    }

    group.finish();
}

fn bench_rewrite(c: &mut Criterion) {
    let mut group = c.benchmark_group("rewrite_deep_links");

    for size in [10, 100, 1000].iter() {
        let catalog = catalog(*size);
        let markdown: String = (0..*size)
            .map(|i| format!("Stop {i}: [[p{i}]] then [[missing-{i}]].\n"))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &markdown, |b, md| {
            b.iter(|| black_box(rewrite_deep_links(catalog.registry(), md)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_lookup,
    bench_children,
    bench_dangling,
    bench_rewrite
);
criterion_main!(benches);
