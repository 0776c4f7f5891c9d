//! Routing benchmarks.
//!
//! Run with: `cargo bench -p hermes-router`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hermes_router::{PathPattern, RouteTable};
use http::Method;

fn build_table(num_routes: usize) -> RouteTable<usize> {
    let mut table = RouteTable::new();

    for i in 0..num_routes / 2 {
        table
            .insert(Method::GET, &format!("/v2/resource{i}/:ID"), i)
            .unwrap();
        table
            .insert(Method::POST, &format!("/v2/resource{i}"), i)
            .unwrap();
    }

    table
}

fn bench_compile(c: &mut Criterion) {
    c.bench_function("compile_pattern", |b| {
        b.iter(|| black_box(PathPattern::compile("/v2/org/:Org/game/:ID/moves").unwrap()));
    });
}

fn bench_match_single(c: &mut Criterion) {
    let pattern = PathPattern::compile("/v2/org/:Org/game/:ID").unwrap();

    c.bench_function("match_single_pattern", |b| {
        b.iter(|| black_box(pattern.matches("/v2/org/acme/game/abcdef")));
    });
}

fn bench_resolve_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_last_route");

    for size in [10, 50, 200] {
        let table = build_table(size);
        let path = format!("/v2/resource{}/xyz", size / 2 - 1);

        group.bench_with_input(BenchmarkId::from_parameter(size), &path, |b, path| {
            b.iter(|| black_box(table.resolve(&Method::GET, path)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile, bench_match_single, bench_resolve_by_size);
criterion_main!(benches);
