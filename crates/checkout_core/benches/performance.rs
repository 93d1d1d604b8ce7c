//! Performance benchmarks for checkout_core using Criterion.rs.

use checkout_core::runner::run_replica;
use checkout_core::scenario::ReplicaParams;
use checkout_core::test_helpers::{standard_registry, test_customer};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_replica_run(c: &mut Criterion) {
    let params = ReplicaParams::default().with_arrival_rate(2.0);

    let mut group = c.benchmark_group("replica_run");
    for servers in 1..=5usize {
        let layout = params.server_layout(servers);
        group.bench_with_input(BenchmarkId::from_parameter(servers), &layout, |b, layout| {
            b.iter(|| black_box(run_replica(layout, &params, servers as u64 * 1000)));
        });
    }
    group.finish();
}

fn bench_routing(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_best");
    for servers in [5usize, 20, 100] {
        let mut registry = standard_registry(servers);
        for (i, server) in registry.servers_mut().iter_mut().enumerate() {
            for j in 0..(i % 4) {
                server.enqueue(test_customer((i * 10 + j) as u64, 12, 0.3, 0.0));
            }
        }
        group.bench_with_input(BenchmarkId::from_parameter(servers), &registry, |b, registry| {
            b.iter(|| black_box(registry.select_best(black_box(8))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_replica_run, bench_routing);
criterion_main!(benches);
