use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use kdpair::{Binning, RuntimeSpec, fof, paircount_brute_force, paircount_with};
use kdpair_test::TestPoints;

fn paircount_benchmark(c: &mut Criterion) {
    let binning = Binning::from_edges(&[0.0, 0.01, 0.02, 0.05, 0.1, 0.2]).unwrap();

    let mut group = c.benchmark_group("paircount");
    for n_points in [1_000usize, 4_000, 16_000] {
        let test_data = TestPoints::from_random(n_points, 3, 1.0, true, 2525365464_u64);
        let points = test_data.point_set();

        group.throughput(Throughput::Elements(n_points as u64));
        for worker_count in [1, 0] {
            let spec = RuntimeSpec::default().with_worker_count(worker_count);
            group.bench_with_input(
                BenchmarkId::new(format!("tree-workers={worker_count}"), n_points),
                &points,
                |b, points| b.iter(|| paircount_with(points, None, &binning, &spec).unwrap()),
            );
        }

        // the quadratic version gets too slow for the larger inputs
        if n_points <= 4_000 {
            group.bench_with_input(
                BenchmarkId::new("brute-force", n_points),
                &points,
                |b, points| b.iter(|| paircount_brute_force(points, None, &binning).unwrap()),
            );
        }
    }
    group.finish();
}

fn fof_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("fof");
    for n_points in [1_000usize, 10_000] {
        let points = TestPoints::from_random(n_points, 3, 1.0, true, 42).point_set();
        group.throughput(Throughput::Elements(n_points as u64));
        group.bench_with_input(BenchmarkId::new("fof", n_points), &points, |b, points| {
            b.iter(|| fof(points, 0.02, &RuntimeSpec::default()).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, paircount_benchmark, fof_benchmark);
criterion_main!(benches);
