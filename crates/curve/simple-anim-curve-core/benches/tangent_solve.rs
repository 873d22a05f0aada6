use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use simple_anim_curve_core::{build_auto_cubic_keys, compute_auto_tangents, Key};

fn samples(n: usize) -> Vec<(f64, f64)> {
    (0..n)
        .map(|i| {
            let t = i as f64 / 30.0;
            (t, (t * 3.1).sin() + 0.25 * (t * 11.0).cos())
        })
        .collect()
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("auto_tangents");
    for &n in &[16usize, 256, 4096] {
        let keys: Vec<Key> = build_auto_cubic_keys(samples(n));
        group.bench_with_input(BenchmarkId::new("solve", n), &keys, |b, keys| {
            b.iter_batched_ref(
                || keys.clone(),
                |k| compute_auto_tangents(black_box(k), 0.0),
                criterion::BatchSize::SmallInput,
            )
        });
        let raw = samples(n);
        group.bench_with_input(BenchmarkId::new("build", n), &raw, |b, raw| {
            b.iter(|| build_auto_cubic_keys(black_box(raw.iter().copied())))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_solve);
criterion_main!(benches);
