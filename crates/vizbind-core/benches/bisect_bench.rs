use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vizbind_core::SortedKeys;

fn bench_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("sorted_keys_nearest");
    for &n in &[1_000usize, 100_000usize] {
        let keys = SortedKeys::new((0..n).map(|i| i as f64 * 0.5).collect(), "x").unwrap();
        let queries: Vec<f64> = (0..1024).map(|i| (i as f64 * 97.31) % (n as f64 * 0.5)).collect();
        group.bench_function(format!("n_{n}"), |b| {
            b.iter(|| {
                for &p in &queries {
                    black_box(keys.nearest(black_box(p)));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_nearest);
criterion_main!(benches);
