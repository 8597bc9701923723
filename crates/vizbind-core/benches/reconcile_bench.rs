use std::time::Duration;

use anyhow::Result;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vizbind_core::{ChartConfig, ChartData, ChartEngine, ChartKind, Dataset, DomainPolicy, Field, FieldValue, Rgba};

fn table(n: usize, shift: usize) -> vizbind_core::Result<ChartData> {
    let rows = (shift..n + shift)
        .map(|i| vec![FieldValue::Number(i as f64), FieldValue::Number((i as f64 * 0.01).sin() * 10.0)])
        .collect();
    Ok(ChartData::Table(Dataset::from_rows(vec![Field::numeric("x"), Field::numeric("y")], rows)?))
}

fn engine() -> ChartEngine {
    let cfg = ChartConfig::new(ChartKind::Scatter {
        key: "x".into(),
        x: "x".into(),
        y: "y".into(),
        x_domain: DomainPolicy::Extent,
        y_domain: DomainPolicy::Fixed { min: -12.0, max: 12.0 },
        radius: 3.0,
        color: Rgba::rgb(0, 128, 0),
    });
    ChartEngine::new(cfg).unwrap()
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile_scatter");
    for &n in &[1_000usize, 10_000usize] {
        group.bench_function(format!("shift_{n}"), |b| {
            let mut ch = engine();
            let a = table(n, 0).unwrap();
            let z = table(n, n / 10).unwrap();
            let mut flip = false;
            b.iter(|| -> Result<()> {
                flip = !flip;
                let data = if flip { z.clone() } else { a.clone() };
                let ticket = ch.begin_load();
                black_box(ch.complete_load(ticket, Ok(data), Duration::ZERO)?);
                Ok(())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reconcile);
criterion_main!(benches);
