// Scorer throughput: one snapshot against the built-in table, and against
// a larger synthetic table.
//
// Run with: cargo bench --bench crop_ranking

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use crop_scorer::{default_profiles, score, CropProfile, OptimalRange, SensorSnapshot};

fn snapshot() -> SensorSnapshot {
    SensorSnapshot {
        soil_moisture_percent: 58.0,
        soil_temperature_celsius: 24.3,
        soil_ph: 6.4,
        nitrogen_mg_per_kg: 212.0,
        phosphorus_mg_per_kg: 27.0,
        potassium_mg_per_kg: 240.0,
    }
}

/// Defaults repeated with shifted moisture windows so scores spread out
fn synthetic_table(size: usize) -> Vec<CropProfile> {
    let base = default_profiles();
    (0..size)
        .map(|i| {
            let mut profile = base[i % base.len()].clone();
            let shift = (i / base.len()) as f64;
            profile.name = format!("{} #{}", profile.name, i);
            profile.moisture_range = OptimalRange::new(
                profile.moisture_range.min - shift,
                profile.moisture_range.max - shift,
            );
            profile
        })
        .collect()
}

fn bench_default_table(c: &mut Criterion) {
    let snapshot = snapshot();
    let profiles = default_profiles();

    c.bench_function("score_default_table", |b| {
        b.iter(|| score(black_box(&snapshot), black_box(profiles)))
    });
}

fn bench_table_size(c: &mut Criterion) {
    let snapshot = snapshot();
    let mut group = c.benchmark_group("score_table_size");

    for size in [8, 64, 512] {
        let profiles = synthetic_table(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &profiles, |b, profiles| {
            b.iter(|| score(black_box(&snapshot), black_box(profiles)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_default_table, bench_table_size);
criterion_main!(benches);
