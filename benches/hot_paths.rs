//! Criterion benchmarks for the per-load and per-frame hot paths.
//!
//! Run with: cargo bench --bench hot_paths

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bd_climate_map::data::district::{union_bounds, Polygon};
use bd_climate_map::data::store::FieldMap;
use bd_climate_map::data::{District, DomainTable};
use bd_climate_map::map::{project_districts, CellGrid, Viewport};

/// 8x8 grid of 24-sided districts over roughly Bangladesh's extent
fn synthetic_districts() -> Vec<District> {
    let mut districts = Vec::new();
    for i in 0..8 {
        for j in 0..8 {
            let (cx, cy) = (88.3 + i as f64 * 0.5, 21.0 + j as f64 * 0.6);
            let ring: Vec<(f64, f64)> = (0..=24)
                .map(|k| {
                    let a = k as f64 / 24.0 * std::f64::consts::TAU;
                    (cx + 0.25 * a.cos(), cy + 0.3 * a.sin())
                })
                .collect();
            let polygon: Polygon = vec![ring];
            districts.push(District::new(format!("D{i}{j}"), "Synthetic", vec![polygon]));
        }
    }
    districts
}

fn synthetic_records(n: usize) -> Vec<FieldMap> {
    (0..n)
        .map(|i| {
            let x = i as f64;
            [
                ("meanTemperature".to_string(), 25.0 + (x * 0.37) % 3.0),
                ("nCdd".to_string(), 5000.0 + (x * 17.0) % 1300.0),
                ("nHotDays40".to_string(), (x * 3.0) % 50.0),
            ]
            .into_iter()
            .collect()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Benchmark: domain table over all records
// ---------------------------------------------------------------------------

fn bench_domains(c: &mut Criterion) {
    let records = synthetic_records(64);

    c.bench_function("domain_table_64_districts", |b| {
        b.iter(|| black_box(DomainTable::compute(black_box(&records))));
    });
}

// ---------------------------------------------------------------------------
// Benchmark: projection and cell rasterisation for one frame
// ---------------------------------------------------------------------------

fn bench_rasterize(c: &mut Criterion) {
    let mut group = c.benchmark_group("raster");
    let districts = synthetic_districts();
    let bounds = union_bounds(&districts).unwrap();
    // 160x48 terminal cells
    let viewport = Viewport::fitted(bounds, 320, 192);
    let projected = project_districts(&districts, &viewport);

    group.bench_function("project_districts", |b| {
        b.iter(|| black_box(project_districts(black_box(&districts), &viewport)));
    });

    group.bench_function("rasterize_160x48", |b| {
        b.iter(|| black_box(CellGrid::rasterize(black_box(&projected), 160, 48)));
    });

    group.finish();
}

criterion_group!(benches, bench_domains, bench_rasterize);
criterion_main!(benches);
