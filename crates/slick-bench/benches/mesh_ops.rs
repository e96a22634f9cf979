//! Criterion benchmarks for mesh loading.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use slick_bench::{bay_geometry, bay_options};
use slick_mesh::{Mesh, MeshGeometry};

/// Benchmark: validate, connect, and classify a 20K-triangle geometry.
fn bench_mesh_load_reference(c: &mut Criterion) {
    let geometry = bay_geometry(100);
    let options = bay_options();

    c.bench_function("mesh_load_reference_20k", |b| {
        b.iter(|| {
            let mesh = Mesh::load(&geometry, &options).unwrap();
            black_box(mesh.cell_count());
        });
    });
}

/// Benchmark: parse the same geometry from JSON, then load it.
fn bench_mesh_parse_json(c: &mut Criterion) {
    let json = serde_json::to_vec(&bay_geometry(100)).unwrap();
    let options = bay_options();

    c.bench_function("mesh_parse_json_20k", |b| {
        b.iter(|| {
            let geometry: MeshGeometry = serde_json::from_slice(&json).unwrap();
            let mesh = Mesh::load(&geometry, &options).unwrap();
            black_box(mesh.cell_count());
        });
    });
}

criterion_group!(benches, bench_mesh_load_reference, bench_mesh_parse_json);
criterion_main!(benches);
