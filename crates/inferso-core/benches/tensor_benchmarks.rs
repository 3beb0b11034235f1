//! Benchmarks for tensor creation and padding

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use inferso_core::Tensor;

fn benchmark_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("tensor_creation");

    for &size in [16usize, 64, 224].iter() {
        group.bench_with_input(BenchmarkId::new("zeroed", size), &size, |b, &size| {
            b.iter(|| black_box(Tensor::new(3, size, size)));
        });

        group.bench_with_input(BenchmarkId::new("from_elem", size), &size, |b, &size| {
            b.iter(|| black_box(Tensor::from_elem((3, size, size), 1.0)));
        });
    }

    group.finish();
}

fn benchmark_padding(c: &mut Criterion) {
    let mut group = c.benchmark_group("tensor_padding");

    for &size in [16usize, 64, 224].iter() {
        let map = Tensor::random_uniform((3, size, size), -1.0, 1.0);

        group.bench_with_input(BenchmarkId::new("border_1", size), &map, |b, map| {
            b.iter(|| black_box(map.pad([1, 1, 1, 1], 0.0)));
        });

        group.bench_with_input(BenchmarkId::new("tile_align_4", size), &map, |b, map| {
            let pad_rows = 4 - map.rows() % 4;
            let pad_cols = 4 - map.cols() % 4;
            b.iter(|| black_box(map.pad([0, pad_rows, 0, pad_cols], 0.0)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_creation, benchmark_padding);
criterion_main!(benches);
