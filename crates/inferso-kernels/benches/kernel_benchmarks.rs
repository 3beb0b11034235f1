//! Benchmarks comparing the Winograd tile path against direct evaluation

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use inferso_kernels::{im2col, transform_kernel, winograd_f23};
use ndarray::Array3;

fn direct_tile(g: &[[f32; 3]; 3], d: &[[f32; 4]; 4]) -> [[f32; 2]; 2] {
    let mut y = [[0.0f32; 2]; 2];
    for r in 0..2 {
        for c in 0..2 {
            let mut acc = 0.0;
            for i in 0..3 {
                for j in 0..3 {
                    acc += g[i][j] * d[r + i][c + j];
                }
            }
            y[r][c] = acc;
        }
    }
    y
}

fn benchmark_tile_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("tile_evaluation");

    let g = [[0.5, -1.0, 2.0], [0.0, 1.5, -0.5], [1.0, 0.25, -2.0]];
    let d = [
        [1.0, 2.0, 3.0, 4.0],
        [5.0, 6.0, 7.0, 8.0],
        [-1.0, -2.0, -3.0, -4.0],
        [0.5, 1.5, 2.5, 3.5],
    ];
    let u = transform_kernel(&g);

    group.bench_function("winograd_f23", |b| {
        b.iter(|| black_box(winograd_f23(black_box(&u), black_box(&d))))
    });

    group.bench_function("direct_3x3", |b| {
        b.iter(|| black_box(direct_tile(black_box(&g), black_box(&d))))
    });

    group.bench_function("kernel_transform", |b| {
        b.iter(|| black_box(transform_kernel(black_box(&g))))
    });

    group.finish();
}

fn benchmark_im2col(c: &mut Criterion) {
    let mut group = c.benchmark_group("im2col");

    for &size in [16usize, 32, 64].iter() {
        let input = Array3::from_shape_fn((8, size, size), |(c, r, w)| {
            ((c * 31 + r * 7 + w) % 13) as f32 * 0.5 - 3.0
        });

        group.bench_with_input(BenchmarkId::new("unfold_3x3", size), &input, |b, input| {
            let output = (size - 2, size - 2);
            b.iter(|| black_box(im2col(&input.view(), 0..8, (3, 3), (1, 1), output)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_tile_evaluation, benchmark_im2col);
criterion_main!(benches);
