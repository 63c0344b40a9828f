//! Benchmarks for fixed-point distance functions.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vecgate_fixed::{cosine_similarity, dot, euclidean_distance, SCALE};

fn generate_vectors(dims: usize) -> (Vec<i128>, Vec<i128>) {
    let a: Vec<i128> = (0..dims).map(|i| (i as i128) * SCALE / 10).collect();
    let b: Vec<i128> = (0..dims)
        .map(|i| (i as i128) * SCALE / 5 + SCALE / 2)
        .collect();
    (a, b)
}

fn bench_euclidean(c: &mut Criterion) {
    let mut group = c.benchmark_group("euclidean_distance");

    for dims in [128, 256, 512, 768, 1024, 1536].iter() {
        let (a, b) = generate_vectors(*dims);
        group.bench_with_input(BenchmarkId::from_parameter(dims), dims, |bencher, _| {
            bencher.iter(|| euclidean_distance(black_box(&a), black_box(&b)))
        });
    }

    group.finish();
}

fn bench_cosine(c: &mut Criterion) {
    let mut group = c.benchmark_group("cosine_similarity");

    for dims in [128, 256, 512, 768, 1024, 1536].iter() {
        let (a, b) = generate_vectors(*dims);
        group.bench_with_input(BenchmarkId::from_parameter(dims), dims, |bencher, _| {
            bencher.iter(|| cosine_similarity(black_box(&a), black_box(&b)))
        });
    }

    group.finish();
}

fn bench_dot(c: &mut Criterion) {
    let mut group = c.benchmark_group("dot");

    for dims in [128, 512, 1536].iter() {
        let (a, b) = generate_vectors(*dims);
        group.bench_with_input(BenchmarkId::from_parameter(dims), dims, |bencher, _| {
            bencher.iter(|| dot(black_box(&a), black_box(&b)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_euclidean, bench_cosine, bench_dot);
criterion_main!(benches);
