//! Sine and cosine over slices: the standard library, the scalar reference
//! algorithm, the vector kernel and its rayon form.

use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lanefold::simd::SimdSinCos;
use lanefold::SimdVec;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const VECTOR_SIZES: &[usize] = &[
    1_024,     // 4 KiB
    16_384,    // one parallel chunk
    262_144,   // parallel threshold
    4_194_304, // main memory
];

fn configure_criterion() -> Criterion {
    Criterion::default()
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(3))
        .sample_size(50)
}

fn angles(len: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..len)
        .map(|_| rng.random_range(-4.0 * std::f64::consts::PI..4.0 * std::f64::consts::PI))
        .collect()
}

macro_rules! sincos_group {
    ($name:ident, $t:ty) => {
        fn $name(c: &mut Criterion) {
            for &size in VECTOR_SIZES {
                let mut group =
                    c.benchmark_group(format!("{} sincos {}", stringify!($t), format_size::<$t>(size)));
                group.throughput(Throughput::Elements(size as u64));
                let input: Vec<$t> = angles(size).into_iter().map(|x| x as $t).collect();
                let input = input.as_slice();

                group.bench_with_input(BenchmarkId::new("std", size), input, |b, x| {
                    b.iter(|| black_box(x.iter().map(|v| v.sin_cos()).unzip::<_, _, Vec<$t>, Vec<$t>>()))
                });
                group.bench_with_input(BenchmarkId::new("scalar", size), input, |b, x| {
                    b.iter(|| black_box(x.scalar_sincos()))
                });
                group.bench_with_input(BenchmarkId::new("simd", size), input, |b, x| {
                    b.iter(|| black_box(x.simd_sincos()))
                });
                group.bench_with_input(BenchmarkId::new("parallel simd", size), input, |b, x| {
                    b.iter(|| black_box(x.par_simd_sincos()))
                });
                group.bench_with_input(BenchmarkId::new("simd sin only", size), input, |b, x| {
                    b.iter(|| black_box(x.simd_sin()))
                });
                group.finish();
            }
        }
    };
}

sincos_group!(sincos_f32, f32);
sincos_group!(sincos_f64, f64);

/// One register's worth of lanes, without any slice traffic.
fn sincos_register(c: &mut Criterion) {
    let x = SimdVec::<f32, 16>::from_fn(|i| i as f32 * 0.37 - 3.0);
    c.bench_function("f32x16 sincos", |b| b.iter(|| black_box(black_box(x).sincos())));
    let y = SimdVec::<f64, 8>::from_fn(|i| i as f64 * 0.37 - 1.5);
    c.bench_function("f64x8 sincos", |b| b.iter(|| black_box(black_box(y).sincos())));
}

fn format_size<T>(elements: usize) -> String {
    let bytes = elements * std::mem::size_of::<T>();
    if bytes >= 1 << 20 {
        format!("{:.1} MiB", bytes as f64 / (1 << 20) as f64)
    } else {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    }
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets = sincos_f32, sincos_f64, sincos_register
}
criterion_main!(benches);
