//! Element-wise slice kernels against ndarray, and single-vector throughput for
//! each representation the resolution table can pick.
//!
//! Sizes straddle the two dispatch thresholds: below `SIMD_THRESHOLD` the kernels
//! stay scalar, above `PARALLEL_SIMD_THRESHOLD` the parallel forms fan out.

use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lanefold::simd::{Resolve, SimdAdd, SimdMul};
use lanefold::SimdVec;
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SLICE_SIZES: &[usize] = &[
    48,        // scalar path
    4_096,     // L1
    65_536,    // L2
    1_048_576, // past the parallel threshold
];

fn configure_criterion() -> Criterion {
    Criterion::default()
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(3))
        .sample_size(50)
}

fn random_f32(len: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.random_range(-1000.0..1000.0)).collect()
}

fn slice_addition(c: &mut Criterion) {
    let mut group = c.benchmark_group("f32 slice add");
    for &size in SLICE_SIZES {
        let a = random_f32(size, 1);
        let b = random_f32(size, 2);
        let (na, nb) = (Array1::from_vec(a.clone()), Array1::from_vec(b.clone()));
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("ndarray", size), &size, |bench, _| {
            bench.iter(|| black_box(&na + &nb))
        });
        group.bench_with_input(BenchmarkId::new("scalar", size), &size, |bench, _| {
            bench.iter(|| black_box(a.as_slice().scalar_add(b.as_slice())))
        });
        group.bench_with_input(BenchmarkId::new("simd", size), &size, |bench, _| {
            bench.iter(|| black_box(a.as_slice().simd_add(b.as_slice())))
        });
        group.bench_with_input(BenchmarkId::new("parallel simd", size), &size, |bench, _| {
            bench.iter(|| black_box(a.as_slice().par_simd_add(b.as_slice())))
        });
    }
    group.finish();
}

fn slice_multiplication(c: &mut Criterion) {
    let mut group = c.benchmark_group("f64 slice mul");
    for &size in SLICE_SIZES {
        let a: Vec<f64> = random_f32(size, 3).into_iter().map(f64::from).collect();
        let b: Vec<f64> = random_f32(size, 4).into_iter().map(f64::from).collect();
        let (na, nb) = (Array1::from_vec(a.clone()), Array1::from_vec(b.clone()));
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("ndarray", size), &size, |bench, _| {
            bench.iter(|| black_box(&na * &nb))
        });
        group.bench_with_input(BenchmarkId::new("simd", size), &size, |bench, _| {
            bench.iter(|| black_box(a.as_slice().simd_mul(b.as_slice())))
        });
        group.bench_with_input(BenchmarkId::new("parallel simd", size), &size, |bench, _| {
            bench.iter(|| black_box(a.as_slice().par_simd_mul(b.as_slice())))
        });
    }
    group.finish();
}

/// Runs a dependent chain of fused multiply-adds and a masked reduction on one
/// vector shape, so the native, composite and emulated forms can be compared.
fn bench_shape<T: Resolve<N>, const N: usize>(c: &mut Criterion, a: T, b: T) {
    let x = SimdVec::<T, N>::splat(a);
    let y = SimdVec::<T, N>::splat(b);
    let id = format!("{} ({})", SimdVec::<T, N>::KEY, SimdVec::<T, N>::shape());
    c.bench_function(&id, |bench| {
        bench.iter(|| {
            let mut acc = black_box(x);
            for _ in 0..64 {
                acc = acc * y + x;
                acc = acc.min(y).max(x);
            }
            black_box(acc.hadd_masked(acc.cmp_gt(x)))
        })
    });
}

fn register_shapes(c: &mut Criterion) {
    bench_shape::<f32, 4>(c, 0.5, 1.5);
    bench_shape::<f32, 16>(c, 0.5, 1.5);
    bench_shape::<f32, 64>(c, 0.5, 1.5);
    bench_shape::<f64, 8>(c, 0.5, 1.5);
    bench_shape::<i32, 16>(c, 3, 7);
    bench_shape::<u8, 64>(c, 3, 7);
    bench_shape::<i64, 1>(c, 3, 7);
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets = slice_addition, slice_multiplication, register_shapes
}
criterion_main!(benches);
