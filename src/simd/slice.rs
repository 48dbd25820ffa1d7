//! Whole-buffer kernels over `f32` and `f64` slices.
//!
//! Each trait comes in three forms:
//!
//! | Method | Strategy |
//! |--------|----------|
//! | `simd_*` | sequential [`SimdVec`] blocks, scalar below [`SIMD_THRESHOLD`] |
//! | `par_simd_*` | SIMD blocks spread over the rayon pool above [`PARALLEL_SIMD_THRESHOLD`] |
//! | `scalar_*` | one element at a time, the reference for the other two |
//!
//! Slices are processed in blocks of 16 `f32` or 8 `f64` lanes (one 512-bit
//! vector, native or composite depending on the backend). The tail shorter than a
//! block is padded with zeros, computed as one more vector and written back
//! partially, so no element is ever processed by a different algorithm than its
//! neighbours.
//!
//! ```rust
//! use lanefold::simd::{SimdAdd, SimdSinCos};
//!
//! let a: Vec<f32> = (0..100).map(|i| i as f32).collect();
//! let b = vec![0.5f32; 100];
//! let sum = a.as_slice().simd_add(b.as_slice());
//! assert_eq!(sum[99], 99.5);
//!
//! let (s, c) = a.as_slice().simd_sincos();
//! assert!((s[3] - 3.0f32.sin()).abs() < 1e-6);
//! assert!((c[3] - 3.0f32.cos()).abs() < 1e-6);
//! ```

use rayon::prelude::*;

use crate::element::{Element, FloatElement};
use crate::{oracle, PARALLEL_CHUNK_SIZE, PARALLEL_SIMD_THRESHOLD, SIMD_THRESHOLD};

use super::register::FloatRegister;
use super::resolve::{Reg, Resolve};
use super::vector::SimdVec;

pub trait SimdAdd<Rhs = Self> {
    type Output;

    fn simd_add(self, rhs: Rhs) -> Self::Output;
    fn par_simd_add(self, rhs: Rhs) -> Self::Output;
    fn scalar_add(self, rhs: Rhs) -> Self::Output;
}

pub trait SimdMul<Rhs = Self> {
    type Output;

    fn simd_mul(self, rhs: Rhs) -> Self::Output;
    fn par_simd_mul(self, rhs: Rhs) -> Self::Output;
    fn scalar_mul(self, rhs: Rhs) -> Self::Output;
}

/// Sine and cosine of every element.
///
/// The scalar forms evaluate [`oracle::sincos`], the same reduction and
/// polynomials as the vector forms.
pub trait SimdSinCos {
    type Output;

    fn simd_sin(self) -> Self::Output;
    fn simd_cos(self) -> Self::Output;
    fn simd_sincos(self) -> (Self::Output, Self::Output);

    fn par_simd_sin(self) -> Self::Output;
    fn par_simd_cos(self) -> Self::Output;
    fn par_simd_sincos(self) -> (Self::Output, Self::Output);

    fn scalar_sin(self) -> Self::Output;
    fn scalar_cos(self) -> Self::Output;
    fn scalar_sincos(self) -> (Self::Output, Self::Output);
}

// ================================================================================================
// BLOCK LOOPS
// ================================================================================================

/// Number of elements handed to one rayon task, rounded down to whole blocks.
#[inline(always)]
fn parallel_chunk(lanes: usize) -> usize {
    ((PARALLEL_CHUNK_SIZE / lanes) * lanes).max(lanes)
}

#[inline(always)]
fn padded_tail<T: Resolve<N>, const N: usize>(tail: &[T]) -> SimdVec<T, N> {
    SimdVec::from_fn(|i| tail.get(i).copied().unwrap_or(T::ZERO))
}

fn map_blocks<T, const N: usize>(
    a: &[T],
    out: &mut [T],
    op: impl Fn(SimdVec<T, N>) -> SimdVec<T, N>,
) where
    T: Resolve<N>,
{
    let split = a.len() - a.len() % N;

    for (src, dst) in a[..split]
        .chunks_exact(N)
        .zip(out[..split].chunks_exact_mut(N))
    {
        // SAFETY: `chunks_exact` yields exactly N elements on both sides.
        unsafe { op(SimdVec::load_unchecked(src.as_ptr())).store_unchecked(dst.as_mut_ptr()) };
    }

    let tail = &a[split..];
    if !tail.is_empty() {
        let lanes = op(padded_tail::<T, N>(tail)).to_array();
        out[split..].copy_from_slice(&lanes[..tail.len()]);
    }
}

fn zip_blocks<T, const N: usize>(
    a: &[T],
    b: &[T],
    out: &mut [T],
    op: impl Fn(SimdVec<T, N>, SimdVec<T, N>) -> SimdVec<T, N>,
) where
    T: Resolve<N>,
{
    let split = a.len() - a.len() % N;

    for ((lhs, rhs), dst) in a[..split]
        .chunks_exact(N)
        .zip(b[..split].chunks_exact(N))
        .zip(out[..split].chunks_exact_mut(N))
    {
        // SAFETY: `chunks_exact` yields exactly N elements on every side.
        unsafe {
            let result = op(
                SimdVec::load_unchecked(lhs.as_ptr()),
                SimdVec::load_unchecked(rhs.as_ptr()),
            );
            result.store_unchecked(dst.as_mut_ptr());
        }
    }

    let (lhs, rhs) = (&a[split..], &b[split..]);
    if !lhs.is_empty() {
        let lanes = op(padded_tail::<T, N>(lhs), padded_tail::<T, N>(rhs)).to_array();
        out[split..].copy_from_slice(&lanes[..lhs.len()]);
    }
}

fn sincos_blocks<T, const N: usize>(a: &[T], sin_out: &mut [T], cos_out: &mut [T])
where
    T: FloatElement + Resolve<N>,
    Reg<T, N>: FloatRegister,
{
    let split = a.len() - a.len() % N;

    for ((src, s), c) in a[..split]
        .chunks_exact(N)
        .zip(sin_out[..split].chunks_exact_mut(N))
        .zip(cos_out[..split].chunks_exact_mut(N))
    {
        // SAFETY: `chunks_exact` yields exactly N elements on every side.
        unsafe {
            let (vs, vc) = SimdVec::<T, N>::load_unchecked(src.as_ptr()).sincos();
            vs.store_unchecked(s.as_mut_ptr());
            vc.store_unchecked(c.as_mut_ptr());
        }
    }

    let tail = &a[split..];
    if !tail.is_empty() {
        let (vs, vc) = padded_tail::<T, N>(tail).sincos();
        sin_out[split..].copy_from_slice(&vs.to_array()[..tail.len()]);
        cos_out[split..].copy_from_slice(&vc.to_array()[..tail.len()]);
    }
}

// ================================================================================================
// STRATEGIES
// ================================================================================================

#[inline(always)]
fn scalar_map<T: Element>(a: &[T], op: impl Fn(T) -> T) -> Vec<T> {
    a.iter().map(|&x| op(x)).collect()
}

#[inline(always)]
fn scalar_zip<T: Element>(a: &[T], b: &[T], op: fn(T, T) -> T) -> Vec<T> {
    assert_eq!(a.len(), b.len(), "Slices must be the same length");
    a.iter().zip(b).map(|(&x, &y)| op(x, y)).collect()
}

fn simd_map<T, const N: usize>(
    a: &[T],
    op: impl Fn(SimdVec<T, N>) -> SimdVec<T, N>,
    scalar: impl Fn(T) -> T,
) -> Vec<T>
where
    T: Resolve<N>,
{
    if a.len() < SIMD_THRESHOLD {
        return scalar_map(a, scalar);
    }
    let mut out = vec![T::ZERO; a.len()];
    map_blocks::<T, N>(a, &mut out, op);
    out
}

fn par_simd_map<T, const N: usize>(
    a: &[T],
    op: impl Fn(SimdVec<T, N>) -> SimdVec<T, N> + Sync,
    scalar: impl Fn(T) -> T,
) -> Vec<T>
where
    T: Resolve<N>,
{
    if a.len() <= PARALLEL_SIMD_THRESHOLD {
        return simd_map::<T, N>(a, op, scalar);
    }
    let chunk = parallel_chunk(N);
    let mut out = vec![T::ZERO; a.len()];
    out.par_chunks_mut(chunk)
        .zip(a.par_chunks(chunk))
        .for_each(|(dst, src)| map_blocks::<T, N>(src, dst, &op));
    out
}

fn simd_zip<T, const N: usize>(
    a: &[T],
    b: &[T],
    op: impl Fn(SimdVec<T, N>, SimdVec<T, N>) -> SimdVec<T, N>,
    scalar: fn(T, T) -> T,
) -> Vec<T>
where
    T: Resolve<N>,
{
    assert_eq!(a.len(), b.len(), "Slices must be the same length");
    if a.len() < SIMD_THRESHOLD {
        return scalar_zip(a, b, scalar);
    }
    let mut out = vec![T::ZERO; a.len()];
    zip_blocks::<T, N>(a, b, &mut out, op);
    out
}

fn par_simd_zip<T, const N: usize>(
    a: &[T],
    b: &[T],
    op: impl Fn(SimdVec<T, N>, SimdVec<T, N>) -> SimdVec<T, N> + Sync,
    scalar: fn(T, T) -> T,
) -> Vec<T>
where
    T: Resolve<N>,
{
    assert_eq!(a.len(), b.len(), "Slices must be the same length");
    if a.len() <= PARALLEL_SIMD_THRESHOLD {
        return simd_zip::<T, N>(a, b, op, scalar);
    }
    let chunk = parallel_chunk(N);
    let mut out = vec![T::ZERO; a.len()];
    out.par_chunks_mut(chunk)
        .zip(a.par_chunks(chunk).zip(b.par_chunks(chunk)))
        .for_each(|(dst, (lhs, rhs))| zip_blocks::<T, N>(lhs, rhs, dst, &op));
    out
}

fn scalar_sincos<T: FloatElement>(a: &[T]) -> (Vec<T>, Vec<T>) {
    a.iter().map(|&x| oracle::sincos(x)).unzip()
}

fn simd_sincos<T, const N: usize>(a: &[T]) -> (Vec<T>, Vec<T>)
where
    T: FloatElement + Resolve<N>,
    Reg<T, N>: FloatRegister,
{
    if a.len() < SIMD_THRESHOLD {
        return scalar_sincos(a);
    }
    let mut sin_out = vec![T::ZERO; a.len()];
    let mut cos_out = vec![T::ZERO; a.len()];
    sincos_blocks::<T, N>(a, &mut sin_out, &mut cos_out);
    (sin_out, cos_out)
}

fn par_simd_sincos<T, const N: usize>(a: &[T]) -> (Vec<T>, Vec<T>)
where
    T: FloatElement + Resolve<N>,
    Reg<T, N>: FloatRegister,
{
    if a.len() <= PARALLEL_SIMD_THRESHOLD {
        return simd_sincos::<T, N>(a);
    }
    let chunk = parallel_chunk(N);
    let mut sin_out = vec![T::ZERO; a.len()];
    let mut cos_out = vec![T::ZERO; a.len()];
    sin_out
        .par_chunks_mut(chunk)
        .zip(cos_out.par_chunks_mut(chunk))
        .zip(a.par_chunks(chunk))
        .for_each(|((s, c), src)| sincos_blocks::<T, N>(src, s, c));
    (sin_out, cos_out)
}

// ================================================================================================
// TRAIT IMPLEMENTATIONS
// ================================================================================================

macro_rules! slice_kernels {
    ($t:ty, $lanes:literal) => {
        impl<'b> SimdAdd<&'b [$t]> for &[$t] {
            type Output = Vec<$t>;

            /// # Panics
            ///
            /// Panics if the slices have different lengths.
            #[inline(always)]
            fn simd_add(self, rhs: &'b [$t]) -> Self::Output {
                simd_zip::<$t, $lanes>(self, rhs, |a, b| a + b, Element::lane_add)
            }

            #[inline(always)]
            fn par_simd_add(self, rhs: &'b [$t]) -> Self::Output {
                par_simd_zip::<$t, $lanes>(self, rhs, |a, b| a + b, Element::lane_add)
            }

            #[inline(always)]
            fn scalar_add(self, rhs: &'b [$t]) -> Self::Output {
                scalar_zip(self, rhs, Element::lane_add)
            }
        }

        impl<'b> SimdMul<&'b [$t]> for &[$t] {
            type Output = Vec<$t>;

            /// # Panics
            ///
            /// Panics if the slices have different lengths.
            #[inline(always)]
            fn simd_mul(self, rhs: &'b [$t]) -> Self::Output {
                simd_zip::<$t, $lanes>(self, rhs, |a, b| a * b, Element::lane_mul)
            }

            #[inline(always)]
            fn par_simd_mul(self, rhs: &'b [$t]) -> Self::Output {
                par_simd_zip::<$t, $lanes>(self, rhs, |a, b| a * b, Element::lane_mul)
            }

            #[inline(always)]
            fn scalar_mul(self, rhs: &'b [$t]) -> Self::Output {
                scalar_zip(self, rhs, Element::lane_mul)
            }
        }

        impl SimdSinCos for &[$t] {
            type Output = Vec<$t>;

            #[inline(always)]
            fn simd_sin(self) -> Self::Output {
                simd_map::<$t, $lanes>(self, |v| v.sin(), |x| oracle::sincos(x).0)
            }

            #[inline(always)]
            fn simd_cos(self) -> Self::Output {
                simd_map::<$t, $lanes>(self, |v| v.cos(), |x| oracle::sincos(x).1)
            }

            #[inline(always)]
            fn simd_sincos(self) -> (Self::Output, Self::Output) {
                simd_sincos::<$t, $lanes>(self)
            }

            #[inline(always)]
            fn par_simd_sin(self) -> Self::Output {
                par_simd_map::<$t, $lanes>(self, |v| v.sin(), |x| oracle::sincos(x).0)
            }

            #[inline(always)]
            fn par_simd_cos(self) -> Self::Output {
                par_simd_map::<$t, $lanes>(self, |v| v.cos(), |x| oracle::sincos(x).1)
            }

            #[inline(always)]
            fn par_simd_sincos(self) -> (Self::Output, Self::Output) {
                par_simd_sincos::<$t, $lanes>(self)
            }

            #[inline(always)]
            fn scalar_sin(self) -> Self::Output {
                scalar_map(self, |x| oracle::sincos(x).0)
            }

            #[inline(always)]
            fn scalar_cos(self) -> Self::Output {
                scalar_map(self, |x| oracle::sincos(x).1)
            }

            #[inline(always)]
            fn scalar_sincos(self) -> (Self::Output, Self::Output) {
                scalar_sincos(self)
            }
        }

        impl SimdAdd<Vec<$t>> for Vec<$t> {
            type Output = Vec<$t>;

            #[inline(always)]
            fn simd_add(self, rhs: Vec<$t>) -> Self::Output {
                self.as_slice().simd_add(rhs.as_slice())
            }

            #[inline(always)]
            fn par_simd_add(self, rhs: Vec<$t>) -> Self::Output {
                self.as_slice().par_simd_add(rhs.as_slice())
            }

            #[inline(always)]
            fn scalar_add(self, rhs: Vec<$t>) -> Self::Output {
                self.as_slice().scalar_add(rhs.as_slice())
            }
        }

        impl<'b> SimdAdd<&'b [$t]> for Vec<$t> {
            type Output = Vec<$t>;

            #[inline(always)]
            fn simd_add(self, rhs: &'b [$t]) -> Self::Output {
                self.as_slice().simd_add(rhs)
            }

            #[inline(always)]
            fn par_simd_add(self, rhs: &'b [$t]) -> Self::Output {
                self.as_slice().par_simd_add(rhs)
            }

            #[inline(always)]
            fn scalar_add(self, rhs: &'b [$t]) -> Self::Output {
                self.as_slice().scalar_add(rhs)
            }
        }

        impl SimdMul<Vec<$t>> for Vec<$t> {
            type Output = Vec<$t>;

            #[inline(always)]
            fn simd_mul(self, rhs: Vec<$t>) -> Self::Output {
                self.as_slice().simd_mul(rhs.as_slice())
            }

            #[inline(always)]
            fn par_simd_mul(self, rhs: Vec<$t>) -> Self::Output {
                self.as_slice().par_simd_mul(rhs.as_slice())
            }

            #[inline(always)]
            fn scalar_mul(self, rhs: Vec<$t>) -> Self::Output {
                self.as_slice().scalar_mul(rhs.as_slice())
            }
        }

        impl SimdSinCos for Vec<$t> {
            type Output = Vec<$t>;

            #[inline(always)]
            fn simd_sin(self) -> Self::Output {
                self.as_slice().simd_sin()
            }

            #[inline(always)]
            fn simd_cos(self) -> Self::Output {
                self.as_slice().simd_cos()
            }

            #[inline(always)]
            fn simd_sincos(self) -> (Self::Output, Self::Output) {
                self.as_slice().simd_sincos()
            }

            #[inline(always)]
            fn par_simd_sin(self) -> Self::Output {
                self.as_slice().par_simd_sin()
            }

            #[inline(always)]
            fn par_simd_cos(self) -> Self::Output {
                self.as_slice().par_simd_cos()
            }

            #[inline(always)]
            fn par_simd_sincos(self) -> (Self::Output, Self::Output) {
                self.as_slice().par_simd_sincos()
            }

            #[inline(always)]
            fn scalar_sin(self) -> Self::Output {
                self.as_slice().scalar_sin()
            }

            #[inline(always)]
            fn scalar_cos(self) -> Self::Output {
                self.as_slice().scalar_cos()
            }

            #[inline(always)]
            fn scalar_sincos(self) -> (Self::Output, Self::Output) {
                self.as_slice().scalar_sincos()
            }
        }
    };
}

slice_kernels!(f32, 16);
slice_kernels!(f64, 8);
