//! SSE4.1 128-bit float registers.
//!
//! `F32x4` wraps `__m128` and `F64x2` wraps `__m128d`. Both are native on every
//! x86 backend; AVX2 and AVX-512 builds use them as the leaves of narrow vectors.
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: SSE4.1 (`blendv`, `round`, `cmpeq_epi64`)
//! - **Memory Alignment**: 16 bytes for aligned loads and stores
//! - **Reciprocal**: `F32x4::rcp` uses `rcpps`, relative error at most `1.5 * 2^-12`

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::capabilities::Isa;
use crate::simd::native::native_float_register;

native_float_register! {
    /// Four `f32` lanes in one `__m128`.
    F32x4(__m128): f32, lanes: 4, isa: Isa::Sse, bits: 128, kit: ps128
}

native_float_register! {
    /// Two `f64` lanes in one `__m128d`.
    F64x2(__m128d): f64, lanes: 2, isa: Isa::Sse, bits: 128, kit: pd128
}

mod ps128 {
    use super::*;

    #[inline(always)]
    pub unsafe fn splat(value: f32) -> __m128 {
        _mm_set1_ps(value)
    }

    #[inline(always)]
    pub unsafe fn loadu(ptr: *const f32) -> __m128 {
        _mm_loadu_ps(ptr)
    }

    #[inline(always)]
    pub unsafe fn load(ptr: *const f32) -> __m128 {
        _mm_load_ps(ptr)
    }

    #[inline(always)]
    pub unsafe fn storeu(ptr: *mut f32, a: __m128) {
        _mm_storeu_ps(ptr, a)
    }

    #[inline(always)]
    pub unsafe fn store(ptr: *mut f32, a: __m128) {
        _mm_store_ps(ptr, a)
    }

    #[inline(always)]
    pub unsafe fn add(a: __m128, b: __m128) -> __m128 {
        _mm_add_ps(a, b)
    }

    #[inline(always)]
    pub unsafe fn sub(a: __m128, b: __m128) -> __m128 {
        _mm_sub_ps(a, b)
    }

    #[inline(always)]
    pub unsafe fn mul(a: __m128, b: __m128) -> __m128 {
        _mm_mul_ps(a, b)
    }

    #[inline(always)]
    pub unsafe fn div(a: __m128, b: __m128) -> __m128 {
        _mm_div_ps(a, b)
    }

    #[inline(always)]
    pub unsafe fn min(a: __m128, b: __m128) -> __m128 {
        _mm_min_ps(a, b)
    }

    #[inline(always)]
    pub unsafe fn max(a: __m128, b: __m128) -> __m128 {
        _mm_max_ps(a, b)
    }

    #[inline(always)]
    pub unsafe fn sqrt(a: __m128) -> __m128 {
        _mm_sqrt_ps(a)
    }

    #[inline(always)]
    pub unsafe fn rcp(a: __m128) -> __m128 {
        _mm_rcp_ps(a)
    }

    #[inline(always)]
    pub unsafe fn floor(a: __m128) -> __m128 {
        _mm_floor_ps(a)
    }

    #[inline(always)]
    pub unsafe fn ceil(a: __m128) -> __m128 {
        _mm_ceil_ps(a)
    }

    #[inline(always)]
    pub unsafe fn round(a: __m128) -> __m128 {
        _mm_round_ps(a, _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC)
    }

    #[inline(always)]
    pub unsafe fn trunc(a: __m128) -> __m128 {
        _mm_round_ps(a, _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC)
    }

    #[inline(always)]
    pub unsafe fn abs(a: __m128) -> __m128 {
        _mm_andnot_ps(_mm_set1_ps(-0.0), a)
    }

    #[inline(always)]
    pub unsafe fn neg(a: __m128) -> __m128 {
        _mm_xor_ps(a, _mm_set1_ps(-0.0))
    }

    #[cfg(fma)]
    #[inline(always)]
    pub unsafe fn fmadd(a: __m128, b: __m128, c: __m128) -> __m128 {
        _mm_fmadd_ps(a, b, c)
    }

    #[cfg(not(fma))]
    #[inline(always)]
    pub unsafe fn fmadd(a: __m128, b: __m128, c: __m128) -> __m128 {
        _mm_add_ps(_mm_mul_ps(a, b), c)
    }

    #[inline(always)]
    pub unsafe fn cmp_eq(a: __m128, b: __m128) -> u64 {
        _mm_movemask_ps(_mm_cmpeq_ps(a, b)) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_ne(a: __m128, b: __m128) -> u64 {
        _mm_movemask_ps(_mm_cmpneq_ps(a, b)) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_lt(a: __m128, b: __m128) -> u64 {
        _mm_movemask_ps(_mm_cmplt_ps(a, b)) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_le(a: __m128, b: __m128) -> u64 {
        _mm_movemask_ps(_mm_cmple_ps(a, b)) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_gt(a: __m128, b: __m128) -> u64 {
        _mm_movemask_ps(_mm_cmpgt_ps(a, b)) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_ge(a: __m128, b: __m128) -> u64 {
        _mm_movemask_ps(_mm_cmpge_ps(a, b)) as u64
    }

    /// Expands a lane bit set into all-ones/all-zeros `f32` lanes.
    #[inline(always)]
    pub unsafe fn expand_mask(bits: u64) -> __m128 {
        let weights = _mm_setr_epi32(1, 2, 4, 8);
        let picked = _mm_and_si128(_mm_set1_epi32(bits as i32), weights);
        _mm_castsi128_ps(_mm_cmpeq_epi32(picked, weights))
    }

    #[inline(always)]
    pub unsafe fn select(bits: u64, on_true: __m128, on_false: __m128) -> __m128 {
        _mm_blendv_ps(on_false, on_true, expand_mask(bits))
    }
}

mod pd128 {
    use super::*;

    #[inline(always)]
    pub unsafe fn splat(value: f64) -> __m128d {
        _mm_set1_pd(value)
    }

    #[inline(always)]
    pub unsafe fn loadu(ptr: *const f64) -> __m128d {
        _mm_loadu_pd(ptr)
    }

    #[inline(always)]
    pub unsafe fn load(ptr: *const f64) -> __m128d {
        _mm_load_pd(ptr)
    }

    #[inline(always)]
    pub unsafe fn storeu(ptr: *mut f64, a: __m128d) {
        _mm_storeu_pd(ptr, a)
    }

    #[inline(always)]
    pub unsafe fn store(ptr: *mut f64, a: __m128d) {
        _mm_store_pd(ptr, a)
    }

    #[inline(always)]
    pub unsafe fn add(a: __m128d, b: __m128d) -> __m128d {
        _mm_add_pd(a, b)
    }

    #[inline(always)]
    pub unsafe fn sub(a: __m128d, b: __m128d) -> __m128d {
        _mm_sub_pd(a, b)
    }

    #[inline(always)]
    pub unsafe fn mul(a: __m128d, b: __m128d) -> __m128d {
        _mm_mul_pd(a, b)
    }

    #[inline(always)]
    pub unsafe fn div(a: __m128d, b: __m128d) -> __m128d {
        _mm_div_pd(a, b)
    }

    #[inline(always)]
    pub unsafe fn min(a: __m128d, b: __m128d) -> __m128d {
        _mm_min_pd(a, b)
    }

    #[inline(always)]
    pub unsafe fn max(a: __m128d, b: __m128d) -> __m128d {
        _mm_max_pd(a, b)
    }

    #[inline(always)]
    pub unsafe fn sqrt(a: __m128d) -> __m128d {
        _mm_sqrt_pd(a)
    }

    /// No double-precision estimate exists below AVX-512; this divides exactly.
    #[inline(always)]
    pub unsafe fn rcp(a: __m128d) -> __m128d {
        _mm_div_pd(_mm_set1_pd(1.0), a)
    }

    #[inline(always)]
    pub unsafe fn floor(a: __m128d) -> __m128d {
        _mm_floor_pd(a)
    }

    #[inline(always)]
    pub unsafe fn ceil(a: __m128d) -> __m128d {
        _mm_ceil_pd(a)
    }

    #[inline(always)]
    pub unsafe fn round(a: __m128d) -> __m128d {
        _mm_round_pd(a, _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC)
    }

    #[inline(always)]
    pub unsafe fn trunc(a: __m128d) -> __m128d {
        _mm_round_pd(a, _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC)
    }

    #[inline(always)]
    pub unsafe fn abs(a: __m128d) -> __m128d {
        _mm_andnot_pd(_mm_set1_pd(-0.0), a)
    }

    #[inline(always)]
    pub unsafe fn neg(a: __m128d) -> __m128d {
        _mm_xor_pd(a, _mm_set1_pd(-0.0))
    }

    #[cfg(fma)]
    #[inline(always)]
    pub unsafe fn fmadd(a: __m128d, b: __m128d, c: __m128d) -> __m128d {
        _mm_fmadd_pd(a, b, c)
    }

    #[cfg(not(fma))]
    #[inline(always)]
    pub unsafe fn fmadd(a: __m128d, b: __m128d, c: __m128d) -> __m128d {
        _mm_add_pd(_mm_mul_pd(a, b), c)
    }

    #[inline(always)]
    pub unsafe fn cmp_eq(a: __m128d, b: __m128d) -> u64 {
        _mm_movemask_pd(_mm_cmpeq_pd(a, b)) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_ne(a: __m128d, b: __m128d) -> u64 {
        _mm_movemask_pd(_mm_cmpneq_pd(a, b)) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_lt(a: __m128d, b: __m128d) -> u64 {
        _mm_movemask_pd(_mm_cmplt_pd(a, b)) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_le(a: __m128d, b: __m128d) -> u64 {
        _mm_movemask_pd(_mm_cmple_pd(a, b)) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_gt(a: __m128d, b: __m128d) -> u64 {
        _mm_movemask_pd(_mm_cmpgt_pd(a, b)) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_ge(a: __m128d, b: __m128d) -> u64 {
        _mm_movemask_pd(_mm_cmpge_pd(a, b)) as u64
    }

    /// Expands a lane bit set into all-ones/all-zeros `f64` lanes.
    #[inline(always)]
    pub unsafe fn expand_mask(bits: u64) -> __m128d {
        let weights = _mm_set_epi64x(2, 1);
        let picked = _mm_and_si128(_mm_set1_epi64x(bits as i64), weights);
        _mm_castsi128_pd(_mm_cmpeq_epi64(picked, weights))
    }

    #[inline(always)]
    pub unsafe fn select(bits: u64, on_true: __m128d, on_false: __m128d) -> __m128d {
        _mm_blendv_pd(on_false, on_true, expand_mask(bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::register::{FloatRegister, LaneRegister};

    fn lanes4(reg: F32x4) -> [f32; 4] {
        let mut out = [0.0; 4];
        unsafe { reg.store_unaligned(out.as_mut_ptr()) };
        out
    }

    fn lanes2(reg: F64x2) -> [f64; 2] {
        let mut out = [0.0; 2];
        unsafe { reg.store_unaligned(out.as_mut_ptr()) };
        out
    }

    mod f32x4_tests {
        use super::*;

        #[test]
        fn test_arithmetic() {
            let a = unsafe { F32x4::load_unaligned([1.0f32, 2.0, 3.0, 4.0].as_ptr()) };
            let b = F32x4::splat(10.0);

            assert_eq!(lanes4(a.add(b)), [11.0, 12.0, 13.0, 14.0]);
            assert_eq!(lanes4(b.sub(a)), [9.0, 8.0, 7.0, 6.0]);
            assert_eq!(lanes4(a.mul(a)), [1.0, 4.0, 9.0, 16.0]);
            assert_eq!(lanes4(a.neg().abs()), [1.0, 2.0, 3.0, 4.0]);
        }

        #[test]
        fn test_select_expands_every_lane() {
            let a = F32x4::splat(1.0);
            let b = F32x4::splat(2.0);
            for bits in 0..16u64 {
                let expected: [f32; 4] =
                    core::array::from_fn(|i| if (bits >> i) & 1 == 1 { 1.0 } else { 2.0 });
                assert_eq!(lanes4(F32x4::select(bits, a, b)), expected);
            }
        }

        #[test]
        fn test_rounding_modes() {
            let a = unsafe { F32x4::load_unaligned([2.5f32, -2.5, 1.5, -0.7].as_ptr()) };
            assert_eq!(lanes4(a.round()), [2.0, -2.0, 2.0, -1.0]);
            assert_eq!(lanes4(a.trunc()), [2.0, -2.0, 1.0, -0.0]);
            assert_eq!(lanes4(a.floor()), [2.0, -3.0, 1.0, -1.0]);
            assert_eq!(lanes4(a.ceil()), [3.0, -2.0, 2.0, -0.0]);
        }

        #[test]
        fn test_rcp_error_bound() {
            let a = unsafe { F32x4::load_unaligned([1.0f32, 3.0, -7.5, 1234.5].as_ptr()) };
            let approx = lanes4(a.rcp());
            for (x, r) in [1.0f32, 3.0, -7.5, 1234.5].iter().zip(approx) {
                let exact = 1.0 / x;
                assert!(((r - exact) / exact).abs() <= 1.5 * 2f32.powi(-12));
            }
        }

        #[test]
        fn test_nan_compares_like_scalars() {
            let a = unsafe { F32x4::load_unaligned([f32::NAN, 1.0, 2.0, 3.0].as_ptr()) };
            let b = F32x4::splat(2.0);
            assert_eq!(a.cmp_eq(b), 0b0100);
            assert_eq!(a.cmp_ne(b), 0b1011);
            assert_eq!(a.cmp_le(b), 0b0110);
            assert_eq!(lanes4(a.min(b))[0], 2.0);
        }
    }

    mod f64x2_tests {
        use super::*;

        #[test]
        fn test_select_and_compare() {
            let a = unsafe { F64x2::load_unaligned([1.0f64, 5.0].as_ptr()) };
            let b = F64x2::splat(3.0);

            assert_eq!(a.cmp_lt(b), 0b01);
            assert_eq!(a.cmp_gt(b), 0b10);
            assert_eq!(lanes2(F64x2::select(0b10, a, b)), [3.0, 5.0]);
            assert_eq!(lanes2(F64x2::select(0b01, a, b)), [1.0, 3.0]);
        }

        #[test]
        fn test_exact_reciprocal() {
            let a = unsafe { F64x2::load_unaligned([4.0f64, -0.5].as_ptr()) };
            assert_eq!(lanes2(a.rcp()), [0.25, -2.0]);
            assert_eq!(a.reduce_add(), 3.5);
        }
    }
}
