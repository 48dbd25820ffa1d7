//! AVX-512F 512-bit float registers.
//!
//! `F32x16` wraps `__m512` and `F64x8` wraps `__m512d`. Comparisons produce
//! `__mmask16`/`__mmask8` directly, which is already the one-bit-per-lane encoding
//! masks use, so `select` is a single masked blend with no expansion step.
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: AVX-512F
//! - **Compiler**: nightly before the AVX-512 intrinsics were stabilised
//! - **Reciprocal**: `rcp` uses `vrcp14ps`/`vrcp14pd`, relative error below `2^-14`

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::capabilities::Isa;
use crate::simd::native::native_float_register;

native_float_register! {
    /// Sixteen `f32` lanes in one `__m512`.
    F32x16(__m512): f32, lanes: 16, isa: Isa::Avx512, bits: 512, kit: ps512
}

native_float_register! {
    /// Eight `f64` lanes in one `__m512d`.
    F64x8(__m512d): f64, lanes: 8, isa: Isa::Avx512, bits: 512, kit: pd512
}

mod ps512 {
    use super::*;

    #[inline(always)]
    pub unsafe fn splat(value: f32) -> __m512 {
        _mm512_set1_ps(value)
    }

    #[inline(always)]
    pub unsafe fn loadu(ptr: *const f32) -> __m512 {
        _mm512_loadu_ps(ptr)
    }

    #[inline(always)]
    pub unsafe fn load(ptr: *const f32) -> __m512 {
        _mm512_load_ps(ptr)
    }

    #[inline(always)]
    pub unsafe fn storeu(ptr: *mut f32, a: __m512) {
        _mm512_storeu_ps(ptr, a)
    }

    #[inline(always)]
    pub unsafe fn store(ptr: *mut f32, a: __m512) {
        _mm512_store_ps(ptr, a)
    }

    #[inline(always)]
    pub unsafe fn add(a: __m512, b: __m512) -> __m512 {
        _mm512_add_ps(a, b)
    }

    #[inline(always)]
    pub unsafe fn sub(a: __m512, b: __m512) -> __m512 {
        _mm512_sub_ps(a, b)
    }

    #[inline(always)]
    pub unsafe fn mul(a: __m512, b: __m512) -> __m512 {
        _mm512_mul_ps(a, b)
    }

    #[inline(always)]
    pub unsafe fn div(a: __m512, b: __m512) -> __m512 {
        _mm512_div_ps(a, b)
    }

    #[inline(always)]
    pub unsafe fn min(a: __m512, b: __m512) -> __m512 {
        _mm512_min_ps(a, b)
    }

    #[inline(always)]
    pub unsafe fn max(a: __m512, b: __m512) -> __m512 {
        _mm512_max_ps(a, b)
    }

    #[inline(always)]
    pub unsafe fn sqrt(a: __m512) -> __m512 {
        _mm512_sqrt_ps(a)
    }

    #[inline(always)]
    pub unsafe fn rcp(a: __m512) -> __m512 {
        _mm512_rcp14_ps(a)
    }

    #[inline(always)]
    pub unsafe fn floor(a: __m512) -> __m512 {
        _mm512_roundscale_ps(a, _MM_FROUND_TO_NEG_INF | _MM_FROUND_NO_EXC)
    }

    #[inline(always)]
    pub unsafe fn ceil(a: __m512) -> __m512 {
        _mm512_roundscale_ps(a, _MM_FROUND_TO_POS_INF | _MM_FROUND_NO_EXC)
    }

    #[inline(always)]
    pub unsafe fn round(a: __m512) -> __m512 {
        _mm512_roundscale_ps(a, _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC)
    }

    #[inline(always)]
    pub unsafe fn trunc(a: __m512) -> __m512 {
        _mm512_roundscale_ps(a, _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC)
    }

    #[inline(always)]
    pub unsafe fn abs(a: __m512) -> __m512 {
        _mm512_abs_ps(a)
    }

    #[inline(always)]
    pub unsafe fn neg(a: __m512) -> __m512 {
        let sign = _mm512_set1_epi32(i32::MIN);
        _mm512_castsi512_ps(_mm512_xor_si512(_mm512_castps_si512(a), sign))
    }

    #[cfg(fma)]
    #[inline(always)]
    pub unsafe fn fmadd(a: __m512, b: __m512, c: __m512) -> __m512 {
        _mm512_fmadd_ps(a, b, c)
    }

    #[cfg(not(fma))]
    #[inline(always)]
    pub unsafe fn fmadd(a: __m512, b: __m512, c: __m512) -> __m512 {
        _mm512_add_ps(_mm512_mul_ps(a, b), c)
    }

    #[inline(always)]
    pub unsafe fn cmp_eq(a: __m512, b: __m512) -> u64 {
        _mm512_cmp_ps_mask(a, b, _CMP_EQ_OQ) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_ne(a: __m512, b: __m512) -> u64 {
        _mm512_cmp_ps_mask(a, b, _CMP_NEQ_UQ) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_lt(a: __m512, b: __m512) -> u64 {
        _mm512_cmp_ps_mask(a, b, _CMP_LT_OQ) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_le(a: __m512, b: __m512) -> u64 {
        _mm512_cmp_ps_mask(a, b, _CMP_LE_OQ) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_gt(a: __m512, b: __m512) -> u64 {
        _mm512_cmp_ps_mask(a, b, _CMP_GT_OQ) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_ge(a: __m512, b: __m512) -> u64 {
        _mm512_cmp_ps_mask(a, b, _CMP_GE_OQ) as u64
    }

    #[inline(always)]
    pub unsafe fn select(bits: u64, on_true: __m512, on_false: __m512) -> __m512 {
        _mm512_mask_blend_ps(bits as __mmask16, on_false, on_true)
    }
}

mod pd512 {
    use super::*;

    #[inline(always)]
    pub unsafe fn splat(value: f64) -> __m512d {
        _mm512_set1_pd(value)
    }

    #[inline(always)]
    pub unsafe fn loadu(ptr: *const f64) -> __m512d {
        _mm512_loadu_pd(ptr)
    }

    #[inline(always)]
    pub unsafe fn load(ptr: *const f64) -> __m512d {
        _mm512_load_pd(ptr)
    }

    #[inline(always)]
    pub unsafe fn storeu(ptr: *mut f64, a: __m512d) {
        _mm512_storeu_pd(ptr, a)
    }

    #[inline(always)]
    pub unsafe fn store(ptr: *mut f64, a: __m512d) {
        _mm512_store_pd(ptr, a)
    }

    #[inline(always)]
    pub unsafe fn add(a: __m512d, b: __m512d) -> __m512d {
        _mm512_add_pd(a, b)
    }

    #[inline(always)]
    pub unsafe fn sub(a: __m512d, b: __m512d) -> __m512d {
        _mm512_sub_pd(a, b)
    }

    #[inline(always)]
    pub unsafe fn mul(a: __m512d, b: __m512d) -> __m512d {
        _mm512_mul_pd(a, b)
    }

    #[inline(always)]
    pub unsafe fn div(a: __m512d, b: __m512d) -> __m512d {
        _mm512_div_pd(a, b)
    }

    #[inline(always)]
    pub unsafe fn min(a: __m512d, b: __m512d) -> __m512d {
        _mm512_min_pd(a, b)
    }

    #[inline(always)]
    pub unsafe fn max(a: __m512d, b: __m512d) -> __m512d {
        _mm512_max_pd(a, b)
    }

    #[inline(always)]
    pub unsafe fn sqrt(a: __m512d) -> __m512d {
        _mm512_sqrt_pd(a)
    }

    #[inline(always)]
    pub unsafe fn rcp(a: __m512d) -> __m512d {
        _mm512_rcp14_pd(a)
    }

    #[inline(always)]
    pub unsafe fn floor(a: __m512d) -> __m512d {
        _mm512_roundscale_pd(a, _MM_FROUND_TO_NEG_INF | _MM_FROUND_NO_EXC)
    }

    #[inline(always)]
    pub unsafe fn ceil(a: __m512d) -> __m512d {
        _mm512_roundscale_pd(a, _MM_FROUND_TO_POS_INF | _MM_FROUND_NO_EXC)
    }

    #[inline(always)]
    pub unsafe fn round(a: __m512d) -> __m512d {
        _mm512_roundscale_pd(a, _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC)
    }

    #[inline(always)]
    pub unsafe fn trunc(a: __m512d) -> __m512d {
        _mm512_roundscale_pd(a, _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC)
    }

    #[inline(always)]
    pub unsafe fn abs(a: __m512d) -> __m512d {
        _mm512_abs_pd(a)
    }

    #[inline(always)]
    pub unsafe fn neg(a: __m512d) -> __m512d {
        let sign = _mm512_set1_epi64(i64::MIN);
        _mm512_castsi512_pd(_mm512_xor_si512(_mm512_castpd_si512(a), sign))
    }

    #[cfg(fma)]
    #[inline(always)]
    pub unsafe fn fmadd(a: __m512d, b: __m512d, c: __m512d) -> __m512d {
        _mm512_fmadd_pd(a, b, c)
    }

    #[cfg(not(fma))]
    #[inline(always)]
    pub unsafe fn fmadd(a: __m512d, b: __m512d, c: __m512d) -> __m512d {
        _mm512_add_pd(_mm512_mul_pd(a, b), c)
    }

    #[inline(always)]
    pub unsafe fn cmp_eq(a: __m512d, b: __m512d) -> u64 {
        _mm512_cmp_pd_mask(a, b, _CMP_EQ_OQ) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_ne(a: __m512d, b: __m512d) -> u64 {
        _mm512_cmp_pd_mask(a, b, _CMP_NEQ_UQ) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_lt(a: __m512d, b: __m512d) -> u64 {
        _mm512_cmp_pd_mask(a, b, _CMP_LT_OQ) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_le(a: __m512d, b: __m512d) -> u64 {
        _mm512_cmp_pd_mask(a, b, _CMP_LE_OQ) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_gt(a: __m512d, b: __m512d) -> u64 {
        _mm512_cmp_pd_mask(a, b, _CMP_GT_OQ) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_ge(a: __m512d, b: __m512d) -> u64 {
        _mm512_cmp_pd_mask(a, b, _CMP_GE_OQ) as u64
    }

    #[inline(always)]
    pub unsafe fn select(bits: u64, on_true: __m512d, on_false: __m512d) -> __m512d {
        _mm512_mask_blend_pd(bits as __mmask8, on_false, on_true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::register::{FloatRegister, LaneRegister};

    fn lanes<R: LaneRegister>(reg: R) -> Vec<R::Scalar> {
        reg.spill()[..R::LANES].to_vec()
    }

    #[test]
    fn test_f32x16_mask_blend() {
        let data: [f32; 16] = core::array::from_fn(|i| i as f32);
        let a = unsafe { F32x16::load_unaligned(data.as_ptr()) };
        let b = F32x16::splat(-1.0);

        let bits = a.cmp_ge(F32x16::splat(12.0));
        assert_eq!(bits, 0xF000);

        let picked = lanes(F32x16::select(bits, a, b));
        assert_eq!(picked[11], -1.0);
        assert_eq!(picked[12], 12.0);
    }

    #[test]
    fn test_f32x16_neg_keeps_signed_zero() {
        let a = F32x16::splat(0.0);
        assert!(lanes(a.neg())[0].is_sign_negative());
    }

    #[test]
    fn test_f64x8_rounding() {
        let data = [2.5f64, -2.5, 1.5, -1.5, 0.4, -0.6, 7.0, 1e300];
        let a = unsafe { F64x8::load_unaligned(data.as_ptr()) };
        assert_eq!(
            lanes(a.round()),
            vec![2.0, -2.0, 2.0, -2.0, 0.0, -1.0, 7.0, 1e300]
        );
        assert_eq!(lanes(a.floor())[1], -3.0);
        assert_eq!(lanes(a.ceil())[4], 1.0);
        assert_eq!(lanes(a.trunc())[5], -0.0);
    }
}
