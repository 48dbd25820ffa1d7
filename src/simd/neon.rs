//! AArch64 Advanced SIMD float registers.
//!
//! `F32x4` wraps `float32x4_t` and `F64x2` wraps `float64x2_t`. NEON `vmin`/`vmax`
//! propagate NaN, so `min`/`max` are built from a compare and a bit select to keep
//! the `a < b ? a : b` lane rule shared with every other backend.
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: AArch64 with Advanced SIMD (always present)
//! - **Memory Alignment**: 16 bytes for aligned loads and stores
//! - **Reciprocal**: `F32x4::rcp` is `vrecpe` refined by one Newton-Raphson step,
//!   relative error below `2^-14`

use std::arch::aarch64::*;

use crate::capabilities::Isa;
use crate::simd::native::native_float_register;

native_float_register! {
    /// Four `f32` lanes in one `float32x4_t`.
    F32x4(float32x4_t): f32, lanes: 4, isa: Isa::Neon, bits: 128, kit: f32q
}

native_float_register! {
    /// Two `f64` lanes in one `float64x2_t`.
    F64x2(float64x2_t): f64, lanes: 2, isa: Isa::Neon, bits: 128, kit: f64q
}

mod f32q {
    use super::*;

    const WEIGHTS: [u32; 4] = [1, 2, 4, 8];

    #[inline(always)]
    unsafe fn movemask(m: uint32x4_t) -> u64 {
        vaddvq_u32(vandq_u32(m, vld1q_u32(WEIGHTS.as_ptr()))) as u64
    }

    /// Expands a lane bit set into all-ones/all-zeros 32-bit lanes.
    #[inline(always)]
    pub unsafe fn expand_mask(bits: u64) -> uint32x4_t {
        vtstq_u32(vdupq_n_u32(bits as u32), vld1q_u32(WEIGHTS.as_ptr()))
    }

    #[inline(always)]
    pub unsafe fn splat(value: f32) -> float32x4_t {
        vdupq_n_f32(value)
    }

    #[inline(always)]
    pub unsafe fn loadu(ptr: *const f32) -> float32x4_t {
        vld1q_f32(ptr)
    }

    #[inline(always)]
    pub unsafe fn load(ptr: *const f32) -> float32x4_t {
        vld1q_f32(ptr)
    }

    #[inline(always)]
    pub unsafe fn storeu(ptr: *mut f32, a: float32x4_t) {
        vst1q_f32(ptr, a)
    }

    #[inline(always)]
    pub unsafe fn store(ptr: *mut f32, a: float32x4_t) {
        vst1q_f32(ptr, a)
    }

    #[inline(always)]
    pub unsafe fn add(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        vaddq_f32(a, b)
    }

    #[inline(always)]
    pub unsafe fn sub(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        vsubq_f32(a, b)
    }

    #[inline(always)]
    pub unsafe fn mul(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        vmulq_f32(a, b)
    }

    #[inline(always)]
    pub unsafe fn div(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        vdivq_f32(a, b)
    }

    #[inline(always)]
    pub unsafe fn min(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        vbslq_f32(vcltq_f32(a, b), a, b)
    }

    #[inline(always)]
    pub unsafe fn max(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        vbslq_f32(vcgtq_f32(a, b), a, b)
    }

    #[inline(always)]
    pub unsafe fn sqrt(a: float32x4_t) -> float32x4_t {
        vsqrtq_f32(a)
    }

    #[inline(always)]
    pub unsafe fn rcp(a: float32x4_t) -> float32x4_t {
        let estimate = vrecpeq_f32(a);
        vmulq_f32(vrecpsq_f32(a, estimate), estimate)
    }

    #[inline(always)]
    pub unsafe fn floor(a: float32x4_t) -> float32x4_t {
        vrndmq_f32(a)
    }

    #[inline(always)]
    pub unsafe fn ceil(a: float32x4_t) -> float32x4_t {
        vrndpq_f32(a)
    }

    #[inline(always)]
    pub unsafe fn round(a: float32x4_t) -> float32x4_t {
        vrndnq_f32(a)
    }

    #[inline(always)]
    pub unsafe fn trunc(a: float32x4_t) -> float32x4_t {
        vrndq_f32(a)
    }

    #[inline(always)]
    pub unsafe fn abs(a: float32x4_t) -> float32x4_t {
        vabsq_f32(a)
    }

    #[inline(always)]
    pub unsafe fn neg(a: float32x4_t) -> float32x4_t {
        vnegq_f32(a)
    }

    #[cfg(fma)]
    #[inline(always)]
    pub unsafe fn fmadd(a: float32x4_t, b: float32x4_t, c: float32x4_t) -> float32x4_t {
        vfmaq_f32(c, a, b)
    }

    #[cfg(not(fma))]
    #[inline(always)]
    pub unsafe fn fmadd(a: float32x4_t, b: float32x4_t, c: float32x4_t) -> float32x4_t {
        vaddq_f32(vmulq_f32(a, b), c)
    }

    #[inline(always)]
    pub unsafe fn cmp_eq(a: float32x4_t, b: float32x4_t) -> u64 {
        movemask(vceqq_f32(a, b))
    }

    #[inline(always)]
    pub unsafe fn cmp_ne(a: float32x4_t, b: float32x4_t) -> u64 {
        movemask(vmvnq_u32(vceqq_f32(a, b)))
    }

    #[inline(always)]
    pub unsafe fn cmp_lt(a: float32x4_t, b: float32x4_t) -> u64 {
        movemask(vcltq_f32(a, b))
    }

    #[inline(always)]
    pub unsafe fn cmp_le(a: float32x4_t, b: float32x4_t) -> u64 {
        movemask(vcleq_f32(a, b))
    }

    #[inline(always)]
    pub unsafe fn cmp_gt(a: float32x4_t, b: float32x4_t) -> u64 {
        movemask(vcgtq_f32(a, b))
    }

    #[inline(always)]
    pub unsafe fn cmp_ge(a: float32x4_t, b: float32x4_t) -> u64 {
        movemask(vcgeq_f32(a, b))
    }

    #[inline(always)]
    pub unsafe fn select(bits: u64, on_true: float32x4_t, on_false: float32x4_t) -> float32x4_t {
        vbslq_f32(expand_mask(bits), on_true, on_false)
    }
}

mod f64q {
    use super::*;

    const WEIGHTS: [u64; 2] = [1, 2];

    #[inline(always)]
    unsafe fn movemask(m: uint64x2_t) -> u64 {
        vaddvq_u64(vandq_u64(m, vld1q_u64(WEIGHTS.as_ptr())))
    }

    /// Expands a lane bit set into all-ones/all-zeros 64-bit lanes.
    #[inline(always)]
    pub unsafe fn expand_mask(bits: u64) -> uint64x2_t {
        vtstq_u64(vdupq_n_u64(bits), vld1q_u64(WEIGHTS.as_ptr()))
    }

    #[inline(always)]
    pub unsafe fn splat(value: f64) -> float64x2_t {
        vdupq_n_f64(value)
    }

    #[inline(always)]
    pub unsafe fn loadu(ptr: *const f64) -> float64x2_t {
        vld1q_f64(ptr)
    }

    #[inline(always)]
    pub unsafe fn load(ptr: *const f64) -> float64x2_t {
        vld1q_f64(ptr)
    }

    #[inline(always)]
    pub unsafe fn storeu(ptr: *mut f64, a: float64x2_t) {
        vst1q_f64(ptr, a)
    }

    #[inline(always)]
    pub unsafe fn store(ptr: *mut f64, a: float64x2_t) {
        vst1q_f64(ptr, a)
    }

    #[inline(always)]
    pub unsafe fn add(a: float64x2_t, b: float64x2_t) -> float64x2_t {
        vaddq_f64(a, b)
    }

    #[inline(always)]
    pub unsafe fn sub(a: float64x2_t, b: float64x2_t) -> float64x2_t {
        vsubq_f64(a, b)
    }

    #[inline(always)]
    pub unsafe fn mul(a: float64x2_t, b: float64x2_t) -> float64x2_t {
        vmulq_f64(a, b)
    }

    #[inline(always)]
    pub unsafe fn div(a: float64x2_t, b: float64x2_t) -> float64x2_t {
        vdivq_f64(a, b)
    }

    #[inline(always)]
    pub unsafe fn min(a: float64x2_t, b: float64x2_t) -> float64x2_t {
        vbslq_f64(vcltq_f64(a, b), a, b)
    }

    #[inline(always)]
    pub unsafe fn max(a: float64x2_t, b: float64x2_t) -> float64x2_t {
        vbslq_f64(vcgtq_f64(a, b), a, b)
    }

    #[inline(always)]
    pub unsafe fn sqrt(a: float64x2_t) -> float64x2_t {
        vsqrtq_f64(a)
    }

    #[inline(always)]
    pub unsafe fn rcp(a: float64x2_t) -> float64x2_t {
        vdivq_f64(vdupq_n_f64(1.0), a)
    }

    #[inline(always)]
    pub unsafe fn floor(a: float64x2_t) -> float64x2_t {
        vrndmq_f64(a)
    }

    #[inline(always)]
    pub unsafe fn ceil(a: float64x2_t) -> float64x2_t {
        vrndpq_f64(a)
    }

    #[inline(always)]
    pub unsafe fn round(a: float64x2_t) -> float64x2_t {
        vrndnq_f64(a)
    }

    #[inline(always)]
    pub unsafe fn trunc(a: float64x2_t) -> float64x2_t {
        vrndq_f64(a)
    }

    #[inline(always)]
    pub unsafe fn abs(a: float64x2_t) -> float64x2_t {
        vabsq_f64(a)
    }

    #[inline(always)]
    pub unsafe fn neg(a: float64x2_t) -> float64x2_t {
        vnegq_f64(a)
    }

    #[cfg(fma)]
    #[inline(always)]
    pub unsafe fn fmadd(a: float64x2_t, b: float64x2_t, c: float64x2_t) -> float64x2_t {
        vfmaq_f64(c, a, b)
    }

    #[cfg(not(fma))]
    #[inline(always)]
    pub unsafe fn fmadd(a: float64x2_t, b: float64x2_t, c: float64x2_t) -> float64x2_t {
        vaddq_f64(vmulq_f64(a, b), c)
    }

    #[inline(always)]
    pub unsafe fn cmp_eq(a: float64x2_t, b: float64x2_t) -> u64 {
        movemask(vceqq_f64(a, b))
    }

    #[inline(always)]
    pub unsafe fn cmp_ne(a: float64x2_t, b: float64x2_t) -> u64 {
        !cmp_eq(a, b) & 0b11
    }

    #[inline(always)]
    pub unsafe fn cmp_lt(a: float64x2_t, b: float64x2_t) -> u64 {
        movemask(vcltq_f64(a, b))
    }

    #[inline(always)]
    pub unsafe fn cmp_le(a: float64x2_t, b: float64x2_t) -> u64 {
        movemask(vcleq_f64(a, b))
    }

    #[inline(always)]
    pub unsafe fn cmp_gt(a: float64x2_t, b: float64x2_t) -> u64 {
        movemask(vcgtq_f64(a, b))
    }

    #[inline(always)]
    pub unsafe fn cmp_ge(a: float64x2_t, b: float64x2_t) -> u64 {
        movemask(vcgeq_f64(a, b))
    }

    #[inline(always)]
    pub unsafe fn select(bits: u64, on_true: float64x2_t, on_false: float64x2_t) -> float64x2_t {
        vbslq_f64(expand_mask(bits), on_true, on_false)
    }
}
