//! AVX/AVX2 256-bit float registers and 32-bit integer registers.
//!
//! Float leaves: `F32x8` (`__m256`) and `F64x4` (`__m256d`).
//! Integer leaves: `I32x4`/`U32x4` (`__m128i`) and `I32x8`/`U32x8` (`__m256i`).
//! The 128-bit integer leaves live here rather than with SSE because variable
//! per-lane shifts (`vpsllvd` and friends) are AVX2 instructions.
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: AVX2 (Haswell and later)
//! - **Memory Alignment**: 32 bytes for 256-bit registers, 16 for 128-bit ones
//! - **Reciprocal**: `F32x8::rcp` uses `vrcpps`, relative error at most `1.5 * 2^-12`

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::capabilities::Isa;
use crate::simd::native::{native_float_register, native_int_register};

native_float_register! {
    /// Eight `f32` lanes in one `__m256`.
    F32x8(__m256): f32, lanes: 8, isa: Isa::Avx2, bits: 256, kit: ps256
}

native_float_register! {
    /// Four `f64` lanes in one `__m256d`.
    F64x4(__m256d): f64, lanes: 4, isa: Isa::Avx2, bits: 256, kit: pd256
}

native_int_register! {
    /// Four `i32` lanes in one `__m128i`.
    I32x4(__m128i): i32, lanes: 4, isa: Isa::Avx2, bits: 128, kit: epi32x4, sign: signed
}

native_int_register! {
    /// Four `u32` lanes in one `__m128i`.
    U32x4(__m128i): u32, lanes: 4, isa: Isa::Avx2, bits: 128, kit: epi32x4, sign: unsigned
}

native_int_register! {
    /// Eight `i32` lanes in one `__m256i`.
    I32x8(__m256i): i32, lanes: 8, isa: Isa::Avx2, bits: 256, kit: epi32x8, sign: signed
}

native_int_register! {
    /// Eight `u32` lanes in one `__m256i`.
    U32x8(__m256i): u32, lanes: 8, isa: Isa::Avx2, bits: 256, kit: epi32x8, sign: unsigned
}

mod ps256 {
    use super::*;

    #[inline(always)]
    pub unsafe fn splat(value: f32) -> __m256 {
        _mm256_set1_ps(value)
    }

    #[inline(always)]
    pub unsafe fn loadu(ptr: *const f32) -> __m256 {
        _mm256_loadu_ps(ptr)
    }

    #[inline(always)]
    pub unsafe fn load(ptr: *const f32) -> __m256 {
        _mm256_load_ps(ptr)
    }

    #[inline(always)]
    pub unsafe fn storeu(ptr: *mut f32, a: __m256) {
        _mm256_storeu_ps(ptr, a)
    }

    #[inline(always)]
    pub unsafe fn store(ptr: *mut f32, a: __m256) {
        _mm256_store_ps(ptr, a)
    }

    #[inline(always)]
    pub unsafe fn add(a: __m256, b: __m256) -> __m256 {
        _mm256_add_ps(a, b)
    }

    #[inline(always)]
    pub unsafe fn sub(a: __m256, b: __m256) -> __m256 {
        _mm256_sub_ps(a, b)
    }

    #[inline(always)]
    pub unsafe fn mul(a: __m256, b: __m256) -> __m256 {
        _mm256_mul_ps(a, b)
    }

    #[inline(always)]
    pub unsafe fn div(a: __m256, b: __m256) -> __m256 {
        _mm256_div_ps(a, b)
    }

    #[inline(always)]
    pub unsafe fn min(a: __m256, b: __m256) -> __m256 {
        _mm256_min_ps(a, b)
    }

    #[inline(always)]
    pub unsafe fn max(a: __m256, b: __m256) -> __m256 {
        _mm256_max_ps(a, b)
    }

    #[inline(always)]
    pub unsafe fn sqrt(a: __m256) -> __m256 {
        _mm256_sqrt_ps(a)
    }

    #[inline(always)]
    pub unsafe fn rcp(a: __m256) -> __m256 {
        _mm256_rcp_ps(a)
    }

    #[inline(always)]
    pub unsafe fn floor(a: __m256) -> __m256 {
        _mm256_floor_ps(a)
    }

    #[inline(always)]
    pub unsafe fn ceil(a: __m256) -> __m256 {
        _mm256_ceil_ps(a)
    }

    #[inline(always)]
    pub unsafe fn round(a: __m256) -> __m256 {
        _mm256_round_ps(a, _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC)
    }

    #[inline(always)]
    pub unsafe fn trunc(a: __m256) -> __m256 {
        _mm256_round_ps(a, _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC)
    }

    #[inline(always)]
    pub unsafe fn abs(a: __m256) -> __m256 {
        _mm256_andnot_ps(_mm256_set1_ps(-0.0), a)
    }

    #[inline(always)]
    pub unsafe fn neg(a: __m256) -> __m256 {
        _mm256_xor_ps(a, _mm256_set1_ps(-0.0))
    }

    #[cfg(fma)]
    #[inline(always)]
    pub unsafe fn fmadd(a: __m256, b: __m256, c: __m256) -> __m256 {
        _mm256_fmadd_ps(a, b, c)
    }

    #[cfg(not(fma))]
    #[inline(always)]
    pub unsafe fn fmadd(a: __m256, b: __m256, c: __m256) -> __m256 {
        _mm256_add_ps(_mm256_mul_ps(a, b), c)
    }

    #[inline(always)]
    pub unsafe fn cmp_eq(a: __m256, b: __m256) -> u64 {
        _mm256_movemask_ps(_mm256_cmp_ps(a, b, _CMP_EQ_OQ)) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_ne(a: __m256, b: __m256) -> u64 {
        _mm256_movemask_ps(_mm256_cmp_ps(a, b, _CMP_NEQ_UQ)) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_lt(a: __m256, b: __m256) -> u64 {
        _mm256_movemask_ps(_mm256_cmp_ps(a, b, _CMP_LT_OQ)) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_le(a: __m256, b: __m256) -> u64 {
        _mm256_movemask_ps(_mm256_cmp_ps(a, b, _CMP_LE_OQ)) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_gt(a: __m256, b: __m256) -> u64 {
        _mm256_movemask_ps(_mm256_cmp_ps(a, b, _CMP_GT_OQ)) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_ge(a: __m256, b: __m256) -> u64 {
        _mm256_movemask_ps(_mm256_cmp_ps(a, b, _CMP_GE_OQ)) as u64
    }

    /// Expands a lane bit set into all-ones/all-zeros `f32` lanes.
    #[inline(always)]
    pub unsafe fn expand_mask(bits: u64) -> __m256 {
        _mm256_castsi256_ps(super::epi32x8::expand_mask(bits))
    }

    #[inline(always)]
    pub unsafe fn select(bits: u64, on_true: __m256, on_false: __m256) -> __m256 {
        _mm256_blendv_ps(on_false, on_true, expand_mask(bits))
    }
}

mod pd256 {
    use super::*;

    #[inline(always)]
    pub unsafe fn splat(value: f64) -> __m256d {
        _mm256_set1_pd(value)
    }

    #[inline(always)]
    pub unsafe fn loadu(ptr: *const f64) -> __m256d {
        _mm256_loadu_pd(ptr)
    }

    #[inline(always)]
    pub unsafe fn load(ptr: *const f64) -> __m256d {
        _mm256_load_pd(ptr)
    }

    #[inline(always)]
    pub unsafe fn storeu(ptr: *mut f64, a: __m256d) {
        _mm256_storeu_pd(ptr, a)
    }

    #[inline(always)]
    pub unsafe fn store(ptr: *mut f64, a: __m256d) {
        _mm256_store_pd(ptr, a)
    }

    #[inline(always)]
    pub unsafe fn add(a: __m256d, b: __m256d) -> __m256d {
        _mm256_add_pd(a, b)
    }

    #[inline(always)]
    pub unsafe fn sub(a: __m256d, b: __m256d) -> __m256d {
        _mm256_sub_pd(a, b)
    }

    #[inline(always)]
    pub unsafe fn mul(a: __m256d, b: __m256d) -> __m256d {
        _mm256_mul_pd(a, b)
    }

    #[inline(always)]
    pub unsafe fn div(a: __m256d, b: __m256d) -> __m256d {
        _mm256_div_pd(a, b)
    }

    #[inline(always)]
    pub unsafe fn min(a: __m256d, b: __m256d) -> __m256d {
        _mm256_min_pd(a, b)
    }

    #[inline(always)]
    pub unsafe fn max(a: __m256d, b: __m256d) -> __m256d {
        _mm256_max_pd(a, b)
    }

    #[inline(always)]
    pub unsafe fn sqrt(a: __m256d) -> __m256d {
        _mm256_sqrt_pd(a)
    }

    #[inline(always)]
    pub unsafe fn rcp(a: __m256d) -> __m256d {
        _mm256_div_pd(_mm256_set1_pd(1.0), a)
    }

    #[inline(always)]
    pub unsafe fn floor(a: __m256d) -> __m256d {
        _mm256_floor_pd(a)
    }

    #[inline(always)]
    pub unsafe fn ceil(a: __m256d) -> __m256d {
        _mm256_ceil_pd(a)
    }

    #[inline(always)]
    pub unsafe fn round(a: __m256d) -> __m256d {
        _mm256_round_pd(a, _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC)
    }

    #[inline(always)]
    pub unsafe fn trunc(a: __m256d) -> __m256d {
        _mm256_round_pd(a, _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC)
    }

    #[inline(always)]
    pub unsafe fn abs(a: __m256d) -> __m256d {
        _mm256_andnot_pd(_mm256_set1_pd(-0.0), a)
    }

    #[inline(always)]
    pub unsafe fn neg(a: __m256d) -> __m256d {
        _mm256_xor_pd(a, _mm256_set1_pd(-0.0))
    }

    #[cfg(fma)]
    #[inline(always)]
    pub unsafe fn fmadd(a: __m256d, b: __m256d, c: __m256d) -> __m256d {
        _mm256_fmadd_pd(a, b, c)
    }

    #[cfg(not(fma))]
    #[inline(always)]
    pub unsafe fn fmadd(a: __m256d, b: __m256d, c: __m256d) -> __m256d {
        _mm256_add_pd(_mm256_mul_pd(a, b), c)
    }

    #[inline(always)]
    pub unsafe fn cmp_eq(a: __m256d, b: __m256d) -> u64 {
        _mm256_movemask_pd(_mm256_cmp_pd(a, b, _CMP_EQ_OQ)) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_ne(a: __m256d, b: __m256d) -> u64 {
        _mm256_movemask_pd(_mm256_cmp_pd(a, b, _CMP_NEQ_UQ)) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_lt(a: __m256d, b: __m256d) -> u64 {
        _mm256_movemask_pd(_mm256_cmp_pd(a, b, _CMP_LT_OQ)) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_le(a: __m256d, b: __m256d) -> u64 {
        _mm256_movemask_pd(_mm256_cmp_pd(a, b, _CMP_LE_OQ)) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_gt(a: __m256d, b: __m256d) -> u64 {
        _mm256_movemask_pd(_mm256_cmp_pd(a, b, _CMP_GT_OQ)) as u64
    }

    #[inline(always)]
    pub unsafe fn cmp_ge(a: __m256d, b: __m256d) -> u64 {
        _mm256_movemask_pd(_mm256_cmp_pd(a, b, _CMP_GE_OQ)) as u64
    }

    /// Expands a lane bit set into all-ones/all-zeros `f64` lanes.
    #[inline(always)]
    pub unsafe fn expand_mask(bits: u64) -> __m256d {
        let weights = _mm256_setr_epi64x(1, 2, 4, 8);
        let picked = _mm256_and_si256(_mm256_set1_epi64x(bits as i64), weights);
        _mm256_castsi256_pd(_mm256_cmpeq_epi64(picked, weights))
    }

    #[inline(always)]
    pub unsafe fn select(bits: u64, on_true: __m256d, on_false: __m256d) -> __m256d {
        _mm256_blendv_pd(on_false, on_true, expand_mask(bits))
    }
}

mod epi32x4 {
    use super::*;

    const LANES: u64 = 0xF;

    #[inline(always)]
    unsafe fn movemask(a: __m128i) -> u64 {
        _mm_movemask_ps(_mm_castsi128_ps(a)) as u64
    }

    #[inline(always)]
    unsafe fn counts(n: u32) -> __m128i {
        _mm_set1_epi32((n & 31) as i32)
    }

    #[inline(always)]
    unsafe fn lane_counts(a: __m128i) -> __m128i {
        _mm_and_si128(a, _mm_set1_epi32(31))
    }

    #[inline(always)]
    pub unsafe fn splat(value: i32) -> __m128i {
        _mm_set1_epi32(value)
    }

    #[inline(always)]
    pub unsafe fn loadu(ptr: *const i32) -> __m128i {
        _mm_loadu_si128(ptr as *const __m128i)
    }

    #[inline(always)]
    pub unsafe fn load(ptr: *const i32) -> __m128i {
        _mm_load_si128(ptr as *const __m128i)
    }

    #[inline(always)]
    pub unsafe fn storeu(ptr: *mut i32, a: __m128i) {
        _mm_storeu_si128(ptr as *mut __m128i, a)
    }

    #[inline(always)]
    pub unsafe fn store(ptr: *mut i32, a: __m128i) {
        _mm_store_si128(ptr as *mut __m128i, a)
    }

    #[inline(always)]
    pub unsafe fn add(a: __m128i, b: __m128i) -> __m128i {
        _mm_add_epi32(a, b)
    }

    #[inline(always)]
    pub unsafe fn sub(a: __m128i, b: __m128i) -> __m128i {
        _mm_sub_epi32(a, b)
    }

    #[inline(always)]
    pub unsafe fn mul(a: __m128i, b: __m128i) -> __m128i {
        _mm_mullo_epi32(a, b)
    }

    #[inline(always)]
    pub unsafe fn neg(a: __m128i) -> __m128i {
        _mm_sub_epi32(_mm_setzero_si128(), a)
    }

    #[inline(always)]
    pub unsafe fn and(a: __m128i, b: __m128i) -> __m128i {
        _mm_and_si128(a, b)
    }

    #[inline(always)]
    pub unsafe fn or(a: __m128i, b: __m128i) -> __m128i {
        _mm_or_si128(a, b)
    }

    #[inline(always)]
    pub unsafe fn xor(a: __m128i, b: __m128i) -> __m128i {
        _mm_xor_si128(a, b)
    }

    #[inline(always)]
    pub unsafe fn not(a: __m128i) -> __m128i {
        _mm_xor_si128(a, _mm_set1_epi32(-1))
    }

    #[inline(always)]
    pub unsafe fn cmp_eq(a: __m128i, b: __m128i) -> u64 {
        movemask(_mm_cmpeq_epi32(a, b))
    }

    /// Expands a lane bit set into all-ones/all-zeros 32-bit lanes.
    #[inline(always)]
    pub unsafe fn expand_mask(bits: u64) -> __m128i {
        let weights = _mm_setr_epi32(1, 2, 4, 8);
        let picked = _mm_and_si128(_mm_set1_epi32(bits as i32), weights);
        _mm_cmpeq_epi32(picked, weights)
    }

    #[inline(always)]
    pub unsafe fn select(bits: u64, on_true: __m128i, on_false: __m128i) -> __m128i {
        _mm_blendv_epi8(on_false, on_true, expand_mask(bits))
    }

    #[inline(always)]
    pub unsafe fn shl(a: __m128i, n: u32) -> __m128i {
        _mm_sllv_epi32(a, counts(n))
    }

    #[inline(always)]
    pub unsafe fn shl_lanes(a: __m128i, n: __m128i) -> __m128i {
        _mm_sllv_epi32(a, lane_counts(n))
    }

    #[inline(always)]
    pub unsafe fn rotl_lanes(a: __m128i, n: __m128i) -> __m128i {
        let n = lane_counts(n);
        let back = _mm_sub_epi32(_mm_set1_epi32(32), n);
        _mm_or_si128(_mm_sllv_epi32(a, n), _mm_srlv_epi32(a, back))
    }

    #[inline(always)]
    pub unsafe fn rotr_lanes(a: __m128i, n: __m128i) -> __m128i {
        let n = lane_counts(n);
        let back = _mm_sub_epi32(_mm_set1_epi32(32), n);
        _mm_or_si128(_mm_srlv_epi32(a, n), _mm_sllv_epi32(a, back))
    }

    #[inline(always)]
    pub unsafe fn rotl(a: __m128i, n: u32) -> __m128i {
        rotl_lanes(a, counts(n))
    }

    #[inline(always)]
    pub unsafe fn rotr(a: __m128i, n: u32) -> __m128i {
        rotr_lanes(a, counts(n))
    }

    pub mod signed {
        use super::*;

        #[inline(always)]
        pub unsafe fn min(a: __m128i, b: __m128i) -> __m128i {
            _mm_min_epi32(a, b)
        }

        #[inline(always)]
        pub unsafe fn max(a: __m128i, b: __m128i) -> __m128i {
            _mm_max_epi32(a, b)
        }

        #[inline(always)]
        pub unsafe fn abs(a: __m128i) -> __m128i {
            _mm_abs_epi32(a)
        }

        #[inline(always)]
        pub unsafe fn cmp_gt(a: __m128i, b: __m128i) -> u64 {
            movemask(_mm_cmpgt_epi32(a, b))
        }

        #[inline(always)]
        pub unsafe fn cmp_lt(a: __m128i, b: __m128i) -> u64 {
            cmp_gt(b, a)
        }

        #[inline(always)]
        pub unsafe fn cmp_le(a: __m128i, b: __m128i) -> u64 {
            !cmp_gt(a, b) & LANES
        }

        #[inline(always)]
        pub unsafe fn cmp_ge(a: __m128i, b: __m128i) -> u64 {
            !cmp_gt(b, a) & LANES
        }

        #[inline(always)]
        pub unsafe fn shr(a: __m128i, n: u32) -> __m128i {
            _mm_srav_epi32(a, counts(n))
        }

        #[inline(always)]
        pub unsafe fn shr_lanes(a: __m128i, n: __m128i) -> __m128i {
            _mm_srav_epi32(a, lane_counts(n))
        }
    }

    pub mod unsigned {
        use super::*;

        #[inline(always)]
        unsafe fn biased(a: __m128i) -> __m128i {
            _mm_xor_si128(a, _mm_set1_epi32(i32::MIN))
        }

        #[inline(always)]
        pub unsafe fn min(a: __m128i, b: __m128i) -> __m128i {
            _mm_min_epu32(a, b)
        }

        #[inline(always)]
        pub unsafe fn max(a: __m128i, b: __m128i) -> __m128i {
            _mm_max_epu32(a, b)
        }

        #[inline(always)]
        pub unsafe fn abs(a: __m128i) -> __m128i {
            a
        }

        #[inline(always)]
        pub unsafe fn cmp_gt(a: __m128i, b: __m128i) -> u64 {
            movemask(_mm_cmpgt_epi32(biased(a), biased(b)))
        }

        #[inline(always)]
        pub unsafe fn cmp_lt(a: __m128i, b: __m128i) -> u64 {
            cmp_gt(b, a)
        }

        #[inline(always)]
        pub unsafe fn cmp_le(a: __m128i, b: __m128i) -> u64 {
            !cmp_gt(a, b) & LANES
        }

        #[inline(always)]
        pub unsafe fn cmp_ge(a: __m128i, b: __m128i) -> u64 {
            !cmp_gt(b, a) & LANES
        }

        #[inline(always)]
        pub unsafe fn shr(a: __m128i, n: u32) -> __m128i {
            _mm_srlv_epi32(a, counts(n))
        }

        #[inline(always)]
        pub unsafe fn shr_lanes(a: __m128i, n: __m128i) -> __m128i {
            _mm_srlv_epi32(a, lane_counts(n))
        }
    }
}

mod epi32x8 {
    use super::*;

    const LANES: u64 = 0xFF;

    #[inline(always)]
    unsafe fn movemask(a: __m256i) -> u64 {
        _mm256_movemask_ps(_mm256_castsi256_ps(a)) as u64
    }

    #[inline(always)]
    unsafe fn counts(n: u32) -> __m256i {
        _mm256_set1_epi32((n & 31) as i32)
    }

    #[inline(always)]
    unsafe fn lane_counts(a: __m256i) -> __m256i {
        _mm256_and_si256(a, _mm256_set1_epi32(31))
    }

    #[inline(always)]
    pub unsafe fn splat(value: i32) -> __m256i {
        _mm256_set1_epi32(value)
    }

    #[inline(always)]
    pub unsafe fn loadu(ptr: *const i32) -> __m256i {
        _mm256_loadu_si256(ptr as *const __m256i)
    }

    #[inline(always)]
    pub unsafe fn load(ptr: *const i32) -> __m256i {
        _mm256_load_si256(ptr as *const __m256i)
    }

    #[inline(always)]
    pub unsafe fn storeu(ptr: *mut i32, a: __m256i) {
        _mm256_storeu_si256(ptr as *mut __m256i, a)
    }

    #[inline(always)]
    pub unsafe fn store(ptr: *mut i32, a: __m256i) {
        _mm256_store_si256(ptr as *mut __m256i, a)
    }

    #[inline(always)]
    pub unsafe fn add(a: __m256i, b: __m256i) -> __m256i {
        _mm256_add_epi32(a, b)
    }

    #[inline(always)]
    pub unsafe fn sub(a: __m256i, b: __m256i) -> __m256i {
        _mm256_sub_epi32(a, b)
    }

    #[inline(always)]
    pub unsafe fn mul(a: __m256i, b: __m256i) -> __m256i {
        _mm256_mullo_epi32(a, b)
    }

    #[inline(always)]
    pub unsafe fn neg(a: __m256i) -> __m256i {
        _mm256_sub_epi32(_mm256_setzero_si256(), a)
    }

    #[inline(always)]
    pub unsafe fn and(a: __m256i, b: __m256i) -> __m256i {
        _mm256_and_si256(a, b)
    }

    #[inline(always)]
    pub unsafe fn or(a: __m256i, b: __m256i) -> __m256i {
        _mm256_or_si256(a, b)
    }

    #[inline(always)]
    pub unsafe fn xor(a: __m256i, b: __m256i) -> __m256i {
        _mm256_xor_si256(a, b)
    }

    #[inline(always)]
    pub unsafe fn not(a: __m256i) -> __m256i {
        _mm256_xor_si256(a, _mm256_set1_epi32(-1))
    }

    #[inline(always)]
    pub unsafe fn cmp_eq(a: __m256i, b: __m256i) -> u64 {
        movemask(_mm256_cmpeq_epi32(a, b))
    }

    /// Expands a lane bit set into all-ones/all-zeros 32-bit lanes.
    ///
    /// Shared by `F32x8`, which reinterprets the result as float lanes.
    #[inline(always)]
    pub unsafe fn expand_mask(bits: u64) -> __m256i {
        let weights = _mm256_setr_epi32(1, 2, 4, 8, 16, 32, 64, 128);
        let picked = _mm256_and_si256(_mm256_set1_epi32(bits as i32), weights);
        _mm256_cmpeq_epi32(picked, weights)
    }

    #[inline(always)]
    pub unsafe fn select(bits: u64, on_true: __m256i, on_false: __m256i) -> __m256i {
        _mm256_blendv_epi8(on_false, on_true, expand_mask(bits))
    }

    #[inline(always)]
    pub unsafe fn shl(a: __m256i, n: u32) -> __m256i {
        _mm256_sllv_epi32(a, counts(n))
    }

    #[inline(always)]
    pub unsafe fn shl_lanes(a: __m256i, n: __m256i) -> __m256i {
        _mm256_sllv_epi32(a, lane_counts(n))
    }

    #[inline(always)]
    pub unsafe fn rotl_lanes(a: __m256i, n: __m256i) -> __m256i {
        let n = lane_counts(n);
        let back = _mm256_sub_epi32(_mm256_set1_epi32(32), n);
        _mm256_or_si256(_mm256_sllv_epi32(a, n), _mm256_srlv_epi32(a, back))
    }

    #[inline(always)]
    pub unsafe fn rotr_lanes(a: __m256i, n: __m256i) -> __m256i {
        let n = lane_counts(n);
        let back = _mm256_sub_epi32(_mm256_set1_epi32(32), n);
        _mm256_or_si256(_mm256_srlv_epi32(a, n), _mm256_sllv_epi32(a, back))
    }

    #[inline(always)]
    pub unsafe fn rotl(a: __m256i, n: u32) -> __m256i {
        rotl_lanes(a, counts(n))
    }

    #[inline(always)]
    pub unsafe fn rotr(a: __m256i, n: u32) -> __m256i {
        rotr_lanes(a, counts(n))
    }

    pub mod signed {
        use super::*;

        #[inline(always)]
        pub unsafe fn min(a: __m256i, b: __m256i) -> __m256i {
            _mm256_min_epi32(a, b)
        }

        #[inline(always)]
        pub unsafe fn max(a: __m256i, b: __m256i) -> __m256i {
            _mm256_max_epi32(a, b)
        }

        #[inline(always)]
        pub unsafe fn abs(a: __m256i) -> __m256i {
            _mm256_abs_epi32(a)
        }

        #[inline(always)]
        pub unsafe fn cmp_gt(a: __m256i, b: __m256i) -> u64 {
            movemask(_mm256_cmpgt_epi32(a, b))
        }

        #[inline(always)]
        pub unsafe fn cmp_lt(a: __m256i, b: __m256i) -> u64 {
            cmp_gt(b, a)
        }

        #[inline(always)]
        pub unsafe fn cmp_le(a: __m256i, b: __m256i) -> u64 {
            !cmp_gt(a, b) & LANES
        }

        #[inline(always)]
        pub unsafe fn cmp_ge(a: __m256i, b: __m256i) -> u64 {
            !cmp_gt(b, a) & LANES
        }

        #[inline(always)]
        pub unsafe fn shr(a: __m256i, n: u32) -> __m256i {
            _mm256_srav_epi32(a, counts(n))
        }

        #[inline(always)]
        pub unsafe fn shr_lanes(a: __m256i, n: __m256i) -> __m256i {
            _mm256_srav_epi32(a, lane_counts(n))
        }
    }

    pub mod unsigned {
        use super::*;

        #[inline(always)]
        unsafe fn biased(a: __m256i) -> __m256i {
            _mm256_xor_si256(a, _mm256_set1_epi32(i32::MIN))
        }

        #[inline(always)]
        pub unsafe fn min(a: __m256i, b: __m256i) -> __m256i {
            _mm256_min_epu32(a, b)
        }

        #[inline(always)]
        pub unsafe fn max(a: __m256i, b: __m256i) -> __m256i {
            _mm256_max_epu32(a, b)
        }

        #[inline(always)]
        pub unsafe fn abs(a: __m256i) -> __m256i {
            a
        }

        #[inline(always)]
        pub unsafe fn cmp_gt(a: __m256i, b: __m256i) -> u64 {
            movemask(_mm256_cmpgt_epi32(biased(a), biased(b)))
        }

        #[inline(always)]
        pub unsafe fn cmp_lt(a: __m256i, b: __m256i) -> u64 {
            cmp_gt(b, a)
        }

        #[inline(always)]
        pub unsafe fn cmp_le(a: __m256i, b: __m256i) -> u64 {
            !cmp_gt(a, b) & LANES
        }

        #[inline(always)]
        pub unsafe fn cmp_ge(a: __m256i, b: __m256i) -> u64 {
            !cmp_gt(b, a) & LANES
        }

        #[inline(always)]
        pub unsafe fn shr(a: __m256i, n: u32) -> __m256i {
            _mm256_srlv_epi32(a, counts(n))
        }

        #[inline(always)]
        pub unsafe fn shr_lanes(a: __m256i, n: __m256i) -> __m256i {
            _mm256_srlv_epi32(a, lane_counts(n))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::register::{FloatRegister, IntRegister, LaneRegister};

    fn lanes<R: LaneRegister>(reg: R) -> Vec<R::Scalar> {
        reg.spill()[..R::LANES].to_vec()
    }

    mod f32x8_tests {
        use super::*;

        #[test]
        fn test_select_expands_every_lane() {
            let a = F32x8::splat(1.0);
            let b = F32x8::splat(0.0);
            for bits in [0u64, 1, 0x80, 0xA5, 0xFF] {
                let expected: Vec<f32> =
                    (0..8).map(|i| ((bits >> i) & 1) as f32).collect();
                assert_eq!(lanes(F32x8::select(bits, a, b)), expected);
            }
        }

        #[test]
        fn test_compare_and_reduce() {
            let data: [f32; 8] = core::array::from_fn(|i| i as f32);
            let a = unsafe { F32x8::load_unaligned(data.as_ptr()) };
            let b = F32x8::splat(3.0);

            assert_eq!(a.cmp_lt(b), 0b0000_0111);
            assert_eq!(a.cmp_ge(b), 0b1111_1000);
            assert_eq!(a.cmp_eq(b), 0b0000_1000);
            assert_eq!(a.reduce_add(), 28.0);
            assert_eq!(a.reduce_max(), 7.0);
            assert_eq!(lanes(a.mul_add(b, b))[2], 9.0);
        }
    }

    mod i32x8_tests {
        use super::*;

        #[test]
        fn test_signed_semantics() {
            let data = [i32::MIN, -5, -1, 0, 1, 5, 31, i32::MAX];
            let a = unsafe { I32x8::load_unaligned(data.as_ptr()) };

            assert_eq!(lanes(a.abs())[0], i32::MIN);
            assert_eq!(lanes(a.shr(1))[1], -3);
            assert_eq!(lanes(a.shl(33))[5], 10);
            assert_eq!(a.cmp_lt(I32x8::splat(0)), 0b0000_0111);
            assert_eq!(a.cmp_ne(I32x8::splat(0)), 0b1111_0111);
            assert_eq!(lanes(a.min(I32x8::splat(2)))[7], 2);
        }

        #[test]
        fn test_rotations_match_scalar() {
            let data = [1, -2, 0x1234_5678, i32::MIN, 7, 0, -1, 99];
            let counts = [0, 1, 4, 31, 32, 5, 17, 63];
            let a = unsafe { I32x8::load_unaligned(data.as_ptr()) };
            let n = unsafe { I32x8::load_unaligned(counts.as_ptr()) };

            let left = lanes(a.rotl_lanes(n));
            let right = lanes(a.rotr_lanes(n));
            for i in 0..8 {
                assert_eq!(left[i], data[i].rotate_left(counts[i] as u32 % 32));
                assert_eq!(right[i], data[i].rotate_right(counts[i] as u32 % 32));
            }
        }
    }

    mod u32x8_tests {
        use super::*;

        #[test]
        fn test_unsigned_semantics() {
            let data = [0u32, 1, 2, 0x8000_0000, u32::MAX, 7, 8, 9];
            let a = unsafe { U32x8::load_unaligned(data.as_ptr()) };

            assert_eq!(a.cmp_gt(U32x8::splat(2)), 0b1111_1000);
            assert_eq!(lanes(a.shr(31))[3], 1);
            assert_eq!(lanes(a.max(U32x8::splat(5)))[4], u32::MAX);
            assert_eq!(lanes(a.abs()), data.to_vec());
            assert_eq!(a.reduce_or(), u32::MAX);
        }
    }

    mod u32x4_tests {
        use super::*;

        #[test]
        fn test_select_and_saturate() {
            let a = unsafe { U32x4::load_unaligned([1u32, u32::MAX, 3, 4].as_ptr()) };
            let b = U32x4::splat(10);

            assert_eq!(lanes(U32x4::select(0b0101, a, b)), vec![1, 10, 3, 10]);
            assert_eq!(lanes(a.saturating_add(b))[1], u32::MAX);
            assert_eq!(a.cmp_le(b), 0b1101);
        }
    }
}
