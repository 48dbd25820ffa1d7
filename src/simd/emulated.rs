//! Scalar-lane register.
//!
//! `Emulated<T, N>` is the representation of last resort: an `N`-element array
//! with every operation written as a per-lane loop over the [`Element`] scalar
//! methods. It backs single-lane vectors, element types without hardware
//! registers on the active backend, and every vector on the `fallback` backend.

use crate::element::{Element, FloatElement, IntElement};
use crate::simd::register::{FloatRegister, IntRegister, LaneRegister, Shape};

/// `N` lanes of `T` stored as a plain array.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(transparent)]
pub struct Emulated<T, const N: usize>(pub(crate) [T; N]);

impl<T: Element, const N: usize> Emulated<T, N> {
    #[inline(always)]
    fn map(self, f: impl Fn(T) -> T) -> Self {
        Emulated(self.0.map(f))
    }

    #[inline(always)]
    fn zip(self, rhs: Self, f: impl Fn(T, T) -> T) -> Self {
        Emulated(core::array::from_fn(|i| f(self.0[i], rhs.0[i])))
    }

    #[inline(always)]
    fn compare(self, rhs: Self, f: impl Fn(T, T) -> bool) -> u64 {
        self.0
            .iter()
            .zip(rhs.0.iter())
            .enumerate()
            .fold(0u64, |bits, (i, (&a, &b))| bits | ((f(a, b) as u64) << i))
    }
}

impl<T: Element, const N: usize> LaneRegister for Emulated<T, N> {
    type Scalar = T;

    const LANES: usize = N;
    const ALIGN: usize = core::mem::align_of::<T>();

    fn shape() -> Shape {
        Shape::emulated(N)
    }

    #[inline(always)]
    fn splat(value: T) -> Self {
        Emulated([value; N])
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const T) -> Self {
        Emulated(core::ptr::read_unaligned(ptr as *const [T; N]))
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const T) -> Self {
        debug_assert_eq!(ptr as usize % Self::ALIGN, 0);
        Emulated(core::ptr::read(ptr as *const [T; N]))
    }

    #[inline(always)]
    unsafe fn store_unaligned(self, ptr: *mut T) {
        core::ptr::write_unaligned(ptr as *mut [T; N], self.0)
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut T) {
        debug_assert_eq!(ptr as usize % Self::ALIGN, 0);
        core::ptr::write(ptr as *mut [T; N], self.0)
    }

    #[inline(always)]
    fn extract(self, index: usize) -> T {
        self.0[index]
    }

    #[inline(always)]
    fn insert(mut self, index: usize, value: T) -> Self {
        self.0[index] = value;
        self
    }

    #[inline(always)]
    fn map_lanes(self, f: impl Fn(T) -> T) -> Self {
        self.map(f)
    }

    #[inline(always)]
    fn zip_lanes(self, rhs: Self, f: impl Fn(T, T) -> T) -> Self {
        self.zip(rhs, f)
    }

    #[inline(always)]
    fn fold_lanes(self, f: impl Fn(T, T) -> T) -> T {
        self.0[1..].iter().fold(self.0[0], |acc, &lane| f(acc, lane))
    }

    #[inline(always)]
    fn select(bits: u64, on_true: Self, on_false: Self) -> Self {
        Emulated(core::array::from_fn(|i| {
            if (bits >> i) & 1 == 1 {
                on_true.0[i]
            } else {
                on_false.0[i]
            }
        }))
    }

    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> u64 {
        self.compare(rhs, |a, b| a == b)
    }

    #[inline(always)]
    fn cmp_ne(self, rhs: Self) -> u64 {
        self.compare(rhs, |a, b| a != b)
    }

    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> u64 {
        self.compare(rhs, |a, b| a < b)
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> u64 {
        self.compare(rhs, |a, b| a <= b)
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> u64 {
        self.compare(rhs, |a, b| a > b)
    }

    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> u64 {
        self.compare(rhs, |a, b| a >= b)
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, T::lane_add)
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, T::lane_sub)
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        self.zip(rhs, T::lane_mul)
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        self.zip(rhs, T::lane_min)
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        self.zip(rhs, T::lane_max)
    }

    #[inline(always)]
    fn neg(self) -> Self {
        self.map(T::lane_neg)
    }

    #[inline(always)]
    fn abs(self) -> Self {
        self.map(T::lane_abs)
    }
}

impl<T: FloatElement, const N: usize> FloatRegister for Emulated<T, N> {
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a / b)
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        self.map(T::sqrt)
    }

    /// Exact `1 / x`.
    #[inline(always)]
    fn rcp(self) -> Self {
        self.map(|x| T::ONE / x)
    }

    #[inline(always)]
    fn floor(self) -> Self {
        self.map(T::floor)
    }

    #[inline(always)]
    fn ceil(self) -> Self {
        self.map(T::ceil)
    }

    #[inline(always)]
    fn round(self) -> Self {
        self.map(T::lane_round)
    }

    #[inline(always)]
    fn trunc(self) -> Self {
        self.map(T::trunc)
    }

    #[inline(always)]
    fn mul_add(self, b: Self, c: Self) -> Self {
        Emulated(core::array::from_fn(|i| {
            self.0[i].lane_mul_add(b.0[i], c.0[i])
        }))
    }
}

impl<T: IntElement, const N: usize> IntRegister for Emulated<T, N> {
    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        self.zip(rhs, T::lane_and)
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        self.zip(rhs, T::lane_or)
    }

    #[inline(always)]
    fn xor(self, rhs: Self) -> Self {
        self.zip(rhs, T::lane_xor)
    }

    #[inline(always)]
    fn not(self) -> Self {
        self.map(|x| !x)
    }

    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        self.map(|x| x.lane_shl(count))
    }

    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        self.map(|x| x.lane_shr(count))
    }

    #[inline(always)]
    fn shl_lanes(self, counts: Self) -> Self {
        self.zip(counts, |x, n| x.lane_shl(n.lane_count()))
    }

    #[inline(always)]
    fn shr_lanes(self, counts: Self) -> Self {
        self.zip(counts, |x, n| x.lane_shr(n.lane_count()))
    }

    #[inline(always)]
    fn rotl(self, count: u32) -> Self {
        self.map(|x| x.lane_rotl(count))
    }

    #[inline(always)]
    fn rotr(self, count: u32) -> Self {
        self.map(|x| x.lane_rotr(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type F4 = Emulated<f32, 4>;
    type U8x8 = Emulated<u8, 8>;

    #[test]
    fn test_memory_round_trip() {
        let data = [1.0f32, -2.0, 3.5, f32::MAX];
        let reg = unsafe { F4::load_unaligned(data.as_ptr()) };
        let mut out = [0.0f32; 4];
        unsafe { reg.store_unaligned(out.as_mut_ptr()) };
        assert_eq!(out, data);
    }

    #[test]
    fn test_select_and_compare() {
        let a = Emulated([1.0f32, 5.0, 3.0, f32::NAN]);
        let b = F4::splat(3.0);

        assert_eq!(a.cmp_lt(b), 0b0001);
        assert_eq!(a.cmp_ge(b), 0b0110);
        assert_eq!(a.cmp_ne(b), 0b1011);

        let picked = F4::select(0b0101, a, b);
        assert_eq!(picked.0[..3], [1.0, 3.0, 3.0]);
    }

    #[test]
    fn test_insert_extract() {
        let reg = U8x8::splat(7).insert(3, 9);
        assert_eq!(reg.extract(3), 9);
        assert_eq!(reg.extract(2), 7);
    }

    #[test]
    fn test_reductions() {
        let reg = Emulated([1i32, -2, 3, 4]);
        assert_eq!(reg.reduce_add(), 6);
        assert_eq!(reg.reduce_mul(), -24);
        assert_eq!(reg.reduce_min(), -2);
        assert_eq!(reg.reduce_max(), 4);
        assert_eq!(Emulated([0b1100u8, 0b1010]).reduce_xor(), 0b0110);
    }

    #[test]
    fn test_integer_shifts() {
        let reg = Emulated([1u8, 2, 0x80, 0xFF]);
        assert_eq!(reg.shl(9).0, [2, 4, 0, 0xFE]);
        assert_eq!(reg.shr_lanes(Emulated([0, 1, 7, 8])).0, [1, 1, 1, 0xFF]);
        assert_eq!(reg.rotl(1).0, [2, 4, 1, 0xFF]);
    }

    #[test]
    fn test_float_rounding() {
        let reg = Emulated([2.5f64, -2.5, 1.7, -1.7]);
        assert_eq!(reg.round().0, [2.0, -2.0, 2.0, -2.0]);
        assert_eq!(reg.trunc().0, [2.0, -2.0, 1.0, -1.0]);
        assert_eq!(reg.floor().0, [2.0, -3.0, 1.0, -2.0]);
        assert_eq!(reg.ceil().0, [3.0, -2.0, 2.0, -1.0]);
    }
}
