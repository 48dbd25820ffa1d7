//! Recursive-halving register.
//!
//! A `Composite<R>` holds two registers of half its lane count. Lane `i` lives in
//! `lo` when `i < R::LANES` and in `hi` at `i - R::LANES` otherwise, so lanes are
//! concatenated, never interleaved. Every operation runs independently on both
//! halves; reductions combine the two partial results with the same operator,
//! which is why only associative reductions are offered.

use crate::element::{Element, FloatElement, IntElement};
use crate::simd::register::{lane_mask, FloatRegister, IntRegister, LaneRegister, Shape};

/// Two half-width registers acting as one.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct Composite<R> {
    pub(crate) lo: R,
    pub(crate) hi: R,
}

impl<R: LaneRegister> Composite<R> {
    #[inline(always)]
    pub(crate) fn new(lo: R, hi: R) -> Self {
        Composite { lo, hi }
    }

    #[inline(always)]
    fn both(self, f: impl Fn(R) -> R) -> Self {
        Composite::new(f(self.lo), f(self.hi))
    }

    #[inline(always)]
    fn pair(self, rhs: Self, f: impl Fn(R, R) -> R) -> Self {
        Composite::new(f(self.lo, rhs.lo), f(self.hi, rhs.hi))
    }

    #[inline(always)]
    fn bits(self, rhs: Self, f: impl Fn(R, R) -> u64) -> u64 {
        f(self.lo, rhs.lo) | (f(self.hi, rhs.hi) << R::LANES)
    }
}

impl<R: LaneRegister> LaneRegister for Composite<R> {
    type Scalar = R::Scalar;

    const LANES: usize = R::LANES * 2;
    const ALIGN: usize = R::ALIGN;

    fn shape() -> Shape {
        Shape::doubled(R::shape())
    }

    #[inline(always)]
    fn splat(value: R::Scalar) -> Self {
        let half = R::splat(value);
        Composite::new(half, half)
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const R::Scalar) -> Self {
        Composite::new(R::load_unaligned(ptr), R::load_unaligned(ptr.add(R::LANES)))
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const R::Scalar) -> Self {
        Composite::new(R::load_aligned(ptr), R::load_aligned(ptr.add(R::LANES)))
    }

    #[inline(always)]
    unsafe fn store_unaligned(self, ptr: *mut R::Scalar) {
        self.lo.store_unaligned(ptr);
        self.hi.store_unaligned(ptr.add(R::LANES));
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut R::Scalar) {
        self.lo.store_aligned(ptr);
        self.hi.store_aligned(ptr.add(R::LANES));
    }

    #[inline(always)]
    fn extract(self, index: usize) -> R::Scalar {
        if index < R::LANES {
            self.lo.extract(index)
        } else {
            self.hi.extract(index - R::LANES)
        }
    }

    #[inline(always)]
    fn insert(self, index: usize, value: R::Scalar) -> Self {
        if index < R::LANES {
            Composite::new(self.lo.insert(index, value), self.hi)
        } else {
            Composite::new(self.lo, self.hi.insert(index - R::LANES, value))
        }
    }

    #[inline(always)]
    fn map_lanes(self, f: impl Fn(R::Scalar) -> R::Scalar) -> Self {
        self.both(|half| half.map_lanes(&f))
    }

    #[inline(always)]
    fn zip_lanes(self, rhs: Self, f: impl Fn(R::Scalar, R::Scalar) -> R::Scalar) -> Self {
        self.pair(rhs, |a, b| a.zip_lanes(b, &f))
    }

    #[inline(always)]
    fn fold_lanes(self, f: impl Fn(R::Scalar, R::Scalar) -> R::Scalar) -> R::Scalar {
        f(self.lo.fold_lanes(&f), self.hi.fold_lanes(&f))
    }

    #[inline(always)]
    fn select(bits: u64, on_true: Self, on_false: Self) -> Self {
        let lo = bits & lane_mask(R::LANES);
        let hi = (bits >> R::LANES) & lane_mask(R::LANES);
        Composite::new(
            R::select(lo, on_true.lo, on_false.lo),
            R::select(hi, on_true.hi, on_false.hi),
        )
    }

    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> u64 {
        self.bits(rhs, R::cmp_eq)
    }

    #[inline(always)]
    fn cmp_ne(self, rhs: Self) -> u64 {
        self.bits(rhs, R::cmp_ne)
    }

    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> u64 {
        self.bits(rhs, R::cmp_lt)
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> u64 {
        self.bits(rhs, R::cmp_le)
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> u64 {
        self.bits(rhs, R::cmp_gt)
    }

    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> u64 {
        self.bits(rhs, R::cmp_ge)
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        self.pair(rhs, R::add)
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        self.pair(rhs, R::sub)
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        self.pair(rhs, R::mul)
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        self.pair(rhs, R::min)
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        self.pair(rhs, R::max)
    }

    #[inline(always)]
    fn neg(self) -> Self {
        self.both(R::neg)
    }

    #[inline(always)]
    fn abs(self) -> Self {
        self.both(R::abs)
    }

    #[inline(always)]
    fn reduce_add(self) -> R::Scalar {
        self.lo.reduce_add().lane_add(self.hi.reduce_add())
    }

    #[inline(always)]
    fn reduce_mul(self) -> R::Scalar {
        self.lo.reduce_mul().lane_mul(self.hi.reduce_mul())
    }

    #[inline(always)]
    fn reduce_min(self) -> R::Scalar {
        self.lo.reduce_min().lane_min_num(self.hi.reduce_min())
    }

    #[inline(always)]
    fn reduce_max(self) -> R::Scalar {
        self.lo.reduce_max().lane_max_num(self.hi.reduce_max())
    }
}

impl<R: FloatRegister> FloatRegister for Composite<R>
where
    R::Scalar: FloatElement,
{
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        self.pair(rhs, R::div)
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        self.both(R::sqrt)
    }

    #[inline(always)]
    fn rcp(self) -> Self {
        self.both(R::rcp)
    }

    #[inline(always)]
    fn floor(self) -> Self {
        self.both(R::floor)
    }

    #[inline(always)]
    fn ceil(self) -> Self {
        self.both(R::ceil)
    }

    #[inline(always)]
    fn round(self) -> Self {
        self.both(R::round)
    }

    #[inline(always)]
    fn trunc(self) -> Self {
        self.both(R::trunc)
    }

    #[inline(always)]
    fn mul_add(self, b: Self, c: Self) -> Self {
        Composite::new(self.lo.mul_add(b.lo, c.lo), self.hi.mul_add(b.hi, c.hi))
    }
}

impl<R: IntRegister> IntRegister for Composite<R>
where
    R::Scalar: IntElement,
{
    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        self.pair(rhs, R::and)
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        self.pair(rhs, R::or)
    }

    #[inline(always)]
    fn xor(self, rhs: Self) -> Self {
        self.pair(rhs, R::xor)
    }

    #[inline(always)]
    fn not(self) -> Self {
        self.both(R::not)
    }

    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        self.both(|half| half.shl(count))
    }

    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        self.both(|half| half.shr(count))
    }

    #[inline(always)]
    fn shl_lanes(self, counts: Self) -> Self {
        self.pair(counts, R::shl_lanes)
    }

    #[inline(always)]
    fn shr_lanes(self, counts: Self) -> Self {
        self.pair(counts, R::shr_lanes)
    }

    #[inline(always)]
    fn rotl(self, count: u32) -> Self {
        self.both(|half| half.rotl(count))
    }

    #[inline(always)]
    fn rotr(self, count: u32) -> Self {
        self.both(|half| half.rotr(count))
    }

    #[inline(always)]
    fn rotl_lanes(self, counts: Self) -> Self {
        self.pair(counts, R::rotl_lanes)
    }

    #[inline(always)]
    fn rotr_lanes(self, counts: Self) -> Self {
        self.pair(counts, R::rotr_lanes)
    }

    #[inline(always)]
    fn saturating_add(self, rhs: Self) -> Self {
        self.pair(rhs, R::saturating_add)
    }

    #[inline(always)]
    fn saturating_sub(self, rhs: Self) -> Self {
        self.pair(rhs, R::saturating_sub)
    }

    #[inline(always)]
    fn reduce_and(self) -> R::Scalar {
        self.lo.reduce_and().lane_and(self.hi.reduce_and())
    }

    #[inline(always)]
    fn reduce_or(self) -> R::Scalar {
        self.lo.reduce_or().lane_or(self.hi.reduce_or())
    }

    #[inline(always)]
    fn reduce_xor(self) -> R::Scalar {
        self.lo.reduce_xor().lane_xor(self.hi.reduce_xor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::emulated::Emulated;

    type Split = Composite<Emulated<f32, 4>>;
    type Flat = Emulated<f32, 8>;
    type SplitInt = Composite<Composite<Emulated<i32, 2>>>;

    fn ramp() -> [f32; 8] {
        core::array::from_fn(|i| i as f32 - 3.5)
    }

    fn both(data: &[f32; 8]) -> (Split, Flat) {
        unsafe {
            (
                Split::load_unaligned(data.as_ptr()),
                Flat::load_unaligned(data.as_ptr()),
            )
        }
    }

    fn lanes<R: LaneRegister>(reg: R) -> Vec<R::Scalar> {
        reg.spill()[..R::LANES].to_vec()
    }

    #[test]
    fn test_lane_order_is_concatenation() {
        let (split, _) = both(&ramp());
        assert_eq!(split.lo.0, [-3.5, -2.5, -1.5, -0.5]);
        assert_eq!(split.hi.0, [0.5, 1.5, 2.5, 3.5]);
        assert_eq!(split.extract(5), 1.5);
        assert_eq!(split.insert(6, 9.0).hi.0[2], 9.0);
    }

    #[test]
    fn test_matches_flat_register() {
        let (split, flat) = both(&ramp());
        let (other_split, other_flat) = both(&[2.0; 8]);

        assert_eq!(lanes(split.add(other_split)), lanes(flat.add(other_flat)));
        assert_eq!(lanes(split.mul(other_split)), lanes(flat.mul(other_flat)));
        assert_eq!(lanes(split.abs()), lanes(flat.abs()));
        assert_eq!(lanes(split.round()), lanes(flat.round()));
        assert_eq!(split.cmp_gt(other_split), flat.cmp_gt(other_flat));
        assert_eq!(
            lanes(Split::select(0b1010_0110, split, other_split)),
            lanes(Flat::select(0b1010_0110, flat, other_flat))
        );
        assert_eq!(split.reduce_max(), flat.reduce_max());
        assert_eq!(split.reduce_add(), flat.reduce_add());
    }

    #[test]
    fn test_min_max_skip_nan_in_either_half() {
        let data = [1.0, 1.0, 1.0, 1.0, f32::NAN, 5.0, 5.0, 5.0];
        let (split, flat) = both(&data);
        assert_eq!(split.reduce_min(), 1.0);
        assert_eq!(flat.reduce_min(), 1.0);
        assert_eq!(split.reduce_max(), flat.reduce_max());

        let (split, flat) = both(&[f32::NAN; 8]);
        assert_eq!(split.reduce_min(), f32::INFINITY);
        assert_eq!(flat.reduce_max(), f32::NEG_INFINITY);
    }

    #[test]
    fn test_shape_depth() {
        let shape = SplitInt::shape();
        assert_eq!(shape.depth, 2);
        assert_eq!(shape.leaves, 4);
        assert_eq!(shape.lanes(), 8);
        assert!(shape.is_emulated());
    }

    #[test]
    fn test_nested_integer_reductions() {
        let data = [1i32, 2, 4, 8, 16, 32, 64, 128];
        let reg = unsafe { SplitInt::load_unaligned(data.as_ptr()) };
        assert_eq!(reg.reduce_or(), 255);
        assert_eq!(reg.reduce_add(), 255);
        assert_eq!(reg.reduce_and(), 0);
        assert_eq!(reg.shl(1).extract(7), 256);
        assert_eq!(reg.cmp_ge(SplitInt::splat(16)), 0b1111_0000);
    }
}
