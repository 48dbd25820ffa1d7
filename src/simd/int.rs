//! Operations on integer vectors.
//!
//! Shift and rotate counts are taken modulo the lane width, whether they come
//! from a scalar or from a per-lane count vector. `>>` is arithmetic on signed
//! lanes and logical on unsigned ones.

use std::ops::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, Shl, ShlAssign, Shr,
    ShrAssign,
};

use crate::element::IntElement;

use super::mask::Mask;
use super::register::IntRegister;
use super::resolve::{Reg, Resolve};
use super::vector::{
    masked_binary_ops, masked_reductions, masked_unary_ops, vector_binary_ops, SimdVec,
};

vector_binary_ops! {
    IntRegister [T: IntElement, Reg<T, N>: IntRegister];
    BitAnd::bitand, BitAndAssign::bitand_assign => and;
    BitOr::bitor, BitOrAssign::bitor_assign => or;
    BitXor::bitxor, BitXorAssign::bitxor_assign => xor;
}

impl<T, const N: usize> Not for SimdVec<T, N>
where
    T: IntElement + Resolve<N>,
    Reg<T, N>: IntRegister,
{
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self::from_reg(IntRegister::not(self.reg))
    }
}

macro_rules! shift_ops {
    ($($op:ident::$method:ident, $assign:ident::$assign_method:ident => $by_scalar:ident, $by_lanes:ident;)*) => {
        $(
            impl<T, const N: usize> $op<u32> for SimdVec<T, N>
            where
                T: IntElement + Resolve<N>,
                Reg<T, N>: IntRegister,
            {
                type Output = Self;

                #[inline(always)]
                fn $method(self, count: u32) -> Self {
                    Self::from_reg(IntRegister::$by_scalar(self.reg, count))
                }
            }

            impl<T, const N: usize> $op for SimdVec<T, N>
            where
                T: IntElement + Resolve<N>,
                Reg<T, N>: IntRegister,
            {
                type Output = Self;

                #[inline(always)]
                fn $method(self, counts: Self) -> Self {
                    Self::from_reg(IntRegister::$by_lanes(self.reg, counts.reg))
                }
            }

            impl<T, const N: usize> $assign<u32> for SimdVec<T, N>
            where
                T: IntElement + Resolve<N>,
                Reg<T, N>: IntRegister,
            {
                #[inline(always)]
                fn $assign_method(&mut self, count: u32) {
                    *self = $op::$method(*self, count);
                }
            }

            impl<T, const N: usize> $assign for SimdVec<T, N>
            where
                T: IntElement + Resolve<N>,
                Reg<T, N>: IntRegister,
            {
                #[inline(always)]
                fn $assign_method(&mut self, counts: Self) {
                    *self = $op::$method(*self, counts);
                }
            }
        )*
    };
}

shift_ops! {
    Shl::shl, ShlAssign::shl_assign => shl, shl_lanes;
    Shr::shr, ShrAssign::shr_assign => shr, shr_lanes;
}

impl<T, const N: usize> SimdVec<T, N>
where
    T: IntElement + Resolve<N>,
    Reg<T, N>: IntRegister,
{
    /// Shifts lane `i` left by `counts[i]`.
    #[inline(always)]
    pub fn shl_lanes(self, counts: impl Into<Self>) -> Self {
        Self::from_reg(IntRegister::shl_lanes(self.reg, counts.into().reg))
    }

    /// Shifts lane `i` right by `counts[i]`.
    #[inline(always)]
    pub fn shr_lanes(self, counts: impl Into<Self>) -> Self {
        Self::from_reg(IntRegister::shr_lanes(self.reg, counts.into().reg))
    }

    #[inline(always)]
    pub fn rotl(self, count: u32) -> Self {
        Self::from_reg(IntRegister::rotl(self.reg, count))
    }

    #[inline(always)]
    pub fn rotr(self, count: u32) -> Self {
        Self::from_reg(IntRegister::rotr(self.reg, count))
    }

    /// Rotates lane `i` left by `counts[i]`.
    #[inline(always)]
    pub fn rotl_lanes(self, counts: impl Into<Self>) -> Self {
        Self::from_reg(IntRegister::rotl_lanes(self.reg, counts.into().reg))
    }

    /// Rotates lane `i` right by `counts[i]`.
    #[inline(always)]
    pub fn rotr_lanes(self, counts: impl Into<Self>) -> Self {
        Self::from_reg(IntRegister::rotr_lanes(self.reg, counts.into().reg))
    }

    /// `self << count` in the selected lanes; other lanes keep `self`.
    #[inline(always)]
    pub fn shl_masked(self, mask: Mask<N>, count: u32) -> Self {
        Self::select(mask, self << count, self)
    }

    /// `self >> count` in the selected lanes; other lanes keep `self`.
    #[inline(always)]
    pub fn shr_masked(self, mask: Mask<N>, count: u32) -> Self {
        Self::select(mask, self >> count, self)
    }

    /// [`rotl`](Self::rotl) in the selected lanes; other lanes keep `self`.
    #[inline(always)]
    pub fn rotl_masked(self, mask: Mask<N>, count: u32) -> Self {
        Self::select(mask, self.rotl(count), self)
    }

    /// [`rotr`](Self::rotr) in the selected lanes; other lanes keep `self`.
    #[inline(always)]
    pub fn rotr_masked(self, mask: Mask<N>, count: u32) -> Self {
        Self::select(mask, self.rotr(count), self)
    }

    /// Lane-wise addition clamped to the lane range.
    #[inline(always)]
    pub fn saturating_add(self, rhs: impl Into<Self>) -> Self {
        Self::from_reg(IntRegister::saturating_add(self.reg, rhs.into().reg))
    }

    /// Lane-wise subtraction clamped to the lane range.
    #[inline(always)]
    pub fn saturating_sub(self, rhs: impl Into<Self>) -> Self {
        Self::from_reg(IntRegister::saturating_sub(self.reg, rhs.into().reg))
    }

    masked_binary_ops! {
        IntRegister;
        and_masked, and_masked_assign => and;
        or_masked, or_masked_assign => or;
        xor_masked, xor_masked_assign => xor;
        shl_lanes_masked, shl_lanes_masked_assign => shl_lanes;
        shr_lanes_masked, shr_lanes_masked_assign => shr_lanes;
        rotl_lanes_masked, rotl_lanes_masked_assign => rotl_lanes;
        rotr_lanes_masked, rotr_lanes_masked_assign => rotr_lanes;
        saturating_add_masked, saturating_add_masked_assign => saturating_add;
        saturating_sub_masked, saturating_sub_masked_assign => saturating_sub;
    }

    masked_unary_ops! {
        IntRegister;
        not_masked => not;
    }

    /// Bitwise and of all lanes.
    #[inline(always)]
    pub fn hand(self) -> T {
        IntRegister::reduce_and(self.reg)
    }

    /// Bitwise or of all lanes.
    #[inline(always)]
    pub fn hor(self) -> T {
        IntRegister::reduce_or(self.reg)
    }

    /// Bitwise xor of all lanes.
    #[inline(always)]
    pub fn hxor(self) -> T {
        IntRegister::reduce_xor(self.reg)
    }

    masked_reductions! {
        IntRegister;
        /// And of the selected lanes; all bits set when none is selected.
        hand_masked => reduce_and, T::all_ones();
        /// Or of the selected lanes; `0` when none is selected.
        hor_masked => reduce_or, T::ZERO;
        /// Xor of the selected lanes; `0` when none is selected.
        hxor_masked => reduce_xor, T::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod bitwise_tests {
        use super::*;

        #[test]
        fn test_bit_operators() {
            let a = SimdVec::<u32, 8>::splat(0b1100);
            let b = SimdVec::<u32, 8>::splat(0b1010);
            assert_eq!((a & b).extract(0), Ok(0b1000));
            assert_eq!((a | b).extract(1), Ok(0b1110));
            assert_eq!((a ^ b).extract(2), Ok(0b0110));
            assert_eq!((!a).extract(3), Ok(!0b1100u32));
            assert_eq!((a & 0b0100u32).extract(4), Ok(0b0100));

            let mut c = a;
            c |= b;
            c ^= 0b0010u32;
            c &= a;
            assert_eq!(c, a);
        }

        fn or_via_and_xor<T, const N: usize>(a: SimdVec<T, N>, b: SimdVec<T, N>) -> SimdVec<T, N>
        where
            T: IntElement + Resolve<N>,
            Reg<T, N>: IntRegister,
        {
            let mut out = a & b;
            out ^= a ^ b;
            out
        }

        #[test]
        fn test_bit_operators_for_any_int_vector() {
            let a = SimdVec::<u8, 64>::from_fn(|i| (i as u8).wrapping_mul(37));
            let b = SimdVec::<u8, 64>::from_fn(|i| 255 - i as u8);
            assert_eq!(or_via_and_xor(a, b), a | b);

            let c = SimdVec::<i64, 4>::from_array([-1, 0, 6, i64::MIN]);
            let d = SimdVec::<i64, 4>::from_array([3, 0, 9, 1]);
            assert_eq!(or_via_and_xor(c, d).to_array(), [-1, 0, 15, i64::MIN | 1]);
        }

        #[test]
        fn test_masked_bitwise() {
            let a = SimdVec::<i8, 4>::splat(0b0101);
            let m = Mask::from_array([true, false, true, false]);
            assert_eq!(a.or_masked(m, 0b1010i8).to_array(), [15, 5, 15, 5]);
            assert_eq!(a.not_masked(m).to_array(), [!5, 5, !5, 5]);
        }
    }

    mod shift_tests {
        use super::*;

        #[test]
        fn test_shift_counts_wrap() {
            let a = SimdVec::<u32, 8>::splat(1);
            assert_eq!((a << 33).extract(0), Ok(2));
            assert_eq!((a << 31).extract(0), Ok(1 << 31));
            let b = SimdVec::<u16, 4>::splat(0x8000);
            assert_eq!((b >> 17).extract(0), Ok(0x4000));
        }

        #[test]
        fn test_right_shift_follows_sign() {
            let s = SimdVec::<i32, 4>::splat(-16);
            assert_eq!((s >> 2).to_array(), [-4; 4]);
            let u = SimdVec::<u32, 4>::splat(0xffff_fff0);
            assert_eq!((u >> 2).to_array(), [0x3fff_fffc; 4]);
        }

        #[test]
        fn test_per_lane_shifts() {
            let a = SimdVec::<i32, 8>::splat(-256);
            let counts = SimdVec::<i32, 8>::from_array([0, 1, 2, 3, 4, 32, 33, -1]);
            assert_eq!(
                (a >> counts).to_array(),
                [-256, -128, -64, -32, -16, -256, -128, -1]
            );
            let b = SimdVec::<u64, 4>::splat(1);
            assert_eq!(
                b.shl_lanes([0, 1, 63, 64]).to_array(),
                [1, 2, 1 << 63, 1]
            );
        }

        #[test]
        fn test_shift_masked() {
            let a = SimdVec::<u8, 4>::splat(3);
            let m = Mask::from_array([false, true, true, false]);
            assert_eq!(a.shl_masked(m, 2).to_array(), [3, 12, 12, 3]);
            let mut b = a;
            b.shr_lanes_masked_assign(m, [1, 1, 1, 1]);
            assert_eq!(b.to_array(), [3, 1, 1, 3]);
        }
    }

    mod rotate_tests {
        use super::*;

        #[test]
        fn test_rotate_by_scalar() {
            let a = SimdVec::<u32, 8>::splat(0x8000_0001);
            assert_eq!(a.rotl(1).extract(0), Ok(0x0000_0003));
            assert_eq!(a.rotr(1).extract(7), Ok(0xc000_0000));
            assert_eq!(a.rotl(32), a);
            assert_eq!(a.rotl(36), a.rotl(4));
        }

        #[test]
        fn test_rotate_by_lanes() {
            let a = SimdVec::<u8, 4>::splat(0b1000_0001);
            let r = a.rotl_lanes([0, 1, 8, 9]);
            assert_eq!(r.to_array(), [0b1000_0001, 0b0000_0011, 0b1000_0001, 0b0000_0011]);
            assert_eq!(r.rotr_lanes([0, 1, 8, 9]), a);
        }

        #[test]
        fn test_signed_rotate_is_bitwise() {
            let a = SimdVec::<i32, 4>::splat(-1);
            assert_eq!(a.rotl(7), a);
            let b = SimdVec::<i32, 4>::splat(i32::MIN);
            assert_eq!(b.rotl(1).extract(0), Ok(1));
        }
    }

    mod saturation_tests {
        use super::*;

        #[test]
        fn test_saturating() {
            let a = SimdVec::<i8, 4>::from_array([120, -120, 0, 5]);
            assert_eq!(a.saturating_add(10).to_array(), [127, -110, 10, 15]);
            assert_eq!(a.saturating_sub(10).to_array(), [110, -128, -10, -5]);
            let u = SimdVec::<u32, 8>::splat(5);
            assert_eq!(u.saturating_sub(6u32).hmax(), 0);
            assert_eq!(u.saturating_add(u32::MAX).hmin(), u32::MAX);
        }
    }

    mod reduction_tests {
        use super::*;

        #[test]
        fn test_bitwise_reductions() {
            let a = SimdVec::<u16, 8>::from_fn(|i| 1 << i);
            assert_eq!(a.hor(), 0xff);
            assert_eq!(a.hand(), 0);
            assert_eq!(a.hxor(), 0xff);
            let b = SimdVec::<i32, 16>::splat(-1);
            assert_eq!(b.hand(), -1);
            assert_eq!(b.hxor(), 0);
        }

        #[test]
        fn test_masked_bitwise_reductions() {
            let a = SimdVec::<u32, 4>::from_array([0b0011, 0b0110, 0b1100, 0b1000]);
            let none = Mask::none_set();
            assert_eq!(a.hand_masked(none), u32::MAX);
            assert_eq!(a.hor_masked(none), 0);
            assert_eq!(a.hxor_masked(none), 0);
            let m = Mask::from_array([true, true, false, false]);
            assert_eq!(a.hand_masked(m), 0b0010);
            assert_eq!(a.hor_masked(m), 0b0111);
            assert_eq!(a.hxor_masked(m), 0b0101);
        }
    }
}
