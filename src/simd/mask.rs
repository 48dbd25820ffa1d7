//! Lane selectors.
//!
//! A `Mask<N>` stores one bit per lane in a `u64`, whatever the element type of
//! the vectors it selects in. `f32`, `i32` and `f64` vectors of the same lane
//! count share one mask type, so a comparison on one can drive a blend on
//! another. Registers translate the bit set to their own lane encoding
//! (all-ones / all-zeros lanes, or an AVX-512 `__mmask`) inside `select`.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use crate::element::IntElement;
use crate::error::{index_out_of_range, Result};

use super::register::{lane_mask, MAX_LANES};
use super::resolve::Resolve;
use super::vector::SimdVec;

/// Per-lane boolean selector for vectors of `N` lanes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mask<const N: usize> {
    bits: u64,
}

impl<const N: usize> Mask<N> {
    pub const LANES: usize = N;

    const VALID: u64 = {
        assert!(N >= 1 && N <= MAX_LANES, "mask lane count out of range");
        lane_mask(N)
    };

    /// Every lane cleared.
    #[inline(always)]
    pub const fn none_set() -> Self {
        Self::from_bits(0)
    }

    /// Every lane set.
    #[inline(always)]
    pub const fn all_set() -> Self {
        Mask { bits: Self::VALID }
    }

    #[inline(always)]
    pub const fn splat(value: bool) -> Self {
        if value {
            Self::all_set()
        } else {
            Self::none_set()
        }
    }

    /// Builds a mask from a bit set; bits above lane `N - 1` are dropped.
    #[inline(always)]
    pub const fn from_bits(bits: u64) -> Self {
        Mask {
            bits: bits & Self::VALID,
        }
    }

    /// Lane `i` is bit `i`.
    #[inline(always)]
    pub const fn bits(self) -> u64 {
        self.bits
    }

    pub fn from_array(lanes: [bool; N]) -> Self {
        let bits = lanes
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, &set)| acc | ((set as u64) << i));
        Self::from_bits(bits)
    }

    pub fn to_array(self) -> [bool; N] {
        std::array::from_fn(|i| self.bits >> i & 1 == 1)
    }

    /// Whether lane `index` is set.
    ///
    /// # Errors
    ///
    /// [`LaneError::IndexOutOfRange`](crate::LaneError::IndexOutOfRange) when
    /// `index >= N`.
    pub fn test(self, index: usize) -> Result<bool> {
        if index >= N {
            return Err(index_out_of_range(index, N));
        }
        Ok(self.bits >> index & 1 == 1)
    }

    /// Sets lane `index` to `value`.
    ///
    /// # Errors
    ///
    /// [`LaneError::IndexOutOfRange`](crate::LaneError::IndexOutOfRange) when
    /// `index >= N`; the mask is left unchanged.
    pub fn set(&mut self, index: usize, value: bool) -> Result<&mut Self> {
        if index >= N {
            return Err(index_out_of_range(index, N));
        }
        if value {
            self.bits |= 1 << index;
        } else {
            self.bits &= !(1 << index);
        }
        Ok(self)
    }

    #[inline(always)]
    pub const fn any(self) -> bool {
        self.bits != 0
    }

    #[inline(always)]
    pub const fn all(self) -> bool {
        self.bits == Self::VALID
    }

    #[inline(always)]
    pub const fn none(self) -> bool {
        self.bits == 0
    }

    /// Number of set lanes.
    #[inline(always)]
    pub const fn count(self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Index of the highest set lane.
    pub const fn last_set(self) -> Option<usize> {
        if self.bits == 0 {
            None
        } else {
            Some(63 - self.bits.leading_zeros() as usize)
        }
    }

    /// Indices of the set lanes in ascending order.
    pub fn iter_set(self) -> impl Iterator<Item = usize> {
        (0..N).filter(move |&i| self.bits >> i & 1 == 1)
    }

    /// Expands the mask into integer lanes: all bits one where set, zero elsewhere.
    ///
    /// This is the encoding blend instructions consume; registers use the
    /// same conversion internally to drive `select`.
    pub fn to_lanes<U>(self) -> SimdVec<U, N>
    where
        U: IntElement + Resolve<N>,
    {
        SimdVec::from_fn(|i| {
            if self.bits >> i & 1 == 1 {
                U::all_ones()
            } else {
                U::ZERO
            }
        })
    }

    /// Collapses integer lanes into a mask: a lane is set when its sign bit is.
    ///
    /// Inverse of [`to_lanes`](Self::to_lanes) for all-ones / all-zeros lanes,
    /// and the rule `blendv`-style instructions apply to any other pattern.
    pub fn from_lanes<U>(lanes: SimdVec<U, N>) -> Self
    where
        U: IntElement + Resolve<N>,
    {
        let top = U::ONE.lane_shl(U::KIND.bits() as u32 - 1);
        let bits = lanes
            .to_array()
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, &lane)| {
                acc | (((lane.lane_and(top) != U::ZERO) as u64) << i)
            });
        Mask { bits }
    }
}

impl<const N: usize> Default for Mask<N> {
    fn default() -> Self {
        Self::none_set()
    }
}

impl<const N: usize> fmt::Debug for Mask<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Mask").field(&self.to_array()).finish()
    }
}

impl<const N: usize> From<[bool; N]> for Mask<N> {
    fn from(lanes: [bool; N]) -> Self {
        Self::from_array(lanes)
    }
}

impl<const N: usize> From<bool> for Mask<N> {
    fn from(value: bool) -> Self {
        Self::splat(value)
    }
}

macro_rules! mask_binary_op {
    ($($trait:ident::$method:ident, $assign:ident::$assign_method:ident => $op:tt;)*) => {
        $(
            impl<const N: usize> $trait for Mask<N> {
                type Output = Self;

                #[inline(always)]
                fn $method(self, rhs: Self) -> Self {
                    Mask { bits: self.bits $op rhs.bits }
                }
            }

            impl<const N: usize> $assign for Mask<N> {
                #[inline(always)]
                fn $assign_method(&mut self, rhs: Self) {
                    self.bits = self.bits $op rhs.bits;
                }
            }
        )*
    };
}

mask_binary_op! {
    BitAnd::bitand, BitAndAssign::bitand_assign => &;
    BitOr::bitor, BitOrAssign::bitor_assign => |;
    BitXor::bitxor, BitXorAssign::bitxor_assign => ^;
}

impl<const N: usize> Not for Mask<N> {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Mask {
            bits: !self.bits & Self::VALID,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LaneError;

    mod construction_tests {
        use super::*;

        #[test]
        fn test_from_array_round_trip() {
            let lanes = [true, false, true, true, false, false, true, false];
            let mask = Mask::from_array(lanes);
            assert_eq!(mask.to_array(), lanes);
            assert_eq!(mask.bits(), 0b0100_1101);
        }

        #[test]
        fn test_from_bits_drops_high_bits() {
            let mask = Mask::<4>::from_bits(u64::MAX);
            assert_eq!(mask.bits(), 0b1111);
            assert!(mask.all());
        }

        #[test]
        fn test_splat_and_default() {
            assert!(Mask::<16>::splat(true).all());
            assert!(Mask::<16>::splat(false).none());
            assert_eq!(Mask::<16>::default(), Mask::none_set());
            assert_eq!(Mask::<64>::all_set().bits(), u64::MAX);
        }

        #[test]
        fn test_constructors_agree_at_lane_count_limits() {
            assert_eq!(Mask::<1>::from_array([true]), Mask::<1>::all_set());
            assert_eq!(Mask::<1>::from_array([false]), Mask::<1>::none_set());
            assert_eq!(Mask::<64>::from_array([true; 64]), Mask::<64>::all_set());
            assert_eq!(Mask::<64>::from_array([false; 64]).bits(), 0);
            assert!(Mask::<64>::from_array([true; 64]).all());
            assert_eq!(Mask::<64>::LANES, MAX_LANES);
        }
    }

    mod lane_access_tests {
        use super::*;

        #[test]
        fn test_set_and_test() {
            let mut mask = Mask::<8>::none_set();
            mask.set(3, true).unwrap().set(5, true).unwrap();
            assert!(mask.test(3).unwrap());
            assert!(!mask.test(4).unwrap());
            mask.set(3, false).unwrap();
            assert_eq!(mask.iter_set().collect::<Vec<_>>(), vec![5]);
            assert_eq!(mask.last_set(), Some(5));
        }

        #[test]
        fn test_out_of_range_lane() {
            let mut mask = Mask::<4>::all_set();
            assert_eq!(
                mask.test(4),
                Err(LaneError::IndexOutOfRange { index: 4, lanes: 4 })
            );
            assert!(mask.set(9, false).is_err());
            assert!(mask.all());
        }
    }

    mod logic_tests {
        use super::*;

        #[test]
        fn test_bit_ops() {
            let a = Mask::from_array([true, true, false, false]);
            let b = Mask::from_array([true, false, true, false]);
            assert_eq!((a & b).to_array(), [true, false, false, false]);
            assert_eq!((a | b).to_array(), [true, true, true, false]);
            assert_eq!((a ^ b).to_array(), [false, true, true, false]);
            assert_eq!((!a).to_array(), [false, false, true, true]);
            assert_eq!((!a).count(), 2);
        }

        #[test]
        fn test_not_stays_within_lanes() {
            let mask = !Mask::<2>::none_set();
            assert_eq!(mask.bits(), 0b11);
            assert!(mask.all());
        }
    }

    mod encoding_tests {
        use super::*;

        #[test]
        fn test_to_lanes_uses_all_ones() {
            let mask = Mask::from_array([true, false, false, true]);
            assert_eq!(mask.to_lanes::<i32>().to_array(), [-1, 0, 0, -1]);
            assert_eq!(mask.to_lanes::<u8>().to_array(), [0xff, 0, 0, 0xff]);
        }

        #[test]
        fn test_from_lanes_reads_sign_bit() {
            let lanes = SimdVec::<u32, 4>::from_array([0x8000_0000, 1, u32::MAX, 0x7fff_ffff]);
            assert_eq!(
                Mask::from_lanes(lanes).to_array(),
                [true, false, true, false]
            );
        }

        #[test]
        fn test_lane_encoding_round_trip() {
            let mask = Mask::<8>::from_bits(0b1010_0110);
            assert_eq!(Mask::from_lanes(mask.to_lanes::<i64>()), mask);
            assert_eq!(Mask::from_lanes(mask.to_lanes::<u16>()), mask);
        }
    }
}
