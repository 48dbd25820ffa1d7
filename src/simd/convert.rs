//! Conversions between vectors of the same lane count.
//!
//! Every conversion is defined lane by lane with Rust `as` semantics, so a
//! conversion never leaves lanes unspecified:
//!
//! | conversion | rule |
//! |------------|------|
//! | float to int (`trunc_to_int`, `trunc_to_uint`) | toward zero, saturating at the target range, NaN to 0 |
//! | int to float (`to_float`) | round to nearest, exact within the mantissa |
//! | signed/unsigned (`reinterpret_*`) | bit pattern unchanged |
//! | `promote` | exact |
//! | `degrade` | `f64` to `f32` rounds to nearest; integers keep the low bits |

use num::traits::AsPrimitive;

use crate::element::{Degrade, Element, FloatElement, IntElement, Promote};

use super::register::LaneRegister;
use super::resolve::Resolve;
use super::vector::SimdVec;

impl<T: Resolve<N>, const N: usize> SimdVec<T, N> {
    #[inline(always)]
    fn map_into<U: Resolve<N>>(self, f: impl Fn(T) -> U) -> SimdVec<U, N> {
        SimdVec::from_reg(self.reg.convert_lanes(f))
    }

    /// `f` must keep every lane's bits.
    #[inline(always)]
    fn bitcast_into<U: Resolve<N>>(self, f: impl Fn(T) -> U) -> SimdVec<U, N> {
        SimdVec::from_reg(self.reg.bitcast_lanes(f))
    }

    /// Lane-wise `as` cast to any element type.
    #[inline(always)]
    pub fn convert<U>(self) -> SimdVec<U, N>
    where
        T: AsPrimitive<U>,
        U: Resolve<N>,
    {
        self.map_into(|lane| lane.as_())
    }

    /// Raw lane bits as the unsigned type of the same width.
    #[inline(always)]
    pub fn to_bits(self) -> SimdVec<T::Unsigned, N>
    where
        T::Unsigned: Resolve<N>,
    {
        self.bitcast_into(Element::lane_bits)
    }

    /// Inverse of [`to_bits`](Self::to_bits).
    #[inline(always)]
    pub fn from_bits(bits: SimdVec<T::Unsigned, N>) -> Self
    where
        T::Unsigned: Resolve<N>,
    {
        bits.bitcast_into(T::from_lane_bits)
    }

    /// Widens every lane to the next larger type of the same kind.
    #[inline(always)]
    pub fn promote(self) -> SimdVec<T::Wider, N>
    where
        T: Promote,
        T::Wider: Resolve<N>,
    {
        self.map_into(Promote::promote_lane)
    }

    /// Narrows every lane to the next smaller type of the same kind.
    #[inline(always)]
    pub fn degrade(self) -> SimdVec<T::Narrower, N>
    where
        T: Degrade,
        T::Narrower: Resolve<N>,
    {
        self.map_into(Degrade::degrade_lane)
    }
}

impl<T, const N: usize> SimdVec<T, N>
where
    T: FloatElement + Resolve<N>,
{
    /// Truncates toward zero into the signed integer type of the same width.
    ///
    /// `2.9` becomes `2` and `-2.9` becomes `-2`. Out-of-range lanes saturate
    /// and NaN lanes become `0`.
    #[inline(always)]
    pub fn trunc_to_int(self) -> SimdVec<T::Signed, N>
    where
        T::Signed: Resolve<N>,
    {
        self.map_into(Element::lane_as_signed)
    }

    /// Truncates toward zero into the unsigned integer type of the same width;
    /// negative lanes become `0`.
    #[inline(always)]
    pub fn trunc_to_uint(self) -> SimdVec<T::Unsigned, N>
    where
        T::Unsigned: Resolve<N>,
    {
        self.map_into(Element::lane_as_unsigned)
    }
}

impl<T, const N: usize> SimdVec<T, N>
where
    T: IntElement + Resolve<N>,
{
    /// Converts to the float type lanes of this width convert into
    /// (`f32` up to 32 bits, `f64` for 64-bit lanes), rounding to nearest.
    #[inline(always)]
    pub fn to_float(self) -> SimdVec<T::Float, N>
    where
        T::Float: Resolve<N>,
    {
        self.map_into(Element::lane_as_float)
    }

    /// Same bits, read as the signed type of this width.
    #[inline(always)]
    pub fn reinterpret_signed(self) -> SimdVec<T::Signed, N>
    where
        T::Signed: Resolve<N>,
    {
        self.bitcast_into(Element::lane_as_signed)
    }

    /// Same bits, read as the unsigned type of this width.
    #[inline(always)]
    pub fn reinterpret_unsigned(self) -> SimdVec<T::Unsigned, N>
    where
        T::Unsigned: Resolve<N>,
    {
        self.bitcast_into(Element::lane_as_unsigned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod float_to_int_tests {
        use super::*;

        #[test]
        fn test_trunc_boundaries() {
            let v = SimdVec::<f32, 8>::from_array([2.9, -2.9, 2.0, -0.5, 0.0, 1e10, f32::NAN, -1e10]);
            assert_eq!(
                v.trunc_to_int().to_array(),
                [2, -2, 2, 0, 0, i32::MAX, 0, i32::MIN]
            );
            assert_eq!(
                v.trunc_to_uint().to_array(),
                [2, 0, 2, 0, 0, u32::MAX, 0, 0]
            );
        }

        #[test]
        fn test_f64_trunc_to_i64() {
            let v = SimdVec::<f64, 4>::from_array([-7.99, 7.99, 4503599627370497.0, -1.0]);
            assert_eq!(
                v.trunc_to_int().to_array(),
                [-7, 7, 4_503_599_627_370_497, -1]
            );
        }
    }

    mod int_to_float_tests {
        use super::*;

        #[test]
        fn test_round_trip_within_mantissa() {
            let v = SimdVec::<i32, 16>::from_fn(|i| (i as i32 - 8) * 1_048_573);
            assert_eq!(v.to_float().trunc_to_int(), v);

            let big = SimdVec::<i32, 4>::from_array([1 << 24, -(1 << 24), 16_777_215, 0]);
            assert_eq!(big.to_float().trunc_to_int(), big);
        }

        #[test]
        fn test_unsigned_and_wide_lanes() {
            let u = SimdVec::<u32, 4>::from_array([0, 1, u32::MAX, 1 << 31]);
            assert_eq!(
                u.to_float().to_array(),
                [0.0, 1.0, 4_294_967_296.0, 2_147_483_648.0]
            );
            let w = SimdVec::<i64, 2>::from_array([-(1 << 52), 3]);
            assert_eq!(w.to_float().to_array(), [-(2f64.powi(52)), 3.0]);
        }
    }

    mod reinterpret_tests {
        use super::*;

        #[test]
        fn test_signed_unsigned_keep_bits() {
            let s = SimdVec::<i16, 4>::from_array([-1, 0, i16::MIN, 5]);
            let u = s.reinterpret_unsigned();
            assert_eq!(u.to_array(), [0xffff, 0, 0x8000, 5]);
            assert_eq!(u.reinterpret_signed(), s);
        }

        #[test]
        fn test_bit_casts_keep_every_lane() {
            let v = SimdVec::<f32, 64>::from_fn(|i| {
                if i % 3 == 0 {
                    f32::from_bits(0x7fc0_0000 | i as u32)
                } else {
                    i as f32 - 20.5
                }
            });
            let bits = v.to_bits();
            let lanes = v.to_array();
            assert_eq!(bits.to_array(), std::array::from_fn(|i| lanes[i].to_bits()));
            assert_eq!(SimdVec::<f32, 64>::from_bits(bits).to_bits(), bits);

            let wide = SimdVec::<i64, 8>::from_fn(|i| i64::MIN + i as i64);
            assert_eq!(wide.reinterpret_unsigned().reinterpret_signed(), wide);
        }

        #[test]
        fn test_layout_sharing_between_same_width_registers() {
            use crate::simd::register::same_layout;
            use crate::simd::resolve::Reg;

            assert!(same_layout::<Reg<i16, 8>, Reg<u16, 8>>());
            assert!(!same_layout::<Reg<f32, 8>, Reg<f64, 8>>());
            if <Reg<f32, 16> as LaneRegister>::shape() == <Reg<u32, 16> as LaneRegister>::shape() {
                assert!(same_layout::<Reg<f32, 16>, Reg<u32, 16>>());
            }
        }

        #[test]
        fn test_float_bits() {
            let f = SimdVec::<f32, 4>::from_array([1.0, -0.0, f32::INFINITY, 0.5]);
            let bits = f.to_bits();
            assert_eq!(
                bits.to_array(),
                [0x3f80_0000, 0x8000_0000, 0x7f80_0000, 0x3f00_0000]
            );
            assert_eq!(SimdVec::<f32, 4>::from_bits(bits).to_bits(), bits);
        }
    }

    mod width_tests {
        use super::*;

        #[test]
        fn test_promote_degrade() {
            let f = SimdVec::<f32, 8>::from_fn(|i| i as f32 * 0.1);
            let d = f.promote();
            assert_eq!(d.to_array(), std::array::from_fn(|i| (i as f32 * 0.1) as f64));
            assert_eq!(d.degrade(), f);

            let narrow = SimdVec::<u16, 4>::from_array([0x1234, 0xffff, 0, 1]);
            assert_eq!(narrow.promote().to_array(), [0x1234u32, 0xffff, 0, 1]);
            assert_eq!(
                SimdVec::<u32, 4>::from_array([0x0001_2345, 7, 0, 0xffff])
                    .degrade()
                    .to_array(),
                [0x2345u16, 7, 0, 0xffff]
            );
        }

        #[test]
        fn test_degrade_rounds_to_nearest() {
            let d = SimdVec::<f64, 2>::from_array([1.0 + 2f64.powi(-24), 1.0 + 3.0 * 2f64.powi(-24)]);
            assert_eq!(d.degrade().to_array(), [1.0, 1.0 + 2f32.powi(-22)]);
        }

        #[test]
        fn test_convert_generic() {
            let v = SimdVec::<i32, 4>::from_array([-1, 300, 65, 0]);
            assert_eq!(v.convert::<u8>().to_array(), [255, 44, 65, 0]);
            assert_eq!(v.convert::<f64>().to_array(), [-1.0, 300.0, 65.0, 0.0]);
        }
    }
}
