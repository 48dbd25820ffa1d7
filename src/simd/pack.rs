//! Moving lanes between an `N`-lane vector and its two `N / 2`-lane halves.
//!
//! The low half holds lanes `0..N / 2` and the high half lanes `N / 2..N`, the
//! same concatenation order composite registers use.

use super::resolve::Resolve;
use super::vector::SimdVec;

/// The half-width companion of a vector type.
///
/// Implemented for every lane count above one, so `SimdVec<T, 1>` is the only
/// vector type without a half.
pub trait HalfLength {
    type Half;
}

macro_rules! half_length {
    ($($n:literal => $h:literal),* $(,)?) => {
        $(
            impl<T> HalfLength for SimdVec<T, $n>
            where
                T: Resolve<$n> + Resolve<$h>,
            {
                type Half = SimdVec<T, $h>;
            }

            impl<T> SimdVec<T, $n>
            where
                T: Resolve<$n> + Resolve<$h>,
            {
                /// Concatenates two halves: `lo` fills the low lanes, `hi` the high lanes.
                #[inline(always)]
                pub fn pack(lo: SimdVec<T, $h>, hi: SimdVec<T, $h>) -> Self {
                    let mut lanes = [T::ZERO; $n];
                    lanes[..$h].copy_from_slice(&lo.to_array());
                    lanes[$h..].copy_from_slice(&hi.to_array());
                    Self::from_array(lanes)
                }

                /// Splits into `(lo, hi)`; inverse of [`pack`](Self::pack).
                #[inline(always)]
                pub fn unpack(self) -> (SimdVec<T, $h>, SimdVec<T, $h>) {
                    let lanes = self.to_array();
                    (
                        SimdVec::from_fn(|i| lanes[i]),
                        SimdVec::from_fn(|i| lanes[$h + i]),
                    )
                }

                /// A copy of `self` with the low half replaced by `lo`.
                #[inline(always)]
                pub fn pack_lo(self, lo: SimdVec<T, $h>) -> Self {
                    Self::pack(lo, self.unpack_hi())
                }

                /// A copy of `self` with the high half replaced by `hi`.
                #[inline(always)]
                pub fn pack_hi(self, hi: SimdVec<T, $h>) -> Self {
                    Self::pack(self.unpack_lo(), hi)
                }

                #[inline(always)]
                pub fn unpack_lo(self) -> SimdVec<T, $h> {
                    self.unpack().0
                }

                #[inline(always)]
                pub fn unpack_hi(self) -> SimdVec<T, $h> {
                    self.unpack().1
                }
            }
        )*
    };
}

half_length!(2 => 1, 4 => 2, 8 => 4, 16 => 8, 32 => 16, 64 => 32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack() {
        let lo = SimdVec::<f32, 8>::from_fn(|i| i as f32);
        let hi = SimdVec::<f32, 8>::from_fn(|i| 100.0 + i as f32);
        let v = SimdVec::<f32, 16>::pack(lo, hi);
        assert_eq!(v.extract(7), Ok(7.0));
        assert_eq!(v.extract(8), Ok(100.0));
        assert_eq!(v.unpack(), (lo, hi));
    }

    #[test]
    fn test_replace_halves() {
        let v = SimdVec::<u32, 4>::from_array([1, 2, 3, 4]);
        let half = SimdVec::<u32, 2>::from_array([9, 8]);
        assert_eq!(v.pack_lo(half).to_array(), [9, 8, 3, 4]);
        assert_eq!(v.pack_hi(half).to_array(), [1, 2, 9, 8]);
        assert_eq!(v.unpack_lo().to_array(), [1, 2]);
        assert_eq!(v.unpack_hi().to_array(), [3, 4]);
    }

    #[test]
    fn test_widest_and_narrowest() {
        let v = SimdVec::<i8, 64>::from_fn(|i| i as i8);
        let (lo, hi) = v.unpack();
        assert_eq!(hi.extract(31), Ok(63));
        assert_eq!(SimdVec::<i8, 64>::pack(lo, hi), v);

        let pair = SimdVec::<f64, 2>::from_array([1.5, -2.5]);
        assert_eq!(pair.unpack_hi().to_array(), [-2.5]);
    }

    #[test]
    fn test_half_length_companion() {
        fn halve<V: HalfLength>(_: V) -> std::marker::PhantomData<V::Half> {
            std::marker::PhantomData
        }
        let _: std::marker::PhantomData<SimdVec<u16, 16>> = halve(SimdVec::<u16, 32>::zero());
    }
}
