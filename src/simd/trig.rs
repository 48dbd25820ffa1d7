//! Vector sine, cosine and tangent.
//!
//! Cody-Waite reduction to `[-pi/4, pi/4]` followed by one sine and one cosine
//! polynomial, the same evaluation as [`oracle::sincos`](crate::oracle::sincos)
//! performed on every lane at once. Plain multiplies and adds are used
//! throughout, so each lane matches the scalar oracle on every backend whether
//! or not the build enables `fma`.
//!
//! Accuracy degrades once `|x| * 4 / pi` no longer fits the mantissa
//! (about `1.3e7` for `f32`); infinite and NaN lanes produce NaN.

use crate::element::FloatElement;

use super::register::FloatRegister;
use super::resolve::{Reg, Resolve};
use super::vector::SimdVec;

impl<T, const N: usize> SimdVec<T, N>
where
    T: FloatElement + Resolve<N>,
    Reg<T, N>: FloatRegister,
{
    /// Horner evaluation, `coeffs` highest degree first.
    #[inline(always)]
    fn polynomial(x: Self, coeffs: &[T]) -> Self {
        match coeffs.split_first() {
            Some((&first, rest)) => rest
                .iter()
                .fold(Self::splat(first), |acc, &c| acc * x + Self::splat(c)),
            None => Self::zero(),
        }
    }

    /// Sine and cosine of every lane.
    ///
    /// ```rust
    /// use lanefold::simd::SimdVec;
    ///
    /// let x = SimdVec::<f64, 4>::from_array([0.0, 0.5, -2.0, 10.0]);
    /// let (s, c) = x.sincos();
    /// for ((s, c), x) in s.to_array().iter().zip(c.to_array()).zip(x.to_array()) {
    ///     assert!((s - x.sin()).abs() < 1e-15);
    ///     assert!((c - x.cos()).abs() < 1e-15);
    /// }
    /// ```
    pub fn sincos(self) -> (Self, Self) {
        let one = Self::splat(T::ONE);
        let half = Self::splat(T::from_f64(0.5));
        let two = Self::splat(T::from_f64(2.0));
        let eighth = Self::splat(T::from_f64(0.125));
        let eight = Self::splat(T::from_f64(8.0));

        let ax = self.abs();

        // Octant index, rounded up to even so z lands in [-pi/4, pi/4].
        let mut j = (ax * T::FOUR_OVER_PI).trunc();
        j += j - (j * half).floor() * two;

        let z = ((ax - j * T::DP1) - j * T::DP2) - j * T::DP3;
        let zz = z * z;

        let s = z + z * zz * Self::polynomial(zz, T::SIN_COEFFS);
        let c = one - zz * half + zz * zz * Self::polynomial(zz, T::COS_COEFFS);

        let octant = j - (j * eighth).floor() * eight;
        let at = |k: f64| octant.cmp_eq(T::from_f64(k));
        let (q1, q2, q3) = (at(2.0), at(4.0), at(6.0));

        let swap = q1 | q3;
        let (s, c) = (Self::select(swap, c, s), Self::select(swap, s, c));
        let c = c.neg_masked(q1 | q2);
        let s = s.neg_masked(q2 | q3);

        (s.neg_masked(self.cmp_lt(T::ZERO)), c)
    }

    pub fn sin(self) -> Self {
        self.sincos().0
    }

    pub fn cos(self) -> Self {
        self.sincos().1
    }

    /// `sin / cos`; lanes at odd multiples of `pi/2` give large finite values.
    pub fn tan(self) -> Self {
        let (s, c) = self.sincos();
        s / c
    }
}
