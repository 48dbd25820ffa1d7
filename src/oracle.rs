//! Scalar sine/cosine reference and ULP measurement.
//!
//! [`sincos`] evaluates the same reduction and polynomials as the vector
//! kernel one value at a time, so vector results can be checked lane by lane,
//! and the report binary can time the scalar path against the vector one.

use crate::element::FloatElement;

/// Sine and cosine of `x`.
///
/// `x` is reduced by the nearest even multiple of `pi/4` with a three-part
/// Cody-Waite split, then both polynomials are evaluated on the remainder.
///
/// ```rust
/// let (s, c) = lanefold::oracle::sincos(0.5f64);
/// assert!((s - 0.5f64.sin()).abs() < 1e-15);
/// assert!((c - 0.5f64.cos()).abs() < 1e-15);
/// ```
pub fn sincos<T: FloatElement>(x: T) -> (T, T) {
    let ax = x.abs();

    let mut j = (ax * T::FOUR_OVER_PI).trunc();
    if j - (j * T::from_f64(0.5)).floor() * T::from_f64(2.0) != T::ZERO {
        j = j + T::ONE;
    }

    let z = ((ax - j * T::DP1) - j * T::DP2) - j * T::DP3;
    let zz = z * z;

    let mut s = z + z * zz * horner(zz, T::SIN_COEFFS);
    let mut c = T::ONE - zz * T::from_f64(0.5) + zz * zz * horner(zz, T::COS_COEFFS);

    let octant = j - (j * T::from_f64(0.125)).floor() * T::from_f64(8.0);
    let octant = octant.to_u8().unwrap_or(0);

    if octant == 2 || octant == 6 {
        std::mem::swap(&mut s, &mut c);
    }
    if octant == 2 || octant == 4 {
        c = -c;
    }
    if octant == 4 || octant == 6 {
        s = -s;
    }
    if x < T::ZERO {
        s = -s;
    }
    (s, c)
}

fn horner<T: FloatElement>(x: T, coeffs: &[T]) -> T {
    match coeffs.split_first() {
        Some((&first, rest)) => rest.iter().fold(first, |acc, &c| acc * x + c),
        None => T::ZERO,
    }
}

macro_rules! ulps_fn {
    ($(#[$doc:meta])* $name:ident($t:ty, $bits:ty, $signed:ty)) => {
        $(#[$doc])*
        pub fn $name(a: $t, b: $t) -> u64 {
            if a.is_nan() || b.is_nan() {
                return if a.is_nan() && b.is_nan() { 0 } else { u64::MAX };
            }
            // Map the sign-magnitude encoding onto a monotonic integer line.
            let ordered = |v: $t| -> i128 {
                let bits = v.to_bits();
                let magnitude = (bits & <$bits>::MAX >> 1) as i128;
                if (bits as $signed) < 0 {
                    -magnitude
                } else {
                    magnitude
                }
            };
            (ordered(a) - ordered(b)).unsigned_abs() as u64
        }
    };
}

ulps_fn! {
    /// Number of representable `f32` values between `a` and `b`.
    ///
    /// `+0.0` and `-0.0` are zero apart; two NaNs are zero apart and a NaN is
    /// `u64::MAX` away from any number.
    ulps_f32(f32, u32, i32)
}

ulps_fn! {
    /// Number of representable `f64` values between `a` and `b`, with the rules of
    /// [`ulps_f32`].
    ulps_f64(f64, u64, i64)
}

/// Largest and mean ULP distance between two equally long result sets.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UlpStats {
    pub max: u64,
    pub mean: f64,
}

impl UlpStats {
    /// Accumulates per-element distances from `distance(actual[i], expected[i])`.
    pub fn collect<T: Copy>(actual: &[T], expected: &[T], distance: fn(T, T) -> u64) -> Self {
        let (max, sum, count) = actual.iter().zip(expected).fold(
            (0u64, 0f64, 0usize),
            |(max, sum, count), (&a, &e)| {
                let d = distance(a, e);
                (max.max(d), sum + d as f64, count + 1)
            },
        );
        UlpStats {
            max,
            mean: if count == 0 { 0.0 } else { sum / count as f64 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod sincos_tests {
        use super::*;

        #[test]
        fn test_matches_std_f64() {
            for i in -2000..2000 {
                let x = i as f64 * 0.0173;
                let (s, c) = sincos(x);
                assert!((s - x.sin()).abs() < 1e-15, "sin({x})");
                assert!((c - x.cos()).abs() < 1e-15, "cos({x})");
            }
        }

        #[test]
        fn test_matches_std_f32() {
            for i in -2000..2000 {
                let x = i as f32 * 0.0173;
                let (s, c) = sincos(x);
                assert!(ulps_f32(s, x.sin()) <= 4 || (s - x.sin()).abs() < 1e-7, "sin({x})");
                assert!(ulps_f32(c, x.cos()) <= 4 || (c - x.cos()).abs() < 1e-7, "cos({x})");
            }
        }

        #[test]
        fn test_quadrant_signs() {
            let quarter = std::f64::consts::FRAC_PI_2;
            let expected = [(1.0, 1.0), (1.0, -1.0), (-1.0, -1.0), (-1.0, 1.0)];
            for (k, &(sin_sign, cos_sign)) in expected.iter().enumerate() {
                let (s, c) = sincos(quarter * k as f64 + 0.3);
                assert_eq!(s.signum(), sin_sign, "quadrant {k}");
                assert_eq!(c.signum(), cos_sign, "quadrant {k}");
            }
        }
    }

    mod ulp_tests {
        use super::*;

        #[test]
        fn test_adjacent_values() {
            let x = 1.0f32;
            let next = f32::from_bits(x.to_bits() + 1);
            assert_eq!(ulps_f32(x, next), 1);
            assert_eq!(ulps_f32(next, x), 1);
            assert_eq!(ulps_f64(1.0, 1.0 + f64::EPSILON * 3.0), 3);
        }

        #[test]
        fn test_across_zero() {
            assert_eq!(ulps_f32(0.0, -0.0), 0);
            let tiny = f32::from_bits(1);
            assert_eq!(ulps_f32(tiny, -tiny), 2);
            assert_eq!(ulps_f64(f64::MAX, -f64::MAX), 2 * (f64::MAX.to_bits() as u64));
        }

        #[test]
        fn test_nan() {
            assert_eq!(ulps_f64(f64::NAN, f64::NAN), 0);
            assert_eq!(ulps_f64(f64::NAN, 1.0), u64::MAX);
        }

        #[test]
        fn test_stats() {
            let stats = UlpStats::collect(&[1.0f32, 2.0, 3.0], &[1.0, 2.0, 3.0], ulps_f32);
            assert_eq!(stats, UlpStats { max: 0, mean: 0.0 });
            let off = f32::from_bits(2.0f32.to_bits() + 4);
            let stats = UlpStats::collect(&[1.0f32, off], &[1.0, 2.0], ulps_f32);
            assert_eq!(stats.max, 4);
            assert_eq!(stats.mean, 2.0);
        }
    }
}
