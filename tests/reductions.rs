//! Horizontal reductions: identities, agreement with scalar folds, lane indices.

use lanefold::{Mask, SimdVec};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test_log::test]
fn test_integer_reductions_match_scalar_folds() {
    let mut rng = StdRng::seed_from_u64(401);
    for _ in 0..100 {
        let v = SimdVec::<u32, 32>::from_fn(|_| rng.random());
        let lanes = v.to_array();
        assert_eq!(v.hadd(), lanes.iter().fold(0u32, |a, &b| a.wrapping_add(b)));
        assert_eq!(v.hmul(), lanes.iter().fold(1u32, |a, &b| a.wrapping_mul(b)));
        assert_eq!(v.hmin(), *lanes.iter().min().unwrap());
        assert_eq!(v.hmax(), *lanes.iter().max().unwrap());
        assert_eq!(v.hand(), lanes.iter().fold(u32::MAX, |a, &b| a & b));
        assert_eq!(v.hor(), lanes.iter().fold(0, |a, &b| a | b));
        assert_eq!(v.hxor(), lanes.iter().fold(0, |a, &b| a ^ b));
    }
}

#[test]
fn test_identities_for_empty_masks() {
    let none = Mask::<16>::none_set();
    let f = SimdVec::<f32, 16>::splat(3.0);
    assert_eq!(f.hadd_masked(none), 0.0);
    assert_eq!(f.hmul_masked(none), 1.0);
    assert_eq!(f.hmin_masked(none), f32::INFINITY);
    assert_eq!(f.hmax_masked(none), f32::NEG_INFINITY);

    let i = SimdVec::<i16, 16>::splat(3);
    assert_eq!(i.hmin_masked(none), i16::MAX);
    assert_eq!(i.hmax_masked(none), i16::MIN);
    assert_eq!(i.hand_masked(none), -1);
    assert_eq!(i.hor_masked(none), 0);
    assert_eq!(i.hxor_masked(none), 0);
}

#[test]
fn test_single_lane_vectors_reduce_to_their_lane() {
    let v = SimdVec::<f64, 1>::splat(-4.25);
    assert_eq!(v.hadd(), -4.25);
    assert_eq!(v.hmin(), -4.25);
    assert_eq!(v.imax(), 0);
}

#[test]
fn test_imin_imax() {
    let v = SimdVec::<f32, 8>::from_array([3.0, -1.0, f32::NAN, -1.0, 7.0, 7.0, 0.0, 2.0]);
    assert_eq!(v.imin(), 1);
    assert_eq!(v.imax(), 4);
    assert_eq!(v.imin_masked(Mask::from_bits(0b1111_0100)), Some(6));
    assert_eq!(v.imax_masked(Mask::from_bits(0b0000_0100)), None);
    assert_eq!(SimdVec::<f32, 4>::splat(f32::NAN).imin(), 0);
}

#[test_log::test]
fn test_float_sum_of_exact_values() {
    let v = SimdVec::<f64, 64>::from_fn(|i| i as f64 * 0.5);
    assert_eq!(v.hadd(), (0..64).map(|i| i as f64 * 0.5).sum::<f64>());
    let w = SimdVec::<f32, 16>::from_fn(|i| if i % 2 == 0 { 2.0 } else { 0.5 });
    assert_eq!(w.hmul(), 1.0);
}

#[test_log::test]
fn test_nan_lanes_do_not_change_hmin_hmax() {
    let v = SimdVec::<f32, 32>::from_fn(|i| match i {
        0..=15 => 1.0,
        16 => f32::NAN,
        _ => 5.0,
    });
    assert_eq!(v.hmin(), 1.0);
    assert_eq!(v.hmax(), 5.0);

    let w = SimdVec::<f32, 16>::from_fn(|i| if i == 8 { f32::NAN } else { i as f32 });
    assert_eq!(w.hmin(), 0.0);
    assert_eq!(w.hmax(), 15.0);

    let all_nan = SimdVec::<f64, 8>::splat(f64::NAN);
    assert_eq!(all_nan.hmin(), f64::INFINITY);
    assert_eq!(all_nan.hmax(), f64::NEG_INFINITY);
    assert_eq!(all_nan.hmin_masked(Mask::from_bits(0b11)), f64::INFINITY);
}
