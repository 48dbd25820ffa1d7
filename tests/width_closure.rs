//! Every `(element, lanes)` pair resolves, its companions resolve, and the chosen
//! representation follows the backend's native widths.

use lanefold::simd::register::Shape;
use lanefold::simd::{Companions, HalfLength, Resolve};
use lanefold::{Capabilities, Element, Mask, SimdVec, Swizzle};

fn expected_shape(element: lanefold::ElementType, lanes: usize) -> (bool, bool, bool) {
    let caps = Capabilities::active();
    let has_native = !caps.native_widths(element).is_empty();
    let native = caps.is_native(element, lanes);
    let composite = !native && has_native && lanes > 1;
    let emulated = !native && !composite;
    (native, composite, emulated)
}

fn check_shape<T: Resolve<N>, const N: usize>() {
    let shape: Shape = SimdVec::<T, N>::shape();
    assert_eq!(shape.lanes(), N, "{}", SimdVec::<T, N>::KEY);
    let (native, composite, emulated) = expected_shape(T::KIND, N);
    assert_eq!(shape.is_native(), native, "{} resolved to {shape}", SimdVec::<T, N>::KEY);
    assert_eq!(shape.is_composite(), composite, "{} resolved to {shape}", SimdVec::<T, N>::KEY);
    if emulated {
        assert!(shape.is_emulated() && shape.leaves == 1, "{} resolved to {shape}", SimdVec::<T, N>::KEY);
    }
    assert_eq!(SimdVec::<T, N>::LANES, N);
}

/// Compiles only if the companions of `SimdVec<T, N>` are the expected types.
fn companions<T, const N: usize>()
where
    T: Resolve<N>,
    T::Unsigned: Resolve<N>,
    T::Signed: Resolve<N>,
    SimdVec<T, N>: Companions<
        Unsigned = SimdVec<T::Unsigned, N>,
        Signed = SimdVec<T::Signed, N>,
        Mask = Mask<N>,
        Swizzle = Swizzle<N>,
    >,
{
}

fn halves<T, const N: usize, const H: usize>()
where
    T: Resolve<N> + Resolve<H>,
    SimdVec<T, N>: HalfLength<Half = SimdVec<T, H>>,
{
}

macro_rules! closure_for {
    ($($name:ident: $t:ty),* $(,)?) => {
        $(
            #[test_log::test]
            fn $name() {
                check_shape::<$t, 1>();
                check_shape::<$t, 2>();
                check_shape::<$t, 4>();
                check_shape::<$t, 8>();
                check_shape::<$t, 16>();
                check_shape::<$t, 32>();
                check_shape::<$t, 64>();

                companions::<$t, 1>();
                companions::<$t, 4>();
                companions::<$t, 64>();

                halves::<$t, 2, 1>();
                halves::<$t, 16, 8>();
                halves::<$t, 64, 32>();

                let v = SimdVec::<$t, 64>::splat(<$t as Element>::ONE);
                let (lo, hi) = v.unpack();
                assert_eq!(SimdVec::<$t, 64>::pack(lo, hi), v);
                assert_eq!(v.to_bits().to_array(), [<$t as Element>::ONE.lane_bits(); 64]);
            }
        )*
    };
}

closure_for!(
    test_f32: f32,
    test_f64: f64,
    test_i8: i8,
    test_i16: i16,
    test_i32: i32,
    test_i64: i64,
    test_u8: u8,
    test_u16: u16,
    test_u32: u32,
    test_u64: u64,
);

#[test]
fn test_vector_keys() {
    assert_eq!(SimdVec::<f32, 16>::KEY.to_string(), "f32x16");
    assert_eq!(SimdVec::<u8, 1>::KEY.to_string(), "u8x1");
    assert_eq!(SimdVec::<i64, 8>::KEY.lanes, 8);
}

#[test]
fn test_masks_are_shared_across_element_types() {
    let floats = SimdVec::<f32, 8>::from_fn(|i| i as f32);
    let ints = SimdVec::<i64, 8>::from_fn(|i| -(i as i64));
    let mask: Mask<8> = floats.cmp_gt(3.5f32);
    assert_eq!(ints.blend(mask, 0i64).to_array(), [0, -1, -2, -3, 0, 0, 0, 0]);
}
