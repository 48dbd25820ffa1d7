//! Width-resolution table.
//!
//! `Resolve<N>` maps an element type and a lane count to exactly one register
//! representation. Each backend contributes a table of native widths; every
//! other width of a natively supported element is a [`Composite`] of two
//! half-width registers resolved by the same table, down to a one-lane
//! [`Emulated`] leaf. Element types without any native register on the active
//! backend are a single scalar-lane register at every width.
//!
//! Only lane counts 1, 2, 4, 8, 16, 32 and 64 have entries, so an unsupported
//! width is a compile error rather than a runtime condition.

#[allow(unused_imports)]
use super::composite::Composite;
use super::emulated::Emulated;
use super::register::LaneRegister;
use crate::element::Element;

/// Selects the register representation for `N` lanes of `Self`.
pub trait Resolve<const N: usize>: Element {
    type Register: LaneRegister<Scalar = Self>;
}

/// The register that backs `N` lanes of `T`.
pub type Reg<T, const N: usize> = <T as Resolve<N>>::Register;

/// One table row per element type: `lanes: native(Register) | split | emulate`.
macro_rules! resolve_table {
    ($($t:ty => { $($n:literal: $how:ident $(($reg:ty))?),* $(,)? })*) => {
        $($(resolve_table!(@one $t, $n, $how $(($reg))?);)*)*
    };
    (@one $t:ty, $n:literal, native($reg:ty)) => {
        impl Resolve<$n> for $t {
            type Register = $reg;
        }
    };
    (@one $t:ty, $n:literal, split) => {
        impl Resolve<$n> for $t {
            type Register = Composite<<$t as Resolve<{ $n / 2 }>>::Register>;
        }
    };
    (@one $t:ty, $n:literal, emulate) => {
        impl Resolve<$n> for $t {
            type Register = Emulated<$t, $n>;
        }
    };
}

/// Element types with no native register: one scalar-lane register per width.
macro_rules! emulate_everywhere {
    ($($t:ty),*) => {
        resolve_table! {
            $($t => { 1: emulate, 2: emulate, 4: emulate, 8: emulate, 16: emulate, 32: emulate, 64: emulate })*
        }
    };
}

emulate_everywhere!(i8, i16, i64, u8, u16, u64);

#[cfg(avx512)]
mod table {
    use super::*;
    use crate::simd::x86::{avx, avx512, sse};

    resolve_table! {
        f32 => {
            1: emulate, 2: split, 4: native(sse::F32x4), 8: native(avx::F32x8),
            16: native(avx512::F32x16), 32: split, 64: split,
        }
        f64 => {
            1: emulate, 2: native(sse::F64x2), 4: native(avx::F64x4),
            8: native(avx512::F64x8), 16: split, 32: split, 64: split,
        }
        i32 => {
            1: emulate, 2: split, 4: native(avx::I32x4), 8: native(avx::I32x8),
            16: split, 32: split, 64: split,
        }
        u32 => {
            1: emulate, 2: split, 4: native(avx::U32x4), 8: native(avx::U32x8),
            16: split, 32: split, 64: split,
        }
    }
}

#[cfg(avx2)]
mod table {
    use super::*;
    use crate::simd::x86::{avx, sse};

    resolve_table! {
        f32 => {
            1: emulate, 2: split, 4: native(sse::F32x4), 8: native(avx::F32x8),
            16: split, 32: split, 64: split,
        }
        f64 => {
            1: emulate, 2: native(sse::F64x2), 4: native(avx::F64x4),
            8: split, 16: split, 32: split, 64: split,
        }
        i32 => {
            1: emulate, 2: split, 4: native(avx::I32x4), 8: native(avx::I32x8),
            16: split, 32: split, 64: split,
        }
        u32 => {
            1: emulate, 2: split, 4: native(avx::U32x4), 8: native(avx::U32x8),
            16: split, 32: split, 64: split,
        }
    }
}

#[cfg(sse)]
mod table {
    use super::*;
    use crate::simd::x86::sse;

    resolve_table! {
        f32 => {
            1: emulate, 2: split, 4: native(sse::F32x4),
            8: split, 16: split, 32: split, 64: split,
        }
        f64 => {
            1: emulate, 2: native(sse::F64x2),
            4: split, 8: split, 16: split, 32: split, 64: split,
        }
    }
    emulate_everywhere!(i32, u32);
}

#[cfg(neon)]
mod table {
    use super::*;
    use crate::simd::neon;

    resolve_table! {
        f32 => {
            1: emulate, 2: split, 4: native(neon::F32x4),
            8: split, 16: split, 32: split, 64: split,
        }
        f64 => {
            1: emulate, 2: native(neon::F64x2),
            4: split, 8: split, 16: split, 32: split, 64: split,
        }
    }
    emulate_everywhere!(i32, u32);
}

#[cfg(fallback)]
mod table {
    use super::*;

    emulate_everywhere!(f32, f64, i32, u32);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::Capabilities;
    use crate::element::ElementType;
    use crate::simd::register::Shape;

    fn shape_of<T: Resolve<N>, const N: usize>() -> Shape {
        <Reg<T, N> as LaneRegister>::shape()
    }

    mod table_tests {
        use super::*;

        #[test]
        fn test_every_width_keeps_its_lane_count() {
            assert_eq!(shape_of::<f32, 1>().lanes(), 1);
            assert_eq!(shape_of::<f32, 2>().lanes(), 2);
            assert_eq!(shape_of::<f32, 16>().lanes(), 16);
            assert_eq!(shape_of::<f64, 64>().lanes(), 64);
            assert_eq!(shape_of::<i32, 32>().lanes(), 32);
            assert_eq!(shape_of::<u8, 64>().lanes(), 64);
        }

        #[test]
        fn test_single_lane_is_emulated() {
            assert!(shape_of::<f32, 1>().is_emulated());
            assert!(shape_of::<f64, 1>().is_emulated());
            assert!(shape_of::<i32, 1>().is_emulated());
            assert!(shape_of::<u64, 1>().is_emulated());
        }

        #[test]
        fn test_non_native_elements_never_split() {
            assert!(shape_of::<i8, 64>().is_emulated());
            assert!(shape_of::<u16, 32>().is_emulated());
            assert!(shape_of::<i64, 8>().is_emulated());
            assert!(!shape_of::<u64, 16>().is_composite());
        }

        #[test]
        fn test_native_widths_match_capabilities() {
            let caps = Capabilities::active();
            assert_eq!(shape_of::<f32, 4>().is_native(), caps.is_native(ElementType::F32, 4));
            assert_eq!(shape_of::<f32, 8>().is_native(), caps.is_native(ElementType::F32, 8));
            assert_eq!(shape_of::<f32, 16>().is_native(), caps.is_native(ElementType::F32, 16));
            assert_eq!(shape_of::<f64, 2>().is_native(), caps.is_native(ElementType::F64, 2));
            assert_eq!(shape_of::<f64, 8>().is_native(), caps.is_native(ElementType::F64, 8));
            assert_eq!(shape_of::<i32, 8>().is_native(), caps.is_native(ElementType::I32, 8));
            assert_eq!(shape_of::<u32, 4>().is_native(), caps.is_native(ElementType::U32, 4));
        }

        #[test]
        fn test_wide_float_vectors_split_down_to_the_widest_native() {
            let caps = Capabilities::active();
            let widest = caps
                .native_widths(ElementType::F32)
                .iter()
                .map(|bits| bits / 32)
                .max()
                .unwrap_or(1);
            let shape = shape_of::<f32, 64>();
            if widest > 1 {
                assert!(shape.is_composite());
                assert_eq!(shape.leaf_lanes, widest);
                assert_eq!(shape.leaves, 64 / widest);
            } else {
                assert!(shape.is_emulated());
            }
        }
    }
}
