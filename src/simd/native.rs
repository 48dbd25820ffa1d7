//! Native leaf generators.
//!
//! Each hardware family provides an "intrinsic kit": a module of `unsafe fn`s with
//! one uniform signature per operation, operating on the raw register type. The
//! macros below turn a kit into a register wrapper implementing the register
//! traits, so every `(element, width)` leaf is generated from the same template
//! instead of being written out by hand.
//!
//! A float kit provides:
//! `splat, loadu, load, storeu, store, add, sub, mul, div, min, max, sqrt, rcp,
//! floor, ceil, round, trunc, abs, neg, fmadd, cmp_eq, cmp_ne, cmp_lt, cmp_le,
//! cmp_gt, cmp_ge, select`.
//!
//! An integer kit provides `splat, loadu, load, storeu, store, add, sub, mul, neg,
//! cmp_eq, select, and, or, xor, not, shl, shl_lanes, rotl, rotr, rotl_lanes,
//! rotr_lanes`, and a `signed`/`unsigned` submodule holding the operations whose
//! meaning depends on signedness: `min, max, abs, cmp_lt, cmp_le, cmp_gt, cmp_ge,
//! shr, shr_lanes`. Integer kits work on the signed scalar type; unsigned
//! wrappers cast their pointers and scalars at the boundary.

/// Generates a float register wrapper from an intrinsic kit.
macro_rules! native_float_register {
    (
        $(#[$doc:meta])*
        $name:ident($raw:ty): $scalar:ty, lanes: $lanes:expr, isa: $isa:expr, bits: $bits:expr, kit: $kit:ident
    ) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug)]
        #[repr(transparent)]
        pub struct $name(pub(crate) $raw);

        impl $crate::simd::register::LaneRegister for $name {
            type Scalar = $scalar;

            const LANES: usize = $lanes;
            const ALIGN: usize = $bits / 8;

            fn shape() -> $crate::simd::register::Shape {
                $crate::simd::register::Shape::native($isa, $bits, $lanes)
            }

            #[inline(always)]
            fn splat(value: $scalar) -> Self {
                Self(unsafe { $kit::splat(value) })
            }

            #[inline(always)]
            unsafe fn load_unaligned(ptr: *const $scalar) -> Self {
                Self($kit::loadu(ptr))
            }

            #[inline(always)]
            unsafe fn load_aligned(ptr: *const $scalar) -> Self {
                debug_assert_eq!(ptr as usize % Self::ALIGN, 0);
                Self($kit::load(ptr))
            }

            #[inline(always)]
            unsafe fn store_unaligned(self, ptr: *mut $scalar) {
                $kit::storeu(ptr, self.0)
            }

            #[inline(always)]
            unsafe fn store_aligned(self, ptr: *mut $scalar) {
                debug_assert_eq!(ptr as usize % Self::ALIGN, 0);
                $kit::store(ptr, self.0)
            }

            #[inline(always)]
            fn select(bits: u64, on_true: Self, on_false: Self) -> Self {
                Self(unsafe { $kit::select(bits, on_true.0, on_false.0) })
            }

            native_float_register!(@cmp $kit; cmp_eq, cmp_ne, cmp_lt, cmp_le, cmp_gt, cmp_ge);
            native_float_register!(@binary $kit; add, sub, mul, min, max);
            native_float_register!(@unary $kit; neg, abs);
        }

        impl $crate::simd::register::FloatRegister for $name {
            native_float_register!(@binary $kit; div);
            native_float_register!(@unary $kit; sqrt, rcp, floor, ceil, round, trunc);

            #[inline(always)]
            fn mul_add(self, b: Self, c: Self) -> Self {
                Self(unsafe { $kit::fmadd(self.0, b.0, c.0) })
            }
        }
    };

    (@cmp $kit:ident; $($op:ident),*) => {
        $(
            #[inline(always)]
            fn $op(self, rhs: Self) -> u64 {
                unsafe { $kit::$op(self.0, rhs.0) }
            }
        )*
    };

    (@binary $kit:ident; $($op:ident),*) => {
        $(
            #[inline(always)]
            fn $op(self, rhs: Self) -> Self {
                Self(unsafe { $kit::$op(self.0, rhs.0) })
            }
        )*
    };

    (@unary $kit:ident; $($op:ident),*) => {
        $(
            #[inline(always)]
            fn $op(self) -> Self {
                Self(unsafe { $kit::$op(self.0) })
            }
        )*
    };
}

/// Generates an integer register wrapper from an intrinsic kit and its
/// `signed`/`unsigned` half.
macro_rules! native_int_register {
    (
        $(#[$doc:meta])*
        $name:ident($raw:ty): $scalar:ty, lanes: $lanes:expr, isa: $isa:expr, bits: $bits:expr, kit: $kit:ident, sign: $sign:ident
    ) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug)]
        #[repr(transparent)]
        pub struct $name(pub(crate) $raw);

        impl $crate::simd::register::LaneRegister for $name {
            type Scalar = $scalar;

            const LANES: usize = $lanes;
            const ALIGN: usize = $bits / 8;

            fn shape() -> $crate::simd::register::Shape {
                $crate::simd::register::Shape::native($isa, $bits, $lanes)
            }

            #[inline(always)]
            fn splat(value: $scalar) -> Self {
                Self(unsafe { $kit::splat(value as _) })
            }

            #[inline(always)]
            unsafe fn load_unaligned(ptr: *const $scalar) -> Self {
                Self($kit::loadu(ptr as *const _))
            }

            #[inline(always)]
            unsafe fn load_aligned(ptr: *const $scalar) -> Self {
                debug_assert_eq!(ptr as usize % Self::ALIGN, 0);
                Self($kit::load(ptr as *const _))
            }

            #[inline(always)]
            unsafe fn store_unaligned(self, ptr: *mut $scalar) {
                $kit::storeu(ptr as *mut _, self.0)
            }

            #[inline(always)]
            unsafe fn store_aligned(self, ptr: *mut $scalar) {
                debug_assert_eq!(ptr as usize % Self::ALIGN, 0);
                $kit::store(ptr as *mut _, self.0)
            }

            #[inline(always)]
            fn select(bits: u64, on_true: Self, on_false: Self) -> Self {
                Self(unsafe { $kit::select(bits, on_true.0, on_false.0) })
            }

            #[inline(always)]
            fn cmp_eq(self, rhs: Self) -> u64 {
                unsafe { $kit::cmp_eq(self.0, rhs.0) }
            }

            #[inline(always)]
            fn cmp_ne(self, rhs: Self) -> u64 {
                !<Self as $crate::simd::register::LaneRegister>::cmp_eq(self, rhs)
                    & $crate::simd::register::lane_mask($lanes)
            }

            native_int_register!(@cmp $kit, $sign; cmp_lt, cmp_le, cmp_gt, cmp_ge);
            native_int_register!(@binary $kit; add, sub, mul);
            native_int_register!(@binary $kit, $sign; min, max);
            native_int_register!(@unary $kit; neg);
            native_int_register!(@unary $kit, $sign; abs);
        }

        impl $crate::simd::register::IntRegister for $name {
            native_int_register!(@binary $kit; and, or, xor);
            native_int_register!(@unary $kit; not);

            #[inline(always)]
            fn shl(self, count: u32) -> Self {
                Self(unsafe { $kit::shl(self.0, count) })
            }

            #[inline(always)]
            fn shr(self, count: u32) -> Self {
                Self(unsafe { $kit::$sign::shr(self.0, count) })
            }

            #[inline(always)]
            fn rotl(self, count: u32) -> Self {
                Self(unsafe { $kit::rotl(self.0, count) })
            }

            #[inline(always)]
            fn rotr(self, count: u32) -> Self {
                Self(unsafe { $kit::rotr(self.0, count) })
            }

            native_int_register!(@binary $kit; shl_lanes, rotl_lanes, rotr_lanes);
            native_int_register!(@binary $kit, $sign; shr_lanes);
        }
    };

    (@cmp $kit:ident, $sign:ident; $($op:ident),*) => {
        $(
            #[inline(always)]
            fn $op(self, rhs: Self) -> u64 {
                unsafe { $kit::$sign::$op(self.0, rhs.0) }
            }
        )*
    };

    (@binary $kit:ident; $($op:ident),*) => {
        $(
            #[inline(always)]
            fn $op(self, rhs: Self) -> Self {
                Self(unsafe { $kit::$op(self.0, rhs.0) })
            }
        )*
    };

    (@binary $kit:ident, $sign:ident; $($op:ident),*) => {
        $(
            #[inline(always)]
            fn $op(self, rhs: Self) -> Self {
                Self(unsafe { $kit::$sign::$op(self.0, rhs.0) })
            }
        )*
    };

    (@unary $kit:ident; $($op:ident),*) => {
        $(
            #[inline(always)]
            fn $op(self) -> Self {
                Self(unsafe { $kit::$op(self.0) })
            }
        )*
    };

    (@unary $kit:ident, $sign:ident; $($op:ident),*) => {
        $(
            #[inline(always)]
            fn $op(self) -> Self {
                Self(unsafe { $kit::$sign::$op(self.0) })
            }
        )*
    };
}

pub(crate) use native_float_register;
pub(crate) use native_int_register;
