//! Scalar element types and their per-lane semantics.
//!
//! Every register representation, native, composite or emulated, must agree lane
//! for lane. The scalar methods on [`Element`] are the reference those
//! representations are checked against: the emulated register is built from them
//! directly, and native leaves are written to reproduce them exactly (including
//! the NaN behaviour of `min`/`max` and wrapping integer arithmetic).

use std::fmt::{self, Debug};

use num::traits::{WrappingShl, WrappingShr};
use num::{Float, PrimInt};

/// The fixed set of scalar kinds a vector lane can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    F32,
    F64,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

impl ElementType {
    /// Every element kind, floats first.
    pub const ALL: [ElementType; 10] = [
        ElementType::F32,
        ElementType::F64,
        ElementType::I8,
        ElementType::I16,
        ElementType::I32,
        ElementType::I64,
        ElementType::U8,
        ElementType::U16,
        ElementType::U32,
        ElementType::U64,
    ];

    /// Width of one lane in bits.
    pub const fn bits(self) -> usize {
        match self {
            ElementType::I8 | ElementType::U8 => 8,
            ElementType::I16 | ElementType::U16 => 16,
            ElementType::F32 | ElementType::I32 | ElementType::U32 => 32,
            ElementType::F64 | ElementType::I64 | ElementType::U64 => 64,
        }
    }

    pub const fn is_float(self) -> bool {
        matches!(self, ElementType::F32 | ElementType::F64)
    }

    pub const fn is_signed(self) -> bool {
        !matches!(
            self,
            ElementType::U8 | ElementType::U16 | ElementType::U32 | ElementType::U64
        )
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementType::F32 => "f32",
            ElementType::F64 => "f64",
            ElementType::I8 => "i8",
            ElementType::I16 => "i16",
            ElementType::I32 => "i32",
            ElementType::I64 => "i64",
            ElementType::U8 => "u8",
            ElementType::U16 => "u16",
            ElementType::U32 => "u32",
            ElementType::U64 => "u64",
        };
        f.write_str(name)
    }
}

/// A scalar that can occupy one SIMD lane.
///
/// The associated types name the same-width companions used by the conversion
/// family: `Unsigned`/`Signed` share the lane bit width, `Float` is the float
/// type integer lanes convert into.
pub trait Element: Copy + Debug + Default + PartialEq + PartialOrd + Send + Sync + 'static {
    const KIND: ElementType;
    const ZERO: Self;
    const ONE: Self;
    /// Identity of `min`: `+inf` for floats, `MAX` for integers.
    const MIN_IDENTITY: Self;
    /// Identity of `max`: `-inf` for floats, `MIN` for integers.
    const MAX_IDENTITY: Self;

    type Unsigned: IntElement;
    type Signed: IntElement;
    type Float: FloatElement;

    fn lane_add(self, rhs: Self) -> Self;
    fn lane_sub(self, rhs: Self) -> Self;
    fn lane_mul(self, rhs: Self) -> Self;
    fn lane_neg(self) -> Self;
    fn lane_abs(self) -> Self;

    /// `self < rhs ? self : rhs`; a NaN in either operand yields `rhs`.
    #[inline(always)]
    fn lane_min(self, rhs: Self) -> Self {
        if self < rhs {
            self
        } else {
            rhs
        }
    }

    /// `self > rhs ? self : rhs`; a NaN in either operand yields `rhs`.
    #[inline(always)]
    fn lane_max(self, rhs: Self) -> Self {
        if self > rhs {
            self
        } else {
            rhs
        }
    }

    /// `minNum`: a NaN operand is ignored, so the result is NaN only when both
    /// are. Associative, which keeps `hmin` independent of the register layout.
    #[inline(always)]
    #[allow(clippy::eq_op)]
    fn lane_min_num(self, rhs: Self) -> Self {
        if rhs != rhs {
            self
        } else if self != self {
            rhs
        } else {
            self.lane_min(rhs)
        }
    }

    /// `maxNum`, the NaN-ignoring counterpart of [`lane_min_num`](Self::lane_min_num).
    #[inline(always)]
    #[allow(clippy::eq_op)]
    fn lane_max_num(self, rhs: Self) -> Self {
        if rhs != rhs {
            self
        } else if self != self {
            rhs
        } else {
            self.lane_max(rhs)
        }
    }

    /// Raw bit pattern.
    fn lane_bits(self) -> Self::Unsigned;
    fn from_lane_bits(bits: Self::Unsigned) -> Self;

    /// `self as Signed`: truncation toward zero (saturating, NaN to 0) for floats,
    /// bit reinterpretation for integers.
    fn lane_as_signed(self) -> Self::Signed;
    /// `self as Unsigned`, with the same rules as [`Element::lane_as_signed`].
    fn lane_as_unsigned(self) -> Self::Unsigned;
    /// `self as Float`: round to nearest for integers, identity for floats.
    fn lane_as_float(self) -> Self::Float;
}

/// Integer lanes: bitwise operations, shifts and rotations.
pub trait IntElement: Element + PrimInt + WrappingShl + WrappingShr {
    /// All bits set; identity of the `and` reduction.
    #[inline(always)]
    fn all_ones() -> Self {
        !Self::ZERO
    }

    /// Shift count taken from a lane value; only the low bits matter once reduced modulo the width.
    fn lane_count(self) -> u32;

    #[inline(always)]
    fn lane_and(self, rhs: Self) -> Self {
        self & rhs
    }

    #[inline(always)]
    fn lane_or(self, rhs: Self) -> Self {
        self | rhs
    }

    #[inline(always)]
    fn lane_xor(self, rhs: Self) -> Self {
        self ^ rhs
    }

    /// Left shift by `n` modulo the lane width.
    #[inline(always)]
    fn lane_shl(self, n: u32) -> Self {
        WrappingShl::wrapping_shl(&self, n)
    }

    /// Right shift by `n` modulo the lane width: arithmetic for signed lanes, logical otherwise.
    #[inline(always)]
    fn lane_shr(self, n: u32) -> Self {
        WrappingShr::wrapping_shr(&self, n)
    }

    #[inline(always)]
    fn lane_rotl(self, n: u32) -> Self {
        PrimInt::rotate_left(self, n % Self::KIND.bits() as u32)
    }

    #[inline(always)]
    fn lane_rotr(self, n: u32) -> Self {
        PrimInt::rotate_right(self, n % Self::KIND.bits() as u32)
    }

    #[inline(always)]
    fn lane_saturating_add(self, rhs: Self) -> Self {
        num::traits::Saturating::saturating_add(self, rhs)
    }

    #[inline(always)]
    fn lane_saturating_sub(self, rhs: Self) -> Self {
        num::traits::Saturating::saturating_sub(self, rhs)
    }
}

/// Floating-point lanes, plus the constants of the sin/cos kernel.
pub trait FloatElement: Element + Float {
    /// `pi/4` split into three parts for Cody-Waite range reduction.
    const DP1: Self;
    const DP2: Self;
    const DP3: Self;
    const FOUR_OVER_PI: Self;
    /// Sine polynomial, highest degree first.
    const SIN_COEFFS: &'static [Self];
    /// Cosine polynomial, highest degree first.
    const COS_COEFFS: &'static [Self];

    fn from_f64(value: f64) -> Self;

    /// Round to nearest, ties to even.
    fn lane_round(self) -> Self;

    /// `self * b + c`, fused when the build enables `fma`.
    #[inline(always)]
    fn lane_mul_add(self, b: Self, c: Self) -> Self {
        if cfg!(fma) {
            Float::mul_add(self, b, c)
        } else {
            self * b + c
        }
    }
}

/// Element types with a wider same-family companion (`f32 -> f64`, `i8 -> i16`, ...).
pub trait Promote: Element {
    type Wider: Element;

    fn promote_lane(self) -> Self::Wider;
}

/// Element types with a narrower same-family companion (`f64 -> f32`, `i16 -> i8`, ...).
///
/// Float narrowing rounds to nearest, ties to even; integer narrowing keeps the
/// low bits.
pub trait Degrade: Element {
    type Narrower: Element;

    fn degrade_lane(self) -> Self::Narrower;
}

macro_rules! float_element {
    ($t:ty, $kind:ident, $u:ty, $i:ty) => {
        impl Element for $t {
            const KIND: ElementType = ElementType::$kind;
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const MIN_IDENTITY: Self = <$t>::INFINITY;
            const MAX_IDENTITY: Self = <$t>::NEG_INFINITY;

            type Unsigned = $u;
            type Signed = $i;
            type Float = $t;

            #[inline(always)]
            fn lane_add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline(always)]
            fn lane_sub(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline(always)]
            fn lane_mul(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline(always)]
            fn lane_neg(self) -> Self {
                -self
            }

            #[inline(always)]
            fn lane_abs(self) -> Self {
                <$t>::abs(self)
            }

            #[inline(always)]
            fn lane_bits(self) -> $u {
                <$t>::to_bits(self)
            }

            #[inline(always)]
            fn from_lane_bits(bits: $u) -> Self {
                <$t>::from_bits(bits)
            }

            #[inline(always)]
            fn lane_as_signed(self) -> $i {
                self as $i
            }

            #[inline(always)]
            fn lane_as_unsigned(self) -> $u {
                self as $u
            }

            #[inline(always)]
            fn lane_as_float(self) -> $t {
                self
            }
        }
    };
}

float_element!(f32, F32, u32, i32);
float_element!(f64, F64, u64, i64);

impl FloatElement for f32 {
    const DP1: Self = 0.785_156_25;
    const DP2: Self = 2.418_756_484_985_351_562_5e-4;
    const DP3: Self = 3.774_894_977_445_941_08e-8;
    const FOUR_OVER_PI: Self = std::f32::consts::FRAC_2_PI * 2.0;
    const SIN_COEFFS: &'static [Self] = &[-1.951_529_589_1e-4, 8.332_160_873_6e-3, -1.666_665_461_1e-1];
    const COS_COEFFS: &'static [Self] = &[
        2.443_315_711_809_948e-5,
        -1.388_731_625_493_765e-3,
        4.166_664_568_298_827e-2,
    ];

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline(always)]
    fn lane_round(self) -> Self {
        self.round_ties_even()
    }
}

impl FloatElement for f64 {
    const DP1: Self = 7.853_981_554_508_209_228_515_625e-1;
    const DP2: Self = 7.946_627_356_147_928_367_14e-9;
    const DP3: Self = 3.061_616_997_868_382_943_07e-17;
    const FOUR_OVER_PI: Self = std::f64::consts::FRAC_2_PI * 2.0;
    const SIN_COEFFS: &'static [Self] = &[
        1.589_623_015_765_465_680_60e-10,
        -2.505_074_776_285_780_728_66e-8,
        2.755_731_362_138_572_452_13e-6,
        -1.984_126_982_958_953_859_96e-4,
        8.333_333_333_322_118_588_78e-3,
        -1.666_666_666_666_663_072_95e-1,
    ];
    const COS_COEFFS: &'static [Self] = &[
        -1.135_853_652_138_768_173_00e-11,
        2.087_570_084_197_473_167_78e-9,
        -2.755_731_417_929_673_881_12e-7,
        2.480_158_728_885_170_453_48e-5,
        -1.388_888_888_887_305_641_16e-3,
        4.166_666_666_666_659_292_18e-2,
    ];

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline(always)]
    fn lane_round(self) -> Self {
        self.round_ties_even()
    }
}

macro_rules! int_element {
    ($t:ty, $kind:ident, $u:ty, $i:ty, $f:ty, abs: $abs:expr) => {
        impl Element for $t {
            const KIND: ElementType = ElementType::$kind;
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const MIN_IDENTITY: Self = <$t>::MAX;
            const MAX_IDENTITY: Self = <$t>::MIN;

            type Unsigned = $u;
            type Signed = $i;
            type Float = $f;

            #[inline(always)]
            fn lane_add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            #[inline(always)]
            fn lane_sub(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }

            #[inline(always)]
            fn lane_mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }

            #[inline(always)]
            fn lane_neg(self) -> Self {
                self.wrapping_neg()
            }

            #[inline(always)]
            fn lane_abs(self) -> Self {
                let abs: fn($t) -> $t = $abs;
                abs(self)
            }

            #[inline(always)]
            fn lane_bits(self) -> $u {
                self as $u
            }

            #[inline(always)]
            fn from_lane_bits(bits: $u) -> Self {
                bits as $t
            }

            #[inline(always)]
            fn lane_as_signed(self) -> $i {
                self as $i
            }

            #[inline(always)]
            fn lane_as_unsigned(self) -> $u {
                self as $u
            }

            #[inline(always)]
            fn lane_as_float(self) -> $f {
                self as $f
            }
        }

        impl IntElement for $t {
            #[inline(always)]
            fn lane_count(self) -> u32 {
                self as u32
            }
        }
    };
}

int_element!(i8, I8, u8, i8, f32, abs: |x| x.wrapping_abs());
int_element!(i16, I16, u16, i16, f32, abs: |x| x.wrapping_abs());
int_element!(i32, I32, u32, i32, f32, abs: |x| x.wrapping_abs());
int_element!(i64, I64, u64, i64, f64, abs: |x| x.wrapping_abs());
int_element!(u8, U8, u8, i8, f32, abs: |x| x);
int_element!(u16, U16, u16, i16, f32, abs: |x| x);
int_element!(u32, U32, u32, i32, f32, abs: |x| x);
int_element!(u64, U64, u64, i64, f64, abs: |x| x);

macro_rules! widen {
    ($($narrow:ty => $wide:ty),* $(,)?) => {
        $(
            impl Promote for $narrow {
                type Wider = $wide;

                #[inline(always)]
                fn promote_lane(self) -> $wide {
                    self as $wide
                }
            }

            impl Degrade for $wide {
                type Narrower = $narrow;

                #[inline(always)]
                fn degrade_lane(self) -> $narrow {
                    self as $narrow
                }
            }
        )*
    };
}

widen!(
    f32 => f64,
    i8 => i16,
    i16 => i32,
    i32 => i64,
    u8 => u16,
    u16 => u32,
    u32 => u64,
);
