//! The register contract.
//!
//! A register is the storage chosen for one `(element, lanes)` pair by the
//! resolution table. Native leaves wrap one hardware value, [`Composite`] pairs two
//! half-width registers, and [`Emulated`] keeps a scalar array. All three implement
//! the traits below with identical lane-for-lane results; the public
//! [`SimdVec`](crate::simd::SimdVec) is written once against these traits.
//!
//! Masks cross this boundary as `u64` bit sets (bit `i` selects lane `i`). Each
//! native leaf converts that encoding to its own all-ones/all-zeros lane form in a
//! single named expansion function and back with a move-mask.
//!
//! [`Composite`]: crate::simd::composite::Composite
//! [`Emulated`]: crate::simd::emulated::Emulated

use std::fmt::{self, Debug};

use crate::capabilities::Isa;
use crate::element::{Element, FloatElement, IntElement};

/// Largest lane count the resolution table defines.
pub const MAX_LANES: usize = 64;

/// How the leaves of a resolved register are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterKind {
    /// One hardware register of `bits` width from the `isa` family.
    Native { isa: Isa, bits: usize },
    /// A scalar array.
    Emulated,
}

/// The resolved representation of a vector type.
///
/// `depth` counts composite levels above the leaves, so a native or emulated
/// register has `depth == 0` and `leaves == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub leaf: RegisterKind,
    pub leaf_lanes: usize,
    pub leaves: usize,
    pub depth: usize,
}

impl Shape {
    pub const fn native(isa: Isa, bits: usize, lanes: usize) -> Self {
        Shape {
            leaf: RegisterKind::Native { isa, bits },
            leaf_lanes: lanes,
            leaves: 1,
            depth: 0,
        }
    }

    pub const fn emulated(lanes: usize) -> Self {
        Shape {
            leaf: RegisterKind::Emulated,
            leaf_lanes: lanes,
            leaves: 1,
            depth: 0,
        }
    }

    /// Shape of a register made of two `half` registers.
    pub const fn doubled(half: Shape) -> Self {
        Shape {
            leaf: half.leaf,
            leaf_lanes: half.leaf_lanes,
            leaves: half.leaves * 2,
            depth: half.depth + 1,
        }
    }

    pub const fn lanes(&self) -> usize {
        self.leaf_lanes * self.leaves
    }

    pub const fn is_native(&self) -> bool {
        self.depth == 0 && matches!(self.leaf, RegisterKind::Native { .. })
    }

    pub const fn is_composite(&self) -> bool {
        self.depth > 0
    }

    pub const fn is_emulated(&self) -> bool {
        matches!(self.leaf, RegisterKind::Emulated)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let leaf = match self.leaf {
            RegisterKind::Native { isa, bits } => format!("{isa} {bits}-bit"),
            RegisterKind::Emulated => format!("emulated x{}", self.leaf_lanes),
        };
        if self.leaves == 1 {
            f.write_str(&leaf)
        } else {
            write!(f, "{} x ({leaf})", self.leaves)
        }
    }
}

/// Bit set with the low `lanes` bits set.
#[inline(always)]
pub const fn lane_mask(lanes: usize) -> u64 {
    if lanes >= 64 {
        u64::MAX
    } else {
        (1u64 << lanes) - 1
    }
}

/// Whether `A` and `B` lay out their lanes byte for byte alike.
#[inline(always)]
pub fn same_layout<A: LaneRegister, B: LaneRegister>() -> bool {
    A::shape() == B::shape()
        && std::mem::size_of::<A::Scalar>() == std::mem::size_of::<B::Scalar>()
        && std::mem::size_of::<A>() == std::mem::size_of::<B>()
}

/// Operations every register provides, whatever its element kind.
///
/// Lane indices passed to `extract`/`insert` must be below `LANES`; the public
/// vector type checks them before calling in.
pub trait LaneRegister: Copy + Debug + Send + Sync + 'static {
    type Scalar: Element;

    const LANES: usize;
    /// Alignment in bytes required by `load_aligned`/`store_aligned`.
    const ALIGN: usize;

    fn shape() -> Shape;

    fn splat(value: Self::Scalar) -> Self;

    /// # Safety
    ///
    /// `ptr` must be valid for reads of `LANES` elements.
    unsafe fn load_unaligned(ptr: *const Self::Scalar) -> Self;

    /// # Safety
    ///
    /// `ptr` must be valid for reads of `LANES` elements and aligned to `ALIGN` bytes.
    unsafe fn load_aligned(ptr: *const Self::Scalar) -> Self;

    /// # Safety
    ///
    /// `ptr` must be valid for writes of `LANES` elements.
    unsafe fn store_unaligned(self, ptr: *mut Self::Scalar);

    /// # Safety
    ///
    /// `ptr` must be valid for writes of `LANES` elements and aligned to `ALIGN` bytes.
    unsafe fn store_aligned(self, ptr: *mut Self::Scalar);

    /// Spills the register into a stack buffer, lanes `0..LANES`.
    #[inline(always)]
    fn spill(self) -> [Self::Scalar; MAX_LANES] {
        let mut buffer = [Self::Scalar::default(); MAX_LANES];
        debug_assert!(Self::LANES <= MAX_LANES);
        unsafe { self.store_unaligned(buffer.as_mut_ptr()) };
        buffer
    }

    /// Reloads a register from the first `LANES` entries of `buffer`.
    #[inline(always)]
    fn fill(buffer: &[Self::Scalar; MAX_LANES]) -> Self {
        unsafe { Self::load_unaligned(buffer.as_ptr()) }
    }

    /// Lane `index`. Native leaves spill to the stack for this.
    #[inline(always)]
    fn extract(self, index: usize) -> Self::Scalar {
        debug_assert!(index < Self::LANES);
        self.spill()[index]
    }

    #[inline(always)]
    fn insert(self, index: usize, value: Self::Scalar) -> Self {
        debug_assert!(index < Self::LANES);
        let mut buffer = self.spill();
        buffer[index] = value;
        Self::fill(&buffer)
    }

    /// Applies `f` to every lane.
    #[inline(always)]
    fn map_lanes(self, f: impl Fn(Self::Scalar) -> Self::Scalar) -> Self {
        let mut buffer = self.spill();
        for lane in buffer.iter_mut().take(Self::LANES) {
            *lane = f(*lane);
        }
        Self::fill(&buffer)
    }

    /// Applies `f` to every pair of lanes.
    #[inline(always)]
    fn zip_lanes(self, rhs: Self, f: impl Fn(Self::Scalar, Self::Scalar) -> Self::Scalar) -> Self {
        let mut buffer = self.spill();
        let other = rhs.spill();
        for (lane, &r) in buffer.iter_mut().zip(other.iter()).take(Self::LANES) {
            *lane = f(*lane, r);
        }
        Self::fill(&buffer)
    }

    /// Converts every lane into the same lane of `R`, which has the same lane count.
    #[inline(always)]
    fn convert_lanes<R: LaneRegister>(self, f: impl Fn(Self::Scalar) -> R::Scalar) -> R {
        debug_assert_eq!(Self::LANES, R::LANES);
        let lanes = self.spill();
        let mut out = [R::Scalar::default(); MAX_LANES];
        for (dst, &src) in out.iter_mut().zip(lanes.iter()).take(Self::LANES) {
            *dst = f(src);
        }
        R::fill(&out)
    }

    /// Reads the register's bits as `R`.
    ///
    /// When both registers share a shape and a lane width the bytes are reused
    /// as they are. Otherwise `f` rebuilds each lane and must preserve its bits.
    #[inline(always)]
    fn bitcast_lanes<R: LaneRegister>(self, f: impl Fn(Self::Scalar) -> R::Scalar) -> R {
        if same_layout::<Self, R>() {
            // SAFETY: equal shapes with equal lane widths store the same lanes
            // at the same byte offsets.
            unsafe { std::mem::transmute_copy(&self) }
        } else {
            self.convert_lanes(f)
        }
    }

    /// Folds lanes `0..LANES` from left to right.
    #[inline(always)]
    fn fold_lanes(self, f: impl Fn(Self::Scalar, Self::Scalar) -> Self::Scalar) -> Self::Scalar {
        let buffer = self.spill();
        buffer[1..Self::LANES]
            .iter()
            .fold(buffer[0], |acc, &lane| f(acc, lane))
    }

    /// Lane `i` from `on_true` where bit `i` of `bits` is set, else from `on_false`.
    fn select(bits: u64, on_true: Self, on_false: Self) -> Self;

    fn cmp_eq(self, rhs: Self) -> u64;
    fn cmp_ne(self, rhs: Self) -> u64;
    fn cmp_lt(self, rhs: Self) -> u64;
    fn cmp_le(self, rhs: Self) -> u64;
    fn cmp_gt(self, rhs: Self) -> u64;
    fn cmp_ge(self, rhs: Self) -> u64;

    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    fn mul(self, rhs: Self) -> Self;
    fn min(self, rhs: Self) -> Self;
    fn max(self, rhs: Self) -> Self;
    fn neg(self) -> Self;
    fn abs(self) -> Self;

    #[inline(always)]
    fn reduce_add(self) -> Self::Scalar {
        self.fold_lanes(|a, b| a.lane_add(b))
    }

    #[inline(always)]
    fn reduce_mul(self) -> Self::Scalar {
        self.fold_lanes(|a, b| a.lane_mul(b))
    }

    /// Smallest non-NaN lane, or the `min` identity when every lane is NaN.
    #[inline(always)]
    fn reduce_min(self) -> Self::Scalar {
        let min = self.fold_lanes(|a, b| a.lane_min_num(b));
        min.lane_min_num(Self::Scalar::MIN_IDENTITY)
    }

    /// Largest non-NaN lane, or the `max` identity when every lane is NaN.
    #[inline(always)]
    fn reduce_max(self) -> Self::Scalar {
        let max = self.fold_lanes(|a, b| a.lane_max_num(b));
        max.lane_max_num(Self::Scalar::MAX_IDENTITY)
    }
}

/// Registers of float lanes.
pub trait FloatRegister: LaneRegister
where
    Self::Scalar: FloatElement,
{
    fn div(self, rhs: Self) -> Self;
    fn sqrt(self) -> Self;
    /// Reciprocal. Native f32 leaves use the hardware estimate; see
    /// [`SimdVec::rcp`](crate::simd::SimdVec::rcp) for the error bound.
    fn rcp(self) -> Self;
    fn floor(self) -> Self;
    fn ceil(self) -> Self;
    /// Round to nearest, ties to even.
    fn round(self) -> Self;
    fn trunc(self) -> Self;
    /// `self * b + c`, fused when the build enables `fma`.
    fn mul_add(self, b: Self, c: Self) -> Self;
}

/// Registers of integer lanes.
///
/// Shift and rotate counts are reduced modulo the lane width; `shr` is arithmetic
/// for signed lanes and logical for unsigned ones.
pub trait IntRegister: LaneRegister
where
    Self::Scalar: IntElement,
{
    fn and(self, rhs: Self) -> Self;
    fn or(self, rhs: Self) -> Self;
    fn xor(self, rhs: Self) -> Self;
    fn not(self) -> Self;

    fn shl(self, count: u32) -> Self;
    fn shr(self, count: u32) -> Self;
    fn shl_lanes(self, counts: Self) -> Self;
    fn shr_lanes(self, counts: Self) -> Self;

    fn rotl(self, count: u32) -> Self;
    fn rotr(self, count: u32) -> Self;

    #[inline(always)]
    fn rotl_lanes(self, counts: Self) -> Self {
        self.zip_lanes(counts, |v, n| v.lane_rotl(n.lane_count()))
    }

    #[inline(always)]
    fn rotr_lanes(self, counts: Self) -> Self {
        self.zip_lanes(counts, |v, n| v.lane_rotr(n.lane_count()))
    }

    #[inline(always)]
    fn saturating_add(self, rhs: Self) -> Self {
        self.zip_lanes(rhs, |a, b| a.lane_saturating_add(b))
    }

    #[inline(always)]
    fn saturating_sub(self, rhs: Self) -> Self {
        self.zip_lanes(rhs, |a, b| a.lane_saturating_sub(b))
    }

    #[inline(always)]
    fn reduce_and(self) -> Self::Scalar {
        self.fold_lanes(|a, b| a.lane_and(b))
    }

    #[inline(always)]
    fn reduce_or(self) -> Self::Scalar {
        self.fold_lanes(|a, b| a.lane_or(b))
    }

    #[inline(always)]
    fn reduce_xor(self) -> Self::Scalar {
        self.fold_lanes(|a, b| a.lane_xor(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_mask() {
        assert_eq!(lane_mask(0), 0);
        assert_eq!(lane_mask(1), 1);
        assert_eq!(lane_mask(8), 0xFF);
        assert_eq!(lane_mask(64), u64::MAX);
    }

    #[test]
    fn test_shape_doubling() {
        let leaf = Shape::native(Isa::Avx2, 256, 8);
        let twice = Shape::doubled(Shape::doubled(leaf));

        assert!(leaf.is_native());
        assert!(!twice.is_native());
        assert!(twice.is_composite());
        assert_eq!(twice.leaves, 4);
        assert_eq!(twice.depth, 2);
        assert_eq!(twice.lanes(), 32);
        assert_eq!(twice.to_string(), "4 x (avx2 256-bit)");
    }

    #[test]
    fn test_emulated_shape() {
        let shape = Shape::emulated(4);
        assert!(shape.is_emulated());
        assert!(!shape.is_composite());
        assert_eq!(shape.to_string(), "emulated x4");
    }
}
