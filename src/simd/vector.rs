//! The public vector type.
//!
//! `SimdVec<T, N>` is a value holding `N` lanes of `T`, stored in whatever
//! register the resolution table picks for `(T, N)`. Every operation returns a
//! new vector; the `*_assign` and `*_masked_assign` forms overwrite the receiver
//! and return it for chaining.
//!
//! Masked operations follow one rule: lanes whose mask bit is clear keep the
//! receiver's value. `a.add_masked(m, b)` is `select(m, a + b, a)`.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::element::ElementType;
use crate::error::{index_out_of_range, length_mismatch, misaligned, Result};

use super::mask::Mask;
use super::register::{LaneRegister, Shape};
use super::resolve::{Reg, Resolve};
use super::swizzle::Swizzle;

/// Comparison methods returning a [`Mask`].
macro_rules! cmp_ops {
    ($($(#[$doc:meta])* $name:ident,)*) => {
        $(
            $(#[$doc])*
            #[inline(always)]
            pub fn $name(self, rhs: impl Into<Self>) -> Mask<N> {
                Mask::from_bits(LaneRegister::$name(self.reg, rhs.into().reg))
            }
        )*
    };
}

/// Masked binary methods: `select(mask, op(self, rhs), self)` and its assigning form.
macro_rules! masked_binary_ops {
    ($reg_trait:ident; $($name:ident, $assign:ident => $op:ident;)*) => {
        $(
            #[doc = concat!("`", stringify!($op), "` in the selected lanes; other lanes keep `self`.")]
            #[inline(always)]
            pub fn $name(self, mask: Mask<N>, rhs: impl Into<Self>) -> Self {
                let result = Self::from_reg($reg_trait::$op(self.reg, rhs.into().reg));
                Self::select(mask, result, self)
            }

            #[doc = concat!("In-place [`", stringify!($name), "`](Self::", stringify!($name), ").")]
            #[inline(always)]
            pub fn $assign(&mut self, mask: Mask<N>, rhs: impl Into<Self>) -> &mut Self {
                *self = self.$name(mask, rhs);
                self
            }
        )*
    };
}
pub(crate) use masked_binary_ops;

/// Masked unary methods: `select(mask, op(self), self)`.
macro_rules! masked_unary_ops {
    ($reg_trait:ident; $($name:ident => $op:ident;)*) => {
        $(
            #[doc = concat!("`", stringify!($op), "` in the selected lanes; other lanes keep `self`.")]
            #[inline(always)]
            pub fn $name(self, mask: Mask<N>) -> Self {
                Self::select(mask, Self::from_reg($reg_trait::$op(self.reg)), self)
            }
        )*
    };
}
pub(crate) use masked_unary_ops;

/// Masked reductions: unselected lanes are replaced by the operator's identity.
macro_rules! masked_reductions {
    ($reg_trait:ident; $($(#[$doc:meta])* $name:ident => $reduce:ident, $identity:expr;)*) => {
        $(
            $(#[$doc])*
            #[inline(always)]
            pub fn $name(self, mask: Mask<N>) -> T {
                $reg_trait::$reduce(Self::select(mask, self, Self::splat($identity)).reg)
            }
        )*
    };
}
pub(crate) use masked_reductions;

/// Operator impls for vector and broadcast-scalar right-hand sides.
///
/// The bound list is forwarded whole to one `@one` expansion per operator.
macro_rules! vector_binary_ops {
    (
        @one $reg_trait:ident [$($bounds:tt)*];
        $op:ident::$method:ident, $assign:ident::$assign_method:ident => $reg_fn:ident
    ) => {
        impl<T, const N: usize> $op for SimdVec<T, N>
        where
            T: Resolve<N>,
            $($bounds)*
        {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                Self::from_reg($reg_trait::$reg_fn(self.reg, rhs.reg))
            }
        }

        impl<T, const N: usize> $op<T> for SimdVec<T, N>
        where
            T: Resolve<N>,
            $($bounds)*
        {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: T) -> Self {
                $op::$method(self, Self::splat(rhs))
            }
        }

        impl<T, const N: usize> $assign for SimdVec<T, N>
        where
            T: Resolve<N>,
            $($bounds)*
        {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: Self) {
                *self = $op::$method(*self, rhs);
            }
        }

        impl<T, const N: usize> $assign<T> for SimdVec<T, N>
        where
            T: Resolve<N>,
            $($bounds)*
        {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: T) {
                *self = $op::$method(*self, Self::splat(rhs));
            }
        }
    };
    (
        $reg_trait:ident $bounds:tt;
        $($op:ident::$method:ident, $assign:ident::$assign_method:ident => $reg_fn:ident;)*
    ) => {
        $(
            $crate::simd::vector::vector_binary_ops! {
                @one $reg_trait $bounds;
                $op::$method, $assign::$assign_method => $reg_fn
            }
        )*
    };
}
pub(crate) use vector_binary_ops;

/// Compile-time identity of a vector type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VectorKey {
    pub element: ElementType,
    pub lanes: usize,
}

impl fmt::Display for VectorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.element, self.lanes)
    }
}

/// `N` lanes of `T`.
///
/// # Examples
///
/// ```rust
/// use lanefold::simd::{Mask, SimdVec};
///
/// let a = SimdVec::<i32, 8>::from_array([1, 2, 3, 4, 5, 6, 7, 8]);
/// let b = a * 2;
/// assert_eq!(b.hadd(), 72);
///
/// let big = b.cmp_gt(8);
/// assert_eq!(big.count(), 4);
/// assert_eq!(a.blend(big, 0).to_array(), [1, 2, 3, 4, 0, 0, 0, 0]);
/// ```
#[repr(transparent)]
pub struct SimdVec<T: Resolve<N>, const N: usize> {
    pub(crate) reg: Reg<T, N>,
}

/// Same-width companion types of a vector.
///
/// Implemented for every supported `(T, N)`, so the unsigned, signed, mask and
/// swizzle companions of any vector are themselves vector types of the table.
pub trait Companions {
    type Unsigned;
    type Signed;
    type Mask;
    type Swizzle;
}

impl<T, const N: usize> Companions for SimdVec<T, N>
where
    T: Resolve<N>,
    T::Unsigned: Resolve<N>,
    T::Signed: Resolve<N>,
{
    type Unsigned = SimdVec<T::Unsigned, N>;
    type Signed = SimdVec<T::Signed, N>;
    type Mask = Mask<N>;
    type Swizzle = Swizzle<N>;
}

impl<T: Resolve<N>, const N: usize> Clone for SimdVec<T, N> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Resolve<N>, const N: usize> Copy for SimdVec<T, N> {}

impl<T: Resolve<N>, const N: usize> fmt::Debug for SimdVec<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SimdVec").field(&self.to_array()).finish()
    }
}

impl<T: Resolve<N>, const N: usize> PartialEq for SimdVec<T, N> {
    /// Lane-wise `==` on every lane, so a vector holding NaN is not equal to itself.
    fn eq(&self, other: &Self) -> bool {
        self.exact_eq(*other)
    }
}

impl<T: Resolve<N>, const N: usize> Default for SimdVec<T, N> {
    /// All lanes zero.
    fn default() -> Self {
        Self::splat(T::ZERO)
    }
}

impl<T: Resolve<N>, const N: usize> From<[T; N]> for SimdVec<T, N> {
    fn from(lanes: [T; N]) -> Self {
        Self::from_array(lanes)
    }
}

impl<T: Resolve<N>, const N: usize> From<T> for SimdVec<T, N> {
    /// Broadcasts the scalar.
    fn from(value: T) -> Self {
        Self::splat(value)
    }
}

impl<T: Resolve<N>, const N: usize> SimdVec<T, N> {
    pub const LANES: usize = {
        assert!(<Reg<T, N> as LaneRegister>::LANES == N);
        N
    };

    /// Alignment in bytes required by [`load_aligned`](Self::load_aligned) and
    /// [`store_aligned`](Self::store_aligned).
    pub const ALIGNMENT: usize = <Reg<T, N> as LaneRegister>::ALIGN;

    pub const KEY: VectorKey = VectorKey {
        element: T::KIND,
        lanes: N,
    };

    /// How this vector type is stored on the active backend.
    pub fn shape() -> Shape {
        <Reg<T, N> as LaneRegister>::shape()
    }

    #[inline(always)]
    pub(crate) fn from_reg(reg: Reg<T, N>) -> Self {
        SimdVec { reg }
    }

    #[inline(always)]
    pub fn splat(value: T) -> Self {
        Self::from_reg(LaneRegister::splat(value))
    }

    #[inline(always)]
    pub fn zero() -> Self {
        Self::splat(T::ZERO)
    }

    /// Lane `i` is `lanes[i]`.
    #[inline(always)]
    pub fn from_array(lanes: [T; N]) -> Self {
        debug_assert_eq!(Self::LANES, N);
        // SAFETY: the array holds exactly `N` readable lanes.
        Self::from_reg(unsafe { LaneRegister::load_unaligned(lanes.as_ptr()) })
    }

    #[inline(always)]
    pub fn to_array(self) -> [T; N] {
        let mut lanes = [T::ZERO; N];
        // SAFETY: the array has room for exactly `N` lanes.
        unsafe { LaneRegister::store_unaligned(self.reg, lanes.as_mut_ptr()) };
        lanes
    }

    /// Lane `i` is `f(i)`.
    pub fn from_fn(f: impl FnMut(usize) -> T) -> Self {
        Self::from_array(std::array::from_fn(f))
    }

    /// Reads the first `N` elements of `src`.
    ///
    /// # Errors
    ///
    /// [`LaneError::LengthMismatch`](crate::LaneError::LengthMismatch) when `src`
    /// holds fewer than `N` elements.
    #[inline(always)]
    pub fn load(src: &[T]) -> Result<Self> {
        if src.len() < N {
            return Err(length_mismatch(N, src.len()));
        }
        // SAFETY: length checked above.
        Ok(unsafe { Self::load_unchecked(src.as_ptr()) })
    }

    /// Reads the first `N` elements of `src`, which must start on an
    /// [`ALIGNMENT`](Self::ALIGNMENT)-byte boundary.
    ///
    /// # Errors
    ///
    /// [`LaneError::LengthMismatch`](crate::LaneError::LengthMismatch) for a short
    /// slice, [`LaneError::Misaligned`](crate::LaneError::Misaligned) for a
    /// misaligned one.
    #[inline(always)]
    pub fn load_aligned(src: &[T]) -> Result<Self> {
        if src.len() < N {
            return Err(length_mismatch(N, src.len()));
        }
        Self::check_alignment(src.as_ptr())?;
        // SAFETY: length and alignment checked above.
        Ok(unsafe { Self::load_aligned_unchecked(src.as_ptr()) })
    }

    /// Writes all lanes to the first `N` elements of `dst`.
    ///
    /// # Errors
    ///
    /// [`LaneError::LengthMismatch`](crate::LaneError::LengthMismatch) when `dst`
    /// holds fewer than `N` elements; nothing is written.
    #[inline(always)]
    pub fn store(self, dst: &mut [T]) -> Result<()> {
        if dst.len() < N {
            return Err(length_mismatch(N, dst.len()));
        }
        // SAFETY: length checked above.
        unsafe { self.store_unchecked(dst.as_mut_ptr()) };
        Ok(())
    }

    /// Aligned counterpart of [`store`](Self::store).
    ///
    /// # Errors
    ///
    /// As [`load_aligned`](Self::load_aligned); nothing is written on error.
    #[inline(always)]
    pub fn store_aligned(self, dst: &mut [T]) -> Result<()> {
        if dst.len() < N {
            return Err(length_mismatch(N, dst.len()));
        }
        Self::check_alignment(dst.as_ptr())?;
        // SAFETY: length and alignment checked above.
        unsafe { self.store_aligned_unchecked(dst.as_mut_ptr()) };
        Ok(())
    }

    /// # Safety
    ///
    /// `ptr` must be valid for reading `N` consecutive elements.
    #[inline(always)]
    pub unsafe fn load_unchecked(ptr: *const T) -> Self {
        Self::from_reg(LaneRegister::load_unaligned(ptr))
    }

    /// # Safety
    ///
    /// `ptr` must be valid for reading `N` consecutive elements and aligned to
    /// [`ALIGNMENT`](Self::ALIGNMENT) bytes.
    #[inline(always)]
    pub unsafe fn load_aligned_unchecked(ptr: *const T) -> Self {
        Self::from_reg(LaneRegister::load_aligned(ptr))
    }

    /// # Safety
    ///
    /// `ptr` must be valid for writing `N` consecutive elements.
    #[inline(always)]
    pub unsafe fn store_unchecked(self, ptr: *mut T) {
        LaneRegister::store_unaligned(self.reg, ptr)
    }

    /// # Safety
    ///
    /// `ptr` must be valid for writing `N` consecutive elements and aligned to
    /// [`ALIGNMENT`](Self::ALIGNMENT) bytes.
    #[inline(always)]
    pub unsafe fn store_aligned_unchecked(self, ptr: *mut T) {
        LaneRegister::store_aligned(self.reg, ptr)
    }

    /// Hints that `src` will be read soon, into every cache level.
    ///
    /// Prefetches never fault, so an empty or short slice is fine. Targets
    /// without a prefetch instruction ignore the hint.
    #[inline(always)]
    pub fn prefetch0(src: &[T]) {
        prefetch_hint::<0, T>(src.as_ptr())
    }

    /// Hints that `src` will be read soon, into L2 and outward.
    #[inline(always)]
    pub fn prefetch1(src: &[T]) {
        prefetch_hint::<1, T>(src.as_ptr())
    }

    /// Hints that `src` will be read soon, into L3 and outward.
    #[inline(always)]
    pub fn prefetch2(src: &[T]) {
        prefetch_hint::<2, T>(src.as_ptr())
    }

    fn check_alignment(ptr: *const T) -> Result<()> {
        if (ptr as usize) % Self::ALIGNMENT != 0 {
            return Err(misaligned(ptr, Self::ALIGNMENT));
        }
        Ok(())
    }

    /// Smallest slice length covering every selected lane.
    fn masked_len(mask: Mask<N>) -> usize {
        mask.last_set().map_or(0, |lane| lane + 1)
    }

    /// Replaces the selected lanes with `src[i]`; other lanes keep their value.
    ///
    /// `src` only needs to reach the highest selected lane, so a masked load can
    /// read the tail of a buffer shorter than `N`.
    ///
    /// # Errors
    ///
    /// [`LaneError::LengthMismatch`](crate::LaneError::LengthMismatch) when `src`
    /// does not reach the highest selected lane; `self` is unchanged.
    pub fn load_masked(&mut self, mask: Mask<N>, src: &[T]) -> Result<&mut Self> {
        let needed = Self::masked_len(mask);
        if src.len() < needed {
            return Err(length_mismatch(needed, src.len()));
        }
        if src.len() >= N {
            let loaded = Self::load(src)?;
            *self = Self::select(mask, loaded, *self);
        } else {
            let mut lanes = self.to_array();
            for lane in mask.iter_set() {
                lanes[lane] = src[lane];
            }
            *self = Self::from_array(lanes);
        }
        Ok(self)
    }

    /// [`load_masked`](Self::load_masked) from an aligned slice.
    ///
    /// # Errors
    ///
    /// As `load_masked`, plus [`LaneError::Misaligned`](crate::LaneError::Misaligned).
    pub fn load_aligned_masked(&mut self, mask: Mask<N>, src: &[T]) -> Result<&mut Self> {
        Self::check_alignment(src.as_ptr())?;
        self.load_masked(mask, src)
    }

    /// Writes the selected lanes to `dst[i]`; other elements of `dst` are untouched.
    ///
    /// # Errors
    ///
    /// [`LaneError::LengthMismatch`](crate::LaneError::LengthMismatch) when `dst`
    /// does not reach the highest selected lane; nothing is written.
    pub fn store_masked(self, mask: Mask<N>, dst: &mut [T]) -> Result<()> {
        let needed = Self::masked_len(mask);
        if dst.len() < needed {
            return Err(length_mismatch(needed, dst.len()));
        }
        if mask.all() {
            return self.store(dst);
        }
        let lanes = self.to_array();
        for lane in mask.iter_set() {
            dst[lane] = lanes[lane];
        }
        Ok(())
    }

    /// [`store_masked`](Self::store_masked) to an aligned slice.
    ///
    /// # Errors
    ///
    /// As `store_masked`, plus [`LaneError::Misaligned`](crate::LaneError::Misaligned).
    pub fn store_aligned_masked(self, mask: Mask<N>, dst: &mut [T]) -> Result<()> {
        Self::check_alignment(dst.as_ptr())?;
        self.store_masked(mask, dst)
    }

    /// Value of lane `index`.
    ///
    /// Native registers have no lane addressing, so this spills the register to the
    /// stack; prefer whole-vector operations in loops.
    ///
    /// # Errors
    ///
    /// [`LaneError::IndexOutOfRange`](crate::LaneError::IndexOutOfRange) when
    /// `index >= N`.
    #[inline(always)]
    pub fn extract(self, index: usize) -> Result<T> {
        if index >= N {
            return Err(index_out_of_range(index, N));
        }
        Ok(LaneRegister::extract(self.reg, index))
    }

    /// A copy of `self` with lane `index` replaced by `value`.
    ///
    /// # Errors
    ///
    /// [`LaneError::IndexOutOfRange`](crate::LaneError::IndexOutOfRange) when
    /// `index >= N`.
    #[inline(always)]
    pub fn insert(self, index: usize, value: T) -> Result<Self> {
        if index >= N {
            return Err(index_out_of_range(index, N));
        }
        Ok(Self::from_reg(LaneRegister::insert(self.reg, index, value)))
    }

    /// Lane `i` is `on_true[i]` where `mask[i]` is set, `on_false[i]` elsewhere.
    #[inline(always)]
    pub fn select(mask: Mask<N>, on_true: Self, on_false: Self) -> Self {
        Self::from_reg(LaneRegister::select(mask.bits(), on_true.reg, on_false.reg))
    }

    /// Takes `other` in the selected lanes and keeps `self` elsewhere.
    #[inline(always)]
    pub fn blend(self, mask: Mask<N>, other: impl Into<Self>) -> Self {
        Self::select(mask, other.into(), self)
    }

    /// Overwrites the selected lanes with `value`.
    #[inline(always)]
    pub fn assign_masked(&mut self, mask: Mask<N>, value: impl Into<Self>) -> &mut Self {
        *self = self.blend(mask, value);
        self
    }

    /// Applies `f` to every lane.
    pub fn map(self, f: impl Fn(T) -> T) -> Self {
        Self::from_reg(LaneRegister::map_lanes(self.reg, f))
    }

    cmp_ops! {
        /// Lanes where `self == rhs`.
        cmp_eq,
        /// Lanes where `self != rhs`, including every NaN lane.
        cmp_ne,
        /// Lanes where `self < rhs`.
        cmp_lt,
        /// Lanes where `self <= rhs`.
        cmp_le,
        /// Lanes where `self > rhs`.
        cmp_gt,
        /// Lanes where `self >= rhs`.
        cmp_ge,
    }

    /// Whether every lane equals the matching lane of `rhs`.
    #[inline(always)]
    pub fn exact_eq(self, rhs: impl Into<Self>) -> bool {
        self.cmp_eq(rhs).all()
    }

    /// Lane-wise minimum; a lane compares `self < rhs` and yields `rhs` otherwise,
    /// so a NaN on either side produces the `rhs` lane.
    #[inline(always)]
    pub fn min(self, rhs: impl Into<Self>) -> Self {
        Self::from_reg(LaneRegister::min(self.reg, rhs.into().reg))
    }

    /// Lane-wise maximum, with the NaN rule of [`min`](Self::min).
    #[inline(always)]
    pub fn max(self, rhs: impl Into<Self>) -> Self {
        Self::from_reg(LaneRegister::max(self.reg, rhs.into().reg))
    }

    /// Absolute value; wraps for the minimum signed integer.
    #[inline(always)]
    pub fn abs(self) -> Self {
        Self::from_reg(LaneRegister::abs(self.reg))
    }

    /// `lhs - self`.
    #[inline(always)]
    pub fn sub_from(self, lhs: impl Into<Self>) -> Self {
        let lhs: Self = lhs.into();
        lhs - self
    }

    /// Masked [`sub_from`](Self::sub_from); unselected lanes keep `self`.
    #[inline(always)]
    pub fn sub_from_masked(self, mask: Mask<N>, lhs: impl Into<Self>) -> Self {
        Self::select(mask, self.sub_from(lhs), self)
    }

    masked_binary_ops! {
        LaneRegister;
        add_masked, add_masked_assign => add;
        sub_masked, sub_masked_assign => sub;
        mul_masked, mul_masked_assign => mul;
        min_masked, min_masked_assign => min;
        max_masked, max_masked_assign => max;
    }

    masked_unary_ops! {
        LaneRegister;
        neg_masked => neg;
        abs_masked => abs;
    }

    /// Sum of all lanes, folded lane by lane inside each register and then
    /// across composite halves.
    #[inline(always)]
    pub fn hadd(self) -> T {
        LaneRegister::reduce_add(self.reg)
    }

    #[inline(always)]
    pub fn hmul(self) -> T {
        LaneRegister::reduce_mul(self.reg)
    }

    /// Smallest lane. NaN lanes are skipped, so an all-NaN vector gives `+inf`;
    /// the result does not depend on how the lanes are split across registers.
    #[inline(always)]
    pub fn hmin(self) -> T {
        LaneRegister::reduce_min(self.reg)
    }

    /// Largest lane, skipping NaN like [`hmin`](Self::hmin); `-inf` when every lane is NaN.
    #[inline(always)]
    pub fn hmax(self) -> T {
        LaneRegister::reduce_max(self.reg)
    }

    masked_reductions! {
        LaneRegister;
        /// Sum of the selected lanes; `0` when none is selected.
        hadd_masked => reduce_add, T::ZERO;
        /// Product of the selected lanes; `1` when none is selected.
        hmul_masked => reduce_mul, T::ONE;
        /// Minimum of the selected lanes; `+inf` or `MAX` when none is selected.
        hmin_masked => reduce_min, T::MIN_IDENTITY;
        /// Maximum of the selected lanes; `-inf` or `MIN` when none is selected.
        hmax_masked => reduce_max, T::MAX_IDENTITY;
    }

    /// Index of the first smallest lane. NaN lanes are skipped; an all-NaN vector
    /// reports lane 0.
    pub fn imin(self) -> usize {
        self.imin_masked(Mask::all_set()).unwrap_or(0)
    }

    /// Index of the first largest lane, with the NaN rule of [`imin`](Self::imin).
    pub fn imax(self) -> usize {
        self.imax_masked(Mask::all_set()).unwrap_or(0)
    }

    /// Index of the first smallest selected lane, or `None` when no comparable
    /// lane is selected.
    pub fn imin_masked(self, mask: Mask<N>) -> Option<usize> {
        Self::best_lane(self.to_array(), mask, |candidate, best| candidate < best)
    }

    /// Index of the first largest selected lane, or `None` when no comparable
    /// lane is selected.
    pub fn imax_masked(self, mask: Mask<N>) -> Option<usize> {
        Self::best_lane(self.to_array(), mask, |candidate, best| candidate > best)
    }

    fn best_lane(lanes: [T; N], mask: Mask<N>, better: impl Fn(T, T) -> bool) -> Option<usize> {
        mask.iter_set()
            .filter(|&lane| lanes[lane] == lanes[lane])
            .fold(None, |best, lane| match best {
                Some(b) if !better(lanes[lane], lanes[b]) => Some(b),
                _ => Some(lane),
            })
    }

    /// Lane `i` is `self[swizzle[i]]`.
    pub fn swizzle(self, swizzle: Swizzle<N>) -> Self {
        Self::from_array(swizzle.apply(self.to_array()))
    }

    /// Lane `i` is `base[indices[i]]`.
    ///
    /// # Errors
    ///
    /// [`LaneError::LengthMismatch`](crate::LaneError::LengthMismatch) when an index
    /// points past the end of `base`.
    pub fn gather(base: &[T], indices: SimdVec<u32, N>) -> Result<Self>
    where
        u32: Resolve<N>,
    {
        let mut out = Self::zero();
        out.gather_masked(Mask::all_set(), base, indices)?;
        Ok(out)
    }

    /// Replaces the selected lanes with `base[indices[i]]`; other lanes and their
    /// indices are ignored.
    ///
    /// # Errors
    ///
    /// As [`gather`](Self::gather); `self` is unchanged on error.
    pub fn gather_masked(
        &mut self,
        mask: Mask<N>,
        base: &[T],
        indices: SimdVec<u32, N>,
    ) -> Result<&mut Self>
    where
        u32: Resolve<N>,
    {
        let indices = indices.to_array();
        let mut lanes = self.to_array();
        for lane in mask.iter_set() {
            let index = indices[lane] as usize;
            lanes[lane] = *base
                .get(index)
                .ok_or_else(|| length_mismatch(index + 1, base.len()))?;
        }
        *self = Self::from_array(lanes);
        Ok(self)
    }

    /// Writes lane `i` to `base[indices[i]]`, in ascending lane order, so the
    /// highest lane wins when indices repeat.
    ///
    /// # Errors
    ///
    /// [`LaneError::LengthMismatch`](crate::LaneError::LengthMismatch) when an index
    /// points past the end of `base`; nothing is written.
    pub fn scatter(self, base: &mut [T], indices: SimdVec<u32, N>) -> Result<()>
    where
        u32: Resolve<N>,
    {
        self.scatter_masked(Mask::all_set(), base, indices)
    }

    /// [`scatter`](Self::scatter) restricted to the selected lanes.
    ///
    /// # Errors
    ///
    /// As `scatter`; indices of unselected lanes are not checked.
    pub fn scatter_masked(
        self,
        mask: Mask<N>,
        base: &mut [T],
        indices: SimdVec<u32, N>,
    ) -> Result<()>
    where
        u32: Resolve<N>,
    {
        let indices = indices.to_array();
        if let Some(index) = mask
            .iter_set()
            .map(|lane| indices[lane] as usize)
            .find(|&index| index >= base.len())
        {
            return Err(length_mismatch(index + 1, base.len()));
        }
        let lanes = self.to_array();
        for lane in mask.iter_set() {
            base[indices[lane] as usize] = lanes[lane];
        }
        Ok(())
    }
}

vector_binary_ops! {
    LaneRegister [];
    Add::add, AddAssign::add_assign => add;
    Sub::sub, SubAssign::sub_assign => sub;
    Mul::mul, MulAssign::mul_assign => mul;
}

#[inline(always)]
fn prefetch_hint<const LEVEL: u8, T>(ptr: *const T) {
    #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse"))]
    {
        #[cfg(target_arch = "x86")]
        use std::arch::x86::{_mm_prefetch, _MM_HINT_T0, _MM_HINT_T1, _MM_HINT_T2};
        #[cfg(target_arch = "x86_64")]
        use std::arch::x86_64::{_mm_prefetch, _MM_HINT_T0, _MM_HINT_T1, _MM_HINT_T2};

        let ptr = ptr.cast::<i8>();
        // SAFETY: prefetch is a hint; invalid addresses are ignored.
        unsafe {
            match LEVEL {
                0 => _mm_prefetch::<{ _MM_HINT_T0 }>(ptr),
                1 => _mm_prefetch::<{ _MM_HINT_T1 }>(ptr),
                _ => _mm_prefetch::<{ _MM_HINT_T2 }>(ptr),
            }
        }
    }
    #[cfg(not(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse")))]
    let _ = ptr;
}

impl<T: Resolve<N>, const N: usize> Neg for SimdVec<T, N> {
    type Output = Self;

    /// Negates every lane; wraps for integers.
    #[inline(always)]
    fn neg(self) -> Self {
        Self::from_reg(LaneRegister::neg(self.reg))
    }
}
