//! Operations on floating-point vectors.
//!
//! All lane arithmetic is IEEE 754 round-to-nearest. The named rounding
//! operations fix their direction: `floor` toward `-inf`, `ceil` toward `+inf`,
//! `trunc` toward zero and `round` to nearest with ties to even.

use std::ops::{Div, DivAssign};

use crate::element::FloatElement;

use super::mask::Mask;
use super::register::FloatRegister;
use super::resolve::{Reg, Resolve};
use super::vector::{masked_binary_ops, masked_unary_ops, vector_binary_ops, SimdVec};

vector_binary_ops! {
    FloatRegister [T: FloatElement, Reg<T, N>: FloatRegister];
    Div::div, DivAssign::div_assign => div;
}

impl<T, const N: usize> SimdVec<T, N>
where
    T: FloatElement + Resolve<N>,
    Reg<T, N>: FloatRegister,
{
    #[inline(always)]
    pub fn sqrt(self) -> Self {
        Self::from_reg(FloatRegister::sqrt(self.reg))
    }

    /// `self * self`.
    #[inline(always)]
    pub fn sqr(self) -> Self {
        self * self
    }

    /// Reciprocal `1 / self`.
    ///
    /// Registers with a hardware estimate use it: `rcpps` on SSE and AVX
    /// (relative error at most `1.5 * 2^-12`), `rcp14` on AVX-512 (below `2^-14`)
    /// and a refined `vrecpe` on NEON (below `2^-14`). Every other register,
    /// including every `f64` register outside AVX-512, divides exactly.
    #[inline(always)]
    pub fn rcp(self) -> Self {
        Self::from_reg(FloatRegister::rcp(self.reg))
    }

    /// `scale / self` through [`rcp`](Self::rcp), with the same error bound.
    #[inline(always)]
    pub fn rcp_scaled(self, scale: impl Into<Self>) -> Self {
        let scale: Self = scale.into();
        self.rcp() * scale
    }

    #[inline(always)]
    pub fn floor(self) -> Self {
        Self::from_reg(FloatRegister::floor(self.reg))
    }

    #[inline(always)]
    pub fn ceil(self) -> Self {
        Self::from_reg(FloatRegister::ceil(self.reg))
    }

    /// Round to nearest, ties to even: `2.5` rounds to `2.0`.
    #[inline(always)]
    pub fn round(self) -> Self {
        Self::from_reg(FloatRegister::round(self.reg))
    }

    #[inline(always)]
    pub fn trunc(self) -> Self {
        Self::from_reg(FloatRegister::trunc(self.reg))
    }

    /// `self * b + c`, with a single rounding when the build enables `fma`.
    #[inline(always)]
    pub fn mul_add(self, b: impl Into<Self>, c: impl Into<Self>) -> Self {
        Self::from_reg(FloatRegister::mul_add(self.reg, b.into().reg, c.into().reg))
    }

    /// `self * b - c`, fused like [`mul_add`](Self::mul_add).
    #[inline(always)]
    pub fn mul_sub(self, b: impl Into<Self>, c: impl Into<Self>) -> Self {
        let c: Self = c.into();
        self.mul_add(b, -c)
    }

    /// `(self + b) * c`.
    #[inline(always)]
    pub fn add_mul(self, b: impl Into<Self>, c: impl Into<Self>) -> Self {
        let (b, c): (Self, Self) = (b.into(), c.into());
        (self + b) * c
    }

    /// `(self - b) * c`.
    #[inline(always)]
    pub fn sub_mul(self, b: impl Into<Self>, c: impl Into<Self>) -> Self {
        let (b, c): (Self, Self) = (b.into(), c.into());
        (self - b) * c
    }

    /// [`mul_add`](Self::mul_add) in the selected lanes; other lanes keep `self`.
    #[inline(always)]
    pub fn mul_add_masked(self, mask: Mask<N>, b: impl Into<Self>, c: impl Into<Self>) -> Self {
        Self::select(mask, self.mul_add(b, c), self)
    }

    /// [`mul_sub`](Self::mul_sub) in the selected lanes; other lanes keep `self`.
    #[inline(always)]
    pub fn mul_sub_masked(self, mask: Mask<N>, b: impl Into<Self>, c: impl Into<Self>) -> Self {
        Self::select(mask, self.mul_sub(b, c), self)
    }

    /// `scale / self` in the selected lanes; other lanes keep `self`.
    #[inline(always)]
    pub fn rcp_scaled_masked(self, mask: Mask<N>, scale: impl Into<Self>) -> Self {
        Self::select(mask, self.rcp_scaled(scale), self)
    }

    masked_binary_ops! {
        FloatRegister;
        div_masked, div_masked_assign => div;
    }

    masked_unary_ops! {
        FloatRegister;
        sqrt_masked => sqrt;
        rcp_masked => rcp;
        floor_masked => floor;
        ceil_masked => ceil;
        round_masked => round;
        trunc_masked => trunc;
    }

    /// [`sqr`](Self::sqr) in the selected lanes; other lanes keep `self`.
    #[inline(always)]
    pub fn sqr_masked(self, mask: Mask<N>) -> Self {
        self.mul_masked(mask, self)
    }

    /// Lanes holding NaN.
    #[inline(always)]
    pub fn is_nan(self) -> Mask<N> {
        self.cmp_ne(self)
    }

    /// Lanes holding `+inf` or `-inf`.
    #[inline(always)]
    pub fn is_inf(self) -> Mask<N> {
        self.abs().cmp_eq(T::infinity())
    }

    /// Lanes that are neither NaN nor infinite.
    #[inline(always)]
    pub fn is_finite(self) -> Mask<N> {
        self.abs().cmp_lt(T::infinity())
    }

    /// Lanes equal to `+0.0` or `-0.0`.
    #[inline(always)]
    pub fn is_zero(self) -> Mask<N> {
        self.cmp_eq(T::ZERO)
    }

    /// Lanes where `|self - rhs| <= margin`.
    #[inline(always)]
    pub fn cmp_eq_range(self, rhs: impl Into<Self>, margin: impl Into<Self>) -> Mask<N> {
        let rhs: Self = rhs.into();
        (self - rhs).abs().cmp_le(margin)
    }
}
