//! Vector types, their register representations and the slice kernels built on them.
//!
//! The layers, leaf first:
//!
//! - [`register`]: the contract every representation implements,
//! - [`emulated`], [`composite`] and the per-ISA native leaves,
//! - [`resolve`]: the table picking one representation per `(element, lanes)`,
//! - [`SimdVec`], [`Mask`] and [`Swizzle`]: the public surface,
//! - [`slice`]: whole-buffer kernels driving `SimdVec` sequentially or over rayon.

pub mod composite;
pub mod emulated;
#[cfg(any(sse, avx2, avx512, neon))]
mod native;
pub mod register;
pub mod resolve;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod x86;

#[cfg(neon)]
pub mod neon;

mod convert;
mod float;
mod int;
pub mod mask;
mod pack;
pub mod slice;
pub mod swizzle;
mod trig;
pub mod vector;

pub use mask::Mask;
pub use pack::HalfLength;
pub use resolve::{Reg, Resolve};
pub use slice::{SimdAdd, SimdMul, SimdSinCos};
pub use swizzle::Swizzle;
pub use vector::{Companions, SimdVec, VectorKey};
