#![cfg_attr(
    all(
        any(target_arch = "x86", target_arch = "x86_64"),
        rustc_channel = "nightly"
    ),
    feature(avx512_target_feature, stdarch_x86_avx512)
)]

//! Uniform element-wise SIMD vectors.
//!
//! A vector type is identified by its scalar element and its lane count:
//! [`SimdVec<f32, 16>`](simd::SimdVec) is "sixteen `f32` lanes" on every target.
//! The width-resolution table in [`simd::resolve`] decides at compile time how
//! that vector is stored:
//!
//! - **native**: one hardware register of exactly that width (e.g. `__m512`),
//! - **composite**: two half-width vectors resolved by the same rule,
//! - **emulated**: a scalar-lane array when no hardware form exists.
//!
//! Every representation implements the same operation contract, so the choice is
//! only observable through [`SimdVec::shape`](simd::SimdVec::shape) and timing.
//!
//! ```rust
//! use lanefold::simd::{Mask, SimdVec};
//!
//! let v = SimdVec::<f32, 16>::from_array(core::array::from_fn(|i| i as f32));
//! let w = SimdVec::<f32, 16>::splat(1.0);
//! assert_eq!((v + w).to_array()[15], 16.0);
//!
//! let a = SimdVec::<f32, 4>::from_array([1.0, 2.0, 3.0, 4.0]);
//! let m = Mask::from_array([true, false, true, false]);
//! assert_eq!(a.add_masked(m, 10.0f32).to_array(), [11.0, 2.0, 13.0, 4.0]);
//! ```

pub mod alloc;
pub mod capabilities;
pub mod element;
pub mod error;
pub mod oracle;
pub mod simd;

pub use capabilities::{Capabilities, Isa};
pub use element::{Element, ElementType, FloatElement, IntElement};
pub use error::{LaneError, Result};
pub use simd::{Mask, SimdVec, Swizzle};

/// Minimum slice length before the slice kernels switch from scalar loops to SIMD.
pub const SIMD_THRESHOLD: usize = 64;

/// Minimum slice length before the slice kernels fan out over the rayon pool.
pub const PARALLEL_SIMD_THRESHOLD: usize = 262_144;

/// Number of elements handed to each rayon task by the parallel slice kernels.
pub const PARALLEL_CHUNK_SIZE: usize = 16_384;
