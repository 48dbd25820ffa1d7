//! x86 native leaves, one module per instruction-set family.

#[cfg(any(avx2, avx512))]
pub mod avx;
#[cfg(avx512)]
pub mod avx512;
#[cfg(any(sse, avx2, avx512))]
pub mod sse;
